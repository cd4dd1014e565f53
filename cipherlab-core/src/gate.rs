// SPDX-License-Identifier: MIT OR Apache-2.0

//! Predicates deciding which actions are currently legal for a party.
//!
//! All predicates are pure functions of the registry state. They are meant to be evaluated again
//! whenever they are needed, as the counterpart's key pair or the party's links can change at any
//! time. Unknown party handles are never permitted anything.
use std::fmt;

use crate::party::PartyId;
use crate::registry::Registry;
use crate::scheme::SchemeAdapter;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Encrypt,
    Decrypt,
    Send,
    Sign,
    Verify,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Encrypt => "encrypt",
            Action::Decrypt => "decrypt",
            Action::Send => "send",
            Action::Sign => "sign",
            Action::Verify => "verify",
        };
        f.write_str(name)
    }
}

/// Party has a key pair, a recipient with a key pair and something to encrypt.
pub fn can_encrypt<S>(registry: &Registry<S>, id: PartyId) -> bool
where
    S: SchemeAdapter,
{
    let Some(party) = registry.get(id) else {
        return false;
    };

    party.has_key_pair()
        && !party.plaintext().is_empty()
        && registry
            .target_of(id)
            .is_some_and(|target| target.has_key_pair())
}

/// Party has a key pair, knows a sender with a key pair and holds a non-empty ciphertext.
pub fn can_decrypt<S>(registry: &Registry<S>, id: PartyId) -> bool
where
    S: SchemeAdapter,
{
    let Some(party) = registry.get(id) else {
        return false;
    };

    party.has_key_pair()
        && party.has_ciphertext()
        && registry
            .source_of(id)
            .is_some_and(|source| source.has_key_pair())
}

/// Party has a recipient and a non-empty ciphertext. No key material is required.
pub fn can_send<S>(registry: &Registry<S>, id: PartyId) -> bool
where
    S: SchemeAdapter,
{
    let Some(party) = registry.get(id) else {
        return false;
    };

    party.has_ciphertext() && registry.target_of(id).is_some()
}

/// Party has a key pair and a plaintext to sign.
pub fn can_sign<S>(registry: &Registry<S>, id: PartyId) -> bool
where
    S: SchemeAdapter,
{
    registry
        .get(id)
        .is_some_and(|party| party.has_key_pair() && !party.plaintext().is_empty())
}

/// Party holds a plaintext and a received signature, and knows the sender's key pair to check it
/// against.
pub fn can_verify<S>(registry: &Registry<S>, id: PartyId) -> bool
where
    S: SchemeAdapter,
{
    let Some(party) = registry.get(id) else {
        return false;
    };

    !party.plaintext().is_empty()
        && party.signature().is_some()
        && registry
            .source_of(id)
            .is_some_and(|source| source.has_key_pair())
}

pub fn permits<S>(registry: &Registry<S>, id: PartyId, action: Action) -> bool
where
    S: SchemeAdapter,
{
    match action {
        Action::Encrypt => can_encrypt(registry, id),
        Action::Decrypt => can_decrypt(registry, id),
        Action::Send => can_send(registry, id),
        Action::Sign => can_sign(registry, id),
        Action::Verify => can_verify(registry, id),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::party::PartyId;
    use crate::registry::Registry;
    use crate::scheme::rsa::{RsaCiphertext, RsaKeyPair};
    use crate::scheme::{Ciphertext, Rsa};

    use super::{Action, can_decrypt, can_encrypt, can_send, can_sign, can_verify, permits};

    fn key_pair() -> RsaKeyPair {
        RsaKeyPair {
            modulus: "3233".parse().unwrap(),
            e: "17".parse().unwrap(),
            d: "2753".parse().unwrap(),
            block_size_pub: "1".parse().unwrap(),
            block_size_priv: "1".parse().unwrap(),
        }
    }

    /// Alice and Bob, where Alice optionally sends to Bob.
    fn registry(linked: bool) -> (Registry<Rsa>, PartyId, PartyId) {
        let mut registry = Registry::new();
        let alice = registry.insert("Alice").unwrap();
        let bob = registry.insert("Bob").unwrap();
        if linked {
            registry.set_target(alice, bob).unwrap();
        }
        (registry, alice, bob)
    }

    #[rstest]
    #[case(false, false, false, false)]
    #[case(true, false, false, false)]
    #[case(false, true, false, false)]
    #[case(false, false, true, false)]
    #[case(false, false, false, true)]
    #[case(true, true, false, false)]
    #[case(true, false, true, false)]
    #[case(true, false, false, true)]
    #[case(false, true, true, false)]
    #[case(false, true, false, true)]
    #[case(false, false, true, true)]
    #[case(true, true, true, false)]
    #[case(true, true, false, true)]
    #[case(true, false, true, true)]
    #[case(false, true, true, true)]
    #[case(true, true, true, true)]
    fn encrypt_truth_table(
        #[case] own_key: bool,
        #[case] has_target: bool,
        #[case] target_key: bool,
        #[case] has_plaintext: bool,
    ) {
        let (mut registry, alice, bob) = registry(has_target);
        if own_key {
            registry.get_mut(alice).unwrap().set_key_pair(key_pair());
        }
        if target_key {
            registry.get_mut(bob).unwrap().set_key_pair(key_pair());
        }
        if has_plaintext {
            registry.get_mut(alice).unwrap().set_plaintext("HELLO");
        }

        let expected = own_key && has_target && target_key && has_plaintext;
        assert_eq!(can_encrypt(&registry, alice), expected);
        assert_eq!(permits(&registry, alice, Action::Encrypt), expected);
    }

    #[rstest]
    #[case(false, false, false, false)]
    #[case(true, false, false, false)]
    #[case(false, true, false, false)]
    #[case(false, false, true, false)]
    #[case(false, false, false, true)]
    #[case(true, true, false, false)]
    #[case(true, false, true, false)]
    #[case(true, false, false, true)]
    #[case(false, true, true, false)]
    #[case(false, true, false, true)]
    #[case(false, false, true, true)]
    #[case(true, true, true, false)]
    #[case(true, true, false, true)]
    #[case(true, false, true, true)]
    #[case(false, true, true, true)]
    #[case(true, true, true, true)]
    fn decrypt_truth_table(
        #[case] own_key: bool,
        #[case] has_source: bool,
        #[case] source_key: bool,
        #[case] has_ciphertext: bool,
    ) {
        let (mut registry, alice, bob) = registry(true);
        if has_source {
            registry
                .get_mut(alice)
                .unwrap()
                .set_ciphertext(Some(RsaCiphertext::new("1 2 3")));
            assert!(registry.send(alice));
        }
        if own_key {
            registry.get_mut(bob).unwrap().set_key_pair(key_pair());
        }
        if source_key {
            registry.get_mut(alice).unwrap().set_key_pair(key_pair());
        }
        let ciphertext = has_ciphertext.then(|| RsaCiphertext::new("9 8 7"));
        registry.get_mut(bob).unwrap().set_ciphertext(ciphertext);

        let expected = own_key && has_source && source_key && has_ciphertext;
        assert_eq!(can_decrypt(&registry, bob), expected);
        assert_eq!(permits(&registry, bob, Action::Decrypt), expected);
    }

    #[test]
    fn empty_ciphertext_counts_as_absent() {
        let (mut registry, alice, bob) = registry(true);
        registry.get_mut(alice).unwrap().set_key_pair(key_pair());
        registry
            .get_mut(alice)
            .unwrap()
            .set_ciphertext(Some(RsaCiphertext::new("1 2 3")));
        registry.send(alice);
        registry.get_mut(bob).unwrap().set_key_pair(key_pair());
        assert!(can_decrypt(&registry, bob));

        registry
            .get_mut(bob)
            .unwrap()
            .set_ciphertext(Some(RsaCiphertext::empty()));
        assert!(!can_decrypt(&registry, bob));

        registry
            .get_mut(alice)
            .unwrap()
            .set_ciphertext(Some(RsaCiphertext::empty()));
        assert!(!can_send(&registry, alice));
    }

    #[rstest]
    #[case(false, false, false)]
    #[case(true, false, false)]
    #[case(false, true, false)]
    #[case(true, true, true)]
    fn send_needs_no_keys(
        #[case] has_target: bool,
        #[case] has_ciphertext: bool,
        #[case] expected: bool,
    ) {
        let (mut registry, alice, _bob) = registry(has_target);
        if has_ciphertext {
            registry
                .get_mut(alice)
                .unwrap()
                .set_ciphertext(Some(RsaCiphertext::new("1 2 3")));
        }
        assert_eq!(can_send(&registry, alice), expected);
    }

    #[test]
    fn recomputed_after_counterpart_changes() {
        let (mut registry, alice, bob) = registry(true);
        registry.get_mut(alice).unwrap().set_key_pair(key_pair());
        registry.get_mut(bob).unwrap().set_key_pair(key_pair());
        registry.get_mut(alice).unwrap().set_plaintext("HELLO");
        assert!(can_encrypt(&registry, alice));

        registry.remove(bob);
        assert!(!can_encrypt(&registry, alice));
    }

    #[test]
    fn sign_and_verify() {
        let (mut registry, alice, bob) = registry(true);
        assert!(!can_sign(&registry, alice));
        registry.get_mut(alice).unwrap().set_key_pair(key_pair());
        assert!(!can_sign(&registry, alice));
        registry.get_mut(alice).unwrap().set_plaintext("HELLO");
        assert!(can_sign(&registry, alice));

        registry.get_mut(bob).unwrap().set_plaintext("HELLO");
        assert!(!can_verify(&registry, bob));
        registry
            .get_mut(alice)
            .unwrap()
            .set_ciphertext(Some(RsaCiphertext::new("1 2 3")));
        registry.send(alice);

        // Received without a signature.
        assert!(!can_verify(&registry, bob));

        registry
            .get_mut(alice)
            .unwrap()
            .set_signature(Some("2790".into()));
        registry.send(alice);
        assert!(can_verify(&registry, bob));
        assert!(permits(&registry, bob, Action::Verify));

        registry.get_mut(bob).unwrap().set_plaintext("");
        assert!(!can_verify(&registry, bob));
    }

    #[test]
    fn unknown_party() {
        let (mut registry, alice, _bob) = registry(false);
        registry.remove(alice);
        for action in [
            Action::Encrypt,
            Action::Decrypt,
            Action::Send,
            Action::Sign,
            Action::Verify,
        ] {
            assert!(!permits(&registry, alice, action));
        }
    }
}
