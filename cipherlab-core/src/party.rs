// SPDX-License-Identifier: MIT OR Apache-2.0

//! Simulated participants of an exchange.
use std::fmt;

use crate::scheme::{Ciphertext, SchemeAdapter};

/// Handle of a party inside a [`Registry`](crate::Registry).
///
/// Handles are issued by the registry and never reused, even after the party they pointed to got
/// removed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartyId(pub(crate) u64);

impl PartyId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Debug for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PartyId").field(&self.0).finish()
    }
}

/// Key material and message state of one simulated participant.
///
/// The party itself does not validate when it gets mutated, this is up to the
/// [`gate`](crate::gate). Relations to other parties can only be changed through the registry so
/// a party can never point at itself.
#[derive(Clone, Debug, PartialEq)]
pub struct Party<S>
where
    S: SchemeAdapter,
{
    id: PartyId,
    name: String,
    key_pair: Option<S::KeyPair>,
    plaintext: String,
    ciphertext: Option<S::Ciphertext>,
    signature: Option<String>,
    sending_to: Option<PartyId>,
    received_from: Option<PartyId>,
}

impl<S> Party<S>
where
    S: SchemeAdapter,
{
    pub(crate) fn new(id: PartyId, name: String) -> Self {
        Self {
            id,
            name,
            key_pair: None,
            plaintext: String::new(),
            ciphertext: None,
            signature: None,
            sending_to: None,
            received_from: None,
        }
    }

    pub fn id(&self) -> PartyId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key_pair(&self) -> Option<&S::KeyPair> {
        self.key_pair.as_ref()
    }

    /// Replaces the key pair as a whole.
    pub fn set_key_pair(&mut self, key_pair: S::KeyPair) {
        self.key_pair = Some(key_pair);
    }

    pub fn has_key_pair(&self) -> bool {
        self.key_pair.is_some()
    }

    pub fn plaintext(&self) -> &str {
        &self.plaintext
    }

    pub fn set_plaintext(&mut self, plaintext: impl Into<String>) {
        self.plaintext = plaintext.into();
    }

    pub fn ciphertext(&self) -> Option<&S::Ciphertext> {
        self.ciphertext.as_ref()
    }

    pub fn set_ciphertext(&mut self, ciphertext: Option<S::Ciphertext>) {
        self.ciphertext = ciphertext;
    }

    /// Returns true if a ciphertext is present and not the empty sentinel.
    pub fn has_ciphertext(&self) -> bool {
        self.ciphertext
            .as_ref()
            .is_some_and(|ciphertext| !ciphertext.is_empty())
    }

    /// Signature over the plaintext, made by this party or received along with a ciphertext.
    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    pub fn set_signature(&mut self, signature: Option<String>) {
        self.signature = signature;
    }

    pub fn sending_to(&self) -> Option<PartyId> {
        self.sending_to
    }

    pub fn received_from(&self) -> Option<PartyId> {
        self.received_from
    }

    pub(crate) fn set_sending_to(&mut self, target: Option<PartyId>) {
        debug_assert_ne!(target, Some(self.id));
        self.sending_to = target;
    }

    pub(crate) fn set_received_from(&mut self, source: Option<PartyId>) {
        self.received_from = source;
    }

    /// Resets plaintext, ciphertext and signature. Key pair and relations stay untouched.
    pub fn clear(&mut self) {
        self.plaintext.clear();
        self.ciphertext = None;
        self.signature = None;
    }
}
