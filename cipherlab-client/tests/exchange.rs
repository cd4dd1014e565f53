// SPDX-License-Identifier: MIT OR Apache-2.0

use assert_matches::assert_matches;
use cipherlab_client::test_utils::{MockBackend, mv_key_pair, rsa_key_pair, setup_logging};
use cipherlab_client::{Session, SessionBuilder, SessionError};
use cipherlab_core::Endpoint;
use cipherlab_core::scheme::mv::{MenezesVanstone, MvCiphertext};
use cipherlab_core::scheme::rsa::{Rsa, RsaCiphertext};
use serde_json::json;

async fn wait_for_request(backend: &MockBackend, endpoint: Endpoint, count: usize) {
    while backend.requests_to(endpoint).len() < count {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn alice_sends_hello_to_bob() {
    setup_logging();

    let backend = MockBackend::new();
    let session: Session<_, Rsa> = SessionBuilder::new()
        .with_default_parties()
        .build(backend.clone())
        .unwrap();
    let alice = session.find_party("Alice").await.unwrap();
    let bob = session.find_party("Bob").await.unwrap();

    backend.respond(Endpoint::RsaCreateKeyPair, rsa_key_pair("3233"));
    session.generate_key_pair(alice).await.unwrap();
    backend.respond(Endpoint::RsaCreateKeyPair, rsa_key_pair("4757"));
    session.generate_key_pair(bob).await.unwrap();

    session.set_target(alice, bob).await.unwrap();
    assert!(!session.can_encrypt(alice).await);
    session.set_plaintext(alice, "HELLO").await.unwrap();
    assert!(session.can_encrypt(alice).await);
    assert!(!session.can_send(alice).await);

    backend.respond(Endpoint::RsaEncrypt, json!({"message": "3000 28 1313"}));
    session.encrypt(alice).await.unwrap();

    // Encrypted with Bob's key.
    let request = backend.requests_to(Endpoint::RsaEncrypt).pop().unwrap();
    assert_eq!(request["message"], json!("HELLO"));
    assert_eq!(request["key_pair"]["modulus"], json!("4757"));
    assert_eq!(request["number_system_base"], json!(55296));

    assert!(session.can_send(alice).await);
    session.send(alice).await.unwrap();

    let bob_state = session.party(bob).await.unwrap();
    assert_eq!(
        bob_state.ciphertext(),
        Some(&RsaCiphertext::new("3000 28 1313"))
    );
    assert_eq!(bob_state.received_from(), Some(alice));
    assert!(session.can_decrypt(bob).await);

    backend.respond(Endpoint::RsaDecrypt, json!({"message": "HELLO"}));
    session.decrypt(bob).await.unwrap();
    assert_eq!(session.party(bob).await.unwrap().plaintext(), "HELLO");

    let request = backend.requests_to(Endpoint::RsaDecrypt).pop().unwrap();
    assert_eq!(request["message"], json!("3000 28 1313"));
    assert_eq!(request["key_pair"]["modulus"], json!("4757"));

    session.clear(alice).await.unwrap();
    let alice_state = session.party(alice).await.unwrap();
    assert!(alice_state.plaintext().is_empty());
    assert!(alice_state.ciphertext().is_none());
    assert!(alice_state.has_key_pair());
    assert_eq!(alice_state.sending_to(), Some(bob));
}

#[tokio::test]
async fn curve_scheme_round_trip() {
    let backend = MockBackend::new();
    let session: Session<_, MenezesVanstone> = SessionBuilder::new()
        .with_default_parties()
        .build(backend.clone())
        .unwrap();
    let alice = session.find_party("Alice").await.unwrap();
    let bob = session.find_party("Bob").await.unwrap();

    backend.respond(Endpoint::MvCreateKeyPair, mv_key_pair("1111"));
    session.generate_key_pair(alice).await.unwrap();
    backend.respond(Endpoint::MvCreateKeyPair, mv_key_pair("2222"));
    session.generate_key_pair(bob).await.unwrap();

    session.set_target(alice, bob).await.unwrap();
    session.set_plaintext(alice, "HELLO").await.unwrap();

    let ciphertext = json!({
        "encrypted_message": "817263 9182736",
        "points": [{"x": "12", "y": "34"}, {"x": "56", "y": "78"}],
    });
    backend.respond(Endpoint::MvEncrypt, ciphertext.clone());
    session.encrypt(alice).await.unwrap();

    let request = backend.requests_to(Endpoint::MvEncrypt).pop().unwrap();
    assert_eq!(request["radix"], json!(55296));
    assert_eq!(request["message"], json!("HELLO"));
    assert_eq!(request["public_key"]["curve"]["a"], json!(-25));

    session.send(alice).await.unwrap();
    let expected: MvCiphertext = serde_json::from_value(ciphertext.clone()).unwrap();
    assert_eq!(
        session.party(bob).await.unwrap().ciphertext(),
        Some(&expected)
    );

    backend.respond(Endpoint::MvDecrypt, json!({"message": "HELLO"}));
    session.decrypt(bob).await.unwrap();
    assert_eq!(session.party(bob).await.unwrap().plaintext(), "HELLO");

    // Bob decrypts with his own private key.
    let request = backend.requests_to(Endpoint::MvDecrypt).pop().unwrap();
    assert_eq!(request["private_key"]["x"], json!("2222"));
    assert_eq!(request["cipher_text"], ciphertext);
}

#[tokio::test]
async fn late_result_for_removed_party_is_discarded() {
    let backend = MockBackend::new();
    let session: Session<_, Rsa> = SessionBuilder::new()
        .with_default_parties()
        .build(backend.clone())
        .unwrap();
    let alice = session.find_party("Alice").await.unwrap();

    let held = backend.hold(Endpoint::RsaCreateKeyPair);
    backend.respond(Endpoint::RsaCreateKeyPair, rsa_key_pair("3233"));

    let pending = tokio::spawn({
        let session = session.clone();
        async move { session.generate_key_pair(alice).await }
    });
    wait_for_request(&backend, Endpoint::RsaCreateKeyPair, 1).await;

    session.remove_party(alice).await.unwrap();
    let alice_again = session.add_party("Alice").await.unwrap();
    held.release();

    assert_matches!(
        pending.await.unwrap(),
        Err(SessionError::UnknownParty(id)) if id == alice
    );
    assert!(!session.party(alice_again).await.unwrap().has_key_pair());
}

#[tokio::test]
async fn actions_on_different_parties_run_concurrently() {
    let backend = MockBackend::new();
    let session: Session<_, Rsa> = SessionBuilder::new()
        .with_default_parties()
        .build(backend.clone())
        .unwrap();
    let alice = session.find_party("Alice").await.unwrap();
    let bob = session.find_party("Bob").await.unwrap();

    backend.respond(Endpoint::RsaCreateKeyPair, rsa_key_pair("1111"));
    backend.respond(Endpoint::RsaCreateKeyPair, rsa_key_pair("2222"));
    let held = backend.hold(Endpoint::RsaCreateKeyPair);

    let pending = tokio::spawn({
        let session = session.clone();
        async move { session.generate_key_pair(alice).await }
    });
    wait_for_request(&backend, Endpoint::RsaCreateKeyPair, 1).await;

    // Alice's request is still in flight, Bob is not blocked by it.
    session.generate_key_pair(bob).await.unwrap();
    assert!(!session.party(alice).await.unwrap().has_key_pair());

    held.release();
    pending.await.unwrap().unwrap();

    assert_eq!(
        session.key_pair(bob).await.unwrap().modulus.as_str(),
        "1111"
    );
    assert_eq!(
        session.key_pair(alice).await.unwrap().modulus.as_str(),
        "2222"
    );
}

#[tokio::test]
async fn last_response_wins() {
    let backend = MockBackend::new();
    let session: Session<_, Rsa> = SessionBuilder::new()
        .with_default_parties()
        .build(backend.clone())
        .unwrap();
    let alice = session.find_party("Alice").await.unwrap();

    backend.respond(Endpoint::RsaCreateKeyPair, rsa_key_pair("1111"));
    backend.respond(Endpoint::RsaCreateKeyPair, rsa_key_pair("2222"));
    let held = backend.hold(Endpoint::RsaCreateKeyPair);

    let first = tokio::spawn({
        let session = session.clone();
        async move { session.generate_key_pair(alice).await }
    });
    wait_for_request(&backend, Endpoint::RsaCreateKeyPair, 1).await;

    session.generate_key_pair(alice).await.unwrap();
    assert_eq!(
        session.key_pair(alice).await.unwrap().modulus.as_str(),
        "1111"
    );

    held.release();
    first.await.unwrap().unwrap();

    // The earlier request answered last and replaced the key pair as a whole.
    assert_eq!(
        session.key_pair(alice).await.unwrap().modulus.as_str(),
        "2222"
    );
}

#[tokio::test]
async fn failed_request_changes_nothing() {
    let backend = MockBackend::new();
    let session: Session<_, Rsa> = SessionBuilder::new()
        .with_default_parties()
        .build(backend.clone())
        .unwrap();
    let alice = session.find_party("Alice").await.unwrap();
    let bob = session.find_party("Bob").await.unwrap();

    backend.respond(Endpoint::RsaCreateKeyPair, rsa_key_pair("3233"));
    session.generate_key_pair(alice).await.unwrap();
    backend.respond(Endpoint::RsaCreateKeyPair, rsa_key_pair("4757"));
    session.generate_key_pair(bob).await.unwrap();
    session.set_target(alice, bob).await.unwrap();
    session.set_plaintext(alice, "HELLO").await.unwrap();
    let before = session.party(alice).await.unwrap();

    backend.fail(Endpoint::RsaEncrypt);
    assert_matches!(
        session.encrypt(alice).await,
        Err(SessionError::Backend(_))
    );
    assert_eq!(session.party(alice).await.unwrap(), before);

    // Malformed responses are failures as well.
    backend.respond(Endpoint::RsaCreateKeyPair, json!({"modulus": "not a number"}));
    assert_matches!(
        session.generate_key_pair(alice).await,
        Err(SessionError::Backend(_))
    );
    assert_eq!(session.party(alice).await.unwrap(), before);
}

#[tokio::test]
async fn recipient_verifies_the_signature_it_received() {
    let backend = MockBackend::new();
    let session: Session<_, Rsa> = SessionBuilder::new()
        .with_default_parties()
        .build(backend.clone())
        .unwrap();
    let alice = session.find_party("Alice").await.unwrap();
    let bob = session.find_party("Bob").await.unwrap();

    backend.respond(Endpoint::RsaCreateKeyPair, rsa_key_pair("3233"));
    session.generate_key_pair(alice).await.unwrap();
    backend.respond(Endpoint::RsaCreateKeyPair, rsa_key_pair("4757"));
    session.generate_key_pair(bob).await.unwrap();
    session.set_target(alice, bob).await.unwrap();
    session.set_plaintext(alice, "HELLO").await.unwrap();

    backend.respond(Endpoint::RsaSign, json!({"message": "2790"}));
    session.sign(alice).await.unwrap();
    backend.respond(Endpoint::RsaEncrypt, json!({"message": "3000 28 1313"}));
    session.encrypt(alice).await.unwrap();
    session.send(alice).await.unwrap();

    let bob_state = session.party(bob).await.unwrap();
    assert_eq!(bob_state.signature(), Some("2790"));
    assert_eq!(bob_state.received_from(), Some(alice));

    backend.respond(Endpoint::RsaDecrypt, json!({"message": "HELLO"}));
    session.decrypt(bob).await.unwrap();

    backend.respond(Endpoint::RsaVerify, json!({"message": "true"}));
    assert!(session.verify(bob).await.unwrap());

    // Checked with Alice's key against what Bob decrypted.
    assert_eq!(
        backend.requests_to(Endpoint::RsaVerify).pop().unwrap(),
        json!({
            "plaintext": "HELLO",
            "signature": "2790",
            "key_pair": rsa_key_pair("3233"),
        })
    );

    // A later unsigned message drops the signature again.
    session.clear(alice).await.unwrap();
    session.set_plaintext(alice, "BYE").await.unwrap();
    backend.respond(Endpoint::RsaEncrypt, json!({"message": "17 4"}));
    session.encrypt(alice).await.unwrap();
    session.send(alice).await.unwrap();
    assert!(session.party(bob).await.unwrap().signature().is_none());
    assert_matches!(
        session.verify(bob).await,
        Err(SessionError::NotPermitted { .. })
    );
}
