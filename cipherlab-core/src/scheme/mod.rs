// SPDX-License-Identifier: MIT OR Apache-2.0

//! Translation between party state and the request shapes of the computation service.
//!
//! Both supported schemes implement [`SchemeAdapter`]. The adapter builds requests from a snapshot
//! of the involved parties and applies the responses back onto a party. Applying a result always
//! stores an owned copy, a party never shares a value with the last network response.
pub mod mv;
pub mod rsa;

use std::fmt::{self, Debug};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::endpoint::Endpoint;
use crate::party::{Party, PartyId};

pub use mv::MenezesVanstone;
pub use rsa::Rsa;

/// Scheme-specific ciphertext with a well-defined "empty" value.
pub trait Ciphertext: Clone + Debug + PartialEq + Send + Sync + 'static {
    /// The sentinel meaning "no message encrypted yet".
    fn empty() -> Self;

    fn is_empty(&self) -> bool;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SchemeKind {
    Rsa,
    MenezesVanstone,
}

impl fmt::Display for SchemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemeKind::Rsa => write!(f, "rsa"),
            SchemeKind::MenezesVanstone => write!(f, "menezes-vanstone"),
        }
    }
}

/// Response carrying a single string, used for decrypted plaintexts, signatures and verification
/// results.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Capability set every supported scheme offers.
pub trait SchemeAdapter: Clone + Debug + PartialEq + Send + Sync + Sized + 'static {
    const KIND: SchemeKind;

    const KEYGEN_ENDPOINT: Endpoint;

    const ENCRYPT_ENDPOINT: Endpoint;

    const DECRYPT_ENDPOINT: Endpoint;

    /// Parameters for key generation and text encoding.
    type Config: Clone + Debug + Default + Send + Sync + 'static;

    type KeyPair: Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static;

    type Ciphertext: Ciphertext;

    type KeygenRequest: Debug + Serialize + Send + Sync;

    type EncryptRequest: Debug + Serialize + Send + Sync;

    type EncryptResponse: Debug + DeserializeOwned + Send;

    type DecryptRequest: Debug + Serialize + Send + Sync;

    fn build_keygen_request(config: &Self::Config) -> Self::KeygenRequest;

    /// Builds a request to encrypt the sender's plaintext for the recipient.
    fn build_encrypt_request(
        config: &Self::Config,
        sender: &Party<Self>,
        recipient: &Party<Self>,
    ) -> Result<Self::EncryptRequest, AdapterError>;

    /// Builds a request to decrypt the party's ciphertext with its own key pair.
    fn build_decrypt_request(
        config: &Self::Config,
        party: &Party<Self>,
    ) -> Result<Self::DecryptRequest, AdapterError>;

    fn apply_keygen_result(party: &mut Party<Self>, key_pair: &Self::KeyPair) {
        party.set_key_pair(key_pair.clone());
    }

    fn apply_encrypt_result(party: &mut Party<Self>, response: &Self::EncryptResponse);

    fn apply_decrypt_result(party: &mut Party<Self>, response: &MessageResponse) {
        party.set_plaintext(response.message.clone());
    }
}

/// Key material or message state needed to build a request is missing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdapterError {
    #[error("party {0} has no key pair")]
    MissingKeyPair(PartyId),

    #[error("party {0} has no ciphertext")]
    MissingCiphertext(PartyId),

    #[error("party {0} has no signature")]
    MissingSignature(PartyId),
}

pub(crate) fn require_key_pair<S>(party: &Party<S>) -> Result<&S::KeyPair, AdapterError>
where
    S: SchemeAdapter,
{
    party
        .key_pair()
        .ok_or(AdapterError::MissingKeyPair(party.id()))
}

pub(crate) fn require_ciphertext<S>(party: &Party<S>) -> Result<&S::Ciphertext, AdapterError>
where
    S: SchemeAdapter,
{
    party
        .ciphertext()
        .filter(|ciphertext| !ciphertext.is_empty())
        .ok_or(AdapterError::MissingCiphertext(party.id()))
}
