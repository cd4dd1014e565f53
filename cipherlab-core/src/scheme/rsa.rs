// SPDX-License-Identifier: MIT OR Apache-2.0

//! Modular-exponentiation scheme (RSA).
use serde::{Deserialize, Serialize};

use crate::endpoint::Endpoint;
use crate::number::BigNumber;
use crate::party::Party;
use crate::scheme::{
    AdapterError, Ciphertext, MessageResponse, SchemeAdapter, SchemeKind, require_ciphertext,
    require_key_pair,
};

/// Default bit width of the modulus.
pub const DEFAULT_MODULUS_WIDTH: u32 = 4096;

/// Default number of Miller-Rabin iterations during prime generation.
pub const DEFAULT_MILLER_RABIN_ROUNDS: u32 = 100;

pub const DEFAULT_RANDOM_SEED: u32 = 13;

/// Default radix used to encode text into numeric blocks.
pub const DEFAULT_NUMBER_SYSTEM_BASE: u32 = 55296;

/// Configuration for RSA key generation and text encoding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsaConfig {
    pub modulus_width: u32,
    pub miller_rabin_rounds: u32,
    pub random_seed: u32,
    pub number_system_base: u32,
}

impl Default for RsaConfig {
    fn default() -> Self {
        Self {
            modulus_width: DEFAULT_MODULUS_WIDTH,
            miller_rabin_rounds: DEFAULT_MILLER_RABIN_ROUNDS,
            random_seed: DEFAULT_RANDOM_SEED,
            number_system_base: DEFAULT_NUMBER_SYSTEM_BASE,
        }
    }
}

/// Modulus with public and private exponent, plus the block sizes used for encoding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaKeyPair {
    pub modulus: BigNumber,
    pub e: BigNumber,
    pub d: BigNumber,
    pub block_size_pub: BigNumber,
    pub block_size_priv: BigNumber,
}

/// Text of numeric blocks as produced by the service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RsaCiphertext(String);

impl RsaCiphertext {
    pub fn new(blocks: impl Into<String>) -> Self {
        Self(blocks.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Ciphertext for RsaCiphertext {
    fn empty() -> Self {
        Self(String::new())
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaKeygenRequest {
    pub modulus_width: u32,
    pub miller_rabin_rounds: u32,
    pub random_seed: u32,
    pub number_system_base: u32,
}

/// Request shape shared by the encrypt and decrypt endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaMessageRequest {
    pub message: String,
    pub key_pair: RsaKeyPair,
    pub number_system_base: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaSignRequest {
    pub plaintext: String,
    pub key_pair: RsaKeyPair,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaVerifyRequest {
    pub plaintext: String,
    pub signature: String,
    pub key_pair: RsaKeyPair,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiplicationRequest {
    pub factor_one: String,
    pub factor_two: String,
    pub key_pair: RsaKeyPair,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiplicationResponse {
    pub encrypted_factor_one: String,
    pub encrypted_factor_two: String,
    pub encrypted_result: String,
    pub decrypted_result: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rsa;

impl SchemeAdapter for Rsa {
    const KIND: SchemeKind = SchemeKind::Rsa;

    const KEYGEN_ENDPOINT: Endpoint = Endpoint::RsaCreateKeyPair;

    const ENCRYPT_ENDPOINT: Endpoint = Endpoint::RsaEncrypt;

    const DECRYPT_ENDPOINT: Endpoint = Endpoint::RsaDecrypt;

    type Config = RsaConfig;

    type KeyPair = RsaKeyPair;

    type Ciphertext = RsaCiphertext;

    type KeygenRequest = RsaKeygenRequest;

    type EncryptRequest = RsaMessageRequest;

    type EncryptResponse = MessageResponse;

    type DecryptRequest = RsaMessageRequest;

    fn build_keygen_request(config: &RsaConfig) -> RsaKeygenRequest {
        RsaKeygenRequest {
            modulus_width: config.modulus_width,
            miller_rabin_rounds: config.miller_rabin_rounds,
            random_seed: config.random_seed,
            number_system_base: config.number_system_base,
        }
    }

    fn build_encrypt_request(
        config: &RsaConfig,
        sender: &Party<Self>,
        recipient: &Party<Self>,
    ) -> Result<RsaMessageRequest, AdapterError> {
        Ok(RsaMessageRequest {
            message: sender.plaintext().to_string(),
            key_pair: require_key_pair(recipient)?.clone(),
            number_system_base: config.number_system_base,
        })
    }

    fn build_decrypt_request(
        config: &RsaConfig,
        party: &Party<Self>,
    ) -> Result<RsaMessageRequest, AdapterError> {
        Ok(RsaMessageRequest {
            message: require_ciphertext(party)?.as_str().to_string(),
            key_pair: require_key_pair(party)?.clone(),
            number_system_base: config.number_system_base,
        })
    }

    fn apply_encrypt_result(party: &mut Party<Self>, response: &MessageResponse) {
        party.set_ciphertext(Some(RsaCiphertext::new(response.message.clone())));
    }
}

impl Rsa {
    /// Builds a request to sign the party's plaintext with its own key pair.
    pub fn build_sign_request(party: &Party<Self>) -> Result<RsaSignRequest, AdapterError> {
        Ok(RsaSignRequest {
            plaintext: party.plaintext().to_string(),
            key_pair: require_key_pair(party)?.clone(),
        })
    }

    /// Stores the signature on the party, so it travels along with the next ciphertext sent.
    pub fn apply_sign_result(party: &mut Party<Self>, response: &MessageResponse) {
        party.set_signature(Some(response.message.clone()));
    }

    /// Builds a request to check the party's plaintext against the signature it received from
    /// `signer`.
    pub fn build_verify_request(
        party: &Party<Self>,
        signer: &Party<Self>,
    ) -> Result<RsaVerifyRequest, AdapterError> {
        let signature = party
            .signature()
            .ok_or(AdapterError::MissingSignature(party.id()))?;

        Ok(RsaVerifyRequest {
            plaintext: party.plaintext().to_string(),
            signature: signature.to_string(),
            key_pair: require_key_pair(signer)?.clone(),
        })
    }
}
