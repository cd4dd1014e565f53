// SPDX-License-Identifier: MIT OR Apache-2.0

//! Elliptic-curve scheme after Menezes and Vanstone.
//!
//! Curves are given in short Weierstrass form `y² = x³ + ax + b` over a prime field. The
//! coefficients are small and travel as JSON numbers, everything else is an opaque [`BigNumber`].
use serde::{Deserialize, Serialize};

use crate::endpoint::Endpoint;
use crate::number::BigNumber;
use crate::party::Party;
use crate::scheme::{
    AdapterError, Ciphertext, SchemeAdapter, SchemeKind, require_ciphertext, require_key_pair,
};

pub const DEFAULT_MODULUS_WIDTH: u32 = 128;

pub const DEFAULT_MILLER_RABIN_ROUNDS: u32 = 100;

/// Default coefficient `a` of the generated curve.
pub const DEFAULT_COEF_A: i64 = 5;

pub const DEFAULT_NUMBER_SYSTEM_BASE: u32 = 55296;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenezesVanstoneConfig {
    pub modulus_width: u32,
    pub miller_rabin_rounds: u32,
    pub coef_a: i64,
    pub number_system_base: u32,
}

impl Default for MenezesVanstoneConfig {
    fn default() -> Self {
        Self {
            modulus_width: DEFAULT_MODULUS_WIDTH,
            miller_rabin_rounds: DEFAULT_MILLER_RABIN_ROUNDS,
            coef_a: DEFAULT_COEF_A,
            number_system_base: DEFAULT_NUMBER_SYSTEM_BASE,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Curve {
    pub a: i64,
    pub b: i64,
    pub prime: BigNumber,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: BigNumber,
    pub y: BigNumber,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MvPublicKey {
    pub curve: Curve,
    pub generator: Point,
    /// Public point, the generator multiplied with the private scalar.
    pub y: Point,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MvPrivateKey {
    pub curve: Curve,
    pub x: BigNumber,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MvKeyPair {
    pub public_key: MvPublicKey,
    pub private_key: MvPrivateKey,
}

/// Encrypted message together with the curve points produced for each block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MvCiphertext {
    pub encrypted_message: String,
    pub points: Vec<Point>,
}

impl Ciphertext for MvCiphertext {
    fn empty() -> Self {
        Self {
            encrypted_message: String::new(),
            points: Vec::new(),
        }
    }

    fn is_empty(&self) -> bool {
        self.encrypted_message.is_empty() && self.points.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MvKeygenRequest {
    pub modulus_width: u32,
    pub miller_rabin_rounds: u32,
    pub coef_a: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MvEncryptRequest {
    pub public_key: MvPublicKey,
    pub message: String,
    pub radix: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MvDecryptRequest {
    pub private_key: MvPrivateKey,
    pub cipher_text: MvCiphertext,
    pub radix: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MenezesVanstone;

impl SchemeAdapter for MenezesVanstone {
    const KIND: SchemeKind = SchemeKind::MenezesVanstone;

    const KEYGEN_ENDPOINT: Endpoint = Endpoint::MvCreateKeyPair;

    const ENCRYPT_ENDPOINT: Endpoint = Endpoint::MvEncrypt;

    const DECRYPT_ENDPOINT: Endpoint = Endpoint::MvDecrypt;

    type Config = MenezesVanstoneConfig;

    type KeyPair = MvKeyPair;

    type Ciphertext = MvCiphertext;

    type KeygenRequest = MvKeygenRequest;

    type EncryptRequest = MvEncryptRequest;

    type EncryptResponse = MvCiphertext;

    type DecryptRequest = MvDecryptRequest;

    fn build_keygen_request(config: &MenezesVanstoneConfig) -> MvKeygenRequest {
        MvKeygenRequest {
            modulus_width: config.modulus_width,
            miller_rabin_rounds: config.miller_rabin_rounds,
            coef_a: config.coef_a,
        }
    }

    fn build_encrypt_request(
        config: &MenezesVanstoneConfig,
        sender: &Party<Self>,
        recipient: &Party<Self>,
    ) -> Result<MvEncryptRequest, AdapterError> {
        Ok(MvEncryptRequest {
            public_key: require_key_pair(recipient)?.public_key.clone(),
            message: sender.plaintext().to_string(),
            radix: config.number_system_base,
        })
    }

    fn build_decrypt_request(
        config: &MenezesVanstoneConfig,
        party: &Party<Self>,
    ) -> Result<MvDecryptRequest, AdapterError> {
        Ok(MvDecryptRequest {
            private_key: require_key_pair(party)?.private_key.clone(),
            cipher_text: require_ciphertext(party)?.clone(),
            radix: config.number_system_base,
        })
    }

    fn apply_encrypt_result(party: &mut Party<Self>, response: &MvCiphertext) {
        party.set_ciphertext(Some(response.clone()));
    }
}
