// SPDX-License-Identifier: MIT OR Apache-2.0

//! Demonstration of the multiplicative homomorphism of RSA.
//!
//! Two factors get encrypted, the ciphertexts multiplied and the product decrypted again, all on
//! the computation service. The result equals the product of the plain factors modulo `n`.
use cipherlab_core::Endpoint;
use cipherlab_core::scheme::rsa::{
    DEFAULT_MILLER_RABIN_ROUNDS, DEFAULT_NUMBER_SYSTEM_BASE, MultiplicationRequest,
    MultiplicationResponse, RsaKeyPair, RsaKeygenRequest,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::backend::Backend;

pub const DEFAULT_MODULUS_WIDTH: u32 = 2048;

pub const DEFAULT_RANDOM_SEED: u32 = 34;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiplicationConfig {
    pub modulus_width: u32,
    pub miller_rabin_rounds: u32,
    pub random_seed: u32,
}

impl Default for MultiplicationConfig {
    fn default() -> Self {
        Self {
            modulus_width: DEFAULT_MODULUS_WIDTH,
            miller_rabin_rounds: DEFAULT_MILLER_RABIN_ROUNDS,
            random_seed: DEFAULT_RANDOM_SEED,
        }
    }
}

pub struct Multiplication<B>
where
    B: Backend,
{
    backend: B,
    config: MultiplicationConfig,
    key_pair: Option<RsaKeyPair>,
    result: Option<MultiplicationResponse>,
}

impl<B> Multiplication<B>
where
    B: Backend,
{
    pub fn new(backend: B, config: MultiplicationConfig) -> Self {
        Self {
            backend,
            config,
            key_pair: None,
            result: None,
        }
    }

    pub fn config(&self) -> &MultiplicationConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: MultiplicationConfig) {
        self.config = config;
    }

    pub fn key_pair(&self) -> Option<&RsaKeyPair> {
        self.key_pair.as_ref()
    }

    /// Last result, if any.
    pub fn result(&self) -> Option<&MultiplicationResponse> {
        self.result.as_ref()
    }

    pub async fn generate_key_pair(&mut self) -> Result<&RsaKeyPair, MultiplicationError<B::Error>> {
        let request = RsaKeygenRequest {
            modulus_width: self.config.modulus_width,
            miller_rabin_rounds: self.config.miller_rabin_rounds,
            random_seed: self.config.random_seed,
            // Block size is irrelevant here, the factors are numbers already.
            number_system_base: DEFAULT_NUMBER_SYSTEM_BASE,
        };

        let key_pair: RsaKeyPair = self
            .backend
            .post(Endpoint::RsaCreateKeyPair, &request)
            .await
            .map_err(MultiplicationError::Backend)?;
        debug!(modulus_width = self.config.modulus_width, "generated key pair");

        Ok(self.key_pair.insert(key_pair))
    }

    pub fn clear_key_pair(&mut self) {
        self.key_pair = None;
    }

    pub fn clear_response(&mut self) {
        self.result = None;
    }

    /// Multiplies both factors under encryption.
    pub async fn calculate(
        &mut self,
        factor_one: &str,
        factor_two: &str,
    ) -> Result<&MultiplicationResponse, MultiplicationError<B::Error>> {
        let key_pair = self
            .key_pair
            .clone()
            .ok_or(MultiplicationError::MissingKeyPair)?;

        let request = MultiplicationRequest {
            factor_one: factor_one.to_string(),
            factor_two: factor_two.to_string(),
            key_pair,
        };

        let response: MultiplicationResponse = self
            .backend
            .post(Endpoint::RsaMultiplication, &request)
            .await
            .map_err(MultiplicationError::Backend)?;

        Ok(self.result.insert(response))
    }
}

#[derive(Debug, Error)]
pub enum MultiplicationError<E> {
    #[error("no key pair generated yet")]
    MissingKeyPair,

    #[error("computation service failed: {0}")]
    Backend(E),
}
