// SPDX-License-Identifier: MIT OR Apache-2.0

//! Modular exponentiation `base ^ exponent mod modulus` computed by the service.
//!
//! The service offers a fast square-and-multiply variant and a slow one multiplying repeatedly,
//! which lets both be compared on the same operands.
use cipherlab_core::scheme::MessageResponse;
use cipherlab_core::{BigNumber, Endpoint, NumberError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::backend::Backend;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExponentiationRequest {
    pub base: BigNumber,
    pub exponent: BigNumber,
    pub modulus: BigNumber,
}

pub async fn exponentiate<B>(
    backend: &B,
    request: &ExponentiationRequest,
    fast: bool,
) -> Result<BigNumber, ExponentiationError<B::Error>>
where
    B: Backend,
{
    let response: MessageResponse = backend
        .post(Endpoint::Exponentiation { fast }, request)
        .await
        .map_err(ExponentiationError::Backend)?;
    debug!(fast, "computed exponentiation");

    response
        .message
        .parse()
        .map_err(ExponentiationError::InvalidResult)
}

#[derive(Debug, Error)]
pub enum ExponentiationError<E> {
    #[error("computation service failed: {0}")]
    Backend(E),

    #[error("service returned an invalid number: {0}")]
    InvalidResult(NumberError),
}
