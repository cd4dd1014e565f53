// SPDX-License-Identifier: MIT OR Apache-2.0

use std::error::Error;
use std::future::Future;

use cipherlab_core::Endpoint;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Transport towards the remote computation service.
///
/// Implementations only move JSON bodies back and forth, all knowledge about request and response
/// shapes lives in the scheme adapters. Neither cancellation nor timeouts are expected: a request
/// either resolves or it doesn't.
pub trait Backend: Send + Sync + 'static {
    type Error: Error + Send + Sync + 'static;

    /// Resolves with `Ok` if the service is reachable.
    fn health(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    fn post<Req, Res>(
        &self,
        endpoint: Endpoint,
        body: &Req,
    ) -> impl Future<Output = Result<Res, Self::Error>> + Send
    where
        Req: Serialize + Sync,
        Res: DeserializeOwned + Send;
}
