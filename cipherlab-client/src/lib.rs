// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client side of the cipherlab teaching tool.
//!
//! A [`Session`] drives simulated parties through key generation, signing, encryption, decryption
//! and the exchange of ciphertexts. The [`multiplication`] and [`exponentiation`] modules show the
//! underlying arithmetic on its own. All arithmetic is performed by a remote computation service
//! which is reached through a [`Backend`]; with the `http` feature enabled, `HttpBackend` talks to
//! it over JSON and HTTP.
//!
//! ```
//! use cipherlab_client::{Backend, Session, SessionBuilder, SessionError};
//! use cipherlab_core::scheme::rsa::Rsa;
//!
//! async fn exchange<B: Backend>(backend: B) -> Result<bool, SessionError<B::Error>> {
//!     let session: Session<B, Rsa> = SessionBuilder::new().build(backend)?;
//!
//!     let alice = session.add_party("Alice").await?;
//!     let bob = session.add_party("Bob").await?;
//!
//!     session.generate_key_pair(alice).await?;
//!     session.generate_key_pair(bob).await?;
//!     session.set_target(alice, bob).await?;
//!     session.set_plaintext(alice, "HELLO").await?;
//!
//!     session.sign(alice).await?;
//!     session.encrypt(alice).await?;
//!     session.send(alice).await?;
//!     session.decrypt(bob).await?;
//!     session.verify(bob).await
//! }
//! ```
mod backend;
pub mod exponentiation;
#[cfg(feature = "http")]
mod http;
pub mod multiplication;
mod session;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use backend::Backend;
pub use exponentiation::{ExponentiationError, ExponentiationRequest, exponentiate};
#[cfg(feature = "http")]
pub use http::{DEFAULT_BASE_URL, HttpBackend, HttpBackendError, HttpConfig};
pub use multiplication::{Multiplication, MultiplicationConfig, MultiplicationError};
pub use session::{DEFAULT_PARTIES, Session, SessionBuilder, SessionError};
