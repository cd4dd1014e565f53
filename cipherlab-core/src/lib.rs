// SPDX-License-Identifier: MIT OR Apache-2.0

//! `cipherlab-core` holds the exchange state machine of the cipherlab teaching tool.
//!
//! A session consists of simulated parties ("Alice", "Bob", ...) which each hold a key pair, a
//! plaintext and a ciphertext. Parties point at each other through directed "sending to" and
//! "received from" relations which are kept in the [`Registry`]. Whether an action like encrypt,
//! decrypt or send is currently legal for a party is decided by the pure predicates in [`gate`].
//!
//! No cryptographic arithmetic happens in this crate. Key generation, encryption and decryption
//! are performed by a remote computation service; the [`SchemeAdapter`] implementations for
//! [`Rsa`] and [`MenezesVanstone`] only translate between party state and the JSON request and
//! response shapes of that service.
//!
//! The registry is deliberately permissive: operations whose preconditions are not met are no-ops.
//! Callers are expected to consult the gate first.
pub mod endpoint;
pub mod gate;
pub mod number;
pub mod party;
pub mod registry;
pub mod scheme;

pub use endpoint::Endpoint;
pub use gate::{Action, can_decrypt, can_encrypt, can_send, can_sign, can_verify, permits};
pub use number::{BigNumber, NumberError};
pub use party::{Party, PartyId};
pub use registry::{Registry, RegistryError};
pub use scheme::{
    AdapterError, Ciphertext, MenezesVanstone, MessageResponse, Rsa, SchemeAdapter, SchemeKind,
};
