// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt;

/// Endpoints offered by the computation service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Health,
    RsaCreateKeyPair,
    RsaEncrypt,
    RsaDecrypt,
    RsaSign,
    RsaVerify,
    RsaMultiplication,
    MvCreateKeyPair,
    MvEncrypt,
    MvDecrypt,
    /// Modular exponentiation, either square-and-multiply or naive repeated multiplication.
    Exponentiation { fast: bool },
}

impl Endpoint {
    /// Path relative to the base URL of the service, including the query if there is one.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Health => "/health",
            Endpoint::RsaCreateKeyPair => "/rsa/createKeyPair",
            Endpoint::RsaEncrypt => "/rsa/encrypt",
            Endpoint::RsaDecrypt => "/rsa/decrypt",
            Endpoint::RsaSign => "/rsa/sign",
            Endpoint::RsaVerify => "/rsa/verify",
            Endpoint::RsaMultiplication => "/rsa/multiplication",
            Endpoint::MvCreateKeyPair => "/menezesVanstone/createKeyPair",
            Endpoint::MvEncrypt => "/menezesVanstone/encrypt",
            Endpoint::MvDecrypt => "/menezesVanstone/decrypt",
            Endpoint::Exponentiation { fast: true } => "/math/exponentiation?use_fast=true",
            Endpoint::Exponentiation { fast: false } => "/math/exponentiation?use_fast=false",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
