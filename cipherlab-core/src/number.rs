// SPDX-License-Identifier: MIT OR Apache-2.0

//! Arbitrary-precision integers as they travel over the wire.
//!
//! Moduli, exponents, curve coordinates and scalars easily exceed what fits into machine integers.
//! The computation service transmits them as decimal strings and we keep them that way: a
//! [`BigNumber`] is an opaque, validated decimal token and never gets parsed into a native number.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Decimal integer of arbitrary size, stored in its textual representation.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BigNumber(String);

impl BigNumber {
    /// Returns the decimal representation.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0.starts_with('-')
    }
}

fn validate(value: &str) -> Result<(), NumberError> {
    let digits = value.strip_prefix('-').unwrap_or(value);

    if digits.is_empty() {
        return Err(NumberError::Empty);
    }

    if let Some(invalid) = digits.chars().find(|c| !c.is_ascii_digit()) {
        return Err(NumberError::InvalidDigit(invalid, value.to_string()));
    }

    Ok(())
}

impl FromStr for BigNumber {
    type Err = NumberError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        validate(value)?;
        Ok(Self(value.to_string()))
    }
}

impl TryFrom<String> for BigNumber {
    type Error = NumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate(&value)?;
        Ok(Self(value))
    }
}

impl TryFrom<&str> for BigNumber {
    type Error = NumberError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<u64> for BigNumber {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<BigNumber> for String {
    fn from(value: BigNumber) -> Self {
        value.0
    }
}

impl fmt::Display for BigNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for BigNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BigNumber").field(&self.0).finish()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NumberError {
    #[error("number is empty")]
    Empty,

    #[error("invalid digit '{0}' in number {1}")]
    InvalidDigit(char, String),
}
