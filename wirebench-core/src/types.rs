// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Newtype wrappers for validated inputs.
//!
//! Following the "Newtype" pattern in Rust to ensure valid state by construction.
//! All types validate their invariants at creation time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HardValidationError;

/// Size of one filler kilobyte in bytes.
pub const KB: usize = 1024;

/// Total number of requests in a batch. Must be > 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct RequestCount(usize);

impl RequestCount {
    /// Create a new RequestCount with validation.
    pub fn new(n: i64) -> Result<Self, HardValidationError> {
        positive("n", n).map(Self)
    }

    /// Get the inner count.
    pub fn value(&self) -> usize {
        self.0
    }
}

impl fmt::Display for RequestCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for RequestCount {
    type Error = HardValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RequestCount> for i64 {
    fn from(count: RequestCount) -> Self {
        count.0 as i64
    }
}

/// Number of concurrent workers. Must be > 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Concurrency(usize);

impl Concurrency {
    /// Create a new Concurrency with validation.
    pub fn new(c: i64) -> Result<Self, HardValidationError> {
        positive("c", c).map(Self)
    }

    /// Get the inner worker count.
    pub fn value(&self) -> usize {
        self.0
    }
}

impl fmt::Display for Concurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Concurrency {
    type Error = HardValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Concurrency> for i64 {
    fn from(c: Concurrency) -> Self {
        c.0 as i64
    }
}

/// Filler payload size in kilobytes. Must be >= 0 and fit a protobuf int32.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct PayloadKb(i32);

impl PayloadKb {
    /// Create a new PayloadKb with validation.
    pub fn new(kb: i64) -> Result<Self, HardValidationError> {
        non_negative_i32("payload_kb", kb).map(Self)
    }

    /// Get the size in kilobytes.
    pub fn value(&self) -> i32 {
        self.0
    }

    /// Get the size in bytes, or `None` if it does not fit in memory on
    /// this platform.
    pub fn bytes(&self) -> Option<usize> {
        usize::try_from(self.0).ok()?.checked_mul(KB)
    }
}

impl fmt::Display for PayloadKb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for PayloadKb {
    type Error = HardValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PayloadKb> for i64 {
    fn from(kb: PayloadKb) -> Self {
        kb.0 as i64
    }
}

/// Page size for list calls. Must be >= 0; 0 means "no limit".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct ListLimit(i32);

impl ListLimit {
    /// Create a new ListLimit with validation.
    pub fn new(limit: i64) -> Result<Self, HardValidationError> {
        non_negative_i32("limit", limit).map(Self)
    }

    /// Get the inner limit.
    pub fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for ListLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for ListLimit {
    type Error = HardValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ListLimit> for i64 {
    fn from(limit: ListLimit) -> Self {
        limit.0 as i64
    }
}

/// Transport used to reach the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Mode {
    /// JSON over HTTP/1.1
    Rest,
    /// Protobuf over gRPC
    Grpc,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Rest => "rest",
            Mode::Grpc => "grpc",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = HardValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rest" => Ok(Mode::Rest),
            "grpc" => Ok(Mode::Grpc),
            _ => Err(HardValidationError::UnknownMode {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Mode {
    type Error = HardValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Mode> for String {
    fn from(mode: Mode) -> Self {
        mode.as_str().to_string()
    }
}

fn positive(field: &'static str, value: i64) -> Result<usize, HardValidationError> {
    if value <= 0 {
        return Err(HardValidationError::InvalidFieldValue {
            field,
            value: value.to_string(),
            reason: "must be > 0".to_string(),
        });
    }
    usize::try_from(value).map_err(|_| HardValidationError::InvalidFieldValue {
        field,
        value: value.to_string(),
        reason: "too large for this platform".to_string(),
    })
}

fn non_negative_i32(field: &'static str, value: i64) -> Result<i32, HardValidationError> {
    if value < 0 {
        return Err(HardValidationError::InvalidFieldValue {
            field,
            value: value.to_string(),
            reason: "must be >= 0".to_string(),
        });
    }
    i32::try_from(value).map_err(|_| HardValidationError::InvalidFieldValue {
        field,
        value: value.to_string(),
        reason: format!("must not exceed {}", i32::MAX),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_count() {
        assert_eq!(RequestCount::new(20000).unwrap().value(), 20000);
        assert!(RequestCount::new(0).is_err());
        assert!(RequestCount::new(-5).is_err());
    }

    #[test]
    fn test_concurrency() {
        assert_eq!(Concurrency::new(1).unwrap().value(), 1);
        assert!(Concurrency::new(0).is_err());
    }

    #[test]
    fn test_payload_kb() {
        let kb = PayloadKb::new(32).unwrap();
        assert_eq!(kb.value(), 32);
        assert_eq!(kb.bytes(), Some(32 * 1024));
        assert_eq!(PayloadKb::new(0).unwrap().bytes(), Some(0));
        assert!(PayloadKb::new(0).is_ok());
        assert!(PayloadKb::new(-1).is_err());
        assert!(PayloadKb::new(i64::from(i32::MAX) + 1).is_err());
    }

    #[test]
    fn test_list_limit() {
        assert_eq!(ListLimit::new(0).unwrap().value(), 0);
        assert_eq!(ListLimit::new(100).unwrap().value(), 100);
        assert!(ListLimit::new(-1).is_err());
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("rest".parse::<Mode>().unwrap(), Mode::Rest);
        assert_eq!("GRPC".parse::<Mode>().unwrap(), Mode::Grpc);
        assert!(matches!(
            "soap".parse::<Mode>(),
            Err(HardValidationError::UnknownMode { .. })
        ));
    }
}
