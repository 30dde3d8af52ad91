// Copyright (c) 2025 - Cowboy AI, Inc.
//! Autonomous System Number Value Object

use serde::{Deserialize, Serialize};
use std::fmt;

/// BGP Autonomous System Number
///
/// Four-byte ASNs are accepted; 0 is reserved and never produced by the
/// planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Asn(u32);

impl Asn {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// Whether the ASN falls in a private-use range (RFC 6996)
    pub fn is_private(&self) -> bool {
        matches!(self.0, 64_512..=65_534 | 4_200_000_000..=4_294_967_294)
    }
}

impl fmt::Display for Asn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Asn> for u32 {
    fn from(asn: Asn) -> Self {
        asn.0
    }
}
