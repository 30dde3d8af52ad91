// Copyright (c) 2025 - Cowboy AI, Inc.
//! Fabric Node Roles and the Host Offset Table
//!
//! Every node in a rack has three interfaces: a loopback-style gateway
//! address and one uplink on each ToR's shared segment. Each interface lives
//! in its own per-rack subnet, and within those subnets the low offsets are
//! claimed by fixed topology roles:
//!
//! | offset | owner                      |
//! |--------|----------------------------|
//! | 0      | network address            |
//! | 1      | ToR switch on the segment  |
//! | 2      | reserved                   |
//! | 3      | boot server                |
//! | 4..    | CS servers, then SS servers |

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of ToR switches in every rack
pub const TORS_PER_RACK: u64 = 2;

/// Addresses consumed by one point-to-point link
pub const ADDRESSES_PER_LINK: u64 = 2;

/// Prefix length of a spine/ToR point-to-point link
pub const LINK_PREFIX_LENGTH: u8 = 31;

/// Prefix length of a loopback-style host address
pub const HOST_PREFIX_LENGTH: u8 = 32;

/// The three per-rack node subnets, one per interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum NodeRole {
    /// Loopback-style node address, never used as a broadcast segment
    Gateway = 0,
    /// Shared segment toward ToR1
    Tor1 = 1,
    /// Shared segment toward ToR2
    Tor2 = 2,
}

impl NodeRole {
    /// All roles in subnet order
    pub const ALL: [NodeRole; 3] = [NodeRole::Gateway, NodeRole::Tor1, NodeRole::Tor2];

    /// Roles backed by a ToR switch, in ToR order
    pub const TORS: [NodeRole; 2] = [NodeRole::Tor1, NodeRole::Tor2];

    /// Position of this role's subnet within a rack
    pub fn index(self) -> usize {
        self as usize
    }

    /// ToR number (1 or 2) for the uplink roles
    pub fn tor_number(self) -> Option<u8> {
        match self {
            Self::Gateway => None,
            Self::Tor1 => Some(1),
            Self::Tor2 => Some(2),
        }
    }

    /// Whether the subnet is a shared broadcast segment
    pub fn is_segment(self) -> bool {
        self != Self::Gateway
    }

    /// Interface label used in generated names
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gateway => "node0",
            Self::Tor1 => "node1",
            Self::Tor2 => "node2",
        }
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kinds of servers placed in a rack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Boot server, one per rack
    Boot,
    /// Compute server
    Cs,
    /// Storage server
    Ss,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boot => "boot",
            Self::Cs => "cs",
            Self::Ss => "ss",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Offset of a host within a per-rack node subnet
///
/// Only the fixed role constants and [`HostOffset::server`] construct values,
/// so no server can land on the reserved offsets 0-3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostOffset(u64);

impl HostOffset {
    /// ToR switch address on its segment
    pub const TOR: HostOffset = HostOffset(1);

    // Offset 2 is reserved and never assigned.

    /// Boot server
    pub const BOOT: HostOffset = HostOffset(3);

    /// First server offset
    pub const FIRST_SERVER: HostOffset = HostOffset(4);

    /// Offset of the `position`-th server of a rack
    ///
    /// Positions count CS servers first, then SS servers.
    pub fn server(position: usize) -> Self {
        Self(Self::FIRST_SERVER.0 + position as u64)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for HostOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Offsets within the external pool
pub mod external {
    /// Host side of the external NAT network
    pub const HOST: u64 = 1;

    /// External-access VM
    pub const VM: u64 = 2;

    /// First spine; spine `i` uses `SPINE + i`
    pub const SPINE: u64 = 3;
}
