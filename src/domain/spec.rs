// Copyright (c) 2025 - Cowboy AI, Inc.
//! Fabric Input Specifications
//!
//! The planner consumes these two values and nothing else. They are
//! expected to be validated already (see [`crate::menu`]): every pool has
//! zero host bits and there is at least one spine.

use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// Base address pools and ASN base of the fabric
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// First rack ASN; spines and the external VM sit just below it
    pub asn_base: u32,
    /// External NAT network shared by the host, the external VM and spines
    pub external: Ipv4Net,
    /// Per-subnet prefix and start of the node address space
    pub node: Ipv4Net,
    /// First address of the spine/ToR point-to-point links
    pub spine_tor: Ipv4Addr,
    pub bastion: Ipv4Net,
    pub load_balancer: Ipv4Net,
    pub ingress: Ipv4Net,
}

/// Server population of one rack
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RackSpec {
    /// Compute servers
    pub cs: usize,
    /// Storage servers
    pub ss: usize,
}

impl RackSpec {
    pub fn new(cs: usize, ss: usize) -> Self {
        Self { cs, ss }
    }

    /// Servers in the rack, excluding the boot server
    pub fn server_count(&self) -> usize {
        self.cs + self.ss
    }
}

/// Hardware inventory of the fabric
///
/// Rack identity is the position in `racks`; reordering renumbers every
/// rack.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySpec {
    pub spine_count: usize,
    pub racks: Vec<RackSpec>,
}

impl InventorySpec {
    pub fn new(spine_count: usize, racks: Vec<RackSpec>) -> Self {
        Self { spine_count, racks }
    }

    pub fn rack_count(&self) -> usize {
        self.racks.len()
    }

    /// Servers across all racks, excluding boot servers
    pub fn server_count(&self) -> usize {
        self.racks.iter().map(RackSpec::server_count).sum()
    }
}
