// Copyright (c) 2025 - Cowboy AI, Inc.
//! Node Network Partitioning
//!
//! Rack `r` owns blocks `3r`, `3r + 1` and `3r + 2` of the node pool, one
//! per [`NodeRole`]. The map `(r, role) -> 3r + role` is injective, so no two
//! racks ever share a node subnet.

use crate::domain::address::{derive_subnet, AddressRangeError};
use crate::domain::NodeRole;
use ipnet::Ipv4Net;

const SUBNETS_PER_RACK: u64 = NodeRole::ALL.len() as u64;

/// Subnet of `role` in rack `rack_index`, with the node pool's prefix length
pub fn node_network(
    pool: Ipv4Net,
    rack_index: usize,
    role: NodeRole,
) -> Result<Ipv4Net, AddressRangeError> {
    let rack = rack_index as u64;
    let index = rack
        .checked_mul(SUBNETS_PER_RACK)
        .and_then(|i| i.checked_add(role.index() as u64))
        .ok_or(AddressRangeError::IndexOverflow { index: rack })?;
    derive_subnet(pool, index)
}

/// All three subnets of rack `rack_index`, indexed by [`NodeRole::index`]
pub fn node_networks(pool: Ipv4Net, rack_index: usize) -> Result<[Ipv4Net; 3], AddressRangeError> {
    let [gateway, tor1, tor2] = NodeRole::ALL;
    Ok([
        node_network(pool, rack_index, gateway)?,
        node_network(pool, rack_index, tor1)?,
        node_network(pool, rack_index, tor2)?,
    ])
}
