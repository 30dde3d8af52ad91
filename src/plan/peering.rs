// Copyright (c) 2025 - Cowboy AI, Inc.
//! Spine-to-Rack Peering Allocation
//!
//! Every `(spine, rack)` pair owns four consecutive addresses starting at
//!
//! ```text
//! B = (spine * rack_count + rack) * TORS_PER_RACK * ADDRESSES_PER_LINK
//! ```
//!
//! above the spine-tor base: `B..B+1` is the `/31` toward ToR1 and
//! `B+2..B+3` the `/31` toward ToR2. The spine takes the even address of
//! each link and the ToR the odd one. `B` is a bijection from pairs onto
//! multiples of 4 below `spine_count * rack_count * 4`, so links never
//! overlap.

use super::PeerPair;
use crate::domain::address::{add_offset_to_ip, AddressRangeError};
use crate::domain::{NodeRole, ADDRESSES_PER_LINK, LINK_PREFIX_LENGTH, TORS_PER_RACK};
use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// Addresses consumed by one `(spine, rack)` pair
pub const ADDRESSES_PER_PAIR: u64 = TORS_PER_RACK * ADDRESSES_PER_LINK;

/// The two links between one spine and one rack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeeringBlock {
    pub spine_tor1: Ipv4Net,
    pub tor1: Ipv4Net,
    pub spine_tor2: Ipv4Net,
    pub tor2: Ipv4Net,
}

impl PeeringBlock {
    /// ToR side of the link for an uplink role
    pub fn tor_address(&self, role: NodeRole) -> Option<Ipv4Net> {
        match role {
            NodeRole::Gateway => None,
            NodeRole::Tor1 => Some(self.tor1),
            NodeRole::Tor2 => Some(self.tor2),
        }
    }

    pub fn spine_pair(&self) -> PeerPair {
        PeerPair {
            tor1: self.spine_tor1,
            tor2: self.spine_tor2,
        }
    }
}

/// Offset of the `(spine, rack)` block above the spine-tor base
pub fn peering_offset(
    spine_index: usize,
    rack_index: usize,
    rack_count: usize,
) -> Result<u64, AddressRangeError> {
    let pair = (spine_index as u64)
        .checked_mul(rack_count as u64)
        .and_then(|p| p.checked_add(rack_index as u64))
        .ok_or(AddressRangeError::IndexOverflow {
            index: spine_index as u64,
        })?;
    pair.checked_mul(ADDRESSES_PER_PAIR)
        .ok_or(AddressRangeError::IndexOverflow { index: pair })
}

pub fn peering_block(
    base: Ipv4Addr,
    spine_index: usize,
    rack_index: usize,
    rack_count: usize,
) -> Result<PeeringBlock, AddressRangeError> {
    let offset = peering_offset(spine_index, rack_index, rack_count)?;
    let link = |n: u64| add_offset_to_ip(base, offset + n, LINK_PREFIX_LENGTH);
    Ok(PeeringBlock {
        spine_tor1: link(0)?,
        tor1: link(1)?,
        spine_tor2: link(2)?,
        tor2: link(3)?,
    })
}

/// Peering blocks of the whole fabric, spine-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeeringTable {
    rack_count: usize,
    blocks: Vec<PeeringBlock>,
}

impl PeeringTable {
    pub fn get(&self, spine_index: usize, rack_index: usize) -> Option<&PeeringBlock> {
        if rack_index >= self.rack_count {
            return None;
        }
        self.blocks.get(spine_index * self.rack_count + rack_index)
    }

    pub fn spine_count(&self) -> usize {
        self.blocks.len().checked_div(self.rack_count).unwrap_or(0)
    }

    pub fn rack_count(&self) -> usize {
        self.rack_count
    }

    /// ToR-side addresses of rack `rack_index` toward every spine
    pub fn tor_addresses(&self, rack_index: usize, role: NodeRole) -> Vec<Ipv4Net> {
        (0..self.spine_count())
            .filter_map(|spine| self.get(spine, rack_index))
            .filter_map(|block| block.tor_address(role))
            .collect()
    }

    /// Spine-side pairs of spine `spine_index`, one per rack
    pub fn spine_pairs(&self, spine_index: usize) -> Vec<PeerPair> {
        (0..self.rack_count)
            .filter_map(|rack| self.get(spine_index, rack))
            .map(PeeringBlock::spine_pair)
            .collect()
    }
}

/// Compute every `(spine, rack)` block
pub fn allocate_peerings(
    base: Ipv4Addr,
    spine_count: usize,
    rack_count: usize,
) -> Result<PeeringTable, AddressRangeError> {
    let mut blocks = Vec::with_capacity(spine_count.saturating_mul(rack_count));
    for spine in 0..spine_count {
        for rack in 0..rack_count {
            blocks.push(peering_block(base, spine, rack, rack_count)?);
        }
    }
    Ok(PeeringTable { rack_count, blocks })
}
