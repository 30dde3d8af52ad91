// Copyright (c) 2025 - Cowboy AI, Inc.
//! Boot and Server Address Allocation
//!
//! A node's three addresses share one [`HostOffset`] across the rack's
//! three subnets. Gateway addresses are `/32`; addresses on the ToR
//! segments carry the segment's prefix length.

use super::ServerPlan;
use crate::domain::address::{add_offset_to_ip, AddressRangeError};
use crate::domain::{HostOffset, NodeKind, NodeRole, RackSpec, HOST_PREFIX_LENGTH};
use ipnet::Ipv4Net;

/// Address of the host at `offset` in the `role` subnet
pub fn host_address(
    networks: &[Ipv4Net; 3],
    role: NodeRole,
    offset: HostOffset,
) -> Result<Ipv4Net, AddressRangeError> {
    let network = networks[role.index()];
    let prefix_length = if role.is_segment() {
        network.prefix_len()
    } else {
        HOST_PREFIX_LENGTH
    };
    add_offset_to_ip(network.network(), offset.value(), prefix_length)
}

fn node_addresses(
    networks: &[Ipv4Net; 3],
    offset: HostOffset,
) -> Result<[Ipv4Net; 3], AddressRangeError> {
    let [gateway, tor1, tor2] = NodeRole::ALL;
    Ok([
        host_address(networks, gateway, offset)?,
        host_address(networks, tor1, offset)?,
        host_address(networks, tor2, offset)?,
    ])
}

pub fn boot_addresses(networks: &[Ipv4Net; 3]) -> Result<[Ipv4Net; 3], AddressRangeError> {
    node_addresses(networks, HostOffset::BOOT)
}

/// Each ToR's own address on its segment, ToR1 then ToR2
pub fn tor_node_addresses(networks: &[Ipv4Net; 3]) -> Result<[Ipv4Net; 2], AddressRangeError> {
    let [tor1, tor2] = NodeRole::TORS;
    Ok([
        host_address(networks, tor1, HostOffset::TOR)?,
        host_address(networks, tor2, HostOffset::TOR)?,
    ])
}

/// Allocate CS servers then SS servers at consecutive offsets from 4
pub fn allocate_servers(
    networks: &[Ipv4Net; 3],
    rack: &RackSpec,
) -> Result<Vec<ServerPlan>, AddressRangeError> {
    let kinds = std::iter::repeat(NodeKind::Cs)
        .take(rack.cs)
        .enumerate()
        .chain(std::iter::repeat(NodeKind::Ss).take(rack.ss).enumerate());

    kinds
        .enumerate()
        .map(|(position, (ordinal, kind))| -> Result<ServerPlan, AddressRangeError> {
            let role_offset = HostOffset::server(position);
            Ok(ServerPlan {
                name: format!("{}{}", kind, ordinal + 1),
                kind,
                role_offset,
                addresses: node_addresses(networks, role_offset)?,
            })
        })
        .collect()
}
