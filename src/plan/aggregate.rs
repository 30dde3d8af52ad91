// Copyright (c) 2025 - Cowboy AI, Inc.
//! Plan Aggregation
//!
//! Runs the allocators in order and assembles their results:
//!
//! 1. capacity checks (optional)
//! 2. node networks and server addresses, per rack
//! 3. spine peering blocks, global
//! 4. ASNs, global
//! 5. assembly, then the collision check (optional)
//!
//! Any failure aborts the whole plan; no partial plan is returned.

use super::node_network::node_networks;
use super::server::{allocate_servers, boot_addresses, tor_node_addresses};
use super::{
    allocate_asns, allocate_peerings, AsnAssignment, PeeringTable, RackPlan, ServerPlan,
    SpinePlan, TopologyPlan, TorPlan,
};
use crate::config::PlannerConfig;
use crate::domain::address::add_offset_to_network;
use crate::domain::invariants::{validate_capacity, validate_unique_addresses};
use crate::domain::role::external;
use crate::domain::{InventorySpec, NetworkSpec, NodeRole, RackSpec};
use crate::errors::TopologyResult;
use ipnet::Ipv4Net;

/// Addresses of one rack that depend only on the node pool
struct RackAddressing {
    node_networks: [Ipv4Net; 3],
    boot_addresses: [Ipv4Net; 3],
    tor_node_addresses: [Ipv4Net; 2],
    servers: Vec<ServerPlan>,
}

fn address_rack(node_pool: Ipv4Net, index: usize, rack: &RackSpec) -> TopologyResult<RackAddressing> {
    let networks = node_networks(node_pool, index)?;
    Ok(RackAddressing {
        node_networks: networks,
        boot_addresses: boot_addresses(&networks)?,
        tor_node_addresses: tor_node_addresses(&networks)?,
        servers: allocate_servers(&networks, rack)?,
    })
}

fn rack_name(index: usize) -> String {
    format!("rack{}", index)
}

fn spine_name(index: usize) -> String {
    format!("spine{}", index + 1)
}

fn assemble_rack(
    index: usize,
    addressing: RackAddressing,
    peerings: &PeeringTable,
    asns: &AsnAssignment,
) -> RackPlan {
    let name = rack_name(index);
    let [tor1_node, tor2_node] = addressing.tor_node_addresses;
    let tor = |role: NodeRole, node_address: Ipv4Net| TorPlan {
        name: format!("{}-tor{}", name, role.tor_number().unwrap_or_default()),
        node_address,
        spine_addresses: peerings.tor_addresses(index, role),
    };

    RackPlan {
        index,
        short_name: format!("r{}", index),
        asn: asns.racks[index],
        node_networks: addressing.node_networks,
        boot_addresses: addressing.boot_addresses,
        tors: [tor(NodeRole::Tor1, tor1_node), tor(NodeRole::Tor2, tor2_node)],
        servers: addressing.servers,
        name,
    }
}

fn assemble_spine(index: usize, external_pool: Ipv4Net, peerings: &PeeringTable) -> TopologyResult<SpinePlan> {
    Ok(SpinePlan {
        index,
        name: spine_name(index),
        short_name: format!("s{}", index + 1),
        external_address: add_offset_to_network(external_pool, external::SPINE + index as u64)?,
        peer_addresses: peerings.spine_pairs(index),
    })
}

/// Plan a fabric with the default checks enabled
///
/// # Examples
///
/// ```rust
/// use cim_fabric_topology::domain::{InventorySpec, NetworkSpec, RackSpec};
/// use cim_fabric_topology::plan::plan;
/// use std::net::Ipv4Addr;
///
/// let network = NetworkSpec {
///     asn_base: 64600,
///     external: "10.0.0.0/24".parse().unwrap(),
///     node: "10.69.0.0/26".parse().unwrap(),
///     spine_tor: Ipv4Addr::new(10, 0, 1, 0),
///     bastion: "10.72.48.0/26".parse().unwrap(),
///     load_balancer: "10.72.32.0/20".parse().unwrap(),
///     ingress: "10.72.48.64/26".parse().unwrap(),
/// };
/// let inventory = InventorySpec::new(2, vec![RackSpec::new(1, 1)]);
///
/// let plan = plan(&network, &inventory).unwrap();
/// assert_eq!(plan.racks[0].tor1().node_address.to_string(), "10.69.0.65/26");
/// assert_eq!(plan.spines[1].name, "spine2");
/// ```
pub fn plan(network: &NetworkSpec, inventory: &InventorySpec) -> TopologyResult<TopologyPlan> {
    plan_with_config(network, inventory, &PlannerConfig::default())
}

/// Plan a fabric, running the checks enabled in `config`
pub fn plan_with_config(
    network: &NetworkSpec,
    inventory: &InventorySpec,
    config: &PlannerConfig,
) -> TopologyResult<TopologyPlan> {
    if config.check_capacity {
        validate_capacity(network, inventory)?;
    }

    let rack_count = inventory.rack_count();
    let addressing = inventory
        .racks
        .iter()
        .enumerate()
        .map(|(index, rack)| address_rack(network.node, index, rack))
        .collect::<TopologyResult<Vec<_>>>()?;
    let peerings = allocate_peerings(network.spine_tor, inventory.spine_count, rack_count)?;
    let asns = allocate_asns(network.asn_base, rack_count)?;

    let racks = addressing
        .into_iter()
        .enumerate()
        .map(|(index, rack)| assemble_rack(index, rack, &peerings, &asns))
        .collect();
    let spines = (0..inventory.spine_count)
        .map(|index| assemble_spine(index, network.external, &peerings))
        .collect::<TopologyResult<Vec<_>>>()?;

    let plan = TopologyPlan {
        external: network.external,
        external_host_address: add_offset_to_network(network.external, external::HOST)?,
        external_vm_address: add_offset_to_network(network.external, external::VM)?,
        asn_spine: asns.spine,
        asn_external_vm: asns.external_vm,
        racks,
        spines,
        bastion: network.bastion,
        load_balancer: network.load_balancer,
        ingress: network.ingress,
    };

    if config.check_collisions {
        validate_unique_addresses(&plan)?;
    }
    Ok(plan)
}
