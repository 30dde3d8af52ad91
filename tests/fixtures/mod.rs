// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for cim-fabric-topology
//!
//! Fixed pools and inventories shared by the integration tests. The pools
//! are disjoint for any fabric the tests build, so plans never collide.

#![allow(dead_code)]

use cim_fabric_topology::{InventorySpec, NetworkSpec, RackSpec};
use std::net::Ipv4Addr;

pub const MENU_TOML: &str = include_str!("menu.toml");
pub const MENU_JSON: &str = include_str!("menu.json");

pub const ASN_BASE: u32 = 64_600;
pub const SPINE_TOR_BASE: Ipv4Addr = Ipv4Addr::new(10, 0, 1, 0);

/// Network matching `menu.toml`
pub fn network_spec() -> NetworkSpec {
    NetworkSpec {
        asn_base: ASN_BASE,
        external: "10.0.0.0/24".parse().expect("Invalid external pool"),
        node: "10.69.0.0/26".parse().expect("Invalid node pool"),
        spine_tor: SPINE_TOR_BASE,
        bastion: "10.72.48.0/26".parse().expect("Invalid bastion pool"),
        load_balancer: "10.72.32.0/20".parse().expect("Invalid load balancer pool"),
        ingress: "10.72.48.64/26".parse().expect("Invalid ingress pool"),
    }
}

/// Inventory matching `menu.toml`
pub fn inventory_spec() -> InventorySpec {
    InventorySpec::new(
        2,
        vec![RackSpec::new(2, 1), RackSpec::new(1, 1), RackSpec::new(0, 2)],
    )
}

/// Two spines, two racks with one server of each kind
pub fn two_by_two() -> InventorySpec {
    InventorySpec::new(2, vec![RackSpec::new(1, 1); 2])
}
