// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Topology Plans
//!
//! Random inventories are planned against fixed, disjoint pools and the
//! resulting plans are checked for the addressing guarantees renderers rely
//! on: no shared addresses, reproducible output, contiguous server offsets,
//! one `/31` pair per spine and rack, and disjoint ASNs.

use cim_fabric_topology::domain::{Asn, NodeKind, NodeRole};
use cim_fabric_topology::plan::{peering_offset, plan, TopologyPlan};
use cim_fabric_topology::{InventorySpec, NetworkSpec, RackSpec};
use ipnet::Ipv4Net;
use proptest::prelude::*;
use std::collections::HashSet;
use std::net::Ipv4Addr;

use crate::fixtures;

// ============================================================================
// Strategies
// ============================================================================

fn rack_spec() -> impl Strategy<Value = RackSpec> {
    (0usize..6, 0usize..6).prop_map(|(cs, ss)| RackSpec::new(cs, ss))
}

fn inventory() -> impl Strategy<Value = InventorySpec> {
    (1usize..5, prop::collection::vec(rack_spec(), 0..10))
        .prop_map(|(spines, racks)| InventorySpec::new(spines, racks))
}

/// Node pools from /24 to /26; 10 racks of /24s end at 10.69.30.0
fn network() -> impl Strategy<Value = NetworkSpec> {
    (3u32..4_000_000_000, 24u8..=26).prop_map(|(asn_base, node_prefix)| NetworkSpec {
        asn_base,
        node: Ipv4Net::new(Ipv4Addr::new(10, 69, 0, 0), node_prefix).unwrap(),
        ..fixtures::network_spec()
    })
}

/// Every host address of a plan, one entry per owner
fn all_host_addresses(plan: &TopologyPlan) -> Vec<Ipv4Addr> {
    let mut addresses = vec![plan.external_host_address.addr(), plan.external_vm_address.addr()];
    for spine in &plan.spines {
        addresses.push(spine.external_address.addr());
        for pair in &spine.peer_addresses {
            addresses.push(pair.tor1.addr());
            addresses.push(pair.tor2.addr());
        }
    }
    for rack in &plan.racks {
        addresses.extend(rack.boot_addresses.iter().map(Ipv4Net::addr));
        for tor in &rack.tors {
            addresses.push(tor.node_address.addr());
            addresses.extend(tor.spine_addresses.iter().map(Ipv4Net::addr));
        }
        for server in &rack.servers {
            addresses.extend(server.addresses.iter().map(Ipv4Net::addr));
        }
    }
    addresses
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: No two owners share an address
    #[test]
    fn prop_addresses_never_overlap(network in network(), inventory in inventory()) {
        let plan = plan(&network, &inventory).unwrap();
        let addresses = all_host_addresses(&plan);

        let spines = inventory.spine_count;
        let racks = inventory.rack_count();
        let expected = 2 + spines + 2 * spines * racks
            + racks * (3 + 2 + 2 * spines)
            + 3 * inventory.server_count();
        prop_assert_eq!(addresses.len(), expected);

        let unique: HashSet<Ipv4Addr> = addresses.iter().copied().collect();
        prop_assert_eq!(unique.len(), addresses.len(), "Every address must have one owner");
    }

    /// Property: Planning is deterministic
    ///
    /// The same specs must serialize to the same bytes.
    #[test]
    fn prop_plan_is_deterministic(network in network(), inventory in inventory()) {
        let first = serde_json::to_vec(&plan(&network, &inventory).unwrap()).unwrap();
        let second = serde_json::to_vec(&plan(&network, &inventory).unwrap()).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Property: Server offsets are 4..4+cs+ss, CS first
    #[test]
    fn prop_server_offsets_are_contiguous(network in network(), inventory in inventory()) {
        let plan = plan(&network, &inventory).unwrap();

        for (rack, spec) in plan.racks.iter().zip(&inventory.racks) {
            let offsets: Vec<u64> = rack.servers.iter().map(|s| s.role_offset.value()).collect();
            let expected: Vec<u64> = (4..4 + spec.server_count() as u64).collect();
            prop_assert_eq!(offsets, expected);

            let kinds: Vec<NodeKind> = rack.servers.iter().map(|s| s.kind).collect();
            let mut expected_kinds = vec![NodeKind::Cs; spec.cs];
            expected_kinds.extend(vec![NodeKind::Ss; spec.ss]);
            prop_assert_eq!(kinds, expected_kinds);
        }
    }

    /// Property: Node addresses live in their rack's subnets
    #[test]
    fn prop_node_addresses_stay_in_rack_subnets(network in network(), inventory in inventory()) {
        let plan = plan(&network, &inventory).unwrap();

        for rack in &plan.racks {
            for role in NodeRole::ALL {
                let subnet = rack.node_network(role);
                prop_assert_eq!(subnet.prefix_len(), network.node.prefix_len());
                prop_assert!(subnet.contains(&rack.boot_address(role).addr()));
                for server in &rack.servers {
                    prop_assert!(subnet.contains(&server.address(role).addr()));
                    let expected_prefix = if role.is_segment() { subnet.prefix_len() } else { 32 };
                    prop_assert_eq!(server.address(role).prefix_len(), expected_prefix);
                }
            }
            for (role, tor) in NodeRole::TORS.iter().zip(&rack.tors) {
                prop_assert!(rack.node_network(*role).contains(&tor.node_address.addr()));
            }
        }
    }

    /// Property: Each spine/ToR link is one /31 shared by both ends
    #[test]
    fn prop_links_pair_up(network in network(), inventory in inventory()) {
        let plan = plan(&network, &inventory).unwrap();

        for rack in &plan.racks {
            prop_assert_eq!(rack.tor1().spine_addresses.len(), plan.spines.len());
            for spine in &plan.spines {
                let pair = spine.peer_addresses[rack.index];
                let tor1 = rack.tor1().spine_addresses[spine.index];
                let tor2 = rack.tor2().spine_addresses[spine.index];

                prop_assert_eq!(pair.tor1.prefix_len(), 31);
                prop_assert_eq!(pair.tor1.trunc(), tor1.trunc());
                prop_assert_eq!(pair.tor2.trunc(), tor2.trunc());
                prop_assert_ne!(pair.tor1.trunc(), pair.tor2.trunc());
                prop_assert_eq!(u32::from(tor1.addr()) - u32::from(pair.tor1.addr()), 1);
            }
        }
    }

    /// Property: Peering offsets are a bijection onto multiples of 4
    #[test]
    fn prop_peering_offsets_are_bijective(spines in 1usize..8, racks in 1usize..40) {
        let offsets: HashSet<u64> = (0..spines)
            .flat_map(|s| (0..racks).map(move |r| peering_offset(s, r, racks).unwrap()))
            .collect();

        prop_assert_eq!(offsets.len(), spines * racks);
        prop_assert!(offsets.iter().all(|o| o % 4 == 0));
        prop_assert!(offsets.iter().all(|o| *o < (spines * racks * 4) as u64));
    }

    /// Property: Shared ASNs never collide with rack ASNs
    #[test]
    fn prop_asns_are_disjoint(network in network(), inventory in inventory()) {
        let plan = plan(&network, &inventory).unwrap();

        let racks: Vec<Asn> = plan.racks.iter().map(|r| r.asn).collect();
        let expected: Vec<Asn> = (0..racks.len() as u32)
            .map(|i| Asn::new(network.asn_base + i))
            .collect();
        prop_assert_eq!(&racks, &expected);

        prop_assert_eq!(plan.asn_spine, Asn::new(network.asn_base - 1));
        prop_assert_eq!(plan.asn_external_vm, Asn::new(network.asn_base - 2));
        prop_assert!(!racks.contains(&plan.asn_spine));
        prop_assert!(!racks.contains(&plan.asn_external_vm));
    }
}
