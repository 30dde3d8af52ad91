// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure Validation Functions - Fabric Invariants
//!
//! Checks the planner applies before and after allocation. All functions are
//! pure and return the first violation found.
//!
//! # Invariant Categories
//!
//! 1. **Capacity**: every node subnet and the external pool can hold the
//!    offsets the topology assigns in them
//! 2. **ASN bounds**: the shared ASNs stay positive and rack ASNs fit in
//!    32 bits
//! 3. **Uniqueness**: no two subnets or pools of a plan intersect, and no
//!    host address has two owners

use crate::domain::role::external;
use crate::domain::{HostOffset, InventorySpec, NetworkSpec, NodeRole, RackSpec};
use crate::plan::TopologyPlan;
use ipnet::Ipv4Net;
use std::collections::BTreeMap;
use std::net::Ipv4Addr;

pub type ValidationResult = Result<(), ValidationError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Rack {rack} needs {required} addresses per node subnet, the node pool prefix provides {available}")]
    NodeSubnetExhausted {
        rack: usize,
        required: u64,
        available: u64,
    },

    #[error("External pool needs {required} addresses, its prefix provides {available}")]
    ExternalPoolExhausted { required: u64, available: u64 },

    #[error("ASN base {0} is too small: the external VM ASN (base - 2) must be at least 1")]
    AsnBaseTooSmall(u32),

    #[error("ASN base {base} with {racks} racks exceeds the 32-bit ASN range")]
    AsnOverflow { base: u32, racks: usize },

    #[error("Address {address} is assigned to both {first} and {second}")]
    AddressCollision {
        address: Ipv4Addr,
        first: String,
        second: String,
    },
}

/// Addresses in a network with the prefix length of `network`
fn pool_size(network: Ipv4Net) -> u64 {
    1u64 << (32 - u32::from(network.prefix_len()))
}

/// Addresses each node subnet of `rack` must hold
///
/// Offsets `0..=h` plus the broadcast address of the shared segments, where
/// `h` is the highest server offset (or the boot offset for an empty rack).
pub fn required_node_addresses(rack: &RackSpec) -> u64 {
    let highest = match rack.server_count() {
        0 => HostOffset::BOOT,
        n => HostOffset::server(n - 1),
    };
    highest.value() + 2
}

/// Addresses the external pool must hold for `spine_count` spines
pub fn required_external_addresses(spine_count: usize) -> u64 {
    let highest = match spine_count {
        0 => external::VM,
        n => external::SPINE + n as u64 - 1,
    };
    highest + 2
}

pub fn validate_rack_capacity(node_pool: Ipv4Net, rack_index: usize, rack: &RackSpec) -> ValidationResult {
    let required = required_node_addresses(rack);
    let available = pool_size(node_pool);
    if required > available {
        return Err(ValidationError::NodeSubnetExhausted {
            rack: rack_index,
            required,
            available,
        });
    }
    Ok(())
}

pub fn validate_external_capacity(external_pool: Ipv4Net, spine_count: usize) -> ValidationResult {
    let required = required_external_addresses(spine_count);
    let available = pool_size(external_pool);
    if required > available {
        return Err(ValidationError::ExternalPoolExhausted { required, available });
    }
    Ok(())
}

/// Validate the ASN base against the rack count
///
/// # Rules
/// - `base - 2 >= 1`
/// - `base + rack_count - 1 <= u32::MAX`
pub fn validate_asn_base(base: u32, rack_count: usize) -> ValidationResult {
    if base < 3 {
        return Err(ValidationError::AsnBaseTooSmall(base));
    }
    let last = u64::from(base) + (rack_count as u64).saturating_sub(1);
    if last > u64::from(u32::MAX) {
        return Err(ValidationError::AsnOverflow {
            base,
            racks: rack_count,
        });
    }
    Ok(())
}

/// All capacity checks for a fabric
pub fn validate_capacity(network: &NetworkSpec, inventory: &InventorySpec) -> ValidationResult {
    validate_external_capacity(network.external, inventory.spine_count)?;
    inventory
        .racks
        .iter()
        .enumerate()
        .try_for_each(|(index, rack)| validate_rack_capacity(network.node, index, rack))
}

struct AddressRegistry {
    owners: BTreeMap<Ipv4Addr, String>,
}

impl AddressRegistry {
    fn new() -> Self {
        Self {
            owners: BTreeMap::new(),
        }
    }

    fn claim(&mut self, address: Ipv4Net, owner: String) -> ValidationResult {
        if let Some(first) = self.owners.get(&address.addr()) {
            return Err(ValidationError::AddressCollision {
                address: address.addr(),
                first: first.clone(),
                second: owner,
            });
        }
        self.owners.insert(address.addr(), owner);
        Ok(())
    }
}

/// Disjoint subnets keyed by network address
struct RangeRegistry {
    ranges: BTreeMap<Ipv4Addr, (Ipv4Net, String)>,
}

impl RangeRegistry {
    fn new() -> Self {
        Self {
            ranges: BTreeMap::new(),
        }
    }

    fn collision(existing: &(Ipv4Net, String), range: Ipv4Net, owner: String) -> ValidationError {
        let (claimed, first) = existing;
        ValidationError::AddressCollision {
            address: claimed.network().max(range.network()),
            first: format!("{} {}", first, claimed),
            second: format!("{} {}", owner, range),
        }
    }

    fn claim(&mut self, range: Ipv4Net, owner: String) -> ValidationResult {
        let range = range.trunc();
        let start = range.network();

        // Claimed ranges are disjoint, so only the nearest neighbour on
        // each side can intersect.
        if let Some((_, below)) = self.ranges.range(..=start).next_back() {
            if below.0.contains(&start) {
                return Err(Self::collision(below, range, owner));
            }
        }
        if let Some((_, above)) = self.ranges.range(start..).next() {
            if range.contains(&above.0.network()) {
                return Err(Self::collision(above, range, owner));
            }
        }
        self.ranges.insert(start, (range, owner));
        Ok(())
    }
}

fn validate_disjoint_ranges(plan: &TopologyPlan) -> ValidationResult {
    let mut registry = RangeRegistry::new();

    registry.claim(plan.external, "external pool".to_string())?;
    registry.claim(plan.bastion, "bastion pool".to_string())?;
    registry.claim(plan.load_balancer, "load balancer pool".to_string())?;
    registry.claim(plan.ingress, "ingress pool".to_string())?;

    for rack in &plan.racks {
        for role in NodeRole::ALL {
            registry.claim(rack.node_network(role), format!("{}/{} subnet", rack.name, role))?;
        }
    }

    for spine in &plan.spines {
        for (rack, pair) in spine.peer_addresses.iter().enumerate() {
            registry.claim(pair.tor1, format!("{}/rack{}-tor1 link", spine.name, rack))?;
            registry.claim(pair.tor2, format!("{}/rack{}-tor2 link", spine.name, rack))?;
        }
    }

    Ok(())
}

/// Verify that no two ranges of `plan` intersect and no host address has
/// two owners
///
/// Ranges are the external and exposed pools, every node subnet and every
/// spine/ToR `/31`.
pub fn validate_unique_addresses(plan: &TopologyPlan) -> ValidationResult {
    validate_disjoint_ranges(plan)?;

    let mut registry = AddressRegistry::new();

    registry.claim(plan.external_host_address, "external host".to_string())?;
    registry.claim(plan.external_vm_address, "external vm".to_string())?;

    for spine in &plan.spines {
        registry.claim(spine.external_address, format!("{}/external", spine.name))?;
        for (rack, pair) in spine.peer_addresses.iter().enumerate() {
            registry.claim(pair.tor1, format!("{}/rack{}-tor1", spine.name, rack))?;
            registry.claim(pair.tor2, format!("{}/rack{}-tor2", spine.name, rack))?;
        }
    }

    for rack in &plan.racks {
        for role in NodeRole::ALL {
            registry.claim(rack.boot_address(role), format!("{}/{}", rack.boot_name(), role))?;
        }
        for (role, tor) in NodeRole::TORS.iter().zip(&rack.tors) {
            registry.claim(tor.node_address, format!("{}/{}", tor.name, role))?;
            for (spine, address) in tor.spine_addresses.iter().enumerate() {
                registry.claim(*address, format!("{}/spine{}", tor.name, spine + 1))?;
            }
        }
        for server in &rack.servers {
            for role in NodeRole::ALL {
                registry.claim(
                    server.address(role),
                    format!("{}/{}", server.full_name(&rack.name), role),
                )?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn net(s: &str) -> Ipv4Net {
        s.parse().unwrap()
    }

    #[test]
    fn test_required_node_addresses() {
        assert_eq!(required_node_addresses(&RackSpec::new(0, 0)), 5);
        assert_eq!(required_node_addresses(&RackSpec::new(1, 0)), 6);
        assert_eq!(required_node_addresses(&RackSpec::new(2, 1)), 8);
    }

    #[test]
    fn test_rack_capacity_boundary() {
        let pool = net("10.69.0.0/29");
        assert!(validate_rack_capacity(pool, 0, &RackSpec::new(2, 1)).is_ok());
        assert_eq!(
            validate_rack_capacity(pool, 4, &RackSpec::new(2, 2)),
            Err(ValidationError::NodeSubnetExhausted {
                rack: 4,
                required: 9,
                available: 8,
            })
        );
    }

    #[test]
    fn test_tiny_node_pool_cannot_hold_boot_server() {
        let pool = net("10.69.0.0/30");
        assert!(validate_rack_capacity(pool, 0, &RackSpec::default()).is_err());
    }

    #[test]
    fn test_external_capacity() {
        assert_eq!(required_external_addresses(0), 4);
        assert_eq!(required_external_addresses(2), 6);
        assert!(validate_external_capacity(net("10.0.0.0/29"), 4).is_ok());
        assert_eq!(
            validate_external_capacity(net("10.0.0.0/29"), 5),
            Err(ValidationError::ExternalPoolExhausted {
                required: 9,
                available: 8,
            })
        );
    }

    #[test]
    fn test_asn_base_bounds() {
        assert!(validate_asn_base(3, 0).is_ok());
        assert_eq!(validate_asn_base(2, 1), Err(ValidationError::AsnBaseTooSmall(2)));
        assert!(validate_asn_base(u32::MAX - 9, 10).is_ok());
        assert!(validate_asn_base(u32::MAX - 9, 11).is_err());
    }

    #[test]
    fn test_range_registry_rejects_nested_ranges() {
        let mut registry = RangeRegistry::new();
        registry.claim(net("10.69.0.64/26"), "segment".to_string()).unwrap();
        registry.claim(net("10.69.0.128/31"), "link".to_string()).unwrap();

        let err = registry.claim(net("10.69.0.96/31"), "inner".to_string()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::AddressCollision {
                address: Ipv4Addr::new(10, 69, 0, 96),
                first: "segment 10.69.0.64/26".to_string(),
                second: "inner 10.69.0.96/31".to_string(),
            }
        );
    }

    #[test]
    fn test_range_registry_rejects_enclosing_range() {
        let mut registry = RangeRegistry::new();
        registry.claim(net("10.72.48.64/26"), "ingress".to_string()).unwrap();

        let err = registry.claim(net("10.72.48.0/24"), "outer".to_string()).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::AddressCollision { address, .. } if address == Ipv4Addr::new(10, 72, 48, 64)
        ));
        assert!(registry.claim(net("10.72.49.0/24"), "adjacent".to_string()).is_ok());
    }

    #[test]
    fn test_registry_reports_both_owners() {
        let mut registry = AddressRegistry::new();
        registry.claim(net("10.0.0.1/24"), "a".to_string()).unwrap();
        let err = registry.claim(net("10.0.0.1/31"), "b".to_string()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::AddressCollision {
                address: Ipv4Addr::new(10, 0, 0, 1),
                first: "a".to_string(),
                second: "b".to_string(),
            }
        );
    }
}
