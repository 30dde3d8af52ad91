// Copyright (c) 2025 - Cowboy AI, Inc.
//! Fabric Topology Plan
//!
//! The planner turns a [`NetworkSpec`](crate::domain::NetworkSpec) and an
//! [`InventorySpec`](crate::domain::InventorySpec) into a [`TopologyPlan`]:
//! every rack, spine, server and inter-switch link with its addresses, and
//! every BGP speaker with its ASN.
//!
//! # Pipeline
//!
//! ```text
//! per rack:   node_network ──> server
//! global:     peering
//! global:     asn
//!                  └─────────> aggregate ──> TopologyPlan
//! ```
//!
//! Each stage is a pure function of the input specs and the values returned
//! by earlier stages. The plan is never mutated after it is assembled, so
//! replanning unchanged input reproduces it exactly.

pub mod aggregate;
pub mod asn;
pub mod node_network;
pub mod peering;
pub mod server;

pub use aggregate::{plan, plan_with_config};
pub use asn::{allocate_asns, AsnAssignment};
pub use node_network::{node_network, node_networks};
pub use peering::{allocate_peerings, peering_block, peering_offset, PeeringBlock, PeeringTable};
pub use server::{allocate_servers, boot_addresses, host_address, tor_node_addresses};

use crate::domain::{Asn, HostOffset, NodeKind, NodeRole};
use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};

/// One server of a rack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerPlan {
    /// Short name within the rack, e.g. `cs1`
    pub name: String,
    pub kind: NodeKind,
    /// Offset shared by all three of the server's addresses
    pub role_offset: HostOffset,
    /// One address per [`NodeRole`], indexed by [`NodeRole::index`]
    pub addresses: [Ipv4Net; 3],
}

impl ServerPlan {
    pub fn address(&self, role: NodeRole) -> Ipv4Net {
        self.addresses[role.index()]
    }

    /// Qualified name, e.g. `rack0-cs1`
    pub fn full_name(&self, rack_name: &str) -> String {
        format!("{}-{}", rack_name, self.name)
    }
}

/// One ToR switch of a rack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TorPlan {
    /// e.g. `rack0-tor1`
    pub name: String,
    /// Gateway address on the rack's shared segment
    pub node_address: Ipv4Net,
    /// ToR side of the `/31` toward each spine, indexed by spine
    pub spine_addresses: Vec<Ipv4Net>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RackPlan {
    pub index: usize,
    /// e.g. `rack0`
    pub name: String,
    /// e.g. `r0`, used in link names
    pub short_name: String,
    pub asn: Asn,
    /// Node subnets indexed by [`NodeRole::index`]
    pub node_networks: [Ipv4Net; 3],
    /// Boot server addresses indexed by [`NodeRole::index`]
    pub boot_addresses: [Ipv4Net; 3],
    /// ToR1 then ToR2
    pub tors: [TorPlan; 2],
    /// CS servers in declaration order, then SS servers
    pub servers: Vec<ServerPlan>,
}

impl RackPlan {
    pub fn node_network(&self, role: NodeRole) -> Ipv4Net {
        self.node_networks[role.index()]
    }

    pub fn boot_address(&self, role: NodeRole) -> Ipv4Net {
        self.boot_addresses[role.index()]
    }

    /// e.g. `rack0-boot`
    pub fn boot_name(&self) -> String {
        format!("{}-{}", self.name, NodeKind::Boot)
    }

    pub fn tor1(&self) -> &TorPlan {
        &self.tors[0]
    }

    pub fn tor2(&self) -> &TorPlan {
        &self.tors[1]
    }

    /// ToR serving an uplink role; `None` for [`NodeRole::Gateway`]
    pub fn tor(&self, role: NodeRole) -> Option<&TorPlan> {
        match role {
            NodeRole::Gateway => None,
            NodeRole::Tor1 => Some(self.tor1()),
            NodeRole::Tor2 => Some(self.tor2()),
        }
    }

    pub fn servers_of(&self, kind: NodeKind) -> impl Iterator<Item = &ServerPlan> {
        self.servers.iter().filter(move |s| s.kind == kind)
    }
}

/// Spine side of the two links toward one rack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerPair {
    pub tor1: Ipv4Net,
    pub tor2: Ipv4Net,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinePlan {
    pub index: usize,
    /// e.g. `spine1`; spines are numbered from 1
    pub name: String,
    /// e.g. `s1`
    pub short_name: String,
    pub external_address: Ipv4Net,
    /// Indexed by rack
    pub peer_addresses: Vec<PeerPair>,
}

impl SpinePlan {
    pub fn tor1_address(&self, rack_index: usize) -> Option<Ipv4Net> {
        self.peer_addresses.get(rack_index).map(|p| p.tor1)
    }

    pub fn tor2_address(&self, rack_index: usize) -> Option<Ipv4Net> {
        self.peer_addresses.get(rack_index).map(|p| p.tor2)
    }
}

/// Fully addressed fabric
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyPlan {
    pub external: Ipv4Net,
    pub external_host_address: Ipv4Net,
    pub external_vm_address: Ipv4Net,
    pub asn_spine: Asn,
    pub asn_external_vm: Asn,
    pub racks: Vec<RackPlan>,
    pub spines: Vec<SpinePlan>,
    pub bastion: Ipv4Net,
    pub load_balancer: Ipv4Net,
    pub ingress: Ipv4Net,
}

impl TopologyPlan {
    pub fn rack(&self, index: usize) -> Option<&RackPlan> {
        self.racks.get(index)
    }

    pub fn spine(&self, index: usize) -> Option<&SpinePlan> {
        self.spines.get(index)
    }

    /// Servers across all racks, excluding boot servers
    pub fn server_count(&self) -> usize {
        self.racks.iter().map(|r| r.servers.len()).sum()
    }

    /// Every ASN in the plan: external VM, spines, then racks
    pub fn asns(&self) -> impl Iterator<Item = Asn> + '_ {
        [self.asn_external_vm, self.asn_spine]
            .into_iter()
            .chain(self.racks.iter().map(|r| r.asn))
    }
}
