// Copyright (c) 2025 - Cowboy AI, Inc.
//! Fabric Domain Models
//!
//! Value objects and pure validation used by the planner.
//!
//! # Value Objects
//!
//! - [`Asn`] - BGP Autonomous System Number
//! - [`HostOffset`] - position of a host inside a per-rack node subnet
//! - [`NodeRole`] - the three per-rack node subnets
//! - [`NodeKind`] - boot, compute and storage servers
//!
//! # Input Specifications
//!
//! - [`NetworkSpec`] - base pools and ASN base
//! - [`InventorySpec`] - spine count and per-rack server population

pub mod address;
pub mod asn;
pub mod invariants;
pub mod role;
pub mod spec;

pub use address::AddressRangeError;
pub use asn::Asn;
pub use invariants::{ValidationError, ValidationResult};
pub use role::{
    HostOffset, NodeKind, NodeRole, ADDRESSES_PER_LINK, HOST_PREFIX_LENGTH, LINK_PREFIX_LENGTH,
    TORS_PER_RACK,
};
pub use spec::{InventorySpec, NetworkSpec, RackSpec};
