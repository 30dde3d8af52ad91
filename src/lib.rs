//! Topology and address-space planning for simulated spine-leaf data centers
//!
//! This crate turns a menu (base address pools, an ASN base and an inventory
//! of spines, racks and servers) into a fully addressed fabric plan consumed
//! by cluster, routing and boot-seed renderers.

pub mod config;
pub mod domain;
pub mod errors;
pub mod menu;
pub mod plan;

// Re-export commonly used types
pub use config::PlannerConfig;
pub use domain::{InventorySpec, NetworkSpec, RackSpec};
pub use errors::{TopologyError, TopologyResult};
pub use menu::{InvalidSpecError, Menu, MenuFormat};
pub use plan::{plan, plan_with_config, RackPlan, ServerPlan, SpinePlan, TopologyPlan, TorPlan};
