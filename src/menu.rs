// Copyright (c) 2025 - Cowboy AI, Inc.
//! Menu Documents
//!
//! A menu is the declarative description of a fabric. It is written as TOML
//! (or JSON with a `.json` extension):
//!
//! ```toml
//! [network]
//! asn-base = 64600
//! external = "10.0.0.0/24"
//! spine-tor = "10.0.1.0"
//! node = "10.69.0.0/26"
//!
//! [network.exposed]
//! bastion = "10.72.48.0/26"
//! loadbalancer = "10.72.32.0/20"
//! ingress = "10.72.48.64/26"
//!
//! [inventory]
//! spine = 2
//!
//! [[inventory.rack]]
//! cs = 2
//! ss = 1
//! ```
//!
//! Loading validates what the planner assumes: pools have zero host bits,
//! `spine-tor` is an IPv4 address and there is at least one spine.

use crate::config::PlannerConfig;
use crate::domain::{InventorySpec, NetworkSpec, RackSpec};
use crate::errors::TopologyResult;
use crate::plan::{plan_with_config, TopologyPlan};
use ipnet::Ipv4Net;
use serde::Deserialize;
use std::net::Ipv4Addr;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

/// Menu validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidSpecError {
    #[error("Host part of network address must be 0: {0}")]
    HostBitsSet(String),

    #[error("Invalid CIDR notation: {0}")]
    InvalidCidr(String),

    #[error("Invalid IP address: {0}")]
    InvalidIpAddress(String),

    #[error("spine in inventory must be more than 0")]
    NoSpines,

    #[error("Menu has no [{0}] section")]
    MissingSection(&'static str),

    #[error("Unsupported menu format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to parse menu: {0}")]
    Parse(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct MenuDocument {
    network: Option<NetworkSection>,
    inventory: Option<InventorySection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct NetworkSection {
    asn_base: u32,
    external: String,
    spine_tor: String,
    node: String,
    exposed: ExposedSection,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ExposedSection {
    bastion: String,
    loadbalancer: String,
    ingress: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct InventorySection {
    spine: usize,
    #[serde(default)]
    rack: Vec<RackSection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RackSection {
    #[serde(default)]
    cs: usize,
    #[serde(default)]
    ss: usize,
}

/// Encoding of a menu document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuFormat {
    Toml,
    Json,
}

impl MenuFormat {
    /// Pick the format from the file extension; no extension means TOML
    pub fn from_path(path: &Path) -> Result<Self, InvalidSpecError> {
        match path.extension().and_then(|e| e.to_str()) {
            None => Ok(Self::Toml),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) => Err(InvalidSpecError::UnsupportedFormat(ext.to_string())),
        }
    }
}

/// Parse a pool in CIDR notation, rejecting set host bits
///
/// # Examples
///
/// ```rust
/// use cim_fabric_topology::menu::parse_network_cidr;
///
/// assert!(parse_network_cidr("10.69.0.0/26").is_ok());
/// assert!(parse_network_cidr("10.69.0.1/26").is_err());
/// ```
pub fn parse_network_cidr(s: &str) -> Result<Ipv4Net, InvalidSpecError> {
    let network =
        Ipv4Net::from_str(s.trim()).map_err(|_| InvalidSpecError::InvalidCidr(s.to_string()))?;
    if network.addr() != network.network() {
        return Err(InvalidSpecError::HostBitsSet(s.to_string()));
    }
    Ok(network)
}

fn parse_ip(s: &str) -> Result<Ipv4Addr, InvalidSpecError> {
    Ipv4Addr::from_str(s.trim()).map_err(|_| InvalidSpecError::InvalidIpAddress(s.to_string()))
}

impl NetworkSection {
    fn into_spec(self) -> Result<NetworkSpec, InvalidSpecError> {
        Ok(NetworkSpec {
            asn_base: self.asn_base,
            external: parse_network_cidr(&self.external)?,
            node: parse_network_cidr(&self.node)?,
            spine_tor: parse_ip(&self.spine_tor)?,
            bastion: parse_network_cidr(&self.exposed.bastion)?,
            load_balancer: parse_network_cidr(&self.exposed.loadbalancer)?,
            ingress: parse_network_cidr(&self.exposed.ingress)?,
        })
    }
}

impl InventorySection {
    fn into_spec(self) -> Result<InventorySpec, InvalidSpecError> {
        if self.spine == 0 {
            return Err(InvalidSpecError::NoSpines);
        }
        let racks = self.rack.iter().map(|r| RackSpec::new(r.cs, r.ss)).collect();
        Ok(InventorySpec::new(self.spine, racks))
    }
}

/// Validated menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub network: NetworkSpec,
    pub inventory: InventorySpec,
}

impl Menu {
    fn from_document(document: MenuDocument) -> Result<Self, InvalidSpecError> {
        let network = document
            .network
            .ok_or(InvalidSpecError::MissingSection("network"))?
            .into_spec()?;
        let inventory = document
            .inventory
            .ok_or(InvalidSpecError::MissingSection("inventory"))?
            .into_spec()?;
        Ok(Self { network, inventory })
    }

    pub fn from_toml_str(s: &str) -> Result<Self, InvalidSpecError> {
        let document: MenuDocument =
            toml::from_str(s).map_err(|e| InvalidSpecError::Parse(e.to_string()))?;
        Self::from_document(document)
    }

    pub fn from_json_str(s: &str) -> Result<Self, InvalidSpecError> {
        let document: MenuDocument =
            serde_json::from_str(s).map_err(|e| InvalidSpecError::Parse(e.to_string()))?;
        Self::from_document(document)
    }

    pub fn parse(s: &str, format: MenuFormat) -> Result<Self, InvalidSpecError> {
        match format {
            MenuFormat::Toml => Self::from_toml_str(s),
            MenuFormat::Json => Self::from_json_str(s),
        }
    }

    /// Read and validate a menu file
    pub fn load(path: impl AsRef<Path>) -> TopologyResult<Self> {
        let path = path.as_ref();
        let format = MenuFormat::from_path(path)?;
        debug!("Loading {:?} menu from {}", format, path.display());

        let contents = std::fs::read_to_string(path)?;
        let menu = Self::parse(&contents, format)?;

        info!(
            racks = menu.inventory.rack_count(),
            spines = menu.inventory.spine_count,
            servers = menu.inventory.server_count(),
            "Loaded menu {}",
            path.display()
        );
        Ok(menu)
    }

    pub fn plan(&self, config: &PlannerConfig) -> TopologyResult<TopologyPlan> {
        plan_with_config(&self.network, &self.inventory, config)
    }
}
