// Copyright (c) 2025 - Cowboy AI, Inc.
//! Planner configuration

use serde::{Deserialize, Serialize};

use crate::errors::{TopologyError, TopologyResult};

/// Environment variable toggling the capacity checks
pub const ENV_CHECK_CAPACITY: &str = "FABRIC_PLAN_CHECK_CAPACITY";

/// Environment variable toggling the address collision check
pub const ENV_CHECK_COLLISIONS: &str = "FABRIC_PLAN_CHECK_COLLISIONS";

/// Which optional checks the planner runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Reject fabrics whose racks or spines do not fit their pools
    pub check_capacity: bool,
    /// Reject plans in which two owners share an address
    pub check_collisions: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            check_capacity: true,
            check_collisions: true,
        }
    }
}

impl PlannerConfig {
    /// Load configuration from environment variables
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> TopologyResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> TopologyResult<Self> {
        let defaults = Self::default();
        Ok(Self {
            check_capacity: parse_flag(ENV_CHECK_CAPACITY, lookup(ENV_CHECK_CAPACITY))?
                .unwrap_or(defaults.check_capacity),
            check_collisions: parse_flag(ENV_CHECK_COLLISIONS, lookup(ENV_CHECK_COLLISIONS))?
                .unwrap_or(defaults.check_collisions),
        })
    }

    pub fn with_capacity_check(mut self, enabled: bool) -> Self {
        self.check_capacity = enabled;
        self
    }

    pub fn with_collision_check(mut self, enabled: bool) -> Self {
        self.check_collisions = enabled;
        self
    }
}

fn parse_flag(key: &str, value: Option<String>) -> TopologyResult<Option<bool>> {
    let Some(value) = value else {
        return Ok(None);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        other => Err(TopologyError::Configuration(format!(
            "{} must be a boolean, got {:?}",
            key, other
        ))),
    }
}
