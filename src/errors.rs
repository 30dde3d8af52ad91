//! Error types for topology planning

use crate::domain::{AddressRangeError, ValidationError};
use crate::menu::InvalidSpecError;
use thiserror::Error;

/// Errors that can occur while loading a menu or planning a fabric
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    /// Address arithmetic left the IPv4 address space
    #[error("Address range error: {0}")]
    AddressRange(#[from] AddressRangeError),

    /// A fabric invariant does not hold
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The menu document is malformed
    #[error("Invalid menu: {0}")]
    InvalidSpec(#[from] InvalidSpecError),

    /// Reading or writing a file failed
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type for topology operations
pub type TopologyResult<T> = Result<T, TopologyError>;

impl From<std::io::Error> for TopologyError {
    fn from(err: std::io::Error) -> Self {
        TopologyError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TopologyError {
    fn from(err: serde_json::Error) -> Self {
        TopologyError::Serialization(err.to_string())
    }
}
