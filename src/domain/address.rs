// Copyright (c) 2025 - Cowboy AI, Inc.
//! IPv4 Address Arithmetic
//!
//! Every address in a fabric plan is produced by adding an integer offset to
//! one of a handful of base addresses. These functions do that arithmetic on
//! the big-endian 32-bit representation of an IPv4 address.
//!
//! Invariants:
//! - Prefix lengths are within 0-32
//! - Offsets never wrap around the address space; overflow is an error

use ipnet::Ipv4Net;
use std::net::Ipv4Addr;
use thiserror::Error;

/// Address arithmetic error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressRangeError {
    #[error("Invalid prefix length: {0} (must be 0-32)")]
    InvalidPrefixLength(u8),

    #[error("Address {base} + {offset} is outside the IPv4 address space")]
    Overflow { base: Ipv4Addr, offset: u64 },

    #[error("Offset for block index {index} does not fit in 64 bits")]
    IndexOverflow { index: u64 },
}

/// Largest valid IPv4 prefix length
pub const MAX_PREFIX_LENGTH: u8 = 32;

/// Convert an address to its big-endian integer value
pub fn ip_to_u32(ip: Ipv4Addr) -> u32 {
    u32::from(ip)
}

/// Convert a big-endian integer value to an address
pub fn u32_to_ip(value: u32) -> Ipv4Addr {
    Ipv4Addr::from(value)
}

/// Number of addresses covered by a prefix length
///
/// Returned as `u64` so that a `/0` (2^32 addresses) is representable.
pub fn block_size(prefix_length: u8) -> Result<u64, AddressRangeError> {
    if prefix_length > MAX_PREFIX_LENGTH {
        return Err(AddressRangeError::InvalidPrefixLength(prefix_length));
    }
    Ok(1u64 << (MAX_PREFIX_LENGTH - prefix_length))
}

/// Return `ip + offset`
///
/// # Examples
///
/// ```rust
/// use cim_fabric_topology::domain::address::offset_ip;
/// use std::net::Ipv4Addr;
///
/// let ip = offset_ip(Ipv4Addr::new(10, 0, 0, 255), 1).unwrap();
/// assert_eq!(ip, Ipv4Addr::new(10, 0, 1, 0));
/// assert!(offset_ip(Ipv4Addr::new(255, 255, 255, 255), 1).is_err());
/// ```
pub fn offset_ip(ip: Ipv4Addr, offset: u64) -> Result<Ipv4Addr, AddressRangeError> {
    let value = u64::from(ip_to_u32(ip))
        .checked_add(offset)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or(AddressRangeError::Overflow { base: ip, offset })?;
    Ok(u32_to_ip(value))
}

/// Host address `ip + offset` carrying the given prefix length
///
/// The result is an interface address, not a network: host bits are kept.
///
/// # Examples
///
/// ```rust
/// use cim_fabric_topology::domain::address::add_offset_to_ip;
/// use std::net::Ipv4Addr;
///
/// let host = add_offset_to_ip(Ipv4Addr::new(10, 0, 0, 0), 1, 24).unwrap();
/// assert_eq!(host.to_string(), "10.0.0.1/24");
/// ```
pub fn add_offset_to_ip(
    ip: Ipv4Addr,
    offset: u64,
    prefix_length: u8,
) -> Result<Ipv4Net, AddressRangeError> {
    let address = offset_ip(ip, offset)?;
    Ipv4Net::new(address, prefix_length)
        .map_err(|_| AddressRangeError::InvalidPrefixLength(prefix_length))
}

/// Offset the address of `network` while keeping its prefix length
///
/// # Examples
///
/// ```rust
/// use cim_fabric_topology::domain::address::add_offset_to_network;
///
/// let base = "10.0.0.0/24".parse().unwrap();
/// let host = add_offset_to_network(base, 1).unwrap();
/// assert_eq!(host.to_string(), "10.0.0.1/24");
/// ```
pub fn add_offset_to_network(network: Ipv4Net, offset: u64) -> Result<Ipv4Net, AddressRangeError> {
    add_offset_to_ip(network.addr(), offset, network.prefix_len())
}

/// The `index`-th block of `base`'s size, counted from `base`'s network address
///
/// The stride is `2^(32 - prefix)`, so consecutive indices give adjacent,
/// non-overlapping subnets of the same prefix length.
///
/// # Examples
///
/// ```rust
/// use cim_fabric_topology::domain::address::derive_subnet;
///
/// let base = "10.69.0.0/26".parse().unwrap();
/// assert_eq!(derive_subnet(base, 5).unwrap().to_string(), "10.69.1.64/26");
/// ```
pub fn derive_subnet(base: Ipv4Net, index: u64) -> Result<Ipv4Net, AddressRangeError> {
    let stride = block_size(base.prefix_len())?;
    let offset = index
        .checked_mul(stride)
        .ok_or(AddressRangeError::IndexOverflow { index })?;
    add_offset_to_ip(base.network(), offset, base.prefix_len())
}
