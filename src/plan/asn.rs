// Copyright (c) 2025 - Cowboy AI, Inc.
//! ASN Allocation
//!
//! Rack `i` peers as `base + i`, all spines share `base - 1` and the
//! external VM uses `base - 2`. The two shared ASNs sit below every rack
//! ASN, so the sets are disjoint.

use crate::domain::invariants::{validate_asn_base, ValidationError};
use crate::domain::Asn;
use serde::{Deserialize, Serialize};

/// Distance of the spine ASN below the base
pub const SPINE_BELOW_BASE: u32 = 1;

/// Distance of the external VM ASN below the base
pub const EXTERNAL_VM_BELOW_BASE: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsnAssignment {
    /// Indexed by rack
    pub racks: Vec<Asn>,
    pub spine: Asn,
    pub external_vm: Asn,
}

/// Assign ASNs for `rack_count` racks above `base`
pub fn allocate_asns(base: u32, rack_count: usize) -> Result<AsnAssignment, ValidationError> {
    validate_asn_base(base, rack_count)?;

    // Bounds checked above.
    let racks = (0..rack_count as u32).map(|i| Asn::new(base + i)).collect();
    Ok(AsnAssignment {
        racks,
        spine: Asn::new(base - SPINE_BELOW_BASE),
        external_vm: Asn::new(base - EXTERNAL_VM_BELOW_BASE),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_assignment() {
        let asns = allocate_asns(64_600, 3).unwrap();
        let racks: Vec<u32> = asns.racks.iter().map(Asn::value).collect();
        assert_eq!(racks, vec![64_600, 64_601, 64_602]);
        assert_eq!(asns.spine, Asn::new(64_599));
        assert_eq!(asns.external_vm, Asn::new(64_598));
    }

    #[test]
    fn test_shared_asns_never_collide_with_racks() {
        let asns = allocate_asns(3, 100).unwrap();
        assert!(!asns.racks.contains(&asns.spine));
        assert!(!asns.racks.contains(&asns.external_vm));
        assert_eq!(asns.external_vm, Asn::new(1));
    }

    #[test_case(0; "zero")]
    #[test_case(1; "one")]
    #[test_case(2; "external vm would be zero")]
    fn test_too_small_base(base: u32) {
        assert_eq!(
            allocate_asns(base, 1),
            Err(ValidationError::AsnBaseTooSmall(base))
        );
    }

    #[test]
    fn test_rack_asns_must_fit() {
        assert!(allocate_asns(u32::MAX, 1).is_ok());
        assert!(matches!(
            allocate_asns(u32::MAX, 2),
            Err(ValidationError::AsnOverflow { .. })
        ));
    }
}
