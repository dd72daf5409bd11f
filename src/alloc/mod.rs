//! VLAN ID allocation out of a group's configured ranges.
//!
//! Pure over its inputs: the caller reads the used-VID snapshot fresh from
//! the store immediately before calling, and the unique `(group_id, vid)`
//! index backstops the window between read and write.

use std::collections::HashSet;

use crate::models::VidRange;

/// Highest VID any range may reach. Tied to the 4-digit zero-pad in VNI
/// encoding; a wider VID would collide with the next identifier's digits.
pub const MAX_VID: u16 = 9999;

/// How the VID for one allocation is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VidRequest {
    /// First free VID in range-declaration order.
    Auto,
    /// A specific VID; rejected only if already in use. Deliberately not
    /// checked against the group's configured ranges.
    Manual(u16),
}

/// Business-rule allocation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
    /// Every VID in every configured range is taken.
    Exhausted,
    /// The manually requested VID is already in use.
    Conflict(u16),
}

impl std::fmt::Display for AllocError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AllocError::Exhausted => {
                write!(f, "no free VLAN ID available in the configured ranges")
            }
            AllocError::Conflict(vid) => write!(f, "VLAN ID {} is already in use", vid),
        }
    }
}

impl std::error::Error for AllocError {}

/// Return the first VID not present in `used`, scanning ranges in
/// declaration order and ascending within each range.
pub fn next_free_vid(ranges: &[VidRange], used: &HashSet<u16>) -> Option<u16> {
    for range in ranges {
        for vid in range.start..=range.end {
            if !used.contains(&vid) {
                return Some(vid);
            }
        }
    }
    None
}

/// Resolve a VID request against the group's ranges and the current
/// used-VID set.
pub fn allocate(
    ranges: &[VidRange],
    used: &HashSet<u16>,
    request: VidRequest,
) -> Result<u16, AllocError> {
    match request {
        VidRequest::Auto => next_free_vid(ranges, used).ok_or(AllocError::Exhausted),
        VidRequest::Manual(vid) => {
            if used.contains(&vid) {
                Err(AllocError::Conflict(vid))
            } else {
                Ok(vid)
            }
        }
    }
}

/// Validate a group's range configuration: ordered bounds, VIDs within
/// [1, MAX_VID], no overlap between ranges.
pub fn validate_ranges(ranges: &[VidRange]) -> Result<(), String> {
    if ranges.is_empty() {
        return Err("at least one VID range is required".to_string());
    }
    for r in ranges {
        if r.start == 0 {
            return Err("VID ranges start at 1".to_string());
        }
        if r.start > r.end {
            return Err(format!("invalid VID range [{}, {}]", r.start, r.end));
        }
        if r.end > MAX_VID {
            return Err(format!(
                "VID range [{}, {}] exceeds the maximum VID {}",
                r.start, r.end, MAX_VID
            ));
        }
    }
    for (i, a) in ranges.iter().enumerate() {
        for b in &ranges[i + 1..] {
            if a.start <= b.end && b.start <= a.end {
                return Err(format!(
                    "overlapping VID ranges [{}, {}] and [{}, {}]",
                    a.start, a.end, b.start, b.end
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn used(vids: &[u16]) -> HashSet<u16> {
        vids.iter().copied().collect()
    }

    #[test]
    fn test_auto_picks_first_free() {
        let ranges = [VidRange::new(10, 12)];
        assert_eq!(allocate(&ranges, &used(&[]), VidRequest::Auto), Ok(10));
        assert_eq!(allocate(&ranges, &used(&[10]), VidRequest::Auto), Ok(11));
        assert_eq!(allocate(&ranges, &used(&[10, 11]), VidRequest::Auto), Ok(12));
    }

    #[test]
    fn test_auto_respects_range_declaration_order() {
        // Later range declared first wins even though its VIDs are higher
        let ranges = [VidRange::new(300, 301), VidRange::new(100, 101)];
        assert_eq!(allocate(&ranges, &used(&[]), VidRequest::Auto), Ok(300));
        assert_eq!(
            allocate(&ranges, &used(&[300, 301]), VidRequest::Auto),
            Ok(100)
        );
    }

    #[test]
    fn test_auto_exhausted() {
        let ranges = [VidRange::new(10, 11)];
        assert_eq!(
            allocate(&ranges, &used(&[10, 11]), VidRequest::Auto),
            Err(AllocError::Exhausted)
        );
    }

    #[test]
    fn test_auto_is_deterministic() {
        let ranges = [VidRange::new(20, 29)];
        let u = used(&[20, 22, 24]);
        let first = allocate(&ranges, &u, VidRequest::Auto);
        assert_eq!(first, allocate(&ranges, &u, VidRequest::Auto));
        assert_eq!(first, Ok(21));
    }

    #[test]
    fn test_manual_free_vid() {
        let ranges = [VidRange::new(10, 12)];
        assert_eq!(allocate(&ranges, &used(&[10]), VidRequest::Manual(11)), Ok(11));
    }

    #[test]
    fn test_manual_conflict() {
        let ranges = [VidRange::new(10, 12)];
        assert_eq!(
            allocate(&ranges, &used(&[11]), VidRequest::Manual(11)),
            Err(AllocError::Conflict(11))
        );
    }

    #[test]
    fn test_manual_outside_ranges_is_accepted() {
        // A manual VID is only checked for uniqueness, not range membership.
        let ranges = [VidRange::new(10, 12)];
        assert_eq!(allocate(&ranges, &used(&[]), VidRequest::Manual(500)), Ok(500));
    }

    #[test]
    fn test_validate_ranges() {
        assert!(validate_ranges(&[VidRange::new(10, 20)]).is_ok());
        assert!(validate_ranges(&[VidRange::new(10, 20), VidRange::new(30, 40)]).is_ok());
        assert!(validate_ranges(&[]).is_err());
        assert!(validate_ranges(&[VidRange::new(0, 5)]).is_err());
        assert!(validate_ranges(&[VidRange::new(20, 10)]).is_err());
        assert!(validate_ranges(&[VidRange::new(9000, 10000)]).is_err());
        assert!(validate_ranges(&[VidRange::new(10, 20), VidRange::new(15, 25)]).is_err());
    }
}
