//! VXLAN Network Identifier derivation.

use anyhow::{Context, Result};

/// Zero-pad width for the VID half of a VNI. This is a wire contract:
/// changing it re-keys every VNI in the fabric. Keep in sync with
/// `alloc::MAX_VID`.
pub const VID_PAD: usize = 4;

/// Derive a VNI by decimal concatenation of the overlay domain identifier
/// and the zero-padded VLAN ID: identifier 500 + VID 12 -> 5000012.
pub fn encode(identifier: i64, vid: u16) -> Result<i64> {
    let token = format!("{}{:0width$}", identifier, vid, width = VID_PAD);
    token
        .parse::<i64>()
        .with_context(|| format!("derived VNI {} does not fit in an integer", token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        assert_eq!(encode(500, 12).unwrap(), 5000012);
        assert_eq!(encode(77, 10).unwrap(), 770010);
        assert_eq!(encode(1, 1).unwrap(), 10001);
        assert_eq!(encode(1, 9999).unwrap(), 19999);
    }

    #[test]
    fn test_encode_is_injective_across_neighbors() {
        // Padding keeps (id, vid) pairs from colliding: (50, 12) vs (500, 12)
        // vs (5001, 2) all map to distinct VNIs.
        assert_ne!(encode(50, 12).unwrap(), encode(500, 12).unwrap());
        assert_ne!(encode(500, 12).unwrap(), encode(5001, 2).unwrap());
        assert_ne!(encode(5, 1).unwrap(), encode(50, 1).unwrap());
    }

    #[test]
    fn test_encode_overflow() {
        assert!(encode(i64::MAX, 1).is_err());
    }
}
