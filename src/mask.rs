//! Dotted-quad subnet mask to CIDR prefix length.

use crate::Error;

/// Every canonical IPv4 subnet mask, indexed by prefix length.
const MASKS: [&str; 33] = [
    "0.0.0.0",
    "128.0.0.0",
    "192.0.0.0",
    "224.0.0.0",
    "240.0.0.0",
    "248.0.0.0",
    "252.0.0.0",
    "254.0.0.0",
    "255.0.0.0",
    "255.128.0.0",
    "255.192.0.0",
    "255.224.0.0",
    "255.240.0.0",
    "255.248.0.0",
    "255.252.0.0",
    "255.254.0.0",
    "255.255.0.0",
    "255.255.128.0",
    "255.255.192.0",
    "255.255.224.0",
    "255.255.240.0",
    "255.255.248.0",
    "255.255.252.0",
    "255.255.254.0",
    "255.255.255.0",
    "255.255.255.128",
    "255.255.255.192",
    "255.255.255.224",
    "255.255.255.240",
    "255.255.255.248",
    "255.255.255.252",
    "255.255.255.254",
    "255.255.255.255",
];

/// Translates a subnet mask such as `255.255.255.0` into its prefix length.
///
/// Only the exact canonical spelling is accepted; anything else, including
/// non-contiguous masks and padded octets, is [`Error::InvalidMask`].
pub fn to_prefix_len(mask: &str) -> Result<u8, Error> {
    MASKS
        .iter()
        .position(|m| *m == mask)
        .map(|prefix| prefix as u8)
        .ok_or_else(|| Error::InvalidMask(mask.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn well_known_masks() {
        assert_eq!(to_prefix_len("255.255.255.0").unwrap(), 24);
        assert_eq!(to_prefix_len("0.0.0.0").unwrap(), 0);
        assert_eq!(to_prefix_len("255.255.255.255").unwrap(), 32);
        assert_eq!(to_prefix_len("255.255.0.0").unwrap(), 16);
        assert_eq!(to_prefix_len("255.255.255.252").unwrap(), 30);
    }

    #[test]
    fn every_prefix_matches_the_bit_pattern() {
        for prefix in 0..=32u32 {
            let bits = u32::MAX.checked_shl(32 - prefix).unwrap_or(0);
            let mask = Ipv4Addr::from(bits).to_string();
            assert_eq!(to_prefix_len(&mask).unwrap() as u32, prefix, "{mask}");
        }
    }

    #[test]
    fn rejects_non_canonical_masks() {
        for mask in [
            "255.255.255.1",
            "255.0.255.0",
            "255.255.255.000",
            " 255.255.255.0",
            "255.255.255",
            "255.255.255.0.0",
            "/24",
            "24",
            "",
        ] {
            assert!(
                matches!(to_prefix_len(mask), Err(Error::InvalidMask(ref m)) if m == mask),
                "{mask:?}"
            );
        }
    }
}
