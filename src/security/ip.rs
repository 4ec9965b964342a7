//! Public/non-public classification of IP addresses.
//!
//! Documentation prefixes (192.0.2.0/24, 2001:db8::/32 and friends) count as
//! public: they never route, so connecting to them only ever times out.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// IPv4 blocks that must never be dialed, as (network, prefix length).
const BLOCKED_V4: [(Ipv4Addr, u8); 10] = [
    (Ipv4Addr::new(0, 0, 0, 0), 8),      // this network
    (Ipv4Addr::new(10, 0, 0, 0), 8),     // RFC 1918
    (Ipv4Addr::new(100, 64, 0, 0), 10),  // carrier-grade NAT
    (Ipv4Addr::new(127, 0, 0, 0), 8),    // loopback
    (Ipv4Addr::new(169, 254, 0, 0), 16), // link-local, cloud metadata
    (Ipv4Addr::new(172, 16, 0, 0), 12),  // RFC 1918
    (Ipv4Addr::new(192, 168, 0, 0), 16), // RFC 1918
    (Ipv4Addr::new(198, 18, 0, 0), 15),  // benchmarking
    (Ipv4Addr::new(224, 0, 0, 0), 4),    // multicast
    (Ipv4Addr::new(240, 0, 0, 0), 4),    // reserved, broadcast
];

/// IPv6 blocks that must never be dialed, as (network, prefix length).
/// IPv4-mapped addresses are handled separately.
const BLOCKED_V6: [(Ipv6Addr, u8); 5] = [
    (Ipv6Addr::UNSPECIFIED, 128),
    (Ipv6Addr::LOCALHOST, 128),
    (Ipv6Addr::new(0xfc00, 0, 0, 0, 0, 0, 0, 0), 7), // unique local
    (Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 0), 10), // link-local
    (Ipv6Addr::new(0xff00, 0, 0, 0, 0, 0, 0, 0), 8), // multicast
];

/// Whether `ip` is routable on the public internet.
///
/// IPv4-mapped IPv6 addresses are judged by their IPv4 form.
pub fn is_public_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_public_v4(v4),
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => is_public_v4(v4),
            None => !BLOCKED_V6
                .iter()
                .any(|&(net, len)| in_prefix(v6.to_bits(), net.to_bits(), len, 128)),
        },
    }
}

fn is_public_v4(ip: Ipv4Addr) -> bool {
    !BLOCKED_V4.iter().any(|&(net, len)| {
        in_prefix(u128::from(ip.to_bits()), u128::from(net.to_bits()), len, 32)
    })
}

/// Whether the top `len` of `width` bits of `addr` and `net` agree.
fn in_prefix(addr: u128, net: u128, len: u8, width: u32) -> bool {
    let host_bits = width - u32::from(len);
    if host_bits >= 128 {
        return true;
    }
    (addr >> host_bits) == (net >> host_bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn public(s: &str) -> bool {
        is_public_ip(s.parse().unwrap())
    }

    #[test]
    fn test_blocked_ipv4() {
        for ip in [
            "127.0.0.1",
            "10.0.0.1",
            "172.16.0.1",
            "172.31.255.255",
            "192.168.1.1",
            "169.254.169.254",
            "100.64.0.1",
            "100.127.255.255",
            "198.19.0.1",
            "0.0.0.0",
            "224.0.0.1",
            "255.255.255.255",
        ] {
            assert!(!public(ip), "{ip}");
        }
    }

    #[test]
    fn test_public_ipv4_edges() {
        for ip in [
            "8.8.8.8",
            "172.32.0.1",
            "172.15.255.255",
            "100.128.0.1",
            "198.20.0.1",
            "192.0.2.1",
            "203.0.113.1",
            "223.255.255.255",
        ] {
            assert!(public(ip), "{ip}");
        }
    }

    #[test]
    fn test_ipv6() {
        for ip in ["::", "::1", "fc00::1", "fdff::1", "fe80::1", "febf::1", "ff02::1"] {
            assert!(!public(ip), "{ip}");
        }
        for ip in ["2001:db8::1", "2607:f8b0:4004:800::200e", "fec0::1", "::2"] {
            assert!(public(ip), "{ip}");
        }
    }

    #[test]
    fn test_ipv4_mapped_uses_ipv4_rules() {
        assert!(!public("::ffff:127.0.0.1"));
        assert!(!public("::ffff:100.64.1.1"));
        assert!(public("::ffff:8.8.8.8"));
    }

    #[test]
    fn test_prefix_matching() {
        assert!(in_prefix(0xFFFF, 0, 0, 32));
        assert!(in_prefix(0x0A01_0203, 0x0A00_0000, 8, 32));
        assert!(!in_prefix(0x0B00_0000, 0x0A00_0000, 8, 32));
        assert!(in_prefix(1, 1, 128, 128));
        assert!(!in_prefix(2, 1, 128, 128));
    }
}
