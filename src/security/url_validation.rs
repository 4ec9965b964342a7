//! Target URL validation and SSRF protection.
//!
//! A target is accepted only if it is an `https` URL with a host. Unless
//! private hosts are explicitly allowed, localhost names and non-public IP
//! literals are rejected before any connection is attempted. Names that
//! resolve to non-public addresses are caught later by the fetcher.

use std::net::IpAddr;

use url::{Host, Url};

use crate::config::HTTPS_DEFAULT_PORT;
use crate::error_handling::RequestError;

use super::ip::is_public_ip;

/// Host and port of an HTTPS endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// DNS name (lowercased, IDNA-encoded) or IP literal without brackets
    pub host: String,
    /// Explicit port, or 443
    pub port: u16,
}

/// Parses an `https` URL into its connection target.
///
/// Path, query and fragment are ignored.
///
/// # Errors
///
/// - `RequestError::InvalidUrl` if the string is not an absolute URL
/// - `RequestError::NotHttps` for any other scheme
/// - `RequestError::MissingHost` if the URL has no host
///
/// # Examples
///
/// ```
/// use certinfo::security::parse_https_target;
///
/// let target = parse_https_target("https://Example.com:8443/path").unwrap();
/// assert_eq!(target.host, "example.com");
/// assert_eq!(target.port, 8443);
///
/// assert!(parse_https_target("http://example.com").is_err());
/// ```
pub fn parse_https_target(url_str: &str) -> Result<Target, RequestError> {
    let url = Url::parse(url_str.trim())?;

    if url.scheme() != "https" {
        return Err(RequestError::NotHttps(url.scheme().to_string()));
    }

    let host = match url.host() {
        Some(Host::Domain(domain)) if !domain.is_empty() => domain.to_string(),
        Some(Host::Ipv4(ip)) => ip.to_string(),
        Some(Host::Ipv6(ip)) => ip.to_string(),
        _ => return Err(RequestError::MissingHost),
    };

    Ok(Target {
        host,
        port: url.port_or_known_default().unwrap_or(HTTPS_DEFAULT_PORT),
    })
}

/// Rejects localhost names and non-public IP literals.
///
/// # Errors
///
/// Returns `RequestError::UnsafeTarget` naming the rejected host.
pub fn ensure_public_target(target: &Target) -> Result<(), RequestError> {
    if let Ok(ip) = target.host.parse::<IpAddr>() {
        if !is_public_ip(ip) {
            return Err(RequestError::UnsafeTarget(format!(
                "non-public address {ip}"
            )));
        }
    } else if is_localhost_domain(&target.host) {
        return Err(RequestError::UnsafeTarget(format!(
            "localhost domain {}",
            target.host
        )));
    }
    Ok(())
}

/// Checks if a domain name is a localhost variant.
fn is_localhost_domain(domain: &str) -> bool {
    let domain_lower = domain.to_lowercase();
    matches!(
        domain_lower.as_str(),
        "localhost" | "localhost." | "localhost.localdomain" | "localhost.localdomain."
    ) || domain_lower.ends_with(".localhost")
        || domain_lower.ends_with(".localhost.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn target(host: &str) -> Target {
        Target {
            host: host.to_string(),
            port: 443,
        }
    }

    #[test]
    fn test_parse_https_target_defaults_port() {
        assert_eq!(
            parse_https_target("https://example.com").unwrap(),
            target("example.com")
        );
        assert_eq!(
            parse_https_target("https://example.com:443/a?b=c#d").unwrap(),
            target("example.com")
        );
    }

    #[test]
    fn test_parse_https_target_explicit_port_and_case() {
        let t = parse_https_target("  HTTPS://WWW.Example.COM:8443/ ").unwrap();
        assert_eq!(t.host, "www.example.com");
        assert_eq!(t.port, 8443);
    }

    #[test]
    fn test_parse_https_target_ip_literals() {
        assert_eq!(
            parse_https_target("https://192.0.2.1").unwrap().host,
            "192.0.2.1"
        );
        assert_eq!(
            parse_https_target("https://[2001:db8::1]:9443").unwrap(),
            Target {
                host: "2001:db8::1".into(),
                port: 9443
            }
        );
    }

    #[test]
    fn test_parse_https_target_rejects_other_schemes() {
        for url in [
            "http://example.com",
            "ftp://example.com",
            "file:///etc/passwd",
            "javascript:alert(1)",
        ] {
            assert!(
                matches!(parse_https_target(url), Err(RequestError::NotHttps(_))),
                "{url}"
            );
        }
    }

    #[test]
    fn test_parse_https_target_rejects_unparseable() {
        for url in ["", "not-a-url", "example.com", "https://exa mple.com"] {
            assert!(
                matches!(parse_https_target(url), Err(RequestError::InvalidUrl(_))),
                "{url}"
            );
        }
    }

    #[test]
    fn test_ensure_public_target_allows_public() {
        assert!(ensure_public_target(&target("example.com")).is_ok());
        assert!(ensure_public_target(&target("192.0.2.1")).is_ok());
        assert!(ensure_public_target(&target("2001:db8::1")).is_ok());
        assert!(ensure_public_target(&target("localhost.example.com")).is_ok());
    }

    #[test]
    fn test_ensure_public_target_blocks_private() {
        for host in [
            "127.0.0.1",
            "10.0.0.1",
            "172.16.0.1",
            "192.168.1.1",
            "169.254.169.254",
            "0.0.0.0",
            "::1",
            "fe80::1",
            "fc00::1",
            "::ffff:10.0.0.1",
            "localhost",
            "localhost.localdomain",
            "api.localhost",
        ] {
            assert!(
                matches!(
                    ensure_public_target(&target(host)),
                    Err(RequestError::UnsafeTarget(_))
                ),
                "{host}"
            );
        }
    }

    #[test]
    fn test_parsed_loopback_url_is_unsafe() {
        let t = parse_https_target("https://[::1]:8443").unwrap();
        assert!(ensure_public_target(&t).is_err());
    }

    proptest! {
        #[test]
        fn test_ten_slash_eight_always_blocked(b in any::<u8>(), c in any::<u8>(), d in any::<u8>()) {
            let t = parse_https_target(&format!("https://10.{b}.{c}.{d}/")).unwrap();
            prop_assert!(ensure_public_target(&t).is_err());
        }

        #[test]
        fn test_explicit_port_round_trips(port in 1u16..=u16::MAX) {
            let t = parse_https_target(&format!("https://example.com:{port}")).unwrap();
            prop_assert_eq!(t.port, port);
        }
    }
}
