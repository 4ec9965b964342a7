//! X.509 v3 extension extraction.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use asn1_rs::{FromDer, Oid};
use x509_parser::certificate::X509Certificate;
use x509_parser::extensions::{DistributionPointName, GeneralName, ParsedExtension};

use super::labels::extended_key_usage_label;

const OID_ACCESS_OCSP: &str = "1.3.6.1.5.5.7.48.1";
const OID_ACCESS_CA_ISSUERS: &str = "1.3.6.1.5.5.7.48.2";

/// Extension values gathered in a single pass over a certificate.
#[derive(Debug, Default)]
pub(crate) struct ExtensionSummary {
    pub is_ca: bool,
    /// Key usage bitmask, bit 0 = digitalSignature. Zero when absent.
    pub key_usage: u16,
    pub extended_key_usages: Vec<String>,
    pub dns_names: Vec<String>,
    pub ip_addresses: Vec<String>,
    pub subject_key_id: Vec<u8>,
    pub authority_key_id: Vec<u8>,
    pub crl_endpoints: Vec<String>,
    pub ocsp_servers: Vec<String>,
    pub issuing_certificate_urls: Vec<String>,
}

impl ExtensionSummary {
    /// Subject alternative names: DNS names first, then IP addresses.
    pub fn subject_alternative_names(&self) -> Vec<String> {
        self.dns_names
            .iter()
            .chain(self.ip_addresses.iter())
            .cloned()
            .collect()
    }
}

/// Walks the certificate's extensions. Unparseable extensions are skipped.
pub(crate) fn summarize_extensions(cert: &X509Certificate<'_>) -> ExtensionSummary {
    let mut summary = ExtensionSummary::default();

    for ext in cert.extensions() {
        match ext.parsed_extension() {
            ParsedExtension::BasicConstraints(constraints) => {
                summary.is_ca = constraints.ca;
            }
            ParsedExtension::KeyUsage(usage) => {
                summary.key_usage = usage.flags;
            }
            // The parsed form only keeps one flag per well-known purpose, so the
            // raw value is decoded to keep certificate order and unknown OIDs.
            ParsedExtension::ExtendedKeyUsage(_) => {
                summary.extended_key_usages = extended_key_usage_oids(ext.value)
                    .iter()
                    .map(|oid| extended_key_usage_label(oid).to_string())
                    .collect();
            }
            ParsedExtension::SubjectAlternativeName(san) => {
                for name in &san.general_names {
                    match name {
                        GeneralName::DNSName(dns) => summary.dns_names.push(dns.to_string()),
                        GeneralName::IPAddress(bytes) => {
                            if let Some(ip) = ip_from_bytes(bytes) {
                                summary.ip_addresses.push(ip.to_string());
                            }
                        }
                        _ => {}
                    }
                }
            }
            ParsedExtension::SubjectKeyIdentifier(id) => {
                summary.subject_key_id = id.0.to_vec();
            }
            ParsedExtension::AuthorityKeyIdentifier(aki) => {
                if let Some(id) = &aki.key_identifier {
                    summary.authority_key_id = id.0.to_vec();
                }
            }
            ParsedExtension::CRLDistributionPoints(points) => {
                for point in points.iter() {
                    if let Some(DistributionPointName::FullName(names)) = &point.distribution_point
                    {
                        summary.crl_endpoints.extend(uris(names));
                    }
                }
            }
            ParsedExtension::AuthorityInfoAccess(aia) => {
                for access in &aia.accessdescs {
                    let GeneralName::URI(uri) = &access.access_location else {
                        continue;
                    };
                    match access.access_method.to_id_string().as_str() {
                        OID_ACCESS_OCSP => summary.ocsp_servers.push(uri.to_string()),
                        OID_ACCESS_CA_ISSUERS => {
                            summary.issuing_certificate_urls.push(uri.to_string())
                        }
                        _ => {}
                    }
                }
            }
            ParsedExtension::ParseError { error } => {
                log::debug!("Skipping unparseable extension {}: {error:?}", ext.oid);
            }
            _ => {}
        }
    }

    summary
}

/// Decodes `ExtKeyUsageSyntax ::= SEQUENCE OF KeyPurposeId` into dotted OIDs.
fn extended_key_usage_oids(value: &[u8]) -> Vec<String> {
    match <Vec<Oid<'_>> as FromDer<'_>>::from_der(value) {
        Ok((_, oids)) => oids.iter().map(|oid| oid.to_id_string()).collect(),
        Err(e) => {
            log::debug!("Unreadable extended key usage extension: {e}");
            Vec::new()
        }
    }
}

fn uris<'a>(names: &'a [GeneralName<'a>]) -> impl Iterator<Item = String> + 'a {
    names.iter().filter_map(|name| match name {
        GeneralName::URI(uri) => Some(uri.to_string()),
        _ => None,
    })
}

/// IPv4-mapped IPv6 addresses are rendered in dotted IPv4 form.
fn ip_from_bytes(bytes: &[u8]) -> Option<IpAddr> {
    match bytes.len() {
        4 => {
            let octets: [u8; 4] = bytes.try_into().ok()?;
            Some(IpAddr::V4(Ipv4Addr::from(octets)))
        }
        16 => {
            let octets: [u8; 16] = bytes.try_into().ok()?;
            let v6 = Ipv6Addr::from(octets);
            Some(match v6.to_ipv4_mapped() {
                Some(v4) => IpAddr::V4(v4),
                None => IpAddr::V6(v6),
            })
        }
        other => {
            log::debug!("Ignoring IP address SAN of {other} bytes");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ip_from_bytes() {
        assert_eq!(
            ip_from_bytes(&[192, 0, 2, 10]).map(|ip| ip.to_string()),
            Some("192.0.2.10".to_string())
        );
        let v6 = [0x20, 0x01, 0x0d, 0xb8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1];
        assert_eq!(
            ip_from_bytes(&v6).map(|ip| ip.to_string()),
            Some("2001:db8::1".to_string())
        );
        assert!(ip_from_bytes(&[1, 2, 3]).is_none());
    }

    #[test]
    fn test_ipv4_mapped_renders_as_ipv4() {
        let mapped = [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xff, 0xff, 198, 51, 100, 7];
        assert_eq!(
            ip_from_bytes(&mapped).map(|ip| ip.to_string()),
            Some("198.51.100.7".to_string())
        );
    }

    #[test]
    fn test_extended_key_usage_oids_keep_order() {
        // SEQUENCE { clientAuth, serverAuth }
        let der = [
            0x30, 0x14, 0x06, 0x08, 0x2b, 0x06, 0x01, 0x05, 0x05, 0x07, 0x03, 0x02, 0x06, 0x08,
            0x2b, 0x06, 0x01, 0x05, 0x05, 0x07, 0x03, 0x01,
        ];
        assert_eq!(
            extended_key_usage_oids(&der),
            vec!["1.3.6.1.5.5.7.3.2", "1.3.6.1.5.5.7.3.1"]
        );
    }

    #[test]
    fn test_extended_key_usage_oids_garbage() {
        assert!(extended_key_usage_oids(&[0x04, 0x01]).is_empty());
    }

    #[test]
    fn test_subject_alternative_names_order() {
        let summary = ExtensionSummary {
            dns_names: vec!["a.test".into(), "b.test".into()],
            ip_addresses: vec!["192.0.2.1".into()],
            ..Default::default()
        };
        assert_eq!(
            summary.subject_alternative_names(),
            vec!["a.test", "b.test", "192.0.2.1"]
        );
    }
}
