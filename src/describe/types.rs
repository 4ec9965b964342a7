//! Serializable certificate description types.
//!
//! Field names follow the JSON contract of the `/certs` endpoint. Empty
//! optional fields are omitted from the serialized output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Normalized description of a single X.509 certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRecord {
    /// Subject distinguished name
    pub subject: Name,
    /// Issuer distinguished name
    pub issuer: Name,
    /// Start of the validity window (UTC)
    pub not_before: DateTime<Utc>,
    /// End of the validity window (UTC)
    pub not_after: DateTime<Utc>,
    /// DNS names followed by IP addresses from the SAN extension
    #[serde(rename = "sans", default, skip_serializing_if = "Vec::is_empty")]
    pub subject_alternative_names: Vec<String>,
    /// Subject public key
    #[serde(rename = "pub_key_info")]
    pub public_key_info: PublicKeyInfo,
    /// Serial, signature algorithm, version and PEM
    pub misc: Miscellaneous,
    /// SHA-256 over the DER bytes
    #[serde(rename = "sha256")]
    pub fingerprint_sha256: String,
    /// SHA-1 over the DER bytes
    #[serde(rename = "sha1")]
    pub fingerprint_sha1: String,
    /// Basic constraints CA flag
    #[serde(rename = "ca")]
    pub is_certificate_authority: bool,
    /// Key usage label, empty unless exactly one known usage bit is set
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub key_usage: String,
    /// One label per extended key usage OID, in certificate order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extended_key_usages: Vec<String>,
    /// Subject key identifier
    pub subject_key_id: String,
    /// Authority key identifier
    pub authority_key_id: String,
    /// CRL distribution point URIs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub crl_endpoints: Vec<String>,
    /// OCSP responder URIs
    #[serde(rename = "ocsp_server", default, skip_serializing_if = "Vec::is_empty")]
    pub ocsp_servers: Vec<String>,
    /// CA issuer certificate URIs
    #[serde(
        rename = "issuing_cert_url",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub issuing_certificate_urls: Vec<String>,
}

/// Flattened distinguished name. Multi-valued components are joined with `,`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    /// Country (C)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub country: String,
    /// State or province (ST)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub state_province: String,
    /// Locality (L)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub locality: String,
    /// Organization (O)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub organization: String,
    /// Organizational unit (OU)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub organizational_unit: String,
    /// Common name (CN)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub common_name: String,
}

/// Public key summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyInfo {
    /// Algorithm name (`RSA`, `ECDSA`, `Ed25519`, `DSA`) or the dotted OID
    pub algorithm: String,
    /// Key size in bits; 0 for unsupported algorithms
    pub size: u32,
    /// Key material as colon-delimited hex; empty for unsupported algorithms
    pub value: String,
}

/// Remaining certificate properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Miscellaneous {
    /// Serial number magnitude as colon-delimited hex
    pub serial_number: String,
    /// Signature algorithm label, empty when unrecognized
    pub signature_algorithm: String,
    /// Certificate format version (1, 2 or 3)
    pub version: u32,
    /// The certificate as a PEM block
    pub pem: String,
}

/// A described chain: records in input order plus the concatenated PEM chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainDescription {
    /// One record per certificate, leaf first
    pub certs: Vec<CertificateRecord>,
    /// PEM blocks of the same certificates, concatenated
    pub cert_chain: String,
}
