//! Fixed label tables for key usage, extended key usage and signature algorithms.
//!
//! Tables are built once on first access and only read afterwards. Every lookup
//! that has no match yields an empty string.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use x509_parser::signature_algorithm::SignatureAlgorithm;
use x509_parser::x509::AlgorithmIdentifier;

/// RSASSA-PSS signature algorithm OID; its label depends on the hash parameter.
const OID_RSASSA_PSS: &str = "1.2.840.113549.1.1.10";
/// Hash used by RSASSA-PSS when the parameters omit it (RFC 4055).
const OID_SHA1: &str = "1.3.14.3.2.26";

/// Key usage bitmask (bit 0 = digitalSignature) to label, matched by exact value.
static KEY_USAGE_LABELS: Lazy<HashMap<u16, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (1 << 0, "Digital Signature"),
        (1 << 1, "Content Commitment"),
        (1 << 2, "Key Encipherment"),
        (1 << 3, "Data Encipherment"),
        (1 << 4, "Key Agreement"),
        (1 << 5, "Certificate Signing"),
        (1 << 6, "CRL Signing"),
        (1 << 7, "Encipher Only"),
        (1 << 8, "Decipher Only"),
    ])
});

static EXTENDED_KEY_USAGE_LABELS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("2.5.29.37.0", "Any"),
        ("1.3.6.1.5.5.7.3.1", "Server Authentication"),
        ("1.3.6.1.5.5.7.3.2", "Client Authentication"),
        ("1.3.6.1.5.5.7.3.3", "Code Signing"),
        ("1.3.6.1.5.5.7.3.4", "Email Protection"),
        ("1.3.6.1.5.5.7.3.5", "IPSEC End System Certificate"),
        ("1.3.6.1.5.5.7.3.6", "IPSEC Tunnel Certificate"),
        ("1.3.6.1.5.5.7.3.7", "IPSEC User Certificate"),
        ("1.3.6.1.5.5.7.3.8", "Time Stamping"),
        ("1.3.6.1.5.5.7.3.9", "Sign OCSP Responses"),
    ])
});

static SIGNATURE_ALGORITHM_LABELS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("1.2.840.113549.1.1.5", "SHA-1 with RSA Encryption"),
        ("1.2.840.113549.1.1.11", "SHA-256 with RSA Encryption"),
        ("1.2.840.113549.1.1.12", "SHA-384 with RSA Encryption"),
        ("1.2.840.113549.1.1.13", "SHA-512 with RSA Encryption"),
        ("1.2.840.10045.4.1", "ECDSA with SHA-1"),
        ("1.2.840.10045.4.3.2", "ECDSA with SHA-256"),
        ("1.2.840.10045.4.3.3", "ECDSA with SHA-384"),
        ("1.2.840.10045.4.3.4", "ECDSA with SHA-512"),
        ("1.3.101.112", "ED25519"),
    ])
});

/// RSASSA-PSS labels keyed by the hash algorithm OID from the parameters.
static RSA_PSS_LABELS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("2.16.840.1.101.3.4.2.1", "SHA-256 with RSA PSS Encryption"),
        ("2.16.840.1.101.3.4.2.2", "SHA-384 with RSA PSS Encryption"),
        ("2.16.840.1.101.3.4.2.3", "SHA-512 with RSA PSS Encryption"),
    ])
});

/// Label for a key usage bitmask.
///
/// Only masks with exactly one known bit set have a label; a certificate
/// asserting several usages (e.g. `digitalSignature | keyEncipherment`) gets an
/// empty label.
pub fn key_usage_label(flags: u16) -> &'static str {
    KEY_USAGE_LABELS.get(&flags).copied().unwrap_or_default()
}

/// Label for an extended key usage OID in dotted form.
pub fn extended_key_usage_label(oid: &str) -> &'static str {
    EXTENDED_KEY_USAGE_LABELS
        .get(oid)
        .copied()
        .unwrap_or_default()
}

/// Label for a certificate's signature algorithm.
pub fn signature_algorithm_label(algorithm: &AlgorithmIdentifier<'_>) -> &'static str {
    let oid = algorithm.algorithm.to_id_string();
    if oid == OID_RSASSA_PSS {
        return rsa_pss_label(algorithm);
    }
    SIGNATURE_ALGORITHM_LABELS
        .get(oid.as_str())
        .copied()
        .unwrap_or_default()
}

fn rsa_pss_label(algorithm: &AlgorithmIdentifier<'_>) -> &'static str {
    let hash_oid = match SignatureAlgorithm::try_from(algorithm) {
        Ok(SignatureAlgorithm::RSASSA_PSS(params)) => params
            .hash_algorithm()
            .map(|hash| hash.algorithm.to_id_string())
            .unwrap_or_else(|| OID_SHA1.to_string()),
        Ok(_) => return "",
        Err(e) => {
            log::debug!("Unreadable RSASSA-PSS parameters: {e}");
            return "";
        }
    };
    RSA_PSS_LABELS
        .get(hash_oid.as_str())
        .copied()
        .unwrap_or_default()
}
