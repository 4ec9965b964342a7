//! Certificate description.
//!
//! Turns DER-encoded X.509 certificates into [`CertificateRecord`]s:
//! - Subject and issuer names
//! - Validity window
//! - Subject alternative names (DNS names, then IP addresses)
//! - Public key algorithm, size and key material
//! - Key usage, extended key usage, CA flag, key identifiers
//! - CRL, OCSP and CA issuer URLs
//! - SHA-256/SHA-1 fingerprints, serial number, signature algorithm, PEM
//!
//! Everything here is pure: no I/O and no shared mutable state. Uses
//! `x509-parser` for certificate parsing.

mod extensions;
mod format;
mod labels;
mod name;
mod public_key;
mod types;


use log::{debug, warn};
use x509_parser::certificate::X509Certificate;

use crate::error_handling::DescribeError;

pub use format::format_id;
pub use labels::{extended_key_usage_label, key_usage_label, signature_algorithm_label};
pub use public_key::PublicKeyAlgorithm;
pub use types::{CertificateRecord, ChainDescription, Miscellaneous, Name, PublicKeyInfo};

use extensions::summarize_extensions;
use format::{
    encode_certificate_pem, sha1_fingerprint, sha256_fingerprint, to_utc, trim_leading_zeros,
    PEM_CERTIFICATE_TAG,
};
use name::describe_name;
use public_key::describe_public_key;

/// Parses and describes a DER-encoded certificate.
///
/// # Errors
///
/// Returns `DescribeError::Parse` if the bytes are not an X.509 certificate.
/// Once parsed, no field can fail: unsupported or unknown values degrade to
/// empty strings.
pub fn describe(der: &[u8]) -> Result<CertificateRecord, DescribeError> {
    let (_, cert) =
        x509_parser::parse_x509_certificate(der).map_err(|e| DescribeError::Parse(e.to_string()))?;
    Ok(describe_certificate(der, &cert))
}

/// Describes an already parsed certificate.
///
/// `der` must be the exact bytes `cert` was parsed from; fingerprints and the
/// PEM block are computed over them.
pub fn describe_certificate(der: &[u8], cert: &X509Certificate<'_>) -> CertificateRecord {
    let extensions = summarize_extensions(cert);

    let record = CertificateRecord {
        subject: describe_name(cert.subject()),
        issuer: describe_name(cert.issuer()),
        not_before: to_utc(&cert.validity().not_before),
        not_after: to_utc(&cert.validity().not_after),
        subject_alternative_names: extensions.subject_alternative_names(),
        public_key_info: describe_public_key(cert.public_key()),
        misc: Miscellaneous {
            serial_number: format_id(trim_leading_zeros(cert.raw_serial())),
            signature_algorithm: signature_algorithm_label(&cert.signature_algorithm).to_string(),
            version: cert.version().0 + 1,
            pem: encode_certificate_pem(der),
        },
        fingerprint_sha256: sha256_fingerprint(der),
        fingerprint_sha1: sha1_fingerprint(der),
        is_certificate_authority: extensions.is_ca,
        key_usage: key_usage_label(extensions.key_usage).to_string(),
        extended_key_usages: extensions.extended_key_usages,
        subject_key_id: format_id(&extensions.subject_key_id),
        authority_key_id: format_id(&extensions.authority_key_id),
        crl_endpoints: extensions.crl_endpoints,
        ocsp_servers: extensions.ocsp_servers,
        issuing_certificate_urls: extensions.issuing_certificate_urls,
    };

    debug!(
        "Described certificate {} (serial {})",
        record.subject.common_name, record.misc.serial_number
    );
    record
}

/// Describes every `CERTIFICATE` block of a PEM bundle, in file order.
///
/// Blocks with other labels (keys, CRLs) are ignored.
///
/// # Errors
///
/// Returns `DescribeError::Pem` for malformed PEM and
/// `DescribeError::NoCertificates` if no certificate block is present.
pub fn describe_pem(text: &str) -> Result<ChainDescription, DescribeError> {
    let blocks = pem::parse_many(text).map_err(|e| DescribeError::Pem(e.to_string()))?;
    let certificates: Vec<Vec<u8>> = blocks
        .into_iter()
        .filter(|block| block.tag() == PEM_CERTIFICATE_TAG)
        .map(pem::Pem::into_contents)
        .collect();

    if certificates.is_empty() {
        return Err(DescribeError::NoCertificates);
    }
    Ok(describe_chain(&certificates))
}

/// Describes a certificate chain, preserving order.
///
/// Each certificate is handled independently: one that cannot be parsed is
/// logged and left out of both the records and the PEM chain, and the rest are
/// still described.
pub fn describe_chain<C: AsRef<[u8]>>(certificates: &[C]) -> ChainDescription {
    let mut chain = ChainDescription {
        certs: Vec::with_capacity(certificates.len()),
        cert_chain: String::new(),
    };

    for (position, der) in certificates.iter().enumerate() {
        match describe(der.as_ref()) {
            Ok(record) => {
                chain.cert_chain.push_str(&record.misc.pem);
                chain.certs.push(record);
            }
            Err(e) => warn!("Skipping certificate {position} of chain: {e}"),
        }
    }

    chain
}
