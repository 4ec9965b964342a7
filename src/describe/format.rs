//! Byte formatting helpers shared by every byte-sequence field of a record.

use chrono::{DateTime, Utc};
use pem::{EncodeConfig, LineEnding, Pem};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use x509_parser::time::ASN1Time;

/// PEM tag used for certificate blocks.
pub(crate) const PEM_CERTIFICATE_TAG: &str = "CERTIFICATE";

/// Formats bytes as uppercase hex pairs joined by `:`.
///
/// Used for serial numbers, key identifiers, fingerprints and raw key material.
/// An empty slice yields an empty string.
///
/// # Examples
///
/// ```
/// use certinfo::format_id;
///
/// assert_eq!(format_id(&[]), "");
/// assert_eq!(format_id(&[0x0A]), "0A");
/// assert_eq!(format_id(&[0x0A, 0xFF]), "0A:FF");
/// ```
pub fn format_id(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(":")
}

/// SHA-256 fingerprint of the DER bytes.
pub(crate) fn sha256_fingerprint(der: &[u8]) -> String {
    format_id(&Sha256::digest(der))
}

/// SHA-1 fingerprint of the DER bytes.
pub(crate) fn sha1_fingerprint(der: &[u8]) -> String {
    format_id(&Sha1::digest(der))
}

/// Wraps DER bytes in a `CERTIFICATE` PEM block (64-column lines, LF endings).
///
/// The block always ends with a newline, so blocks can be concatenated directly.
pub(crate) fn encode_certificate_pem(der: &[u8]) -> String {
    let config = EncodeConfig::new().set_line_ending(LineEnding::LF);
    pem::encode_config(&Pem::new(PEM_CERTIFICATE_TAG, der.to_vec()), config)
}

/// Big-endian magnitude without leading zero bytes. Zero becomes empty.
pub(crate) fn trim_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}

/// Converts an ASN.1 time to a UTC timestamp (second precision).
pub(crate) fn to_utc(time: &ASN1Time) -> DateTime<Utc> {
    DateTime::from_timestamp(time.timestamp(), 0).unwrap_or_default()
}
