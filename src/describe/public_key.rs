//! Public key extraction, dispatched on the SubjectPublicKeyInfo algorithm.

use asn1_rs::Oid;
use strum_macros::IntoStaticStr;
use x509_parser::public_key::PublicKey;
use x509_parser::x509::SubjectPublicKeyInfo;

use super::format::{format_id, trim_leading_zeros};
use super::types::PublicKeyInfo;

/// Ed25519 public keys are always 32 bytes.
const ED25519_KEY_BITS: u32 = 256;

/// Public key algorithms recognized from the SubjectPublicKeyInfo OID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
pub enum PublicKeyAlgorithm {
    /// rsaEncryption
    #[strum(serialize = "RSA")]
    Rsa,
    /// id-dsa. Named, but its key material is not extracted.
    #[strum(serialize = "DSA")]
    Dsa,
    /// id-ecPublicKey
    #[strum(serialize = "ECDSA")]
    Ecdsa,
    /// id-Ed25519
    #[strum(serialize = "Ed25519")]
    Ed25519,
    /// Anything else; reported by its OID.
    Unknown,
}

impl PublicKeyAlgorithm {
    /// Maps a dotted algorithm OID to an algorithm.
    pub fn from_oid(oid: &str) -> Self {
        match oid {
            "1.2.840.113549.1.1.1" => Self::Rsa,
            "1.2.840.10040.4.1" => Self::Dsa,
            "1.2.840.10045.2.1" => Self::Ecdsa,
            "1.3.101.112" => Self::Ed25519,
            _ => Self::Unknown,
        }
    }
}

/// Describes the subject public key.
///
/// Unsupported algorithms degrade to size 0 and an empty value; the algorithm
/// name is still reported.
pub(crate) fn describe_public_key(spki: &SubjectPublicKeyInfo<'_>) -> PublicKeyInfo {
    let oid = spki.algorithm.algorithm.to_id_string();
    let algorithm = PublicKeyAlgorithm::from_oid(&oid);
    let key_bytes: &[u8] = &spki.subject_public_key.data;

    let (size, value) = match algorithm {
        PublicKeyAlgorithm::Rsa => rsa_key_size(spki)
            .map(|size| (size, key_bytes))
            .unwrap_or((0, &[][..])),
        PublicKeyAlgorithm::Ecdsa => (ec_key_size(spki, key_bytes), key_bytes),
        PublicKeyAlgorithm::Ed25519 => (ED25519_KEY_BITS, key_bytes),
        PublicKeyAlgorithm::Dsa | PublicKeyAlgorithm::Unknown => (0, &[][..]),
    };

    let name = match algorithm {
        PublicKeyAlgorithm::Unknown => oid,
        known => <&'static str>::from(known).to_string(),
    };

    PublicKeyInfo {
        algorithm: name,
        size,
        value: format_id(value),
    }
}

/// Bit length of the RSA modulus. The key bytes are already the PKCS#1
/// `RSAPublicKey` structure, so only the modulus needs decoding.
fn rsa_key_size(spki: &SubjectPublicKeyInfo<'_>) -> Option<u32> {
    match spki.parsed() {
        Ok(PublicKey::RSA(rsa)) => Some(bit_length(rsa.modulus)),
        Ok(_) => None,
        Err(e) => {
            log::debug!("Unreadable RSA public key: {e}");
            None
        }
    }
}

/// Nominal size of the named curve, or the coordinate width when the curve is
/// not one of the NIST prime curves.
fn ec_key_size(spki: &SubjectPublicKeyInfo<'_>, point: &[u8]) -> u32 {
    let curve = spki
        .algorithm
        .parameters
        .as_ref()
        .and_then(|params| Oid::try_from(params.clone()).ok())
        .map(|oid| oid.to_id_string());

    match curve.as_deref() {
        Some("1.3.132.0.33") => 224,
        Some("1.2.840.10045.3.1.7") => 256,
        Some("1.3.132.0.34") => 384,
        Some("1.3.132.0.35") => 521,
        _ => {
            // Uncompressed point: 0x04 || X || Y
            let coordinate_len = point.len().saturating_sub(1) / 2;
            (coordinate_len * 8) as u32
        }
    }
}

/// Bit length of a big-endian unsigned integer.
fn bit_length(be: &[u8]) -> u32 {
    let magnitude = trim_leading_zeros(be);
    match magnitude.first() {
        Some(first) => (magnitude.len() as u32 - 1) * 8 + (8 - first.leading_zeros()),
        None => 0,
    }
}
