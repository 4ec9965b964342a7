//! Verified path recovery.
//!
//! rustls verifies the presented certificates during the handshake but only
//! exposes them as the server sent them: in the server's order, possibly with
//! certificates that play no part in the path, and usually without the root.
//! The same path building is replayed here against the same anchors to get
//! the chain that was actually trusted: leaf, the intermediates it went
//! through, then the trust anchor.

use std::sync::Arc;

use log::{debug, warn};
use rustls::crypto::ring::default_provider;
use rustls::pki_types::{CertificateDer, TrustAnchor, UnixTime};
use rustls::RootCertStore;
use webpki::{anchor_from_trusted_cert, EndEntityCert, KeyUsage};

/// Trust anchors, plus the full certificate of each anchor where it is known.
///
/// `webpki-roots` ships only the subject and key of each root, so for those
/// the anchor certificate is reported only if the server presented it.
pub(crate) struct TrustAnchors {
    store: Arc<RootCertStore>,
    certificates: Vec<(TrustAnchor<'static>, CertificateDer<'static>)>,
}

impl TrustAnchors {
    /// The Mozilla root program from `webpki-roots`.
    pub(crate) fn webpki_roots() -> Self {
        let mut store = RootCertStore::empty();
        store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        Self {
            store: Arc::new(store),
            certificates: Vec::new(),
        }
    }

    /// Trusts exactly `certificates`. Ones that cannot serve as an anchor are
    /// skipped with a warning.
    pub(crate) fn from_certificates(
        certificates: impl IntoIterator<Item = CertificateDer<'static>>,
    ) -> Self {
        let mut store = RootCertStore::empty();
        let mut known = Vec::new();
        for der in certificates {
            let anchor = anchor_from_trusted_cert(&der).map(|anchor| anchor.to_owned());
            match anchor {
                Ok(anchor) => {
                    store.roots.push(anchor.clone());
                    known.push((anchor, der));
                }
                Err(e) => warn!("Ignoring unusable trust anchor: {e}"),
            }
        }
        Self {
            store: Arc::new(store),
            certificates: known,
        }
    }

    pub(crate) fn store(&self) -> Arc<RootCertStore> {
        Arc::clone(&self.store)
    }

    pub(crate) fn len(&self) -> usize {
        self.store.roots.len()
    }

    fn certificate_for(&self, anchor: &TrustAnchor<'_>) -> Option<&CertificateDer<'static>> {
        self.certificates
            .iter()
            .find(|(known, _)| same_anchor(known, anchor))
            .map(|(_, der)| der)
    }
}

/// Rebuilds the verified chain from the certificates a server presented.
///
/// Returns the leaf, the intermediates on the verified path in issuing order,
/// and the anchor's certificate when it is known or was presented. Presented
/// certificates that are not on the path are dropped.
///
/// # Errors
///
/// Returns the path building error if no path to an anchor exists.
pub(crate) fn verified_chain(
    presented: &[CertificateDer<'static>],
    anchors: &TrustAnchors,
) -> Result<Vec<CertificateDer<'static>>, webpki::Error> {
    let Some((leaf, rest)) = presented.split_first() else {
        return Ok(Vec::new());
    };

    let end_entity = EndEntityCert::try_from(leaf)?;
    let path = end_entity.verify_for_usage(
        default_provider().signature_verification_algorithms.all,
        &anchors.store.roots,
        rest,
        UnixTime::now(),
        KeyUsage::server_auth(),
        None,
        None,
    )?;

    let mut chain = vec![leaf.clone()];
    chain.extend(
        path.intermediate_certificates()
            .map(|cert| cert.der().into_owned()),
    );

    match anchor_certificate(path.anchor(), anchors, presented) {
        Some(root) if !chain.contains(&root) => chain.push(root),
        Some(_) => {}
        None => debug!("Anchor certificate unavailable; chain ends below the root"),
    }

    if chain.len() != presented.len() || chain.iter().zip(presented).any(|(a, b)| a != b) {
        debug!(
            "Verified chain has {} certificate(s); server presented {}",
            chain.len(),
            presented.len()
        );
    }
    Ok(chain)
}

/// The full certificate of `anchor`: from the trust store if it has it,
/// otherwise the presented certificate with the same subject and key.
fn anchor_certificate(
    anchor: &TrustAnchor<'_>,
    anchors: &TrustAnchors,
    presented: &[CertificateDer<'static>],
) -> Option<CertificateDer<'static>> {
    if let Some(der) = anchors.certificate_for(anchor) {
        return Some(der.clone());
    }
    presented
        .iter()
        .find(|der| {
            anchor_from_trusted_cert(der).is_ok_and(|candidate| same_anchor(&candidate, anchor))
        })
        .cloned()
}

fn same_anchor(a: &TrustAnchor<'_>, b: &TrustAnchor<'_>) -> bool {
    a.subject.as_ref() == b.subject.as_ref()
        && a.subject_public_key_info.as_ref() == b.subject_public_key_info.as_ref()
}
