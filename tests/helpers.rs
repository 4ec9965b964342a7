// Shared test helpers for loading certificate fixtures.

use std::path::PathBuf;

/// Path of a file under `tests/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// PEM text of a fixture.
pub fn fixture_pem(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|e| panic!("Failed to read fixture {name}: {e}"))
}

/// DER bytes of a single-certificate PEM fixture.
#[allow(dead_code)] // Used by other test files
pub fn fixture_der(name: &str) -> Vec<u8> {
    pem::parse(fixture_pem(name))
        .unwrap_or_else(|e| panic!("Fixture {name} is not PEM: {e}"))
        .into_contents()
}

/// Leaf, intermediate and root of the reference chain, leaf first.
#[allow(dead_code)] // Used by other test files
pub const REFERENCE_CHAIN: [&str; 3] = [
    "leaf_ed25519.pem",
    "intermediate_p256.pem",
    "root_rsa.pem",
];
