//! Build script for admin crate.
//!
//! Fingerprints the static assets referenced from the base layout so they
//! can be served with long cache lifetimes.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

fn main() {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");
    let static_dir = Path::new(&manifest_dir).join("static");

    fingerprint(&static_dir, "css/admin.css", "CSS_HASH");
    fingerprint(&static_dir, "js/admin.js", "JS_HASH");
}

/// Hash an asset and export the first 8 hex chars as `env_var`.
///
/// Templates append the hash as a `?v=` query so browsers refetch the asset
/// whenever its content changes.
fn fingerprint(static_dir: &Path, relative: &str, env_var: &str) {
    let path = static_dir.join(relative);
    println!("cargo:rerun-if-changed={}", path.display());

    let content = match fs::read(&path) {
        Ok(content) => content,
        Err(e) => {
            println!("cargo:warning=Could not read {relative}: {e}");
            println!("cargo:rustc-env={env_var}=");
            return;
        }
    };

    let digest = format!("{:x}", Sha256::digest(&content));
    let short = digest.get(..8).unwrap_or(&digest);
    println!("cargo:rustc-env={env_var}={short}");
}
