//! SHA-256 verification of the downloaded image against the mirror's
//! `sha256sums.txt`.
//!
//! Digests are computed after the download completes, not inline with the
//! streaming path.

use crate::error::{FlashError, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const BUF_SIZE: usize = 64 * 1024;

/// Compute SHA-256 of a file and return the digest as lowercase hex.
/// Reads in chunks to keep memory use bounded; suitable for large files.
pub fn sha256_path(path: &Path) -> Result<String> {
    let mut f = File::open(path).map_err(|e| FlashError::io(path, e))?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        let n = f.read(&mut buf).map_err(|e| FlashError::io(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Digest listed for `filename` in `sha256sum`-style text (`<hex>  <name>`,
/// or `<hex> *<name>` for binary mode).
pub fn expected_digest(sums: &str, filename: &str) -> Option<String> {
    sums.lines().find_map(|line| {
        let (digest, name) = line.trim().split_once(char::is_whitespace)?;
        let name = name.trim_start();
        let name = name.strip_prefix('*').unwrap_or(name);
        (name == filename && digest.len() == 64).then(|| digest.to_ascii_lowercase())
    })
}

/// Checks `path` against the entry for `filename` in `sums`; returns the digest.
pub fn verify_file(path: &Path, filename: &str, sums: &str) -> Result<String> {
    let expected = expected_digest(sums, filename).ok_or_else(|| FlashError::MissingChecksum {
        filename: filename.to_string(),
    })?;
    let actual = sha256_path(path)?;
    if actual != expected {
        return Err(FlashError::ChecksumMismatch {
            filename: filename.to_string(),
            expected,
            actual,
        });
    }
    tracing::debug!(%filename, digest = %actual, "checksum matches");
    Ok(actual)
}
