//! Streaming SHA-256 content fingerprinting.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

const CHUNK_SIZE: usize = 4096;

/// Compute the SHA-256 hex digest of a file's full byte content.
///
/// Reads in fixed-size chunks so arbitrarily large files never have to fit
/// in memory. Any open or read failure is returned to the caller, which
/// decides whether to skip the path or abort the scan.
pub fn fingerprint(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];
    loop {
        let n = file.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}
