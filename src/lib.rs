pub mod tx;
pub mod state;
pub mod storage;
pub mod replay;
pub mod wallet;
pub mod error;
pub mod logger;
pub mod config;

use sha2::{Digest, Sha256};

/// Calculate SHA256 digest
pub fn sha256_digest(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}
