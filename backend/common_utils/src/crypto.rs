//! Digest helpers used by connectors that hash credentials

use ring::digest;

use crate::errors::{self, CustomResult};

/// Trait for generating a digest for SHA
pub trait GenerateDigest {
    /// takes a message and creates a digest for it
    fn generate_digest(&self, message: &[u8]) -> CustomResult<Vec<u8>, errors::CryptoError>;
}

/// Secure Hash Algorithm 512
#[derive(Debug)]
pub struct Sha512;

impl GenerateDigest for Sha512 {
    fn generate_digest(&self, message: &[u8]) -> CustomResult<Vec<u8>, errors::CryptoError> {
        let digest = digest::digest(&digest::SHA512, message);
        Ok(digest.as_ref().to_vec())
    }
}

/// Lowercase hex digest of `message`
pub fn hex_digest(
    algorithm: &impl GenerateDigest,
    message: &[u8],
) -> CustomResult<String, errors::CryptoError> {
    algorithm.generate_digest(message).map(hex::encode)
}
