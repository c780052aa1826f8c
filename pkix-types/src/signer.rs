//! Contracts for the services this toolkit does not implement itself.
//!
//! Key handling and randomness live with the caller. Builders only need to
//! hand DER bytes to a [`Signer`] and, when no serial number is supplied,
//! draw bytes from a [`RandomSource`].

use crate::algorithm::DigestAlgorithm;

/// Produces a signature over `data` using `algorithm` as the digest.
///
/// The returned bytes are placed verbatim in the signature BIT STRING.
pub trait Signer {
    type Error: std::error::Error + Send + Sync + 'static;

    fn sign(&self, data: &[u8], algorithm: DigestAlgorithm) -> Result<Vec<u8>, Self::Error>;
}

impl<S: Signer + ?Sized> Signer for &S {
    type Error = S::Error;

    fn sign(&self, data: &[u8], algorithm: DigestAlgorithm) -> Result<Vec<u8>, Self::Error> {
        (**self).sign(data, algorithm)
    }
}

/// Source of cryptographically secure random bytes.
pub trait RandomSource {
    type Error: std::error::Error + Send + Sync + 'static;

    fn generate_bytes(&mut self, count: usize) -> Result<Vec<u8>, Self::Error>;
}
