//! PKCS structures around certificate issuance
//!
//! - [`pkcs10`]: certification requests, their assembly, signing and reading
//! - [`pkcs1`]: RSA public keys, including derivation from a private key
//! - [`export`]: the envelope for password-protected exported keys

pub mod error;
pub mod export;
pub mod pkcs1;
pub mod pkcs10;

pub use error::{Error, Result};
pub use export::{ExportedKey, KeyType};
pub use pkcs1::{RSAPublicKey, rsa_public_key_from_private};
pub use pkcs10::{CertificateBuilderExt, CertificationRequest, CertificationRequestBuilder};
