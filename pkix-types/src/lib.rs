//! Types shared by the X.509 and PKCS#10 layers
//!
//! - the registry of well-known object identifiers ([`oids`])
//! - X.501 distinguished names ([`Name`], [`NameEntry`])
//! - AlgorithmIdentifier and [`DigestAlgorithm`]
//! - SubjectPublicKeyInfo
//! - certificate serial numbers
//! - the [`Signer`] and [`RandomSource`] contracts implemented by callers

pub mod algorithm;
pub mod error;
pub mod name;
pub mod oids;
pub mod serial_number;
pub mod signer;
pub mod subject_public_key_info;

pub use algorithm::{AlgorithmIdentifier, DigestAlgorithm};
pub use error::{Error, Result};
pub use name::{AttributeTypeAndValue, AttributeValue, Name, NameEntry};
pub use oids::OidName;
pub use serial_number::CertificateSerialNumber;
pub use signer::{RandomSource, Signer};
pub use subject_public_key_info::SubjectPublicKeyInfo;
