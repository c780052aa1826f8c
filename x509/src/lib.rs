//! X.509 v3 certificate assembly and reading
//!
//! [`CertificateBuilder`] collects subject, issuer, validity and key data,
//! hands the DER encoding of the TBSCertificate to a caller-supplied
//! [`Signer`](sigil_pkix_types::Signer) and returns the signed certificate.
//! [`Certificate`] reads the same structure back.

pub mod builder;
pub mod certificate;
pub mod certificate_info;
pub mod error;
pub mod extensions;
pub mod signed;

pub use builder::CertificateBuilder;
pub use certificate::Certificate;
pub use certificate_info::CertificateInfo;
pub use error::{Error, Result};
pub use extensions::{Extension, Extensions, KeyUsage, StandardExtension};
pub use signed::{SignedParts, sign_structure};
