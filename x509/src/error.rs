use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid extension: {0}")]
    InvalidExtension(String),
    #[error("invalid extensions: {0}")]
    InvalidExtensions(String),
    #[error("invalid KeyUsage: {0}")]
    InvalidKeyUsage(String),
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),
    #[error("invalid certificate: {0}")]
    InvalidCertificate(String),
    #[error("invalid TBSCertificate: {0}")]
    InvalidTbsCertificate(String),
    #[error("invalid validity: {0}")]
    InvalidValidity(String),
    #[error("certificate builder: {0} is not set")]
    MissingField(&'static str),
    #[error("signer failed: {0}")]
    Signer(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error(transparent)]
    PkixTypes(#[from] sigil_pkix_types::Error),
    #[error("ASN.1 error: {0}")]
    ASN1(#[from] sigil_asn1::Error),
}
