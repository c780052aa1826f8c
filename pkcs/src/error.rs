use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid certification request: {0}")]
    InvalidRequest(String),
    #[error("invalid request attributes: {0}")]
    InvalidAttributes(String),
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),
    #[error("certification request builder: {0} is not set")]
    MissingField(&'static str),
    #[error("invalid exported key: {0}")]
    InvalidExportedKey(String),
    #[error("unknown key type: {0}")]
    UnknownKeyType(u64),
    #[error("invalid RSA private key: {0}")]
    InvalidRsaPrivateKey(String),

    #[error(transparent)]
    X509(#[from] sigil_x509::Error),
    #[error(transparent)]
    PKIXTypes(#[from] sigil_pkix_types::Error),
    #[error("ASN.1 error: {0}")]
    Asn1(#[from] sigil_asn1::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
