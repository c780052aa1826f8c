//! Error types for PKIX types

use sigil_asn1::ObjectIdentifier;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    // Registry lookups
    #[error("no registered short id for OID {0}")]
    UnresolvedOid(ObjectIdentifier),
    #[error("no registered OID for short id '{0}'")]
    UnresolvedShortId(String),

    // Name errors
    #[error("Name: expected SEQUENCE, found {0}")]
    NameExpectedSequence(&'static str),
    #[error("RelativeDistinguishedName: expected SET, found {0}")]
    RdnExpectedSet(&'static str),
    #[error("RelativeDistinguishedName: empty SET")]
    RdnEmpty,

    // AttributeTypeAndValue errors
    #[error("AttributeTypeAndValue: expected SEQUENCE")]
    AttributeTypeAndValueExpectedSequence,
    #[error("AttributeTypeAndValue: expected OBJECT IDENTIFIER for attribute type")]
    AttributeTypeAndValueExpectedOid,
    #[error("AttributeTypeAndValue: expected 2 elements, got {0}")]
    AttributeTypeAndValueInvalidElementCount(usize),
    #[error("AttributeTypeAndValue: unsupported value type {0}")]
    UnsupportedValueType(&'static str),

    // CertificateSerialNumber errors
    #[error("CertificateSerialNumber: expected INTEGER")]
    CertificateSerialNumberExpectedInteger,

    // SubjectPublicKeyInfo errors
    #[error("SubjectPublicKeyInfo: expected SEQUENCE")]
    SubjectPublicKeyInfoExpectedSequence,
    #[error("SubjectPublicKeyInfo: expected 2 elements, got {0}")]
    SubjectPublicKeyInfoInvalidElementCount(usize),
    #[error("SubjectPublicKeyInfo: expected BIT STRING for subject public key")]
    SubjectPublicKeyInfoExpectedBitString,

    // AlgorithmIdentifier errors
    #[error("AlgorithmIdentifier: expected SEQUENCE of OBJECT IDENTIFIER and optional parameters")]
    AlgorithmIdentifierInvalid,
    #[error("unknown signature algorithm {0}")]
    UnknownSignatureAlgorithm(ObjectIdentifier),

    #[error("random source failed: {0}")]
    RandomSource(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("ASN.1 error: {0}")]
    ASN1Error(#[from] sigil_asn1::Error),
}
