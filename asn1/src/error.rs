//! Error types for the ASN.1 value model and DER codec.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    // Boolean / Null
    #[error("BOOLEAN: invalid content {0:02x?}")]
    InvalidBoolean(Vec<u8>),
    #[error("NULL: unexpected {0} content bytes")]
    NullWithContent(usize),

    // Integer errors
    #[error("INTEGER: no data")]
    IntegerNoData,

    // ObjectIdentifier errors
    #[error("OBJECT IDENTIFIER: no data")]
    ObjectIdentifierNoData,
    #[error("OBJECT IDENTIFIER: incomplete encoding")]
    ObjectIdentifierIncompleteEncoding,
    #[error("OBJECT IDENTIFIER: component does not fit in 64 bits")]
    ObjectIdentifierComponentOverflow,
    #[error("OBJECT IDENTIFIER: too few components ({0}, need at least 2)")]
    ObjectIdentifierTooFewComponents(usize),
    #[error("OBJECT IDENTIFIER: invalid leading arcs {first}.{second}")]
    ObjectIdentifierInvalidArcs { first: u64, second: u64 },
    #[error("OBJECT IDENTIFIER: invalid component '{0}'")]
    ObjectIdentifierInvalidComponent(String),

    // BitString errors
    #[error("BIT STRING: no data")]
    BitStringNoData,
    #[error("BIT STRING: unused bits {0} out of range (must be 0-7)")]
    BitStringUnusedBitsOutOfRange(u8),
    #[error("BIT STRING: {bit_len} bits do not fit {bytes} bytes")]
    BitStringInvalidLength { bit_len: usize, bytes: usize },

    // String errors
    #[error("UTF8String: invalid UTF-8")]
    Utf8StringInvalidUtf8,
    #[error("{0}: non-ASCII content")]
    NonAsciiString(&'static str),

    // Time errors
    #[error("UTCTime: invalid format '{0}'")]
    UtcTimeInvalidFormat(String),

    // Bit container errors
    #[error("bit index {index} out of range for {size} bits")]
    IndexOutOfRange { index: usize, size: usize },

    #[error("{0} trailing bytes after DER value")]
    TrailingData(usize),

    #[error("invalid DER encoding: {0}")]
    Der(#[from] sigil_der::Error),
}
