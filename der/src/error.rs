use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    #[error("truncated input: {0:?}")]
    Truncated(nom::error::ErrorKind),
    #[error("length {length} exceeds remaining {remaining} bytes")]
    LengthExceedsInput { length: usize, remaining: usize },
    #[error("offset {offset} is outside of a {len} byte buffer")]
    OffsetOutOfBounds { offset: usize, len: usize },
    #[error("length {0} is too large for DER encoding")]
    UnsupportedLength(usize),
    #[error("{0} length octets are not supported")]
    UnsupportedLengthOctets(u8),
    #[error("nesting deeper than {0} levels")]
    NestingTooDeep(usize),
}

impl<I> From<nom::Err<nom::error::Error<I>>> for Error {
    fn from(err: nom::Err<nom::error::Error<I>>) -> Self {
        match err {
            nom::Err::Incomplete(_) => Error::Truncated(nom::error::ErrorKind::Eof),
            nom::Err::Error(e) | nom::Err::Failure(e) => Error::Truncated(e.code),
        }
    }
}
