//! Decoding direction of the conversion pattern.
//!
//! A source type `T` implements `Decoder<T, D>` for every destination `D`
//! that has opted in with `DecodableFrom<T>`.
//!
//! ```no_run
//! use sigil::decoder::{DecodableFrom, Decoder};
//!
//! struct Octets(Vec<u8>);
//! struct Text(String);
//!
//! #[derive(Debug)]
//! struct NotUtf8;
//!
//! impl DecodableFrom<Octets> for Text {}
//!
//! impl Decoder<Octets, Text> for Octets {
//!     type Error = NotUtf8;
//!
//!     fn decode(&self) -> Result<Text, Self::Error> {
//!         String::from_utf8(self.0.clone()).map(Text).map_err(|_| NotUtf8)
//!     }
//! }
//! ```

/// Converts `self` (of type `T`) into `D`.
pub trait Decoder<T, D: DecodableFrom<T>> {
    type Error;

    /// Decodes `self` into `D`.
    ///
    /// # Errors
    ///
    /// Returns the implementation's error when `self` does not hold a valid
    /// representation of `D`.
    fn decode(&self) -> Result<D, Self::Error>;
}

/// Marker trait: `Self` may be decoded from `T`.
pub trait DecodableFrom<T> {}
