//! Encoding direction of the conversion pattern.
//!
//! Mirrors [`crate::decoder`]: a type implements `Encoder<T, E>` to produce
//! its lower-level representation `E`, which opts in with `EncodableTo<T>`.

/// Converts `self` (of type `T`) into `E`.
pub trait Encoder<T, E: EncodableTo<T>> {
    type Error;

    /// Encodes `self` into `E`.
    ///
    /// # Errors
    ///
    /// Returns the implementation's error when `self` cannot be represented
    /// in `E` (for example a value whose DER length is unsupported).
    fn encode(&self) -> Result<E, Self::Error>;
}

/// Marker trait: `Self` may be produced by encoding a `T`.
pub trait EncodableTo<T> {}
