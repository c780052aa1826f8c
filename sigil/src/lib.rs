//! # sigil
//!
//! Conversion traits shared by every layer of the sigil certificate toolkit.
//!
//! Each layer converts into the next one with [`decoder::Decoder`] and back
//! with [`encoder::Encoder`]:
//!
//! ```text
//! &[u8] → Der → ASN1Object → Element → Name / Extensions / SubjectPublicKeyInfo
//! ```
//!
//! Marker traits (`DecodableFrom`, `EncodableTo`) restrict which pairs of
//! types may be converted, so a mismatched conversion is a compile error
//! instead of a runtime failure.
//!
//! ```ignore
//! use sigil::decoder::Decoder;
//! use sigil_der::Der;
//! use sigil_asn1::ASN1Object;
//!
//! let bytes: &[u8] = &[0x30, 0x03, 0x02, 0x01, 0x07];
//! let der: Der = bytes.decode().unwrap();
//! let asn1: ASN1Object = der.decode().unwrap();
//! ```

#![forbid(unsafe_code)]

pub mod decoder;
pub mod encoder;
