//! Certificate Serial Number
//!
//! ```asn1
//! CertificateSerialNumber ::= INTEGER
//! ```
//!
//! Serial numbers are positive. Raw bytes are always read as an unsigned
//! magnitude, so a leading byte with the top bit set gets a `0x00` prefix
//! on the wire.

use std::fmt;

use sigil::decoder::{DecodableFrom, Decoder};
use sigil::encoder::{EncodableTo, Encoder};
use sigil_asn1::{Element, Integer};

use crate::error::{Error, Result};
use crate::signer::RandomSource;

/// Bytes drawn from the random source for a generated serial number.
pub const GENERATED_SERIAL_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CertificateSerialNumber {
    inner: Integer,
}

impl CertificateSerialNumber {
    /// ```
    /// use sigil_pkix_types::CertificateSerialNumber;
    ///
    /// let serial = CertificateSerialNumber::from_bytes(&[0x8e, 0x01]);
    /// assert_eq!(serial.format_hex(), "00:8e:01");
    /// ```
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            inner: Integer::from_unsigned_bytes(bytes),
        }
    }

    /// Draws [`GENERATED_SERIAL_LEN`] random bytes.
    pub fn generate<R: RandomSource>(random: &mut R) -> Result<Self> {
        let bytes = random
            .generate_bytes(GENERATED_SERIAL_LEN)
            .map_err(|e| Error::RandomSource(Box::new(e)))?;
        Ok(Self::from_bytes(&bytes))
    }

    pub fn as_integer(&self) -> &Integer {
        &self.inner
    }

    /// Lowercase hex with colon separators, like OpenSSL prints serials.
    pub fn format_hex(&self) -> String {
        self.inner
            .as_bytes()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<_>>()
            .join(":")
    }
}

impl From<Integer> for CertificateSerialNumber {
    fn from(inner: Integer) -> Self {
        Self { inner }
    }
}

impl fmt::Display for CertificateSerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_hex())
    }
}

impl DecodableFrom<Element> for CertificateSerialNumber {}

impl Decoder<Element, CertificateSerialNumber> for Element {
    type Error = Error;

    fn decode(&self) -> Result<CertificateSerialNumber> {
        self.as_integer()
            .map(|inner| CertificateSerialNumber {
                inner: inner.clone(),
            })
            .ok_or(Error::CertificateSerialNumberExpectedInteger)
    }
}

impl EncodableTo<CertificateSerialNumber> for Element {}

impl Encoder<CertificateSerialNumber, Element> for CertificateSerialNumber {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(Element::Integer(self.inner.clone()))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    struct Counter(u8);

    impl RandomSource for Counter {
        type Error = std::io::Error;

        fn generate_bytes(&mut self, count: usize) -> std::result::Result<Vec<u8>, Self::Error> {
            let bytes = (0..count).map(|i| self.0.wrapping_add(i as u8)).collect();
            self.0 = self.0.wrapping_add(1);
            Ok(bytes)
        }
    }

    struct Broken;

    impl RandomSource for Broken {
        type Error = std::io::Error;

        fn generate_bytes(&mut self, _count: usize) -> std::result::Result<Vec<u8>, Self::Error> {
            Err(std::io::Error::other("entropy unavailable"))
        }
    }

    #[rstest]
    #[case(vec![0x01, 0x02, 0x03], "01:02:03")]
    #[case(vec![0x00, 0x00, 0x7f], "7f")]
    #[case(vec![0xff], "00:ff")]
    #[case(vec![], "00")]
    fn test_from_bytes(#[case] bytes: Vec<u8>, #[case] expected: &str) {
        assert_eq!(expected, CertificateSerialNumber::from_bytes(&bytes).format_hex());
    }

    #[test]
    fn test_generate() {
        let mut random = Counter(0xf0);
        let serial = CertificateSerialNumber::generate(&mut random).unwrap();
        let bytes = serial.as_integer().as_bytes();
        assert_eq!(GENERATED_SERIAL_LEN + 1, bytes.len());
        assert_eq!(&[0x00, 0xf0, 0xf1], &bytes[..3]);

        let next = CertificateSerialNumber::generate(&mut random).unwrap();
        assert_ne!(serial, next);
    }

    #[test]
    fn test_generate_propagates_failure() {
        let err = CertificateSerialNumber::generate(&mut Broken).unwrap_err();
        assert!(matches!(err, Error::RandomSource(_)));
        assert_eq!("random source failed: entropy unavailable", err.to_string());
    }

    #[test]
    fn test_encode_decode() {
        let serial = CertificateSerialNumber::from_bytes(&[0x12, 0x34]);
        let element: Element = serial.encode().unwrap();
        assert_eq!(hex::decode("02021234").unwrap(), element.to_der().unwrap());
        let decoded: CertificateSerialNumber = element.decode().unwrap();
        assert_eq!(serial, decoded);

        let result: Result<CertificateSerialNumber> = Element::Null.decode();
        assert!(matches!(result, Err(Error::CertificateSerialNumberExpectedInteger)));
    }
}
