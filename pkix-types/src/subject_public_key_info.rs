//! Subject Public Key Info
//!
//! ```asn1
//! SubjectPublicKeyInfo  ::=  SEQUENCE  {
//!     algorithm            AlgorithmIdentifier,
//!     subjectPublicKey     BIT STRING
//! }
//! ```
//!
//! Shared by the TBSCertificate and the PKCS#10 CertificationRequestInfo.

use sigil::decoder::{DecodableFrom, Decoder};
use sigil::encoder::{EncodableTo, Encoder};
use sigil_asn1::{BitString, Element, ObjectIdentifier};

use crate::algorithm::AlgorithmIdentifier;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectPublicKeyInfo {
    algorithm: AlgorithmIdentifier,
    subject_public_key: BitString,
}

impl SubjectPublicKeyInfo {
    pub fn new(algorithm: AlgorithmIdentifier, subject_public_key: BitString) -> Self {
        Self {
            algorithm,
            subject_public_key,
        }
    }

    /// Wraps a public key structure (for RSA, the PKCS#1 `RSAPublicKey`
    /// SEQUENCE) under `oid` with NULL parameters. The key is stored as its
    /// DER encoding inside the BIT STRING.
    pub fn from_public_key(oid: ObjectIdentifier, public_key: &Element) -> Result<Self> {
        let encoded = public_key.to_der()?;
        Ok(Self {
            algorithm: AlgorithmIdentifier::with_null(oid),
            subject_public_key: BitString::from_bytes(encoded),
        })
    }

    pub fn algorithm(&self) -> &AlgorithmIdentifier {
        &self.algorithm
    }

    pub fn subject_public_key(&self) -> &BitString {
        &self.subject_public_key
    }

    /// DER bytes of the wrapped public key structure.
    pub fn public_key_bytes(&self) -> &[u8] {
        self.subject_public_key.as_bytes()
    }
}

impl DecodableFrom<Element> for SubjectPublicKeyInfo {}

impl Decoder<Element, SubjectPublicKeyInfo> for Element {
    type Error = Error;

    fn decode(&self) -> Result<SubjectPublicKeyInfo> {
        let elements = self
            .as_sequence()
            .ok_or(Error::SubjectPublicKeyInfoExpectedSequence)?;
        let [algorithm, subject_public_key] = elements else {
            return Err(Error::SubjectPublicKeyInfoInvalidElementCount(elements.len()));
        };
        let algorithm: AlgorithmIdentifier = algorithm.decode()?;
        let subject_public_key = subject_public_key
            .as_bit_string()
            .ok_or(Error::SubjectPublicKeyInfoExpectedBitString)?
            .clone();
        Ok(SubjectPublicKeyInfo {
            algorithm,
            subject_public_key,
        })
    }
}

impl EncodableTo<SubjectPublicKeyInfo> for Element {}

impl Encoder<SubjectPublicKeyInfo, Element> for SubjectPublicKeyInfo {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(Element::Sequence(vec![
            self.algorithm.encode()?,
            Element::BitString(self.subject_public_key.clone()),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use sigil_asn1::Integer;

    use super::*;
    use crate::oids;

    fn rsa_public_key() -> Element {
        Element::Sequence(vec![
            Element::Integer(Integer::from_unsigned_bytes(&[0xc3, 0x5a, 0x11, 0x07])),
            Element::integer_from_u64(65537),
        ])
    }

    #[test]
    fn test_from_public_key_layout() {
        let spki =
            SubjectPublicKeyInfo::from_public_key(ObjectIdentifier::from(oids::RSA_ENCRYPTION), &rsa_public_key())
                .unwrap();
        let element: Element = spki.encode().unwrap();

        let key_der = rsa_public_key().to_der().unwrap();
        assert_eq!(key_der, spki.public_key_bytes());
        assert_eq!(
            Element::Sequence(vec![
                Element::Sequence(vec![Element::object_identifier(oids::RSA_ENCRYPTION), Element::Null]),
                Element::BitString(BitString::from_bytes(key_der)),
            ]),
            element
        );

        let decoded: SubjectPublicKeyInfo = element.decode().unwrap();
        assert_eq!(spki, decoded);
    }

    #[rstest]
    #[case(Element::Null, "SubjectPublicKeyInfoExpectedSequence")]
    #[case(Element::Sequence(vec![Element::Null]), "SubjectPublicKeyInfoInvalidElementCount")]
    #[case(
        Element::Sequence(vec![Element::Sequence(vec![Element::object_identifier(oids::RSA_ENCRYPTION)]), Element::Null]),
        "SubjectPublicKeyInfoExpectedBitString"
    )]
    #[case(
        Element::Sequence(vec![Element::Null, Element::BitString(BitString::from_bytes(vec![]))]),
        "AlgorithmIdentifierInvalid"
    )]
    fn test_decode_errors(#[case] element: Element, #[case] expected: &str) {
        let result: Result<SubjectPublicKeyInfo> = element.decode();
        let err = result.unwrap_err();
        assert!(format!("{:?}", err).starts_with(expected), "{:?}", err);
    }
}
