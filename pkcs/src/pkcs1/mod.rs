//! PKCS#1 RSA key structures (RFC 8017)
//!
//! ```asn1
//! RSAPublicKey ::= SEQUENCE {
//!     modulus           INTEGER,  -- n
//!     publicExponent    INTEGER   -- e
//! }
//!
//! RSAPrivateKey ::= SEQUENCE {
//!     version           Version,
//!     modulus           INTEGER,  -- n
//!     publicExponent    INTEGER,  -- e
//!     privateExponent   INTEGER,  -- d
//!     ...
//! }
//! ```

use num_bigint::BigUint;
use sigil::decoder::{DecodableFrom, Decoder};
use sigil::encoder::{EncodableTo, Encoder};
use sigil_asn1::{Element, Integer};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RSAPublicKey {
    modulus: Integer,
    public_exponent: Integer,
}

impl RSAPublicKey {
    pub fn new(modulus: &BigUint, public_exponent: &BigUint) -> Self {
        Self {
            modulus: Integer::from(modulus),
            public_exponent: Integer::from(public_exponent),
        }
    }

    pub fn modulus(&self) -> &Integer {
        &self.modulus
    }

    pub fn public_exponent(&self) -> &Integer {
        &self.public_exponent
    }

    /// Size of the modulus in bits.
    pub fn key_size(&self) -> u64 {
        self.modulus.to_bigint().bits()
    }

    /// Takes modulus and public exponent from an `RSAPrivateKey` SEQUENCE.
    pub fn from_private_key(private_key: &Element) -> Result<Self> {
        match private_key.as_sequence() {
            Some([Element::Integer(_), Element::Integer(modulus), Element::Integer(public_exponent), ..]) => {
                Ok(Self {
                    modulus: modulus.clone(),
                    public_exponent: public_exponent.clone(),
                })
            }
            Some(fields) => Err(Error::InvalidRsaPrivateKey(format!(
                "expected version, modulus and publicExponent INTEGERs, got {} fields",
                fields.len()
            ))),
            None => Err(Error::InvalidRsaPrivateKey(format!(
                "expected SEQUENCE, found {}",
                private_key.type_name()
            ))),
        }
    }
}

impl DecodableFrom<Element> for RSAPublicKey {}

impl Decoder<Element, RSAPublicKey> for Element {
    type Error = Error;

    fn decode(&self) -> Result<RSAPublicKey> {
        match self.as_sequence() {
            Some([Element::Integer(modulus), Element::Integer(public_exponent)]) => Ok(RSAPublicKey {
                modulus: modulus.clone(),
                public_exponent: public_exponent.clone(),
            }),
            _ => Err(Error::InvalidPublicKey(
                "RSAPublicKey must be SEQUENCE { INTEGER, INTEGER }".to_string(),
            )),
        }
    }
}

impl EncodableTo<RSAPublicKey> for Element {}

impl Encoder<RSAPublicKey, Element> for RSAPublicKey {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(Element::Sequence(vec![
            Element::Integer(self.modulus.clone()),
            Element::Integer(self.public_exponent.clone()),
        ]))
    }
}

/// DER of the `RSAPublicKey` matching a DER `RSAPrivateKey`.
pub fn rsa_public_key_from_private(der: &[u8]) -> Result<Vec<u8>> {
    let private_key = sigil_asn1::decode(der)?;
    let public_key: Element = RSAPublicKey::from_private_key(&private_key)?.encode()?;
    Ok(public_key.to_der()?)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn private_key(modulus: &[u8]) -> Element {
        let mut fields = vec![
            Element::integer_from_u64(0),
            Element::integer_from_unsigned_bytes(modulus),
            Element::integer_from_u64(65537),
        ];
        // privateExponent, prime1, prime2, exponent1, exponent2, coefficient
        fields.extend((1..=6).map(|i| Element::integer_from_u64(i * 1000 + 7)));
        Element::Sequence(fields)
    }

    #[test]
    fn test_public_from_private() {
        let modulus = [0xe1; 256];
        let der = private_key(&modulus).to_der().unwrap();
        let public = rsa_public_key_from_private(&der).unwrap();

        let decoded: RSAPublicKey = sigil_asn1::decode(&public).unwrap().decode().unwrap();
        assert_eq!(2048, decoded.key_size());
        assert_eq!(Some(65537), decoded.public_exponent().to_u64());
        assert_eq!(&Integer::from_unsigned_bytes(&modulus), decoded.modulus());
    }

    #[test]
    fn test_new_matches_decoded() {
        let key = RSAPublicKey::new(&BigUint::from(0xc5u32), &BigUint::from(3u32));
        let element: Element = key.encode().unwrap();
        assert_eq!(hex::decode("300702020 0c5020103".replace(' ', "")).unwrap(), element.to_der().unwrap());
        assert_eq!(8, key.key_size());
    }

    #[rstest]
    #[case(Element::Null)]
    #[case(Element::Sequence(vec![Element::integer_from_u64(0), Element::integer_from_u64(1)]))]
    #[case(Element::Sequence(vec![
        Element::integer_from_u64(0),
        Element::Null,
        Element::integer_from_u64(3),
    ]))]
    fn test_invalid_private_key(#[case] element: Element) {
        let der = element.to_der().unwrap();
        assert!(matches!(rsa_public_key_from_private(&der), Err(Error::InvalidRsaPrivateKey(_))));
    }
}
