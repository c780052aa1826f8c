//! Password-protected key export envelope
//!
//! ```asn1
//! ExportedKey ::= SEQUENCE {
//!     keyType       INTEGER { rsa(0), ec(1) },
//!     keySize       INTEGER,       -- derived key size in bytes
//!     salt          OCTET STRING,
//!     rounds        INTEGER,       -- key derivation iterations
//!     encryptedKey  OCTET STRING
//! }
//! ```
//!
//! Only the container is handled here. Deriving the key, encrypting and
//! decrypting `encryptedKey` belong to the caller's crypto provider.

use std::fmt;

use sigil::decoder::{DecodableFrom, Decoder};
use sigil::encoder::{EncodableTo, Encoder};
use sigil_asn1::{Element, Integer, OctetString};

use crate::error::{Error, Result};

/// Size of the derived symmetric key written by exporters.
pub const EXPORT_KEY_SIZE: u32 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    Rsa = 0,
    Ec = 1,
}

impl TryFrom<u64> for KeyType {
    type Error = Error;

    fn try_from(value: u64) -> Result<Self> {
        match value {
            0 => Ok(KeyType::Rsa),
            1 => Ok(KeyType::Ec),
            other => Err(Error::UnknownKeyType(other)),
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyType::Rsa => write!(f, "RSA"),
            KeyType::Ec => write!(f, "EC"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedKey {
    pub key_type: KeyType,
    pub key_size: u32,
    pub salt: Vec<u8>,
    pub rounds: u32,
    pub encrypted_key: Vec<u8>,
}

impl ExportedKey {
    pub fn to_der(&self) -> Result<Vec<u8>> {
        let element: Element = self.encode()?;
        Ok(element.to_der()?)
    }

    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        sigil_asn1::decode(bytes)?.decode()
    }
}

fn small_integer(value: &Integer, field: &str) -> Result<u32> {
    value
        .to_u32()
        .ok_or_else(|| Error::InvalidExportedKey(format!("{} out of range: {}", field, value)))
}

impl DecodableFrom<Element> for ExportedKey {}

impl Decoder<Element, ExportedKey> for Element {
    type Error = Error;

    fn decode(&self) -> Result<ExportedKey> {
        let Some(
            [
                Element::Integer(key_type),
                Element::Integer(key_size),
                Element::OctetString(salt),
                Element::Integer(rounds),
                Element::OctetString(encrypted_key),
            ],
        ) = self.as_sequence()
        else {
            return Err(Error::InvalidExportedKey(
                "expected SEQUENCE { INTEGER, INTEGER, OCTET STRING, INTEGER, OCTET STRING }".to_string(),
            ));
        };

        let key_type = key_type
            .to_u64()
            .ok_or_else(|| Error::InvalidExportedKey(format!("key type out of range: {}", key_type)))?;

        Ok(ExportedKey {
            key_type: KeyType::try_from(key_type)?,
            key_size: small_integer(key_size, "key size")?,
            salt: salt.as_bytes().to_vec(),
            rounds: small_integer(rounds, "rounds")?,
            encrypted_key: encrypted_key.as_bytes().to_vec(),
        })
    }
}

impl EncodableTo<ExportedKey> for Element {}

impl Encoder<ExportedKey, Element> for ExportedKey {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(Element::Sequence(vec![
            Element::integer_from_u64(self.key_type as u64),
            Element::integer_from_u64(u64::from(self.key_size)),
            Element::OctetString(OctetString::from(self.salt.as_slice())),
            Element::integer_from_u64(u64::from(self.rounds)),
            Element::OctetString(OctetString::from(self.encrypted_key.as_slice())),
        ]))
    }
}
