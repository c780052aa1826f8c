use sigil::decoder::{DecodableFrom, Decoder};
use sigil::encoder::{EncodableTo, Encoder};
use sigil_asn1::{Element, ObjectIdentifier, OctetString};

use crate::error::{Error, Result};

pub mod key_usage;

pub use key_usage::KeyUsage;

/*
RFC 5280 Section 4.1.2.9

Extensions  ::=  SEQUENCE SIZE (1..MAX) OF Extension

Extension  ::=  SEQUENCE  {
    extnID      OBJECT IDENTIFIER,
    critical    BOOLEAN DEFAULT FALSE,
    extnValue   OCTET STRING
                -- contains the DER encoding of an ASN.1 value
                -- corresponding to the extension type identified
                -- by extnID
}
*/

/// Extensions block of a TBSCertificate or a PKCS#10 extension request.
///
/// An empty block is accepted and written as an empty SEQUENCE; requests
/// built without key usage carry one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Extensions {
    extensions: Vec<Extension>,
}

impl Extensions {
    pub fn new(extensions: Vec<Extension>) -> Self {
        Self { extensions }
    }

    /// Block holding only the Key Usage extension, or nothing.
    pub fn for_key_usage(key_usage: Option<KeyUsage>) -> Result<Self> {
        let extensions = match key_usage {
            Some(usage) => vec![usage.to_extension()?],
            None => Vec::new(),
        };
        Ok(Self { extensions })
    }

    pub fn extensions(&self) -> &[Extension] {
        &self.extensions
    }

    /// First extension of type `T`, parsed.
    pub fn find<T: StandardExtension>(&self) -> Result<Option<T>> {
        self.extensions
            .iter()
            .find(|ext| ext.id.components() == T::OID)
            .map(|ext| ext.parse::<T>())
            .transpose()
    }
}

impl DecodableFrom<Element> for Extensions {}

impl Decoder<Element, Extensions> for Element {
    type Error = Error;

    fn decode(&self) -> Result<Extensions> {
        let elements = self.as_sequence().ok_or_else(|| {
            Error::InvalidExtensions(format!("expected SEQUENCE, found {}", self.type_name()))
        })?;
        let extensions = elements
            .iter()
            .map(|elem| elem.decode())
            .collect::<Result<Vec<Extension>>>()?;
        Ok(Extensions { extensions })
    }
}

impl EncodableTo<Extensions> for Element {}

impl Encoder<Extensions, Element> for Extensions {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let elements = self
            .extensions
            .iter()
            .map(|ext| ext.encode())
            .collect::<Result<Vec<_>>>()?;
        Ok(Element::Sequence(elements))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    id: ObjectIdentifier,
    critical: bool,
    value: OctetString,
}

impl Extension {
    pub fn new(id: ObjectIdentifier, critical: bool, value: OctetString) -> Self {
        Self {
            id,
            critical,
            value,
        }
    }

    pub fn id(&self) -> &ObjectIdentifier {
        &self.id
    }

    pub fn is_critical(&self) -> bool {
        self.critical
    }

    /// Raw extension value (DER-encoded ASN.1)
    pub fn value(&self) -> &OctetString {
        &self.value
    }

    pub fn parse<T: StandardExtension>(&self) -> Result<T> {
        if self.id.components() != T::OID {
            return Err(Error::InvalidExtension(format!(
                "OID mismatch: expected {}, got {}",
                ObjectIdentifier::from(T::OID),
                self.id
            )));
        }
        T::parse(&self.value)
    }
}

impl DecodableFrom<Element> for Extension {}

impl Decoder<Element, Extension> for Element {
    type Error = Error;

    fn decode(&self) -> Result<Extension> {
        let elements = self
            .as_sequence()
            .ok_or_else(|| Error::InvalidExtension("expected SEQUENCE".to_string()))?;

        // critical has DEFAULT FALSE and may be omitted
        let (id, critical, value) = match elements {
            [id, value] => (id, None, value),
            [id, critical, value] => (id, Some(critical), value),
            _ => {
                return Err(Error::InvalidExtension(format!(
                    "expected 2 or 3 elements, got {}",
                    elements.len()
                )));
            }
        };
        let id = id
            .as_object_identifier()
            .ok_or_else(|| Error::InvalidExtension("expected OBJECT IDENTIFIER for extnID".to_string()))?;
        let critical = match critical {
            None => false,
            Some(Element::Boolean(b)) => *b,
            Some(_) => {
                return Err(Error::InvalidExtension("expected BOOLEAN for critical".to_string()));
            }
        };
        let value = value
            .as_octet_string()
            .ok_or_else(|| Error::InvalidExtension("expected OCTET STRING for extnValue".to_string()))?;

        Ok(Extension {
            id: id.clone(),
            critical,
            value: value.clone(),
        })
    }
}

impl EncodableTo<Extension> for Element {}

impl Encoder<Extension, Element> for Extension {
    type Error = Error;

    // critical is always written, even when false
    fn encode(&self) -> Result<Element> {
        Ok(Element::Sequence(vec![
            Element::ObjectIdentifier(self.id.clone()),
            Element::Boolean(self.critical),
            Element::OctetString(self.value.clone()),
        ]))
    }
}

/// Extension types with a typed representation.
pub trait StandardExtension: Sized {
    const OID: &'static [u64];
    const CRITICAL: bool;

    /// Parse the extension value (DER-encoded ASN.1 in OctetString)
    fn parse(value: &OctetString) -> Result<Self>;

    /// DER encoding of the value, ready to go into extnValue.
    fn to_value(&self) -> Result<OctetString>;

    fn to_extension(&self) -> Result<Extension> {
        Ok(Extension {
            id: ObjectIdentifier::from(Self::OID),
            critical: Self::CRITICAL,
            value: self.to_value()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use sigil_asn1::BitString;

    use super::*;

    #[test]
    fn test_empty_block() {
        let block = Extensions::for_key_usage(None).unwrap();
        let element: Element = block.encode().unwrap();
        assert_eq!(Element::Sequence(vec![]), element);
        let decoded: Extensions = element.decode().unwrap();
        assert!(decoded.extensions().is_empty());
        assert_eq!(None, decoded.find::<KeyUsage>().unwrap());
    }

    #[test]
    fn test_find_skips_other_extensions() {
        let basic_constraints = Extension::new(
            ObjectIdentifier::from([2u64, 5, 29, 19].as_slice()),
            true,
            OctetString::from(vec![0x30, 0x00]),
        );
        let key_usage = KeyUsage::DIGITAL_SIGNATURE | KeyUsage::KEY_CERT_SIGN;
        let block = Extensions::new(vec![basic_constraints, key_usage.to_extension().unwrap()]);

        let element: Element = block.encode().unwrap();
        let decoded: Extensions = sigil_asn1::decode(&element.to_der().unwrap()).unwrap().decode().unwrap();
        assert_eq!(block, decoded);
        assert_eq!(Some(key_usage), decoded.find::<KeyUsage>().unwrap());
    }

    #[test]
    fn test_decode_without_critical() {
        let element = Element::Sequence(vec![
            Element::object_identifier(&[2, 5, 29, 15]),
            Element::OctetString(OctetString::from(vec![0x03, 0x02, 0x05, 0xa0])),
        ]);
        let ext: Extension = element.decode().unwrap();
        assert!(!ext.is_critical());
        let usage: KeyUsage = ext.parse().unwrap();
        assert_eq!(KeyUsage::DIGITAL_SIGNATURE | KeyUsage::KEY_ENCIPHERMENT, usage);
    }

    #[test]
    fn test_parse_oid_mismatch() {
        let ext = Extension::new(
            ObjectIdentifier::from([2u64, 5, 29, 17].as_slice()),
            false,
            OctetString::from(vec![0x30, 0x00]),
        );
        assert!(matches!(ext.parse::<KeyUsage>(), Err(Error::InvalidExtension(_))));
    }

    #[rstest]
    #[case(Element::Null)]
    #[case(Element::Sequence(vec![Element::Null]))]
    #[case(Element::Sequence(vec![Element::Null, Element::OctetString(OctetString::default())]))]
    #[case(Element::Sequence(vec![
        Element::object_identifier(&[2, 5, 29, 15]),
        Element::Null,
        Element::OctetString(OctetString::default()),
    ]))]
    #[case(Element::Sequence(vec![
        Element::object_identifier(&[2, 5, 29, 15]),
        Element::BitString(BitString::from_bytes(vec![])),
    ]))]
    fn test_decode_invalid_extension(#[case] element: Element) {
        let result: Result<Extension> = element.decode();
        assert!(matches!(result, Err(Error::InvalidExtension(_))));
    }
}
