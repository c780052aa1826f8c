//! X.501 distinguished names
//!
//! ```asn1
//! Name ::= RDNSequence
//!
//! RDNSequence ::= SEQUENCE OF RelativeDistinguishedName
//!
//! RelativeDistinguishedName ::= SET OF AttributeTypeAndValue
//!
//! AttributeTypeAndValue ::= SEQUENCE {
//!     type     AttributeType,
//!     value    AttributeValue
//! }
//! ```
//!
//! Every attribute is written as its own single-valued RDN, and attribute
//! order is kept exactly as given. When reading, only the first attribute of
//! each RDN is used.

use std::fmt;

use serde::{Deserialize, Serialize};
use sigil::decoder::{DecodableFrom, Decoder};
use sigil::encoder::{EncodableTo, Encoder};
use sigil_asn1::{Element, ObjectIdentifier};

use crate::error::{Error, Result};
use crate::oids::{oid_from_short_id, short_id_from_oid};

/// String value of a name attribute, tagged with the ASN.1 string type it
/// was (or will be) encoded as.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeValue {
    Utf8(String),
    Printable(String),
    Ia5(String),
}

impl AttributeValue {
    pub fn as_str(&self) -> &str {
        match self {
            AttributeValue::Utf8(s) | AttributeValue::Printable(s) | AttributeValue::Ia5(s) => s,
        }
    }

    pub fn to_element(&self) -> Element {
        match self {
            AttributeValue::Utf8(s) => Element::UTF8String(s.clone()),
            AttributeValue::Printable(s) => Element::PrintableString(s.clone()),
            AttributeValue::Ia5(s) => Element::IA5String(s.clone()),
        }
    }
}

impl TryFrom<&Element> for AttributeValue {
    type Error = Error;

    fn try_from(element: &Element) -> Result<Self> {
        match element {
            Element::UTF8String(s) => Ok(AttributeValue::Utf8(s.clone())),
            Element::PrintableString(s) => Ok(AttributeValue::Printable(s.clone())),
            Element::IA5String(s) => Ok(AttributeValue::Ia5(s.clone())),
            other => Err(Error::UnsupportedValueType(other.type_name())),
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeTypeAndValue {
    pub attribute_type: ObjectIdentifier,
    pub value: AttributeValue,
}

impl AttributeTypeAndValue {
    pub fn new(attribute_type: ObjectIdentifier, value: AttributeValue) -> Self {
        Self {
            attribute_type,
            value,
        }
    }
}

impl DecodableFrom<Element> for AttributeTypeAndValue {}

impl Decoder<Element, AttributeTypeAndValue> for Element {
    type Error = Error;

    fn decode(&self) -> Result<AttributeTypeAndValue> {
        let elements = self
            .as_sequence()
            .ok_or(Error::AttributeTypeAndValueExpectedSequence)?;
        let [attribute_type, value] = elements else {
            return Err(Error::AttributeTypeAndValueInvalidElementCount(elements.len()));
        };
        let attribute_type = attribute_type
            .as_object_identifier()
            .ok_or(Error::AttributeTypeAndValueExpectedOid)?
            .clone();
        let value = AttributeValue::try_from(value)?;
        Ok(AttributeTypeAndValue {
            attribute_type,
            value,
        })
    }
}

impl EncodableTo<AttributeTypeAndValue> for Element {}

impl Encoder<AttributeTypeAndValue, Element> for AttributeTypeAndValue {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(Element::Sequence(vec![
            Element::ObjectIdentifier(self.attribute_type.clone()),
            self.value.to_element(),
        ]))
    }
}

/// Friendly form of one name attribute, keyed by its short id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NameEntry {
    pub short_id: String,
    pub value: String,
}

impl NameEntry {
    pub fn new(short_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            short_id: short_id.into(),
            value: value.into(),
        }
    }
}

/// Ordered list of attribute type/value pairs. Repeated types are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Name {
    attributes: Vec<AttributeTypeAndValue>,
}

impl Name {
    pub fn new(attributes: Vec<AttributeTypeAndValue>) -> Self {
        Self { attributes }
    }

    pub fn attributes(&self) -> &[AttributeTypeAndValue] {
        &self.attributes
    }

    pub fn push(&mut self, attribute_type: ObjectIdentifier, value: AttributeValue) {
        self.attributes
            .push(AttributeTypeAndValue::new(attribute_type, value));
    }

    /// Builds a name from short-id entries. Values are encoded as UTF8String.
    pub fn build(entries: &[NameEntry]) -> Result<Self> {
        let attributes = entries
            .iter()
            .map(|entry| {
                let attribute_type = oid_from_short_id(&entry.short_id)?;
                Ok(AttributeTypeAndValue::new(
                    attribute_type,
                    AttributeValue::Utf8(entry.value.clone()),
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { attributes })
    }

    /// Projects the name onto short-id entries. Fails on any attribute type
    /// without a registered short id.
    pub fn parse(&self) -> Result<Vec<NameEntry>> {
        self.attributes
            .iter()
            .map(|attr| {
                let short_id = short_id_from_oid(&attr.attribute_type)?;
                Ok(NameEntry::new(short_id, attr.value.as_str()))
            })
            .collect()
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = self
            .attributes
            .iter()
            .map(|attr| match short_id_from_oid(&attr.attribute_type) {
                Ok(id) => format!("{}={}", id, attr.value),
                Err(_) => format!("{}={}", attr.attribute_type, attr.value),
            })
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}", formatted)
    }
}

impl DecodableFrom<Element> for Name {}

impl Decoder<Element, Name> for Element {
    type Error = Error;

    fn decode(&self) -> Result<Name> {
        let rdns = self
            .as_sequence()
            .ok_or(Error::NameExpectedSequence(self.type_name()))?;
        let attributes = rdns
            .iter()
            .map(|rdn| {
                let set = rdn.as_set().ok_or(Error::RdnExpectedSet(rdn.type_name()))?;
                let first = set.first().ok_or(Error::RdnEmpty)?;
                if set.len() > 1 {
                    log::debug!("ignoring {} extra attributes in multi-valued RDN", set.len() - 1);
                }
                first.decode()
            })
            .collect::<Result<Vec<AttributeTypeAndValue>>>()?;
        Ok(Name { attributes })
    }
}

impl EncodableTo<Name> for Element {}

impl Encoder<Name, Element> for Name {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let rdns = self
            .attributes
            .iter()
            .map(|attr| Ok(Element::Set(vec![attr.encode()?])))
            .collect::<Result<Vec<_>>>()?;
        Ok(Element::Sequence(rdns))
    }
}
