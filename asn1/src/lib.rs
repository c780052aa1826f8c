//! ASN.1 value model and DER codec.
//!
//! [`Element`] is the closed set of values this toolkit understands. Values
//! are encoded through the [`ElementEncoder`] seam and decoded from the TLV
//! units produced by `sigil-der`:
//!
//! ```text
//! &[u8] --sigil_der--> Der --Decoder--> ASN1Object (Vec<Element>)
//! ```
//!
//! Tags outside the table are kept as [`Element::Tagged`] with their raw
//! payload, so explicit context tags and unknown types survive a round trip.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use sigil::decoder::{DecodableFrom, Decoder};
use sigil::encoder::{EncodableTo, Encoder};
use sigil_der::{Der, Tag, Tlv};

pub mod bit_set;
pub mod bit_string;
pub mod encoder;
pub mod error;
pub mod integer;
pub mod object_identifier;
pub mod octet_string;

pub use bit_set::BitSet;
pub use bit_string::BitString;
pub use encoder::{DerEncoder, ElementEncoder};
pub use error::{Error, Result};
pub use integer::Integer;
pub use object_identifier::ObjectIdentifier;
pub use octet_string::OctetString;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ASN1Object {
    elements: Vec<Element>,
}

impl ASN1Object {
    pub fn new(elements: Vec<Element>) -> Self {
        ASN1Object { elements }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<Element> {
        self.elements
    }
}

impl DecodableFrom<Der> for ASN1Object {}

impl Decoder<Der, ASN1Object> for Der {
    type Error = Error;

    fn decode(&self) -> Result<ASN1Object> {
        let elements = self
            .elements()
            .iter()
            .map(Element::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(ASN1Object { elements })
    }
}

impl EncodableTo<ASN1Object> for Vec<u8> {}

impl Encoder<ASN1Object, Vec<u8>> for ASN1Object {
    type Error = Error;

    fn encode(&self) -> Result<Vec<u8>> {
        encode(&self.elements)
    }
}

// Extension values and similar fields carry DER inside an OCTET STRING.
impl TryFrom<&OctetString> for ASN1Object {
    type Error = Error;

    fn try_from(value: &OctetString) -> Result<Self> {
        decode_all(value.as_bytes()).map(ASN1Object::new)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Boolean(bool),
    Integer(Integer),
    BitString(BitString),
    OctetString(OctetString),
    Null,
    ObjectIdentifier(ObjectIdentifier),
    UTF8String(String),
    PrintableString(String),
    IA5String(String),
    Sequence(Vec<Element>),
    Set(Vec<Element>),
    UTCTime(NaiveDateTime),
    /// Any other tag, with its content octets kept verbatim.
    Tagged { tag: u8, data: Vec<u8> },
}

impl Element {
    pub fn encode<E: ElementEncoder>(&self, encoder: &mut E) -> Result<()> {
        match self {
            Element::Boolean(value) => encoder.encode_boolean(*value),
            Element::Integer(value) => encoder.encode_integer(value),
            Element::BitString(value) => encoder.encode_bit_string(value),
            Element::OctetString(value) => encoder.encode_octet_string(value),
            Element::Null => encoder.encode_null(),
            Element::ObjectIdentifier(value) => encoder.encode_object_identifier(value),
            Element::UTF8String(value) => encoder.encode_utf8_string(value),
            Element::PrintableString(value) => encoder.encode_printable_string(value),
            Element::IA5String(value) => encoder.encode_ia5_string(value),
            Element::Sequence(elements) => encoder.encode_sequence(elements),
            Element::Set(elements) => encoder.encode_set(elements),
            Element::UTCTime(value) => encoder.encode_utc_time(value),
            Element::Tagged { tag, data } => encoder.encode_tagged(*tag, data),
        }
    }

    /// DER encoding of this single value.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        let mut encoder = DerEncoder::new();
        self.encode(&mut encoder)?;
        Ok(encoder.into_bytes())
    }

    pub fn integer_from_u64(value: u64) -> Self {
        Element::Integer(Integer::from(value))
    }

    pub fn integer_from_unsigned_bytes(bytes: &[u8]) -> Self {
        Element::Integer(Integer::from_unsigned_bytes(bytes))
    }

    pub fn object_identifier(components: &[u64]) -> Self {
        Element::ObjectIdentifier(ObjectIdentifier::from(components))
    }

    /// UTCTime has whole-second precision; anything finer is dropped.
    pub fn utc_time(time: DateTime<Utc>) -> Self {
        Element::UTCTime(time.naive_utc().trunc_subsecs(0))
    }

    /// Explicit context tag `[slot]` wrapping the DER encoding of `inner`.
    pub fn explicit(slot: u8, inner: &Element) -> Result<Self> {
        Ok(Element::Tagged {
            tag: Tag::context_specific(slot, true),
            data: inner.to_der()?,
        })
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Element::Boolean(_) => "BOOLEAN",
            Element::Integer(_) => "INTEGER",
            Element::BitString(_) => "BIT STRING",
            Element::OctetString(_) => "OCTET STRING",
            Element::Null => "NULL",
            Element::ObjectIdentifier(_) => "OBJECT IDENTIFIER",
            Element::UTF8String(_) => "UTF8String",
            Element::PrintableString(_) => "PrintableString",
            Element::IA5String(_) => "IA5String",
            Element::Sequence(_) => "SEQUENCE",
            Element::Set(_) => "SET",
            Element::UTCTime(_) => "UTCTime",
            Element::Tagged { .. } => "tagged object",
        }
    }

    pub fn as_sequence(&self) -> Option<&[Element]> {
        match self {
            Element::Sequence(elements) => Some(elements),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&[Element]> {
        match self {
            Element::Set(elements) => Some(elements),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<&Integer> {
        match self {
            Element::Integer(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bit_string(&self) -> Option<&BitString> {
        match self {
            Element::BitString(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_octet_string(&self) -> Option<&OctetString> {
        match self {
            Element::OctetString(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_object_identifier(&self) -> Option<&ObjectIdentifier> {
        match self {
            Element::ObjectIdentifier(value) => Some(value),
            _ => None,
        }
    }

    /// Text of any of the string variants.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Element::UTF8String(s) | Element::PrintableString(s) | Element::IA5String(s) => Some(s),
            _ => None,
        }
    }

    /// Content octets of a tagged object, if the tag matches.
    pub fn tagged_data(&self, expected: u8) -> Option<&[u8]> {
        match self {
            Element::Tagged { tag, data } if *tag == expected => Some(data),
            _ => None,
        }
    }
}

impl TryFrom<&Tlv> for Element {
    type Error = Error;

    fn try_from(tlv: &Tlv) -> Result<Self> {
        if let Some(children) = tlv.tlvs() {
            let elements = children
                .iter()
                .map(Element::try_from)
                .collect::<Result<Vec<_>>>()?;
            return Ok(match tlv.tag() {
                Tag::Set => Element::Set(elements),
                _ => Element::Sequence(elements),
            });
        }

        let data = tlv.data().unwrap_or_default();
        let element = match tlv.tag() {
            Tag::Boolean => match data {
                [0x00] => Element::Boolean(false),
                [0xff] => Element::Boolean(true),
                _ => return Err(Error::InvalidBoolean(data.to_vec())),
            },
            Tag::Integer => {
                if data.is_empty() {
                    return Err(Error::IntegerNoData);
                }
                Element::Integer(Integer::from_content_octets(data.to_vec()))
            }
            Tag::BitString => Element::BitString(BitString::try_from(data)?),
            Tag::OctetString => Element::OctetString(OctetString::from(data)),
            Tag::Null => {
                if !data.is_empty() {
                    return Err(Error::NullWithContent(data.len()));
                }
                Element::Null
            }
            Tag::ObjectIdentifier => Element::ObjectIdentifier(ObjectIdentifier::try_from(data)?),
            Tag::UTF8String => {
                let s = std::str::from_utf8(data).map_err(|_| Error::Utf8StringInvalidUtf8)?;
                Element::UTF8String(s.to_string())
            }
            Tag::PrintableString => Element::PrintableString(ascii(data, "PrintableString")?),
            Tag::IA5String => Element::IA5String(ascii(data, "IA5String")?),
            Tag::UTCTime => Element::UTCTime(parse_utc_time(data)?),
            Tag::Sequence | Tag::Set | Tag::Other(_) => {
                let tag = u8::from(tlv.tag());
                log::debug!("keeping tag {:#04x} as raw tagged object ({} bytes)", tag, data.len());
                Element::Tagged {
                    tag,
                    data: data.to_vec(),
                }
            }
        };
        Ok(element)
    }
}

fn ascii(data: &[u8], name: &'static str) -> Result<String> {
    if !data.is_ascii() {
        return Err(Error::NonAsciiString(name));
    }
    // ASCII is always valid UTF-8
    Ok(data.iter().map(|&b| b as char).collect())
}

// yyMMddHHmmssZ; two-digit years 50-99 are 19xx, 00-49 are 20xx.
fn parse_utc_time(data: &[u8]) -> Result<NaiveDateTime> {
    let invalid = || Error::UtcTimeInvalidFormat(String::from_utf8_lossy(data).into_owned());
    let text = std::str::from_utf8(data).map_err(|_| invalid())?;
    let yy = text
        .get(..2)
        .and_then(|yy| yy.parse::<u8>().ok())
        .ok_or_else(invalid)?;
    let century = if yy >= 50 { "19" } else { "20" };
    NaiveDateTime::parse_from_str(&format!("{}{}", century, text), "%Y%m%d%H%M%SZ")
        .map_err(|_| invalid())
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Boolean(b) => write!(f, "BOOLEAN {}", b),
            Element::Integer(i) => write!(f, "INTEGER {}", i),
            Element::BitString(bs) => write!(f, "BIT STRING ({} bits) {}", bs.bit_len(), bs),
            Element::OctetString(os) => write!(f, "OCTET STRING {}", os),
            Element::Null => write!(f, "NULL"),
            Element::ObjectIdentifier(oid) => write!(f, "OBJECT IDENTIFIER {}", oid),
            Element::UTF8String(s) | Element::PrintableString(s) | Element::IA5String(s) => {
                write!(f, "{} {:?}", self.type_name(), s)
            }
            Element::Sequence(elements) | Element::Set(elements) => {
                write!(f, "{} ({} elements)", self.type_name(), elements.len())
            }
            Element::UTCTime(t) => write!(f, "UTCTime {}", t),
            Element::Tagged { tag, data } => write!(f, "[{:#04x}] ({} bytes)", tag, data.len()),
        }
    }
}

/// Encodes `elements` back to back into one buffer.
pub fn encode(elements: &[Element]) -> Result<Vec<u8>> {
    let mut encoder = DerEncoder::new();
    for element in elements {
        element.encode(&mut encoder)?;
    }
    Ok(encoder.into_bytes())
}

/// Decodes a buffer holding exactly one value.
pub fn decode(buf: &[u8]) -> Result<Element> {
    let (element, end) = parse_item(buf, 0)?;
    if end != buf.len() {
        return Err(Error::TrailingData(buf.len() - end));
    }
    Ok(element)
}

/// Decodes every top-level value in `buf`.
pub fn decode_all(buf: &[u8]) -> Result<Vec<Element>> {
    parse_items(buf, 0, buf.len())
}

/// Decodes the value starting at `offset` and returns it with the offset
/// just past it.
pub fn parse_item(buf: &[u8], offset: usize) -> Result<(Element, usize)> {
    let (tlv, next) = sigil_der::parse_item(buf, offset)?;
    Ok((Element::try_from(&tlv)?, next))
}

/// Decodes values from `offset` until `end`.
pub fn parse_items(buf: &[u8], offset: usize, end: usize) -> Result<Vec<Element>> {
    sigil_der::parse_items(buf, offset, end)?
        .iter()
        .map(Element::try_from)
        .collect()
}
