//! Per-variant encoding seam.
//!
//! [`Element::encode`] makes exactly one call on an [`ElementEncoder`] per
//! value. [`DerEncoder`] is the DER implementation; other sinks (a pretty
//! printer, a size counter) only need to implement the trait.

use chrono::{Datelike, NaiveDateTime};
use sigil_der::{Tag, write_header};

use crate::bit_string::BitString;
use crate::error::{Error, Result};
use crate::integer::Integer;
use crate::object_identifier::ObjectIdentifier;
use crate::octet_string::OctetString;
use crate::Element;

pub(crate) const UTC_TIME_FORMAT: &str = "%y%m%d%H%M%SZ";

pub trait ElementEncoder {
    fn encode_boolean(&mut self, value: bool) -> Result<()>;
    fn encode_integer(&mut self, value: &Integer) -> Result<()>;
    fn encode_bit_string(&mut self, value: &BitString) -> Result<()>;
    fn encode_octet_string(&mut self, value: &OctetString) -> Result<()>;
    fn encode_null(&mut self) -> Result<()>;
    fn encode_object_identifier(&mut self, value: &ObjectIdentifier) -> Result<()>;
    fn encode_utf8_string(&mut self, value: &str) -> Result<()>;
    fn encode_printable_string(&mut self, value: &str) -> Result<()>;
    fn encode_ia5_string(&mut self, value: &str) -> Result<()>;
    fn encode_sequence(&mut self, elements: &[Element]) -> Result<()>;
    fn encode_set(&mut self, elements: &[Element]) -> Result<()>;
    fn encode_utc_time(&mut self, value: &NaiveDateTime) -> Result<()>;
    fn encode_tagged(&mut self, tag: u8, data: &[u8]) -> Result<()>;
}

/// Appends DER encodings to an owned buffer.
#[derive(Debug, Default)]
pub struct DerEncoder {
    data: Vec<u8>,
}

impl DerEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    fn primitive(&mut self, tag: Tag, content: &[u8]) -> Result<()> {
        write_header(tag.into(), content.len(), &mut self.data)?;
        self.data.extend_from_slice(content);
        Ok(())
    }

    fn ascii(&mut self, tag: Tag, name: &'static str, value: &str) -> Result<()> {
        if !value.is_ascii() {
            return Err(Error::NonAsciiString(name));
        }
        self.primitive(tag, value.as_bytes())
    }

    fn constructed(&mut self, tag: Tag, elements: &[Element]) -> Result<()> {
        let mut inner = DerEncoder::new();
        for element in elements {
            element.encode(&mut inner)?;
        }
        self.primitive(tag, &inner.data)
    }
}

impl ElementEncoder for DerEncoder {
    fn encode_boolean(&mut self, value: bool) -> Result<()> {
        self.primitive(Tag::Boolean, &[if value { 0xff } else { 0x00 }])
    }

    fn encode_integer(&mut self, value: &Integer) -> Result<()> {
        if value.as_bytes().is_empty() {
            return Err(Error::IntegerNoData);
        }
        self.primitive(Tag::Integer, value.as_bytes())
    }

    fn encode_bit_string(&mut self, value: &BitString) -> Result<()> {
        let mut content = Vec::with_capacity(value.as_bytes().len() + 1);
        content.push(value.unused_bits());
        content.extend_from_slice(value.as_bytes());
        self.primitive(Tag::BitString, &content)
    }

    fn encode_octet_string(&mut self, value: &OctetString) -> Result<()> {
        self.primitive(Tag::OctetString, value.as_bytes())
    }

    fn encode_null(&mut self) -> Result<()> {
        self.primitive(Tag::Null, &[])
    }

    fn encode_object_identifier(&mut self, value: &ObjectIdentifier) -> Result<()> {
        let content = value.to_content_octets()?;
        self.primitive(Tag::ObjectIdentifier, &content)
    }

    fn encode_utf8_string(&mut self, value: &str) -> Result<()> {
        self.primitive(Tag::UTF8String, value.as_bytes())
    }

    fn encode_printable_string(&mut self, value: &str) -> Result<()> {
        self.ascii(Tag::PrintableString, "PrintableString", value)
    }

    fn encode_ia5_string(&mut self, value: &str) -> Result<()> {
        self.ascii(Tag::IA5String, "IA5String", value)
    }

    fn encode_sequence(&mut self, elements: &[Element]) -> Result<()> {
        self.constructed(Tag::Sequence, elements)
    }

    // Elements keep the order they were given in.
    fn encode_set(&mut self, elements: &[Element]) -> Result<()> {
        self.constructed(Tag::Set, elements)
    }

    fn encode_utc_time(&mut self, value: &NaiveDateTime) -> Result<()> {
        // two-digit years only cover this window
        if !(1950..=2049).contains(&value.year()) {
            return Err(Error::UtcTimeInvalidFormat(value.to_string()));
        }
        let formatted = value.format(UTC_TIME_FORMAT).to_string();
        self.primitive(Tag::UTCTime, formatted.as_bytes())
    }

    fn encode_tagged(&mut self, tag: u8, data: &[u8]) -> Result<()> {
        write_header(tag, data.len(), &mut self.data)?;
        self.data.extend_from_slice(data);
        Ok(())
    }
}
