//! DER tag/length/value layer.
//!
//! This crate only knows about tags, lengths and raw payloads. It splits a
//! byte buffer into [`Tlv`] units, recursing into SEQUENCE and SET, and
//! writes units back out using the DER length rules this toolkit supports:
//!
//! | length          | encoding                     |
//! |-----------------|------------------------------|
//! | 0..=127         | one byte                     |
//! | 128..=255       | `0x81`, one length byte      |
//! | 256..=32767     | `0x82`, two length bytes     |
//!
//! Anything larger is rejected with [`Error::UnsupportedLength`].

use nom::Parser;
use nom::bytes::complete::take;
use nom::number::complete::be_u8;
use sigil::decoder::{DecodableFrom, Decoder};
use sigil::encoder::{EncodableTo, Encoder};

pub mod error;

pub use error::{Error, Result};

pub const TAG_CONSTRUCTED: u8 = 0x20;
pub const TAG_CONTEXT_SPECIFIC: u8 = 0x80;

/// Largest length the encoder accepts.
pub const MAX_LENGTH: usize = 0x7fff;

// A 4 byte length already exceeds any certificate this crate is meant for.
const MAX_LENGTH_OCTETS: u8 = 4;
const MAX_DEPTH: usize = 64;

type NomError<'a> = nom::error::Error<&'a [u8]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tag {
    Boolean,
    Integer,
    BitString,
    OctetString,
    Null,
    ObjectIdentifier,
    UTF8String,
    PrintableString,
    IA5String,
    UTCTime,
    Sequence,
    Set,
    Other(u8),
}

impl Tag {
    /// Tag byte of a context-specific tag, e.g. `[3]` constructed is `0xa3`.
    pub fn context_specific(slot: u8, constructed: bool) -> u8 {
        let tag = TAG_CONTEXT_SPECIFIC | (slot & 0x1f);
        if constructed {
            tag | TAG_CONSTRUCTED
        } else {
            tag
        }
    }

    pub fn is_constructed(&self) -> bool {
        u8::from(*self) & TAG_CONSTRUCTED == TAG_CONSTRUCTED
    }
}

impl From<u8> for Tag {
    fn from(value: u8) -> Self {
        match value {
            0x01 => Tag::Boolean,
            0x02 => Tag::Integer,
            0x03 => Tag::BitString,
            0x04 => Tag::OctetString,
            0x05 => Tag::Null,
            0x06 => Tag::ObjectIdentifier,
            0x0c => Tag::UTF8String,
            0x13 => Tag::PrintableString,
            0x16 => Tag::IA5String,
            0x17 => Tag::UTCTime,
            0x30 => Tag::Sequence,
            0x31 => Tag::Set,
            _ => Tag::Other(value),
        }
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> Self {
        match tag {
            Tag::Boolean => 0x01,
            Tag::Integer => 0x02,
            Tag::BitString => 0x03,
            Tag::OctetString => 0x04,
            Tag::Null => 0x05,
            Tag::ObjectIdentifier => 0x06,
            Tag::UTF8String => 0x0c,
            Tag::PrintableString => 0x13,
            Tag::IA5String => 0x16,
            Tag::UTCTime => 0x17,
            Tag::Sequence => 0x30,
            Tag::Set => 0x31,
            Tag::Other(value) => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Constructed(Vec<Tlv>),
    Primitive(Vec<u8>),
}

/// One tag/length/value unit.
///
/// Only SEQUENCE and SET are split into children; every other tag,
/// including constructed context-specific tags, keeps its payload verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tlv {
    tag: Tag,
    value: Value,
}

impl Tlv {
    pub fn new_primitive(tag: Tag, data: Vec<u8>) -> Self {
        Tlv {
            tag,
            value: Value::Primitive(data),
        }
    }

    pub fn new_constructed(tag: Tag, tlvs: Vec<Tlv>) -> Self {
        Tlv {
            tag,
            value: Value::Constructed(tlvs),
        }
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn data(&self) -> Option<&[u8]> {
        match &self.value {
            Value::Primitive(data) => Some(data),
            Value::Constructed(_) => None,
        }
    }

    pub fn tlvs(&self) -> Option<&[Tlv]> {
        match &self.value {
            Value::Constructed(tlvs) => Some(tlvs),
            Value::Primitive(_) => None,
        }
    }

    /// Appends the DER encoding of this unit to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) -> Result<()> {
        match &self.value {
            Value::Primitive(data) => {
                write_header(self.tag.into(), data.len(), out)?;
                out.extend_from_slice(data);
            }
            Value::Constructed(tlvs) => {
                let mut content = Vec::new();
                for tlv in tlvs {
                    tlv.write_to(&mut content)?;
                }
                write_header(self.tag.into(), content.len(), out)?;
                out.extend_from_slice(&content);
            }
        }
        Ok(())
    }
}

/// Top-level units of a DER buffer, in buffer order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Der {
    elements: Vec<Tlv>,
}

impl Der {
    pub fn new(elements: Vec<Tlv>) -> Self {
        Der { elements }
    }

    pub fn elements(&self) -> &[Tlv] {
        &self.elements
    }
}

impl<'a> DecodableFrom<&'a [u8]> for Der {}

impl<'a> Decoder<&'a [u8], Der> for &'a [u8] {
    type Error = Error;

    fn decode(&self) -> Result<Der> {
        let elements = parse_items(self, 0, self.len())?;
        Ok(Der { elements })
    }
}

impl DecodableFrom<Vec<u8>> for Der {}

impl Decoder<Vec<u8>, Der> for Vec<u8> {
    type Error = Error;

    fn decode(&self) -> Result<Der> {
        self.as_slice().decode()
    }
}

impl EncodableTo<Der> for Vec<u8> {}

impl Encoder<Der, Vec<u8>> for Der {
    type Error = Error;

    fn encode(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        for tlv in &self.elements {
            tlv.write_to(&mut out)?;
        }
        Ok(out)
    }
}

/// Parses exactly one unit starting at `offset`.
///
/// Returns the unit and the offset just past it. Reads never go beyond
/// `buf.len()`.
pub fn parse_item(buf: &[u8], offset: usize) -> Result<(Tlv, usize)> {
    parse_item_at_depth(buf, offset, 0)
}

/// Parses units from `offset` until `end` is reached.
///
/// Children may not extend past `end`, so a unit whose declared length
/// crosses it fails with [`Error::LengthExceedsInput`].
pub fn parse_items(buf: &[u8], offset: usize, end: usize) -> Result<Vec<Tlv>> {
    parse_items_at_depth(buf, offset, end, 0)
}

fn parse_items_at_depth(buf: &[u8], offset: usize, end: usize, depth: usize) -> Result<Vec<Tlv>> {
    let window = buf.get(..end).ok_or(Error::OffsetOutOfBounds {
        offset: end,
        len: buf.len(),
    })?;

    let mut tlvs = Vec::new();
    let mut offset = offset;
    while offset < end {
        let (tlv, next) = parse_item_at_depth(window, offset, depth)?;
        tlvs.push(tlv);
        offset = next;
    }
    Ok(tlvs)
}

fn parse_item_at_depth(buf: &[u8], offset: usize, depth: usize) -> Result<(Tlv, usize)> {
    if depth > MAX_DEPTH {
        return Err(Error::NestingTooDeep(MAX_DEPTH));
    }
    let input = buf.get(offset..).ok_or(Error::OffsetOutOfBounds {
        offset,
        len: buf.len(),
    })?;

    let (input, tag) = parse_tag(input)?;
    let (input, length) = parse_length(input)?;
    if length > input.len() {
        return Err(Error::LengthExceedsInput {
            length,
            remaining: input.len(),
        });
    }

    let start = buf.len() - input.len();
    let end = start + length;
    log::trace!("tlv tag={:#04x} length={} offset={}", u8::from(tag), length, offset);

    let tlv = match tag {
        Tag::Sequence | Tag::Set => {
            let tlvs = parse_items_at_depth(buf, start, end, depth + 1)?;
            Tlv::new_constructed(tag, tlvs)
        }
        _ => Tlv::new_primitive(tag, buf[start..end].to_vec()),
    };
    Ok((tlv, end))
}

fn parse_tag(input: &[u8]) -> Result<(&[u8], Tag)> {
    let (input, n) = be_u8::<&[u8], NomError>(input)?;
    Ok((input, Tag::from(n)))
}

// A first byte up to and including 0x80 is taken literally; above it, the
// low bits count the big-endian length octets that follow.
fn parse_length(input: &[u8]) -> Result<(&[u8], usize)> {
    let (input, n) = be_u8::<&[u8], NomError>(input)?;
    if n <= 0x80 {
        return Ok((input, n as usize));
    }

    let octets = n - 0x80;
    if octets > MAX_LENGTH_OCTETS {
        return Err(Error::UnsupportedLengthOctets(octets));
    }
    let (input, bs) = take::<usize, &[u8], NomError>(octets as usize).parse(input)?;
    let length = bs.iter().fold(0usize, |n, &b| (n << 8) | b as usize);
    Ok((input, length))
}

/// Appends the DER length octets for `length`.
pub fn write_length(length: usize, out: &mut Vec<u8>) -> Result<()> {
    match length {
        0x00..=0x7f => out.push(length as u8),
        0x80..=0xff => out.extend_from_slice(&[0x81, length as u8]),
        0x100..=MAX_LENGTH => out.extend_from_slice(&[0x82, (length >> 8) as u8, length as u8]),
        _ => return Err(Error::UnsupportedLength(length)),
    }
    Ok(())
}

/// Appends a tag byte followed by the length octets.
pub fn write_header(tag: u8, length: usize, out: &mut Vec<u8>) -> Result<()> {
    out.push(tag);
    write_length(length, out)
}
