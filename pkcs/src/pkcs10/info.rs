//! CertificationRequestInfo assembly
//!
//! ```asn1
//! CertificationRequestInfo ::= SEQUENCE {
//!     version       INTEGER { v1(0) } (v1,...),
//!     subject       Name,
//!     subjectPKInfo SubjectPublicKeyInfo{{ PKInfoAlgorithms }},
//!     attributes    [0] Attributes{{ CRIAttributes }}
//! }
//!
//! Attribute { ATTRIBUTE:IOSet } ::= SEQUENCE {
//!     type   ATTRIBUTE.&id({IOSet}),
//!     values SET SIZE(1..MAX) OF ATTRIBUTE.&Type({IOSet}{@type})
//! }
//! ```
//!
//! The attributes block always carries a single extensionRequest attribute.
//! Its value SET holds the requested Extensions, or nothing when no key
//! usage was asked for.

use sigil::decoder::Decoder;
use sigil::encoder::Encoder;
use sigil_asn1::{Element, ObjectIdentifier};
use sigil_pkix_types::{Name, SubjectPublicKeyInfo, oids};
use sigil_x509::{Extensions, KeyUsage};

use crate::error::{Error, Result};

pub const VERSION_V1: u64 = 0;
pub const ATTRIBUTES_TAG: u8 = 0xa0;

/// `SEQUENCE { extensionRequest, SET { Extensions } }`
pub fn extension_request(key_usage: Option<KeyUsage>) -> Result<Element> {
    let values = match key_usage {
        Some(usage) => vec![Extensions::for_key_usage(Some(usage))?.encode()?],
        None => Vec::new(),
    };
    Ok(Element::Sequence(vec![
        Element::object_identifier(oids::EXTENSION_REQUEST),
        Element::Set(values),
    ]))
}

/// The `[0]` attributes block.
pub fn attributes(key_usage: Option<KeyUsage>) -> Result<Element> {
    Ok(Element::explicit(0, &extension_request(key_usage)?)?)
}

pub fn certification_request_info(
    subject: &Name,
    public_key: &Element,
    key_usage: Option<KeyUsage>,
) -> Result<Element> {
    let spki = SubjectPublicKeyInfo::from_public_key(ObjectIdentifier::from(oids::RSA_ENCRYPTION), public_key)?;
    let info = Element::Sequence(vec![
        Element::integer_from_u64(VERSION_V1),
        subject.encode()?,
        spki.encode()?,
        attributes(key_usage)?,
    ]);
    log::debug!(
        "assembled CertificationRequestInfo subject=\"{}\" key_usage={:?}",
        subject,
        key_usage
    );
    Ok(info)
}

/// Extensions requested in the content octets of an attributes block.
///
/// Attributes other than extensionRequest are skipped. Returns `None` when
/// there is no extensionRequest or its value SET is empty.
pub fn requested_extensions(attributes: &[u8]) -> Result<Option<Extensions>> {
    for attribute in sigil_asn1::decode_all(attributes)? {
        let (oid, values) = match attribute.as_sequence() {
            Some([Element::ObjectIdentifier(oid), Element::Set(values)]) => (oid, values),
            _ => {
                return Err(Error::InvalidAttributes(format!(
                    "expected SEQUENCE {{ OBJECT IDENTIFIER, SET }}, found {}",
                    attribute.type_name()
                )));
            }
        };
        if oid.components() != oids::EXTENSION_REQUEST {
            log::debug!("skipping request attribute {}", oid);
            continue;
        }
        return match values.first() {
            Some(extensions) => Ok(Some(extensions.decode()?)),
            None => Ok(None),
        };
    }
    Ok(None)
}
