//! TBSCertificate assembly
//!
//! ```asn1
//! TBSCertificate  ::=  SEQUENCE  {
//!     version         [0]  EXPLICIT Version DEFAULT v1,
//!     serialNumber         CertificateSerialNumber,
//!     signature            AlgorithmIdentifier,
//!     issuer               Name,
//!     validity             Validity,
//!     subject              Name,
//!     subjectPublicKeyInfo SubjectPublicKeyInfo,
//!     issuerUniqueID  [1]  IMPLICIT UniqueIdentifier OPTIONAL,
//!     subjectUniqueID [2]  IMPLICIT UniqueIdentifier OPTIONAL,
//!     extensions      [3]  EXPLICIT Extensions OPTIONAL
//! }
//! ```
//!
//! Certificates built here are always v3 with an RSA subject key, the
//! signature field fixed to sha256WithRSAEncryption, and an extensions
//! block that is present even when empty. The unique identifiers are
//! written with a constructed tag wrapping a complete BIT STRING.

use chrono::{DateTime, Utc};
use sigil::encoder::{EncodableTo, Encoder};
use sigil_asn1::{BitSet, BitString, Element, ObjectIdentifier};
use sigil_pkix_types::{CertificateSerialNumber, DigestAlgorithm, Name, SubjectPublicKeyInfo, oids};

use crate::error::{Error, Result};
use crate::extensions::{Extensions, KeyUsage};

pub const VERSION_V3: u64 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateInfo {
    pub serial_number: CertificateSerialNumber,
    pub issuer: Name,
    pub issuer_unique_id: Option<BitSet>,
    pub subject: Name,
    pub subject_unique_id: Option<BitSet>,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
    /// Subject public key structure, e.g. a PKCS#1 `RSAPublicKey` SEQUENCE.
    pub public_key: Element,
    pub key_usage: Option<KeyUsage>,
}

fn unique_id(slot: u8, id: &BitSet) -> Result<Element> {
    Ok(Element::explicit(slot, &Element::BitString(BitString::from(id)))?)
}

impl EncodableTo<CertificateInfo> for Element {}

impl Encoder<CertificateInfo, Element> for CertificateInfo {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let spki = SubjectPublicKeyInfo::from_public_key(
            ObjectIdentifier::from(oids::RSA_ENCRYPTION),
            &self.public_key,
        )?;

        let mut items = vec![
            Element::explicit(0, &Element::integer_from_u64(VERSION_V3))?,
            self.serial_number.encode()?,
            DigestAlgorithm::Sha256.signature_algorithm().encode()?,
            self.issuer.encode()?,
            Element::Sequence(vec![
                Element::utc_time(self.not_before),
                Element::utc_time(self.not_after),
            ]),
            self.subject.encode()?,
            spki.encode()?,
        ];
        if let Some(id) = &self.issuer_unique_id {
            items.push(unique_id(1, id)?);
        }
        if let Some(id) = &self.subject_unique_id {
            items.push(unique_id(2, id)?);
        }
        let extensions: Element = Extensions::for_key_usage(self.key_usage)?.encode()?;
        items.push(Element::explicit(3, &extensions)?);

        log::debug!(
            "assembled TBSCertificate serial={} subject=\"{}\" fields={}",
            self.serial_number,
            self.subject,
            items.len()
        );
        Ok(Element::Sequence(items))
    }
}
