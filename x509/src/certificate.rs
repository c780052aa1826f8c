//! Read access to an encoded certificate
//!
//! ```asn1
//! Certificate  ::=  SEQUENCE  {
//!     tbsCertificate       TBSCertificate,
//!     signatureAlgorithm   AlgorithmIdentifier,
//!     signatureValue       BIT STRING
//! }
//! ```
//!
//! Fields are decoded on access. Only what the builder writes is
//! interpreted; other extensions are carried as raw [`Extension`] values.
//!
//! [`Extension`]: crate::extensions::Extension

use chrono::NaiveDateTime;
use sigil::decoder::Decoder;
use sigil_asn1::{BitString, Element};
use sigil_pkix_types::{
    AlgorithmIdentifier, CertificateSerialNumber, DigestAlgorithm, Name, SubjectPublicKeyInfo,
};

use crate::error::{Error, Result};
use crate::extensions::{Extensions, KeyUsage};
use crate::signed::SignedParts;

const VERSION_TAG: u8 = 0xa0;
const ISSUER_UNIQUE_ID_TAG: u8 = 0xa1;
const SUBJECT_UNIQUE_ID_TAG: u8 = 0xa2;
const EXTENSIONS_TAG: u8 = 0xa3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    parts: SignedParts,
}

impl Certificate {
    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        let parts = SignedParts::from_der(bytes)?;
        let certificate = Self { parts };
        // everything up to subjectPublicKeyInfo must be present
        certificate.field(5)?;
        Ok(certificate)
    }

    pub fn tbs_certificate(&self) -> &Element {
        &self.parts.info
    }

    fn tbs_fields(&self) -> &[Element] {
        self.parts.info.as_sequence().unwrap_or_default()
    }

    // index counts from serialNumber, skipping the optional version
    fn field(&self, index: usize) -> Result<&Element> {
        let fields = self.tbs_fields();
        let offset = match fields.first() {
            Some(first) if first.tagged_data(VERSION_TAG).is_some() => 1,
            _ => 0,
        };
        fields.get(offset + index).ok_or_else(|| {
            Error::InvalidTbsCertificate(format!(
                "expected at least {} fields, got {}",
                offset + index + 1,
                fields.len()
            ))
        })
    }

    fn optional_field(&self, tag: u8) -> Option<&[u8]> {
        self.tbs_fields().iter().find_map(|field| field.tagged_data(tag))
    }

    /// Zero-based version number; 2 means v3. Absent means v1.
    pub fn version(&self) -> Result<u64> {
        let Some(data) = self.tbs_fields().first().and_then(|f| f.tagged_data(VERSION_TAG)) else {
            return Ok(0);
        };
        sigil_asn1::decode(data)?
            .as_integer()
            .and_then(|i| i.to_u64())
            .ok_or_else(|| Error::InvalidTbsCertificate("version must be a small INTEGER".to_string()))
    }

    pub fn serial_number(&self) -> Result<CertificateSerialNumber> {
        Ok(self.field(0)?.decode()?)
    }

    /// The algorithm named inside the signed body.
    pub fn tbs_signature_algorithm(&self) -> Result<AlgorithmIdentifier> {
        Ok(self.field(1)?.decode()?)
    }

    pub fn issuer_name(&self) -> Result<Name> {
        Ok(self.field(2)?.decode()?)
    }

    pub fn validity(&self) -> Result<(NaiveDateTime, NaiveDateTime)> {
        match self.field(3)?.as_sequence() {
            Some([Element::UTCTime(not_before), Element::UTCTime(not_after)]) => Ok((*not_before, *not_after)),
            _ => Err(Error::InvalidValidity(
                "expected SEQUENCE of two UTCTime values".to_string(),
            )),
        }
    }

    pub fn subject_name(&self) -> Result<Name> {
        Ok(self.field(4)?.decode()?)
    }

    pub fn subject_public_key_info(&self) -> Result<SubjectPublicKeyInfo> {
        Ok(self.field(5)?.decode()?)
    }

    /// The public key structure carried in subjectPublicKeyInfo.
    pub fn public_key(&self) -> Result<Element> {
        let spki = self.subject_public_key_info()?;
        sigil_asn1::decode(spki.public_key_bytes()).map_err(|e| Error::InvalidPublicKey(e.to_string()))
    }

    pub fn issuer_unique_id(&self) -> Result<Option<BitString>> {
        self.unique_id(ISSUER_UNIQUE_ID_TAG)
    }

    pub fn subject_unique_id(&self) -> Result<Option<BitString>> {
        self.unique_id(SUBJECT_UNIQUE_ID_TAG)
    }

    fn unique_id(&self, tag: u8) -> Result<Option<BitString>> {
        let Some(data) = self.optional_field(tag) else {
            return Ok(None);
        };
        match sigil_asn1::decode(data)? {
            Element::BitString(bits) => Ok(Some(bits)),
            other => Err(Error::InvalidTbsCertificate(format!(
                "unique identifier must be a BIT STRING, found {}",
                other.type_name()
            ))),
        }
    }

    /// Extensions block; empty when the certificate has none.
    pub fn extensions(&self) -> Result<Extensions> {
        match self.optional_field(EXTENSIONS_TAG) {
            Some(data) => sigil_asn1::decode(data)?.decode(),
            None => Ok(Extensions::default()),
        }
    }

    pub fn key_usage(&self) -> Result<Option<KeyUsage>> {
        self.extensions()?.find::<KeyUsage>()
    }

    pub fn signature_algorithm(&self) -> Result<DigestAlgorithm> {
        self.parts.digest_algorithm()
    }

    pub fn signature(&self) -> &[u8] {
        self.parts.signature.as_bytes()
    }
}
