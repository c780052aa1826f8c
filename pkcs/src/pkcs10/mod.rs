//! PKCS#10 certification requests (RFC 2986)
//!
//! ```asn1
//! CertificationRequest ::= SEQUENCE {
//!     certificationRequestInfo CertificationRequestInfo,
//!     signatureAlgorithm       AlgorithmIdentifier{{ SignatureAlgorithms }},
//!     signature                BIT STRING
//! }
//! ```

use sigil::decoder::Decoder;
use sigil_asn1::Element;
use sigil_pkix_types::{DigestAlgorithm, Name, NameEntry, SubjectPublicKeyInfo};
use sigil_x509::{Extensions, KeyUsage, SignedParts};

use crate::error::{Error, Result};

pub mod builder;
pub mod info;
pub mod issue;

pub use builder::CertificationRequestBuilder;
pub use info::{attributes, certification_request_info, extension_request, requested_extensions};
pub use issue::CertificateBuilderExt;

/// A decoded request. Fields are interpreted on access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificationRequest {
    parts: SignedParts,
}

impl CertificationRequest {
    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        let parts = SignedParts::from_der(bytes)?;
        match parts.info.as_sequence() {
            Some([Element::Integer(_), _, _, Element::Tagged { .. }]) => Ok(Self { parts }),
            Some(fields) => Err(Error::InvalidRequest(format!(
                "expected version, subject, subjectPKInfo and attributes, got {} fields",
                fields.len()
            ))),
            None => Err(Error::InvalidRequest("expected SEQUENCE".to_string())),
        }
    }

    pub fn certification_request_info(&self) -> &Element {
        &self.parts.info
    }

    fn field(&self, index: usize) -> Result<&Element> {
        self.parts
            .info
            .as_sequence()
            .and_then(|fields| fields.get(index))
            .ok_or_else(|| Error::InvalidRequest(format!("missing field {}", index)))
    }

    pub fn version(&self) -> Result<u64> {
        self.field(0)?
            .as_integer()
            .and_then(|version| version.to_u64())
            .ok_or_else(|| Error::InvalidRequest("version must be a small INTEGER".to_string()))
    }

    pub fn subject_name(&self) -> Result<Name> {
        Ok(self.field(1)?.decode()?)
    }

    pub fn subject(&self) -> Result<Vec<NameEntry>> {
        Ok(self.subject_name()?.parse()?)
    }

    pub fn subject_public_key_info(&self) -> Result<SubjectPublicKeyInfo> {
        Ok(self.field(2)?.decode()?)
    }

    /// Payload of the subjectPublicKey BIT STRING: the DER of the key
    /// structure.
    pub fn public_key(&self) -> Result<Vec<u8>> {
        Ok(self.subject_public_key_info()?.public_key_bytes().to_vec())
    }

    pub fn extensions(&self) -> Result<Option<Extensions>> {
        let data = self
            .field(3)?
            .tagged_data(info::ATTRIBUTES_TAG)
            .ok_or_else(|| Error::InvalidAttributes("expected [0] attributes".to_string()))?;
        requested_extensions(data)
    }

    /// Requested key usage; `None` when the request asks for no extensions.
    pub fn key_usage(&self) -> Result<Option<KeyUsage>> {
        match self.extensions()? {
            Some(extensions) => Ok(extensions.find::<KeyUsage>()?),
            None => Ok(None),
        }
    }

    pub fn signature_algorithm(&self) -> Result<DigestAlgorithm> {
        Ok(self.parts.digest_algorithm()?)
    }

    pub fn signature(&self) -> &[u8] {
        self.parts.signature.as_bytes()
    }
}
