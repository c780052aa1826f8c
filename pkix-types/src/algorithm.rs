//! AlgorithmIdentifier and the digest algorithms used for signing
//!
//! ```asn1
//! AlgorithmIdentifier  ::=  SEQUENCE  {
//!     algorithm               OBJECT IDENTIFIER,
//!     parameters              ANY DEFINED BY algorithm OPTIONAL
//! }
//! ```

use std::fmt;

use sigil::decoder::{DecodableFrom, Decoder};
use sigil::encoder::{EncodableTo, Encoder};
use sigil_asn1::{Element, ObjectIdentifier};

use crate::error::{Error, Result};
use crate::oids;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmIdentifier {
    pub algorithm: ObjectIdentifier,
    pub parameters: Option<Element>,
}

impl AlgorithmIdentifier {
    /// Identifier with an explicit NULL parameter, as RSA algorithms use.
    pub fn with_null(algorithm: ObjectIdentifier) -> Self {
        Self {
            algorithm,
            parameters: Some(Element::Null),
        }
    }

    pub fn rsa_encryption() -> Self {
        Self::with_null(ObjectIdentifier::from(oids::RSA_ENCRYPTION))
    }
}

impl DecodableFrom<Element> for AlgorithmIdentifier {}

impl Decoder<Element, AlgorithmIdentifier> for Element {
    type Error = Error;

    fn decode(&self) -> Result<AlgorithmIdentifier> {
        match self.as_sequence() {
            Some([Element::ObjectIdentifier(algorithm)]) => Ok(AlgorithmIdentifier {
                algorithm: algorithm.clone(),
                parameters: None,
            }),
            Some([Element::ObjectIdentifier(algorithm), parameters]) => Ok(AlgorithmIdentifier {
                algorithm: algorithm.clone(),
                parameters: Some(parameters.clone()),
            }),
            _ => Err(Error::AlgorithmIdentifierInvalid),
        }
    }
}

impl EncodableTo<AlgorithmIdentifier> for Element {}

impl Encoder<AlgorithmIdentifier, Element> for AlgorithmIdentifier {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let mut elements = vec![Element::ObjectIdentifier(self.algorithm.clone())];
        if let Some(parameters) = &self.parameters {
            elements.push(parameters.clone());
        }
        Ok(Element::Sequence(elements))
    }
}

/// Digest paired with RSA when a signer produces a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl DigestAlgorithm {
    pub const ALL: [DigestAlgorithm; 5] = [
        DigestAlgorithm::Sha1,
        DigestAlgorithm::Sha224,
        DigestAlgorithm::Sha256,
        DigestAlgorithm::Sha384,
        DigestAlgorithm::Sha512,
    ];

    /// The matching `sha*WithRSAEncryption` OID.
    pub fn signature_oid(&self) -> ObjectIdentifier {
        let components = match self {
            DigestAlgorithm::Sha1 => oids::SHA1_WITH_RSA_ENCRYPTION,
            DigestAlgorithm::Sha224 => oids::SHA224_WITH_RSA_ENCRYPTION,
            DigestAlgorithm::Sha256 => oids::SHA256_WITH_RSA_ENCRYPTION,
            DigestAlgorithm::Sha384 => oids::SHA384_WITH_RSA_ENCRYPTION,
            DigestAlgorithm::Sha512 => oids::SHA512_WITH_RSA_ENCRYPTION,
        };
        ObjectIdentifier::from(components)
    }

    pub fn signature_algorithm(&self) -> AlgorithmIdentifier {
        AlgorithmIdentifier::with_null(self.signature_oid())
    }
}

impl TryFrom<&ObjectIdentifier> for DigestAlgorithm {
    type Error = Error;

    fn try_from(oid: &ObjectIdentifier) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.signature_oid() == *oid)
            .ok_or_else(|| Error::UnknownSignatureAlgorithm(oid.clone()))
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DigestAlgorithm::Sha1 => "SHA-1",
            DigestAlgorithm::Sha224 => "SHA-224",
            DigestAlgorithm::Sha256 => "SHA-256",
            DigestAlgorithm::Sha384 => "SHA-384",
            DigestAlgorithm::Sha512 => "SHA-512",
        };
        write!(f, "{}", name)
    }
}
