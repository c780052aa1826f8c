//! The signed envelope shared by certificates and certification requests:
//!
//! ```asn1
//! SEQUENCE {
//!     info                 ANY,
//!     signatureAlgorithm   AlgorithmIdentifier,
//!     signature            BIT STRING
//! }
//! ```

use sigil::encoder::Encoder;
use sigil_asn1::{BitString, Element};
use sigil_pkix_types::{AlgorithmIdentifier, DigestAlgorithm, Signer};

use crate::error::{Error, Result};

/// Signs the DER encoding of `info` and wraps it with the algorithm and
/// signature. Returns the DER encoding of the envelope.
pub fn sign_structure<S: Signer>(info: &Element, signer: &S, algorithm: DigestAlgorithm) -> Result<Vec<u8>> {
    let to_sign = info.to_der()?;
    let signature = signer
        .sign(&to_sign, algorithm)
        .map_err(|e| Error::Signer(Box::new(e)))?;
    log::debug!(
        "signed {} bytes with {}, signature is {} bytes",
        to_sign.len(),
        algorithm,
        signature.len()
    );

    let envelope = Element::Sequence(vec![
        info.clone(),
        algorithm.signature_algorithm().encode()?,
        Element::BitString(BitString::from_bytes(signature)),
    ]);
    Ok(envelope.to_der()?)
}

/// The three parts of a decoded envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedParts {
    pub info: Element,
    pub algorithm: AlgorithmIdentifier,
    pub signature: BitString,
}

impl SignedParts {
    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        let element = sigil_asn1::decode(bytes)?;
        let (info, algorithm, signature) = match element.as_sequence() {
            Some([info, algorithm, signature]) => (info, algorithm, signature),
            Some(items) => {
                return Err(Error::InvalidCertificate(format!(
                    "expected 3 elements, got {}",
                    items.len()
                )));
            }
            None => {
                return Err(Error::InvalidCertificate(format!(
                    "expected SEQUENCE, found {}",
                    element.type_name()
                )));
            }
        };
        if info.as_sequence().is_none() {
            return Err(Error::InvalidCertificate(format!(
                "signed info must be a SEQUENCE, found {}",
                info.type_name()
            )));
        }
        let algorithm: AlgorithmIdentifier = sigil::decoder::Decoder::decode(algorithm)?;
        let signature = signature
            .as_bit_string()
            .ok_or_else(|| Error::InvalidCertificate("signature must be a BIT STRING".to_string()))?;

        Ok(Self {
            info: info.clone(),
            algorithm,
            signature: signature.clone(),
        })
    }

    pub fn digest_algorithm(&self) -> Result<DigestAlgorithm> {
        Ok(DigestAlgorithm::try_from(&self.algorithm.algorithm)?)
    }
}
