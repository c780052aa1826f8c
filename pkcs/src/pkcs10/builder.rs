use sigil_asn1::Element;
use sigil_pkix_types::{DigestAlgorithm, Name, NameEntry, Signer};
use sigil_x509::{KeyUsage, sign_structure};

use super::info::certification_request_info;
use crate::error::{Error, Result};

/// Collects the subject, public key and requested key usage of a PKCS#10
/// request and produces its signed DER.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificationRequestBuilder {
    subject: Option<Vec<NameEntry>>,
    public_key: Option<Vec<u8>>,
    key_usage: Option<KeyUsage>,
}

impl CertificationRequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subject(mut self, entries: Vec<NameEntry>) -> Self {
        self.subject = Some(entries);
        self
    }

    /// DER of the subject key structure, e.g. a PKCS#1 `RSAPublicKey`.
    pub fn public_key(mut self, der: Vec<u8>) -> Self {
        self.public_key = Some(der);
        self
    }

    pub fn key_usage(mut self, usage: KeyUsage) -> Self {
        self.key_usage = Some(usage);
        self
    }

    pub fn certification_request_info(&self) -> Result<Element> {
        let subject = self.subject.as_deref().ok_or(Error::MissingField("subject"))?;
        let public_key = self.public_key.as_deref().ok_or(Error::MissingField("public key"))?;

        let public_key = sigil_asn1::decode(public_key).map_err(|e| Error::InvalidPublicKey(e.to_string()))?;
        if public_key.as_sequence().is_none() {
            return Err(Error::InvalidPublicKey(format!(
                "expected SEQUENCE, found {}",
                public_key.type_name()
            )));
        }

        certification_request_info(&Name::build(subject)?, &public_key, self.key_usage)
    }

    pub fn build<S: Signer>(&self, signer: &S, algorithm: DigestAlgorithm) -> Result<Vec<u8>> {
        let info = self.certification_request_info()?;
        let der = sign_structure(&info, signer, algorithm)?;
        log::info!("built certification request ({} bytes, {})", der.len(), algorithm);
        Ok(der)
    }
}
