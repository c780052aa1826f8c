use sigil_x509::CertificateBuilder;

use super::CertificationRequest;
use crate::error::Result;

/// Starts a certificate from the contents of a request.
pub trait CertificateBuilderExt: Sized {
    /// Pre-fills subject, public key and key usage. Issuer, serial number
    /// and validity are left to the caller.
    fn from_request(request: &CertificationRequest) -> Result<Self>;
}

impl CertificateBuilderExt for CertificateBuilder {
    fn from_request(request: &CertificationRequest) -> Result<Self> {
        let mut builder = CertificateBuilder::new()
            .subject(request.subject()?)
            .public_key(request.public_key()?);
        if let Some(usage) = request.key_usage()? {
            builder = builder.key_usage(usage);
        }
        Ok(builder)
    }
}

#[cfg(test)]
mod tests {
    use sigil_asn1::Element;
    use sigil_pkix_types::NameEntry;
    use sigil_x509::KeyUsage;

    use super::*;
    use crate::pkcs10::certification_request_info;

    #[test]
    fn test_from_request() {
        let subject = vec![NameEntry::new("CN", "svc"), NameEntry::new("O", "Example")];
        let public_key = Element::Sequence(vec![Element::integer_from_u64(0xabcd), Element::integer_from_u64(3)]);
        let info = certification_request_info(
            &sigil_pkix_types::Name::build(&subject).unwrap(),
            &public_key,
            Some(KeyUsage::KEY_CERT_SIGN),
        )
        .unwrap();
        let der = sigil_x509::sign_structure(&info, &NoSignature, sigil_pkix_types::DigestAlgorithm::Sha256).unwrap();

        let request = CertificationRequest::from_der(&der).unwrap();
        let builder = CertificateBuilder::from_request(&request).unwrap();
        assert_eq!(Some(subject.as_slice()), builder.subject_entries());
        assert_eq!(Some(public_key.to_der().unwrap().as_slice()), builder.public_key_bytes());
        assert_eq!(Some(KeyUsage::KEY_CERT_SIGN), builder.key_usage_flags());
    }

    struct NoSignature;

    impl sigil_pkix_types::Signer for NoSignature {
        type Error = std::convert::Infallible;

        fn sign(
            &self,
            _: &[u8],
            _: sigil_pkix_types::DigestAlgorithm,
        ) -> std::result::Result<Vec<u8>, Self::Error> {
            Ok(Vec::new())
        }
    }
}
