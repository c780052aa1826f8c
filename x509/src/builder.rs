use chrono::{DateTime, Duration, SubsecRound, Utc};
use sigil::encoder::Encoder;
use sigil_asn1::{BitSet, Element};
use sigil_pkix_types::{CertificateSerialNumber, DigestAlgorithm, Name, NameEntry, RandomSource, Signer};

use crate::certificate_info::CertificateInfo;
use crate::error::{Error, Result};
use crate::extensions::KeyUsage;
use crate::signed::sign_structure;

/// Validity period used when no end date is set.
pub const DEFAULT_VALIDITY_DAYS: i64 = 365;

/// Collects the fields of a v3 certificate and produces its signed DER.
///
/// ```no_run
/// # use sigil_pkix_types::{DigestAlgorithm, NameEntry, Signer};
/// # use sigil_x509::{CertificateBuilder, KeyUsage};
/// # fn run<S: Signer>(signer: &S, public_key: Vec<u8>) -> sigil_x509::Result<Vec<u8>> {
/// let name = vec![NameEntry::new("CN", "example.test")];
/// CertificateBuilder::new()
///     .serial_number(&[0x01])
///     .issuer(name.clone())
///     .subject(name)
///     .public_key(public_key)
///     .key_usage(KeyUsage::DIGITAL_SIGNATURE | KeyUsage::KEY_ENCIPHERMENT)
///     .build(signer, DigestAlgorithm::Sha256)
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateBuilder {
    serial_number: Option<CertificateSerialNumber>,
    issuer: Option<Vec<NameEntry>>,
    issuer_unique_id: Option<u64>,
    subject: Option<Vec<NameEntry>>,
    subject_unique_id: Option<u64>,
    not_before: DateTime<Utc>,
    not_after: Option<DateTime<Utc>>,
    public_key: Option<Vec<u8>>,
    key_usage: Option<KeyUsage>,
}

impl Default for CertificateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CertificateBuilder {
    /// A builder whose validity starts now.
    pub fn new() -> Self {
        Self {
            serial_number: None,
            issuer: None,
            issuer_unique_id: None,
            subject: None,
            subject_unique_id: None,
            not_before: Utc::now().trunc_subsecs(0),
            not_after: None,
            public_key: None,
            key_usage: None,
        }
    }

    /// Unsigned big-endian magnitude.
    pub fn serial_number(mut self, bytes: &[u8]) -> Self {
        self.serial_number = Some(CertificateSerialNumber::from_bytes(bytes));
        self
    }

    pub fn generate_serial_number<R: RandomSource>(mut self, random: &mut R) -> Result<Self> {
        self.serial_number = Some(CertificateSerialNumber::generate(random)?);
        Ok(self)
    }

    pub fn issuer(mut self, entries: Vec<NameEntry>) -> Self {
        self.issuer = Some(entries);
        self
    }

    pub fn issuer_unique_id(mut self, id: u64) -> Self {
        self.issuer_unique_id = Some(id);
        self
    }

    pub fn subject(mut self, entries: Vec<NameEntry>) -> Self {
        self.subject = Some(entries);
        self
    }

    pub fn subject_unique_id(mut self, id: u64) -> Self {
        self.subject_unique_id = Some(id);
        self
    }

    pub fn not_before(mut self, time: DateTime<Utc>) -> Self {
        self.not_before = time;
        self
    }

    pub fn not_after(mut self, time: DateTime<Utc>) -> Self {
        self.not_after = Some(time);
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

    pub fn subject_entries(&self) -> Option<&[NameEntry]> {
        self.subject.as_deref()
    }

    pub fn public_key_bytes(&self) -> Option<&[u8]> {
        self.public_key.as_deref()
    }

    pub fn key_usage_flags(&self) -> Option<KeyUsage> {
        self.key_usage
    }

    pub fn validity(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let not_after = self
            .not_after
            .unwrap_or(self.not_before + Duration::days(DEFAULT_VALIDITY_DAYS));
        (self.not_before, not_after)
    }

    /// Resolves the collected fields into a [`CertificateInfo`].
    pub fn certificate_info(&self) -> Result<CertificateInfo> {
        let serial_number = self
            .serial_number
            .clone()
            .ok_or(Error::MissingField("serial number"))?;
        let issuer = self.issuer.as_deref().ok_or(Error::MissingField("issuer"))?;
        let subject = self.subject.as_deref().ok_or(Error::MissingField("subject"))?;
        let public_key = self.public_key.as_deref().ok_or(Error::MissingField("public key"))?;

        let public_key = sigil_asn1::decode(public_key)
            .map_err(|e| Error::InvalidPublicKey(e.to_string()))?;
        if public_key.as_sequence().is_none() {
            return Err(Error::InvalidPublicKey(format!(
                "expected SEQUENCE, found {}",
                public_key.type_name()
            )));
        }

        let (not_before, not_after) = self.validity();
        if not_after < not_before {
            return Err(Error::InvalidValidity(format!(
                "notAfter {} is before notBefore {}",
                not_after, not_before
            )));
        }

        Ok(CertificateInfo {
            serial_number,
            issuer: Name::build(issuer)?,
            issuer_unique_id: self.issuer_unique_id.map(BitSet::from),
            subject: Name::build(subject)?,
            subject_unique_id: self.subject_unique_id.map(BitSet::from),
            not_before,
            not_after,
            public_key,
            key_usage: self.key_usage,
        })
    }

    /// Assembles, signs and encodes the certificate.
    pub fn build<S: Signer>(&self, signer: &S, algorithm: DigestAlgorithm) -> Result<Vec<u8>> {
        let info: Element = self.certificate_info()?.encode()?;
        let der = sign_structure(&info, signer, algorithm)?;
        log::info!("built certificate ({} bytes, {})", der.len(), algorithm);
        Ok(der)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rstest::rstest;
    use sigil_asn1::Integer;

    use super::*;

    fn rsa_public_key() -> Vec<u8> {
        Element::Sequence(vec![
            Element::Integer(Integer::from_unsigned_bytes(&[0xc3; 64])),
            Element::integer_from_u64(65537),
        ])
        .to_der()
        .unwrap()
    }

    fn complete() -> CertificateBuilder {
        let name = vec![NameEntry::new("CN", "Unit Testing")];
        CertificateBuilder::new()
            .serial_number(&[0x2a])
            .issuer(name.clone())
            .subject(name)
            .public_key(rsa_public_key())
    }

    #[rstest(
        field,
        case("serial number"),
        case("issuer"),
        case("subject"),
        case("public key"),
    )]
    fn test_missing_field(field: &str) {
        let mut builder = complete();
        match field {
            "serial number" => builder.serial_number = None,
            "issuer" => builder.issuer = None,
            "subject" => builder.subject = None,
            _ => builder.public_key = None,
        }
        match builder.certificate_info() {
            Err(Error::MissingField(missing)) => assert_eq!(field, missing),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_complete_builder() {
        assert!(complete().certificate_info().is_ok());
    }

    #[test]
    fn test_default_validity() {
        let start = Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap();
        let builder = complete().not_before(start);
        let (not_before, not_after) = builder.validity();
        assert_eq!(start, not_before);
        assert_eq!(Utc.with_ymd_and_hms(2025, 2, 28, 12, 0, 0).unwrap(), not_after);
    }

    #[test]
    fn test_inverted_validity() {
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let builder = complete()
            .not_before(start)
            .not_after(start - Duration::seconds(1));
        assert!(matches!(builder.certificate_info(), Err(Error::InvalidValidity(_))));
    }

    #[rstest]
    #[case(vec![0x05, 0x00])]
    #[case(vec![0x30, 0x05, 0x02])]
    #[case(vec![])]
    fn test_invalid_public_key(#[case] der: Vec<u8>) {
        let builder = complete().public_key(der);
        assert!(matches!(builder.certificate_info(), Err(Error::InvalidPublicKey(_))));
    }

    #[test]
    fn test_unknown_name_attribute() {
        let builder = complete().subject(vec![NameEntry::new("XX", "nope")]);
        assert!(matches!(builder.certificate_info(), Err(Error::PkixTypes(_))));
    }

    #[test]
    fn test_certificate_info_fields() {
        let builder = complete()
            .issuer_unique_id(3)
            .key_usage(KeyUsage::KEY_CERT_SIGN);
        let info = builder.certificate_info().unwrap();
        assert_eq!("2a", info.serial_number.format_hex());
        assert_eq!(Some(BitSet::from(3u64)), info.issuer_unique_id);
        assert_eq!(None, info.subject_unique_id);
        assert_eq!(Some(KeyUsage::KEY_CERT_SIGN), info.key_usage);
        assert_eq!("CN=Unit Testing", info.subject.to_string());
    }
}
