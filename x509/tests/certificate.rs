use std::convert::Infallible;

use chrono::{Duration, TimeZone, Utc};
use rstest::rstest;
use sigil::encoder::Encoder;
use sigil_asn1::{Element, Integer};
use sigil_pkix_types::{DigestAlgorithm, Name, NameEntry, RandomSource, Signer, oids};
use sigil_x509::{Certificate, CertificateBuilder, KeyUsage, StandardExtension};

/// Deterministic stand-in for an RSA signer: 256 bytes derived from the
/// input and the digest choice.
struct FakeSigner;

impl Signer for FakeSigner {
    type Error = Infallible;

    fn sign(&self, data: &[u8], algorithm: DigestAlgorithm) -> Result<Vec<u8>, Self::Error> {
        let seed = data.iter().fold(algorithm as u8, |acc, b| acc.wrapping_mul(31).wrapping_add(*b));
        Ok((0..256u16).map(|i| seed.wrapping_add(i as u8)).collect())
    }
}

struct CountingRandom(u8);

impl RandomSource for CountingRandom {
    type Error = Infallible;

    fn generate_bytes(&mut self, count: usize) -> Result<Vec<u8>, Self::Error> {
        let bytes = (0..count).map(|_| {
            self.0 = self.0.wrapping_add(1);
            self.0
        });
        Ok(bytes.collect())
    }
}

fn rsa_2048_public_key() -> Vec<u8> {
    let mut modulus = vec![0xd5; 256];
    modulus[255] |= 0x01;
    Element::Sequence(vec![
        Element::Integer(Integer::from_unsigned_bytes(&modulus)),
        Element::integer_from_u64(65537),
    ])
    .to_der()
    .unwrap()
}

fn unit_testing() -> Vec<NameEntry> {
    vec![NameEntry::new("CN", "Unit Testing")]
}

#[test]
fn test_issuer_and_subject_round_trip() {
    let der = CertificateBuilder::new()
        .serial_number(&[0x01, 0x02, 0x03])
        .issuer(unit_testing())
        .subject(unit_testing())
        .public_key(rsa_2048_public_key())
        .key_usage(KeyUsage::KEY_ENCIPHERMENT)
        .build(&FakeSigner, DigestAlgorithm::Sha256)
        .unwrap();

    let cert = Certificate::from_der(&der).unwrap();
    assert_eq!(unit_testing(), cert.issuer_name().unwrap().parse().unwrap());
    assert_eq!(unit_testing(), cert.subject_name().unwrap().parse().unwrap());
    assert_eq!(2, cert.version().unwrap());
    assert_eq!("01:02:03", cert.serial_number().unwrap().format_hex());
    assert_eq!(Some(KeyUsage::KEY_ENCIPHERMENT), cert.key_usage().unwrap());
    assert_eq!(256, cert.signature().len());
    assert_eq!(rsa_2048_public_key(), cert.subject_public_key_info().unwrap().public_key_bytes());
}

#[test]
fn test_tbs_index_layout() {
    let der = CertificateBuilder::new()
        .serial_number(&[0x09])
        .issuer(vec![NameEntry::new("O", "Issuer Org")])
        .subject(unit_testing())
        .public_key(rsa_2048_public_key())
        .build(&FakeSigner, DigestAlgorithm::Sha256)
        .unwrap();

    let cert = Certificate::from_der(&der).unwrap();
    let tbs = cert.tbs_certificate().as_sequence().unwrap();
    let issuer: Name = sigil::decoder::Decoder::decode(&tbs[3]).unwrap();
    let subject: Name = sigil::decoder::Decoder::decode(&tbs[5]).unwrap();
    assert_eq!(vec![NameEntry::new("O", "Issuer Org")], issuer.parse().unwrap());
    assert_eq!(unit_testing(), subject.parse().unwrap());
    assert_eq!(None, cert.key_usage().unwrap());
}

#[test]
fn test_key_encipherment_extension_unwrap() {
    let extension: Element = KeyUsage::from_bits(0x0004).to_extension().unwrap().encode().unwrap();
    let der = extension.to_der().unwrap();

    let decoded = sigil_asn1::decode(&der).unwrap();
    let [oid, critical, value] = decoded.as_sequence().unwrap() else {
        panic!("extension must have three fields");
    };
    assert_eq!(&Element::object_identifier(oids::EXTENSION_KEY_USAGE), oid);
    assert_eq!(&Element::Boolean(true), critical);

    let nested = sigil_asn1::decode(value.as_octet_string().unwrap().as_bytes()).unwrap();
    assert_eq!(0x0004, nested.as_bit_string().unwrap().to_u32());
}

#[rstest(
    algorithm,
    case(DigestAlgorithm::Sha1),
    case(DigestAlgorithm::Sha224),
    case(DigestAlgorithm::Sha256),
    case(DigestAlgorithm::Sha384),
    case(DigestAlgorithm::Sha512),
)]
fn test_outer_signature_algorithm(algorithm: DigestAlgorithm) {
    let der = CertificateBuilder::new()
        .serial_number(&[0x01])
        .issuer(unit_testing())
        .subject(unit_testing())
        .public_key(rsa_2048_public_key())
        .build(&FakeSigner, algorithm)
        .unwrap();

    let cert = Certificate::from_der(&der).unwrap();
    assert_eq!(algorithm, cert.signature_algorithm().unwrap());
    // the signed body always names sha256WithRSAEncryption
    assert_eq!(
        oids::SHA256_WITH_RSA_ENCRYPTION,
        cert.tbs_signature_algorithm().unwrap().algorithm.components()
    );

    let tbs = cert.tbs_certificate().to_der().unwrap();
    assert_eq!(FakeSigner.sign(&tbs, algorithm).unwrap(), cert.signature());
}

#[test]
fn test_generated_serial_and_validity() {
    let not_before = Utc.with_ymd_and_hms(2030, 6, 1, 8, 30, 0).unwrap();
    let mut random = CountingRandom(0x7f);
    let der = CertificateBuilder::new()
        .generate_serial_number(&mut random)
        .unwrap()
        .issuer(unit_testing())
        .subject(unit_testing())
        .not_before(not_before)
        .subject_unique_id(0x0102)
        .public_key(rsa_2048_public_key())
        .build(&FakeSigner, DigestAlgorithm::Sha256)
        .unwrap();

    let cert = Certificate::from_der(&der).unwrap();
    let serial = cert.serial_number().unwrap();
    // first random byte is 0x80, so a zero byte keeps the value positive
    assert_eq!(33, serial.as_integer().as_bytes().len());
    assert_eq!(&[0x00, 0x80, 0x81], &serial.as_integer().as_bytes()[..3]);

    let (start, end) = cert.validity().unwrap();
    assert_eq!(not_before.naive_utc(), start);
    assert_eq!((not_before + Duration::days(365)).naive_utc(), end);

    assert_eq!(None, cert.issuer_unique_id().unwrap());
    assert_eq!(0x0102, cert.subject_unique_id().unwrap().unwrap().to_u64());
}
