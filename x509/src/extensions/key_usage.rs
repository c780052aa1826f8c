use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sigil_asn1::{ASN1Object, BitSet, BitString, Element, OctetString};
use sigil_pkix_types::oids;

use crate::error::{Error, Result};
use crate::extensions::StandardExtension;

/*
RFC 5280 Section 4.2.1.3
KeyUsage ::= BIT STRING {
    digitalSignature        (0),
    nonRepudiation          (1), -- renamed to contentCommitment
    keyEncipherment         (2),
    dataEncipherment        (3),
    keyAgreement            (4),
    keyCertSign             (5),
    cRLSign                 (6),
    encipherOnly            (7),
    decipherOnly            (8)
}
*/

/// Key usage flags. Flag `n` is `1 << n`, matching the named bit positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyUsage(u32);

const FLAG_NAMES: [(KeyUsage, &str, &str); 9] = [
    (KeyUsage::DIGITAL_SIGNATURE, "digitalSignature", "Digital Signature"),
    (KeyUsage::NON_REPUDIATION, "nonRepudiation", "Non Repudiation"),
    (KeyUsage::KEY_ENCIPHERMENT, "keyEncipherment", "Key Encipherment"),
    (KeyUsage::DATA_ENCIPHERMENT, "dataEncipherment", "Data Encipherment"),
    (KeyUsage::KEY_AGREEMENT, "keyAgreement", "Key Agreement"),
    (KeyUsage::KEY_CERT_SIGN, "keyCertSign", "Certificate Sign"),
    (KeyUsage::CRL_SIGN, "cRLSign", "CRL Sign"),
    (KeyUsage::ENCIPHER_ONLY, "encipherOnly", "Encipher Only"),
    (KeyUsage::DECIPHER_ONLY, "decipherOnly", "Decipher Only"),
];

impl KeyUsage {
    pub const UNSPECIFIED: KeyUsage = KeyUsage(0);
    pub const DIGITAL_SIGNATURE: KeyUsage = KeyUsage(1 << 0);
    pub const NON_REPUDIATION: KeyUsage = KeyUsage(1 << 1);
    pub const KEY_ENCIPHERMENT: KeyUsage = KeyUsage(1 << 2);
    pub const DATA_ENCIPHERMENT: KeyUsage = KeyUsage(1 << 3);
    pub const KEY_AGREEMENT: KeyUsage = KeyUsage(1 << 4);
    pub const KEY_CERT_SIGN: KeyUsage = KeyUsage(1 << 5);
    pub const CRL_SIGN: KeyUsage = KeyUsage(1 << 6);
    pub const ENCIPHER_ONLY: KeyUsage = KeyUsage(1 << 7);
    pub const DECIPHER_ONLY: KeyUsage = KeyUsage(1 << 8);

    pub const fn from_bits(bits: u32) -> Self {
        KeyUsage(bits)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub const fn contains(&self, other: KeyUsage) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    fn names(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        FLAG_NAMES
            .iter()
            .filter(|(flag, _, _)| self.contains(*flag))
            .map(|(_, name, label)| (*name, *label))
    }

    /// BIT STRING form: bit `n` of the flags is named bit `n`, trailing
    /// zero bits dropped.
    pub fn to_bit_string(&self) -> BitString {
        BitString::from(&BitSet::from(self.0))
    }
}

impl From<&BitString> for KeyUsage {
    fn from(bits: &BitString) -> Self {
        KeyUsage(bits.to_u32())
    }
}

impl BitOr for KeyUsage {
    type Output = KeyUsage;

    fn bitor(self, rhs: Self) -> Self::Output {
        KeyUsage(self.0 | rhs.0)
    }
}

impl BitOrAssign for KeyUsage {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl StandardExtension for KeyUsage {
    const OID: &'static [u64] = oids::EXTENSION_KEY_USAGE;
    const CRITICAL: bool = true;

    fn parse(value: &OctetString) -> Result<Self> {
        // OctetString -> ASN1Object -> Element (BitString) -> KeyUsage
        let asn1_obj = ASN1Object::try_from(value)?;
        match asn1_obj.elements() {
            [Element::BitString(bits)] => Ok(KeyUsage::from(bits)),
            [other] => Err(Error::InvalidKeyUsage(format!(
                "expected BIT STRING, found {}",
                other.type_name()
            ))),
            elements => Err(Error::InvalidKeyUsage(format!(
                "expected one element, found {}",
                elements.len()
            ))),
        }
    }

    fn to_value(&self) -> Result<OctetString> {
        let encoded = Element::BitString(self.to_bit_string()).to_der()?;
        Ok(OctetString::from(encoded))
    }
}

impl fmt::Display for KeyUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels = self.names().map(|(_, label)| label).collect::<Vec<_>>();
        write!(f, "{}", labels.join(", "))
    }
}

impl Serialize for KeyUsage {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.names().map(|(name, _)| name))
    }
}

impl<'de> Deserialize<'de> for KeyUsage {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let names = Vec::<String>::deserialize(deserializer)?;
        names.iter().try_fold(KeyUsage::UNSPECIFIED, |usage, name| {
            FLAG_NAMES
                .iter()
                .find(|(_, n, _)| *n == name.as_str())
                .map(|(flag, _, _)| usage | *flag)
                .ok_or_else(|| D::Error::custom(format!("unknown key usage '{}'", name)))
        })
    }
}
