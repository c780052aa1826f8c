use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectIdentifier {
    inner: Vec<u64>,
}

impl ObjectIdentifier {
    pub fn components(&self) -> &[u64] {
        &self.inner
    }

    /// Encodes the components as OBJECT IDENTIFIER content octets.
    ///
    /// The first two arcs share one field (`a * 40 + b`), so `a` must be
    /// 0, 1 or 2 and `b` below 40 unless `a` is 2.
    pub fn to_content_octets(&self) -> Result<Vec<u8>> {
        let (first, second, rest) = match self.inner.as_slice() {
            [first, second, rest @ ..] => (*first, *second, rest),
            _ => return Err(Error::ObjectIdentifierTooFewComponents(self.inner.len())),
        };
        if first > 2 || (first < 2 && second >= 40) {
            return Err(Error::ObjectIdentifierInvalidArcs { first, second });
        }
        let head = (first * 40)
            .checked_add(second)
            .ok_or(Error::ObjectIdentifierComponentOverflow)?;

        let mut out = Vec::new();
        push_base128(head, &mut out);
        for &component in rest {
            push_base128(component, &mut out);
        }
        Ok(out)
    }
}

// Big-endian base-128; every byte but the last of a field carries 0x80.
fn push_base128(value: u64, out: &mut Vec<u8>) {
    let mut groups = vec![(value & 0x7f) as u8];
    let mut rest = value >> 7;
    while rest > 0 {
        groups.push((rest & 0x7f) as u8 | 0x80);
        rest >>= 7;
    }
    out.extend(groups.iter().rev());
}

impl From<&[u64]> for ObjectIdentifier {
    fn from(components: &[u64]) -> Self {
        ObjectIdentifier {
            inner: components.to_vec(),
        }
    }
}

impl From<Vec<u64>> for ObjectIdentifier {
    fn from(inner: Vec<u64>) -> Self {
        ObjectIdentifier { inner }
    }
}

impl TryFrom<&[u8]> for ObjectIdentifier {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self> {
        if value.is_empty() {
            return Err(Error::ObjectIdentifierNoData);
        }

        let mut fields = Vec::new();
        let mut acc = 0u64;
        let mut pending = false;
        for &b in value {
            if acc > u64::MAX >> 7 {
                return Err(Error::ObjectIdentifierComponentOverflow);
            }
            acc = (acc << 7) | (b & 0x7f) as u64;
            pending = b & 0x80 != 0;
            if !pending {
                fields.push(acc);
                acc = 0;
            }
        }
        if pending {
            return Err(Error::ObjectIdentifierIncompleteEncoding);
        }

        let head = fields[0];
        let (first, second) = match head {
            0..40 => (0, head),
            40..80 => (1, head - 40),
            _ => (2, head - 80),
        };
        let mut inner = Vec::with_capacity(fields.len() + 1);
        inner.push(first);
        inner.push(second);
        inner.extend_from_slice(&fields[1..]);
        Ok(ObjectIdentifier { inner })
    }
}

impl Display for ObjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self
            .inner
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{}", s)
    }
}

impl FromStr for ObjectIdentifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let inner = s
            .split('.')
            .map(|part| {
                part.parse::<u64>()
                    .map_err(|_| Error::ObjectIdentifierInvalidComponent(part.to_string()))
            })
            .collect::<Result<Vec<u64>>>()?;
        Ok(ObjectIdentifier { inner })
    }
}

impl PartialEq<&str> for ObjectIdentifier {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

impl Serialize for ObjectIdentifier {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ObjectIdentifier {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ObjectIdentifier::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest(oid, encoded,
        case("2.5.4.3", "550403"),
        case("1.2.840.113549.1.1.1", "2a864886f70d010101"),
        case("1.2.840.113549.1.1.11", "2a864886f70d01010b"),
        case("1.2.840.113549.1.9.14", "2a864886f70d01090e"),
        case("0.9.2342.19200300.100.1.1", "0992268993f22c640101"),
        case("2.5.29.15", "551d0f"),
        case("2.999.3", "883703"),
    )]
    fn test_content_octets(oid: &str, encoded: &str) {
        let oid = ObjectIdentifier::from_str(oid).unwrap();
        let expected = hex::decode(encoded).unwrap();
        assert_eq!(expected, oid.to_content_octets().unwrap());
        assert_eq!(oid, ObjectIdentifier::try_from(expected.as_slice()).unwrap());
    }

    #[rstest(components,
        case(vec![0, 0]),
        case(vec![0, 39]),
        case(vec![1, 0, 127, 128]),
        case(vec![1, 39, 16383, 16384]),
        case(vec![2, 0]),
        case(vec![2, 40, u64::MAX]),
        case(vec![2, 1000, 0, 1]),
    )]
    fn test_component_round_trip(components: Vec<u64>) {
        let oid = ObjectIdentifier::from(components.as_slice());
        let encoded = oid.to_content_octets().unwrap();
        assert_eq!(components, ObjectIdentifier::try_from(encoded.as_slice()).unwrap().components());
    }

    #[rstest(components, expected,
        case(vec![], Error::ObjectIdentifierTooFewComponents(0)),
        case(vec![1], Error::ObjectIdentifierTooFewComponents(1)),
        case(vec![3, 1], Error::ObjectIdentifierInvalidArcs { first: 3, second: 1 }),
        case(vec![1, 40], Error::ObjectIdentifierInvalidArcs { first: 1, second: 40 }),
        case(vec![2, u64::MAX], Error::ObjectIdentifierComponentOverflow),
    )]
    fn test_encode_invalid(components: Vec<u64>, expected: Error) {
        assert_eq!(Err(expected), ObjectIdentifier::from(components).to_content_octets());
    }

    #[rstest(input, expected,
        case(vec![], Error::ObjectIdentifierNoData),
        case(vec![0x55, 0x86], Error::ObjectIdentifierIncompleteEncoding),
        case(vec![0x2a, 0x81, 0x81, 0x81, 0x81, 0x81, 0x81, 0x81, 0x81, 0x81, 0x81, 0x01], Error::ObjectIdentifierComponentOverflow),
    )]
    fn test_decode_invalid(input: Vec<u8>, expected: Error) {
        assert_eq!(Err(expected), ObjectIdentifier::try_from(input.as_slice()));
    }

    #[rstest(input, case("1.2.x"), case(""), case("1..2"))]
    fn test_from_str_invalid(input: &str) {
        assert!(matches!(
            ObjectIdentifier::from_str(input),
            Err(Error::ObjectIdentifierInvalidComponent(_))
        ));
    }

    #[test]
    fn test_display_and_compare() {
        let oid = ObjectIdentifier::from([1u64, 2, 840, 113549].as_slice());
        assert_eq!("1.2.840.113549", oid.to_string());
        assert!(oid == "1.2.840.113549");
    }

    #[test]
    fn test_serde_dotted_string() {
        let oid = ObjectIdentifier::from_str("2.5.4.10").unwrap();
        let json = serde_json::to_string(&oid).unwrap();
        assert_eq!("\"2.5.4.10\"", json);
        let back: ObjectIdentifier = serde_json::from_str(&json).unwrap();
        assert_eq!(oid, back);
        assert!(serde_json::from_str::<ObjectIdentifier>("\"2.5.x\"").is_err());
    }
}
