use std::fmt;

use num_bigint::{BigInt, BigUint};
use num_traits::ToPrimitive;

// ASN.1 INTEGER kept as its DER content octets: big-endian two's complement.
// The constructors produce the minimal form; decoded values keep the bytes
// exactly as they appeared on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Integer {
    inner: Vec<u8>,
}

impl Integer {
    /// Builds a non-negative INTEGER from big-endian magnitude bytes.
    ///
    /// Superfluous leading zeros are stripped, and a single `0x00` is kept
    /// or added when the top bit would otherwise read as a sign bit.
    ///
    /// ```
    /// use sigil_asn1::Integer;
    ///
    /// assert_eq!(&[0x00, 0xff], Integer::from_unsigned_bytes(&[0x00, 0x00, 0xff]).as_bytes());
    /// assert_eq!(&[0x7f], Integer::from_unsigned_bytes(&[0x7f]).as_bytes());
    /// ```
    pub fn from_unsigned_bytes(bytes: &[u8]) -> Self {
        let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
        let magnitude = &bytes[start..];

        let mut inner = Vec::with_capacity(magnitude.len() + 1);
        match magnitude.first() {
            None => inner.push(0x00),
            Some(&b) if b & 0x80 != 0 => inner.push(0x00),
            Some(_) => {}
        }
        inner.extend_from_slice(magnitude);
        Integer { inner }
    }

    /// Builds an INTEGER from big-endian two's complement bytes, dropping
    /// redundant sign-extension bytes.
    pub fn from_signed_bytes(bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            return Integer { inner: vec![0x00] };
        }

        let mut start = 0;
        while start + 1 < bytes.len() {
            let (current, next) = (bytes[start], bytes[start + 1]);
            let redundant = (current == 0x00 && next & 0x80 == 0) || (current == 0xff && next & 0x80 != 0);
            if !redundant {
                break;
            }
            start += 1;
        }
        Integer {
            inner: bytes[start..].to_vec(),
        }
    }

    /// Wraps content octets read from DER without normalizing them.
    pub fn from_content_octets(bytes: Vec<u8>) -> Self {
        Integer { inner: bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }

    pub fn to_bigint(&self) -> BigInt {
        BigInt::from_signed_bytes_be(&self.inner)
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.to_bigint().to_i64()
    }

    pub fn to_u64(&self) -> Option<u64> {
        self.to_bigint().to_u64()
    }

    pub fn to_u32(&self) -> Option<u32> {
        self.to_bigint().to_u32()
    }
}

impl From<u64> for Integer {
    fn from(value: u64) -> Self {
        Integer::from_unsigned_bytes(&value.to_be_bytes())
    }
}

impl From<u32> for Integer {
    fn from(value: u32) -> Self {
        Integer::from_unsigned_bytes(&value.to_be_bytes())
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Integer::from_signed_bytes(&value.to_be_bytes())
    }
}

impl From<&BigInt> for Integer {
    fn from(value: &BigInt) -> Self {
        Integer::from_signed_bytes(&value.to_signed_bytes_be())
    }
}

impl From<&BigUint> for Integer {
    fn from(value: &BigUint) -> Self {
        Integer::from_unsigned_bytes(&value.to_bytes_be())
    }
}

impl AsRef<[u8]> for Integer {
    fn as_ref(&self) -> &[u8] {
        &self.inner
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_bigint())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    use super::*;

    #[rstest(input, expected,
        case(vec![], vec![0x00]),
        case(vec![0x00], vec![0x00]),
        case(vec![0x00, 0x00, 0x00], vec![0x00]),
        case(vec![0x7f], vec![0x7f]),
        case(vec![0x80], vec![0x00, 0x80]),
        case(vec![0x00, 0xff], vec![0x00, 0xff]),
        case(vec![0x00, 0x00, 0x01, 0x00], vec![0x01, 0x00]),
        case(vec![0xde, 0xad], vec![0x00, 0xde, 0xad]),
    )]
    fn test_from_unsigned_bytes(input: Vec<u8>, expected: Vec<u8>) {
        assert_eq!(expected, Integer::from_unsigned_bytes(&input).as_bytes());
    }

    #[rstest(input, expected,
        case(vec![0x00, 0x00, 0x7f], vec![0x7f]),
        case(vec![0x00, 0x80], vec![0x00, 0x80]),
        case(vec![0xff, 0xff, 0x80], vec![0x80]),
        case(vec![0xff, 0x7f], vec![0xff, 0x7f]),
        case(vec![0xff], vec![0xff]),
    )]
    fn test_from_signed_bytes(input: Vec<u8>, expected: Vec<u8>) {
        assert_eq!(expected, Integer::from_signed_bytes(&input).as_bytes());
    }

    #[rstest(value, expected,
        case(0u64, vec![0x00]),
        case(0x7fu64, vec![0x7f]),
        case(0x80u64, vec![0x00, 0x80]),
        case(0xffu64, vec![0x00, 0xff]),
        case(0x0100u64, vec![0x01, 0x00]),
        case(u64::MAX, vec![0x00, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]),
    )]
    fn test_from_u64(value: u64, expected: Vec<u8>) {
        let integer = Integer::from(value);
        assert_eq!(expected, integer.as_bytes());
        assert_eq!(Some(value), integer.to_u64());
    }

    #[rstest(value, expected, case(-1i64, vec![0xff]), case(-128i64, vec![0x80]), case(-129i64, vec![0xff, 0x7f]))]
    fn test_from_i64(value: i64, expected: Vec<u8>) {
        let integer = Integer::from(value);
        assert_eq!(expected, integer.as_bytes());
        assert_eq!(Some(value), integer.to_i64());
    }

    #[test]
    fn test_bigint_conversions() {
        let big = BigInt::from_str("333504890676592408951587385614406537514249").unwrap();
        let integer = Integer::from(&big);
        assert_eq!(big, integer.to_bigint());
        assert_eq!("333504890676592408951587385614406537514249", integer.to_string());
        assert_eq!(None, integer.to_u64());

        let modulus = BigUint::from_bytes_be(&[0xc0, 0x01]);
        assert_eq!(&[0x00, 0xc0, 0x01], Integer::from(&modulus).as_bytes());
    }
}
