use std::fmt;

use crate::bit_set::BitSet;
use crate::error::{Error, Result};

/// BIT STRING payload: packed bytes, most significant bit first, plus the
/// number of meaningful bits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitString {
    data: Vec<u8>,
    bit_len: usize,
}

impl BitString {
    /// `data` must hold exactly `bit_len.div_ceil(8)` bytes.
    pub fn new(data: Vec<u8>, bit_len: usize) -> Result<Self> {
        if data.len() != bit_len.div_ceil(8) {
            return Err(Error::BitStringInvalidLength {
                bit_len,
                bytes: data.len(),
            });
        }
        Ok(BitString { data, bit_len })
    }

    /// Every bit of `data` is meaningful.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        let bit_len = data.len() * 8;
        BitString { data, bit_len }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Padding bits in the last byte, the leading content octet on the wire.
    pub fn unused_bits(&self) -> u8 {
        ((8 - self.bit_len % 8) % 8) as u8
    }

    fn to_bit_set(&self) -> BitSet {
        BitSet::from(self)
    }

    // Host conversions. The first byte is the least significant one and
    // bit order is reversed within each byte, so these invert
    // `BitString::from(&BitSet::from(n))`.
    pub fn to_u8(&self) -> u8 {
        self.to_bit_set().to_u8()
    }

    pub fn to_u16(&self) -> u16 {
        self.to_bit_set().to_u16()
    }

    pub fn to_u32(&self) -> u32 {
        self.to_bit_set().to_u32()
    }

    pub fn to_u64(&self) -> u64 {
        self.to_bit_set().to_u64()
    }
}

// Bit `i` of the container becomes bit `i` of the string counting from the
// most significant bit of the first byte. The string stops at the last set
// bit; a container with no bit set still yields a single zero bit.
impl From<&BitSet> for BitString {
    fn from(bits: &BitSet) -> Self {
        let bytes = bits.as_bytes();
        if bytes.is_empty() {
            return BitString {
                data: Vec::new(),
                bit_len: 0,
            };
        }

        let last_used = (0..bits.size())
            .rev()
            .find(|&i| bytes[i / 8] & (1 << (i % 8)) != 0)
            .unwrap_or(0);
        let data = bytes[..=last_used / 8]
            .iter()
            .map(|b| b.reverse_bits())
            .collect();
        BitString {
            data,
            bit_len: last_used + 1,
        }
    }
}

impl From<&BitString> for BitSet {
    fn from(bits: &BitString) -> Self {
        let bytes = bits.data.iter().map(|b| b.reverse_bits()).collect::<Vec<_>>();
        BitSet::from_raw(bits.data.len() * 8, bytes)
    }
}

/// Reads BIT STRING content octets: the unused-bit count, then the data.
impl TryFrom<&[u8]> for BitString {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self> {
        let (&unused, data) = value.split_first().ok_or(Error::BitStringNoData)?;
        if unused > 7 {
            return Err(Error::BitStringUnusedBitsOutOfRange(unused));
        }
        let total = data.len() * 8;
        if total < unused as usize || (data.is_empty() && unused != 0) {
            return Err(Error::BitStringInvalidLength {
                bit_len: total.saturating_sub(unused as usize),
                bytes: data.len(),
            });
        }
        Ok(BitString {
            data: data.to_vec(),
            bit_len: total - unused as usize,
        })
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits = (0..self.bit_len)
            .map(|i| {
                if self.data[i / 8] & (0x80 >> (i % 8)) != 0 {
                    '1'
                } else {
                    '0'
                }
            })
            .collect::<String>();
        write!(f, "{}", bits)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest(value, data, bit_len,
        case(0u32, vec![0x00], 1),
        case(1u32, vec![0x80], 1),
        case(0x04u32, vec![0x20], 3),
        case(0x05u32, vec![0xa0], 3),
        case(0x80u32, vec![0x01], 8),
        case(0x0100u32, vec![0x00, 0x80], 9),
        case(0x8000_0000u32, vec![0x00, 0x00, 0x00, 0x01], 32),
    )]
    fn test_from_bit_set(value: u32, data: Vec<u8>, bit_len: usize) {
        let bits = BitString::from(&BitSet::from(value));
        assert_eq!(data, bits.as_bytes());
        assert_eq!(bit_len, bits.bit_len());
        assert_eq!(value, bits.to_u32());
    }

    #[test]
    fn test_from_empty_bit_set() {
        let bits = BitString::from(&BitSet::new(0));
        assert!(bits.as_bytes().is_empty());
        assert_eq!(0, bits.bit_len());
        assert_eq!(0, bits.unused_bits());
    }

    #[rstest(bit_len, expected, case(0, 0), case(1, 7), case(3, 5), case(8, 0), case(9, 7), case(16, 0))]
    fn test_unused_bits(bit_len: usize, expected: u8) {
        let bits = BitString::new(vec![0; bit_len.div_ceil(8)], bit_len).unwrap();
        assert_eq!(expected, bits.unused_bits());
    }

    #[rstest(data, bit_len, case(vec![], 1), case(vec![0x00], 0), case(vec![0x00], 9), case(vec![0x00, 0x00], 8))]
    fn test_new_invalid_length(data: Vec<u8>, bit_len: usize) {
        let bytes = data.len();
        assert_eq!(
            Err(Error::BitStringInvalidLength { bit_len, bytes }),
            BitString::new(data, bit_len)
        );
    }

    #[rstest(input, expected,
        case(vec![0x00], Ok(BitString::from_bytes(vec![]))),
        case(vec![0x00, 0xde, 0xad], Ok(BitString::from_bytes(vec![0xde, 0xad]))),
        case(vec![0x05, 0xa0], Ok(BitString::new(vec![0xa0], 3).unwrap())),
        case(vec![], Err(Error::BitStringNoData)),
        case(vec![0x08, 0x00], Err(Error::BitStringUnusedBitsOutOfRange(8))),
        case(vec![0x03], Err(Error::BitStringInvalidLength { bit_len: 0, bytes: 0 })),
    )]
    fn test_from_content_octets(input: Vec<u8>, expected: Result<BitString>) {
        assert_eq!(expected, BitString::try_from(input.as_slice()));
    }

    #[test]
    fn test_host_conversions() {
        let bits = BitString::from_bytes(vec![0x20, 0x01]);
        assert_eq!(0x04, bits.to_u8());
        assert_eq!(0x8004, bits.to_u16());
        assert_eq!(0x8004, bits.to_u32());
        assert_eq!(0x8004, bits.to_u64());
    }

    #[test]
    fn test_bit_set_round_trip() {
        let mut set = BitSet::new(20);
        set.set(0).unwrap();
        set.set(13).unwrap();
        let bits = BitString::from(&set);
        assert_eq!(14, bits.bit_len());

        let back = BitSet::try_from(&bits).unwrap();
        assert_eq!(16, back.size());
        assert!(back.get(0).unwrap());
        assert!(back.get(13).unwrap());
        assert_eq!(2, back.cardinality());
    }

    #[test]
    fn test_display() {
        assert_eq!("101", BitString::new(vec![0xa0], 3).unwrap().to_string());
        assert_eq!("", BitString::from_bytes(vec![]).to_string());
    }
}
