//! Fixed-size bit container backing BIT STRING values.
//!
//! Bits are indexed from 0; bit 0 is the least significant bit of the first
//! storage byte, so converting to and from fixed-width integers only needs
//! little-endian byte order and gives the same result on every host.

use std::fmt;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BitSet {
    size: usize,
    // bits past `size` in the last byte are always zero
    bytes: Vec<u8>,
}

impl BitSet {
    /// Creates a container of `size` bits, all cleared.
    pub fn new(size: usize) -> Self {
        BitSet {
            size,
            bytes: vec![0; size.div_ceil(8)],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn index_of(&self, index: usize) -> Result<(usize, u8)> {
        if index >= self.size {
            return Err(Error::IndexOutOfRange {
                index,
                size: self.size,
            });
        }
        Ok((index / 8, 1 << (index % 8)))
    }

    fn last_byte_mask(&self) -> u8 {
        match self.size % 8 {
            0 => 0xff,
            used => (1u8 << used) - 1,
        }
    }

    fn clear_unused_bits(&mut self) {
        let mask = self.last_byte_mask();
        if let Some(last) = self.bytes.last_mut() {
            *last &= mask;
        }
    }

    pub fn get(&self, index: usize) -> Result<bool> {
        let (byte, mask) = self.index_of(index)?;
        Ok(self.bytes[byte] & mask != 0)
    }

    pub fn set(&mut self, index: usize) -> Result<()> {
        let (byte, mask) = self.index_of(index)?;
        self.bytes[byte] |= mask;
        Ok(())
    }

    pub fn clear(&mut self, index: usize) -> Result<()> {
        let (byte, mask) = self.index_of(index)?;
        self.bytes[byte] &= !mask;
        Ok(())
    }

    /// Inverts one bit and returns its new value.
    pub fn flip(&mut self, index: usize) -> Result<bool> {
        let (byte, mask) = self.index_of(index)?;
        self.bytes[byte] ^= mask;
        Ok(self.bytes[byte] & mask != 0)
    }

    pub fn set_all(&mut self) {
        self.bytes.iter_mut().for_each(|b| *b = 0xff);
        self.clear_unused_bits();
    }

    pub fn clear_all(&mut self) {
        self.bytes.iter_mut().for_each(|b| *b = 0);
    }

    /// Number of set bits. Runs in time proportional to that number.
    pub fn cardinality(&self) -> usize {
        let mut count = 0;
        for &byte in &self.bytes {
            let mut x = byte;
            while x != 0 {
                let lowest = x & x.wrapping_neg();
                x ^= lowest;
                count += 1;
            }
        }
        count
    }

    pub fn all(&self) -> bool {
        match self.bytes.split_last() {
            None => true,
            Some((last, rest)) => {
                rest.iter().all(|&b| b == 0xff) && *last == self.last_byte_mask()
            }
        }
    }

    pub fn any(&self) -> bool {
        self.bytes.iter().any(|&b| b != 0)
    }

    pub fn none(&self) -> bool {
        !self.any()
    }

    // The result has the larger size; missing high bits of the smaller
    // operand count as zero.
    fn combine(&self, other: &BitSet, op: impl Fn(u8, u8) -> u8) -> BitSet {
        let mut out = BitSet::new(self.size.max(other.size));
        for (i, byte) in out.bytes.iter_mut().enumerate() {
            let lhs = self.bytes.get(i).copied().unwrap_or(0);
            let rhs = other.bytes.get(i).copied().unwrap_or(0);
            *byte = op(lhs, rhs);
        }
        out.clear_unused_bits();
        out
    }

    pub fn and(&self, other: &BitSet) -> BitSet {
        self.combine(other, |a, b| a & b)
    }

    pub fn or(&self, other: &BitSet) -> BitSet {
        self.combine(other, |a, b| a | b)
    }

    pub fn xor(&self, other: &BitSet) -> BitSet {
        self.combine(other, |a, b| a ^ b)
    }

    pub fn not(&self) -> BitSet {
        let mut out = BitSet {
            size: self.size,
            bytes: self.bytes.iter().map(|b| !b).collect(),
        };
        out.clear_unused_bits();
        out
    }

    // Used by the BIT STRING conversion, which knows the storage is
    // already sized for `size`.
    pub(crate) fn from_raw(size: usize, bytes: Vec<u8>) -> Self {
        let mut bits = BitSet { size, bytes };
        bits.clear_unused_bits();
        bits
    }
}

macro_rules! impl_unsigned_conversions {
    ($($ty:ty => $to:ident),* $(,)?) => {
        $(
            impl From<$ty> for BitSet {
                fn from(value: $ty) -> Self {
                    BitSet {
                        size: <$ty>::BITS as usize,
                        bytes: value.to_le_bytes().to_vec(),
                    }
                }
            }

            impl BitSet {
                /// Bit 0 becomes the least significant bit. Bits past the
                /// integer width are dropped.
                pub fn $to(&self) -> $ty {
                    let mut buf = [0u8; std::mem::size_of::<$ty>()];
                    for (dst, src) in buf.iter_mut().zip(&self.bytes) {
                        *dst = *src;
                    }
                    <$ty>::from_le_bytes(buf)
                }
            }
        )*
    };
}

impl_unsigned_conversions!(u8 => to_u8, u16 => to_u16, u32 => to_u32, u64 => to_u64);

impl fmt::Display for BitSet {
    // Least significant bit first, one group per storage byte.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let groups = self
            .bytes
            .iter()
            .map(|b| format!("{:08b}", b.reverse_bits()))
            .collect::<Vec<_>>();
        write!(f, "{}", groups.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest(size, expected_bytes, case(0, 0), case(1, 1), case(8, 1), case(9, 2), case(64, 8))]
    fn test_new(size: usize, expected_bytes: usize) {
        let bits = BitSet::new(size);
        assert_eq!(size, bits.size());
        assert_eq!(expected_bytes, bits.as_bytes().len());
        assert!(bits.none());
    }

    #[test]
    fn test_set_get_clear_flip() {
        let mut bits = BitSet::new(12);
        bits.set(0).unwrap();
        bits.set(11).unwrap();
        assert!(bits.get(0).unwrap());
        assert!(bits.get(11).unwrap());
        assert!(!bits.get(5).unwrap());
        assert_eq!(vec![0x01, 0x08], bits.as_bytes());

        bits.clear(0).unwrap();
        assert!(!bits.get(0).unwrap());

        assert!(bits.flip(5).unwrap());
        assert!(!bits.flip(5).unwrap());
        assert_eq!(1, bits.cardinality());
    }

    #[rstest(size, index, case(0, 0), case(8, 8), case(12, 100))]
    fn test_index_out_of_range(size: usize, index: usize) {
        let mut bits = BitSet::new(size);
        let expected = Error::IndexOutOfRange { index, size };
        assert_eq!(Err(expected.clone()), bits.get(index));
        assert_eq!(Err(expected.clone()), bits.set(index));
        assert_eq!(Err(expected.clone()), bits.clear(index));
        assert_eq!(Err(expected), bits.flip(index));
    }

    #[test]
    fn test_set_all_clears_unused_bits() {
        let mut bits = BitSet::new(10);
        bits.set_all();
        assert_eq!(vec![0xff, 0x03], bits.as_bytes());
        assert!(bits.all());
        assert_eq!(10, bits.cardinality());

        bits.clear_all();
        assert!(bits.none());
        assert!(!bits.all());
    }

    #[rstest(value, expected, case(0, 0), case(1, 1), case(0x0f, 4), case(0x8000_0001, 2), case(u32::MAX, 32))]
    fn test_cardinality(value: u32, expected: usize) {
        assert_eq!(expected, BitSet::from(value).cardinality());
    }

    #[test]
    fn test_mixed_size_operations() {
        let small = BitSet::from(0b1010_1010u8);
        let large = BitSet::from(0xff0fu16);

        let and = small.and(&large);
        assert_eq!(16, and.size());
        assert_eq!(0x000a, and.to_u16());

        let or = small.or(&large);
        assert_eq!(16, or.size());
        assert_eq!(0xffaf, or.to_u16());

        let xor = large.xor(&small);
        assert_eq!(16, xor.size());
        assert_eq!(0xffa5, xor.to_u16());
    }

    #[test]
    fn test_or_keeps_unused_bits_clear() {
        let mut narrow = BitSet::new(5);
        narrow.set(4).unwrap();
        let wide = BitSet::from(0xe0u8);

        let or = narrow.or(&wide);
        assert_eq!(8, or.size());
        assert_eq!(0xf0, or.to_u8());
    }

    #[test]
    fn test_not() {
        let bits = BitSet::new(3).not();
        assert_eq!(vec![0x07], bits.as_bytes());
        assert!(bits.all());
        assert_eq!(0xfffe, BitSet::from(1u16).not().to_u16());
    }

    #[rstest(
        value,
        case(0u64),
        case(1u64),
        case(0x0004u64),
        case(0x8000_0000_0000_0000u64),
        case(0x0123_4567_89ab_cdefu64)
    )]
    fn test_unsigned_round_trip(value: u64) {
        let bits = BitSet::from(value);
        assert_eq!(64, bits.size());
        assert_eq!(value, bits.to_u64());
        assert_eq!(value as u32, bits.to_u32());
        assert_eq!(value as u16, bits.to_u16());
        assert_eq!(value as u8, bits.to_u8());
    }

    #[test]
    fn test_bit_zero_is_least_significant() {
        for n in 0..64 {
            let bits = BitSet::from(1u64 << n);
            assert!(bits.get(n).unwrap());
            assert_eq!(1, bits.cardinality());
            assert_eq!(1u64 << n, bits.to_u64());
        }
    }

    #[test]
    fn test_display() {
        assert_eq!("10000000 01000000", BitSet::from(0x0201u16).to_string());
    }
}
