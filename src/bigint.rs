//! Fixed-width big integers
//!
//! This module provides a generic unsigned integer type `BigInt<N>` where N is the
//! number of 64-bit limbs. The width is fixed at compile time:
//! - BigInt<1> for toy curves and tests
//! - BigInt<4> for 256-bit curves such as P-256 and secp256k1
//!
//! Limbs are stored little-endian (least significant limb first), which is what the
//! carry-propagating loops below want. Big-endian byte and hex conversions are
//! provided for the outside world.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};

/// An unsigned integer with N 64-bit limbs (N * 64 bits total)
///
/// # Examples
/// ```
/// use ecnr::bigint::BigInt;
/// let a = BigInt::<4>::from_u64(42);
/// let b = BigInt::<4>::from_u64(100);
/// assert_eq!(a + b, BigInt::<4>::from_u64(142));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BigInt<const N: usize> {
    /// Limbs in little-endian order (limbs[0] is least significant)
    limbs: [u64; N],
}

impl<const N: usize> BigInt<N> {
    /// Number of bits this BigInt can represent
    pub const BITS: usize = N * 64;

    /// Creates a BigInt with value zero
    #[inline]
    pub const fn zero() -> Self {
        Self { limbs: [0; N] }
    }

    /// Creates a BigInt with value one
    #[inline]
    pub const fn one() -> Self {
        let mut limbs = [0; N];
        limbs[0] = 1;
        Self { limbs }
    }

    /// Creates a BigInt from a u64 value
    #[inline]
    pub const fn from_u64(val: u64) -> Self {
        let mut limbs = [0; N];
        limbs[0] = val;
        Self { limbs }
    }

    /// Creates a BigInt from an array of limbs in little-endian order
    pub const fn from_limbs(limbs: [u64; N]) -> Self {
        Self { limbs }
    }

    /// Creates a BigInt from a little-endian limb slice
    ///
    /// Returns `None` if a non-zero limb would not fit into N limbs.
    pub fn from_limb_slice(limbs: &[u64]) -> Option<Self> {
        if limbs.iter().skip(N).any(|&limb| limb != 0) {
            return None;
        }
        let mut out = Self::zero();
        for (dst, &src) in out.limbs.iter_mut().zip(limbs.iter()) {
            *dst = src;
        }
        Some(out)
    }

    /// Parses a big-endian hexadecimal string (optional "0x" prefix)
    ///
    /// Returns `None` on an invalid digit or if the value needs more than N limbs.
    ///
    /// # Examples
    /// ```
    /// use ecnr::bigint::BigInt;
    /// let v = BigInt::<1>::from_hex("0x1F").unwrap();
    /// assert_eq!(v, BigInt::<1>::from_u64(31));
    /// assert!(BigInt::<1>::from_hex("1_0").is_none());
    /// ```
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        let hex = hex
            .strip_prefix("0x")
            .or_else(|| hex.strip_prefix("0X"))
            .unwrap_or(hex);
        if hex.is_empty() {
            return None;
        }

        let mut out = Self::zero();
        // Walk digits from least significant to most significant
        for (i, ch) in hex.chars().rev().enumerate() {
            let digit = ch.to_digit(16)? as u64;
            if digit == 0 {
                continue;
            }
            let limb_idx = i / 16;
            if limb_idx >= N {
                return None;
            }
            out.limbs[limb_idx] |= digit << ((i % 16) * 4);
        }
        Some(out)
    }

    /// Creates a BigInt from big-endian bytes
    ///
    /// Bytes beyond the capacity of N limbs (the most significant ones) are dropped.
    pub fn from_be_bytes(bytes: &[u8]) -> Self {
        let mut limbs = [0u64; N];

        // Process bytes from end (least significant) to start (most significant)
        for (i, &byte) in bytes.iter().rev().enumerate() {
            let limb_idx = i / 8;
            let byte_idx = i % 8;
            if limb_idx < N {
                limbs[limb_idx] |= (byte as u64) << (byte_idx * 8);
            }
        }

        Self { limbs }
    }

    /// Returns exactly N * 8 bytes in big-endian order (most significant byte first)
    pub fn to_be_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(N * 8);
        for limb_idx in (0..N).rev() {
            bytes.extend_from_slice(&self.limbs[limb_idx].to_be_bytes());
        }
        bytes
    }

    /// Gets a reference to the internal limbs array (little-endian)
    #[inline]
    pub const fn limbs(&self) -> &[u64; N] {
        &self.limbs
    }

    /// Returns true if this BigInt is zero
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.limbs.iter().all(|&limb| limb == 0)
    }

    /// Returns true if this BigInt is one
    #[inline]
    pub fn is_one(&self) -> bool {
        self.limbs[0] == 1 && self.limbs[1..].iter().all(|&limb| limb == 0)
    }

    /// Returns true if the least significant bit is set
    #[inline]
    pub fn is_odd(&self) -> bool {
        self.limbs[0] & 1 == 1
    }

    /// Returns the bit length (position of highest set bit + 1), 0 for zero
    pub fn bit_length(&self) -> usize {
        for i in (0..N).rev() {
            if self.limbs[i] != 0 {
                let leading_zeros = self.limbs[i].leading_zeros() as usize;
                return (i + 1) * 64 - leading_zeros;
            }
        }
        0
    }

    /// Number of significant 64-bit words, at least 1
    pub fn word_length(&self) -> usize {
        self.bit_length().div_ceil(64).max(1)
    }

    /// Converts to an uppercase hexadecimal string without leading zeros
    pub fn to_hex(&self) -> String {
        let mut start = N;
        for i in (0..N).rev() {
            if self.limbs[i] != 0 {
                start = i;
                break;
            }
        }

        if start == N {
            return "0".to_string();
        }

        let mut hex = format!("{:X}", self.limbs[start]);
        for i in (0..start).rev() {
            hex.push_str(&format!("{:016X}", self.limbs[i]));
        }
        hex
    }

    /// Compares this BigInt with another, most significant limb first
    pub fn compare(&self, other: &Self) -> Ordering {
        for i in (0..N).rev() {
            match self.limbs[i].cmp(&other.limbs[i]) {
                Ordering::Equal => continue,
                other => return other,
            }
        }
        Ordering::Equal
    }

    /// Addition with carry detection
    ///
    /// Returns (result, overflow) where overflow is true if addition overflowed
    pub fn add_with_carry(&self, other: &Self) -> (Self, bool) {
        let mut result = Self::zero();
        let mut carry = 0u64;

        for i in 0..N {
            let (sum1, overflow1) = self.limbs[i].overflowing_add(other.limbs[i]);
            let (sum2, overflow2) = sum1.overflowing_add(carry);

            result.limbs[i] = sum2;
            carry = (overflow1 || overflow2) as u64;
        }

        (result, carry != 0)
    }

    /// Subtraction with borrow detection
    ///
    /// Returns (result, underflow) where underflow is true if subtraction underflowed
    pub fn sub_with_borrow(&self, other: &Self) -> (Self, bool) {
        let mut result = Self::zero();
        let mut borrow = 0u64;

        for i in 0..N {
            let (diff1, underflow1) = self.limbs[i].overflowing_sub(other.limbs[i]);
            let (diff2, underflow2) = diff1.overflowing_sub(borrow);

            result.limbs[i] = diff2;
            borrow = (underflow1 || underflow2) as u64;
        }

        (result, borrow != 0)
    }

    /// Left shift by a number of bits
    ///
    /// Returns (result, overflow_bits). overflow_bits is only meaningful for shifts < 64;
    /// it contains the bits shifted out of the most significant limb.
    pub fn shl(&self, bits: usize) -> (Self, u64) {
        if bits == 0 {
            return (*self, 0);
        }

        if bits >= Self::BITS {
            return (Self::zero(), 0);
        }

        let limb_shift = bits / 64;
        let bit_shift = bits % 64;

        let mut result = Self::zero();

        if bit_shift == 0 {
            for i in (limb_shift..N).rev() {
                result.limbs[i] = self.limbs[i - limb_shift];
            }
            return (result, 0);
        }

        for i in (limb_shift..N).rev() {
            let src = i - limb_shift;
            let mut v = self.limbs[src] << bit_shift;
            // Carry comes from the less significant source limb
            if src > 0 {
                v |= self.limbs[src - 1] >> (64 - bit_shift);
            }
            result.limbs[i] = v;
        }

        let overflow = self.limbs[N - 1] >> (64 - bit_shift);
        (result, overflow)
    }

    /// Right shift by a number of bits
    pub fn shr(&self, bits: usize) -> Self {
        if bits == 0 {
            return *self;
        }

        if bits >= Self::BITS {
            return Self::zero();
        }

        let limb_shift = bits / 64;
        let bit_shift = bits % 64;

        let mut result = Self::zero();

        if bit_shift == 0 {
            for i in 0..(N - limb_shift) {
                result.limbs[i] = self.limbs[i + limb_shift];
            }
        } else {
            for i in 0..(N - limb_shift) {
                let src_idx = i + limb_shift;
                result.limbs[i] = self.limbs[src_idx] >> bit_shift;

                if src_idx + 1 < N {
                    result.limbs[i] |= self.limbs[src_idx + 1] << (64 - bit_shift);
                }
            }
        }

        result
    }

    /// Division with remainder: self / divisor = (quotient, remainder)
    ///
    /// Bitwise long division; the running remainder keeps the bit shifted out of
    /// the top limb so divisors with the top bit set are handled.
    ///
    /// # Panics
    /// Panics if dividing by zero
    pub fn div_rem(&self, divisor: &Self) -> (Self, Self) {
        assert!(!divisor.is_zero(), "Division by zero");

        if self.compare(divisor) == Ordering::Less {
            return (Self::zero(), *self);
        }

        if divisor.is_one() {
            return (*self, Self::zero());
        }

        let mut quotient = Self::zero();
        let mut remainder = Self::zero();

        for i in (0..self.bit_length()).rev() {
            let (shifted, overflow) = remainder.shl(1);
            remainder = shifted;
            if self.get_bit(i) {
                remainder.limbs[0] |= 1;
            }

            // remainder < 2 * divisor here, so a single wrapping subtraction suffices
            if overflow != 0 || remainder.compare(divisor) != Ordering::Less {
                remainder = remainder.sub_with_borrow(divisor).0;
                quotient.limbs[i / 64] |= 1u64 << (i % 64);
            }
        }

        (quotient, remainder)
    }

    /// Modular reduction: self mod modulus
    pub fn modulo(&self, modulus: &Self) -> Self {
        self.div_rem(modulus).1
    }

    /// (self + other) mod modulus, assuming self < modulus and other < modulus
    pub fn mod_add(&self, other: &Self, modulus: &Self) -> Self {
        let (sum, carry) = self.add_with_carry(other);
        if carry || sum.compare(modulus) != Ordering::Less {
            sum.sub_with_borrow(modulus).0
        } else {
            sum
        }
    }

    /// (self - other) mod modulus, assuming self < modulus and other < modulus
    pub fn mod_sub(&self, other: &Self, modulus: &Self) -> Self {
        let (diff, borrow) = self.sub_with_borrow(other);
        if borrow {
            diff.add_with_carry(modulus).0
        } else {
            diff
        }
    }

    /// Modular multiplication by shift-and-add: (self * other) mod modulus
    ///
    /// Slow, but independent of the Montgomery machinery; kept as the reference
    /// path the Montgomery code is checked against.
    pub fn mod_mul(&self, other: &Self, modulus: &Self) -> Self {
        let mut result = Self::zero();
        let mut temp = other.modulo(modulus);

        for i in 0..self.bit_length() {
            if self.get_bit(i) {
                result = result.mod_add(&temp, modulus);
            }
            temp = temp.mod_add(&temp, modulus);
        }

        result
    }

    /// Get a specific bit (0-indexed from least significant)
    pub fn get_bit(&self, idx: usize) -> bool {
        if idx >= Self::BITS {
            return false;
        }
        (self.limbs[idx / 64] >> (idx % 64)) & 1 == 1
    }

    /// Extracts `width` bits (at most 8) starting at bit `start`
    pub fn window(&self, start: usize, width: usize) -> usize {
        debug_assert!(width <= 8);
        let mut w = 0usize;
        for i in (0..width).rev() {
            w = (w << 1) | self.get_bit(start + i) as usize;
        }
        w
    }
}

impl<const N: usize> Default for BigInt<N> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<const N: usize> PartialOrd for BigInt<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<const N: usize> Ord for BigInt<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

// Wrapping addition
impl<const N: usize> Add for BigInt<N> {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.add_with_carry(&other).0
    }
}

// Wrapping subtraction
impl<const N: usize> Sub for BigInt<N> {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self.sub_with_borrow(&other).0
    }
}

impl<const N: usize> fmt::Debug for BigInt<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BigInt<{}>(0x", N)?;
        for &limb in self.limbs.iter().rev() {
            write!(f, "{:016x}", limb)?;
        }
        write!(f, ")")
    }
}

impl<const N: usize> fmt::Display for BigInt<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex().to_lowercase())
    }
}

/// 256-bit integer (4 limbs x 64 bits)
pub type BigInt256 = BigInt<4>;
