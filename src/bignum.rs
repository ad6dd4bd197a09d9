//! Length-tagged signed integers
//!
//! `BigNum` is the integer type of the call surface: message representatives,
//! private keys and signature components. Unlike [`BigInt`] its width is chosen at
//! runtime: a `BigNum` owns a buffer of `room` 64-bit words of which the lowest
//! `size` are significant. Every producing operation ends in [`BigNum::normalize`],
//! so `size` is always minimal (1 for zero) and zero is never negative.

use crate::bigint::BigInt;
use crate::error::{NrError, NrResult};
use std::cmp::Ordering;
use std::fmt;

/// Sign of a [`BigNum`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sign {
    Positive,
    Negative,
}

/// Signed integer with a fixed capacity and a minimal significant length
#[derive(Clone)]
pub struct BigNum {
    sign: Sign,
    size: usize,
    /// `buffer.len()` is the room; limbs are little-endian
    buffer: Vec<u64>,
}

impl BigNum {
    /// Creates a zero with room for `words` limbs (at least one)
    ///
    /// # Examples
    /// ```
    /// use ecnr::bignum::BigNum;
    /// let out = BigNum::with_room(4);
    /// assert_eq!(out.room(), 4);
    /// assert!(out.is_zero());
    /// ```
    pub fn with_room(words: usize) -> Self {
        Self {
            sign: Sign::Positive,
            size: 1,
            buffer: vec![0; words.max(1)],
        }
    }

    pub fn from_u64(val: u64) -> Self {
        Self::from_limbs(&[val])
    }

    /// Creates a non-negative value from little-endian limbs; room equals the slice length
    pub fn from_limbs(limbs: &[u64]) -> Self {
        let mut out = Self::with_room(limbs.len());
        out.buffer[..limbs.len()].copy_from_slice(limbs);
        out.size = out.buffer.len();
        out.normalize();
        out
    }

    /// Creates a non-negative value with room N from a fixed-width integer
    pub fn from_bigint<const N: usize>(value: &BigInt<N>) -> Self {
        Self::from_limbs(value.limbs())
    }

    /// Creates a non-negative value from big-endian bytes
    pub fn from_be_bytes(bytes: &[u8]) -> Self {
        let words = bytes.len().div_ceil(8).max(1);
        let mut out = Self::with_room(words);
        for (i, &byte) in bytes.iter().rev().enumerate() {
            out.buffer[i / 8] |= (byte as u64) << ((i % 8) * 8);
        }
        out.size = words;
        out.normalize();
        out
    }

    /// Parses a big-endian hex string with an optional leading `-` and `0x` prefix
    ///
    /// # Examples
    /// ```
    /// use ecnr::bignum::BigNum;
    /// let v = BigNum::from_hex("-0x1F").unwrap();
    /// assert!(v.is_negative());
    /// assert_eq!(v.limbs(), &[31]);
    /// ```
    pub fn from_hex(hex: &str) -> NrResult<Self> {
        let hex = hex.trim();
        let (negative, digits) = match hex.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, hex),
        };
        let digits = digits
            .strip_prefix("0x")
            .or_else(|| digits.strip_prefix("0X"))
            .unwrap_or(digits);
        if digits.is_empty() {
            return Err(NrError::Codec(format!("empty hex number {:?}", hex)));
        }

        let mut out = Self::with_room(digits.len().div_ceil(16));
        for (i, ch) in digits.chars().rev().enumerate() {
            let digit = ch
                .to_digit(16)
                .ok_or_else(|| NrError::Codec(format!("invalid hex digit {:?}", ch)))?;
            out.buffer[i / 16] |= (digit as u64) << ((i % 16) * 4);
        }
        out.size = out.buffer.len();
        if negative {
            out.sign = Sign::Negative;
        }
        out.normalize();
        Ok(out)
    }

    /// Returns the same value with the opposite sign (zero stays positive)
    pub fn negated(mut self) -> Self {
        self.sign = match self.sign {
            Sign::Positive => Sign::Negative,
            Sign::Negative => Sign::Positive,
        };
        self.normalize();
        self
    }

    /// Returns the same value with its capacity grown to at least `words`
    pub fn with_min_room(mut self, words: usize) -> Self {
        if self.buffer.len() < words {
            self.buffer.resize(words, 0);
        }
        self
    }

    /// Capacity in 64-bit words
    pub fn room(&self) -> usize {
        self.buffer.len()
    }

    /// Number of significant words (1 for zero)
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn sign(&self) -> Sign {
        self.sign
    }

    pub fn is_negative(&self) -> bool {
        self.sign == Sign::Negative
    }

    pub fn is_zero(&self) -> bool {
        self.size == 1 && self.buffer[0] == 0
    }

    /// Significant limbs, little-endian
    pub fn limbs(&self) -> &[u64] {
        &self.buffer[..self.size]
    }

    pub fn bit_length(&self) -> usize {
        let top = self.buffer[self.size - 1];
        (self.size - 1) * 64 + (64 - top.leading_zeros() as usize)
    }

    pub fn get_bit(&self, idx: usize) -> bool {
        let word = idx / 64;
        word < self.size && (self.buffer[word] >> (idx % 64)) & 1 == 1
    }

    /// Trims the significant length to the highest non-zero word
    pub fn normalize(&mut self) {
        let mut size = self.size.min(self.buffer.len()).max(1);
        while size > 1 && self.buffer[size - 1] == 0 {
            size -= 1;
        }
        self.size = size;
        for limb in self.buffer[size..].iter_mut() {
            *limb = 0;
        }
        if self.is_zero() {
            self.sign = Sign::Positive;
        }
    }

    /// Stores a non-negative value given as little-endian limbs
    ///
    /// Fails with [`NrError::BufferTooSmall`] if the normalized value does not fit
    /// into the room, in which case `self` is left untouched.
    pub fn set_unsigned(&mut self, limbs: &[u64]) -> NrResult<()> {
        let mut len = limbs.len();
        while len > 1 && limbs[len - 1] == 0 {
            len -= 1;
        }
        if len > self.buffer.len() {
            return Err(NrError::BufferTooSmall);
        }
        self.buffer.fill(0);
        self.buffer[..len].copy_from_slice(&limbs[..len]);
        self.size = len.max(1);
        self.sign = Sign::Positive;
        self.normalize();
        Ok(())
    }

    /// Magnitude as a fixed-width integer, `None` if it needs more than N limbs
    pub fn to_bigint<const N: usize>(&self) -> Option<BigInt<N>> {
        BigInt::from_limb_slice(self.limbs())
    }

    /// Compares the magnitude against a fixed-width integer
    pub fn cmp_magnitude<const N: usize>(&self, other: &BigInt<N>) -> Ordering {
        match self.to_bigint::<N>() {
            Some(value) => value.compare(other),
            None => Ordering::Greater,
        }
    }

    /// Minimal big-endian encoding of the magnitude (at least one byte)
    pub fn to_be_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.size * 8);
        for limb in self.limbs().iter().rev() {
            bytes.extend_from_slice(&limb.to_be_bytes());
        }
        let first = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len() - 1);
        bytes.split_off(first)
    }

    /// Uppercase hex without leading zeros, `-` prefixed when negative
    pub fn to_hex(&self) -> String {
        let limbs = self.limbs();
        let mut hex = String::new();
        if self.is_negative() {
            hex.push('-');
        }
        hex.push_str(&format!("{:X}", limbs[limbs.len() - 1]));
        for limb in limbs[..limbs.len() - 1].iter().rev() {
            hex.push_str(&format!("{:016X}", limb));
        }
        hex
    }

    /// Product of the magnitudes (schoolbook)
    pub fn mul(&self, other: &Self) -> Self {
        let a = self.limbs();
        let b = other.limbs();
        let mut out = Self::with_room(a.len() + b.len());
        for (i, &ai) in a.iter().enumerate() {
            let mut carry = 0u128;
            for (j, &bj) in b.iter().enumerate() {
                let t = out.buffer[i + j] as u128 + (ai as u128) * (bj as u128) + carry;
                out.buffer[i + j] = t as u64;
                carry = t >> 64;
            }
            out.buffer[i + b.len()] = carry as u64;
        }
        out.size = out.buffer.len();
        out.normalize();
        out
    }

    /// Magnitude minus a small value, `None` on underflow
    pub fn checked_sub_u64(&self, val: u64) -> Option<Self> {
        let mut out = Self::from_limbs(self.limbs());
        let mut borrow = val;
        for limb in out.buffer.iter_mut() {
            let (diff, underflow) = limb.overflowing_sub(borrow);
            *limb = diff;
            borrow = underflow as u64;
            if borrow == 0 {
                break;
            }
        }
        if borrow != 0 {
            return None;
        }
        out.normalize();
        Some(out)
    }
}

impl PartialEq for BigNum {
    fn eq(&self, other: &Self) -> bool {
        self.sign == other.sign && self.limbs() == other.limbs()
    }
}

impl Eq for BigNum {}

impl fmt::Debug for BigNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BigNum(0x{}, room {})", self.to_hex(), self.room())
    }
}

impl fmt::Display for BigNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-0x{}", &self.to_hex()[1..])
        } else {
            write!(f, "0x{}", self.to_hex())
        }
    }
}
