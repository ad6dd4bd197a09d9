//! Arithmetic modulo the group order
//!
//! The signature protocol only ever computes modulo `n`. `ModEngine` bundles the
//! handful of fixed-width operations it needs on top of a [`MontgomeryCtx`].

use crate::bigint::BigInt;
use crate::error::{NrError, NrResult};
use crate::montgomery::MontgomeryCtx;
use std::cmp::Ordering;

/// Fixed-width arithmetic modulo an odd order `n`
#[derive(Clone, Debug)]
pub struct ModEngine<const N: usize> {
    mont: MontgomeryCtx<N>,
    bits: usize,
}

impl<const N: usize> ModEngine<N> {
    /// Builds an engine for `order`; the order must be odd and at least 3
    pub fn new(order: BigInt<N>) -> NrResult<Self> {
        let mont = MontgomeryCtx::new(order)
            .ok_or_else(|| NrError::InvalidCurve("order must be odd and at least 3".into()))?;
        Ok(Self {
            bits: order.bit_length(),
            mont,
        })
    }

    pub fn modulus(&self) -> &BigInt<N> {
        &self.mont.modulus
    }

    /// Bit length of `n`
    pub fn order_bits(&self) -> usize {
        self.bits
    }

    /// Words needed to hold any value below `n`
    pub fn order_words(&self) -> usize {
        self.bits.div_ceil(64).max(1)
    }

    /// (a + b) mod n for a, b < n
    pub fn add(&self, a: &BigInt<N>, b: &BigInt<N>) -> BigInt<N> {
        a.mod_add(b, self.modulus())
    }

    /// (a - b) mod n for a, b < n
    pub fn sub(&self, a: &BigInt<N>, b: &BigInt<N>) -> BigInt<N> {
        a.mod_sub(b, self.modulus())
    }

    pub fn compare(&self, a: &BigInt<N>, b: &BigInt<N>) -> Ordering {
        a.compare(b)
    }

    /// True if 0 < a < n
    pub fn in_open_range(&self, a: &BigInt<N>) -> bool {
        !a.is_zero() && a.compare(self.modulus()) == Ordering::Less
    }

    /// a * R mod n
    pub fn mont_encode(&self, a: &BigInt<N>) -> BigInt<N> {
        self.mont.to_mont(a)
    }

    pub fn mont_decode(&self, a: &BigInt<N>) -> BigInt<N> {
        self.mont.from_mont(a)
    }

    /// a * b * R^-1 mod n
    ///
    /// With `a` Montgomery-encoded and `b` plain, the result is the plain product.
    pub fn mont_mul(&self, a: &BigInt<N>, b: &BigInt<N>) -> BigInt<N> {
        self.mont.mont_mul(a, b)
    }

    /// Reduces an arbitrary N-limb value modulo n
    pub fn reduce(&self, a: &BigInt<N>) -> BigInt<N> {
        if a.compare(self.modulus()) == Ordering::Less {
            *a
        } else {
            a.modulo(self.modulus())
        }
    }
}
