//! Field elements in internal (Montgomery) representation

use super::MAX_EXTENSION_DEGREE;
use crate::bigint::BigInt;
use std::fmt;

/// Element of GF(p) or GF(p^k)
///
/// Coefficients are stored in increasing degree order: `coeffs[i]` is the
/// coefficient of x^i, each one in Montgomery form modulo p. A prime-field element
/// only uses `coeffs[0]`; coefficients at or beyond the field's degree are always
/// zero, which makes the derived equality exact.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct GfElement<const N: usize> {
    pub(crate) coeffs: [BigInt<N>; MAX_EXTENSION_DEGREE],
}

impl<const N: usize> GfElement<N> {
    pub const fn zero() -> Self {
        Self {
            coeffs: [BigInt::zero(); MAX_EXTENSION_DEGREE],
        }
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(|c| c.is_zero())
    }

    /// Raw Montgomery-form coefficients
    pub fn coeffs(&self) -> &[BigInt<N>; MAX_EXTENSION_DEGREE] {
        &self.coeffs
    }
}

impl<const N: usize> Default for GfElement<N> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<const N: usize> fmt::Debug for GfElement<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.coeffs.iter()).finish()
    }
}
