use crate::bigint::BigInt;
use std::cmp::Ordering;

/// Montgomery context for a fixed odd modulus.
/// Supports Montgomery multiplication and exponentiation.
///
/// The context holds no interior scratch, so one context can be shared
/// between threads.
#[derive(Clone, Debug)]
pub struct MontgomeryCtx<const N: usize> {
    pub modulus: BigInt<N>,
    n0: u64,       // n0 = -m^{-1} mod 2^64
    r2: BigInt<N>, // R^2 mod m, where R = 2^(64N)
    one: BigInt<N>,
}

impl<const N: usize> MontgomeryCtx<N> {
    /// Create a Montgomery context. Returns None if modulus is even or smaller than 3.
    pub fn new(modulus: BigInt<N>) -> Option<Self> {
        if !modulus.is_odd() || modulus.bit_length() < 2 {
            return None;
        }

        let n0 = mont_n0(modulus.limbs()[0]);
        let r2 = compute_r2::<N>(&modulus);
        let mut ctx = Self {
            modulus,
            n0,
            r2,
            one: BigInt::zero(),
        };
        ctx.one = ctx.mont_mul(&BigInt::one(), &ctx.r2);
        Some(ctx)
    }

    /// Convert x (normal) into Montgomery domain: x*R mod m
    #[inline]
    pub fn to_mont(&self, x: &BigInt<N>) -> BigInt<N> {
        let x = reduce_full(x, &self.modulus);
        // mont_mul(x, R^2) = x*R (because mont_mul returns (a*b*R^{-1}) mod m)
        self.mont_mul(&x, &self.r2)
    }

    /// Convert x (Montgomery) back to normal: x*R^{-1} mod m
    #[inline]
    pub fn from_mont(&self, x: &BigInt<N>) -> BigInt<N> {
        self.mont_mul(x, &BigInt::<N>::one())
    }

    /// Montgomery representation of 1, i.e. R mod m
    #[inline]
    pub fn one_mont(&self) -> BigInt<N> {
        self.one
    }

    /// Core Montgomery multiplication (CIOS):
    /// returns (a*b*R^{-1}) mod m.
    ///
    /// Requirements:
    /// - modulus is odd
    /// - a,b are in [0, m)
    pub fn mont_mul(&self, a: &BigInt<N>, b: &BigInt<N>) -> BigInt<N> {
        let m = self.modulus.limbs();
        let a = a.limbs();
        let b = b.limbs();

        // t holds N limbs plus two carry words
        let mut t = [0u64; N];
        let mut t_n = 0u64;

        for &bi in b.iter() {
            // t += a * b[i]
            let mut carry: u128 = 0;
            for j in 0..N {
                let uv = (t[j] as u128) + (a[j] as u128) * (bi as u128) + carry;
                t[j] = uv as u64;
                carry = uv >> 64;
            }
            let uv = (t_n as u128) + carry;
            t_n = uv as u64;
            let t_n1 = (uv >> 64) as u64;

            // t = (t + mi * m) / 2^64
            let mi = t[0].wrapping_mul(self.n0);
            let uv = (t[0] as u128) + (mi as u128) * (m[0] as u128);
            let mut carry = uv >> 64;
            for j in 1..N {
                let uv = (t[j] as u128) + (mi as u128) * (m[j] as u128) + carry;
                t[j - 1] = uv as u64;
                carry = uv >> 64;
            }
            let uv = (t_n as u128) + carry;
            t[N - 1] = uv as u64;
            t_n = t_n1 + ((uv >> 64) as u64);
        }

        // t < 2m: a single conditional subtraction
        let out = BigInt::<N>::from_limbs(t);
        if t_n != 0 || out.compare(&self.modulus) != Ordering::Less {
            out.sub_with_borrow(&self.modulus).0
        } else {
            out
        }
    }

    /// Normal modular multiplication using Montgomery under the hood.
    pub fn mod_mul(&self, a: &BigInt<N>, b: &BigInt<N>) -> BigInt<N> {
        let am = self.to_mont(a);
        let bm = self.to_mont(b);
        let cm = self.mont_mul(&am, &bm);
        self.from_mont(&cm)
    }

    /// Exponentiation inside the Montgomery domain (square-and-multiply, LSB-first).
    ///
    /// `base` is in Montgomery form, the result is too. The exponent is given as
    /// little-endian limbs of any length.
    pub fn pow_mont(&self, base: &BigInt<N>, exp: &[u64]) -> BigInt<N> {
        let mut result = self.one;
        let mut base_m = *base;

        let exp_bits = exp.len() * 64;
        for i in 0..exp_bits {
            if (exp[i / 64] >> (i % 64)) & 1 == 1 {
                result = self.mont_mul(&result, &base_m);
            }
            base_m = self.mont_mul(&base_m, &base_m);
        }

        result
    }

    /// Normal modular exponentiation using Montgomery.
    pub fn mod_pow(&self, base: &BigInt<N>, exp: &BigInt<N>) -> BigInt<N> {
        let base_m = self.to_mont(base);
        self.from_mont(&self.pow_mont(&base_m, exp.limbs()))
    }

    /// Inverse of a Montgomery-form value by Fermat's little theorem.
    ///
    /// Only meaningful for a prime modulus; zero maps to zero.
    pub fn inv_mont(&self, a: &BigInt<N>) -> BigInt<N> {
        let exp = self.modulus - BigInt::from_u64(2);
        self.pow_mont(a, exp.limbs())
    }
}

/// Compute n0 = -m^{-1} mod 2^64 (requires m odd).
fn mont_n0(m0: u64) -> u64 {
    debug_assert!(m0 & 1 == 1);
    inv_mod_2_64_odd(m0).wrapping_neg()
}

/// Inverse of odd a modulo 2^64 using Newton iteration.
fn inv_mod_2_64_odd(a: u64) -> u64 {
    debug_assert!(a & 1 == 1);
    // x <- x(2 - ax) mod 2^64
    let mut x = 1u64;
    for _ in 0..6 {
        x = x.wrapping_mul(2u64.wrapping_sub(a.wrapping_mul(x)));
    }
    x
}

/// Compute R^2 mod m by repeated doubling from 1:
/// After 2*64N doublings: 1 * 2^(128N) mod m == R^2 mod m.
fn compute_r2<const N: usize>(m: &BigInt<N>) -> BigInt<N> {
    let mut r = BigInt::<N>::one();
    for _ in 0..(2 * 64 * N) {
        r = r.mod_add(&r, m);
    }
    r
}

#[inline]
fn reduce_full<const N: usize>(x: &BigInt<N>, m: &BigInt<N>) -> BigInt<N> {
    if x.compare(m) == Ordering::Less {
        *x
    } else {
        x.modulo(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECP_P: &str = "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F";
    const P256_N: &str = "FFFFFFFF00000000FFFFFFFFFFFFFFFFBCE6FAADA7179E84F3B9CAC2FC632551";

    #[test]
    fn rejects_even_or_tiny_modulus() {
        assert!(MontgomeryCtx::<1>::new(BigInt::from_u64(10)).is_none());
        assert!(MontgomeryCtx::<1>::new(BigInt::from_u64(1)).is_none());
        assert!(MontgomeryCtx::<1>::new(BigInt::from_u64(3)).is_some());
    }

    #[test]
    fn montgomery_matches_shift_and_add() {
        type B = BigInt<4>;
        let m = B::from_hex(SECP_P).unwrap();
        let ctx = MontgomeryCtx::<4>::new(m).unwrap();

        let a = B::from_u64(1_234_567);
        let b = B::from_u64(7_654_321);
        assert_eq!(a.mod_mul(&b, &ctx.modulus), ctx.mod_mul(&a, &b));

        // Operands near the modulus exercise the final subtraction
        let a = m - B::from_u64(1);
        let b = m - B::from_u64(12345);
        assert_eq!(a.mod_mul(&b, &m), ctx.mod_mul(&a, &b));
    }

    #[test]
    fn top_bit_modulus() {
        let n = BigInt::<4>::from_hex(P256_N).unwrap();
        let ctx = MontgomeryCtx::new(n).unwrap();
        let a = BigInt::<4>::from_hex("C477F9F65C22CCE20657FAA5B2D1D8122336F851A508A1ED04E479C34985BF96")
            .unwrap();
        let b = n - BigInt::from_u64(3);
        assert_eq!(ctx.mod_mul(&a, &b), a.mod_mul(&b, &n));
        assert_eq!(ctx.from_mont(&ctx.to_mont(&a)), a);
    }

    #[test]
    fn single_limb_round_trip() {
        let ctx = MontgomeryCtx::<1>::new(BigInt::from_u64(31)).unwrap();
        for v in 0..31u64 {
            let x = BigInt::from_u64(v);
            assert_eq!(ctx.from_mont(&ctx.to_mont(&x)), x);
        }
        assert_eq!(ctx.from_mont(&ctx.one_mont()), BigInt::one());
        assert_eq!(ctx.to_mont(&BigInt::from_u64(33)), ctx.to_mont(&BigInt::from_u64(2)));
    }

    #[test]
    fn pow_and_inverse() {
        let ctx = MontgomeryCtx::<1>::new(BigInt::from_u64(23)).unwrap();
        assert_eq!(
            ctx.mod_pow(&BigInt::from_u64(5), &BigInt::from_u64(3)),
            BigInt::from_u64(125 % 23)
        );
        for v in 1..23u64 {
            let xm = ctx.to_mont(&BigInt::from_u64(v));
            let inv = ctx.inv_mont(&xm);
            assert_eq!(ctx.from_mont(&ctx.mont_mul(&xm, &inv)), BigInt::one());
        }
    }
}
