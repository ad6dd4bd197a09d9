//! Runtime-described field GF(p) / GF(p^k)
//!
//! Extension elements are polynomials of degree < k with coefficients in GF(p),
//! reduced modulo the monic irreducible polynomial
//! x^k + c_{k-1}*x^{k-1} + ... + c_1*x + c_0.

use super::element::GfElement;
use super::MAX_EXTENSION_DEGREE;
use crate::bigint::BigInt;
use crate::bignum::BigNum;
use crate::error::{NrError, NrResult};
use crate::montgomery::MontgomeryCtx;
use std::cmp::Ordering;

/// Primes below this bound get an exhaustive root search on their extension polynomial
const SMALL_PRIME_BOUND: u64 = 1 << 16;

/// A prime field or one of its extensions, chosen at runtime
#[derive(Clone, Debug)]
pub struct GfpField<const N: usize> {
    mont: MontgomeryCtx<N>,
    degree: usize,
    /// c_0..c_{k-1}, Montgomery form; unused for prime fields
    poly: [BigInt<N>; MAX_EXTENSION_DEGREE],
    /// p^k - 2, little-endian limbs
    inv_exp: Vec<u64>,
}

impl<const N: usize> GfpField<N> {
    /// Creates GF(p)
    ///
    /// # Examples
    /// ```
    /// use ecnr::bigint::BigInt;
    /// use ecnr::field::GfpField;
    /// let f = GfpField::<1>::new_prime(BigInt::from_u64(31)).unwrap();
    /// let a = f.encode_u64(30);
    /// let b = f.encode_u64(2);
    /// assert_eq!(f.decode_base(&f.add(&a, &b)), BigInt::from_u64(1));
    /// ```
    pub fn new_prime(prime: BigInt<N>) -> NrResult<Self> {
        Self::build(prime, &[])
    }

    /// Creates GF(p^k) from the low coefficients `c_0..c_{k-1}` of a monic
    /// irreducible polynomial of degree k
    pub fn new_extension(prime: BigInt<N>, poly: &[BigInt<N>]) -> NrResult<Self> {
        if poly.len() < 2 || poly.len() > MAX_EXTENSION_DEGREE {
            return Err(NrError::InvalidField(format!(
                "extension degree {} not in 2..={}",
                poly.len(),
                MAX_EXTENSION_DEGREE
            )));
        }
        Self::build(prime, poly)
    }

    fn build(prime: BigInt<N>, poly: &[BigInt<N>]) -> NrResult<Self> {
        let mont = MontgomeryCtx::new(prime)
            .ok_or_else(|| NrError::InvalidField("modulus must be an odd prime".into()))?;
        let degree = poly.len().max(1);

        let mut encoded = [BigInt::zero(); MAX_EXTENSION_DEGREE];
        for (dst, c) in encoded.iter_mut().zip(poly.iter()) {
            if c.compare(&prime) != Ordering::Less {
                return Err(NrError::InvalidField(
                    "polynomial coefficient not reduced".into(),
                ));
            }
            *dst = mont.to_mont(c);
        }

        let order = (1..degree).fold(BigNum::from_bigint(&prime), |acc, _| {
            acc.mul(&BigNum::from_bigint(&prime))
        });
        let inv_exp = order
            .checked_sub_u64(2)
            .ok_or_else(|| NrError::InvalidField("modulus too small".into()))?
            .limbs()
            .to_vec();

        let field = Self {
            mont,
            degree,
            poly: encoded,
            inv_exp,
        };
        if degree > 1 && field.poly_is_reducible() {
            return Err(NrError::InvalidField("polynomial is reducible".into()));
        }
        Ok(field)
    }

    /// Cheap reducibility screening: a zero constant term always means x divides
    /// the polynomial; for small primes and degree 2 or 3 a root search decides it.
    fn poly_is_reducible(&self) -> bool {
        if self.poly[0].is_zero() {
            return true;
        }
        let p = self.modulus();
        if self.degree > 3 || p.bit_length() > 64 || p.limbs()[0] >= SMALL_PRIME_BOUND {
            return false;
        }
        let one = self.mont.one_mont();
        (0..p.limbs()[0]).any(|v| {
            let x = self.mont.to_mont(&BigInt::from_u64(v));
            // Horner on the monic polynomial
            let mut acc = one;
            for c in self.poly[..self.degree].iter().rev() {
                acc = self.mont.mont_mul(&acc, &x).mod_add(c, p);
            }
            acc.is_zero()
        })
    }

    pub fn modulus(&self) -> &BigInt<N> {
        &self.mont.modulus
    }

    /// Extension degree k (1 for a prime field)
    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn is_extension(&self) -> bool {
        self.degree > 1
    }

    /// Significant words of p
    pub fn prime_words(&self) -> usize {
        self.modulus().word_length()
    }

    /// Length of one field element in words
    pub fn element_len(&self) -> usize {
        self.degree * self.prime_words()
    }

    pub fn zero(&self) -> GfElement<N> {
        GfElement::zero()
    }

    pub fn one(&self) -> GfElement<N> {
        let mut out = GfElement::zero();
        out.coeffs[0] = self.mont.one_mont();
        out
    }

    /// Converts canonical coefficients into the internal representation
    ///
    /// Returns `None` unless exactly `degree` coefficients, each below p, are given.
    pub fn encode(&self, coeffs: &[BigInt<N>]) -> Option<GfElement<N>> {
        if coeffs.len() != self.degree {
            return None;
        }
        let mut out = GfElement::zero();
        for (dst, c) in out.coeffs.iter_mut().zip(coeffs.iter()) {
            if c.compare(self.modulus()) != Ordering::Less {
                return None;
            }
            *dst = self.mont.to_mont(c);
        }
        Some(out)
    }

    /// Embeds a small integer (reduced modulo p) into the base field
    pub fn encode_u64(&self, val: u64) -> GfElement<N> {
        let mut out = GfElement::zero();
        out.coeffs[0] = self.mont.to_mont(&BigInt::from_u64(val));
        out
    }

    /// Canonical coefficients, `degree` of them
    pub fn decode(&self, a: &GfElement<N>) -> Vec<BigInt<N>> {
        a.coeffs[..self.degree]
            .iter()
            .map(|c| self.mont.from_mont(c))
            .collect()
    }

    /// Canonical value of the constant coefficient (the whole value in GF(p))
    pub fn decode_base(&self, a: &GfElement<N>) -> BigInt<N> {
        self.mont.from_mont(&a.coeffs[0])
    }

    pub fn add(&self, a: &GfElement<N>, b: &GfElement<N>) -> GfElement<N> {
        let mut out = GfElement::zero();
        for i in 0..self.degree {
            out.coeffs[i] = a.coeffs[i].mod_add(&b.coeffs[i], self.modulus());
        }
        out
    }

    pub fn sub(&self, a: &GfElement<N>, b: &GfElement<N>) -> GfElement<N> {
        let mut out = GfElement::zero();
        for i in 0..self.degree {
            out.coeffs[i] = a.coeffs[i].mod_sub(&b.coeffs[i], self.modulus());
        }
        out
    }

    pub fn neg(&self, a: &GfElement<N>) -> GfElement<N> {
        self.sub(&GfElement::zero(), a)
    }

    pub fn double(&self, a: &GfElement<N>) -> GfElement<N> {
        self.add(a, a)
    }

    pub fn mul(&self, a: &GfElement<N>, b: &GfElement<N>) -> GfElement<N> {
        let k = self.degree;
        let p = self.modulus();
        if k == 1 {
            let mut out = GfElement::zero();
            out.coeffs[0] = self.mont.mont_mul(&a.coeffs[0], &b.coeffs[0]);
            return out;
        }

        // Product has degree up to 2k-2
        let mut temp = [BigInt::<N>::zero(); 2 * MAX_EXTENSION_DEGREE - 1];
        for i in 0..k {
            for j in 0..k {
                let prod = self.mont.mont_mul(&a.coeffs[i], &b.coeffs[j]);
                temp[i + j] = temp[i + j].mod_add(&prod, p);
            }
        }

        // x^k = -(c_{k-1}*x^{k-1} + ... + c_0), folded from the top down
        for i in (k..(2 * k - 1)).rev() {
            let lead = temp[i];
            if lead.is_zero() {
                continue;
            }
            temp[i] = BigInt::zero();
            for j in 0..k {
                let s = self.mont.mont_mul(&lead, &self.poly[j]);
                temp[i - k + j] = temp[i - k + j].mod_sub(&s, p);
            }
        }

        let mut out = GfElement::zero();
        out.coeffs[..k].copy_from_slice(&temp[..k]);
        out
    }

    pub fn sqr(&self, a: &GfElement<N>) -> GfElement<N> {
        self.mul(a, a)
    }

    /// a^e for an exponent given as little-endian limbs
    pub fn pow(&self, a: &GfElement<N>, exp: &[u64]) -> GfElement<N> {
        let mut result = self.one();
        let mut base = *a;
        for i in 0..exp.len() * 64 {
            if (exp[i / 64] >> (i % 64)) & 1 == 1 {
                result = self.mul(&result, &base);
            }
            base = self.sqr(&base);
        }
        result
    }

    /// Multiplicative inverse, a^(p^k - 2); zero maps to zero
    pub fn inv(&self, a: &GfElement<N>) -> GfElement<N> {
        if self.degree == 1 {
            let mut out = GfElement::zero();
            out.coeffs[0] = self.mont.inv_mont(&a.coeffs[0]);
            return out;
        }
        self.pow(a, &self.inv_exp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(v: u64) -> BigInt<1> {
        BigInt::from_u64(v)
    }

    fn gf49() -> GfpField<1> {
        // i^2 = -1
        GfpField::new_extension(b(7), &[b(1), b(0)]).unwrap()
    }

    #[test]
    fn prime_field_arithmetic() {
        let f = GfpField::<1>::new_prime(b(31)).unwrap();
        assert_eq!(f.degree(), 1);
        assert_eq!(f.element_len(), 1);

        let a = f.encode(&[b(20)]).unwrap();
        let c = f.encode(&[b(17)]).unwrap();
        assert_eq!(f.decode(&f.add(&a, &c)), vec![b(6)]);
        assert_eq!(f.decode(&f.sub(&c, &a)), vec![b(28)]);
        assert_eq!(f.decode(&f.mul(&a, &c)), vec![b(340 % 31)]);
        assert_eq!(f.decode(&f.neg(&a)), vec![b(11)]);
        assert!(f.neg(&f.zero()).is_zero());

        for v in 1..31 {
            let x = f.encode_u64(v);
            assert_eq!(f.mul(&x, &f.inv(&x)), f.one());
        }
    }

    #[test]
    fn encode_rejects_unreduced() {
        let f = GfpField::<1>::new_prime(b(31)).unwrap();
        assert!(f.encode(&[b(31)]).is_none());
        assert!(f.encode(&[b(1), b(2)]).is_none());
    }

    #[test]
    fn rejects_bad_modulus() {
        assert!(matches!(
            GfpField::<1>::new_prime(b(32)),
            Err(NrError::InvalidField(_))
        ));
        assert!(GfpField::<1>::new_extension(b(7), &[b(1)]).is_err());
        assert!(GfpField::<1>::new_extension(b(7), &[b(1); 5]).is_err());
    }

    #[test]
    fn rejects_reducible_polynomial() {
        // x^2 - 1 has the root 1
        assert!(matches!(
            GfpField::<1>::new_extension(b(7), &[b(6), b(0)]),
            Err(NrError::InvalidField(_))
        ));
        // x^2 + x has the root 0
        assert!(GfpField::<1>::new_extension(b(7), &[b(0), b(1)]).is_err());
    }

    #[test]
    fn extension_multiplication() {
        let f = gf49();
        assert!(f.is_extension());
        assert_eq!(f.element_len(), 2);

        let z = f.encode(&[b(1), b(3)]).unwrap();
        // (1 + 3i)^2 = 1 + 6i - 9 = 6 + 6i
        assert_eq!(f.decode(&f.sqr(&z)), vec![b(6), b(6)]);

        let i = f.encode(&[b(0), b(1)]).unwrap();
        assert_eq!(f.decode(&f.sqr(&i)), vec![b(6), b(0)]);
    }

    #[test]
    fn extension_inverse() {
        let f = gf49();
        let z = f.encode(&[b(1), b(3)]).unwrap();
        let inv = f.inv(&z);
        assert_eq!(f.decode(&inv), vec![b(5), b(6)]);
        assert_eq!(f.mul(&z, &inv), f.one());

        for c0 in 0..7 {
            for c1 in 0..7 {
                if c0 == 0 && c1 == 0 {
                    continue;
                }
                let x = f.encode(&[b(c0), b(c1)]).unwrap();
                assert_eq!(f.mul(&x, &f.inv(&x)), f.one());
            }
        }
    }

    #[test]
    fn cubic_extension() {
        // 2 is not a cube mod 7, so x^3 - 2 is irreducible
        let f = GfpField::<1>::new_extension(b(7), &[b(5), b(0), b(0)]).unwrap();
        let x = f.encode(&[b(0), b(1), b(0)]).unwrap();
        let x3 = f.mul(&f.sqr(&x), &x);
        assert_eq!(f.decode(&x3), vec![b(2), b(0), b(0)]);
        assert_eq!(f.mul(&x3, &f.inv(&x3)), f.one());
    }
}
