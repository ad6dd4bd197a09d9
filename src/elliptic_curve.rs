//! Elliptic Curve Groups over Finite Fields
//!
//! Short Weierstrass curves y² = x³ + ax + b over GF(p) or GF(p^k), characteristic > 3.
//! Points are kept in Jacobian coordinates (X : Y : Z) with x = X/Z², y = Y/Z³;
//! Z = 0 is the point at infinity.
//!
//! Scalar multiplication uses a fixed 4-bit window. The table of multiples lives in
//! a caller-provided slice (see [`ScratchBuffer`](crate::scratch::ScratchBuffer)), and
//! every lookup scans the whole table.

use crate::bigint::BigInt;
use crate::error::{NrError, NrResult};
use crate::field::{GfElement, GfpField};

/// Bits consumed per window step
pub const WINDOW_BITS: usize = 4;

/// Entries in one window table: 0*P .. 15*P
pub const TABLE_LEN: usize = 1 << WINDOW_BITS;

/// A point in Jacobian coordinates
///
/// `felen` is the length in words of one coordinate in the field the point was
/// created for; it travels with the point so a mismatched key can be detected.
#[derive(Clone, Copy, Debug)]
pub struct EcPoint<const N: usize> {
    pub(crate) x: GfElement<N>,
    pub(crate) y: GfElement<N>,
    pub(crate) z: GfElement<N>,
    felen: usize,
}

impl<const N: usize> EcPoint<N> {
    /// The point at infinity for a field with the given element length
    pub fn infinity(felen: usize) -> Self {
        Self {
            x: GfElement::zero(),
            y: GfElement::zero(),
            z: GfElement::zero(),
            felen,
        }
    }

    pub fn is_infinity(&self) -> bool {
        self.z.is_zero()
    }

    /// Field element length in words
    pub fn element_len(&self) -> usize {
        self.felen
    }
}

impl<const N: usize> Default for EcPoint<N> {
    fn default() -> Self {
        Self::infinity(0)
    }
}

/// An elliptic curve in Short Weierstrass form: y² = x³ + ax + b
#[derive(Clone, Debug)]
pub struct EllipticCurve<const N: usize> {
    field: GfpField<N>,
    a: GfElement<N>,
    b: GfElement<N>,
}

impl<const N: usize> EllipticCurve<N> {
    /// Creates the curve, rejecting characteristic 3 and singular curves
    pub fn new(field: GfpField<N>, a: GfElement<N>, b: GfElement<N>) -> NrResult<Self> {
        if field.modulus().compare(&BigInt::from_u64(3)) != std::cmp::Ordering::Greater {
            return Err(NrError::InvalidCurve(
                "short Weierstrass form requires characteristic > 3".into(),
            ));
        }

        // 4a³ + 27b² != 0
        let a3 = field.mul(&field.sqr(&a), &a);
        let b2 = field.sqr(&b);
        let discriminant = field.add(
            &field.mul(&field.encode_u64(4), &a3),
            &field.mul(&field.encode_u64(27), &b2),
        );
        if discriminant.is_zero() {
            return Err(NrError::InvalidCurve(
                "curve is singular (discriminant is zero)".into(),
            ));
        }
        Ok(Self { field, a, b })
    }

    pub fn field(&self) -> &GfpField<N> {
        &self.field
    }

    pub fn a(&self) -> &GfElement<N> {
        &self.a
    }

    pub fn b(&self) -> &GfElement<N> {
        &self.b
    }

    pub fn identity(&self) -> EcPoint<N> {
        EcPoint::infinity(self.field.element_len())
    }

    /// Lifts affine coordinates (internal representation) without checking them
    pub fn from_affine(&self, x: GfElement<N>, y: GfElement<N>) -> EcPoint<N> {
        EcPoint {
            x,
            y,
            z: self.field.one(),
            felen: self.field.element_len(),
        }
    }

    /// Checks Y² = X³ + aXZ⁴ + bZ⁶; the point at infinity is on every curve
    pub fn is_on_curve(&self, p: &EcPoint<N>) -> bool {
        if p.is_infinity() {
            return true;
        }
        let f = &self.field;
        let z2 = f.sqr(&p.z);
        let z4 = f.sqr(&z2);
        let z6 = f.mul(&z4, &z2);

        let lhs = f.sqr(&p.y);
        let x3 = f.mul(&f.sqr(&p.x), &p.x);
        let ax = f.mul(&f.mul(&self.a, &p.x), &z4);
        let rhs = f.add(&f.add(&x3, &ax), &f.mul(&self.b, &z6));
        lhs == rhs
    }

    /// Affine coordinates in internal representation, `None` at infinity
    pub fn affine(&self, p: &EcPoint<N>) -> Option<(GfElement<N>, GfElement<N>)> {
        if p.is_infinity() {
            return None;
        }
        let f = &self.field;
        let z_inv = f.inv(&p.z);
        let z_inv2 = f.sqr(&z_inv);
        let x = f.mul(&p.x, &z_inv2);
        let y = f.mul(&f.mul(&p.y, &z_inv2), &z_inv);
        Some((x, y))
    }

    /// Compares two points as group elements
    pub fn points_equal(&self, p: &EcPoint<N>, q: &EcPoint<N>) -> bool {
        match (self.affine(p), self.affine(q)) {
            (None, None) => true,
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    pub fn negate(&self, p: &EcPoint<N>) -> EcPoint<N> {
        EcPoint {
            y: self.field.neg(&p.y),
            ..*p
        }
    }

    /// Point doubling (dbl-2007-bl, any a)
    pub fn double(&self, p: &EcPoint<N>) -> EcPoint<N> {
        if p.is_infinity() || p.y.is_zero() {
            return self.identity();
        }
        let f = &self.field;
        let xx = f.sqr(&p.x);
        let yy = f.sqr(&p.y);
        let yyyy = f.sqr(&yy);
        let zz = f.sqr(&p.z);

        // S = 2*((X + YY)² - XX - YYYY)
        let s = f.double(&f.sub(&f.sub(&f.sqr(&f.add(&p.x, &yy)), &xx), &yyyy));
        // M = 3*XX + a*ZZ²
        let m = f.add(&f.add(&f.double(&xx), &xx), &f.mul(&self.a, &f.sqr(&zz)));
        let t = f.sub(&f.sqr(&m), &f.double(&s));

        let yyyy8 = f.double(&f.double(&f.double(&yyyy)));
        let y3 = f.sub(&f.mul(&m, &f.sub(&s, &t)), &yyyy8);
        let z3 = f.sub(&f.sub(&f.sqr(&f.add(&p.y, &p.z)), &yy), &zz);

        EcPoint {
            x: t,
            y: y3,
            z: z3,
            felen: p.felen,
        }
    }

    /// Point addition (add-2007-bl), falling back to doubling for P == Q
    pub fn add(&self, p: &EcPoint<N>, q: &EcPoint<N>) -> EcPoint<N> {
        if p.is_infinity() {
            return *q;
        }
        if q.is_infinity() {
            return *p;
        }
        let f = &self.field;
        let z1z1 = f.sqr(&p.z);
        let z2z2 = f.sqr(&q.z);
        let u1 = f.mul(&p.x, &z2z2);
        let u2 = f.mul(&q.x, &z1z1);
        let s1 = f.mul(&f.mul(&p.y, &q.z), &z2z2);
        let s2 = f.mul(&f.mul(&q.y, &p.z), &z1z1);

        let h = f.sub(&u2, &u1);
        let r = f.double(&f.sub(&s2, &s1));
        if h.is_zero() {
            return if r.is_zero() {
                self.double(p)
            } else {
                self.identity()
            };
        }

        let i = f.sqr(&f.double(&h));
        let j = f.mul(&h, &i);
        let v = f.mul(&u1, &i);

        let x3 = f.sub(&f.sub(&f.sqr(&r), &j), &f.double(&v));
        let y3 = f.sub(&f.mul(&r, &f.sub(&v, &x3)), &f.double(&f.mul(&s1, &j)));
        let z3 = f.mul(
            &f.sub(&f.sub(&f.sqr(&f.add(&p.z, &q.z)), &z1z1), &z2z2),
            &h,
        );

        EcPoint {
            x: x3,
            y: y3,
            z: z3,
            felen: p.felen,
        }
    }

    /// Fills `table[i] = i*P` for i in 0..TABLE_LEN
    fn fill_table(&self, p: &EcPoint<N>, table: &mut [EcPoint<N>]) {
        debug_assert!(table.len() >= TABLE_LEN);
        table[0] = self.identity();
        table[1] = *p;
        for i in 2..TABLE_LEN {
            table[i] = if i % 2 == 0 {
                self.double(&table[i / 2])
            } else {
                self.add(&table[i - 1], p)
            };
        }
    }

    /// Reads `table[idx]` touching every entry
    fn select(table: &[EcPoint<N>], idx: usize) -> EcPoint<N> {
        let mut out = table[0];
        for (i, entry) in table.iter().enumerate().take(TABLE_LEN) {
            let mask = ((i == idx) as u64).wrapping_neg();
            out = Self::blend(&out, entry, mask);
        }
        out
    }

    fn blend(a: &EcPoint<N>, b: &EcPoint<N>, mask: u64) -> EcPoint<N> {
        let mix = |x: &GfElement<N>, y: &GfElement<N>| {
            let mut out = *x;
            for (o, (l, r)) in out.coeffs.iter_mut().zip(x.coeffs.iter().zip(y.coeffs.iter())) {
                let mut limbs = *l.limbs();
                for (dst, (&lw, &rw)) in limbs.iter_mut().zip(l.limbs().iter().zip(r.limbs().iter())) {
                    *dst = (lw & !mask) | (rw & mask);
                }
                *o = BigInt::from_limbs(limbs);
            }
            out
        };
        EcPoint {
            x: mix(&a.x, &b.x),
            y: mix(&a.y, &b.y),
            z: mix(&a.z, &b.z),
            felen: a.felen,
        }
    }

    /// k*P for a scalar of at most `bits` bits, using `table` (TABLE_LEN points) as workspace
    pub fn mul_point(
        &self,
        k: &BigInt<N>,
        p: &EcPoint<N>,
        bits: usize,
        table: &mut [EcPoint<N>],
    ) -> EcPoint<N> {
        self.fill_table(p, table);
        let windows = bits.div_ceil(WINDOW_BITS);
        let mut acc = self.identity();
        for w in (0..windows).rev() {
            for _ in 0..WINDOW_BITS {
                acc = self.double(&acc);
            }
            let digit = k.window(w * WINDOW_BITS, WINDOW_BITS);
            acc = self.add(&acc, &Self::select(table, digit));
        }
        acc
    }

    /// a*P + b*Q with interleaved windows; each point gets its own table
    #[allow(clippy::too_many_arguments)]
    pub fn double_scalar_mul(
        &self,
        a: &BigInt<N>,
        p: &EcPoint<N>,
        b: &BigInt<N>,
        q: &EcPoint<N>,
        bits: usize,
        table_p: &mut [EcPoint<N>],
        table_q: &mut [EcPoint<N>],
    ) -> EcPoint<N> {
        self.fill_table(p, table_p);
        self.fill_table(q, table_q);
        let windows = bits.div_ceil(WINDOW_BITS);
        let mut acc = self.identity();
        for w in (0..windows).rev() {
            for _ in 0..WINDOW_BITS {
                acc = self.double(&acc);
            }
            acc = self.add(&acc, &Self::select(table_p, a.window(w * WINDOW_BITS, WINDOW_BITS)));
            acc = self.add(&acc, &Self::select(table_q, b.window(w * WINDOW_BITS, WINDOW_BITS)));
        }
        acc
    }
}
