//! Curve context
//!
//! Everything a signature call needs about its group: the coordinate field, the
//! curve, the base point `G`, arithmetic modulo the order `n`, and the scratch
//! pool. A context is immutable after construction apart from the pool's slots.

use crate::bigint::BigInt;
use crate::bignum::BigNum;
use crate::elliptic_curve::{EcPoint, EllipticCurve};
use crate::error::{NrError, NrResult};
use crate::field::{GfElement, GfpField};
use crate::mod_engine::ModEngine;
use crate::params::{parse_hex, CurveParams};
use crate::pool::ScratchPool;
use crate::scratch::ScratchBuffer;
use std::cmp::Ordering;

pub struct CurveContext<const N: usize> {
    name: String,
    curve: EllipticCurve<N>,
    generator: EcPoint<N>,
    order: ModEngine<N>,
    pool: ScratchPool<N>,
}

impl<const N: usize> CurveContext<N> {
    /// Builds a context from a curve and base point coordinates (internal representation)
    pub fn new(
        name: &str,
        curve: EllipticCurve<N>,
        gx: GfElement<N>,
        gy: GfElement<N>,
        order: BigInt<N>,
    ) -> NrResult<Self> {
        let generator = curve.from_affine(gx, gy);
        if !curve.is_on_curve(&generator) {
            return Err(NrError::InvalidCurve("base point is not on the curve".into()));
        }
        let order = ModEngine::new(order)?;

        log::debug!(
            "curve context {}: degree {}, felen {}, order bits {}",
            name,
            curve.field().degree(),
            curve.field().element_len(),
            order.order_bits()
        );

        Ok(Self {
            name: name.to_string(),
            curve,
            generator,
            order,
            pool: ScratchPool::new(),
        })
    }

    /// Builds a context from a parameter set
    ///
    /// # Examples
    /// ```
    /// use ecnr::context::CurveContext;
    /// use ecnr::params::CurveParams;
    /// let ctx = CurveContext::<4>::from_params(&CurveParams::p256()).unwrap();
    /// assert_eq!(ctx.order().order_bits(), 256);
    /// ```
    pub fn from_params(params: &CurveParams) -> NrResult<Self> {
        let prime = parse_hex::<N>(&params.prime, "prime")?;
        let field = match &params.extension {
            None => GfpField::new_prime(prime)?,
            Some(poly) => {
                let coeffs = poly
                    .iter()
                    .map(|c| parse_hex::<N>(c, "polynomial coefficient"))
                    .collect::<NrResult<Vec<_>>>()?;
                GfpField::new_extension(prime, &coeffs)?
            }
        };

        let element = |coeffs: Vec<BigInt<N>>, what: &str| {
            field
                .encode(&coeffs)
                .ok_or_else(|| NrError::InvalidCurve(format!("{} is not a field element", what)))
        };
        let a = element(params.a.parse("a")?, "a")?;
        let b = element(params.b.parse("b")?, "b")?;
        let gx = element(params.generator.x.parse("generator x")?, "generator x")?;
        let gy = element(params.generator.y.parse("generator y")?, "generator y")?;
        let order = parse_hex::<N>(&params.order, "order")?;

        let curve = EllipticCurve::new(field, a, b)?;
        Self::new(&params.name, curve, gx, gy, order)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field(&self) -> &GfpField<N> {
        self.curve.field()
    }

    pub fn curve(&self) -> &EllipticCurve<N> {
        &self.curve
    }

    pub fn generator(&self) -> &EcPoint<N> {
        &self.generator
    }

    /// Arithmetic modulo the order n
    pub fn order(&self) -> &ModEngine<N> {
        &self.order
    }

    pub fn pool(&self) -> &ScratchPool<N> {
        &self.pool
    }

    pub fn is_extension(&self) -> bool {
        self.field().is_extension()
    }

    /// Field element length in words
    pub fn element_len(&self) -> usize {
        self.field().element_len()
    }

    /// Creates a point from canonical coordinates, rejecting anything off the curve
    pub fn point_from_affine(&self, x: &[BigInt<N>], y: &[BigInt<N>]) -> NrResult<EcPoint<N>> {
        let f = self.field();
        let (x, y) = match (f.encode(x), f.encode(y)) {
            (Some(x), Some(y)) => (x, y),
            _ => return Err(NrError::InvalidPoint),
        };
        let point = self.curve.from_affine(x, y);
        if !self.curve.is_on_curve(&point) {
            return Err(NrError::InvalidPoint);
        }
        Ok(point)
    }

    /// Canonical affine coordinates, `None` for the point at infinity
    pub fn point_to_affine(&self, p: &EcPoint<N>) -> Option<(Vec<BigInt<N>>, Vec<BigInt<N>>)> {
        let (x, y) = self.curve.affine(p)?;
        Some((self.field().decode(&x), self.field().decode(&y)))
    }

    /// k*G with one scratch workspace
    pub fn mul_base(&self, k: &BigInt<N>, scratch: &mut ScratchBuffer<N>) -> NrResult<EcPoint<N>> {
        if scratch.mul_capacity() < 1 {
            return Err(NrError::BufferTooSmall);
        }
        let bits = self.order.order_bits();
        let r = self
            .curve
            .mul_point(k, &self.generator, bits, scratch.workspace());
        scratch.wipe();
        Ok(r)
    }

    /// k*P with one scratch workspace
    pub fn mul_point(
        &self,
        k: &BigInt<N>,
        p: &EcPoint<N>,
        scratch: &mut ScratchBuffer<N>,
    ) -> NrResult<EcPoint<N>> {
        if scratch.mul_capacity() < 1 {
            return Err(NrError::BufferTooSmall);
        }
        let bits = self.order.order_bits();
        let r = self.curve.mul_point(k, p, bits, scratch.workspace());
        scratch.wipe();
        Ok(r)
    }

    /// d*G + c*Q with two scratch workspaces
    pub fn double_scalar_mul(
        &self,
        d: &BigInt<N>,
        c: &BigInt<N>,
        q: &EcPoint<N>,
        scratch: &mut ScratchBuffer<N>,
    ) -> NrResult<EcPoint<N>> {
        if scratch.mul_capacity() < 2 {
            return Err(NrError::BufferTooSmall);
        }
        let bits = self.order.order_bits();
        let (t1, t2) = scratch.workspace_pair();
        let r = self
            .curve
            .double_scalar_mul(d, &self.generator, c, q, bits, t1, t2);
        scratch.wipe();
        Ok(r)
    }

    /// Public key x*G for a private key in [1, n-1]
    pub fn public_key(&self, x: &BigNum, scratch: &mut ScratchBuffer<N>) -> NrResult<EcPoint<N>> {
        let x = self.private_scalar(x)?;
        self.mul_base(&x, scratch)
    }

    /// Converts a private key to a scalar, checking 1 <= key < n
    pub(crate) fn private_scalar(&self, key: &BigNum) -> NrResult<BigInt<N>> {
        self.scalar_below_order(key).ok_or(NrError::InvalidPrivateKey)
    }

    /// Converts a message representative to a scalar, checking 0 < m < n
    pub(crate) fn message_scalar(&self, m: &BigNum) -> NrResult<BigInt<N>> {
        self.scalar_below_order(m).ok_or(NrError::MessageOutOfRange)
    }

    fn scalar_below_order(&self, v: &BigNum) -> Option<BigInt<N>> {
        if v.is_negative() || v.is_zero() {
            return None;
        }
        if v.cmp_magnitude(self.order.modulus()) != Ordering::Less {
            return None;
        }
        v.to_bigint::<N>()
    }
}

impl<const N: usize> std::fmt::Debug for CurveContext<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurveContext")
            .field("name", &self.name)
            .field("degree", &self.field().degree())
            .field("order", self.order.modulus())
            .field("pool", &self.pool.usage())
            .finish()
    }
}
