//! NR (Nyberg-Rueppel) signatures over prime-field elliptic curves
//!
//! The signature on a message representative m is the pair (c, d):
//! - R = k*G for the ephemeral key k, r = R.x mod n
//! - c = (r + m) mod n
//! - d = (k - x*c) mod n for the regular key x
//!
//! Verification recomputes P = d*G + c*Q = R and accepts iff (c - P.x) mod n == m.
//!
//! # Validation
//! Before any arithmetic, a call rejects extension-field curves, undersized output
//! or scratch buffers, and then out-of-range inputs, in that order. A failed
//! validation never touches the output buffers. A signature that is merely wrong is
//! not an error: [`verify`] reports it as [`VerifyResult::Invalid`].
//!
//! # Security
//! Callers supply the ephemeral key; it must be fresh and secret for every
//! signature. Reusing k for two messages reveals x.

use crate::bignum::BigNum;
use crate::context::CurveContext;
use crate::elliptic_curve::EcPoint;
use crate::error::{NrError, NrResult};
use crate::hash::{message_representative, HashAlg, MessageHasher};
use crate::scratch::{ScratchBuffer, SIGN_WORKSPACES, VERIFY_WORKSPACES};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a verification that ran to completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerifyResult {
    Valid,
    Invalid,
}

impl VerifyResult {
    pub fn is_valid(&self) -> bool {
        *self == VerifyResult::Valid
    }
}

impl fmt::Display for VerifyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyResult::Valid => write!(f, "valid"),
            VerifyResult::Invalid => write!(f, "invalid"),
        }
    }
}

/// Signature components with room for any value below the order of a context
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    pub c: BigNum,
    pub d: BigNum,
}

impl Signature {
    pub fn for_context<const N: usize>(ctx: &CurveContext<N>) -> Self {
        let words = ctx.order().order_words();
        Self {
            c: BigNum::with_room(words),
            d: BigNum::with_room(words),
        }
    }
}

fn check_sign_preconditions<const N: usize>(
    sign_c: &BigNum,
    sign_d: &BigNum,
    ctx: &CurveContext<N>,
    scratch: &ScratchBuffer<N>,
) -> NrResult<()> {
    if ctx.is_extension() {
        return Err(NrError::UnsupportedMode);
    }
    let words = ctx.order().order_words();
    if sign_c.room() < words || sign_d.room() < words {
        return Err(NrError::BufferTooSmall);
    }
    if scratch.mul_capacity() < SIGN_WORKSPACES {
        return Err(NrError::BufferTooSmall);
    }
    Ok(())
}

fn check_verify_preconditions<const N: usize>(
    ctx: &CurveContext<N>,
    scratch: &ScratchBuffer<N>,
) -> NrResult<()> {
    if ctx.is_extension() {
        return Err(NrError::UnsupportedMode);
    }
    if scratch.mul_capacity() < VERIFY_WORKSPACES {
        return Err(NrError::BufferTooSmall);
    }
    Ok(())
}

/// Public-key length, then component signs
fn check_verify_inputs<const N: usize>(
    pub_key: &EcPoint<N>,
    sign_c: &BigNum,
    sign_d: &BigNum,
    ctx: &CurveContext<N>,
) -> NrResult<()> {
    if pub_key.element_len() != ctx.element_len() {
        return Err(NrError::OutOfRange);
    }
    if sign_c.is_negative() || sign_d.is_negative() {
        return Err(NrError::Range);
    }
    Ok(())
}

/// Signs the message representative `msg` with the regular key `reg_key` and the
/// ephemeral key `eph_key`, writing the components into `sign_c` and `sign_d`
///
/// Both output buffers need room for `ctx.order().order_words()` words. On any
/// error the outputs are left untouched; [`NrError::SignatureDegenerate`] asks the
/// caller to retry with a fresh ephemeral key.
pub fn sign<const N: usize>(
    msg: &BigNum,
    reg_key: &BigNum,
    eph_key: &BigNum,
    sign_c: &mut BigNum,
    sign_d: &mut BigNum,
    ctx: &CurveContext<N>,
    scratch: &mut ScratchBuffer<N>,
) -> NrResult<()> {
    check_sign_preconditions(sign_c, sign_d, ctx, scratch)?;
    let x = ctx.private_scalar(reg_key)?;
    let k = ctx.private_scalar(eph_key)?;
    let m = ctx.message_scalar(msg)?;
    let order = ctx.order();

    let points = ctx.pool().acquire_points(1)?;
    points.set(0, ctx.mul_base(&k, scratch)?);

    // R at infinity means the context's order is not the order of G
    let (rx, _) = match ctx.curve().affine(&points.get(0)) {
        Some(xy) => xy,
        None => {
            log::debug!("{}: ephemeral point at infinity", ctx.name());
            return Err(NrError::SignatureDegenerate);
        }
    };
    let r = order.reduce(&ctx.field().decode_base(&rx));

    let c = order.add(&r, &m);
    if c.is_zero() {
        log::debug!("{}: degenerate signature, c == 0", ctx.name());
        return Err(NrError::SignatureDegenerate);
    }

    // d = k - x*c, with x*c = MontMul(MontEncode(x), c)
    let xc = order.mont_mul(&order.mont_encode(&x), &c);
    let d = order.sub(&k, &xc);

    sign_c.set_unsigned(c.limbs())?;
    sign_d.set_unsigned(d.limbs())?;
    log::trace!("{}: signed", ctx.name());
    Ok(())
}

/// Verifies `(sign_c, sign_d)` on the message representative `msg` against the
/// public key `pub_key`
///
/// Errors report calls that could not be evaluated (unsupported curve, small
/// scratch, a key for a different field, negative components, a message out of
/// range). Any signature that can be evaluated yields `Ok(Valid)` or `Ok(Invalid)`.
pub fn verify<const N: usize>(
    msg: &BigNum,
    pub_key: &EcPoint<N>,
    sign_c: &BigNum,
    sign_d: &BigNum,
    ctx: &CurveContext<N>,
    scratch: &mut ScratchBuffer<N>,
) -> NrResult<VerifyResult> {
    check_verify_preconditions(ctx, scratch)?;
    check_verify_inputs(pub_key, sign_c, sign_d, ctx)?;
    let m = ctx.message_scalar(msg)?;
    let order = ctx.order();

    let (c, d) = match (sign_c.to_bigint::<N>(), sign_d.to_bigint::<N>()) {
        (Some(c), Some(d)) if order.in_open_range(&c) && order.in_open_range(&d) => (c, d),
        _ => {
            log::trace!("{}: signature components out of (0, n)", ctx.name());
            return Ok(VerifyResult::Invalid);
        }
    };
    if pub_key.is_infinity() {
        return Ok(VerifyResult::Invalid);
    }

    // h1 = d, h2 = c, f
    let elems = ctx.pool().acquire_elements(3)?;
    elems.set(0, d);
    elems.set(1, c);
    let points = ctx.pool().acquire_points(1)?;
    points.set(
        0,
        ctx.double_scalar_mul(&elems.get(0), &elems.get(1), pub_key, scratch)?,
    );

    let result = match ctx.curve().affine(&points.get(0)) {
        None => VerifyResult::Invalid,
        Some((px, _)) => {
            let x = order.reduce(&ctx.field().decode_base(&px));
            elems.set(2, order.sub(&elems.get(1), &x));
            if elems.get(2) == m {
                VerifyResult::Valid
            } else {
                VerifyResult::Invalid
            }
        }
    };
    log::trace!("{}: signature {}", ctx.name(), result);
    Ok(result)
}

/// Hashes `message` with `alg` and signs the resulting representative
#[allow(clippy::too_many_arguments)]
pub fn sign_message<const N: usize>(
    message: &[u8],
    alg: HashAlg,
    reg_key: &BigNum,
    eph_key: &BigNum,
    sign_c: &mut BigNum,
    sign_d: &mut BigNum,
    ctx: &CurveContext<N>,
    scratch: &mut ScratchBuffer<N>,
) -> NrResult<()> {
    check_sign_preconditions(sign_c, sign_d, ctx, scratch)?;
    ctx.private_scalar(reg_key)?;
    ctx.private_scalar(eph_key)?;
    let m = message_representative(&MessageHasher::digest(alg, message), ctx)?;
    sign(&m, reg_key, eph_key, sign_c, sign_d, ctx, scratch)
}

/// Hashes `message` with `alg` and verifies the signature on the resulting representative
pub fn verify_message<const N: usize>(
    message: &[u8],
    alg: HashAlg,
    pub_key: &EcPoint<N>,
    sign_c: &BigNum,
    sign_d: &BigNum,
    ctx: &CurveContext<N>,
    scratch: &mut ScratchBuffer<N>,
) -> NrResult<VerifyResult> {
    check_verify_preconditions(ctx, scratch)?;
    check_verify_inputs(pub_key, sign_c, sign_d, ctx)?;
    let m = message_representative(&MessageHasher::digest(alg, message), ctx)?;
    verify(&m, pub_key, sign_c, sign_d, ctx, scratch)
}
