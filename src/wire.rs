//! JSON request/response boundary
//!
//! Objects crossing the boundary carry a `"type"` tag (`big_num` or `point`). This
//! is the only layer where an object can be missing ([`NrError::NullPointer`]) or
//! of the wrong kind ([`NrError::ContextMismatch`]); once decoded, everything goes
//! through the typed engine in [`crate::nr`].
//!
//! Numbers are signed big-endian hex strings with an optional capacity (`room`, in
//! 64-bit words); point coordinates are lists of hex coefficients, lowest degree
//! first.

use crate::bignum::BigNum;
use crate::context::CurveContext;
use crate::elliptic_curve::EcPoint;
use crate::error::{NrError, NrResult};
use crate::nr::{self, VerifyResult};
use crate::params::parse_hex;
use crate::scratch::{ScratchBuffer, SIGN_WORKSPACES, VERIFY_WORKSPACES};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireBigNum {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirePoint {
    /// Field element length in words claimed by the sender
    pub element_len: usize,
    pub x: Vec<String>,
    pub y: Vec<String>,
}

/// A tagged object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireObject {
    BigNum(WireBigNum),
    Point(WirePoint),
}

impl WireObject {
    pub fn from_big_num(value: &BigNum) -> Self {
        WireObject::BigNum(WireBigNum {
            value: value.to_hex(),
            room: Some(value.room()),
        })
    }

    /// Encodes a finite point of `ctx`
    pub fn from_point<const N: usize>(ctx: &CurveContext<N>, point: &EcPoint<N>) -> NrResult<Self> {
        let (x, y) = ctx.point_to_affine(point).ok_or(NrError::InvalidPoint)?;
        Ok(WireObject::Point(WirePoint {
            element_len: point.element_len(),
            x: x.iter().map(|c| c.to_hex()).collect(),
            y: y.iter().map(|c| c.to_hex()).collect(),
        }))
    }

    fn kind(&self) -> &'static str {
        match self {
            WireObject::BigNum(_) => "big_num",
            WireObject::Point(_) => "point",
        }
    }
}

impl WireBigNum {
    /// Decodes for a context with `N`-limb integers
    ///
    /// No value of such a context needs more than `N` words, so a larger declared
    /// `room` is rejected before anything is allocated.
    pub fn decode<const N: usize>(&self) -> NrResult<BigNum> {
        let value = BigNum::from_hex(&self.value)?;
        match self.room {
            Some(room) if room > N => Err(NrError::Codec(format!(
                "room {} exceeds {} words",
                room, N
            ))),
            Some(room) => Ok(value.with_min_room(room)),
            None => Ok(value),
        }
    }
}

impl WirePoint {
    /// Decodes into a checked point of `ctx`
    ///
    /// A declared element length that differs from the context's is reported as
    /// [`NrError::OutOfRange`] before the coordinates are looked at.
    pub fn decode<const N: usize>(&self, ctx: &CurveContext<N>) -> NrResult<EcPoint<N>> {
        if self.element_len != ctx.element_len() {
            return Err(NrError::OutOfRange);
        }
        let x = self
            .x
            .iter()
            .map(|c| parse_hex::<N>(c, "point x"))
            .collect::<NrResult<Vec<_>>>()?;
        let y = self
            .y
            .iter()
            .map(|c| parse_hex::<N>(c, "point y"))
            .collect::<NrResult<Vec<_>>>()?;
        ctx.point_from_affine(&x, &y)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignRequest {
    pub msg: Option<WireObject>,
    pub reg_key: Option<WireObject>,
    pub eph_key: Option<WireObject>,
    /// Output buffers; their `room` is checked against the order
    pub sign_c: Option<WireObject>,
    pub sign_d: Option<WireObject>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignResponse {
    pub sign_c: WireObject,
    pub sign_d: WireObject,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub msg: Option<WireObject>,
    pub pub_key: Option<WireObject>,
    pub sign_c: Option<WireObject>,
    pub sign_d: Option<WireObject>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub result: VerifyResult,
}

fn present(obj: &Option<WireObject>) -> NrResult<&WireObject> {
    obj.as_ref().ok_or(NrError::NullPointer)
}

fn as_big_num(obj: &WireObject) -> NrResult<&WireBigNum> {
    match obj {
        WireObject::BigNum(v) => Ok(v),
        other => {
            log::debug!("expected big_num, got {}", other.kind());
            Err(NrError::ContextMismatch)
        }
    }
}

fn as_point(obj: &WireObject) -> NrResult<&WirePoint> {
    match obj {
        WireObject::Point(p) => Ok(p),
        other => {
            log::debug!("expected point, got {}", other.kind());
            Err(NrError::ContextMismatch)
        }
    }
}

/// Curve kind and scratch size, checked before any payload is decoded
fn check_engine_preconditions<const N: usize>(
    ctx: &CurveContext<N>,
    scratch: &ScratchBuffer<N>,
    workspaces: usize,
) -> NrResult<()> {
    if ctx.is_extension() {
        return Err(NrError::UnsupportedMode);
    }
    if scratch.mul_capacity() < workspaces {
        return Err(NrError::BufferTooSmall);
    }
    Ok(())
}

/// Decodes a sign request and runs [`nr::sign`]
pub fn handle_sign<const N: usize>(
    req: &SignRequest,
    ctx: &CurveContext<N>,
    scratch: &mut ScratchBuffer<N>,
) -> NrResult<SignResponse> {
    let msg = present(&req.msg)?;
    let reg_key = present(&req.reg_key)?;
    let eph_key = present(&req.eph_key)?;
    let sign_c = present(&req.sign_c)?;
    let sign_d = present(&req.sign_d)?;

    let msg = as_big_num(msg)?;
    let reg_key = as_big_num(reg_key)?;
    let eph_key = as_big_num(eph_key)?;
    let sign_c = as_big_num(sign_c)?;
    let sign_d = as_big_num(sign_d)?;

    check_engine_preconditions(ctx, scratch, SIGN_WORKSPACES)?;
    let msg = msg.decode::<N>()?;
    let reg_key = reg_key.decode::<N>()?;
    let eph_key = eph_key.decode::<N>()?;
    let mut c = sign_c.decode::<N>()?;
    let mut d = sign_d.decode::<N>()?;

    nr::sign(&msg, &reg_key, &eph_key, &mut c, &mut d, ctx, scratch)?;
    Ok(SignResponse {
        sign_c: WireObject::from_big_num(&c),
        sign_d: WireObject::from_big_num(&d),
    })
}

/// Decodes a verify request and runs [`nr::verify`]
pub fn handle_verify<const N: usize>(
    req: &VerifyRequest,
    ctx: &CurveContext<N>,
    scratch: &mut ScratchBuffer<N>,
) -> NrResult<VerifyResponse> {
    let msg = present(&req.msg)?;
    let pub_key = present(&req.pub_key)?;
    let sign_c = present(&req.sign_c)?;
    let sign_d = present(&req.sign_d)?;

    let msg = as_big_num(msg)?;
    let pub_key = as_point(pub_key)?;
    let sign_c = as_big_num(sign_c)?;
    let sign_d = as_big_num(sign_d)?;

    check_engine_preconditions(ctx, scratch, VERIFY_WORKSPACES)?;
    let pub_key = pub_key.decode(ctx)?;
    let result = nr::verify(
        &msg.decode::<N>()?,
        &pub_key,
        &sign_c.decode::<N>()?,
        &sign_d.decode::<N>()?,
        ctx,
        scratch,
    )?;
    Ok(VerifyResponse { result })
}

/// JSON in, JSON out form of [`handle_sign`]
pub fn sign_json<const N: usize>(
    json: &str,
    ctx: &CurveContext<N>,
    scratch: &mut ScratchBuffer<N>,
) -> NrResult<String> {
    let req: SignRequest = serde_json::from_str(json)?;
    Ok(serde_json::to_string(&handle_sign(&req, ctx, scratch)?)?)
}

/// JSON in, JSON out form of [`handle_verify`]
pub fn verify_json<const N: usize>(
    json: &str,
    ctx: &CurveContext<N>,
    scratch: &mut ScratchBuffer<N>,
) -> NrResult<String> {
    let req: VerifyRequest = serde_json::from_str(json)?;
    Ok(serde_json::to_string(&handle_verify(&req, ctx, scratch)?)?)
}
