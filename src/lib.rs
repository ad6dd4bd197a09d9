//! NR Signatures over Elliptic Curves
//!
//! This library signs and verifies NR (Nyberg-Rueppel) signatures over elliptic
//! curves defined over prime fields, together with the arithmetic it is built on:
//! fixed-width integers, Montgomery multiplication, GF(p)/GF(p^k) fields and
//! Jacobian-coordinate curve groups.
//!
//! ```
//! use ecnr::bignum::BigNum;
//! use ecnr::context::CurveContext;
//! use ecnr::nr::{self, Signature, VerifyResult};
//! use ecnr::params::CurveParams;
//! use ecnr::scratch::ScratchBuffer;
//!
//! let ctx = CurveContext::<4>::from_params(&CurveParams::secp256k1()).unwrap();
//! let mut scratch = ScratchBuffer::for_verify();
//! let x = BigNum::from_u64(1);
//! let q = ctx.public_key(&x, &mut scratch).unwrap();
//!
//! let mut sig = Signature::for_context(&ctx);
//! let m = BigNum::from_u64(3);
//! nr::sign(&m, &x, &BigNum::from_u64(2), &mut sig.c, &mut sig.d, &ctx, &mut scratch).unwrap();
//! let result = nr::verify(&m, &q, &sig.c, &sig.d, &ctx, &mut scratch).unwrap();
//! assert_eq!(result, VerifyResult::Valid);
//! ```

/// Big integer arithmetic module for finite field implementation
pub mod bigint;
/// Length-tagged signed integers used at the call surface
pub mod bignum;
/// Curve context: field, curve, base point, order and scratch pool
pub mod context;
/// Elliptic curve groups over finite fields
pub mod elliptic_curve;
pub mod error;
/// Finite field implementations (F_p, F_p^k)
pub mod field;
/// SHA-2 message digests and message representatives
pub mod hash;
/// Arithmetic modulo the group order
pub mod mod_engine;
/// Montgomery modular arithmetic context
pub mod montgomery;
/// NR signature generation and verification
pub mod nr;
/// Curve parameter sets
pub mod params;
pub mod pool;
pub mod scratch;
/// Tagged JSON request/response boundary
pub mod wire;

pub use error::{NrError, NrResult};
pub use nr::{sign, verify, VerifyResult};
