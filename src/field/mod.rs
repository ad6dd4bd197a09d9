//! Finite field implementations
//!
//! This module provides the coordinate field of a curve, chosen at runtime:
//! - GF(p): prime fields, p odd
//! - GF(p^k): extension fields for 2 <= k <= 4, defined by a monic irreducible
//!   polynomial of degree k
//!
//! Both live behind one type, [`GfpField`], so a curve context can describe
//! either. Elements ([`GfElement`]) are kept in Montgomery form; `encode` and
//! `decode` convert from and to canonical integers.

pub mod element;
pub mod gfp;

pub use element::GfElement;
pub use gfp::GfpField;

/// Largest supported extension degree
pub const MAX_EXTENSION_DEGREE: usize = 4;
