//! Caller-owned workspace for scalar multiplication
//!
//! Each multiplication needs one window table of [`TABLE_LEN`] points. Signing runs
//! one multiplication, verification runs two interleaved ones, so callers size the
//! buffer with [`ScratchBuffer::for_sign`] or [`ScratchBuffer::for_verify`].

use crate::elliptic_curve::{EcPoint, TABLE_LEN};

/// Workspaces needed by signing
pub const SIGN_WORKSPACES: usize = 1;

/// Workspaces needed by verification
pub const VERIFY_WORKSPACES: usize = 2;

/// Window tables for `mul_capacity()` scalar multiplications
#[derive(Clone, Debug)]
pub struct ScratchBuffer<const N: usize> {
    tables: Vec<EcPoint<N>>,
}

impl<const N: usize> ScratchBuffer<N> {
    /// Allocates room for `muls` concurrent scalar multiplications
    pub fn new(muls: usize) -> Self {
        Self {
            tables: vec![EcPoint::default(); Self::required_points(muls)],
        }
    }

    pub fn for_sign() -> Self {
        Self::new(SIGN_WORKSPACES)
    }

    pub fn for_verify() -> Self {
        Self::new(VERIFY_WORKSPACES)
    }

    /// Points a buffer for `muls` multiplications holds
    pub fn required_points(muls: usize) -> usize {
        muls * TABLE_LEN
    }

    /// Number of scalar multiplications this buffer can serve at once
    pub fn mul_capacity(&self) -> usize {
        self.tables.len() / TABLE_LEN
    }

    pub(crate) fn workspace(&mut self) -> &mut [EcPoint<N>] {
        &mut self.tables[..TABLE_LEN]
    }

    pub(crate) fn workspace_pair(&mut self) -> (&mut [EcPoint<N>], &mut [EcPoint<N>]) {
        let (first, rest) = self.tables.split_at_mut(TABLE_LEN);
        (first, &mut rest[..TABLE_LEN])
    }

    /// Overwrites the tables; they hold multiples of secret scalars' points
    pub(crate) fn wipe(&mut self) {
        self.tables.fill(EcPoint::default());
    }
}
