//! Context-owned scratch pool
//!
//! A [`CurveContext`](crate::context::CurveContext) lends out field-element and
//! point slots for the duration of one call. Slots are taken from the top of two
//! stacks and handed out as guards; dropping a guard pops its slots again, so every
//! exit path of a call (including `?` and early returns) rebalances the pool.
//!
//! The slots are `Cell`s, which makes the pool (and any context owning it) `!Sync`.

use crate::bigint::BigInt;
use crate::elliptic_curve::EcPoint;
use crate::error::{NrError, NrResult};
use std::cell::Cell;

/// Element slots per context
pub const ELEMENT_SLOTS: usize = 8;

/// Point slots per context
pub const POINT_SLOTS: usize = 4;

/// Live slot counts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolUsage {
    pub elements: usize,
    pub points: usize,
}

impl PoolUsage {
    pub fn is_balanced(&self) -> bool {
        self.elements == 0 && self.points == 0
    }
}

#[derive(Debug)]
pub struct ScratchPool<const N: usize> {
    elements: Box<[Cell<BigInt<N>>]>,
    points: Box<[Cell<EcPoint<N>>]>,
    element_top: Cell<usize>,
    point_top: Cell<usize>,
}

impl<const N: usize> ScratchPool<N> {
    pub fn new() -> Self {
        Self::with_capacity(ELEMENT_SLOTS, POINT_SLOTS)
    }

    pub fn with_capacity(elements: usize, points: usize) -> Self {
        Self {
            elements: (0..elements).map(|_| Cell::new(BigInt::zero())).collect(),
            points: (0..points).map(|_| Cell::new(EcPoint::default())).collect(),
            element_top: Cell::new(0),
            point_top: Cell::new(0),
        }
    }

    /// Reserves `count` element slots
    pub fn acquire_elements(&self, count: usize) -> NrResult<ElementSlots<'_, N>> {
        let start = self.element_top.get();
        if start + count > self.elements.len() {
            return Err(NrError::PoolExhausted);
        }
        self.element_top.set(start + count);
        log::trace!("pool: +{} elements ({} live)", count, start + count);
        Ok(ElementSlots {
            pool: self,
            start,
            count,
        })
    }

    /// Reserves `count` point slots
    pub fn acquire_points(&self, count: usize) -> NrResult<PointSlots<'_, N>> {
        let start = self.point_top.get();
        if start + count > self.points.len() {
            return Err(NrError::PoolExhausted);
        }
        self.point_top.set(start + count);
        log::trace!("pool: +{} points ({} live)", count, start + count);
        Ok(PointSlots {
            pool: self,
            start,
            count,
        })
    }

    pub fn usage(&self) -> PoolUsage {
        PoolUsage {
            elements: self.element_top.get(),
            points: self.point_top.get(),
        }
    }
}

impl<const N: usize> Default for ScratchPool<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Borrowed element slots, released (and cleared) on drop
#[derive(Debug)]
pub struct ElementSlots<'a, const N: usize> {
    pool: &'a ScratchPool<N>,
    start: usize,
    count: usize,
}

impl<const N: usize> ElementSlots<'_, N> {
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn get(&self, idx: usize) -> BigInt<N> {
        assert!(idx < self.count, "element slot {} out of {}", idx, self.count);
        self.pool.elements[self.start + idx].get()
    }

    pub fn set(&self, idx: usize, value: BigInt<N>) {
        assert!(idx < self.count, "element slot {} out of {}", idx, self.count);
        self.pool.elements[self.start + idx].set(value);
    }
}

impl<const N: usize> Drop for ElementSlots<'_, N> {
    fn drop(&mut self) {
        debug_assert_eq!(
            self.pool.element_top.get(),
            self.start + self.count,
            "element slots released out of order"
        );
        for slot in &self.pool.elements[self.start..self.start + self.count] {
            slot.set(BigInt::zero());
        }
        self.pool.element_top.set(self.start);
    }
}

/// Borrowed point slots, released (and cleared) on drop
#[derive(Debug)]
pub struct PointSlots<'a, const N: usize> {
    pool: &'a ScratchPool<N>,
    start: usize,
    count: usize,
}

impl<const N: usize> PointSlots<'_, N> {
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn get(&self, idx: usize) -> EcPoint<N> {
        assert!(idx < self.count, "point slot {} out of {}", idx, self.count);
        self.pool.points[self.start + idx].get()
    }

    pub fn set(&self, idx: usize, value: EcPoint<N>) {
        assert!(idx < self.count, "point slot {} out of {}", idx, self.count);
        self.pool.points[self.start + idx].set(value);
    }
}

impl<const N: usize> Drop for PointSlots<'_, N> {
    fn drop(&mut self) {
        debug_assert_eq!(
            self.pool.point_top.get(),
            self.start + self.count,
            "point slots released out of order"
        );
        for slot in &self.pool.points[self.start..self.start + self.count] {
            slot.set(EcPoint::default());
        }
        self.pool.point_top.set(self.start);
    }
}
