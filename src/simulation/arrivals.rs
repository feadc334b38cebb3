//! Arrival policies
//!
//! An arrival policy decides how many new customers enter at the entrance on
//! each tick.

use rand::{Rng, RngCore};
use std::fmt;

/// Rule producing the number of customers admitted per tick
pub trait ArrivalPolicy: fmt::Debug {
    /// Draw the arrival count for one tick
    fn sample_arrivals(&mut self, rng: &mut dyn RngCore) -> usize;
}

/// Uniform draw in `[0, max_exclusive)`
///
/// The default bound of 2 admits zero or one customer per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformArrivals {
    max_exclusive: usize,
}

impl UniformArrivals {
    /// Create a policy drawing from `[0, max_exclusive)`.
    ///
    /// A bound of zero is treated as one, i.e. no arrivals.
    pub fn new(max_exclusive: usize) -> Self {
        Self { max_exclusive: max_exclusive.max(1) }
    }

    /// Exclusive upper bound of the draw
    pub fn max_exclusive(&self) -> usize {
        self.max_exclusive
    }
}

impl Default for UniformArrivals {
    fn default() -> Self {
        Self::new(crate::types::defaults::MAX_ARRIVALS)
    }
}

impl ArrivalPolicy for UniformArrivals {
    fn sample_arrivals(&mut self, rng: &mut dyn RngCore) -> usize {
        rng.gen_range(0..self.max_exclusive)
    }
}

/// Constant number of arrivals per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixedArrivals(pub usize);

impl ArrivalPolicy for FixedArrivals {
    fn sample_arrivals(&mut self, _rng: &mut dyn RngCore) -> usize {
        self.0
    }
}
