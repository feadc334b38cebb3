//! Simulated wall clock
//!
//! The clock advances in fixed steps between an opening and a closing
//! instant. Both bounds are exclusive: a clock sitting exactly on the opening
//! or the closing instant is outside the active window.

use chrono::{Duration, NaiveDateTime};
use tracing::{debug, instrument};

use crate::simulation::{SimulationError, SimulationResult};
use crate::types::SimulationConfig;

/// Fixed-step clock bounded by opening and closing instants
#[derive(Debug, Clone, PartialEq)]
pub struct Clock {
    current: NaiveDateTime,
    opens_at: NaiveDateTime,
    closes_at: NaiveDateTime,
    step: Duration,
}

impl Clock {
    /// Create a clock positioned at the opening instant
    pub fn new(
        opens_at: NaiveDateTime,
        closes_at: NaiveDateTime,
        step: Duration,
    ) -> SimulationResult<Self> {
        if closes_at <= opens_at {
            return Err(SimulationError::configuration_error(format!(
                "closing time {} is not after opening time {}",
                closes_at, opens_at
            )));
        }
        if step <= Duration::zero() {
            return Err(SimulationError::configuration_error(format!(
                "clock step must be positive, got {}",
                step
            )));
        }
        if opens_at.checked_add_signed(step).is_none() {
            return Err(SimulationError::configuration_error(format!(
                "clock step {} does not fit after {}",
                step, opens_at
            )));
        }

        Ok(Self { current: opens_at, opens_at, closes_at, step })
    }

    /// Create a clock from the configured window and step
    pub fn from_config(config: &SimulationConfig) -> SimulationResult<Self> {
        let step = config.step().ok_or_else(|| {
            SimulationError::configuration_error(format!(
                "step of {} minutes is out of range",
                config.step_minutes
            ))
        })?;
        Self::new(config.opens_at, config.closes_at, step)
    }

    /// Move forward by one step and return the new time
    #[instrument(level = "trace", skip(self))]
    pub fn advance(&mut self) -> SimulationResult<NaiveDateTime> {
        self.current = self
            .current
            .checked_add_signed(self.step)
            .ok_or(SimulationError::ClockOverflow { time: self.current, step: self.step })?;
        debug!("Clock advanced to {}", self.current);
        Ok(self.current)
    }

    /// Whether `opens_at < current < closes_at`
    pub fn is_open(&self) -> bool {
        self.opens_at < self.current && self.current < self.closes_at
    }

    /// Rewind to the opening instant
    pub fn reset_to_open(&mut self) {
        self.current = self.opens_at;
    }

    /// Current simulated time
    pub fn current(&self) -> NaiveDateTime {
        self.current
    }

    /// Opening instant
    pub fn opens_at(&self) -> NaiveDateTime {
        self.opens_at
    }

    /// Closing instant
    pub fn closes_at(&self) -> NaiveDateTime {
        self.closes_at
    }

    /// Step size
    pub fn step(&self) -> Duration {
        self.step
    }

    /// Whole steps between the opening instant and now
    pub fn ticks_elapsed(&self) -> i64 {
        let elapsed = (self.current - self.opens_at).num_seconds();
        elapsed / self.step.num_seconds().max(1)
    }
}
