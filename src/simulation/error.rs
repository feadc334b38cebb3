//! Error types and handling
//!
//! Every error in the simulation is fatal. A malformed table or an
//! out-of-domain state is a configuration problem, never a transient one, so
//! nothing here is retried and one bad customer aborts the whole run.

use chrono::{Duration, NaiveDateTime};

use crate::store::Location;
use crate::types::{ConfigValidationError, SimulationPhase};
use thiserror::Error;

/// Errors that can occur while building or running a simulation
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ConfigurationError(String),

    /// Transition table is malformed
    #[error("Invalid transition table: {0}")]
    InvalidTable(String),

    /// A designated location is not a row of the table
    #[error("Transition table has no {role} location '{label}'")]
    MissingLocation {
        /// Role the location was designated for
        role: &'static str,
        /// Label that was looked up
        label: String,
    },

    /// A customer is in a state the table does not know
    #[error("Unknown state: '{0}' is not a row of the transition table")]
    UnknownState(Location),

    /// Engine operation called in the wrong lifecycle phase
    #[error("Engine is {actual}, expected {expected}")]
    InvalidPhase {
        /// Phase the operation requires
        expected: SimulationPhase,
        /// Phase the engine was in
        actual: SimulationPhase,
    },

    /// Tick requested after the clock left the opening window
    #[error("Store is closed at {time}, no further ticks are taken")]
    StoreClosed {
        /// Clock value when the tick was requested
        time: NaiveDateTime,
    },

    /// Advancing the clock would leave the representable date range
    #[error("Clock cannot advance from {time} by {step}")]
    ClockOverflow {
        /// Clock value before the step
        time: NaiveDateTime,
        /// Configured step
        step: Duration,
    },

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl From<ConfigValidationError> for SimulationError {
    fn from(error: ConfigValidationError) -> Self {
        SimulationError::ConfigurationError(error.to_string())
    }
}

impl SimulationError {
    /// Create a configuration error
    pub fn configuration_error(msg: impl Into<String>) -> Self {
        Self::ConfigurationError(msg.into())
    }

    /// Create an invalid table error
    pub fn invalid_table(msg: impl Into<String>) -> Self {
        Self::InvalidTable(msg.into())
    }

    /// Whether the error was raised while setting up, before any tick ran
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            SimulationError::ConfigurationError(_)
                | SimulationError::InvalidTable(_)
                | SimulationError::MissingLocation { .. }
                | SimulationError::CsvError(_)
        )
    }

    /// Get the error category
    pub fn category(&self) -> &'static str {
        match self {
            SimulationError::ConfigurationError(_) => "Configuration",
            SimulationError::InvalidTable(_) => "Transition Table",
            SimulationError::MissingLocation { .. } => "Transition Table",
            SimulationError::UnknownState(_) => "Unknown State",
            SimulationError::InvalidPhase { .. } => "Lifecycle",
            SimulationError::StoreClosed { .. } => "Lifecycle",
            SimulationError::ClockOverflow { .. } => "Clock",
            SimulationError::IoError(_) => "IO",
            SimulationError::CsvError(_) => "CSV",
            SimulationError::SerializationError(_) => "Serialization",
        }
    }
}

/// Result type for simulation operations
pub type SimulationResult<T> = Result<T, SimulationError>;
