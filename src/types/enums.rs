//! Enumeration types for the supermarket simulation
//!
//! This module contains the engine lifecycle phase, the role a location plays
//! in the store, and the observation output formats.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle phase of a [`SimulationEngine`](crate::simulation::SimulationEngine)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SimulationPhase {
    /// Constructed but `start`/`run` has not been called yet
    NotStarted,
    /// Store is open and ticks are being processed
    Running,
    /// Closing bound reached, no further ticks occur
    Finished,
}

impl fmt::Display for SimulationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationPhase::NotStarted => write!(f, "Not Started"),
            SimulationPhase::Running => write!(f, "Running"),
            SimulationPhase::Finished => write!(f, "Finished"),
        }
    }
}

/// Role a location plays in the store layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationRole {
    /// Where new customers are admitted
    Entrance,
    /// Terminal location; customers here leave the store
    Checkout,
    /// Any other shopping section
    Section,
}

impl fmt::Display for LocationRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationRole::Entrance => write!(f, "entrance"),
            LocationRole::Checkout => write!(f, "checkout"),
            LocationRole::Section => write!(f, "section"),
        }
    }
}

/// Output formats for the observation stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable console lines
    Text,
    /// One JSON object per line
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "Text"),
            OutputFormat::Json => write!(f, "JSON"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" | "jsonl" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}
