//! Core types and identifiers for the supermarket simulation
//!
//! This module contains fundamental types, identifiers, and configuration structures
//! used throughout the simulation system.
//!
//! # Overview
//!
//! - **Identifiers**: UUID-based customer identity, independent of display names
//! - **Enums**: Engine phase, location roles, and output formats
//! - **Configuration**: Simulation configuration with validation and CLI support
//!
//! # Usage Example
//!
//! ```rust
//! use supermarket_markov_sim::types::*;
//!
//! let id = CustomerId::new();
//! assert!(id.to_string().starts_with("CUST_"));
//!
//! let config = SimulationConfig {
//!     initial_customers: 10,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

pub mod config;
pub mod enums;
pub mod identifiers;

// Re-export all public types for convenience
pub use config::*;
pub use enums::*;
pub use identifiers::*;
