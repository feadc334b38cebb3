//! Simulation control
//!
//! # Overview
//!
//! - **SimulationEngine**: drives the day through its Not Started, Running
//!   and Finished phases
//! - **Clock**: fixed-step time bounded by exclusive opening and closing instants
//! - **ArrivalPolicy**: number of customers admitted per tick
//! - **SimulationStatistics**: counters collected during the run
//! - **SimulationError**: fatal error taxonomy shared by the whole crate
//! - **LoggingConfig**: tracing subscriber setup
//!
//! # Usage Example
//!
//! ```rust
//! use std::sync::Arc;
//! use supermarket_markov_sim::events::EventLog;
//! use supermarket_markov_sim::simulation::*;
//! use supermarket_markov_sim::store::TransitionTable;
//! use supermarket_markov_sim::types::*;
//!
//! let table = TransitionTable::builder("entrance", "checkout")
//!     .row("entrance", [("dairy", 0.5), ("checkout", 0.5)])
//!     .row("dairy", [("dairy", 0.3), ("checkout", 0.7)])
//!     .row("checkout", [("checkout", 1.0)])
//!     .build()?;
//!
//! let config = SimulationConfig {
//!     initial_customers: 10,
//!     seed: Some(42),
//!     ..Default::default()
//! };
//!
//! let mut engine = SimulationEngine::new(&config, Arc::new(table))?;
//! let mut log = EventLog::new();
//! let stats = engine.run(&mut log)?;
//!
//! assert_eq!(engine.phase(), SimulationPhase::Finished);
//! assert!(stats.is_balanced());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod arrivals;
pub mod clock;
pub mod engine;
pub mod error;
pub mod logging;
pub mod statistics;

// Re-export all public types for convenience
pub use arrivals::*;
pub use clock::*;
pub use engine::*;
pub use error::*;
pub use logging::*;
pub use statistics::*;
