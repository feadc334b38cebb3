//! Supermarket Markov Simulation
//!
//! A discrete-time Markov simulation of customers moving between the sections
//! of a supermarket over one opening day.
//!
//! # Overview
//!
//! Every minute each customer in the store draws its next section from a
//! fixed transition table. Customers who reached the checkout on the previous
//! tick leave, a few new customers arrive at the entrance, and the clock moves
//! on until closing.
//!
//! ## Key Features
//!
//! - **Validated Transition Tables**: loaded from CSV, rows checked and normalised
//! - **Explicit Lifecycle**: Not Started, Running and Finished engine phases
//! - **Injectable Randomness**: seeded runs are fully reproducible
//! - **Structured Observations**: every tick reported as typed events to a sink
//! - **Configurable Day**: opening window, step, arrivals and labels
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use supermarket_markov_sim::*;
//!
//! let table = TransitionTable::builder("entrance", "checkout")
//!     .row("entrance", [("fruit", 0.6), ("checkout", 0.4)])
//!     .row("fruit", [("fruit", 0.2), ("checkout", 0.8)])
//!     .row("checkout", [("checkout", 1.0)])
//!     .build()?;
//!
//! let config = SimulationConfig { seed: Some(1), ..Default::default() };
//! let mut engine = SimulationEngine::new(&config, Arc::new(table))?;
//! let stats = engine.run(&mut NullSink)?;
//! println!("{} customers left through the checkout", stats.departures);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`types`]: Identifiers, enums and configuration
//! - [`store`]: Locations and the transition table
//! - [`customer`]: Customers, the live population and name generation
//! - [`events`]: Observation records and sinks
//! - [`simulation`]: Engine, clock, arrivals, statistics and errors
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │   Types     │    │   Store     │    │  Customer   │
//! │             │    │             │    │             │
//! │ Identifiers │◄───┤ Location    │◄───┤ Customer    │
//! │ Enums       │    │ Transition  │    │ Population  │
//! │ Config      │    │ Loader      │    │ Names       │
//! └─────────────┘    └─────────────┘    └─────────────┘
//!                           ▲                   ▲
//!                           │                   │
//!                    ┌─────────────┐    ┌─────────────┐
//!                    │   Events    │    │ Simulation  │
//!                    │             │◄───┤             │
//!                    │ Observation │    │ Engine      │
//!                    │ Sinks       │    │ Clock       │
//!                    └─────────────┘    └─────────────┘
//! ```
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

// Module declarations
pub mod customer;
pub mod events;
pub mod simulation;
pub mod store;
pub mod types;

// Core types and identifiers
pub use types::{
    ConfigValidationError, CustomerId, LocationRole, OutputFormat, SimulationConfig,
    SimulationPhase,
};

// Store layout
pub use store::{Location, TableLayout, TransitionRow, TransitionTable, TransitionTableBuilder};

// Customers
pub use customer::{
    Customer, CustomerSnapshot, Movement, NameGenerator, Population, RandomNameGenerator,
    SequentialNameGenerator,
};

// Observations
pub use events::{EventLog, JsonLinesSink, NullSink, ObservationSink, SimulationEvent, TextSink};

// Simulation types and functionality
pub use simulation::{
    ArrivalPolicy, Clock, FixedArrivals, LoggingConfig, SimulationEngine, SimulationError,
    SimulationResult, SimulationStatistics, TickReport, UniformArrivals,
};
