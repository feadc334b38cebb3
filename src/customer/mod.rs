//! Customer modeling and population management
//!
//! # Overview
//!
//! - **Customer**: identity plus current location; moves once per tick
//! - **Population**: ordered set of live customers with transition and reaping
//! - **NameGenerator**: pluggable source of display names for arrivals
//!
//! # Usage Example
//!
//! ```rust
//! use supermarket_markov_sim::customer::*;
//! use supermarket_markov_sim::store::TransitionTable;
//! use supermarket_markov_sim::types::SimulationConfig;
//! use rand::SeedableRng;
//!
//! let table = TransitionTable::builder("entrance", "checkout")
//!     .row("entrance", [("checkout", 1.0)])
//!     .row("checkout", [("checkout", 1.0)])
//!     .build()?;
//! let opens_at = SimulationConfig::default().opens_at;
//!
//! let mut population = Population::new();
//! population.add(Customer::new("Ada", &table, opens_at));
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! population.transition_all(&table, &mut rng)?;
//! assert_eq!(population.reap_terminal().len(), 1);
//! assert!(population.is_empty());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod customer;
pub mod names;
pub mod population;

// Re-export all public types for convenience
pub use customer::*;
pub use names::*;
pub use population::*;
