//! Store layout: locations and the transition table between them
//!
//! # Overview
//!
//! - **Location**: label of one section of the store
//! - **TransitionTable**: validated, immutable per-location distribution over next locations
//! - **Loader**: reads a table from a CSV file with a key column naming the source location
//!
//! # Usage Example
//!
//! ```rust
//! use supermarket_markov_sim::store::*;
//! use rand::SeedableRng;
//!
//! let table = TransitionTable::builder("entrance", "checkout")
//!     .row("entrance", [("fruit", 1.0)])
//!     .row("fruit", [("fruit", 0.5), ("checkout", 0.5)])
//!     .row("checkout", [("checkout", 1.0)])
//!     .build()?;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//! let next = table.next(table.entrance(), &mut rng)?;
//! assert_eq!(next, "fruit");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod loader;
pub mod location;
pub mod transition;

pub use loader::*;
pub use location::*;
pub use transition::*;
