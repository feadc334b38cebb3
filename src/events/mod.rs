//! Simulation observations and the sinks that receive them
//!
//! - [`SimulationEvent`]: ordered, serialisable observation records
//! - [`ObservationSink`]: receiver trait implemented by [`EventLog`],
//!   [`TextSink`], [`JsonLinesSink`] and [`NullSink`]

pub mod observation;
pub mod sink;

pub use observation::*;
pub use sink::*;
