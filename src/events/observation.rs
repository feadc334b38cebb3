//! Observation records emitted by the simulation engine
//!
//! Each tick produces an ordered stream of [`SimulationEvent`]s: the moves of
//! every live customer, the customers removed at the checkout, the arrivals,
//! and the customers standing at the entrance ready to shop.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::customer::CustomerSnapshot;
use crate::store::Location;
use crate::types::CustomerId;

/// A single observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimulationEvent {
    /// The store opened; `customers` are waiting at the entrance
    Opened {
        /// Opening instant
        time: NaiveDateTime,
        /// Size of the initial population
        customers: usize,
    },
    /// Position of an initial customer before the first tick
    InitialPosition {
        /// Opening instant
        time: NaiveDateTime,
        /// The customer
        customer: CustomerSnapshot,
    },
    /// The clock advanced and a tick begins
    TickStarted {
        /// Tick number, 1-based
        tick: u64,
        /// Clock value after advancing
        time: NaiveDateTime,
    },
    /// A customer transitioned
    Moved {
        /// Clock value of the tick
        time: NaiveDateTime,
        /// Customer identity
        customer: CustomerId,
        /// Display name
        name: String,
        /// Location before the move
        from: Location,
        /// Location after the move
        to: Location,
    },
    /// A customer at the checkout left the store
    Departed {
        /// Clock value of the tick
        time: NaiveDateTime,
        /// The customer, at the checkout
        customer: CustomerSnapshot,
    },
    /// A new customer was admitted at the entrance
    Arrived {
        /// Clock value of the tick
        time: NaiveDateTime,
        /// The new customer
        customer: CustomerSnapshot,
    },
    /// A customer stands at the entrance ready to shop
    ReadyToShop {
        /// Clock value of the tick
        time: NaiveDateTime,
        /// The customer
        customer: CustomerSnapshot,
    },
    /// The store emptied after reaping; the run continues
    PopulationExhausted {
        /// Tick number
        tick: u64,
        /// Clock value of the tick
        time: NaiveDateTime,
    },
    /// The closing bound was reached
    Closed {
        /// Final clock value
        time: NaiveDateTime,
        /// Ticks processed, including the opening tick
        ticks: u64,
        /// Customers still inside
        remaining: usize,
    },
}

impl SimulationEvent {
    /// Clock value the event belongs to
    pub fn time(&self) -> NaiveDateTime {
        match self {
            SimulationEvent::Opened { time, .. }
            | SimulationEvent::InitialPosition { time, .. }
            | SimulationEvent::TickStarted { time, .. }
            | SimulationEvent::Moved { time, .. }
            | SimulationEvent::Departed { time, .. }
            | SimulationEvent::Arrived { time, .. }
            | SimulationEvent::ReadyToShop { time, .. }
            | SimulationEvent::PopulationExhausted { time, .. }
            | SimulationEvent::Closed { time, .. } => *time,
        }
    }

    /// Short name of the event kind, matching the serialized tag
    pub fn kind(&self) -> &'static str {
        match self {
            SimulationEvent::Opened { .. } => "opened",
            SimulationEvent::InitialPosition { .. } => "initial_position",
            SimulationEvent::TickStarted { .. } => "tick_started",
            SimulationEvent::Moved { .. } => "moved",
            SimulationEvent::Departed { .. } => "departed",
            SimulationEvent::Arrived { .. } => "arrived",
            SimulationEvent::ReadyToShop { .. } => "ready_to_shop",
            SimulationEvent::PopulationExhausted { .. } => "population_exhausted",
            SimulationEvent::Closed { .. } => "closed",
        }
    }

    /// Customer the event is about, if any
    pub fn customer_id(&self) -> Option<CustomerId> {
        match self {
            SimulationEvent::Moved { customer, .. } => Some(*customer),
            SimulationEvent::InitialPosition { customer, .. }
            | SimulationEvent::Departed { customer, .. }
            | SimulationEvent::Arrived { customer, .. }
            | SimulationEvent::ReadyToShop { customer, .. } => Some(customer.id),
            _ => None,
        }
    }
}
