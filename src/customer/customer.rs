//! Customer definition and state transitions
//!
//! A customer is the agent of the Markov process: an identity plus the
//! location it currently occupies.

use chrono::NaiveDateTime;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::simulation::{SimulationError, SimulationResult};
use crate::store::{Location, TransitionTable};
use crate::types::CustomerId;

/// A customer moving through the store
#[derive(Debug, Clone, Serialize)]
pub struct Customer {
    /// Object identity used for membership and removal
    pub id: CustomerId,
    /// Display name, not necessarily unique
    pub name: String,
    /// Instant the customer was admitted at the entrance
    pub entered_at: NaiveDateTime,
    state: Location,
    terminal: bool,
    moves: usize,
}

impl Customer {
    /// Create a customer standing at the table's entrance
    pub fn new(name: impl Into<String>, table: &TransitionTable, entered_at: NaiveDateTime) -> Self {
        Self {
            id: CustomerId::new(),
            name: name.into(),
            entered_at,
            state: table.entrance().clone(),
            terminal: false,
            moves: 0,
        }
    }

    /// Create a customer at an arbitrary location of the table
    pub fn at_location(
        name: impl Into<String>,
        location: impl Into<Location>,
        table: &TransitionTable,
        entered_at: NaiveDateTime,
    ) -> SimulationResult<Self> {
        let location = location.into();
        if !table.contains(location.as_str()) {
            return Err(SimulationError::UnknownState(location));
        }

        let terminal = location == *table.checkout();
        Ok(Self {
            id: CustomerId::new(),
            name: name.into(),
            entered_at,
            state: location,
            terminal,
            moves: 0,
        })
    }

    /// Replace the identity, keeping name and location
    pub fn with_id(mut self, id: CustomerId) -> Self {
        self.id = id;
        self
    }

    /// Current location
    pub fn state(&self) -> &Location {
        &self.state
    }

    /// Whether the customer has reached the checkout
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Number of draws taken so far; ticks spent at the checkout do not count
    pub fn moves(&self) -> usize {
        self.moves
    }

    /// Sample and store the next location, returning it.
    ///
    /// The checkout is absorbing: a customer already there stays without a
    /// draw being taken.
    pub fn transition<R: Rng + ?Sized>(
        &mut self,
        table: &TransitionTable,
        rng: &mut R,
    ) -> SimulationResult<&Location> {
        if !self.terminal {
            self.state = table.next(&self.state, rng)?;
            self.terminal = self.state == *table.checkout();
            self.moves += 1;
        }
        Ok(&self.state)
    }

    /// Point-in-time view for observation records
    pub fn snapshot(&self) -> CustomerSnapshot {
        CustomerSnapshot {
            id: self.id,
            name: self.name.clone(),
            location: self.state.clone(),
        }
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Customer {} is in the {} section", self.name, self.state)
    }
}

/// Identity and location of a customer at one instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSnapshot {
    /// Customer identity
    pub id: CustomerId,
    /// Display name
    pub name: String,
    /// Location at the time of the snapshot
    pub location: Location,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SimulationConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn table() -> TransitionTable {
        TransitionTable::builder("entrance", "checkout")
            .row("entrance", [("dairy", 1.0)])
            .row("dairy", [("dairy", 0.5), ("checkout", 0.5)])
            .row("checkout", [("entrance", 1.0)])
            .tolerance(1e-6)
            .build()
            .unwrap()
    }

    fn opening() -> NaiveDateTime {
        SimulationConfig::default().opens_at
    }

    #[test]
    fn test_new_customer_starts_at_entrance() {
        let table = table();
        let customer = Customer::new("Ada Lovelace", &table, opening());

        assert_eq!(customer.state(), "entrance");
        assert!(!customer.is_terminal());
        assert_eq!(customer.moves(), 0);
        assert_eq!(customer.to_string(), "Customer Ada Lovelace is in the entrance section");
    }

    #[test]
    fn test_transition_updates_state() {
        let table = table();
        let mut rng = StdRng::seed_from_u64(3);
        let mut customer = Customer::new("Ada", &table, opening());

        let next = customer.transition(&table, &mut rng).unwrap().clone();
        assert_eq!(next, "dairy");
        assert_eq!(customer.state(), "dairy");
        assert_eq!(customer.moves(), 1);
    }

    #[test]
    fn test_state_stays_within_table() {
        let table = table();
        let mut rng = StdRng::seed_from_u64(11);
        let mut customer = Customer::new("Ada", &table, opening());

        for _ in 0..50 {
            customer.transition(&table, &mut rng).unwrap();
            assert!(table.contains(customer.state().as_str()));
        }
    }

    #[test]
    fn test_checkout_is_absorbing_for_customer() {
        // The checkout row points back to the entrance, but a customer who
        // reached the checkout must never leave it.
        let table = table();
        let mut rng = StdRng::seed_from_u64(5);
        let mut customer = Customer::at_location("Ada", "checkout", &table, opening()).unwrap();

        assert!(customer.is_terminal());
        for _ in 0..10 {
            assert_eq!(customer.transition(&table, &mut rng).unwrap(), "checkout");
        }
        assert!(customer.is_terminal());
        assert_eq!(customer.moves(), 0);
    }

    #[test]
    fn test_moves_stop_at_checkout() {
        let table = TransitionTable::builder("entrance", "checkout")
            .row("entrance", [("checkout", 1.0)])
            .row("checkout", [("checkout", 1.0)])
            .build()
            .unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        let mut customer = Customer::new("Ada", &table, opening());

        customer.transition(&table, &mut rng).unwrap();
        customer.transition(&table, &mut rng).unwrap();

        assert_eq!(customer.state(), "checkout");
        assert_eq!(customer.moves(), 1);
    }

    #[test]
    fn test_with_id() {
        let table = table();
        let id = CustomerId::from_rng(&mut StdRng::seed_from_u64(9));
        let customer = Customer::new("Ada", &table, opening()).with_id(id);

        assert_eq!(customer.id, id);
        assert_eq!(customer.name, "Ada");
        assert_eq!(customer.state(), "entrance");
    }

    #[test]
    fn test_at_location_rejects_unknown_state() {
        let table = table();
        let result = Customer::at_location("Ada", "bakery", &table, opening());
        assert!(matches!(result, Err(SimulationError::UnknownState(_))));
    }

    #[test]
    fn test_snapshot() {
        let table = table();
        let customer = Customer::new("Grace", &table, opening());
        let snapshot = customer.snapshot();

        assert_eq!(snapshot.id, customer.id);
        assert_eq!(snapshot.name, "Grace");
        assert_eq!(snapshot.location, "entrance");
    }
}
