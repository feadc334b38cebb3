//! Live customer population
//!
//! The population is an ordered collection of the customers currently in the
//! store. Removal never mutates the sequence it is iterating: reaping
//! partitions the live vector into removed customers and survivors, then swaps
//! the survivors in.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::customer::{Customer, CustomerSnapshot};
use crate::simulation::SimulationResult;
use crate::store::{Location, TransitionTable};
use crate::types::CustomerId;

/// One customer's move during a tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    /// Customer that moved
    pub customer: CustomerId,
    /// Display name of the customer
    pub name: String,
    /// Location before the transition
    pub from: Location,
    /// Location after the transition
    pub to: Location,
}

/// Customers currently in the store
#[derive(Debug, Clone, Default)]
pub struct Population {
    customers: Vec<Customer>,
}

impl Population {
    /// Create an empty population
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a customer
    pub fn add(&mut self, customer: Customer) {
        self.customers.push(customer);
    }

    /// Number of live customers
    pub fn size(&self) -> usize {
        self.customers.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    /// Iterate over live customers in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Customer> + '_ {
        self.customers.iter()
    }

    /// Look up a customer by identity
    pub fn get(&self, id: CustomerId) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    /// Whether a customer with this identity is live
    pub fn contains(&self, id: CustomerId) -> bool {
        self.get(id).is_some()
    }

    /// Customers currently at `location`
    pub fn at<'a>(&'a self, location: &'a str) -> impl Iterator<Item = &'a Customer> + 'a {
        self.customers.iter().filter(move |c| c.state().as_str() == location)
    }

    /// Snapshot of every live customer
    pub fn snapshot(&self) -> Vec<CustomerSnapshot> {
        self.customers.iter().map(Customer::snapshot).collect()
    }

    /// Number of customers per occupied location
    pub fn occupancy(&self) -> BTreeMap<Location, usize> {
        let mut counts = BTreeMap::new();
        for customer in &self.customers {
            *counts.entry(customer.state().clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Transition every live customer exactly once.
    ///
    /// Each draw depends only on that customer's own state, so the order of
    /// processing does not change the outcome distribution.
    pub fn transition_all<R: Rng + ?Sized>(
        &mut self,
        table: &TransitionTable,
        rng: &mut R,
    ) -> SimulationResult<Vec<Movement>> {
        let mut movements = Vec::with_capacity(self.customers.len());
        for customer in &mut self.customers {
            let from = customer.state().clone();
            let to = customer.transition(table, rng)?.clone();
            movements.push(Movement { customer: customer.id, name: customer.name.clone(), from, to });
        }
        Ok(movements)
    }

    /// Remove every customer at the checkout, returning them in their original order
    pub fn reap_terminal(&mut self) -> Vec<Customer> {
        let (removed, survivors): (Vec<Customer>, Vec<Customer>) =
            std::mem::take(&mut self.customers).into_iter().partition(Customer::is_terminal);
        self.customers = survivors;
        removed
    }
}

impl Extend<Customer> for Population {
    fn extend<I: IntoIterator<Item = Customer>>(&mut self, iter: I) {
        self.customers.extend(iter);
    }
}

impl FromIterator<Customer> for Population {
    fn from_iter<I: IntoIterator<Item = Customer>>(iter: I) -> Self {
        Self { customers: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SimulationConfig;
    use chrono::NaiveDateTime;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn opening() -> NaiveDateTime {
        SimulationConfig::default().opens_at
    }

    fn straight_to_checkout() -> TransitionTable {
        TransitionTable::builder("entrance", "checkout")
            .row("entrance", [("checkout", 1.0)])
            .row("checkout", [("checkout", 1.0)])
            .build()
            .unwrap()
    }

    fn mixed_table() -> TransitionTable {
        TransitionTable::builder("entrance", "checkout")
            .row("entrance", [("fruit", 0.5), ("checkout", 0.5)])
            .row("fruit", [("fruit", 0.7), ("checkout", 0.3)])
            .row("checkout", [("checkout", 1.0)])
            .build()
            .unwrap()
    }

    fn customers_at(table: &TransitionTable, locations: &[&str]) -> Population {
        locations
            .iter()
            .enumerate()
            .map(|(i, l)| Customer::at_location(format!("C{}", i), *l, table, opening()).unwrap())
            .collect()
    }

    #[test]
    fn test_add_and_size() {
        let table = straight_to_checkout();
        let mut population = Population::new();
        assert!(population.is_empty());

        population.add(Customer::new("Ada", &table, opening()));
        population.add(Customer::new("Ada", &table, opening()));
        assert_eq!(population.size(), 2);

        // Duplicate names are separate customers
        let ids: Vec<_> = population.iter().map(|c| c.id).collect();
        assert_ne!(ids[0], ids[1]);
        assert!(population.contains(ids[0]));
    }

    #[test]
    fn test_transition_all_moves_everyone_once() {
        let table = straight_to_checkout();
        let mut rng = StdRng::seed_from_u64(1);
        let mut population: Population =
            (0..5).map(|i| Customer::new(format!("C{}", i), &table, opening())).collect();

        let movements = population.transition_all(&table, &mut rng).unwrap();

        assert_eq!(movements.len(), 5);
        assert!(movements.iter().all(|m| m.from == "entrance" && m.to == "checkout"));
        assert!(population.iter().all(|c| c.moves() == 1 && c.is_terminal()));
    }

    #[test]
    fn test_reap_removes_adjacent_terminal_customers() {
        // Consecutive checkout customers are the case an in-place removal loop skips.
        let table = mixed_table();
        let mut population =
            customers_at(&table, &["checkout", "checkout", "fruit", "checkout", "checkout", "fruit"]);

        let removed = population.reap_terminal();

        assert_eq!(removed.len(), 4);
        assert_eq!(population.size(), 2);
        assert!(population.iter().all(|c| c.state() == "fruit"));
        let names: Vec<&str> = removed.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["C0", "C1", "C3", "C4"]);
    }

    #[test]
    fn test_reap_is_idempotent() {
        let table = mixed_table();
        let mut population = customers_at(&table, &["checkout", "fruit", "checkout"]);

        assert_eq!(population.reap_terminal().len(), 2);
        assert!(population.reap_terminal().is_empty());
        assert_eq!(population.size(), 1);
    }

    #[test]
    fn test_size_after_tick() {
        let table = mixed_table();
        let mut rng = StdRng::seed_from_u64(99);
        let mut population: Population =
            (0..200).map(|i| Customer::new(format!("C{}", i), &table, opening())).collect();

        let before = population.size();
        population.transition_all(&table, &mut rng).unwrap();
        let reaped = population.reap_terminal().len();
        let arrivals = 3;
        population.extend((0..arrivals).map(|_| Customer::new("New", &table, opening())));

        assert!(reaped > 0);
        assert_eq!(population.size(), before - reaped + arrivals);
    }

    #[test]
    fn test_at_and_occupancy() {
        let table = mixed_table();
        let population = customers_at(&table, &["fruit", "entrance", "fruit"]);

        assert_eq!(population.at("fruit").count(), 2);
        assert_eq!(population.at("checkout").count(), 0);

        let occupancy = population.occupancy();
        assert_eq!(occupancy.get("fruit"), Some(&2));
        assert_eq!(occupancy.get("entrance"), Some(&1));
        assert_eq!(occupancy.get("checkout"), None);
    }

    #[test]
    fn test_snapshot_preserves_order() {
        let table = mixed_table();
        let population = customers_at(&table, &["fruit", "entrance"]);
        let snapshot = population.snapshot();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].name, "C0");
        assert_eq!(snapshot[0].location, "fruit");
        assert_eq!(snapshot[1].location, "entrance");
    }
}
