//! Tests for customers and the live population

use chrono::NaiveDateTime;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use supermarket_markov_sim::{
    Customer, Population, SimulationConfig, SimulationError, TableLayout, TransitionTable,
};

fn opens_at() -> NaiveDateTime {
    SimulationConfig::default().opens_at
}

fn bundled_table() -> TransitionTable {
    let path = format!("{}/data/transition_probabilities.csv", env!("CARGO_MANIFEST_DIR"));
    TransitionTable::from_csv_path(path, &TableLayout::default()).unwrap()
}

fn all_to_checkout() -> TransitionTable {
    TransitionTable::builder("entrance", "checkout")
        .row("entrance", [("checkout", 1.0)])
        .row("checkout", [("checkout", 1.0)])
        .build()
        .unwrap()
}

/// Customers only ever occupy locations of the table
#[test]
fn test_states_stay_in_location_set() {
    let table = bundled_table();
    let mut rng = StdRng::seed_from_u64(99);
    let mut population: Population =
        (0..50).map(|i| Customer::new(format!("Customer {}", i), &table, opens_at())).collect();

    for _ in 0..200 {
        for movement in population.transition_all(&table, &mut rng).unwrap() {
            assert!(table.contains(movement.from.as_str()));
            assert!(table.contains(movement.to.as_str()));
        }
        population.reap_terminal();
        assert!(population.iter().all(|c| table.contains(c.state().as_str())));
    }
}

/// Size after a tick is previous size minus reaped plus admitted
#[test]
fn test_size_law_over_many_ticks() {
    let table = bundled_table();
    let mut rng = StdRng::seed_from_u64(5);
    let mut population = Population::new();
    for i in 0..20 {
        population.add(Customer::new(format!("Customer {}", i), &table, opens_at()));
    }

    for _ in 0..300 {
        let before = population.size();
        population.transition_all(&table, &mut rng).unwrap();
        let reaped = population.reap_terminal().len();
        let admitted = rng.gen_range(0..3);
        for _ in 0..admitted {
            population.add(Customer::new("Newcomer", &table, opens_at()));
        }
        assert_eq!(population.size(), before - reaped + admitted);
    }
}

/// A customer is still present on the tick it reaches the checkout
#[test]
fn test_terminal_customer_observed_before_removal() {
    let table = all_to_checkout();
    let mut rng = StdRng::seed_from_u64(1);
    let mut population = Population::new();
    population.add(Customer::new("Ada", &table, opens_at()));

    let movements = population.transition_all(&table, &mut rng).unwrap();
    assert_eq!(movements[0].to, "checkout");
    assert_eq!(population.size(), 1);
    assert_eq!(population.at("checkout").count(), 1);

    let reaped = population.reap_terminal();
    assert_eq!(reaped.len(), 1);
    assert_eq!(reaped[0].name, "Ada");
    assert!(population.reap_terminal().is_empty());
}

/// Adjacent terminal customers are all reaped in one pass
#[test]
fn test_adjacent_terminal_customers_all_reaped() {
    let table = bundled_table();
    let mut population = Population::new();
    for location in ["checkout", "checkout", "dairy", "checkout", "checkout", "fruit", "checkout"] {
        population.add(Customer::at_location(location, location, &table, opens_at()).unwrap());
    }

    let reaped = population.reap_terminal();
    assert_eq!(reaped.len(), 5);
    let survivors: Vec<&str> = population.iter().map(|c| c.state().as_str()).collect();
    assert_eq!(survivors, vec!["dairy", "fruit"]);
}

/// Duplicate names are distinct customers
#[test]
fn test_duplicate_names_keep_identity() {
    let table = all_to_checkout();
    let first = Customer::new("Sam", &table, opens_at());
    let second = Customer::new("Sam", &table, opens_at());
    let (first_id, second_id) = (first.id, second.id);

    let population: Population = vec![first, second].into_iter().collect();

    assert_ne!(first_id, second_id);
    assert!(population.contains(first_id));
    assert!(population.contains(second_id));
    assert_eq!(population.size(), 2);
}

/// Customers cannot be placed outside the table
#[test]
fn test_customer_outside_table_rejected() {
    let table = all_to_checkout();
    let result = Customer::at_location("Ada", "bakery", &table, opens_at());
    assert!(matches!(result, Err(SimulationError::UnknownState(_))));
}

/// The checkout is absorbing for a customer that is never reaped
#[test]
fn test_checkout_is_absorbing() {
    let table = bundled_table();
    let mut rng = StdRng::seed_from_u64(8);
    let mut customer = Customer::at_location("Ada", "checkout", &table, opens_at()).unwrap();

    for _ in 0..10 {
        assert_eq!(customer.transition(&table, &mut rng).unwrap(), "checkout");
    }
    assert!(customer.is_terminal());
    assert_eq!(customer.moves(), 0, "no draws are taken at the checkout");
}
