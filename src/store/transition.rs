//! Stochastic transition table
//!
//! The table maps every source location to a probability distribution over
//! destination locations. It is validated once at construction and is
//! read-only afterwards, so a single instance can be shared by every customer
//! and by any number of independent runs.

use std::collections::{BTreeMap, BTreeSet};

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use tracing::{debug, warn};

use crate::simulation::{SimulationError, SimulationResult};
use crate::store::Location;
use crate::types::LocationRole;

/// Outgoing distribution of a single source location
#[derive(Debug, Clone)]
pub struct TransitionRow {
    destinations: Vec<Location>,
    probabilities: Vec<f64>,
    sampler: WeightedIndex<f64>,
}

impl TransitionRow {
    /// Destination labels, in column order
    pub fn destinations(&self) -> &[Location] {
        &self.destinations
    }

    /// Normalised probabilities, parallel to [`destinations`](Self::destinations)
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Iterate over `(destination, probability)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&Location, f64)> + '_ {
        self.destinations.iter().zip(self.probabilities.iter().copied())
    }

    /// Probability of moving to `to`, zero when `to` is not a column
    pub fn probability(&self, to: &str) -> f64 {
        self.iter().find(|(dest, _)| dest.as_str() == to).map(|(_, p)| p).unwrap_or(0.0)
    }

    /// Sum of the stored probabilities
    pub fn total(&self) -> f64 {
        self.probabilities.iter().sum()
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> &Location {
        &self.destinations[self.sampler.sample(rng)]
    }
}

/// Immutable stochastic matrix over the store's locations
#[derive(Debug, Clone)]
pub struct TransitionTable {
    rows: BTreeMap<Location, TransitionRow>,
    entrance: Location,
    checkout: Location,
}

impl TransitionTable {
    /// Start building a table with the given entrance and checkout labels
    pub fn builder(
        entrance: impl Into<Location>,
        checkout: impl Into<Location>,
    ) -> TransitionTableBuilder {
        TransitionTableBuilder::new(entrance, checkout)
    }

    /// Sample the next location of a customer currently at `location`
    pub fn next<R: Rng + ?Sized>(
        &self,
        location: &Location,
        rng: &mut R,
    ) -> SimulationResult<Location> {
        let row = self
            .rows
            .get(location)
            .ok_or_else(|| SimulationError::UnknownState(location.clone()))?;
        Ok(row.sample(rng).clone())
    }

    /// Outgoing row of `from`
    pub fn row(&self, from: &str) -> Option<&TransitionRow> {
        self.rows.get(from)
    }

    /// Probability of moving from `from` to `to`
    pub fn probability(&self, from: &str, to: &str) -> Option<f64> {
        self.row(from).map(|row| row.probability(to))
    }

    /// All locations, in label order
    pub fn locations(&self) -> impl Iterator<Item = &Location> + '_ {
        self.rows.keys()
    }

    /// Whether `location` is a member of the table's state set
    pub fn contains(&self, location: &str) -> bool {
        self.rows.contains_key(location)
    }

    /// Number of locations
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no locations; never true for a built table
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Designated arrival location
    pub fn entrance(&self) -> &Location {
        &self.entrance
    }

    /// Designated terminal location
    pub fn checkout(&self) -> &Location {
        &self.checkout
    }

    /// Role of `location`, `None` if it is not in the table
    pub fn role_of(&self, location: &str) -> Option<LocationRole> {
        if !self.contains(location) {
            None
        } else if self.entrance == location {
            Some(LocationRole::Entrance)
        } else if self.checkout == location {
            Some(LocationRole::Checkout)
        } else {
            Some(LocationRole::Section)
        }
    }
}

/// Builder collecting raw rows before validation
#[derive(Debug, Clone)]
pub struct TransitionTableBuilder {
    entrance: Location,
    checkout: Location,
    tolerance: f64,
    rows: Vec<(Location, Vec<(Location, f64)>)>,
}

impl TransitionTableBuilder {
    /// Default allowed deviation of a row sum from 1.0
    pub const DEFAULT_TOLERANCE: f64 = crate::types::defaults::TABLE_TOLERANCE;

    /// Create an empty builder
    pub fn new(entrance: impl Into<Location>, checkout: impl Into<Location>) -> Self {
        Self {
            entrance: entrance.into(),
            checkout: checkout.into(),
            tolerance: Self::DEFAULT_TOLERANCE,
            rows: Vec::new(),
        }
    }

    /// Set the allowed deviation of a row sum from 1.0
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Add the outgoing distribution of `from`
    pub fn row<L, I>(mut self, from: impl Into<Location>, entries: I) -> Self
    where
        L: Into<Location>,
        I: IntoIterator<Item = (L, f64)>,
    {
        self.push_row(from, entries);
        self
    }

    /// Add a row through a mutable reference, for loaders filling rows in a loop
    pub fn push_row<L, I>(&mut self, from: impl Into<Location>, entries: I)
    where
        L: Into<Location>,
        I: IntoIterator<Item = (L, f64)>,
    {
        let entries = entries.into_iter().map(|(to, p)| (to.into(), p)).collect();
        self.rows.push((from.into(), entries));
    }

    /// Validate the rows and build the table
    pub fn build(self) -> SimulationResult<TransitionTable> {
        if self.entrance == self.checkout {
            return Err(SimulationError::configuration_error(format!(
                "entrance and checkout must differ, both are '{}'",
                self.entrance
            )));
        }
        if self.rows.is_empty() {
            return Err(SimulationError::invalid_table("table has no rows"));
        }

        let mut labels = BTreeSet::new();
        for (from, _) in &self.rows {
            if from.is_empty() {
                return Err(SimulationError::invalid_table("row with an empty location label"));
            }
            if !labels.insert(from.clone()) {
                return Err(SimulationError::invalid_table(format!(
                    "duplicate row for location '{}'",
                    from
                )));
            }
        }

        for (role, label) in [("entrance", &self.entrance), ("checkout", &self.checkout)] {
            if !labels.contains(label) {
                return Err(SimulationError::MissingLocation { role, label: label.to_string() });
            }
        }

        let mut rows = BTreeMap::new();
        for (from, entries) in self.rows {
            let row = Self::validate_row(&from, entries, &labels, self.tolerance)?;
            rows.insert(from, row);
        }

        let table = TransitionTable { rows, entrance: self.entrance, checkout: self.checkout };

        let stay = table.probability(table.checkout.as_str(), table.checkout.as_str());
        if stay.map_or(false, |p| p < 1.0 - self.tolerance) {
            warn!(
                checkout = %table.checkout,
                "Checkout row is not absorbing; customers at checkout are removed before its weights apply"
            );
        }

        debug!(
            "Built transition table with {} locations (entrance: {}, checkout: {})",
            table.len(),
            table.entrance,
            table.checkout
        );
        Ok(table)
    }

    fn validate_row(
        from: &Location,
        entries: Vec<(Location, f64)>,
        labels: &BTreeSet<Location>,
        tolerance: f64,
    ) -> SimulationResult<TransitionRow> {
        if entries.is_empty() {
            return Err(SimulationError::invalid_table(format!(
                "row '{}' has no destinations",
                from
            )));
        }

        let mut seen = BTreeSet::new();
        for (to, p) in &entries {
            if !labels.contains(to) {
                return Err(SimulationError::invalid_table(format!(
                    "destination '{}' in row '{}' is not a location of the table",
                    to, from
                )));
            }
            if !seen.insert(to) {
                return Err(SimulationError::invalid_table(format!(
                    "destination '{}' appears twice in row '{}'",
                    to, from
                )));
            }
            if !p.is_finite() || *p < 0.0 {
                return Err(SimulationError::invalid_table(format!(
                    "probability {} -> {} is {}, expected a value in [0, 1]",
                    from, to, p
                )));
            }
        }

        let total: f64 = entries.iter().map(|(_, p)| p).sum();
        if (total - 1.0).abs() > tolerance {
            return Err(SimulationError::invalid_table(format!(
                "row '{}' sums to {}, expected 1 within {}",
                from, total, tolerance
            )));
        }

        let (destinations, probabilities): (Vec<Location>, Vec<f64>) =
            entries.into_iter().map(|(to, p)| (to, p / total)).unzip();
        let sampler = WeightedIndex::new(&probabilities)
            .map_err(|e| SimulationError::invalid_table(format!("row '{}': {}", from, e)))?;

        Ok(TransitionRow { destinations, probabilities, sampler })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn two_state_table() -> TransitionTable {
        TransitionTable::builder("entrance", "checkout")
            .row("entrance", [("checkout", 1.0)])
            .row("checkout", [("checkout", 1.0)])
            .build()
            .unwrap()
    }

    fn store_table() -> TransitionTable {
        TransitionTable::builder("entrance", "checkout")
            .row("entrance", [("entrance", 0.0), ("fruit", 0.6), ("dairy", 0.4), ("checkout", 0.0)])
            .row("fruit", [("entrance", 0.0), ("fruit", 0.5), ("dairy", 0.2), ("checkout", 0.3)])
            .row("dairy", [("entrance", 0.0), ("fruit", 0.1), ("dairy", 0.6), ("checkout", 0.3)])
            .row("checkout", [("entrance", 0.0), ("fruit", 0.0), ("dairy", 0.0), ("checkout", 1.0)])
            .build()
            .unwrap()
    }

    #[test]
    fn test_build_valid_table() {
        let table = store_table();

        assert_eq!(table.len(), 4);
        assert_eq!(table.entrance(), "entrance");
        assert_eq!(table.checkout(), "checkout");
        assert!(table.contains("fruit"));
        assert!(!table.contains("bakery"));
        assert_eq!(table.probability("fruit", "checkout"), Some(0.3));
        assert_eq!(table.probability("bakery", "fruit"), None);

        let labels: Vec<&str> = table.locations().map(Location::as_str).collect();
        assert_eq!(labels, vec!["checkout", "dairy", "entrance", "fruit"]);
    }

    #[test]
    fn test_rows_sum_to_one() {
        let table = TransitionTable::builder("entrance", "checkout")
            .row("entrance", [("entrance", 0.33333), ("checkout", 0.66666)])
            .row("checkout", [("checkout", 1.0)])
            .tolerance(1e-4)
            .build()
            .unwrap();

        for location in table.locations() {
            let total = table.row(location.as_str()).unwrap().total();
            assert!((total - 1.0).abs() < 1e-9, "{} sums to {}", location, total);
        }
    }

    #[test]
    fn test_roles() {
        let table = store_table();
        assert_eq!(table.role_of("entrance"), Some(LocationRole::Entrance));
        assert_eq!(table.role_of("checkout"), Some(LocationRole::Checkout));
        assert_eq!(table.role_of("dairy"), Some(LocationRole::Section));
        assert_eq!(table.role_of("bakery"), None);
    }

    #[test]
    fn test_next_with_certain_transition() {
        let table = two_state_table();
        let mut rng = StdRng::seed_from_u64(1);

        let next = table.next(&Location::from("entrance"), &mut rng).unwrap();
        assert_eq!(next, "checkout");
    }

    #[test]
    fn test_next_unknown_state() {
        let table = two_state_table();
        let mut rng = StdRng::seed_from_u64(1);

        let result = table.next(&Location::from("bakery"), &mut rng);
        assert!(matches!(result, Err(SimulationError::UnknownState(ref l)) if l == "bakery"));
    }

    #[test]
    fn test_next_never_picks_zero_weight() {
        let table = store_table();
        let mut rng = StdRng::seed_from_u64(7);
        let entrance = Location::from("entrance");

        for _ in 0..1_000 {
            let next = table.next(&entrance, &mut rng).unwrap();
            assert!(next == "fruit" || next == "dairy", "unexpected {}", next);
        }
    }

    #[test]
    fn test_next_follows_row_distribution() {
        let table = store_table();
        let mut rng = StdRng::seed_from_u64(42);
        let entrance = Location::from("entrance");

        let draws = 20_000;
        let fruit = (0..draws)
            .filter(|_| table.next(&entrance, &mut rng).unwrap() == "fruit")
            .count();
        let share = fruit as f64 / draws as f64;
        assert!((share - 0.6).abs() < 0.02, "fruit share was {}", share);
    }

    #[test]
    fn test_rejects_negative_weight() {
        let result = TransitionTable::builder("entrance", "checkout")
            .row("entrance", [("entrance", -0.5), ("checkout", 1.5)])
            .row("checkout", [("checkout", 1.0)])
            .build();
        assert!(matches!(result, Err(SimulationError::InvalidTable(_))));
    }

    #[test]
    fn test_rejects_non_finite_weight() {
        let result = TransitionTable::builder("entrance", "checkout")
            .row("entrance", [("checkout", f64::NAN)])
            .row("checkout", [("checkout", 1.0)])
            .build();
        assert!(matches!(result, Err(SimulationError::InvalidTable(_))));
    }

    #[test]
    fn test_rejects_row_not_summing_to_one() {
        let result = TransitionTable::builder("entrance", "checkout")
            .row("entrance", [("entrance", 0.2), ("checkout", 0.7)])
            .row("checkout", [("checkout", 1.0)])
            .build();

        let error = result.unwrap_err();
        assert!(error.to_string().contains("row 'entrance' sums to"));
    }

    #[test]
    fn test_rejects_missing_designated_locations() {
        let result = TransitionTable::builder("entrance", "checkout")
            .row("checkout", [("checkout", 1.0)])
            .build();
        assert!(matches!(
            result,
            Err(SimulationError::MissingLocation { role: "entrance", .. })
        ));

        let result = TransitionTable::builder("entrance", "checkout")
            .row("entrance", [("entrance", 1.0)])
            .build();
        assert!(matches!(
            result,
            Err(SimulationError::MissingLocation { role: "checkout", .. })
        ));
    }

    #[test]
    fn test_rejects_unknown_destination() {
        let result = TransitionTable::builder("entrance", "checkout")
            .row("entrance", [("bakery", 1.0)])
            .row("checkout", [("checkout", 1.0)])
            .build();
        assert!(matches!(result, Err(SimulationError::InvalidTable(ref m)) if m.contains("bakery")));
    }

    #[test]
    fn test_rejects_duplicates_and_empty_rows() {
        let duplicate_row = TransitionTable::builder("entrance", "checkout")
            .row("entrance", [("checkout", 1.0)])
            .row("entrance", [("checkout", 1.0)])
            .row("checkout", [("checkout", 1.0)])
            .build();
        assert!(duplicate_row.is_err());

        let duplicate_column = TransitionTable::builder("entrance", "checkout")
            .row("entrance", [("checkout", 0.5), ("checkout", 0.5)])
            .row("checkout", [("checkout", 1.0)])
            .build();
        assert!(duplicate_column.is_err());

        let empty_row = TransitionTable::builder("entrance", "checkout")
            .row("entrance", Vec::<(&str, f64)>::new())
            .row("checkout", [("checkout", 1.0)])
            .build();
        assert!(empty_row.is_err());

        let no_rows = TransitionTable::builder("entrance", "checkout").build();
        assert!(matches!(no_rows, Err(SimulationError::InvalidTable(_))));
    }

    #[test]
    fn test_rejects_shared_entrance_and_checkout() {
        let result = TransitionTable::builder("door", "door")
            .row("door", [("door", 1.0)])
            .build();
        assert!(matches!(result, Err(SimulationError::ConfigurationError(_))));
    }
}
