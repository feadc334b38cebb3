//! Statistics collection and reporting
//!
//! Counters are updated by the engine as the day runs and frozen when the
//! store closes.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::customer::{Customer, Movement};
use crate::store::Location;

/// Aggregate results of one simulated day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationStatistics {
    /// Opening instant of the simulated day
    pub opens_at: NaiveDateTime,
    /// Closing instant of the simulated day
    pub closes_at: NaiveDateTime,
    /// Ticks processed, including the opening tick
    pub ticks: u64,
    /// Customers waiting at the entrance at opening
    pub initial_customers: usize,
    /// Customers admitted during the day
    pub arrivals: usize,
    /// Customers removed at the checkout
    pub departures: usize,
    /// Largest population observed at the end of a tick
    pub peak_population: usize,
    /// Customers still inside at closing
    pub final_population: usize,
    /// Ticks after which the store was empty
    pub exhausted_ticks: usize,
    /// Customer-ticks spent at each location after a transition
    pub location_visits: BTreeMap<Location, usize>,
    /// Sum of transitions taken by departed customers
    pub total_dwell_ticks: usize,
    /// Wall-clock time of the run
    pub simulation_duration: Duration,
}

impl SimulationStatistics {
    /// Create empty statistics for a day bounded by `opens_at` and `closes_at`
    pub fn new(opens_at: NaiveDateTime, closes_at: NaiveDateTime) -> Self {
        Self {
            opens_at,
            closes_at,
            ticks: 0,
            initial_customers: 0,
            arrivals: 0,
            departures: 0,
            peak_population: 0,
            final_population: 0,
            exhausted_ticks: 0,
            location_visits: BTreeMap::new(),
            total_dwell_ticks: 0,
            simulation_duration: Duration::from_secs(0),
        }
    }

    /// Count one customer's move
    pub fn record_movement(&mut self, movement: &Movement) {
        *self.location_visits.entry(movement.to.clone()).or_insert(0) += 1;
    }

    /// Count customers removed at the checkout
    pub fn record_departures(&mut self, departed: &[Customer]) {
        self.departures += departed.len();
        self.total_dwell_ticks += departed.iter().map(Customer::moves).sum::<usize>();
    }

    /// Count newly admitted customers
    pub fn record_arrivals(&mut self, count: usize) {
        self.arrivals += count;
    }

    /// Track the population at the end of a tick
    pub fn record_population(&mut self, size: usize) {
        self.peak_population = self.peak_population.max(size);
    }

    /// Count a tick that ended with an empty store
    pub fn record_exhausted(&mut self) {
        self.exhausted_ticks += 1;
    }

    /// Freeze the counters at closing
    pub fn finalize(&mut self, ticks: u64, final_population: usize, duration: Duration) {
        self.ticks = ticks;
        self.final_population = final_population;
        self.simulation_duration = duration;
    }

    /// Every customer that was inside at some point
    pub fn total_customers(&self) -> usize {
        self.initial_customers + self.arrivals
    }

    /// Mean number of ticks a departed customer spent inside
    pub fn average_dwell_ticks(&self) -> f64 {
        if self.departures == 0 {
            0.0
        } else {
            self.total_dwell_ticks as f64 / self.departures as f64
        }
    }

    /// Percentage of customers that reached the checkout before closing
    pub fn departure_percentage(&self) -> f64 {
        let total = self.total_customers();
        if total == 0 {
            0.0
        } else {
            (self.departures as f64 / total as f64) * 100.0
        }
    }

    /// Location with the most customer-ticks
    pub fn busiest_location(&self) -> Option<(&Location, usize)> {
        self.location_visits
            .iter()
            .max_by_key(|(_, &count)| count)
            .map(|(location, &count)| (location, count))
    }

    /// Whether every customer is accounted for as departed or still inside
    pub fn is_balanced(&self) -> bool {
        self.total_customers() == self.departures + self.final_population
    }

    /// Generate a summary report
    pub fn generate_summary_report(&self) -> String {
        let mut report = String::new();

        report.push_str("=== Simulation Summary Report ===\n\n");
        report.push_str(&format!(
            "Simulation Duration: {:.2} seconds\n",
            self.simulation_duration.as_secs_f64()
        ));
        report.push_str(&format!("Opening Window: {} to {}\n", self.opens_at, self.closes_at));
        report.push_str(&format!("Ticks Processed: {}\n\n", self.ticks));

        report.push_str("Customer Flow:\n");
        report.push_str(&format!("  • Initial Customers: {}\n", self.initial_customers));
        report.push_str(&format!("  • Arrivals: {}\n", self.arrivals));
        report.push_str(&format!(
            "  • Departures: {} ({:.1}%)\n",
            self.departures,
            self.departure_percentage()
        ));
        report.push_str(&format!("  • Still Inside at Closing: {}\n", self.final_population));
        report.push_str(&format!("  • Peak Population: {}\n", self.peak_population));
        report.push_str(&format!("  • Ticks With Empty Store: {}\n", self.exhausted_ticks));
        report.push_str(&format!(
            "  • Average Dwell: {:.1} ticks\n\n",
            self.average_dwell_ticks()
        ));

        if !self.location_visits.is_empty() {
            let total: usize = self.location_visits.values().sum();
            report.push_str("Location Visits:\n");
            for (location, count) in &self.location_visits {
                let share = if total == 0 { 0.0 } else { *count as f64 / total as f64 * 100.0 };
                report.push_str(&format!("  • {}: {} ({:.1}%)\n", location, count, share));
            }
        }

        report
    }
}

impl fmt::Display for SimulationStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.generate_summary_report())
    }
}
