//! CSV transition table loader.
//!
//! # CSV format
//!
//! One row per source location; the key column names the source and every
//! other column is a destination.
//!
//! ```csv
//! location,checkout,dairy,entrance,fruit
//! checkout,1.0,0.0,0.0,0.0
//! dairy,0.4,0.5,0.0,0.1
//! entrance,0.0,0.6,0.0,0.4
//! fruit,0.5,0.1,0.0,0.4
//! ```
//!
//! The key column may appear at any position. Cells are trimmed before
//! parsing; an empty or non-numeric cell is an error naming its row and column.

use std::io::Read;
use std::path::Path;

use tracing::info;

use crate::simulation::{SimulationError, SimulationResult};
use crate::store::{Location, TransitionTable, TransitionTableBuilder};
use crate::types::SimulationConfig;

/// How to interpret a transition table file
#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    /// Header of the column naming the source location
    pub location_column: String,
    /// Label of the entrance row
    pub entrance: String,
    /// Label of the checkout row
    pub checkout: String,
    /// Allowed deviation of a row sum from 1.0
    pub tolerance: f64,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}

impl TableLayout {
    /// Take the layout from the simulation configuration
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            location_column: config.location_column.clone(),
            entrance: config.entrance.clone(),
            checkout: config.checkout.clone(),
            tolerance: config.table_tolerance,
        }
    }
}

impl TransitionTable {
    /// Load and validate a table from a CSV file
    pub fn from_csv_path(path: impl AsRef<Path>, layout: &TableLayout) -> SimulationResult<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            SimulationError::configuration_error(format!(
                "cannot open transition table '{}': {}",
                path.display(),
                e
            ))
        })?;
        let table = Self::from_csv_reader(file, layout)?;

        info!("Loaded transition table with {} locations from {}", table.len(), path.display());
        Ok(table)
    }

    /// Like [`from_csv_path`](Self::from_csv_path) but accepts any `Read` source.
    pub fn from_csv_reader<R: Read>(reader: R, layout: &TableLayout) -> SimulationResult<Self> {
        let mut csv_reader =
            csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let key_index = headers
            .iter()
            .position(|h| h == layout.location_column)
            .ok_or_else(|| {
                SimulationError::invalid_table(format!(
                    "missing key column '{}'",
                    layout.location_column
                ))
            })?;

        let columns: Vec<(usize, Location)> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != key_index)
            .map(|(i, h)| (i, Location::new(h)))
            .collect();

        let mut builder = TransitionTableBuilder::new(layout.entrance.as_str(), layout.checkout.as_str())
            .tolerance(layout.tolerance);

        for record in csv_reader.records() {
            let record = record?;
            let from = Location::new(record.get(key_index).unwrap_or_default());

            let entries = columns
                .iter()
                .map(|(i, to)| {
                    let cell = record.get(*i).unwrap_or_default();
                    cell.parse::<f64>().map(|p| (to.clone(), p)).map_err(|_| {
                        SimulationError::invalid_table(format!(
                            "row '{}', column '{}': '{}' is not a probability",
                            from, to, cell
                        ))
                    })
                })
                .collect::<SimulationResult<Vec<_>>>()?;

            builder.push_row(from, entries);
        }

        builder.build()
    }
}
