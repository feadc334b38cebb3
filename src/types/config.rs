//! Configuration structures for the supermarket simulation
//!
//! This module contains the simulation configuration structure and validation logic
//! used to control the opening window, step size, arrivals, and transition table source.

use super::OutputFormat;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Defaults reproducing a single trading day
pub mod defaults {
    /// Calendar day that is simulated when nothing else is configured
    pub const YEAR: i32 = 2021;
    /// Month of the default trading day
    pub const MONTH: u32 = 1;
    /// Day of the default trading day
    pub const DAY: u32 = 1;

    /// Opening hour (07:00)
    pub const OPENING_HOUR: u32 = 7;

    /// Closing hour (21:00)
    pub const CLOSING_HOUR: u32 = 21;

    /// Minutes per tick
    pub const STEP_MINUTES: i64 = 1;

    /// Exclusive upper bound of the per-tick arrival draw.
    ///
    /// A bound of 2 yields 0 or 1 arrivals per tick.
    pub const MAX_ARRIVALS: usize = 2;

    /// Customers waiting at the entrance when the store opens
    pub const INITIAL_CUSTOMERS: usize = 100;

    /// Allowed deviation of a table row sum from 1.0
    pub const TABLE_TOLERANCE: f64 = 1e-6;

    /// Bundled transition table
    pub const TRANSITION_TABLE: &str = "data/transition_probabilities.csv";
}

/// Command line arguments structure
#[derive(Debug, Clone, Parser)]
#[command(
    name = "supermarket-markov-sim",
    version,
    about = "Supermarket Simulation - Markov-chain model of customers moving between store sections",
    long_about = "Simulates one trading day of a supermarket as a discrete-time Markov process. Every minute each customer moves to a new section according to a transition probability table, customers at the checkout leave, and new customers arrive at the entrance.

EXAMPLES:
    # Run with default settings and the bundled table
    supermarket-markov-sim

    # Use a different transition table
    supermarket-markov-sim --transition-table my_probabilities.csv

    # Reproducible run emitting JSON lines
    supermarket-markov-sim --seed 42 --output-format json

    # Generate configuration template
    supermarket-markov-sim --print-config > my-config.json

    # Validate configuration and table without running
    supermarket-markov-sim --config my-config.json --dry-run

CONFIGURATION:
    Configuration can be provided via:
    1. Command line arguments (highest priority)
    2. Configuration file (--config flag)
    3. Default values (lowest priority)

    Supported configuration file formats: JSON (.json)"
)]
pub struct CliArgs {
    /// Configuration file path (JSON format)
    #[arg(
        short,
        long,
        help = "Configuration file path (JSON format)",
        long_help = "Path to a JSON configuration file. CLI arguments will override file settings."
    )]
    pub config: Option<String>,

    /// Opening instant of the store
    #[arg(
        long,
        value_parser = parse_timestamp,
        help = "Opening instant (YYYY-MM-DDTHH:MM[:SS])",
        long_help = "Instant at which the store opens. Ticks exactly at this instant are outside the active window. Default: 2021-01-01T07:00:00"
    )]
    pub opens_at: Option<NaiveDateTime>,

    /// Closing instant of the store
    #[arg(
        long,
        value_parser = parse_timestamp,
        help = "Closing instant (YYYY-MM-DDTHH:MM[:SS])",
        long_help = "Instant at which the store closes. Must be later than the opening instant. Default: 2021-01-01T21:00:00"
    )]
    pub closes_at: Option<NaiveDateTime>,

    /// Minutes per simulation tick
    #[arg(long, help = "Minutes per simulation tick (default: 1)")]
    pub step_minutes: Option<i64>,

    /// Exclusive upper bound for arrivals per tick
    #[arg(
        long,
        help = "Exclusive upper bound of new customers per tick",
        long_help = "Each tick admits a uniformly drawn number of new customers in [0, max-arrivals). Must be at least 1. Default: 2 (zero or one arrival per tick)"
    )]
    pub max_arrivals: Option<usize>,

    /// Customers at the entrance when the store opens
    #[arg(long, help = "Customers waiting at the entrance at opening")]
    pub initial_customers: Option<usize>,

    /// Path to the transition probability CSV
    #[arg(long, help = "Transition probability table (CSV)")]
    pub transition_table: Option<String>,

    /// Name of the key column in the transition table
    #[arg(long, help = "Key column naming the source location")]
    pub location_column: Option<String>,

    /// Label of the entrance location
    #[arg(long, help = "Label of the entrance location")]
    pub entrance: Option<String>,

    /// Label of the checkout location
    #[arg(long, help = "Label of the checkout (terminal) location")]
    pub checkout: Option<String>,

    /// Output format for observations
    #[arg(
        long,
        help = "Output format (text or json)",
        long_help = "Output format for per-tick observations. Supported formats: text, json. Default: text"
    )]
    pub output_format: Option<String>,

    /// Random seed for reproducible results
    #[arg(long, help = "Random seed for reproducible results")]
    pub seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, help = "Enable debug logging")]
    pub debug: bool,

    /// Directory for rolling JSON log files
    #[arg(
        long,
        help = "Also write JSON logs to daily rolling files in this directory"
    )]
    pub log_dir: Option<String>,

    /// Dry run mode - validate configuration without running simulation
    #[arg(long, help = "Validate configuration and table without running simulation")]
    pub dry_run: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in JSON format and exit")]
    pub print_config: bool,
}

/// Parse an instant given as `YYYY-MM-DDTHH:MM[:SS]` or `YYYY-MM-DD HH:MM[:SS]`
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, String> {
    const FORMATS: [&str; 4] =
        ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

    let value = value.trim();
    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| format!("Invalid timestamp '{}', expected YYYY-MM-DDTHH:MM[:SS]", value))
}

/// Configuration file structure (allows partial configuration)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Opening instant of the store
    pub opens_at: Option<NaiveDateTime>,

    /// Closing instant of the store
    pub closes_at: Option<NaiveDateTime>,

    /// Minutes per simulation tick
    pub step_minutes: Option<i64>,

    /// Exclusive upper bound for arrivals per tick
    pub max_arrivals: Option<usize>,

    /// Customers at the entrance when the store opens
    pub initial_customers: Option<usize>,

    /// Path to the transition probability CSV
    pub transition_table: Option<String>,

    /// Name of the key column in the transition table
    pub location_column: Option<String>,

    /// Label of the entrance location
    pub entrance: Option<String>,

    /// Label of the checkout location
    pub checkout: Option<String>,

    /// Allowed deviation of a table row sum from 1.0
    pub table_tolerance: Option<f64>,

    /// Output format for observations
    pub output_format: Option<String>,

    /// Random seed for reproducible results
    pub seed: Option<u64>,
}

/// Configuration for the supermarket simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Opening instant; the active window excludes it
    pub opens_at: NaiveDateTime,

    /// Closing instant; the active window excludes it
    pub closes_at: NaiveDateTime,

    /// Minutes per simulation tick
    pub step_minutes: i64,

    /// Exclusive upper bound for arrivals per tick
    pub max_arrivals: usize,

    /// Customers at the entrance when the store opens
    pub initial_customers: usize,

    /// Path to the transition probability CSV
    pub transition_table: String,

    /// Name of the key column in the transition table
    pub location_column: String,

    /// Label of the entrance location
    pub entrance: String,

    /// Label of the checkout location
    pub checkout: String,

    /// Allowed deviation of a table row sum from 1.0
    pub table_tolerance: f64,

    /// Output format for observations
    pub output_format: String,

    /// Random seed for reproducible results
    pub seed: Option<u64>,
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Configuration file read error
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unsupported configuration file format
    #[error("Unsupported configuration file format: {0} (supported: .json)")]
    UnsupportedFormat(String),
}

/// Validation errors for simulation configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    /// Closing instant is not after the opening instant
    #[error("Closing time ({closes_at}) must be after opening time ({opens_at})")]
    InvalidOpeningWindow {
        /// Configured opening instant
        opens_at: NaiveDateTime,
        /// Configured closing instant
        closes_at: NaiveDateTime,
    },

    /// Step size is not positive
    #[error("Step must be a positive number of minutes, got {0}")]
    InvalidStep(i64),

    /// Step is too large to move the clock off the opening instant
    #[error("Step of {0} minutes does not fit the calendar range")]
    StepOutOfRange(i64),

    /// Arrival bound leaves no valid draw
    #[error("Maximum arrivals is an exclusive bound and must be at least 1, got {0}")]
    InvalidMaxArrivals(usize),

    /// A location label or column name is blank
    #[error("Label for {0} must not be empty")]
    EmptyLabel(&'static str),

    /// Entrance and checkout share a label
    #[error("Entrance and checkout must be different locations, both are '{0}'")]
    SameEntranceAndCheckout(String),

    /// Row-sum tolerance is outside the accepted range
    #[error("Table tolerance must be in (0.0, 0.1), got {0}")]
    InvalidTolerance(f64),

    /// Output format is not recognised
    #[error("{0}")]
    InvalidOutputFormat(String),
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let day = NaiveDate::from_ymd_opt(defaults::YEAR, defaults::MONTH, defaults::DAY)
            .unwrap_or_default();
        let at_hour = |hour: u32| day.and_hms_opt(hour, 0, 0).unwrap_or_default();

        Self {
            opens_at: at_hour(defaults::OPENING_HOUR),
            closes_at: at_hour(defaults::CLOSING_HOUR),
            step_minutes: defaults::STEP_MINUTES,
            max_arrivals: defaults::MAX_ARRIVALS,
            initial_customers: defaults::INITIAL_CUSTOMERS,
            transition_table: defaults::TRANSITION_TABLE.to_string(),
            location_column: "location".to_string(),
            entrance: "entrance".to_string(),
            checkout: "checkout".to_string(),
            table_tolerance: defaults::TABLE_TOLERANCE,
            output_format: "text".to_string(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Create configuration from parsed CLI arguments
    pub fn from_cli_args(args: CliArgs) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(config_path) = &args.config {
            config = Self::from_file(config_path)?;
        }

        // CLI takes precedence over the file
        Self::apply_cli_overrides(&mut config, args);

        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                let config_file: ConfigFile = serde_json::from_str(&content)?;
                Ok(Self::from_config_file(config_file))
            }
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::UnsupportedFormat("no extension".to_string())),
        }
    }

    /// Create configuration from a config file, merging with defaults
    fn from_config_file(config_file: ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            opens_at: config_file.opens_at.unwrap_or(defaults.opens_at),
            closes_at: config_file.closes_at.unwrap_or(defaults.closes_at),
            step_minutes: config_file.step_minutes.unwrap_or(defaults.step_minutes),
            max_arrivals: config_file.max_arrivals.unwrap_or(defaults.max_arrivals),
            initial_customers: config_file
                .initial_customers
                .unwrap_or(defaults.initial_customers),
            transition_table: config_file
                .transition_table
                .unwrap_or(defaults.transition_table),
            location_column: config_file.location_column.unwrap_or(defaults.location_column),
            entrance: config_file.entrance.unwrap_or(defaults.entrance),
            checkout: config_file.checkout.unwrap_or(defaults.checkout),
            table_tolerance: config_file.table_tolerance.unwrap_or(defaults.table_tolerance),
            output_format: config_file.output_format.unwrap_or(defaults.output_format),
            seed: config_file.seed.or(defaults.seed),
        }
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(config: &mut Self, args: CliArgs) {
        if let Some(value) = args.opens_at {
            config.opens_at = value;
        }
        if let Some(value) = args.closes_at {
            config.closes_at = value;
        }
        if let Some(value) = args.step_minutes {
            config.step_minutes = value;
        }
        if let Some(value) = args.max_arrivals {
            config.max_arrivals = value;
        }
        if let Some(value) = args.initial_customers {
            config.initial_customers = value;
        }
        if let Some(value) = args.transition_table {
            config.transition_table = value;
        }
        if let Some(value) = args.location_column {
            config.location_column = value;
        }
        if let Some(value) = args.entrance {
            config.entrance = value;
        }
        if let Some(value) = args.checkout {
            config.checkout = value;
        }
        if let Some(value) = args.output_format {
            config.output_format = value;
        }
        if let Some(value) = args.seed {
            config.seed = Some(value);
        }
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Print configuration as JSON
    pub fn print_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.closes_at <= self.opens_at {
            return Err(ConfigValidationError::InvalidOpeningWindow {
                opens_at: self.opens_at,
                closes_at: self.closes_at,
            });
        }

        if self.step_minutes <= 0 {
            return Err(ConfigValidationError::InvalidStep(self.step_minutes));
        }
        let first_tick = self.step().and_then(|step| self.opens_at.checked_add_signed(step));
        if first_tick.is_none() {
            return Err(ConfigValidationError::StepOutOfRange(self.step_minutes));
        }

        if self.max_arrivals == 0 {
            return Err(ConfigValidationError::InvalidMaxArrivals(self.max_arrivals));
        }

        if self.location_column.trim().is_empty() {
            return Err(ConfigValidationError::EmptyLabel("location_column"));
        }
        if self.entrance.trim().is_empty() {
            return Err(ConfigValidationError::EmptyLabel("entrance"));
        }
        if self.checkout.trim().is_empty() {
            return Err(ConfigValidationError::EmptyLabel("checkout"));
        }
        if self.entrance.trim() == self.checkout.trim() {
            return Err(ConfigValidationError::SameEntranceAndCheckout(
                self.entrance.trim().to_string(),
            ));
        }

        if !(self.table_tolerance > 0.0 && self.table_tolerance < 0.1) {
            return Err(ConfigValidationError::InvalidTolerance(self.table_tolerance));
        }

        self.get_output_format().map_err(ConfigValidationError::InvalidOutputFormat)?;

        Ok(())
    }

    /// Step size as a chrono duration, `None` when it does not fit
    pub fn step(&self) -> Option<Duration> {
        Duration::try_minutes(self.step_minutes)
    }

    /// Number of steps between opening and closing
    pub fn steps_per_day(&self) -> i64 {
        if self.step_minutes <= 0 {
            return 0;
        }
        (self.closes_at - self.opens_at).num_minutes() / self.step_minutes
    }

    /// Get the output format as an enum value
    pub fn get_output_format(&self) -> Result<OutputFormat, String> {
        self.output_format.parse()
    }
}
