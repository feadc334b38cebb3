// Supermarket Simulation - Main Entry Point
//
// You can run it via Cargo:
//
// ```console
// $ cargo build --release
// $ ./target/release/supermarket-markov-sim
// ```
//
// Or with custom configuration:
//
// ```console
// $ ./target/release/supermarket-markov-sim --seed 42 --initial-customers 20 --output-format json --verbose
// ```

use anyhow::{anyhow, Context};
use clap::Parser;
use std::io::{self, BufWriter};
use std::process;
use std::sync::Arc;
use supermarket_markov_sim::events::{JsonLinesSink, ObservationSink, TextSink};
use supermarket_markov_sim::simulation::{LoggingConfig, SimulationEngine, SimulationStatistics};
use supermarket_markov_sim::store::{TableLayout, TransitionTable};
use supermarket_markov_sim::types::config::CliArgs;
use supermarket_markov_sim::types::{OutputFormat, SimulationConfig};
use tracing::{error, info, Level};

fn main() {
    // Parse CLI arguments first to check for special flags
    let args = CliArgs::parse();

    // Handle special CLI flags that don't require full initialization
    if args.print_config {
        let default_config = SimulationConfig::default();
        match default_config.print_json() {
            Ok(json) => {
                println!("{}", json);
                return;
            }
            Err(e) => {
                eprintln!("Failed to serialize default configuration: {}", e);
                process::exit(1);
            }
        }
    }

    if let Err(e) = init_logging(&args) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("Starting Supermarket Simulation");

    if let Err(e) = run(args) {
        error!("Simulation failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }

    info!("Supermarket Simulation completed successfully");
}

/// Initialize logging based on CLI flags
fn init_logging(args: &CliArgs) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    match &args.log_dir {
        Some(dir) => {
            let level = if args.debug {
                Level::DEBUG
            } else if args.verbose {
                Level::INFO
            } else {
                Level::WARN
            };
            LoggingConfig::new().with_level(level).with_file_logging(dir.as_str()).init()
        }
        None if args.debug => LoggingConfig::init_debug(),
        None if args.verbose => LoggingConfig::init_verbose(),
        // Default: minimal logging for normal users
        None => LoggingConfig::new().with_level(Level::WARN).init(),
    }
}

/// Load configuration and table, then run one simulated day
fn run(args: CliArgs) -> anyhow::Result<()> {
    let dry_run = args.dry_run;

    // Load configuration from CLI arguments and optional config file
    let config = SimulationConfig::from_cli_args(args).context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;
    info!("Configuration loaded and validated successfully");

    let layout = TableLayout::from_config(&config);
    let table = TransitionTable::from_csv_path(&config.transition_table, &layout)
        .with_context(|| format!("Failed to load transition table '{}'", config.transition_table))?;

    // Handle dry run mode
    if dry_run {
        eprintln!("Configuration and transition table validation successful!");
        eprintln!("Dry run mode - simulation will not be executed.");
        print_configuration_summary(&config, &table);
        return Ok(());
    }

    print_startup_banner(&config, &table);

    let format = config.get_output_format().map_err(|e| anyhow!(e))?;
    let mut engine = SimulationEngine::new(&config, Arc::new(table))
        .context("Failed to initialize simulation engine")?;

    let writer = BufWriter::new(io::stdout().lock());
    let mut sink: Box<dyn ObservationSink> = match format {
        OutputFormat::Text => Box::new(TextSink::new(writer)),
        OutputFormat::Json => Box::new(JsonLinesSink::new(writer)),
    };

    info!("Starting simulation");
    let statistics = engine.run(sink.as_mut()).context("Simulation run failed")?;

    print_final_statistics(&statistics);
    Ok(())
}

/// Print startup banner and configuration summary
fn print_startup_banner(config: &SimulationConfig, table: &TransitionTable) {
    eprintln!("Supermarket Simulation");
    eprintln!("======================");
    eprintln!("Markov-chain model of customers moving between store sections");
    eprintln!();

    print_configuration_summary(config, table);
}

/// Print configuration summary
fn print_configuration_summary(config: &SimulationConfig, table: &TransitionTable) {
    eprintln!("Configuration:");
    eprintln!("  Opening Window: {} to {}", config.opens_at, config.closes_at);
    eprintln!("  Step: {} minute(s) ({} ticks per day)", config.step_minutes, config.steps_per_day());
    eprintln!("  Arrivals per Tick: 0 to {}", config.max_arrivals.saturating_sub(1));
    eprintln!("  Initial Customers: {}", config.initial_customers);
    eprintln!("  Transition Table: {}", config.transition_table);
    eprintln!("  Output Format: {}", config.output_format);
    if let Some(seed) = config.seed {
        eprintln!("  Random Seed: {}", seed);
    }

    eprintln!("\nStore Layout:");
    for location in table.locations() {
        let role = table.role_of(location.as_str()).map(|r| r.to_string()).unwrap_or_default();
        eprintln!("  {} ({})", location, role);
    }
    eprintln!();
}

/// Print final statistics to stderr, keeping stdout for observations
fn print_final_statistics(statistics: &SimulationStatistics) {
    eprintln!("\nSimulation Complete!");
    eprintln!("{}", statistics);
}
