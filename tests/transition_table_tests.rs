//! Tests for transition table construction, loading and sampling

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::io::Write;
use supermarket_markov_sim::{
    Location, LocationRole, SimulationError, TableLayout, TransitionTable,
};
use tempfile::NamedTempFile;

fn bundled_table_path() -> String {
    format!("{}/data/transition_probabilities.csv", env!("CARGO_MANIFEST_DIR"))
}

fn bundled_table() -> TransitionTable {
    TransitionTable::from_csv_path(bundled_table_path(), &TableLayout::default()).unwrap()
}

fn write_csv(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// The bundled table loads with its six sections
#[test]
fn test_bundled_table_loads() {
    let table = bundled_table();

    let locations: Vec<&str> = table.locations().map(Location::as_str).collect();
    assert_eq!(locations, vec!["checkout", "dairy", "drinks", "entrance", "fruit", "spices"]);
    assert_eq!(table.role_of("entrance"), Some(LocationRole::Entrance));
    assert_eq!(table.role_of("checkout"), Some(LocationRole::Checkout));
    assert_eq!(table.role_of("fruit"), Some(LocationRole::Section));
    assert_eq!(table.probability("checkout", "checkout"), Some(1.0));
}

/// Every row of a built table sums to one within 1e-9
#[test]
fn test_row_sums_after_normalisation() {
    let table = bundled_table();
    for location in table.locations() {
        let row = table.row(location.as_str()).unwrap();
        assert!((row.total() - 1.0).abs() < 1e-9, "row {} sums to {}", location, row.total());
    }

    let table = TransitionTable::builder("entrance", "checkout")
        .row("entrance", [("dairy", 0.333_333_3), ("checkout", 0.666_666_6)])
        .row("dairy", [("checkout", 1.0)])
        .row("checkout", [("checkout", 1.0)])
        .build()
        .unwrap();
    assert!((table.row("entrance").unwrap().total() - 1.0).abs() < 1e-9);
}

/// Sampled frequencies follow the row distribution
#[test]
fn test_sampling_frequencies() {
    let table = bundled_table();
    let mut rng = StdRng::seed_from_u64(2021);
    let from = Location::from("entrance");
    let draws = 20_000;

    let mut counts: HashMap<Location, usize> = HashMap::new();
    for _ in 0..draws {
        let next = table.next(&from, &mut rng).unwrap();
        *counts.entry(next).or_insert(0) += 1;
    }

    for (to, probability) in table.row("entrance").unwrap().iter() {
        let observed = counts.get(to).copied().unwrap_or(0) as f64 / draws as f64;
        assert!(
            (observed - probability).abs() < 0.02,
            "entrance -> {}: expected {}, observed {}",
            to,
            probability,
            observed
        );
    }
    assert!(!counts.contains_key(&Location::from("entrance")));
    assert!(!counts.contains_key(&Location::from("checkout")));
}

/// Zero-probability destinations are never drawn
#[test]
fn test_zero_probability_never_drawn() {
    let table = TransitionTable::builder("entrance", "checkout")
        .row("entrance", [("dairy", 1.0), ("checkout", 0.0)])
        .row("dairy", [("dairy", 0.0), ("checkout", 1.0)])
        .row("checkout", [("checkout", 1.0)])
        .build()
        .unwrap();
    let mut rng = StdRng::seed_from_u64(3);

    for _ in 0..1_000 {
        assert_eq!(table.next(&Location::from("entrance"), &mut rng).unwrap(), "dairy");
        assert_eq!(table.next(&Location::from("dairy"), &mut rng).unwrap(), "checkout");
    }
}

/// Unknown source locations are reported, not silently dropped
#[test]
fn test_unknown_state() {
    let table = bundled_table();
    let mut rng = StdRng::seed_from_u64(0);

    let result = table.next(&Location::from("bakery"), &mut rng);
    assert!(matches!(result, Err(SimulationError::UnknownState(ref l)) if l == "bakery"));
}

/// Malformed rows are rejected before any simulation runs
#[test]
fn test_invalid_tables_are_rejected() {
    let negative = TransitionTable::builder("entrance", "checkout")
        .row("entrance", [("checkout", 1.2), ("entrance", -0.2)])
        .row("checkout", [("checkout", 1.0)])
        .build();
    assert!(matches!(negative, Err(SimulationError::InvalidTable(_))));

    let short = TransitionTable::builder("entrance", "checkout")
        .row("entrance", [("checkout", 0.9)])
        .row("checkout", [("checkout", 1.0)])
        .build();
    assert!(matches!(short, Err(SimulationError::InvalidTable(_))));

    let no_checkout = TransitionTable::builder("entrance", "checkout")
        .row("entrance", [("entrance", 1.0)])
        .build();
    assert!(matches!(
        no_checkout,
        Err(SimulationError::MissingLocation { role: "checkout", .. })
    ));

    let stray_destination = TransitionTable::builder("entrance", "checkout")
        .row("entrance", [("bakery", 1.0)])
        .row("checkout", [("checkout", 1.0)])
        .build();
    assert!(matches!(stray_destination, Err(SimulationError::InvalidTable(_))));
}

/// Tables load from CSV files with a custom layout
#[test]
fn test_csv_file_with_custom_layout() {
    let file = write_csv(
        "aisle,door,till,bread\n\
         door,0.0,0.25,0.75\n\
         bread,0.0,0.5,0.5\n\
         till,0.0,1.0,0.0\n",
    );
    let layout = TableLayout {
        location_column: "aisle".to_string(),
        entrance: "door".to_string(),
        checkout: "till".to_string(),
        ..TableLayout::default()
    };

    let table = TransitionTable::from_csv_path(file.path(), &layout).unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table.entrance(), "door");
    assert_eq!(table.checkout(), "till");
    assert_eq!(table.probability("door", "bread"), Some(0.75));
}

/// Loading errors surface as configuration problems
#[test]
fn test_csv_errors() {
    let missing = TransitionTable::from_csv_path("does/not/exist.csv", &TableLayout::default());
    assert!(missing.unwrap_err().is_configuration_error());

    let file = write_csv("location,checkout,entrance\nentrance,abc,0.0\ncheckout,1.0,0.0\n");
    let bad_cell = TransitionTable::from_csv_path(file.path(), &TableLayout::default());
    assert!(bad_cell.unwrap_err().to_string().contains("abc"));
}
