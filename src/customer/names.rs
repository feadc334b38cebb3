//! Display name generation for new customers
//!
//! Names are cosmetic: there is no uniqueness contract, identity lives in
//! [`CustomerId`](crate::types::CustomerId).

use rand::seq::SliceRandom;
use rand::RngCore;
use std::fmt;

const FIRST_NAMES: &[&str] = &[
    "Ada", "Alan", "Amara", "Ana", "Ben", "Carla", "Chen", "Dario", "Elena", "Emil", "Fatima",
    "Felix", "Greta", "Hana", "Ivan", "Jamal", "Jonas", "Kemal", "Lea", "Luis", "Mara", "Mei",
    "Nadia", "Noah", "Olga", "Omar", "Paula", "Pietro", "Rosa", "Sami", "Tariq", "Ulla",
    "Vera", "Wen", "Yusuf", "Zoe",
];

const LAST_NAMES: &[&str] = &[
    "Ardag", "Becker", "Costa", "Dubois", "Eriksen", "Fischer", "Garcia", "Hoffmann", "Ito",
    "Jansen", "Kowalski", "Lindqvist", "Moreau", "Nakamura", "Okafor", "Passarella", "Quinn",
    "Rossi", "Schmidt", "Tanaka", "Usman", "Varga", "Weber", "Xu", "Yilmaz", "Zimmermann",
];

/// Source of display names for customers entering the store
pub trait NameGenerator: fmt::Debug {
    /// Produce a name for the next customer
    fn next_name(&mut self, rng: &mut dyn RngCore) -> String;
}

/// "First Last" names drawn from built-in lists
#[derive(Debug, Clone, Default)]
pub struct RandomNameGenerator;

impl RandomNameGenerator {
    /// Create a new random name generator
    pub fn new() -> Self {
        Self
    }
}

impl NameGenerator for RandomNameGenerator {
    fn next_name(&mut self, rng: &mut dyn RngCore) -> String {
        let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Customer");
        let last = LAST_NAMES.choose(rng).copied().unwrap_or("Unknown");
        format!("{} {}", first, last)
    }
}

/// Numbered names: `Customer 1`, `Customer 2`, ...
#[derive(Debug, Clone)]
pub struct SequentialNameGenerator {
    prefix: String,
    next: usize,
}

impl SequentialNameGenerator {
    /// Create a generator numbering from 1 with the `Customer` prefix
    pub fn new() -> Self {
        Self::with_prefix("Customer")
    }

    /// Create a generator numbering from 1 with a custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), next: 1 }
    }
}

impl Default for SequentialNameGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl NameGenerator for SequentialNameGenerator {
    fn next_name(&mut self, _rng: &mut dyn RngCore) -> String {
        let name = format!("{} {}", self.prefix, self.next);
        self.next += 1;
        name
    }
}
