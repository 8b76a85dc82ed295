use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::error::DataLoadError;

// ---------------------------------------------------------------------------
// Commodity – the closed set of products tracked by the dataset
// ---------------------------------------------------------------------------

/// A tracked agricultural product.
///
/// Declaration order is alphabetical so the derived `Ord` matches the
/// "commodity ascending" ordering used by tables and exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Commodity {
    Cheese,
    Coffee,
    Honey,
    Milk,
    Yogurt,
}

impl Commodity {
    pub const ALL: [Commodity; 5] = [
        Commodity::Cheese,
        Commodity::Coffee,
        Commodity::Honey,
        Commodity::Milk,
        Commodity::Yogurt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Commodity::Cheese => "Cheese",
            Commodity::Coffee => "Coffee",
            Commodity::Honey => "Honey",
            Commodity::Milk => "Milk",
            Commodity::Yogurt => "Yogurt",
        }
    }
}

impl fmt::Display for Commodity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names none of the known commodities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCommodity(pub String);

impl FromStr for Commodity {
    type Err = UnknownCommodity;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Commodity::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownCommodity(trimmed.to_string()))
    }
}

// ---------------------------------------------------------------------------
// ProductionRecord – one row of the input file
// ---------------------------------------------------------------------------

/// A single (state, year, commodity) production observation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductionRecord {
    /// State name, trimmed and uppercased.
    pub state: String,
    pub year: i32,
    pub commodity: Commodity,
    /// Production value in USD; `None` when the source cell was empty.
    pub production: Option<f64>,
}

impl ProductionRecord {
    pub fn new(
        state: impl AsRef<str>,
        year: i32,
        commodity: Commodity,
        production: Option<f64>,
    ) -> Self {
        Self {
            state: normalize_state(state.as_ref()),
            year,
            commodity,
            production,
        }
    }
}

/// Canonical form of a state name: trimmed and uppercase.
pub fn normalize_state(raw: &str) -> String {
    raw.trim().to_uppercase()
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded base table
// ---------------------------------------------------------------------------

/// The immutable base table with pre-computed domain facts.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<ProductionRecord>,
    states: Vec<String>,
    commodities: Vec<Commodity>,
    min_year: i32,
    max_year: i32,
}

impl Dataset {
    /// Build the domain facts from the loaded records.
    ///
    /// Fails with [`DataLoadError::Empty`] when there is nothing to show,
    /// since the year bounds would be undefined.
    pub fn from_records(records: Vec<ProductionRecord>) -> Result<Self, DataLoadError> {
        let mut states: BTreeSet<String> = BTreeSet::new();
        let mut commodities: BTreeSet<Commodity> = BTreeSet::new();
        let mut min_year = i32::MAX;
        let mut max_year = i32::MIN;

        for rec in &records {
            if !states.contains(&rec.state) {
                states.insert(rec.state.clone());
            }
            commodities.insert(rec.commodity);
            min_year = min_year.min(rec.year);
            max_year = max_year.max(rec.year);
        }

        if records.is_empty() {
            return Err(DataLoadError::Empty);
        }

        Ok(Dataset {
            records,
            states: states.into_iter().collect(),
            commodities: commodities.into_iter().collect(),
            min_year,
            max_year,
        })
    }

    pub fn records(&self) -> &[ProductionRecord] {
        &self.records
    }

    /// Distinct state names, sorted ascending.
    pub fn states(&self) -> &[String] {
        &self.states
    }

    /// Distinct commodities present in the data, sorted ascending.
    pub fn commodities(&self) -> &[Commodity] {
        &self.commodities
    }

    pub fn min_year(&self) -> i32 {
        self.min_year
    }

    pub fn max_year(&self) -> i32 {
        self.max_year
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
