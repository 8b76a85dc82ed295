use std::collections::BTreeSet;

use super::model::{Commodity, Dataset};

/// Commodities shown when the user deselects every commodity.
pub const DEFAULT_COMMODITIES: [Commodity; 2] = [Commodity::Honey, Commodity::Yogurt];

/// How many of the sorted states stand in for an empty state selection.
pub const DEFAULT_STATE_COUNT: usize = 3;

// ---------------------------------------------------------------------------
// YearRange
// ---------------------------------------------------------------------------

/// Inclusive `[start, end]` year interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }
}

// ---------------------------------------------------------------------------
// FilterSpec – resolved user selection
// ---------------------------------------------------------------------------

/// The constraints every derived view is computed from.
///
/// Both sets are non-empty once built through [`FilterSpec::resolve`].
/// `states` is only consulted by the table and export views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    pub year_range: YearRange,
    pub commodities: BTreeSet<Commodity>,
    pub states: BTreeSet<String>,
}

impl FilterSpec {
    /// Turn raw widget selections into a filter, substituting defaults for
    /// empty selections:
    /// * no commodities → [`DEFAULT_COMMODITIES`]
    /// * no states → the first [`DEFAULT_STATE_COUNT`] states in sorted order
    ///
    /// The year range is passed through unchanged; bounds are enforced by the
    /// widgets that produce it.
    pub fn resolve(
        dataset: &Dataset,
        raw_commodities: &BTreeSet<Commodity>,
        raw_states: &BTreeSet<String>,
        raw_year_range: YearRange,
    ) -> Self {
        let commodities = if raw_commodities.is_empty() {
            DEFAULT_COMMODITIES.into_iter().collect()
        } else {
            raw_commodities.clone()
        };

        let states = if raw_states.is_empty() {
            dataset
                .states()
                .iter()
                .take(DEFAULT_STATE_COUNT)
                .cloned()
                .collect()
        } else {
            raw_states.clone()
        };

        FilterSpec {
            year_range: raw_year_range,
            commodities,
            states,
        }
    }

    /// Comma-separated commodity names, used in chart titles.
    pub fn commodity_label(&self) -> String {
        self.commodities
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ProductionRecord;

    fn dataset() -> Dataset {
        Dataset::from_records(
            ["WYOMING", "ALASKA", "TEXAS", "IOWA", "OHIO"]
                .iter()
                .map(|s| ProductionRecord::new(s, 2000, Commodity::Milk, Some(1.0)))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn empty_commodities_default_to_honey_and_yogurt() {
        let ds = dataset();
        let spec = FilterSpec::resolve(
            &ds,
            &BTreeSet::new(),
            &BTreeSet::from(["OHIO".to_string()]),
            YearRange::new(2000, 2001),
        );
        assert_eq!(
            spec.commodities,
            BTreeSet::from([Commodity::Honey, Commodity::Yogurt])
        );
        assert_eq!(spec.commodity_label(), "Honey, Yogurt");
    }

    #[test]
    fn empty_states_default_to_first_three_sorted() {
        let ds = dataset();
        let spec = FilterSpec::resolve(
            &ds,
            &BTreeSet::from([Commodity::Milk]),
            &BTreeSet::new(),
            YearRange::new(1990, 1995),
        );
        let expected: BTreeSet<String> = ["ALASKA", "IOWA", "OHIO"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(spec.states, expected);
        assert_eq!(spec.commodities, BTreeSet::from([Commodity::Milk]));
    }

    #[test]
    fn year_range_passes_through() {
        let ds = dataset();
        let range = YearRange::new(1800, 3000);
        let spec = FilterSpec::resolve(&ds, &BTreeSet::new(), &BTreeSet::new(), range);
        assert_eq!(spec.year_range, range);
        assert!(range.contains(1800) && range.contains(3000));
        assert!(!range.contains(3001));
    }
}
