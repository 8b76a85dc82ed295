use std::collections::BTreeMap;

use super::filter::FilterSpec;
use super::model::{Commodity, Dataset, ProductionRecord};

/// Maximum number of rows in a [`Ranking`].
pub const TOP_N: usize = 10;

// ---------------------------------------------------------------------------
// Time series: (commodity, year) → summed production
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub commodity: Commodity,
    pub year: i32,
    pub total: f64,
}

/// National totals per commodity and year, ordered by commodity then year.
/// Each `(commodity, year)` key appears exactly once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedSeries {
    points: Vec<SeriesPoint>,
}

impl AggregatedSeries {
    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn get(&self, commodity: Commodity, year: i32) -> Option<f64> {
        self.points
            .iter()
            .find(|p| p.commodity == commodity && p.year == year)
            .map(|p| p.total)
    }

    /// `[year, total]` pairs per commodity, ready for plotting.
    pub fn by_commodity(&self) -> BTreeMap<Commodity, Vec<[f64; 2]>> {
        let mut lines: BTreeMap<Commodity, Vec<[f64; 2]>> = BTreeMap::new();
        for p in &self.points {
            lines
                .entry(p.commodity)
                .or_default()
                .push([p.year as f64, p.total]);
        }
        lines
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Sum production per `(commodity, year)` over the selected years and
/// commodities. Absent values contribute 0, so a group whose values are all
/// absent still appears with a total of 0.
pub fn aggregate_series(dataset: &Dataset, filter: &FilterSpec) -> AggregatedSeries {
    let mut totals: BTreeMap<(Commodity, i32), f64> = BTreeMap::new();

    for rec in dataset.records().iter().filter(|r| {
        filter.year_range.contains(r.year) && filter.commodities.contains(&r.commodity)
    }) {
        *totals.entry((rec.commodity, rec.year)).or_insert(0.0) += rec.production.unwrap_or(0.0);
    }

    AggregatedSeries {
        points: totals
            .into_iter()
            .map(|((commodity, year), total)| SeriesPoint {
                commodity,
                year,
                total,
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Top-N ranking of states for a single year
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct RankingRow {
    pub state: String,
    pub commodity: Commodity,
    pub total: f64,
}

/// The best producing (state, commodity) pairs for the resolved year.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ranking {
    /// `None` when no record carries any of the selected commodities.
    pub year: Option<i32>,
    pub rows: Vec<RankingRow>,
}

/// Latest year present for any of the selected commodities.
pub fn last_year_with_data(dataset: &Dataset, filter: &FilterSpec) -> Option<i32> {
    dataset
        .records()
        .iter()
        .filter(|r| filter.commodities.contains(&r.commodity))
        .map(|r| r.year)
        .max()
}

/// The year to rank: the end of the selected range, pulled back to the last
/// year that actually has data for the selected commodities.
pub fn resolve_ranking_year(dataset: &Dataset, filter: &FilterSpec) -> Option<i32> {
    let last = last_year_with_data(dataset, filter)?;
    if filter.year_range.end > last {
        log::warn!(
            "No {} data after {last}; ranking {last} instead of {}",
            filter.commodity_label(),
            filter.year_range.end
        );
        Some(last)
    } else {
        Some(filter.year_range.end)
    }
}

/// Rank `(state, commodity)` totals for the resolved year, largest first,
/// keeping at most [`TOP_N`] rows.
///
/// Groups whose values are all absent are dropped. Equal totals keep the
/// group key order, i.e. state ascending then commodity ascending.
pub fn top_states(dataset: &Dataset, filter: &FilterSpec) -> Ranking {
    let Some(year) = resolve_ranking_year(dataset, filter) else {
        return Ranking::default();
    };

    let mut groups: BTreeMap<(&str, Commodity), Option<f64>> = BTreeMap::new();
    for rec in dataset
        .records()
        .iter()
        .filter(|r| r.year == year && filter.commodities.contains(&r.commodity))
    {
        let total = groups.entry((rec.state.as_str(), rec.commodity)).or_insert(None);
        if let Some(v) = rec.production {
            *total = Some(total.unwrap_or(0.0) + v);
        }
    }

    let mut rows: Vec<RankingRow> = groups
        .into_iter()
        .filter_map(|((state, commodity), total)| {
            total.map(|total| RankingRow {
                state: state.to_string(),
                commodity,
                total,
            })
        })
        .collect();
    // Stable: ties stay in key order.
    rows.sort_by(|a, b| b.total.total_cmp(&a.total));
    rows.truncate(TOP_N);

    Ranking {
        year: Some(year),
        rows,
    }
}

// ---------------------------------------------------------------------------
// Table / export rows
// ---------------------------------------------------------------------------

/// Ordering shared by the table and the CSV export:
/// state ascending, year descending, commodity ascending.
pub fn table_order(a: &ProductionRecord, b: &ProductionRecord) -> std::cmp::Ordering {
    a.state
        .cmp(&b.state)
        .then(b.year.cmp(&a.year))
        .then(a.commodity.cmp(&b.commodity))
}

/// Records matching every part of the filter that carry a production value,
/// in [`table_order`].
pub fn select_rows(dataset: &Dataset, filter: &FilterSpec) -> Vec<ProductionRecord> {
    let mut rows: Vec<ProductionRecord> = dataset
        .records()
        .iter()
        .filter(|r| {
            r.production.is_some()
                && filter.states.contains(&r.state)
                && filter.year_range.contains(r.year)
                && filter.commodities.contains(&r.commodity)
        })
        .cloned()
        .collect();
    rows.sort_by(table_order);
    rows
}
