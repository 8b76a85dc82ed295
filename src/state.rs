use std::collections::BTreeSet;
use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::data::aggregate::{aggregate_series, select_rows, top_states, AggregatedSeries, Ranking};
use crate::data::filter::{FilterSpec, YearRange};
use crate::data::model::{normalize_state, Commodity, Dataset, ProductionRecord};
use crate::export::{self, Download};

/// Rows per table page.
pub const TABLE_PAGE_SIZE: usize = 10;

// ---------------------------------------------------------------------------
// Raw widget selection
// ---------------------------------------------------------------------------

/// What the widgets currently show, before defaults are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub commodities: BTreeSet<Commodity>,
    pub states: BTreeSet<String>,
    pub year_range: YearRange,
}

// ---------------------------------------------------------------------------
// Derived views
// ---------------------------------------------------------------------------

/// Every view the dashboard renders, computed from the base table and one
/// selection.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedViews {
    pub filter: FilterSpec,
    pub series: AggregatedSeries,
    pub ranking: Ranking,
    pub rows: Vec<ProductionRecord>,
}

impl DerivedViews {
    /// The three views are independent, so they are computed in parallel.
    pub fn compute(dataset: &Dataset, selection: &Selection) -> Self {
        let filter = FilterSpec::resolve(
            dataset,
            &selection.commodities,
            &selection.states,
            selection.year_range,
        );
        let (series, (ranking, rows)) = rayon::join(
            || aggregate_series(dataset, &filter),
            || {
                rayon::join(
                    || top_states(dataset, &filter),
                    || select_rows(dataset, &filter),
                )
            },
        );
        log::debug!(
            "Recomputed views: {} series points, {} ranked, {} table rows",
            series.points().len(),
            ranking.rows.len(),
            rows.len()
        );
        DerivedViews {
            filter,
            series,
            ranking,
            rows,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Base table, loaded once at startup.
    pub dataset: Arc<Dataset>,

    /// Current widget values.
    pub selection: Selection,

    /// Views for the current selection (recomputed on every change).
    pub views: DerivedViews,

    /// Zero-based page of the data table.
    pub table_page: usize,

    /// Text typed into the state search box.
    pub state_search: String,

    pub dark_mode: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(dataset: Arc<Dataset>, config: &DashboardConfig) -> Self {
        let known_states: BTreeSet<&str> = dataset.states().iter().map(|s| s.as_str()).collect();
        let states: BTreeSet<String> = config
            .initial_states
            .iter()
            .map(|s| normalize_state(s))
            .filter(|s| known_states.contains(s.as_str()))
            .collect();

        let start = config
            .initial_year_start
            .clamp(dataset.min_year(), dataset.max_year());
        let selection = Selection {
            commodities: config.commodities().into_iter().collect(),
            states,
            year_range: YearRange::new(start, dataset.max_year()),
        };
        let views = DerivedViews::compute(&dataset, &selection);

        Self {
            dataset,
            selection,
            views,
            table_page: 0,
            state_search: String::new(),
            dark_mode: config.dark_mode,
            status_message: None,
        }
    }

    /// Recompute every view after a selection change.
    pub fn refresh(&mut self) {
        self.views = DerivedViews::compute(&self.dataset, &self.selection);
        self.table_page = 0;
    }

    pub fn toggle_commodity(&mut self, commodity: Commodity) {
        if !self.selection.commodities.remove(&commodity) {
            self.selection.commodities.insert(commodity);
        }
        self.refresh();
    }

    pub fn toggle_state(&mut self, state: &str) {
        if !self.selection.states.remove(state) {
            self.selection.states.insert(state.to_string());
        }
        self.refresh();
    }

    pub fn clear_states(&mut self) {
        self.selection.states.clear();
        self.refresh();
    }

    /// Move the start of the range, dragging the end along if needed.
    pub fn set_year_start(&mut self, year: i32) {
        let year = year.clamp(self.dataset.min_year(), self.dataset.max_year());
        let range = &mut self.selection.year_range;
        range.start = year;
        range.end = range.end.max(year);
        self.refresh();
    }

    /// Move the end of the range, dragging the start along if needed.
    pub fn set_year_end(&mut self, year: i32) {
        let year = year.clamp(self.dataset.min_year(), self.dataset.max_year());
        let range = &mut self.selection.year_range;
        range.end = year;
        range.start = range.start.min(year);
        self.refresh();
    }

    // -- Table pagination --

    pub fn page_count(&self) -> usize {
        self.views.rows.len().div_ceil(TABLE_PAGE_SIZE).max(1)
    }

    pub fn page_rows(&self) -> &[ProductionRecord] {
        let start = (self.table_page * TABLE_PAGE_SIZE).min(self.views.rows.len());
        let end = (start + TABLE_PAGE_SIZE).min(self.views.rows.len());
        &self.views.rows[start..end]
    }

    pub fn next_page(&mut self) {
        self.table_page = (self.table_page + 1).min(self.page_count() - 1);
    }

    pub fn prev_page(&mut self) {
        self.table_page = self.table_page.saturating_sub(1);
    }

    /// Export the current table rows when `triggered`.
    pub fn export_request(&self, triggered: bool) -> Result<Option<Download>, csv::Error> {
        export::download(triggered, &self.views.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Arc<Dataset> {
        let mut records = Vec::new();
        for state in ["ALASKA", "CALIFORNIA", "IDAHO", "NEW YORK", "WISCONSIN"] {
            for year in 1995..=2005 {
                records.push(ProductionRecord::new(state, year, Commodity::Milk, Some(year as f64)));
                records.push(ProductionRecord::new(state, year, Commodity::Honey, Some(1.0)));
                records.push(ProductionRecord::new(state, year, Commodity::Yogurt, None));
            }
        }
        Arc::new(Dataset::from_records(records).unwrap())
    }

    #[test]
    fn initial_selection_comes_from_config() {
        let config = DashboardConfig {
            initial_states: vec!["california".into(), "GUAM".into(), "NEW YORK".into()],
            ..Default::default()
        };
        let state = AppState::new(dataset(), &config);

        assert_eq!(
            state.selection.commodities,
            BTreeSet::from([Commodity::Honey, Commodity::Yogurt])
        );
        assert_eq!(
            state.selection.states,
            BTreeSet::from(["CALIFORNIA".to_string(), "NEW YORK".to_string()])
        );
        assert_eq!(state.selection.year_range, YearRange::new(2000, 2005));
        // Yogurt has no values, so only honey shows up in the table.
        assert_eq!(state.views.rows.len(), 2 * 6);
        assert_eq!(state.views.ranking.year, Some(2005));
    }

    #[test]
    fn initial_year_start_is_clamped() {
        let config = DashboardConfig {
            initial_year_start: 1900,
            ..Default::default()
        };
        let state = AppState::new(dataset(), &config);
        assert_eq!(state.selection.year_range, YearRange::new(1995, 2005));
    }

    #[test]
    fn toggles_recompute_views() {
        let mut state = AppState::new(dataset(), &DashboardConfig::default());
        state.toggle_commodity(Commodity::Milk);
        assert!(state.views.filter.commodities.contains(&Commodity::Milk));
        assert!(state.views.series.get(Commodity::Milk, 2001).is_some());

        state.toggle_commodity(Commodity::Milk);
        assert!(!state.views.filter.commodities.contains(&Commodity::Milk));

        state.toggle_state("IDAHO");
        assert!(state.views.rows.iter().any(|r| r.state == "IDAHO"));
    }

    #[test]
    fn clearing_everything_falls_back_to_defaults() {
        let mut state = AppState::new(dataset(), &DashboardConfig::default());
        for c in state.selection.commodities.clone() {
            state.toggle_commodity(c);
        }
        state.clear_states();

        let filter = &state.views.filter;
        assert_eq!(filter.commodities, BTreeSet::from([Commodity::Honey, Commodity::Yogurt]));
        let states: Vec<&str> = filter.states.iter().map(|s| s.as_str()).collect();
        assert_eq!(states, ["ALASKA", "CALIFORNIA", "IDAHO"]);
    }

    #[test]
    fn year_bounds_never_cross() {
        let mut state = AppState::new(dataset(), &DashboardConfig::default());
        state.set_year_end(1997);
        assert_eq!(state.selection.year_range, YearRange::new(1997, 1997));
        state.set_year_start(2003);
        assert_eq!(state.selection.year_range, YearRange::new(2003, 2003));
        state.set_year_end(2100);
        assert_eq!(state.selection.year_range, YearRange::new(2003, 2005));
    }

    #[test]
    fn pagination_walks_the_rows() {
        let mut state = AppState::new(dataset(), &DashboardConfig::default());
        state.toggle_commodity(Commodity::Milk);
        // 3 states × 6 years × 2 commodities with values
        assert_eq!(state.views.rows.len(), 36);
        assert_eq!(state.page_count(), 4);
        assert_eq!(state.page_rows().len(), TABLE_PAGE_SIZE);

        for _ in 0..10 {
            state.next_page();
        }
        assert_eq!(state.table_page, 3);
        assert_eq!(state.page_rows().len(), 6);

        state.prev_page();
        assert_eq!(state.table_page, 2);
        state.toggle_state("IDAHO");
        assert_eq!(state.table_page, 0);
    }

    #[test]
    fn export_uses_current_rows() {
        let state = AppState::new(dataset(), &DashboardConfig::default());
        assert!(state.export_request(false).unwrap().is_none());
        let dl = state.export_request(true).unwrap().unwrap();
        assert_eq!(dl.bytes, export::to_csv(&state.views.rows).unwrap());
    }
}
