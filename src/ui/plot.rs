use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, Points};

use crate::color::commodity_color;
use crate::data::aggregate::Ranking;
use crate::data::model::Commodity;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Production trend (line chart)
// ---------------------------------------------------------------------------

/// National totals per commodity over the selected years.
pub fn line_chart(ui: &mut Ui, state: &AppState, height: f32) {
    let views = &state.views;
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(format!("{} Production by Year", views.filter.commodity_label()));
        if views.series.is_empty() {
            ui.weak("No records in the selected years");
        }
    });

    Plot::new("line_chart")
        .legend(Legend::default())
        .height(height)
        .x_axis_label("Year")
        .y_axis_label("Production (USD)")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (commodity, points) in views.series.by_commodity() {
                let color = commodity_color(commodity);
                plot_ui.line(
                    Line::new(PlotPoints::from(points.clone()))
                        .name(commodity.as_str())
                        .color(color)
                        .width(2.0),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .name(commodity.as_str())
                        .color(color)
                        .radius(4.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Top states (stacked bar chart)
// ---------------------------------------------------------------------------

/// Bars of a ranking grouped for stacking: one x slot per state (in ranking
/// order) and, per commodity, one value per slot (0 where the pair is absent).
#[derive(Debug, Clone, PartialEq)]
pub struct BarLayout {
    pub states: Vec<String>,
    pub stacks: Vec<(Commodity, Vec<f64>)>,
}

pub fn bar_layout(ranking: &Ranking) -> BarLayout {
    let mut states: Vec<String> = Vec::new();
    for row in &ranking.rows {
        if !states.contains(&row.state) {
            states.push(row.state.clone());
        }
    }

    let mut commodities: Vec<Commodity> = ranking.rows.iter().map(|r| r.commodity).collect();
    commodities.sort();
    commodities.dedup();

    let stacks = commodities
        .into_iter()
        .map(|commodity| {
            let values = states
                .iter()
                .map(|state| {
                    ranking
                        .rows
                        .iter()
                        .find(|r| r.commodity == commodity && &r.state == state)
                        .map_or(0.0, |r| r.total)
                })
                .collect();
            (commodity, values)
        })
        .collect();

    BarLayout { states, stacks }
}

/// Top ten (state, commodity) producers for the resolved year.
pub fn bar_chart(ui: &mut Ui, state: &AppState, height: f32) {
    let views = &state.views;
    let title = match views.ranking.year {
        Some(year) => format!(
            "Top 10 States - {} Production ({year})",
            views.filter.commodity_label()
        ),
        None => format!("No {} data", views.filter.commodity_label()),
    };
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(title);
    });

    let layout = bar_layout(&views.ranking);
    let labels = layout.states.clone();

    Plot::new("bar_chart")
        .legend(Legend::default())
        .height(height)
        .y_axis_label("Production (USD)")
        .allow_scroll(false)
        .allow_drag(false)
        .x_axis_formatter(move |mark: GridMark, _range| {
            let slot = mark.value.round();
            if (mark.value - slot).abs() > 1e-6 || slot < 0.0 {
                return String::new();
            }
            labels.get(slot as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            let mut charts: Vec<BarChart> = Vec::with_capacity(layout.stacks.len());
            for (commodity, values) in &layout.stacks {
                let bars = values
                    .iter()
                    .enumerate()
                    .map(|(slot, value)| {
                        Bar::new(slot as f64, *value)
                            .width(0.7)
                            .name(&layout.states[slot])
                    })
                    .collect();
                let below: Vec<&BarChart> = charts.iter().collect();
                let chart = BarChart::new(bars)
                    .name(commodity.as_str())
                    .color(commodity_color(*commodity))
                    .stack_on(&below);
                charts.push(chart);
            }
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

/// Split the remaining height between the two chart rows.
pub fn chart_height(ui: &Ui, share: f32) -> f32 {
    (ui.available_height() * share).max(160.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::RankingRow;

    fn row(state: &str, commodity: Commodity, total: f64) -> RankingRow {
        RankingRow {
            state: state.to_string(),
            commodity,
            total,
        }
    }

    #[test]
    fn layout_stacks_commodities_per_state() {
        let ranking = Ranking {
            year: Some(2020),
            rows: vec![
                row("TEXAS", Commodity::Milk, 90.0),
                row("OHIO", Commodity::Honey, 40.0),
                row("TEXAS", Commodity::Honey, 30.0),
            ],
        };
        let layout = bar_layout(&ranking);
        assert_eq!(layout.states, ["TEXAS", "OHIO"]);
        assert_eq!(
            layout.stacks,
            vec![
                (Commodity::Honey, vec![30.0, 40.0]),
                (Commodity::Milk, vec![90.0, 0.0]),
            ]
        );
    }

    #[test]
    fn empty_ranking_has_empty_layout() {
        let layout = bar_layout(&Ranking::default());
        assert!(layout.states.is_empty());
        assert!(layout.stacks.is_empty());
    }
}
