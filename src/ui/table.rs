use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::commodity_text_color;
use crate::data::loader::COLUMNS;
use crate::state::AppState;
use crate::ui::panels;

/// Whole-number rendering with thousands separators, e.g. `1,234,567`.
pub fn format_thousands(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0.0 && digits != "0" {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Paginated table of the filtered rows with the CSV download button.
pub fn data_table(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading("Filtered Data From Selected States");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
            let clicked = ui.button("Download CSV").clicked();
            panels::export_csv(state, clicked);
        });
    });

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("◀").clicked() {
            state.prev_page();
        }
        ui.label(format!(
            "Page {} of {}  ({} rows)",
            state.table_page + 1,
            state.page_count(),
            state.views.rows.len()
        ));
        if ui.small_button("▶").clicked() {
            state.next_page();
        }
    });

    let dark_mode = state.dark_mode;
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::auto().at_least(120.0))
        .column(Column::auto().at_least(50.0))
        .column(Column::auto().at_least(80.0))
        .column(Column::remainder().at_least(100.0))
        .header(20.0, |mut header| {
            for name in COLUMNS {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|mut body| {
            for rec in state.page_rows() {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(rec.state.as_str());
                    });
                    row.col(|ui| {
                        ui.label(rec.year.to_string());
                    });
                    row.col(|ui| {
                        ui.label(
                            RichText::new(rec.commodity.as_str())
                                .color(commodity_text_color(rec.commodity, dark_mode)),
                        );
                    });
                    row.col(|ui| {
                        ui.label(rec.production.map(format_thousands).unwrap_or_default());
                    });
                });
            }
        });
}
