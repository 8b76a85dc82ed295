use std::sync::Arc;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui, Visuals};

use crate::color::commodity_text_color;
use crate::state::AppState;

pub fn visuals(dark_mode: bool) -> Visuals {
    if dark_mode {
        Visuals::dark()
    } else {
        Visuals::light()
    }
}

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    commodity_filter(ui, state);
    ui.separator();
    year_filter(ui, state);
    ui.separator();
    state_filter(ui, state);
}

fn commodity_filter(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Commodities");
    let available = state.dataset.commodities().to_vec();
    for commodity in available {
        let mut checked = state.selection.commodities.contains(&commodity);
        let text = RichText::new(commodity.as_str())
            .color(commodity_text_color(commodity, state.dark_mode));
        if ui.checkbox(&mut checked, text).changed() {
            state.toggle_commodity(commodity);
        }
    }
    if state.selection.commodities.is_empty() {
        ui.label(RichText::new("None selected: showing Honey and Yogurt").weak());
    }
}

fn year_filter(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Year range");
    let bounds = state.dataset.min_year()..=state.dataset.max_year();

    let mut start = state.selection.year_range.start;
    if ui
        .add(egui::Slider::new(&mut start, bounds.clone()).text("from"))
        .changed()
    {
        state.set_year_start(start);
    }

    let mut end = state.selection.year_range.end;
    if ui
        .add(egui::Slider::new(&mut end, bounds).text("to"))
        .changed()
    {
        state.set_year_end(end);
    }
}

fn state_filter(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.strong(format!("States ({})", state.selection.states.len()));
        if ui.small_button("Clear").clicked() {
            state.clear_states();
        }
    });
    if state.selection.states.is_empty() {
        ui.label(RichText::new("None selected: table shows the first three states").weak());
    }

    ui.add(
        egui::TextEdit::singleline(&mut state.state_search).hint_text("Search states…"),
    );

    // The list borrows the dataset while the checkboxes mutate the selection.
    let dataset = Arc::clone(&state.dataset);
    let needle = state.state_search.trim().to_uppercase();

    ScrollArea::vertical()
        .id_salt("state_list")
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for name in dataset.states() {
                if !needle.is_empty() && !name.contains(&needle) {
                    continue;
                }
                let mut checked = state.selection.states.contains(name);
                if ui.checkbox(&mut checked, name.as_str()).changed() {
                    state.toggle_state(name);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.strong("USDA Agricultural Production Dashboard");
        ui.separator();

        ui.label(format!(
            "{} records, {}–{}, {} in table",
            state.dataset.len(),
            state.dataset.min_year(),
            state.dataset.max_year(),
            state.views.rows.len()
        ));

        ui.separator();

        let label = if state.dark_mode { "🌙 Dark" } else { "☀ Light" };
        if ui.selectable_label(state.dark_mode, label).clicked() {
            state.dark_mode = !state.dark_mode;
            ui.ctx().set_visuals(visuals(state.dark_mode));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                ui.visuals().weak_text_color()
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Ask for a destination and write the current table rows there.
///
/// Nothing happens unless `clicked` is set.
pub fn export_csv(state: &mut AppState, clicked: bool) {
    let download = match state.export_request(clicked) {
        Ok(Some(download)) => download,
        Ok(None) => return,
        Err(e) => {
            log::error!("Failed to serialize export: {e}");
            state.status_message = Some(format!("Error: {e}"));
            return;
        }
    };

    let Some(path) = rfd::FileDialog::new()
        .set_title("Export filtered data")
        .set_file_name(download.file_name)
        .add_filter("CSV", &["csv"])
        .save_file()
    else {
        return;
    };

    match download.write_to(&path) {
        Ok(()) => {
            state.status_message = Some(format!(
                "Saved {} rows to {}",
                state.views.rows.len(),
                path.display()
            ));
        }
        Err(e) => {
            log::error!("Failed to write export: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
