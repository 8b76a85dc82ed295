use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>, state: AppState) -> Self {
        cc.egui_ctx.set_visuals(panels::visuals(state.dark_mode));
        Self { state }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title, counts, theme ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: trend on top, ranking and table below ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let trend_height = plot::chart_height(ui, 0.4);
            plot::line_chart(ui, &self.state, trend_height);
            ui.separator();

            let lower_height = plot::chart_height(ui, 0.85);
            ui.columns(2, |cols| {
                plot::bar_chart(&mut cols[0], &self.state, lower_height);
                table::data_table(&mut cols[1], &mut self.state);
            });
        });
    }
}
