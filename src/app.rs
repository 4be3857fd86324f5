use eframe::egui;

use crate::config::AnalysisConfig;
use crate::state::{AppState, Tab};
use crate::ui::{export, panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ExamAnalyticsApp {
    pub state: AppState,
}

impl ExamAnalyticsApp {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for ExamAnalyticsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Screenshot requested by a chart export ----
        let screenshot = ctx.input(|i| {
            i.raw.events.iter().find_map(|e| match e {
                egui::Event::Screenshot { image, .. } => Some(image.clone()),
                _ => None,
            })
        });
        if let Some(image) = screenshot {
            export::finish_chart_export(&mut self.state, &image, ctx.pixels_per_point());
        }
        export::send_pending_screenshot(ctx, &mut self.state);

        // ---- Top panel: toolbar + tabs ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Bottom panel: status line ----
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            panels::status_bar(ui, &self.state);
        });

        // ---- Central panel: active tab ----
        let central = egui::CentralPanel::default().show(ctx, |ui| {
            let state = &mut self.state;
            match state.active_tab {
                Tab::Summary => panels::summary_tab(ui, state),
                Tab::Distributions => plot::score_histogram(ui, state),
                Tab::Questions => {
                    let height = ui.available_height() * 0.55;
                    plot::question_difficulty(ui, state, height);
                    if state.session.is_loaded() {
                        ui.separator();
                        panels::questions_table(ui, state);
                    }
                }
                Tab::Students => panels::students_tab(ui, state),
                Tab::Comparisons => {
                    if !state.session.is_loaded() {
                        ui.centered_and_justified(|ui| {
                            ui.heading("No data loaded  (File → Open…)");
                        });
                        return;
                    }
                    let height = (ui.available_height() - 60.0).max(200.0) / 2.0;
                    ui.strong("Scores by exam variant");
                    plot::exam_boxplot(ui, state, height);
                    ui.separator();
                    ui.strong("Mean score by cohort");
                    plot::cohort_bars(ui, state, height);
                }
            }
        });

        self.state.chart_rect = Some(central.response.rect);
    }
}
