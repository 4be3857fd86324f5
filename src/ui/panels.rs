use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::analysis::aggregate::Standing;
use crate::color::{difficulty_color, standing_color};
use crate::data::model::ExamRecord;
use crate::state::{AppState, StatusLevel, Tab};
use crate::ui::export;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the toolbar and the tab strip.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Export chart…").clicked() {
                export::request_chart_export(ui.ctx(), state);
                ui.close_menu();
            }
        });

        if ui.button("🔄 Refresh").clicked() {
            state.refresh();
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
            let file = state
                .current_file_name()
                .map(|name| format!("File: {name}"))
                .unwrap_or_else(|| "No file loaded".to_string());
            ui.label(file);
        });
    });

    ui.separator();

    ui.horizontal(|ui: &mut Ui| {
        for tab in Tab::ALL {
            ui.selectable_value(&mut state.active_tab, tab, tab.label());
        }
    });
}

/// Render the status line at the bottom of the window.
pub fn status_bar(ui: &mut Ui, state: &AppState) {
    match &state.status {
        Some(status) => {
            let color = match status.level {
                StatusLevel::Info => ui.visuals().text_color(),
                StatusLevel::Warning => Color32::from_rgb(230, 160, 0),
                StatusLevel::Error => Color32::RED,
            };
            ui.label(RichText::new(status.text.as_str()).color(color));
        }
        None => {
            ui.label("Ready");
        }
    }
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open exam results")
        .add_filter("JSON", &["json"])
        .add_filter("All files", &["*"])
        .pick_file();

    if let Some(path) = file {
        state.load_file(&path);
    }
}

fn no_data(ui: &mut Ui) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading("No data loaded  (File → Open…)");
    });
}

// ---------------------------------------------------------------------------
// Summary tab
// ---------------------------------------------------------------------------

pub fn summary_tab(ui: &mut Ui, state: &AppState) {
    if !state.session.is_loaded() {
        no_data(ui);
        return;
    }

    ui.heading("Descriptive statistics");
    ui.add_space(12.0);

    let s = &state.snapshot.summary;
    let mut cards: Vec<(String, String)> = vec![
        ("Students".into(), s.record_count.to_string()),
        ("Exam variants".into(), s.exam_variant_count.to_string()),
        ("Mean score".into(), format!("{:.2}", s.mean)),
        ("Highest score".into(), s.max.to_string()),
        ("Lowest score".into(), s.min.to_string()),
        ("Standard deviation".into(), format!("{:.2}", s.stddev)),
    ];
    for &(p, value) in &state.snapshot.percentiles {
        let label = if p == 0.5 {
            "Percentile 50 (median)".to_string()
        } else {
            format!("Percentile {:.0}", p * 100.0)
        };
        cards.push((label, format!("{value:.2}")));
    }

    egui::Grid::new("summary_cards")
        .num_columns(3)
        .spacing([12.0, 12.0])
        .show(ui, |ui: &mut Ui| {
            for (i, (label, value)) in cards.iter().enumerate() {
                egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
                    ui.set_min_width(200.0);
                    ui.vertical_centered(|ui: &mut Ui| {
                        ui.label(RichText::new(value.as_str()).size(20.0).strong());
                        ui.label(label.as_str());
                    });
                });
                if i % 3 == 2 {
                    ui.end_row();
                }
            }
        });

    ui.add_space(12.0);
    ui.label(format!("Exam variants: {}", s.exam_variants.join(", ")));
}

// ---------------------------------------------------------------------------
// Questions table
// ---------------------------------------------------------------------------

pub fn questions_table(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Per-question accuracy");
        if ui.small_button("Export CSV…").clicked() {
            export::export_questions_dialog(state);
        }
    });

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(60.0))
        .column(Column::auto().at_least(70.0))
        .column(Column::auto().at_least(60.0))
        .column(Column::auto().at_least(90.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for title in ["Question", "Correct", "Total", "Accuracy", "Difficulty"] {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for q in &state.snapshot.questions {
                body.row(18.0, |mut row| {
                    row.col(|ui: &mut Ui| {
                        ui.label(q.key.as_str());
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(q.correct_count.to_string());
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(q.total_count.to_string());
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(format!("{:.1}%", q.accuracy_percent));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(
                            RichText::new(q.difficulty.label())
                                .color(difficulty_color(q.difficulty)),
                        );
                    });
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Students tab
// ---------------------------------------------------------------------------

pub fn students_tab(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Find student:");
        let response = ui.add(
            egui::TextEdit::singleline(&mut state.search_term)
                .hint_text("code or name")
                .desired_width(200.0),
        );
        let submitted =
            response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("Search").clicked() || submitted {
            state.search();
        }
    });
    ui.separator();

    let Some(results) = &state.search_results else {
        ui.label("Enter a student code or name to search.");
        return;
    };
    if results.is_empty() {
        ui.label("No students found.");
        return;
    }

    let agg = state.aggregator();
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for record in results {
                let delta = agg.score_delta_from_mean(record);
                student_card(ui, record, delta);
            }
        });
}

fn student_card(ui: &mut Ui, record: &ExamRecord, delta: f64) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_width(ui.available_width());
        ui.strong(format!("Code: {}", record.code));
        ui.label(RichText::new(format!("Name: {}", record.full_name)).strong());
        ui.label(format!("Exam: {}", record.exam));
        ui.label(format!("Score: {}", record.score));
        ui.label(format!(
            "Correct: {} | Incorrect: {}",
            record.correct, record.incorrect
        ));
        let color = standing_color(Standing::from_delta(delta));
        ui.label(RichText::new(format!("Difference from mean: {delta:+.2}")).color(color));
    });
    ui.add_space(4.0);
}
