use eframe::egui::{RichText, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, HLine, Legend, LineStyle, Plot, PlotPoint,
    PlotPoints, Points, Text, VLine,
};

use crate::analysis::aggregate::Difficulty;
use crate::color::{self, difficulty_color};
use crate::state::AppState;

fn no_data(ui: &mut Ui, message: &str) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading(message);
    });
}

/// Label integer x positions with `labels[i]`, leave fractional ticks blank.
fn category_formatter(
    labels: Vec<String>,
) -> impl Fn(egui_plot::GridMark, &std::ops::RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let rounded = mark.value.round();
        if (mark.value - rounded).abs() > 1e-6 || rounded < 0.0 {
            return String::new();
        }
        labels.get(rounded as usize).cloned().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Score histogram (distributions tab)
// ---------------------------------------------------------------------------

pub fn score_histogram(ui: &mut Ui, state: &AppState) {
    if !state.session.is_loaded() {
        no_data(ui, "No data loaded  (File → Open…)");
        return;
    }

    let hist = &state.snapshot.histogram;
    let width = hist.bin_width();
    let bars: Vec<Bar> = hist
        .centers()
        .into_iter()
        .zip(hist.counts.iter())
        .map(|(x, &count)| {
            Bar::new(x, count as f64)
                .width(width)
                .stroke(Stroke::new(1.0, eframe::egui::Color32::BLACK))
        })
        .collect();
    let mean = state.snapshot.summary.mean;

    Plot::new("score_histogram")
        .legend(Legend::default())
        .x_axis_label("Score")
        .y_axis_label("Frequency")
        .include_y(0.0)
        .allow_drag(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .name("Scores")
                    .color(color::HISTOGRAM_FILL),
            );
            plot_ui.vline(
                VLine::new(mean)
                    .name(format!("Mean: {mean:.2}"))
                    .color(color::MEAN_LINE)
                    .style(LineStyle::dashed_loose()),
            );
        });
}

// ---------------------------------------------------------------------------
// Per-question accuracy (questions tab)
// ---------------------------------------------------------------------------

pub fn question_difficulty(ui: &mut Ui, state: &AppState, height: f32) {
    if !state.session.is_loaded() {
        no_data(ui, "No data loaded  (File → Open…)");
        return;
    }

    let questions = &state.snapshot.questions;
    let bars: Vec<Bar> = questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            Bar::new(i as f64, q.accuracy_percent)
                .name(format!("{} ({})", q.key, q.difficulty))
                .fill(difficulty_color(q.difficulty))
                .width(0.7)
        })
        .collect();
    let labels: Vec<String> = questions.iter().map(|q| q.key.clone()).collect();
    let easy = state.config.easy_ratio * 100.0;
    let hard = state.config.hard_ratio * 100.0;

    Plot::new("question_difficulty")
        .height(height)
        .legend(Legend::default())
        .x_axis_label("Question")
        .y_axis_label("Accuracy (%)")
        .x_axis_formatter(category_formatter(labels))
        .include_y(0.0)
        .include_y(100.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Accuracy"));
            plot_ui.hline(
                HLine::new(easy)
                    .name(format!("Easy (>{easy:.0}%)"))
                    .color(difficulty_color(Difficulty::Easy))
                    .style(LineStyle::dashed_loose()),
            );
            plot_ui.hline(
                HLine::new(hard)
                    .name(format!("Hard (<{hard:.0}%)"))
                    .color(difficulty_color(Difficulty::Hard))
                    .style(LineStyle::dashed_loose()),
            );
        });
}

// ---------------------------------------------------------------------------
// Score spread per exam variant (comparisons tab)
// ---------------------------------------------------------------------------

pub fn exam_boxplot(ui: &mut Ui, state: &AppState, height: f32) {
    let distributions = &state.snapshot.distributions;
    let labels: Vec<String> = distributions.iter().map(|d| d.exam.clone()).collect();

    let boxes: Vec<BoxElem> = distributions
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let s = &d.spread;
            let c = state.exam_colors.color_for(&d.exam);
            BoxElem::new(
                i as f64,
                BoxSpread::new(s.lower_whisker, s.q1, s.median, s.q3, s.upper_whisker),
            )
            .name(format!("{} (n = {})", d.exam, d.count))
            .fill(c.gamma_multiply(0.4))
            .stroke(Stroke::new(1.5, c))
            .box_width(0.5)
        })
        .collect();

    let outliers: PlotPoints = distributions
        .iter()
        .enumerate()
        .flat_map(|(i, d)| d.spread.outliers.iter().map(move |&v| [i as f64, v]))
        .collect();

    Plot::new("exam_boxplot")
        .height(height)
        .x_axis_label("Exam variant")
        .y_axis_label("Score")
        .x_axis_formatter(category_formatter(labels))
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(boxes).name("Scores"));
            plot_ui.points(Points::new(outliers).radius(3.0).name("Outliers"));
        });
}

// ---------------------------------------------------------------------------
// Mean score per cohort (comparisons tab)
// ---------------------------------------------------------------------------

pub fn cohort_bars(ui: &mut Ui, state: &AppState, height: f32) {
    let cohorts = &state.snapshot.cohorts;
    if cohorts.is_empty() {
        ui.allocate_ui(eframe::egui::vec2(ui.available_width(), height), |ui: &mut Ui| {
            no_data(ui, "Not enough data for cohort analysis");
        });
        return;
    }

    let labels: Vec<String> = cohorts.iter().map(|c| c.cohort.clone()).collect();
    let bars: Vec<Bar> = cohorts
        .iter()
        .enumerate()
        .map(|(i, c)| {
            Bar::new(i as f64, c.mean_score)
                .name(format!("{} (n = {})", c.cohort, c.count))
                .width(0.6)
        })
        .collect();

    Plot::new("cohort_bars")
        .height(height)
        .x_axis_label("Admission year")
        .y_axis_label("Mean score")
        .x_axis_formatter(category_formatter(labels))
        .include_y(0.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(color::COHORT_FILL));
            for (i, c) in cohorts.iter().enumerate() {
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(i as f64, c.mean_score),
                        RichText::new(format!("{:.1}", c.mean_score)).strong(),
                    )
                    .anchor(eframe::egui::Align2::CENTER_BOTTOM),
                );
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_only_on_integer_ticks() {
        let label_for = category_formatter(vec!["Q1".into(), "Q2".into()]);
        let mark = |value| egui_plot::GridMark {
            value,
            step_size: 0.5,
        };
        assert_eq!(label_for(mark(1.0), &(0.0..=2.0)), "Q2");
        assert_eq!(label_for(mark(0.5), &(0.0..=2.0)), "");
        assert_eq!(label_for(mark(5.0), &(0.0..=2.0)), "");
        assert_eq!(label_for(mark(-1.0), &(0.0..=2.0)), "");
    }
}
