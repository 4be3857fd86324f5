use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use eframe::egui::{self, ColorImage};

use crate::analysis::aggregate::QuestionStat;
use crate::state::{AppState, StatusLevel};

// ---------------------------------------------------------------------------
// Chart export (PNG)
// ---------------------------------------------------------------------------

/// Ask for a destination and request a screenshot of the current chart.
///
/// The screenshot itself is sent at the start of the next frame by
/// [`send_pending_screenshot`], once the menu is gone. The image arrives as
/// an `Event::Screenshot` and is written by [`finish_chart_export`].
pub fn request_chart_export(ctx: &egui::Context, state: &mut AppState) {
    if !state.session.is_loaded() {
        state.set_status(StatusLevel::Warning, "No data loaded");
        return;
    }
    if !state.active_tab.has_chart() {
        state.set_status(
            StatusLevel::Info,
            "The current tab has no exportable chart",
        );
        return;
    }

    let file = rfd::FileDialog::new()
        .set_title("Save chart")
        .add_filter("PNG", &["png"])
        .set_file_name("chart.png")
        .save_file();

    if let Some(path) = file {
        state.queue_chart_export(path);
        ctx.request_repaint();
    }
}

pub fn send_pending_screenshot(ctx: &egui::Context, state: &mut AppState) {
    if state.take_screenshot_request() {
        ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
    }
}

/// Crop the screenshot to the chart area and save it to the pending path.
pub fn finish_chart_export(state: &mut AppState, screenshot: &ColorImage, pixels_per_point: f32) {
    let Some(path) = state.take_export_target() else {
        return;
    };

    let chart = match state.chart_rect {
        Some(rect) => screenshot.region(&rect, Some(pixels_per_point)),
        None => screenshot.clone(),
    };

    match write_png(&chart, &path) {
        Ok(()) => {
            log::info!("Saved chart to {}", path.display());
            state.set_status(StatusLevel::Info, format!("Chart saved to {}", path.display()));
        }
        Err(e) => {
            log::error!("Failed to save chart: {e:#}");
            state.set_status(StatusLevel::Error, format!("Error saving chart: {e:#}"));
        }
    }
}

pub fn write_png(shot: &ColorImage, path: &Path) -> Result<()> {
    let [width, height] = shot.size;
    let bytes: Vec<u8> = shot.pixels.iter().flat_map(|c| c.to_array()).collect();
    let buffer = image::RgbaImage::from_raw(width as u32, height as u32, bytes)
        .context("screenshot buffer does not match its size")?;
    buffer
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Question table export (CSV)
// ---------------------------------------------------------------------------

pub fn export_questions_dialog(state: &mut AppState) {
    if state.snapshot.questions.is_empty() {
        state.set_status(StatusLevel::Warning, "No data loaded");
        return;
    }

    let file: Option<PathBuf> = rfd::FileDialog::new()
        .set_title("Save question analysis")
        .add_filter("CSV", &["csv"])
        .set_file_name("questions.csv")
        .save_file();

    let Some(path) = file else {
        return;
    };
    match write_questions_csv(&state.snapshot.questions, &path) {
        Ok(()) => {
            log::info!("Saved question analysis to {}", path.display());
            state.set_status(StatusLevel::Info, format!("Table saved to {}", path.display()));
        }
        Err(e) => {
            log::error!("Failed to save question analysis: {e:#}");
            state.set_status(StatusLevel::Error, format!("Error saving table: {e:#}"));
        }
    }
}

pub fn write_questions_csv(questions: &[QuestionStat], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    for q in questions {
        writer.serialize(q).with_context(|| format!("writing row {}", q.key))?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::aggregate::Difficulty;

    #[test]
    fn png_has_image_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        let rgba: Vec<u8> = [255u8, 0, 0, 255].repeat(3 * 2);
        let shot = ColorImage::from_rgba_unmultiplied([3, 2], &rgba);

        write_png(&shot, &path).unwrap();

        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (3, 2));
    }

    #[test]
    fn csv_has_header_and_one_row_per_question() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questions.csv");
        let questions = vec![
            QuestionStat {
                key: "Q1".into(),
                correct_count: 8,
                total_count: 10,
                accuracy_percent: 80.0,
                difficulty: Difficulty::Easy,
            },
            QuestionStat {
                key: "Q2".into(),
                correct_count: 1,
                total_count: 10,
                accuracy_percent: 10.0,
                difficulty: Difficulty::Hard,
            },
        ];

        write_questions_csv(&questions, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "question,correct_count,total_count,accuracy_percent,difficulty"
        );
        assert_eq!(lines[1], "Q1,8,10,80.0,Easy");
        assert_eq!(lines[2], "Q2,1,10,10.0,Hard");
        assert_eq!(lines.len(), 3);
    }
}
