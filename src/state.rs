use std::path::{Path, PathBuf};

use eframe::egui::Rect;

use crate::analysis::aggregate::Aggregator;
use crate::analysis::Snapshot;
use crate::color::ColorMap;
use crate::config::AnalysisConfig;
use crate::data::model::ExamRecord;
use crate::data::session::Session;

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Summary,
    Distributions,
    Questions,
    Students,
    Comparisons,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Summary,
        Tab::Distributions,
        Tab::Questions,
        Tab::Students,
        Tab::Comparisons,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Summary => "📊 Summary",
            Tab::Distributions => "📈 Distributions",
            Tab::Questions => "❓ Questions",
            Tab::Students => "🎓 Students",
            Tab::Comparisons => "⚖ Comparisons",
        }
    }

    /// Tabs whose central area is a chart that can be saved as an image.
    pub fn has_chart(self) -> bool {
        matches!(self, Tab::Distributions | Tab::Questions | Tab::Comparisons)
    }
}

// ---------------------------------------------------------------------------
// Status line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub level: StatusLevel,
    pub text: String,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AnalysisConfig,

    /// Current dataset, if any.
    pub session: Session,

    /// Results derived from `session` (cached).
    pub snapshot: Snapshot,

    /// Colour per exam variant.
    pub exam_colors: ColorMap,

    /// File the current dataset came from.
    pub current_file: Option<PathBuf>,

    pub active_tab: Tab,

    /// Contents of the student search box.
    pub search_term: String,

    /// Result of the last search; `None` until the user searches.
    pub search_results: Option<Vec<ExamRecord>>,

    /// Status / error message shown in the UI.
    pub status: Option<Status>,

    /// Screen area of the chart currently shown (for export).
    pub chart_rect: Option<Rect>,

    /// Destination of a requested chart export awaiting its screenshot.
    pending_export: Option<PathBuf>,

    /// Whether the screenshot for `pending_export` has been asked for.
    screenshot_sent: bool,
}

impl AppState {
    pub fn new(config: AnalysisConfig) -> Self {
        let session = Session::default();
        let snapshot = Snapshot::compute(&session, &config);
        Self {
            config,
            session,
            snapshot,
            exam_colors: ColorMap::default(),
            current_file: None,
            active_tab: Tab::default(),
            search_term: String::new(),
            search_results: None,
            status: None,
            chart_rect: None,
            pending_export: None,
            screenshot_sent: false,
        }
    }

    pub fn aggregator(&self) -> Aggregator<'_> {
        Aggregator::new(&self.session, &self.config)
    }

    /// Load a file and make it current. On failure the previous dataset
    /// stays active and the error is shown verbatim.
    pub fn load_file(&mut self, path: &Path) -> bool {
        match self.session.load(path) {
            Ok(count) => {
                log::info!("Loaded {count} records from {}", path.display());
                self.current_file = Some(path.to_path_buf());
                self.search_results = None;
                self.refresh();
                self.set_status(StatusLevel::Info, format!("Loaded {count} records"));
                true
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.set_status(StatusLevel::Error, e.to_string());
                false
            }
        }
    }

    /// Recompute every derived view from the current session.
    pub fn refresh(&mut self) {
        self.snapshot = Snapshot::compute(&self.session, &self.config);
        self.exam_colors = ColorMap::new(&self.snapshot.summary.exam_variants);
        log::debug!(
            "Recomputed analysis: {} records, {} questions, {} cohorts",
            self.snapshot.summary.record_count,
            self.snapshot.questions.len(),
            self.snapshot.cohorts.len()
        );
    }

    /// Run the student search from the search box.
    pub fn search(&mut self) {
        if !self.session.is_loaded() {
            self.set_status(StatusLevel::Warning, "Load a data file first");
            return;
        }
        let term = self.search_term.trim().to_string();
        if term.is_empty() {
            self.set_status(StatusLevel::Warning, "Enter a code or name to search");
            return;
        }
        let results: Vec<ExamRecord> = self
            .aggregator()
            .find_students(&term)
            .into_iter()
            .cloned()
            .collect();
        log::info!("Search {term:?}: {} matches", results.len());
        self.search_results = Some(results);
    }

    /// Remember where the next chart screenshot goes.
    pub fn queue_chart_export(&mut self, path: PathBuf) {
        self.pending_export = Some(path);
        self.screenshot_sent = false;
    }

    /// True exactly once per queued export.
    ///
    /// Called at the start of a frame, so the screenshot is taken after the
    /// menu that queued the export has closed.
    pub fn take_screenshot_request(&mut self) -> bool {
        if self.pending_export.is_some() && !self.screenshot_sent {
            self.screenshot_sent = true;
            return true;
        }
        false
    }

    /// The destination for an arrived screenshot, if one was asked for.
    pub fn take_export_target(&mut self) -> Option<PathBuf> {
        if !self.screenshot_sent {
            return None;
        }
        self.screenshot_sent = false;
        self.pending_export.take()
    }

    pub fn set_status(&mut self, level: StatusLevel, text: impl Into<String>) {
        let text = text.into();
        if level == StatusLevel::Warning {
            log::warn!("{text}");
        }
        self.status = Some(Status { level, text });
    }

    /// File name of the current dataset for the top bar.
    pub fn current_file_name(&self) -> Option<String> {
        self.current_file
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn rows(n: usize) -> String {
        let items: Vec<String> = (0..n)
            .map(|i| {
                format!(
                    r#"{{"codigo": "2019{i:06}", "apellidos_nombres": "ALUMNO {i}",
                        "examen": "A", "correctas": 10, "incorrectas": 10,
                        "nota": {}, "respuestas_estudiante": {{"Q1": "A"}},
                        "respuestas_correctas": {{"Q1": "A"}}}}"#,
                    10 + i
                )
            })
            .collect();
        format!("[{}]", items.join(","))
    }

    #[test]
    fn load_refreshes_snapshot() {
        let file = write_temp(&rows(6));
        let mut state = AppState::new(AnalysisConfig::default());
        assert!(state.load_file(file.path()));

        assert_eq!(state.snapshot.summary.record_count, 6);
        assert_eq!(state.snapshot.questions.len(), 20);
        assert_eq!(state.snapshot.cohorts.len(), 1);
        assert_eq!(state.status.as_ref().map(|s| s.level), Some(StatusLevel::Info));
        assert!(state.current_file_name().is_some());
    }

    #[test]
    fn failed_load_keeps_previous_results() {
        let good = write_temp(&rows(3));
        let bad = write_temp("not json");
        let mut state = AppState::new(AnalysisConfig::default());
        state.load_file(good.path());
        let snapshot = state.snapshot.clone();

        assert!(!state.load_file(bad.path()));
        assert_eq!(state.snapshot, snapshot);
        assert_eq!(state.current_file.as_deref(), Some(good.path()));
        assert_eq!(state.status.as_ref().map(|s| s.level), Some(StatusLevel::Error));
    }

    #[test]
    fn blank_search_is_a_warning() {
        let file = write_temp(&rows(3));
        let mut state = AppState::new(AnalysisConfig::default());
        state.load_file(file.path());

        state.search_term = "   ".into();
        state.search();
        assert!(state.search_results.is_none());
        assert_eq!(state.status.as_ref().map(|s| s.level), Some(StatusLevel::Warning));

        state.search_term = "alumno 1".into();
        state.search();
        assert_eq!(state.search_results.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn chart_screenshot_waits_for_next_frame() {
        let mut state = AppState::new(AnalysisConfig::default());
        assert!(!state.take_screenshot_request());

        state.queue_chart_export(PathBuf::from("chart.png"));
        // a screenshot arriving before the request belongs to nobody
        assert_eq!(state.take_export_target(), None);

        assert!(state.take_screenshot_request());
        assert!(!state.take_screenshot_request());
        assert_eq!(state.take_export_target(), Some(PathBuf::from("chart.png")));
        assert_eq!(state.take_export_target(), None);
        assert!(!state.take_screenshot_request());
    }

    #[test]
    fn search_without_data_is_a_warning() {
        let mut state = AppState::new(AnalysisConfig::default());
        state.search_term = "x".into();
        state.search();
        assert!(state.search_results.is_none());
        assert_eq!(state.status.as_ref().map(|s| s.level), Some(StatusLevel::Warning));
    }
}
