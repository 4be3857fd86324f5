use std::path::PathBuf;

use clap::Parser;

// ---------------------------------------------------------------------------
// Command-line options
// ---------------------------------------------------------------------------

/// Exam Analytics – descriptive statistics and charts for exam results.
///
/// Examples:
///   exam-analytics
///   exam-analytics --file results.json
///   exam-analytics --file results.json --questions 40 --min-cohort-size 3
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON file with exam results to open at startup
    #[arg(short, long, value_name = "PATH", env = "EXAM_ANALYTICS_FILE")]
    pub file: Option<PathBuf>,

    /// Number of questions per exam (keys Q1..QN)
    #[arg(
        short,
        long,
        default_value_t = 20,
        value_name = "COUNT",
        env = "EXAM_ANALYTICS_QUESTIONS",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub questions: u32,

    /// Cohorts with fewer students than this are left out of the cohort chart
    #[arg(long, default_value_t = 5, value_name = "COUNT")]
    pub min_cohort_size: usize,

    /// Number of bins in the score histogram
    #[arg(
        long,
        default_value_t = 20,
        value_name = "COUNT",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub bins: u32,
}

impl Cli {
    pub fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            question_keys: question_keys(self.questions as usize),
            min_cohort_size: self.min_cohort_size,
            histogram_bins: self.bins as usize,
            ..AnalysisConfig::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Analysis parameters
// ---------------------------------------------------------------------------

/// Parameters shared by every aggregation over a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Question keys compared in the per-question analysis, in display order.
    pub question_keys: Vec<String>,
    /// Number of leading characters of a student code that form the cohort.
    pub cohort_prefix_len: usize,
    /// Cohorts smaller than this are excluded.
    pub min_cohort_size: usize,
    /// Accuracy ratio strictly above which a question is easy.
    pub easy_ratio: f64,
    /// Accuracy ratio strictly below which a question is hard.
    pub hard_ratio: f64,
    pub histogram_bins: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            question_keys: question_keys(20),
            cohort_prefix_len: 4,
            min_cohort_size: 5,
            easy_ratio: 0.7,
            hard_ratio: 0.3,
            histogram_bins: 20,
        }
    }
}

/// `Q1..Qn`.
pub fn question_keys(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("Q{i}")).collect()
}
