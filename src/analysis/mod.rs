/// Analysis layer: statistics over the current session.
///
/// `stats` holds the numeric primitives, `aggregate` the exam-specific
/// views built on them. [`Snapshot`] bundles everything the charts need so
/// the UI recomputes once per load instead of once per frame.

pub mod aggregate;
pub mod stats;

use aggregate::{Aggregator, CohortStat, ExamDistribution, QuestionStat, SummaryStat};
use stats::Histogram;

use crate::config::AnalysisConfig;
use crate::data::session::Session;

/// Precomputed results for every view of the current session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub summary: SummaryStat,
    pub percentiles: Vec<(f64, f64)>,
    pub questions: Vec<QuestionStat>,
    pub cohorts: Vec<CohortStat>,
    pub distributions: Vec<ExamDistribution>,
    pub histogram: Histogram,
}

impl Snapshot {
    pub fn compute(session: &Session, config: &AnalysisConfig) -> Self {
        let agg = Aggregator::new(session, config);
        Snapshot {
            summary: agg.summary(),
            percentiles: agg.percentiles(),
            questions: agg.question_analysis(),
            cohorts: agg.cohort_performance(),
            distributions: agg.exam_distributions(),
            histogram: agg.histogram(),
        }
    }
}
