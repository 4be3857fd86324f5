use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::stats::{self, BoxSummary, Histogram};
use crate::config::AnalysisConfig;
use crate::data::model::{Dataset, ExamRecord};
use crate::data::session::Session;

/// Cut points shown on the summary tab.
pub const STANDARD_PERCENTILES: [f64; 4] = [0.25, 0.50, 0.75, 0.90];

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Descriptive statistics of `nota` over the whole dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryStat {
    pub record_count: usize,
    pub exam_variant_count: usize,
    /// Distinct exam labels in first-seen order.
    pub exam_variants: Vec<String>,
    pub mean: f64,
    pub max: f64,
    pub min: f64,
    pub stddev: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Difficulty {
    Easy,
    Moderate,
    Hard,
}

impl Difficulty {
    /// Strictly above `easy` is easy, strictly below `hard` is hard.
    pub fn classify(ratio: f64, easy: f64, hard: f64) -> Self {
        if ratio > easy {
            Difficulty::Easy
        } else if ratio < hard {
            Difficulty::Hard
        } else {
            Difficulty::Moderate
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Moderate => "Moderate",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionStat {
    #[serde(rename = "question")]
    pub key: String,
    pub correct_count: usize,
    pub total_count: usize,
    pub accuracy_percent: f64,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CohortStat {
    pub cohort: String,
    pub mean_score: f64,
    pub count: usize,
}

/// Score spread of one exam variant.
#[derive(Debug, Clone, PartialEq)]
pub struct ExamDistribution {
    pub exam: String,
    pub count: usize,
    pub spread: BoxSummary,
}

/// How a student's score compares to the overall mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Standing {
    Favorable,
    Unfavorable,
}

impl Standing {
    pub fn from_delta(delta: f64) -> Self {
        if delta >= 0.0 {
            Standing::Favorable
        } else {
            Standing::Unfavorable
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregator
// ---------------------------------------------------------------------------

/// Read-only view computing statistics over the current session.
///
/// Every method is a pure function of the session; on an empty session it
/// returns zeroed or empty results instead of failing.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator<'a> {
    dataset: Option<&'a Dataset>,
    config: &'a AnalysisConfig,
    /// Mean score, computed once per aggregator.
    mean: f64,
}

impl<'a> Aggregator<'a> {
    pub fn new(session: &'a Session, config: &'a AnalysisConfig) -> Self {
        let dataset = session.dataset().filter(|ds| !ds.is_empty());
        let mean = dataset.map(|ds| stats::mean(&ds.scores())).unwrap_or(0.0);
        Aggregator {
            dataset,
            config,
            mean,
        }
    }

    fn records(&self) -> &'a [ExamRecord] {
        self.dataset.map(|ds| ds.records.as_slice()).unwrap_or(&[])
    }

    fn scores(&self) -> Vec<f64> {
        self.dataset.map(Dataset::scores).unwrap_or_default()
    }

    pub fn summary(&self) -> SummaryStat {
        let records = self.records();
        if records.is_empty() {
            return SummaryStat::default();
        }
        let scores = self.scores();
        let exam_variants = exam_variants(records);

        SummaryStat {
            record_count: records.len(),
            exam_variant_count: exam_variants.len(),
            exam_variants,
            mean: self.mean,
            max: stats::max(&scores),
            min: stats::min(&scores),
            stddev: stats::sample_std(&scores),
        }
    }

    /// Linear-interpolation quantile of `nota` at fraction `p`.
    pub fn percentile(&self, p: f64) -> f64 {
        stats::quantile(&self.scores(), p)
    }

    /// `(p, value)` for each of [`STANDARD_PERCENTILES`].
    pub fn percentiles(&self) -> Vec<(f64, f64)> {
        STANDARD_PERCENTILES
            .iter()
            .map(|&p| (p, self.percentile(p)))
            .collect()
    }

    /// Per-question accuracy for each configured key, in configured order.
    pub fn question_analysis(&self) -> Vec<QuestionStat> {
        let records = self.records();
        if records.is_empty() {
            return Vec::new();
        }
        let total_count = records.len();

        self.config
            .question_keys
            .iter()
            .map(|key| {
                let correct_count = records.iter().filter(|r| r.is_correct(key)).count();
                let ratio = if total_count > 0 {
                    correct_count as f64 / total_count as f64
                } else {
                    0.0
                };
                QuestionStat {
                    key: key.clone(),
                    correct_count,
                    total_count,
                    accuracy_percent: ratio * 100.0,
                    difficulty: Difficulty::classify(
                        ratio,
                        self.config.easy_ratio,
                        self.config.hard_ratio,
                    ),
                }
            })
            .collect()
    }

    /// Mean score per admission-year cohort, ascending, small cohorts dropped.
    pub fn cohort_performance(&self) -> Vec<CohortStat> {
        let mut groups: BTreeMap<String, (f64, usize)> = BTreeMap::new();
        for r in self.records() {
            let entry = groups
                .entry(r.code.cohort(self.config.cohort_prefix_len))
                .or_insert((0.0, 0));
            entry.0 += r.score;
            entry.1 += 1;
        }

        groups
            .into_iter()
            .filter(|(_, (_, count))| *count >= self.config.min_cohort_size)
            .map(|(cohort, (sum, count))| CohortStat {
                cohort,
                mean_score: sum / count as f64,
                count,
            })
            .collect()
    }

    /// Records whose code or name contains `term`, ignoring case.
    ///
    /// An empty term matches every record.
    pub fn find_students(&self, term: &str) -> Vec<&'a ExamRecord> {
        let needle = term.to_lowercase();
        self.records()
            .iter()
            .filter(|r| {
                r.code.to_string().to_lowercase().contains(&needle)
                    || r.full_name.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// `record.nota` minus the dataset mean.
    pub fn score_delta_from_mean(&self, record: &ExamRecord) -> f64 {
        if self.dataset.is_none() {
            return 0.0;
        }
        record.score - self.mean
    }

    /// Score histogram over the configured number of bins.
    pub fn histogram(&self) -> Histogram {
        Histogram::build(&self.scores(), self.config.histogram_bins)
    }

    /// Box summary of scores per exam variant, in first-seen order.
    pub fn exam_distributions(&self) -> Vec<ExamDistribution> {
        let records = self.records();
        exam_variants(records)
            .into_iter()
            .map(|exam| {
                let scores: Vec<f64> = records
                    .iter()
                    .filter(|r| r.exam == exam)
                    .map(|r| r.score)
                    .collect();
                ExamDistribution {
                    count: scores.len(),
                    spread: BoxSummary::from_values(&scores),
                    exam,
                }
            })
            .collect()
    }
}

fn exam_variants(records: &[ExamRecord]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for r in records {
        if !seen.contains(&r.exam) {
            seen.push(r.exam.clone());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::StudentCode;
    use serde_json::{json, Value as JsonValue};

    fn record(code: &str, name: &str, exam: &str, score: f64) -> ExamRecord {
        ExamRecord {
            code: StudentCode::Text(code.into()),
            full_name: name.into(),
            exam: exam.into(),
            correct: 0,
            incorrect: 0,
            score,
            student_answers: BTreeMap::new(),
            answer_key: BTreeMap::new(),
        }
    }

    fn answers(pairs: &[(&str, &str)]) -> BTreeMap<String, JsonValue> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), json!(v)))
            .collect()
    }

    fn session_of(records: Vec<ExamRecord>) -> Session {
        Session::Loaded(Dataset::new(records))
    }

    fn scored(scores: &[f64]) -> Session {
        session_of(
            scores
                .iter()
                .enumerate()
                .map(|(i, &s)| record(&format!("20191{i:05}"), "X", "A", s))
                .collect(),
        )
    }

    /// `n` records where the first `correct` answered Q1 right.
    fn q1_session(n: usize, correct: usize) -> Session {
        let key = answers(&[("Q1", "A")]);
        session_of(
            (0..n)
                .map(|i| {
                    let mut r = record("2019", "X", "A", 10.0);
                    r.answer_key = key.clone();
                    r.student_answers = if i < correct {
                        answers(&[("Q1", "A")])
                    } else {
                        answers(&[("Q1", "C")])
                    };
                    r
                })
                .collect(),
        )
    }

    #[test]
    fn empty_session_yields_no_data() {
        let session = Session::Empty;
        let config = AnalysisConfig::default();
        let agg = Aggregator::new(&session, &config);

        assert_eq!(agg.summary(), SummaryStat::default());
        assert_eq!(agg.percentile(0.5), 0.0);
        assert!(agg.question_analysis().is_empty());
        assert!(agg.cohort_performance().is_empty());
        assert!(agg.find_students("").is_empty());
        assert!(agg.exam_distributions().is_empty());
        assert_eq!(agg.histogram(), Histogram::default());
        let stray = record("2019", "X", "A", 12.0);
        assert_eq!(agg.score_delta_from_mean(&stray), 0.0);
    }

    #[test]
    fn summary_counts_and_orders_variants() {
        let session = session_of(vec![
            record("2019100001", "A", "B", 10.0),
            record("2019100002", "B", "A", 12.0),
            record("2019100003", "C", "B", 14.0),
            record("2019100004", "D", "C", 16.0),
        ]);
        let config = AnalysisConfig::default();
        let s = Aggregator::new(&session, &config).summary();

        assert_eq!(s.record_count, 4);
        assert_eq!(s.exam_variants, vec!["B", "A", "C"]);
        assert_eq!(s.exam_variant_count, 3);
        assert_eq!(s.mean, 13.0);
        assert_eq!(s.max, 16.0);
        assert_eq!(s.min, 10.0);
        // sample std of 10, 12, 14, 16 = sqrt(20 / 3) = 2.58
        assert_eq!(format!("{:.2}", s.stddev), "2.58");
    }

    #[test]
    fn summary_is_idempotent() {
        let session = scored(&[3.5, 17.25, 11.0, 9.75, 20.0]);
        let config = AnalysisConfig::default();
        let agg = Aggregator::new(&session, &config);
        let (a, b) = (agg.summary(), agg.summary());
        assert_eq!(a.mean.to_bits(), b.mean.to_bits());
        assert_eq!(a.stddev.to_bits(), b.stddev.to_bits());
        assert_eq!(a, b);
    }

    #[test]
    fn percentile_median_interpolates() {
        let session = scored(&[10.0, 12.0, 14.0, 16.0]);
        let config = AnalysisConfig::default();
        let agg = Aggregator::new(&session, &config);
        assert_eq!(agg.percentile(0.5), 13.0);

        let cut_points: Vec<f64> = agg.percentiles().iter().map(|(p, _)| *p).collect();
        assert_eq!(cut_points, STANDARD_PERCENTILES.to_vec());
        assert_eq!(agg.percentiles()[1].1, 13.0);
    }

    #[test]
    fn question_analysis_covers_all_keys_in_order() {
        let mut full = record("2019100001", "A", "A", 20.0);
        full.answer_key = answers(&[("Q1", "A"), ("Q2", "B"), ("Q20", "D")]);
        full.student_answers = answers(&[("Q1", "A"), ("Q2", "C"), ("Q20", "D")]);
        // no answers at all: every comparison counts as incorrect
        let sparse = record("2019100002", "B", "A", 0.0);
        let session = session_of(vec![full, sparse]);
        let config = AnalysisConfig::default();

        let stats = Aggregator::new(&session, &config).question_analysis();
        assert_eq!(stats.len(), 20);
        let keys: Vec<&str> = stats.iter().map(|q| q.key.as_str()).collect();
        let expected: Vec<String> = (1..=20).map(|i| format!("Q{i}")).collect();
        assert_eq!(keys, expected);

        assert_eq!(stats[0].correct_count, 1);
        assert_eq!(stats[0].total_count, 2);
        assert_eq!(stats[0].accuracy_percent, 50.0);
        assert_eq!(stats[1].correct_count, 0);
        assert_eq!(stats[2].correct_count, 0);
        assert_eq!(stats[19].correct_count, 1);
    }

    #[test]
    fn difficulty_boundaries_are_moderate() {
        let config = AnalysisConfig::default();
        let cases = [
            (8, Difficulty::Easy),
            (7, Difficulty::Moderate),
            (3, Difficulty::Moderate),
            (2, Difficulty::Hard),
        ];
        for (correct, expected) in cases {
            let session = q1_session(10, correct);
            let stats = Aggregator::new(&session, &config).question_analysis();
            assert_eq!(stats[0].difficulty, expected, "{correct}/10 correct");
        }

        let session = q1_session(10, 7);
        let stats = Aggregator::new(&session, &config).question_analysis();
        assert_eq!(stats[0].accuracy_percent.round(), 70.0);
        assert_eq!(stats[0].difficulty.label(), "Moderate");
    }

    #[test]
    fn configured_question_keys_drive_analysis() {
        let config = AnalysisConfig {
            question_keys: crate::config::question_keys(3),
            ..AnalysisConfig::default()
        };
        let session = q1_session(4, 4);
        let stats = Aggregator::new(&session, &config).question_analysis();
        assert_eq!(stats.len(), 3);
        assert_eq!(stats[0].difficulty, Difficulty::Easy);
        assert_eq!(stats[2].difficulty, Difficulty::Hard);
    }

    #[test]
    fn cohorts_below_minimum_are_dropped() {
        let mut records = Vec::new();
        for i in 0..4 {
            records.push(record(&format!("2018{i:06}"), "X", "A", 10.0));
        }
        for i in 0..5 {
            records.push(record(&format!("2020{i:06}"), "X", "A", 10.0 + i as f64));
        }
        for i in 0..6 {
            records.push(record(&format!("2019{i:06}"), "X", "A", 14.0));
        }
        let session = session_of(records);
        let config = AnalysisConfig::default();

        let cohorts = Aggregator::new(&session, &config).cohort_performance();
        let labels: Vec<&str> = cohorts.iter().map(|c| c.cohort.as_str()).collect();
        assert_eq!(labels, vec!["2019", "2020"]);
        assert_eq!(cohorts[0].count, 6);
        assert_eq!(cohorts[0].mean_score, 14.0);
        assert_eq!(cohorts[1].count, 5);
        assert_eq!(cohorts[1].mean_score, 12.0);
    }

    #[test]
    fn search_ignores_case_and_matches_code_or_name() {
        let session = session_of(vec![
            record("2019100001", "GARCIA LOPEZ, Ana", "A", 14.0),
            record("2020100002", "PEREZ DIAZ, Luis", "A", 9.0),
            record("2019100003", "Garcia Ruiz, Marta", "B", 17.0),
        ]);
        let config = AnalysisConfig::default();
        let agg = Aggregator::new(&session, &config);

        let upper = agg.find_students("GARCIA");
        let lower = agg.find_students("garcia");
        assert_eq!(upper, lower);
        assert_eq!(upper.len(), 2);
        assert_eq!(upper[0].full_name, "GARCIA LOPEZ, Ana");
        assert_eq!(upper[1].full_name, "Garcia Ruiz, Marta");

        assert_eq!(agg.find_students("2020").len(), 1);
        assert!(agg.find_students("nobody").is_empty());
        assert_eq!(agg.find_students("").len(), 3);
    }

    #[test]
    fn numeric_codes_are_searched_as_text() {
        let mut r = record("", "X", "A", 10.0);
        r.code = StudentCode::Number(2021100042u64.into());
        let session = session_of(vec![r]);
        let config = AnalysisConfig::default();
        assert_eq!(Aggregator::new(&session, &config).find_students("0042").len(), 1);
    }

    #[test]
    fn delta_sign_sets_standing() {
        let session = scored(&[10.0, 14.0]);
        let config = AnalysisConfig::default();
        let agg = Aggregator::new(&session, &config);
        let records = agg.find_students("");

        let low = agg.score_delta_from_mean(records[0]);
        let high = agg.score_delta_from_mean(records[1]);
        assert_eq!(low, -2.0);
        assert_eq!(high, 2.0);
        assert_eq!(Standing::from_delta(low), Standing::Unfavorable);
        assert_eq!(Standing::from_delta(high), Standing::Favorable);
        assert_eq!(Standing::from_delta(0.0), Standing::Favorable);
    }

    #[test]
    fn delta_is_relative_to_whole_dataset_mean() {
        let session = scored(&[4.0, 8.0, 12.0, 16.0, 20.0]);
        let config = AnalysisConfig::default();
        let agg = Aggregator::new(&session, &config);
        let mean = agg.summary().mean;
        assert_eq!(mean, 12.0);

        for r in agg.find_students("") {
            assert_eq!(agg.score_delta_from_mean(r), r.score - mean);
        }
        // a narrow search still measures against every record
        let only = agg.find_students("2019100004");
        assert_eq!(only.len(), 1);
        assert_eq!(agg.score_delta_from_mean(only[0]), 8.0);
    }

    #[test]
    fn empty_dataset_counts_as_no_data() {
        let session = session_of(Vec::new());
        let config = AnalysisConfig::default();
        let agg = Aggregator::new(&session, &config);
        assert_eq!(agg.summary(), SummaryStat::default());
        let stray = record("2019", "X", "A", 12.0);
        assert_eq!(agg.score_delta_from_mean(&stray), 0.0);
    }

    #[test]
    fn exam_distributions_follow_first_seen_order() {
        let session = session_of(vec![
            record("1", "A", "B", 10.0),
            record("2", "B", "A", 12.0),
            record("3", "C", "B", 14.0),
        ]);
        let config = AnalysisConfig::default();
        let dists = Aggregator::new(&session, &config).exam_distributions();
        assert_eq!(dists.len(), 2);
        assert_eq!(dists[0].exam, "B");
        assert_eq!(dists[0].count, 2);
        assert_eq!(dists[0].spread.median, 12.0);
        assert_eq!(dists[1].exam, "A");
        assert_eq!(dists[1].spread.median, 12.0);
    }

    #[test]
    fn histogram_uses_configured_bins() {
        let session = scored(&[0.0, 10.0, 20.0]);
        let config = AnalysisConfig {
            histogram_bins: 2,
            ..AnalysisConfig::default()
        };
        let h = Aggregator::new(&session, &config).histogram();
        assert_eq!(h.counts, vec![1, 2]);
    }
}
