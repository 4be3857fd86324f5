use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// ---------------------------------------------------------------------------
// StudentCode – `codigo` may be written as text or as a number
// ---------------------------------------------------------------------------

/// A student identifier as it appears in the source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StudentCode {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for StudentCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StudentCode::Text(s) => write!(f, "{s}"),
            StudentCode::Number(n) => write!(f, "{n}"),
        }
    }
}

impl StudentCode {
    /// Leading `len` characters of the string form (admission-year cohort).
    pub fn cohort(&self, len: usize) -> String {
        self.to_string().chars().take(len).collect()
    }
}

// ---------------------------------------------------------------------------
// Answer – explicit result of looking up a question key
// ---------------------------------------------------------------------------

/// The answer recorded for one question, or its absence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Answer<'a> {
    Given(&'a JsonValue),
    Absent,
}

fn lookup_answer<'a>(answers: &'a BTreeMap<String, JsonValue>, key: &str) -> Answer<'a> {
    match answers.get(key) {
        None | Some(JsonValue::Null) => Answer::Absent,
        Some(value) => Answer::Given(value),
    }
}

impl Answer<'_> {
    /// Whether two answers agree. `Absent` never matches, not even itself.
    pub fn matches(&self, other: &Answer<'_>) -> bool {
        match (self, other) {
            (Answer::Given(a), Answer::Given(b)) => a == b,
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// ExamRecord – one entry of the input array
// ---------------------------------------------------------------------------

/// One student's result for one exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamRecord {
    #[serde(rename = "codigo")]
    pub code: StudentCode,
    #[serde(rename = "apellidos_nombres")]
    pub full_name: String,
    #[serde(rename = "examen")]
    pub exam: String,
    #[serde(rename = "correctas")]
    pub correct: i64,
    #[serde(rename = "incorrectas")]
    pub incorrect: i64,
    #[serde(rename = "nota")]
    pub score: f64,
    #[serde(rename = "respuestas_estudiante")]
    pub student_answers: BTreeMap<String, JsonValue>,
    #[serde(rename = "respuestas_correctas")]
    pub answer_key: BTreeMap<String, JsonValue>,
}

impl ExamRecord {
    /// Field names every record must carry, in reporting order.
    pub const REQUIRED_FIELDS: [&'static str; 8] = [
        "codigo",
        "apellidos_nombres",
        "examen",
        "correctas",
        "incorrectas",
        "nota",
        "respuestas_estudiante",
        "respuestas_correctas",
    ];

    pub fn student_answer(&self, key: &str) -> Answer<'_> {
        lookup_answer(&self.student_answers, key)
    }

    pub fn correct_answer(&self, key: &str) -> Answer<'_> {
        lookup_answer(&self.answer_key, key)
    }

    /// Whether the student answered `key` correctly.
    pub fn is_correct(&self, key: &str) -> bool {
        self.student_answer(key).matches(&self.correct_answer(key))
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded file
// ---------------------------------------------------------------------------

/// All records of one successfully loaded file, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub records: Vec<ExamRecord>,
}

impl Dataset {
    pub fn new(records: Vec<ExamRecord>) -> Self {
        Dataset { records }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Scores in file order.
    pub fn scores(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.score).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record_with(student: JsonValue, key: JsonValue) -> ExamRecord {
        serde_json::from_value(json!({
            "codigo": 2019100001u64,
            "apellidos_nombres": "GARCIA LOPEZ, Ana",
            "examen": "A",
            "correctas": 1,
            "incorrectas": 0,
            "nota": 15.5,
            "respuestas_estudiante": student,
            "respuestas_correctas": key,
        }))
        .unwrap()
    }

    #[test]
    fn numeric_code_keeps_its_digits() {
        let rec = record_with(json!({}), json!({}));
        assert_eq!(rec.code.to_string(), "2019100001");
        assert_eq!(rec.code.cohort(4), "2019");
    }

    #[test]
    fn short_code_cohort_is_whole_code() {
        let code = StudentCode::Text("20".into());
        assert_eq!(code.cohort(4), "20");
    }

    #[test]
    fn matching_answer_is_correct() {
        let rec = record_with(json!({"Q1": "B"}), json!({"Q1": "B"}));
        assert!(rec.is_correct("Q1"));
    }

    #[test]
    fn absent_answers_never_match() {
        let rec = record_with(json!({"Q2": null}), json!({"Q2": null, "Q3": "A"}));
        assert!(!rec.is_correct("Q1"));
        assert!(!rec.is_correct("Q2"));
        assert!(!rec.is_correct("Q3"));
        assert_eq!(rec.student_answer("Q3"), Answer::Absent);
    }
}
