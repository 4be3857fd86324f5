use std::io::ErrorKind;
use std::path::Path;

use serde_json::{Map, Value as JsonValue};

use super::error::{LoadError, SchemaError};
use super::model::{Dataset, ExamRecord};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load and validate an exam results file.
///
/// Expected schema (records-oriented JSON array):
///
/// ```json
/// [
///   {
///     "codigo": "2019100001",
///     "apellidos_nombres": "GARCIA LOPEZ, Ana",
///     "examen": "A",
///     "correctas": 14,
///     "incorrectas": 6,
///     "nota": 14.0,
///     "respuestas_estudiante": { "Q1": "B", "Q2": "D", ... },
///     "respuestas_correctas":  { "Q1": "B", "Q2": "A", ... }
///   },
///   ...
/// ]
/// ```
///
/// Validation stops at the first invalid record. Nothing outside the
/// returned value is touched; installing it is up to the caller.
pub fn load(path: &Path) -> Result<Dataset, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound | ErrorKind::PermissionDenied => LoadError::NotFound {
            path: path.to_path_buf(),
            source: e,
        },
        _ => LoadError::Unknown(e.to_string()),
    })?;

    parse_records(&text)
}

/// Parse and validate the textual content of an exam results file.
pub fn parse_records(text: &str) -> Result<Dataset, LoadError> {
    let root: JsonValue = serde_json::from_str(text)?;

    let rows = match root {
        JsonValue::Array(rows) => rows,
        _ => return Err(SchemaError::NotAnArray.into()),
    };
    if rows.is_empty() {
        return Err(SchemaError::EmptyArray.into());
    }

    let mut records = Vec::with_capacity(rows.len());

    for (i, row) in rows.into_iter().enumerate() {
        let index = i + 1;
        let JsonValue::Object(obj) = row else {
            return Err(SchemaError::NotAnObject { index }.into());
        };

        let fields = missing_fields(&obj);
        if !fields.is_empty() {
            return Err(SchemaError::MissingFields { index, fields }.into());
        }

        let record: ExamRecord = serde_json::from_value(JsonValue::Object(obj)).map_err(|e| {
            SchemaError::InvalidRecord {
                index,
                reason: e.to_string(),
            }
        })?;
        records.push(record);
    }

    Ok(Dataset::new(records))
}

fn missing_fields(obj: &Map<String, JsonValue>) -> Vec<String> {
    ExamRecord::REQUIRED_FIELDS
        .iter()
        .filter(|field| !obj.contains_key(**field))
        .map(|field| field.to_string())
        .collect()
}
