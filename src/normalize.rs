//! Tolerant extraction from rows that arrive as loose JSON: score values
//! stored as strings, joined sub-rows wrapped in single-element arrays,
//! camelCase and snake_case spellings side by side. Everything here is
//! total; a malformed field is an absent field, a useless row is a skipped
//! row.

use crate::growth::terms::Term;
use crate::growth::types::{MapAssessmentRecord, Subject};
use crate::scores::{AssessmentCode, ScoreSet};
use serde_json::Value;
use std::collections::BTreeMap;

/// Joined rows come back as single-element arrays; collapse them. Objects
/// pass through, scalars do not.
pub fn flatten_joined(value: &Value) -> Option<&Value> {
    match value {
        Value::Array(items) => items.first(),
        Value::Object(_) => Some(value),
        _ => None,
    }
}

/// Numbers, or strings that trim and parse to a finite number. Booleans,
/// nulls, and structured values are absent.
pub fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let parsed: f64 = s.trim().parse().ok()?;
            parsed.is_finite().then_some(parsed)
        }
        _ => None,
    }
}

fn string_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn grade_value(value: &Value) -> Option<u8> {
    let number = numeric_value(value)?;
    (number.fract() == 0.0 && (0.0..=255.0).contains(&number)).then(|| number as u8)
}

fn field<'a>(row: &'a serde_json::Map<String, Value>, camel: &str, snake: &str) -> Option<&'a Value> {
    row.get(camel).or_else(|| row.get(snake))
}

/// Read every known assessment code out of a score row. Unknown keys and
/// non-numeric values are ignored; zeroes are stored as entered and the
/// aggregation rules decide what they mean.
pub fn score_set_from_row(row: &Value) -> ScoreSet {
    let mut set = ScoreSet::new();
    let Some(object) = flatten_joined(row).and_then(Value::as_object) else {
        return set;
    };
    for code in AssessmentCode::all() {
        if let Some(value) = object.get(code.to_string().as_str()).and_then(numeric_value) {
            set.set(code, value);
        }
    }
    set
}

/// One MAP row into a record. Requires a student id, grade, parseable term,
/// subject, and RIT score; a row missing any of those is unusable and
/// yields `None`. Optional fields that fail to parse are simply absent.
pub fn map_record_from_row(row: &Value) -> Option<MapAssessmentRecord> {
    let object = flatten_joined(row)?.as_object()?;

    let student_id = field(object, "studentId", "student_id").and_then(string_value)?;
    let grade = object.get("grade").and_then(grade_value)?;
    let term = object.get("term").and_then(Value::as_str).and_then(Term::parse)?;
    let subject = object
        .get("subject")
        .and_then(Value::as_str)
        .and_then(Subject::parse)?;
    let rit_score = field(object, "ritScore", "rit_score").and_then(numeric_value)?;

    let goal_area_scores = field(object, "goalAreaScores", "goal_area_scores")
        .and_then(Value::as_object)
        .map(|goals| {
            goals
                .iter()
                .filter_map(|(area, v)| numeric_value(v).map(|score| (area.clone(), score)))
                .collect::<BTreeMap<String, f64>>()
        })
        .filter(|goals| !goals.is_empty());

    Some(MapAssessmentRecord {
        student_id,
        student_name: field(object, "studentName", "student_name").and_then(string_value),
        class_name: field(object, "className", "class_name").and_then(string_value),
        grade,
        term,
        subject,
        rit_score,
        lexile_score: field(object, "lexileScore", "lexile_score").and_then(numeric_value),
        conditional_growth_percentile: field(
            object,
            "conditionalGrowthPercentile",
            "conditional_growth_percentile",
        )
        .and_then(numeric_value),
        rapid_guessing_percentage: field(
            object,
            "rapidGuessingPercentage",
            "rapid_guessing_percentage",
        )
        .and_then(numeric_value),
        goal_area_scores,
    })
}

/// Batch form: unusable rows are skipped and duplicate (student, term,
/// subject) identities collapse with the later row winning, matching
/// re-import semantics. Output is ordered by identity.
pub fn map_records_from_rows(rows: &[Value]) -> Vec<MapAssessmentRecord> {
    let mut by_identity: BTreeMap<(String, Term, Subject), MapAssessmentRecord> = BTreeMap::new();
    for row in rows {
        if let Some(record) = map_record_from_row(row) {
            by_identity.insert(
                (record.student_id.clone(), record.term, record.subject),
                record,
            );
        }
    }
    by_identity.into_values().collect()
}
