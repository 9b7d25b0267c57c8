use crate::growth::engine::student_growth;
use crate::growth::norms::GrowthNorms;
use crate::growth::terms::{classify_growth_period, Term};
use crate::growth::types::{GrowthResult, MapAssessmentRecord, Subject};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Growth index below this is flagged as low.
pub const LOW_GROWTH_INDEX: f64 = 0.6;
/// Rapid-guessing percentage above this taints the ending administration.
pub const RAPID_GUESS_PERCENTAGE: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpotlightFlag {
    /// Scored lower at the end of the period than at the start.
    Negative,
    /// Index present and under `LOW_GROWTH_INDEX`.
    LowGrowth,
    /// Ending administration shows rapid guessing above the threshold, so
    /// the score itself is suspect.
    RapidGuess,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotlightEntry {
    /// Dropped entirely when the viewer may not see names.
    pub student_id: Option<String>,
    /// Roster name, the raw id as fallback, or `"Student N"` when redacted.
    pub display_name: String,
    pub growth: GrowthResult,
    pub flags: Vec<SpotlightFlag>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotlightReport {
    pub top_growers: Vec<SpotlightEntry>,
    pub needs_attention: Vec<SpotlightEntry>,
}

#[derive(Clone)]
struct Candidate {
    student_id: String,
    name: Option<String>,
    growth: GrowthResult,
    flags: Vec<SpotlightFlag>,
}

impl Candidate {
    fn is_negative(&self) -> bool {
        self.flags.contains(&SpotlightFlag::Negative)
    }

    fn into_entry(self, position: usize, can_view_names: bool) -> SpotlightEntry {
        if can_view_names {
            SpotlightEntry {
                display_name: self.name.unwrap_or_else(|| self.student_id.clone()),
                student_id: Some(self.student_id),
                growth: self.growth,
                flags: self.flags,
            }
        } else {
            SpotlightEntry {
                student_id: None,
                display_name: format!("Student {}", position + 1),
                growth: self.growth,
                flags: self.flags,
            }
        }
    }
}

/// Per-student growth spotlight for one subject over one period:
/// `top_growers` holds the top `limit` by actual growth, `needs_attention`
/// the flagged students with `negative` first, then lowest growth first,
/// also truncated to `limit`. With `can_view_names` false the ids are
/// dropped and labels are numbered per list in output order; the
/// permission decision itself is made by the caller.
pub fn growth_spotlight(
    records: &[MapAssessmentRecord],
    subject: Subject,
    from: Term,
    to: Term,
    norms: &GrowthNorms,
    limit: usize,
    can_view_names: bool,
) -> SpotlightReport {
    let Some(period) = classify_growth_period(from, to) else {
        return SpotlightReport::default();
    };

    let students: BTreeSet<&str> = records
        .iter()
        .filter(|r| r.term == period.from && r.subject == subject)
        .map(|r| r.student_id.as_str())
        .collect();

    let mut candidates: Vec<Candidate> = Vec::new();
    for student_id in students {
        let Some(growth) = student_growth(records, student_id, subject, &period, norms) else {
            continue;
        };
        let ending = records.iter().rev().find(|r| {
            r.student_id == student_id && r.term == period.to && r.subject == subject
        });
        let name = ending
            .and_then(|r| r.student_name.clone())
            .or_else(|| {
                records
                    .iter()
                    .rev()
                    .find(|r| r.student_id == student_id && r.term == period.from && r.subject == subject)
                    .and_then(|r| r.student_name.clone())
            });

        let mut flags = Vec::new();
        if growth.actual_growth < 0.0 {
            flags.push(SpotlightFlag::Negative);
        }
        if matches!(growth.growth_index, Some(index) if index < LOW_GROWTH_INDEX) {
            flags.push(SpotlightFlag::LowGrowth);
        }
        let rapid = ending.and_then(|r| r.rapid_guessing_percentage);
        if matches!(rapid, Some(pct) if pct > RAPID_GUESS_PERCENTAGE) {
            flags.push(SpotlightFlag::RapidGuess);
        }

        candidates.push(Candidate {
            student_id: student_id.to_string(),
            name,
            growth,
            flags,
        });
    }

    let by_growth_desc = |a: &Candidate, b: &Candidate| {
        b.growth
            .actual_growth
            .partial_cmp(&a.growth.actual_growth)
            .unwrap_or(Ordering::Equal)
    };

    let mut top: Vec<&Candidate> = candidates.iter().collect();
    top.sort_by(|a, b| by_growth_desc(a, b));
    top.truncate(limit);
    let top_growers = top
        .into_iter()
        .cloned()
        .enumerate()
        .map(|(i, c)| c.into_entry(i, can_view_names))
        .collect();

    let mut flagged: Vec<&Candidate> = candidates.iter().filter(|c| !c.flags.is_empty()).collect();
    flagged.sort_by(|a, b| {
        b.is_negative()
            .cmp(&a.is_negative())
            .then_with(|| {
                a.growth
                    .actual_growth
                    .partial_cmp(&b.growth.actual_growth)
                    .unwrap_or(Ordering::Equal)
            })
    });
    flagged.truncate(limit);
    let needs_attention = flagged
        .into_iter()
        .cloned()
        .enumerate()
        .map(|(i, c)| c.into_entry(i, can_view_names))
        .collect();

    SpotlightReport {
        top_growers,
        needs_attention,
    }
}
