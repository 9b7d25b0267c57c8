use crate::growth::terms::Term;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// MAP is administered in two subjects at this level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Subject {
    Reading,
    LanguageUsage,
}

impl Subject {
    /// Liberal on casing and separators: `"language usage"`,
    /// `"Language_Usage"`, and `"languageusage"` all parse.
    pub fn parse(input: &str) -> Option<Subject> {
        let folded: String = input
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match folded.as_str() {
            "reading" => Some(Subject::Reading),
            "languageusage" | "language" => Some(Subject::LanguageUsage),
            _ => None,
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Subject::Reading => "Reading",
            Subject::LanguageUsage => "Language Usage",
        };
        f.write_str(name)
    }
}

impl Serialize for Subject {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One administration of one subject for one student. Immutable once
/// constructed; identity is (student, term, subject) and a re-imported
/// duplicate replaces the earlier record at the normalization boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapAssessmentRecord {
    pub student_id: String,
    /// Joined from the roster by the caller; absent when the join is not
    /// available or the viewer may not see names.
    pub student_name: Option<String>,
    pub class_name: Option<String>,
    /// Grade at the time of this administration.
    pub grade: u8,
    pub term: Term,
    pub subject: Subject,
    pub rit_score: f64,
    pub lexile_score: Option<f64>,
    /// NWEA-computed percentile carried through verbatim, never derived.
    pub conditional_growth_percentile: Option<f64>,
    pub rapid_guessing_percentage: Option<f64>,
    pub goal_area_scores: Option<BTreeMap<String, f64>>,
}

impl MapAssessmentRecord {
    pub fn key(&self) -> (&str, Term, Subject) {
        (&self.student_id, self.term, self.subject)
    }
}

/// Growth over one recognized period for one (student, subject).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthResult {
    pub subject: Subject,
    pub from_score: f64,
    pub to_score: f64,
    pub actual_growth: f64,
    /// Absent when no norm covers the period; absence flows through to the
    /// index instead of being papered over with a default.
    pub expected_growth: Option<f64>,
    pub growth_index: Option<f64>,
    /// From the ending administration's record, when the import carried it.
    pub conditional_growth_percentile: Option<f64>,
}
