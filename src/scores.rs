use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Component weights for the semester grade. The denominator is rebuilt from
/// whichever components are actually present, so these never need to sum to 1.
pub const FORMATIVE_WEIGHT: f64 = 0.15;
pub const SUMMATIVE_WEIGHT: f64 = 0.20;
pub const FINAL_WEIGHT: f64 = 0.10;

/// Standard 2-decimal rounding applied to every derived grade value.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// One column of the gradebook. The vocabulary is fixed: eight formative
/// slots, four summative slots, and the midterm/final exam pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AssessmentCode {
    Formative(u8),
    Summative(u8),
    Midterm,
    Final,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssessmentKind {
    Formative,
    Summative,
    Final,
}

impl AssessmentCode {
    /// Parse a column code (`FA1`..`FA8`, `SA1`..`SA4`, `MID`, `FINAL`).
    /// Case-insensitive; anything outside the vocabulary is rejected.
    pub fn parse(code: &str) -> Option<Self> {
        let c = code.trim().to_ascii_uppercase();
        match c.as_str() {
            "MID" => return Some(AssessmentCode::Midterm),
            "FINAL" => return Some(AssessmentCode::Final),
            _ => {}
        }
        if let Some(rest) = c.strip_prefix("FA") {
            let n: u8 = rest.parse().ok()?;
            return (1..=8).contains(&n).then_some(AssessmentCode::Formative(n));
        }
        if let Some(rest) = c.strip_prefix("SA") {
            let n: u8 = rest.parse().ok()?;
            return (1..=4).contains(&n).then_some(AssessmentCode::Summative(n));
        }
        None
    }

    pub fn kind(self) -> AssessmentKind {
        match self {
            AssessmentCode::Formative(_) => AssessmentKind::Formative,
            AssessmentCode::Summative(_) => AssessmentKind::Summative,
            AssessmentCode::Midterm | AssessmentCode::Final => AssessmentKind::Final,
        }
    }

    /// Every code in the vocabulary, in gradebook column order.
    pub fn all() -> impl Iterator<Item = AssessmentCode> {
        (1..=8)
            .map(AssessmentCode::Formative)
            .chain((1..=4).map(AssessmentCode::Summative))
            .chain([AssessmentCode::Midterm, AssessmentCode::Final])
    }
}

impl fmt::Display for AssessmentCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssessmentCode::Formative(n) => write!(f, "FA{}", n),
            AssessmentCode::Summative(n) => write!(f, "SA{}", n),
            AssessmentCode::Midterm => write!(f, "MID"),
            AssessmentCode::Final => write!(f, "FINAL"),
        }
    }
}

/// A student's raw scores for one course/term, keyed by assessment code.
/// Built fresh from fetched rows and only ever read afterwards.
#[derive(Debug, Clone, Default)]
pub struct ScoreSet {
    scores: BTreeMap<AssessmentCode, f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentCounts {
    pub formative: usize,
    pub summative: usize,
    pub final_present: bool,
}

/// Derived per-student values. Absent components stay `None`; they are never
/// coerced to zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedGrade {
    pub formative_average: Option<f64>,
    pub summative_average: Option<f64>,
    pub final_score: Option<f64>,
    pub semester_grade: Option<f64>,
    pub counts_used: ComponentCounts,
}

impl ScoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, code: AssessmentCode, value: f64) {
        self.scores.insert(code, value);
    }

    pub fn get(&self, code: AssessmentCode) -> Option<f64> {
        self.scores.get(&code).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Entered values of one kind. A stored `0` means "not yet entered" in
    /// this gradebook, so it is excluded exactly like a missing column.
    fn entered(&self, kind: AssessmentKind) -> impl Iterator<Item = f64> + '_ {
        self.scores
            .iter()
            .filter(move |(code, _)| code.kind() == kind)
            .map(|(_, v)| *v)
            .filter(|v| *v > 0.0)
    }

    fn average_of(&self, kind: AssessmentKind) -> (Option<f64>, usize) {
        let mut sum = 0.0;
        let mut count = 0usize;
        for v in self.entered(kind) {
            sum += v;
            count += 1;
        }
        if count == 0 {
            (None, 0)
        } else {
            (Some(round2(sum / count as f64)), count)
        }
    }

    pub fn formative_average(&self) -> Option<f64> {
        self.average_of(AssessmentKind::Formative).0
    }

    pub fn summative_average(&self) -> Option<f64> {
        self.average_of(AssessmentKind::Summative).0
    }

    /// The exam component is a single value, never an average. `FINAL`
    /// supersedes `MID` when both are entered.
    pub fn final_score(&self) -> Option<f64> {
        self.get(AssessmentCode::Final)
            .filter(|v| *v > 0.0)
            .or_else(|| self.get(AssessmentCode::Midterm).filter(|v| *v > 0.0))
    }

    pub fn semester_grade(&self) -> Option<f64> {
        self.derive().semester_grade
    }

    /// Full derivation pass. The semester grade divides by the sum of the
    /// weights of the components that are present, so a student missing the
    /// exam still gets a meaningful weighted average instead of a penalty.
    pub fn derive(&self) -> DerivedGrade {
        let (formative_average, formative_count) = self.average_of(AssessmentKind::Formative);
        let (summative_average, summative_count) = self.average_of(AssessmentKind::Summative);
        let final_score = self.final_score();

        let mut weighted_sum = 0.0_f64;
        let mut weight_denom = 0.0_f64;
        if let Some(v) = formative_average {
            weighted_sum += v * FORMATIVE_WEIGHT;
            weight_denom += FORMATIVE_WEIGHT;
        }
        if let Some(v) = summative_average {
            weighted_sum += v * SUMMATIVE_WEIGHT;
            weight_denom += SUMMATIVE_WEIGHT;
        }
        if let Some(v) = final_score {
            weighted_sum += v * FINAL_WEIGHT;
            weight_denom += FINAL_WEIGHT;
        }
        let semester_grade = if weight_denom > 0.0 {
            Some(round2(weighted_sum / weight_denom))
        } else {
            None
        };

        DerivedGrade {
            formative_average,
            summative_average,
            final_score,
            semester_grade,
            counts_used: ComponentCounts {
                formative: formative_count,
                summative: summative_count,
                final_present: final_score.is_some(),
            },
        }
    }
}
