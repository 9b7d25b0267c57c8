use crate::growth::norms::{BenchmarkThresholds, GrowthNorms};
use crate::growth::terms::GrowthPeriod;
use crate::growth::types::{GrowthResult, MapAssessmentRecord, Subject};
use crate::scores::round2;
use serde::Serialize;

/// Actual growth over expected, to 2 decimals. With no norm there is no
/// index: `None` expected growth stays `None`, and a zero norm cannot be
/// divided by. 1.0 means "exactly on norm".
pub fn growth_index(actual_growth: f64, expected_growth: Option<f64>) -> Option<f64> {
    let expected = expected_growth?;
    if expected.abs() < f64::EPSILON {
        return None;
    }
    Some(round2(actual_growth / expected))
}

/// Growth for one (student, subject) across a classified period. Both
/// administrations must be present in `records`; when the same identity
/// appears twice the later record wins, matching re-import semantics.
///
/// The norm is keyed by the grade on the *starting* record. The conditional
/// growth percentile is copied from the ending record, never computed.
pub fn student_growth(
    records: &[MapAssessmentRecord],
    student_id: &str,
    subject: Subject,
    period: &GrowthPeriod,
    norms: &GrowthNorms,
) -> Option<GrowthResult> {
    let from = records
        .iter()
        .rev()
        .find(|r| r.student_id == student_id && r.term == period.from && r.subject == subject)?;
    let to = records
        .iter()
        .rev()
        .find(|r| r.student_id == student_id && r.term == period.to && r.subject == subject)?;

    let actual_growth = to.rit_score - from.rit_score;
    let expected_growth = norms.expected_growth(period, from.grade, subject);
    Some(GrowthResult {
        subject,
        from_score: from.rit_score,
        to_score: to.rit_score,
        actual_growth,
        expected_growth,
        growth_index: growth_index(actual_growth, expected_growth),
        conditional_growth_percentile: to.conditional_growth_percentile,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkStatus {
    pub average_rit: f64,
    /// Cuts are read one grade up: readiness for the grade being entered.
    pub benchmark_grade: u8,
    pub tier: String,
    pub distance_to_tier1: f64,
    pub distance_to_tier2: f64,
}

/// Classify a student's combined RIT against next-grade benchmark cuts.
/// Needs both subject scores; a missing subject means no status at all
/// rather than a half-informed one. The tier is the highest whose cut the
/// average meets, with the bottom tier as catch-all, and the distances are
/// signed (negative = below the cut).
pub fn benchmark_status(
    reading_rit: Option<f64>,
    language_rit: Option<f64>,
    test_grade: u8,
    thresholds: &BenchmarkThresholds,
) -> Option<BenchmarkStatus> {
    let reading = reading_rit?;
    let language = language_rit?;
    let average_rit = round2((reading + language) / 2.0);

    let benchmark_grade = test_grade.checked_add(1)?;
    let tiers = thresholds.tiers(benchmark_grade)?;
    let tier = tiers
        .iter()
        .find(|t| average_rit >= t.min_rit)
        .or_else(|| tiers.last())?;
    let tier1 = tiers.first()?;
    let tier2 = tiers.get(1)?;

    Some(BenchmarkStatus {
        average_rit,
        benchmark_grade,
        tier: tier.label.clone(),
        distance_to_tier1: round2(average_rit - tier1.min_rit),
        distance_to_tier2: round2(average_rit - tier2.min_rit),
    })
}
