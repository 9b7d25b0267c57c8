use crate::growth::engine::{growth_index, student_growth};
use crate::growth::norms::GrowthNorms;
use crate::growth::spotlight::LOW_GROWTH_INDEX;
use crate::growth::terms::{classify_growth_period, Term};
use crate::growth::types::{GrowthResult, MapAssessmentRecord, Subject};
use crate::scores::round2;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// Growth index at or above this counts as high growth.
pub const HIGH_GROWTH_INDEX: f64 = 1.4;

/// Label for students whose starting record carries no class.
pub const UNASSIGNED_CLASS: &str = "Unassigned";

/// Per-student outcome counts within one class. A student lands in exactly
/// one bucket; positive growth with no norm counts as `average` because
/// nothing supports calling it low or high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthDistribution {
    pub negative: usize,
    pub low: usize,
    pub average: usize,
    pub high: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassGrowthSummary {
    pub class_name: String,
    pub student_count: usize,
    pub average_growth: f64,
    pub expected_growth: Option<f64>,
    pub growth_index: Option<f64>,
    pub average_conditional_growth_percentile: Option<f64>,
    pub distribution: GrowthDistribution,
}

/// Compare classes of one grade on one subject across a period. Students
/// are bucketed by the class on their *starting* record, missing classes
/// under `UNASSIGNED_CLASS`. Sorted best growth index first with
/// no-index classes last; ties stay alphabetical.
pub fn class_growth_comparison(
    records: &[MapAssessmentRecord],
    grade: u8,
    subject: Subject,
    from: Term,
    to: Term,
    norms: &GrowthNorms,
) -> Vec<ClassGrowthSummary> {
    let Some(period) = classify_growth_period(from, to) else {
        return Vec::new();
    };

    let mut classes: BTreeMap<String, Vec<GrowthResult>> = BTreeMap::new();
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    // Reverse scan so a re-imported starting record decides the class.
    for record in records.iter().rev() {
        if record.term != period.from || record.subject != subject || record.grade != grade {
            continue;
        }
        if !seen.insert(record.student_id.as_str()) {
            continue;
        }
        let Some(growth) = student_growth(records, &record.student_id, subject, &period, norms)
        else {
            continue;
        };
        let class = record
            .class_name
            .clone()
            .unwrap_or_else(|| UNASSIGNED_CLASS.to_string());
        classes.entry(class).or_default().push(growth);
    }

    let expected_growth = norms.expected_growth(&period, grade, subject);
    let mut summaries: Vec<ClassGrowthSummary> = classes
        .into_iter()
        .map(|(class_name, results)| {
            let count = results.len();
            let average_growth =
                round2(results.iter().map(|r| r.actual_growth).sum::<f64>() / count as f64);

            let percentiles: Vec<f64> = results
                .iter()
                .filter_map(|r| r.conditional_growth_percentile)
                .collect();
            let average_conditional_growth_percentile = if percentiles.is_empty() {
                None
            } else {
                Some(round2(
                    percentiles.iter().sum::<f64>() / percentiles.len() as f64,
                ))
            };

            let mut distribution = GrowthDistribution::default();
            for result in &results {
                if result.actual_growth < 0.0 {
                    distribution.negative += 1;
                } else if matches!(result.growth_index, Some(i) if i < LOW_GROWTH_INDEX) {
                    distribution.low += 1;
                } else if matches!(result.growth_index, Some(i) if i >= HIGH_GROWTH_INDEX) {
                    distribution.high += 1;
                } else {
                    distribution.average += 1;
                }
            }

            ClassGrowthSummary {
                class_name,
                student_count: count,
                average_growth,
                expected_growth,
                growth_index: growth_index(average_growth, expected_growth),
                average_conditional_growth_percentile,
                distribution,
            }
        })
        .collect();

    summaries.sort_by(|a, b| match (a.growth_index, b.growth_index) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    summaries
}
