use crate::growth::engine::{growth_index, student_growth};
use crate::growth::norms::GrowthNorms;
use crate::growth::terms::{classify_growth_period, AcademicYear, Term};
use crate::growth::types::{GrowthResult, MapAssessmentRecord, Subject};
use crate::scores::round2;
use serde::Serialize;
use std::collections::BTreeSet;

/// Grades covered by the cross-grade dashboard.
pub const COHORT_GRADES: std::ops::RangeInclusive<u8> = 3..=6;

const SUBJECTS: [Subject; 2] = [Subject::Reading, Subject::LanguageUsage];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectGrowthSummary {
    pub subject: Subject,
    pub student_count: usize,
    pub average_actual_growth: f64,
    pub expected_growth: Option<f64>,
    pub growth_index: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeCohortGrowth {
    /// Grade at the starting administration. Cohorts are grouped by this,
    /// not by the grade students hold at the end of the period; norms are
    /// keyed by where a student started.
    pub starting_grade: u8,
    pub ending_grade: u8,
    /// Label-only flag: the cohort finished the school's top grade in a
    /// year that is already over.
    pub graduated: bool,
    pub student_count: usize,
    pub average_growth: f64,
    pub average_conditional_growth_percentile: Option<f64>,
    pub subjects: Vec<SubjectGrowthSummary>,
}

/// Growth per starting-grade cohort across one recognized period. Grades
/// with no paired administrations are omitted; an unclassifiable (from, to)
/// pairing yields an empty vector.
pub fn cross_grade_growth(
    records: &[MapAssessmentRecord],
    from: Term,
    to: Term,
    norms: &GrowthNorms,
    current_year: AcademicYear,
) -> Vec<GradeCohortGrowth> {
    let Some(period) = classify_growth_period(from, to) else {
        return Vec::new();
    };

    let mut cohorts = Vec::new();
    for grade in COHORT_GRADES {
        let students: BTreeSet<&str> = records
            .iter()
            .filter(|r| r.term == period.from && r.grade == grade)
            .map(|r| r.student_id.as_str())
            .collect();

        let mut results: Vec<GrowthResult> = Vec::new();
        let mut student_count = 0usize;
        for student_id in students {
            let mut contributed = false;
            for subject in SUBJECTS {
                if let Some(result) = student_growth(records, student_id, subject, &period, norms)
                {
                    results.push(result);
                    contributed = true;
                }
            }
            if contributed {
                student_count += 1;
            }
        }
        if results.is_empty() {
            continue;
        }

        let average_growth = round2(
            results.iter().map(|r| r.actual_growth).sum::<f64>() / results.len() as f64,
        );

        let percentiles: Vec<f64> = results
            .iter()
            .filter_map(|r| r.conditional_growth_percentile)
            .collect();
        let average_conditional_growth_percentile = if percentiles.is_empty() {
            None
        } else {
            Some(round2(percentiles.iter().sum::<f64>() / percentiles.len() as f64))
        };

        let subjects = SUBJECTS
            .iter()
            .filter_map(|&subject| {
                let values: Vec<f64> = results
                    .iter()
                    .filter(|r| r.subject == subject)
                    .map(|r| r.actual_growth)
                    .collect();
                if values.is_empty() {
                    return None;
                }
                let average_actual_growth =
                    round2(values.iter().sum::<f64>() / values.len() as f64);
                let expected_growth = norms.expected_growth(&period, grade, subject);
                Some(SubjectGrowthSummary {
                    subject,
                    student_count: values.len(),
                    average_actual_growth,
                    expected_growth,
                    growth_index: growth_index(average_actual_growth, expected_growth),
                })
            })
            .collect();

        let ending_grade = grade + period.grade_increment();
        cohorts.push(GradeCohortGrowth {
            starting_grade: grade,
            ending_grade,
            graduated: ending_grade >= 6 && period.ending_year() != current_year,
            student_count,
            average_growth,
            average_conditional_growth_percentile,
            subjects,
        });
    }
    cohorts
}
