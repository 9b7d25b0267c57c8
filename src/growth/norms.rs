//! Lookup tables sourced from district configuration: NWEA expected-growth
//! norms and grade-level benchmark cuts. Ingestion validates hard and fails
//! loud; once a table is built, lookups are total and absence is a plain
//! `None`.

use crate::growth::terms::{AcademicYear, GrowthPeriod, GrowthPeriodKind};
use crate::growth::types::Subject;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct NormKey {
    year_start: i32,
    grade: u8,
    kind: GrowthPeriodKind,
    subject: Subject,
}

/// Expected RIT growth keyed by (school year, starting grade, period kind,
/// subject). A miss means "no norm published", and downstream math carries
/// that absence instead of substituting a default.
#[derive(Debug, Clone, Default)]
pub struct GrowthNorms {
    expected: BTreeMap<NormKey, f64>,
}

impl GrowthNorms {
    pub fn new() -> GrowthNorms {
        GrowthNorms::default()
    }

    pub fn insert(
        &mut self,
        year: AcademicYear,
        grade: u8,
        kind: GrowthPeriodKind,
        subject: Subject,
        expected_growth: f64,
    ) {
        self.expected.insert(
            NormKey {
                year_start: year.start,
                grade,
                kind,
                subject,
            },
            expected_growth,
        );
    }

    /// Norm for a classified period and the student's grade at the starting
    /// administration. Summer windows have no published norm and always
    /// return `None`, whatever the table contains.
    pub fn expected_growth(
        &self,
        period: &GrowthPeriod,
        starting_grade: u8,
        subject: Subject,
    ) -> Option<f64> {
        if !period.kind.has_official_norm() {
            return None;
        }
        self.expected
            .get(&NormKey {
                year_start: period.norm_year().start,
                grade: starting_grade,
                kind: period.kind,
                subject,
            })
            .copied()
    }

    pub fn len(&self) -> usize {
        self.expected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expected.is_empty()
    }

    /// Rows shaped `{academicYear, grade, periodType, subject,
    /// expectedGrowth}`. Every row must be usable; configuration errors
    /// surface at load time, not as silent misses later.
    pub fn from_json_str(text: &str) -> Result<GrowthNorms> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct NormRow {
            academic_year: String,
            grade: u8,
            period_type: String,
            subject: String,
            expected_growth: f64,
        }

        let rows: Vec<NormRow> =
            serde_json::from_str(text).context("growth norm table is not valid JSON")?;
        let mut norms = GrowthNorms::new();
        for (i, row) in rows.iter().enumerate() {
            let year = AcademicYear::parse(&row.academic_year)
                .with_context(|| format!("norm row {i}: bad academic year {:?}", row.academic_year))?;
            let kind = GrowthPeriodKind::parse(&row.period_type)
                .with_context(|| format!("norm row {i}: unknown period type {:?}", row.period_type))?;
            if !kind.has_official_norm() {
                bail!("norm row {i}: no official norm exists for {kind} windows");
            }
            let subject = Subject::parse(&row.subject)
                .with_context(|| format!("norm row {i}: unknown subject {:?}", row.subject))?;
            if !row.expected_growth.is_finite() {
                bail!("norm row {i}: expected growth must be finite");
            }
            norms.insert(year, row.grade, kind, subject, row.expected_growth);
        }
        Ok(norms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkTier {
    pub label: String,
    /// Lowest average RIT that still lands in this tier.
    pub min_rit: f64,
}

/// Per-grade benchmark cuts, each grade's tiers held highest cut first so
/// index 0 is tier 1. The bottom tier acts as the catch-all.
#[derive(Debug, Clone, Default)]
pub struct BenchmarkThresholds {
    by_grade: BTreeMap<u8, Vec<BenchmarkTier>>,
}

impl BenchmarkThresholds {
    pub fn new() -> BenchmarkThresholds {
        BenchmarkThresholds::default()
    }

    /// Distance-to-tier reporting reads the top two cuts, so a grade with
    /// fewer than two tiers is a configuration error.
    pub fn insert_grade(&mut self, grade: u8, mut tiers: Vec<BenchmarkTier>) -> Result<()> {
        if tiers.len() < 2 {
            bail!("grade {grade}: benchmark table needs at least two tiers");
        }
        for tier in &tiers {
            if !tier.min_rit.is_finite() {
                bail!("grade {grade}: tier {:?} cut must be finite", tier.label);
            }
        }
        tiers.sort_by(|a, b| b.min_rit.partial_cmp(&a.min_rit).unwrap_or(Ordering::Equal));
        self.by_grade.insert(grade, tiers);
        Ok(())
    }

    pub fn tiers(&self, grade: u8) -> Option<&[BenchmarkTier]> {
        self.by_grade.get(&grade).map(|tiers| tiers.as_slice())
    }

    /// A JSON object mapping grade to its tier list:
    /// `{"5": [{"label": "Tier 1", "minRit": 218.0}, ...]}`.
    pub fn from_json_str(text: &str) -> Result<BenchmarkThresholds> {
        let raw: BTreeMap<String, Vec<BenchmarkTier>> =
            serde_json::from_str(text).context("benchmark table is not valid JSON")?;
        let mut thresholds = BenchmarkThresholds::new();
        for (grade_key, tiers) in raw {
            let grade: u8 = grade_key
                .trim()
                .parse()
                .with_context(|| format!("benchmark table: bad grade key {grade_key:?}"))?;
            thresholds.insert_grade(grade, tiers)?;
        }
        Ok(thresholds)
    }
}
