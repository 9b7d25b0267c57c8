//! MAP growth computations: the administration calendar, norm and benchmark
//! lookups, per-student growth, and the cohort, spotlight, and class-level
//! reports built on top.

pub mod cohort;
pub mod compare;
pub mod engine;
pub mod norms;
pub mod spotlight;
pub mod terms;
pub mod types;

pub use cohort::{cross_grade_growth, GradeCohortGrowth, SubjectGrowthSummary, COHORT_GRADES};
pub use compare::{
    class_growth_comparison, ClassGrowthSummary, GrowthDistribution, HIGH_GROWTH_INDEX,
    UNASSIGNED_CLASS,
};
pub use engine::{benchmark_status, growth_index, student_growth, BenchmarkStatus};
pub use norms::{BenchmarkThresholds, BenchmarkTier, GrowthNorms};
pub use spotlight::{
    growth_spotlight, SpotlightEntry, SpotlightFlag, SpotlightReport, LOW_GROWTH_INDEX,
    RAPID_GUESS_PERCENTAGE,
};
pub use terms::{
    classify_growth_period, AcademicYear, GrowthPeriod, GrowthPeriodKind, Season, Term,
};
pub use types::{GrowthResult, MapAssessmentRecord, Subject};
