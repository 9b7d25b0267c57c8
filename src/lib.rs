//! Grade and MAP-growth computations for an elementary gradebook: score
//! aggregation with the zero-as-absent rule, cohort statistics and score
//! distributions, competition rankings, and NWEA MAP growth analysis.
//!
//! The crate is a pure computation core. Rows, rosters, and permissions
//! come from the caller; the only fallible surfaces are the lookup-table
//! constructors in [`growth::norms`] and everything else answers absence
//! with `None`.

pub mod cache;
pub mod growth;
pub mod normalize;
pub mod ranking;
pub mod scores;
pub mod stats;

pub use cache::{AnalyticsCache, CacheStats, Fingerprint};
pub use ranking::{rank_by, PerformanceLevel, RankDirection, RankedEntity, Ranking};
pub use scores::{
    round2, AssessmentCode, AssessmentKind, ComponentCounts, DerivedGrade, ScoreSet,
};
pub use stats::{
    cached_cohort_statistics, cohort_statistics, distribution, trend, CohortStatistics,
    DistributionBucket, Significance, TrendDirection, TrendPoint, TrendResult,
};
