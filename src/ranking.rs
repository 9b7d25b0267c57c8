use crate::scores::round2;
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankDirection {
    /// Higher metric is better (grades, growth).
    Descending,
    /// Lower metric is better (time, error counts).
    Ascending,
}

/// Report-card wording for a numeric grade. Boundaries track `SCORE_BANDS`
/// in `stats`; the two must move together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PerformanceLevel {
    Excellent,
    Good,
    Satisfactory,
    NeedsImprovement,
}

impl PerformanceLevel {
    pub fn for_value(value: f64) -> Self {
        if value >= 90.0 {
            PerformanceLevel::Excellent
        } else if value >= 80.0 {
            PerformanceLevel::Good
        } else if value >= 60.0 {
            PerformanceLevel::Satisfactory
        } else {
            PerformanceLevel::NeedsImprovement
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntity<T> {
    pub entity: T,
    pub metric: f64,
    pub rank: usize,
    pub rank_label: String,
    pub delta_vs_group_average: f64,
    pub performance_level: PerformanceLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ranking<T> {
    pub ranked: Vec<RankedEntity<T>>,
    /// Entities whose metric was absent. Listed, never ranked.
    pub unranked: Vec<T>,
    pub group_average: Option<f64>,
}

/// Rank entities by a metric using standard competition ranking: equal
/// metrics share a rank and the next distinct metric resumes at
/// `position + 1`, so `[95, 88, 88, 72]` ranks `1, 2, 2, 4`. Entities with
/// no metric are set aside in `unranked` and excluded from the group
/// average. Ties keep input order.
pub fn rank_by<T, F>(
    entities: Vec<T>,
    scope: &str,
    direction: RankDirection,
    metric: F,
) -> Ranking<T>
where
    F: Fn(&T) -> Option<f64>,
{
    let mut scored: Vec<(T, f64)> = Vec::with_capacity(entities.len());
    let mut unranked = Vec::new();
    for entity in entities {
        match metric(&entity) {
            Some(value) => scored.push((entity, value)),
            None => unranked.push(entity),
        }
    }

    // Deltas subtract the exact mean; only the published average is rounded.
    let mean = if scored.is_empty() {
        None
    } else {
        Some(scored.iter().map(|(_, v)| v).sum::<f64>() / scored.len() as f64)
    };

    scored.sort_by(|(_, a), (_, b)| match direction {
        RankDirection::Descending => b.partial_cmp(a).unwrap_or(Ordering::Equal),
        RankDirection::Ascending => a.partial_cmp(b).unwrap_or(Ordering::Equal),
    });

    let average = mean.unwrap_or(0.0);
    let mut ranked = Vec::with_capacity(scored.len());
    let mut previous: Option<(f64, usize)> = None;
    for (position, (entity, value)) in scored.into_iter().enumerate() {
        let rank = match previous {
            Some((prev_value, prev_rank)) if value == prev_value => prev_rank,
            _ => position + 1,
        };
        previous = Some((value, rank));
        ranked.push(RankedEntity {
            entity,
            metric: value,
            rank,
            rank_label: format!("#{rank} in {scope}"),
            delta_vs_group_average: round2(value - average),
            performance_level: PerformanceLevel::for_value(value),
        });
    }

    Ranking {
        ranked,
        unranked,
        group_average: mean.map(round2),
    }
}
