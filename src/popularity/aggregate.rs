use std::collections::{HashMap, HashSet};

use crate::domain::TitlePrincipal;

/// Per-actor running sums streamed out of the principals table.
///
/// Packed into one struct per actor (rather than five parallel maps) for
/// cache locality during the single pass over principals, per the
/// dense-accumulator guidance for tens-of-millions-row streams.
#[derive(Debug, Clone, Default)]
pub struct ActorAccumulator {
    pub role_sum: f64,
    pub quality_sum: f64,
    pub roles_count: u32,
    pub genre_set: HashSet<String>,
    pub year_weight_sum: f64,
    pub year_weight_mass: f64,
}

/// Role-weight function `MR(ordering)`. A missing ordering (`None`) is
/// treated as the `>= 8` bucket, matching the "missing ordering" data
/// anomaly rule.
pub fn role_weight(ordering: Option<i32>) -> f64 {
    match ordering {
        Some(1) => 1.0,
        Some(o) if (2..=3).contains(&o) => 0.6,
        Some(o) if (4..=7).contains(&o) => 0.3,
        _ => 0.1,
    }
}

/// Folds a single principal row into `accumulators`, the per-row step of
/// the aggregation. Exposed on its own so a caller streaming rows
/// straight off the database (see `repository::acting_principals_stream`)
/// can accumulate as it goes without ever collecting the rows into a
/// `Vec` first.
pub fn accumulate_principal(
    principal: TitlePrincipal,
    title_quality: &HashMap<i64, f64>,
    title_genres: &HashMap<i64, HashSet<String>>,
    title_start_year: &HashMap<i64, i32>,
    accumulators: &mut HashMap<i64, ActorAccumulator>,
) {
    if !matches!(principal.category.as_str(), "actor" | "actress") {
        return;
    }

    let Some(&q) = title_quality.get(&principal.title_id) else {
        return;
    };

    let mr = role_weight(principal.ordering);
    let w = mr * q;

    let acc = accumulators.entry(principal.actor_id).or_default();
    acc.role_sum += mr;
    acc.quality_sum += w;
    acc.roles_count += 1;
    if let Some(genres) = title_genres.get(&principal.title_id) {
        acc.genre_set.extend(genres.iter().cloned());
    }
    if let Some(&start_year) = title_start_year.get(&principal.title_id) {
        acc.year_weight_sum += start_year as f64 * w;
        acc.year_weight_mass += w;
    }
}

/// Accumulates per-actor sums over an already in-memory collection of
/// principal rows. Used by tests and anywhere the full set is already
/// materialized; the live pipeline instead drives
/// `repository::acting_principals_stream` row by row through
/// `accumulate_principal` so the principals table is never collected
/// into a `Vec`.
pub fn aggregate_principals(
    principals: impl IntoIterator<Item = TitlePrincipal>,
    title_quality: &HashMap<i64, f64>,
    title_genres: &HashMap<i64, HashSet<String>>,
    title_start_year: &HashMap<i64, i32>,
) -> HashMap<i64, ActorAccumulator> {
    let mut accumulators: HashMap<i64, ActorAccumulator> = HashMap::new();

    for principal in principals {
        accumulate_principal(
            principal,
            title_quality,
            title_genres,
            title_start_year,
            &mut accumulators,
        );
    }

    accumulators
}
