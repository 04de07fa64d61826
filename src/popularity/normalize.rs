use std::collections::HashMap;

use crate::popularity::aggregate::ActorAccumulator;

/// Raw (pre-normalization) per-actor features plus the quality-weighted
/// mean release year used for age decay downstream.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawFeatures {
    pub role: f64,
    pub quality: f64,
    pub reach: f64,
}

pub fn raw_features(accumulators: &HashMap<i64, ActorAccumulator>) -> HashMap<i64, RawFeatures> {
    accumulators
        .iter()
        .map(|(&actor_id, acc)| {
            let role = if acc.role_sum > 0.0 {
                (1.0 + acc.role_sum).ln()
            } else {
                0.0
            };
            let quality = if acc.quality_sum > 0.0 {
                (1.0 + acc.quality_sum).ln()
            } else {
                0.0
            };
            let genre_term = if !acc.genre_set.is_empty() {
                (1.0 + acc.genre_set.len() as f64).ln()
            } else {
                0.0
            };
            let roles_term = if acc.roles_count > 0 {
                (1.0 + acc.roles_count as f64).ln()
            } else {
                0.0
            };
            let reach = genre_term + 0.5 * roles_term;

            (actor_id, RawFeatures { role, quality, reach })
        })
        .collect()
}

/// Quality-weighted mean release year per actor; absent when the actor
/// has no weighted mass (no title with a known `start_year`).
pub fn mean_hit_year(accumulators: &HashMap<i64, ActorAccumulator>) -> HashMap<i64, f64> {
    accumulators
        .iter()
        .filter_map(|(&actor_id, acc)| {
            (acc.year_weight_mass > 0.0)
                .then(|| (actor_id, acc.year_weight_sum / acc.year_weight_mass))
        })
        .collect()
}

/// Min–max normalization into `[0, 1]`. Empty input yields empty output;
/// a uniform input (all values equal) yields `0.5` for every key.
pub fn min_max_normalize(values: &HashMap<i64, f64>) -> HashMap<i64, f64> {
    if values.is_empty() {
        return HashMap::new();
    }

    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &v in values.values() {
        lo = lo.min(v);
        hi = hi.max(v);
    }

    if hi > lo {
        let scale = 1.0 / (hi - lo);
        values
            .iter()
            .map(|(&id, &v)| (id, (v - lo) * scale))
            .collect()
    } else {
        values.keys().map(|&id| (id, 0.5)).collect()
    }
}

/// Weights applied to the three normalized components.
///
/// Not required to sum to 1.0; `base_popularity` clamps the result.
#[derive(Debug, Clone, Copy)]
pub struct FeatureWeights {
    pub role: f64,
    pub quality: f64,
    pub reach: f64,
}

impl Default for FeatureWeights {
    fn default() -> Self {
        Self {
            role: 0.15,
            quality: 0.70,
            reach: 0.15,
        }
    }
}

/// Composes the 0–1000 base popularity score for every actor with a raw
/// feature entry.
pub fn base_popularity(
    raw: &HashMap<i64, RawFeatures>,
    weights: FeatureWeights,
) -> HashMap<i64, f64> {
    let role_values: HashMap<i64, f64> = raw.iter().map(|(&id, f)| (id, f.role)).collect();
    let quality_values: HashMap<i64, f64> = raw.iter().map(|(&id, f)| (id, f.quality)).collect();
    let reach_values: HashMap<i64, f64> = raw.iter().map(|(&id, f)| (id, f.reach)).collect();

    let role_norm = min_max_normalize(&role_values);
    let quality_norm = min_max_normalize(&quality_values);
    let reach_norm = min_max_normalize(&reach_values);

    raw.keys()
        .map(|&id| {
            let sr = role_norm.get(&id).copied().unwrap_or(0.0);
            let sq = quality_norm.get(&id).copied().unwrap_or(0.0);
            let srh = reach_norm.get(&id).copied().unwrap_or(0.0);

            let score01 = (weights.role * sr + weights.quality * sq + weights.reach * srh)
                .clamp(0.0, 1.0);
            (id, score01 * 1000.0)
        })
        .collect()
}
