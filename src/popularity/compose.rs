use std::collections::HashMap;

/// Per-actor editorial/override flags consulted by the score composer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActorFlags {
    pub is_voice_actor: bool,
    pub blackmark: bool,
    pub wildcard: bool,
}

fn age_factor(mean_hit_year: Option<f64>) -> f64 {
    match mean_hit_year {
        None => 1.0,
        Some(year) if year < 1970.0 => 0.10,
        Some(year) if year < 1985.0 => 0.35,
        Some(year) if year < 2000.0 => 0.75,
        Some(_) => 1.0,
    }
}

/// Blends base popularity and SCS, applies age decay and the
/// blackmark/wildcard/voice overrides, in the exact order the contract
/// specifies: age decay, then blackmark, then wildcard, then voice last.
pub fn compose_scores(
    base_pop: &HashMap<i64, f64>,
    scs_norm: &HashMap<i64, f64>,
    mean_hit_year: &HashMap<i64, f64>,
    flags: &HashMap<i64, ActorFlags>,
) -> HashMap<i64, f64> {
    base_pop
        .iter()
        .map(|(&actor_id, &pop)| {
            let scs = scs_norm.get(&actor_id).copied().unwrap_or(0.0);
            let mut combined = 0.5 * pop + 0.5 * scs;

            combined *= age_factor(mean_hit_year.get(&actor_id).copied());

            let actor_flags = flags.get(&actor_id).copied().unwrap_or_default();

            if actor_flags.blackmark {
                combined = 0.0;
            } else if actor_flags.wildcard && combined > 0.0 {
                combined = (combined * 1.3).min(1000.0);
            }

            if actor_flags.is_voice_actor {
                combined = 0.0;
            }

            (actor_id, combined)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_ladder_matches_documented_factors() {
        assert_eq!(age_factor(Some(1969.0)), 0.10);
        assert_eq!(age_factor(Some(1970.0)), 0.35);
        assert_eq!(age_factor(Some(1984.0)), 0.35);
        assert_eq!(age_factor(Some(1985.0)), 0.75);
        assert_eq!(age_factor(Some(1999.0)), 0.75);
        assert_eq!(age_factor(Some(2000.0)), 1.0);
        assert_eq!(age_factor(None), 1.0);
    }

    #[test]
    fn blackmark_dominates_wildcard() {
        let base_pop = HashMap::from([(1i64, 600.0)]);
        let scs = HashMap::from([(1i64, 600.0)]);
        let flags = HashMap::from([(
            1i64,
            ActorFlags {
                is_voice_actor: false,
                blackmark: true,
                wildcard: true,
            },
        )]);
        let out = compose_scores(&base_pop, &scs, &HashMap::new(), &flags);
        assert_eq!(out[&1], 0.0);
    }

    #[test]
    fn voice_actor_overrides_wildcard_boost() {
        let base_pop = HashMap::from([(1i64, 600.0)]);
        let scs = HashMap::from([(1i64, 600.0)]);
        let flags = HashMap::from([(
            1i64,
            ActorFlags {
                is_voice_actor: true,
                blackmark: false,
                wildcard: true,
            },
        )]);
        let out = compose_scores(&base_pop, &scs, &HashMap::new(), &flags);
        assert_eq!(out[&1], 0.0);
    }

    #[test]
    fn wildcard_boosts_and_caps_at_one_thousand() {
        let base_pop = HashMap::from([(1i64, 900.0)]);
        let scs = HashMap::from([(1i64, 900.0)]);
        let flags = HashMap::from([(
            1i64,
            ActorFlags {
                is_voice_actor: false,
                blackmark: false,
                wildcard: true,
            },
        )]);
        let out = compose_scores(&base_pop, &scs, &HashMap::new(), &flags);
        // combined pre-boost = 900, * 1.3 = 1170 -> capped at 1000.
        assert_eq!(out[&1], 1000.0);
    }

    #[test]
    fn isolated_actor_combined_is_half_base_pop_pre_age() {
        let base_pop = HashMap::from([(1i64, 600.0)]);
        let scs = HashMap::from([(1i64, 0.0)]);
        let out = compose_scores(&base_pop, &scs, &HashMap::new(), &HashMap::new());
        assert_eq!(out[&1], 300.0);
    }

    #[test]
    fn age_era_ladder_end_to_end() {
        let base_pop = HashMap::from([(1i64, 1000.0), (2i64, 1000.0), (3i64, 1000.0), (4i64, 1000.0)]);
        let scs = HashMap::from([(1i64, 1000.0), (2i64, 1000.0), (3i64, 1000.0), (4i64, 1000.0)]);
        let years = HashMap::from([(1i64, 1960.0), (2i64, 1980.0), (3i64, 1995.0), (4i64, 2010.0)]);
        let out = compose_scores(&base_pop, &scs, &years, &HashMap::new());
        assert_eq!(out[&1], 100.0);
        assert_eq!(out[&2], 350.0);
        assert_eq!(out[&3], 750.0);
        assert_eq!(out[&4], 1000.0);
    }
}
