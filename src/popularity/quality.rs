use std::collections::{HashMap, HashSet};

use crate::domain::{Title, TitleGenre};
use crate::popularity::calibrator::Calibration;

const MIN_VOTES_QUALITY: i64 = 2_000;

const HIT_VOTES_LEVEL_1: i64 = 20_000;
const HIT_VOTES_LEVEL_2: i64 = 100_000;
const HIT_VOTES_LEVEL_3: i64 = 500_000;

const HIT_MULT_LEVEL_1: f64 = 1.5;
const HIT_MULT_LEVEL_2: f64 = 2.0;
const HIT_MULT_LEVEL_3: f64 = 3.0;

/// Stepwise "global hit" multiplier for a vote count. Thresholds are
/// strict `>=`.
fn hit_multiplier(votes: i64) -> f64 {
    if votes >= HIT_VOTES_LEVEL_3 {
        HIT_MULT_LEVEL_3
    } else if votes >= HIT_VOTES_LEVEL_2 {
        HIT_MULT_LEVEL_2
    } else if votes >= HIT_VOTES_LEVEL_1 {
        HIT_MULT_LEVEL_1
    } else {
        1.0
    }
}

/// Builds the per-title quality map `Q(t)`. Titles failing any filter are
/// absent from the result and therefore invisible to every later stage.
pub fn build_title_quality_map(titles: &[Title], calibration: Calibration) -> HashMap<i64, f64> {
    let mut quality = HashMap::new();

    for title in titles {
        let (Some(rating), Some(votes)) = (title.imdb_rating, title.imdb_votes) else {
            continue;
        };

        if votes < MIN_VOTES_QUALITY {
            continue;
        }

        let rating_boost = rating - calibration.c;
        if rating_boost <= 0.0 {
            continue;
        }

        let denom = votes as f64 + calibration.m as f64;
        if denom <= 0.0 {
            continue;
        }
        let vote_factor = votes as f64 / denom;
        if vote_factor <= 0.0 {
            continue;
        }

        let base_q = vote_factor * rating_boost;
        if base_q <= 0.0 {
            continue;
        }

        let q = base_q * hit_multiplier(votes);
        if q <= 0.0 {
            continue;
        }

        quality.insert(title.id, q);
    }

    quality
}

/// Builds the per-title genre-name set for every title present in
/// `quality`. Titles without a genre row default to the empty set.
pub fn build_title_genre_map(
    quality: &HashMap<i64, f64>,
    title_genres: &[TitleGenre],
    genre_names: &HashMap<i64, String>,
) -> HashMap<i64, HashSet<String>> {
    let mut map: HashMap<i64, HashSet<String>> = HashMap::new();

    for tg in title_genres {
        if !quality.contains_key(&tg.title_id) {
            continue;
        }
        let Some(name) = genre_names.get(&tg.genre_id) else {
            continue;
        };
        map.entry(tg.title_id).or_default().insert(name.clone());
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title(id: i64, rating: f64, votes: i64) -> Title {
        Title {
            id,
            tconst: format!("tt{id:07}"),
            title_type: "movie".to_string(),
            start_year: None,
            imdb_rating: Some(rating),
            imdb_votes: Some(votes),
        }
    }

    #[test]
    fn below_minimum_votes_is_dropped() {
        let cal = Calibration { c: 5.0, m: 1 };
        let titles = vec![title(1, 9.0, 1_999)];
        let q = build_title_quality_map(&titles, cal);
        assert!(q.is_empty());
    }

    #[test]
    fn rating_at_or_below_mean_is_dropped() {
        let cal = Calibration { c: 7.0, m: 1 };
        let titles = vec![title(1, 7.0, 10_000)];
        let q = build_title_quality_map(&titles, cal);
        assert!(q.is_empty());
    }

    #[test]
    fn hit_multiplier_cliffs_at_documented_thresholds() {
        assert_eq!(hit_multiplier(19_999), 1.0);
        assert_eq!(hit_multiplier(20_000), 1.5);
        assert_eq!(hit_multiplier(99_999), 1.5);
        assert_eq!(hit_multiplier(100_000), 2.0);
        assert_eq!(hit_multiplier(499_999), 2.0);
        assert_eq!(hit_multiplier(500_000), 3.0);
    }

    #[test]
    fn two_title_miniverse_matches_hand_computed_quality() {
        // vote_factor * rating_boost * hit_multiplier, per §4.2 step by step.
        let cal = Calibration { c: 5.0, m: 1 };
        let titles = vec![title(1, 8.0, 600_000), title(2, 7.0, 25_000)];
        let q = build_title_quality_map(&titles, cal);

        let q1 = q[&1]; // (600000/600001) * 3.0 * 3.0
        let q2 = q[&2]; // (25000/25001) * 2.0 * 1.5
        assert!((q1 - 8.99996).abs() < 1e-3, "Q(T1) = {q1}");
        assert!((q2 - 2.99988).abs() < 1e-3, "Q(T2) = {q2}");
    }

    #[test]
    fn genre_map_defaults_to_empty_set_for_untagged_titles() {
        let quality = HashMap::from([(1i64, 3.0)]);
        let genre_names = HashMap::from([(10i64, "Drama".to_string())]);
        let map = build_title_genre_map(&quality, &[], &genre_names);
        assert!(map.get(&1).is_none());
    }

    #[test]
    fn genre_map_ignores_titles_outside_quality() {
        let quality = HashMap::from([(1i64, 3.0)]);
        let genre_names = HashMap::from([(10i64, "Drama".to_string())]);
        let rows = vec![
            TitleGenre {
                title_id: 1,
                genre_id: 10,
            },
            TitleGenre {
                title_id: 2,
                genre_id: 10,
            },
        ];
        let map = build_title_genre_map(&quality, &rows, &genre_names);
        assert_eq!(map.len(), 1);
        assert!(map[&1].contains("Drama"));
    }
}
