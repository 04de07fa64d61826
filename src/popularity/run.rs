use std::collections::HashMap;

use futures_util::StreamExt;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::domain::PopularityVersion;
use crate::error::PopularityError;
use crate::popularity::aggregate::{ActorAccumulator, accumulate_principal};
use crate::popularity::calibrator::calibrate;
use crate::popularity::compose::compose_scores;
use crate::popularity::connectivity::star_connectivity_score;
use crate::popularity::normalize::{FeatureWeights, base_popularity, mean_hit_year, raw_features};
use crate::popularity::quality::{build_title_genre_map, build_title_quality_map};
use crate::popularity::version::publish_version;
use crate::repository;

/// Runs one full popularity recalculation pass and returns the published
/// version row.
///
/// The whole run happens inside a single transaction: a crash midway
/// leaves neither a half-applied actor update nor an orphaned version row,
/// matching the database-consistency contract. Empty intermediate results
/// are logged as warnings, never treated as failures — the run still
/// publishes a version, just one that scores nobody.
pub async fn recalc_actor_popularity(
    pool: &PgPool,
    weights: FeatureWeights,
    notes: &str,
) -> Result<PopularityVersion, PopularityError> {
    let mut tx = pool.begin().await.map_err(PopularityError::Precondition)?;

    let titles = repository::load_rated_titles(&mut tx)
        .await
        .map_err(PopularityError::Precondition)?;
    if titles.is_empty() {
        warn!("{}", PopularityError::EmptyInput);
    }

    let calibration = calibrate(&titles);
    let title_quality = build_title_quality_map(&titles, calibration);
    if title_quality.is_empty() {
        warn!("{}", PopularityError::EmptyQuality);
    }

    let genre_names = repository::load_genre_names(&mut tx)
        .await
        .map_err(PopularityError::Precondition)?;
    let title_genre_rows = repository::load_title_genres(&mut tx)
        .await
        .map_err(PopularityError::Precondition)?;
    let title_genres = build_title_genre_map(&title_quality, &title_genre_rows, &genre_names);
    let title_start_year = repository::title_start_years(&titles);

    let mut accumulators: HashMap<i64, ActorAccumulator> = HashMap::new();
    let mut principal_stream = repository::acting_principals_stream(&mut tx);
    let mut principals_processed = 0u64;
    while let Some(principal) = principal_stream.next().await {
        let principal = principal.map_err(PopularityError::Precondition)?;
        accumulate_principal(
            principal,
            &title_quality,
            &title_genres,
            &title_start_year,
            &mut accumulators,
        );
        principals_processed += 1;
        if principals_processed.is_multiple_of(1_000_000) {
            info!(processed = principals_processed, "streamed principal rows");
        }
    }
    drop(principal_stream);
    info!(processed = principals_processed, "finished streaming principals");
    if accumulators.is_empty() {
        warn!("{}", PopularityError::EmptyAggregate);
    }

    let raw = raw_features(&accumulators);
    let mean_hit = mean_hit_year(&accumulators);
    let base_pop = base_popularity(&raw, weights);

    let edges = repository::load_actor_edges(&mut tx)
        .await
        .map_err(PopularityError::Precondition)?;
    let scs_norm = star_connectivity_score(&edges, &base_pop);

    let actor_ids: Vec<i64> = base_pop.keys().copied().collect();
    let flags = repository::load_actor_flags(&mut tx, &actor_ids)
        .await
        .map_err(PopularityError::Precondition)?;

    let scores: HashMap<i64, f64> = compose_scores(&base_pop, &scs_norm, &mean_hit, &flags);

    let version = publish_version(&mut tx, weights, calibration, notes)
        .await
        .map_err(PopularityError::Persistence)?;

    repository::apply_scores(&mut tx, version.id, &scores)
        .await
        .map_err(PopularityError::Persistence)?;

    tx.commit().await.map_err(PopularityError::Persistence)?;

    info!(
        version_id = version.id,
        actors_scored = scores.len(),
        "popularity recalculation complete"
    );

    Ok(version)
}
