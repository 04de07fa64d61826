use std::collections::HashMap;

use futures_util::TryStreamExt;
use sqlx::{Postgres, Transaction};
use tracing::{debug, info};

use crate::domain::{Actor, ActorEdge, PopularityVersion, Title, TitleGenre, TitlePrincipal};
use crate::popularity::compose::ActorFlags;

/// Loads every title with both `imdb_rating` and `imdb_votes` present.
///
/// This is the exact input set for both the Rating Calibrator (4.1) and
/// the Title Quality Map (4.2); titles without both fields can never pass
/// either stage's filters, so we never fetch them.
pub async fn load_rated_titles(
    tx: &mut Transaction<'_, Postgres>,
) -> Result<Vec<Title>, sqlx::Error> {
    let mut stream = sqlx::query_as::<_, Title>(
        "SELECT id, tconst, title_type, start_year, imdb_rating, imdb_votes
         FROM titles
         WHERE imdb_rating IS NOT NULL AND imdb_votes IS NOT NULL",
    )
    .fetch(&mut **tx);

    let mut titles = Vec::new();
    while let Some(row) = stream.try_next().await? {
        titles.push(row);
    }

    debug!(count = titles.len(), "loaded rated titles");
    Ok(titles)
}

/// Loads the full `genres` lookup table (small: a few dozen rows).
pub async fn load_genre_names(
    tx: &mut Transaction<'_, Postgres>,
) -> Result<HashMap<i64, String>, sqlx::Error> {
    let rows: Vec<(i64, String)> = sqlx::query_as("SELECT id, name FROM genres")
        .fetch_all(&mut **tx)
        .await?;
    Ok(rows.into_iter().collect())
}

/// Streams the full `titles_genres` membership table. Rows whose title is
/// not in the quality map are filtered out by the caller in O(1).
pub async fn load_title_genres(
    tx: &mut Transaction<'_, Postgres>,
) -> Result<Vec<TitleGenre>, sqlx::Error> {
    let mut stream =
        sqlx::query_as::<_, TitleGenre>("SELECT title_id, genre_id FROM titles_genres")
            .fetch(&mut **tx);

    let mut rows = Vec::new();
    while let Some(row) = stream.try_next().await? {
        rows.push(row);
    }
    Ok(rows)
}

/// Opens a streaming cursor over every actor/actress principal row.
/// Filtering by category is pushed into the query so non-acting rows
/// never cross the wire.
///
/// Deliberately returns the raw stream rather than a `Vec`: this table is
/// expected to hold tens of millions of rows, and the caller is expected
/// to fold each row into an accumulator as it arrives rather than
/// collecting them first (see `popularity::aggregate::accumulate_principal`).
pub fn acting_principals_stream<'t>(
    tx: &'t mut Transaction<'_, Postgres>,
) -> impl futures_util::Stream<Item = Result<TitlePrincipal, sqlx::Error>> + 't {
    sqlx::query_as::<_, TitlePrincipal>(
        "SELECT id, title_id, actor_id, ordering, category
         FROM titles_principals
         WHERE category IN ('actor', 'actress')",
    )
    .fetch(&mut **tx)
}

/// Streams the full undirected actor co-appearance graph.
pub async fn load_actor_edges(
    tx: &mut Transaction<'_, Postgres>,
) -> Result<Vec<ActorEdge>, sqlx::Error> {
    let mut stream = sqlx::query_as::<_, ActorEdge>(
        "SELECT actor_id_low, actor_id_high, weight FROM actor_edges",
    )
    .fetch(&mut **tx);

    let mut rows = Vec::new();
    while let Some(row) = stream.try_next().await? {
        rows.push(row);
    }

    debug!(count = rows.len(), "loaded actor edges");
    Ok(rows)
}

/// Loads editorial flags for exactly the actors the caller cares about.
pub async fn load_actor_flags(
    tx: &mut Transaction<'_, Postgres>,
    actor_ids: &[i64],
) -> Result<HashMap<i64, ActorFlags>, sqlx::Error> {
    if actor_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(i64, bool, bool, bool)> = sqlx::query_as(
        "SELECT id, is_voice_actor, blackmark, wildcard
         FROM actors
         WHERE id = ANY($1)",
    )
    .bind(actor_ids)
    .fetch_all(&mut **tx)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, is_voice_actor, blackmark, wildcard)| {
            (
                id,
                ActorFlags {
                    is_voice_actor,
                    blackmark,
                    wildcard,
                },
            )
        })
        .collect())
}

/// Inserts the version row that will tag every actor this run touches.
///
/// Must run before any actor update so a crash mid-run never leaves an
/// actor pointing at a version id that was never committed.
pub async fn insert_version(
    tx: &mut Transaction<'_, Postgres>,
    weight_role: f64,
    weight_quality: f64,
    weight_reach: f64,
    global_mean_rating: f64,
    min_votes_for_weight: i64,
    notes: &str,
) -> Result<PopularityVersion, sqlx::Error> {
    sqlx::query_as::<_, PopularityVersion>(
        "INSERT INTO popularity_versions
             (weight_role, weight_quality, weight_reach, global_mean_rating, min_votes_for_weight, notes)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING id, created_at, weight_role, weight_quality, weight_reach,
                   global_mean_rating, min_votes_for_weight, notes",
    )
    .bind(weight_role)
    .bind(weight_quality)
    .bind(weight_reach)
    .bind(global_mean_rating)
    .bind(min_votes_for_weight)
    .bind(notes)
    .fetch_one(&mut **tx)
    .await
}

const UPDATE_BATCH_SIZE: usize = 5_000;

/// Writes `popularity_score` and `popularity_version_id` for every scored
/// actor, batched to keep individual statements bounded.
///
/// Actors absent from `scores` are untouched and keep their prior score
/// and version, per the contract.
pub async fn apply_scores(
    tx: &mut Transaction<'_, Postgres>,
    version_id: i64,
    scores: &HashMap<i64, f64>,
) -> Result<(), sqlx::Error> {
    let actor_ids: Vec<i64> = scores.keys().copied().collect();

    for chunk in actor_ids.chunks(UPDATE_BATCH_SIZE) {
        let chunk_scores: Vec<f64> = chunk.iter().map(|id| scores[id]).collect();

        sqlx::query(
            "UPDATE actors
             SET popularity_score = data.score,
                 popularity_version_id = $1
             FROM UNNEST($2::bigint[], $3::double precision[]) AS data(id, score)
             WHERE actors.id = data.id",
        )
        .bind(version_id)
        .bind(chunk)
        .bind(&chunk_scores)
        .execute(&mut **tx)
        .await?;

        info!(batch_size = chunk.len(), "updated actor popularity batch");
    }

    Ok(())
}

/// Fetches a single actor by id; used by integration tests and tooling,
/// not by the core pipeline.
pub async fn find_actor_by_nconst(
    tx: &mut Transaction<'_, Postgres>,
    nconst: &str,
) -> Result<Option<Actor>, sqlx::Error> {
    sqlx::query_as::<_, Actor>(
        "SELECT id, nconst, name, birth_year, death_year, is_voice_actor, blackmark, wildcard,
                popularity_score, popularity_version_id
         FROM actors
         WHERE nconst = $1",
    )
    .bind(nconst)
    .fetch_optional(&mut **tx)
    .await
}

/// Builds the `title_id -> start_year` map the aggregator needs for the
/// quality-weighted mean-hit-year feature.
pub fn title_start_years(titles: &[Title]) -> HashMap<i64, i32> {
    titles
        .iter()
        .filter_map(|t| t.start_year.map(|y| (t.id, y)))
        .collect()
}
