use chrono::{DateTime, Utc};

/// A movie, series, or other IMDb title.
///
/// `imdb_rating` and `imdb_votes` are either both present or both absent;
/// the engine never relies on one without the other.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Title {
    pub id: i64,
    pub tconst: String,
    pub title_type: String,
    pub start_year: Option<i32>,
    pub imdb_rating: Option<f64>,
    pub imdb_votes: Option<i64>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

/// A single (title, genre) membership row from `titles_genres`.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct TitleGenre {
    pub title_id: i64,
    pub genre_id: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Actor {
    pub id: i64,
    pub nconst: String,
    pub name: String,
    pub birth_year: Option<i32>,
    pub death_year: Option<i32>,
    pub is_voice_actor: bool,
    pub blackmark: bool,
    pub wildcard: bool,
    pub popularity_score: Option<f64>,
    pub popularity_version_id: Option<i64>,
}

/// Normalized role lookup (`professions` / `actor_professions`); not
/// consulted by the popularity pipeline itself, carried for completeness.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Profession {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct ActorProfession {
    pub actor_id: i64,
    pub profession_id: i64,
}

/// A single top-billed credit linking an actor to a title.
///
/// A missing `ordering` is represented as `None` by the loader and treated
/// as weight-0.1 (category `> 7`) by the role-weight function.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TitlePrincipal {
    pub id: i64,
    pub title_id: i64,
    pub actor_id: i64,
    pub ordering: Option<i32>,
    pub category: String,
}

/// Free-text character name attached to a principal credit; read-only
/// context the popularity engine never touches.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TitlePrincipalCharacter {
    pub principal_id: i64,
    pub character_name: String,
}

/// An undirected co-appearance edge between two actors.
///
/// `actor_id_low < actor_id_high` is a database-enforced invariant; the
/// in-memory representation keeps the same ordering but the connectivity
/// scorer treats the edge symmetrically regardless of which side either
/// actor appears on.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct ActorEdge {
    pub actor_id_low: i64,
    pub actor_id_high: i64,
    pub weight: i32,
}

/// An immutable snapshot of the parameters used for one popularity run.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PopularityVersion {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub weight_role: f64,
    pub weight_quality: f64,
    pub weight_reach: f64,
    pub global_mean_rating: f64,
    pub min_votes_for_weight: i64,
    pub notes: String,
}
