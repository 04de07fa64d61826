use thiserror::Error;

/// Error surface for a single popularity recalculation run.
///
/// The three empty-* variants are diagnostics, not failures: a run that
/// hits one of them still publishes a `PopularityVersion` row and returns
/// `Ok`. They exist so callers and logs can distinguish "nothing to do"
/// from "something broke" without inspecting row counts themselves.
#[derive(Debug, Error)]
pub enum PopularityError {
    #[error("database connection or schema precondition failed")]
    Precondition(#[from] sqlx::Error),

    #[error("failed to persist popularity results")]
    Persistence(#[source] sqlx::Error),

    #[error("no titles with both rating and votes; published version with C=0, M=1")]
    EmptyInput,

    #[error("title quality map is empty after filtering; no actors scored")]
    EmptyQuality,

    #[error("no actor matched a quality-bearing principal; no actors scored")]
    EmptyAggregate,
}
