use sqlx::{Postgres, Transaction};

use crate::domain::PopularityVersion;
use crate::popularity::calibrator::Calibration;
use crate::popularity::normalize::FeatureWeights;
use crate::repository;

/// Publishes the version row that tags every actor a run touches.
///
/// Thin wrapper over the repository insert; kept as its own module because
/// the spec treats version publishing as its own pipeline stage (4.8) with
/// its own invariant (must commit before any actor is repointed at it).
pub async fn publish_version(
    tx: &mut Transaction<'_, Postgres>,
    weights: FeatureWeights,
    calibration: Calibration,
    notes: &str,
) -> Result<PopularityVersion, sqlx::Error> {
    repository::insert_version(
        tx,
        weights.role,
        weights.quality,
        weights.reach,
        calibration.c,
        calibration.m,
        notes,
    )
    .await
}
