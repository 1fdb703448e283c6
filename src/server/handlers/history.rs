use std::collections::BTreeSet;

use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::HistoryAPI;
use crate::entities::{DeleteOutcome, HistorySummary};
use crate::error::{stale_listing_error, Error};
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct DeleteParams {
    /// Ids of the listing the positions refer to, in the order it was shown.
    pub listed: Vec<Uuid>,
    pub indices: BTreeSet<usize>,
}

pub async fn summary(Extension(api): Extension<DynAPI>) -> Result<Json<HistorySummary>, Error> {
    let summary = api.history_summary().await?;

    Ok(summary.into())
}

/// Positions refer to `listed`, which must still match `GET /routes`.
pub async fn delete(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<DeleteParams>,
) -> Result<Json<Vec<DeleteOutcome>>, Error> {
    let routes = api.list_routes().await?;

    if !routes.iter().map(|route| route.id).eq(params.listed.iter().copied()) {
        tracing::warn!("rejecting delete against a stale history listing");
        return Err(stale_listing_error());
    }

    let outcomes = api.delete_at(&routes, &params.indices).await;

    Ok(outcomes.into())
}
