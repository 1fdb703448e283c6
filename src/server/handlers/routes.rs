use axum::extract::{Extension, Json, Path};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::HistoryAPI;
use crate::entities::{RouteData, SavedRoute};
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct CreateParams {
    route_name: Option<String>,
    route: RouteData,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<CreateParams>,
) -> Result<Json<SavedRoute>, Error> {
    let route = api.save_route(params.route, params.route_name).await?;

    Ok(route.into())
}

pub async fn list(Extension(api): Extension<DynAPI>) -> Result<Json<Vec<SavedRoute>>, Error> {
    let routes = api.list_routes().await?;

    Ok(routes.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<SavedRoute>, Error> {
    let route = api.find_route(id).await?;

    Ok(route.into())
}

pub async fn route_data(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<RouteData>, Error> {
    let route = api.find_route(id).await?;

    Ok(api.reconstruct(&route).into())
}
