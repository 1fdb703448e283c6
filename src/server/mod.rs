mod caller;
mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};

use crate::api::{DynAPI, API};
use crate::auth::Sessions;
use crate::error::{server_error, Error};
use crate::server::handlers::{admin, history, routes, session};

pub fn router<T: API + Sync + Send + 'static>(api: T) -> Router {
    let api = Arc::new(api) as DynAPI;
    let sessions = Arc::new(Sessions::default());

    Router::new()
        .route("/session", post(session::sign_in).delete(session::sign_out))
        .route("/admin", get(admin::record))
        .route("/admin/authenticate", post(admin::authenticate))
        .route("/admin/identities/:identity", get(admin::status))
        .route("/routes", get(routes::list).post(routes::create))
        .route("/routes/:id", get(routes::find))
        .route("/routes/:id/route_data", get(routes::route_data))
        .route("/history/summary", get(history::summary))
        .route("/history/delete", post(history::delete))
        .layer(Extension(api))
        .layer(Extension(sessions))
}

pub async fn serve<T: API + Sync + Send + 'static>(api: T, addr: SocketAddr) -> Result<(), Error> {
    let app = router(api);

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .map_err(server_error)
}
