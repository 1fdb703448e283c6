use axum::extract::{Extension, Json, Path};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::api::AdminAPI;
use crate::auth::IdentityProvider;
use crate::entities::{AdminRecord, AuthResult};
use crate::error::{permission_denied_error, Error};
use crate::server::caller::Caller;
use crate::server::DynAPI;

#[derive(Deserialize)]
pub struct AuthenticateParams {
    pub credential: String,
}

#[derive(Serialize, Deserialize)]
pub struct AdminStatus {
    identity: String,
    is_admin: bool,
}

pub async fn authenticate(
    Extension(api): Extension<DynAPI>,
    caller: Caller,
    Json(params): Json<AuthenticateParams>,
) -> Result<Json<AuthResult>, Error> {
    let result = api
        .authenticate(&caller.identity, SecretString::from(params.credential))
        .await?;

    Ok(result.into())
}

/// Only a signed-in admin may read the admin set.
pub async fn record(
    Extension(api): Extension<DynAPI>,
    caller: Caller,
) -> Result<Json<AdminRecord>, Error> {
    let identity = caller
        .identity
        .current_identity()
        .await
        .ok_or_else(permission_denied_error)?;

    if !api.is_admin(&identity).await? {
        return Err(permission_denied_error());
    }

    let record = api.admin_record().await?;

    Ok(record.into())
}

pub async fn status(
    Extension(api): Extension<DynAPI>,
    Path(identity): Path<String>,
) -> Result<Json<AdminStatus>, Error> {
    let is_admin = api.is_admin(&identity).await?;

    Ok(AdminStatus { identity, is_admin }.into())
}
