use std::sync::Arc;

use axum::extract::{Extension, Json};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Sessions;
use crate::error::{invalid_input_error, invalid_session_error, Error};
use crate::server::caller::Caller;

#[derive(Serialize, Deserialize)]
pub struct SignInParams {
    pub identity: String,
}

#[derive(Serialize, Deserialize)]
pub struct SessionToken {
    pub token: Uuid,
}

pub async fn sign_in(
    Extension(sessions): Extension<Arc<Sessions>>,
    Json(params): Json<SignInParams>,
) -> Result<Json<SessionToken>, Error> {
    if params.identity.trim().is_empty() {
        return Err(invalid_input_error());
    }

    let token = sessions.sign_in(params.identity).await;

    Ok(SessionToken { token }.into())
}

pub async fn sign_out(
    Extension(sessions): Extension<Arc<Sessions>>,
    caller: Caller,
) -> Result<StatusCode, Error> {
    let token = caller.token.ok_or_else(invalid_session_error)?;

    sessions.sign_out(token).await;

    Ok(StatusCode::NO_CONTENT)
}
