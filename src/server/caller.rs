use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{Extension, FromRequest, RequestParts};
use axum::http::header::{HeaderValue, AUTHORIZATION};
use uuid::Uuid;

use crate::auth::{Sessions, StaticIdentity};
use crate::error::{invalid_session_error, server_error, Error};

/// The identity behind one request, resolved from its
/// `Authorization: Bearer <token>` header. No header means anonymous.
#[derive(Debug)]
pub struct Caller {
    pub token: Option<Uuid>,
    pub identity: StaticIdentity,
}

impl Caller {
    pub fn anonymous() -> Self {
        Self {
            token: None,
            identity: StaticIdentity::anonymous(),
        }
    }

    /// Unknown or malformed tokens are rejected rather than treated as anonymous.
    pub async fn resolve(
        sessions: &Sessions,
        header: Option<&HeaderValue>,
    ) -> Result<Self, Error> {
        let header = match header {
            Some(header) => header,
            None => return Ok(Self::anonymous()),
        };

        let token = header
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix("Bearer "))
            .and_then(|token| Uuid::parse_str(token.trim()).ok())
            .ok_or_else(invalid_session_error)?;

        let identity = sessions
            .identity(token)
            .await
            .ok_or_else(invalid_session_error)?;

        Ok(Self {
            token: Some(token),
            identity: StaticIdentity::signed_in(identity),
        })
    }
}

#[async_trait]
impl<B: Send> FromRequest<B> for Caller {
    type Rejection = Error;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let Extension(sessions) = Extension::<Arc<Sessions>>::from_request(req)
            .await
            .map_err(server_error)?;

        Self::resolve(&sessions, req.headers().get(AUTHORIZATION)).await
    }
}
