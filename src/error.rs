use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::env;
use std::fmt::Debug;

#[derive(Debug)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        database_error(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        serialization_error(err)
    }
}

impl From<oso::OsoError> for Error {
    fn from(err: oso::OsoError) -> Self {
        authorizor_error(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match self.code {
            1..=99 => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
            102 => (StatusCode::NOT_FOUND, self.message.as_str()),
            103 => (StatusCode::UNAUTHORIZED, self.message.as_str()),
            104 => (StatusCode::CONFLICT, self.message.as_str()),
            105 => (StatusCode::FORBIDDEN, self.message.as_str()),
            _ => (StatusCode::BAD_REQUEST, self.message.as_str()),
        };

        let body = Json(json!({
            "code": self.code,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub fn invalid_input_error() -> Error {
    Error {
        code: 101,
        message: "invalid input".into(),
    }
}

pub fn record_not_found_error() -> Error {
    Error {
        code: 102,
        message: "record not found".into(),
    }
}

pub fn invalid_session_error() -> Error {
    Error {
        code: 103,
        message: "invalid session token".into(),
    }
}

pub fn stale_listing_error() -> Error {
    Error {
        code: 104,
        message: "history changed since it was listed".into(),
    }
}

pub fn permission_denied_error() -> Error {
    Error {
        code: 105,
        message: "permission denied".into(),
    }
}

pub fn env_var_error(err: env::VarError) -> Error {
    tracing::error!("environment variable error: {:?}", err);

    Error {
        code: 1,
        message: "environment variable error".into(),
    }
}

pub fn database_error<T: Debug>(err: T) -> Error {
    tracing::error!("database error: {:?}", err);

    Error {
        code: 2,
        message: "database error".into(),
    }
}

pub fn store_write_error<T: Debug>(err: T) -> Error {
    tracing::error!("store write error: {:?}", err);

    Error {
        code: 2,
        message: "store write error".into(),
    }
}

pub fn serialization_error<T: Debug>(err: T) -> Error {
    tracing::error!("serialization error: {:?}", err);

    Error {
        code: 3,
        message: "serialization error".into(),
    }
}

pub fn authorizor_error<T: Debug>(err: T) -> Error {
    tracing::error!("authorizor error: {:?}", err);

    Error {
        code: 4,
        message: "authorizor error".into(),
    }
}

pub fn invalid_config_error(name: &str) -> Error {
    Error {
        code: 5,
        message: format!("invalid configuration value for {}", name),
    }
}

pub fn server_error<T: Debug>(err: T) -> Error {
    tracing::error!("server error: {:?}", err);

    Error {
        code: 6,
        message: "server error".into(),
    }
}
