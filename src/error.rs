use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::env;
use std::fmt::{self, Debug, Display};

pub const ENV_VAR: i32 = 1;
pub const DATABASE: i32 = 2;
pub const REQWEST: i32 = 3;
pub const UPSTREAM: i32 = 4;
pub const UNEXPECTED: i32 = 5;
pub const PROCESSOR: i32 = 6;

pub const INVALID_STATE: i32 = 100;
pub const MISSING_INPUT: i32 = 101;
pub const ADDRESS_NOT_FOUND: i32 = 102;
pub const ROUTE_NOT_FOUND: i32 = 103;
pub const INVALID_AMOUNT: i32 = 104;
pub const INVALID_CURRENCY: i32 = 105;
pub const INVALID_DISTANCE: i32 = 106;
pub const INVALID_IDENTIFIER: i32 = 107;
pub const UNKNOWN_EXTRA: i32 = 108;

/// Crate-wide error. Codes below 100 are internal failures, codes from 100 up
/// are caused by the caller and carry a message meant for the user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Error {
    pub code: i32,
    #[serde(rename = "error")]
    pub message: String,
}

impl Error {
    pub fn is_client_error(&self) -> bool {
        self.code >= 100
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for Error {}

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

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        reqwest_error(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match self.code {
            PROCESSOR => (StatusCode::INTERNAL_SERVER_ERROR, self.message.as_str()),
            1..=99 => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
            _ => (StatusCode::BAD_REQUEST, self.message.as_str()),
        };

        let body = Json(json!({
            "code": self.code,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub fn invalid_state_error() -> Error {
    Error {
        code: INVALID_STATE,
        message: "invalid state".into(),
    }
}

pub fn missing_input_error(what: &str) -> Error {
    Error {
        code: MISSING_INPUT,
        message: format!("{} required", what),
    }
}

pub fn address_not_found_error(address: &str) -> Error {
    Error {
        code: ADDRESS_NOT_FOUND,
        message: format!("address not found: {}", address),
    }
}

pub fn route_not_found_error() -> Error {
    Error {
        code: ROUTE_NOT_FOUND,
        message: "unable to compute a route between these addresses".into(),
    }
}

pub fn invalid_amount_error() -> Error {
    Error {
        code: INVALID_AMOUNT,
        message: "amount must be a positive number of minor currency units".into(),
    }
}

pub fn invalid_currency_error() -> Error {
    Error {
        code: INVALID_CURRENCY,
        message: "currency is required".into(),
    }
}

pub fn invalid_distance_error(distance: &str) -> Error {
    Error {
        code: INVALID_DISTANCE,
        message: format!("invalid route distance: {:?}", distance),
    }
}

pub fn invalid_identifier_error(id: &str) -> Error {
    Error {
        code: INVALID_IDENTIFIER,
        message: format!("invalid identifier: {:?}", id),
    }
}

pub fn unknown_extra_error(index: usize) -> Error {
    Error {
        code: UNKNOWN_EXTRA,
        message: format!("no extra at position {}", index),
    }
}

pub fn env_var_error(_: env::VarError) -> Error {
    Error {
        code: ENV_VAR,
        message: "environment variable error".into(),
    }
}

pub fn database_error<T: Debug>(err: T) -> Error {
    tracing::error!("database error: {:?}", err);

    Error {
        code: DATABASE,
        message: "database error".into(),
    }
}

pub fn reqwest_error(err: reqwest::Error) -> Error {
    // reqwest includes the request url, which may carry an api key
    tracing::error!("reqwest error: {}", err.without_url());

    Error {
        code: REQWEST,
        message: "reqwest error".into(),
    }
}

pub fn upstream_error() -> Error {
    Error {
        code: UPSTREAM,
        message: "upstream error".into(),
    }
}

pub fn unexpected_error() -> Error {
    Error {
        code: UNEXPECTED,
        message: "unexpected error".into(),
    }
}

pub fn processor_error(message: impl Into<String>) -> Error {
    Error {
        code: PROCESSOR,
        message: message.into(),
    }
}
