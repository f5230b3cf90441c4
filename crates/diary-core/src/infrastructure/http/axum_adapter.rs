//! Axum integration for outcomes and dispatch faults

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use diary_rs_domain::{Error, Outcome};
use serde::{Deserialize, Serialize};
use tracing::error;

use super::status::ResponseClass;
use crate::error::DispatchError;

/// JSON body of a failed response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error code
    pub code: String,
    /// Error message
    pub message: String,
}

impl From<&Error> for ErrorBody {
    fn from(error: &Error) -> Self {
        Self {
            code: error.code().to_owned(),
            message: error.message().to_owned(),
        }
    }
}

impl ResponseClass {
    /// Status code for this class
    #[must_use]
    pub const fn status(self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Axum response wrapper for an [`Outcome`]
///
/// A success becomes `200 OK` with the value as JSON; a failure becomes the
/// status chosen by [`ResponseClass::classify`] with an [`ErrorBody`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeResponse<T>(pub Outcome<T>);

impl<T> From<Outcome<T>> for OutcomeResponse<T> {
    fn from(outcome: Outcome<T>) -> Self {
        Self(outcome)
    }
}

impl<T: Serialize> IntoResponse for OutcomeResponse<T> {
    fn into_response(self) -> Response {
        match self.0.into_result() {
            Ok(value) => (StatusCode::OK, Json(value)).into_response(),
            Err(error) => {
                let status = ResponseClass::classify(&error).status();
                (status, Json(ErrorBody::from(&error))).into_response()
            }
        }
    }
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        // Do not leak wiring or infrastructure details to clients.
        error!(error = %self, "dispatch fault promoted to HTTP response");
        let body = ErrorBody {
            code: "Dispatch.Fault".to_owned(),
            message: "Internal server error".to_owned(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
