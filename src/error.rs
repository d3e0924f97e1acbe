//! The error taxonomy spanning client- and peer-facing request handling.
//! Every fallible operation in [`crate::engine`] returns `Result<_, ApiError>`,
//! and the HTTP layer converts it to a response at the boundary — nothing
//! upstream of that boundary matches on HTTP status codes.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("value is required")]
    MissingValue,

    #[error("key exceeds {0} bytes")]
    KeyTooLong(usize),

    #[error("key not found")]
    KeyNotFound,

    #[error("replica not found")]
    ReplicaNotFound,

    #[error("causal dependencies not yet satisfied")]
    CausalPending,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingValue | ApiError::KeyTooLong(_) => StatusCode::BAD_REQUEST,
            ApiError::KeyNotFound | ApiError::ReplicaNotFound => StatusCode::NOT_FOUND,
            ApiError::CausalPending => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn status_codes_match_the_taxonomy() {
        assert_eq!(ApiError::MissingValue.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::KeyTooLong(50).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::KeyNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::ReplicaNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::CausalPending.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
