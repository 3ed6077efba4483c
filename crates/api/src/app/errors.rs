use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use cinedex_core::DomainError;

use crate::store::StoreError;

/// Everything a movies handler can fail with, mapped to a JSON error body.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request rejected by an identity rule (`idexists`, `idnull`, ...).
    #[error("{message}")]
    BadRequest {
        code: &'static str,
        message: &'static str,
    },

    /// The request could not be parsed (path id, query string or body).
    #[error("malformed request: {0}")]
    Malformed(String),

    #[error("movie not found")]
    NotFound,

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn id_exists() -> Self {
        Self::BadRequest {
            code: "idexists",
            message: "A new movies cannot already have an ID",
        }
    }

    pub fn id_null() -> Self {
        Self::BadRequest {
            code: "idnull",
            message: "Invalid id",
        }
    }

    pub fn id_invalid() -> Self {
        Self::BadRequest {
            code: "idinvalid",
            message: "Invalid ID",
        }
    }

    pub fn id_not_found() -> Self {
        Self::BadRequest {
            code: "idnotfound",
            message: "Entity not found",
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Malformed(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Malformed(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Malformed(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest { code, message } => json_error(StatusCode::BAD_REQUEST, code, message),
            ApiError::Malformed(msg) => json_error(StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
            ApiError::Domain(e) => json_error(StatusCode::BAD_REQUEST, "validation_error", e.to_string()),
            ApiError::Store(StoreError::NotFound(_)) => {
                json_error(StatusCode::NOT_FOUND, "not_found", "not found")
            }
            ApiError::Store(e) => {
                tracing::error!(error = %e, "movie store failure");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", e.to_string())
            }
        }
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use cinedex_core::MovieId;

    use super::*;

    #[test]
    fn identity_rules_map_to_bad_request() {
        for err in [
            ApiError::id_exists(),
            ApiError::id_null(),
            ApiError::id_invalid(),
            ApiError::id_not_found(),
        ] {
            assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn missing_records_map_to_not_found() {
        assert_eq!(ApiError::NotFound.into_response().status(), StatusCode::NOT_FOUND);
        let err = ApiError::Store(StoreError::NotFound(MovieId::new(3)));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn malformed_query_maps_to_bad_request() {
        let err = ApiError::from(DomainError::validation("bad sort"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn malformed_requests_map_to_bad_request() {
        let err = ApiError::Malformed("missing field `keyword`".into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn store_failures_map_to_internal_error() {
        let err = ApiError::Store(StoreError::Poisoned);
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
