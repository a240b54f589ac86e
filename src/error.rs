use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Failures surfaced by the catalog facade and the proxy route.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// A required request parameter was absent or blank.
    #[error("{0}")]
    MissingParameter(&'static str),

    /// A parameter was present but unusable (non-numeric id, bad page, ...).
    #[error("{0}")]
    InvalidParameter(String),

    /// The category / endpoint selector is not one we know how to forward.
    #[error("Invalid endpoint")]
    InvalidEndpoint,

    /// TMDB answered with a non-success status.
    #[error("Error fetching data from TMDB: {message}")]
    Upstream { status: StatusCode, message: String },

    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("TMDB request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// TMDB answered 2xx but the body was not the JSON we expected.
    #[error("TMDB returned an unreadable body: {0}")]
    Decode(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl CatalogError {
    pub fn status(&self) -> StatusCode {
        match self {
            CatalogError::MissingParameter(_)
            | CatalogError::InvalidParameter(_)
            | CatalogError::InvalidEndpoint => StatusCode::BAD_REQUEST,
            CatalogError::Upstream { status, .. } => *status,
            CatalogError::Transport(_) | CatalogError::Decode(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Builds the upstream variant from a status, using its canonical reason as message.
    pub fn upstream(status: StatusCode) -> Self {
        let message = status
            .canonical_reason()
            .unwrap_or("Unknown status")
            .to_string();
        CatalogError::Upstream { status, message }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            CatalogError::Transport(e) => {
                error!("Upstream transport failure: {}", e);
                "Internal server error".to_string()
            }
            CatalogError::Decode(e) => {
                error!("Upstream decode failure: {}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_bad_request() {
        assert_eq!(
            CatalogError::MissingParameter("Movie ID is required").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(CatalogError::InvalidEndpoint.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            CatalogError::InvalidParameter("page".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn upstream_keeps_status_and_reason() {
        let err = CatalogError::upstream(StatusCode::NOT_FOUND);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Error fetching data from TMDB: Not Found");
    }

    #[tokio::test]
    async fn decode_is_internal_and_hides_details() {
        let err = CatalogError::Decode("expected value at line 1 column 1".into());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let res = err.into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "error": "Internal server error" }));
    }
}
