//! HTTP API over the cleanup service.
//!
//! Every response uses the same JSON envelope. Success:
//!
//! ```json
//! {"status": "success", "message": "...", "code": "00", "data": ...}
//! ```
//!
//! Failure:
//!
//! ```json
//! {"status": "error", "code": "UpstreamTimeout", "message": "...", "upstream_status": null}
//! ```

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tagkeeper_cleanup::{CleanupError, CleanupService, ErrorKind};
use tagkeeper_registry::ComponentRegistry;

/// Success code carried in every successful envelope.
const SUCCESS_CODE: &str = "00";

type SharedService<R> = Arc<CleanupService<R>>;

/// Builds the API router.
pub fn router<R: ComponentRegistry + 'static>(service: SharedService<R>) -> Router {
    Router::new()
        .route("/health", get(health::<R>))
        .route("/repositories", get(list_repositories::<R>))
        .route(
            "/repositories/:repository/total-images",
            get(total_images::<R>),
        )
        .route(
            "/repositories/:repository/cleanup-image-keep-new-tag",
            post(cleanup::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Serialize)]
struct Envelope<T> {
    status: &'static str,
    message: &'static str,
    code: &'static str,
    data: T,
}

fn success<T: Serialize>(message: &'static str, data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        status: "success",
        message,
        code: SUCCESS_CODE,
        data,
    })
}

/// Body of a cleanup request.
#[derive(Debug, Deserialize)]
struct CleanupRequest {
    #[serde(default)]
    keep_tags: Option<usize>,
}

impl CleanupRequest {
    /// Decodes an optional request body.
    ///
    /// An empty body means "use the default keep count". Anything else must
    /// be a JSON object with a non-negative integer `keep_tags`.
    fn from_body(headers: &HeaderMap, body: &[u8]) -> Result<Option<Self>, ApiError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        let is_json = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.trim_start().starts_with("application/json"));
        if !is_json {
            return Err(ApiError::InvalidRequest {
                status: StatusCode::UNSUPPORTED_MEDIA_TYPE,
                message: "Expected request with `Content-Type: application/json`".to_string(),
            });
        }

        serde_json::from_slice(body)
            .map(Some)
            .map_err(|e| ApiError::InvalidRequest {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                message: format!("Invalid cleanup request: {e}"),
            })
    }
}

/// Error code reported for rejected request bodies.
const INVALID_REQUEST_CODE: &str = "InvalidRequest";

/// A request failure rendered as an error envelope.
#[derive(Debug)]
enum ApiError {
    /// The request itself was rejected before any registry call.
    InvalidRequest {
        status: StatusCode,
        message: String,
    },
    /// The cleanup pipeline failed.
    Cleanup(CleanupError),
}

impl From<CleanupError> for ApiError {
    fn from(err: CleanupError) -> Self {
        Self::Cleanup(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::InvalidRequest { status, message } => {
                tracing::warn!(code = INVALID_REQUEST_CODE, error = %message, "request rejected");
                let body = json!({
                    "status": "error",
                    "code": INVALID_REQUEST_CODE,
                    "message": message,
                    "upstream_status": null,
                });
                (status, body)
            }
            Self::Cleanup(err) => {
                let kind = err.kind();
                let status = match kind {
                    ErrorKind::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
                    ErrorKind::TaskNotFound => StatusCode::NOT_FOUND,
                    ErrorKind::UpstreamError | ErrorKind::ParseError => StatusCode::BAD_GATEWAY,
                };
                tracing::warn!(code = %kind, error = %err, "request failed");
                let body = json!({
                    "status": "error",
                    "code": kind,
                    "message": err.to_string(),
                    "upstream_status": err.upstream_status(),
                });
                (status, body)
            }
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

async fn health<R: ComponentRegistry>(State(service): State<SharedService<R>>) -> Response {
    success(service.health(), serde_json::Value::Null).into_response()
}

async fn list_repositories<R: ComponentRegistry>(
    State(service): State<SharedService<R>>,
) -> ApiResult<Response> {
    let repositories = service.list_repositories().await?;
    Ok(success("Repositories retrieved successfully", repositories).into_response())
}

async fn total_images<R: ComponentRegistry>(
    State(service): State<SharedService<R>>,
    Path(repository): Path<String>,
) -> ApiResult<Response> {
    let total = service.count_images(&repository).await?;
    let data = json!({
        "total_images": total,
        "repository": repository,
    });
    Ok(success("Total images retrieved", data).into_response())
}

async fn cleanup<R: ComponentRegistry>(
    State(service): State<SharedService<R>>,
    Path(repository): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Response> {
    let keep_tags = CleanupRequest::from_body(&headers, &body)?.and_then(|r| r.keep_tags);
    let report = service.cleanup(&repository, keep_tags).await?;
    Ok(success("Cleanup completed", report).into_response())
}
