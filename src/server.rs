//! Analysis HTTP endpoint. Mirrors the client contract as a backend route so
//! the model credential never leaves the server.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::sync::watch;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::gemini::{Analyzer, GeminiClient};
use crate::model::AdInput;
use crate::submission::MAX_VIDEO_BYTES;

/// Request body ceiling: 20 MiB of raw video grows by ~4/3 under base64,
/// plus the text fields.
pub const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

/// Wire names the endpoint requires before accepting a request.
const REQUIRED_FIELDS: [&str; 4] = ["platform", "targetAudience", "objective", "adCopy"];

/// Shared state for the analysis HTTP server.
#[derive(Clone)]
pub struct ServerState {
    pub analyzer: Arc<dyn Analyzer>,
}

/// Start the analysis server.
///
/// Returns once the shutdown signal fires and in-flight requests drain.
pub async fn start_server(
    config: AppConfig,
    mut shutdown_rx: watch::Receiver<bool>,
) -> Result<(), AppError> {
    let bind = config.bind;
    let state = Arc::new(ServerState {
        analyzer: Arc::new(GeminiClient::new(&config)),
    });

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!("Analysis server listening on http://{}", bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.changed().await;
            tracing::info!("Analysis server shutting down");
        })
        .await?;

    Ok(())
}

/// Build the router. Non-POST on the analyze route gets a 405 from axum's
/// method routing.
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/api/analyze", post(handle_analyze))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok", "service": "adlift" }))
}

/// POST /api/analyze — validate the submission, run one model call, return
/// the diagnostic verbatim.
async fn handle_analyze(
    AxumState(state): AxumState<Arc<ServerState>>,
    Json(body): Json<Value>,
) -> Response {
    let request_id = Uuid::new_v4();

    let input = match decode_input(&body) {
        Ok(input) => input,
        Err(err) => {
            tracing::warn!(%request_id, kind = err.kind(), error = %err, "analyze request rejected");
            return error_response(&err);
        }
    };

    tracing::info!(
        %request_id,
        platform = input.platform.as_str(),
        has_video = input.video_data.is_some(),
        "analyze request accepted"
    );

    match state.analyzer.analyze(&input).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => {
            tracing::error!(%request_id, kind = err.kind(), error = %err, "analysis failed");
            error_response(&err)
        }
    }
}

/// Decode and validate the inbound JSON body.
///
/// Required fields are checked on the raw value first so the caller gets the
/// stable "Missing required fields" payload rather than a serde message.
/// The video ceiling is re-enforced here: the browser-side guard alone does
/// not bind a caller speaking HTTP directly.
pub(crate) fn decode_input(body: &Value) -> Result<AdInput, AppError> {
    for field in REQUIRED_FIELDS {
        let present = body
            .get(field)
            .and_then(Value::as_str)
            .map(str::trim)
            .is_some_and(|s| !s.is_empty());
        if !present {
            return Err(AppError::Validation("Missing required fields".into()));
        }
    }

    let input: AdInput = serde_json::from_value(body.clone())
        .map_err(|_| AppError::Validation("Invalid request body".into()))?;

    if let Some(video) = &input.video_data {
        if decoded_len(&video.data) > MAX_VIDEO_BYTES {
            return Err(AppError::Validation("Video exceeds the 20 MiB limit".into()));
        }
    }

    Ok(input)
}

/// Exact decoded size of a base64 payload, without decoding: 4 chars per
/// 3 bytes, minus trailing `=` padding. A file the builder accepts at
/// exactly the ceiling must not be rejected here.
fn decoded_len(data: &str) -> usize {
    let padding = data.bytes().rev().take_while(|&b| b == b'=').count();
    (data.len() / 4 * 3).saturating_sub(padding)
}

/// Map an error to its outbound status and `{ error, details? }` payload.
/// Details never carry the credential, response bodies, or stack traces.
fn error_response(err: &AppError) -> Response {
    let (status, payload) = match err {
        AppError::Validation(message) => (
            StatusCode::BAD_REQUEST,
            json!({ "error": message }),
        ),
        AppError::ContractViolation(_) => (
            StatusCode::BAD_GATEWAY,
            json!({
                "error": "Failed to analyze ad",
                "details": "model returned an invalid diagnostic"
            }),
        ),
        AppError::Upstream { status, .. } => (
            StatusCode::BAD_GATEWAY,
            json!({
                "error": "Failed to analyze ad",
                "details": format!("model provider returned status {status}")
            }),
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": "Failed to analyze ad" }),
        ),
    };
    (status, Json(payload)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine;
    use tower::ServiceExt;

    use crate::model::DiagnosticResult;

    /// Analyzer stub for requests the endpoint must reject before any
    /// model call happens.
    struct NeverCalled;

    #[async_trait]
    impl Analyzer for NeverCalled {
        async fn analyze(&self, _input: &AdInput) -> Result<DiagnosticResult, AppError> {
            panic!("analyzer must not be invoked for rejected requests")
        }
    }

    fn stub_state() -> Arc<ServerState> {
        Arc::new(ServerState {
            analyzer: Arc::new(NeverCalled),
        })
    }

    fn valid_body() -> Value {
        json!({
            "platform": "TikTok",
            "targetAudience": "Gen Z",
            "objective": "Awareness",
            "adCopy": "Buy now!!! Limited time!!!"
        })
    }

    #[test]
    fn test_decode_valid_body() {
        let input = decode_input(&valid_body()).unwrap();
        assert_eq!(input.target_audience, "Gen Z");
        assert!(input.video_data.is_none());
    }

    #[test]
    fn test_missing_field_rejected_with_stable_message() {
        for field in REQUIRED_FIELDS {
            let mut body = valid_body();
            body.as_object_mut().unwrap().remove(field);
            let err = decode_input(&body).unwrap_err();
            assert_eq!(err.to_string(), "Validation error: Missing required fields");
        }
    }

    #[test]
    fn test_blank_field_counts_as_missing() {
        let mut body = valid_body();
        body["adCopy"] = json!("   ");
        let err = decode_input(&body).unwrap_err();
        assert!(err.to_string().contains("Missing required fields"));
    }

    #[test]
    fn test_unknown_platform_tolerated() {
        let mut body = valid_body();
        body["platform"] = json!("Snapchat");
        let input = decode_input(&body).unwrap();
        assert_eq!(input.platform, crate::model::Platform::Other);
    }

    #[test]
    fn test_malformed_video_rejected() {
        let mut body = valid_body();
        body["videoData"] = json!({ "data": 42 });
        let err = decode_input(&body).unwrap_err();
        assert_eq!(err.kind(), "validation");
    }

    #[test]
    fn test_oversized_video_re_rejected_server_side() {
        let mut body = valid_body();
        // Base64 length corresponding to ~21 MiB decoded.
        let oversized_len = (21 * 1024 * 1024 / 3) * 4;
        body["videoData"] = json!({
            "data": "A".repeat(oversized_len),
            "mimeType": "video/mp4"
        });
        let err = decode_input(&body).unwrap_err();
        assert!(err.to_string().contains("20 MiB"));
    }

    #[test]
    fn test_video_exactly_at_limit_accepted_server_side() {
        // The builder accepts a file at exactly the ceiling; the endpoint
        // must agree, padding included.
        let mut body = valid_body();
        body["videoData"] = json!({
            "data": BASE64.encode(vec![0u8; MAX_VIDEO_BYTES]),
            "mimeType": "video/mp4"
        });
        let input = decode_input(&body).unwrap();
        assert!(input.video_data.is_some());
    }

    #[test]
    fn test_video_one_byte_over_limit_rejected_server_side() {
        let mut body = valid_body();
        body["videoData"] = json!({
            "data": BASE64.encode(vec![0u8; MAX_VIDEO_BYTES + 1]),
            "mimeType": "video/mp4"
        });
        let err = decode_input(&body).unwrap_err();
        assert!(err.to_string().contains("20 MiB"));
    }

    #[test]
    fn test_decoded_len_matches_encoder() {
        for n in [0usize, 1, 2, 3, 4, 5, 3 * 1024, 4097] {
            let encoded = BASE64.encode(vec![0u8; n]);
            assert_eq!(decoded_len(&encoded), n, "decoded_len wrong for {n} bytes");
        }
    }

    #[test]
    fn test_video_under_limit_accepted() {
        let mut body = valid_body();
        body["videoData"] = json!({
            "data": "A".repeat(4000),
            "mimeType": "video/mp4"
        });
        let input = decode_input(&body).unwrap();
        assert_eq!(input.video_data.unwrap().mime_type, "video/mp4");
    }

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (
                AppError::Validation("Missing required fields".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::ContractViolation("bad score".into()),
                StatusCode::BAD_GATEWAY,
            ),
            (
                AppError::Upstream {
                    status: 503,
                    body: "overloaded".into(),
                },
                StatusCode::BAD_GATEWAY,
            ),
            (
                AppError::Config("missing key".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(error_response(&err).status(), expected);
        }
    }

    #[tokio::test]
    async fn test_non_post_method_gets_405_from_router() {
        let response = router(stub_state())
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/analyze")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_missing_fields_rejected_through_http_layer() {
        let response = router(stub_state())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/analyze")
                    .header("content-type", "application/json")
                    .body(Body::from(json!({ "platform": "TikTok" }).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let payload: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(payload["error"], "Missing required fields");
    }

    #[tokio::test]
    async fn test_health_route() {
        let response = router(stub_state())
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_upstream_body_never_leaks_into_details() {
        let err = AppError::Upstream {
            status: 500,
            body: "internal stack trace with key material".into(),
        };
        let response = error_response(&err);
        // Only the status code reaches the client.
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
