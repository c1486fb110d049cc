//! Invoice Routes
//!
//! The single extraction endpoint:
//! - POST /api/v1/invoices/extract - upload one invoice file, get the envelope
//!
//! Transport-level rejections (oversized, unsupported type, unreadable
//! multipart) answer 4xx; every business-level outcome answers 200 with
//! the uniform envelope.

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};

use crate::envelope::ApiResponse;
use crate::pipeline::DeclaredType;
use crate::state::AppState;

/// Create the invoices router
pub fn router(body_limit: usize) -> Router<AppState> {
    Router::new()
        .route("/extract", post(extract_invoice))
        .layer(DefaultBodyLimit::max(body_limit))
}

/// POST /api/v1/invoices/extract
///
/// Accepts a multipart upload with field name `file` and runs it through
/// the extraction pipeline.
async fn extract_invoice(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> (StatusCode, Json<ApiResponse>) {
    if let Some(message) = state.config().missing_credential() {
        tracing::error!("{}", message);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::failure(message)),
        );
    }

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::error!("Failed to read multipart field: {}", e);
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::failure(format!("Failed to read upload: {}", e))),
                );
            }
        };

        let name = field.name().unwrap_or("").to_string();
        if name != "file" {
            tracing::debug!(field = %name, "Skipping unexpected multipart field");
            continue;
        }

        let declared = DeclaredType {
            content_type: field.content_type().map(|s| s.to_string()),
            file_name: field.file_name().map(|s| s.to_string()),
        };

        let data = match field.bytes().await {
            Ok(data) => data,
            Err(e) => {
                tracing::error!("Failed to read file data: {}", e);
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::failure(format!(
                        "Failed to read file data: {}",
                        e
                    ))),
                );
            }
        };

        return match state.pipeline().process(&data, &declared).await {
            Ok(extraction) => (
                StatusCode::OK,
                Json(ApiResponse::success(extraction.record, &extraction.ocr_text)),
            ),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    file_name = declared.file_name.as_deref().unwrap_or("-"),
                    "Invoice extraction failed"
                );
                (e.status_code(), Json(ApiResponse::failure(e.to_string())))
            }
        };
    }

    tracing::warn!("No file field found in multipart upload");
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::failure("No file provided. Use field name 'file'")),
    )
}
