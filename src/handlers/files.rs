use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::services::file_service::{ConfirmOutcome, ConfirmUpload, UploadIntent};
use crate::utils::auth::Claims;
use crate::utils::validation::{validate_content_type, validate_filename};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadDataRequest {
    pub filename: String,
    pub content_type: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmUploadRequest {
    pub key: String,
    pub filename: String,
    pub content_type: String,
}

#[derive(Deserialize)]
pub struct ReadUrlQuery {
    pub key: String,
}

#[derive(Serialize)]
pub struct ReadUrlResponse {
    pub url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedResponse {
    pub status: &'static str,
    pub threat_name: String,
}

/// POST /files/upload-data: issue a presigned PUT URL and object key
pub async fn get_upload_data(
    State(state): State<crate::AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UploadDataRequest>,
) -> Result<Json<UploadIntent>, AppError> {
    validate_filename(&payload.filename).map_err(|e| AppError::BadRequest(e.to_string()))?;
    validate_content_type(&payload.content_type)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let intent = state
        .files
        .issue_upload_intent(&claims.sub, &payload.filename, &payload.content_type)
        .await?;

    Ok(Json(intent))
}

/// POST /files/confirm: run the scan gate over an uploaded object.
/// Admitted files come back 201 with their catalog record; infected files
/// come back 422 with a distinguishable rejection body.
pub async fn confirm_upload(
    State(state): State<crate::AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ConfirmUploadRequest>,
) -> Result<Response, AppError> {
    validate_filename(&payload.filename).map_err(|e| AppError::BadRequest(e.to_string()))?;
    validate_content_type(&payload.content_type)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let outcome = state
        .files
        .confirm_upload(ConfirmUpload {
            key: payload.key,
            filename: payload.filename,
            content_type: payload.content_type,
            owner_id: claims.sub,
        })
        .await?;

    match outcome {
        ConfirmOutcome::Admitted(record) => {
            Ok((StatusCode::CREATED, Json(record)).into_response())
        }
        ConfirmOutcome::Rejected { threat_name } => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(RejectedResponse {
                status: "rejected",
                threat_name,
            }),
        )
            .into_response()),
    }
}

/// GET /files/read-url?key=...: issue a presigned GET URL
pub async fn get_read_url(
    State(state): State<crate::AppState>,
    Extension(_claims): Extension<Claims>,
    Query(query): Query<ReadUrlQuery>,
) -> Result<Json<ReadUrlResponse>, AppError> {
    let url = state.files.issue_read_url(&query.key).await?;
    Ok(Json(ReadUrlResponse { url }))
}
