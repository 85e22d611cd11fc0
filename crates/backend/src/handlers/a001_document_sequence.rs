use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use contracts::domain::a001_document_sequence::aggregate::{
    DocumentSequence, DocumentSequenceDto, IssuedNumber, PatternPreviewRequest,
    PatternPreviewResponse, ValidatePatternRequest,
};
use contracts::shared::data_table::pagination::DEFAULT_PAGE_SIZE;
use contracts::shared::data_table::PagedResponse;
use contracts::shared::sequence::PatternValidationResult;
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::json;

use crate::domain::a001_document_sequence::service::{self, SequenceError};
use crate::shared::data::db::get_connection;

const MAX_PAGE_SIZE: usize = 1000;

impl IntoResponse for SequenceError {
    fn into_response(self) -> Response {
        let status = match &self {
            SequenceError::NotFound => StatusCode::NOT_FOUND,
            SequenceError::InvalidPattern(_) | SequenceError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            SequenceError::Conflict => StatusCode::CONFLICT,
            SequenceError::Database(e) => {
                tracing::error!("Database error: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let errors = match &self {
            SequenceError::InvalidPattern(errors) => errors.clone(),
            other => vec![other.to_string()],
        };
        (status, Json(json!({ "error": self.to_string(), "errors": errors }))).into_response()
    }
}

fn conn() -> Result<&'static DatabaseConnection, SequenceError> {
    Ok(get_connection()?)
}

fn parse_id(id: &str) -> Result<uuid::Uuid, SequenceError> {
    uuid::Uuid::parse_str(id).map_err(|_| SequenceError::Validation("Invalid ID".into()))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_desc: Option<bool>,
}

/// GET /api/document_sequences
pub async fn list_all() -> Result<Json<Vec<DocumentSequence>>, SequenceError> {
    Ok(Json(service::list_all(conn()?).await?))
}

/// GET /api/document_sequences/list
pub async fn list_paginated(
    Query(params): Query<ListParams>,
) -> Result<Json<PagedResponse<DocumentSequence>>, SequenceError> {
    let page_size = params
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let page = service::list_paginated(
        conn()?,
        params.page.unwrap_or(0),
        page_size,
        params.search,
        params.sort_by.as_deref().unwrap_or("document_type"),
        params.sort_desc.unwrap_or(false),
    )
    .await?;
    Ok(Json(page))
}

/// GET /api/document_sequences/:id
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<DocumentSequence>, SequenceError> {
    let uuid = parse_id(&id)?;
    Ok(Json(service::get_by_id(conn()?, uuid).await?))
}

/// POST /api/document_sequences
pub async fn upsert(
    Json(dto): Json<DocumentSequenceDto>,
) -> Result<Json<serde_json::Value>, SequenceError> {
    let id = match dto.id.clone() {
        Some(id) => {
            service::update(conn()?, dto).await?;
            id
        }
        None => service::create(conn()?, dto).await?.to_string(),
    };
    Ok(Json(json!({ "id": id })))
}

/// DELETE /api/document_sequences/:id
pub async fn delete(Path(id): Path<String>) -> Result<(), SequenceError> {
    let uuid = parse_id(&id)?;
    service::delete(conn()?, uuid).await
}

/// POST /api/document_sequences/validate
pub async fn validate(Json(req): Json<ValidatePatternRequest>) -> Json<PatternValidationResult> {
    Json(service::validate(&req.pattern, Utc::now().date_naive()))
}

/// POST /api/document_sequences/preview
pub async fn preview(Json(req): Json<PatternPreviewRequest>) -> Json<PatternPreviewResponse> {
    Json(service::preview(&req, Utc::now().date_naive()))
}

/// POST /api/document_sequences/issue/:document_type
pub async fn issue(
    Path(document_type): Path<String>,
) -> Result<Json<IssuedNumber>, SequenceError> {
    let issued =
        service::issue_next(conn()?, &document_type, Utc::now().date_naive()).await?;
    Ok(Json(issued))
}
