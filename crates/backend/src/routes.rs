use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // A001 DOCUMENT SEQUENCES
        // ========================================
        .route(
            "/api/document_sequences",
            get(handlers::a001_document_sequence::list_all)
                .post(handlers::a001_document_sequence::upsert),
        )
        .route(
            "/api/document_sequences/list",
            get(handlers::a001_document_sequence::list_paginated),
        )
        .route(
            "/api/document_sequences/validate",
            post(handlers::a001_document_sequence::validate),
        )
        .route(
            "/api/document_sequences/preview",
            post(handlers::a001_document_sequence::preview),
        )
        .route(
            "/api/document_sequences/issue/:document_type",
            post(handlers::a001_document_sequence::issue),
        )
        .route(
            "/api/document_sequences/:id",
            get(handlers::a001_document_sequence::get_by_id)
                .delete(handlers::a001_document_sequence::delete),
        )
}
