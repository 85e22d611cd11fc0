use super::repository::{self, ListQuery};
use chrono::NaiveDate;
use contracts::domain::a001_document_sequence::aggregate::{
    DocumentSequence, DocumentSequenceDto, IssuedNumber, PatternPreviewRequest,
    PatternPreviewResponse,
};
use contracts::shared::data_table::PagedResponse;
use contracts::shared::sequence::{
    generate_sequence_number, validate_pattern_at, DocumentType, PatternValidationResult,
};
use sea_orm::{ConnectionTrait, DbErr};
use thiserror::Error;
use uuid::Uuid;

/// Сколько раз `issue_next` перечитывает счётчик после конфликта
pub const MAX_ISSUE_ATTEMPTS: usize = 5;

#[derive(Debug, Error)]
pub enum SequenceError {
    #[error("Document sequence not found")]
    NotFound,

    #[error("Invalid pattern: {}", .0.join("; "))]
    InvalidPattern(Vec<String>),

    #[error("{0}")]
    Validation(String),

    #[error("Document sequence was modified concurrently")]
    Conflict,

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Создание нового нумератора
pub async fn create<C: ConnectionTrait>(
    conn: &C,
    dto: DocumentSequenceDto,
) -> Result<Uuid, SequenceError> {
    let mut aggregate = DocumentSequence::new_for_insert(
        dto.document_type.trim().to_string(),
        dto.description,
        dto.pattern,
        dto.reset_period,
    );
    if let Some(counter) = dto.current_counter {
        aggregate.sequence.current_counter = counter;
    }

    aggregate.validate().map_err(SequenceError::InvalidPattern)?;
    ensure_type_is_free(conn, &aggregate).await?;

    let id = repository::insert(conn, &aggregate).await?;
    tracing::info!(
        "Created document sequence {} for '{}'",
        id,
        aggregate.document_type
    );
    Ok(id)
}

/// Обновление существующего нумератора
pub async fn update<C: ConnectionTrait>(
    conn: &C,
    dto: DocumentSequenceDto,
) -> Result<(), SequenceError> {
    let id = dto
        .id
        .as_deref()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| SequenceError::Validation("Invalid ID".into()))?;

    let mut aggregate = get_by_id(conn, id).await?;
    if dto.version.is_some_and(|v| v != aggregate.version) {
        return Err(SequenceError::Conflict);
    }

    aggregate.update(&dto);
    aggregate.validate().map_err(SequenceError::InvalidPattern)?;
    ensure_type_is_free(conn, &aggregate).await?;

    if !repository::update_if_version(conn, &aggregate).await? {
        return Err(SequenceError::Conflict);
    }
    tracing::info!("Updated document sequence {}", id);
    Ok(())
}

/// Мягкое удаление
pub async fn delete<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<(), SequenceError> {
    if repository::soft_delete(conn, id).await? {
        tracing::info!("Deleted document sequence {}", id);
        Ok(())
    } else {
        Err(SequenceError::NotFound)
    }
}

pub async fn get_by_id<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<DocumentSequence, SequenceError> {
    repository::get_by_id(conn, id)
        .await?
        .filter(|s| !s.is_deleted)
        .ok_or(SequenceError::NotFound)
}

pub async fn list_all<C: ConnectionTrait>(
    conn: &C,
) -> Result<Vec<DocumentSequence>, SequenceError> {
    Ok(repository::list_all(conn).await?)
}

/// Страница списка; `page` считается с нуля
pub async fn list_paginated<C: ConnectionTrait>(
    conn: &C,
    page: usize,
    page_size: usize,
    search: Option<String>,
    sort_by: &str,
    sort_desc: bool,
) -> Result<PagedResponse<DocumentSequence>, SequenceError> {
    let page_size = page_size.max(1);
    let offset = page
        .checked_mul(page_size)
        .filter(|offset| *offset <= i64::MAX as usize)
        .ok_or_else(|| SequenceError::Validation("Page is out of range".into()))?;
    let params = ListQuery {
        limit: page_size as u64,
        offset: offset as u64,
        search,
        sort_by: sort_by.to_string(),
        sort_desc,
    };
    let (items, total) = repository::list_paginated(conn, &params).await?;
    Ok(PagedResponse::new(items, total as usize, page, page_size))
}

pub fn validate(pattern: &str, today: NaiveDate) -> PatternValidationResult {
    validate_pattern_at(pattern, today)
}

/// Номер по шаблону без записи в БД
pub fn preview(request: &PatternPreviewRequest, today: NaiveDate) -> PatternPreviewResponse {
    let validation = validate_pattern_at(&request.pattern, today);
    let number = if validation.is_valid {
        generate_sequence_number(
            &request.pattern,
            request.counter.unwrap_or(1),
            request
                .document_type
                .as_deref()
                .unwrap_or(DocumentType::Invoice.as_str()),
            request.date.unwrap_or(today),
        )
    } else {
        String::new()
    };

    PatternPreviewResponse {
        is_valid: validation.is_valid,
        errors: validation.errors,
        number,
    }
}

/// Выдать следующий номер документа.
///
/// Счётчик записывается условным UPDATE по версии строки. Если между чтением
/// и записью строку изменили, чтение повторяется, не более
/// [`MAX_ISSUE_ATTEMPTS`] раз.
pub async fn issue_next<C: ConnectionTrait>(
    conn: &C,
    document_type: &str,
    today: NaiveDate,
) -> Result<IssuedNumber, SequenceError> {
    for attempt in 1..=MAX_ISSUE_ATTEMPTS {
        let mut aggregate = repository::get_by_document_type(conn, document_type)
            .await?
            .ok_or(SequenceError::NotFound)?;

        let issued = aggregate.issue(today);
        if repository::update_if_version(conn, &aggregate).await? {
            tracing::info!(
                "Issued {} for '{}' (counter {}{})",
                issued.number,
                document_type,
                issued.counter,
                if issued.was_reset { ", reset" } else { "" }
            );
            return Ok(issued);
        }

        tracing::warn!(
            "Counter of '{}' changed concurrently, attempt {}/{}",
            document_type,
            attempt,
            MAX_ISSUE_ATTEMPTS
        );
    }

    Err(SequenceError::Conflict)
}

async fn ensure_type_is_free<C: ConnectionTrait>(
    conn: &C,
    aggregate: &DocumentSequence,
) -> Result<(), SequenceError> {
    match repository::get_by_document_type(conn, &aggregate.document_type).await? {
        Some(existing) if existing.id != aggregate.id => Err(SequenceError::Validation(format!(
            "Sequence for document type '{}' already exists",
            aggregate.document_type
        ))),
        _ => Ok(()),
    }
}
