use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::AggregateId;
use crate::shared::sequence::{
    generate_sequence_number, reset_counter_if_needed, validate_pattern, ResetPeriod, Sequence,
};

// ============================================================================
// ID Type
// ============================================================================

/// Уникальный идентификатор нумератора документов
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentSequenceId(pub Uuid);

impl DocumentSequenceId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl AggregateId for DocumentSequenceId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(DocumentSequenceId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Нумератор документов одного типа (счёт, заказ, платёж ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSequence {
    pub id: DocumentSequenceId,
    pub document_type: String,
    pub description: String,

    #[serde(flatten)]
    pub sequence: Sequence,

    pub is_deleted: bool,
    /// Версия для optimistic locking, растёт при каждой записи
    pub version: i32,
}

impl DocumentSequence {
    /// Создать новый нумератор для вставки в БД
    pub fn new_for_insert(
        document_type: String,
        description: String,
        pattern: String,
        reset_period: ResetPeriod,
    ) -> Self {
        Self {
            id: DocumentSequenceId::new_v4(),
            document_type,
            description,
            sequence: Sequence::new(pattern, reset_period),
            is_deleted: false,
            version: 0,
        }
    }

    pub fn to_string_id(&self) -> String {
        self.id.as_string()
    }

    /// Обновить данные из DTO.
    /// `updated_at` - момент записи счётчика, поэтому меняется только
    /// вместе со счётчиком.
    pub fn update(&mut self, dto: &DocumentSequenceDto) {
        self.document_type = dto.document_type.trim().to_string();
        self.description = dto.description.clone();
        self.sequence.pattern = dto.pattern.clone();
        self.sequence.reset_period = dto.reset_period;
        if let Some(counter) = dto.current_counter {
            if counter != self.sequence.current_counter {
                self.sequence.current_counter = counter;
                self.sequence.updated_at = Some(Utc::now());
            }
        }
    }

    /// Валидация: собирает все ошибки сразу
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if self.document_type.trim().is_empty() {
            errors.push("Document type cannot be empty".to_string());
        }
        errors.extend(validate_pattern(&self.sequence.pattern).errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Следующий номер на дату `today`. Меняет только копию в памяти,
    /// запись счётчика в БД остаётся за вызывающим.
    pub fn issue(&mut self, today: NaiveDate) -> IssuedNumber {
        let reset = reset_counter_if_needed(&self.sequence, today);
        let number = generate_sequence_number(
            &self.sequence.pattern,
            reset.new_counter,
            &self.document_type,
            today,
        );

        self.sequence.current_counter = reset.new_counter;
        self.sequence.updated_at = Some(issued_at(today));

        IssuedNumber {
            document_type: self.document_type.clone(),
            number,
            counter: reset.new_counter,
            was_reset: reset.should_reset,
        }
    }
}

/// Текущее время, если `today` - сегодня по UTC, иначе начало дня `today`
fn issued_at(today: NaiveDate) -> DateTime<Utc> {
    let now = Utc::now();
    if now.date_naive() == today {
        now
    } else {
        today.and_time(NaiveTime::MIN).and_utc()
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO для создания/обновления нумератора
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DocumentSequenceDto {
    pub id: Option<String>,
    pub document_type: String,
    #[serde(default)]
    pub description: String,
    pub pattern: String,
    #[serde(default)]
    pub reset_period: ResetPeriod,
    /// Ручная установка счётчика (например, при переносе данных)
    #[serde(default)]
    pub current_counter: Option<u64>,
    /// Версия, прочитанная клиентом; при расхождении обновление отклоняется
    #[serde(default)]
    pub version: Option<i32>,
}

/// Выданный номер документа
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedNumber {
    pub document_type: String,
    pub number: String,
    pub counter: u64,
    pub was_reset: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatePatternRequest {
    pub pattern: String,
}

/// Запрос на предпросмотр номера; пустые поля берутся по умолчанию
/// (invoice, счётчик 1, текущая дата)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternPreviewRequest {
    pub pattern: String,
    #[serde(default)]
    pub document_type: Option<String>,
    #[serde(default)]
    pub counter: Option<u64>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternPreviewResponse {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub number: String,
}
