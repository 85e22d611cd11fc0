//! Нумерация документов: разбор шаблона, проверка, генерация номера и сброс
//! счётчика. Здесь нет ввода-вывода, запись счётчика остаётся за вызывающим.

pub mod generator;
pub mod model;
pub mod reset;
pub mod token;
pub mod validation;

pub use generator::{
    document_type_code, generate_sequence_number, DocumentType, CLINIC_CODE,
    UNKNOWN_DOCUMENT_CODE, VARIABLES,
};
pub use model::{ResetPeriod, Sequence};
pub use reset::{get_next_counter, reset_counter_if_needed, CounterReset};
pub use token::{tokenize, Token};
pub use validation::{validate_pattern, validate_pattern_at, PatternValidationResult};
