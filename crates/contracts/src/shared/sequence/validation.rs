use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::generator::{generate_sequence_number, is_known_variable, DocumentType};
use super::token::{tokenize, Token};

pub const MIN_COUNTER_WIDTH: usize = 1;
pub const MAX_COUNTER_WIDTH: usize = 10;

pub const ERR_EMPTY: &str = "Pattern cannot be empty";
pub const ERR_COUNTER_WIDTH: &str = "Counter padding must be between 1 and 10 digits";
pub const ERR_NO_VARIABLES: &str = "Pattern must contain at least one variable";
pub const ERR_NO_COUNTER: &str = "Pattern must include a {COUNTER:N} variable for unique numbering";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    /// Пример номера (счётчик 1, invoice), если шаблон корректен
    pub preview: String,
}

/// Проверка шаблона с предпросмотром на сегодняшнюю дату (UTC)
pub fn validate_pattern(pattern: &str) -> PatternValidationResult {
    validate_pattern_at(pattern, Utc::now().date_naive())
}

/// Проверка шаблона: собирает все найденные ошибки
pub fn validate_pattern_at(pattern: &str, today: NaiveDate) -> PatternValidationResult {
    if pattern.trim().is_empty() {
        return PatternValidationResult {
            is_valid: false,
            errors: vec![ERR_EMPTY.to_string()],
            preview: String::new(),
        };
    }

    let mut errors = Vec::new();
    let mut recognised = 0usize;
    let mut has_counter = false;

    for token in tokenize(pattern) {
        match token {
            Token::Literal(_) => {}
            Token::Variable(name) if is_known_variable(name) => recognised += 1,
            Token::Variable(_) => errors.push(format!("Invalid variable: {}", token.source())),
            Token::Counter { width, .. } => {
                has_counter = true;
                match width {
                    Some(w) if (MIN_COUNTER_WIDTH..=MAX_COUNTER_WIDTH).contains(&w) => {
                        recognised += 1
                    }
                    _ => errors.push(ERR_COUNTER_WIDTH.to_string()),
                }
            }
        }
    }

    if recognised == 0 {
        errors.push(ERR_NO_VARIABLES.to_string());
    }
    if !has_counter {
        errors.push(ERR_NO_COUNTER.to_string());
    }

    let is_valid = errors.is_empty();
    let preview = if is_valid {
        generate_sequence_number(pattern, 1, DocumentType::Invoice.as_str(), today)
    } else {
        String::new()
    };

    PatternValidationResult {
        is_valid,
        errors,
        preview,
    }
}
