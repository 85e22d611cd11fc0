use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::token::{tokenize, Token};

/// Код, подставляемый вместо `{CLINIC}`
pub const CLINIC_CODE: &str = "CLN";

/// Код для типов документов вне известного списка
pub const UNKNOWN_DOCUMENT_CODE: &str = "DOC";

/// Виды документов с порядковым номером
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Invoice,
    Quote,
    Order,
    Payment,
    CreditNote,
    PurchaseOrder,
}

impl DocumentType {
    pub const ALL: [DocumentType; 6] = [
        DocumentType::Invoice,
        DocumentType::Quote,
        DocumentType::Order,
        DocumentType::Payment,
        DocumentType::CreditNote,
        DocumentType::PurchaseOrder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "invoice",
            DocumentType::Quote => "quote",
            DocumentType::Order => "order",
            DocumentType::Payment => "payment",
            DocumentType::CreditNote => "credit_note",
            DocumentType::PurchaseOrder => "purchase_order",
        }
    }

    /// Короткий код для номера документа
    pub fn code(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "INV",
            DocumentType::Quote => "QUO",
            DocumentType::Order => "ORD",
            DocumentType::Payment => "PAY",
            DocumentType::CreditNote => "CRD",
            DocumentType::PurchaseOrder => "PO",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

/// Код `{DOCTYPE}` по имени типа документа; для неизвестных - `DOC`
pub fn document_type_code(document_type: &str) -> &'static str {
    DocumentType::parse(document_type)
        .map(|t| t.code())
        .unwrap_or(UNKNOWN_DOCUMENT_CODE)
}

/// Переменные внутри `{...}`, кроме `COUNTER:N`
pub const VARIABLES: [&str; 6] = ["YYYY", "YY", "MM", "DD", "CLINIC", "DOCTYPE"];

pub(crate) fn is_known_variable(name: &str) -> bool {
    VARIABLES.contains(&name)
}

/// Подстановка значений в шаблон номера.
///
/// Шаблон не проверяется: неизвестные токены и счётчики с неверной шириной
/// копируются как есть. Счётчик дополняется нулями до ширины, но не обрезается.
///
/// ```
/// use chrono::NaiveDate;
/// use contracts::shared::sequence::generate_sequence_number;
///
/// let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// let number = generate_sequence_number("{DOCTYPE}-{YYYY}{MM}{DD}-{COUNTER:4}", 7, "invoice", date);
/// assert_eq!(number, "INV-20240115-0007");
/// ```
pub fn generate_sequence_number(
    pattern: &str,
    counter: u64,
    document_type: &str,
    date: NaiveDate,
) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    for token in tokenize(pattern) {
        match token {
            Token::Literal(text) => out.push_str(text),
            Token::Variable(name) => match name {
                "YYYY" => out.push_str(&format!("{:04}", date.year())),
                "YY" => out.push_str(&format!("{:02}", date.year().rem_euclid(100))),
                "MM" => out.push_str(&format!("{:02}", date.month())),
                "DD" => out.push_str(&format!("{:02}", date.day())),
                "CLINIC" => out.push_str(CLINIC_CODE),
                "DOCTYPE" => out.push_str(document_type_code(document_type)),
                _ => out.push_str(&token.source()),
            },
            Token::Counter {
                width: Some(width), ..
            } => out.push_str(&format!("{:0width$}", counter, width = width)),
            Token::Counter { width: None, .. } => out.push_str(&token.source()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_invoice_number() {
        let number = generate_sequence_number(
            "{DOCTYPE}-{YYYY}{MM}{DD}-{COUNTER:4}",
            7,
            "invoice",
            date(2024, 1, 15),
        );
        assert_eq!(number, "INV-20240115-0007");
    }

    #[test]
    fn test_unknown_document_type_uses_doc() {
        let number =
            generate_sequence_number("{DOCTYPE}-{COUNTER:2}", 1, "unknown_type", date(2024, 5, 1));
        assert_eq!(number, "DOC-01");
    }

    #[test]
    fn test_all_document_codes() {
        let codes: Vec<&str> = ["invoice", "quote", "order", "payment", "credit_note", "purchase_order"]
            .iter()
            .map(|t| document_type_code(t))
            .collect();
        assert_eq!(codes, vec!["INV", "QUO", "ORD", "PAY", "CRD", "PO"]);
    }

    #[test]
    fn test_short_year_clinic_and_repeats() {
        let number = generate_sequence_number(
            "{CLINIC}/{YY}/{COUNTER:3}/{COUNTER:1}",
            5,
            "order",
            date(2009, 12, 3),
        );
        assert_eq!(number, "CLN/09/005/5");
    }

    #[test]
    fn test_counter_is_never_truncated() {
        let number = generate_sequence_number("{COUNTER:2}", 12345, "quote", date(2024, 1, 1));
        assert_eq!(number, "12345");
    }

    #[test]
    fn test_unknown_tokens_kept_verbatim() {
        let number = generate_sequence_number(
            "{FOO}-{COUNTER:x}-{COUNTER:3}",
            9,
            "invoice",
            date(2024, 1, 1),
        );
        assert_eq!(number, "{FOO}-{COUNTER:x}-009");
    }
}
