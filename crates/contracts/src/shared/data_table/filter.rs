use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::cell::CellValue;

/// Значение фильтра одной колонки.
///
/// У каждого вида свой предикат, тип значения известен заранее.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FilterValue {
    /// Вхождение подстроки без учёта регистра
    Text(String),
    /// Точное совпадение с текстом ячейки (статус, тип, ...)
    Enum(String),
    /// Текст ячейки - одно из значений списка (фасетный фильтр)
    OneOf(Vec<String>),
    /// Числовое равенство
    Number(f64),
    /// Числовой диапазон включительно, любой конец может быть открыт
    NumberRange { min: Option<f64>, max: Option<f64> },
    /// Диапазон дат включительно, любой конец может быть открыт
    DateRange {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
    Bool(bool),
}

impl FilterValue {
    pub fn text(value: impl Into<String>) -> Self {
        FilterValue::Text(value.into())
    }

    /// Фильтр без ограничения. Установка такого фильтра очищает фильтр колонки.
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Text(s) | FilterValue::Enum(s) => s.trim().is_empty(),
            FilterValue::OneOf(values) => values.is_empty(),
            FilterValue::NumberRange { min, max } => min.is_none() && max.is_none(),
            FilterValue::DateRange { from, to } => from.is_none() && to.is_none(),
            FilterValue::Number(_) | FilterValue::Bool(_) => false,
        }
    }

    pub fn matches(&self, cell: &CellValue) -> bool {
        match self {
            FilterValue::Text(needle) => cell
                .to_string()
                .to_lowercase()
                .contains(&needle.trim().to_lowercase()),
            FilterValue::Enum(expected) => cell.to_string() == *expected,
            FilterValue::OneOf(values) => {
                let text = cell.to_string();
                values.iter().any(|v| *v == text)
            }
            FilterValue::Number(expected) => cell
                .as_f64()
                .map(|v| (v - expected).abs() < f64::EPSILON)
                .unwrap_or(false),
            FilterValue::NumberRange { min, max } => match cell.as_f64() {
                Some(v) => min.map_or(true, |m| v >= m) && max.map_or(true, |m| v <= m),
                None => false,
            },
            FilterValue::DateRange { from, to } => match cell.as_date() {
                Some(d) => from.map_or(true, |f| d >= f) && to.map_or(true, |t| d <= t),
                None => false,
            },
            FilterValue::Bool(expected) => cell.as_bool() == Some(*expected),
        }
    }
}

/// Фильтр одной колонки
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFilter {
    pub column_id: String,
    pub value: FilterValue,
}

/// Активные фильтры, по одному на колонку, в порядке добавления.
/// Строка должна пройти все.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnFilters {
    filters: Vec<ColumnFilter>,
}

impl ColumnFilters {
    pub fn get(&self, column_id: &str) -> Option<&FilterValue> {
        self.filters
            .iter()
            .find(|f| f.column_id == column_id)
            .map(|f| &f.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnFilter> {
        self.filters.iter()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Установить или очистить (`None` или пустое значение) фильтр колонки.
    /// `true`, если состояние изменилось.
    pub fn set(&mut self, column_id: &str, value: Option<FilterValue>) -> bool {
        let value = value.filter(|v| !v.is_empty());
        let position = self.filters.iter().position(|f| f.column_id == column_id);
        match (position, value) {
            (Some(idx), Some(value)) => {
                if self.filters[idx].value == value {
                    return false;
                }
                self.filters[idx].value = value;
                true
            }
            (Some(idx), None) => {
                self.filters.remove(idx);
                true
            }
            (None, Some(value)) => {
                self.filters.push(ColumnFilter {
                    column_id: column_id.to_string(),
                    value,
                });
                true
            }
            (None, None) => false,
        }
    }

    pub fn clear(&mut self) {
        self.filters.clear();
    }

    pub(crate) fn retain_columns(&mut self, known: impl Fn(&str) -> bool) {
        self.filters.retain(|f| known(&f.column_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_filter_is_case_insensitive_substring() {
        let filter = FilterValue::text("ACET");
        assert!(filter.matches(&CellValue::from("Paracetamol")));
        assert!(!filter.matches(&CellValue::from("Ibuprofen")));
    }

    #[test]
    fn test_blank_text_is_empty() {
        assert!(FilterValue::text("   ").is_empty());
        assert!(!FilterValue::Bool(false).is_empty());
        assert!(FilterValue::NumberRange { min: None, max: None }.is_empty());
    }

    #[test]
    fn test_number_range_inclusive_with_open_end() {
        let filter = FilterValue::NumberRange {
            min: Some(10.0),
            max: None,
        };
        assert!(filter.matches(&CellValue::Integer(10)));
        assert!(filter.matches(&CellValue::Number(99.5)));
        assert!(!filter.matches(&CellValue::Integer(9)));
        assert!(!filter.matches(&CellValue::Empty));
    }

    #[test]
    fn test_date_range() {
        let filter = FilterValue::DateRange {
            from: NaiveDate::from_ymd_opt(2024, 3, 1),
            to: NaiveDate::from_ymd_opt(2024, 3, 31),
        };
        assert!(filter.matches(&CellValue::from("2024-03-31")));
        assert!(!filter.matches(&CellValue::from("2024-04-01")));
    }

    #[test]
    fn test_one_of_and_enum() {
        let statuses = FilterValue::OneOf(vec!["paid".into(), "pending".into()]);
        assert!(statuses.matches(&CellValue::from("paid")));
        assert!(!statuses.matches(&CellValue::from("cancelled")));
        assert!(!FilterValue::Enum("paid".into()).matches(&CellValue::from("unpaid")));
    }

    #[test]
    fn test_column_filters_set_and_clear() {
        let mut filters = ColumnFilters::default();
        assert!(filters.set("name", Some(FilterValue::text("ab"))));
        assert!(!filters.set("name", Some(FilterValue::text("ab"))));
        assert!(filters.set("name", Some(FilterValue::text(""))));
        assert!(filters.is_empty());
        assert!(!filters.set("name", None));
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(FilterValue::text("x")).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "text", "value": "x"}));
    }
}
