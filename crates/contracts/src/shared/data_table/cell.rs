use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Значение ячейки, полученное из строки функцией колонки.
///
/// Сортировка и фильтрация работают только с этими значениями.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Integer(i64),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Числовое значение ячейки для числовых фильтров
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Integer(v) => Some(*v as f64),
            CellValue::Number(v) => Some(*v),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::Date(d) => Some(*d),
            CellValue::Text(s) => {
                let date_part = s.split('T').next().unwrap_or(s);
                NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
            }
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Порядок для сортировки.
    ///
    /// Пустые ячейки идут после непустых (по возрастанию). Текст сравнивается
    /// без учёта регистра, числа по значению, NaN после всех чисел. Ячейки
    /// разных видов группируются: bool, числа, даты, текст.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            (false, false) => {}
        }

        match (self, other) {
            (CellValue::Text(a), CellValue::Text(b)) => a
                .to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b)),
            (CellValue::Integer(a), CellValue::Integer(b)) => a.cmp(b),
            (CellValue::Number(a), CellValue::Number(b)) => compare_f64(*a, *b),
            (CellValue::Integer(a), CellValue::Number(b)) => compare_i64_f64(*a, *b),
            (CellValue::Number(a), CellValue::Integer(b)) => compare_i64_f64(*b, *a).reverse(),
            (CellValue::Bool(a), CellValue::Bool(b)) => a.cmp(b),
            (CellValue::Date(a), CellValue::Date(b)) => a.cmp(b),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            CellValue::Bool(_) => 0,
            CellValue::Integer(_) | CellValue::Number(_) => 1,
            CellValue::Date(_) => 2,
            CellValue::Text(_) => 3,
            CellValue::Empty => 4,
        }
    }
}

// NaN равен только NaN и стоит после всех чисел
fn compare_f64(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

// Точное сравнение без потери точности i64 -> f64
fn compare_i64_f64(a: i64, b: f64) -> Ordering {
    const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;
    if b.is_nan() || b >= TWO_POW_63 {
        return Ordering::Less;
    }
    if b < -TWO_POW_63 {
        return Ordering::Greater;
    }
    let whole = b.trunc();
    match a.cmp(&(whole as i64)) {
        Ordering::Equal if b > whole => Ordering::Less,
        Ordering::Equal if b < whole => Ordering::Greater,
        ord => ord,
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Integer(v) => write!(f, "{}", v),
            CellValue::Number(v) => write!(f, "{}", v),
            CellValue::Bool(v) => write!(f, "{}", v),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Integer(value as i64)
    }
}

impl From<u64> for CellValue {
    fn from(value: u64) -> Self {
        CellValue::Integer(value as i64)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        CellValue::Date(value)
    }
}

impl<V: Into<CellValue>> From<Option<V>> for CellValue {
    fn from(value: Option<V>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Empty)
    }
}
