use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::cell::CellValue;

type Accessor<T> = Arc<dyn Fn(&T) -> CellValue + Send + Sync>;
type CellRenderer<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// Колонка таблицы
///
/// # Пример
/// ```
/// use contracts::shared::data_table::ColumnDef;
///
/// struct CashPoint { code: String, balance: f64 }
///
/// let columns = vec![
///     ColumnDef::new("code", "Code", |r: &CashPoint| r.code.clone().into()),
///     ColumnDef::new("balance", "Balance", |r: &CashPoint| r.balance.into())
///         .with_cell(|r| format!("{:.2}", r.balance))
///         .hideable(false),
/// ];
/// assert_eq!(columns[1].render(&CashPoint { code: "A".into(), balance: 3.0 }), "3.00");
/// ```
pub struct ColumnDef<T> {
    pub id: String,
    pub header: String,
    accessor: Accessor<T>,
    cell: Option<CellRenderer<T>>,
    pub enable_hiding: bool,
    pub enable_sorting: bool,
}

impl<T> ColumnDef<T> {
    pub fn new<F>(id: impl Into<String>, header: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&T) -> CellValue + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            header: header.into(),
            accessor: Arc::new(accessor),
            cell: None,
            enable_hiding: true,
            enable_sorting: true,
        }
    }

    /// Свой текст ячейки вместо исходного значения
    pub fn with_cell<F>(mut self, cell: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.cell = Some(Arc::new(cell));
        self
    }

    pub fn hideable(mut self, enable: bool) -> Self {
        self.enable_hiding = enable;
        self
    }

    pub fn sortable(mut self, enable: bool) -> Self {
        self.enable_sorting = enable;
        self
    }

    pub fn value(&self, row: &T) -> CellValue {
        (self.accessor)(row)
    }

    pub fn render(&self, row: &T) -> String {
        match &self.cell {
            Some(cell) => cell(row),
            None => self.value(row).to_string(),
        }
    }
}

impl<T> Clone for ColumnDef<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            header: self.header.clone(),
            accessor: Arc::clone(&self.accessor),
            cell: self.cell.clone(),
            enable_hiding: self.enable_hiding,
            enable_sorting: self.enable_sorting,
        }
    }
}

impl<T> fmt::Debug for ColumnDef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("custom_cell", &self.cell.is_some())
            .field("enable_hiding", &self.enable_hiding)
            .field("enable_sorting", &self.enable_sorting)
            .finish()
    }
}

/// Видимость колонок. Колонки без записи видимы.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnVisibility {
    columns: BTreeMap<String, bool>,
}

impl ColumnVisibility {
    pub fn is_visible(&self, column_id: &str) -> bool {
        self.columns.get(column_id).copied().unwrap_or(true)
    }

    pub fn set(&mut self, column_id: &str, visible: bool) {
        self.columns.insert(column_id.to_string(), visible);
    }

    pub fn as_map(&self) -> &BTreeMap<String, bool> {
        &self.columns
    }

    pub(crate) fn retain_columns(&mut self, known: impl Fn(&str) -> bool) {
        self.columns.retain(|id, _| known(id));
    }
}
