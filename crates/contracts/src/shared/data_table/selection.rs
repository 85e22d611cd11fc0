use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Идентификатор строки: индекс в загруженных данных или ключ приложения.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RowId(pub String);

impl RowId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<usize> for RowId {
    fn from(index: usize) -> Self {
        Self(index.to_string())
    }
}

impl From<&str> for RowId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RowId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Таблицы master/detail: выбрано не больше одной строки
    Single,
    #[default]
    Multi,
}

/// Выбранные строки. Хранятся только `true`, отсутствие - не выбрана.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSelection {
    selected: BTreeMap<RowId, bool>,
}

impl RowSelection {
    pub fn is_selected(&self, id: &RowId) -> bool {
        self.selected.get(id).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &RowId> {
        self.selected.keys()
    }

    pub fn as_map(&self) -> &BTreeMap<RowId, bool> {
        &self.selected
    }

    /// Применить переключение в заданном режиме.
    ///
    /// В режиме single выбор строки заменяет весь выбор за один шаг,
    /// две строки одновременно не выбраны.
    pub fn set(&mut self, mode: SelectionMode, id: RowId, selected: bool) {
        if !selected {
            self.selected.remove(&id);
            return;
        }
        if mode == SelectionMode::Single {
            self.selected.clear();
        }
        self.selected.insert(id, true);
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }
}
