use serde::{Deserialize, Serialize};

/// Направление сортировки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Значок для заголовка таблицы
    pub fn indicator(&self) -> &'static str {
        match self {
            SortDirection::Asc => " ▲",
            SortDirection::Desc => " ▼",
        }
    }
}

/// Одно правило сортировки
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortEntry {
    pub column_id: String,
    pub direction: SortDirection,
}

/// Правила сортировки по порядку. Первое - основной ключ,
/// следующие только разрешают равенство.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    entries: Vec<SortEntry>,
}

impl SortState {
    pub fn entries(&self) -> &[SortEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn direction(&self, column_id: &str) -> Option<SortDirection> {
        self.entries
            .iter()
            .find(|e| e.column_id == column_id)
            .map(|e| e.direction)
    }

    /// Позиция колонки среди ключей сортировки (0 - основной)
    pub fn position(&self, column_id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.column_id == column_id)
    }

    /// Заменить запись колонки на месте, добавить новую, удалить при `None`.
    pub fn set(&mut self, column_id: &str, direction: Option<SortDirection>) {
        match (self.position(column_id), direction) {
            (Some(idx), Some(dir)) => self.entries[idx].direction = dir,
            (Some(idx), None) => {
                self.entries.remove(idx);
            }
            (None, Some(dir)) => self.entries.push(SortEntry {
                column_id: column_id.to_string(),
                direction: dir,
            }),
            (None, None) => {}
        }
    }

    /// Клик по заголовку: нет -> asc -> desc -> нет.
    ///
    /// Без `multi` колонка становится единственным ключом.
    pub fn toggle(&mut self, column_id: &str, multi: bool) {
        let next = match self.direction(column_id) {
            None => Some(SortDirection::Asc),
            Some(SortDirection::Asc) => Some(SortDirection::Desc),
            Some(SortDirection::Desc) => None,
        };
        if !multi {
            self.entries.retain(|e| e.column_id == column_id);
        }
        self.set(column_id, next);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn retain_columns(&mut self, known: impl Fn(&str) -> bool) {
        self.entries.retain(|e| known(&e.column_id));
    }
}
