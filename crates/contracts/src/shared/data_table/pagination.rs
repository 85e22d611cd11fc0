use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Варианты размера страницы
pub const PAGE_SIZE_OPTIONS: [usize; 5] = [10, 20, 30, 40, 50];

/// Число страниц для `total` строк, `ceil(total / page_size)`
pub fn page_count(total: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    total.div_ceil(page_size)
}

/// Текущая страница, с нуля
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationState {
    pub fn new(page_index: usize, page_size: usize) -> Self {
        Self {
            page_index,
            page_size: page_size.max(1),
        }
    }

    /// Смещение первой строки страницы
    pub fn offset(&self) -> usize {
        self.page_index.saturating_mul(self.page_size)
    }

    pub(crate) fn clamp_to(&mut self, page_count: usize) {
        let last = page_count.saturating_sub(1);
        if self.page_index > last {
            self.page_index = last;
        }
    }

    /// Сменить размер страницы, сохранив первую строку текущей страницы
    pub(crate) fn resize(&mut self, page_size: usize) {
        let page_size = page_size.max(1);
        let top_row = self.offset();
        self.page_size = page_size;
        self.page_index = top_row / page_size;
    }
}

/// Кто владеет состоянием страницы
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaginationMode {
    /// Загружен весь набор, таблица сама делит его на страницы
    #[default]
    Client,
    /// Загружена одна страница, число страниц задаёт вызывающий
    Server,
}

/// Страница списка с сервера
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResponse<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

impl<T> PagedResponse<T> {
    pub fn new(items: Vec<T>, total: usize, page: usize, page_size: usize) -> Self {
        Self {
            items,
            total,
            page,
            page_size,
            total_pages: page_count(total, page_size),
        }
    }

    pub fn pagination(&self) -> PaginationState {
        PaginationState::new(self.page, self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(25, 10), 3);
        assert_eq!(page_count(30, 10), 3);
        assert_eq!(page_count(5, 0), 5);
    }

    #[test]
    fn test_resize_keeps_top_row() {
        let mut state = PaginationState::new(2, 10);
        state.resize(5);
        assert_eq!(state.page_index, 4);
        state.resize(25);
        assert_eq!(state.page_index, 0);
    }

    #[test]
    fn test_paged_response_total_pages() {
        let page = PagedResponse::new(vec![1, 2, 3], 23, 2, 10);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.pagination().offset(), 20);
    }
}
