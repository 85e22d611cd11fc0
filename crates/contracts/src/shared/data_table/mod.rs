//! Таблица данных без UI: сортировка, фильтрация, видимость колонок, выбор
//! строк и клиентская или серверная пагинация.

pub mod cell;
pub mod column;
pub mod controller;
pub mod filter;
pub mod pagination;
pub mod selection;
pub mod sort;

pub use cell::CellValue;
pub use column::{ColumnDef, ColumnVisibility};
pub use controller::{TableController, TableOptions, TableRow};
pub use filter::{ColumnFilter, ColumnFilters, FilterValue};
pub use pagination::{page_count, PagedResponse, PaginationMode, PaginationState};
pub use selection::{RowId, RowSelection, SelectionMode};
pub use sort::{SortDirection, SortEntry, SortState};
