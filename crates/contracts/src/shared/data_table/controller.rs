use std::cmp::Ordering;
use std::sync::Arc;

use super::cell::CellValue;
use super::column::{ColumnDef, ColumnVisibility};
use super::filter::{ColumnFilters, FilterValue};
use super::pagination::{page_count, PaginationMode, PaginationState, DEFAULT_PAGE_SIZE};
use super::selection::{RowId, RowSelection, SelectionMode};
use super::sort::{SortDirection, SortState};

type RowIdFn<T> = Arc<dyn Fn(&T) -> RowId + Send + Sync>;
type SelectionListener<T> = Box<dyn FnMut(&[&T])>;
type PaginationListener = Box<dyn FnMut(PaginationState)>;
type FiltersListener = Box<dyn FnMut(&ColumnFilters, PaginationState)>;

/// Настройки таблицы при создании
pub struct TableOptions<T> {
    pub selection_mode: SelectionMode,
    pub pagination_mode: PaginationMode,
    pub page_size: usize,
    row_id: Option<RowIdFn<T>>,
}

impl<T> Default for TableOptions<T> {
    fn default() -> Self {
        Self {
            selection_mode: SelectionMode::Multi,
            pagination_mode: PaginationMode::Client,
            page_size: DEFAULT_PAGE_SIZE,
            row_id: None,
        }
    }
}

impl<T> TableOptions<T> {
    pub fn single_select(mut self) -> Self {
        self.selection_mode = SelectionMode::Single;
        self
    }

    pub fn server_side(mut self) -> Self {
        self.pagination_mode = PaginationMode::Server;
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Ключ строки. Без него строка определяется индексом в загруженных данных.
    pub fn row_id<F>(mut self, row_id: F) -> Self
    where
        F: Fn(&T) -> RowId + Send + Sync + 'static,
    {
        self.row_id = Some(Arc::new(row_id));
        self
    }
}

/// Строка из [`TableController::visible_rows`]
#[derive(Debug)]
pub struct TableRow<'a, T> {
    pub id: RowId,
    /// Позиция в загруженных данных
    pub index: usize,
    pub selected: bool,
    pub original: &'a T,
}

/// Состояние таблицы без UI: сортировка, фильтры и видимость колонок, выбор
/// строк и пагинация по загруженным строкам.
///
/// Слой отрисовки читает [`visible_rows`](Self::visible_rows) и передаёт
/// действия пользователя в сеттеры. Сеттеры не возвращают ошибок: устаревшие
/// id колонок и строк игнорируются.
pub struct TableController<T> {
    columns: Vec<ColumnDef<T>>,
    data: Vec<T>,
    options: TableOptions<T>,
    sorting: SortState,
    column_filters: ColumnFilters,
    column_visibility: ColumnVisibility,
    selection: RowSelection,
    pagination: PaginationState,
    server_page_count: usize,
    reported_selection: Vec<RowId>,
    on_selection_change: Option<SelectionListener<T>>,
    on_pagination_change: Option<PaginationListener>,
    on_column_filters_change: Option<FiltersListener>,
}

impl<T> TableController<T> {
    pub fn new(columns: Vec<ColumnDef<T>>, data: Vec<T>, options: TableOptions<T>) -> Self {
        let pagination = PaginationState::new(0, options.page_size);
        Self {
            columns,
            data,
            options,
            sorting: SortState::default(),
            column_filters: ColumnFilters::default(),
            column_visibility: ColumnVisibility::default(),
            selection: RowSelection::default(),
            pagination,
            server_page_count: 0,
            reported_selection: Vec::new(),
            on_selection_change: None,
            on_pagination_change: None,
            on_column_filters_change: None,
        }
    }

    /// Вызывается с выбранными строками при каждом изменении выбора
    pub fn on_selection_change<F>(&mut self, listener: F)
    where
        F: FnMut(&[&T]) + 'static,
    {
        self.on_selection_change = Some(Box::new(listener));
    }

    /// Вызывается с новым состоянием страницы. В серверном режиме - сигнал для загрузки.
    pub fn on_pagination_change<F>(&mut self, listener: F)
    where
        F: FnMut(PaginationState) + 'static,
    {
        self.on_pagination_change = Some(Box::new(listener));
    }

    /// Вызывается с новыми фильтрами и сброшенной страницей. Смена фильтра
    /// не вызывает обработчик пагинации: один вызов несёт всё для загрузки.
    pub fn on_column_filters_change<F>(&mut self, listener: F)
    where
        F: FnMut(&ColumnFilters, PaginationState) + 'static,
    {
        self.on_column_filters_change = Some(Box::new(listener));
    }

    // ------------------------------------------------------------------
    // Колонки и данные
    // ------------------------------------------------------------------

    pub fn columns(&self) -> &[ColumnDef<T>] {
        &self.columns
    }

    pub fn column(&self, column_id: &str) -> Option<&ColumnDef<T>> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    /// Заменить набор колонок. Состояние удалённых колонок сбрасывается.
    pub fn set_columns(&mut self, columns: Vec<ColumnDef<T>>) {
        self.columns = columns;
        let ids: Vec<String> = self.columns.iter().map(|c| c.id.clone()).collect();
        let known = |id: &str| ids.iter().any(|c| c == id);
        self.sorting.retain_columns(known);
        self.column_filters.retain_columns(known);
        self.column_visibility.retain_columns(known);
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn options(&self) -> &TableOptions<T> {
        &self.options
    }

    /// Загрузить строки: весь набор в клиентском режиме, страницу в серверном.
    pub fn set_data(&mut self, data: Vec<T>) {
        self.data = data;
        if self.options.row_id.is_none() {
            self.selection.clear();
        }
        if self.options.pagination_mode == PaginationMode::Client {
            let mut next = self.pagination;
            next.clamp_to(self.page_count());
            self.commit_pagination(next);
        }
        self.notify_selection();
    }

    pub fn row_id(&self, index: usize) -> Option<RowId> {
        self.data.get(index).map(|row| self.id_of(index, row))
    }

    fn id_of(&self, index: usize, row: &T) -> RowId {
        match &self.options.row_id {
            Some(key) => key(row),
            None => RowId::from(index),
        }
    }

    fn index_of(&self, id: &RowId) -> Option<usize> {
        self.data
            .iter()
            .enumerate()
            .position(|(i, row)| self.id_of(i, row) == *id)
    }

    // ------------------------------------------------------------------
    // Сортировка
    // ------------------------------------------------------------------

    pub fn sorting(&self) -> &SortState {
        &self.sorting
    }

    pub fn sort_direction(&self, column_id: &str) -> Option<SortDirection> {
        self.sorting.direction(column_id)
    }

    /// Заменить или снять сортировку колонки
    pub fn set_sort(&mut self, column_id: &str, direction: Option<SortDirection>) {
        if !self.can_sort(column_id) {
            return;
        }
        self.sorting.set(column_id, direction);
    }

    /// Клик по заголовку: asc -> desc -> нет. С `multi` колонка добавляется
    /// к текущим ключам, а не заменяет их.
    pub fn toggle_sort(&mut self, column_id: &str, multi: bool) {
        if !self.can_sort(column_id) {
            return;
        }
        self.sorting.toggle(column_id, multi);
    }

    fn can_sort(&self, column_id: &str) -> bool {
        match self.column(column_id) {
            Some(column) if column.enable_sorting => true,
            Some(_) => {
                tracing::debug!(column_id, "sort ignored: column is not sortable");
                false
            }
            None => {
                tracing::debug!(column_id, "sort ignored: unknown column");
                false
            }
        }
    }

    // ------------------------------------------------------------------
    // Фильтрация
    // ------------------------------------------------------------------

    pub fn column_filters(&self) -> &ColumnFilters {
        &self.column_filters
    }

    pub fn column_filter(&self, column_id: &str) -> Option<&FilterValue> {
        self.column_filters.get(column_id)
    }

    /// Установить или очистить (`None` или пустое значение) фильтр колонки.
    /// Смена фильтра возвращает таблицу на первую страницу.
    pub fn set_column_filter(&mut self, column_id: &str, value: Option<FilterValue>) {
        if self.column(column_id).is_none() {
            tracing::debug!(column_id, "filter ignored: unknown column");
            return;
        }
        if !self.column_filters.set(column_id, value) {
            return;
        }

        self.pagination.page_index = 0;
        if let Some(listener) = self.on_column_filters_change.as_mut() {
            listener(&self.column_filters, self.pagination);
        }
    }

    /// Строк после фильтрации (в серверном режиме - только загруженные)
    pub fn filtered_row_count(&self) -> usize {
        self.filtered_indices().len()
    }

    fn filtered_indices(&self) -> Vec<usize> {
        let active: Vec<(&ColumnDef<T>, &FilterValue)> = self
            .column_filters
            .iter()
            .filter_map(|f| self.column(&f.column_id).map(|c| (c, &f.value)))
            .collect();

        self.data
            .iter()
            .enumerate()
            .filter(|(_, row)| {
                active
                    .iter()
                    .all(|(column, filter)| filter.matches(&column.value(row)))
            })
            .map(|(i, _)| i)
            .collect()
    }

    fn sorted_indices(&self) -> Vec<usize> {
        let indices = self.filtered_indices();

        let keys: Vec<(&ColumnDef<T>, SortDirection)> = self
            .sorting
            .entries()
            .iter()
            .filter_map(|e| self.column(&e.column_id).map(|c| (c, e.direction)))
            .collect();
        if keys.is_empty() {
            return indices;
        }

        let values: Vec<Vec<CellValue>> = indices
            .iter()
            .map(|&i| keys.iter().map(|(c, _)| c.value(&self.data[i])).collect())
            .collect();
        let mut order: Vec<usize> = (0..indices.len()).collect();
        order.sort_by(|&a, &b| {
            for (k, (_, direction)) in keys.iter().enumerate() {
                let ord = values[a][k].compare(&values[b][k]);
                let ord = match direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
        order.into_iter().map(|pos| indices[pos]).collect()
    }

    // ------------------------------------------------------------------
    // Видимость колонок
    // ------------------------------------------------------------------

    pub fn column_visibility(&self) -> &ColumnVisibility {
        &self.column_visibility
    }

    pub fn is_column_visible(&self, column_id: &str) -> bool {
        self.column_visibility.is_visible(column_id)
    }

    /// Показать или скрыть колонку. Скрытые колонки всё равно фильтруют и сортируют.
    pub fn set_column_visibility(&mut self, column_id: &str, visible: bool) {
        match self.column(column_id) {
            Some(column) if column.enable_hiding => {
                self.column_visibility.set(column_id, visible);
            }
            Some(_) => tracing::debug!(column_id, "visibility ignored: column cannot be hidden"),
            None => tracing::debug!(column_id, "visibility ignored: unknown column"),
        }
    }

    pub fn visible_columns(&self) -> Vec<&ColumnDef<T>> {
        self.columns
            .iter()
            .filter(|c| self.column_visibility.is_visible(&c.id))
            .collect()
    }

    // ------------------------------------------------------------------
    // Выбор строк
    // ------------------------------------------------------------------

    pub fn selection(&self) -> &RowSelection {
        &self.selection
    }

    pub fn is_row_selected(&self, id: &RowId) -> bool {
        self.selection.is_selected(id)
    }

    /// Выбрать или снять выбор строки. В режиме single выбор заменяет предыдущий.
    pub fn toggle_row_selection(&mut self, id: impl Into<RowId>, selected: bool) {
        let id = id.into();
        if self.index_of(&id).is_none() {
            tracing::debug!(row_id = %id, "selection ignored: unknown row");
            return;
        }
        self.selection.set(self.options.selection_mode, id, selected);
        self.notify_selection();
    }

    /// Выбрать или снять выбор всех строк после фильтров. Выбор - только в режиме multi.
    pub fn toggle_all_rows_selected(&mut self, selected: bool) {
        let indices = self.filtered_indices();
        self.select_indices(&indices, selected);
    }

    /// Выбрать или снять выбор строк текущей страницы
    pub fn toggle_all_page_rows_selected(&mut self, selected: bool) {
        let indices = self.page_indices();
        self.select_indices(&indices, selected);
    }

    fn select_indices(&mut self, indices: &[usize], selected: bool) {
        if selected && self.options.selection_mode == SelectionMode::Single {
            tracing::debug!("bulk selection ignored in single selection mode");
            return;
        }
        let mode = self.options.selection_mode;
        let ids: Vec<RowId> = indices
            .iter()
            .map(|&i| self.id_of(i, &self.data[i]))
            .collect();
        for id in ids {
            self.selection.set(mode, id, selected);
        }
        self.notify_selection();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.notify_selection();
    }

    /// Выбранные строки из загруженных, в порядке данных
    pub fn selected_rows(&self) -> Vec<&T> {
        self.selected_indices()
            .into_iter()
            .map(|i| &self.data[i])
            .collect()
    }

    /// Чекбокс заголовка: выбраны все отфильтрованные строки
    pub fn is_all_rows_selected(&self) -> bool {
        let indices = self.filtered_indices();
        !indices.is_empty() && self.all_selected(&indices)
    }

    pub fn is_all_page_rows_selected(&self) -> bool {
        let indices = self.page_indices();
        !indices.is_empty() && self.all_selected(&indices)
    }

    /// Чекбокс заголовка в промежуточном состоянии
    pub fn is_some_rows_selected(&self) -> bool {
        !self.selected_indices().is_empty() && !self.is_all_rows_selected()
    }

    fn all_selected(&self, indices: &[usize]) -> bool {
        indices
            .iter()
            .all(|&i| self.selection.is_selected(&self.id_of(i, &self.data[i])))
    }

    fn selected_indices(&self) -> Vec<usize> {
        if self.selection.is_empty() {
            return Vec::new();
        }
        self.data
            .iter()
            .enumerate()
            .filter(|(i, row)| self.selection.is_selected(&self.id_of(*i, row)))
            .map(|(i, _)| i)
            .collect()
    }

    fn notify_selection(&mut self) {
        let indices = self.selected_indices();
        let resolved: Vec<RowId> = indices
            .iter()
            .map(|&i| self.id_of(i, &self.data[i]))
            .collect();
        if resolved == self.reported_selection {
            return;
        }
        self.reported_selection = resolved;

        let rows: Vec<&T> = indices.iter().map(|&i| &self.data[i]).collect();
        if let Some(listener) = self.on_selection_change.as_mut() {
            listener(&rows);
        }
    }

    // ------------------------------------------------------------------
    // Пагинация
    // ------------------------------------------------------------------

    pub fn pagination(&self) -> PaginationState {
        self.pagination
    }

    pub fn page_count(&self) -> usize {
        match self.options.pagination_mode {
            PaginationMode::Client => {
                page_count(self.filtered_row_count(), self.pagination.page_size)
            }
            PaginationMode::Server => self.server_page_count,
        }
    }

    /// Перейти на страницу; индекс за последней страницей ограничивается
    pub fn set_page_index(&mut self, page_index: usize) {
        let mut next = self.pagination;
        next.page_index = page_index;
        next.clamp_to(self.page_count());
        self.commit_pagination(next);
    }

    /// Сменить размер страницы, сохранив первую строку текущей страницы
    pub fn set_page_size(&mut self, page_size: usize) {
        let mut next = self.pagination;
        next.resize(page_size);
        if self.options.pagination_mode == PaginationMode::Client {
            next.clamp_to(page_count(self.filtered_row_count(), next.page_size));
        }
        self.commit_pagination(next);
    }

    /// Все отфильтрованные строки на одной странице. Только клиентский режим.
    pub fn show_all(&mut self) {
        if self.options.pagination_mode == PaginationMode::Server {
            tracing::debug!("show all ignored in server pagination mode");
            return;
        }
        let total = self.filtered_row_count().max(1);
        self.set_page_size(total);
    }

    pub fn can_previous_page(&self) -> bool {
        self.pagination.page_index > 0
    }

    pub fn can_next_page(&self) -> bool {
        self.pagination.page_index + 1 < self.page_count()
    }

    pub fn previous_page(&mut self) {
        if self.can_previous_page() {
            self.set_page_index(self.pagination.page_index - 1);
        }
    }

    pub fn next_page(&mut self) {
        if self.can_next_page() {
            self.set_page_index(self.pagination.page_index + 1);
        }
    }

    pub fn first_page(&mut self) {
        self.set_page_index(0);
    }

    pub fn last_page(&mut self) {
        self.set_page_index(self.page_count().saturating_sub(1));
    }

    /// Принять состояние страницы от вызывающего (серверный режим).
    /// Обработчик пагинации не вызывается.
    pub fn sync_server_pagination(&mut self, pagination: PaginationState, page_count: usize) {
        self.pagination = PaginationState::new(pagination.page_index, pagination.page_size);
        self.server_page_count = page_count;
    }

    fn commit_pagination(&mut self, next: PaginationState) {
        if next == self.pagination {
            return;
        }
        self.pagination = next;
        if let Some(listener) = self.on_pagination_change.as_mut() {
            listener(next);
        }
    }

    fn page_indices(&self) -> Vec<usize> {
        let sorted = self.sorted_indices();
        match self.options.pagination_mode {
            PaginationMode::Client => sorted
                .into_iter()
                .skip(self.pagination.offset())
                .take(self.pagination.page_size)
                .collect(),
            PaginationMode::Server => sorted,
        }
    }

    // ------------------------------------------------------------------
    // Модель строк
    // ------------------------------------------------------------------

    /// Строки для отрисовки: фильтр, сортировка, затем текущая страница.
    /// В серверном режиме загруженные данные уже являются страницей.
    pub fn visible_rows(&self) -> Vec<TableRow<'_, T>> {
        self.page_indices()
            .into_iter()
            .map(|index| {
                let original = &self.data[index];
                let id = self.id_of(index, original);
                TableRow {
                    selected: self.selection.is_selected(&id),
                    id,
                    index,
                    original,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: String,
        a: String,
        b: i64,
    }

    fn item(id: &str, a: &str, b: i64) -> Item {
        Item {
            id: id.to_string(),
            a: a.to_string(),
            b,
        }
    }

    fn columns() -> Vec<ColumnDef<Item>> {
        vec![
            ColumnDef::new("a", "A", |r: &Item| r.a.clone().into()),
            ColumnDef::new("b", "B", |r: &Item| r.b.into()),
            ColumnDef::new("id", "Id", |r: &Item| r.id.clone().into())
                .hideable(false)
                .sortable(false),
        ]
    }

    fn numbered(count: usize) -> Vec<Item> {
        (0..count)
            .map(|i| item(&format!("r{}", i), &format!("row {}", i), i as i64))
            .collect()
    }

    fn ids(rows: &[TableRow<'_, Item>]) -> Vec<String> {
        rows.iter().map(|r| r.original.id.clone()).collect()
    }

    #[test]
    fn test_sort_cycle_leaves_other_column() {
        let mut table = TableController::new(columns(), numbered(3), TableOptions::default());
        table.set_sort("b", Some(SortDirection::Desc));
        table.set_sort("a", Some(SortDirection::Asc));
        table.set_sort("a", Some(SortDirection::Desc));
        table.set_sort("a", None);

        assert_eq!(table.sorting().entries().len(), 1);
        assert_eq!(table.sort_direction("b"), Some(SortDirection::Desc));
        assert_eq!(table.sort_direction("a"), None);
    }

    #[test]
    fn test_multi_sort_breaks_ties_in_toggle_order() {
        let data = vec![item("1", "x", 2), item("2", "y", 1), item("3", "x", 1)];
        let mut table = TableController::new(columns(), data, TableOptions::default());
        table.toggle_sort("a", true);
        table.toggle_sort("b", true);

        assert_eq!(ids(&table.visible_rows()), vec!["3", "1", "2"]);
    }

    #[test]
    fn test_filter_conjunction() {
        let data = vec![item("1", "x", 1), item("2", "y", 1), item("3", "x", 2)];
        let mut table = TableController::new(columns(), data, TableOptions::default());
        table.set_column_filter("a", Some(FilterValue::text("x")));
        table.set_column_filter("b", Some(FilterValue::Number(1.0)));

        assert_eq!(ids(&table.visible_rows()), vec!["1"]);

        table.set_column_filter("b", Some(FilterValue::text("")));
        assert_eq!(ids(&table.visible_rows()), vec!["1", "3"]);
    }

    #[test]
    fn test_unknown_column_ids_are_ignored() {
        let mut table = TableController::new(columns(), numbered(3), TableOptions::default());
        table.set_sort("missing", Some(SortDirection::Asc));
        table.set_column_filter("missing", Some(FilterValue::text("x")));
        table.set_column_visibility("missing", false);
        table.set_sort("id", Some(SortDirection::Asc));
        table.set_column_visibility("id", false);

        assert!(table.sorting().is_empty());
        assert!(table.column_filters().is_empty());
        assert_eq!(table.visible_columns().len(), 3);
        assert_eq!(table.visible_rows().len(), 3);
    }

    #[test]
    fn test_hidden_column_still_filters() {
        let data = vec![item("1", "x", 1), item("2", "y", 1)];
        let mut table = TableController::new(columns(), data, TableOptions::default());
        table.set_column_visibility("a", false);
        table.set_column_filter("a", Some(FilterValue::text("y")));

        assert!(!table.is_column_visible("a"));
        assert_eq!(ids(&table.visible_rows()), vec!["2"]);
        let headers: Vec<&str> = table.visible_columns().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(headers, vec!["b", "id"]);
    }

    #[test]
    fn test_single_select_replaces() {
        let mut table = TableController::new(
            columns(),
            numbered(3),
            TableOptions::default().single_select(),
        );
        table.toggle_row_selection(1usize, true);
        table.toggle_row_selection(2usize, true);

        let selected = table.selection().as_map();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected.get(&RowId::from(2)), Some(&true));
    }

    #[test]
    fn test_selection_listener_fires_once_per_change() {
        let seen: Rc<RefCell<Vec<Vec<String>>>> = Rc::new(RefCell::new(Vec::new()));
        let mut table = TableController::new(
            columns(),
            numbered(3),
            TableOptions::default().row_id(|r: &Item| RowId::new(r.id.clone())),
        );
        let sink = Rc::clone(&seen);
        table.on_selection_change(move |rows| {
            sink.borrow_mut()
                .push(rows.iter().map(|r| r.id.clone()).collect());
        });

        table.toggle_row_selection("r0", true);
        table.toggle_row_selection("r0", true);
        table.set_column_filter("a", Some(FilterValue::text("row 1")));
        table.toggle_row_selection("r2", true);
        table.toggle_row_selection("missing", true);
        table.clear_selection();

        assert_eq!(
            *seen.borrow(),
            vec![
                vec!["r0".to_string()],
                vec!["r0".to_string(), "r2".to_string()],
                vec![],
            ]
        );
    }

    #[test]
    fn test_select_all_respects_filters_and_mode() {
        let mut table = TableController::new(columns(), numbered(5), TableOptions::default());
        table.set_column_filter("b", Some(FilterValue::NumberRange { min: Some(3.0), max: None }));
        table.toggle_all_rows_selected(true);

        assert_eq!(table.selected_rows().len(), 2);
        assert!(table.is_all_rows_selected());

        table.set_column_filter("b", None);
        assert!(table.is_some_rows_selected());

        let mut single = TableController::new(
            columns(),
            numbered(5),
            TableOptions::default().single_select(),
        );
        single.toggle_all_rows_selected(true);
        assert!(single.selected_rows().is_empty());
    }

    #[test]
    fn test_page_size_change_clamps_page_index() {
        let mut table = TableController::new(columns(), numbered(25), TableOptions::default());
        table.set_page_index(2);
        assert_eq!(table.pagination().page_index, 2);
        assert_eq!(table.visible_rows().len(), 5);

        table.set_page_size(25);
        assert_eq!(table.pagination().page_index, 0);
        assert_eq!(table.page_count(), 1);
        assert_eq!(table.visible_rows().len(), 25);
    }

    #[test]
    fn test_page_navigation() {
        let mut table = TableController::new(columns(), numbered(25), TableOptions::default());
        table.set_page_index(99);
        assert_eq!(table.pagination().page_index, 2);
        assert!(!table.can_next_page());

        table.previous_page();
        assert_eq!(ids(&table.visible_rows())[0], "r10");

        table.first_page();
        assert!(!table.can_previous_page());
        table.last_page();
        assert_eq!(table.pagination().page_index, 2);
    }

    #[test]
    fn test_filter_change_returns_to_first_page() {
        let mut table = TableController::new(columns(), numbered(25), TableOptions::default());
        table.set_page_index(1);
        table.set_column_filter("a", Some(FilterValue::text("row 2")));
        assert_eq!(table.pagination().page_index, 0);
        assert_eq!(table.filtered_row_count(), 6);
    }

    #[test]
    fn test_show_all() {
        let mut table = TableController::new(columns(), numbered(25), TableOptions::default());
        table.set_page_index(1);
        table.show_all();
        assert_eq!(table.pagination().page_size, 25);
        assert_eq!(table.pagination().page_index, 0);
        assert_eq!(table.visible_rows().len(), 25);
    }

    #[test]
    fn test_server_mode_reports_pagination_and_does_not_slice() {
        let requests: Rc<RefCell<Vec<PaginationState>>> = Rc::new(RefCell::new(Vec::new()));
        let mut table = TableController::new(
            columns(),
            numbered(10),
            TableOptions::default().server_side(),
        );
        let sink = Rc::clone(&requests);
        table.on_pagination_change(move |p| sink.borrow_mut().push(p));
        table.sync_server_pagination(PaginationState::new(0, 10), 4);

        assert_eq!(table.visible_rows().len(), 10);
        table.next_page();
        assert_eq!(table.pagination().page_index, 1);
        assert_eq!(*requests.borrow(), vec![PaginationState::new(1, 10)]);

        table.set_data(numbered(10));
        assert_eq!(table.pagination().page_index, 1);
        assert_eq!(table.visible_rows().len(), 10);

        table.show_all();
        assert_eq!(table.pagination().page_size, 10);
    }

    #[test]
    fn test_server_mode_notifies_filters() {
        let events: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let mut table = TableController::new(
            columns(),
            numbered(3),
            TableOptions::default().server_side(),
        );
        table.sync_server_pagination(PaginationState::new(3, 10), 5);

        let sink = Rc::clone(&events);
        table.on_pagination_change(move |p| {
            sink.borrow_mut().push(format!("page={}", p.page_index))
        });
        let sink = Rc::clone(&events);
        table.on_column_filters_change(move |filters, p| {
            sink.borrow_mut()
                .push(format!("filters={} page={}", filters.len(), p.page_index))
        });

        table.set_column_filter("a", Some(FilterValue::text("row")));
        assert_eq!(*events.borrow(), vec!["filters=1 page=0".to_string()]);
        assert_eq!(table.pagination().page_index, 0);

        table.set_column_filter("a", Some(FilterValue::text("row")));
        assert_eq!(events.borrow().len(), 1);

        table.next_page();
        assert_eq!(events.borrow().last().map(String::as_str), Some("page=1"));
    }

    #[test]
    fn test_sort_mixed_cells_groups_by_kind() {
        let mut cells: Vec<CellValue> = (0..200).map(|i| CellValue::Integer(i * 7 % 113)).collect();
        cells.extend((0..50).map(|i| CellValue::Text(format!("{}", i * 3))));
        cells.extend((0..20).map(|_| CellValue::Number(f64::NAN)));
        cells.push(CellValue::Number(-0.5));
        cells.push(CellValue::Empty);

        let column = ColumnDef::new("a", "A", |c: &CellValue| c.clone());
        let mut table =
            TableController::new(vec![column], cells, TableOptions::default().page_size(1000));
        table.set_sort("a", Some(SortDirection::Asc));

        let rows = table.visible_rows();
        assert_eq!(rows.len(), 272);
        assert_eq!(rows[0].original, &CellValue::Number(-0.5));
        assert!(matches!(rows[201].original, CellValue::Number(n) if n.is_nan()));
        assert!(matches!(rows[221].original, CellValue::Text(_)));
        assert_eq!(rows[271].original, &CellValue::Empty);
        drop(rows);

        table.set_sort("a", Some(SortDirection::Desc));
        assert_eq!(table.visible_rows().len(), 272);
    }

    #[test]
    fn test_set_data_clears_index_selection() {
        let mut table = TableController::new(columns(), numbered(3), TableOptions::default());
        table.toggle_row_selection(0usize, true);
        table.set_data(numbered(2));
        assert!(table.selection().is_empty());

        let mut keyed = TableController::new(
            columns(),
            numbered(3),
            TableOptions::default().row_id(|r: &Item| RowId::new(r.id.clone())),
        );
        keyed.toggle_row_selection("r1", true);
        keyed.set_data(numbered(2));
        assert_eq!(keyed.selected_rows().len(), 1);
        keyed.set_data(Vec::new());
        assert!(keyed.selected_rows().is_empty());
        assert!(keyed.is_row_selected(&RowId::from("r1")));
    }

    #[test]
    fn test_set_columns_drops_stale_state() {
        let mut table = TableController::new(columns(), numbered(3), TableOptions::default());
        table.set_sort("a", Some(SortDirection::Asc));
        table.set_column_filter("b", Some(FilterValue::Number(1.0)));
        table.set_columns(columns().into_iter().filter(|c| c.id != "a").collect());

        assert!(table.sorting().is_empty());
        assert_eq!(table.column_filters().len(), 1);
    }
}
