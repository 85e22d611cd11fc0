//! Диалог создания / редактирования / удаления на странице списка.
//!
//! Страница открывает диалог, вызывает [`CrudDialog::begin_submit`] перед
//! запросом и [`CrudDialog::finish`] с его результатом. [`CrudOutcome`]
//! говорит, какое уведомление показать и нужно ли перезагрузить список.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DialogMode<R> {
    #[default]
    Closed,
    Create,
    Edit(R),
    ConfirmDelete(R),
}

impl<R> DialogMode<R> {
    pub fn is_open(&self) -> bool {
        !matches!(self, DialogMode::Closed)
    }

    /// Редактируемая или удаляемая запись
    pub fn record(&self) -> Option<&R> {
        match self {
            DialogMode::Edit(r) | DialogMode::ConfirmDelete(r) => Some(r),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrudOutcome {
    pub toast: Toast,
    /// Список нужно загрузить заново
    pub reload: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CrudDialog<R> {
    mode: DialogMode<R>,
    submitting: bool,
}

impl<R> CrudDialog<R> {
    pub fn new() -> Self {
        Self {
            mode: DialogMode::Closed,
            submitting: false,
        }
    }

    pub fn mode(&self) -> &DialogMode<R> {
        &self.mode
    }

    pub fn is_open(&self) -> bool {
        self.mode.is_open()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn open_create(&mut self) {
        self.open(DialogMode::Create);
    }

    pub fn open_edit(&mut self, record: R) {
        self.open(DialogMode::Edit(record));
    }

    pub fn open_delete(&mut self, record: R) {
        self.open(DialogMode::ConfirmDelete(record));
    }

    /// Закрыть без сохранения. Игнорируется, пока идёт запрос.
    pub fn close(&mut self) {
        if self.submitting {
            tracing::debug!("crud dialog: close ignored while submitting");
            return;
        }
        self.mode = DialogMode::Closed;
    }

    /// Отметить начало запроса. `false` - запрос отправлять нельзя:
    /// диалог закрыт или запрос уже идёт.
    pub fn begin_submit(&mut self) -> bool {
        if self.submitting || !self.mode.is_open() {
            return false;
        }
        self.submitting = true;
        true
    }

    /// Применить результат запроса, отправленного после [`Self::begin_submit`]
    pub fn finish(&mut self, result: Result<(), String>) -> CrudOutcome {
        self.submitting = false;
        match result {
            Ok(()) => {
                let message = match self.mode {
                    DialogMode::Create => "Record created",
                    DialogMode::Edit(_) => "Record updated",
                    DialogMode::ConfirmDelete(_) => "Record deleted",
                    DialogMode::Closed => "Saved",
                };
                self.mode = DialogMode::Closed;
                CrudOutcome {
                    toast: Toast::success(message),
                    reload: true,
                }
            }
            Err(e) => CrudOutcome {
                toast: Toast::error(e),
                reload: false,
            },
        }
    }

    fn open(&mut self, mode: DialogMode<R>) {
        if self.submitting {
            tracing::debug!("crud dialog: open ignored while submitting");
            return;
        }
        self.mode = mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_success_closes_and_reloads() {
        let mut dialog: CrudDialog<u32> = CrudDialog::new();
        dialog.open_create();
        assert!(dialog.begin_submit());
        let outcome = dialog.finish(Ok(()));
        assert_eq!(outcome.toast, Toast::success("Record created"));
        assert!(outcome.reload);
        assert_eq!(dialog.mode(), &DialogMode::Closed);
    }

    #[test]
    fn test_error_keeps_dialog_open() {
        let mut dialog = CrudDialog::new();
        dialog.open_edit(7u32);
        assert!(dialog.begin_submit());
        let outcome = dialog.finish(Err("Server unavailable".to_string()));
        assert_eq!(outcome.toast.kind, ToastKind::Error);
        assert_eq!(outcome.toast.message, "Server unavailable");
        assert!(!outcome.reload);
        assert_eq!(dialog.mode(), &DialogMode::Edit(7));
        assert!(!dialog.is_submitting());
    }

    #[test]
    fn test_double_submit_is_rejected() {
        let mut dialog = CrudDialog::new();
        dialog.open_delete("row".to_string());
        assert!(dialog.begin_submit());
        assert!(!dialog.begin_submit());
        dialog.close();
        assert!(dialog.is_open());
        let outcome = dialog.finish(Ok(()));
        assert_eq!(outcome.toast.message, "Record deleted");
    }

    #[test]
    fn test_closed_dialog_cannot_submit() {
        let mut dialog: CrudDialog<u32> = CrudDialog::new();
        assert!(!dialog.begin_submit());
        dialog.open_edit(1);
        dialog.close();
        assert!(!dialog.begin_submit());
        assert_eq!(dialog.mode().record(), None);
    }
}
