//! Общие типы и чистая логика для backend и клиентов: таблица данных без UI,
//! протокол диалога создания/редактирования, нумерация документов и агрегат
//! нумератора.

pub mod domain;
pub mod shared;
