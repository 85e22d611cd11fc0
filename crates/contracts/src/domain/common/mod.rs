//! Общие типы и трейты для всех агрегатов

pub mod aggregate_id;

pub use aggregate_id::AggregateId;
