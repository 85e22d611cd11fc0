use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Когда счётчик нумератора начинается заново с 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetPeriod {
    #[default]
    Never,
    Monthly,
    Yearly,
}

impl ResetPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResetPeriod::Never => "never",
            ResetPeriod::Monthly => "monthly",
            ResetPeriod::Yearly => "yearly",
        }
    }

    /// Неизвестные значения считаются `Never`
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "monthly" => ResetPeriod::Monthly,
            "yearly" => ResetPeriod::Yearly,
            _ => ResetPeriod::Never,
        }
    }
}

impl fmt::Display for ResetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ResetPeriod {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(ResetPeriod::parse).unwrap_or_default())
    }
}

/// Настройка нумерации одного типа документа.
///
/// Счётчик хранит последний выданный номер. Генерация его только читает,
/// новое значение записывает тот, кто выдаёт номер.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
    pub pattern: String,
    pub current_counter: u64,
    #[serde(default)]
    pub reset_period: ResetPeriod,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Sequence {
    pub fn new(pattern: impl Into<String>, reset_period: ResetPeriod) -> Self {
        Self {
            pattern: pattern.into(),
            current_counter: 0,
            reset_period,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Момент последней записи счётчика
    pub fn last_update(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.created_at)
    }
}
