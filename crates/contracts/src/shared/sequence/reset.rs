use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::model::{ResetPeriod, Sequence};

/// Результат [`reset_counter_if_needed`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterReset {
    pub should_reset: bool,
    pub new_counter: u64,
}

/// Счётчик для следующего документа, выданного в день `today`.
///
/// Годовой и месячный нумераторы начинают с 1, когда `today` попадает в более
/// поздний год (месяц), чем последняя запись счётчика. Иначе счётчик растёт на 1.
pub fn get_next_counter(sequence: &Sequence, today: NaiveDate) -> u64 {
    let last = sequence.last_update().date_naive();
    let crossed = match sequence.reset_period {
        ResetPeriod::Yearly => today.year() > last.year(),
        ResetPeriod::Monthly => month_number(today) > month_number(last),
        ResetPeriod::Never => false,
    };
    if crossed {
        1
    } else {
        sequence.current_counter.saturating_add(1)
    }
}

pub fn reset_counter_if_needed(sequence: &Sequence, today: NaiveDate) -> CounterReset {
    let next = get_next_counter(sequence, today);
    CounterReset {
        should_reset: next == 1,
        new_counter: next,
    }
}

fn month_number(date: NaiveDate) -> i64 {
    date.year() as i64 * 12 + date.month() as i64
}
