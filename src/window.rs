// src/window.rs

use chrono::{Datelike, Months, NaiveDate};

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Every first-of-month date from `start`'s month through `end`'s month,
/// both inclusive. Day-of-month is ignored; an `end` month before the
/// `start` month gives an empty sequence.
pub fn month_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let last = month_start(end);
    let mut months = Vec::new();
    let mut current = month_start(start);
    while current <= last {
        months.push(current);
        match current.checked_add_months(Months::new(1)) {
            Some(next) => current = next,
            None => break,
        }
    }
    months
}
