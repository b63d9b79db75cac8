// src/handlers/mod.rs
pub mod auth;
pub mod billing;
pub mod category;
pub mod customer;
pub mod dashboard;
pub mod product;
pub mod sales;
pub mod search;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

/// Escapes `%`, `_` and `\` so user input matches literally inside a
/// LIKE pattern. The query must carry an `ESCAPE '\'` clause.
pub fn escape_like(q: &str) -> String {
    q.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

/// Half-open UTC window covering one calendar day.
pub fn day_window(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_time(NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1))
}

/// Half-open UTC window covering one calendar month. None for an invalid
/// month/year combination.
pub fn month_window(year: i32, month: u32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((
        start.and_time(NaiveTime::MIN).and_utc(),
        next.and_time(NaiveTime::MIN).and_utc(),
    ))
}
