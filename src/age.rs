use chrono::{Datelike, Local, NaiveDate};

/// Birth year of the portfolio's author
pub const BIRTH_YEAR: i32 = 2004;
/// Birth month (1-indexed, March)
pub const BIRTH_MONTH: u32 = 3;
/// Birth day of month
pub const BIRTH_DAY: u32 = 20;

/// Age in completed years as of `today`, or as of the current local date when `None`
pub fn calculate_age(today: Option<NaiveDate>) -> i32 {
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    age_on(today)
}

/// Age in completed years as of the given date
pub fn age_on(today: NaiveDate) -> i32 {
    let age = today.year() - BIRTH_YEAR;
    if (today.month(), today.day()) < (BIRTH_MONTH, BIRTH_DAY) {
        age - 1
    } else {
        age
    }
}
