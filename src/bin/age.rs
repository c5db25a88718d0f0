//! Print the portfolio author's age, as of today or as of a `YYYY-MM-DD` date
use anyhow::Context;
use chrono::NaiveDate;

use portfolio::age::calculate_age;

fn main() -> anyhow::Result<()> {
    let today = std::env::args()
        .nth(1)
        .map(|arg| {
            NaiveDate::parse_from_str(&arg, "%Y-%m-%d")
                .with_context(|| format!("`{arg}` is not a date in the YYYY-MM-DD format"))
        })
        .transpose()?;

    println!("{}", calculate_age(today));
    Ok(())
}
