use chrono::{Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::consts::MONEY_DECIMAL_PLACES;

/// Inclusive first and last day of a calendar month
pub fn month_range(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start_of_month = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end_of_month = start_of_month.checked_add_months(Months::new(1))?.pred_opt()?;

    Some((start_of_month, end_of_month))
}

/// Number of days between `start` and `end`, both inclusive
pub fn count_days(start: NaiveDate, end: NaiveDate) -> u32 {
    ((end - start).num_days() + 1).max(0) as u32
}

/// Rounds half away from zero and pins the scale, so `1000` renders as `1000.00`
pub fn to_money(value: Decimal) -> Decimal {
    let mut money = value.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    money.rescale(MONEY_DECIMAL_PLACES);

    money
}
