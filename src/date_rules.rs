//! Primitive date computations used to turn a holiday rule into a concrete
//! date of a given year. All functions are pure; failures are reported as
//! `HolidayError::InvalidRule`, which the resolver treats as
//! "not applicable this year".

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::HolidayError;

/// Largest supported offset in days, applied to moveable and derived rules
pub const MAX_OFFSET_DAYS: i64 = 36_500;

/// Which instance of a weekday within a month is meant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occurrence {
    /// The n-th instance, counting from 1
    Nth(u8),
    /// The last instance of the month
    Last,
}

impl Occurrence {
    pub const FIRST: Occurrence = Occurrence::Nth(1);
    pub const SECOND: Occurrence = Occurrence::Nth(2);
    pub const THIRD: Occurrence = Occurrence::Nth(3);
    pub const FOURTH: Occurrence = Occurrence::Nth(4);
}

/// Return the last day number of the given month
pub fn last_day_of_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

/// Maximum number of days a month can have in any year (February counts 29)
pub fn max_days_in_month(month: u32) -> Option<u32> {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => Some(31),
        4 | 6 | 9 | 11 => Some(30),
        2 => Some(29),
        _ => None,
    }
}

/// The date `year-month-day`; fails if the day doesn't exist in this particular year
pub fn fixed_date(year: i32, month: u32, day: u32) -> Result<NaiveDate, HolidayError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        HolidayError::InvalidRule(format!("{}-{:02}-{:02} is not a valid date", year, month, day))
    })
}

/// The `occurrence`-th `weekday` in `month` of `year`
pub fn nth_weekday(
    year: i32,
    month: u32,
    weekday: Weekday,
    occurrence: Occurrence,
) -> Result<NaiveDate, HolidayError> {
    match occurrence {
        Occurrence::Last => last_weekday(year, month, weekday),
        Occurrence::Nth(n) => {
            let date = if n == 0 {
                None
            } else {
                NaiveDate::from_weekday_of_month_opt(year, month, weekday, n)
            };
            date.ok_or_else(|| {
                HolidayError::InvalidRule(format!(
                    "there is no {}. {} in {}-{:02}",
                    n, weekday, year, month
                ))
            })
        }
    }
}

/// The last `weekday` in `month` of `year`
pub fn last_weekday(year: i32, month: u32, weekday: Weekday) -> Result<NaiveDate, HolidayError> {
    let last = fixed_date(year, month, last_day_of_month(year, month))?;
    let back = (7 + last.weekday().num_days_from_monday() - weekday.num_days_from_monday()) % 7;
    offset_from_anchor(last, -(back as i64))
}

/// `anchor + delta` days, `delta` may be negative
pub fn offset_from_anchor(anchor: NaiveDate, delta: i64) -> Result<NaiveDate, HolidayError> {
    if delta.unsigned_abs() > MAX_OFFSET_DAYS as u64 {
        return Err(HolidayError::InvalidRule(format!(
            "offset of {} days is out of range",
            delta
        )));
    }
    anchor
        .checked_add_signed(Duration::days(delta))
        .ok_or_else(|| HolidayError::InvalidRule(format!("{} + {} days overflows", anchor, delta)))
}

/// Offset from another rule's date of the same year. A failed reference is passed on.
pub fn offset_from_resolved(
    other: Result<NaiveDate, HolidayError>,
    delta: i64,
) -> Result<NaiveDate, HolidayError> {
    offset_from_anchor(other?, delta)
}

/// Saturday or Sunday
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn third_monday_of_january() {
        assert_eq!(
            nth_weekday(2013, 1, Weekday::Mon, Occurrence::THIRD),
            Ok(ymd(2013, 1, 21))
        );
        assert_eq!(
            nth_weekday(2014, 1, Weekday::Mon, Occurrence::THIRD),
            Ok(ymd(2014, 1, 20))
        );
    }

    #[test]
    fn fourth_thursday_and_fifth_weekday() {
        assert_eq!(
            nth_weekday(2015, 11, Weekday::Thu, Occurrence::FOURTH),
            Ok(ymd(2015, 11, 26))
        );
        assert_eq!(
            nth_weekday(2015, 6, Weekday::Mon, Occurrence::Nth(5)),
            Ok(ymd(2015, 6, 29))
        );
        assert_eq!(
            nth_weekday(2024, 2, Weekday::Thu, Occurrence::Nth(5)),
            Ok(ymd(2024, 2, 29))
        );
        assert!(matches!(
            nth_weekday(2023, 2, Weekday::Thu, Occurrence::Nth(5)),
            Err(HolidayError::InvalidRule(_))
        ));
    }

    #[test]
    fn non_existing_occurrences() {
        assert!(nth_weekday(2015, 6, Weekday::Mon, Occurrence::Nth(6)).is_err());
        assert!(nth_weekday(2015, 6, Weekday::Mon, Occurrence::Nth(0)).is_err());
    }

    #[test]
    fn last_weekday_of_month() {
        assert_eq!(
            nth_weekday(2013, 5, Weekday::Mon, Occurrence::Last),
            Ok(ymd(2013, 5, 27))
        );
        assert_eq!(last_weekday(2014, 5, Weekday::Mon), Ok(ymd(2014, 5, 26)));
        // month ends on the requested weekday
        assert_eq!(last_weekday(2015, 8, Weekday::Mon), Ok(ymd(2015, 8, 31)));
        assert_eq!(last_weekday(2014, 12, Weekday::Wed), Ok(ymd(2014, 12, 31)));
    }

    #[test]
    fn fixed_dates() {
        assert_eq!(fixed_date(2016, 2, 29), Ok(ymd(2016, 2, 29)));
        assert!(matches!(
            fixed_date(2015, 2, 29),
            Err(HolidayError::InvalidRule(_))
        ));
        assert_eq!(last_day_of_month(2015, 2), 28);
        assert_eq!(last_day_of_month(2016, 2), 29);
        assert_eq!(last_day_of_month(2016, 12), 31);
        assert_eq!(max_days_in_month(2), Some(29));
        assert_eq!(max_days_in_month(13), None);
    }

    #[test]
    fn offsets() {
        assert_eq!(
            offset_from_anchor(ymd(2014, 4, 20), -2),
            Ok(ymd(2014, 4, 18))
        );
        assert_eq!(
            offset_from_anchor(ymd(2014, 12, 31), 1),
            Ok(ymd(2015, 1, 1))
        );
        assert_eq!(
            offset_from_resolved(Ok(ymd(2014, 11, 27)), 1),
            Ok(ymd(2014, 11, 28))
        );
        let failed = Err(HolidayError::InvalidRule("missing".to_string()));
        assert_eq!(offset_from_resolved(failed.clone(), 1), failed);
        assert!(offset_from_anchor(ymd(2014, 1, 1), MAX_OFFSET_DAYS + 1).is_err());
        assert!(matches!(
            offset_from_anchor(ymd(2014, 1, 1), i64::MIN),
            Err(HolidayError::InvalidRule(_))
        ));
        assert!(offset_from_anchor(ymd(2014, 1, 1), i64::MAX).is_err());
    }
}
