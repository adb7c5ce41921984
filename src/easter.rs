//! Anchor date of the moveable feasts. All moveable holidays
//! (Good Friday, Easter Monday, Mardi Gras, ...) are expressed as day offsets
//! from Easter Sunday of the Western (Gregorian) church.

use chrono::NaiveDate;
extern crate computus;

use crate::error::HolidayError;

/// First year the Gregorian computus is defined for
pub const FIRST_GREGORIAN_YEAR: i32 = 1583;

/// Easter Sunday of the given year
pub fn anchor(year: i32) -> Result<NaiveDate, HolidayError> {
    if year < FIRST_GREGORIAN_YEAR {
        return Err(HolidayError::YearOutOfRange(year));
    }
    let easter = computus::gregorian(year).map_err(|_| HolidayError::YearOutOfRange(year))?;
    NaiveDate::from_ymd_opt(easter.year, easter.month, easter.day)
        .ok_or(HolidayError::YearOutOfRange(year))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_easter_dates() {
        let expected = [
            (1583, 4, 10),
            (1818, 3, 22),
            (2000, 4, 23),
            (2008, 3, 23),
            (2014, 4, 20),
            (2015, 4, 5),
            (2016, 3, 27),
            (2019, 4, 21),
            (2038, 4, 25),
            (2285, 3, 22),
        ];
        for (year, month, day) in expected.iter() {
            assert_eq!(
                anchor(*year),
                Ok(NaiveDate::from_ymd_opt(*year, *month, *day).unwrap())
            );
        }
    }

    #[test]
    fn before_gregorian_reform() {
        assert_eq!(anchor(1582), Err(HolidayError::YearOutOfRange(1582)));
        assert_eq!(anchor(1000), Err(HolidayError::YearOutOfRange(1000)));
    }
}
