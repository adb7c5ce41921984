//! Holiday rules of the United States: the federal calendar and a selection
//! of states derived from it.

use chrono::Weekday;

use crate::calendar::{Calendars, CalendarsBuilder};
use crate::date_rules::Occurrence;
use crate::error::HolidayError;
use crate::jurisdiction::Jurisdiction;
use crate::rule::{HolidayRule, RuleKind, YearGate};
use crate::shift::ShiftPolicy;

pub const FEDERAL: &str = "US";

fn rule(key: &str, label: &str, kind: RuleKind) -> Result<HolidayRule, HolidayError> {
    HolidayRule::new(key, label, kind)
}

fn thanksgiving_friday() -> Result<HolidayRule, HolidayError> {
    rule(
        "thanksgiving_friday",
        "Thanksgiving Friday",
        RuleKind::derived(1, "thanksgiving_day"),
    )
}

fn christmas_eve(shift: ShiftPolicy) -> Result<HolidayRule, HolidayError> {
    Ok(rule("christmas_eve", "Christmas Eve", RuleKind::fixed(12, 24))?.with_shift(shift))
}

/// Day after Christmas, not moved when it falls on a weekend
fn boxing_day(label: &str) -> Result<HolidayRule, HolidayError> {
    Ok(rule("boxing_day", label, RuleKind::fixed(12, 26))?.with_shift(ShiftPolicy::none()))
}

/// Federal holidays, using the standard weekend observance (Sat -> Fri, Sun -> Mon)
pub fn federal() -> Result<Jurisdiction, HolidayError> {
    Ok(Jurisdiction::new(FEDERAL)
        .with_default_shift(ShiftPolicy::weekend())
        .add(rule("new_years_day", "New year", RuleKind::fixed(1, 1))?)
        .add(rule(
            "martin_luther_king_day",
            "Birthday of Martin Luther King, Jr.",
            RuleKind::nth_weekday(1, Weekday::Mon, Occurrence::THIRD),
        )?)
        .add(rule(
            "washingtons_birthday",
            "Washington's Birthday",
            RuleKind::nth_weekday(2, Weekday::Mon, Occurrence::THIRD),
        )?)
        .add(rule(
            "memorial_day",
            "Memorial Day",
            RuleKind::last_weekday(5, Weekday::Mon),
        )?)
        .add(rule(
            "independence_day",
            "Independence Day",
            RuleKind::fixed(7, 4),
        )?)
        .add(rule(
            "labor_day",
            "Labor Day",
            RuleKind::nth_weekday(9, Weekday::Mon, Occurrence::FIRST),
        )?)
        .add(rule(
            "columbus_day",
            "Columbus Day",
            RuleKind::nth_weekday(10, Weekday::Mon, Occurrence::SECOND),
        )?)
        .add(rule("veterans_day", "Veterans Day", RuleKind::fixed(11, 11))?)
        .add(rule(
            "thanksgiving_day",
            "Thanksgiving Day",
            RuleKind::nth_weekday(11, Weekday::Thu, Occurrence::FOURTH),
        )?)
        .add(rule("christmas_day", "Christmas Day", RuleKind::fixed(12, 25))?)
        // the year after each presidential election; on a Sunday it moves to Monday
        .add(
            rule(
                "inauguration_day",
                "Inauguration Day",
                RuleKind::conditional(RuleKind::fixed(1, 20), YearGate::quadrennial(1)),
            )?
            .with_shift(ShiftPolicy::sunday_only()),
        ))
}

pub fn alabama() -> Result<Jurisdiction, HolidayError> {
    Ok(Jurisdiction::derived_from("US-AL", FEDERAL)
        .relabel(
            "martin_luther_king_day",
            "Robert E. Lee/Martin Luther King Birthday",
        )
        .relabel(
            "washingtons_birthday",
            "George Washington/Thomas Jefferson Birthday",
        )
        .relabel(
            "columbus_day",
            "Columbus Day / Fraternal Day / American Indian Heritage Day",
        )
        .add(rule(
            "confederate_memorial_day",
            "Confederate Memorial Day",
            RuleKind::nth_weekday(4, Weekday::Mon, Occurrence::FOURTH),
        )?)
        .add(rule(
            "jefferson_davis_birthday",
            "Jefferson Davis Birthday",
            RuleKind::nth_weekday(6, Weekday::Mon, Occurrence::FIRST),
        )?))
}

pub fn alaska() -> Result<Jurisdiction, HolidayError> {
    Ok(Jurisdiction::derived_from("US-AK", FEDERAL)
        .remove("columbus_day")
        .add(rule(
            "sewards_day",
            "Seward's Day",
            RuleKind::last_weekday(3, Weekday::Mon),
        )?)
        // observed on its date and, on a weekend, also on the nearest weekday
        .add(
            rule("alaska_day", "Alaska Day", RuleKind::fixed(10, 18))?
                .with_shift(ShiftPolicy::weekend_augment()),
        ))
}

pub fn arkansas() -> Result<Jurisdiction, HolidayError> {
    Ok(Jurisdiction::derived_from("US-AR", FEDERAL)
        .remove("columbus_day")
        .relabel(
            "washingtons_birthday",
            "George Washington's Birthday and Daisy Gatson Bates Day",
        )
        .add(christmas_eve(ShiftPolicy::weekend_augment())?))
}

pub fn california() -> Result<Jurisdiction, HolidayError> {
    Ok(Jurisdiction::derived_from("US-CA", FEDERAL)
        .add(rule(
            "cesar_chavez_day",
            "Cesar Chavez Day",
            RuleKind::fixed(3, 31),
        )?)
        .add(thanksgiving_friday()?))
}

pub fn kansas() -> Result<Jurisdiction, HolidayError> {
    Ok(Jurisdiction::derived_from("US-KS", FEDERAL)
        .add(thanksgiving_friday()?)
        .add(christmas_eve(ShiftPolicy::none())?)
        .add(boxing_day("Day after Christmas")?))
}

pub fn louisiana() -> Result<Jurisdiction, HolidayError> {
    Ok(Jurisdiction::derived_from("US-LA", FEDERAL)
        .add(rule("mardi_gras", "Mardi Gras", RuleKind::easter_offset(-47))?)
        .add(rule("good_friday", "Good Friday", RuleKind::easter_offset(-2))?))
}

pub fn massachusetts() -> Result<Jurisdiction, HolidayError> {
    Ok(Jurisdiction::derived_from("US-MA", FEDERAL).add(rule(
        "patriots_day",
        "Patriots' Day",
        RuleKind::nth_weekday(4, Weekday::Mon, Occurrence::THIRD),
    )?))
}

/// State holidays of Texas are observed on their date, weekend or not
pub fn texas() -> Result<Jurisdiction, HolidayError> {
    let state_holidays = vec![
        ("confederate_heroes_day", "Confederate Heroes Day", RuleKind::fixed(1, 19)),
        ("texas_independence_day", "Texas Independence Day", RuleKind::fixed(3, 2)),
        ("cesar_chavez_day", "Cesar Chavez Day", RuleKind::fixed(3, 31)),
        ("good_friday", "Good Friday", RuleKind::easter_offset(-2)),
        ("san_jacinto_day", "San Jacinto Day", RuleKind::fixed(4, 21)),
        ("emancipation_day", "Emancipation Day In Texas", RuleKind::fixed(6, 19)),
        ("lyndon_johnson_day", "Lyndon B. Johnson Day", RuleKind::fixed(8, 27)),
    ];
    let mut texas = Jurisdiction::derived_from("US-TX", FEDERAL);
    for (key, label, kind) in state_holidays {
        texas = texas.add(rule(key, label, kind)?.with_shift(ShiftPolicy::none()));
    }
    Ok(texas)
}

pub fn virginia() -> Result<Jurisdiction, HolidayError> {
    Ok(Jurisdiction::derived_from("US-VA", FEDERAL)
        .add(rule(
            "lee_jackson_day",
            "Lee-Jackson Day",
            RuleKind::derived(-3, "martin_luther_king_day"),
        )?)
        .add(rule(
            "thanksgiving_wednesday",
            "Day before Thanksgiving",
            RuleKind::derived(-1, "thanksgiving_day"),
        )?)
        .add(thanksgiving_friday()?)
        .add(christmas_eve(ShiftPolicy::weekend())?)
        .add(boxing_day("Day after Christmas")?))
}

/// All bundled US jurisdictions, federal first
pub fn jurisdictions() -> Result<Vec<Jurisdiction>, HolidayError> {
    Ok(vec![
        federal()?,
        alabama()?,
        alaska()?,
        arkansas()?,
        california()?,
        kansas()?,
        louisiana()?,
        massachusetts()?,
        texas()?,
        virginia()?,
    ])
}

pub fn register(builder: &mut CalendarsBuilder) -> Result<(), HolidayError> {
    for jurisdiction in jurisdictions()? {
        builder.register(jurisdiction)?;
    }
    Ok(())
}

/// Composed calendars of all bundled US jurisdictions
pub fn calendars() -> Result<Calendars, HolidayError> {
    let mut builder = CalendarsBuilder::new();
    register(&mut builder)?;
    Ok(builder.build())
}
