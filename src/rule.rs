//! Holiday rules: a stable key, a label and a computable description of the
//! holiday's nominal date in any given year.

use std::convert::TryFrom;
use std::fmt;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::date_rules::{self, max_days_in_month, Occurrence, MAX_OFFSET_DAYS};
use crate::error::HolidayError;
use crate::shift::ShiftPolicy;

/// Restricts a rule to certain years
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YearGate {
    /// Years with `year mod period == remainder`
    Cycle { period: u32, remainder: u32 },
    /// From the given year onwards
    Since(i32),
    /// Up to and including the given year
    Until(i32),
    /// `first` and `last` are the first and last year the rule applies
    Between { first: i32, last: i32 },
    /// Explicit list of years
    Years(Vec<i32>),
}

impl YearGate {
    /// Every fourth year, e.g. `quadrennial(1)` for US presidential inaugurations
    pub fn quadrennial(remainder: u32) -> Self {
        YearGate::Cycle {
            period: 4,
            remainder,
        }
    }

    pub fn accepts(&self, year: i32) -> bool {
        match self {
            YearGate::Cycle { period, remainder } => {
                *period > 0 && i64::from(year).rem_euclid(i64::from(*period)) == i64::from(*remainder)
            }
            YearGate::Since(first) => year >= *first,
            YearGate::Until(last) => year <= *last,
            YearGate::Between { first, last } => year >= *first && year <= *last,
            YearGate::Years(years) => years.contains(&year),
        }
    }

    fn validate(&self) -> Result<(), HolidayError> {
        match self {
            YearGate::Cycle { period, remainder } if *period == 0 || remainder >= period => {
                Err(HolidayError::InvalidRule(format!(
                    "cycle remainder {} must be below period {}",
                    remainder, period
                )))
            }
            YearGate::Between { first, last } if first > last => Err(HolidayError::InvalidRule(
                format!("year range {}..{} is empty", first, last),
            )),
            _ => Ok(()),
        }
    }
}

/// How the nominal date of a holiday is computed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Same day every year
    FixedDate { month: u32, day: u32 },
    /// E.g. the 3rd Monday of January, or the last Monday of May
    NthWeekday {
        month: u32,
        weekday: Weekday,
        occurrence: Occurrence,
    },
    /// Days relative to Easter Sunday
    MoveableOffset { days: i64 },
    /// Days relative to the nominal date of another rule of the same jurisdiction
    DerivedOffset { days: i64, key: String },
    /// Applies only in years accepted by the gate
    Conditional { base: Box<RuleKind>, gate: YearGate },
}

impl RuleKind {
    pub fn fixed(month: u32, day: u32) -> Self {
        RuleKind::FixedDate { month, day }
    }

    pub fn nth_weekday(month: u32, weekday: Weekday, occurrence: Occurrence) -> Self {
        RuleKind::NthWeekday {
            month,
            weekday,
            occurrence,
        }
    }

    pub fn last_weekday(month: u32, weekday: Weekday) -> Self {
        Self::nth_weekday(month, weekday, Occurrence::Last)
    }

    pub fn easter_offset(days: i64) -> Self {
        RuleKind::MoveableOffset { days }
    }

    pub fn derived(days: i64, key: &str) -> Self {
        RuleKind::DerivedOffset {
            days,
            key: key.to_string(),
        }
    }

    pub fn conditional(base: RuleKind, gate: YearGate) -> Self {
        RuleKind::Conditional {
            base: Box::new(base),
            gate,
        }
    }

    /// Key of the rule this kind is derived from, if any
    pub fn reference(&self) -> Option<&str> {
        match self {
            RuleKind::DerivedOffset { key, .. } => Some(key),
            RuleKind::Conditional { base, .. } => base.reference(),
            _ => None,
        }
    }

    /// Whether the kind depends on the Easter anchor
    pub fn is_moveable(&self) -> bool {
        match self {
            RuleKind::MoveableOffset { .. } => true,
            RuleKind::Conditional { base, .. } => base.is_moveable(),
            _ => false,
        }
    }

    /// Reject kinds that can never produce a date
    pub fn validate(&self) -> Result<(), HolidayError> {
        match self {
            RuleKind::FixedDate { month, day } => match max_days_in_month(*month) {
                Some(max) if *day >= 1 && *day <= max => Ok(()),
                Some(_) => Err(HolidayError::InvalidRule(format!(
                    "day {} does not exist in month {}",
                    day, month
                ))),
                None => Err(invalid_month(*month)),
            },
            RuleKind::NthWeekday {
                month, occurrence, ..
            } => {
                if max_days_in_month(*month).is_none() {
                    return Err(invalid_month(*month));
                }
                match occurrence {
                    Occurrence::Nth(n) if *n == 0 || *n > 5 => Err(HolidayError::InvalidRule(
                        format!("a month has no weekday occurrence number {}", n),
                    )),
                    _ => Ok(()),
                }
            }
            RuleKind::MoveableOffset { days } => check_offset(*days),
            RuleKind::DerivedOffset { days, key } => {
                if key.is_empty() {
                    return Err(HolidayError::InvalidRule(
                        "derived rule without reference key".to_string(),
                    ));
                }
                check_offset(*days)
            }
            RuleKind::Conditional { base, gate } => {
                gate.validate()?;
                base.validate()
            }
        }
    }

    /// Nominal date in `year` for kinds that stand on their own.
    /// `easter` is the anchor of the year and `derived` looks up the
    /// nominal date of another rule of the same year.
    pub fn evaluate<F>(
        &self,
        year: i32,
        easter: &Result<NaiveDate, HolidayError>,
        derived: &F,
    ) -> Result<Option<NaiveDate>, HolidayError>
    where
        F: Fn(&str) -> Result<NaiveDate, HolidayError>,
    {
        let date = match self {
            RuleKind::FixedDate { month, day } => date_rules::fixed_date(year, *month, *day)?,
            RuleKind::NthWeekday {
                month,
                weekday,
                occurrence,
            } => date_rules::nth_weekday(year, *month, *weekday, *occurrence)?,
            RuleKind::MoveableOffset { days } => {
                date_rules::offset_from_anchor(easter.clone()?, *days)?
            }
            RuleKind::DerivedOffset { days, key } => {
                date_rules::offset_from_resolved(derived(key), *days)?
            }
            RuleKind::Conditional { base, gate } => {
                if !gate.accepts(year) {
                    return Ok(None);
                }
                return base.evaluate(year, easter, derived);
            }
        };
        Ok(Some(date))
    }
}

fn invalid_month(month: u32) -> HolidayError {
    HolidayError::InvalidRule(format!("invalid month {}", month))
}

fn check_offset(days: i64) -> Result<(), HolidayError> {
    if days.unsigned_abs() > MAX_OFFSET_DAYS as u64 {
        Err(HolidayError::InvalidRule(format!(
            "offset of {} days is out of range",
            days
        )))
    } else {
        Ok(())
    }
}

/// One holiday of a jurisdiction. The kind is fixed at construction;
/// use `relabeled` or `with_shift` to derive modified copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RuleConfig")]
pub struct HolidayRule {
    key: String,
    label: String,
    kind: RuleKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    shift: Option<ShiftPolicy>,
}

/// Unchecked rule as read from a configuration file
#[derive(Deserialize)]
struct RuleConfig {
    key: String,
    label: String,
    kind: RuleKind,
    #[serde(default)]
    shift: Option<ShiftPolicy>,
}

impl TryFrom<RuleConfig> for HolidayRule {
    type Error = HolidayError;

    fn try_from(config: RuleConfig) -> Result<Self, Self::Error> {
        let rule = HolidayRule::new(&config.key, &config.label, config.kind)?;
        Ok(match config.shift {
            Some(shift) => rule.with_shift(shift),
            None => rule,
        })
    }
}

impl HolidayRule {
    pub fn new(key: &str, label: &str, kind: RuleKind) -> Result<Self, HolidayError> {
        if key.is_empty() {
            return Err(HolidayError::InvalidRule(
                "holiday rule without key".to_string(),
            ));
        }
        kind.validate().map_err(|err| match err {
            HolidayError::InvalidRule(msg) => {
                HolidayError::InvalidRule(format!("rule '{}': {}", key, msg))
            }
            other => other,
        })?;
        Ok(HolidayRule {
            key: key.to_string(),
            label: label.to_string(),
            kind,
            shift: None,
        })
    }

    /// Use a specific shift policy instead of the jurisdiction's default
    pub fn with_shift(mut self, shift: ShiftPolicy) -> Self {
        self.shift = Some(shift);
        self
    }

    pub fn relabeled(&self, label: &str) -> Self {
        HolidayRule {
            label: label.to_string(),
            ..self.clone()
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> &RuleKind {
        &self.kind
    }

    pub fn shift(&self) -> Option<&ShiftPolicy> {
        self.shift.as_ref()
    }
}

impl fmt::Display for HolidayRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn no_reference(key: &str) -> Result<NaiveDate, HolidayError> {
        Err(HolidayError::UnknownKey(key.to_string()))
    }

    #[test]
    fn structurally_invalid_rules() {
        assert!(matches!(
            HolidayRule::new("feb31", "Nonsense", RuleKind::fixed(2, 31)),
            Err(HolidayError::InvalidRule(_))
        ));
        assert!(HolidayRule::new("leap", "Leap Day", RuleKind::fixed(2, 29)).is_ok());
        assert!(HolidayRule::new("m13", "Nope", RuleKind::fixed(13, 1)).is_err());
        assert!(HolidayRule::new("d0", "Nope", RuleKind::fixed(1, 0)).is_err());
        assert!(HolidayRule::new(
            "sixth",
            "Sixth Monday",
            RuleKind::nth_weekday(1, Weekday::Mon, Occurrence::Nth(6))
        )
        .is_err());
        assert!(HolidayRule::new("", "No key", RuleKind::fixed(1, 1)).is_err());
        assert!(HolidayRule::new("far", "Far", RuleKind::easter_offset(100_000)).is_err());
        assert!(HolidayRule::new(
            "gate",
            "Bad gate",
            RuleKind::conditional(RuleKind::fixed(1, 20), YearGate::quadrennial(4))
        )
        .is_err());
        assert!(HolidayRule::new(
            "nested",
            "Bad base",
            RuleKind::conditional(RuleKind::fixed(4, 31), YearGate::Since(2000))
        )
        .is_err());
    }

    #[test]
    fn extreme_offsets_are_rejected() {
        for days in &[i64::MIN, i64::MAX, -MAX_OFFSET_DAYS - 1] {
            assert!(matches!(
                HolidayRule::new("far", "Far", RuleKind::easter_offset(*days)),
                Err(HolidayError::InvalidRule(_))
            ));
            assert!(matches!(
                HolidayRule::new("far", "Far", RuleKind::derived(*days, "other")),
                Err(HolidayError::InvalidRule(_))
            ));
        }
        assert!(HolidayRule::new("far", "Far", RuleKind::easter_offset(-MAX_OFFSET_DAYS)).is_ok());

        let from_json = serde_json::from_str::<HolidayRule>(
            r#"{"key": "x", "label": "X", "kind": {"moveable_offset": {"days": -9223372036854775808}}}"#,
        );
        assert!(from_json.is_err());
    }

    #[test]
    fn evaluate_kinds() {
        let easter = Ok(ymd(2014, 4, 20));
        assert_eq!(
            RuleKind::fixed(12, 25).evaluate(2014, &easter, &no_reference),
            Ok(Some(ymd(2014, 12, 25)))
        );
        assert_eq!(
            RuleKind::easter_offset(-2).evaluate(2014, &easter, &no_reference),
            Ok(Some(ymd(2014, 4, 18)))
        );
        assert_eq!(
            RuleKind::easter_offset(-47).evaluate(2014, &easter, &no_reference),
            Ok(Some(ymd(2014, 3, 4)))
        );
        let thanksgiving = |key: &str| {
            if key == "thanksgiving" {
                Ok(ymd(2014, 11, 27))
            } else {
                no_reference(key)
            }
        };
        assert_eq!(
            RuleKind::derived(1, "thanksgiving").evaluate(2014, &easter, &thanksgiving),
            Ok(Some(ymd(2014, 11, 28)))
        );
        assert!(RuleKind::derived(1, "other")
            .evaluate(2014, &easter, &thanksgiving)
            .is_err());
    }

    #[test]
    fn moveable_kind_without_anchor() {
        let easter = Err(HolidayError::YearOutOfRange(1500));
        assert_eq!(
            RuleKind::easter_offset(1).evaluate(1500, &easter, &no_reference),
            Err(HolidayError::YearOutOfRange(1500))
        );
        assert!(RuleKind::conditional(RuleKind::easter_offset(1), YearGate::Since(1))
            .is_moveable());
    }

    #[test]
    fn conditional_gate() {
        let inauguration = RuleKind::conditional(RuleKind::fixed(1, 20), YearGate::quadrennial(1));
        let easter = Ok(ymd(2009, 4, 12));
        assert_eq!(inauguration.evaluate(2008, &easter, &no_reference), Ok(None));
        assert_eq!(
            inauguration.evaluate(2009, &easter, &no_reference),
            Ok(Some(ymd(2009, 1, 20)))
        );
        assert!(YearGate::Cycle { period: 4, remainder: 1 }.accepts(-3));
        assert!(YearGate::Between { first: 2000, last: 2010 }.accepts(2010));
        assert!(!YearGate::Until(1999).accepts(2000));
        assert!(YearGate::Years(vec![2002, 2012]).accepts(2012));
        let long_cycle = YearGate::Cycle {
            period: u32::MAX,
            remainder: 2021,
        };
        assert!(long_cycle.accepts(2021));
        assert!(!long_cycle.accepts(2020));
        assert!(!long_cycle.accepts(-1));
    }

    #[test]
    fn relabel_keeps_kind() {
        let rule = HolidayRule::new(
            "martin_luther_king_day",
            "Birthday of Martin Luther King, Jr.",
            RuleKind::nth_weekday(1, Weekday::Mon, Occurrence::THIRD),
        )
        .unwrap()
        .with_shift(ShiftPolicy::none());
        let renamed = rule.relabeled("Robert E. Lee/Martin Luther King Birthday");
        assert_eq!(renamed.key(), rule.key());
        assert_eq!(renamed.kind(), rule.kind());
        assert_eq!(renamed.shift(), Some(&ShiftPolicy::none()));
        assert_eq!(renamed.label(), "Robert E. Lee/Martin Luther King Birthday");
    }

    #[test]
    fn rules_from_json() {
        let rule: HolidayRule = serde_json::from_str(
            r#"{"key": "inauguration_day", "label": "Inauguration Day",
                "kind": {"conditional": {"base": {"fixed_date": {"month": 1, "day": 20}},
                                         "gate": {"cycle": {"period": 4, "remainder": 1}}}},
                "shift": {"kind": "sunday_only"}}"#,
        )
        .unwrap();
        assert_eq!(rule.shift(), Some(&ShiftPolicy::sunday_only()));
        assert_eq!(
            rule.kind(),
            &RuleKind::conditional(RuleKind::fixed(1, 20), YearGate::quadrennial(1))
        );

        let rule: HolidayRule = serde_json::from_str(
            r#"{"key": "memorial_day", "label": "Memorial Day",
                "kind": {"nth_weekday": {"month": 5, "weekday": "Mon", "occurrence": "last"}}}"#,
        )
        .unwrap();
        assert_eq!(rule.kind(), &RuleKind::last_weekday(5, Weekday::Mon));
        assert_eq!(rule.shift(), None);

        let invalid = serde_json::from_str::<HolidayRule>(
            r#"{"key": "x", "label": "X", "kind": {"fixed_date": {"month": 2, "day": 30}}}"#,
        );
        assert!(invalid.is_err());
    }
}
