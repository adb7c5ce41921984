//! Weekend observance rules: how a holiday falling on a weekend
//! is mapped to the date(s) on which it is actually observed.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::date_rules::is_weekend;

/// Which weekend days move, and where to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftKind {
    /// The nominal date is observed, even on a weekend
    #[serde(rename = "none")]
    NoShift,
    /// Saturday moves to the preceding Friday, Sunday to the following Monday
    #[serde(rename = "weekend")]
    StandardWeekendShift,
    /// Saturday is left alone, Sunday moves to the following Monday
    #[serde(rename = "sunday_only")]
    SundayOnlyShift,
    /// Saturday and Sunday both move to the following Monday
    #[serde(rename = "next_monday")]
    NextMonday,
}

/// Whether the shifted date replaces the nominal one or comes in addition to it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftMode {
    #[serde(rename = "replace")]
    Replace,
    #[serde(rename = "augment")]
    Augment,
}

impl Default for ShiftMode {
    fn default() -> ShiftMode {
        ShiftMode::Replace
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftPolicy {
    pub kind: ShiftKind,
    #[serde(default)]
    pub mode: ShiftMode,
    /// Keep moving a shifted date in the same direction while it lands on
    /// another holiday or a weekend
    #[serde(default)]
    pub avoid_collisions: bool,
}

/// A date on which a holiday is observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservedDate {
    pub date: NaiveDate,
    /// `true` if this date is the result of a weekend shift
    pub shifted: bool,
}

impl ObservedDate {
    fn nominal(date: NaiveDate) -> Self {
        ObservedDate {
            date,
            shifted: false,
        }
    }

    fn shifted(date: NaiveDate) -> Self {
        ObservedDate {
            date,
            shifted: true,
        }
    }
}

/// Federal style observance: Sat -> Fri, Sun -> Mon, nominal date is replaced
impl Default for ShiftPolicy {
    fn default() -> ShiftPolicy {
        ShiftPolicy::weekend()
    }
}

impl ShiftPolicy {
    pub fn new(kind: ShiftKind, mode: ShiftMode) -> Self {
        ShiftPolicy {
            kind,
            mode,
            avoid_collisions: false,
        }
    }

    pub fn none() -> Self {
        Self::new(ShiftKind::NoShift, ShiftMode::Replace)
    }

    pub fn weekend() -> Self {
        Self::new(ShiftKind::StandardWeekendShift, ShiftMode::Replace)
    }

    /// Observe both the nominal date and its weekend substitute
    pub fn weekend_augment() -> Self {
        Self::new(ShiftKind::StandardWeekendShift, ShiftMode::Augment)
    }

    pub fn sunday_only() -> Self {
        Self::new(ShiftKind::SundayOnlyShift, ShiftMode::Replace)
    }

    pub fn next_monday() -> Self {
        Self::new(ShiftKind::NextMonday, ShiftMode::Replace)
    }

    pub fn avoiding_collisions(mut self) -> Self {
        self.avoid_collisions = true;
        self
    }

    /// Weekend substitute of `nominal`, or `None` if the policy keeps the date
    pub fn shift_target(&self, nominal: NaiveDate) -> Option<NaiveDate> {
        let days = match (self.kind, nominal.weekday()) {
            (ShiftKind::NoShift, _) => return None,
            (ShiftKind::StandardWeekendShift, Weekday::Sat) => -1,
            (ShiftKind::StandardWeekendShift, Weekday::Sun) => 1,
            (ShiftKind::SundayOnlyShift, Weekday::Sun) => 1,
            (ShiftKind::NextMonday, Weekday::Sat) => 2,
            (ShiftKind::NextMonday, Weekday::Sun) => 1,
            _ => return None,
        };
        nominal.checked_add_signed(Duration::days(days))
    }

    /// Observed dates of a holiday with the given nominal date.
    /// The result depends on nothing but the date, its weekday and the policy.
    pub fn apply(&self, nominal: NaiveDate) -> Vec<ObservedDate> {
        self.apply_avoiding(nominal, |_| false)
    }

    /// Like `apply`, but with `avoid_collisions` set a shifted date for which
    /// `is_taken` holds keeps moving in the shift direction, skipping weekends.
    pub fn apply_avoiding<F>(&self, nominal: NaiveDate, is_taken: F) -> Vec<ObservedDate>
    where
        F: Fn(NaiveDate) -> bool,
    {
        let target = match self.shift_target(nominal) {
            Some(target) => target,
            None => return vec![ObservedDate::nominal(nominal)],
        };
        let target = if self.avoid_collisions {
            Self::next_free(nominal, target, is_taken)
        } else {
            target
        };
        match self.mode {
            ShiftMode::Replace => vec![ObservedDate::shifted(target)],
            ShiftMode::Augment => vec![ObservedDate::nominal(nominal), ObservedDate::shifted(target)],
        }
    }

    fn next_free<F>(nominal: NaiveDate, mut target: NaiveDate, is_taken: F) -> NaiveDate
    where
        F: Fn(NaiveDate) -> bool,
    {
        let step = if target < nominal {
            Duration::days(-1)
        } else {
            Duration::days(1)
        };
        // a year has far fewer holidays than this
        for _ in 0..366 {
            if !is_taken(target) && !is_weekend(target) {
                break;
            }
            match target.checked_add_signed(step) {
                Some(next) => target = next,
                None => break,
            }
        }
        target
    }
}
