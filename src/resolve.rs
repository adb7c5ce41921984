//! Evaluation of a composed rule set for one year.
//!
//! Rules are evaluated in registration order. A rule that has no date in the
//! requested year (gated out, 5th weekday that doesn't exist, Feb 29th in a
//! common year, moveable feast before 1583) simply contributes nothing.
//! The nominal dates then pass through the rule's shift policy, and the
//! observed dates are merged into a map keyed by date in which later rules
//! overwrite the labels of earlier ones.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{Datelike, NaiveDate};
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::easter;
use crate::error::HolidayError;
use crate::registry::RuleRegistry;
use crate::rule::HolidayRule;
use crate::shift::{ShiftMode, ShiftPolicy};

/// A holiday on its observed date
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResolvedHoliday {
    pub date: NaiveDate,
    pub label: String,
}

impl fmt::Display for ResolvedHoliday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.label)
    }
}

/// One observed date produced by one rule, before collisions are merged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedHoliday {
    pub key: String,
    pub label: String,
    pub nominal: NaiveDate,
    pub date: NaiveDate,
    pub shifted: bool,
}

/// The holidays of one jurisdiction and year, keyed by observed date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidaySet {
    year: i32,
    holidays: BTreeMap<NaiveDate, String>,
}

impl HolidaySet {
    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.holidays.contains_key(date)
    }

    pub fn label(&self, date: &NaiveDate) -> Option<&str> {
        self.holidays.get(date).map(|label| label.as_str())
    }

    /// Holidays in date order
    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &str)> {
        self.holidays.iter().map(|(date, label)| (date, label.as_str()))
    }

    pub fn dates(&self) -> impl Iterator<Item = &NaiveDate> {
        self.holidays.keys()
    }

    pub fn to_vec(&self) -> Vec<ResolvedHoliday> {
        self.iter()
            .map(|(date, label)| ResolvedHoliday {
                date: *date,
                label: label.to_string(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.holidays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holidays.is_empty()
    }

    /// Merge observations in order; a later observation on a known date replaces the label
    pub fn from_observations(year: i32, observed: &[ObservedHoliday]) -> Self {
        let mut holidays: BTreeMap<NaiveDate, String> = BTreeMap::new();
        let mut contributions: BTreeMap<NaiveDate, Vec<&str>> = BTreeMap::new();
        for holiday in observed {
            if let Some(previous) = holidays.insert(holiday.date, holiday.label.clone()) {
                if previous != holiday.label {
                    debug!(
                        "{}: '{}' replaces '{}' on {}",
                        year, holiday.label, previous, holiday.date
                    );
                }
            }
            contributions
                .entry(holiday.date)
                .or_default()
                .push(&holiday.key);
        }
        for (date, keys) in contributions.iter().filter(|(_, keys)| keys.len() > 2) {
            warn!(
                "{} rules ({}) are observed on {}, please review the rule data",
                keys.len(),
                keys.join(", "),
                date
            );
        }
        HolidaySet { year, holidays }
    }
}

/// Nominal dates of all rules of one year, computed at most once per rule
struct NominalDates<'a> {
    rules: &'a RuleRegistry,
    year: i32,
    easter: Result<NaiveDate, HolidayError>,
    cache: RefCell<BTreeMap<&'a str, Result<Option<NaiveDate>, HolidayError>>>,
}

impl<'a> NominalDates<'a> {
    fn new(rules: &'a RuleRegistry, year: i32) -> Self {
        NominalDates {
            rules,
            year,
            easter: easter::anchor(year),
            cache: RefCell::new(BTreeMap::new()),
        }
    }

    fn nominal(&self, rule: &'a HolidayRule) -> Result<Option<NaiveDate>, HolidayError> {
        self.nominal_at_depth(rule, 0)
    }

    fn nominal_at_depth(
        &self,
        rule: &'a HolidayRule,
        depth: usize,
    ) -> Result<Option<NaiveDate>, HolidayError> {
        if let Some(result) = self.cache.borrow().get(rule.key()) {
            return result.clone();
        }
        // composition rejects cyclic references, this only guards hand built registries
        if depth > self.rules.len() {
            return Err(HolidayError::CompositionError(format!(
                "rule '{}' depends on itself",
                rule.key()
            )));
        }
        let derived = |key: &str| -> Result<NaiveDate, HolidayError> {
            let other = self
                .rules
                .get(key)
                .ok_or_else(|| HolidayError::UnknownKey(key.to_string()))?;
            self.nominal_at_depth(other, depth + 1)?.ok_or_else(|| {
                HolidayError::InvalidRule(format!("'{}' does not occur in {}", key, self.year))
            })
        };
        let result = rule.kind().evaluate(self.year, &self.easter, &derived);
        self.cache.borrow_mut().insert(rule.key(), result.clone());
        result
    }
}

/// Observed dates of every rule for `year`, in registration order
pub fn observe_year(
    rules: &RuleRegistry,
    default_shift: &ShiftPolicy,
    year: i32,
) -> Vec<ObservedHoliday> {
    let nominal_dates = NominalDates::new(rules, year);
    let mut nominals = Vec::with_capacity(rules.len());
    for rule in rules {
        match nominal_dates.nominal(rule) {
            Ok(Some(date)) => nominals.push((rule, date)),
            Ok(None) => trace!("{} is not observed in {}", rule, year),
            Err(HolidayError::YearOutOfRange(_)) => warn!(
                "{} depends on Easter, which is not defined for {}",
                rule, year
            ),
            Err(err) => trace!("{} has no date in {}: {}", rule, year, err),
        }
    }

    let mut taken: BTreeSet<NaiveDate> = nominals.iter().map(|(_, date)| *date).collect();
    let mut observed = Vec::with_capacity(nominals.len());
    for (rule, nominal) in nominals {
        let policy = rule.shift().unwrap_or(default_shift);
        let dates = policy.apply_avoiding(nominal, |date| date != nominal && taken.contains(&date));
        for date in dates {
            // an augmenting policy keeps the nominal date, the extra day gets its own label
            let label = if date.shifted && policy.mode == ShiftMode::Augment {
                format!("{} (Observed)", rule.label())
            } else {
                rule.label().to_string()
            };
            taken.insert(date.date);
            observed.push(ObservedHoliday {
                key: rule.key().to_string(),
                label,
                nominal,
                date: date.date,
                shifted: date.shifted,
            });
        }
    }
    observed
}

/// The holidays of `year` as a map from observed date to label
pub fn resolve_year(rules: &RuleRegistry, default_shift: &ShiftPolicy, year: i32) -> HolidaySet {
    HolidaySet::from_observations(year, &observe_year(rules, default_shift, year))
}

/// Years whose holiday sets may contain `date`: observed dates can spill
/// over into the neighbouring calendar years.
pub fn candidate_years(date: NaiveDate) -> [i32; 3] {
    let year = date.year();
    [year - 1, year + 1, year]
}
