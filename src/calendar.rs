//! Implementation of public holiday calendars for a set of jurisdictions.
//! This is required to verify whether a specific date is a holiday in a region,
//! or to list the holidays between two dates, e.g. for scheduling, payroll or
//! business day calculations built on top of this crate.
//!
//! Jurisdictions are registered once with a `CalendarsBuilder`; building composes
//! every jurisdiction into its effective rule set. The resulting `Calendars` is
//! immutable and may be shared between threads. Holidays are computed fresh for
//! every query; see `CachedCalendars` for a memoizing wrapper.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use log::warn;

use crate::error::HolidayError;
use crate::jurisdiction::{ComposedJurisdiction, Composer, Edit, Jurisdiction};
use crate::registry::RuleRegistry;
use crate::resolve::{self, HolidaySet, ObservedHoliday, ResolvedHoliday};

/// Collects jurisdiction definitions before they are composed
#[derive(Debug, Clone, Default)]
pub struct CalendarsBuilder {
    jurisdictions: BTreeMap<String, Jurisdiction>,
}

impl CalendarsBuilder {
    pub fn new() -> Self {
        CalendarsBuilder {
            jurisdictions: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, jurisdiction: Jurisdiction) -> Result<&mut Self, HolidayError> {
        if self.jurisdictions.contains_key(jurisdiction.code()) {
            return Err(HolidayError::DuplicateJurisdiction(
                jurisdiction.code().to_string(),
            ));
        }
        self.jurisdictions
            .insert(jurisdiction.code().to_string(), jurisdiction);
        Ok(self)
    }

    /// Register a jurisdiction given by code, optional parent code and edits
    pub fn register_jurisdiction(
        &mut self,
        code: &str,
        parent: Option<&str>,
        edits: Vec<Edit>,
    ) -> Result<&mut Self, HolidayError> {
        let jurisdiction = match parent {
            Some(parent) => Jurisdiction::derived_from(code, parent),
            None => Jurisdiction::new(code),
        };
        self.register(jurisdiction.with_edits(edits))
    }

    /// Compose all registered jurisdictions. Jurisdictions failing to compose are
    /// kept together with their error; querying them returns that error.
    pub fn build(self) -> Calendars {
        let composed = Composer::new(&self.jurisdictions).compose_all();
        for (code, result) in composed.iter() {
            if let Err(err) = result {
                warn!("jurisdiction {} is not available: {}", code, err);
            }
        }
        Calendars {
            jurisdictions: self.jurisdictions,
            composed,
        }
    }
}

/// Composed holiday calendars of all registered jurisdictions
#[derive(Debug, Clone)]
pub struct Calendars {
    jurisdictions: BTreeMap<String, Jurisdiction>,
    composed: BTreeMap<String, Result<ComposedJurisdiction, HolidayError>>,
}

impl Calendars {
    pub fn builder() -> CalendarsBuilder {
        CalendarsBuilder::new()
    }

    /// Codes of all registered jurisdictions, whether usable or not
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.jurisdictions.keys().map(|code| code.as_str())
    }

    /// Jurisdictions that failed to compose
    pub fn errors(&self) -> impl Iterator<Item = (&str, &HolidayError)> {
        self.composed.iter().filter_map(|(code, result)| match result {
            Err(err) => Some((code.as_str(), err)),
            Ok(_) => None,
        })
    }

    /// The jurisdiction as it was registered
    pub fn jurisdiction(&self, code: &str) -> Result<&Jurisdiction, HolidayError> {
        self.jurisdictions
            .get(code)
            .ok_or_else(|| HolidayError::UnknownJurisdiction(code.to_string()))
    }

    pub fn composed(&self, code: &str) -> Result<&ComposedJurisdiction, HolidayError> {
        match self.composed.get(code) {
            Some(Ok(composed)) => Ok(composed),
            Some(Err(err)) => Err(err.clone()),
            None => Err(HolidayError::UnknownJurisdiction(code.to_string())),
        }
    }

    /// Effective rule set of a jurisdiction
    pub fn rules(&self, code: &str) -> Result<&RuleRegistry, HolidayError> {
        Ok(&self.composed(code)?.rules)
    }

    /// Holidays of `year`, keyed by observed date
    pub fn resolve_year(&self, code: &str, year: i32) -> Result<HolidaySet, HolidayError> {
        let composed = self.composed(code)?;
        Ok(resolve::resolve_year(
            &composed.rules,
            &composed.default_shift,
            year,
        ))
    }

    /// Every observed date of every rule in `year`, before collisions are merged
    pub fn observe_year(&self, code: &str, year: i32) -> Result<Vec<ObservedHoliday>, HolidayError> {
        let composed = self.composed(code)?;
        Ok(resolve::observe_year(
            &composed.rules,
            &composed.default_shift,
            year,
        ))
    }

    /// Observed date(s) and label of a single holiday in `year`;
    /// empty if the holiday does not occur in that year.
    pub fn holiday(
        &self,
        code: &str,
        key: &str,
        year: i32,
    ) -> Result<Vec<ResolvedHoliday>, HolidayError> {
        if !self.rules(code)?.contains(key) {
            return Err(HolidayError::UnknownKey(key.to_string()));
        }
        Ok(self
            .observe_year(code, year)?
            .into_iter()
            .filter(|observed| observed.key == key)
            .map(|observed| ResolvedHoliday {
                date: observed.date,
                label: observed.label,
            })
            .collect())
    }

    /// Label of the holiday observed on `date`, if any
    pub fn holiday_label(&self, code: &str, date: NaiveDate) -> Result<Option<String>, HolidayError> {
        let mut label = None;
        for year in resolve::candidate_years(date).iter() {
            if let Some(found) = self.resolve_year(code, *year)?.label(&date) {
                label = Some(found.to_string());
            }
        }
        Ok(label)
    }

    pub fn is_holiday(&self, code: &str, date: NaiveDate) -> Result<bool, HolidayError> {
        Ok(self.holiday_label(code, date)?.is_some())
    }

    /// All holidays observed between `start` and `end` (both inclusive), in date order
    pub fn holidays_between(
        &self,
        code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ResolvedHoliday>, HolidayError> {
        let mut holidays = BTreeMap::new();
        if start > end {
            return Ok(Vec::new());
        }
        for year in start.year() - 1..=end.year() + 1 {
            for (date, label) in self.resolve_year(code, year)?.iter() {
                if *date < start || *date > end {
                    continue;
                }
                // the date's own year wins over spill-overs from neighbouring years
                if date.year() == year {
                    holidays.insert(*date, label.to_string());
                } else {
                    holidays.entry(*date).or_insert_with(|| label.to_string());
                }
            }
        }
        Ok(holidays
            .into_iter()
            .map(|(date, label)| ResolvedHoliday { date, label })
            .collect())
    }
}
