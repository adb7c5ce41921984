use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use chrono::NaiveDate;
use log::trace;

use crate::calendar::Calendars;
use crate::error::HolidayError;
use crate::resolve::{candidate_years, HolidaySet};

/// Calendars with a memo of resolved years. Each `(jurisdiction, year)`
/// is resolved at most once, even with concurrent callers.
pub struct CachedCalendars {
    calendars: Calendars,
    years: RwLock<BTreeMap<(String, i32), Arc<HolidaySet>>>,
}

impl CachedCalendars {
    pub fn new(calendars: Calendars) -> Self {
        CachedCalendars {
            calendars,
            years: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn calendars(&self) -> &Calendars {
        &self.calendars
    }

    pub fn resolve_year(&self, code: &str, year: i32) -> Result<Arc<HolidaySet>, HolidayError> {
        let key = (code.to_string(), year);
        {
            let years = self.years.read().unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Some(set) = years.get(&key) {
                return Ok(set.clone());
            }
        }
        let mut years = self
            .years
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // another caller may have filled the entry while we waited for the lock
        if let Some(set) = years.get(&key) {
            return Ok(set.clone());
        }
        trace!("resolving {} for {}", code, year);
        let set = Arc::new(self.calendars.resolve_year(code, year)?);
        years.insert(key, set.clone());
        Ok(set)
    }

    pub fn is_holiday(&self, code: &str, date: NaiveDate) -> Result<bool, HolidayError> {
        for year in candidate_years(date).iter() {
            if self.resolve_year(code, *year)?.contains(&date) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Number of resolved years held in the cache
    pub fn len(&self) -> usize {
        self.years
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.years
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jurisdiction::Jurisdiction;
    use crate::rule::{HolidayRule, RuleKind};
    use std::thread;

    fn cached() -> CachedCalendars {
        let mut builder = Calendars::builder();
        builder
            .register(
                Jurisdiction::new("FED")
                    .add(HolidayRule::new("new_years_day", "New year", RuleKind::fixed(1, 1)).unwrap())
                    .add(
                        HolidayRule::new("christmas_day", "Christmas Day", RuleKind::fixed(12, 25))
                            .unwrap(),
                    ),
            )
            .unwrap();
        CachedCalendars::new(builder.build())
    }

    #[test]
    fn years_are_resolved_once() {
        let cals = cached();
        let first = cals.resolve_year("FED", 2017).unwrap();
        let second = cals.resolve_year("FED", 2017).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*first, cals.calendars().resolve_year("FED", 2017).unwrap());
        assert_eq!(cals.len(), 1);
        cals.clear();
        assert!(cals.is_empty());
    }

    #[test]
    fn errors_are_not_cached() {
        let cals = cached();
        assert_eq!(
            cals.resolve_year("NOWHERE", 2017).err(),
            Some(HolidayError::UnknownJurisdiction("NOWHERE".to_string()))
        );
        assert!(cals.is_empty());
    }

    #[test]
    fn poisoned_lock_is_recovered() {
        let cals = Arc::new(cached());
        cals.resolve_year("FED", 2017).unwrap();
        let holder = cals.clone();
        let result = thread::spawn(move || {
            let _years = holder.years.write().unwrap();
            panic!("panic while holding the cache lock");
        })
        .join();
        assert!(result.is_err());
        assert!(cals.years.is_poisoned());

        assert_eq!(cals.len(), 1);
        assert!(!cals.is_empty());
        cals.clear();
        assert!(cals.is_empty());
        assert!(cals.resolve_year("FED", 2016).is_ok());
        assert_eq!(cals.len(), 1);
    }

    #[test]
    fn shared_between_threads() {
        let cals = Arc::new(cached());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cals = cals.clone();
                thread::spawn(move || {
                    cals.is_holiday("FED", NaiveDate::from_ymd_opt(2016, 12, 26).unwrap())
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), Ok(true));
        }
        // 2015, 2016 and 2017 were consulted
        assert_eq!(cals.len(), 3);
    }
}
