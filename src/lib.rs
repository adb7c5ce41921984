//! # holicalc
//!
//! Purpose of this library is to tell which days are public holidays in a
//! given jurisdiction and year, and on which date each holiday is observed.
//! The project is licensed under Apache 2.0 or MIT license at the option of the user.
//!
//! Holidays are described by rules (fixed dates, n-th weekday of a month, offsets
//! from Easter or from other holidays, optionally restricted to certain years).
//! A jurisdiction either starts from scratch or derives from a parent jurisdiction,
//! adding, removing, replacing or relabeling rules. Weekend observance is handled by
//! shift policies, set per jurisdiction or per rule. Rules of the United States federal
//! calendar and of a number of states are bundled in the `usa` module; other
//! jurisdictions may be defined in code or read from JSON.

// module exports
pub mod cache;
pub mod calendar;
pub mod config;
pub mod date_rules;
pub mod easter;
pub mod error;
pub mod jurisdiction;
pub mod registry;
pub mod resolve;
pub mod rule;
pub mod shift;
pub mod usa;

pub use cache::CachedCalendars;
pub use calendar::{Calendars, CalendarsBuilder};
pub use config::CalendarConfig;
pub use date_rules::Occurrence;
pub use error::HolidayError;
pub use jurisdiction::{ComposedJurisdiction, Edit, Jurisdiction};
pub use registry::RuleRegistry;
pub use resolve::{HolidaySet, ObservedHoliday, ResolvedHoliday};
pub use rule::{HolidayRule, RuleKind, YearGate};
pub use shift::{ObservedDate, ShiftKind, ShiftMode, ShiftPolicy};
