//! Jurisdiction definitions read from JSON, e.g.
//!
//! ```json
//! { "jurisdictions": [
//!     { "code": "US-AK", "parent": "US",
//!       "edits": [ { "remove_rule": "columbus_day" },
//!                  { "add_rule": { "key": "alaska_day", "label": "Alaska Day",
//!                                  "kind": { "fixed_date": { "month": 10, "day": 18 } } } } ] } ] }
//! ```
//!
//! Rules are checked while reading, so malformed rules never reach a calendar.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::calendar::CalendarsBuilder;
use crate::error::HolidayError;
use crate::jurisdiction::Jurisdiction;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CalendarConfig {
    pub jurisdictions: Vec<Jurisdiction>,
}

impl CalendarConfig {
    pub fn from_json(json: &str) -> Result<Self, HolidayError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, HolidayError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn to_json(&self) -> Result<String, HolidayError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Register all jurisdictions in the order they are listed
    pub fn register(self, builder: &mut CalendarsBuilder) -> Result<(), HolidayError> {
        for jurisdiction in self.jurisdictions {
            builder.register(jurisdiction)?;
        }
        Ok(())
    }
}

impl CalendarsBuilder {
    /// Register the jurisdictions of a JSON document
    pub fn load_json(&mut self, json: &str) -> Result<&mut Self, HolidayError> {
        CalendarConfig::from_json(json)?.register(self)?;
        Ok(self)
    }
}
