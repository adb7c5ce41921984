use thiserror::Error;

/// Errors raised while constructing rules, composing jurisdictions
/// or querying calendars.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HolidayError {
    /// A rule can't produce a date, either structurally (rejected when the rule is built)
    /// or for a particular year (e.g. a 5th Monday that doesn't exist).
    #[error("invalid holiday rule: {0}")]
    InvalidRule(String),
    #[error("rule key '{0}' is already registered")]
    DuplicateKey(String),
    #[error("unknown rule key '{0}'")]
    UnknownKey(String),
    /// Cyclic parent chain or cyclic derived rule references
    #[error("composition failed: {0}")]
    CompositionError(String),
    #[error("unknown jurisdiction '{0}'")]
    UnknownJurisdiction(String),
    #[error("jurisdiction '{0}' is already registered")]
    DuplicateJurisdiction(String),
    #[error("year {0} is outside the supported range of the Gregorian Easter computation")]
    YearOutOfRange(i32),
    #[error("invalid calendar configuration: {0}")]
    ConfigError(String),
}

impl From<serde_json::Error> for HolidayError {
    fn from(err: serde_json::Error) -> Self {
        HolidayError::ConfigError(err.to_string())
    }
}
