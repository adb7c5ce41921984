//! Ordered, key indexed collection of holiday rules forming the rule set
//! of one jurisdiction. Registration order is significant: it is the order
//! rules are evaluated in, and a later rule's label wins if two rules end up
//! on the same date.

use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::error::HolidayError;
use crate::rule::HolidayRule;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleRegistry {
    rules: IndexMap<String, HolidayRule>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        RuleRegistry {
            rules: IndexMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&HolidayRule> {
        self.rules.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.rules.contains_key(key)
    }

    /// Position of the rule in registration order
    pub fn position(&self, key: &str) -> Option<usize> {
        self.rules.get_index_of(key)
    }

    /// Append a rule; its key must not be registered yet
    pub fn add(&mut self, rule: HolidayRule) -> Result<(), HolidayError> {
        if self.rules.contains_key(rule.key()) {
            return Err(HolidayError::DuplicateKey(rule.key().to_string()));
        }
        self.rules.insert(rule.key().to_string(), rule);
        Ok(())
    }

    /// Remove a rule, keeping the order of all others
    pub fn remove(&mut self, key: &str) -> Result<HolidayRule, HolidayError> {
        self.rules
            .shift_remove(key)
            .ok_or_else(|| HolidayError::UnknownKey(key.to_string()))
    }

    /// Replace the rule registered under `key` at its original position.
    /// The new rule may carry a different key, as long as that one isn't taken.
    pub fn replace(&mut self, key: &str, rule: HolidayRule) -> Result<HolidayRule, HolidayError> {
        let index = self
            .rules
            .get_index_of(key)
            .ok_or_else(|| HolidayError::UnknownKey(key.to_string()))?;
        if rule.key() != key && self.rules.contains_key(rule.key()) {
            return Err(HolidayError::DuplicateKey(rule.key().to_string()));
        }
        let (_, old) = self
            .rules
            .shift_remove_index(index)
            .ok_or_else(|| HolidayError::UnknownKey(key.to_string()))?;
        self.rules.shift_insert(index, rule.key().to_string(), rule);
        Ok(old)
    }

    /// Rules in registration order
    pub fn iter(&self) -> impl Iterator<Item = &HolidayRule> {
        self.rules.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(|key| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Check that every derived rule refers to a registered key
    /// and that references don't form a cycle.
    pub fn check_references(&self) -> Result<(), HolidayError> {
        for rule in self.rules.values() {
            let mut seen = BTreeSet::new();
            seen.insert(rule.key());
            let mut current = rule;
            while let Some(reference) = current.kind().reference() {
                current = self
                    .rules
                    .get(reference)
                    .ok_or_else(|| HolidayError::UnknownKey(reference.to_string()))?;
                if !seen.insert(current.key()) {
                    return Err(HolidayError::CompositionError(format!(
                        "rule '{}' depends on itself through '{}'",
                        rule.key(),
                        reference
                    )));
                }
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a RuleRegistry {
    type Item = &'a HolidayRule;
    type IntoIter = indexmap::map::Values<'a, String, HolidayRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.values()
    }
}
