//! Jurisdictions and their composition. A jurisdiction is plain configuration:
//! an optional parent and an ordered list of edits against the parent's rule
//! set. Composition turns it into the effective `RuleRegistry`.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::HolidayError;
use crate::registry::RuleRegistry;
use crate::rule::HolidayRule;
use crate::shift::ShiftPolicy;

/// A single change a jurisdiction applies to its inherited rule set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edit {
    AddRule(HolidayRule),
    RemoveRule(String),
    ReplaceRule { key: String, rule: HolidayRule },
    /// Same rule, different label
    RelabelRule { key: String, label: String },
}

impl Edit {
    pub fn apply(&self, rules: &mut RuleRegistry) -> Result<(), HolidayError> {
        match self {
            Edit::AddRule(rule) => rules.add(rule.clone()),
            Edit::RemoveRule(key) => rules.remove(key).map(|_| ()),
            Edit::ReplaceRule { key, rule } => rules.replace(key, rule.clone()).map(|_| ()),
            Edit::RelabelRule { key, label } => {
                let rule = rules
                    .get(key)
                    .ok_or_else(|| HolidayError::UnknownKey(key.clone()))?
                    .relabeled(label);
                rules.replace(key, rule).map(|_| ())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Jurisdiction {
    code: String,
    #[serde(default)]
    parent: Option<String>,
    /// Shift policy for rules without their own; inherited from the parent if not set
    #[serde(default)]
    default_shift: Option<ShiftPolicy>,
    #[serde(default)]
    edits: Vec<Edit>,
}

impl Jurisdiction {
    /// A root jurisdiction, e.g. a nation
    pub fn new(code: &str) -> Self {
        Jurisdiction {
            code: code.to_string(),
            parent: None,
            default_shift: None,
            edits: Vec::new(),
        }
    }

    /// A jurisdiction starting from the rule set of `parent`
    pub fn derived_from(code: &str, parent: &str) -> Self {
        Jurisdiction {
            parent: Some(parent.to_string()),
            ..Self::new(code)
        }
    }

    pub fn with_default_shift(mut self, shift: ShiftPolicy) -> Self {
        self.default_shift = Some(shift);
        self
    }

    pub fn with_edits(mut self, edits: Vec<Edit>) -> Self {
        self.edits.extend(edits);
        self
    }

    pub fn add(mut self, rule: HolidayRule) -> Self {
        self.edits.push(Edit::AddRule(rule));
        self
    }

    pub fn remove(mut self, key: &str) -> Self {
        self.edits.push(Edit::RemoveRule(key.to_string()));
        self
    }

    pub fn replace(mut self, key: &str, rule: HolidayRule) -> Self {
        self.edits.push(Edit::ReplaceRule {
            key: key.to_string(),
            rule,
        });
        self
    }

    pub fn relabel(mut self, key: &str, label: &str) -> Self {
        self.edits.push(Edit::RelabelRule {
            key: key.to_string(),
            label: label.to_string(),
        });
        self
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn default_shift(&self) -> Option<&ShiftPolicy> {
        self.default_shift.as_ref()
    }

    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }
}

/// Effective configuration of a jurisdiction after composition
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedJurisdiction {
    pub code: String,
    pub rules: RuleRegistry,
    pub default_shift: ShiftPolicy,
}

/// Composes jurisdictions looked up by code, remembering every result so
/// shared parents are only built once.
pub struct Composer<'a> {
    jurisdictions: &'a BTreeMap<String, Jurisdiction>,
    composed: BTreeMap<String, Result<ComposedJurisdiction, HolidayError>>,
}

impl<'a> Composer<'a> {
    pub fn new(jurisdictions: &'a BTreeMap<String, Jurisdiction>) -> Self {
        Composer {
            jurisdictions,
            composed: BTreeMap::new(),
        }
    }

    pub fn compose(&mut self, code: &str) -> Result<ComposedJurisdiction, HolidayError> {
        let mut chain = Vec::new();
        self.compose_chain(code, &mut chain)
    }

    /// All registered jurisdictions with their composition result
    pub fn compose_all(mut self) -> BTreeMap<String, Result<ComposedJurisdiction, HolidayError>> {
        let codes: Vec<String> = self.jurisdictions.keys().cloned().collect();
        for code in codes {
            let _ = self.compose(&code);
        }
        self.composed
    }

    fn compose_chain(
        &mut self,
        code: &str,
        chain: &mut Vec<String>,
    ) -> Result<ComposedJurisdiction, HolidayError> {
        if let Some(result) = self.composed.get(code) {
            return result.clone();
        }
        if chain.iter().any(|c| c == code) {
            return Err(HolidayError::CompositionError(format!(
                "cyclic parent chain {} -> {}",
                chain.join(" -> "),
                code
            )));
        }
        let jurisdictions = self.jurisdictions;
        let jurisdiction = jurisdictions
            .get(code)
            .ok_or_else(|| HolidayError::UnknownJurisdiction(code.to_string()))?;

        chain.push(code.to_string());
        let parent = match jurisdiction.parent() {
            Some(parent) => Some(self.compose_chain(parent, chain)),
            None => None,
        };
        chain.pop();

        let result = parent
            .transpose()
            .and_then(|parent| compose(jurisdiction, parent.as_ref()));
        self.composed.insert(code.to_string(), result.clone());
        result
    }
}

/// Apply a jurisdiction's edits in order to a copy of its composed parent
pub fn compose(
    jurisdiction: &Jurisdiction,
    parent: Option<&ComposedJurisdiction>,
) -> Result<ComposedJurisdiction, HolidayError> {
    let mut rules = match parent {
        Some(parent) => parent.rules.clone(),
        None => RuleRegistry::new(),
    };
    for edit in jurisdiction.edits() {
        edit.apply(&mut rules)?;
    }
    rules.check_references()?;
    let default_shift = jurisdiction
        .default_shift()
        .or_else(|| parent.map(|p| &p.default_shift))
        .copied()
        .unwrap_or_default();
    debug!(
        "composed jurisdiction {} with {} rules",
        jurisdiction.code(),
        rules.len()
    );
    Ok(ComposedJurisdiction {
        code: jurisdiction.code().to_string(),
        rules,
        default_shift,
    })
}
