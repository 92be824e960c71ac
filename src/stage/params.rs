//! Stage parameters encoded as a suffix of the stage's chain segment
//!
//! `trim_bbmapAQ10` is stage `trim_bbmap` with flag `A` set and `qual=10`.
//! Parameters are optional and must appear in declaration order.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::validation::CHAIN_SEPARATOR;

use super::error::ConfigError;

/// How a parameter is spelled after its key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    /// Key followed by digits (`Q10`)
    Int,
    /// Bare key (`A`)
    Flag,
    /// Key followed by one of a fixed set of values (`Mfast`)
    Choice,
}

/// A single declared stage parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub key: String,
    pub name: String,
    pub kind: ParamKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl ParamSpec {
    pub fn int(key: &str, name: &str, default: Option<i64>) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            kind: ParamKind::Int,
            values: Vec::new(),
            default: default.map(|d| d.to_string()),
        }
    }

    pub fn flag(key: &str, name: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            kind: ParamKind::Flag,
            values: Vec::new(),
            default: None,
        }
    }

    pub fn choice(key: &str, name: &str, values: &[&str], default: Option<&str>) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            kind: ParamKind::Choice,
            values: values.iter().map(|v| v.to_string()).collect(),
            default: default.map(String::from),
        }
    }

    fn check(&self, stage: &str) -> Result<(), ConfigError> {
        let fail = |reason: String| ConfigError::InvalidParams {
            stage: stage.to_string(),
            reason,
        };

        if self.name.trim().is_empty() {
            return Err(fail(format!("parameter with key '{}' has no name", self.key)));
        }
        if self.key.is_empty() && self.kind != ParamKind::Choice {
            return Err(fail(format!("parameter '{}' has an empty key", self.name)));
        }
        if !self.key.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(fail(format!(
                "parameter key '{}' must be alphanumeric",
                self.key
            )));
        }

        match self.kind {
            ParamKind::Int => {
                if let Some(default) = &self.default {
                    if default.parse::<i64>().is_err() {
                        return Err(fail(format!(
                            "default '{default}' of parameter '{}' is not an integer",
                            self.name
                        )));
                    }
                }
            }
            ParamKind::Flag => {}
            ParamKind::Choice => {
                if self.values.is_empty() {
                    return Err(fail(format!(
                        "choice parameter '{}' declares no values",
                        self.name
                    )));
                }
                if let Some(value) = self.values.iter().find(|v| v.contains(CHAIN_SEPARATOR)) {
                    return Err(fail(format!(
                        "value '{value}' of parameter '{}' contains '{CHAIN_SEPARATOR}'",
                        self.name
                    )));
                }
                if let Some(default) = &self.default {
                    if !self.values.contains(default) {
                        return Err(fail(format!(
                            "default '{default}' of parameter '{}' is not one of its values",
                            self.name
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    fn pattern(&self, group: &str) -> String {
        let key = regex::escape(&self.key);
        match self.kind {
            ParamKind::Int => format!("(?:{key}(?P<{group}>[0-9]+))?"),
            ParamKind::Flag => format!("(?P<{group}>{key})?"),
            ParamKind::Choice => {
                // Longest first so `fast` never shadows `faster`
                let mut values: Vec<&String> = self.values.iter().collect();
                values.sort_by_key(|v| std::cmp::Reverse(v.len()));
                let alternatives: Vec<String> = values.iter().map(|v| regex::escape(v)).collect();
                format!("(?:{key}(?P<{group}>{}))?", alternatives.join("|"))
            }
        }
    }
}

/// Compiled matcher for a stage name plus its parameter suffix
#[derive(Debug, Clone)]
pub struct ParamMatcher {
    regex: Regex,
    params: Vec<ParamSpec>,
}

impl ParamMatcher {
    pub fn new(stage: &str, params: Vec<ParamSpec>) -> Result<Self, ConfigError> {
        let mut pattern = format!("^{}", regex::escape(stage));
        for (idx, param) in params.iter().enumerate() {
            param.check(stage)?;
            pattern.push_str(&param.pattern(&format!("p{idx}")));
        }
        pattern.push('$');

        let regex = Regex::new(&pattern).map_err(|e| ConfigError::InvalidParams {
            stage: stage.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { regex, params })
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Match a segment, returning parameter values keyed by parameter name.
    ///
    /// Absent parameters take their default; absent flags are `"false"`.
    pub fn match_segment(&self, segment: &str) -> Option<BTreeMap<String, String>> {
        let captures = self.regex.captures(segment)?;
        let mut values = BTreeMap::new();

        for (idx, param) in self.params.iter().enumerate() {
            let captured = captures.name(&format!("p{idx}")).map(|m| m.as_str());
            let value = match (param.kind, captured) {
                (ParamKind::Flag, Some(_)) => Some("true".to_string()),
                (ParamKind::Flag, None) => Some("false".to_string()),
                (_, Some(v)) => Some(v.to_string()),
                (_, None) => param.default.clone(),
            };
            if let Some(value) = value {
                values.insert(param.name.clone(), value);
            }
        }

        Some(values)
    }
}
