//! Extraction options.
//!
//! `ExtractConfig` is the raw JSON shape an embedder writes (every field
//! optional, camelCase). `ExtractOptions` is the resolved form the engine reads.

use crate::recursion::RecursionProfile;
use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};

/// Default name of the request-context type skipped as a first parameter.
pub const DEFAULT_CONTEXT_TYPE_NAME: &str = "PheroContext";

/// Accepts both `true` and `"true"` for boolean options.
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrString::Bool(b)) => Ok(Some(b)),
        Some(BoolOrString::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(Error::custom(format!(
                "invalid boolean value: '{s}'. Expected true, false, 'true', or 'false'"
            ))),
        },
    }
}

/// How two distinct symbols with the same simple name are emitted.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NamePolicy {
    /// Raise `NameCollision`.
    #[default]
    Reject,
    /// Emit later claimants as `module.Name`.
    QualifyByModule,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractConfig {
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub strict_null_checks: Option<bool>,
    #[serde(default)]
    pub extra_builtins: Option<Vec<String>>,
    #[serde(default)]
    pub name_policy: Option<NamePolicy>,
    #[serde(default)]
    pub context_type_name: Option<String>,
    #[serde(default)]
    pub max_depth: Option<u32>,
    #[serde(default)]
    pub max_iterations: Option<u32>,
}

impl ExtractConfig {
    pub fn resolve(self) -> ExtractOptions {
        let defaults = ExtractOptions::default();
        ExtractOptions {
            strict_null_checks: self
                .strict_null_checks
                .unwrap_or(defaults.strict_null_checks),
            extra_builtins: self.extra_builtins.unwrap_or_default(),
            name_policy: self.name_policy.unwrap_or_default(),
            context_type_name: self
                .context_type_name
                .unwrap_or(defaults.context_type_name),
            max_depth: self.max_depth,
            max_iterations: self.max_iterations,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Whether the host classifies `undefined` separately (strict null mode).
    pub strict_null_checks: bool,
    /// Names treated like the builtin allow-list by the closure walker.
    pub extra_builtins: Vec<String>,
    pub name_policy: NamePolicy,
    pub context_type_name: String,
    /// Overrides the traversal's default depth limit.
    pub max_depth: Option<u32>,
    /// Overrides the traversal's default iteration budget.
    pub max_iterations: Option<u32>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            strict_null_checks: true,
            extra_builtins: Vec::new(),
            name_policy: NamePolicy::Reject,
            context_type_name: DEFAULT_CONTEXT_TYPE_NAME.to_owned(),
            max_depth: None,
            max_iterations: None,
        }
    }
}

impl ExtractOptions {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: ExtractConfig =
            serde_json::from_str(text).context("failed to parse extraction options")?;
        Ok(config.resolve())
    }

    pub fn with_name_policy(mut self, policy: NamePolicy) -> Self {
        self.name_policy = policy;
        self
    }

    pub fn with_limits(mut self, max_depth: u32, max_iterations: u32) -> Self {
        self.max_depth = Some(max_depth);
        self.max_iterations = Some(max_iterations);
        self
    }

    /// Limits for a traversal whose defaults are `base`.
    pub fn recursion_profile(&self, base: RecursionProfile) -> RecursionProfile {
        if self.max_depth.is_none() && self.max_iterations.is_none() {
            return base;
        }
        RecursionProfile::Custom {
            max_depth: self.max_depth.unwrap_or(base.max_depth()),
            max_iterations: self.max_iterations.unwrap_or(base.max_iterations()),
        }
    }

    pub fn is_extra_builtin(&self, name: &str) -> bool {
        self.extra_builtins.iter().any(|b| b == name)
    }
}

#[cfg(test)]
#[path = "../tests/options_tests.rs"]
mod tests;
