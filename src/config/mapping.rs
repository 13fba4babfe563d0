use super::{OrderedMap, Pattern};
use crate::Result;
use ohno::bail;
use serde::{Deserialize, Serialize};

/// Recursion limit for nested input trees when an instance does not configure one
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Configuration of one monitored instance
///
/// Instance blocks are shared with the collaborator that retrieves the data, so keys other
/// than the ones below (URLs, credentials, ...) are ignored here.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InstanceConfig {
    /// Name identifying the instance
    pub name: String,

    /// How input metrics of this instance are filtered, renamed and classified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping: Option<MappingConfig>,

    /// How deep nested input trees are walked
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

const fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl InstanceConfig {
    #[must_use]
    pub fn new(name: impl Into<String>, mapping: Option<MappingConfig>) -> Self {
        Self {
            name: name.into(),
            mapping,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// The `mapping` block of an instance: the global scope plus optional named groups
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MappingConfig {
    /// Name patterns of metrics reported as gauges
    #[serde(default)]
    pub gauges: Vec<Pattern>,

    /// Name patterns of metrics reported as rates
    #[serde(default)]
    pub rates: Vec<Pattern>,

    /// Output dimension name to the rule producing it
    #[serde(default)]
    pub dimensions: OrderedMap<DimensionSpec>,

    /// Named sub-scopes; the group name prefixes the output metric names
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub groups: OrderedMap<GroupConfig>,
}

impl MappingConfig {
    /// Check constraints that deserialization alone does not enforce
    ///
    /// # Errors
    /// Returns an error if a group has an empty name, which could never be selected explicitly
    pub fn validate(&self) -> Result<()> {
        if self.groups.keys().any(str::is_empty) {
            bail!("group names must not be empty");
        }
        Ok(())
    }
}

/// One entry of the `groups` block
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GroupConfig {
    #[serde(default)]
    pub gauges: Vec<Pattern>,

    #[serde(default)]
    pub rates: Vec<Pattern>,

    #[serde(default)]
    pub dimensions: OrderedMap<DimensionSpec>,
}

/// How one output dimension is derived from an input label
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum DimensionSpec {
    /// `<dimension>: <source_label>`, the label value is taken unchanged
    SourceKey(String),

    /// The long form with an optional transforming regular expression
    Rule(DimensionRuleSpec),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DimensionRuleSpec {
    /// Input label to read, defaults to the dimension name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_key: Option<String>,

    /// Filter and transformation applied to the label value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<Pattern>,

    /// Joins the capture groups of `regex`, defaults to `-`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,
}
