use super::sanitize_dimension_value;
use crate::Result;
use crate::config::{DimensionSpec, Pattern};
use ohno::bail;

/// Separator used to join capture groups when a rule does not configure one
pub const DEFAULT_SEPARATOR: &str = "-";

/// Derives one output dimension from the value of one input label
#[derive(Debug, Clone)]
pub struct DimensionRule {
    target: String,
    pattern: Option<Pattern>,
    separator: String,
}

impl DimensionRule {
    /// Create a rule
    ///
    /// A `pattern` of `None`, or the identity pattern `(.*)`, passes values through unchanged.
    #[must_use]
    pub fn new(target: impl Into<String>, pattern: Option<Pattern>, separator: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            pattern: pattern.filter(|p| !p.is_match_all()),
            separator: separator.into(),
        }
    }

    /// Build the rule for dimension `target` from its configuration entry
    ///
    /// Returns the name of the input label the rule reads, together with the rule.
    #[must_use]
    pub fn from_spec(target: &str, spec: &DimensionSpec) -> (String, Self) {
        match spec {
            DimensionSpec::SourceKey(source) => (source.clone(), Self::new(target, None, DEFAULT_SEPARATOR)),
            DimensionSpec::Rule(rule) => {
                let source = rule.source_key.clone().unwrap_or_else(|| target.to_string());
                let separator = rule.separator.as_deref().unwrap_or(DEFAULT_SEPARATOR);
                (source, Self::new(target, rule.regex.clone(), separator))
            }
        }
    }

    /// Name of the output dimension
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    #[must_use]
    pub const fn pattern(&self) -> Option<&Pattern> {
        self.pattern.as_ref()
    }

    #[must_use]
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Transform an input label value into the output dimension value
    ///
    /// The pattern must match at the start of the value. Returns `Ok(None)` when it does not,
    /// meaning the measurement carrying it must be dropped. When the pattern has capture
    /// groups, the captured text is joined with the separator; otherwise the value passes
    /// through.
    ///
    /// # Errors
    /// Returns an error when a capture group of the pattern did not take part in the match,
    /// which points at a pattern that does not fit the data.
    pub fn map_value(&self, source_value: &str) -> Result<Option<String>> {
        let Some(pattern) = &self.pattern else {
            return Ok(Some(sanitize_dimension_value(source_value)));
        };

        let Some(captures) = pattern.captures_at_start(source_value) else {
            return Ok(None);
        };

        if pattern.capture_group_count() == 0 {
            return Ok(Some(sanitize_dimension_value(source_value)));
        }

        let mut groups = Vec::with_capacity(pattern.capture_group_count());
        for (index, group) in captures.iter().enumerate().skip(1) {
            let Some(group) = group else {
                bail!(
                    "capture group {index} of pattern '{}' did not participate in matching '{source_value}'",
                    pattern.as_str()
                );
            };
            groups.push(group.as_str());
        }

        Ok(Some(sanitize_dimension_value(&groups.join(&self.separator))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DimensionRuleSpec, MATCH_ALL_PATTERN};

    fn rule(regex: &str, separator: &str) -> DimensionRule {
        DimensionRule::new("dim", Some(Pattern::new(regex).unwrap()), separator)
    }

    #[test]
    fn test_identity_rule() {
        let rule = DimensionRule::new("node", None, DEFAULT_SEPARATOR);
        assert_eq!(rule.map_value("node-1").unwrap().as_deref(), Some("node-1"));
        assert_eq!(rule.map_value("a=b").unwrap().as_deref(), Some("a-b"));
    }

    #[test]
    fn test_match_all_pattern_is_dropped() {
        let rule = rule(MATCH_ALL_PATTERN, DEFAULT_SEPARATOR);
        assert!(rule.pattern().is_none());
    }

    #[test]
    fn test_capture_groups_joined() {
        let rule = rule("(.*):([0-9]+)", "/");
        assert_eq!(rule.map_value("10.0.0.1:8080").unwrap().as_deref(), Some("10.0.0.1/8080"));
    }

    #[test]
    fn test_single_capture_group() {
        let rule = rule(".*:([0-9]+)", DEFAULT_SEPARATOR);
        assert_eq!(rule.map_value("kubernetes.default:443").unwrap().as_deref(), Some("443"));
    }

    #[test]
    fn test_no_match_filters() {
        let rule = rule(r"cpu(\d+)", DEFAULT_SEPARATOR);
        assert_eq!(rule.map_value("total").unwrap(), None);
    }

    #[test]
    fn test_dimension_regex_anchored_at_start() {
        let rule = rule("cpu(.*)", DEFAULT_SEPARATOR);
        assert_eq!(rule.map_value("cpu7").unwrap().as_deref(), Some("7"));
        assert_eq!(rule.map_value("vcpu7").unwrap(), None);
    }

    #[test]
    fn test_pattern_without_groups_passes_value_through() {
        let rule = rule("^kube-", DEFAULT_SEPARATOR);
        assert_eq!(rule.map_value("kube-system").unwrap().as_deref(), Some("kube-system"));
        assert_eq!(rule.map_value("default").unwrap(), None);
    }

    #[test]
    fn test_non_participating_group_is_an_error() {
        let rule = rule("(a)|(b)", DEFAULT_SEPARATOR);
        let result = rule.map_value("b");
        assert!(result.unwrap_err().to_string().contains("did not participate"));
    }

    #[test]
    fn test_from_simple_spec() {
        let (source, rule) = DimensionRule::from_spec("hostname", &DimensionSpec::SourceKey("kubernetes_io_hostname".to_string()));
        assert_eq!(source, "kubernetes_io_hostname");
        assert_eq!(rule.target(), "hostname");
        assert!(rule.pattern().is_none());
        assert_eq!(rule.separator(), DEFAULT_SEPARATOR);
    }

    #[test]
    fn test_from_rule_spec_defaults_source_to_target() {
        let spec = DimensionSpec::Rule(DimensionRuleSpec {
            source_key: None,
            regex: Some(Pattern::new("cpu(.*)").unwrap()),
            separator: Some("_".to_string()),
        });

        let (source, rule) = DimensionRule::from_spec("cpu", &spec);
        assert_eq!(source, "cpu");
        assert_eq!(rule.separator(), "_");
        assert_eq!(rule.map_value("cpu07").unwrap().as_deref(), Some("07"));
    }
}
