use crate::config::{DimensionSpec, GroupConfig, MappingConfig, OrderedMap, Pattern};
use crate::dimensions::DimensionRule;
use crate::metrics::{MetricKind, MetricSpec};
use crate::names::normalize_metric_name;
use regex::Captures;
use rustc_hash::FxHashMap;

/// The compiled rules of either the global mapping or one group
///
/// Classification over a scope is a pure function of its pattern lists; caching is the
/// job of the owning [`InstanceMapping`](super::InstanceMapping).
#[derive(Debug, Clone, Default)]
pub struct Scope {
    gauges: Vec<Pattern>,
    rates: Vec<Pattern>,
    rules: FxHashMap<String, Vec<DimensionRule>>,
}

impl Scope {
    #[must_use]
    pub fn new(gauges: &[Pattern], rates: &[Pattern], dimensions: &OrderedMap<DimensionSpec>) -> Self {
        let mut rules: FxHashMap<String, Vec<DimensionRule>> = FxHashMap::default();
        for (target, spec) in dimensions.iter() {
            let (source, rule) = DimensionRule::from_spec(target, spec);
            rules.entry(source).or_default().push(rule);
        }

        Self {
            gauges: gauges.to_vec(),
            rates: rates.to_vec(),
            rules,
        }
    }

    /// The global scope of a mapping block
    #[must_use]
    pub fn global(mapping: &MappingConfig) -> Self {
        Self::new(&mapping.gauges, &mapping.rates, &mapping.dimensions)
    }

    #[must_use]
    pub fn group(group: &GroupConfig) -> Self {
        Self::new(&group.gauges, &group.rates, &group.dimensions)
    }

    /// Classify a raw metric name: gauge patterns first, then rate patterns
    ///
    /// The output name is normalized from the capture groups of the matching pattern.
    /// Names that match nothing classify as [`MetricKind::Skip`].
    #[must_use]
    pub fn classify(&self, raw_name: &str) -> MetricSpec {
        for (kind, patterns) in [(MetricKind::Gauge, &self.gauges), (MetricKind::Rate, &self.rates)] {
            for pattern in patterns {
                if let Some(captures) = pattern.captures(raw_name) {
                    return MetricSpec::new(kind, output_name(raw_name, &captures));
                }
            }
        }

        MetricSpec::new(MetricKind::Skip, normalize_metric_name(raw_name, &[]))
    }

    /// Dimension rules reading the given input label, in declaration order
    #[must_use]
    pub fn rules_for(&self, label: &str) -> &[DimensionRule] {
        self.rules.get(label).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn patterns(&self) -> impl Iterator<Item = &Pattern> {
        self.gauges.iter().chain(&self.rates)
    }

    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }
}

fn output_name(raw_name: &str, captures: &Captures<'_>) -> String {
    let groups: Vec<Option<&str>> = captures.iter().skip(1).map(|m| m.map(|m| m.as_str())).collect();
    if groups.iter().all(Option::is_none) {
        return normalize_metric_name(raw_name, &[]);
    }

    let groups: Vec<&str> = groups.into_iter().map(Option::unwrap_or_default).collect();
    normalize_metric_name(raw_name, &groups)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns(sources: &[&str]) -> Vec<Pattern> {
        sources.iter().map(|s| Pattern::new(*s).unwrap()).collect()
    }

    #[test]
    fn test_classify_without_captures() {
        let scope = Scope::new(&patterns(&["FilesystemUsage"]), &[], &OrderedMap::new());
        let spec = scope.classify("FilesystemUsage");
        assert_eq!(spec.kind, MetricKind::Gauge);
        assert_eq!(&*spec.output_name, "filesystem_usage");
    }

    #[test]
    fn test_classify_with_captures() {
        let scope = Scope::new(&patterns(&[r"(.*Usage)\.stats\.(total)"]), &[], &OrderedMap::new());
        let spec = scope.classify("DiskUsage.stats.total");
        assert_eq!(spec.kind, MetricKind::Gauge);
        assert_eq!(&*spec.output_name, "disk_usage_total");
    }

    #[test]
    fn test_gauges_take_precedence_over_rates() {
        let scope = Scope::new(&patterns(&["requests"]), &patterns(&["requests"]), &OrderedMap::new());
        assert_eq!(scope.classify("server_requests").kind, MetricKind::Gauge);
    }

    #[test]
    fn test_first_matching_pattern_wins() {
        let scope = Scope::new(&[], &patterns(&["io_(.*)", "io_(read)_(.*)"]), &OrderedMap::new());
        let spec = scope.classify("io_read_bytes");
        assert_eq!(spec.kind, MetricKind::Rate);
        assert_eq!(&*spec.output_name, "read_bytes");
    }

    #[test]
    fn test_unmatched_name_is_skip() {
        let scope = Scope::new(&patterns(&["^cpu"]), &[], &OrderedMap::new());
        let spec = scope.classify("MemoryUsage");
        assert!(spec.is_skip());
        assert_eq!(&*spec.output_name, "memory_usage");
    }

    #[test]
    fn test_non_participating_capture_contributes_nothing() {
        let scope = Scope::new(&patterns(&["(disk)|(net)_(.*)"]), &[], &OrderedMap::new());
        assert_eq!(&*scope.classify("disk").output_name, "disk");
        assert_eq!(&*scope.classify("net_rx").output_name, "net_rx");
    }

    #[test]
    fn test_rules_grouped_by_source_label() {
        let dimensions: OrderedMap<DimensionSpec> = [
            ("hostname", DimensionSpec::SourceKey("host".to_string())),
            ("node", DimensionSpec::SourceKey("host".to_string())),
            ("zone", DimensionSpec::SourceKey("zone".to_string())),
        ]
        .into_iter()
        .collect();

        let scope = Scope::new(&[], &[], &dimensions);
        let targets: Vec<_> = scope.rules_for("host").iter().map(DimensionRule::target).collect();
        assert_eq!(targets, ["hostname", "node"]);
        assert!(scope.rules_for("missing").is_empty());
        assert_eq!(scope.rule_count(), 3);
    }
}
