use super::Scope;
use crate::config::MappingConfig;
use crate::dimensions::{DimensionRule, Dimensions, Labels};
use crate::metrics::{MetricKind, MetricSpec};
use crate::names::normalize_metric_name;
use core::iter;
use rustc_hash::FxHashMap;

const LOG_TARGET: &str = "    engine";

/// Cache activity of one instance since it was configured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub classification_hits: u64,
    pub classification_misses: u64,
    pub group_hits: u64,
    pub group_misses: u64,
}

/// Identifies the scope a metric is evaluated in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScopeId {
    Global,
    Group(usize),

    /// A group name that the configuration does not declare
    Unknown,
}

#[derive(Debug, Clone)]
struct ScopeState {
    scope: Scope,
    classifications: FxHashMap<String, MetricSpec>,
}

impl ScopeState {
    fn new(scope: Scope) -> Self {
        Self {
            scope,
            classifications: FxHashMap::default(),
        }
    }
}

/// The compiled mapping of one monitored instance together with its lookup caches
///
/// Caches are filled lazily and never invalidated. An `InstanceMapping` is owned by whoever
/// drives the instance and is passed by mutable reference into every push; it is not meant to
/// be shared between concurrent callers.
#[derive(Debug, Clone)]
pub struct InstanceMapping {
    name: String,
    max_depth: usize,
    global: ScopeState,
    groups: Vec<(String, ScopeState)>,
    metric_groups: FxHashMap<String, ScopeId>,
    stats: CacheStats,
}

impl InstanceMapping {
    /// Compile the mapping of an instance
    #[must_use]
    pub fn new(name: impl Into<String>, max_depth: usize, mapping: &MappingConfig) -> Self {
        Self {
            name: name.into(),
            max_depth,
            global: ScopeState::new(Scope::global(mapping)),
            groups: mapping
                .groups
                .iter()
                .map(|(name, group)| (name.to_string(), ScopeState::new(Scope::group(group))))
                .collect(),
            metric_groups: FxHashMap::default(),
            stats: CacheStats::default(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    #[must_use]
    pub const fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Names of the configured groups, in declaration order
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(name, _)| name.as_str())
    }

    /// Find the group a raw metric name belongs to
    ///
    /// Groups are tried in declaration order and the global scope last; the first scope that
    /// does not classify the metric as skipped wins, and that binding is remembered. A name
    /// that matches in several groups therefore always lands in the first of them.
    /// Returns `None` for the global scope and for names that no scope maps.
    pub fn resolve_group(&mut self, raw_name: &str) -> Option<&str> {
        let id = self.resolve_scope(raw_name);
        self.group_name(id)
    }

    /// Classify a raw metric name within a group, or within the global scope for `None`
    pub fn classify(&mut self, raw_name: &str, group: Option<&str>) -> MetricSpec {
        let id = self.scope_id(group);
        self.classify_in(raw_name, id)
    }

    /// Whether a raw metric name is mapped to a gauge or a rate in the given scope
    pub fn is_enabled_metric(&mut self, raw_name: &str, group: Option<&str>) -> bool {
        !self.classify(raw_name, group).is_skip()
    }

    /// Turn input labels into output dimensions
    ///
    /// Starts from `defaults` and never overwrites a dimension that is already set. For each
    /// label the rules of `group` are applied before the global ones. Returns `None` when the
    /// measurement must be dropped because a rule rejected a label value.
    #[must_use]
    pub fn map_dimensions(&self, labels: &Labels, group: Option<&str>, defaults: &Dimensions) -> Option<Dimensions> {
        self.map_dimensions_in(labels, self.scope_id(group), defaults)
    }

    /// Whether any dimension rule in the given scope reads `label`
    #[must_use]
    pub fn has_dimension_rules(&self, label: &str, group: Option<&str>) -> bool {
        self.rules_in(self.scope_id(group), label).next().is_some()
    }

    /// All configured gauge and rate patterns: the global ones first, then each group's
    #[must_use]
    pub fn configured_metric_patterns(&self) -> Vec<&str> {
        iter::once(&self.global)
            .chain(self.groups.iter().map(|(_, state)| state))
            .flat_map(|state| state.scope.patterns())
            .map(|pattern| pattern.as_str())
            .collect()
    }

    /// The configured patterns as one alternation, for selecting metrics upstream
    #[must_use]
    pub fn name_filter(&self) -> String {
        self.configured_metric_patterns().join("|")
    }

    pub(crate) fn scope_id(&self, group: Option<&str>) -> ScopeId {
        match group {
            None | Some("") => ScopeId::Global,
            Some(group) => self
                .groups
                .iter()
                .position(|(name, _)| name == group)
                .map_or(ScopeId::Unknown, ScopeId::Group),
        }
    }

    pub(crate) fn group_name(&self, id: ScopeId) -> Option<&str> {
        match id {
            ScopeId::Group(index) => self.groups.get(index).map(|(name, _)| name.as_str()),
            ScopeId::Global | ScopeId::Unknown => None,
        }
    }

    pub(crate) fn resolve_scope(&mut self, raw_name: &str) -> ScopeId {
        if self.groups.is_empty() {
            return ScopeId::Global;
        }

        if let Some(&id) = self.metric_groups.get(raw_name) {
            self.stats.group_hits += 1;
            return id;
        }

        self.stats.group_misses += 1;

        let candidates: Vec<ScopeId> = (0..self.groups.len()).map(ScopeId::Group).chain(iter::once(ScopeId::Global)).collect();
        for id in candidates {
            if !self.classify_in(raw_name, id).is_skip() {
                log::debug!(
                    target: LOG_TARGET,
                    "Instance '{}': metric '{raw_name}' resolved to group '{}'",
                    self.name,
                    self.group_name(id).unwrap_or("<root>")
                );
                let _ = self.metric_groups.insert(raw_name.to_string(), id);
                return id;
            }
        }

        ScopeId::Global
    }

    pub(crate) fn classify_in(&mut self, raw_name: &str, id: ScopeId) -> MetricSpec {
        let state = match id {
            ScopeId::Global => Some(&mut self.global),
            ScopeId::Group(index) => self.groups.get_mut(index).map(|(_, state)| state),
            ScopeId::Unknown => None,
        };

        let Some(state) = state else {
            return MetricSpec::new(MetricKind::Skip, normalize_metric_name(raw_name, &[]));
        };

        if let Some(spec) = state.classifications.get(raw_name).cloned() {
            self.stats.classification_hits += 1;
            return spec;
        }

        let spec = state.scope.classify(raw_name);
        let _ = state.classifications.insert(raw_name.to_string(), spec.clone());
        self.stats.classification_misses += 1;
        spec
    }

    pub(crate) fn rules_in(&self, id: ScopeId, label: &str) -> impl Iterator<Item = &DimensionRule> {
        let group_rules = match id {
            ScopeId::Group(index) => self.groups.get(index).map(|(_, state)| state.scope.rules_for(label)),
            ScopeId::Global | ScopeId::Unknown => None,
        };

        group_rules.unwrap_or_default().iter().chain(self.global.scope.rules_for(label))
    }

    pub(crate) fn map_dimensions_in(&self, labels: &Labels, id: ScopeId, defaults: &Dimensions) -> Option<Dimensions> {
        let mut dimensions = defaults.clone();

        for (label, value) in labels {
            for rule in self.rules_in(id, label) {
                if dimensions.contains_key(rule.target()) {
                    continue;
                }

                match rule.map_value(value) {
                    Ok(Some(mapped)) => {
                        let _ = dimensions.insert(rule.target().to_string(), mapped);
                    }
                    Ok(None) => {
                        log::debug!(
                            target: LOG_TARGET,
                            "Instance '{}': {label}='{value}' does not match the rule for dimension '{}', dropping measurement",
                            self.name,
                            rule.target()
                        );
                        return None;
                    }
                    Err(e) => {
                        log::error!(
                            target: LOG_TARGET,
                            "Instance '{}': dimension '{}' could not be mapped from {label}='{value}': {e:#}",
                            self.name,
                            rule.target()
                        );
                        return None;
                    }
                }
            }
        }

        Some(dimensions)
    }
}
