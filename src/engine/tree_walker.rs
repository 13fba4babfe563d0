use super::instance::ScopeId;
use super::{InstanceMapping, MetricMapper, PushOptions};
use crate::dimensions::{INDEX_LABEL, Labels};
use crate::metrics::{MetricSink, MetricTree};

const LOG_TARGET: &str = "      tree";

impl MetricMapper {
    /// Push every numeric leaf of a nested document
    ///
    /// Nested mappings are flattened into metric names joined with `_` (`{"server": {"requests": 12}}`
    /// yields `server_requests`), each leaf going through [`push_metric`](Self::push_metric).
    ///
    /// Elements of arrays must be told apart by their dimensions. Text attributes of an element
    /// that some dimension rule reads become labels; failing that, the element's position is
    /// added as the `index` label when `index` is mapped. Elements for which neither applies are
    /// skipped. Numeric array elements are only pushed when `index` is mapped, and arrays nested
    /// directly in arrays are not supported.
    ///
    /// Recursion stops at the `max_depth` of `options`, or of the instance when unset.
    pub fn push_metric_tree<S: MetricSink + ?Sized>(
        &self,
        state: &mut InstanceMapping,
        sink: &mut S,
        tree: &MetricTree,
        labels: &Labels,
        options: &PushOptions<'_>,
    ) {
        let MetricTree::Mapping(entries) = tree else {
            log::debug!(target: LOG_TARGET, "Instance '{}': ignoring metric document whose root is not a mapping", state.name());
            return;
        };

        let mut walker = TreeWalker {
            mapper: self,
            scope: state.scope_id(options.group),
            max_depth: options.max_depth.unwrap_or_else(|| state.max_depth()),
            state,
            sink,
            options,
        };

        walker.walk_mapping(entries, labels, 0, "", None);
    }
}

struct TreeWalker<'a, S: ?Sized> {
    mapper: &'a MetricMapper,
    state: &'a mut InstanceMapping,
    sink: &'a mut S,
    options: &'a PushOptions<'a>,

    /// Scope whose dimension rules decide which labels tell array elements apart
    scope: ScopeId,
    max_depth: usize,
}

impl<S: MetricSink + ?Sized> TreeWalker<'_, S> {
    fn walk_mapping(&mut self, entries: &[(String, MetricTree)], labels: &Labels, depth: usize, prefix: &str, index: Option<usize>) {
        let element_labels;
        let labels = match index {
            None => labels,
            Some(index) => {
                let Some(extended) = self.distinguishing_labels(entries, labels, index) else {
                    log::debug!(
                        target: LOG_TARGET,
                        "Skipping element {index} of '{}' for group {}: no mapped dimension tells it apart (at least 'index' should be mapped)",
                        prefix.trim_end_matches('_'),
                        self.group_display()
                    );
                    return;
                };
                element_labels = extended;
                &element_labels
            }
        };

        for (key, child) in entries {
            match child {
                MetricTree::Mapping(children) => {
                    if depth < self.max_depth {
                        self.walk_mapping(children, labels, depth + 1, &format!("{prefix}{key}_"), None);
                    } else {
                        self.log_depth_exceeded(prefix, key);
                    }
                }
                MetricTree::Number(value) => {
                    let _ = self
                        .mapper
                        .push_metric(self.state, self.sink, &format!("{prefix}{key}"), *value, labels, self.options);
                }
                MetricTree::Sequence(items) => self.walk_sequence(key, items, labels, depth, prefix),
                MetricTree::Text(_) | MetricTree::Other => {}
            }
        }
    }

    fn walk_sequence(&mut self, key: &str, items: &[MetricTree], labels: &Labels, depth: usize, prefix: &str) {
        for (position, item) in items.iter().enumerate() {
            match item {
                MetricTree::Mapping(children) => {
                    if depth < self.max_depth {
                        self.walk_mapping(children, labels, depth + 1, &format!("{prefix}{key}_"), Some(position));
                    } else {
                        self.log_depth_exceeded(prefix, key);
                    }
                }
                MetricTree::Number(value) => {
                    if self.is_index_mapped() {
                        let mut indexed = labels.clone();
                        let _ = indexed.insert(INDEX_LABEL.to_string(), position.to_string());
                        let _ = self
                            .mapper
                            .push_metric(self.state, self.sink, &format!("{prefix}{key}"), *value, &indexed, self.options);
                    } else {
                        log::debug!(
                            target: LOG_TARGET,
                            "Skipping numeric array '{prefix}{key}' for group {}: 'index' is not mapped",
                            self.group_display()
                        );
                    }
                }
                MetricTree::Sequence(_) => {
                    log::debug!(target: LOG_TARGET, "Nested arrays are not supported, skipping element {position} of '{prefix}{key}'");
                }
                MetricTree::Text(_) | MetricTree::Other => {}
            }
        }
    }

    /// Labels that tell an array element apart from its siblings, on top of `labels`
    fn distinguishing_labels(&self, entries: &[(String, MetricTree)], labels: &Labels, index: usize) -> Option<Labels> {
        let mut extended: Option<Labels> = None;

        for (key, child) in entries {
            if let MetricTree::Text(value) = child
                && self.state.rules_in(self.scope, key).next().is_some()
            {
                let _ = extended.get_or_insert_with(|| labels.clone()).insert(key.clone(), value.clone());
            }
        }

        if extended.is_none() && self.is_index_mapped() {
            let mut indexed = labels.clone();
            let _ = indexed.insert(INDEX_LABEL.to_string(), index.to_string());
            extended = Some(indexed);
        }

        extended
    }

    fn is_index_mapped(&self) -> bool {
        self.state.rules_in(self.scope, INDEX_LABEL).next().is_some()
    }

    fn group_display(&self) -> &str {
        self.options.group.unwrap_or("<root>")
    }

    fn log_depth_exceeded(&self, prefix: &str, key: &str) {
        log::warn!(
            target: LOG_TARGET,
            "Instance '{}': maximum depth {} reached at '{prefix}{key}', not descending further",
            self.state.name(),
            self.max_depth
        );
    }
}
