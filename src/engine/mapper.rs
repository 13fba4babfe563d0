use super::{InstanceMapping, PushOptions, PushOutcome};
use crate::Result;
use crate::config::{CheckConfig, InitConfig, InstanceConfig, MappingConfig};
use crate::dimensions::{Dimensions, Labels};
use crate::metrics::{MetricKind, MetricSink};
use ohno::{EnrichableExt, bail};

const LOG_TARGET: &str = "    mapper";

/// Engine-wide settings plus the push entry points
///
/// The mapper itself holds no per-instance state: each monitored instance is compiled into an
/// [`InstanceMapping`] by [`configure`](Self::configure), and that state is passed back into
/// every push together with the sink that receives the measurements.
#[derive(Debug, Clone, Default)]
pub struct MetricMapper {
    prefix: Option<String>,
    default_mapping: Option<MappingConfig>,
}

impl MetricMapper {
    #[must_use]
    pub fn new(init_config: &InitConfig) -> Self {
        Self {
            prefix: init_config.prefix.clone().filter(|prefix| !prefix.is_empty()),
            default_mapping: init_config.default_mapping.clone(),
        }
    }

    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Compile the mapping of one instance
    ///
    /// Instances without a `mapping` block use the default mapping, if one is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the instance has no mapping and there is no default mapping, or if
    /// the mapping is invalid
    pub fn configure(&self, instance: &InstanceConfig) -> Result<InstanceMapping> {
        let Some(mapping) = instance.mapping.as_ref().or(self.default_mapping.as_ref()) else {
            bail!("instance '{}' is not supported: no 'mapping' element found", instance.name);
        };
        mapping
            .validate()
            .map_err(|e| e.enrich_with(|| format!("configuring instance '{}'", instance.name)))?;

        let state = InstanceMapping::new(&instance.name, instance.max_depth, mapping);
        log::info!(
            target: LOG_TARGET,
            "Configured instance '{}' with {} metric patterns in {} groups",
            instance.name,
            state.configured_metric_patterns().len(),
            mapping.groups.len()
        );

        Ok(state)
    }

    /// Compile the mapping of every instance of a check, in declaration order
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate, or for the first instance that
    /// cannot be configured
    pub fn configure_all(&self, config: &CheckConfig) -> Result<Vec<InstanceMapping>> {
        config.validate()?;
        config.instances.iter().map(|instance| self.configure(instance)).collect()
    }

    /// Push one measurement
    ///
    /// The group is resolved from the metric name unless `options` names one. Metrics that
    /// no pattern maps are [`PushOutcome::Unmapped`]; metrics whose labels are rejected by a
    /// dimension rule are [`PushOutcome::Filtered`]. Everything else reaches the sink under
    /// the name `[prefix.][group.]name`, with the fixed dimensions of `options` applied last.
    pub fn push_metric<S: MetricSink + ?Sized>(
        &self,
        state: &mut InstanceMapping,
        sink: &mut S,
        raw_name: &str,
        value: f64,
        labels: &Labels,
        options: &PushOptions<'_>,
    ) -> PushOutcome {
        let scope = match options.group {
            Some(group) => state.scope_id(Some(group)),
            None => state.resolve_scope(raw_name),
        };

        let spec = state.classify_in(raw_name, scope);
        if spec.is_skip() {
            return PushOutcome::Unmapped;
        }

        let name = self.qualified_name(state.group_name(scope), &spec.output_name);

        let no_defaults = Dimensions::new();
        let defaults = options.default_dimensions.unwrap_or(&no_defaults);
        let Some(mut dimensions) = state.map_dimensions_in(labels, scope, defaults) else {
            return PushOutcome::Filtered;
        };

        if let Some(fixed) = options.fixed_dimensions {
            dimensions.extend(fixed.clone());
        }

        log::debug!(target: LOG_TARGET, "Push {} {name} = {value} {dimensions:?}", spec.kind);

        match spec.kind {
            MetricKind::Gauge => sink.record_gauge(&name, value, &dimensions, options.timestamp),
            MetricKind::Rate => sink.record_rate(&name, value, &dimensions, options.timestamp),
            MetricKind::Skip => return PushOutcome::Unmapped,
        }

        PushOutcome::Emitted
    }

    fn qualified_name(&self, group: Option<&str>, name: &str) -> String {
        let mut qualified = String::with_capacity(name.len() + 32);

        for part in [self.prefix.as_deref(), group].into_iter().flatten() {
            qualified.push_str(part);
            qualified.push('.');
        }

        qualified.push_str(name);
        qualified
    }
}
