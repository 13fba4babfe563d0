use super::{InstanceConfig, MappingConfig};
use crate::Result;
use camino::Utf8Path;
use ohno::{EnrichableExt, IntoAppError, app_err, bail};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fs;

/// Configuration of one check: engine-wide settings plus the monitored instances
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CheckConfig {
    #[serde(default)]
    pub init_config: InitConfig,

    #[serde(default)]
    pub instances: Vec<InstanceConfig>,
}

/// Engine-wide settings shared by all instances of a check
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InitConfig {
    /// Dotted prefix put in front of every output metric name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    /// Mapping used by instances that do not declare their own `mapping` block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_mapping: Option<MappingConfig>,
}

impl CheckConfig {
    /// Load a check configuration from a YAML, TOML or JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the configuration is inconsistent
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let text = fs::read_to_string(path).into_app_err_with(|| format!("reading check configuration from {path}"))?;

        let extension = path.extension().unwrap_or_default();
        let config: Self = match extension {
            "yml" | "yaml" => serde_yaml::from_str(&text).into_app_err_with(|| format!("parsing YAML configuration from {path}"))?,
            "toml" => toml::from_str(&text).into_app_err_with(|| format!("parsing TOML configuration from {path}"))?,
            "json" => serde_json::from_str(&text).into_app_err_with(|| format!("parsing JSON configuration from {path}"))?,
            _ => return Err(app_err!("unsupported configuration file extension: {extension}")),
        };

        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a YAML, TOML or JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save(&self, output_path: &Utf8Path) -> Result<()> {
        let extension = output_path.extension().unwrap_or_default();
        let text = match extension {
            "yml" | "yaml" => serde_yaml::to_string(self)
                .into_app_err_with(|| format!("serializing configuration to YAML for saving to {output_path}"))?,
            "toml" => toml::to_string_pretty(self)
                .into_app_err_with(|| format!("serializing configuration to TOML for saving to {output_path}"))?,
            "json" => serde_json::to_string_pretty(self)
                .into_app_err_with(|| format!("serializing configuration to JSON for saving to {output_path}"))?,
            _ => return Err(app_err!("unsupported configuration file extension: {extension}")),
        };

        fs::write(output_path, text).into_app_err_with(|| format!("writing configuration to {output_path}"))?;
        Ok(())
    }

    /// Find an instance by name
    #[must_use]
    pub fn instance(&self, name: &str) -> Option<&InstanceConfig> {
        self.instances.iter().find(|instance| instance.name == name)
    }

    /// Check structural consistency that serde cannot express
    ///
    /// # Errors
    ///
    /// Returns an error for unnamed or duplicate instances and for unnamed groups
    pub fn validate(&self) -> Result<()> {
        let mut seen = FxHashSet::default();

        for instance in &self.instances {
            if instance.name.is_empty() {
                bail!("every instance needs a non-empty 'name'");
            }

            if !seen.insert(instance.name.as_str()) {
                bail!("instance '{}' is declared more than once", instance.name);
            }

            if let Some(mapping) = &instance.mapping {
                mapping.validate().map_err(|e| e.enrich_with(|| format!("validating mapping of instance '{}'", instance.name)))?;
            }
        }

        if let Some(mapping) = &self.init_config.default_mapping {
            mapping.validate().map_err(|e| e.enrich("validating the default mapping"))?;
        }

        Ok(())
    }
}
