use crate::config::{validate_hook_config, HookConfig, RootConfig};
use anyhow::{bail, Context, Result};
use std::path::Path;

pub const CONFIG_FILE: &str = "linthook.toml";

pub struct ConfigLoader {
    root: RootConfig,
}

impl ConfigLoader {
    /// Load `linthook.toml` from `base_dir`. A missing file yields defaults.
    pub fn new(base_dir: &Path) -> Result<Self> {
        let config_path = base_dir.join(CONFIG_FILE);
        let root = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("failed to read {}", config_path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("failed to parse {}", config_path.display()))?
        } else {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            RootConfig::default()
        };

        let errors = validate_hook_config(&root.hook);
        if !errors.is_empty() {
            bail!(
                "invalid configuration in {}:\n  - {}",
                config_path.display(),
                errors.join("\n  - ")
            );
        }

        Ok(Self { root })
    }

    pub fn hook(&self) -> &HookConfig {
        &self.root.hook
    }
}
