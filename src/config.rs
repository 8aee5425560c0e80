use eyre::{Context, Result};
use reactloop::LoopConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub agent: AgentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub max_steps: usize,
    pub parse_retries: u32,
    /// Handlebars file replacing the built-in system prompt
    pub system_prompt_path: Option<PathBuf>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        let defaults = LoopConfig::default();
        Self {
            max_steps: defaults.max_steps,
            parse_retries: defaults.parse_retries,
            system_prompt_path: None,
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try primary location: ~/.config/<project>/<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        if let Some(config_dir) = dirs::config_dir() {
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Build the loop configuration, reading the prompt template if one is set
    pub fn loop_config(&self) -> Result<LoopConfig> {
        let mut loop_config = LoopConfig::default()
            .with_max_steps(self.agent.max_steps)
            .with_parse_retries(self.agent.parse_retries);

        if let Some(path) = &self.agent.system_prompt_path {
            let template = fs::read_to_string(path)
                .context(format!("Failed to read system prompt template {}", path.display()))?;
            loop_config = loop_config.with_system_template(template);
        }

        Ok(loop_config)
    }
}
