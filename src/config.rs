use std::path::{Path, PathBuf};

use anyhow::Context;
use figment::providers::{self, Format};
use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::{charset::CharsetCatalog, engine::Engine, swap::SwapError};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    charsets: CharsetCatalog,
    log_level: LogLevel,
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
struct LogLevel(LevelFilter);

impl TryFrom<String> for LogLevel {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse().map(Self).map_err(|_| {
            format!(
                "Invalid log level {value:?}, expected one of off, error, warn, info, debug, trace"
            )
        })
    }
}

impl From<LogLevel> for String {
    fn from(value: LogLevel) -> Self {
        value.0.as_str().to_lowercase()
    }
}

const DEFAULT_CONFIG: &str = include_str!("config_default.json");

const ENV_PREFIX: &str = "DELIM_SWAP_";

pub fn workspace_directory() -> anyhow::Result<PathBuf> {
    Ok(std::env::current_dir()?.join(".delim-swap"))
}

impl AppConfig {
    pub fn embedded() -> anyhow::Result<Self> {
        let deserializer = &mut serde_json::Deserializer::from_str(DEFAULT_CONFIG);
        serde_path_to_error::deserialize(deserializer)
            .map_err(|err| anyhow::anyhow!("{err}\n\nINPUT=\n\n{DEFAULT_CONFIG}"))
    }

    /// Layer, from lowest to highest precedence: the embedded defaults,
    /// `config.{json,yaml,toml}` in `workspace_dir`, the `explicit` file, and
    /// `DELIM_SWAP_` environment variables.
    pub fn load(workspace_dir: &Path, explicit: Option<&Path>) -> anyhow::Result<Self> {
        let workspace_config = |extension: &str| workspace_dir.join(format!("config.{extension}"));
        let mut figment =
            figment::Figment::from(providers::Serialized::defaults(AppConfig::embedded()?))
                .merge(providers::Json::file(workspace_config("json")))
                .merge(providers::Yaml::file(workspace_config("yaml")))
                .merge(providers::Toml::file(workspace_config("toml")));
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(anyhow::anyhow!(
                    "Config file {} does not exist",
                    path.display()
                ));
            }
            figment = match path.extension().and_then(|extension| extension.to_str()) {
                Some("json") => figment.merge(providers::Json::file(path)),
                Some("yaml" | "yml") => figment.merge(providers::Yaml::file(path)),
                Some("toml") => figment.merge(providers::Toml::file(path)),
                _ => {
                    return Err(anyhow::anyhow!(
                        "Unsupported config format {}, expected .json, .yaml or .toml",
                        path.display()
                    ))
                }
            };
        }
        let config: AppConfig = figment
            .merge(providers::Env::prefixed(ENV_PREFIX))
            .extract()
            .context("Failed to load config")?;
        log::debug!("AppConfig::load {config:?}");
        Ok(config)
    }

    pub fn load_from_current_directory(explicit: Option<&Path>) -> anyhow::Result<Self> {
        Self::load(&workspace_directory()?, explicit)
    }

    pub fn charsets(&self) -> &CharsetCatalog {
        &self.charsets
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level.0
    }

    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    pub fn engine(&self) -> Result<Engine, SwapError> {
        Engine::new(self.charsets.clone())
    }

    /// Send `log` records to the configured log file. Without one, logging
    /// stays disabled.
    pub fn init_logging(&self) -> anyhow::Result<()> {
        let Some(path) = self.log_file() else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        simple_logging::log_to_file(path, self.log_level())
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        Ok(())
    }
}
