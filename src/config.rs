use std::{fs, path::Path};

use serde::Deserialize;

use crate::{CrewgraphError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// compiler config
    pub compile: CompileConfig,
    /// id generation config
    pub ids: IdsConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CompileConfig {
    /// class name of the generated crew, sanitized before use
    pub crew_name: String,
    /// path of the agents document, referenced by the scaffold
    pub agents_config: String,
    /// path of the tasks document, referenced by the scaffold
    pub tasks_config: String,
    /// verbose flag passed to every agent and the crew
    pub verbose: bool,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            crew_name: "GeneratedCrew".to_string(),
            agents_config: "config/agents.yaml".to_string(),
            tasks_config: "config/tasks.yaml".to_string(),
            verbose: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IdsConfig {
    /// id strategy
    pub strategy: IdStrategy,
    /// prefix of sequential ids
    pub prefix: String,
}

impl Default for IdsConfig {
    fn default() -> Self {
        Self {
            strategy: IdStrategy::default(),
            prefix: "node_".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    #[default]
    Sequential,
    Nanoid,
    Uuid,
}

impl Config {
    pub fn create<T: AsRef<Path>>(path: T) -> Result<Self> {
        let data = fs::read_to_string(path.as_ref()).map_err(|e| CrewgraphError::Config(format!("failed to load config file {:?}: {}", path.as_ref(), e)))?;

        Self::load_from_str(data.as_str())
    }

    pub fn load_from_str(toml_str: &str) -> Result<Self> {
        let config = toml::from_str::<Config>(toml_str)?;
        Ok(config)
    }
}
