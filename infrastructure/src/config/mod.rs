//! Configuration loading.
//!
//! Merges, lowest priority first: built-in defaults, `courier.toml` in
//! the working directory, an explicit config path, and `COURIER_*`
//! environment variables (double underscore separates sections, e.g.
//! `COURIER_RUN__MAX_TURNS=5`).

use std::path::Path;
use std::time::Duration;

use courier_application::RunLimits;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

/// Root configuration file shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourierConfig {
    #[serde(default)]
    pub run: RunSection,
}

/// `[run]` section: the limits applied to each orchestration run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSection {
    pub max_turns: usize,
    pub time_budget_secs: u64,
    pub tool_timeout_secs: u64,
    pub stream_read_timeout_secs: u64,
    pub cancel_grace_ms: u64,
    pub max_tool_result_len: usize,
}

impl Default for RunSection {
    fn default() -> Self {
        let limits = RunLimits::default();
        Self {
            max_turns: limits.max_turns,
            time_budget_secs: limits.time_budget.as_secs(),
            tool_timeout_secs: limits.tool_timeout.as_secs(),
            stream_read_timeout_secs: limits.stream_read_timeout.as_secs(),
            cancel_grace_ms: limits.cancel_grace.as_millis() as u64,
            max_tool_result_len: limits.max_tool_result_len,
        }
    }
}

impl CourierConfig {
    /// Convert the `[run]` section into orchestrator limits.
    pub fn run_limits(&self) -> RunLimits {
        RunLimits::default()
            .with_max_turns(self.run.max_turns)
            .with_time_budget(Duration::from_secs(self.run.time_budget_secs))
            .with_tool_timeout(Duration::from_secs(self.run.tool_timeout_secs))
            .with_stream_read_timeout(Duration::from_secs(self.run.stream_read_timeout_secs))
            .with_cancel_grace(Duration::from_millis(self.run.cancel_grace_ms))
            .with_max_tool_result_len(self.run.max_tool_result_len)
    }
}

/// Configuration loader with multi-source merging.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources.
    pub fn load(config_path: Option<&Path>) -> Result<CourierConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(CourierConfig::default()));

        let project = Path::new("courier.toml");
        if project.exists() {
            figment = figment.merge(Toml::file(project));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("COURIER_").split("__"));

        Self::extract(figment)
    }

    /// Load only the built-in defaults.
    pub fn load_defaults() -> CourierConfig {
        CourierConfig::default()
    }

    fn extract(figment: Figment) -> Result<CourierConfig, Box<figment::Error>> {
        figment.extract().map_err(Box::new)
    }
}
