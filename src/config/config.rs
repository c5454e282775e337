//! Fieldops configuration management
//! Handles loading and saving the config file

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::engine::AssignmentStrategy;
use crate::store::StatisticsMode;

/// Fieldops configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Load the demo users, clients and assignments at startup
    #[serde(default = "default_seed_demo_data")]
    pub seed_demo_data: bool,

    /// Simulated delays and timers
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Auto-assign behaviour
    #[serde(default)]
    pub assignment: AssignmentConfig,

    /// Statistics behaviour
    #[serde(default)]
    pub statistics: StatisticsConfig,
}

fn default_seed_demo_data() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed_demo_data: default_seed_demo_data(),
            simulation: SimulationConfig::default(),
            assignment: AssignmentConfig::default(),
            statistics: StatisticsConfig::default(),
        }
    }
}

/// Timings for the simulated real-time behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_auto_assign_delay_ms")]
    pub auto_assign_delay_ms: u64,
    #[serde(default = "default_upload_delay_ms")]
    pub upload_delay_ms: u64,
    #[serde(default = "default_refresh_delay_ms")]
    pub refresh_delay_ms: u64,
    /// How long a notification stays on screen
    #[serde(default = "default_notification_ttl_ms")]
    pub notification_ttl_ms: u64,
    #[serde(default = "default_activity_interval_ms")]
    pub activity_interval_ms: u64,
    /// Chance per tick that a random activity message shows up
    #[serde(default = "default_activity_probability")]
    pub activity_probability: f64,
    #[serde(default = "default_connection_interval_ms")]
    pub connection_interval_ms: u64,
    /// Chance per tick that the connection reads as up
    #[serde(default = "default_connection_uptime")]
    pub connection_uptime: f64,
}

fn default_auto_assign_delay_ms() -> u64 {
    1000
}

fn default_upload_delay_ms() -> u64 {
    2000
}

fn default_refresh_delay_ms() -> u64 {
    1000
}

fn default_notification_ttl_ms() -> u64 {
    5000
}

fn default_activity_interval_ms() -> u64 {
    10_000
}

fn default_activity_probability() -> f64 {
    0.05
}

fn default_connection_interval_ms() -> u64 {
    5000
}

fn default_connection_uptime() -> f64 {
    0.9
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            auto_assign_delay_ms: default_auto_assign_delay_ms(),
            upload_delay_ms: default_upload_delay_ms(),
            refresh_delay_ms: default_refresh_delay_ms(),
            notification_ttl_ms: default_notification_ttl_ms(),
            activity_interval_ms: default_activity_interval_ms(),
            activity_probability: default_activity_probability(),
            connection_interval_ms: default_connection_interval_ms(),
            connection_uptime: default_connection_uptime(),
        }
    }
}

impl SimulationConfig {
    pub fn auto_assign_delay(&self) -> Duration {
        Duration::from_millis(self.auto_assign_delay_ms)
    }

    pub fn upload_delay(&self) -> Duration {
        Duration::from_millis(self.upload_delay_ms)
    }

    pub fn refresh_delay(&self) -> Duration {
        Duration::from_millis(self.refresh_delay_ms)
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ttl_ms)
    }

    pub fn activity_interval(&self) -> Duration {
        Duration::from_millis(self.activity_interval_ms)
    }

    pub fn connection_interval(&self) -> Duration {
        Duration::from_millis(self.connection_interval_ms)
    }

    /// Both chances must be real probabilities
    pub fn validate(&self) -> Result<()> {
        check_probability("activity_probability", self.activity_probability)?;
        check_probability("connection_uptime", self.connection_uptime)?;
        Ok(())
    }
}

fn check_probability(name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        anyhow::bail!("simulation.{} must be between 0 and 1, got {}", name, value);
    }
    Ok(())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignmentConfig {
    #[serde(default)]
    pub strategy: AssignmentStrategy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatisticsConfig {
    #[serde(default)]
    pub mode: StatisticsMode,
}

impl Config {
    /// Load config from the default location or specified path
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = Self::config_path(path)?;

        if !config_path.exists() {
            info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Config::default();
            config.save(path)?;
            return Ok(config);
        }

        let raw = fs::read_to_string(&config_path).context("Failed to read config file")?;

        let config: Config = serde_yaml::from_str(&raw).context("Failed to parse config file")?;
        config
            .simulation
            .validate()
            .with_context(|| format!("Invalid config file {:?}", config_path))?;

        debug!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    /// Save config to the default location or specified path
    pub fn save(&self, path: Option<&str>) -> Result<()> {
        let config_path = Self::config_path(path)?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(&self)?;
        fs::write(&config_path, content).context("Failed to write config file")?;

        info!("Saved config to {:?}", config_path);
        Ok(())
    }

    /// Get the config file path
    pub fn config_path(path: Option<&str>) -> Result<PathBuf> {
        // Check env override first
        if let Ok(env_path) = std::env::var("FIELDOPS_CONFIG") {
            return Ok(PathBuf::from(env_path));
        }

        if let Some(p) = path {
            return Ok(PathBuf::from(p));
        }

        let home = dirs::home_dir().context("Cannot find home directory")?;
        Ok(home.join(".fieldops").join("config.yml"))
    }
}
