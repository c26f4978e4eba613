use crate::{
    error::{SimError, SimResult},
    roster::{DEFAULT_OPERATOR_NAMES, ROSTER_SIZE},
    types::{Millis, Tick},
};
use serde::{Deserialize, Serialize};

/// Scheduling knobs for one session. Priority tables are fixed and live
/// on `Priority`; everything here is a cadence, a cap, or a gain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub operator_names: Vec<String>,
    pub generation: GenerationConfig,
    pub timeout: TimeoutConfig,
    /// Skill points granted on a successful resolution.
    pub skill_gain: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Ticks between generation rolls.
    pub interval_ticks: Tick,
    /// Chance a roll produces an emergency.
    pub probability: f64,
    /// No new emergency while this many are active or assigned.
    pub max_open: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Ticks between sweeps.
    pub sweep_interval_ticks: Tick,
    /// Unassigned emergencies older than this fail.
    pub max_unassigned_age_ms: Millis,
    /// Resolution time stamped on a timed-out emergency.
    pub resolution_secs: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            operator_names: DEFAULT_OPERATOR_NAMES.iter().map(|n| n.to_string()).collect(),
            generation: GenerationConfig::default(),
            timeout: TimeoutConfig::default(),
            skill_gain: 2,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            interval_ticks: 5,
            probability: 0.30,
            max_open: 8,
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            sweep_interval_ticks: 10,
            max_unassigned_age_ms: 60_000,
            resolution_secs: 60,
        }
    }
}

impl SimConfig {
    /// Load from the data/ directory. Missing keys fall back to defaults.
    /// In tests, use SimConfig::default().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/ops_center.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: SimConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.operator_names.len() != ROSTER_SIZE {
            return Err(SimError::Config(format!(
                "expected {ROSTER_SIZE} operator names, got {}",
                self.operator_names.len()
            )));
        }
        if self.generation.interval_ticks == 0 || self.timeout.sweep_interval_ticks == 0 {
            return Err(SimError::Config("intervals must be at least one tick".into()));
        }
        if !(0.0..=1.0).contains(&self.generation.probability) {
            return Err(SimError::Config(format!(
                "generation probability {} outside [0, 1]",
                self.generation.probability
            )));
        }
        Ok(())
    }
}
