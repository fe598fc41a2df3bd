//! Balance constants for the progression engine.
//!
//! Defaults are the shipped balance. A host may override any subset
//! from JSON; missing fields keep their defaults.

use serde::{Deserialize, Serialize};

use super::error::EngineError;
use super::state::CompletedPaths;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Click power cap before any Persistence completion.
    pub base_max_click_power: f64,
    /// Passive gain cap before any Patience completion.
    pub base_max_passive_gain: f64,
    /// Cap widening granted per completion of the matching path.
    pub cap_step_per_completion: f64,
    /// Floor for click power (and passive gain).
    pub min_click_power: f64,
    /// Additive click power gained per click.
    pub click_power_step: f64,
    /// Click power lost per second right after a click.
    pub base_decay_rate: f64,
    /// Decay rate multiplier applied once per `decay_interval_secs` of idling.
    pub decay_acceleration: f64,
    pub decay_interval_secs: f64,
    /// Passive gain added per idle second.
    pub passive_gain_rate: f64,
    /// Seconds without a click before passive accrual starts.
    pub passive_idle_threshold_secs: f64,
    pub passive_base_factor: f64,
    /// Energy needed for the first milestone.
    pub base_requirement: f64,
    /// Requirement multiplier per completed milestone.
    pub requirement_growth: f64,
    /// Maximum gap between clicks that still counts as a combo.
    pub combo_window_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_max_click_power: 10.0,
            base_max_passive_gain: 10.0,
            cap_step_per_completion: 10.0,
            min_click_power: 1.0,
            click_power_step: 0.5,
            base_decay_rate: 0.1,
            decay_acceleration: 2.0,
            decay_interval_secs: 5.0,
            passive_gain_rate: 0.2,
            passive_idle_threshold_secs: 1.0,
            passive_base_factor: 0.05,
            base_requirement: 100.0,
            requirement_growth: 1.5,
            combo_window_ms: 1000.0,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override of the defaults.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Click power cap, widened by every Persistence completion.
    pub fn max_click_power(&self, paths: &CompletedPaths) -> f64 {
        self.base_max_click_power + paths.persistence as f64 * self.cap_step_per_completion
    }

    /// Passive gain cap, widened by every Patience completion.
    pub fn max_passive_gain(&self, paths: &CompletedPaths) -> f64 {
        self.base_max_passive_gain + paths.patience as f64 * self.cap_step_per_completion
    }

    /// Energy required to fill the prophecy after `completions` milestones.
    pub fn requirement(&self, completions: u32) -> f64 {
        self.base_requirement * self.requirement_growth.powi(completions as i32)
    }
}
