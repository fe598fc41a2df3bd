//! Play-style classification from click rhythm and upgrade variety.
//!
//! Purely observational: the engine feeds it clicks and purchases, and the
//! host may ask for the resulting (heavily attenuated) bonus.

use std::collections::{BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use super::catalog::UpgradeId;

/// Intervals kept for the rolling average.
const INTERVAL_WINDOW: usize = 100;
/// Clicks closer together than this count as a burst (ms).
const BURST_THRESHOLD_MS: f64 = 300.0;
/// Idle gaps longer than this suggest a patient player (ms).
const IDLE_THRESHOLD_MS: f64 = 5000.0;
/// Gaps of a day or more are breaks, not idling.
const MAX_IDLE_MS: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayStyle {
    Patient,
    Active,
    Strategic,
}

impl PlayStyle {
    pub fn name(&self) -> &'static str {
        match self {
            PlayStyle::Patient => "patient",
            PlayStyle::Active => "active",
            PlayStyle::Strategic => "strategic",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PlayStyleReading {
    pub style: PlayStyle,
    /// Normalized weight of the dominant style, in (0, 1].
    pub strength: f64,
    /// `1 + strength / 2`: at most 1.5.
    pub multiplier: f64,
}

/// Multipliers derived from the dominant style, already attenuated.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayStyleBonuses {
    pub click_power: f64,
    pub passive_gain: f64,
    pub resource_efficiency: f64,
}

impl PlayStyleBonuses {
    /// Factor on every upgrade price: efficiency 1.1 pays 90%.
    pub fn cost_factor(&self) -> f64 {
        2.0 - self.resource_efficiency
    }
}

impl Default for PlayStyleBonuses {
    fn default() -> Self {
        Self {
            click_power: 1.0,
            passive_gain: 1.0,
            resource_efficiency: 1.0,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PlayStyleTracker {
    last_click_time: Option<f64>,
    intervals: VecDeque<f64>,
    average_interval: f64,
    burst_count: u32,
    longest_idle: f64,
    upgrade_types: BTreeSet<UpgradeId>,
}

impl PlayStyleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a click. The first click only sets the reference time.
    pub fn on_click(&mut self, timestamp: f64) {
        let Some(previous) = self.last_click_time.replace(timestamp) else {
            return;
        };
        let interval = timestamp - previous;

        self.intervals.push_back(interval);
        if self.intervals.len() > INTERVAL_WINDOW {
            self.intervals.pop_front();
        }
        self.average_interval = self.intervals.iter().sum::<f64>() / self.intervals.len() as f64;

        if interval < BURST_THRESHOLD_MS {
            self.burst_count += 1;
        }
        if interval > self.longest_idle && interval < MAX_IDLE_MS {
            self.longest_idle = interval;
        }
    }

    pub fn on_upgrade_purchase(&mut self, id: UpgradeId) {
        self.upgrade_types.insert(id);
    }

    pub fn average_interval(&self) -> f64 {
        self.average_interval
    }

    pub fn burst_count(&self) -> u32 {
        self.burst_count
    }

    pub fn longest_idle(&self) -> f64 {
        self.longest_idle
    }

    pub fn distinct_upgrades(&self) -> usize {
        self.upgrade_types.len()
    }

    /// Normalized weights in `[patient, active, strategic]` order, or `None`
    /// while no indicator has fired yet.
    pub fn weights(&self) -> Option<[(PlayStyle, f64); 3]> {
        let mut patient = 0.0;
        let mut active = 0.0;
        let mut strategic = 0.0;

        if self.average_interval > 1000.0 {
            patient += 0.3;
        }
        if self.longest_idle > IDLE_THRESHOLD_MS {
            patient += 0.2;
        }

        if self.burst_count > 50 {
            active += 0.3;
        }
        // An empty window has no rhythm to judge.
        if !self.intervals.is_empty() && self.average_interval < 500.0 {
            active += 0.2;
        }

        if self.upgrade_types.len() > 2 {
            strategic += 0.3;
        }

        let total = patient + active + strategic;
        if total <= 0.0 {
            return None;
        }
        Some([
            (PlayStyle::Patient, patient / total),
            (PlayStyle::Active, active / total),
            (PlayStyle::Strategic, strategic / total),
        ])
    }

    /// Dominant style. Ties resolve to the later style in weight order.
    pub fn reading(&self) -> Option<PlayStyleReading> {
        let weights = self.weights()?;
        let (style, strength) = weights
            .iter()
            .copied()
            .reduce(|best, next| if best.1 > next.1 { best } else { next })?;
        Some(PlayStyleReading {
            style,
            strength,
            multiplier: 1.0 + strength * 0.5,
        })
    }

    pub fn bonuses(&self) -> PlayStyleBonuses {
        let mut bonuses = PlayStyleBonuses::default();
        let Some(reading) = self.reading() else {
            return bonuses;
        };
        let extra = reading.multiplier - 1.0;
        match reading.style {
            PlayStyle::Patient => bonuses.passive_gain *= 1.0 + extra * 0.01,
            PlayStyle::Active => bonuses.click_power *= 1.0 + extra * 0.01,
            PlayStyle::Strategic => bonuses.resource_efficiency *= 1.0 + extra * 0.2,
        }
        bonuses
    }

    pub fn advice(&self) -> String {
        let Some(reading) = self.reading() else {
            return "Still analyzing your playstyle...".to_string();
        };
        let affinity = ((reading.multiplier - 1.0) * 200.0).floor();
        match reading.style {
            PlayStyle::Patient => format!(
                "You show a patient playstyle ({}% affinity). Your passive gains are boosted!",
                affinity
            ),
            PlayStyle::Active => format!(
                "You show an active playstyle ({}% affinity). Your clicks are more powerful!",
                affinity
            ),
            PlayStyle::Strategic => format!(
                "You show a strategic playstyle ({}% affinity). Your resources are more efficient!",
                affinity
            ),
        }
    }
}
