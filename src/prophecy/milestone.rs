//! Milestone paths: the three branching choices offered whenever the
//! prophecy fills up.
//!
//! Each path carries a fixed pair of effects. The choice level is
//! informational and never changes effect magnitudes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::EngineError;
use super::state::Bonuses;
use super::tuning::Tuning;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathKind {
    Patience,
    Persistence,
    Piety,
}

impl PathKind {
    /// All paths in the order they are offered.
    pub fn all() -> &'static [PathKind] {
        &[PathKind::Patience, PathKind::Persistence, PathKind::Piety]
    }

    pub fn key(&self) -> &'static str {
        match self {
            PathKind::Patience => "patience",
            PathKind::Persistence => "persistence",
            PathKind::Piety => "piety",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            PathKind::Patience => "Path of Patience",
            PathKind::Persistence => "Path of Persistence",
            PathKind::Piety => "Path of Piety",
        }
    }
}

impl fmt::Display for PathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for PathKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PathKind::all()
            .iter()
            .copied()
            .find(|k| k.key() == s)
            .ok_or_else(|| EngineError::UnknownPath(s.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PathEffect {
    /// Passive gain cap widening. The cap is derived from Patience completions.
    RaisePassiveCap(f64),
    AddIdleGain(f64),
    /// Click power cap widening. The cap is derived from Persistence completions.
    RaiseClickCap(f64),
    AddComboGain(f64),
    ScaleBlessingEffectiveness(f64),
    ScaleUpgradeCost(f64),
}

impl PathEffect {
    pub fn description(&self) -> String {
        match self {
            PathEffect::RaisePassiveCap(n) => format!("Increase maximum passive bonus by {}", n),
            PathEffect::AddIdleGain(_) => "Energy builds up while idle".to_string(),
            PathEffect::RaiseClickCap(n) => format!("Increase maximum click power by {}", n),
            PathEffect::AddComboGain(_) => "Consecutive clicks give bonus energy".to_string(),
            PathEffect::ScaleBlessingEffectiveness(f) => {
                format!("All blessings {:.0}% more effective", (f - 1.0) * 100.0)
            }
            PathEffect::ScaleUpgradeCost(f) => {
                format!("Upgrade costs reduced by {:.0}%", (1.0 - f) * 100.0)
            }
        }
    }

    pub fn apply(&self, bonuses: &mut Bonuses) {
        match *self {
            // Caps follow the completed path counters.
            PathEffect::RaisePassiveCap(_) | PathEffect::RaiseClickCap(_) => {}
            PathEffect::AddIdleGain(n) => bonuses.idle_gain += n,
            PathEffect::AddComboGain(n) => bonuses.combo_gain += n,
            PathEffect::ScaleBlessingEffectiveness(f) => bonuses.blessing_effectiveness *= f,
            PathEffect::ScaleUpgradeCost(f) => bonuses.upgrade_cost_reduction *= f,
        }
    }
}

/// One of the three options presented at a milestone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathChoice {
    pub kind: PathKind,
    /// Completions + 1 at the time the choice was offered.
    pub level: u32,
    pub effects: Vec<PathEffect>,
}

impl PathChoice {
    pub fn title(&self) -> &'static str {
        self.kind.title()
    }

    pub fn effect_descriptions(&self) -> Vec<String> {
        self.effects.iter().map(PathEffect::description).collect()
    }
}

/// The three path choices offered after `completions` resolved milestones.
pub fn path_choices(completions: u32, tuning: &Tuning) -> Vec<PathChoice> {
    let level = completions + 1;
    let step = tuning.cap_step_per_completion;
    PathKind::all()
        .iter()
        .map(|&kind| {
            let effects = match kind {
                PathKind::Patience => vec![
                    PathEffect::RaisePassiveCap(step),
                    PathEffect::AddIdleGain(0.05),
                ],
                PathKind::Persistence => vec![
                    PathEffect::RaiseClickCap(step),
                    PathEffect::AddComboGain(0.05),
                ],
                PathKind::Piety => vec![
                    PathEffect::ScaleBlessingEffectiveness(1.25),
                    PathEffect::ScaleUpgradeCost(0.9),
                ],
            };
            PathChoice {
                kind,
                level,
                effects,
            }
        })
        .collect()
}
