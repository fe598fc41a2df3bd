//! Prophecy game state definitions.

use serde::{Deserialize, Serialize};

use super::catalog::{create_upgrades, UpgradeEffect, UpgradeId};
use super::milestone::{PathChoice, PathKind};
use super::play_style::PlayStyleBonuses;

/// The four multiplicative blessing stats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlessingKind {
    Meditation,
    Prayer,
    Rituals,
    Wisdom,
}

impl BlessingKind {
    /// All blessings in display order.
    pub fn all() -> &'static [BlessingKind] {
        &[
            BlessingKind::Meditation,
            BlessingKind::Prayer,
            BlessingKind::Rituals,
            BlessingKind::Wisdom,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            BlessingKind::Meditation => "Meditation",
            BlessingKind::Prayer => "Prayer",
            BlessingKind::Rituals => "Rituals",
            BlessingKind::Wisdom => "Wisdom",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Blessings {
    pub meditation: f64,
    pub prayer: f64,
    pub rituals: f64,
    pub wisdom: f64,
}

impl Default for Blessings {
    fn default() -> Self {
        Self {
            meditation: 1.0,
            prayer: 1.0,
            rituals: 1.0,
            wisdom: 1.0,
        }
    }
}

impl Blessings {
    pub fn get(&self, kind: BlessingKind) -> f64 {
        match kind {
            BlessingKind::Meditation => self.meditation,
            BlessingKind::Prayer => self.prayer,
            BlessingKind::Rituals => self.rituals,
            BlessingKind::Wisdom => self.wisdom,
        }
    }

    pub fn get_mut(&mut self, kind: BlessingKind) -> &mut f64 {
        match kind {
            BlessingKind::Meditation => &mut self.meditation,
            BlessingKind::Prayer => &mut self.prayer,
            BlessingKind::Rituals => &mut self.rituals,
            BlessingKind::Wisdom => &mut self.wisdom,
        }
    }
}

/// Dynamic and milestone-granted modifiers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bonuses {
    /// Grows with every click, decays while idle. Floor 1.0.
    pub click_power: f64,
    /// Resets to 1.0 on every click, grows while idle.
    pub passive_gain: f64,
    pub idle_gain: f64,
    pub combo_gain: f64,
    pub blessing_effectiveness: f64,
    /// Multiplier on every upgrade price (1.0 = full price).
    pub upgrade_cost_reduction: f64,
    /// Play-style multipliers from the last attunement. They scale click
    /// value, passive value and prices but never the stats above, so
    /// attuning again replaces them instead of compounding.
    pub attunement: PlayStyleBonuses,
    /// Host timestamp (ms) of the most recent click.
    pub last_click_time: f64,
    pub consecutive_clicks: u32,
}

impl Bonuses {
    pub fn new(started_at_ms: f64) -> Self {
        Self {
            click_power: 1.0,
            passive_gain: 1.0,
            idle_gain: 0.0,
            combo_gain: 0.0,
            blessing_effectiveness: 1.0,
            upgrade_cost_reduction: 1.0,
            attunement: PlayStyleBonuses::default(),
            last_click_time: started_at_ms,
            consecutive_clicks: 0,
        }
    }

    /// Price multiplier actually charged: path discounts times attunement.
    pub fn cost_factor(&self) -> f64 {
        self.upgrade_cost_reduction * self.attunement.cost_factor()
    }
}

/// Milestone completions per path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedPaths {
    pub patience: u32,
    pub persistence: u32,
    pub piety: u32,
}

impl CompletedPaths {
    pub fn get(&self, kind: PathKind) -> u32 {
        match kind {
            PathKind::Patience => self.patience,
            PathKind::Persistence => self.persistence,
            PathKind::Piety => self.piety,
        }
    }

    pub fn increment(&mut self, kind: PathKind) {
        match kind {
            PathKind::Patience => self.patience += 1,
            PathKind::Persistence => self.persistence += 1,
            PathKind::Piety => self.piety += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.patience + self.persistence + self.piety
    }
}

/// A purchasable, levelled upgrade.
#[derive(Clone, Debug, PartialEq)]
pub struct Upgrade {
    pub id: UpgradeId,
    pub name: String,
    pub description: String,
    pub base_cost: f64,
    /// Undiscounted price of the next level.
    pub current_cost: f64,
    pub cost_scaling: f64,
    pub effect: UpgradeEffect,
    pub level: u32,
    /// Once true, never reverts.
    pub visible: bool,
    /// Progress percentage that reveals this upgrade.
    pub required_progress: Option<f64>,
    pub purchased: bool,
}

impl Upgrade {
    /// Price actually charged for the next level.
    pub fn effective_cost(&self, cost_reduction: f64) -> f64 {
        self.current_cost * cost_reduction
    }

    /// Price of the next level when `level` levels are owned.
    pub fn cost_at_level(&self, level: u32) -> f64 {
        let exponent = i32::try_from(level).unwrap_or(i32::MAX);
        self.base_cost * self.cost_scaling.powi(exponent)
    }
}

/// Log entry for the prophecy game.
#[derive(Clone, Debug)]
pub struct ProphecyLogEntry {
    pub text: String,
    pub is_important: bool,
}

/// Full state of a prophecy session.
pub struct GameState {
    /// Spendable energy.
    pub divine_energy: f64,
    /// Energy earned over the whole session (for stats).
    pub energy_all_time: f64,
    pub total_clicks: u64,
    /// Percentage toward the next milestone, in [0, 100].
    pub prophecy_progress: f64,
    pub blessings: Blessings,
    pub bonuses: Bonuses,
    pub upgrades: Vec<Upgrade>,
    pub completed_paths: CompletedPaths,
    /// Milestones resolved so far; drives the next requirement.
    pub completions: u32,
    /// Choices offered while a milestone waits for resolution.
    pub pending_milestone: Option<Vec<PathChoice>>,
    /// Message log.
    pub log: Vec<ProphecyLogEntry>,
}

impl GameState {
    pub fn new(started_at_ms: f64) -> Self {
        Self {
            divine_energy: 0.0,
            energy_all_time: 0.0,
            total_clicks: 0,
            prophecy_progress: 0.0,
            blessings: Blessings::default(),
            bonuses: Bonuses::new(started_at_ms),
            upgrades: create_upgrades(),
            completed_paths: CompletedPaths::default(),
            completions: 0,
            pending_milestone: None,
            log: vec![ProphecyLogEntry {
                text: "The flame awaits your devotion.".into(),
                is_important: true,
            }],
        }
    }

    pub fn upgrade_index(&self, id: UpgradeId) -> Option<usize> {
        self.upgrades.iter().position(|u| u.id == id)
    }

    pub fn upgrade(&self, id: UpgradeId) -> Option<&Upgrade> {
        self.upgrades.iter().find(|u| u.id == id)
    }

    pub fn visible_upgrades(&self) -> impl Iterator<Item = &Upgrade> {
        self.upgrades.iter().filter(|u| u.visible)
    }

    pub fn is_milestone_pending(&self) -> bool {
        self.pending_milestone.is_some()
    }

    pub fn add_log(&mut self, text: &str, is_important: bool) {
        self.log.push(ProphecyLogEntry {
            text: text.to_string(),
            is_important,
        });
        if self.log.len() > 50 {
            self.log.remove(0);
        }
    }
}
