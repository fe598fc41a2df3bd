//! The static upgrade catalog.
//!
//! Effects are declarative descriptors interpreted against the blessings,
//! so every definition can be serialized and compared in tests. Applying an
//! effect twice stacks it: one application per purchased level.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::EngineError;
use super::state::{BlessingKind, Blessings, Upgrade};

// ── Upgrade identifiers ─────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeId {
    Meditation1,
    MeditationFocus,
    Prayer1,
    PrayerCircle,
    Ritual1,
    RitualMastery,
    Wisdom1,
    WisdomSynergy,
    MeditationRitual,
    PrayerWisdom,
}

impl UpgradeId {
    /// Stable string key used by hosts and save files.
    pub fn key(&self) -> &'static str {
        match self {
            UpgradeId::Meditation1 => "meditation1",
            UpgradeId::MeditationFocus => "meditation_focus",
            UpgradeId::Prayer1 => "prayer1",
            UpgradeId::PrayerCircle => "prayer_circle",
            UpgradeId::Ritual1 => "ritual1",
            UpgradeId::RitualMastery => "ritual_mastery",
            UpgradeId::Wisdom1 => "wisdom1",
            UpgradeId::WisdomSynergy => "wisdom_synergy",
            UpgradeId::MeditationRitual => "meditation_ritual",
            UpgradeId::PrayerWisdom => "prayer_wisdom",
        }
    }

    pub fn tier(&self) -> UpgradeTier {
        match self {
            UpgradeId::Meditation1 | UpgradeId::Prayer1 | UpgradeId::Ritual1 | UpgradeId::Wisdom1 => {
                UpgradeTier::Blessing
            }
            UpgradeId::MeditationFocus
            | UpgradeId::PrayerCircle
            | UpgradeId::RitualMastery
            | UpgradeId::WisdomSynergy => UpgradeTier::Multiplier,
            UpgradeId::MeditationRitual | UpgradeId::PrayerWisdom => UpgradeTier::Synergy,
        }
    }
}

impl fmt::Display for UpgradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for UpgradeId {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CATALOG
            .iter()
            .map(|def| def.id)
            .find(|id| id.key() == s)
            .ok_or_else(|| EngineError::UnknownUpgrade(s.to_string()))
    }
}

/// Catalog grouping: flat blessing boosts, gated multipliers, cross-blessing synergies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpgradeTier {
    Blessing,
    Multiplier,
    Synergy,
}

// ── Effects ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum UpgradeEffect {
    /// `blessing += amount`
    AddBlessing { blessing: BlessingKind, amount: f64 },
    /// `blessing *= factor`
    ScaleBlessing { blessing: BlessingKind, factor: f64 },
    /// Both blessings `*= factor`.
    ScaleBlessingPair {
        first: BlessingKind,
        second: BlessingKind,
        factor: f64,
    },
    /// `wisdom += ratio * (meditation + prayer + rituals)`
    WisdomSynergy { ratio: f64 },
}

impl UpgradeEffect {
    /// Apply one level of this effect.
    pub fn apply(&self, blessings: &mut Blessings) {
        match *self {
            UpgradeEffect::AddBlessing { blessing, amount } => {
                *blessings.get_mut(blessing) += amount;
            }
            UpgradeEffect::ScaleBlessing { blessing, factor } => {
                *blessings.get_mut(blessing) *= factor;
            }
            UpgradeEffect::ScaleBlessingPair {
                first,
                second,
                factor,
            } => {
                *blessings.get_mut(first) *= factor;
                *blessings.get_mut(second) *= factor;
            }
            UpgradeEffect::WisdomSynergy { ratio } => {
                let others = blessings.meditation + blessings.prayer + blessings.rituals;
                blessings.wisdom += others * ratio;
            }
        }
    }
}

// ── Definitions ─────────────────────────────────────────────────────

pub struct UpgradeDef {
    pub id: UpgradeId,
    pub name: &'static str,
    pub description: &'static str,
    pub base_cost: f64,
    pub cost_scaling: f64,
    pub visible: bool,
    pub required_progress: Option<f64>,
    pub effect: UpgradeEffect,
}

impl UpgradeDef {
    /// Fresh, unpurchased instance of this definition.
    pub fn instantiate(&self) -> Upgrade {
        Upgrade {
            id: self.id,
            name: self.name.to_string(),
            description: self.description.to_string(),
            base_cost: self.base_cost,
            current_cost: self.base_cost,
            cost_scaling: self.cost_scaling,
            effect: self.effect.clone(),
            level: 0,
            visible: self.visible,
            required_progress: self.required_progress,
            purchased: false,
        }
    }
}

static CATALOG: &[UpgradeDef] = &[
    // ── Meditation ──────────────────────────────────────────────
    UpgradeDef {
        id: UpgradeId::Meditation1,
        name: "Enhanced Meditation",
        description: "Increase your meditation blessing power by 0.5",
        base_cost: 15.0,
        cost_scaling: 1.7,
        visible: true,
        required_progress: None,
        effect: UpgradeEffect::AddBlessing {
            blessing: BlessingKind::Meditation,
            amount: 0.5,
        },
    },
    UpgradeDef {
        id: UpgradeId::MeditationFocus,
        name: "Deep Focus",
        description: "Meditation is 25% more effective",
        base_cost: 50.0,
        cost_scaling: 2.0,
        visible: false,
        required_progress: Some(20.0),
        effect: UpgradeEffect::ScaleBlessing {
            blessing: BlessingKind::Meditation,
            factor: 1.25,
        },
    },
    // ── Prayer ──────────────────────────────────────────────────
    UpgradeDef {
        id: UpgradeId::Prayer1,
        name: "Group Prayer",
        description: "Increase your prayer blessing power by 0.5",
        base_cost: 35.0,
        cost_scaling: 1.8,
        visible: true,
        required_progress: Some(15.0),
        effect: UpgradeEffect::AddBlessing {
            blessing: BlessingKind::Prayer,
            amount: 0.5,
        },
    },
    UpgradeDef {
        id: UpgradeId::PrayerCircle,
        name: "Prayer Circle",
        description: "Prayer affects both active and passive gains 10% more",
        base_cost: 75.0,
        cost_scaling: 2.0,
        visible: false,
        required_progress: Some(30.0),
        effect: UpgradeEffect::ScaleBlessing {
            blessing: BlessingKind::Prayer,
            factor: 1.1,
        },
    },
    // ── Rituals ─────────────────────────────────────────────────
    UpgradeDef {
        id: UpgradeId::Ritual1,
        name: "Ancient Rituals",
        description: "Increase your ritual blessing power by 0.5",
        base_cost: 75.0,
        cost_scaling: 1.9,
        visible: false,
        required_progress: Some(35.0),
        effect: UpgradeEffect::AddBlessing {
            blessing: BlessingKind::Rituals,
            amount: 0.5,
        },
    },
    UpgradeDef {
        id: UpgradeId::RitualMastery,
        name: "Ritual Mastery",
        description: "Rituals are 20% more powerful",
        base_cost: 150.0,
        cost_scaling: 2.1,
        visible: false,
        required_progress: Some(45.0),
        effect: UpgradeEffect::ScaleBlessing {
            blessing: BlessingKind::Rituals,
            factor: 1.2,
        },
    },
    // ── Wisdom ──────────────────────────────────────────────────
    UpgradeDef {
        id: UpgradeId::Wisdom1,
        name: "Divine Wisdom",
        description: "Increase your wisdom blessing power by 0.5",
        base_cost: 150.0,
        cost_scaling: 2.1,
        visible: false,
        required_progress: Some(65.0),
        effect: UpgradeEffect::AddBlessing {
            blessing: BlessingKind::Wisdom,
            amount: 0.5,
        },
    },
    UpgradeDef {
        id: UpgradeId::WisdomSynergy,
        name: "Wisdom Synergy",
        description: "Wisdom increases based on other blessing levels",
        base_cost: 300.0,
        cost_scaling: 2.5,
        visible: false,
        required_progress: Some(80.0),
        effect: UpgradeEffect::WisdomSynergy { ratio: 0.1 },
    },
    // ── Synergies ───────────────────────────────────────────────
    UpgradeDef {
        id: UpgradeId::MeditationRitual,
        name: "Meditative Rituals",
        description: "Meditation and Rituals boost each other by 10%",
        base_cost: 200.0,
        cost_scaling: 2.2,
        visible: false,
        required_progress: Some(50.0),
        effect: UpgradeEffect::ScaleBlessingPair {
            first: BlessingKind::Meditation,
            second: BlessingKind::Rituals,
            factor: 1.1,
        },
    },
    UpgradeDef {
        id: UpgradeId::PrayerWisdom,
        name: "Sacred Knowledge",
        description: "Prayer and Wisdom enhance each other by 15%",
        base_cost: 250.0,
        cost_scaling: 2.3,
        visible: false,
        required_progress: Some(70.0),
        effect: UpgradeEffect::ScaleBlessingPair {
            first: BlessingKind::Prayer,
            second: BlessingKind::Wisdom,
            factor: 1.15,
        },
    },
];

/// Returns the full catalogue of upgrade definitions.
pub fn all_upgrades() -> &'static [UpgradeDef] {
    CATALOG
}

/// Fresh upgrade instances in catalog order.
pub fn create_upgrades() -> Vec<Upgrade> {
    CATALOG.iter().map(UpgradeDef::instantiate).collect()
}
