//! Read-only view of a session, rebuilt after every engine call.

use serde::Serialize;

use super::catalog::UpgradeId;
use super::logic::{click_value, passive_value};
use super::milestone::PathKind;
use super::play_style::{PlayStyleBonuses, PlayStyleReading, PlayStyleTracker};
use super::state::{Blessings, CompletedPaths, GameState};
use super::tuning::Tuning;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BonusView {
    pub click_power: f64,
    pub max_click_power: f64,
    pub passive_gain: f64,
    pub max_passive_gain: f64,
    pub idle_gain: f64,
    pub combo_gain: f64,
    pub blessing_effectiveness: f64,
    pub upgrade_cost_reduction: f64,
    pub attunement: PlayStyleBonuses,
    /// Price multiplier actually charged.
    pub cost_factor: f64,
    pub consecutive_clicks: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UpgradeView {
    pub id: UpgradeId,
    pub name: String,
    pub description: String,
    pub level: u32,
    pub current_cost: f64,
    /// What a purchase would actually charge right now.
    pub effective_cost: f64,
    pub affordable: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChoiceView {
    pub kind: PathKind,
    pub title: String,
    pub level: u32,
    pub effects: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub divine_energy: f64,
    pub energy_all_time: f64,
    pub total_clicks: u64,
    pub prophecy_progress: f64,
    pub requirement: f64,
    pub completions: u32,
    pub blessings: Blessings,
    pub bonuses: BonusView,
    /// Energy the next click is worth at the current click power.
    pub click_value: f64,
    /// Energy per second once idle, at the current passive gain.
    pub passive_value: f64,
    /// Visible upgrades only, in catalog order.
    pub upgrades: Vec<UpgradeView>,
    pub milestone_pending: bool,
    pub milestone_choices: Vec<ChoiceView>,
    pub completed_paths: CompletedPaths,
    pub play_style: Option<PlayStyleReading>,
    pub play_style_advice: String,
}

impl Snapshot {
    pub fn capture(state: &GameState, tuning: &Tuning, tracker: &PlayStyleTracker) -> Self {
        let b = &state.bonuses;
        let cost_factor = b.cost_factor();

        let upgrades = state
            .visible_upgrades()
            .map(|u| {
                let effective_cost = u.effective_cost(cost_factor);
                UpgradeView {
                    id: u.id,
                    name: u.name.clone(),
                    description: u.description.clone(),
                    level: u.level,
                    current_cost: u.current_cost,
                    effective_cost,
                    affordable: state.divine_energy >= effective_cost,
                }
            })
            .collect();

        let milestone_choices = state
            .pending_milestone
            .iter()
            .flatten()
            .map(|c| ChoiceView {
                kind: c.kind,
                title: c.title().to_string(),
                level: c.level,
                effects: c.effect_descriptions(),
            })
            .collect();

        Self {
            divine_energy: state.divine_energy,
            energy_all_time: state.energy_all_time,
            total_clicks: state.total_clicks,
            prophecy_progress: state.prophecy_progress,
            requirement: tuning.requirement(state.completions),
            completions: state.completions,
            blessings: state.blessings.clone(),
            bonuses: BonusView {
                click_power: b.click_power,
                max_click_power: tuning.max_click_power(&state.completed_paths),
                passive_gain: b.passive_gain,
                max_passive_gain: tuning.max_passive_gain(&state.completed_paths),
                idle_gain: b.idle_gain,
                combo_gain: b.combo_gain,
                blessing_effectiveness: b.blessing_effectiveness,
                upgrade_cost_reduction: b.upgrade_cost_reduction,
                attunement: b.attunement,
                cost_factor,
                consecutive_clicks: b.consecutive_clicks,
            },
            click_value: click_value(state),
            passive_value: passive_value(state, tuning),
            upgrades,
            milestone_pending: state.is_milestone_pending(),
            milestone_choices,
            completed_paths: state.completed_paths.clone(),
            play_style: tracker.reading(),
            play_style_advice: tracker.advice(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
