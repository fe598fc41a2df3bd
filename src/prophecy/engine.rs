//! The progression engine: sole owner of a prophecy session's state.
//!
//! Hosts forward clicks, ticks and commands here and read back a
//! [`Snapshot`] after every call. All rules live in [`super::logic`]; this
//! type wires them to the play-style tracker and the log facade.

use log::{debug, info, warn};

use super::catalog::UpgradeId;
use super::error::EngineError;
use super::logic;
use super::milestone::PathKind;
use super::play_style::PlayStyleTracker;
use super::snapshot::Snapshot;
use super::state::GameState;
use super::tuning::Tuning;

pub struct ProgressionEngine {
    state: GameState,
    tuning: Tuning,
    play_style: PlayStyleTracker,
}

impl ProgressionEngine {
    /// Fresh session with the default balance, started at host time `now_ms`.
    pub fn new(now_ms: f64) -> Self {
        Self::with_tuning(Tuning::default(), now_ms)
    }

    pub fn with_tuning(tuning: Tuning, now_ms: f64) -> Self {
        Self {
            state: GameState::new(now_ms),
            tuning,
            play_style: PlayStyleTracker::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn play_style(&self) -> &PlayStyleTracker {
        &self.play_style
    }

    pub fn click_power_cap(&self) -> f64 {
        self.tuning.max_click_power(&self.state.completed_paths)
    }

    pub fn passive_gain_cap(&self) -> f64 {
        self.tuning.max_passive_gain(&self.state.completed_paths)
    }

    /// Energy needed to fill the current prophecy.
    pub fn requirement(&self) -> f64 {
        self.tuning.requirement(self.state.completions)
    }

    /// Manual click on the flame. Returns the energy gained.
    pub fn on_click(&mut self, now: f64) -> f64 {
        self.play_style.on_click(now);
        let was_pending = self.state.is_milestone_pending();
        let gained = logic::click(&mut self.state, &self.tuning, now);
        self.announce_milestone(was_pending);
        gained
    }

    /// Integrate one frame slice. Returns the passive energy gained.
    pub fn on_tick(&mut self, elapsed_seconds: f64, now: f64) -> f64 {
        let was_pending = self.state.is_milestone_pending();
        let gained = logic::tick(&mut self.state, &self.tuning, elapsed_seconds, now);
        self.announce_milestone(was_pending);
        gained
    }

    fn announce_milestone(&self, was_pending: bool) {
        if !was_pending && self.state.is_milestone_pending() {
            info!(
                "prophecy fulfilled after {} completions ({:.1} energy required)",
                self.state.completions,
                self.requirement()
            );
        }
    }

    /// Buy one level of `id`. Returns false (and changes nothing) when the
    /// discounted price is not affordable.
    pub fn purchase_upgrade(&mut self, id: UpgradeId) -> bool {
        if !logic::purchase_upgrade(&mut self.state, id) {
            debug!("cannot afford {} with {:.2} energy", id, self.state.divine_energy);
            return false;
        }
        self.play_style.on_upgrade_purchase(id);
        if let Some(u) = self.state.upgrade(id) {
            debug!(
                "bought {} level {}; next level costs {:.2}",
                id, u.level, u.current_cost
            );
        }
        true
    }

    /// String-keyed purchase for hosts that only know upgrade keys.
    pub fn purchase_upgrade_by_key(&mut self, key: &str) -> Result<bool, EngineError> {
        let id = key.parse::<UpgradeId>().map_err(|e| {
            warn!("rejected purchase: {}", e);
            e
        })?;
        Ok(self.purchase_upgrade(id))
    }

    /// Resolve the pending milestone with `kind`.
    pub fn choose_milestone_path(&mut self, kind: PathKind) -> Result<(), EngineError> {
        if let Err(e) = logic::choose_path(&mut self.state, kind) {
            warn!("rejected path choice {}: {}", kind, e);
            return Err(e);
        }
        logic::update_visibility(&mut self.state);
        info!(
            "{} chosen; {} completions, next prophecy needs {:.1} energy",
            kind.title(),
            self.state.completions,
            self.requirement()
        );
        debug!(
            "caps now click {:.1} / passive {:.1}",
            self.click_power_cap(),
            self.passive_gain_cap()
        );
        Ok(())
    }

    pub fn choose_milestone_path_by_key(&mut self, key: &str) -> Result<(), EngineError> {
        let kind = key.parse::<PathKind>().map_err(|e| {
            warn!("rejected path choice: {}", e);
            e
        })?;
        self.choose_milestone_path(kind)
    }

    /// Attune to the current play-style reading. The multipliers replace
    /// the previous attunement, so applying twice in a row changes nothing.
    /// Click power and passive gain stay inside their caps; the attunement
    /// scales click value, passive value and prices on top of them.
    pub fn apply_play_style_bonuses(&mut self) {
        let bonuses = self.play_style.bonuses();
        self.state.bonuses.attunement = bonuses;

        debug!(
            "play-style attunement: click x{:.3}, passive x{:.3}, efficiency x{:.3}",
            bonuses.click_power, bonuses.passive_gain, bonuses.resource_efficiency
        );
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state, &self.tuning, &self.play_style)
    }

    /// Start over, keeping the tuning.
    pub fn reset(&mut self, now: f64) {
        info!("prophecy reset after {} completions", self.state.completions);
        self.state = GameState::new(now);
        self.play_style = PlayStyleTracker::new();
    }
}
