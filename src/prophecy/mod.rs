//! Prophecy Flame: an idle clicker built around a branching prophecy.

pub mod actions;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod logic;
pub mod milestone;
pub mod play_style;
pub mod render;
pub mod save;
pub mod snapshot;
pub mod state;
pub mod tuning;

#[cfg(test)]
mod simulator;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::input::{ClickState, InputEvent};
use crate::time::FrameClock;

use actions::*;
use engine::ProgressionEngine;
use milestone::PathKind;

pub struct ProphecyGame {
    pub engine: ProgressionEngine,
    clock: FrameClock,
    since_autosave: f64,
}

impl ProphecyGame {
    pub fn new(now_ms: f64) -> Self {
        Self::with_engine(ProgressionEngine::new(now_ms))
    }

    pub fn with_engine(engine: ProgressionEngine) -> Self {
        Self {
            engine,
            clock: FrameClock::new(),
            since_autosave: 0.0,
        }
    }

    /// Restore the last session from localStorage, or start fresh.
    #[cfg(target_arch = "wasm32")]
    pub fn restore(now_ms: f64) -> Self {
        let mut game = Self::new(now_ms);
        let tuning = game.engine.tuning().clone();
        if save::load_game(game.engine.state_mut(), &tuning, now_ms) {
            log::info!("restored saved prophecy");
        }
        game
    }

    /// Handle an input event at host time `now`. Returns true if consumed.
    pub fn handle_input(&mut self, event: &InputEvent, now: f64) -> bool {
        match event {
            InputEvent::Key(c) => self.handle_key(*c, now),
            InputEvent::Click(id) => self.handle_click(*id, now),
        }
    }

    fn handle_key(&mut self, key: char, now: f64) -> bool {
        let key = key.to_ascii_lowercase();
        // 保留中のマイルストーンがあれば x/y/z で道を選ぶ
        if self.engine.state().is_milestone_pending() {
            if let Some(idx) = PATH_KEYS.iter().position(|&k| k == key) {
                return self.choose_path(idx);
            }
        }
        match key {
            'c' | ' ' => {
                self.engine.on_click(now);
                true
            }
            '1'..='9' => self.buy_visible(key as usize - '1' as usize),
            '0' => self.buy_visible(9),
            'p' => {
                self.engine.apply_play_style_bonuses();
                true
            }
            'r' => {
                self.reset(now);
                true
            }
            _ => false,
        }
    }

    fn handle_click(&mut self, id: u16, now: f64) -> bool {
        match id {
            CLICK_FLAME => {
                self.engine.on_click(now);
                true
            }
            RESET => {
                self.reset(now);
                true
            }
            APPLY_PLAY_STYLE => {
                self.engine.apply_play_style_bonuses();
                true
            }
            id if (CHOOSE_PATH_BASE..CHOOSE_PATH_BASE + 3).contains(&id) => {
                self.choose_path((id - CHOOSE_PATH_BASE) as usize)
            }
            id if (BUY_UPGRADE_BASE..CHOOSE_PATH_BASE).contains(&id) => {
                self.buy_visible((id - BUY_UPGRADE_BASE) as usize)
            }
            _ => false,
        }
    }

    fn reset(&mut self, now: f64) {
        self.engine.reset(now);
        self.since_autosave = 0.0;
        #[cfg(target_arch = "wasm32")]
        save::delete_save();
    }

    /// Buy the `idx`-th visible upgrade, as listed on screen.
    fn buy_visible(&mut self, idx: usize) -> bool {
        let Some(id) = self.engine.state().visible_upgrades().nth(idx).map(|u| u.id) else {
            return false;
        };
        self.engine.purchase_upgrade(id);
        true
    }

    fn choose_path(&mut self, idx: usize) -> bool {
        let Some(&kind) = PathKind::all().get(idx) else {
            return false;
        };
        self.engine.choose_milestone_path(kind).is_ok()
    }

    /// Advance to host time `now`. Returns true when an autosave is due.
    pub fn tick(&mut self, now: f64) -> bool {
        let elapsed = self.clock.update(now);
        self.engine.on_tick(elapsed, now);

        // オートセーブ判定
        self.since_autosave += elapsed;
        if self.since_autosave >= save::AUTOSAVE_INTERVAL_SECS {
            self.since_autosave = 0.0;
            return true;
        }
        false
    }

    pub fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(&self.engine, f, area, click_state);
    }
}
