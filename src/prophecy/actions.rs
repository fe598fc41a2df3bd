//! Semantic action IDs for Prophecy Flame click targets.
//!
//! Registered during render and dispatched via `InputEvent::Click`.

// ── Core actions ────────────────────────────────────────────────
pub const CLICK_FLAME: u16 = 0;
pub const RESET: u16 = 1;
pub const APPLY_PLAY_STYLE: u16 = 2;

// ── Upgrade purchase (base + visible index) ─────────────────────
pub const BUY_UPGRADE_BASE: u16 = 100;

// ── Milestone overlay (base + path index) ───────────────────────
pub const CHOOSE_PATH_BASE: u16 = 200;

/// Overlay keys, one per path. None of them is bound outside the overlay,
/// so a click burst can never pick a path by accident.
pub const PATH_KEYS: [char; 3] = ['x', 'y', 'z'];
