//! Prophecy Flame, a terminal-style idle game for the browser.
//!
//! - `prophecy`: progression engine, catalog, saves, and the UI
//! - `input`: tap and key normalization plus click-target hit testing
//! - `widgets`: clickable line lists
//! - `time`: frame clock

pub mod input;
pub mod prophecy;
pub mod time;
pub mod widgets;

pub use prophecy::engine::ProgressionEngine;
pub use prophecy::ProphecyGame;
