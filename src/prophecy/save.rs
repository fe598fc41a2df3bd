//! Prophecy のセーブ/ロード機能。
//!
//! ## バージョニング方針
//!
//! - `SAVE_VERSION`: 現在のセーブ形式。フィールド追加時にインクリメント。
//! - `MIN_COMPATIBLE_VERSION`: 読み込み可能な最古の形式。フィールドの削除や
//!   意味の変更など、破壊的変更のときだけ上げる。追加分はデフォルト値で埋まる。
//!
//! アップグレードはキーで保存するので、カタログの並び替えでセーブが壊れることはない。
//! 保留中のマイルストーン選択肢は保存しない。復元した進捗から作り直す。

#[cfg(any(target_arch = "wasm32", test))]
use serde::{Deserialize, Serialize};

#[cfg(any(target_arch = "wasm32", test))]
use super::catalog::UpgradeId;
#[cfg(any(target_arch = "wasm32", test))]
use super::milestone::path_choices;
#[cfg(any(target_arch = "wasm32", test))]
use super::play_style::PlayStyleBonuses;
#[cfg(any(target_arch = "wasm32", test))]
use super::state::{BlessingKind, Blessings, CompletedPaths, GameState};
#[cfg(any(target_arch = "wasm32", test))]
use super::tuning::Tuning;

/// セーブデータのバージョン。
#[cfg(any(target_arch = "wasm32", test))]
const SAVE_VERSION: u32 = 1;

/// 互換性のある最低バージョン。これ未満のセーブは破棄して新規開始。
#[cfg(any(target_arch = "wasm32", test))]
const MIN_COMPATIBLE_VERSION: u32 = 1;

/// ロード時のアップグレードレベル上限。改ざんされた巨大な値でもコストが有限に収まる。
#[cfg(any(target_arch = "wasm32", test))]
const MAX_UPGRADE_LEVEL: u32 = 500;

#[cfg(target_arch = "wasm32")]
const STORAGE_KEY: &str = "prophecy_flame_save";

/// オートセーブの間隔 (プレイ秒数)。
pub const AUTOSAVE_INTERVAL_SECS: f64 = 30.0;

/// シリアライズ用のセーブデータ構造体。
#[cfg(any(target_arch = "wasm32", test))]
#[derive(Serialize, Deserialize)]
struct SaveData {
    version: u32,
    game: GameSave,
}

#[cfg(any(target_arch = "wasm32", test))]
#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
struct GameSave {
    divine_energy: f64,
    energy_all_time: f64,
    total_clicks: u64,
    prophecy_progress: f64,
    blessings: Blessings,

    // ボーナス (プレイスタイルの同調は保存しない)
    click_power: f64,
    passive_gain: f64,
    idle_gain: f64,
    combo_gain: f64,
    blessing_effectiveness: f64,
    upgrade_cost_reduction: f64,

    /// 各アップグレードの購入状態。
    upgrades: Vec<UpgradeSave>,

    // マイルストーン
    completed_paths: CompletedPaths,
    completions: u32,
}

#[cfg(any(target_arch = "wasm32", test))]
#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
struct UpgradeSave {
    /// アップグレードのキー。未知のキーはロード時にスキップ。
    id: String,
    level: u32,
    visible: bool,
}

#[cfg(any(target_arch = "wasm32", test))]
fn extract_save(state: &GameState) -> SaveData {
    let b = &state.bonuses;
    SaveData {
        version: SAVE_VERSION,
        game: GameSave {
            divine_energy: state.divine_energy,
            energy_all_time: state.energy_all_time,
            total_clicks: state.total_clicks,
            prophecy_progress: state.prophecy_progress,
            blessings: state.blessings.clone(),
            click_power: b.click_power,
            passive_gain: b.passive_gain,
            idle_gain: b.idle_gain,
            combo_gain: b.combo_gain,
            blessing_effectiveness: b.blessing_effectiveness,
            upgrade_cost_reduction: b.upgrade_cost_reduction,
            upgrades: state
                .upgrades
                .iter()
                .map(|u| UpgradeSave {
                    id: u.id.key().to_string(),
                    level: u.level,
                    visible: u.visible,
                })
                .collect(),
            completed_paths: state.completed_paths.clone(),
            completions: state.completions,
        },
    }
}

#[cfg(any(target_arch = "wasm32", test))]
fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// セーブデータを `state` に復元する。各値はエンジンの不変条件の範囲に収める。
/// `now` が最終クリック時刻の基準になる。
#[cfg(any(target_arch = "wasm32", test))]
fn apply_save(state: &mut GameState, tuning: &Tuning, save: &GameSave, now: f64) {
    state.divine_energy = finite_or(save.divine_energy, 0.0).max(0.0);
    state.energy_all_time = finite_or(save.energy_all_time, 0.0).max(state.divine_energy);
    state.total_clicks = save.total_clicks;
    state.prophecy_progress = finite_or(save.prophecy_progress, 0.0).clamp(0.0, 100.0);

    state.blessings = save.blessings.clone();
    for &kind in BlessingKind::all() {
        let value = state.blessings.get_mut(kind);
        if !value.is_finite() || *value <= 0.0 {
            *value = 1.0;
        }
    }

    state.completed_paths = save.completed_paths.clone();
    state.completions = save.completions.max(save.completed_paths.total());

    let floor = tuning.min_click_power;
    let b = &mut state.bonuses;
    b.click_power = finite_or(save.click_power, floor)
        .clamp(floor, tuning.max_click_power(&state.completed_paths));
    b.passive_gain = finite_or(save.passive_gain, floor)
        .clamp(floor, tuning.max_passive_gain(&state.completed_paths));
    b.idle_gain = finite_or(save.idle_gain, 0.0);
    b.combo_gain = finite_or(save.combo_gain, 0.0);
    b.blessing_effectiveness = match save.blessing_effectiveness {
        v if v.is_finite() && v > 0.0 => v,
        _ => 1.0,
    };
    b.upgrade_cost_reduction = match save.upgrade_cost_reduction {
        v if v.is_finite() && v > 0.0 => v,
        _ => 1.0,
    };
    b.attunement = PlayStyleBonuses::default();
    b.last_click_time = now;
    b.consecutive_clicks = 0;

    for saved in &save.upgrades {
        let Ok(id) = saved.id.parse::<UpgradeId>() else {
            log::warn!("ignoring unknown upgrade {:?} in save", saved.id);
            continue;
        };
        let Some(idx) = state.upgrade_index(id) else {
            continue;
        };
        let level = saved.level.min(MAX_UPGRADE_LEVEL);
        let u = &mut state.upgrades[idx];
        u.level = level;
        u.purchased = level > 0;
        u.current_cost = u.cost_at_level(level);
        u.visible = u.visible || saved.visible;
    }

    // 進捗100%なら選択肢を作り直す
    state.pending_milestone = if state.prophecy_progress >= 100.0 {
        Some(path_choices(state.completions, tuning))
    } else {
        None
    };
}

#[cfg(target_arch = "wasm32")]
fn get_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// ゲーム状態を localStorage に保存する。失敗はログに出すだけ。
#[cfg(target_arch = "wasm32")]
pub fn save_game(state: &GameState) {
    let json = match serde_json::to_string(&extract_save(state)) {
        Ok(j) => j,
        Err(e) => {
            log::warn!("failed to serialize save: {e}");
            return;
        }
    };

    if let Some(storage) = get_storage() {
        if let Err(e) = storage.set_item(STORAGE_KEY, &json) {
            log::warn!("failed to write save to localStorage: {e:?}");
        }
    }
}

/// localStorage からゲーム状態を復元する。使えるセーブがなければ false (新規ゲーム)。
/// 壊れたセーブや古すぎるセーブは削除する。
#[cfg(target_arch = "wasm32")]
pub fn load_game(state: &mut GameState, tuning: &Tuning, now: f64) -> bool {
    let Some(storage) = get_storage() else {
        return false;
    };

    let json = match storage.get_item(STORAGE_KEY) {
        Ok(Some(j)) => j,
        _ => return false,
    };

    let save_data: SaveData = match serde_json::from_str(&json) {
        Ok(d) => d,
        Err(e) => {
            log::warn!("discarding unreadable save: {e}");
            let _ = storage.remove_item(STORAGE_KEY);
            return false;
        }
    };

    if save_data.version < MIN_COMPATIBLE_VERSION {
        log::info!(
            "save too old (saved={}, min_compatible={}); starting fresh",
            save_data.version,
            MIN_COMPATIBLE_VERSION
        );
        let _ = storage.remove_item(STORAGE_KEY);
        return false;
    }

    if save_data.version < SAVE_VERSION {
        log::info!(
            "migrating save (saved={}, current={})",
            save_data.version,
            SAVE_VERSION
        );
    }

    apply_save(state, tuning, &save_data.game, now);
    true
}

/// セーブデータを削除する (リセット時)。
#[cfg(target_arch = "wasm32")]
pub fn delete_save() {
    if let Some(storage) = get_storage() {
        let _ = storage.remove_item(STORAGE_KEY);
    }
}
