//! Prophecy progression logic: pure functions over [`GameState`], fully testable.
//!
//! Timestamps are host milliseconds; `elapsed_seconds` slices are integrated
//! one at a time (forward Euler), so decay and growth never apply
//! retroactively across calls.

use super::catalog::UpgradeId;
use super::error::EngineError;
use super::milestone::{path_choices, PathKind};
use super::state::GameState;
use super::tuning::Tuning;

/// Energy granted by one click at the current click power.
pub fn click_value(state: &GameState) -> f64 {
    let b = &state.blessings;
    (b.meditation + b.prayer) / 2.0
        * state.bonuses.click_power
        * b.wisdom
        * state.bonuses.attunement.click_power
}

/// Energy per second while idling at the current passive gain.
pub fn passive_value(state: &GameState, tuning: &Tuning) -> f64 {
    let b = &state.blessings;
    (b.rituals + b.prayer) / 2.0
        * tuning.passive_base_factor
        * state.bonuses.passive_gain
        * b.wisdom
        * state.bonuses.attunement.passive_gain
}

/// Manual click at host time `now`. Returns the energy gained.
pub fn click(state: &mut GameState, tuning: &Tuning, now: f64) -> f64 {
    let since_previous = now - state.bonuses.last_click_time;
    state.bonuses.consecutive_clicks = if since_previous <= tuning.combo_window_ms {
        state.bonuses.consecutive_clicks + 1
    } else {
        1
    };
    state.bonuses.passive_gain = 1.0;
    state.bonuses.last_click_time = now;

    let cap = tuning.max_click_power(&state.completed_paths);
    if state.bonuses.click_power < cap {
        state.bonuses.click_power = (state.bonuses.click_power + tuning.click_power_step).min(cap);
    }

    let value = click_value(state);
    state.total_clicks += 1;
    add_energy(state, value);
    advance_progress(state, tuning, value);
    value
}

/// Advance the game by one `elapsed_seconds` slice ending at host time `now`.
/// Returns the passive energy gained during the slice.
pub fn tick(state: &mut GameState, tuning: &Tuning, elapsed_seconds: f64, now: f64) -> f64 {
    let elapsed = if elapsed_seconds.is_finite() {
        elapsed_seconds.max(0.0)
    } else {
        0.0
    };
    if elapsed == 0.0 {
        return 0.0;
    }
    let since_last_click = (now - state.bonuses.last_click_time) / 1000.0;

    // クリック力の減衰。放置時間が長いほど加速する
    if state.bonuses.click_power > tuning.min_click_power {
        let decay_rate = tuning.base_decay_rate
            * tuning
                .decay_acceleration
                .powf(since_last_click / tuning.decay_interval_secs);
        state.bonuses.click_power =
            (state.bonuses.click_power - decay_rate * elapsed).max(tuning.min_click_power);
    }

    // 放置が閾値を超えるまでパッシブは発生しない
    if since_last_click <= tuning.passive_idle_threshold_secs {
        return 0.0;
    }

    let cap = tuning.max_passive_gain(&state.completed_paths);
    state.bonuses.passive_gain = (state.bonuses.passive_gain + tuning.passive_gain_rate * elapsed).min(cap);

    let gained = passive_value(state, tuning) * elapsed;
    add_energy(state, gained);
    advance_progress(state, tuning, gained);
    gained
}

fn add_energy(state: &mut GameState, amount: f64) {
    state.divine_energy = (state.divine_energy + amount).min(f64::MAX);
    state.energy_all_time = (state.energy_all_time + amount).min(f64::MAX);
}

/// Convert gained energy into prophecy progress and open a milestone when it saturates.
fn advance_progress(state: &mut GameState, tuning: &Tuning, energy_gained: f64) {
    let requirement = tuning.requirement(state.completions);
    let gain = energy_gained / requirement * 100.0;
    state.prophecy_progress = (state.prophecy_progress + gain).min(100.0);

    update_visibility(state);

    if state.prophecy_progress >= 100.0 && state.pending_milestone.is_none() {
        state.pending_milestone = Some(path_choices(state.completions, tuning));
        state.add_log("✦ The prophecy is fulfilled! Choose your path.", true);
    }
}

/// Reveal every hidden upgrade whose progress threshold has been reached.
/// Returns how many upgrades became visible.
pub fn update_visibility(state: &mut GameState) -> usize {
    let progress = state.prophecy_progress;
    let mut revealed = Vec::new();
    for upgrade in &mut state.upgrades {
        if upgrade.visible {
            continue;
        }
        if let Some(required) = upgrade.required_progress {
            if progress >= required {
                upgrade.visible = true;
                revealed.push(upgrade.name.clone());
            }
        }
    }
    for name in &revealed {
        state.add_log(&format!("New upgrade revealed: {}", name), false);
    }
    revealed.len()
}

/// Try to buy one level of an upgrade. Returns true if successful.
pub fn purchase_upgrade(state: &mut GameState, id: UpgradeId) -> bool {
    let Some(idx) = state.upgrade_index(id) else {
        return false;
    };

    let cost = state.upgrades[idx].effective_cost(state.bonuses.cost_factor());
    if state.divine_energy < cost {
        return false;
    }

    state.divine_energy = (state.divine_energy - cost).max(0.0);
    let upgrade = &mut state.upgrades[idx];
    upgrade.effect.apply(&mut state.blessings);
    upgrade.level += 1;
    upgrade.purchased = true;
    upgrade.current_cost *= upgrade.cost_scaling;

    let text = format!("{} reaches level {}", upgrade.name, upgrade.level);
    state.add_log(&text, false);
    true
}

/// Resolve the pending milestone with the chosen path.
pub fn choose_path(state: &mut GameState, kind: PathKind) -> Result<(), EngineError> {
    let choices = state
        .pending_milestone
        .take()
        .ok_or(EngineError::NoMilestonePending)?;

    if let Some(choice) = choices.iter().find(|c| c.kind == kind) {
        for effect in &choice.effects {
            effect.apply(&mut state.bonuses);
        }
    }
    state.completed_paths.increment(kind);
    state.prophecy_progress = 0.0;
    state.completions += 1;

    state.add_log(
        &format!(
            "✦ {} chosen (level {})",
            kind.title(),
            state.completed_paths.get(kind)
        ),
        true,
    );
    Ok(())
}

/// 数値をカンマ区切りでフォーマット (例: 1234567 → "1,234,567")。
pub fn format_number(n: f64) -> String {
    if n < 0.0 {
        return format!("-{}", format_number(-n));
    }
    let int_part = n.floor() as u64;
    let frac = n - int_part as f64;

    let s = int_part.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    let result: String = result.chars().rev().collect();

    if frac > 0.05 && frac < 0.95 {
        format!("{}.{}", result, ((frac * 10.0).round() as u8))
    } else {
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> (GameState, Tuning) {
        (GameState::new(0.0), Tuning::default())
    }

    #[test]
    fn first_click_on_fresh_state() {
        let (mut state, t) = fresh();
        // Click power steps 1.0 → 1.5 before the value is computed.
        let value = click(&mut state, &t, 0.0);
        assert!((value - 1.5).abs() < 1e-9);
        assert!((state.divine_energy - 1.5).abs() < 1e-9);
        assert!((state.prophecy_progress - 1.5).abs() < 1e-9);
        assert_eq!(state.total_clicks, 1);
    }

    #[test]
    fn click_value_at_unit_power() {
        let (state, _) = fresh();
        // (1 + 1) / 2 * 1 * 1
        assert!((click_value(&state) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn unit_click_value_gives_one_percent() {
        let (mut state, t) = fresh();
        // Pin click power at the cap floor so the click is worth exactly 1.
        let mut tight = t.clone();
        tight.base_max_click_power = 1.0;
        click(&mut state, &tight, 0.0);
        assert!((state.bonuses.click_power - 1.0).abs() < 1e-9);
        assert!((state.divine_energy - 1.0).abs() < 1e-9);
        assert!((state.prophecy_progress - 1.0).abs() < 1e-9);
    }

    #[test]
    fn click_power_steps_by_half_up_to_cap() {
        let (mut state, t) = fresh();
        for i in 0..30 {
            click(&mut state, &t, i as f64 * 100.0);
        }
        assert!((state.bonuses.click_power - 10.0).abs() < 1e-9);
    }

    #[test]
    fn click_resets_passive_gain() {
        let (mut state, t) = fresh();
        state.bonuses.passive_gain = 7.3;
        click(&mut state, &t, 10.0);
        assert_eq!(state.bonuses.passive_gain, 1.0);
    }

    #[test]
    fn consecutive_clicks_track_combo_window() {
        let (mut state, t) = fresh();
        click(&mut state, &t, 100.0);
        click(&mut state, &t, 600.0);
        click(&mut state, &t, 1200.0);
        assert_eq!(state.bonuses.consecutive_clicks, 3);
        click(&mut state, &t, 5000.0);
        assert_eq!(state.bonuses.consecutive_clicks, 1);
    }

    #[test]
    fn tick_decays_click_power_exponentially() {
        let (mut state, t) = fresh();
        state.bonuses.click_power = 5.0;
        state.bonuses.last_click_time = 0.0;
        // 10s idle → rate = 0.1 * 2^(10/5) = 0.4; over 1s slice → -0.4
        tick(&mut state, &t, 1.0, 10_000.0);
        assert!((state.bonuses.click_power - 4.6).abs() < 1e-9);
    }

    #[test]
    fn decay_floors_at_one() {
        let (mut state, t) = fresh();
        state.bonuses.click_power = 3.0;
        tick(&mut state, &t, 1000.0, 60_000.0);
        assert!((state.bonuses.click_power - 1.0).abs() < 1e-9);
    }

    #[test]
    fn no_passive_within_a_second_of_clicking() {
        let (mut state, t) = fresh();
        click(&mut state, &t, 0.0);
        let energy = state.divine_energy;
        let gained = tick(&mut state, &t, 0.5, 500.0);
        assert!((gained - 0.0).abs() < 1e-12);
        assert!((state.divine_energy - energy).abs() < 1e-12);
        assert!((state.bonuses.passive_gain - 1.0).abs() < 1e-12);
    }

    #[test]
    fn passive_gain_grows_and_pays_out() {
        let (mut state, t) = fresh();
        // 2s since start (last click = 0), 1s slice: gain 1.0 → 1.2
        let gained = tick(&mut state, &t, 1.0, 2000.0);
        assert!((state.bonuses.passive_gain - 1.2).abs() < 1e-9);
        // (1 + 1) / 2 * 0.05 * 1.2 * 1 = 0.06 per second
        assert!((gained - 0.06).abs() < 1e-9);
        assert!((state.divine_energy - 0.06).abs() < 1e-9);
        assert!((state.prophecy_progress - 0.06).abs() < 1e-9);
    }

    #[test]
    fn passive_gain_capped() {
        let (mut state, t) = fresh();
        tick(&mut state, &t, 500.0, 600_000.0);
        assert!((state.bonuses.passive_gain - 10.0).abs() < 1e-9);
    }

    #[test]
    fn zero_and_negative_slices_are_ignored() {
        let (mut state, t) = fresh();
        state.bonuses.click_power = 4.0;
        assert_eq!(tick(&mut state, &t, 0.0, 1e12), 0.0);
        assert_eq!(tick(&mut state, &t, -3.0, 1e12), 0.0);
        assert_eq!(tick(&mut state, &t, f64::NAN, 1e12), 0.0);
        assert!((state.bonuses.click_power - 4.0).abs() < 1e-9);
    }

    #[test]
    fn huge_gap_stays_finite() {
        let (mut state, t) = fresh();
        state.bonuses.click_power = 8.0;
        tick(&mut state, &t, 1e9, 1e15);
        assert!(state.divine_energy.is_finite());
        assert!((state.bonuses.click_power - 1.0).abs() < 1e-9);
        assert!((state.prophecy_progress - 100.0).abs() < 1e-9);
        assert!(state.is_milestone_pending());
    }

    #[test]
    fn purchase_meditation_scenario() {
        let (mut state, _) = fresh();
        state.divine_energy = 20.0;
        assert!(purchase_upgrade(&mut state, UpgradeId::Meditation1));
        let u = state.upgrade(UpgradeId::Meditation1).unwrap();
        assert!((state.divine_energy - 5.0).abs() < 1e-9);
        assert!((state.blessings.meditation - 1.5).abs() < 1e-9);
        assert_eq!(u.level, 1);
        assert!(u.purchased);
        assert!((u.current_cost - 25.5).abs() < 1e-9);
    }

    #[test]
    fn purchase_without_funds_changes_nothing() {
        let (mut state, _) = fresh();
        state.divine_energy = 10.0;
        let before = state.upgrades.clone();
        assert!(!purchase_upgrade(&mut state, UpgradeId::Meditation1));
        assert!((state.divine_energy - 10.0).abs() < 1e-9);
        assert_eq!(state.upgrades, before);
        assert!((state.blessings.meditation - 1.0).abs() < 1e-9);
    }

    #[test]
    fn purchase_applies_cost_reduction() {
        let (mut state, _) = fresh();
        state.bonuses.upgrade_cost_reduction = 0.9;
        state.divine_energy = 14.0;
        assert!(purchase_upgrade(&mut state, UpgradeId::Meditation1));
        assert!((state.divine_energy - 0.5).abs() < 1e-9);
        // Undiscounted price still scales from the base
        let u = state.upgrade(UpgradeId::Meditation1).unwrap();
        assert!((u.current_cost - 25.5).abs() < 1e-9);
    }

    #[test]
    fn attunement_scales_values_and_prices() {
        let (mut state, tuning) = fresh();
        state.bonuses.attunement.click_power = 1.005;
        state.bonuses.attunement.passive_gain = 1.005;
        state.bonuses.attunement.resource_efficiency = 1.1;
        assert!((click_value(&state) - 1.005).abs() < 1e-9);
        assert!((passive_value(&state, &tuning) - 0.05 * 1.005).abs() < 1e-9);

        state.divine_energy = 14.0;
        assert!(purchase_upgrade(&mut state, UpgradeId::Meditation1));
        assert!((state.divine_energy - 0.5).abs() < 1e-9);
        // The stats themselves are untouched
        assert!((state.bonuses.click_power - 1.0).abs() < 1e-9);
        assert!((state.bonuses.upgrade_cost_reduction - 1.0).abs() < 1e-9);
    }

    #[test]
    fn repeated_purchases_follow_cost_law() {
        let (mut state, _) = fresh();
        state.divine_energy = 1e9;
        for _ in 0..5 {
            assert!(purchase_upgrade(&mut state, UpgradeId::PrayerCircle));
        }
        let u = state.upgrade(UpgradeId::PrayerCircle).unwrap();
        assert!((u.current_cost - 75.0 * 32.0).abs() < 1e-6);
        assert!((state.blessings.prayer - 1.1_f64.powi(5)).abs() < 1e-9);
    }

    #[test]
    fn visibility_reveals_at_threshold_and_sticks() {
        let (mut state, _) = fresh();
        state.prophecy_progress = 20.0;
        let revealed = update_visibility(&mut state);
        // prayer1 is already visible; only meditation_focus (20) qualifies
        assert_eq!(revealed, 1);
        assert!(state.upgrade(UpgradeId::MeditationFocus).unwrap().visible);
        assert!(!state.upgrade(UpgradeId::PrayerCircle).unwrap().visible);

        state.prophecy_progress = 0.0;
        update_visibility(&mut state);
        assert!(state.upgrade(UpgradeId::MeditationFocus).unwrap().visible);
    }

    #[test]
    fn reaching_one_hundred_opens_milestone() {
        let (mut state, t) = fresh();
        let mut tight = t.clone();
        tight.base_max_click_power = 1.0;
        state.prophecy_progress = 99.0;
        click(&mut state, &tight, 0.0);
        assert!((state.prophecy_progress - 100.0).abs() < 1e-9);
        let choices = state.pending_milestone.as_ref().unwrap();
        assert_eq!(choices.len(), 3);
        // every threshold is at or below 100
        assert!(state.upgrades.iter().all(|u| u.visible));
    }

    #[test]
    fn clicks_while_pending_accrue_energy_but_not_progress() {
        let (mut state, t) = fresh();
        state.prophecy_progress = 99.9;
        click(&mut state, &t, 0.0);
        assert!(state.is_milestone_pending());
        let energy = state.divine_energy;
        click(&mut state, &t, 100.0);
        assert!(state.divine_energy > energy);
        assert!((state.prophecy_progress - 100.0).abs() < 1e-9);
        assert_eq!(state.pending_milestone.as_ref().unwrap().len(), 3);
    }

    #[test]
    fn choosing_persistence_scenario() {
        let (mut state, t) = fresh();
        state.prophecy_progress = 99.9;
        click(&mut state, &t, 0.0);
        assert!(state.is_milestone_pending());

        choose_path(&mut state, PathKind::Persistence).unwrap();
        assert_eq!(state.completed_paths.persistence, 1);
        assert_eq!(state.completions, 1);
        assert!((state.prophecy_progress - 0.0).abs() < 1e-12);
        assert!((state.bonuses.combo_gain - 0.05).abs() < 1e-9);
        assert!(!state.is_milestone_pending());
        assert!((t.max_click_power(&state.completed_paths) - 20.0).abs() < 1e-9);

        // Click power can now climb past the old cap
        for i in 0..60 {
            click(&mut state, &t, 1000.0 + i as f64 * 50.0);
            if state.is_milestone_pending() {
                choose_path(&mut state, PathKind::Piety).unwrap();
            }
        }
        assert!((state.bonuses.click_power - 20.0).abs() < 1e-9);
    }

    #[test]
    fn requirement_rises_after_completion() {
        let (mut state, t) = fresh();
        state.prophecy_progress = 100.0;
        state.pending_milestone = Some(path_choices(0, &t));
        choose_path(&mut state, PathKind::Patience).unwrap();
        // 150 energy now needed: a unit click is worth 2/3 %
        let mut tight = t.clone();
        tight.base_max_click_power = 1.0;
        click(&mut state, &tight, 0.0);
        assert!((state.prophecy_progress - 100.0 / 150.0).abs() < 1e-9);
        assert!((state.bonuses.idle_gain - 0.05).abs() < 1e-9);
    }

    #[test]
    fn choosing_without_milestone_is_rejected() {
        let (mut state, _) = fresh();
        let result = choose_path(&mut state, PathKind::Piety);
        assert!(matches!(result, Err(EngineError::NoMilestonePending)));
        assert_eq!(state.completed_paths.total(), 0);
    }

    #[test]
    fn format_number_groups_thousands() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(1234567.0), "1,234,567");
        assert_eq!(format_number(12.5), "12.5");
        assert_eq!(format_number(-1500.0), "-1,500");
    }
}
