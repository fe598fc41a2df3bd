//! Balance simulator for Prophecy Flame.
//! Run with: cargo test simulate_ -- --nocapture

#[cfg(test)]
mod tests {
    use crate::prophecy::catalog::UpgradeId;
    use crate::prophecy::engine::ProgressionEngine;
    use crate::prophecy::logic::format_number;
    use crate::prophecy::milestone::PathKind;

    /// Frame length of the simulated host (ms).
    const FRAME_MS: f64 = 100.0;

    /// Cheapest affordable visible upgrade, if any.
    fn cheapest_affordable(engine: &ProgressionEngine) -> Option<UpgradeId> {
        let snap = engine.snapshot();
        snap.upgrades
            .iter()
            .filter(|u| u.affordable)
            .min_by(|a, b| a.effective_cost.total_cmp(&b.effective_cost))
            .map(|u| u.id)
    }

    fn report(engine: &ProgressionEngine, seconds: u32, purchases: u32) {
        let snap = engine.snapshot();
        eprintln!(
            "[{:>4}s] energy {:>12} | progress {:>5.1}% of {:>9} | prophecies {:>2} | click {:>4.1}/{:<3} | passive {:>4.1} | buys {}",
            seconds,
            format_number(snap.divine_energy.floor()),
            snap.prophecy_progress,
            format_number(snap.requirement),
            snap.completions,
            snap.bonuses.click_power,
            snap.bonuses.max_click_power,
            snap.bonuses.passive_gain,
            purchases,
        );
    }

    /// Simulate `total_seconds` of play. The player clicks every
    /// `click_every_ms`, buys greedily, and cycles through the paths.
    fn simulate(total_seconds: u32, click_every_ms: Option<f64>) -> ProgressionEngine {
        let mut engine = ProgressionEngine::new(0.0);
        let mut purchases = 0u32;
        let mut next_click = 0.0;
        let mut now = 0.0;
        let frames = (total_seconds as f64 * 1000.0 / FRAME_MS) as u64;

        for frame in 1..=frames {
            now = frame as f64 * FRAME_MS;

            if let Some(interval) = click_every_ms {
                while next_click <= now {
                    engine.on_click(next_click);
                    next_click += interval;
                }
            }
            engine.on_tick(FRAME_MS / 1000.0, now);

            if engine.state().is_milestone_pending() {
                let kinds = PathKind::all();
                let kind = kinds[engine.state().completions as usize % kinds.len()];
                engine
                    .choose_milestone_path(kind)
                    .expect("milestone was pending");
            }

            while let Some(id) = cheapest_affordable(&engine) {
                assert!(engine.purchase_upgrade(id));
                purchases += 1;
            }

            if frame % 600 == 0 {
                report(&engine, (now / 1000.0) as u32, purchases);
            }

            let s = engine.state();
            assert!(s.divine_energy.is_finite() && s.divine_energy >= 0.0);
            assert!(s.prophecy_progress >= 0.0 && s.prophecy_progress <= 100.0);
        }

        eprintln!("=== final ===");
        report(&engine, (now / 1000.0) as u32, purchases);
        engine
    }

    #[test]
    fn simulate_active_player_10min() {
        let engine = simulate(600, Some(200.0));
        assert!(
            engine.state().completions >= 3,
            "only {} prophecies in 10 minutes",
            engine.state().completions
        );
        assert!(engine.state().upgrades.iter().any(|u| u.level > 0));
    }

    #[test]
    fn simulate_idle_player_10min() {
        // Never clicks: only passive accrual after the first idle second.
        let engine = simulate(600, None);
        let s = engine.state();
        assert!(s.divine_energy > 0.0 || s.upgrades.iter().any(|u| u.level > 0));
        assert!((s.bonuses.click_power - 1.0).abs() < 1e-9);
    }
}
