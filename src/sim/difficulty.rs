//! Level curves
//!
//! Pattern length grows by one per level up to the cap; highlight and
//! per-tile countdown time shrink linearly down to their floors.

use crate::settings::GameSettings;

/// Pattern length requested for `level` (1-based)
pub fn pattern_length(settings: &GameSettings, level: u32) -> usize {
    let grown = settings
        .starting_pattern_length
        .saturating_add(level.saturating_sub(1));
    grown.min(settings.max_pattern_length) as usize
}

/// Seconds each target stays lit during the reveal
pub fn highlight_duration(settings: &GameSettings, level: u32) -> f32 {
    let decay = level.saturating_sub(1) as f32 * settings.decrease_highlight_time_per_level;
    (settings.highlight_time - decay).max(settings.min_highlight_time)
}

/// Seconds of countdown granted per target in the pattern
pub fn time_per_target(settings: &GameSettings, level: u32) -> f32 {
    let reduction = level.saturating_sub(1) as f32 * settings.time_reduction_per_level;
    (settings.base_time_limit / 3.0 - reduction).max(settings.min_time_per_tile)
}

/// Total countdown for a pattern of `pattern_length` at `level`
pub fn countdown_limit(settings: &GameSettings, level: u32, pattern_length: usize) -> f32 {
    time_per_target(settings, level) * pattern_length as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_pattern_length_caps() {
        let settings = GameSettings::default();
        assert_eq!(pattern_length(&settings, 1), 3);
        assert_eq!(pattern_length(&settings, 2), 4);
        assert_eq!(pattern_length(&settings, 8), 10);
        assert_eq!(pattern_length(&settings, 9), 10);
        assert_eq!(pattern_length(&settings, u32::MAX), 10);
    }

    #[test]
    fn test_highlight_floor() {
        let settings = GameSettings::default();
        assert!((highlight_duration(&settings, 1) - 1.0).abs() < 1e-6);
        assert!((highlight_duration(&settings, 3) - 0.8).abs() < 1e-6);
        assert!((highlight_duration(&settings, 50) - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_countdown_limit_level_one() {
        let settings = GameSettings::default();
        // 10 / 3 per tile, three tiles
        assert!((countdown_limit(&settings, 1, 3) - 10.0).abs() < 1e-4);
        // Deep levels hit the 0.8 floor
        assert!((countdown_limit(&settings, 40, 10) - 8.0).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_pattern_length_formula(level in 1u32..500, start in 1u32..6, extra in 0u32..20) {
            let settings = GameSettings {
                starting_pattern_length: start,
                max_pattern_length: start + extra,
                ..Default::default()
            };
            let expected = (start + (level - 1)).min(start + extra) as usize;
            prop_assert_eq!(pattern_length(&settings, level), expected);
            prop_assert!(pattern_length(&settings, level + 1) >= pattern_length(&settings, level));
        }

        #[test]
        fn prop_highlight_non_increasing(level in 1u32..500) {
            let settings = GameSettings::default();
            let now = highlight_duration(&settings, level);
            let next = highlight_duration(&settings, level + 1);
            prop_assert!(next <= now);
            prop_assert!(now >= settings.min_highlight_time);
        }

        #[test]
        fn prop_countdown_limit_formula(level in 1u32..500, len in 0usize..20) {
            let settings = GameSettings::default();
            let per = (settings.base_time_limit / 3.0
                - (level - 1) as f32 * settings.time_reduction_per_level)
                .max(settings.min_time_per_tile);
            prop_assert!((countdown_limit(&settings, level, len) - per * len as f32).abs() < 1e-3);
        }
    }
}
