//! Combat Resolution
//!
//! Converts the groups produced by a move into damage, healing and
//! shields, then settles monster HP and the victory check.

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::config::{CombatConfig, RuneMatchConfig};
use crate::game::cascade::MatchResult;
use crate::game::matching::GroupKind;
use crate::game::state::{FeedbackColor, GameState, GameStatus, MonsterAnim, TextAnchor};

/// Base damage for a group of `rune_count` tiles.
///
/// Groups smaller than two deal nothing; five and above share the top
/// tier. Power-word groups are scaled by `power_multiplier`.
pub fn calculate_match_damage(config: &CombatConfig, rune_count: usize, is_power: bool) -> u32 {
    let base = match rune_count {
        0 | 1 => 0,
        2 => config.match2_damage,
        3 => config.match3_damage,
        4 => config.match4_damage,
        _ => config.match5_damage,
    };

    if is_power {
        base.saturating_mul(config.power_multiplier)
    } else {
        base
    }
}

/// Apply the outcome of one move to the session.
///
/// No-op unless the session is `Playing`. Groups are applied in the order
/// given, then one cascade bonus is added per distinct cascade level above
/// zero. `total_attempts` always advances by exactly one.
pub fn apply_match_result(state: &GameState, result: &MatchResult, config: &RuneMatchConfig) -> GameState {
    let mut next = state.clone();
    if !next.is_playing() {
        return next;
    }

    let combat = &config.combat;
    let text_ms = config.timing.floating_text_ms;
    let mut total_damage: u32 = 0;

    next.total_attempts += 1;

    for group in &result.groups {
        let Some(&first) = group.coords.first() else {
            continue;
        };
        let anchor = TextAnchor::Cell(first);

        match &group.kind {
            GroupKind::Vocabulary { word_id } => {
                let is_power = *word_id == state.power_word;
                if is_power {
                    next.correct_answers += 1;
                }

                let bonus = if group.is_special { combat.l_shape_bonus } else { 0 };
                let damage = calculate_match_damage(combat, group.len(), is_power).saturating_add(bonus);
                total_damage = total_damage.saturating_add(damage);

                let (text, color) = if is_power {
                    (format!("POWER! {damage}"), FeedbackColor::PowerDamage)
                } else {
                    (damage.to_string(), FeedbackColor::Damage)
                };
                next.push_text(text, anchor, color, text_ms);
            }
            GroupKind::Heal => {
                let amount = (group.len() as u32).saturating_mul(config.power_ups.heal_per_tile);
                next.player.hp = next.player.hp.saturating_add(amount).min(next.player.max_hp);
                next.push_text(format!("+{amount}"), anchor, FeedbackColor::Heal, text_ms);
            }
            GroupKind::Shield => {
                next.player.has_shield = true;
                next.push_text("SHIELD!", anchor, FeedbackColor::Shield, text_ms);
            }
        }
    }

    // Ascending cascade levels, each rewarded once
    let levels: BTreeSet<u32> = result.groups.iter().map(|g| g.cascade_index).collect();
    for level in levels.into_iter().filter(|&level| level > 0) {
        total_damage = total_damage.saturating_add(combat.cascade_bonus);
        next.push_text(
            format!("COMBO x{}!", level + 1),
            TextAnchor::Center,
            FeedbackColor::Combo,
            text_ms,
        );
    }

    next.grid = result.grid.clone();

    if total_damage > 0 {
        if let Some(monster) = next.monster.as_mut() {
            monster.hp = monster.hp.saturating_sub(total_damage);
            debug!(damage = total_damage, monster_hp = monster.hp, "monster hit");

            if monster.hp == 0 {
                info!(monster_type = ?monster.monster_type, attempts = next.total_attempts, "victory");
                next.status = GameStatus::Victory;
                next.monster_anim = MonsterAnim::Death;
                next.monster_anim_timer_ms = config.timing.death_anim_ms;
            } else {
                next.monster_anim = MonsterAnim::Hurt;
                next.monster_anim_timer_ms = config.timing.hurt_anim_ms;
            }
        }
    }

    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::DeterministicRng;
    use crate::game::grid::{initialize_empty_grid, GridPosition};
    use crate::game::matching::MatchGroup;
    use crate::game::sample_vocab;
    use crate::game::state::{create_game_state, select_monster, MonsterType};
    use proptest::prelude::*;

    fn playing_state(config: &RuneMatchConfig) -> GameState {
        let state = create_game_state(sample_vocab(), config, DeterministicRng::new(42)).unwrap();
        let mut state = select_monster(&state, MonsterType::Goblin, config);
        state.grid = initialize_empty_grid(&state.vocabulary, config).unwrap();
        state.power_word = "Moon".to_string();
        state
    }

    fn group(kind: GroupKind, cells: &[(usize, usize)], is_special: bool, cascade_index: u32) -> MatchGroup {
        MatchGroup {
            coords: cells.iter().map(|&(r, c)| GridPosition::new(r, c)).collect(),
            is_special,
            kind,
            cascade_index,
        }
    }

    fn word(word_id: &str) -> GroupKind {
        GroupKind::Vocabulary {
            word_id: word_id.to_string(),
        }
    }

    fn result_of(state: &GameState, groups: Vec<MatchGroup>) -> MatchResult {
        MatchResult {
            grid: state.grid.clone(),
            cascades: groups.iter().map(|g| g.cascade_index + 1).max().unwrap_or(0),
            groups,
        }
    }

    #[test]
    fn test_damage_tiers() {
        let config = CombatConfig::default();

        assert_eq!(calculate_match_damage(&config, 0, false), 0);
        assert_eq!(calculate_match_damage(&config, 1, true), 0);
        assert_eq!(calculate_match_damage(&config, 2, false), 3);
        assert_eq!(calculate_match_damage(&config, 3, false), 6);
        assert_eq!(calculate_match_damage(&config, 4, false), 10);
        assert_eq!(calculate_match_damage(&config, 5, false), 15);
        assert_eq!(calculate_match_damage(&config, 9, false), 15);
        assert_eq!(calculate_match_damage(&config, 3, true), 12);
    }

    #[test]
    fn test_two_tile_match_hits_goblin() {
        let config = RuneMatchConfig::default();
        let state = playing_state(&config);
        let result = result_of(&state, vec![group(word("Cat"), &[(5, 0), (5, 1)], false, 0)]);

        let next = apply_match_result(&state, &result, &config);
        assert_eq!(next.monster.as_ref().unwrap().hp, 47);
        assert_eq!(next.total_attempts, 1);
        assert_eq!(next.correct_answers, 0);
        assert_eq!(next.monster_anim, MonsterAnim::Hurt);
        assert_eq!(next.monster_anim_timer_ms, 500);

        let text = next.floating_texts.last().unwrap();
        assert_eq!(text.text, "3");
        assert_eq!(text.anchor, TextAnchor::Cell(GridPosition::new(5, 0)));

        // Input untouched
        assert_eq!(state.monster.as_ref().unwrap().hp, 50);
        assert_eq!(state.total_attempts, 0);
    }

    #[test]
    fn test_power_word_match() {
        let config = RuneMatchConfig::default();
        let state = playing_state(&config);
        let result = result_of(&state, vec![group(word("Moon"), &[(0, 0), (0, 1), (0, 2)], false, 0)]);

        let next = apply_match_result(&state, &result, &config);
        assert_eq!(next.monster.as_ref().unwrap().hp, 50 - 12);
        assert_eq!(next.correct_answers, 1);

        let text = next.floating_texts.last().unwrap();
        assert_eq!(text.text, "POWER! 12");
        assert_eq!(text.color, FeedbackColor::PowerDamage);
    }

    #[test]
    fn test_heal_clamps_to_max() {
        let config = RuneMatchConfig::default();
        let mut state = playing_state(&config);
        state.player.hp = 50;

        let result = result_of(&state, vec![group(GroupKind::Heal, &[(2, 2), (2, 3)], false, 0)]);
        let next = apply_match_result(&state, &result, &config);
        assert_eq!(next.player.hp, 60);
        assert!(next.floating_texts.iter().any(|t| t.text == "+10"));
        // Healing alone deals no damage
        assert_eq!(next.monster_anim, MonsterAnim::Idle);

        state.player.hp = 98;
        let next = apply_match_result(&state, &result, &config);
        assert_eq!(next.player.hp, 100);
    }

    #[test]
    fn test_shield_group() {
        let config = RuneMatchConfig::default();
        let state = playing_state(&config);
        let result = result_of(&state, vec![group(GroupKind::Shield, &[(1, 1), (2, 1)], false, 0)]);

        let next = apply_match_result(&state, &result, &config);
        assert!(next.player.has_shield);
        assert_eq!(next.floating_texts.last().unwrap().text, "SHIELD!");
    }

    #[test]
    fn test_special_bonus_and_combo() {
        let config = RuneMatchConfig::default();
        let state = playing_state(&config);
        let groups = vec![
            group(word("Cat"), &[(0, 0), (0, 1), (0, 2), (1, 0), (2, 0)], true, 0),
            group(word("Dog"), &[(4, 4), (4, 5)], false, 1),
            group(word("Sun"), &[(3, 3), (3, 4)], false, 2),
            group(word("Tree"), &[(5, 3), (5, 4)], false, 2),
        ];
        let result = result_of(&state, groups);

        let next = apply_match_result(&state, &result, &config);
        // 15 + 5, then three pairs, then two cascade bonuses
        assert_eq!(next.monster.as_ref().unwrap().hp, 50 - (20 + 9 + 4));

        let texts: Vec<&str> = next.floating_texts.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["20", "3", "3", "3", "COMBO x2!", "COMBO x3!"]);
        assert_eq!(next.floating_texts[4].anchor, TextAnchor::Center);
        assert_eq!(next.total_attempts, 1);
    }

    #[test]
    fn test_lethal_damage_wins() {
        let config = RuneMatchConfig::default();
        let mut state = playing_state(&config);
        state.monster.as_mut().unwrap().hp = 2;

        let result = result_of(&state, vec![group(word("Cat"), &[(5, 0), (5, 1)], false, 0)]);
        let next = apply_match_result(&state, &result, &config);

        assert_eq!(next.status, GameStatus::Victory);
        assert_eq!(next.monster.as_ref().unwrap().hp, 0);
        assert_eq!(next.monster_anim, MonsterAnim::Death);
        assert_eq!(next.monster_anim_timer_ms, 2000);

        // Terminal: further results are ignored
        let after = apply_match_result(&next, &result, &config);
        assert_eq!(after, next);
    }

    #[test]
    fn test_noop_outside_playing() {
        let config = RuneMatchConfig::default();
        let state = create_game_state(sample_vocab(), &config, DeterministicRng::new(1)).unwrap();
        let result = result_of(&state, vec![group(word("Cat"), &[(0, 0), (0, 1)], false, 0)]);

        assert_eq!(apply_match_result(&state, &result, &config), state);
    }

    #[test]
    fn test_empty_result_counts_attempt() {
        let config = RuneMatchConfig::default();
        let state = playing_state(&config);
        let next = apply_match_result(&state, &result_of(&state, Vec::new()), &config);

        assert_eq!(next.total_attempts, 1);
        assert_eq!(next.monster, state.monster);
        assert!(next.floating_texts.is_empty());
    }

    fn arb_group() -> impl Strategy<Value = MatchGroup> {
        (0usize..3, 2usize..8, any::<bool>(), 0u32..4).prop_map(|(kind, len, special, cascade)| {
            let kind = match kind {
                0 => word(["Cat", "Moon", "Dog"][len % 3]),
                1 => GroupKind::Heal,
                _ => GroupKind::Shield,
            };
            let cells: Vec<(usize, usize)> = (0..len).map(|i| (i % 6, i / 6)).collect();
            group(kind, &cells, special, cascade)
        })
    }

    proptest! {
        #[test]
        fn prop_damage_monotonic_and_scaled(n in 0usize..10) {
            let config = CombatConfig::default();
            prop_assert!(calculate_match_damage(&config, n, false) <= calculate_match_damage(&config, n + 1, false));
            prop_assert_eq!(
                calculate_match_damage(&config, n, true),
                config.power_multiplier * calculate_match_damage(&config, n, false)
            );
        }

        #[test]
        fn prop_apply_match_result_bounds(
            groups in proptest::collection::vec(arb_group(), 0..6),
            player_hp in 1u32..=100,
            monster_hp in 1u32..=50,
        ) {
            let config = RuneMatchConfig::default();
            let mut state = playing_state(&config);
            state.player.hp = player_hp;
            state.monster.as_mut().unwrap().hp = monster_hp;
            let before = state.clone();

            let result = result_of(&state, groups);
            let next = apply_match_result(&state, &result, &config);

            prop_assert_eq!(&state, &before);
            prop_assert!(next.player.hp <= next.player.max_hp);
            prop_assert!(next.player.hp >= player_hp);
            prop_assert!(next.monster.as_ref().unwrap().hp <= monster_hp);
            prop_assert_eq!(next.total_attempts, state.total_attempts + 1);
            prop_assert_eq!(
                next.status == GameStatus::Victory,
                next.monster.as_ref().unwrap().hp == 0
            );
        }
    }
}
