//! Time Advancement
//!
//! Per-frame update driven by the host's render loop. Ages animations and
//! feedback, and fires the monster's attack on a fixed interval.

use tracing::{debug, info};

use crate::config::RuneMatchConfig;
use crate::core::rng::RandomSource;
use crate::game::state::{FeedbackColor, GameState, GameStatus, MonsterAnim, TextAnchor};

/// Advance the session by `delta_ms` milliseconds.
///
/// No-op unless the session is `Playing`. At most one attack fires per
/// call; the attack timer keeps the remainder of the interval.
pub fn advance_time(state: &GameState, delta_ms: u32, config: &RuneMatchConfig) -> GameState {
    let mut next = state.clone();
    if !next.is_playing() {
        return next;
    }

    // 1. Monster pose
    if next.monster_anim_timer_ms > 0 {
        next.monster_anim_timer_ms = next.monster_anim_timer_ms.saturating_sub(delta_ms);
        if next.monster_anim_timer_ms == 0 {
            next.monster_anim = MonsterAnim::Idle;
        }
    }

    // 2. Attack clock and screen shake
    next.attack_timer_ms = next.attack_timer_ms.saturating_add(delta_ms);
    let decay = delta_ms as f32 / config.timing.shake_decay_ms.max(1) as f32;
    next.shake_intensity = (next.shake_intensity - decay).max(0.0);

    // 3. Floating texts
    age_floating_texts(&mut next, delta_ms, config);

    // 4. Monster attack
    let interval = config.combat.attack_interval_ms.max(1);
    if next.attack_timer_ms >= interval {
        next.attack_timer_ms %= interval;
        monster_attack(&mut next, config);
    }

    next
}

/// Drift, fade and grow every text, dropping the expired ones.
fn age_floating_texts(state: &mut GameState, delta_ms: u32, config: &RuneMatchConfig) {
    let timing = &config.timing;
    let seconds = delta_ms as f32 / 1000.0;

    for text in &mut state.floating_texts {
        text.remaining_ms = text.remaining_ms.saturating_sub(delta_ms);
        text.offset_x += seconds * timing.text_drift_x;
        text.offset_y += seconds * timing.text_drift_y;

        let progress = if text.total_ms == 0 {
            1.0
        } else {
            1.0 - text.remaining_ms as f32 / text.total_ms as f32
        };
        text.opacity = (1.0 - progress).max(0.0);
        text.scale = 1.0 + progress * timing.text_scale_growth;
    }

    state.floating_texts.retain(|text| text.remaining_ms > 0);
}

/// Resolve one scheduled attack.
///
/// The power word rotates before the damage roll, so both draws happen in
/// a fixed order. A frozen monster skips the attack itself.
fn monster_attack(state: &mut GameState, config: &RuneMatchConfig) {
    let timing = &config.timing;
    let text_ms = timing.floating_text_ms;

    state.roll_power_word();

    if state.frozen {
        state.frozen = false;
        debug!("monster frozen, attack skipped");
        state.push_text("FROZEN!", TextAnchor::Center, FeedbackColor::Shield, text_ms);
        return;
    }

    state.shake_intensity = 1.0;
    state.monster_anim = MonsterAnim::Attack;
    state.monster_anim_timer_ms = timing.attack_anim_ms;

    if state.player.has_shield {
        state.player.has_shield = false;
        debug!("monster attack blocked");
        state.push_text("BLOCKED!", TextAnchor::Center, FeedbackColor::Shield, text_ms);
        return;
    }

    let attack = state.monster.as_ref().map_or(1, |m| m.attack);
    let damage = state.rng.roll_die(attack);
    state.player.hp = state.player.hp.saturating_sub(damage);
    debug!(damage, player_hp = state.player.hp, "monster attack");
    state.push_text(format!("-{damage}"), TextAnchor::Center, FeedbackColor::PlayerHurt, text_ms);

    if state.player.hp == 0 {
        info!(attempts = state.total_attempts, "defeat");
        state.status = GameStatus::Defeat;
    }
}
