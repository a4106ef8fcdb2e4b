//! Rune Match Demo
//!
//! Plays a full session with a greedy bot, then replays it from the same
//! seed and checks that both runs end on the same state hash.
//!
//! Usage: `rune-match-demo [seed] [config.json]`

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use rune_match::{
    VERSION,
    config::RuneMatchConfig,
    core::rng::DeterministicRng,
    game::{
        matching::find_possible_moves,
        state::{create_game_state, select_monster, GameState, MonsterType, SessionSummary},
        timer::advance_time,
        turn::{freeze_monster, play_swap, use_shuffle},
        VocabularyItem,
    },
};

/// Simulated time between bot moves (ms)
const THINK_TIME_MS: u32 = 1200;

/// Hard stop for a session that never ends
const MAX_TURNS: u32 = 2000;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(raw) => raw.parse::<u64>().with_context(|| format!("invalid seed {raw:?}"))?,
        None => 12345,
    };
    let config = match args.next() {
        Some(path) => RuneMatchConfig::from_path(&path).with_context(|| format!("loading config {path}"))?,
        None => RuneMatchConfig::default(),
    };

    info!("Rune Match Engine v{}", VERSION);
    info!("Seed: {}", seed);

    let monster = MonsterType::Orc;
    let state = run_session(seed, monster, &config)?;

    let summary = SessionSummary::from_state(&state);
    let hash = state.compute_hash();
    info!("=== Session Results ===");
    info!(
        "won={} correct={} attempts={} accuracy={}% xp={} big_matches={}",
        summary.won,
        summary.correct_answers,
        summary.total_attempts,
        summary.accuracy,
        summary.xp,
        state.big_matches,
    );
    info!("Final State Hash: {}", hex::encode(hash));

    info!("=== Verifying Determinism ===");
    let replay = run_session(seed, monster, &config)?;
    let replay_hash = replay.compute_hash();
    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if hash != replay_hash {
        bail!("determinism failure: replay hash differs");
    }
    info!("DETERMINISM VERIFIED: Hashes match!");
    Ok(())
}

/// Play one session to completion.
fn run_session(seed: u64, monster: MonsterType, config: &RuneMatchConfig) -> Result<GameState> {
    let state = create_game_state(demo_vocabulary(), config, DeterministicRng::new(seed))?;
    let mut state = select_monster(&state, monster, config);

    for turn in 0..MAX_TURNS {
        if state.status.is_terminal() {
            info!("Session ended after {} turns: {:?}", turn, state.status);
            return Ok(state);
        }

        state = bot_turn(&state, config);
        state = advance_time(&state, THINK_TIME_MS, config);
    }

    bail!("session still running after {MAX_TURNS} turns")
}

/// Pick the move that leaves the monster weakest, shuffling when stuck.
fn bot_turn(state: &GameState, config: &RuneMatchConfig) -> GameState {
    let state = if state.freeze_charges > 0 && state.player.hp < state.player.max_hp / 2 {
        freeze_monster(state)
    } else {
        state.clone()
    };

    let moves = find_possible_moves(&state.grid);
    if moves.is_empty() {
        return use_shuffle(&state, config);
    }

    let monster_hp = |s: &GameState| s.monster.as_ref().map_or(0, |m| m.hp);
    moves
        .iter()
        .map(|m| play_swap(&state, m.from, m.to, config))
        .min_by_key(|next| (monster_hp(next), u32::MAX - next.player.hp))
        .unwrap_or(state)
}

/// Built-in Thai/English word list.
fn demo_vocabulary() -> Vec<VocabularyItem> {
    [
        ("สวัสดี", "Hello"),
        ("ขอบคุณ", "Thank you"),
        ("แมว", "Cat"),
        ("หมา", "Dog"),
        ("น้ำ", "Water"),
        ("ข้าว", "Rice"),
        ("บ้าน", "House"),
        ("ต้นไม้", "Tree"),
        ("พระอาทิตย์", "Sun"),
        ("พระจันทร์", "Moon"),
        ("ดาว", "Star"),
        ("ทะเล", "Sea"),
    ]
    .into_iter()
    .map(|(term, translation)| VocabularyItem::new(term, translation))
    .collect()
}
