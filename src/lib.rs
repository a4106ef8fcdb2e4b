//! # Rune Match Engine
//!
//! Deterministic match-3 grid engine fused with a timed combat loop, for
//! vocabulary practice. Matching tiles damages a monster that periodically
//! strikes back.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    RUNE MATCH ENGINE                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── rng.rs      - Xorshift128+ PRNG, RandomSource trait     │
//! │  └── hash.rs     - State hashing for replay checks           │
//! │                                                              │
//! │  config.rs       - Tunable engine configuration              │
//! │  error.rs        - Engine error type                         │
//! │                                                              │
//! │  game/           - Game logic (deterministic)                │
//! │  ├── rune.rs     - Rune tiles and sampling                   │
//! │  ├── grid.rs     - Grid generation, swap, shuffle            │
//! │  ├── matching.rs - Run detection and group merging           │
//! │  ├── cascade.rs  - Gravity, refill, cascades                 │
//! │  ├── combat.rs   - Damage, heal, shield, victory             │
//! │  ├── timer.rs    - Time advance and monster attacks          │
//! │  ├── state.rs    - Session snapshot and lifecycle            │
//! │  └── turn.rs     - Player intents                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Control Flow
//!
//! ```text
//! click/swap ─► swap_runes ─► process_matches ─► apply_match_result ─► GameState
//! frame      ─► advance_time ───────────────────────────────────────► GameState
//! ```
//!
//! Every operation takes a snapshot by reference and returns a new one.
//!
//! ## Determinism Guarantee
//!
//! All randomness flows through [`RandomSource`]; a session
//! owns a seeded [`DeterministicRng`]. Given the same seed, vocabulary,
//! intents and time deltas, two sessions end with identical
//! [`GameState::compute_hash`] values.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod config;
pub mod error;
pub mod game;

// Re-export commonly used types
pub use crate::core::rng::{DeterministicRng, RandomSource};
pub use crate::config::RuneMatchConfig;
pub use crate::error::EngineError;
pub use crate::game::state::{create_game_state, select_monster, GameState, GameStatus, MonsterType};
pub use crate::game::VocabularyItem;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
