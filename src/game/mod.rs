//! Game Logic Module
//!
//! All game simulation code. 100% deterministic given a seeded RNG.
//!
//! ## Module Structure
//!
//! - `rune`: Rune tiles, match keys and rune sampling
//! - `grid`: Grid storage, generation, swap and shuffle
//! - `matching`: Run detection and connected-group merging
//! - `cascade`: Gravity, refill and cascade resolution
//! - `combat`: Match damage and match result application
//! - `timer`: Time advancement and monster attacks
//! - `state`: Session snapshot, monsters and lifecycle
//! - `turn`: Player intents (select, swap, hint, shuffle, freeze)

pub mod rune;
pub mod grid;
pub mod matching;
pub mod cascade;
pub mod combat;
pub mod timer;
pub mod state;
pub mod turn;

// Re-export key types
pub use rune::{Rune, PowerUpKind, VocabularyItem, MatchKey};
pub use grid::{Grid, GridPosition};
pub use matching::{MatchGroup, GroupKind, Move};
pub use cascade::MatchResult;
pub use state::{
    GameState, GameStatus, Player, Monster, MonsterType, MonsterAnim,
    FloatingText, FeedbackColor, TextAnchor, SessionSummary,
};

/// Ten Thai/English pairs shared by unit tests.
#[cfg(test)]
pub(crate) fn sample_vocab() -> Vec<VocabularyItem> {
    [
        ("สวัสดี", "Hello"),
        ("แมว", "Cat"),
        ("หมา", "Dog"),
        ("น้ำ", "Water"),
        ("ข้าว", "Rice"),
        ("รัก", "Love"),
        ("บ้าน", "House"),
        ("ต้นไม้", "Tree"),
        ("พระอาทิตย์", "Sun"),
        ("พระจันทร์", "Moon"),
    ]
    .into_iter()
    .map(|(term, translation)| VocabularyItem::new(term, translation))
    .collect()
}
