//! Rune Tiles
//!
//! A rune is either a vocabulary tile or a power-up tile. Two runes are
//! equivalent for matching purposes when their [`MatchKey`]s are equal.

use serde::{Serialize, Deserialize};

use crate::config::RuneMatchConfig;
use crate::core::rng::RandomSource;

/// One vocabulary pair supplied by the host application.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VocabularyItem {
    /// Source-language term
    pub term: String,
    /// Target-language translation (also the match identity)
    pub translation: String,
}

impl VocabularyItem {
    /// Create a vocabulary pair.
    pub fn new(term: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            translation: translation.into(),
        }
    }
}

/// Power-up tile kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PowerUpKind {
    /// Restores player HP per matched tile
    Heal = 0,
    /// Blocks the next monster attack
    Shield = 1,
}

/// A single grid tile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rune {
    /// Vocabulary tile. Matches on `word_id`, shows `display_text`.
    Vocabulary {
        /// Renderer identity
        id: u32,
        /// Match identity (the translation)
        word_id: String,
        /// Either the term or the translation
        display_text: String,
    },
    /// Power-up tile.
    PowerUp {
        /// Renderer identity
        id: u32,
        /// Effect on match
        kind: PowerUpKind,
    },
}

/// Value compared to decide whether two runes match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchKey<'a> {
    /// Vocabulary tiles match on word id
    Word(&'a str),
    /// Power-ups match on kind
    PowerUp(PowerUpKind),
}

impl Rune {
    /// Create a vocabulary rune.
    pub fn vocabulary(id: u32, word_id: impl Into<String>, display_text: impl Into<String>) -> Self {
        Rune::Vocabulary {
            id,
            word_id: word_id.into(),
            display_text: display_text.into(),
        }
    }

    /// Create a power-up rune.
    pub fn power_up(id: u32, kind: PowerUpKind) -> Self {
        Rune::PowerUp { id, kind }
    }

    /// Renderer identity.
    pub fn id(&self) -> u32 {
        match self {
            Rune::Vocabulary { id, .. } | Rune::PowerUp { id, .. } => *id,
        }
    }

    /// Match identity.
    #[inline]
    pub fn match_key(&self) -> MatchKey<'_> {
        match self {
            Rune::Vocabulary { word_id, .. } => MatchKey::Word(word_id),
            Rune::PowerUp { kind, .. } => MatchKey::PowerUp(*kind),
        }
    }

    /// True if both runes share a match key.
    #[inline]
    pub fn matches(&self, other: &Rune) -> bool {
        self.match_key() == other.match_key()
    }

    /// Word id for vocabulary tiles.
    pub fn word_id(&self) -> Option<&str> {
        match self {
            Rune::Vocabulary { word_id, .. } => Some(word_id),
            Rune::PowerUp { .. } => None,
        }
    }
}

/// Sample a fresh rune.
///
/// With probability `power_ups.spawn_rate` the rune is a power-up (heal or
/// shield, 50/50). Otherwise a vocabulary entry is drawn uniformly and shown
/// as either its term or its translation, 50/50. The match identity is
/// always the translation.
///
/// `vocabulary` must be non-empty; callers validate this at construction.
pub fn create_random_rune<R: RandomSource + ?Sized>(
    vocabulary: &[VocabularyItem],
    config: &RuneMatchConfig,
    rng: &mut R,
    id: u32,
) -> Rune {
    if rng.chance(config.power_ups.spawn_rate) {
        let kind = if rng.next_unit() > 0.5 {
            PowerUpKind::Heal
        } else {
            PowerUpKind::Shield
        };
        return Rune::power_up(id, kind);
    }

    let item = &vocabulary[rng.next_index(vocabulary.len())];
    let display_text = if rng.next_unit() > 0.5 {
        &item.translation
    } else {
        &item.term
    };

    Rune::vocabulary(id, item.translation.as_str(), display_text.as_str())
}

/// Sample a rune that matches none of the given neighbours.
///
/// Draws at most `attempts` candidates (at least one). Returns the first
/// candidate that clears every neighbour, or the last one drawn together
/// with `false` when the budget runs out.
pub(crate) fn sample_distinct_rune<R: RandomSource + ?Sized>(
    vocabulary: &[VocabularyItem],
    config: &RuneMatchConfig,
    rng: &mut R,
    id: u32,
    attempts: u32,
    neighbours: &[Option<&Rune>],
) -> (Rune, bool) {
    let clashes = |rune: &Rune| neighbours.iter().flatten().any(|n| n.matches(rune));

    let mut rune = create_random_rune(vocabulary, config, rng, id);
    for _ in 1..attempts.max(1) {
        if !clashes(&rune) {
            return (rune, true);
        }
        rune = create_random_rune(vocabulary, config, rng, id);
    }

    let distinct = !clashes(&rune);
    (rune, distinct)
}
