//! Game State Definitions
//!
//! The session snapshot every engine operation consumes and returns.
//! Operations clone the snapshot they are given and return the clone,
//! so callers always keep the previous state intact.

use serde::{Serialize, Deserialize};
use tracing::{info, warn};

use crate::config::RuneMatchConfig;
use crate::core::hash::{compute_state_hash, StateHash};
use crate::core::rng::{DeterministicRng, RandomSource};
use crate::error::EngineError;
use crate::game::grid::{initialize_empty_grid, initialize_grid, Grid, GridPosition};
use crate::game::matching::Move;
use crate::game::rune::{MatchKey, VocabularyItem};

// =============================================================================
// STATUS
// =============================================================================

/// Session lifecycle.
///
/// `Selection -> Playing -> Victory | Defeat`. The last two are terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum GameStatus {
    /// Waiting for a monster to be chosen
    #[default]
    Selection = 0,
    /// Battle in progress
    Playing = 1,
    /// Monster defeated
    Victory = 2,
    /// Player defeated
    Defeat = 3,
}

impl GameStatus {
    /// True for `Victory` and `Defeat`.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, GameStatus::Victory | GameStatus::Defeat)
    }
}

// =============================================================================
// COMBATANTS
// =============================================================================

/// Player vitals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Current HP, within [0, max_hp]
    pub hp: u32,
    /// Maximum HP
    pub max_hp: u32,
    /// Blocks the next monster attack
    pub has_shield: bool,
}

impl Player {
    /// Full-health player without a shield.
    pub fn new(max_hp: u32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            has_shield: false,
        }
    }
}

/// Selectable monster types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum MonsterType {
    /// Weak but fast
    Goblin = 0,
    /// Restless undead
    Skeleton = 1,
    /// A fierce warrior
    Orc = 2,
    /// The ultimate challenge
    Dragon = 3,
}

impl MonsterType {
    /// All monster types, weakest first.
    pub const ALL: [Self; 4] = [Self::Goblin, Self::Skeleton, Self::Orc, Self::Dragon];
}

/// Monster vitals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monster {
    /// Which monster
    pub monster_type: MonsterType,
    /// Current HP
    pub hp: u32,
    /// Maximum HP
    pub max_hp: u32,
    /// Upper bound of each attack roll
    pub attack: u32,
    /// XP granted on victory
    pub xp_reward: u32,
}

impl Monster {
    /// Full-health monster from the configured roster.
    pub fn from_config(monster_type: MonsterType, config: &RuneMatchConfig) -> Self {
        let stats = config.monsters.stats(monster_type);
        Self {
            monster_type,
            hp: stats.hp,
            max_hp: stats.hp,
            attack: stats.attack,
            xp_reward: stats.xp_reward,
        }
    }
}

/// Monster sprite pose.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum MonsterAnim {
    /// Resting pose
    #[default]
    Idle = 0,
    /// Attacking the player
    Attack = 1,
    /// Taking damage
    Hurt = 2,
    /// Defeated
    Death = 3,
}

// =============================================================================
// FLOATING TEXT
// =============================================================================

/// Where a floating text is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAnchor {
    /// Over a grid cell
    Cell(GridPosition),
    /// Centre of the battle area
    Center,
}

/// Semantic colour of a floating text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedbackColor {
    /// Regular match damage
    Damage,
    /// Damage from a power-word match
    PowerDamage,
    /// HP restored
    Heal,
    /// Shield gained or attack blocked
    Shield,
    /// Damage taken by the player
    PlayerHurt,
    /// Cascade bonus
    Combo,
    /// Neutral notice
    Muted,
}

impl FeedbackColor {
    /// CSS hex colour.
    pub fn hex(self) -> &'static str {
        match self {
            FeedbackColor::Damage => "#ffffff",
            FeedbackColor::PowerDamage => "#facc15",
            FeedbackColor::Heal => "#22c55e",
            FeedbackColor::Shield => "#60a5fa",
            FeedbackColor::PlayerHurt => "#ef4444",
            FeedbackColor::Combo => "#fb923c",
            FeedbackColor::Muted => "#94a3b8",
        }
    }
}

/// Transient, self-expiring feedback label.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FloatingText {
    /// Unique within a session
    pub id: u32,
    /// Label
    pub text: String,
    /// Anchor point
    pub anchor: TextAnchor,
    /// Horizontal drift (px)
    pub offset_x: f32,
    /// Vertical drift (px)
    pub offset_y: f32,
    /// Colour
    pub color: FeedbackColor,
    /// 1.0 when spawned, 0.0 when expired
    pub opacity: f32,
    /// 1.0 when spawned, grows with age
    pub scale: f32,
    /// Remaining lifetime (ms)
    pub remaining_ms: u32,
    /// Total lifetime (ms)
    pub total_ms: u32,
}

// =============================================================================
// GAME STATE
// =============================================================================

/// Complete session snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Lifecycle status
    pub status: GameStatus,
    /// Player vitals
    pub player: Player,
    /// Opponent, assigned at selection
    pub monster: Option<Monster>,
    /// Rune grid
    pub grid: Grid,
    /// First cell of a pending swap
    pub selected_cell: Option<GridPosition>,
    /// Time accumulated toward the next monster attack (ms)
    pub attack_timer_ms: u32,
    /// Translation the player should match for bonus damage
    pub power_word: String,
    /// Power-word matches made
    pub correct_answers: u32,
    /// Resolved player moves
    pub total_attempts: u32,
    /// Vocabulary the grid draws from
    pub vocabulary: Vec<VocabularyItem>,
    /// Session random source
    pub rng: DeterministicRng,
    /// Screen shake, 1.0 at an attack, decays to 0.0
    pub shake_intensity: f32,
    /// Live feedback labels, oldest first
    pub floating_texts: Vec<FloatingText>,
    /// Monster sprite pose
    pub monster_anim: MonsterAnim,
    /// Time left in the current pose (ms)
    pub monster_anim_timer_ms: u32,
    /// Suggested move from the last hint
    pub hint: Option<Move>,
    /// Hints left this session
    pub hints_remaining: u32,
    /// Shuffles left this session
    pub shuffles_remaining: u32,
    /// Freeze charges earned from shield matches
    pub freeze_charges: u32,
    /// Next monster attack will be skipped
    pub frozen: bool,
    /// Groups of five or more cells matched
    pub big_matches: u32,
    /// Next floating text id
    next_text_id: u32,
}

impl GameState {
    /// Append a floating text with a fresh id.
    pub(crate) fn push_text(
        &mut self,
        text: impl Into<String>,
        anchor: TextAnchor,
        color: FeedbackColor,
        duration_ms: u32,
    ) {
        let id = self.next_text_id;
        self.next_text_id = self.next_text_id.wrapping_add(1);
        self.floating_texts.push(FloatingText {
            id,
            text: text.into(),
            anchor,
            offset_x: 0.0,
            offset_y: 0.0,
            color,
            opacity: 1.0,
            scale: 1.0,
            remaining_ms: duration_ms,
            total_ms: duration_ms,
        });
    }

    /// Draw a new power word from the vocabulary.
    pub(crate) fn roll_power_word(&mut self) {
        let index = self.rng.next_index(self.vocabulary.len());
        if let Some(item) = self.vocabulary.get(index) {
            self.power_word = item.translation.clone();
        }
    }

    /// True while the battle is running.
    #[inline]
    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }

    /// Compute deterministic hash of the session.
    ///
    /// Covers everything that influences future play: status, vitals,
    /// grid match keys, timers, counters and the RNG position. Purely
    /// cosmetic floating text motion is excluded.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.rng.state(), |hasher| {
            hasher.update_u8(self.status as u8);
            hasher.update_u32(self.player.hp);
            hasher.update_u32(self.player.max_hp);
            hasher.update_bool(self.player.has_shield);

            match &self.monster {
                Some(monster) => {
                    hasher.update_bool(true);
                    hasher.update_u8(monster.monster_type as u8);
                    hasher.update_u32(monster.hp);
                    hasher.update_u32(monster.max_hp);
                    hasher.update_u32(monster.attack);
                    hasher.update_u32(monster.xp_reward);
                }
                None => hasher.update_bool(false),
            }

            hasher.update_u32(self.grid.rows() as u32);
            hasher.update_u32(self.grid.columns() as u32);
            for rune in self.grid.cells() {
                match rune.match_key() {
                    MatchKey::Word(word) => {
                        hasher.update_u8(0);
                        hasher.update_str(word);
                    }
                    MatchKey::PowerUp(kind) => {
                        hasher.update_u8(1);
                        hasher.update_u8(kind as u8);
                    }
                }
            }

            hasher.update_u32(self.attack_timer_ms);
            hasher.update_str(&self.power_word);
            hasher.update_u32(self.correct_answers);
            hasher.update_u32(self.total_attempts);
            hasher.update_u8(self.monster_anim as u8);
            hasher.update_u32(self.monster_anim_timer_ms);
            hasher.update_u32(self.hints_remaining);
            hasher.update_u32(self.shuffles_remaining);
            hasher.update_u32(self.freeze_charges);
            hasher.update_bool(self.frozen);
            hasher.update_u32(self.floating_texts.len() as u32);
        })
    }
}

/// Build a new session in `Selection`.
///
/// Draws the opening power word from `rng`, which then becomes the
/// session's random source. The grid is a placeholder until
/// [`select_monster`] deals the real one. Fails on an empty vocabulary or
/// a config that does not validate.
pub fn create_game_state(
    vocabulary: Vec<VocabularyItem>,
    config: &RuneMatchConfig,
    mut rng: DeterministicRng,
) -> Result<GameState, EngineError> {
    if vocabulary.is_empty() {
        return Err(EngineError::EmptyVocabulary);
    }
    config.validate()?;

    let power_word = vocabulary[rng.next_index(vocabulary.len())].translation.clone();
    let grid = initialize_empty_grid(&vocabulary, config)?;

    Ok(GameState {
        status: GameStatus::Selection,
        player: Player::new(config.player.max_hp),
        monster: None,
        grid,
        selected_cell: None,
        attack_timer_ms: 0,
        power_word,
        correct_answers: 0,
        total_attempts: 0,
        vocabulary,
        rng,
        shake_intensity: 0.0,
        floating_texts: Vec::new(),
        monster_anim: MonsterAnim::Idle,
        monster_anim_timer_ms: 0,
        hint: None,
        hints_remaining: config.player.hints,
        shuffles_remaining: config.player.shuffles,
        freeze_charges: 0,
        frozen: false,
        big_matches: 0,
        next_text_id: 0,
    })
}

/// Choose an opponent, deal a fresh grid and start the battle.
///
/// No-op unless the session is in `Selection`.
pub fn select_monster(state: &GameState, monster_type: MonsterType, config: &RuneMatchConfig) -> GameState {
    let mut next = state.clone();
    if next.status != GameStatus::Selection {
        return next;
    }

    match initialize_grid(&next.vocabulary, config, &mut next.rng) {
        Ok(grid) => next.grid = grid,
        Err(err) => warn!(%err, "grid generation failed, keeping placeholder grid"),
    }

    let monster = Monster::from_config(monster_type, config);
    info!(?monster_type, hp = monster.hp, attack = monster.attack, "monster selected");

    next.monster = Some(monster);
    next.status = GameStatus::Playing;
    next
}

// =============================================================================
// SESSION SUMMARY
// =============================================================================

/// Values reported downstream once a session ends.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Opponent faced
    pub monster_type: Option<MonsterType>,
    /// True on victory
    pub won: bool,
    /// Power-word matches
    pub correct_answers: u32,
    /// Resolved moves
    pub total_attempts: u32,
    /// `correct_answers / total_attempts` as a rounded percentage
    pub accuracy: u32,
    /// Monster XP on victory, otherwise 0
    pub xp: u32,
}

impl SessionSummary {
    /// Summarise a session.
    pub fn from_state(state: &GameState) -> Self {
        let won = state.status == GameStatus::Victory;
        let accuracy = if state.total_attempts == 0 {
            0
        } else {
            ((state.correct_answers as u64 * 100 + state.total_attempts as u64 / 2)
                / state.total_attempts as u64) as u32
        };

        Self {
            monster_type: state.monster.as_ref().map(|m| m.monster_type),
            won,
            correct_answers: state.correct_answers,
            total_attempts: state.total_attempts,
            accuracy,
            xp: if won {
                state.monster.as_ref().map_or(0, |m| m.xp_reward)
            } else {
                0
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::sample_vocab;

    fn new_state(seed: u64) -> GameState {
        create_game_state(sample_vocab(), &RuneMatchConfig::default(), DeterministicRng::new(seed)).unwrap()
    }

    #[test]
    fn test_new_state_in_selection() {
        let state = new_state(1);
        let config = RuneMatchConfig::default();

        assert_eq!(state.status, GameStatus::Selection);
        assert_eq!(state.player, Player::new(100));
        assert!(state.monster.is_none());
        assert_eq!(state.grid.rows(), config.grid.rows);
        assert!(sample_vocab().iter().any(|v| v.translation == state.power_word));
        assert_eq!(state.hints_remaining, 3);
        assert_eq!(state.shuffles_remaining, 3);
    }

    #[test]
    fn test_empty_vocabulary_rejected() {
        let result = create_game_state(Vec::new(), &RuneMatchConfig::default(), DeterministicRng::new(1));
        assert!(matches!(result, Err(EngineError::EmptyVocabulary)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = RuneMatchConfig::default();
        config.grid.columns = 0;

        let result = create_game_state(sample_vocab(), &config, DeterministicRng::new(1));
        assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_select_monster_starts_battle() {
        let config = RuneMatchConfig::default();
        let state = new_state(2);
        let playing = select_monster(&state, MonsterType::Goblin, &config);

        assert_eq!(playing.status, GameStatus::Playing);
        assert_ne!(playing.grid, state.grid);
        assert!(crate::game::matching::find_matches(&playing.grid).is_empty());
        assert_eq!(
            playing.monster,
            Some(Monster {
                monster_type: MonsterType::Goblin,
                hp: 50,
                max_hp: 50,
                attack: 10,
                xp_reward: 3,
            })
        );
        // Input untouched
        assert_eq!(state.status, GameStatus::Selection);

        // Only valid from selection
        let again = select_monster(&playing, MonsterType::Dragon, &config);
        assert_eq!(again, playing);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!GameStatus::Selection.is_terminal());
        assert!(!GameStatus::Playing.is_terminal());
        assert!(GameStatus::Victory.is_terminal());
        assert!(GameStatus::Defeat.is_terminal());
    }

    #[test]
    fn test_push_text_assigns_ids() {
        let mut state = new_state(3);
        state.push_text("+5", TextAnchor::Center, FeedbackColor::Heal, 3000);
        state.push_text("-2", TextAnchor::Center, FeedbackColor::PlayerHurt, 3000);

        assert_eq!(state.floating_texts[0].id, 0);
        assert_eq!(state.floating_texts[1].id, 1);
        assert_eq!(state.floating_texts[1].remaining_ms, 3000);
        assert_eq!(state.floating_texts[1].opacity, 1.0);
    }

    #[test]
    fn test_hash_determinism() {
        assert_eq!(new_state(7).compute_hash(), new_state(7).compute_hash());
        assert_ne!(new_state(7).compute_hash(), new_state(8).compute_hash());

        let mut state = new_state(7);
        let before = state.compute_hash();
        state.player.hp -= 1;
        assert_ne!(before, state.compute_hash());
    }

    #[test]
    fn test_snapshot_serde() {
        let state = select_monster(&new_state(4), MonsterType::Orc, &RuneMatchConfig::default());
        let json = serde_json::to_string(&state).unwrap();
        let restored: GameState = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, state);
        assert_eq!(restored.compute_hash(), state.compute_hash());
    }

    #[test]
    fn test_summary() {
        let config = RuneMatchConfig::default();
        let mut state = select_monster(&new_state(5), MonsterType::Skeleton, &config);
        state.correct_answers = 2;
        state.total_attempts = 3;

        let summary = SessionSummary::from_state(&state);
        assert!(!summary.won);
        assert_eq!(summary.accuracy, 67);
        assert_eq!(summary.xp, 0);

        state.status = GameStatus::Victory;
        let summary = SessionSummary::from_state(&state);
        assert!(summary.won);
        assert_eq!(summary.xp, 5);
        assert_eq!(summary.monster_type, Some(MonsterType::Skeleton));

        state.total_attempts = 0;
        assert_eq!(SessionSummary::from_state(&state).accuracy, 0);
    }
}
