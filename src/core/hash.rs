//! State Hashing for Verification
//!
//! Provides deterministic hashing of game state for:
//! - Replay validation (same seed + same inputs = same hash)
//! - Save/restore integrity checks

use sha2::{Sha256, Digest};

/// Hash output type (256 bits / 32 bytes)
pub type StateHash = [u8; 32];

/// Deterministic hasher for game state.
///
/// Wraps SHA-256 with typed little-endian update helpers.
/// Order of updates is critical for determinism.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for a game session snapshot.
    pub fn for_game_state() -> Self {
        Self::new(b"RUNE_MATCH_STATE_V1")
    }

    /// Update with raw bytes.
    #[inline]
    pub fn update_bytes(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a u64 value (little-endian).
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a boolean.
    #[inline]
    pub fn update_bool(&mut self, value: bool) {
        self.update_u8(value as u8);
    }

    /// Update with a length-prefixed UTF-8 string.
    ///
    /// The prefix keeps `("ab", "c")` and `("a", "bc")` apart.
    #[inline]
    pub fn update_str(&mut self, value: &str) {
        self.update_u32(value.len() as u32);
        self.update_bytes(value.as_bytes());
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> StateHash {
        self.hasher.finalize().into()
    }
}

/// Compute state hash for replay verification.
///
/// This function is called by `GameState::compute_hash()`.
/// The RNG position is always hashed first; the closure adds
/// session-specific data.
pub fn compute_state_hash<F>(rng_state: [u64; 2], add_state: F) -> StateHash
where
    F: FnOnce(&mut StateHasher),
{
    let mut hasher = StateHasher::for_game_state();

    hasher.update_u64(rng_state[0]);
    hasher.update_u64(rng_state[1]);

    add_state(&mut hasher);

    hasher.finalize()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_hasher_determinism() {
        let make_hash = || {
            let mut hasher = StateHasher::for_game_state();
            hasher.update_u32(100);
            hasher.update_u64(12345);
            hasher.update_str("Hello");
            hasher.update_bool(true);
            hasher.finalize()
        };

        assert_eq!(make_hash(), make_hash());
    }

    #[test]
    fn test_hash_order_matters() {
        let hash1 = {
            let mut h = StateHasher::new(b"test");
            h.update_u32(1);
            h.update_u32(2);
            h.finalize()
        };

        let hash2 = {
            let mut h = StateHasher::new(b"test");
            h.update_u32(2);
            h.update_u32(1);
            h.finalize()
        };

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_string_boundaries() {
        let hash1 = {
            let mut h = StateHasher::new(b"test");
            h.update_str("ab");
            h.update_str("c");
            h.finalize()
        };

        let hash2 = {
            let mut h = StateHasher::new(b"test");
            h.update_str("a");
            h.update_str("bc");
            h.finalize()
        };

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_domain_separation() {
        let hash_in = |domain: &[u8]| {
            let mut h = StateHasher::new(domain);
            h.update_bytes(&[1, 2, 3, 4]);
            h.finalize()
        };

        assert_ne!(hash_in(&b"DOMAIN_A"[..]), hash_in(&b"DOMAIN_B"[..]));
    }

    #[test]
    fn test_compute_state_hash() {
        let hash = compute_state_hash([1, 2], |hasher| {
            hasher.update_u32(50);
            hasher.update_bool(true);
        });

        let hash2 = compute_state_hash([1, 2], |hasher| {
            hasher.update_u32(50);
            hasher.update_bool(true);
        });

        assert_eq!(hash, hash2);

        // Different RNG position = different hash
        let hash3 = compute_state_hash([1, 3], |hasher| {
            hasher.update_u32(50);
            hasher.update_bool(true);
        });

        assert_ne!(hash, hash3);
    }
}
