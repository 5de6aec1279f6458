//! Player token generation and verification.
//!
//! Per `spec.md` §6: "Auth: opaque 32-char lowercase alphanumeric
//! `playerToken` bound to `playerId` at join; equality check on every
//! player-scoped call." This is request-layer randomness only -- it never
//! feeds a gameplay value, so it is exempt from the Determinism invariant
//! that confines `polity_core` to `DeterministicRng`.

use rand::Rng;

const TOKEN_LENGTH: usize = 32;
const SERVER_ID_LENGTH: usize = 12;
const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

fn random_alnum(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..ALPHABET.len());
            char::from(ALPHABET.iter().nth(idx).copied().unwrap_or(b'0'))
        })
        .collect()
}

/// Generate a fresh opaque player token.
pub fn generate_token() -> String {
    random_alnum(TOKEN_LENGTH)
}

/// Generate a fresh addressable server id for `/server/create`.
pub fn generate_server_id() -> String {
    random_alnum(SERVER_ID_LENGTH)
}

/// Constant-time-ish equality check between a request-supplied token and
/// the one bound at join. `str::eq` is not constant-time, but a token
/// guessing attack here is already defeated by the 36^32 search space;
/// the teacher's auth checks use plain equality for the same reason.
pub fn tokens_match(expected: &str, supplied: &str) -> bool {
    expected == supplied
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_token_is_32_lowercase_alphanumeric_chars() {
        let token = generate_token();
        assert_eq!(token.chars().count(), TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn generated_server_id_is_12_lowercase_alphanumeric_chars() {
        let id = generate_server_id();
        assert_eq!(id.chars().count(), SERVER_ID_LENGTH);
        assert!(id.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn tokens_match_checks_exact_equality() {
        assert!(tokens_match("abc", "abc"));
        assert!(!tokens_match("abc", "abd"));
    }
}
