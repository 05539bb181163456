// Token generation for login sessions and credential access tokens

use rand::RngCore;

/// The 64-character alphabet session tokens are drawn from.
pub const TOKEN_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Default token length in characters.
///
/// At 6 bits per character this is 1536 bits of entropy, which makes a
/// collision between two live sessions practically impossible. The storage
/// layer still enforces uniqueness on insert; callers must surface that
/// failure rather than ignore it.
pub const DEFAULT_TOKEN_LENGTH: usize = 256;

/// Generate a token of `length` characters drawn uniformly from
/// [`TOKEN_ALPHABET`], using the thread-local CSPRNG.
///
/// The alphabet has exactly 64 entries, so masking each random byte to its
/// low 6 bits selects uniformly without rejection sampling.
#[must_use]
pub fn generate(length: usize) -> String {
    let mut bytes = vec![0u8; length];
    rand::rng().fill_bytes(&mut bytes);

    bytes
        .iter()
        .map(|b| TOKEN_ALPHABET[usize::from(b & 0x3f)] as char)
        .collect()
}

/// Generate a token of [`DEFAULT_TOKEN_LENGTH`] characters.
#[must_use]
pub fn generate_default() -> String {
    generate(DEFAULT_TOKEN_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_token_has_requested_length() {
        assert_eq!(generate(1).len(), 1);
        assert_eq!(generate(32).len(), 32);
        assert_eq!(generate(256).len(), 256);
        assert_eq!(generate_default().len(), DEFAULT_TOKEN_LENGTH);
    }

    #[test]
    fn test_generated_token_stays_in_alphabet() {
        let token = generate(512);
        assert!(token.bytes().all(|b| TOKEN_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_generated_tokens_are_distinct() {
        // With 1536 bits of entropy a repeat here would mean a broken RNG.
        let a = generate_default();
        let b = generate_default();
        assert_ne!(a, b);
    }

    #[test]
    fn test_zero_length_token_is_empty() {
        assert_eq!(generate(0), "");
    }

    #[test]
    fn test_alphabet_has_no_duplicates() {
        let mut seen = [false; 256];
        for &b in TOKEN_ALPHABET {
            assert!(!seen[usize::from(b)], "duplicate alphabet entry: {b}");
            seen[usize::from(b)] = true;
        }
    }
}
