//! Leaf field validators used by the integrity scorer.
//!
//! Pure functions with no dependencies on the scoring layers; every check
//! here answers a single question about a single field so the scorer can
//! translate the answer into risk points.

use url::Url;

/// Earliest plausible launch timestamp (2020-01-01T00:00:00Z), well before
/// the tracked platform existed.
pub const EPOCH_FLOOR: i64 = 1_577_836_800;

/// Launches may not be timestamped further than this into the future.
pub const MAX_FUTURE_SKEW_SECS: i64 = 86_400;

/// Maximum query-string length before a metadata URI counts as suspicious.
const MAX_URI_QUERY_LEN: usize = 512;

/// Whether a string is a well-formed base58 mint address (decodes to 32 bytes).
pub fn is_valid_mint(mint: &str) -> bool {
    bs58::decode(mint)
        .into_vec()
        .map_or(false, |bytes| bytes.len() == 32)
}

/// Whether a creator identity is a well-formed 64-char hex string.
pub fn is_valid_creator_hex(creator: &str) -> bool {
    creator.len() == 64 && creator.chars().all(|c| c.is_ascii_hexdigit())
}

/// Classification of a metadata URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UriCheck {
    /// Parses and uses https
    Https,
    /// Parses but is not https (http, ipfs, ...)
    NotHttps,
    /// Does not parse as a URL at all
    Invalid,
    /// Actively malicious-looking (data:/javascript: scheme, oversized query)
    Suspicious,
}

/// Classify a metadata URI for scoring.
pub fn check_uri(uri: &str) -> UriCheck {
    let lowered = uri.trim().to_ascii_lowercase();
    if lowered.starts_with("data:") || lowered.starts_with("javascript:") {
        return UriCheck::Suspicious;
    }

    match Url::parse(uri) {
        Ok(parsed) => {
            if parsed.query().map_or(0, |q| q.len()) > MAX_URI_QUERY_LEN {
                UriCheck::Suspicious
            } else if parsed.scheme() == "https" {
                UriCheck::Https
            } else {
                UriCheck::NotHttps
            }
        }
        Err(_) => UriCheck::Invalid,
    }
}

/// Whether a launch timestamp falls inside the sane window
/// [`EPOCH_FLOOR`]..=now + [`MAX_FUTURE_SKEW_SECS`].
pub fn timestamp_in_range(timestamp: i64, now: i64) -> bool {
    timestamp >= EPOCH_FLOOR && timestamp <= now + MAX_FUTURE_SKEW_SECS
}

/// Whether a string contains non-printable or control characters.
pub fn has_control_chars(s: &str) -> bool {
    s.chars().any(|c| c.is_control())
}

/// Whether a symbol matches the scammy-pattern set: a run of five or more
/// repeated characters, three or more consecutive emoji, or confusable-script
/// characters mixed in (Cyrillic/Greek lookalikes next to Latin).
pub fn is_scammy_symbol(symbol: &str) -> bool {
    has_repeat_run(symbol, 5) || has_emoji_run(symbol, 3) || has_confusable_mix(symbol)
}

fn has_repeat_run(s: &str, min_run: usize) -> bool {
    let mut run = 0usize;
    let mut last: Option<char> = None;
    for c in s.chars() {
        if Some(c) == last {
            run += 1;
        } else {
            run = 1;
            last = Some(c);
        }
        if run >= min_run {
            return true;
        }
    }
    false
}

fn is_emoji(c: char) -> bool {
    matches!(u32::from(c),
        0x1F300..=0x1FAFF // pictographs, emoticons, symbols
        | 0x2600..=0x27BF // misc symbols and dingbats
        | 0xFE0F          // variation selector
    )
}

fn has_emoji_run(s: &str, min_run: usize) -> bool {
    let mut run = 0usize;
    for c in s.chars() {
        if is_emoji(c) {
            run += 1;
            if run >= min_run {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}

fn has_confusable_mix(s: &str) -> bool {
    let has_latin = s.chars().any(|c| c.is_ascii_alphabetic());
    let has_confusable = s.chars().any(|c| {
        matches!(u32::from(c),
            0x0400..=0x04FF // Cyrillic
            | 0x0370..=0x03FF // Greek
        )
    });
    has_latin && has_confusable
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::pubkey::Pubkey;

    #[test]
    fn test_valid_mint_roundtrip() {
        let mint = Pubkey::new_unique().to_string();
        assert!(is_valid_mint(&mint));
    }

    #[test]
    fn test_invalid_mint_formats() {
        assert!(!is_valid_mint(""));
        assert!(!is_valid_mint("not-base58-0OIl"));
        assert!(!is_valid_mint("abc")); // too short
    }

    #[test]
    fn test_mint_must_decode_to_exactly_32_bytes() {
        let short = bs58::encode([7u8; 31]).into_string();
        let long = bs58::encode([7u8; 33]).into_string();
        let exact = bs58::encode([7u8; 32]).into_string();
        assert!(!is_valid_mint(&short));
        assert!(!is_valid_mint(&long));
        assert!(is_valid_mint(&exact));
    }

    #[test]
    fn test_creator_hex() {
        assert!(is_valid_creator_hex(&"ab".repeat(32)));
        assert!(!is_valid_creator_hex(&"ab".repeat(31)));
        assert!(!is_valid_creator_hex(&"zz".repeat(32)));
    }

    #[test]
    fn test_uri_classification() {
        assert_eq!(check_uri("https://arweave.net/abc"), UriCheck::Https);
        assert_eq!(check_uri("http://example.com/meta.json"), UriCheck::NotHttps);
        assert_eq!(check_uri("ipfs://Qm123"), UriCheck::NotHttps);
        assert_eq!(check_uri("not a url"), UriCheck::Invalid);
        assert_eq!(check_uri("javascript:alert(1)"), UriCheck::Suspicious);
        assert_eq!(check_uri("data:text/html;base64,AAAA"), UriCheck::Suspicious);
    }

    #[test]
    fn test_uri_oversized_query_is_suspicious() {
        let uri = format!("https://a.com/m?x={}", "y".repeat(600));
        assert_eq!(check_uri(&uri), UriCheck::Suspicious);
    }

    #[test]
    fn test_timestamp_window() {
        let now = 1_750_000_000;
        assert!(timestamp_in_range(now, now));
        assert!(timestamp_in_range(now + MAX_FUTURE_SKEW_SECS, now));
        assert!(!timestamp_in_range(now + MAX_FUTURE_SKEW_SECS + 1, now));
        assert!(!timestamp_in_range(EPOCH_FLOOR - 1, now));
    }

    #[test]
    fn test_control_chars() {
        assert!(has_control_chars("abc\u{0000}def"));
        assert!(has_control_chars("abc\ndef"));
        assert!(!has_control_chars("Plain Token"));
    }

    #[test]
    fn test_scammy_symbol_repeat_run() {
        assert!(is_scammy_symbol("AAAAA"));
        assert!(!is_scammy_symbol("AAAA"));
    }

    #[test]
    fn test_scammy_symbol_emoji_run() {
        assert!(is_scammy_symbol("\u{1F680}\u{1F680}\u{1F680}"));
        assert!(!is_scammy_symbol("GO\u{1F680}"));
    }

    #[test]
    fn test_scammy_symbol_confusables() {
        // Cyrillic о in an otherwise Latin symbol
        assert!(is_scammy_symbol("S\u{043E}L"));
        assert!(!is_scammy_symbol("SOL"));
    }
}
