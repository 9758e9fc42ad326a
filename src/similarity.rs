//! Token-order-insensitive string similarity.
//!
//! [`token_sort_ratio`] scores two strings on a 0–100 scale after normalizing
//! them: characters that are not word characters become spaces, the text is
//! lowercased and trimmed, and the whitespace-separated tokens are sorted and
//! re-joined. The score of the two sorted strings is the normalized indel
//! similarity (insertions and deletions only), scaled to a percentage and
//! rounded half to even.

use rapidfuzz::distance::indel;

/// Maximum score, returned for strings that are identical after processing.
pub const MAX_SCORE: u8 = 100;

/// Score the similarity of `a` and `b` independent of token order and case.
///
/// ```
/// use shapeseek::similarity::token_sort_ratio;
///
/// assert_eq!(token_sort_ratio("street name", "Name, Street"), 100);
/// assert_eq!(token_sort_ratio("nam", "name"), 86);
/// ```
pub fn token_sort_ratio(a: &str, b: &str) -> u8 {
    let sorted_a = process_and_sort(a);
    let sorted_b = process_and_sort(b);
    ratio(&sorted_a, &sorted_b)
}

/// Score two already-processed strings.
///
/// Equal strings (including two empty ones) score 100; otherwise an empty
/// string scores 0 against anything.
pub fn ratio(a: &str, b: &str) -> u8 {
    if a == b {
        return MAX_SCORE;
    }
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let similarity = indel::normalized_similarity(a.chars(), b.chars());
    (similarity * f64::from(MAX_SCORE))
        .round_ties_even()
        .clamp(0.0, f64::from(MAX_SCORE)) as u8
}

/// Normalize a string and sort its tokens.
pub fn process_and_sort(s: &str) -> String {
    let processed = full_process(s);
    let mut tokens: Vec<&str> = processed.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Replace non-word characters with spaces, lowercase and trim.
///
/// Word characters are alphanumerics and `_`. Characters in the Latin-1
/// supplement block (U+0080..=U+00FF) are dropped before processing.
pub fn full_process(s: &str) -> String {
    let cleaned: String = s
        .chars()
        .filter(|c| !('\u{80}'..='\u{ff}').contains(c))
        .map(|c| if is_word_char(c) { c } else { ' ' })
        .collect();

    cleaned.to_lowercase().trim().to_string()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings() {
        assert_eq!(token_sort_ratio("name", "name"), 100);
        assert_eq!(token_sort_ratio("Name", "nAME"), 100);
    }

    #[test]
    fn test_token_order_and_punctuation() {
        assert_eq!(token_sort_ratio("first name", "name first"), 100);
        assert_eq!(token_sort_ratio("first-name", "Name First!"), 100);
    }

    #[test]
    fn test_underscore_is_a_word_character() {
        assert_eq!(full_process("full_name"), "full_name");
        // "full_name" (9) vs "name" (4): 4 shared characters, indel distance 5.
        assert_eq!(token_sort_ratio("full_name", "name"), 62);
    }

    #[test]
    fn test_known_scores() {
        // 3 shared characters out of 7 total: 1 - 1/7.
        assert_eq!(token_sort_ratio("nam", "name"), 86);
        // 4 shared characters out of 11 total: 1 - 3/11.
        assert_eq!(token_sort_ratio("addr", "address"), 73);
        // Only "y" is shared: 1 - 9/11.
        assert_eq!(token_sort_ratio("happy", "joyful"), 18);
        assert_eq!(token_sort_ratio("name", "city"), 0);
    }

    #[test]
    fn test_half_scores_round_to_even() {
        // 5 shared characters out of 16 total: 62.5.
        assert_eq!(token_sort_ratio("abcdefgh", "abcdexyz"), 62);
        // 7 shared characters out of 16 total: 87.5.
        assert_eq!(token_sort_ratio("abcdefgh", "abcdefgx"), 88);
    }

    #[test]
    fn test_scores_around_threshold() {
        // 7 shared characters out of 20 total: 70.
        assert_eq!(token_sort_ratio("abcdefghij", "abcdefgxyz"), 70);
        // 10 shared characters out of 29 total: 68.97.
        assert_eq!(token_sort_ratio("abcdefghij", "abcdefghijklmnopqrs"), 69);
    }

    #[test]
    fn test_empty_after_processing() {
        assert_eq!(token_sort_ratio("", "name"), 0);
        assert_eq!(token_sort_ratio("!!", "name"), 0);
        assert_eq!(token_sort_ratio("!!", "??"), 100);
    }

    #[test]
    fn test_process_and_sort() {
        assert_eq!(process_and_sort("  Zip  code "), "code zip");
        assert_eq!(process_and_sort("e-mail"), "e mail");
    }
}
