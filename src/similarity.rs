//! Ratcliff/Obershelp string similarity.
//!
//! Computes the classic longest-matching-blocks ratio: find the longest
//! common substring, recurse into the unmatched pieces on either side, and
//! score `2 * matched / (len(a) + len(b))` in `[0, 1]`. This is the same
//! measure the duplicate detector's fuzzy title check thresholds at 0.8.
//!
//! Comparison is per `char`, not per byte, so multibyte titles score the
//! same way regardless of encoding width.

/// Similarity ratio between two strings in `[0, 1]`.
///
/// Two empty strings are considered identical (ratio 1.0), matching the
/// conventional definition.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matched_len(&a, &b) as f64 / total as f64
}

/// Total length of all matching blocks between `a` and `b`.
fn matched_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let (ai, bi, len) = longest_match(a, b);
    if len == 0 {
        return 0;
    }
    len + matched_len(&a[..ai], &b[..bi]) + matched_len(&a[ai + len..], &b[bi + len..])
}

/// Longest common substring of `a` and `b` as `(start_a, start_b, len)`.
///
/// Ties go to the earliest position in `a`. Uses a rolling row of
/// common-suffix lengths, so memory is O(len(b)).
fn longest_match(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0usize, 0usize, 0usize);
    let mut prev = vec![0usize; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        let mut cur = vec![0usize; b.len() + 1];
        for (j, &cb) in b.iter().enumerate() {
            if ca == cb {
                let k = prev[j] + 1;
                cur[j + 1] = k;
                if k > best.2 {
                    best = (i + 1 - k, j + 1 - k, k);
                }
            }
        }
        prev = cur;
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings() {
        assert_eq!(similarity_ratio("workplace trust", "workplace trust"), 1.0);
    }

    #[test]
    fn test_disjoint_strings() {
        assert_eq!(similarity_ratio("aaaa", "bbbb"), 0.0);
    }

    #[test]
    fn test_both_empty() {
        assert_eq!(similarity_ratio("", ""), 1.0);
    }

    #[test]
    fn test_one_empty() {
        assert_eq!(similarity_ratio("", "title"), 0.0);
        assert_eq!(similarity_ratio("title", ""), 0.0);
    }

    #[test]
    fn test_single_block() {
        // "bcd" is the longest block; nothing else matches: 2*3 / 8 = 0.75
        assert_eq!(similarity_ratio("abcd", "bcde"), 0.75);
    }

    #[test]
    fn test_recurses_into_both_sides() {
        // "abc " matches up front and " def" after the differing middle:
        // 2 * (4 + 4) / 22
        let r = similarity_ratio("abc XXX def", "abc YYY def");
        assert!((r - 16.0 / 22.0).abs() < 1e-12);
    }

    #[test]
    fn test_exact_point_eight() {
        // 8 of 10 characters match on each side: 2*8 / 20 = 0.8 exactly
        assert_eq!(similarity_ratio("abcdefghij", "abcdefgh--"), 0.8);
    }

    #[test]
    fn test_above_point_eight() {
        // 9 of 10 match: 2*9 / 20 = 0.9
        assert_eq!(similarity_ratio("abcdefghi-", "abcdefghij"), 0.9);
    }

    #[test]
    fn test_multibyte_counts_chars() {
        // One char differs out of five on each side: 2*4 / 10 = 0.8
        assert_eq!(similarity_ratio("こんにちは", "こんにちわ"), 0.8);
    }
}
