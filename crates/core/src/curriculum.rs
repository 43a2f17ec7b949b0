//! Topic decomposition parsing.
//!
//! The model is asked for a numbered list of teaching parts. Only lines that
//! begin with a digit are kept; everything else (preambles, blank lines,
//! closing remarks) is discarded.

/// The number of teaching parts a topic is broken into.
pub const TARGET_PARTS: usize = 5;

/// Extracts at most `limit` list items from numbered-list text.
///
/// A line counts as an item when, after trimming, its first character is an
/// ASCII digit. The leading digits and a single `.` or `)` marker are
/// stripped; items that are empty after trimming are skipped. A reply with
/// fewer items than `limit` is returned as-is.
pub fn parse_numbered_list(text: &str, limit: usize) -> Vec<String> {
    text.lines()
        .filter_map(|line| {
            let line = line.trim();
            if !line.starts_with(|c: char| c.is_ascii_digit()) {
                return None;
            }
            let rest = line.trim_start_matches(|c: char| c.is_ascii_digit());
            let rest = rest
                .strip_prefix('.')
                .or_else(|| rest.strip_prefix(')'))
                .unwrap_or(rest)
                .trim();
            (!rest.is_empty()).then(|| rest.to_string())
        })
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_first_five_of_seven_in_order() {
        let reply = "1. One\n2. Two\n3. Three\n4. Four\n5. Five\n6. Six\n7. Seven";
        assert_eq!(
            parse_numbered_list(reply, TARGET_PARTS),
            vec!["One", "Two", "Three", "Four", "Five"]
        );
    }

    #[test]
    fn test_ignores_prose_and_accepts_short_lists() {
        let reply = "Sure! Here are the parts:\n\n1. What plants need\n  2.   Sunlight  \nHope this helps.";
        assert_eq!(
            parse_numbered_list(reply, TARGET_PARTS),
            vec!["What plants need", "Sunlight"]
        );
    }

    #[test]
    fn test_handles_multi_digit_and_paren_markers() {
        let reply = "10) Tenth\n1)\n2 Bare number";
        assert_eq!(parse_numbered_list(reply, TARGET_PARTS), vec!["Tenth", "Bare number"]);
    }

    #[test]
    fn test_empty_reply_yields_no_parts() {
        assert!(parse_numbered_list("", TARGET_PARTS).is_empty());
    }
}
