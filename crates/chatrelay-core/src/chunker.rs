//! Splits reply text into transport-safe chunks.
//!
//! Limits are counted in characters, not bytes. Each cut prefers the last
//! newline or period inside the window and falls back to a hard cut at
//! exactly `limit` characters.

/// Split `text` into chunks of at most `limit` characters.
///
/// Always returns at least one chunk; blank input yields a single empty
/// chunk. Whitespace is trimmed at every cut, so rejoining the chunks
/// reproduces the text up to whitespace at the cut boundaries. A `limit`
/// of zero is treated as one.
pub fn split(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let mut chunks = Vec::new();
    let mut rest = text.trim();

    while let Some(window_end) = char_boundary(rest, limit) {
        let cut = find_cut(rest, window_end).unwrap_or(window_end);
        chunks.push(rest[..cut].trim_end().to_string());
        rest = rest[cut..].trim_start();
    }

    chunks.push(rest.to_string());
    chunks
}

/// Byte offset of the character at index `n`, or `None` if `s` has at most
/// `n` characters (i.e. it already fits).
fn char_boundary(s: &str, n: usize) -> Option<usize> {
    s.char_indices().nth(n).map(|(idx, _)| idx)
}

/// Byte offset to cut `rest` at, searching the window `rest[..window_end]`
/// backwards. Newlines cut before themselves; a period cuts after itself.
/// Only cut points at a positive offset count.
fn find_cut(rest: &str, window_end: usize) -> Option<usize> {
    rest[..window_end]
        .char_indices()
        .rev()
        .take_while(|&(idx, _)| idx > 0)
        .find_map(|(idx, ch)| match ch {
            '\n' => Some(idx),
            '.' => Some(idx + 1),
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_ws(s: &str) -> String {
        s.chars().filter(|c| !c.is_whitespace()).collect()
    }

    fn assert_within_limit(chunks: &[String], limit: usize) {
        for chunk in chunks {
            assert!(
                chunk.chars().count() <= limit,
                "chunk of {} chars exceeds limit {limit}",
                chunk.chars().count()
            );
        }
    }

    #[test]
    fn empty_input_yields_single_empty_chunk() {
        assert_eq!(split("", 10), vec![String::new()]);
        assert_eq!(split("   \n ", 10), vec![String::new()]);
    }

    #[test]
    fn short_text_is_one_trimmed_chunk() {
        assert_eq!(split("  Hi there \n", 4096), vec!["Hi there".to_string()]);
    }

    #[test]
    fn text_exactly_at_limit_is_one_chunk() {
        let text = "a".repeat(4096);
        assert_eq!(split(&text, 4096), vec![text]);
    }

    #[test]
    fn hard_cut_without_boundaries() {
        let text = "x".repeat(25);
        let chunks = split(&text, 10);
        assert_eq!(chunks, vec!["x".repeat(10), "x".repeat(10), "x".repeat(5)]);
    }

    #[test]
    fn prefers_last_newline_in_window() {
        let chunks = split("first line\nsecond line\nthird", 15);
        assert_eq!(chunks, vec!["first line", "second line", "third"]);
    }

    #[test]
    fn period_stays_with_its_sentence() {
        let chunks = split("One two. Three four five six", 12);
        assert_eq!(chunks[0], "One two.");
        assert_eq!(chunks[1], "Three four f");
        assert_eq!(chunks[2], "ive six");
    }

    #[test]
    fn any_period_in_window_is_a_cut() {
        let chunks = split("pi is 3.14159 roughly", 10);
        assert_eq!(chunks, vec!["pi is 3.", "14159 roug", "hly"]);
    }

    #[test]
    fn period_before_closing_punctuation_is_a_cut() {
        let chunks = split("wwwwwwww.\") zzzzzzzzzz", 15);
        assert_eq!(chunks[0], "wwwwwwww.");
        assert_eq!(chunks[1], "\") zzzzzzzzzz");
    }

    #[test]
    fn boundary_at_offset_zero_is_ignored() {
        let text = format!("\n{}", "y".repeat(12));
        // Leading whitespace is trimmed first, so this is a plain hard cut.
        assert_eq!(split(&text, 10), vec!["y".repeat(10), "yy".to_string()]);

        let chunks = split(&format!(".{}", "z".repeat(12)), 10);
        assert_eq!(chunks[0].chars().count(), 10);
    }

    #[test]
    fn counts_characters_not_bytes() {
        let text = "привет ".repeat(20);
        let chunks = split(&text, 15);
        assert_within_limit(&chunks, 15);
        assert_eq!(strip_ws(&chunks.concat()), strip_ws(&text));
    }

    #[test]
    fn first_chunk_ends_at_period_inside_window() {
        // 9000 characters with a period at offset 4990.
        let text = format!("{}.{}", "a".repeat(4990), "b".repeat(4009));
        assert_eq!(text.chars().count(), 9000);

        let chunks = split(&text, 5000);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], format!("{}.", "a".repeat(4990)));
        assert_eq!(chunks[1], "b".repeat(4009));
    }

    #[test]
    fn whitespace_after_period_is_trimmed_at_the_cut() {
        let mut text = "a".repeat(4990);
        text.push('.');
        text.push(' ');
        text.push_str(&"b".repeat(9000 - 4992));
        assert_eq!(text.chars().count(), 9000);

        let chunks = split(&text, 5000);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chars().count(), 4991);
        assert!(chunks[0].ends_with('.'));
        assert_eq!(chunks[1], "b".repeat(9000 - 4992));
    }

    #[test]
    fn rejoining_chunks_reconstructs_content() {
        let samples = [
            "Short.",
            "Line one.\nLine two is longer than the others.\n\nLine three. And more text follows here.",
            "no boundaries at all in this long run of words that keeps going and going",
            "Mixed 3.5 numbers. Sentences!\nNewlines\n\n\n   spaced   out.   ",
        ];

        for sample in samples {
            for limit in [1, 3, 7, 16, 40, 200] {
                let chunks = split(sample, limit);
                assert!(!chunks.is_empty());
                assert_within_limit(&chunks, limit);
                assert_eq!(
                    strip_ws(&chunks.concat()),
                    strip_ws(sample),
                    "limit {limit} lost content of {sample:?}"
                );
            }
        }
    }

    #[test]
    fn zero_limit_behaves_as_one() {
        assert_eq!(split("abc", 0), vec!["a", "b", "c"]);
    }
}
