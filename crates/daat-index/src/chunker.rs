//! Fixed-size word chunking.

/// Default maximum number of words per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Word separator: the ECMAScript `\s` class, i.e. Unicode `White_Space`
/// without U+0085 (NEL) plus U+FEFF (zero-width no-break space).
fn is_separator(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{feff}'
}

/// Non-empty runs of `text` between separators.
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(is_separator).filter(|w| !w.is_empty())
}

/// Split `text` into chunks of at most `chunk_size` words.
///
/// Words are rejoined with single spaces, so original spacing and line breaks
/// are not preserved. Empty or whitespace-only text yields no chunks. A
/// `chunk_size` of zero is treated as one.
#[must_use]
pub fn chunk_text(text: &str, chunk_size: usize) -> Vec<String> {
    let all: Vec<&str> = words(text).collect();
    all.chunks(chunk_size.max(1))
        .map(|group| group.join(" "))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> String {
        (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(chunk_text("", DEFAULT_CHUNK_SIZE).is_empty());
    }

    #[test]
    fn whitespace_only_yields_no_chunks() {
        assert!(chunk_text(" \n\t  \r\n", DEFAULT_CHUNK_SIZE).is_empty());
    }

    #[test]
    fn three_words_single_chunk() {
        let chunks = chunk_text("alpha beta gamma", DEFAULT_CHUNK_SIZE);
        assert_eq!(chunks, vec!["alpha beta gamma"]);
    }

    #[test]
    fn twelve_hundred_words_split_500_500_200() {
        let chunks = chunk_text(&numbered(1200), DEFAULT_CHUNK_SIZE);
        let counts: Vec<usize> = chunks
            .iter()
            .map(|c| c.split_whitespace().count())
            .collect();
        assert_eq!(counts, vec![500, 500, 200]);
        assert!(chunks[0].starts_with("w0 "));
        assert!(chunks[2].ends_with("w1199"));
    }

    #[test]
    fn exact_multiple_has_full_last_chunk() {
        let chunks = chunk_text(&numbered(10), 5);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].split_whitespace().count(), 5);
    }

    #[test]
    fn runs_of_whitespace_collapse() {
        let chunks = chunk_text("  # Title\n\n  body\ttext  ", 10);
        assert_eq!(chunks, vec!["# Title body text"]);
    }

    #[test]
    fn byte_order_mark_separates_words() {
        assert_eq!(chunk_text("\u{feff}a\u{feff}b c", 10), vec!["a b c"]);
    }

    #[test]
    fn next_line_does_not_separate_words() {
        assert_eq!(chunk_text("a\u{85}b c", 10), vec!["a\u{85}b c"]);
    }

    #[test]
    fn unicode_spaces_separate_words() {
        let chunks = chunk_text("a\u{a0}b\u{2003}c\u{3000}d\u{2028}e", 2);
        assert_eq!(chunks, vec!["a b", "c d", "e"]);
    }

    #[test]
    fn zero_chunk_size_does_not_panic() {
        assert_eq!(chunk_text("a b", 0), vec!["a", "b"]);
    }

    mod proptest_chunker {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(500))]

            #[test]
            fn chunk_count_law(
                content in "[a-z \\n\\t]{0,2000}",
                chunk_size in 1usize..50,
            ) {
                let w = words(&content).count();
                let chunks = chunk_text(&content, chunk_size);

                prop_assert_eq!(chunks.len(), w.div_ceil(chunk_size));
                if let Some((last, rest)) = chunks.split_last() {
                    for chunk in rest {
                        prop_assert_eq!(chunk.split_whitespace().count(), chunk_size);
                    }
                    let expected_last = if w % chunk_size == 0 { chunk_size } else { w % chunk_size };
                    prop_assert_eq!(last.split_whitespace().count(), expected_last);
                }
            }

            #[test]
            fn chunk_join_law(
                content in "(\\PC|\u{85}|\u{feff}){0,1000}",
                chunk_size in 1usize..100,
            ) {
                let chunks = chunk_text(&content, chunk_size);
                let rejoined = chunks.join(" ");
                let original: Vec<&str> = words(&content).collect();
                let roundtrip: Vec<&str> = words(&rejoined).collect();
                prop_assert_eq!(roundtrip, original);
            }

            #[test]
            fn no_empty_chunks(
                content in "\\PC{0,500}",
                chunk_size in 0usize..20,
            ) {
                for chunk in chunk_text(&content, chunk_size) {
                    prop_assert!(!chunk.is_empty());
                }
            }
        }
    }
}
