//! Property tests for width-aware layout invariants.
//!
//! 1. Tokens partition any input
//! 2. Stripping sequences is idempotent
//! 3. `ljust` reaches at least the requested width
//! 4. `truncate` never exceeds the requested width and grows with it
//! 5. Wrapped lines fit the width (a lone wide glyph may overflow one cell), wrapping
//!    terminates even when the indent fills the width, and plain words survive in order

use proptest::prelude::*;
use termseq::{iter_parse, CapabilityRegistry, Sequence, SequenceTextWrapper, WrapOptions};

// ── Strategies ──────────────────────────────────────────────────────────

const FRAGMENTS: &[&str] = &[
    "a",
    "word",
    "x9",
    " ",
    "  ",
    "コ",
    "日本",
    "\x1b[1m",
    "\x1b[0m",
    "\x1b[38;5;200m",
    "\x1b[48;2;1;2;3m",
    "\x1b]8;;http://example.com\x1b\\",
];

const FORWARD: &str = "\x1b[2C";
const BACKSPACE: &str = "\x08";

fn text_from(extra: &[&'static str]) -> impl Strategy<Value = String> {
    let pieces: Vec<&'static str> = FRAGMENTS.iter().chain(extra).copied().collect();
    prop::collection::vec(prop::sample::select(pieces), 0..40).prop_map(|parts| parts.concat())
}

fn styled_text() -> impl Strategy<Value = String> {
    text_from(&[])
}

fn moving_text() -> impl Strategy<Value = String> {
    text_from(&[FORWARD, BACKSPACE])
}

fn registry() -> CapabilityRegistry {
    CapabilityRegistry::ansi().expect("ansi registry")
}

proptest! {
    #[test]
    fn tokens_partition_any_input(text in any::<String>()) {
        let registry = registry();
        let joined: String = iter_parse(&registry, &text).map(|token| token.text).collect();
        prop_assert_eq!(joined, text);
    }

    #[test]
    fn strip_seqs_is_idempotent(text in moving_text()) {
        let registry = registry();
        let once = Sequence::new(&text, &registry).strip_seqs();
        let twice = Sequence::new(&once, &registry).strip_seqs();
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn ljust_reaches_requested_width(text in moving_text(), width in 0usize..60) {
        let registry = registry();
        let seq = Sequence::new(&text, &registry);
        let padded = seq.ljust(width, " ");
        prop_assert!(padded.starts_with(text.as_str()));
        prop_assert_eq!(Sequence::new(&padded, &registry).length(), width.max(seq.length()));
    }

    #[test]
    fn truncate_stays_within_width(text in moving_text(), width in 0usize..30) {
        let registry = registry();
        let truncated = Sequence::new(&text, &registry).truncate(width);
        prop_assert!(Sequence::new(&truncated, &registry).length() <= width);
    }

    #[test]
    fn truncate_is_monotonic(text in text_from(&[FORWARD]), w1 in 0usize..20, extra in 0usize..20) {
        let registry = registry();
        let seq = Sequence::new(&text, &registry);
        let narrow = Sequence::new(&seq.truncate(w1), &registry).length();
        let wide = Sequence::new(&seq.truncate(w1 + extra), &registry).length();
        prop_assert!(narrow <= wide);
        prop_assert!(wide <= seq.length());
    }

    #[test]
    fn wrapped_lines_fit_width(text in styled_text(), width in 1usize..30) {
        let registry = registry();
        let wrapper = SequenceTextWrapper::new(&registry, WrapOptions::new(width))
            .expect("valid width");
        for line in wrapper.wrap(&text) {
            let length = Sequence::new(&line, &registry).length();
            // A lone wide glyph may overflow a one-cell line.
            let wide_glyph_overflow = width == 1 && length == 2;
            prop_assert!(
                length <= width || wide_glyph_overflow,
                "line {:?} exceeds width {}",
                line,
                width
            );
        }
    }

    #[test]
    fn wrapping_terminates_when_indent_fills_width(text in styled_text(), width in 1usize..6) {
        let registry = registry();
        let options = WrapOptions {
            initial_indent: "#".repeat(width + 1),
            subsequent_indent: "#".repeat(width),
            ..WrapOptions::new(width)
        };
        let wrapper = SequenceTextWrapper::new(&registry, options).expect("valid width");
        let lines = wrapper.wrap(&text);
        prop_assert!(lines.iter().all(|line| line.starts_with('#')));
    }

    #[test]
    fn plain_words_survive_wrapping(
        words in prop::collection::vec("[a-z]{1,8}", 1..30),
        width in 8usize..40,
    ) {
        let registry = registry();
        let text = words.join(" ");
        let wrapper = SequenceTextWrapper::new(&registry, WrapOptions::new(width))
            .expect("valid width");
        let lines = wrapper.wrap(&text);
        prop_assert!(lines.iter().all(|line| line.len() <= width));
        prop_assert_eq!(lines.join(" "), text);
    }
}
