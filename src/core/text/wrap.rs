//! Sequence-aware greedy line wrapping.
//!
//! Word boundaries are decided on the sequence-free text and mapped back onto the input, so
//! every chunk keeps the sequences that precede its text. Widths are measured with
//! [`Sequence::length`], so sequences never count toward a line and wide glyphs count twice.

use tracing::trace;

use super::registry::CapabilityRegistry;
use super::sequence::Sequence;
use super::tokenize::iter_parse;
use super::utils::{ends_sentence, expand_tabs, is_whitespace_char, split_words};
use super::width;
use crate::config::EnvConfig;
use crate::error::{Error, Result};
use crate::logging;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapOptions {
    pub width: usize,
    pub initial_indent: String,
    pub subsequent_indent: String,
    pub expand_tabs: bool,
    pub tab_size: usize,
    pub replace_whitespace: bool,
    pub fix_sentence_endings: bool,
    pub break_long_words: bool,
    pub drop_whitespace: bool,
    pub break_on_hyphens: bool,
    pub max_lines: Option<usize>,
    pub placeholder: String,
}

impl WrapOptions {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            initial_indent: String::new(),
            subsequent_indent: String::new(),
            expand_tabs: true,
            tab_size: 8,
            replace_whitespace: true,
            fix_sentence_endings: false,
            break_long_words: true,
            drop_whitespace: true,
            break_on_hyphens: true,
            max_lines: None,
            placeholder: " [...]".to_string(),
        }
    }

    /// Options for the configured terminal width and tab size.
    pub fn from_env(config: &EnvConfig) -> Self {
        Self {
            tab_size: config.tab_size,
            ..Self::new(config.wrap_width())
        }
    }
}

impl Default for WrapOptions {
    fn default() -> Self {
        Self::new(70)
    }
}

/// Greedy wrapper whose width accounting understands terminal sequences.
#[derive(Debug, Clone)]
pub struct SequenceTextWrapper<'r> {
    options: WrapOptions,
    registry: &'r CapabilityRegistry,
}

impl<'r> SequenceTextWrapper<'r> {
    /// Validates `options` up front: the width must be positive, and with `max_lines` set the
    /// placeholder must fit after the indent.
    pub fn new(registry: &'r CapabilityRegistry, options: WrapOptions) -> Result<Self> {
        if options.width == 0 {
            return Err(Error::InvalidWidth {
                width: options.width,
            });
        }
        let wrapper = Self { options, registry };
        if let Some(max_lines) = wrapper.options.max_lines {
            let indent = if max_lines > 1 {
                &wrapper.options.subsequent_indent
            } else {
                &wrapper.options.initial_indent
            };
            let indent = wrapper.measure(indent);
            let placeholder = wrapper.measure(wrapper.options.placeholder.trim_start());
            if indent + placeholder > wrapper.options.width {
                return Err(Error::PlaceholderTooLarge {
                    indent,
                    placeholder,
                    width: wrapper.options.width,
                });
            }
        }
        Ok(wrapper)
    }

    pub fn options(&self) -> &WrapOptions {
        &self.options
    }

    /// Wraps a single paragraph into lines of at most `width` cells.
    pub fn wrap(&self, text: &str) -> Vec<String> {
        let mut chunks = self.split_chunks(text);
        if self.options.fix_sentence_endings {
            self.fix_sentence_endings(&mut chunks);
        }
        self.wrap_chunks(chunks)
    }

    /// [`SequenceTextWrapper::wrap`] joined with newlines.
    pub fn fill(&self, text: &str) -> String {
        self.wrap(text).join("\n")
    }

    fn measure(&self, text: &str) -> usize {
        Sequence::new(text, self.registry).length()
    }

    fn is_blank(&self, chunk: &str) -> bool {
        Sequence::new(chunk, self.registry).strip(None).is_empty()
    }

    /// Sequences in `chunk` that survive dropping its whitespace, such as a style reset.
    fn motionless_sequences(&self, chunk: &str) -> String {
        iter_parse(self.registry, chunk)
            .filter(|token| {
                token
                    .capability
                    .is_some_and(|capability| capability.motion().horizontal_distance.is_none())
            })
            .map(|token| token.text)
            .collect()
    }

    /// Byte offset just past the first token of `chunk` that is plain text or takes cells.
    fn first_visible_end(&self, chunk: &str) -> usize {
        let mut end = 0;
        for token in iter_parse(self.registry, chunk) {
            end += token.text.len();
            if token.capability.is_none() || self.measure(token.text) > 0 {
                return end;
            }
        }
        end
    }

    fn munge_whitespace(&self, text: &str) -> String {
        let mut text = if self.options.expand_tabs {
            let tokens = iter_parse(self.registry, text).map(|token| token.text);
            let registry = self.registry;
            expand_tabs(tokens, self.options.tab_size, |piece| {
                if registry.contains_sequence(piece) {
                    0
                } else {
                    width::text_width(piece)
                }
            })
        } else {
            text.to_string()
        };
        if self.options.replace_whitespace {
            text = text
                .chars()
                .map(|ch| if is_whitespace_char(ch) { ' ' } else { ch })
                .collect();
        }
        text
    }

    fn split_chunks(&self, text: &str) -> Vec<String> {
        let text = self.munge_whitespace(text);
        self.split(&text)
    }

    /// Splits on the sequence-free text, then maps each chunk back onto `text`.
    fn split(&self, text: &str) -> Vec<String> {
        let mut stripped = String::with_capacity(text.len());
        // after[i] is the offset in `text` just past stripped byte i - 1.
        let mut after: Vec<usize> = vec![0];
        let mut position = 0;
        for token in iter_parse(self.registry, text) {
            if token.capability.is_none() {
                stripped.push_str(token.text);
                after.extend((1..=token.text.len()).map(|step| position + step));
            }
            position += token.text.len();
        }

        let ranges = split_words(&stripped, self.options.break_on_hyphens);
        let last = ranges.len().saturating_sub(1);
        let mut chunks = Vec::with_capacity(ranges.len());
        let mut start = 0;
        for (idx, range) in ranges.into_iter().enumerate() {
            let end = if idx == last {
                text.len()
            } else {
                after[range.end]
            };
            chunks.push(text[start..end].to_string());
            start = end;
        }
        chunks
    }

    fn fix_sentence_endings(&self, chunks: &mut [String]) {
        let mut i = 0;
        while i + 1 < chunks.len() {
            let next_is_space = Sequence::new(&chunks[i + 1], self.registry).strip_seqs() == " ";
            let ends = ends_sentence(&Sequence::new(&chunks[i], self.registry).strip_seqs());
            if next_is_space && ends {
                chunks[i + 1] = chunks[i + 1].replacen(' ', "  ", 1);
                i += 2;
            } else {
                i += 1;
            }
        }
    }

    fn wrap_chunks(&self, mut chunks: Vec<String>) -> Vec<String> {
        let options = &self.options;
        let mut lines: Vec<String> = Vec::new();

        // Reversed so the next chunk is popped off the end.
        chunks.reverse();
        while !chunks.is_empty() {
            let mut cur_line: Vec<String> = Vec::new();
            let mut cur_len = 0usize;

            let indent = if lines.is_empty() {
                &options.initial_indent
            } else {
                &options.subsequent_indent
            };
            let width = options.width as isize - self.measure(indent) as isize;

            // A leading blank chunk is dropped, except at the very start of the text.
            if options.drop_whitespace
                && !lines.is_empty()
                && chunks.last().is_some_and(|chunk| self.is_blank(chunk))
            {
                if let Some(blank) = chunks.pop() {
                    let kept = self.motionless_sequences(&blank);
                    match chunks.last_mut() {
                        Some(next) => next.insert_str(0, &kept),
                        None => {
                            if let Some(previous) = lines.last_mut() {
                                previous.push_str(&kept);
                            }
                        }
                    }
                }
            }

            while let Some(chunk) = chunks.last() {
                let chunk_len = self.measure(chunk);

                if chunk_len as isize > width {
                    self.handle_long_word(&mut chunks, &mut cur_line, cur_len, width);
                    cur_len = cur_line.iter().map(|chunk| self.measure(chunk)).sum();
                    break;
                }
                if (cur_len + chunk_len) as isize > width {
                    break;
                }
                if let Some(chunk) = chunks.pop() {
                    cur_line.push(chunk);
                    cur_len += chunk_len;
                }
            }

            if options.drop_whitespace && cur_line.last().is_some_and(|last| self.is_blank(last)) {
                if let Some(blank) = cur_line.pop() {
                    cur_len = cur_len.saturating_sub(self.measure(&blank));
                    let kept = self.motionless_sequences(&blank);
                    if let Some(last) = cur_line.last_mut() {
                        last.push_str(&kept);
                    } else if let Some(next) = chunks.last_mut() {
                        next.insert_str(0, &kept);
                    }
                }
            }

            if cur_line.is_empty() {
                continue;
            }

            let fits = match options.max_lines {
                None => true,
                Some(max_lines) => {
                    let only_blank_left = chunks.is_empty()
                        || (options.drop_whitespace
                            && chunks.len() == 1
                            && self.is_blank(&chunks[0]));
                    lines.len() + 1 < max_lines || (only_blank_left && cur_len as isize <= width)
                }
            };
            if fits {
                lines.push(format!("{indent}{}", cur_line.concat()));
                continue;
            }

            self.place_placeholder(&mut lines, cur_line, cur_len, indent, width);
            break;
        }

        lines
    }

    /// Ends the output on the last allowed line, dropping trailing chunks until the
    /// placeholder fits.
    fn place_placeholder(
        &self,
        lines: &mut Vec<String>,
        mut cur_line: Vec<String>,
        mut cur_len: usize,
        indent: &str,
        width: isize,
    ) {
        let placeholder = &self.options.placeholder;
        let placeholder_len = self.measure(placeholder);

        while let Some(last) = cur_line.last() {
            if !self.is_blank(last) && (cur_len + placeholder_len) as isize <= width {
                cur_line.push(placeholder.clone());
                lines.push(format!("{indent}{}", cur_line.concat()));
                return;
            }
            cur_len = cur_len.saturating_sub(self.measure(last));
            cur_line.pop();
        }

        if let Some(previous) = lines.last_mut() {
            let trimmed = previous.trim_end();
            if self.measure(trimmed) + placeholder_len <= self.options.width {
                *previous = format!("{trimmed}{placeholder}");
                return;
            }
        }
        lines.push(format!("{indent}{}", placeholder.trim_start()));
    }

    /// Breaks the oversized chunk on top of `chunks` to fill the rest of the line.
    ///
    /// The chunk is consumed token by token, so sequences are never split. A glyph two cells
    /// wide may overflow a one-cell line rather than never being placed.
    fn handle_long_word(
        &self,
        chunks: &mut Vec<String>,
        cur_line: &mut Vec<String>,
        cur_len: usize,
        width: isize,
    ) {
        // At least one token must move on every pass, even when the indent eats the width.
        let space_left = if width < 1 {
            1
        } else {
            width - cur_len as isize
        };

        if self.options.break_long_words && space_left > 0 {
            let Some(chunk) = chunks.last_mut() else {
                return;
            };
            let mut idx = 0;
            let mut next = 0;
            let mut visible_tokens = 0;
            let mut seq_length = 0usize;
            let mut last_hyphen_idx = 0;
            let mut seen_non_hyphen = false;
            // Whether `chunk[..idx]` takes any cells or holds plain text.
            let mut cut_is_visible = false;

            for token in iter_parse(self.registry, chunk) {
                next += token.text.len();
                let cells = self.measure(token.text);
                let visible = token.capability.is_none() || cells > 0;
                if visible {
                    visible_tokens += 1;
                }
                seq_length += cells;
                if seq_length as isize > space_left {
                    let wide_glyph_overflow =
                        cur_len == 0 && space_left == 1 && visible_tokens == 1 && seq_length == 2;
                    if !wide_glyph_overflow {
                        break;
                    }
                }
                idx = next;
                cut_is_visible |= visible;
                if token.capability.is_none() {
                    if token.text == "-" {
                        if seen_non_hyphen {
                            last_hyphen_idx = next;
                        }
                    } else {
                        seen_non_hyphen = true;
                    }
                }
            }

            if self.options.break_on_hyphens && last_hyphen_idx > 0 {
                idx = last_hyphen_idx;
            }
            // Sequences alone never end a line. An empty line takes at least one visible
            // token, otherwise the cut would be dropped and put back on the same chunk.
            if !cut_is_visible {
                idx = if cur_line.is_empty() {
                    self.first_visible_end(chunk)
                } else {
                    0
                };
            }
            trace!(
                target: logging::WRAP,
                split_at = idx,
                chunk_len = chunk.len(),
                space_left,
                "breaking long word"
            );
            if idx > 0 {
                let tail = chunk.split_off(idx);
                cur_line.push(std::mem::replace(chunk, tail));
                if chunk.is_empty() {
                    chunks.pop();
                }
            }
        } else if cur_line.is_empty() {
            // Unbreakable: give it a line of its own rather than splitting it.
            if let Some(chunk) = chunks.pop() {
                cur_line.push(chunk);
            }
        }
    }
}

/// Wraps every line of `text`, keeping blank lines as empty strings.
pub fn wrap(
    text: &str,
    registry: &CapabilityRegistry,
    options: WrapOptions,
) -> Result<Vec<String>> {
    let wrapper = SequenceTextWrapper::new(registry, options)?;
    let mut lines = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            lines.push(String::new());
        } else {
            lines.extend(wrapper.wrap(line));
        }
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::{wrap, SequenceTextWrapper, WrapOptions};
    use crate::core::text::registry::CapabilityRegistry;
    use crate::core::text::sequence::Sequence;
    use crate::error::Error;

    fn ansi() -> CapabilityRegistry {
        CapabilityRegistry::ansi().unwrap()
    }

    fn wrap_with(registry: &CapabilityRegistry, text: &str, options: WrapOptions) -> Vec<String> {
        SequenceTextWrapper::new(registry, options).unwrap().wrap(text)
    }

    #[test]
    fn plain_words_wrap_on_spaces() {
        let registry = ansi();
        let options = WrapOptions {
            break_on_hyphens: false,
            ..WrapOptions::new(5)
        };
        assert_eq!(wrap_with(&registry, "hello world", options), vec!["hello", "world"]);
    }

    #[test]
    fn sequences_do_not_count_toward_width() {
        let registry = ansi();
        let text = "\x1b[31mred\x1b[0m \x1b[32mgreen\x1b[0m";
        let lines = wrap_with(&registry, text, WrapOptions::new(9));
        assert_eq!(lines, vec![text]);
        let lines = wrap_with(&registry, text, WrapOptions::new(5));
        assert_eq!(lines, vec!["\x1b[31mred\x1b[0m", "\x1b[32mgreen\x1b[0m"]);
    }

    #[test]
    fn sequences_stay_with_the_word_they_prefix() {
        let registry = ansi();
        let lines = wrap_with(&registry, "aa \x1b[1mbb", WrapOptions::new(2));
        assert_eq!(lines, vec!["aa", "\x1b[1mbb"]);
    }

    #[test]
    fn indents_reduce_line_width() {
        let registry = ansi();
        let options = WrapOptions {
            initial_indent: "* ".to_string(),
            subsequent_indent: "  ".to_string(),
            ..WrapOptions::new(8)
        };
        assert_eq!(
            wrap_with(&registry, "one two three", options),
            vec!["* one", "  two", "  three"]
        );
    }

    #[test]
    fn long_words_are_broken_by_width() {
        let registry = ansi();
        let lines = wrap_with(&registry, "abcdefghij", WrapOptions::new(4));
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn long_words_keep_sequences_intact() {
        let registry = ansi();
        let lines = wrap_with(&registry, "\x1b[31mabcdef\x1b[0m", WrapOptions::new(3));
        assert_eq!(lines, vec!["\x1b[31mabc", "def\x1b[0m"]);
    }

    #[test]
    fn wide_glyphs_break_by_cells() {
        let registry = ansi();
        let lines = wrap_with(&registry, "コンニチハ", WrapOptions::new(4));
        assert_eq!(lines, vec!["コン", "ニチ", "ハ"]);
    }

    #[test]
    fn wide_glyph_may_overflow_single_cell_line() {
        let registry = ansi();
        let lines = wrap_with(&registry, "コン", WrapOptions::new(1));
        assert_eq!(lines, vec!["コ", "ン"]);
    }

    #[test]
    fn styled_wide_glyph_overflows_single_cell_line() {
        let registry = ansi();
        let lines = wrap_with(&registry, "\x1b[31mコン", WrapOptions::new(1));
        assert_eq!(lines, vec!["\x1b[31mコ", "ン"]);
    }

    #[test]
    fn indent_filling_the_width_still_places_text() {
        let registry = ansi();
        let options = WrapOptions {
            initial_indent: "ab".to_string(),
            ..WrapOptions::new(2)
        };
        assert_eq!(
            wrap_with(&registry, "\x1b[31mコン", options),
            vec!["ab\x1b[31mコ", "ン"]
        );

        let options = WrapOptions {
            initial_indent: ">>>".to_string(),
            ..WrapOptions::new(2)
        };
        assert_eq!(wrap_with(&registry, "abc", options), vec![">>>a", "bc"]);
    }

    #[test]
    fn sequences_before_an_unfitting_glyph_move_with_it() {
        let registry = ansi();
        let lines = wrap_with(&registry, "a \x1b[31mコンニ", WrapOptions::new(3));
        assert_eq!(lines, vec!["a", "\x1b[31mコ", "ン", "ニ"]);
    }

    #[test]
    fn long_word_breaks_prefer_hyphens() {
        let registry = ansi();
        let lines = wrap_with(&registry, "ab-cdefgh", WrapOptions::new(6));
        assert_eq!(lines, vec!["ab-", "cdefgh"]);
        let options = WrapOptions {
            break_on_hyphens: false,
            ..WrapOptions::new(6)
        };
        assert_eq!(wrap_with(&registry, "ab-cdefgh", options), vec!["ab-cde", "fgh"]);
        assert_eq!(
            wrap_with(&registry, "a-b-cdefgh", WrapOptions::new(6)),
            vec!["a-b-", "cdefgh"]
        );
    }

    #[test]
    fn unbreakable_words_get_their_own_line() {
        let registry = ansi();
        let options = WrapOptions {
            break_long_words: false,
            ..WrapOptions::new(4)
        };
        assert_eq!(
            wrap_with(&registry, "ab abcdefgh cd", options),
            vec!["ab", "abcdefgh", "cd"]
        );
    }

    #[test]
    fn whitespace_is_kept_when_not_dropping() {
        let registry = ansi();
        let options = WrapOptions {
            drop_whitespace: false,
            ..WrapOptions::new(5)
        };
        assert_eq!(wrap_with(&registry, "ab cd ef", options), vec!["ab cd", " ef"]);
    }

    #[test]
    fn leading_whitespace_of_first_line_is_kept() {
        let registry = ansi();
        assert_eq!(wrap_with(&registry, "  ab cd", WrapOptions::new(5)), vec!["  ab", "cd"]);
    }

    #[test]
    fn max_lines_appends_placeholder() {
        let registry = ansi();
        let options = WrapOptions {
            max_lines: Some(1),
            placeholder: "...".to_string(),
            ..WrapOptions::new(10)
        };
        let lines = wrap_with(&registry, "hello world again", options);
        assert_eq!(lines, vec!["hello..."]);
        assert!(Sequence::new(&lines[0], &registry).length() <= 10);
    }

    #[test]
    fn max_lines_drops_trailing_words_for_placeholder() {
        let registry = ansi();
        let options = WrapOptions {
            max_lines: Some(2),
            ..WrapOptions::new(12)
        };
        let lines = wrap_with(&registry, "one two three four five six", options);
        assert_eq!(lines, vec!["one two", "three [...]"]);
    }

    #[test]
    fn placeholder_moves_to_previous_line_when_nothing_fits() {
        let registry = ansi();
        let options = WrapOptions {
            max_lines: Some(2),
            placeholder: "..".to_string(),
            ..WrapOptions::new(5)
        };
        let lines = wrap_with(&registry, "ab cdefg hij", options);
        assert_eq!(lines, vec!["ab.."]);
    }

    #[test]
    fn fitting_text_is_untouched_by_max_lines() {
        let registry = ansi();
        let options = WrapOptions {
            max_lines: Some(2),
            ..WrapOptions::new(10)
        };
        assert_eq!(wrap_with(&registry, "short text", options), vec!["short text"]);
    }

    #[test]
    fn tabs_and_newlines_become_spaces() {
        let registry = ansi();
        let options = WrapOptions {
            tab_size: 4,
            ..WrapOptions::new(20)
        };
        assert_eq!(wrap_with(&registry, "a\tb\nc", options), vec!["a   b c"]);
    }

    #[test]
    fn sentence_endings_get_two_spaces() {
        let registry = ansi();
        let options = WrapOptions {
            fix_sentence_endings: true,
            ..WrapOptions::new(40)
        };
        assert_eq!(
            wrap_with(&registry, "It ended. Then more.", options),
            vec!["It ended.  Then more."]
        );
    }

    #[test]
    fn invalid_configuration_fails_fast() {
        let registry = ansi();
        let err = SequenceTextWrapper::new(&registry, WrapOptions::new(0)).unwrap_err();
        assert!(matches!(err, Error::InvalidWidth { width: 0 }));

        let options = WrapOptions {
            max_lines: Some(1),
            initial_indent: "    ".to_string(),
            ..WrapOptions::new(6)
        };
        let err = SequenceTextWrapper::new(&registry, options).unwrap_err();
        assert!(matches!(err, Error::PlaceholderTooLarge { indent: 4, placeholder: 5, width: 6 }));
    }

    #[test]
    fn wrap_keeps_blank_lines() {
        let registry = ansi();
        let lines = wrap("one two\n\nthree", &registry, WrapOptions::new(3)).unwrap();
        assert_eq!(lines, vec!["one", "two", "", "thr", "ee"]);
    }

    #[test]
    fn fill_joins_lines() {
        let registry = ansi();
        let wrapper = SequenceTextWrapper::new(&registry, WrapOptions::new(3)).unwrap();
        assert_eq!(wrapper.fill("ab cd"), "ab\ncd");
    }
}
