//! Word splitting and whitespace helpers for the wrapper.
//!
//! Splitting follows the classic `textwrap` rules: runs of whitespace are chunks of their own;
//! with hyphen breaking enabled, words also split after a hyphen between letters and around
//! em-dashes (`--`) placed between words.

use std::ops::Range;

/// Whitespace recognized by the wrapper: tab, newline, vertical tab, form feed, CR, space.
pub fn is_whitespace_char(ch: char) -> bool {
    matches!(ch, '\t' | '\n' | '\x0b' | '\x0c' | '\r' | ' ')
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn is_letter(ch: char) -> bool {
    is_word_char(ch) && !ch.is_numeric()
}

fn is_word_punct(ch: char) -> bool {
    is_word_char(ch) || matches!(ch, '!' | '"' | '\'' | '&' | '.' | ',' | '?')
}

/// Splits `text` into word and whitespace chunks, returned as byte ranges covering the input.
pub fn split_words(text: &str, break_on_hyphens: bool) -> Vec<Range<usize>> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let n = chars.len();
    let offset = |i: usize| chars.get(i).map_or(text.len(), |(at, _)| *at);

    let mut ranges = Vec::new();
    let mut i = 0;
    while i < n {
        let start = i;
        if is_whitespace_char(chars[i].1) {
            while i < n && is_whitespace_char(chars[i].1) {
                i += 1;
            }
        } else if !break_on_hyphens {
            while i < n && !is_whitespace_char(chars[i].1) {
                i += 1;
            }
        } else if let Some(end) = em_dash_at(&chars, i) {
            i = end;
        } else {
            i += 1;
            while i < n && !is_whitespace_char(chars[i].1) {
                if chars[i].1 == '-' && hyphen_breaks_after(&chars, i) {
                    i += 1;
                    break;
                }
                if em_dash_at(&chars, i).is_some() {
                    break;
                }
                i += 1;
            }
        }
        ranges.push(offset(start)..offset(i));
    }
    ranges
}

/// End of an em-dash run (`--+`) starting at `i`, when it sits between a word-ish character and
/// a word character.
fn em_dash_at(chars: &[(usize, char)], i: usize) -> Option<usize> {
    if i == 0 || !is_word_punct(chars[i - 1].1) {
        return None;
    }
    let mut end = i;
    while end < chars.len() && chars[end].1 == '-' {
        end += 1;
    }
    let follows_word = chars.get(end).is_some_and(|(_, ch)| is_word_char(*ch));
    (end - i >= 2 && follows_word).then_some(end)
}

/// Whether a hyphenated word may break after the hyphen at `at`.
fn hyphen_breaks_after(chars: &[(usize, char)], at: usize) -> bool {
    let ch = |i: usize| chars.get(i).map(|(_, c)| *c);
    let letter = |i: usize| ch(i).is_some_and(is_letter);

    let behind = (at >= 2 && letter(at - 2) && letter(at - 1))
        || (at >= 3 && letter(at - 3) && ch(at - 2) == Some('-') && letter(at - 1));
    let ahead = letter(at + 1)
        && (letter(at + 2) || (ch(at + 2) == Some('-') && letter(at + 3)));
    behind && ahead
}

/// Whether `text` ends like a sentence: a lowercase letter, `.`/`!`/`?`, then an optional quote.
pub fn ends_sentence(text: &str) -> bool {
    let mut rev = text.chars().rev().peekable();
    if matches!(rev.peek(), Some('"' | '\'')) {
        rev.next();
    }
    matches!(rev.next(), Some('.' | '!' | '?'))
        && rev.next().is_some_and(|ch| ch.is_ascii_lowercase())
}

/// Expands tabs to the next multiple of `tab_size` columns; newlines reset the column.
///
/// `column_width` reports the columns taken by each non-tab piece.
pub fn expand_tabs<'a>(
    pieces: impl IntoIterator<Item = &'a str>,
    tab_size: usize,
    column_width: impl Fn(&str) -> usize,
) -> String {
    let mut output = String::new();
    let mut column = 0usize;
    for piece in pieces {
        match piece {
            "\t" => {
                if tab_size > 0 {
                    let pad = tab_size - column % tab_size;
                    output.extend(std::iter::repeat(' ').take(pad));
                    column += pad;
                }
            }
            "\n" | "\r" => {
                output.push_str(piece);
                column = 0;
            }
            _ => {
                output.push_str(piece);
                column += column_width(piece);
            }
        }
    }
    output
}
