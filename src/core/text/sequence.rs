//! Width-aware view of a string containing terminal sequences.

use std::fmt;

use tracing::warn;
use unicode_segmentation::UnicodeSegmentation;

use super::registry::CapabilityRegistry;
use super::tokenize::iter_parse;
use super::width::{self, VARIATION_SELECTOR_16, ZERO_WIDTH_JOINER};
use crate::logging;

/// Most columns a single forward movement expands to; larger counts are clamped.
pub const MAX_FORWARD_COLUMNS: usize = u16::MAX as usize;

/// A string paired with the registry that recognizes its sequences.
///
/// Every operation returns a new string; the wrapped text is never modified.
#[derive(Debug, Clone, Copy)]
pub struct Sequence<'a> {
    text: &'a str,
    registry: &'a CapabilityRegistry,
}

impl<'a> Sequence<'a> {
    pub fn new(text: &'a str, registry: &'a CapabilityRegistry) -> Self {
        Self { text, registry }
    }

    pub fn as_str(&self) -> &'a str {
        self.text
    }

    pub fn registry(&self) -> &'a CapabilityRegistry {
        self.registry
    }

    /// Printable width in terminal cells.
    ///
    /// Horizontal movement is collapsed first, so `"_\x08+"` measures 1 and a lone backspace
    /// measures 0. Wide glyphs take two cells each.
    pub fn length(&self) -> usize {
        width::text_width(&self.normalize(true))
    }

    /// Rewrites non-destructive horizontal movement as destructive spacing.
    ///
    /// Forward movement becomes that many spaces; backward movement erases the characters
    /// already emitted. Other capabilities are kept verbatim, or removed entirely when `strip`
    /// is set.
    pub fn normalize(&self, strip: bool) -> String {
        let registry = self.registry;
        if !registry.contains_sequence(self.text) {
            return self.text.to_string();
        }

        let data = if strip {
            let data = registry.remove_motionless(self.text);
            if !registry.contains_sequence(&data) {
                return data.into_owned();
            }
            data
        } else {
            self.text.into()
        };

        let mut output = String::with_capacity(data.len());
        let mut last_end = 0;
        for (span, capability) in registry.capability_spans(&data, strip) {
            if span.start > last_end {
                output.push_str(&data[last_end..span.start]);
            }
            last_end = span.end;
            let text = &data[span];
            let distance = capability.horizontal_distance(text).unwrap_or_else(|err| {
                warn!(target: logging::REGISTRY, %err, "capability span failed its own pattern");
                0
            });

            if distance > 0 {
                let columns = usize::try_from(distance).map_or(MAX_FORWARD_COLUMNS, |columns| {
                    columns.min(MAX_FORWARD_COLUMNS)
                });
                output.extend(std::iter::repeat(' ').take(columns));
            } else if distance < 0 {
                for _ in 0..distance.unsigned_abs() {
                    if output.pop().is_none() {
                        break;
                    }
                }
            } else {
                output.push_str(text);
            }
        }
        if last_end < data.len() {
            output.push_str(&data[last_end..]);
        }
        output
    }

    /// Alias of [`Sequence::normalize`].
    pub fn padd(&self, strip: bool) -> String {
        self.normalize(strip)
    }

    /// Text with every capability removed and horizontal movement collapsed.
    pub fn strip_seqs(&self) -> String {
        self.normalize(true)
    }

    pub fn strip(&self, chars: Option<&str>) -> String {
        let plain = self.strip_seqs();
        match chars {
            Some(set) => plain.trim_matches(|ch| set.contains(ch)).to_string(),
            None => plain.trim().to_string(),
        }
    }

    pub fn lstrip(&self, chars: Option<&str>) -> String {
        let plain = self.strip_seqs();
        match chars {
            Some(set) => plain.trim_start_matches(|ch| set.contains(ch)).to_string(),
            None => plain.trim_start().to_string(),
        }
    }

    pub fn rstrip(&self, chars: Option<&str>) -> String {
        let plain = self.strip_seqs();
        match chars {
            Some(set) => plain.trim_end_matches(|ch| set.contains(ch)).to_string(),
            None => plain.trim_end().to_string(),
        }
    }

    /// Pads on the right with whole repetitions of `fillchar` up to `width` cells.
    pub fn ljust(&self, width: usize, fillchar: &str) -> String {
        let fill = fillchar.repeat(fill_count(width.saturating_sub(self.length()), fillchar));
        format!("{}{fill}", self.text)
    }

    pub fn rjust(&self, width: usize, fillchar: &str) -> String {
        let fill = fillchar.repeat(fill_count(width.saturating_sub(self.length()), fillchar));
        format!("{fill}{}", self.text)
    }

    /// Centers within `width` cells; an odd remainder goes to the right.
    pub fn center(&self, width: usize, fillchar: &str) -> String {
        let deficit = width.saturating_sub(self.length());
        let left = fillchar.repeat(fill_count(deficit / 2, fillchar));
        let right = fillchar.repeat(fill_count(deficit - deficit / 2, fillchar));
        format!("{left}{}{right}", self.text)
    }

    /// Cuts printable text beyond `width` cells while keeping every sequence.
    ///
    /// Capabilities after the cut point are still appended, so a trailing style reset survives.
    pub fn truncate(&self, width: usize) -> String {
        let padded = self.normalize(false);
        let mut output = String::with_capacity(padded.len());
        let mut current = 0usize;
        let mut last_measured: Option<char> = None;
        let mut skip_next = false;

        let mut tokens = iter_parse(self.registry, &padded);
        for token in tokens.by_ref() {
            if token.capability.is_none() {
                let Some(ch) = token.text.chars().next() else {
                    continue;
                };
                if ch == ZERO_WIDTH_JOINER {
                    skip_next = true;
                    output.push(ch);
                    continue;
                }
                if skip_next {
                    skip_next = false;
                    output.push(ch);
                    continue;
                }
                if ch == VARIATION_SELECTOR_16 {
                    if let Some(base) = last_measured.take() {
                        current += width::vs16_width(base);
                        if current > width {
                            break;
                        }
                        output.push(ch);
                        continue;
                    }
                }
                let cells = width::char_width(ch);
                if cells > 0 {
                    last_measured = Some(ch);
                }
                current += cells;
                if current > width {
                    break;
                }
            }
            output.push_str(token.text);
        }

        for token in tokens {
            if token.is_sequence() {
                output.push_str(token.text);
            }
        }
        output
    }

    /// Grapheme clusters of the stripped text.
    pub fn graphemes(&self) -> Vec<String> {
        self.strip_seqs()
            .graphemes(true)
            .map(str::to_string)
            .collect()
    }
}

fn fill_count(deficit: usize, fillchar: &str) -> usize {
    match fillchar.chars().count() {
        0 => 0,
        unit => deficit / unit,
    }
}

impl fmt::Display for Sequence<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text)
    }
}

impl AsRef<str> for Sequence<'_> {
    fn as_ref(&self) -> &str {
        self.text
    }
}
