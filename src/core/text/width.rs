//! Display width helpers.
//!
//! Character widths come from `unicode-width`. Variation selector 16 promotion uses the
//! emoji-variation table from Unicode 9.0.0: the narrow (non East Asian Wide) bases that gain an
//! emoji presentation, and with it a second cell, when followed by U+FE0F.

use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const ZERO_WIDTH_JOINER: char = '\u{200D}';
pub const VARIATION_SELECTOR_16: char = '\u{FE0F}';

/// Unicode version of [`VS16_NARROW_TO_WIDE`].
pub const VS16_UNICODE_VERSION: &str = "9.0.0";

/// Inclusive, sorted codepoint ranges.
const VS16_NARROW_TO_WIDE: &[(u32, u32)] = &[
    (0x0023, 0x0023),
    (0x002A, 0x002A),
    (0x0030, 0x0039),
    (0x00A9, 0x00A9),
    (0x00AE, 0x00AE),
    (0x203C, 0x203C),
    (0x2049, 0x2049),
    (0x2122, 0x2122),
    (0x2139, 0x2139),
    (0x2194, 0x2199),
    (0x21A9, 0x21AA),
    (0x2328, 0x2328),
    (0x23CF, 0x23CF),
    (0x23ED, 0x23EF),
    (0x23F1, 0x23F2),
    (0x23F8, 0x23FA),
    (0x24C2, 0x24C2),
    (0x25AA, 0x25AB),
    (0x25B6, 0x25B6),
    (0x25C0, 0x25C0),
    (0x25FB, 0x25FC),
    (0x2600, 0x2604),
    (0x260E, 0x260E),
    (0x2611, 0x2611),
    (0x2618, 0x2618),
    (0x261D, 0x261D),
    (0x2620, 0x2620),
    (0x2622, 0x2623),
    (0x2626, 0x2626),
    (0x262A, 0x262A),
    (0x262E, 0x262F),
    (0x2638, 0x263A),
    (0x2640, 0x2640),
    (0x2642, 0x2642),
    (0x2660, 0x2660),
    (0x2663, 0x2663),
    (0x2665, 0x2666),
    (0x2668, 0x2668),
    (0x267B, 0x267B),
    (0x2692, 0x2692),
    (0x2694, 0x2697),
    (0x2699, 0x2699),
    (0x269B, 0x269C),
    (0x26A0, 0x26A0),
    (0x26B0, 0x26B1),
    (0x26C8, 0x26C8),
    (0x26CF, 0x26CF),
    (0x26D1, 0x26D1),
    (0x26D3, 0x26D3),
    (0x26E9, 0x26E9),
    (0x26F0, 0x26F1),
    (0x26F4, 0x26F4),
    (0x26F7, 0x26F9),
    (0x2702, 0x2702),
    (0x2708, 0x2709),
    (0x270C, 0x270D),
    (0x270F, 0x270F),
    (0x2712, 0x2712),
    (0x2714, 0x2714),
    (0x2716, 0x2716),
    (0x271D, 0x271D),
    (0x2721, 0x2721),
    (0x2733, 0x2734),
    (0x2744, 0x2744),
    (0x2747, 0x2747),
    (0x2763, 0x2764),
    (0x27A1, 0x27A1),
    (0x2934, 0x2935),
    (0x2B05, 0x2B07),
    (0x1F170, 0x1F171),
    (0x1F17E, 0x1F17F),
    (0x1F321, 0x1F321),
    (0x1F324, 0x1F32C),
    (0x1F336, 0x1F336),
    (0x1F37D, 0x1F37D),
    (0x1F396, 0x1F397),
    (0x1F399, 0x1F39B),
    (0x1F39E, 0x1F39F),
    (0x1F3CB, 0x1F3CE),
    (0x1F3D4, 0x1F3DF),
    (0x1F3F3, 0x1F3F3),
    (0x1F3F5, 0x1F3F5),
    (0x1F3F7, 0x1F3F7),
    (0x1F43F, 0x1F43F),
    (0x1F441, 0x1F441),
    (0x1F4FD, 0x1F4FD),
    (0x1F549, 0x1F54A),
    (0x1F56F, 0x1F570),
    (0x1F573, 0x1F579),
    (0x1F587, 0x1F587),
    (0x1F58A, 0x1F58D),
    (0x1F590, 0x1F590),
    (0x1F5A5, 0x1F5A5),
    (0x1F5A8, 0x1F5A8),
    (0x1F5B1, 0x1F5B2),
    (0x1F5BC, 0x1F5BC),
    (0x1F5C2, 0x1F5C4),
    (0x1F5D1, 0x1F5D3),
    (0x1F5DC, 0x1F5DE),
    (0x1F5E1, 0x1F5E1),
    (0x1F5E3, 0x1F5E3),
    (0x1F5E8, 0x1F5E8),
    (0x1F5EF, 0x1F5EF),
    (0x1F5F3, 0x1F5F3),
    (0x1F5FA, 0x1F5FA),
    (0x1F6CB, 0x1F6CB),
    (0x1F6CD, 0x1F6CF),
    (0x1F6E0, 0x1F6E5),
    (0x1F6E9, 0x1F6E9),
    (0x1F6F0, 0x1F6F0),
    (0x1F6F3, 0x1F6F3),
];

/// C0, DEL and C1 control characters.
pub fn is_control(ch: char) -> bool {
    matches!(ch, '\u{00}'..='\u{1F}' | '\u{7F}' | '\u{80}'..='\u{9F}')
}

/// Cells taken by a single character; characters without a width count as 0.
pub fn char_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0)
}

/// Extra cells gained when U+FE0F follows `base`.
pub fn vs16_width(base: char) -> usize {
    let cp = u32::from(base);
    let found = VS16_NARROW_TO_WIDE
        .binary_search_by(|&(lo, hi)| {
            if hi < cp {
                std::cmp::Ordering::Less
            } else if lo > cp {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        })
        .is_ok();
    usize::from(found)
}

pub fn strip_control_chars(text: &str) -> Cow<'_, str> {
    if text.chars().any(is_control) {
        Cow::Owned(text.chars().filter(|ch| !is_control(*ch)).collect())
    } else {
        Cow::Borrowed(text)
    }
}

/// Width of plain text (no capability sequences), ignoring control characters.
pub fn text_width(text: &str) -> usize {
    UnicodeWidthStr::width(strip_control_chars(text).as_ref())
}

#[cfg(test)]
mod tests {
    use super::{
        char_width, is_control, strip_control_chars, text_width, vs16_width, VS16_NARROW_TO_WIDE,
    };

    #[test]
    fn table_is_sorted_and_disjoint() {
        for pair in VS16_NARROW_TO_WIDE.windows(2) {
            assert!(pair[0].0 <= pair[0].1);
            assert!(pair[0].1 < pair[1].0, "{:x?} overlaps {:x?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn vs16_promotes_narrow_emoji_bases() {
        assert_eq!(vs16_width('\u{2764}'), 1);
        assert_eq!(vs16_width('#'), 1);
        assert_eq!(vs16_width('\u{1F6F3}'), 1);
        assert_eq!(vs16_width('a'), 0);
        assert_eq!(vs16_width('\u{1F600}'), 0);
    }

    #[test]
    fn control_characters_measure_zero() {
        assert!(is_control('\x1b'));
        assert!(is_control('\u{85}'));
        assert!(!is_control(' '));
        assert_eq!(char_width('\x07'), 0);
        assert_eq!(strip_control_chars("a\x07b\x7f"), "ab");
        assert_eq!(text_width("a\x07b"), 2);
    }

    #[test]
    fn wide_glyphs_take_two_cells() {
        assert_eq!(char_width('コ'), 2);
        assert_eq!(text_width("コンニチハ"), 10);
        assert_eq!(char_width(super::ZERO_WIDTH_JOINER), 0);
    }
}
