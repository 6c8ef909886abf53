//! Catalog of known terminal capabilities.
//!
//! Three tables feed registry construction: the additive patterns every registry carries, the
//! terminfo-style database resolved against a [`CapabilitySource`](super::registry::CapabilitySource),
//! and raw fallback patterns for database entries the source cannot supply. Movement metadata is
//! keyed by capability name.

use super::capability::{Motion, PatternOptions};

/// Patterns registered ahead of everything else, in order: `(name, attribute, pattern)`.
pub const ADDITIVES: &[(&str, &str, &str)] = &[
    ("link", "link", r"\x1b\]8;[^\x1b]*;[^\x1b]*\x1b\\"),
    ("color256", "color", r"\x1b\[38;5;\d+m"),
    ("on_color256", "on_color", r"\x1b\[48;5;\d+m"),
    ("color_rgb", "color_rgb", r"\x1b\[38;2;\d+;\d+;\d+m"),
    ("on_color_rgb", "on_color_rgb", r"\x1b\[48;2;\d+;\d+;\d+m"),
    ("shift_in", "", r"\x0f"),
    ("shift_out", "", r"\x0e"),
    // sgr renders oddly through terminfo; the plain ECMA-48 forms match better.
    ("set_a_attributes1", "sgr", r"\x1b\[\d+m"),
    ("set_a_attributes2", "sgr", r"\x1b\[\d+;\d+m"),
    ("set_a_attributes3", "sgr", r"\x1b\[\d+;\d+;\d+m"),
    ("set_a_attributes4", "sgr", r"\x1b\[\d+;\d+;\d+;\d+m"),
    // xterm's sgr0 embeds set0_des_seq; match the bare reset as well.
    ("sgr0", "sgr0", r"\x1b\[m"),
    ("backspace", "kbs", r"\x08"),
    ("ascii_tab", "ht", r"\t"),
];

/// Fallback patterns for database entries with no usable template.
const RAW_PATTERNS: &[(&str, &str)] = &[
    ("bell", r"\x07"),
    ("carriage_return", r"\r"),
    ("cursor_left", r"\x08"),
    ("cursor_report", r"\x1b\[(\d+);(\d+)R"),
    ("cursor_right", r"\x1b\[C"),
    ("exit_attribute_mode", r"\x1b\[m"),
    ("parm_left_cursor", r"\x1b\[(\d+)D"),
    ("parm_right_cursor", r"\x1b\[(\d+)C"),
    ("restore_cursor", r"\x1b\[u"),
    ("save_cursor", r"\x1b\[s"),
    ("scroll_forward", r"\n"),
    ("set0_des_seq", r"\x1b\(B"),
    ("tab", r"\t"),
];

const CAUSE_MOVEMENT: &[&str] = &[
    "ascii_tab",
    "backspace",
    "carriage_return",
    "clear_screen",
    "column_address",
    "cursor_address",
    "cursor_down",
    "cursor_home",
    "cursor_left",
    "cursor_right",
    "cursor_up",
    "enter_fullscreen",
    "exit_fullscreen",
    "parm_down_cursor",
    "parm_left_cursor",
    "parm_right_cursor",
    "parm_up_cursor",
    "restore_cursor",
    "row_address",
    "scroll_forward",
    "tab",
];

const HORIZONTAL_DISTANCE: &[(&str, i64)] = &[
    ("ascii_tab", 8),
    ("backspace", -1),
    ("cursor_left", -1),
    ("cursor_right", 1),
    ("parm_left_cursor", -1),
    ("parm_right_cursor", 1),
    ("tab", 8),
];

/// One terminfo-backed capability: resolved through a source by `attribute`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatabaseEntry {
    pub name: &'static str,
    pub attribute: &'static str,
    pub argument_count: usize,
    pub options: PatternOptions,
}

const fn plain(name: &'static str, attribute: &'static str) -> DatabaseEntry {
    DatabaseEntry {
        name,
        attribute,
        argument_count: 0,
        options: PatternOptions::DEFAULT,
    }
}

const fn params(
    name: &'static str,
    attribute: &'static str,
    argument_count: usize,
    options: PatternOptions,
) -> DatabaseEntry {
    DatabaseEntry {
        name,
        attribute,
        argument_count,
        options,
    }
}

const GROUPED: PatternOptions = PatternOptions {
    grouped: true,
    ..PatternOptions::DEFAULT
};

const ANY_COLOR: PatternOptions = PatternOptions {
    numeric_sample: 1,
    any_numeric: true,
    ..PatternOptions::DEFAULT
};

/// Ordered capability database. Order decides first-match-wins during tokenization.
pub const CAPABILITY_DATABASE: &[DatabaseEntry] = &[
    plain("bell", "bel"),
    plain("carriage_return", "cr"),
    params("change_scroll_region", "csr", 2, PatternOptions::DEFAULT),
    plain("clear_all_tabs", "tbc"),
    plain("clear_screen", "clear"),
    plain("clr_bol", "el1"),
    plain("clr_eol", "el"),
    plain("clr_eos", "ed"),
    params("column_address", "hpa", 1, PatternOptions::DEFAULT),
    params("cursor_address", "cup", 2, GROUPED),
    plain("cursor_down", "cud1"),
    plain("cursor_home", "home"),
    plain("cursor_invisible", "civis"),
    plain("cursor_left", "cub1"),
    plain("cursor_normal", "cnorm"),
    params("cursor_report", "u6", 2, GROUPED),
    plain("cursor_right", "cuf1"),
    plain("cursor_up", "cuu1"),
    plain("cursor_visible", "cvvis"),
    plain("delete_character", "dch1"),
    plain("delete_line", "dl1"),
    plain("enter_blink_mode", "blink"),
    plain("enter_bold_mode", "bold"),
    plain("enter_dim_mode", "dim"),
    plain("enter_fullscreen", "smcup"),
    plain("enter_italics_mode", "sitm"),
    plain("enter_reverse_mode", "rev"),
    plain("enter_standout_mode", "smso"),
    plain("enter_underline_mode", "smul"),
    params("erase_chars", "ech", 1, PatternOptions::DEFAULT),
    plain("exit_alt_charset_mode", "rmacs"),
    plain("exit_am_mode", "rmam"),
    plain("exit_attribute_mode", "sgr0"),
    plain("exit_fullscreen", "rmcup"),
    plain("exit_insert_mode", "rmir"),
    plain("exit_italics_mode", "ritm"),
    plain("exit_standout_mode", "rmso"),
    plain("exit_underline_mode", "rmul"),
    plain("flash_screen", "flash"),
    plain("insert_line", "il1"),
    plain("keypad_local", "rmkx"),
    plain("keypad_xmit", "smkx"),
    plain("orig_pair", "op"),
    params("parm_dch", "dch", 1, PatternOptions::DEFAULT),
    params("parm_delete_line", "dl", 1, PatternOptions::DEFAULT),
    params("parm_down_cursor", "cud", 1, PatternOptions::DEFAULT),
    params("parm_ich", "ich", 1, PatternOptions::DEFAULT),
    params("parm_index", "indn", 1, PatternOptions::DEFAULT),
    params("parm_insert_line", "il", 1, PatternOptions::DEFAULT),
    params("parm_left_cursor", "cub", 1, GROUPED),
    params("parm_right_cursor", "cuf", 1, GROUPED),
    params("parm_rindex", "rin", 1, PatternOptions::DEFAULT),
    params("parm_up_cursor", "cuu", 1, PatternOptions::DEFAULT),
    plain("restore_cursor", "rc"),
    params("row_address", "vpa", 1, PatternOptions::DEFAULT),
    plain("save_cursor", "sc"),
    plain("scroll_forward", "ind"),
    plain("scroll_reverse", "ri"),
    plain("set0_des_seq", "s0ds"),
    plain("set1_des_seq", "s1ds"),
    plain("set2_des_seq", "s2ds"),
    plain("set3_des_seq", "s3ds"),
    params("set_a_foreground", "setaf", 1, ANY_COLOR),
    params("set_a_background", "setab", 1, ANY_COLOR),
    plain("set_tab", "hts"),
    plain("tab", "ht"),
];

/// Raw fallback pattern for `name`, if one exists.
pub fn raw_pattern(name: &str) -> Option<&'static str> {
    RAW_PATTERNS
        .iter()
        .find(|(raw, _)| *raw == name)
        .map(|(_, pattern)| *pattern)
}

pub fn causes_movement(name: &str) -> bool {
    CAUSE_MOVEMENT.contains(&name)
}

/// Column delta for `name`; per-unit for parameterized capabilities.
pub fn horizontal_distance(name: &str) -> Option<i64> {
    HORIZONTAL_DISTANCE
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, distance)| *distance)
}

pub fn motion_for(name: &str) -> Motion {
    Motion {
        causes_movement: causes_movement(name),
        horizontal_distance: horizontal_distance(name),
    }
}
