//! Text helpers (capability catalog, tokenizing, width measurement, wrapping).
//!
//! These helpers are pure (string in/string out): every operation takes the registry by
//! reference and returns new strings.

pub mod ansi;
pub mod capability;
pub mod registry;
pub mod sequence;
pub mod tokenize;
pub mod utils;
pub mod width;
pub mod wrap;
