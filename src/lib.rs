//! Terminal-sequence-aware text layout.
//!
//! Strings carrying terminal control sequences are measured, padded, truncated and wrapped by
//! the cells they occupy on screen. A [`CapabilityRegistry`] decides which sequences are
//! recognized; [`Sequence`] and [`SequenceTextWrapper`] borrow it for every operation.
//!
//! # Public API Overview
//! - Build a registry with [`CapabilityRegistry::ansi`] or from any [`CapabilitySource`].
//! - Tokenize with [`iter_parse`] and [`measure_length`].
//! - Lay out strings with [`Sequence`] (`length`, `ljust`, `truncate`, ...).
//! - Wrap paragraphs with [`SequenceTextWrapper`] or the [`wrap`] helper.

pub mod config;
pub mod error;
pub mod logging;

pub mod core;

/// Capability descriptors and pattern building.
pub use crate::core::text::capability::{Capability, Motion, PatternOptions, Template};
/// Capability registries and their sources.
pub use crate::core::text::registry::{CapabilityRegistry, CapabilitySource, TemplateTable};
/// Capability-aware tokenizer.
pub use crate::core::text::tokenize::{iter_parse, measure_length, Token, Tokens};
/// Width-aware string operations.
pub use crate::core::text::sequence::{Sequence, MAX_FORWARD_COLUMNS};
/// Sequence-aware line wrapping.
pub use crate::core::text::wrap::{wrap, SequenceTextWrapper, WrapOptions};

/// Environment-driven defaults.
pub use crate::config::EnvConfig;
/// Crate error type.
pub use crate::error::{Error, Result};
