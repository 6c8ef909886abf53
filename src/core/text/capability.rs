//! Capability descriptors and the pattern builder.
//!
//! A [`Capability`] pairs a terminal capability name with a regular expression matching the
//! text the terminal would receive for it. Parameterized capabilities are turned into patterns by
//! rendering their template with a sample numeral and replacing that numeral with `\d+`.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::{Lazy, OnceCell};
use regex::{NoExpand, Regex};
use tracing::debug;

use super::ansi;
use crate::error::{Error, Result};
use crate::logging;

static NUMERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("numeral pattern"));

type Render = dyn Fn(&[u32]) -> String + Send + Sync;

/// Output of a capability as supplied by the terminal database.
#[derive(Clone)]
pub enum Template {
    Static(String),
    Parameterized(Arc<Render>),
}

impl Template {
    pub fn parameterized(render: impl Fn(&[u32]) -> String + Send + Sync + 'static) -> Self {
        Self::Parameterized(Arc::new(render))
    }

    pub fn render(&self, args: &[u32]) -> String {
        match self {
            Self::Static(text) => text.clone(),
            Self::Parameterized(render) => render(args),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Static(text) if text.is_empty())
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(text) => f.debug_tuple("Static").field(text).finish(),
            Self::Parameterized(_) => f.write_str("Parameterized(..)"),
        }
    }
}

impl From<&str> for Template {
    fn from(text: &str) -> Self {
        Self::Static(text.to_string())
    }
}

/// How numerals in a rendered template become pattern placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternOptions {
    /// Value substituted for every argument when rendering the template.
    pub numeric_sample: u32,
    /// Capture the numeral as `(\d+)` instead of `\d+`.
    pub grouped: bool,
    /// Replace every numeral in the output, not only one near the sample.
    pub any_numeric: bool,
    /// Make the numeral optional: `(\d+)?`.
    pub optional_numeric: bool,
}

impl PatternOptions {
    pub const DEFAULT: Self = Self {
        numeric_sample: 99,
        grouped: false,
        any_numeric: false,
        optional_numeric: false,
    };

    fn numeric_pattern(&self) -> &'static str {
        if self.optional_numeric {
            r"(\d+)?"
        } else if self.grouped {
            r"(\d+)"
        } else {
            r"\d+"
        }
    }
}

impl Default for PatternOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Cursor effect of a capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Motion {
    pub causes_movement: bool,
    /// Fixed column delta, or the per-unit multiplier when the capability takes an argument.
    pub horizontal_distance: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct Capability {
    name: String,
    pattern: String,
    attribute: String,
    argument_count: usize,
    motion: Motion,
    compiled: OnceCell<Regex>,
}

impl Capability {
    /// Descriptor from a ready-made pattern. Movement metadata comes from the known tables.
    pub fn new(
        name: impl Into<String>,
        pattern: impl Into<String>,
        attribute: impl Into<String>,
        argument_count: usize,
    ) -> Self {
        let name = name.into();
        let motion = ansi::motion_for(&name);
        Self {
            name,
            pattern: pattern.into(),
            attribute: attribute.into(),
            argument_count,
            motion,
            compiled: OnceCell::new(),
        }
    }

    pub fn with_motion(mut self, motion: Motion) -> Self {
        self.motion = motion;
        self
    }

    /// Builds a descriptor from the template a terminal would render.
    ///
    /// Static capabilities match their output literally. Parameterized ones are rendered with
    /// `options.numeric_sample` for every argument; the first of `sample - 1`, `sample` and
    /// `sample + 1` found in the output is replaced by a numeric placeholder, since some
    /// templates adjust their argument while rendering. With `any_numeric` (or when none of
    /// those is found) every numeral is replaced instead. Output with no numerals at all is
    /// matched literally.
    pub fn build(
        name: impl Into<String>,
        template: &Template,
        attribute: impl Into<String>,
        argument_count: usize,
        options: PatternOptions,
    ) -> Self {
        let name = name.into();
        if argument_count == 0 {
            let pattern = regex::escape(&template.render(&[]));
            return Self::new(name, pattern, attribute, 0);
        }

        let sample = options.numeric_sample;
        let numeric = options.numeric_pattern();
        let output = regex::escape(&template.render(&vec![sample; argument_count]));

        if !options.any_numeric {
            for num in sample.saturating_sub(1)..=sample.saturating_add(1) {
                let needle = num.to_string();
                if output.contains(&needle) {
                    let pattern = output.replace(&needle, numeric);
                    return Self::new(name, pattern, attribute, argument_count);
                }
            }
        }

        if !NUMERAL.is_match(&output) {
            debug!(
                target: logging::CAPABILITY,
                capability = %name,
                output = ?output,
                "no numeral in rendered template, matching literally"
            );
        }
        let pattern = NUMERAL.replace_all(&output, NoExpand(numeric)).into_owned();
        Self::new(name, pattern, attribute, argument_count)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn argument_count(&self) -> usize {
        self.argument_count
    }

    pub fn motion(&self) -> Motion {
        self.motion
    }

    pub fn causes_movement(&self) -> bool {
        self.motion.causes_movement
    }

    /// Anchored pattern for this capability alone, compiled on first use.
    pub fn compiled(&self) -> Result<&Regex> {
        self.compiled.get_or_try_init(|| {
            Regex::new(&format!("^(?:{})", self.pattern)).map_err(|source| Error::Pattern {
                name: self.name.clone(),
                source,
            })
        })
    }

    /// Signed column delta caused by emitting `text`.
    ///
    /// Returns 0 for capabilities without a column effect. For parameterized capabilities
    /// `text` must match this capability's pattern; the captured numeral (or the first numeral
    /// in the match when the pattern does not capture, 1 when it is absent) is multiplied by
    /// the per-unit distance.
    pub fn horizontal_distance(&self, text: &str) -> Result<i64> {
        let Some(distance) = self.motion.horizontal_distance else {
            return Ok(0);
        };
        if self.argument_count == 0 {
            return Ok(distance);
        }

        let invalid = || Error::HorizontalDistance {
            name: self.name.clone(),
            text: text.to_string(),
        };
        let captures = self.compiled()?.captures(text).ok_or_else(invalid)?;
        let numeral = captures
            .get(1)
            .or_else(|| captures.get(0).and_then(|m| NUMERAL.find(m.as_str())))
            .map(|m| m.as_str());
        let units = match numeral {
            Some(digits) => digits.parse::<i64>().map_err(|_| invalid())?,
            None => 1,
        };
        Ok(distance.saturating_mul(units))
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Capability {}:{:?}>", self.name, self.pattern)
    }
}
