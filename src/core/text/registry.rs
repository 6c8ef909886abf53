//! Capability registry and its combined matchers.
//!
//! A registry is an ordered, immutable set of [`Capability`] descriptors. Order decides which
//! capability wins when two patterns match at the same position. All combined patterns are
//! compiled once at construction.

use std::collections::HashMap;
use std::ops::Range;

use regex::{Captures, Regex};
use tracing::debug;

use super::ansi::{self, ADDITIVES, CAPABILITY_DATABASE};
use super::capability::{Capability, Template};
use crate::error::{Error, Result};
use crate::logging;

/// Supplies capability templates by terminfo attribute name.
pub trait CapabilitySource {
    fn template(&self, attribute: &str) -> Option<Template>;
}

/// `HashMap`-backed [`CapabilitySource`].
#[derive(Debug, Clone, Default)]
pub struct TemplateTable {
    templates: HashMap<String, Template>,
}

impl TemplateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, attribute: impl Into<String>, template: Template) -> &mut Self {
        self.templates.insert(attribute.into(), template);
        self
    }

    pub fn with(mut self, attribute: impl Into<String>, template: Template) -> Self {
        self.insert(attribute, template);
        self
    }

    /// Output of an xterm-256color terminal.
    pub fn xterm() -> Self {
        let mut table = Self::new();
        for (attribute, output) in XTERM_STATIC {
            table.insert(*attribute, Template::from(*output));
        }
        table
            .insert("cup", Template::parameterized(|a| csi2(a, 1, 'H')))
            .insert("csr", Template::parameterized(|a| csi2(a, 1, 'r')))
            .insert("u6", Template::parameterized(|a| csi2(a, 1, 'R')))
            .insert("hpa", Template::parameterized(|a| csi1(a, 1, 'G')))
            .insert("vpa", Template::parameterized(|a| csi1(a, 1, 'd')))
            .insert("cuf", Template::parameterized(|a| csi1(a, 0, 'C')))
            .insert("cub", Template::parameterized(|a| csi1(a, 0, 'D')))
            .insert("cuu", Template::parameterized(|a| csi1(a, 0, 'A')))
            .insert("cud", Template::parameterized(|a| csi1(a, 0, 'B')))
            .insert("ech", Template::parameterized(|a| csi1(a, 0, 'X')))
            .insert("dch", Template::parameterized(|a| csi1(a, 0, 'P')))
            .insert("dl", Template::parameterized(|a| csi1(a, 0, 'M')))
            .insert("ich", Template::parameterized(|a| csi1(a, 0, '@')))
            .insert("il", Template::parameterized(|a| csi1(a, 0, 'L')))
            .insert("indn", Template::parameterized(|a| csi1(a, 0, 'S')))
            .insert("rin", Template::parameterized(|a| csi1(a, 0, 'T')))
            .insert("setaf", Template::parameterized(|a| xterm_color(a, 3, 9, 38)))
            .insert("setab", Template::parameterized(|a| xterm_color(a, 4, 10, 48)));
        table
    }
}

impl CapabilitySource for TemplateTable {
    fn template(&self, attribute: &str) -> Option<Template> {
        self.templates.get(attribute).cloned()
    }
}

const XTERM_STATIC: &[(&str, &str)] = &[
    ("bel", "\x07"),
    ("blink", "\x1b[5m"),
    ("bold", "\x1b[1m"),
    ("civis", "\x1b[?25l"),
    ("clear", "\x1b[H\x1b[2J"),
    ("cnorm", "\x1b[?12l\x1b[?25h"),
    ("cr", "\r"),
    ("cub1", "\x08"),
    ("cud1", "\n"),
    ("cuf1", "\x1b[C"),
    ("cuu1", "\x1b[A"),
    ("cvvis", "\x1b[?12;25h"),
    ("dch1", "\x1b[P"),
    ("dim", "\x1b[2m"),
    ("dl1", "\x1b[M"),
    ("ed", "\x1b[J"),
    ("el", "\x1b[K"),
    ("el1", "\x1b[1K"),
    ("flash", "\x1b[?5h\x1b[?5l"),
    ("home", "\x1b[H"),
    ("ht", "\t"),
    ("hts", "\x1bH"),
    ("il1", "\x1b[L"),
    ("ind", "\n"),
    ("op", "\x1b[39;49m"),
    ("rc", "\x1b8"),
    ("rev", "\x1b[7m"),
    ("ri", "\x1bM"),
    ("ritm", "\x1b[23m"),
    ("rmacs", "\x1b(B"),
    ("rmam", "\x1b[?7l"),
    ("rmcup", "\x1b[?1049l\x1b[23;0;0t"),
    ("rmir", "\x1b[4l"),
    ("rmkx", "\x1b[?1l\x1b>"),
    ("rmso", "\x1b[27m"),
    ("rmul", "\x1b[24m"),
    ("sc", "\x1b7"),
    ("sgr0", "\x1b(B\x1b[m"),
    ("sitm", "\x1b[3m"),
    ("smcup", "\x1b[?1049h\x1b[22;0;0t"),
    ("smkx", "\x1b[?1h\x1b="),
    ("smso", "\x1b[7m"),
    ("smul", "\x1b[4m"),
    ("tbc", "\x1b[3g"),
];

fn csi1(args: &[u32], offset: u32, final_byte: char) -> String {
    let n = args.first().copied().unwrap_or(0).saturating_add(offset);
    format!("\x1b[{n}{final_byte}")
}

fn csi2(args: &[u32], offset: u32, final_byte: char) -> String {
    let a = args.first().copied().unwrap_or(0).saturating_add(offset);
    let b = args.get(1).copied().unwrap_or(0).saturating_add(offset);
    format!("\x1b[{a};{b}{final_byte}")
}

fn xterm_color(args: &[u32], base: u32, bright: u32, extended: u32) -> String {
    let n = args.first().copied().unwrap_or(0);
    match n {
        0..=7 => format!("\x1b[{base}{n}m"),
        8..=15 => format!("\x1b[{bright}{}m", n - 8),
        _ => format!("\x1b[{extended};5;{n}m"),
    }
}

/// Combined alternation of named capability groups.
#[derive(Debug, Clone)]
struct Matcher {
    regex: Regex,
    /// `(regex group index, capability index)` in registry order.
    groups: Vec<(usize, usize)>,
}

impl Matcher {
    fn compile(
        capabilities: &[Capability],
        members: &[usize],
        with_fallback: bool,
    ) -> Result<Self> {
        let mut alternatives: Vec<String> = members
            .iter()
            .map(|&idx| format!("(?P<{}>{})", group_name(idx), capabilities[idx].pattern()))
            .collect();
        if with_fallback {
            alternatives.push("(?s:.)".to_string());
        }
        let regex = Regex::new(&alternatives.join("|")).map_err(|source| Error::Pattern {
            name: members
                .iter()
                .map(|&idx| capabilities[idx].name())
                .collect::<Vec<_>>()
                .join("|"),
            source,
        })?;

        let groups = regex
            .capture_names()
            .enumerate()
            .filter_map(|(group, name)| Some((group, name.and_then(parse_group_name)?)))
            .collect();
        Ok(Self { regex, groups })
    }

    fn optional(capabilities: &[Capability], members: &[usize]) -> Result<Option<Self>> {
        if members.is_empty() {
            return Ok(None);
        }
        Self::compile(capabilities, members, false).map(Some)
    }

    fn classify(&self, captures: &Captures<'_>) -> Option<usize> {
        self.groups
            .iter()
            .find(|(group, _)| captures.get(*group).is_some())
            .map(|(_, idx)| *idx)
    }
}

fn group_name(idx: usize) -> String {
    format!("cap{idx}")
}

fn parse_group_name(name: &str) -> Option<usize> {
    name.strip_prefix("cap")?.parse().ok()
}

#[derive(Debug, Clone)]
pub struct CapabilityRegistry {
    capabilities: Vec<Capability>,
    by_name: HashMap<String, usize>,
    any: Option<Matcher>,
    without_distance: Option<Matcher>,
    with_distance: Option<Matcher>,
    tokenizer: Matcher,
}

impl CapabilityRegistry {
    /// Compiles a registry from descriptors in priority order.
    pub fn new(capabilities: impl IntoIterator<Item = Capability>) -> Result<Self> {
        let capabilities: Vec<Capability> = capabilities.into_iter().collect();
        let mut by_name = HashMap::with_capacity(capabilities.len());
        for (idx, capability) in capabilities.iter().enumerate() {
            if by_name.insert(capability.name().to_string(), idx).is_some() {
                return Err(Error::DuplicateCapability {
                    name: capability.name().to_string(),
                });
            }
            if capability.compiled()?.is_match("") {
                return Err(Error::EmptyPattern {
                    name: capability.name().to_string(),
                });
            }
        }

        let all: Vec<usize> = (0..capabilities.len()).collect();
        let (with_distance, without_distance): (Vec<usize>, Vec<usize>) = all
            .iter()
            .partition(|&&idx| capabilities[idx].motion().horizontal_distance.is_some());

        let any = Matcher::optional(&capabilities, &all)?;
        let without_distance = Matcher::optional(&capabilities, &without_distance)?;
        let with_distance = Matcher::optional(&capabilities, &with_distance)?;
        let tokenizer = Matcher::compile(&capabilities, &all, true)?;

        debug!(
            target: logging::REGISTRY,
            capabilities = capabilities.len(),
            "compiled capability registry"
        );

        Ok(Self {
            capabilities,
            by_name,
            any,
            without_distance,
            with_distance,
            tokenizer,
        })
    }

    /// Registry of the always-present additive patterns plus raw fallbacks.
    pub fn ansi() -> Result<Self> {
        Self::from_source(&TemplateTable::new(), false)
    }

    /// Builds the registry a terminal described by `source` would use.
    ///
    /// Additive patterns come first. Each database entry is then built from the source's
    /// template when `styling` is on and one exists, otherwise from its raw fallback pattern,
    /// and skipped when neither is available.
    pub fn from_source(source: &dyn CapabilitySource, styling: bool) -> Result<Self> {
        let mut capabilities: Vec<Capability> = ADDITIVES
            .iter()
            .map(|(name, attribute, pattern)| Capability::new(*name, *pattern, *attribute, 0))
            .collect();

        for entry in CAPABILITY_DATABASE {
            let template = styling
                .then(|| source.template(entry.attribute))
                .flatten()
                .filter(|template| !template.is_empty());
            if let Some(template) = template {
                capabilities.push(Capability::build(
                    entry.name,
                    &template,
                    entry.attribute,
                    entry.argument_count,
                    entry.options,
                ));
            } else if let Some(pattern) = ansi::raw_pattern(entry.name) {
                capabilities.push(Capability::new(
                    entry.name,
                    pattern,
                    entry.attribute,
                    entry.argument_count,
                ));
            }
        }

        Self::new(capabilities)
    }

    pub fn get(&self, name: &str) -> Option<&Capability> {
        self.by_name.get(name).map(|&idx| &self.capabilities[idx])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Capability> {
        self.capabilities.iter()
    }

    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }

    /// Whether any capability occurs in `text`.
    pub fn contains_sequence(&self, text: &str) -> bool {
        self.any
            .as_ref()
            .is_some_and(|matcher| matcher.regex.is_match(text))
    }

    pub(crate) fn capability(&self, idx: usize) -> &Capability {
        &self.capabilities[idx]
    }

    pub(crate) fn tokenizer(&self) -> &Regex {
        &self.tokenizer.regex
    }

    pub(crate) fn classify_token(&self, captures: &Captures<'_>) -> Option<&Capability> {
        self.tokenizer.classify(captures).map(|idx| self.capability(idx))
    }

    /// Removes every capability without a horizontal distance.
    pub(crate) fn remove_motionless<'t>(&self, text: &'t str) -> std::borrow::Cow<'t, str> {
        match &self.without_distance {
            Some(matcher) => matcher.regex.replace_all(text, ""),
            None => std::borrow::Cow::Borrowed(text),
        }
    }

    /// Byte spans of capabilities in `text`, restricted to horizontal movers when asked.
    pub(crate) fn capability_spans(
        &self,
        text: &str,
        horizontal_only: bool,
    ) -> Vec<(Range<usize>, &Capability)> {
        let matcher = if horizontal_only {
            self.with_distance.as_ref()
        } else {
            self.any.as_ref()
        };
        let Some(matcher) = matcher else {
            return Vec::new();
        };
        matcher
            .regex
            .captures_iter(text)
            .filter_map(|captures| {
                let span = captures.get(0)?.range();
                let idx = matcher.classify(&captures)?;
                Some((span, self.capability(idx)))
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a CapabilityRegistry {
    type Item = &'a Capability;
    type IntoIter = std::slice::Iter<'a, Capability>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
