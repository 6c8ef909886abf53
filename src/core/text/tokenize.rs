//! Capability-aware tokenizer.

use regex::CaptureMatches;

use super::capability::Capability;
use super::registry::CapabilityRegistry;

/// One slice of the input: a full capability match, or a single plain character.
#[derive(Debug, Clone, Copy)]
pub struct Token<'t, 'r> {
    pub text: &'t str,
    pub capability: Option<&'r Capability>,
}

impl Token<'_, '_> {
    pub fn is_sequence(&self) -> bool {
        self.capability.is_some()
    }
}

/// Lazy token stream over a string. Concatenating every token's text yields the input.
#[derive(Debug)]
pub struct Tokens<'r, 't> {
    registry: &'r CapabilityRegistry,
    matches: CaptureMatches<'r, 't>,
}

impl<'r, 't> Iterator for Tokens<'r, 't> {
    type Item = Token<'t, 'r>;

    fn next(&mut self) -> Option<Self::Item> {
        let captures = self.matches.next()?;
        let text = captures.get(0)?.as_str();
        Some(Token {
            text,
            capability: self.registry.classify_token(&captures),
        })
    }
}

/// Tokenizes `text` against `registry`. Calling it again restarts from the beginning.
pub fn iter_parse<'r, 't>(registry: &'r CapabilityRegistry, text: &'t str) -> Tokens<'r, 't> {
    Tokens {
        registry,
        matches: registry.tokenizer().captures_iter(text),
    }
}

/// Byte length of the leading capability of `text`, or 0 when it starts with plain text.
pub fn measure_length(text: &str, registry: &CapabilityRegistry) -> usize {
    match iter_parse(registry, text).next() {
        Some(Token {
            text,
            capability: Some(_),
        }) => text.len(),
        _ => 0,
    }
}
