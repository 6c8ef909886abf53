//! Environment configuration.

use std::env;

const DEFAULT_WRAP_WIDTH: usize = 80;
const DEFAULT_TAB_SIZE: usize = 8;

#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub columns: Option<usize>,
    pub tab_size: usize,
    pub force_plain: bool,
    pub debug: bool,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            columns: env_usize_opt("COLUMNS"),
            tab_size: env_usize_opt("TERMSEQ_TABSIZE").unwrap_or(DEFAULT_TAB_SIZE),
            force_plain: env_flag("TERMSEQ_PLAIN"),
            debug: env_flag("TERMSEQ_DEBUG"),
        }
    }

    /// Width used by `wrap` when the caller does not supply one.
    pub fn wrap_width(&self) -> usize {
        self.columns.unwrap_or(DEFAULT_WRAP_WIDTH)
    }

    /// Whether registries should consult the template source at all.
    pub fn styling(&self) -> bool {
        !self.force_plain
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            columns: None,
            tab_size: DEFAULT_TAB_SIZE,
            force_plain: false,
            debug: false,
        }
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}

fn env_usize_opt(key: &str) -> Option<usize> {
    env_string_opt(key)
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|value| *value > 0)
}
