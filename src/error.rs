//! Crate-wide error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid width {width} (must be integer > 0)")]
    InvalidWidth { width: usize },

    #[error(
        "placeholder too large for max width: indent {indent} + placeholder {placeholder} > {width}"
    )]
    PlaceholderTooLarge {
        indent: usize,
        placeholder: usize,
        width: usize,
    },

    #[error("invalid parameters for capability {name}: {text:?}")]
    HorizontalDistance { name: String, text: String },

    #[error("capability '{name}' is registered more than once")]
    DuplicateCapability { name: String },

    #[error("capability '{name}' matches the empty string")]
    EmptyPattern { name: String },

    #[error("capability '{name}' has an invalid pattern: {source}")]
    Pattern {
        name: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
