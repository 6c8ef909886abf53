//! Core layout types.

pub mod text;
