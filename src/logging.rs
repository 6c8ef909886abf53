//! Tracing targets used by the layout engine.
//!
//! The library only emits events; installing a subscriber is left to the caller.

/// Registry compilation and lookups.
pub const REGISTRY: &str = "termseq::registry";

/// Capability pattern building.
pub const CAPABILITY: &str = "termseq::capability";

/// Line wrapping decisions.
pub const WRAP: &str = "termseq::wrap";
