//! Domain layer for the token implementation.

pub mod rules;

pub use rules::*;
