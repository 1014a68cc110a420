//! Bundled card sets.

pub mod starter;
