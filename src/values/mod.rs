//! Value and condition evaluators.
//!
//! Pure functions of `(GameState, ValueContext)`. They read state but never
//! mutate it, and a dangling reference yields 0 (or `false`) rather than an
//! error.

pub mod value;
pub mod condition;

pub use condition::{Comparison, Condition};
pub use value::{Value, ValueContext};
