//! Signal rule evaluation and candidate selection.

pub mod engine;
pub mod rules;

pub use engine::SignalEngine;
pub use rules::SignalConfig;
