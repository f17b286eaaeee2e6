//! Cross-cutting helpers.

pub mod math;
