//! Core application primitives (context, scheduling, ops surface)

pub mod context;
pub mod http;
pub mod runner;
pub mod scheduler;
pub mod tasks;

pub use context::*;
pub use http::*;
pub use runner::*;
pub use scheduler::*;
pub use tasks::*;
