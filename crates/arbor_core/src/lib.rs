//! Arbor Core
//!
//! Collaborators the section profiler is built on:
//! - Monotonic clocks (real and manually driven)
//! - Thread identity tokens
//! - Profiler settings and their loading errors

pub mod settings;
pub mod thread;
pub mod time;

pub use settings::{ProfilerSettings, SettingsError, SortBy, DEFAULT_LABEL};
pub use thread::{CurrentThread, ThreadIdentity};
pub use time::{Clock, ManualClock, MonotonicClock, Timestamp};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
