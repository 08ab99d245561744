//! Arbor Profiler - hierarchical, thread-aware section timing
//!
//! Code marks named sections with push/pop pairs (or scope guards). Each
//! thread gets its own tree of sections mirroring how they nest; re-entering
//! a name at the same spot accumulates into the same node, so loops report
//! a running average and call count per section.
//!
//! # Feature Flags
//!
//! - `profile` - Record sections through the process-wide profiler
//!   (default: enabled). Without it the free functions and macros compile
//!   to no-ops.
//!
//! # Usage
//!
//! ```ignore
//! use arbor_profiler::{profile_block, profile_function, SortBy};
//!
//! fn update() {
//!     profile_function!();
//!     for _ in 0..3 {
//!         profile_block!("physics");
//!         // ... do work ...
//!     }
//! }
//!
//! update();
//! arbor_profiler::display(SortBy::TotalTime);
//! ```
//!
//! A [`Profiler`] can also be owned directly, with an injected clock and
//! thread identity, when a process-wide instance is not wanted.

mod context;
mod error;
mod global;
mod guard;
mod profiler;
pub mod report;
pub mod section;

pub use arbor_core::{ProfilerSettings, SortBy};
pub use context::ThreadContext;
pub use error::ProfilerError;
pub use guard::SectionGuard;
pub use profiler::Profiler;
pub use report::{Report, SectionReport, ThreadReport};

#[cfg(feature = "profile")]
pub use global::profiler;
pub use global::{
    clear, display, display_default, init, init_from_file, scoped, section_pop, section_push,
    ScopedSection,
};
#[doc(hidden)]
pub use global::{function_path, type_name_of};

// ============================================================================
// Instrumentation macros
// ============================================================================

/// Open a section on the process-wide profiler.
///
/// Without a label the configured default label is used.
#[macro_export]
macro_rules! profile_section_push {
    () => {
        $crate::section_push("")
    };
    ($label:expr) => {
        $crate::section_push($label)
    };
}

/// Close the innermost open section on the process-wide profiler.
#[macro_export]
macro_rules! profile_section_pop {
    () => {
        $crate::section_pop()
    };
}

/// Time the rest of the enclosing block under `label`.
#[macro_export]
macro_rules! profile_block {
    ($label:expr) => {
        let _arbor_block_section = $crate::scoped($label);
    };
}

/// Time the rest of the enclosing function under its path.
#[macro_export]
macro_rules! profile_function {
    () => {
        let _arbor_function_section = $crate::scoped($crate::function_path({
            fn __arbor_marker() {}
            $crate::type_name_of(__arbor_marker)
        }));
    };
}
