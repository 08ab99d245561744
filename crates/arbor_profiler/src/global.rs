//! Process-wide profiler behind free functions.
//!
//! With the `profile` feature (default) these forward to a lazily created
//! [`Profiler`](crate::Profiler). Without it every call is an inlined no-op and
//! [`ScopedSection`] is an empty struct, so instrumented code needs no
//! changes between builds.

use crate::error::ProfilerError;
use arbor_core::{ProfilerSettings, SortBy};
use std::path::Path;

#[cfg(feature = "profile")]
mod enabled {
    use super::*;
    use crate::guard::SectionGuard;
    use crate::profiler::Profiler;
    use arbor_core::{CurrentThread, MonotonicClock};
    use once_cell::sync::OnceCell;

    static PROFILER: OnceCell<Profiler> = OnceCell::new();

    /// Install the process-wide profiler with `settings`.
    ///
    /// Fails if it already exists, including when an earlier call to any
    /// other function here created it with default settings.
    pub fn init(settings: ProfilerSettings) -> Result<(), ProfilerError> {
        PROFILER.set(Profiler::with_settings(settings)).map_err(|_| {
            tracing::warn!("process-wide profiler already initialized, keeping its settings");
            ProfilerError::AlreadyInitialized
        })
    }

    /// The process-wide profiler, created with default settings on first use.
    pub fn profiler() -> &'static Profiler {
        PROFILER.get_or_init(Profiler::new)
    }

    #[inline]
    pub fn clear() {
        profiler().clear();
    }

    #[inline]
    pub fn section_push(name: &str) {
        profiler().section_push(name);
    }

    #[inline]
    pub fn section_pop() {
        profiler().section_pop();
    }

    pub fn display(sort: SortBy) {
        profiler().display(sort);
    }

    pub fn display_default() {
        profiler().display_default();
    }

    #[inline]
    pub fn scoped(name: &str) -> ScopedSection {
        ScopedSection(profiler().scope(name))
    }

    /// Section on the process-wide profiler, closed on drop.
    #[must_use = "the section closes as soon as the guard is dropped"]
    pub struct ScopedSection(
        #[allow(dead_code)] SectionGuard<'static, MonotonicClock, CurrentThread>,
    );
}

#[cfg(not(feature = "profile"))]
mod disabled {
    use super::*;

    /// Install the process-wide profiler (no-op).
    #[inline]
    pub fn init(_settings: ProfilerSettings) -> Result<(), ProfilerError> {
        Ok(())
    }

    #[inline]
    pub fn clear() {}

    #[inline]
    pub fn section_push(_name: &str) {}

    #[inline]
    pub fn section_pop() {}

    #[inline]
    pub fn display(_sort: SortBy) {}

    #[inline]
    pub fn display_default() {}

    #[inline]
    pub fn scoped(_name: &str) -> ScopedSection {
        ScopedSection
    }

    /// No-op section guard.
    #[must_use = "the section closes as soon as the guard is dropped"]
    pub struct ScopedSection;
}

#[cfg(feature = "profile")]
pub use enabled::{
    clear, display, display_default, init, profiler, scoped, section_pop, section_push,
    ScopedSection,
};

#[cfg(not(feature = "profile"))]
pub use disabled::{
    clear, display, display_default, init, scoped, section_pop, section_push, ScopedSection,
};

/// Load settings from a JSON file and install the process-wide profiler.
pub fn init_from_file(path: impl AsRef<Path>) -> Result<(), ProfilerError> {
    init(ProfilerSettings::load(path)?)
}

#[doc(hidden)]
pub fn type_name_of<T>(_: T) -> &'static str {
    std::any::type_name::<T>()
}

/// Strip the marker item from a `type_name` path, leaving the enclosing
/// function's path.
#[doc(hidden)]
pub fn function_path(marker: &'static str) -> &'static str {
    let mut path = marker.strip_suffix("::__arbor_marker").unwrap_or(marker);
    while let Some(outer) = path.strip_suffix("::{{closure}}") {
        path = outer;
    }
    path
}
