//! Scope guard that closes a section on every exit path

use crate::profiler::Profiler;
use arbor_core::{Clock, ThreadIdentity};
use std::marker::PhantomData;

/// Open section that is popped when the guard drops.
///
/// The guard is tied to the thread that created it, since popping from
/// another thread would close that thread's section instead.
#[must_use = "the section closes as soon as the guard is dropped"]
pub struct SectionGuard<'p, C: Clock, T: ThreadIdentity> {
    profiler: &'p Profiler<C, T>,
    _not_send: PhantomData<*const ()>,
}

impl<'p, C: Clock, T: ThreadIdentity> SectionGuard<'p, C, T> {
    pub(crate) fn new(profiler: &'p Profiler<C, T>, name: &str) -> Self {
        profiler.section_push(name);
        Self {
            profiler,
            _not_send: PhantomData,
        }
    }
}

impl<C: Clock, T: ThreadIdentity> Drop for SectionGuard<'_, C, T> {
    fn drop(&mut self) {
        self.profiler.section_pop();
    }
}
