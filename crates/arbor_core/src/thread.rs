//! Thread identity tokens

use std::fmt::Debug;
use std::thread::{self, ThreadId};

/// Identifies the calling thread.
pub trait ThreadIdentity: Send + Sync {
    type Token: Eq + Debug + Send + Sync + 'static;

    fn current(&self) -> Self::Token;

    /// Human-readable name of the calling thread, if it has one.
    fn current_name(&self) -> Option<String> {
        None
    }
}

/// OS thread identity backed by `std::thread::ThreadId`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentThread;

impl ThreadIdentity for CurrentThread {
    type Token = ThreadId;

    fn current(&self) -> ThreadId {
        thread::current().id()
    }

    fn current_name(&self) -> Option<String> {
        thread::current().name().map(str::to_owned)
    }
}
