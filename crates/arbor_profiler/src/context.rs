//! Per-thread profiling context

use crate::section::SectionTree;
use std::fmt::{self, Debug};
use std::sync::{Mutex, MutexGuard};

// Poisoning only means a panic happened while a section was open; the data
// is still well formed.
pub(crate) fn lock<G>(mutex: &Mutex<G>) -> MutexGuard<'_, G> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// One thread's private section tree.
///
/// Only the owning thread mutates the tree; other threads lock it to take a
/// report snapshot.
#[derive(Debug)]
pub struct ThreadContext<Tok> {
    token: Tok,
    name: Option<String>,
    tree: Mutex<SectionTree>,
}

impl<Tok: Eq + Debug> ThreadContext<Tok> {
    pub fn new(token: Tok, name: Option<String>) -> Self {
        Self {
            token,
            name,
            tree: Mutex::new(SectionTree::new()),
        }
    }

    pub fn belongs_to(&self, token: &Tok) -> bool {
        self.token == *token
    }

    pub fn token(&self) -> &Tok {
        &self.token
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn tree(&self) -> MutexGuard<'_, SectionTree> {
        lock(&self.tree)
    }

    /// Label used for this thread in reports.
    pub fn label(&self) -> String {
        ThreadLabel(self).to_string()
    }
}

struct ThreadLabel<'a, Tok>(&'a ThreadContext<Tok>);

impl<Tok: Debug> fmt::Display for ThreadLabel<'_, Tok> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0.token)?;
        if let Some(name) = &self.0.name {
            write!(f, " ({name})")?;
        }
        Ok(())
    }
}
