//! Profiler registry
//!
//! Holds one [`ThreadContext`] per thread that has pushed or popped a
//! section. The registry lock covers context lookup, [`Profiler::clear`] and
//! report snapshots. Each context's tree sits behind its own lock, which only
//! its owning thread takes during push/pop, so threads never wait on each
//! other outside the lookup.

use crate::context::{lock, ThreadContext};
use crate::guard::SectionGuard;
use crate::report::{Report, ThreadReport};
use arbor_core::{Clock, CurrentThread, MonotonicClock, ProfilerSettings, SortBy, ThreadIdentity};
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

type SharedContext<Tok> = Arc<ThreadContext<Tok>>;

/// Hierarchical section profiler.
pub struct Profiler<C: Clock = MonotonicClock, T: ThreadIdentity = CurrentThread> {
    clock: C,
    identity: T,
    settings: ProfilerSettings,
    contexts: Mutex<Vec<SharedContext<T::Token>>>,
    next_order: AtomicU64,
}

impl Profiler {
    pub fn new() -> Self {
        Self::with_settings(ProfilerSettings::default())
    }

    pub fn with_settings(settings: ProfilerSettings) -> Self {
        Self::with_parts(MonotonicClock::new(), CurrentThread, settings)
    }
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock, T: ThreadIdentity> Profiler<C, T> {
    pub fn with_parts(clock: C, identity: T, settings: ProfilerSettings) -> Self {
        Self {
            clock,
            identity,
            settings,
            contexts: Mutex::new(Vec::new()),
            next_order: AtomicU64::new(0),
        }
    }

    pub fn settings(&self) -> &ProfilerSettings {
        &self.settings
    }

    /// Number of threads with a live context.
    pub fn thread_count(&self) -> usize {
        lock(&self.contexts).len()
    }

    /// Find the calling thread's context, registering one on first use.
    fn context(&self) -> SharedContext<T::Token> {
        let token = self.identity.current();
        let mut contexts = lock(&self.contexts);
        if let Some(context) = contexts.iter().find(|context| context.belongs_to(&token)) {
            return Arc::clone(context);
        }

        let name = self.identity.current_name();
        tracing::debug!(thread = ?token, ?name, "registering profiler context");
        let context = Arc::new(ThreadContext::new(token, name));
        contexts.push(Arc::clone(&context));
        context
    }

    /// Drop every thread's history. Later pushes start from empty trees.
    pub fn clear(&self) {
        let mut contexts = lock(&self.contexts);
        tracing::info!(threads = contexts.len(), "clearing profiler history");
        contexts.clear();
    }

    /// Open `name` under the calling thread's innermost open section.
    ///
    /// An empty name is recorded under the configured default label.
    pub fn section_push(&self, name: &str) {
        let name = if name.is_empty() {
            self.settings.default_label.as_str()
        } else {
            name
        };

        let context = self.context();
        let mut tree = context.tree();
        let now = self.clock.now();
        tree.enter(
            name,
            || self.next_order.fetch_add(1, Ordering::Relaxed),
            now,
        );
    }

    /// Open a section under the configured default label.
    pub fn section_push_default(&self) {
        self.section_push("");
    }

    /// Close the calling thread's innermost open section.
    ///
    /// A pop with nothing open is ignored.
    pub fn section_pop(&self) {
        let end = self.clock.now();
        let context = self.context();
        if context.tree().exit(end).is_none() {
            tracing::trace!(thread = ?context.token(), "ignoring unmatched section pop");
        }
    }

    /// Push `name` now and pop it when the returned guard drops.
    pub fn scope(&self, name: &str) -> SectionGuard<'_, C, T> {
        SectionGuard::new(self, name)
    }

    /// Snapshot every thread's tree, sorted by `sort`.
    pub fn report(&self, sort: SortBy) -> Report {
        let contexts = lock(&self.contexts);
        self.report_locked(&contexts, sort)
    }

    fn report_locked(&self, contexts: &[SharedContext<T::Token>], sort: SortBy) -> Report {
        let threads = contexts
            .iter()
            .map(|context| ThreadReport::from_tree(context.label(), &context.tree(), sort))
            .collect();
        Report {
            sort,
            name_width: self.settings.name_width,
            threads,
        }
    }

    /// Snapshot of the calling thread's tree, if it has one.
    pub fn thread_report(&self, sort: SortBy) -> Option<ThreadReport> {
        let token = self.identity.current();
        let contexts = lock(&self.contexts);
        contexts
            .iter()
            .find(|context| context.belongs_to(&token))
            .map(|context| ThreadReport::from_tree(context.label(), &context.tree(), sort))
    }

    /// Write the text report to `out`, holding the registry lock throughout.
    pub fn display_to<W: Write>(&self, out: &mut W, sort: SortBy) -> io::Result<()> {
        let contexts = lock(&self.contexts);
        let report = self.report_locked(&contexts, sort);
        write!(out, "{report}")?;
        out.flush()
    }

    /// Print the report to stdout.
    pub fn display(&self, sort: SortBy) {
        let stdout = io::stdout();
        if let Err(err) = self.display_to(&mut stdout.lock(), sort) {
            tracing::warn!(error = %err, "failed to write profiler report");
        }
    }

    /// Print the report using the configured default sort.
    pub fn display_default(&self) {
        self.display(self.settings.default_sort);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_core::ManualClock;
    use std::thread;

    fn manual() -> (Arc<ManualClock>, Profiler<Arc<ManualClock>, CurrentThread>) {
        let clock = Arc::new(ManualClock::new());
        let profiler =
            Profiler::with_parts(Arc::clone(&clock), CurrentThread, ProfilerSettings::default());
        (clock, profiler)
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_accumulation() {
        let (clock, profiler) = manual();
        let samples = [3u64, 9, 1, 7];
        let mut now = 0;
        for sample in samples {
            clock.set_millis(now);
            profiler.section_push("tick");
            now += sample;
            clock.set_millis(now);
            profiler.section_pop();
        }

        let report = profiler.thread_report(SortBy::TotalTime).unwrap();
        let tick = report.find(&["tick"]).unwrap();
        assert_eq!(tick.call_count, 4);
        assert!(approx(tick.avg_time_ms, 5.0));
        assert!(approx(tick.total_time_ms, 20.0));
        assert_eq!(report.sections.len(), 1);
    }

    #[test]
    fn test_nested_scenario() {
        let (clock, profiler) = manual();
        clock.set_millis(0);
        profiler.section_push("outer");
        profiler.section_push("inner");
        clock.set_millis(3);
        profiler.section_pop();
        clock.set_millis(10);
        profiler.section_pop();

        let report = profiler.thread_report(SortBy::TotalTime).unwrap();
        let outer = report.find(&["outer"]).unwrap();
        let inner = report.find(&["outer", "inner"]).unwrap();
        assert_eq!((outer.call_count, inner.call_count), (1, 1));
        assert!(approx(outer.avg_time_ms, 10.0));
        assert!(approx(inner.avg_time_ms, 3.0));

        let mut out = Vec::new();
        profiler.display_to(&mut out, SortBy::TotalTime).unwrap();
        let text = String::from_utf8(out).unwrap();
        let outer_row = text.lines().find(|l| l.starts_with("+ outer")).unwrap();
        let inner_row = text.lines().find(|l| l.starts_with("  + inner")).unwrap();
        assert!(outer_row.ends_with("     10.00    10.00000       1"));
        assert!(inner_row.ends_with("      3.00     3.00000       1"));
    }

    #[test]
    fn test_extra_pops_are_absorbed() {
        let (clock, profiler) = manual();
        profiler.section_pop();
        profiler.section_push("X");
        profiler.section_push("Y");
        clock.set_millis(4);
        profiler.section_pop();
        profiler.section_pop();
        let before = profiler.thread_report(SortBy::TotalTime).unwrap();

        clock.set_millis(50);
        profiler.section_pop();
        profiler.section_pop();
        let after = profiler.thread_report(SortBy::TotalTime).unwrap();
        assert_eq!(before, after);

        profiler.section_push("X");
        clock.set_millis(54);
        profiler.section_pop();
        let x = profiler.thread_report(SortBy::TotalTime).unwrap();
        assert_eq!(x.find(&["X"]).unwrap().call_count, 2);
    }

    #[test]
    fn test_empty_name_uses_default_label() {
        let (_clock, profiler) = manual();
        profiler.section_push("");
        profiler.section_pop();
        profiler.section_push_default();
        profiler.section_pop();

        let report = profiler.thread_report(SortBy::TotalTime).unwrap();
        assert_eq!(report.find(&["unlabelled section"]).unwrap().call_count, 2);
    }

    #[test]
    fn test_custom_default_label() {
        let settings = ProfilerSettings {
            default_label: "anon".into(),
            ..ProfilerSettings::default()
        };
        let profiler = Profiler::with_parts(ManualClock::new(), CurrentThread, settings);
        profiler.section_push("");
        profiler.section_pop();
        let report = profiler.thread_report(SortBy::TotalTime).unwrap();
        assert!(report.find(&["anon"]).is_some());
    }

    #[test]
    fn test_clear_resets_history() {
        let (clock, profiler) = manual();
        for _ in 0..3 {
            clock.set_millis(0);
            profiler.section_push("load");
            clock.set_millis(8);
            profiler.section_pop();
        }
        assert_eq!(profiler.thread_count(), 1);

        profiler.clear();
        assert_eq!(profiler.thread_count(), 0);
        assert!(profiler.thread_report(SortBy::TotalTime).is_none());

        clock.set_millis(100);
        profiler.section_push("load");
        clock.set_millis(102);
        profiler.section_pop();

        let report = profiler.thread_report(SortBy::TotalTime).unwrap();
        let load = report.find(&["load"]).unwrap();
        assert_eq!(load.call_count, 1);
        assert!(approx(load.avg_time_ms, 2.0));
    }

    #[test]
    fn test_thread_isolation() {
        let (_clock, profiler) = manual();
        thread::scope(|scope| {
            for pushes in [3, 5] {
                let profiler = &profiler;
                scope.spawn(move || {
                    for _ in 0..pushes {
                        profiler.section_push("A");
                        profiler.section_pop();
                    }
                });
            }
        });

        let report = profiler.report(SortBy::TotalTime);
        assert_eq!(report.threads.len(), 2);
        let mut counts: Vec<u64> = report
            .threads
            .iter()
            .map(|thread| thread.find(&["A"]).unwrap().call_count)
            .collect();
        counts.sort_unstable();
        assert_eq!(counts, [3, 5]);
        assert!(profiler.thread_report(SortBy::TotalTime).is_none());
    }

    #[test]
    fn test_one_context_per_thread_under_contention() {
        let profiler = Profiler::new();
        thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..100 {
                        profiler.section_push("work");
                        profiler.section_push("step");
                        profiler.section_pop();
                        profiler.section_pop();
                    }
                });
            }
        });

        let report = profiler.report(SortBy::ExecutionOrder);
        assert_eq!(report.threads.len(), 8);
        for thread in &report.threads {
            assert_eq!(thread.find(&["work"]).unwrap().call_count, 100);
            assert_eq!(thread.find(&["work", "step"]).unwrap().call_count, 100);
        }
    }

    #[test]
    fn test_named_thread_label() {
        let profiler = Profiler::new();
        thread::scope(|scope| {
            thread::Builder::new()
                .name("loader".into())
                .spawn_scoped(scope, || {
                    profiler.section_push("read");
                    profiler.section_pop();
                })
                .unwrap();
        });

        let mut out = Vec::new();
        profiler.display_to(&mut out, SortBy::TotalTime).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text
            .lines()
            .any(|line| line.starts_with("Thread ThreadId(") && line.ends_with("(loader)")));
    }

    #[test]
    fn test_sort_modes() {
        let (clock, profiler) = manual();
        let mut now = 0;
        for (name, cost) in [("five", 5), ("fifty", 50), ("ten", 10)] {
            clock.set_millis(now);
            profiler.section_push(name);
            now += cost;
            clock.set_millis(now);
            profiler.section_pop();
        }

        let by_time = profiler.thread_report(SortBy::TotalTime).unwrap();
        let by_order = profiler.thread_report(SortBy::ExecutionOrder).unwrap();
        let names = |report: &ThreadReport| -> Vec<String> {
            report.sections.iter().map(|s| s.name.clone()).collect()
        };
        assert_eq!(names(&by_time), ["fifty", "ten", "five"]);
        assert_eq!(names(&by_order), ["five", "fifty", "ten"]);
    }

    #[test]
    fn test_display_default_uses_settings() {
        let settings = ProfilerSettings {
            default_sort: SortBy::ExecutionOrder,
            ..ProfilerSettings::default()
        };
        let profiler = Profiler::with_settings(settings);
        assert_eq!(profiler.settings().default_sort, SortBy::ExecutionOrder);
        profiler.section_push("shown");
        profiler.section_pop();
        profiler.display_default();
    }
}
