//! Report snapshots and text rendering
//!
//! A [`Report`] is a sorted copy of every thread's tree taken while the
//! registry is locked. Rendering it never touches live profiler state.

use crate::section::{SectionNode, SectionTree};
use arbor_core::SortBy;
use std::cmp::Ordering;
use std::fmt;

const BANNER: &str =
    "---------------------------------------------------------------------------------------";
const NAME_HEADER: &str = "name                            values in ms -> ";

/// Timings of one section and its sorted children.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionReport {
    pub name: String,
    pub order: u64,
    pub call_count: u64,
    pub avg_time_ms: f64,
    pub total_time_ms: f64,
    pub children: Vec<SectionReport>,
}

impl SectionReport {
    fn from_node(tree: &SectionTree, node: &SectionNode, sort: SortBy) -> Self {
        Self {
            name: node.name().to_owned(),
            order: node.order(),
            call_count: node.call_count(),
            avg_time_ms: node.avg_time_ms(),
            total_time_ms: node.total_time_ms(),
            children: collect_children(tree, node, sort),
        }
    }

    /// Descend through `path` of child names.
    pub fn find(&self, path: &[&str]) -> Option<&SectionReport> {
        match path.split_first() {
            None => Some(self),
            Some((head, rest)) => self
                .children
                .iter()
                .find(|child| child.name == *head)?
                .find(rest),
        }
    }
}

/// One thread's sorted section forest.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadReport {
    pub label: String,
    pub sections: Vec<SectionReport>,
}

impl ThreadReport {
    pub(crate) fn from_tree(label: String, tree: &SectionTree, sort: SortBy) -> Self {
        Self {
            label,
            sections: collect_children(tree, tree.root(), sort),
        }
    }

    pub fn find(&self, path: &[&str]) -> Option<&SectionReport> {
        let (head, rest) = path.split_first()?;
        self.sections
            .iter()
            .find(|section| section.name == *head)?
            .find(rest)
    }
}

/// Snapshot of every thread, ready to print.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub sort: SortBy,
    pub name_width: usize,
    pub threads: Vec<ThreadReport>,
}

fn collect_children(tree: &SectionTree, node: &SectionNode, sort: SortBy) -> Vec<SectionReport> {
    let mut children: Vec<SectionReport> = node
        .children()
        .map(|id| SectionReport::from_node(tree, &tree[id], sort))
        .collect();
    sort_sections(&mut children, sort);
    children
}

fn sort_sections(sections: &mut [SectionReport], sort: SortBy) {
    match sort {
        SortBy::ExecutionOrder => sections.sort_by_key(|section| section.order),
        SortBy::TotalTime => sections.sort_by(|a, b| {
            b.total_time_ms
                .partial_cmp(&a.total_time_ms)
                .unwrap_or(Ordering::Equal)
        }),
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.name_width;
        writeln!(f, "{BANNER}")?;
        writeln!(f, "Profiler output: sorted by {}", self.sort)?;
        writeln!(
            f,
            "{:<width$}  {:>10}  {:>10}  {:>6}",
            NAME_HEADER, "total ", "average ", "count"
        )?;
        writeln!(f, "{BANNER}")?;
        for thread in &self.threads {
            writeln!(f, "Thread {}", thread.label)?;
            write_sections(f, &thread.sections, "| ", width)?;
        }
        writeln!(f, "{BANNER}")
    }
}

// `prefix` always ends in a two-character guide: the row replaces it with
// "+ ", and the last sibling's descendants get "  " in its place.
fn write_sections(
    f: &mut fmt::Formatter<'_>,
    sections: &[SectionReport],
    prefix: &str,
    width: usize,
) -> fmt::Result {
    let stem = &prefix[..prefix.len() - 2];
    let last = sections.len().saturating_sub(1);
    for (i, section) in sections.iter().enumerate() {
        let label = format!("{stem}+ {}", section.name);
        writeln!(
            f,
            "{:<width$}  {:>10.2}  {:>10.5}  {:>6}",
            label, section.total_time_ms, section.avg_time_ms, section.call_count
        )?;

        let mut next = if i == last {
            format!("{stem}  ")
        } else {
            prefix.to_owned()
        };
        next.push_str("| ");
        write_sections(f, &section.children, &next, width)?;
    }
    Ok(())
}
