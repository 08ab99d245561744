//! Per-thread tree of named sections
//!
//! Nodes live in an arena owned by the tree. Children are keyed by name under
//! their parent, so re-entering a name at the same position lands on the same
//! node and its timings accumulate across calls.

use arbor_core::Timestamp;
use std::collections::BTreeMap;
use std::ops::Index;

/// Index of a node inside its [`SectionTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(&self) -> usize {
        self.0
    }
}

/// One named point in the section hierarchy.
#[derive(Debug, Clone)]
pub struct SectionNode {
    name: String,
    call_count: u64,
    avg_time_ms: f64,
    order: u64,
    started: Option<Timestamp>,
    parent: Option<NodeId>,
    children: BTreeMap<String, NodeId>,
}

impl SectionNode {
    fn root() -> Self {
        Self {
            name: String::new(),
            call_count: 0,
            avg_time_ms: 0.0,
            order: 0,
            started: None,
            parent: None,
            children: BTreeMap::new(),
        }
    }

    fn child(name: &str, parent: NodeId, order: u64) -> Self {
        Self {
            name: name.to_owned(),
            parent: Some(parent),
            order,
            ..Self::root()
        }
    }

    /// Fold one elapsed sample into the running average.
    pub fn record(&mut self, elapsed_ms: f64) {
        let total = elapsed_ms + self.avg_time_ms * self.call_count as f64;
        self.call_count += 1;
        self.avg_time_ms = total / self.call_count as f64;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call_count(&self) -> u64 {
        self.call_count
    }

    pub fn avg_time_ms(&self) -> f64 {
        self.avg_time_ms
    }

    /// Cumulative time spent in this section.
    pub fn total_time_ms(&self) -> f64 {
        self.avg_time_ms * self.call_count as f64
    }

    /// Creation order, unique per profiler.
    pub fn order(&self) -> u64 {
        self.order
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_open(&self) -> bool {
        self.started.is_some()
    }

    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.values().copied()
    }

    pub fn child_named(&self, name: &str) -> Option<NodeId> {
        self.children.get(name).copied()
    }
}

/// Arena-backed section tree with a cursor at the innermost open section.
#[derive(Debug, Clone)]
pub struct SectionTree {
    nodes: Vec<SectionNode>,
    cursor: NodeId,
}

impl SectionTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![SectionNode::root()],
            cursor: NodeId::ROOT,
        }
    }

    /// Open `name` under the cursor, creating it on first use.
    ///
    /// `next_order` is only consulted when a node has to be created.
    pub fn enter(
        &mut self,
        name: &str,
        next_order: impl FnOnce() -> u64,
        now: Timestamp,
    ) -> NodeId {
        let parent = self.cursor;
        let id = match self.nodes[parent.0].child_named(name) {
            Some(id) => id,
            None => {
                let id = NodeId(self.nodes.len());
                self.nodes
                    .push(SectionNode::child(name, parent, next_order()));
                self.nodes[parent.0].children.insert(name.to_owned(), id);
                id
            }
        };

        self.cursor = id;
        self.nodes[id.0].started = Some(now);
        id
    }

    /// Close the innermost open section and move the cursor to its parent.
    ///
    /// Returns `None` without touching any node when the cursor is already
    /// at the root.
    pub fn exit(&mut self, now: Timestamp) -> Option<NodeId> {
        let id = self.cursor;
        let node = &mut self.nodes[id.0];
        let parent = node.parent?;

        debug_assert!(node.started.is_some(), "open section without a start time");
        let started = node.started.take().unwrap_or(now);
        node.record(now.millis_since(started));

        self.cursor = parent;
        Some(id)
    }

    pub fn root(&self) -> &SectionNode {
        &self.nodes[NodeId::ROOT.0]
    }

    pub fn cursor(&self) -> NodeId {
        self.cursor
    }

    /// True when no section is open.
    pub fn is_idle(&self) -> bool {
        self.cursor == NodeId::ROOT
    }

    /// Number of sections currently open.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut at = self.cursor;
        while let Some(parent) = self.nodes[at.0].parent {
            depth += 1;
            at = parent;
        }
        depth
    }

    /// Number of named sections, excluding the root.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: NodeId) -> Option<&SectionNode> {
        self.nodes.get(id.0)
    }

    /// Follow `path` of names from the root.
    pub fn find(&self, path: &[&str]) -> Option<&SectionNode> {
        let mut at = NodeId::ROOT;
        for name in path {
            at = self.nodes[at.0].child_named(name)?;
        }
        self.get(at)
    }
}

impl Default for SectionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<NodeId> for SectionTree {
    type Output = SectionNode;

    fn index(&self, id: NodeId) -> &SectionNode {
        &self.nodes[id.0]
    }
}
