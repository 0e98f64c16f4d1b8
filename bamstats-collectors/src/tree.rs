use std::fmt::{self, Display};

use bamstats_core::models::{AlignmentRecord, ReferenceTable};
use log::debug;

use crate::errors::{CollectorTreeError, Result};
use crate::snapshot::Snapshot;

///
/// A node's own statistics logic. The tree takes care of forwarding to children.
///
pub trait StatCollector: Send {
    /// Update this collector's statistics with one record.
    fn process_alignment(&mut self, record: &AlignmentRecord, refs: &ReferenceTable);

    /// Write this collector's fields into `snapshot`.
    ///
    /// Takes `&mut self` so collectors can advance per-interval state (duty cycles, monitors)
    /// once per snapshot.
    fn append_snapshot(&mut self, snapshot: &mut Snapshot);

    /// Whether this collector considers its statistics settled. Never, unless overridden.
    fn is_satisfied(&self) -> bool {
        false
    }
}

///
/// A node with no statistics of its own, used to group children.
///
#[derive(Debug, Clone, Copy, Default)]
pub struct CompositeCollector;

impl StatCollector for CompositeCollector {
    fn process_alignment(&mut self, _record: &AlignmentRecord, _refs: &ReferenceTable) {}

    fn append_snapshot(&mut self, _snapshot: &mut Snapshot) {}
}

///
/// Stable handle to a collector registered in a [`CollectorTree`].
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectorId(usize);

impl Display for CollectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct CollectorNode {
    collector: Box<dyn StatCollector>,
    children: Vec<CollectorId>,
}

///
/// An arena of collectors linked into a tree by handles.
///
/// The tree owns every collector; parent/child links are plain [`CollectorId`]s, so removing a
/// child from a parent never invalidates the collector itself. Links may not form a cycle.
///
pub struct CollectorTree {
    nodes: Vec<CollectorNode>,
    root: CollectorId,
}

impl std::fmt::Debug for CollectorTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectorTree")
            .field("len", &self.nodes.len())
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl CollectorTree {
    pub fn new(root: impl StatCollector + 'static) -> Self {
        CollectorTree {
            nodes: vec![CollectorNode {
                collector: Box::new(root),
                children: Vec::new(),
            }],
            root: CollectorId(0),
        }
    }

    pub fn root(&self) -> CollectorId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    ///
    /// Register a collector in the arena without linking it anywhere yet.
    ///
    pub fn insert(&mut self, collector: impl StatCollector + 'static) -> CollectorId {
        self.insert_boxed(Box::new(collector))
    }

    pub fn insert_boxed(&mut self, collector: Box<dyn StatCollector>) -> CollectorId {
        let id = CollectorId(self.nodes.len());
        self.nodes.push(CollectorNode {
            collector,
            children: Vec::new(),
        });
        id
    }

    ///
    /// Register a collector and append it to `parent`'s children.
    ///
    pub fn attach(
        &mut self,
        parent: CollectorId,
        collector: impl StatCollector + 'static,
    ) -> Result<CollectorId> {
        self.node(parent)?;
        let child = self.insert(collector);
        self.add_child(parent, child)?;
        Ok(child)
    }

    ///
    /// Append `child` to `parent`'s children. Returns `false` if it was already a child.
    ///
    pub fn add_child(&mut self, parent: CollectorId, child: CollectorId) -> Result<bool> {
        self.node(parent)?;
        self.node(child)?;

        if child == parent || self.reaches(child, parent) {
            return Err(CollectorTreeError::Cycle { parent, child });
        }

        let children = &mut self.nodes[parent.0].children;
        if children.contains(&child) {
            return Ok(false);
        }

        debug!("Attaching collector {} under {}", child, parent);
        children.push(child);
        Ok(true)
    }

    ///
    /// Remove the first occurrence of `child` from `parent`'s children. Returns `false` if absent.
    ///
    pub fn remove_child(&mut self, parent: CollectorId, child: CollectorId) -> Result<bool> {
        self.node(parent)?;

        let children = &mut self.nodes[parent.0].children;
        match children.iter().position(|id| *id == child) {
            Some(index) => {
                children.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn children(&self, id: CollectorId) -> Result<&[CollectorId]> {
        Ok(&self.node(id)?.children)
    }

    ///
    /// Feed one record through the whole tree, parents before children.
    ///
    pub fn process(&mut self, record: &AlignmentRecord, refs: &ReferenceTable) {
        self.process_node(self.root, record, refs);
    }

    ///
    /// Feed one record through the subtree rooted at `id`.
    ///
    pub fn process_from(
        &mut self,
        id: CollectorId,
        record: &AlignmentRecord,
        refs: &ReferenceTable,
    ) -> Result<()> {
        self.node(id)?;
        self.process_node(id, record, refs);
        Ok(())
    }

    ///
    /// Build a fresh snapshot of the whole tree.
    ///
    pub fn snapshot(&mut self) -> Snapshot {
        let mut snapshot = Snapshot::new();
        self.snapshot_node(self.root, &mut snapshot);
        snapshot
    }

    ///
    /// Let the subtree rooted at `id` write into an existing snapshot.
    ///
    pub fn append_snapshot(&mut self, id: CollectorId, snapshot: &mut Snapshot) -> Result<()> {
        self.node(id)?;
        self.snapshot_node(id, snapshot);
        Ok(())
    }

    ///
    /// Whether the root and every collector below it are satisfied.
    ///
    pub fn is_satisfied(&self) -> bool {
        self.is_node_satisfied(self.root)
    }

    pub fn is_satisfied_from(&self, id: CollectorId) -> Result<bool> {
        self.node(id)?;
        Ok(self.is_node_satisfied(id))
    }

    fn node(&self, id: CollectorId) -> Result<&CollectorNode> {
        self.nodes
            .get(id.0)
            .ok_or(CollectorTreeError::UnknownCollector(id))
    }

    // depth-first search along child links
    fn reaches(&self, from: CollectorId, target: CollectorId) -> bool {
        let mut stack = vec![from];
        let mut visited = vec![false; self.nodes.len()];

        while let Some(id) = stack.pop() {
            if id == target {
                return true;
            }
            if std::mem::replace(&mut visited[id.0], true) {
                continue;
            }
            stack.extend(self.nodes[id.0].children.iter().copied());
        }
        false
    }

    fn process_node(&mut self, id: CollectorId, record: &AlignmentRecord, refs: &ReferenceTable) {
        self.nodes[id.0].collector.process_alignment(record, refs);

        for index in 0..self.nodes[id.0].children.len() {
            let child = self.nodes[id.0].children[index];
            self.process_node(child, record, refs);
        }
    }

    fn snapshot_node(&mut self, id: CollectorId, snapshot: &mut Snapshot) {
        self.nodes[id.0].collector.append_snapshot(snapshot);

        for index in 0..self.nodes[id.0].children.len() {
            let child = self.nodes[id.0].children[index];
            self.snapshot_node(child, snapshot);
        }
    }

    fn is_node_satisfied(&self, id: CollectorId) -> bool {
        let node = &self.nodes[id.0];
        node.collector.is_satisfied()
            && node
                .children
                .iter()
                .all(|child| self.is_node_satisfied(*child))
    }
}
