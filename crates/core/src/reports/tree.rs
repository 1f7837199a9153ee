//! Financial report node tree.

use std::collections::HashMap;

use budgetline_shared::types::ReportNodeId;
use tracing::debug;

use super::error::ReportError;
use super::types::{NewReportNode, ReportNode};

/// A forest of financial report nodes.
///
/// Levels are maintained on every structural change: a root is level 0 and
/// every child sits one level below its parent. Siblings keep their
/// insertion order, which breaks ties between equal sequences.
#[derive(Debug, Clone, Default)]
pub struct FinancialReportTree {
    nodes: HashMap<ReportNodeId, ReportNode>,
    children: HashMap<ReportNodeId, Vec<ReportNodeId>>,
    roots: Vec<ReportNodeId>,
}

impl FinancialReportTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a tree from node definitions given in any order.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::ParentNotFound` if a parent is never defined (or
    /// parents form a loop), or `ReportError::DuplicateNode` on repeated IDs.
    pub fn from_nodes(nodes: Vec<NewReportNode>) -> Result<Self, ReportError> {
        let mut tree = Self::new();
        let mut pending = nodes;

        while !pending.is_empty() {
            let (ready, waiting): (Vec<_>, Vec<_>) = pending
                .into_iter()
                .partition(|node| node.parent_id.is_none_or(|p| tree.nodes.contains_key(&p)));

            if ready.is_empty() {
                let missing = waiting.iter().find_map(|node| node.parent_id);
                return Err(ReportError::ParentNotFound(missing.unwrap_or(waiting[0].id)));
            }
            for node in ready {
                tree.insert(node)?;
            }
            pending = waiting;
        }

        Ok(tree)
    }

    /// Inserts a node under an existing parent (or as a root).
    ///
    /// # Errors
    ///
    /// Returns `ReportError::DuplicateNode` if the ID is taken, or
    /// `ReportError::ParentNotFound` if the parent does not exist.
    pub fn insert(&mut self, node: NewReportNode) -> Result<ReportNodeId, ReportError> {
        if self.nodes.contains_key(&node.id) {
            return Err(ReportError::DuplicateNode(node.id));
        }
        let level = match node.parent_id {
            Some(parent_id) => {
                self.nodes
                    .get(&parent_id)
                    .ok_or(ReportError::ParentNotFound(parent_id))?
                    .level
                    + 1
            }
            None => 0,
        };

        let id = node.id;
        self.attach(id, node.parent_id);
        self.nodes.insert(
            id,
            ReportNode {
                id,
                name: node.name,
                parent_id: node.parent_id,
                sequence: node.sequence,
                level,
                kind: node.kind,
                sign: node.sign,
                display_detail: node.display_detail,
                style: node.style,
            },
        );
        Ok(id)
    }

    /// Looks up a node.
    #[must_use]
    pub fn get(&self, id: ReportNodeId) -> Option<&ReportNode> {
        self.nodes.get(&id)
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Root nodes ordered by sequence.
    #[must_use]
    pub fn roots(&self) -> Vec<&ReportNode> {
        self.ordered(&self.roots)
    }

    /// Direct children of a node ordered by sequence.
    #[must_use]
    pub fn children(&self, id: ReportNodeId) -> Vec<&ReportNode> {
        self.children
            .get(&id)
            .map(|ids| self.ordered(ids))
            .unwrap_or_default()
    }

    /// Moves a node (with its subtree) under a new parent, or to the roots.
    ///
    /// Levels of the whole moved subtree are recomputed. Moving a node under
    /// its current parent changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::NodeNotFound`, `ReportError::ParentNotFound`, or
    /// `ReportError::CyclicParent` if the new parent lies inside the subtree.
    pub fn reparent(&mut self, id: ReportNodeId, parent_id: Option<ReportNodeId>) -> Result<(), ReportError> {
        let current = self.nodes.get(&id).ok_or(ReportError::NodeNotFound(id))?.parent_id;
        if parent_id == current {
            return Ok(());
        }
        if let Some(parent_id) = parent_id {
            if !self.nodes.contains_key(&parent_id) {
                return Err(ReportError::ParentNotFound(parent_id));
            }
            if self.is_within(parent_id, id) {
                return Err(ReportError::CyclicParent { node: id, parent: parent_id });
            }
        }

        self.detach(id, current);
        self.attach(id, parent_id);
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent_id = parent_id;
        }
        self.refresh_levels(id);
        debug!(node_id = %id, parent_id = ?parent_id, "reparented report node");
        Ok(())
    }

    /// Removes a node. Its children become roots.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::NodeNotFound` if the node does not exist.
    pub fn remove(&mut self, id: ReportNodeId) -> Result<ReportNode, ReportError> {
        let node = self.nodes.remove(&id).ok_or(ReportError::NodeNotFound(id))?;
        self.detach(id, node.parent_id);

        for child_id in self.children.remove(&id).unwrap_or_default() {
            if let Some(child) = self.nodes.get_mut(&child_id) {
                child.parent_id = None;
            }
            self.roots.push(child_id);
            self.refresh_levels(child_id);
        }
        Ok(node)
    }

    /// Returns the node followed by all its descendants in pre-order, each
    /// set of siblings ordered by sequence.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::NodeNotFound` if the node does not exist.
    pub fn collect_ordered_descendants(&self, id: ReportNodeId) -> Result<Vec<&ReportNode>, ReportError> {
        let node = self.nodes.get(&id).ok_or(ReportError::NodeNotFound(id))?;
        let mut out = Vec::new();
        self.collect_into(node, &mut out);
        Ok(out)
    }

    fn collect_into<'a>(&'a self, node: &'a ReportNode, out: &mut Vec<&'a ReportNode>) {
        out.push(node);
        for child in self.children(node.id) {
            self.collect_into(child, out);
        }
    }

    fn ordered(&self, ids: &[ReportNodeId]) -> Vec<&ReportNode> {
        let mut nodes: Vec<&ReportNode> = ids.iter().filter_map(|id| self.nodes.get(id)).collect();
        nodes.sort_by_key(|node| node.sequence);
        nodes
    }

    /// Returns true if `candidate` is `ancestor` or one of its descendants.
    fn is_within(&self, candidate: ReportNodeId, ancestor: ReportNodeId) -> bool {
        let mut cursor = Some(candidate);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.nodes.get(&id).and_then(|node| node.parent_id);
        }
        false
    }

    fn attach(&mut self, id: ReportNodeId, parent_id: Option<ReportNodeId>) {
        match parent_id {
            Some(parent_id) => self.children.entry(parent_id).or_default().push(id),
            None => self.roots.push(id),
        }
    }

    fn detach(&mut self, id: ReportNodeId, parent_id: Option<ReportNodeId>) {
        let siblings = match parent_id {
            Some(parent_id) => self.children.get_mut(&parent_id),
            None => Some(&mut self.roots),
        };
        if let Some(siblings) = siblings {
            siblings.retain(|sibling| *sibling != id);
        }
    }

    fn refresh_levels(&mut self, id: ReportNodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let parent_level = self
                .nodes
                .get(&current)
                .and_then(|node| node.parent_id)
                .and_then(|parent_id| self.nodes.get(&parent_id))
                .map(|parent| parent.level);
            if let Some(node) = self.nodes.get_mut(&current) {
                node.level = parent_level.map_or(0, |level| level + 1);
            }
            if let Some(children) = self.children.get(&current) {
                stack.extend(children.iter().copied());
            }
        }
    }
}
