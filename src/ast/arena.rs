use thiserror::Error;

use crate::ast::{NodeId, NodeKind, PathNode};

/// The owning links of an arena do not form a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OwnershipError {
    /// A node was reachable through more than one owning link.
    #[error("node {0:?} has more than one owner")]
    Shared(NodeId),

    /// A link names a node this arena never allocated.
    #[error("link to {0:?} points outside the arena")]
    Dangling(NodeId),
}

/// Arena holding every node of one query.
///
/// Nodes refer to each other by [`NodeId`]; the arena is their single owner,
/// so dropping it releases the whole query in one pass no matter how union
/// branches share their continuation.
#[derive(Debug, Clone, Default)]
pub struct Ast {
    nodes: Vec<PathNode>,
    root: Option<NodeId>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an unlinked node.
    pub fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(PathNode::new(kind));
        id
    }

    pub fn node(&self, id: NodeId) -> &PathNode {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Number of nodes allocated, reachable or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].next
    }

    pub fn shadow(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].shadow
    }

    /// Where evaluation goes after `id`: its own `next`, or for a union
    /// branch tail, the continuation shared by the union.
    pub fn continuation(&self, id: NodeId) -> Option<NodeId> {
        let node = &self.nodes[id.index()];
        node.next.or(node.shadow)
    }

    /// Last node of the `next` chain starting at `id`.
    pub fn tail(&self, id: NodeId) -> NodeId {
        let mut cur = id;
        while let Some(next) = self.nodes[cur.index()].next {
            cur = next;
        }
        cur
    }

    /// Links `step` after the last node of the chain starting at `head`.
    pub fn append(&mut self, head: NodeId, step: NodeId) {
        let tail = self.tail(head);
        self.nodes[tail.index()].next = Some(step);
    }

    pub(crate) fn set_next(&mut self, id: NodeId, next: NodeId) {
        self.nodes[id.index()].next = Some(next);
    }

    pub(crate) fn replace_kind(&mut self, id: NodeId, kind: NodeKind) {
        self.nodes[id.index()].kind = kind;
    }

    /// Sets the root and wires every union branch tail to the union's
    /// continuation through `shadow`.
    ///
    /// Fails if the link graph gives any node a second owner or links to a
    /// node outside the arena; the root is left unset in that case.
    pub fn finalize(&mut self, root: NodeId) -> Result<(), OwnershipError> {
        let order = self.walk_owned(root)?;
        self.root = Some(root);

        // Parents come before their branches, so a union nested in a branch
        // tail sees its parent's shadow already set.
        for id in order {
            let branches = match &self.nodes[id.index()].kind {
                NodeKind::Union(b) | NodeKind::DescendantUnion(b) => b.clone(),
                _ => continue,
            };
            let rejoin = self.continuation(id);
            for branch in branches {
                let tail = self.tail(branch);
                self.nodes[tail.index()].shadow = rejoin;
            }
        }
        Ok(())
    }

    /// Every node reachable from the root through owning links (payload links
    /// and `next`, never `shadow`), parents before children.
    ///
    /// Empty for an AST without a root.
    pub fn owned_nodes(&self) -> Result<Vec<NodeId>, OwnershipError> {
        match self.root {
            Some(root) => self.walk_owned(root),
            None => Ok(Vec::new()),
        }
    }

    fn walk_owned(&self, root: NodeId) -> Result<Vec<NodeId>, OwnershipError> {
        let mut seen = vec![false; self.nodes.len()];
        let mut order = Vec::new();
        let mut work = vec![root];

        while let Some(id) = work.pop() {
            let Some(visited) = seen.get_mut(id.index()) else {
                return Err(OwnershipError::Dangling(id));
            };
            if std::mem::replace(visited, true) {
                return Err(OwnershipError::Shared(id));
            }
            order.push(id);

            let node = &self.nodes[id.index()];
            if let Some(next) = node.next {
                work.push(next);
            }
            work.extend(node.kind.owned_links().into_iter().rev());
        }

        Ok(order)
    }
}
