//! Structural difference between two graphs

use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;

use super::graph::{EdgeId, Graph, NodeId};

/// What changed between two graphs. Metadata is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphDiff {
    /// Nodes only present in the second graph
    pub added_nodes: Vec<NodeId>,
    /// Nodes only present in the first graph
    pub removed_nodes: Vec<NodeId>,
    /// Nodes present in both with different content
    pub modified_nodes: Vec<NodeId>,
    /// Edges only present in the second graph
    pub added_edges: Vec<EdgeId>,
    /// Edges only present in the first graph
    pub removed_edges: Vec<EdgeId>,
    /// Edges present in both with different endpoints or type
    pub modified_edges: Vec<EdgeId>,
}

impl GraphDiff {
    /// Compute the diff from `before` to `after`.
    ///
    /// Ids are matched by occurrence: the n-th node with a given id in
    /// `before` pairs with the n-th node with that id in `after`, so a
    /// duplicate id shows up as an addition or removal.
    pub fn between(before: &Graph, after: &Graph) -> Self {
        let (added_nodes, removed_nodes, modified_nodes) =
            compare(&before.nodes, &after.nodes, |node| &node.id);
        let (added_edges, removed_edges, modified_edges) =
            compare(&before.edges, &after.edges, |edge| &edge.id);

        GraphDiff {
            added_nodes,
            removed_nodes,
            modified_nodes,
            added_edges,
            removed_edges,
            modified_edges,
        }
    }

    /// True when both graphs hold the same nodes and edges
    pub fn is_empty(&self) -> bool {
        self.added_nodes.is_empty()
            && self.removed_nodes.is_empty()
            && self.modified_nodes.is_empty()
            && self.added_edges.is_empty()
            && self.removed_edges.is_empty()
            && self.modified_edges.is_empty()
    }

    /// Total number of changed nodes and edges
    pub fn change_count(&self) -> usize {
        self.added_nodes.len()
            + self.removed_nodes.len()
            + self.modified_nodes.len()
            + self.added_edges.len()
            + self.removed_edges.len()
            + self.modified_edges.len()
    }
}

/// Added, removed and modified ids from `before` to `after`
fn compare<'a, T, K>(
    before: &'a [T],
    after: &'a [T],
    key: impl Fn(&'a T) -> &'a K,
) -> (Vec<K>, Vec<K>, Vec<K>)
where
    T: PartialEq,
    K: Eq + Hash + Clone + 'a,
{
    let mut old: HashMap<&K, Vec<&T>> = HashMap::new();
    for item in before {
        old.entry(key(item)).or_default().push(item);
    }

    let mut added = Vec::new();
    let mut modified = Vec::new();
    let mut seen: HashMap<&K, usize> = HashMap::new();
    for item in after {
        let id = key(item);
        let occurrence = seen.entry(id).or_insert(0);
        match old.get(id).and_then(|items| items.get(*occurrence)) {
            None => added.push(id.clone()),
            Some(previous) if *previous != item => modified.push(id.clone()),
            Some(_) => {}
        }
        *occurrence += 1;
    }

    let mut removed = Vec::new();
    let mut kept: HashMap<&K, usize> = HashMap::new();
    for item in before {
        let id = key(item);
        let occurrence = kept.entry(id).or_insert(0);
        if *occurrence >= seen.get(id).copied().unwrap_or(0) {
            removed.push(id.clone());
        }
        *occurrence += 1;
    }

    (added, removed, modified)
}
