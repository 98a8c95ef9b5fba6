//! Registration dependency graph
//!
//! Directed graph of registration keys rooted at a synthetic root key.
//! Nodes and successors iterate in insertion order so resolution is
//! reproducible.

use indexmap::{IndexMap, IndexSet};
use std::collections::VecDeque;

use crate::registry::key::RegistrationKey;

pub const ROOT_NAME: &str = "root";
pub const ROOT_NAMESPACE: &str = "root";

/// Synthetic key every top-level registration hangs from
pub fn root_key() -> RegistrationKey {
    RegistrationKey::new(ROOT_NAME, ROOT_NAMESPACE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// Declared dependency
    Child,
    /// Derived during variant expansion
    Variant,
}

#[derive(Debug, Clone)]
pub struct DependencyGraph {
    root: RegistrationKey,
    nodes: IndexSet<RegistrationKey>,
    outgoing: IndexMap<RegistrationKey, IndexMap<RegistrationKey, EdgeKind>>,
    incoming: IndexMap<RegistrationKey, IndexSet<RegistrationKey>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        let root = root_key();
        let mut graph = Self {
            root: root.clone(),
            nodes: IndexSet::new(),
            outgoing: IndexMap::new(),
            incoming: IndexMap::new(),
        };
        graph.add_node(root);
        graph
    }

    pub fn root(&self) -> &RegistrationKey {
        &self.root
    }

    /// Returns false if the node was already present
    pub fn add_node(&mut self, key: RegistrationKey) -> bool {
        if self.nodes.contains(&key) {
            return false;
        }
        self.outgoing.insert(key.clone(), IndexMap::new());
        self.incoming.insert(key.clone(), IndexSet::new());
        self.nodes.insert(key)
    }

    /// Add (or relabel) an edge, creating missing endpoints
    pub fn add_edge(&mut self, from: &RegistrationKey, to: &RegistrationKey, kind: EdgeKind) {
        self.add_node(from.clone());
        self.add_node(to.clone());
        if let Some(successors) = self.outgoing.get_mut(from) {
            successors.insert(to.clone(), kind);
        }
        if let Some(predecessors) = self.incoming.get_mut(to) {
            predecessors.insert(from.clone());
        }
    }

    pub fn contains(&self, key: &RegistrationKey) -> bool {
        self.nodes.contains(key)
    }

    pub fn edge_kind(&self, from: &RegistrationKey, to: &RegistrationKey) -> Option<EdgeKind> {
        self.outgoing.get(from).and_then(|s| s.get(to)).copied()
    }

    pub fn has_edge(&self, from: &RegistrationKey, to: &RegistrationKey) -> bool {
        self.edge_kind(from, to).is_some()
    }

    pub fn successors(&self, key: &RegistrationKey) -> Vec<RegistrationKey> {
        self.outgoing
            .get(key)
            .map(|s| s.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn in_degree(&self, key: &RegistrationKey) -> usize {
        self.incoming.get(key).map_or(0, IndexSet::len)
    }

    pub fn out_degree(&self, key: &RegistrationKey) -> usize {
        self.outgoing.get(key).map_or(0, IndexMap::len)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.outgoing.values().map(IndexMap::len).sum()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &RegistrationKey> {
        self.nodes.iter()
    }

    pub fn edges(&self) -> impl Iterator<Item = (&RegistrationKey, &RegistrationKey, EdgeKind)> {
        self.outgoing
            .iter()
            .flat_map(|(from, successors)| successors.iter().map(move |(to, kind)| (from, to, *kind)))
    }

    /// Nodes left over by Kahn's algorithm; empty iff the graph is acyclic
    pub fn cyclic_nodes(&self) -> Vec<RegistrationKey> {
        let mut in_degree: IndexMap<&RegistrationKey, usize> = self
            .nodes
            .iter()
            .map(|key| (key, self.in_degree(key)))
            .collect();

        let mut queue: VecDeque<&RegistrationKey> = in_degree
            .iter()
            .filter(|(_, &degree)| degree == 0)
            .map(|(key, _)| *key)
            .collect();

        let mut visited = 0;
        while let Some(key) = queue.pop_front() {
            visited += 1;
            if let Some(successors) = self.outgoing.get(key) {
                for successor in successors.keys() {
                    if let Some(degree) = in_degree.get_mut(successor) {
                        *degree -= 1;
                        if *degree == 0 {
                            queue.push_back(successor);
                        }
                    }
                }
            }
        }

        if visited == self.nodes.len() {
            return Vec::new();
        }
        in_degree
            .into_iter()
            .filter(|(_, degree)| *degree > 0)
            .map(|(key, _)| key.clone())
            .collect()
    }

    pub fn is_acyclic(&self) -> bool {
        self.cyclic_nodes().is_empty()
    }

    /// Nodes with neither incoming nor outgoing edges
    pub fn isolated_nodes(&self) -> Vec<RegistrationKey> {
        self.nodes
            .iter()
            .filter(|key| self.in_degree(key) == 0 && self.out_degree(key) == 0)
            .cloned()
            .collect()
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}
