// Dependency graph connecting classes to their members and functions to
// the names they call

use crate::parser::{ClassDecl, FunctionDecl};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of relationship between two names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Class has a method or attribute
    Member,
    /// Function calls the target (detected statically)
    Calls,
}

/// Directed graph over declaration names.
///
/// Nodes are names rather than declarations, so classes sharing a name
/// share a node. Repeated edges collapse into one.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    graph: DiGraph<String, EdgeKind>,
    index: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the member graph: every class and an edge to each member
    pub fn build<'a>(classes: impl IntoIterator<Item = &'a ClassDecl>) -> Self {
        let mut graph = Self::new();
        for class in classes {
            let owner = graph.node(&class.name);
            for member in class.member_names() {
                let target = graph.node(member);
                graph.link(owner, target, EdgeKind::Member);
            }
        }
        graph
    }

    /// Add function nodes and an edge to every call target
    pub fn add_calls<'a>(&mut self, functions: impl IntoIterator<Item = &'a FunctionDecl>) {
        for func in functions {
            let caller = self.node(&func.name);
            for callee in &func.calls {
                let target = self.node(callee);
                self.link(caller, target, EdgeKind::Calls);
            }
        }
    }

    fn node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.index.insert(name.to_string(), idx);
        idx
    }

    fn link(&mut self, from: NodeIndex, to: NodeIndex, kind: EdgeKind) {
        if self.graph.find_edge(from, to).is_none() {
            self.graph.add_edge(from, to, kind);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.edge_kind(from, to).is_some()
    }

    pub fn edge_kind(&self, from: &str, to: &str) -> Option<EdgeKind> {
        let from = *self.index.get(from)?;
        let to = *self.index.get(to)?;
        let edge = self.graph.find_edge(from, to)?;
        self.graph.edge_weight(edge).copied()
    }

    /// Outgoing neighbors in the order their edges were added
    pub fn neighbors(&self, name: &str) -> Vec<&str> {
        let Some(&idx) = self.index.get(name) else {
            return Vec::new();
        };
        let mut edges: Vec<_> = self.graph.edges(idx).collect();
        edges.sort_by_key(|e| e.id().index());
        edges
            .into_iter()
            .map(|e| self.graph[e.target()].as_str())
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Node names in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(String::as_str)
    }

    /// Get statistics about the graph
    pub fn stats(&self) -> GraphStats {
        let calls = self
            .graph
            .edge_weights()
            .filter(|k| **k == EdgeKind::Calls)
            .count();
        GraphStats {
            nodes: self.node_count(),
            member_edges: self.edge_count() - calls,
            call_edges: calls,
        }
    }
}

/// Statistics about the dependency graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub member_edges: usize,
    pub call_edges: usize,
}
