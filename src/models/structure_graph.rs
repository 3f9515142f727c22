//! The cross-file structure graph (spec §3 `StructureNode`/`Edge`, §4.3).
//!
//! Backed by `petgraph::graph::DiGraph` rather than hand-rolled adjacency
//! lists: node identity is the spec's stable string id, kept in a side
//! `HashMap<String, NodeIndex>` since `DiGraph` node weights need not be
//! `Copy` but graph-map variants require it.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};

use super::symbol::{Symbol, SymbolKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum StructureNode {
    Package { id: String, name: String },
    File { id: String, path: String, language: Option<String> },
    Symbol {
        id: String,
        name: String,
        symbol_kind: SymbolKind,
        path: String,
        language: Option<String>,
        start_line: usize,
        end_line: usize,
    },
}

impl StructureNode {
    pub fn id(&self) -> &str {
        match self {
            StructureNode::Package { id, .. } => id,
            StructureNode::File { id, .. } => id,
            StructureNode::Symbol { id, .. } => id,
        }
    }

    pub fn package(top_level_dir: &str) -> Self {
        let id = format!("package:{}", top_level_dir);
        StructureNode::Package { id, name: top_level_dir.to_string() }
    }

    pub fn file(path: &str, language: Option<String>) -> Self {
        StructureNode::File { id: format!("file:{}", path), path: path.to_string(), language }
    }

    pub fn from_symbol(symbol: &Symbol) -> Self {
        StructureNode::Symbol {
            id: symbol.id.clone(),
            name: symbol.name.clone(),
            symbol_kind: symbol.kind,
            path: symbol.path.clone(),
            language: symbol.language.clone(),
            start_line: symbol.start_line,
            end_line: symbol.end_line,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Contains,
    Defines,
    Import,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
}

/// Stage-local builder that returns an owned `StructureGraph` to the
/// orchestrator (spec §9 "shared mutable maps" note).
#[derive(Default)]
pub struct StructureGraph {
    graph: DiGraph<StructureNode, EdgeKind>,
    index_of: HashMap<String, NodeIndex>,
}

impl StructureGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a node if its id is not already present; returns its index.
    pub fn upsert_node(&mut self, node: StructureNode) -> NodeIndex {
        let id = node.id().to_string();
        if let Some(&idx) = self.index_of.get(&id) {
            return idx;
        }
        let idx = self.graph.add_node(node);
        self.index_of.insert(id, idx);
        idx
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.index_of.contains_key(id)
    }

    pub fn add_edge(&mut self, source: &str, target: &str, kind: EdgeKind) {
        let (Some(&s), Some(&t)) = (self.index_of.get(source), self.index_of.get(target)) else {
            return;
        };
        self.graph.add_edge(s, t, kind);
    }

    pub fn nodes(&self) -> impl Iterator<Item = &StructureNode> {
        self.graph.node_weights()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edges(&self) -> Vec<Edge> {
        self.graph
            .edge_indices()
            .map(|e| {
                let (s, t) = self.graph.edge_endpoints(e).unwrap();
                Edge {
                    source: self.graph[s].id().to_string(),
                    target: self.graph[t].id().to_string(),
                    kind: self.graph[e],
                }
            })
            .collect()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Outbound edges of `kind=import` from `file_id` (fan-out).
    pub fn import_fan_out(&self, file_id: &str) -> usize {
        let Some(&idx) = self.index_of.get(file_id) else { return 0 };
        self.graph
            .edges_directed(idx, Direction::Outgoing)
            .filter(|e| *e.weight() == EdgeKind::Import)
            .count()
    }

    /// Inbound edges of `kind=import` into `file_id` (fan-in).
    pub fn import_fan_in(&self, file_id: &str) -> usize {
        let Some(&idx) = self.index_of.get(file_id) else { return 0 };
        self.graph
            .edges_directed(idx, Direction::Incoming)
            .filter(|e| *e.weight() == EdgeKind::Import)
            .count()
    }

}
