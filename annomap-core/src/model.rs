use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Nesting depth. The root is level 1, skeleton sections level 2.
pub type Level = u32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub label: String,
    /// Rendered as the hover text; vis-network calls this field `title`.
    #[serde(rename = "title")]
    pub tooltip: String,
    pub level: Level,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub color: Option<String>,
}

impl Node {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        tooltip: impl Into<String>,
        level: Level,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            tooltip: tooltip.into(),
            level,
            color: None,
        }
    }

    /// The label as one line, the form used when matching tokens.
    pub fn flat_label(&self) -> String {
        flatten_label(&self.label)
    }
}

/// Folds line breaks to spaces and trims.
pub fn flatten_label(text: &str) -> String {
    text.trim().replace("\r\n", " ").replace('\n', " ")
}

/// Directed parent to child link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("Node already exists: {0}")]
    DuplicateNode(String),

    #[error("Node not found: {0}")]
    UnknownNode(String),
}

pub type Result<T> = std::result::Result<T, GraphError>;

/// The mind map being built for one report.
///
/// Nodes and edges keep their insertion order, which is also the order
/// renderers lay siblings out in.
#[derive(Debug, Clone, Default)]
pub struct MindMap {
    graph: StableDiGraph<Node, ()>,
    index: HashMap<String, NodeIndex>,
}

impl MindMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: Node) -> Result<()> {
        if self.index.contains_key(&node.id) {
            return Err(GraphError::DuplicateNode(node.id));
        }
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.index.insert(id, idx);
        Ok(())
    }

    pub fn add_edge(&mut self, from: &str, to: &str) -> Result<()> {
        let source = self.index_of(from)?;
        let target = self.index_of(to)?;
        self.graph.add_edge(source, target, ());
        Ok(())
    }

    /// Adds `node` and links it under `parent`.
    pub fn add_child(&mut self, parent: &str, node: Node) -> Result<()> {
        self.index_of(parent)?;
        let id = node.id.clone();
        self.add_node(node)?;
        self.add_edge(parent, &id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).and_then(|idx| self.graph.node_weight(*idx))
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        let idx = *self.index.get(id)?;
        self.graph.node_weight_mut(idx)
    }

    /// Removes the node together with every edge touching it.
    pub fn remove_node(&mut self, id: &str) -> Option<Node> {
        let idx = self.index.remove(id)?;
        self.graph.remove_node(idx)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> + '_ {
        self.graph.node_weights_mut()
    }

    pub fn edges(&self) -> Vec<Edge> {
        self.graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .map(|(from, to)| Edge {
                from: self.graph[from].id.clone(),
                to: self.graph[to].id.clone(),
            })
            .collect()
    }

    /// Children of `id`, oldest edge first.
    pub fn children(&self, id: &str) -> Vec<&Node> {
        let Some(&parent) = self.index.get(id) else {
            return Vec::new();
        };
        self.graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .filter(|(from, _)| *from == parent)
            .map(|(_, to)| &self.graph[to])
            .collect()
    }

    pub fn parent_of(&self, id: &str) -> Option<&Node> {
        let idx = *self.index.get(id)?;
        self.graph
            .neighbors_directed(idx, Direction::Incoming)
            .next()
            .map(|p| &self.graph[p])
    }

    pub fn has_outgoing(&self, id: &str) -> bool {
        self.index.get(id).is_some_and(|idx| {
            self.graph
                .neighbors_directed(*idx, Direction::Outgoing)
                .next()
                .is_some()
        })
    }

    /// First node, in insertion order, whose one-line label equals `text`.
    pub fn find_by_label(&self, text: &str) -> Option<&Node> {
        let wanted = flatten_label(text);
        self.nodes().find(|node| node.flat_label() == wanted)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    fn index_of(&self, id: &str) -> Result<NodeIndex> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| GraphError::UnknownNode(id.to_string()))
    }
}
