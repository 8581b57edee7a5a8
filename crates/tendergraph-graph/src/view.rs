//! Serializable projections of the graph for the presentation layer.

use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use tendergraph_core::{EntityId, TenderStatus};

use crate::graph::{EdgeKind, NodeKind, TenderGraph};

#[derive(Debug, Clone, Serialize)]
pub struct ViewNode {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub procuring_entity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TenderStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewEdge {
    pub id: String,
    pub source: EntityId,
    pub target: EntityId,
    pub relationship: EdgeKind,
    pub suspicious: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphView {
    pub nodes: Vec<ViewNode>,
    pub edges: Vec<ViewEdge>,
}

/// Flatten the graph into node and edge lists. Edge ids are positional
/// (`edge-0`, `edge-1`, ...) and stable for a given build.
pub fn project(graph: &TenderGraph) -> GraphView {
    let nodes = graph
        .nodes()
        .map(|n| ViewNode {
            id: n.id.clone(),
            kind: n.kind,
            label: n.label.clone(),
            department: n.department.clone(),
            procuring_entity: n.procuring_entity.clone(),
            value: n.value,
            status: n.status,
        })
        .collect();

    let edges = graph
        .edges()
        .enumerate()
        .map(|(idx, (source, target, edge))| ViewEdge {
            id: format!("edge-{}", idx),
            source: source.id.clone(),
            target: target.id.clone(),
            relationship: edge.kind,
            suspicious: edge.suspicious,
            label: edge.relation.map(|r| r.to_string()),
        })
        .collect();

    GraphView { nodes, edges }
}

/// Subgraph of every node within `depth` hops of `center`, with all edges
/// between the retained nodes. Unknown center ids yield an empty graph.
pub fn neighborhood(graph: &TenderGraph, center: &str, depth: usize) -> TenderGraph {
    let mut sub = TenderGraph::new();
    if !graph.contains(center) {
        return sub;
    }

    let mut keep: HashSet<EntityId> = HashSet::new();
    let mut queue = VecDeque::from([(center.to_string(), 0usize)]);
    keep.insert(center.to_string());
    while let Some((id, dist)) = queue.pop_front() {
        if dist == depth {
            continue;
        }
        for neighbor in graph.neighbors(&id) {
            if keep.insert(neighbor.clone()) {
                queue.push_back((neighbor.clone(), dist + 1));
            }
        }
    }

    for node in graph.nodes() {
        if keep.contains(&node.id) {
            sub.add_node(node.clone());
        }
    }
    for (source, target, edge) in graph.edges() {
        if keep.contains(&source.id) && keep.contains(&target.id) {
            sub.add_edge(&source.id, &target.id, edge.clone());
        }
    }
    sub
}
