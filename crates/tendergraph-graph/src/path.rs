use std::collections::{HashMap, VecDeque};
use tendergraph_core::EntityId;

use crate::graph::TenderGraph;

/// Unweighted shortest path between two nodes, endpoints inclusive, over all
/// edge types. Returns `None` when either id is unknown or the nodes are
/// disconnected; absence of a path is a result, not an error.
pub fn shortest_path(graph: &TenderGraph, from: &str, to: &str) -> Option<Vec<EntityId>> {
    let start = graph.index_of(from)?;
    let goal = graph.index_of(to)?;
    if start == goal {
        return Some(vec![from.to_string()]);
    }

    let inner = graph.inner();
    let mut prev = HashMap::new();
    let mut queue = VecDeque::from([start]);
    prev.insert(start, start);

    while let Some(node) = queue.pop_front() {
        for neighbor in inner.neighbors(node) {
            if prev.contains_key(&neighbor) {
                continue;
            }
            prev.insert(neighbor, node);
            if neighbor == goal {
                let mut path = vec![inner[neighbor].id.clone()];
                let mut cursor = node;
                loop {
                    path.push(inner[cursor].id.clone());
                    if cursor == start {
                        break;
                    }
                    cursor = prev[&cursor];
                }
                path.reverse();
                return Some(path);
            }
            queue.push_back(neighbor);
        }
    }
    None
}
