use chrono::NaiveDate;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tendergraph_core::{Company, Director, EntityId, PublicOfficial, RelationshipKind, Tender, TenderStatus};

/// Tender titles are shortened to this many characters for display labels.
const LABEL_MAX_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    Company,
    Director,
    Official,
    Tender,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeKind::Company => "company",
            NodeKind::Director => "director",
            NodeKind::Official => "official",
            NodeKind::Tender => "tender",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeKind {
    DirectorOf,
    BidOn,
    Won,
    AwardedBy,
    RelatedTo,
    SharesAddress,
    SharesPhone,
}

impl EdgeKind {
    /// Structural and relational edges are flagged; ordinary procurement
    /// edges are not.
    pub fn is_suspicious(&self) -> bool {
        matches!(
            self,
            EdgeKind::RelatedTo | EdgeKind::SharesAddress | EdgeKind::SharesPhone
        )
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EdgeKind::DirectorOf => "director_of",
            EdgeKind::BidOn => "bid_on",
            EdgeKind::Won => "won",
            EdgeKind::AwardedBy => "awarded_by",
            EdgeKind::RelatedTo => "related_to",
            EdgeKind::SharesAddress => "shares_address",
            EdgeKind::SharesPhone => "shares_phone",
        };
        write!(f, "{}", s)
    }
}

/// A graph node: kind discriminant, display label, and the per-kind
/// attributes as fixed optional fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: EntityId,
    pub kind: NodeKind,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    /// Untruncated tender title when the label was shortened for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub procuring_entity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TenderStatus>,
}

impl GraphNode {
    fn bare(id: EntityId, kind: NodeKind, label: String) -> Self {
        Self {
            id,
            kind,
            label,
            address: None,
            phone: None,
            registration_date: None,
            department: None,
            position: None,
            full_title: None,
            procuring_entity: None,
            value: None,
            status: None,
        }
    }

    pub fn company(company: &Company) -> Self {
        let mut node = Self::bare(company.id.clone(), NodeKind::Company, company.name.clone());
        node.address = Some(company.address.clone());
        node.phone = Some(company.phone.clone());
        node.registration_date = Some(company.registration_date);
        node
    }

    pub fn director(director: &Director) -> Self {
        Self::bare(director.id.clone(), NodeKind::Director, director.name.clone())
    }

    pub fn official(official: &PublicOfficial) -> Self {
        let mut node = Self::bare(official.id.clone(), NodeKind::Official, official.name.clone());
        node.department = Some(official.department.clone());
        node.position = Some(official.position.clone());
        node
    }

    pub fn tender(tender: &Tender) -> Self {
        let label = if tender.title.chars().count() > LABEL_MAX_CHARS {
            let short: String = tender.title.chars().take(LABEL_MAX_CHARS).collect();
            format!("{}...", short)
        } else {
            tender.title.clone()
        };
        let mut node = Self::bare(tender.id.clone(), NodeKind::Tender, label);
        node.full_title = Some(tender.title.clone());
        node.procuring_entity = Some(tender.procuring_entity.clone());
        node.value = Some(tender.estimated_value);
        node.status = Some(tender.status);
        node
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub kind: EdgeKind,
    pub suspicious: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<RelationshipKind>,
}

impl GraphEdge {
    pub fn new(kind: EdgeKind) -> Self {
        Self {
            kind,
            suspicious: kind.is_suspicious(),
            amount: None,
            relation: None,
        }
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_relation(mut self, relation: RelationshipKind) -> Self {
        self.relation = Some(relation);
        self
    }
}

/// The undirected, multi-typed relationship graph over one dataset snapshot.
/// Wraps a petgraph graph with an id index so callers address nodes by the
/// entity ids they already hold.
#[derive(Debug, Clone, Default)]
pub struct TenderGraph {
    graph: UnGraph<GraphNode, GraphEdge>,
    index: HashMap<EntityId, NodeIndex>,
}

impl TenderGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, replacing the attributes of an existing node with the
    /// same id.
    pub fn add_node(&mut self, node: GraphNode) -> NodeIndex {
        if let Some(&idx) = self.index.get(&node.id) {
            self.graph[idx] = node;
            return idx;
        }
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.index.insert(id, idx);
        idx
    }

    /// Add an edge between two existing nodes. Returns false (and adds
    /// nothing) when either endpoint id is unknown.
    pub fn add_edge(&mut self, from: &str, to: &str, edge: GraphEdge) -> bool {
        match (self.index.get(from), self.index.get(to)) {
            (Some(&a), Some(&b)) => {
                self.graph.add_edge(a, b, edge);
                true
            }
            _ => false,
        }
    }

    /// Add or replace the single bid edge for a (company, tender) pair. A
    /// later bid by the same company on the same tender supersedes the
    /// earlier edge, keeping one BidOn-or-Won edge per pair.
    pub fn upsert_bid_edge(&mut self, company: &str, tender: &str, edge: GraphEdge) -> bool {
        let (a, b) = match (self.index.get(company), self.index.get(tender)) {
            (Some(&a), Some(&b)) => (a, b),
            _ => return false,
        };
        let existing = self
            .graph
            .edges(a)
            .find(|e| {
                (e.source() == b || e.target() == b)
                    && matches!(e.weight().kind, EdgeKind::BidOn | EdgeKind::Won)
            })
            .map(|e| e.id());
        match existing {
            Some(edge_idx) => self.graph[edge_idx] = edge,
            None => {
                self.graph.add_edge(a, b, edge);
            }
        }
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.index.get(id).map(|&idx| &self.graph[idx])
    }

    /// Display label for a node, falling back to the raw id.
    pub fn label_of<'a>(&'a self, id: &'a str) -> &'a str {
        self.node(id).map(|n| n.label.as_str()).unwrap_or(id)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Ids of all nodes adjacent to `id` over any edge type.
    pub fn neighbors(&self, id: &str) -> Vec<&EntityId> {
        match self.index.get(id) {
            Some(&idx) => self
                .graph
                .neighbors(idx)
                .map(|n| &self.graph[n].id)
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.graph.node_weights()
    }

    /// Edges as (source node, target node, edge) triples, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&GraphNode, &GraphNode, &GraphEdge)> {
        self.graph
            .edge_references()
            .map(move |e| (&self.graph[e.source()], &self.graph[e.target()], e.weight()))
    }

    /// Edges incident to one node.
    pub fn edges_of(&self, id: &str) -> Vec<(&GraphNode, &GraphEdge)> {
        match self.index.get(id) {
            Some(&idx) => self
                .graph
                .edges(idx)
                .map(|e| {
                    let other = if e.source() == idx { e.target() } else { e.source() };
                    (&self.graph[other], e.weight())
                })
                .collect(),
            None => Vec::new(),
        }
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    pub(crate) fn inner(&self) -> &UnGraph<GraphNode, GraphEdge> {
        &self.graph
    }
}
