//! Builds the relationship graph for one dataset snapshot.
//!
//! Nodes: companies, directors, officials, tenders. Edges: board seats,
//! declared relationships, officer assignments, bids/awards, and the derived
//! shared-address / shared-phone links between companies.

use std::collections::HashMap;
use tendergraph_core::{Bid, Company, Director, EntityId, PublicOfficial, Tender};
use tracing::{debug, info};

use crate::graph::{EdgeKind, GraphEdge, GraphNode, TenderGraph};
use crate::similarity::{addresses_similar, phones_match};

/// Values of a map in ascending id order. Input maps are unordered; sorting
/// here keeps node and edge insertion order, and everything derived from it
/// (path tie-breaking, view indices), reproducible across runs.
fn sorted_values<'a, T>(map: &'a HashMap<EntityId, T>) -> Vec<&'a T> {
    let mut keys: Vec<&EntityId> = map.keys().collect();
    keys.sort();
    keys.into_iter().map(|k| &map[k]).collect()
}

/// Construct the relationship graph from entity collections. References to
/// ids absent from the corresponding map are skipped silently; inputs are
/// never mutated.
pub fn build_graph(
    companies: &HashMap<EntityId, Company>,
    directors: &HashMap<EntityId, Director>,
    officials: &HashMap<EntityId, PublicOfficial>,
    tenders: &HashMap<EntityId, Tender>,
    bids: &[Bid],
) -> TenderGraph {
    let mut graph = TenderGraph::new();

    let company_list = sorted_values(companies);
    for company in &company_list {
        graph.add_node(GraphNode::company(company));
    }

    for director in sorted_values(directors) {
        graph.add_node(GraphNode::director(director));
        for company_id in &director.company_ids {
            if companies.contains_key(company_id) {
                graph.add_edge(&director.id, company_id, GraphEdge::new(EdgeKind::DirectorOf));
            }
        }
    }

    for official in sorted_values(officials) {
        graph.add_node(GraphNode::official(official));
        let mut related: Vec<_> = official.related_persons.iter().collect();
        related.sort_by_key(|(person_id, _)| person_id.as_str());
        for (person_id, kind) in related {
            if directors.contains_key(person_id) {
                graph.add_edge(
                    &official.id,
                    person_id,
                    GraphEdge::new(EdgeKind::RelatedTo).with_relation(*kind),
                );
            }
        }
    }

    for tender in sorted_values(tenders) {
        graph.add_node(GraphNode::tender(tender));
        if let Some(officer_id) = &tender.procurement_officer_id {
            if officials.contains_key(officer_id) {
                graph.add_edge(&tender.id, officer_id, GraphEdge::new(EdgeKind::AwardedBy));
            }
        }
    }

    for bid in bids {
        let tender = match tenders.get(&bid.tender_id) {
            Some(t) if companies.contains_key(&bid.company_id) => t,
            _ => continue,
        };
        let kind = if tender.awarded_to.as_deref() == Some(bid.company_id.as_str()) {
            EdgeKind::Won
        } else {
            EdgeKind::BidOn
        };
        graph.upsert_bid_edge(
            &bid.company_id,
            &bid.tender_id,
            GraphEdge::new(kind).with_amount(bid.amount),
        );
    }

    let shared = add_shared_company_edges(&mut graph, &company_list);
    debug!(shared_edges = shared, "derived shared address/phone links");

    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        companies = companies.len(),
        tenders = tenders.len(),
        "relationship graph built"
    );
    graph
}

/// Pairwise scan over all companies. O(n²), fine at the target scale of low
/// hundreds; index by normalized plot/phone keys before growing past that.
fn add_shared_company_edges(graph: &mut TenderGraph, companies: &[&Company]) -> usize {
    let mut added = 0;
    for (i, a) in companies.iter().enumerate() {
        for b in &companies[i + 1..] {
            if addresses_similar(&a.address, &b.address) {
                graph.add_edge(&a.id, &b.id, GraphEdge::new(EdgeKind::SharesAddress));
                added += 1;
            }
            if phones_match(&a.phone, &b.phone) {
                graph.add_edge(&a.id, &b.id, GraphEdge::new(EdgeKind::SharesPhone));
                added += 1;
            }
        }
    }
    added
}
