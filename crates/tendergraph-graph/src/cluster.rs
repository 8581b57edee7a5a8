//! Coordinated-bidding detection.
//!
//! Companies that keep appearing as bidders on the same tenders form the
//! co-bid graph; its connected components are the cartel candidates. This is
//! purely frequency based; shared addresses or phones never feed into it.

use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};
use tendergraph_core::{Bid, EntityId};
use tracing::debug;

/// Minimum shared-tender appearances before a company pair is linked.
pub const DEFAULT_MIN_CO_BIDS: u32 = 3;

/// Minimum component size reported as a cartel candidate.
pub const DEFAULT_MIN_CARTEL_SIZE: usize = 3;

/// Cartel candidates from the full bid history at the default component size.
pub fn find_cartel_clusters(bids: &[Bid], min_co_bids: u32) -> Vec<BTreeSet<EntityId>> {
    find_cartel_clusters_with(bids, min_co_bids, DEFAULT_MIN_CARTEL_SIZE)
}

/// Cartel candidates with an explicit minimum component size.
///
/// Counts, per unordered company pair, how many tenders both bid on; pairs at
/// or above `min_co_bids` become weighted edges of an auxiliary graph whose
/// connected components of at least `min_cartel_size` members are returned.
/// Components come back sorted by their first member, members sorted within.
pub fn find_cartel_clusters_with(
    bids: &[Bid],
    min_co_bids: u32,
    min_cartel_size: usize,
) -> Vec<BTreeSet<EntityId>> {
    let mut tender_bidders: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for bid in bids {
        tender_bidders
            .entry(bid.tender_id.as_str())
            .or_default()
            .insert(bid.company_id.as_str());
    }

    let mut pair_counts: BTreeMap<(&str, &str), u32> = BTreeMap::new();
    for bidders in tender_bidders.values() {
        let list: Vec<&str> = bidders.iter().copied().collect();
        for (i, a) in list.iter().enumerate() {
            for b in &list[i + 1..] {
                // BTreeSet iteration keeps a < b, so the pair key is canonical
                *pair_counts.entry((a, b)).or_insert(0) += 1;
            }
        }
    }

    let mut co_bid: UnGraph<&str, u32> = UnGraph::new_undirected();
    let mut indices: BTreeMap<&str, NodeIndex> = BTreeMap::new();
    for ((a, b), count) in &pair_counts {
        if *count < min_co_bids {
            continue;
        }
        let ia = *indices.entry(a).or_insert_with(|| co_bid.add_node(a));
        let ib = *indices.entry(b).or_insert_with(|| co_bid.add_node(b));
        co_bid.add_edge(ia, ib, *count);
    }

    let mut seen: HashSet<NodeIndex> = HashSet::new();
    let mut clusters = Vec::new();
    for start in co_bid.node_indices() {
        if seen.contains(&start) {
            continue;
        }
        let mut component = BTreeSet::new();
        let mut queue = VecDeque::from([start]);
        seen.insert(start);
        while let Some(node) = queue.pop_front() {
            component.insert(co_bid[node].to_string());
            for neighbor in co_bid.neighbors(node) {
                if seen.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }
        if component.len() >= min_cartel_size {
            clusters.push(component);
        }
    }
    clusters.sort_by(|a, b| a.iter().next().cmp(&b.iter().next()));

    debug!(
        pairs = pair_counts.len(),
        linked = co_bid.edge_count(),
        clusters = clusters.len(),
        "co-bid clustering complete"
    );
    clusters
}
