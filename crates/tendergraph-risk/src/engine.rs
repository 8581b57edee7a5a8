//! Snapshot-level evaluation.
//!
//! The graph and cartel clusters are built once per dataset snapshot and then
//! only read; each tender's score is a pure function of that shared state, so
//! scoring all tenders fans out across worker threads with no locking.

use std::collections::{BTreeSet, HashMap};

use rayon::prelude::*;
use tendergraph_core::{
    Bid, Company, Director, EntityId, PublicOfficial, Result, RiskConfig, RiskFactor, RiskScore,
    Tender, TenderGraphError,
};
use tendergraph_graph::{build_graph, find_cartel_clusters_with, TenderGraph};
use tracing::{debug, info};

use crate::rules;
use crate::score;

/// Evaluates tenders against the five rules under one configuration.
#[derive(Debug, Clone, Default)]
pub struct RiskEngine {
    config: RiskConfig,
}

impl RiskEngine {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Score one tender against shared snapshot state.
    #[allow(clippy::too_many_arguments)]
    pub fn compute_risk_score(
        &self,
        tender: &Tender,
        companies: &HashMap<EntityId, Company>,
        directors: &HashMap<EntityId, Director>,
        officials: &HashMap<EntityId, PublicOfficial>,
        bids: &[Bid],
        graph: &TenderGraph,
        clusters: &[BTreeSet<EntityId>],
        all_tenders: &HashMap<EntityId, Tender>,
    ) -> RiskScore {
        let winner = tender
            .awarded_to
            .as_ref()
            .and_then(|id| companies.get(id));

        let factors: Vec<RiskFactor> = [
            rules::check_conflict_of_interest(
                &self.config,
                tender,
                winner,
                directors,
                officials,
                graph,
            ),
            rules::check_cartel_pattern(&self.config, tender, bids, companies, clusters),
            rules::check_shell_company(&self.config, tender, winner),
            rules::check_price_anomaly(&self.config, tender, all_tenders),
            rules::check_rushed_timeline(&self.config, tender),
        ]
        .into_iter()
        .flatten()
        .collect();

        debug!(tender = %tender.id, factors = factors.len(), "rules evaluated");
        score::aggregate(&self.config, factors)
    }

    /// Score every tender. Clusters are derived once from the bid history and
    /// shared across the parallel fan-out; the result map is keyed by tender
    /// id, so evaluation order never shows in the output.
    pub fn compute_all_risk_scores(
        &self,
        tenders: &HashMap<EntityId, Tender>,
        companies: &HashMap<EntityId, Company>,
        directors: &HashMap<EntityId, Director>,
        officials: &HashMap<EntityId, PublicOfficial>,
        bids: &[Bid],
        graph: &TenderGraph,
    ) -> HashMap<EntityId, RiskScore> {
        let clusters = find_cartel_clusters_with(
            bids,
            self.config.thresholds.min_co_bids,
            self.config.thresholds.min_cartel_size,
        );
        let scores: HashMap<EntityId, RiskScore> = tenders
            .par_iter()
            .map(|(id, tender)| {
                (
                    id.clone(),
                    self.compute_risk_score(
                        tender, companies, directors, officials, bids, graph, &clusters, tenders,
                    ),
                )
            })
            .collect();
        info!(tenders = tenders.len(), clusters = clusters.len(), "snapshot scored");
        scores
    }
}

/// One dataset snapshot: the entity collections plus the graph and cartel
/// clusters derived from them, built together so readers never observe a
/// half-rebuilt state. Callers swap whole snapshots on recomputation.
#[derive(Debug, Clone)]
pub struct Snapshot {
    companies: HashMap<EntityId, Company>,
    directors: HashMap<EntityId, Director>,
    officials: HashMap<EntityId, PublicOfficial>,
    tenders: HashMap<EntityId, Tender>,
    bids: Vec<Bid>,
    graph: TenderGraph,
    clusters: Vec<BTreeSet<EntityId>>,
    engine: RiskEngine,
}

impl Snapshot {
    pub fn build(
        config: RiskConfig,
        companies: HashMap<EntityId, Company>,
        directors: HashMap<EntityId, Director>,
        officials: HashMap<EntityId, PublicOfficial>,
        tenders: HashMap<EntityId, Tender>,
        bids: Vec<Bid>,
    ) -> Self {
        let graph = build_graph(&companies, &directors, &officials, &tenders, &bids);
        let clusters = find_cartel_clusters_with(
            &bids,
            config.thresholds.min_co_bids,
            config.thresholds.min_cartel_size,
        );
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            clusters = clusters.len(),
            "snapshot built"
        );
        Self {
            companies,
            directors,
            officials,
            tenders,
            bids,
            graph,
            clusters,
            engine: RiskEngine::new(config),
        }
    }

    pub fn graph(&self) -> &TenderGraph {
        &self.graph
    }

    pub fn clusters(&self) -> &[BTreeSet<EntityId>] {
        &self.clusters
    }

    pub fn tenders(&self) -> &HashMap<EntityId, Tender> {
        &self.tenders
    }

    pub fn company(&self, id: &str) -> Result<&Company> {
        self.companies
            .get(id)
            .ok_or_else(|| TenderGraphError::CompanyNotFound(id.to_string()))
    }

    /// Score one tender by id. Unknown ids are the caller's error to surface.
    pub fn score(&self, tender_id: &str) -> Result<RiskScore> {
        let tender = self
            .tenders
            .get(tender_id)
            .ok_or_else(|| TenderGraphError::TenderNotFound(tender_id.to_string()))?;
        Ok(self.engine.compute_risk_score(
            tender,
            &self.companies,
            &self.directors,
            &self.officials,
            &self.bids,
            &self.graph,
            &self.clusters,
            &self.tenders,
        ))
    }

    /// Score every tender in the snapshot, reusing the prebuilt clusters.
    pub fn score_all(&self) -> HashMap<EntityId, RiskScore> {
        self.tenders
            .par_iter()
            .map(|(id, tender)| {
                (
                    id.clone(),
                    self.engine.compute_risk_score(
                        tender,
                        &self.companies,
                        &self.directors,
                        &self.officials,
                        &self.bids,
                        &self.graph,
                        &self.clusters,
                        &self.tenders,
                    ),
                )
            })
            .collect()
    }
}
