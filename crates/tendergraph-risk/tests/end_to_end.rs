//! Full-pipeline scenarios: entities in, graph and clusters built, tenders
//! scored with explainable factors out.

use chrono::{NaiveDate, TimeZone, Utc};
use std::collections::HashMap;
use tendergraph_core::{
    Bid, Company, Director, EntityId, PublicOfficial, RelationshipKind, RiskCategory, RiskConfig,
    RiskFactorKind, Tender, TenderGraphError, TenderStatus,
};
use tendergraph_graph::{build_graph, find_cartel_clusters};
use tendergraph_risk::{RiskEngine, Snapshot};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn company(id: &str, name: &str, registered: NaiveDate, directors: &[&str]) -> Company {
    // distinct plot and phone per id so no accidental shared-address or
    // shared-phone edges appear in these scenarios
    let n: String = id.chars().filter(char::is_ascii_digit).collect();
    Company {
        id: id.into(),
        name: name.into(),
        registration_number: format!("REG-{}", id),
        registration_date: registered,
        address: format!("Plot {}0, Nairobi", n),
        phone: format!("+254 700 000 11{}", n),
        director_ids: directors.iter().map(|d| d.to_string()).collect(),
    }
}

fn tender(id: &str, published: NaiveDate, deadline: NaiveDate, estimated: f64) -> Tender {
    Tender {
        id: id.into(),
        reference_number: format!("TN/2024/{}", id),
        title: format!("Tender {}", id),
        description: String::new(),
        procuring_entity: "Ministry of Health".into(),
        category: "Medical Supplies".into(),
        estimated_value: estimated,
        published_date: published,
        deadline,
        status: TenderStatus::Open,
        awarded_to: None,
        awarded_amount: None,
        procurement_officer_id: None,
    }
}

fn bid(id: &str, tender_id: &str, company_id: &str, amount: f64) -> Bid {
    Bid {
        id: id.into(),
        tender_id: tender_id.into(),
        company_id: company_id.into(),
        amount,
        submission_date: Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
        technical_score: None,
    }
}

fn to_map<T: Clone>(items: &[(&str, T)]) -> HashMap<EntityId, T> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn fresh_company_on_a_rushed_tender_scores_medium() {
    // registered 4 days before the deadline, published 5 days before it,
    // awarded exactly at estimate
    let deadline = date(2024, 6, 20);
    let winner = company("C1", "Quickfire Traders", date(2024, 6, 16), &[]);
    let t = tender("T1", date(2024, 6, 15), deadline, 78_000_000.0).with_award("C1", 78_000_000.0);

    let companies = to_map(&[("C1", winner)]);
    let tenders = to_map(&[("T1", t)]);
    let directors = HashMap::new();
    let officials = HashMap::new();
    let bids = vec![bid("B1", "T1", "C1", 78_000_000.0)];

    let graph = build_graph(&companies, &directors, &officials, &tenders, &bids);
    let clusters = find_cartel_clusters(&bids, 3);
    let engine = RiskEngine::default();
    let score = engine.compute_risk_score(
        &tenders["T1"],
        &companies,
        &directors,
        &officials,
        &bids,
        &graph,
        &clusters,
        &tenders,
    );

    assert_eq!(score.overall, 30);
    assert_eq!(score.category, RiskCategory::Medium);

    let shell = score.factor(RiskFactorKind::ShellCompany).unwrap();
    assert_eq!(shell.weight, 20);
    let timeline = score.factor(RiskFactorKind::RushedTimeline).unwrap();
    assert_eq!(timeline.weight, 10);
    assert!(!score.has_factor(RiskFactorKind::PriceAnomaly));

    assert!(score.recommendation.contains("Verify company credentials"));
    assert!(score
        .recommendation
        .contains("Review justification for expedited timeline"));

    // factor order follows rule order
    assert_eq!(score.factors[0].kind, RiskFactorKind::ShellCompany);
    assert_eq!(score.factors[1].kind, RiskFactorKind::RushedTimeline);
}

#[test]
fn directors_sibling_relationship_is_a_direct_conflict() {
    let winner = company("C1", "Savanna Works", date(2015, 3, 1), &["D1"]);
    let t = tender("T1", date(2024, 5, 1), date(2024, 5, 22), 10_000_000.0)
        .with_award("C1", 11_000_000.0)
        .with_officer("O1");

    let companies = to_map(&[("C1", winner)]);
    let directors = to_map(&[(
        "D1",
        Director {
            id: "D1".into(),
            name: "Grace Wanjiru".into(),
            national_id: Some("1234567".into()),
            company_ids: vec!["C1".into()],
        },
    )]);
    let mut related = HashMap::new();
    related.insert("D1".to_string(), RelationshipKind::Sibling);
    let officials = to_map(&[(
        "O1",
        PublicOfficial {
            id: "O1".into(),
            name: "Peter Otieno".into(),
            department: "Supply Chain".into(),
            position: "Procurement Officer".into(),
            related_persons: related,
        },
    )]);
    let tenders = to_map(&[("T1", t)]);
    let bids = vec![bid("B1", "T1", "C1", 11_000_000.0)];

    let graph = build_graph(&companies, &directors, &officials, &tenders, &bids);
    let engine = RiskEngine::default();
    let score = engine.compute_risk_score(
        &tenders["T1"],
        &companies,
        &directors,
        &officials,
        &bids,
        &graph,
        &[],
        &tenders,
    );

    let conflict = score.factor(RiskFactorKind::ConflictOfInterest).unwrap();
    assert_eq!(conflict.weight, 30);
    assert!(conflict.description.contains("Grace Wanjiru"));
    assert!(conflict.description.contains("sibling"));
    assert!(conflict.description.contains("Peter Otieno"));
    assert!(conflict.related_entity_ids.contains(&"D1".to_string()));
    assert!(conflict.related_entity_ids.contains(&"O1".to_string()));
    assert!(conflict.related_entity_ids.contains(&"C1".to_string()));
}

#[test]
fn winning_bid_creates_a_short_indirect_path_to_the_officer() {
    // no declared relationship: the connection is C1 -won- T1 -awarded_by- O1
    let winner = company("C1", "Savanna Works", date(2015, 3, 1), &[]);
    let t = tender("T1", date(2024, 5, 1), date(2024, 5, 22), 10_000_000.0)
        .with_award("C1", 11_000_000.0)
        .with_officer("O1");

    let companies = to_map(&[("C1", winner)]);
    let officials = to_map(&[(
        "O1",
        PublicOfficial {
            id: "O1".into(),
            name: "Peter Otieno".into(),
            department: "Supply Chain".into(),
            position: "Procurement Officer".into(),
            related_persons: HashMap::new(),
        },
    )]);
    let tenders = to_map(&[("T1", t)]);
    let directors = HashMap::new();
    let bids = vec![bid("B1", "T1", "C1", 11_000_000.0)];

    let graph = build_graph(&companies, &directors, &officials, &tenders, &bids);
    let engine = RiskEngine::default();
    let score = engine.compute_risk_score(
        &tenders["T1"],
        &companies,
        &directors,
        &officials,
        &bids,
        &graph,
        &[],
        &tenders,
    );

    let conflict = score.factor(RiskFactorKind::ConflictOfInterest).unwrap();
    assert_eq!(conflict.weight, 20);
    assert!(conflict
        .evidence
        .iter()
        .any(|line| line == "Path length: 2 connections"));
}

#[test]
fn distant_connections_do_not_count_as_conflicts() {
    // the officer's tender was awarded to C1, but C1 never bid, so the only
    // route is a 4-hop chain through shared plots and boards
    let mut c1 = company("C1", "Savanna Works", date(2015, 3, 1), &[]);
    c1.address = "Plot 45, Mombasa Road".into();
    let mut c2 = company("C2", "Rift Logistics", date(2016, 1, 1), &[]);
    c2.address = "Plot 45B, Industrial Area".into();
    c2.phone = "0711 222 333".into();
    let mut c3 = company("C3", "Baobab Holdings", date(2017, 1, 1), &["D1"]);
    c3.address = "Plot 99, Thika Road".into();
    c3.phone = "(0711) 222-333".into();

    let companies = to_map(&[("C1", c1), ("C2", c2), ("C3", c3)]);
    let directors = to_map(&[(
        "D1",
        Director {
            id: "D1".into(),
            name: "Grace Wanjiru".into(),
            national_id: None,
            company_ids: vec!["C3".into()],
        },
    )]);
    let mut related = HashMap::new();
    related.insert("D1".to_string(), RelationshipKind::BusinessPartner);
    let officials = to_map(&[(
        "O1",
        PublicOfficial {
            id: "O1".into(),
            name: "Peter Otieno".into(),
            department: "Supply Chain".into(),
            position: "Procurement Officer".into(),
            related_persons: related,
        },
    )]);
    let t = tender("T1", date(2024, 5, 1), date(2024, 5, 22), 10_000_000.0)
        .with_award("C1", 11_000_000.0)
        .with_officer("O1");
    let tenders = to_map(&[("T1", t)]);
    let bids = vec![]; // C1 never bid, so no Won shortcut exists

    let graph = build_graph(&companies, &directors, &officials, &tenders, &bids);
    // sanity: C1 - C2 (address) - C3 (phone) - D1 - O1 is four hops
    let path = tendergraph_graph::shortest_path(&graph, "C1", "O1").unwrap();
    assert_eq!(path.len(), 5);

    let engine = RiskEngine::default();
    let score = engine.compute_risk_score(
        &tenders["T1"],
        &companies,
        &directors,
        &officials,
        &bids,
        &graph,
        &[],
        &tenders,
    );
    assert!(!score.has_factor(RiskFactorKind::ConflictOfInterest));
}

#[test]
fn all_five_rules_firing_caps_the_score_at_one_hundred() {
    let deadline = date(2024, 6, 20);
    let winner = company("C1", "Quickfire Traders", date(2024, 6, 1), &["D1"]);
    let c2 = company("C2", "Rift Logistics", date(2018, 1, 1), &[]);
    let c3 = company("C3", "Baobab Holdings", date(2018, 1, 1), &[]);
    let companies = to_map(&[("C1", winner), ("C2", c2), ("C3", c3)]);

    let directors = to_map(&[(
        "D1",
        Director {
            id: "D1".into(),
            name: "Grace Wanjiru".into(),
            national_id: None,
            company_ids: vec!["C1".into()],
        },
    )]);
    let mut related = HashMap::new();
    related.insert("D1".to_string(), RelationshipKind::Spouse);
    let officials = to_map(&[(
        "O1",
        PublicOfficial {
            id: "O1".into(),
            name: "Peter Otieno".into(),
            department: "Supply Chain".into(),
            position: "Procurement Officer".into(),
            related_persons: related,
        },
    )]);

    // T1 is rushed, overpriced, awarded to the fresh company, and bid on by
    // the full cartel; T2..T4 build the co-bid history
    let main = tender("T1", date(2024, 6, 16), deadline, 10_000_000.0)
        .with_award("C1", 20_000_000.0)
        .with_officer("O1");
    let mut tenders = to_map(&[("T1", main)]);
    let mut bids = Vec::new();
    for (i, tid) in ["T2", "T3"].iter().enumerate() {
        tenders.insert(
            tid.to_string(),
            tender(tid, date(2024, 1, 1), date(2024, 1, 30), 9_000_000.0),
        );
        for cid in ["C1", "C2", "C3"] {
            bids.push(bid(&format!("B{}-{}", i, cid), tid, cid, 9_500_000.0));
        }
    }
    for cid in ["C1", "C2", "C3"] {
        bids.push(bid(&format!("BT1-{}", cid), "T1", cid, 19_000_000.0));
    }

    let graph = build_graph(&companies, &directors, &officials, &tenders, &bids);
    let clusters = find_cartel_clusters(&bids, 3);
    assert_eq!(clusters.len(), 1);

    let engine = RiskEngine::default();
    let score = engine.compute_risk_score(
        &tenders["T1"],
        &companies,
        &directors,
        &officials,
        &bids,
        &graph,
        &clusters,
        &tenders,
    );

    assert_eq!(score.factors.len(), 5);
    assert_eq!(score.overall, 100);
    assert_eq!(score.category, RiskCategory::High);
    assert!(score
        .recommendation
        .contains("Escalate to Internal Audit for immediate review"));
    assert!(score
        .recommendation
        .contains("Consider freezing payment pending investigation"));
}

#[test]
fn snapshot_scores_match_the_engine_and_reject_unknown_ids() {
    let deadline = date(2024, 6, 20);
    let winner = company("C1", "Quickfire Traders", date(2024, 6, 16), &[]);
    let t = tender("T1", date(2024, 6, 15), deadline, 78_000_000.0).with_award("C1", 78_000_000.0);
    let companies = to_map(&[("C1", winner)]);
    let tenders = to_map(&[("T1", t)]);
    let bids = vec![bid("B1", "T1", "C1", 78_000_000.0)];

    let snapshot = Snapshot::build(
        RiskConfig::default(),
        companies.clone(),
        HashMap::new(),
        HashMap::new(),
        tenders.clone(),
        bids.clone(),
    );

    let direct = snapshot.score("T1").unwrap();
    assert_eq!(direct.overall, 30);
    assert_eq!(direct.category, RiskCategory::Medium);

    let err = snapshot.score("T-unknown").unwrap_err();
    assert!(matches!(err, TenderGraphError::TenderNotFound(ref id) if id == "T-unknown"));

    assert!(snapshot.company("C1").is_ok());
    assert!(matches!(
        snapshot.company("C-unknown"),
        Err(TenderGraphError::CompanyNotFound(_))
    ));
}

#[test]
fn parallel_scoring_agrees_with_per_tender_scoring() {
    // a spread of tenders: clean, rushed, overpriced, cartel-bid
    let companies = to_map(&[
        ("C1", company("C1", "Savanna Works", date(2024, 5, 1), &[])),
        ("C2", company("C2", "Rift Logistics", date(2018, 1, 1), &[])),
        ("C3", company("C3", "Baobab Holdings", date(2017, 1, 1), &[])),
    ]);
    let directors = HashMap::new();
    let officials = HashMap::new();

    let mut tenders: HashMap<EntityId, Tender> = HashMap::new();
    tenders.insert(
        "T1".into(),
        tender("T1", date(2024, 5, 10), date(2024, 5, 14), 5_000_000.0)
            .with_award("C1", 9_000_000.0),
    );
    tenders.insert(
        "T2".into(),
        tender("T2", date(2024, 2, 1), date(2024, 3, 1), 7_000_000.0),
    );
    let mut bids = Vec::new();
    for (i, tid) in ["T1", "T2", "T3", "T4"].iter().enumerate() {
        if i >= 2 {
            tenders.insert(
                tid.to_string(),
                tender(tid, date(2024, 1, 1), date(2024, 1, 25), 6_000_000.0),
            );
        }
        for cid in ["C1", "C2", "C3"] {
            bids.push(bid(&format!("B{}-{}", i, cid), tid, cid, 6_200_000.0));
        }
    }

    let graph = build_graph(&companies, &directors, &officials, &tenders, &bids);
    let engine = RiskEngine::default();
    let all = engine.compute_all_risk_scores(&tenders, &companies, &directors, &officials, &bids, &graph);
    assert_eq!(all.len(), tenders.len());

    let clusters = find_cartel_clusters(&bids, 3);
    for (id, tender) in &tenders {
        let single = engine.compute_risk_score(
            tender, &companies, &directors, &officials, &bids, &graph, &clusters, &tenders,
        );
        let parallel = &all[id];
        assert_eq!(parallel.overall, single.overall, "tender {}", id);
        assert_eq!(parallel.category, single.category);
        assert_eq!(parallel.factors.len(), single.factors.len());
        assert_eq!(parallel.recommendation, single.recommendation);
    }

    // every overall stays within bounds and equals its capped factor sum
    for score in all.values() {
        let sum: u32 = score.factors.iter().map(|f| f.weight).sum();
        assert_eq!(score.overall, sum.min(100));
        assert!(score.overall <= 100);
    }
}
