//! The five detection rules.
//!
//! Each check is pure and independent: it reads the immutable snapshot state
//! plus one tender and returns at most one factor of its kind. A missing
//! optional field (no award, no officer, no amount) means the rule simply
//! contributes nothing; there is no error path here.

use std::collections::{BTreeSet, HashMap};

use tendergraph_core::{
    Bid, Company, Director, EntityId, PublicOfficial, RiskConfig, RiskFactor, RiskFactorKind,
    Tender, TenderStatus,
};
use tendergraph_graph::{shortest_path, TenderGraph};

/// Conflict of interest between the winning vendor and the procurement
/// officer. A declared relationship to one of the winner's directors scores
/// full weight; a short indirect graph path scores reduced weight.
pub fn check_conflict_of_interest(
    config: &RiskConfig,
    tender: &Tender,
    winner: Option<&Company>,
    directors: &HashMap<EntityId, Director>,
    officials: &HashMap<EntityId, PublicOfficial>,
    graph: &TenderGraph,
) -> Option<RiskFactor> {
    let winner = winner?;
    let officer_id = tender.procurement_officer_id.as_ref()?;
    let official = officials.get(officer_id)?;

    for director_id in &winner.director_ids {
        if let Some(relationship) = official.related_persons.get(director_id) {
            let director_name = directors.get(director_id).map(|d| d.name.as_str());
            return Some(RiskFactor {
                kind: RiskFactorKind::ConflictOfInterest,
                description: format!(
                    "Winning vendor's director {} is {} of Procurement Officer {}",
                    director_name.unwrap_or("Unknown"),
                    relationship.describe(),
                    official.name
                ),
                weight: config.weights.conflict_of_interest,
                evidence: vec![
                    format!("Director: {}", director_name.unwrap_or(director_id)),
                    format!("Official: {} ({})", official.name, official.position),
                    format!("Relationship: {}", relationship),
                    format!("Department: {}", official.department),
                ],
                related_entity_ids: vec![
                    director_id.clone(),
                    official.id.clone(),
                    winner.id.clone(),
                ],
            });
        }
    }

    let path = shortest_path(graph, &winner.id, officer_id)?;
    if path.len() > config.thresholds.max_indirect_hops + 1 {
        return None;
    }
    let labels: Vec<&str> = path.iter().map(|id| graph.label_of(id)).collect();
    Some(RiskFactor {
        kind: RiskFactorKind::ConflictOfInterest,
        description: "Connection path found between winner and procurement officer".to_string(),
        weight: config.weights.conflict_indirect,
        evidence: vec![
            format!("Path: {}", labels.join(" → ")),
            format!("Path length: {} connections", path.len() - 1),
        ],
        related_entity_ids: path,
    })
}

/// Enough members of one cartel candidate showing up as bidders on the same
/// tender. The first qualifying cluster wins; clusters are not merged.
pub fn check_cartel_pattern(
    config: &RiskConfig,
    tender: &Tender,
    bids: &[Bid],
    companies: &HashMap<EntityId, Company>,
    clusters: &[BTreeSet<EntityId>],
) -> Option<RiskFactor> {
    let bidders: BTreeSet<&str> = bids
        .iter()
        .filter(|b| b.tender_id == tender.id)
        .map(|b| b.company_id.as_str())
        .collect();

    for cluster in clusters {
        let overlap: Vec<&EntityId> = cluster
            .iter()
            .filter(|id| bidders.contains(id.as_str()))
            .collect();
        if overlap.len() < config.thresholds.min_cartel_overlap {
            continue;
        }
        let names: Vec<&str> = overlap
            .iter()
            .filter_map(|id| companies.get(*id).map(|c| c.name.as_str()))
            .collect();
        return Some(RiskFactor {
            kind: RiskFactorKind::CartelPattern,
            description: format!(
                "Suspected bidding cartel: {} companies that consistently bid together are present in this tender",
                overlap.len()
            ),
            weight: config.weights.cartel_pattern,
            evidence: vec![
                format!("Cartel members in this tender: {}", names.join(", ")),
                format!("Total cartel size: {} companies", cluster.len()),
                "Pattern: These companies consistently bid on the same tenders".to_string(),
            ],
            related_entity_ids: overlap.into_iter().cloned().collect(),
        });
    }
    None
}

/// A winner registered shortly before the deadline. Under 30 days is severe;
/// under 90 still notable at half weight.
pub fn check_shell_company(
    config: &RiskConfig,
    tender: &Tender,
    winner: Option<&Company>,
) -> Option<RiskFactor> {
    let winner = winner?;
    let age_days = winner.age_days_at(tender.deadline);
    let thresholds = &config.thresholds;
    if age_days >= thresholds.shell_notable_age_days {
        return None;
    }

    let severe = age_days < thresholds.shell_severe_age_days;
    let weight = if severe {
        config.weights.shell_company
    } else {
        config.weights.shell_company / 2
    };
    let mut evidence = vec![
        format!("Company: {}", winner.name),
        format!("Registration date: {}", winner.registration_date),
        format!("Tender deadline: {}", tender.deadline),
        format!("Company age at deadline: {} days", age_days),
    ];
    if severe {
        if let Some(amount) = tender.awarded_amount {
            evidence.push(format!("Contract value: KES {}", format_kes(amount)));
        }
    }
    Some(RiskFactor {
        kind: RiskFactorKind::ShellCompany,
        description: format!(
            "Winning company registered only {} days before tender deadline",
            age_days
        ),
        weight,
        evidence,
        related_entity_ids: vec![winner.id.clone()],
    })
}

/// Award amount well above the estimate. The category-average line is
/// informational context only; it never changes the weight.
pub fn check_price_anomaly(
    config: &RiskConfig,
    tender: &Tender,
    all_tenders: &HashMap<EntityId, Tender>,
) -> Option<RiskFactor> {
    let awarded = tender.awarded_amount?;
    if tender.estimated_value <= 0.0 {
        return None;
    }
    let ratio = awarded / tender.estimated_value;
    if ratio <= config.thresholds.price_ratio {
        return None;
    }
    let percentage = ((ratio - 1.0) * 100.0).floor() as i64;

    let comparable: Vec<f64> = all_tenders
        .values()
        .filter(|t| {
            t.id != tender.id && t.category == tender.category && t.status == TenderStatus::Awarded
        })
        .filter_map(|t| t.awarded_amount)
        .collect();

    let mut evidence = vec![
        format!("Awarded amount: KES {}", format_kes(awarded)),
        format!("Estimated value: KES {}", format_kes(tender.estimated_value)),
        format!("Deviation: {}% above estimate", percentage),
    ];
    if !comparable.is_empty() {
        let average = comparable.iter().sum::<f64>() / comparable.len() as f64;
        evidence.push(format!("Category average: KES {}", format_kes(average)));
    }

    Some(RiskFactor {
        kind: RiskFactorKind::PriceAnomaly,
        description: format!("Contract awarded at {}% above estimated value", percentage),
        weight: config.weights.price_anomaly,
        evidence,
        related_entity_ids: vec![tender.id.clone()],
    })
}

/// Unusually short submission window. Five days or fewer is severe; up to
/// seven still short at half weight.
pub fn check_rushed_timeline(config: &RiskConfig, tender: &Tender) -> Option<RiskFactor> {
    let window = tender.submission_window_days();
    let thresholds = &config.thresholds;
    if window > thresholds.timeline_short_days {
        return None;
    }

    let (description, weight, standard_note) = if window <= thresholds.timeline_severe_days {
        (
            format!("Tender had only {}-day submission window", window),
            config.weights.rushed_timeline,
            true,
        )
    } else {
        (
            format!("Tender had short {}-day submission window", window),
            config.weights.rushed_timeline / 2,
            false,
        )
    };

    let mut evidence = vec![
        format!("Published: {}", tender.published_date),
        format!("Deadline: {}", tender.deadline),
        format!("Window: {} days", window),
    ];
    if standard_note {
        evidence.push("Standard window should be 14-21 days for competitive bidding".to_string());
    }

    Some(RiskFactor {
        kind: RiskFactorKind::RushedTimeline,
        description,
        weight,
        evidence,
        related_entity_ids: vec![tender.id.clone()],
    })
}

/// Group an amount with thousands separators, no decimals.
fn format_kes(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
