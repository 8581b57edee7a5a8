//! Weight aggregation, categorization, and recommendation text.

use tendergraph_core::{RiskCategory, RiskConfig, RiskFactor, RiskFactorKind, RiskScore};

pub const NO_ACTION_ADVICE: &str = "No immediate action required. Routine monitoring recommended.";

const HIGH_ESCALATION: [&str; 2] = [
    "Escalate to Internal Audit for immediate review",
    "Consider freezing payment pending investigation",
];

const ADVICE_SEPARATOR: &str = " • ";

/// The fixed advisory sentence for one factor kind.
pub fn advisory_for(kind: RiskFactorKind) -> &'static str {
    match kind {
        RiskFactorKind::ConflictOfInterest => {
            "Request conflict of interest declarations from all parties"
        }
        RiskFactorKind::CartelPattern => "Review bidding patterns across related tenders",
        RiskFactorKind::ShellCompany => "Verify company credentials and track record",
        RiskFactorKind::PriceAnomaly => "Conduct market price verification",
        RiskFactorKind::RushedTimeline => "Review justification for expedited timeline",
    }
}

pub fn categorize(config: &RiskConfig, overall: u32) -> RiskCategory {
    if overall >= config.thresholds.high_risk_score {
        RiskCategory::High
    } else if overall >= config.thresholds.medium_risk_score {
        RiskCategory::Medium
    } else {
        RiskCategory::Low
    }
}

/// Advisory sentences for the present factor kinds, deduplicated in
/// first-seen order, with escalation appended for HIGH.
pub fn recommend(factors: &[RiskFactor], category: RiskCategory) -> String {
    if category == RiskCategory::Low {
        return NO_ACTION_ADVICE.to_string();
    }

    let mut advisories: Vec<&str> = Vec::new();
    for factor in factors {
        let advice = advisory_for(factor.kind);
        if !advisories.contains(&advice) {
            advisories.push(advice);
        }
    }
    if category == RiskCategory::High {
        advisories.extend(HIGH_ESCALATION);
    }
    advisories.join(ADVICE_SEPARATOR)
}

/// Combine emitted factors into the final score: weight sum capped at 100,
/// category from the configured thresholds, generated recommendation.
pub fn aggregate(config: &RiskConfig, factors: Vec<RiskFactor>) -> RiskScore {
    let total: u32 = factors.iter().map(|f| f.weight).sum();
    let overall = total.min(100);
    let category = categorize(config, overall);
    let recommendation = recommend(&factors, category);
    RiskScore {
        overall,
        category,
        factors,
        recommendation,
    }
}
