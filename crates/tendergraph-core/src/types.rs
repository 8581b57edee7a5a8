use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Entity identifiers are assigned by the data layer and treated as opaque.
pub type EntityId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskCategory {
    High,
    Medium,
    Low,
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskCategory::High => "HIGH",
            RiskCategory::Medium => "MEDIUM",
            RiskCategory::Low => "LOW",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TenderStatus {
    Open,
    Evaluation,
    Awarded,
    Cancelled,
}

impl fmt::Display for TenderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TenderStatus::Open => "OPEN",
            TenderStatus::Evaluation => "EVALUATION",
            TenderStatus::Awarded => "AWARDED",
            TenderStatus::Cancelled => "CANCELLED",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskFactorKind {
    ConflictOfInterest,
    CartelPattern,
    ShellCompany,
    PriceAnomaly,
    RushedTimeline,
}

impl fmt::Display for RiskFactorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskFactorKind::ConflictOfInterest => "CONFLICT_OF_INTEREST",
            RiskFactorKind::CartelPattern => "CARTEL_PATTERN",
            RiskFactorKind::ShellCompany => "SHELL_COMPANY",
            RiskFactorKind::PriceAnomaly => "PRICE_ANOMALY",
            RiskFactorKind::RushedTimeline => "RUSHED_TIMELINE",
        };
        write!(f, "{}", s)
    }
}

/// How a person in an official's relation map is connected to the official.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipKind {
    Sibling,
    Spouse,
    ParentChild,
    BusinessPartner,
}

impl RelationshipKind {
    /// Lowercase human-readable form used inside descriptions
    /// ("parent child", not "PARENT_CHILD").
    pub fn describe(&self) -> &'static str {
        match self {
            RelationshipKind::Sibling => "sibling",
            RelationshipKind::Spouse => "spouse",
            RelationshipKind::ParentChild => "parent child",
            RelationshipKind::BusinessPartner => "business partner",
        }
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RelationshipKind::Sibling => "SIBLING",
            RelationshipKind::Spouse => "SPOUSE",
            RelationshipKind::ParentChild => "PARENT_CHILD",
            RelationshipKind::BusinessPartner => "BUSINESS_PARTNER",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for RelationshipKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SIBLING" => Ok(RelationshipKind::Sibling),
            "SPOUSE" => Ok(RelationshipKind::Spouse),
            "PARENT_CHILD" => Ok(RelationshipKind::ParentChild),
            "BUSINESS_PARTNER" => Ok(RelationshipKind::BusinessPartner),
            other => Err(format!("unknown relationship kind: {}", other)),
        }
    }
}
