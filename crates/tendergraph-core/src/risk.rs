use crate::{EntityId, RiskCategory, RiskFactorKind};
use serde::{Deserialize, Serialize};

/// One weighted, evidenced finding from a single detection rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskFactor {
    pub kind: RiskFactorKind,
    pub description: String,
    /// Contribution to the overall score.
    pub weight: u32,
    #[serde(default)]
    pub evidence: Vec<String>,
    #[serde(default)]
    pub related_entity_ids: Vec<EntityId>,
}

/// The capped, categorized sum of a tender's risk factors plus a generated
/// recommendation. Computed fresh per evaluation; a recomputation replaces it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskScore {
    /// Always in `[0, 100]`.
    pub overall: u32,
    pub category: RiskCategory,
    #[serde(default)]
    pub factors: Vec<RiskFactor>,
    pub recommendation: String,
}

impl RiskScore {
    pub fn factor(&self, kind: RiskFactorKind) -> Option<&RiskFactor> {
        self.factors.iter().find(|f| f.kind == kind)
    }

    pub fn has_factor(&self, kind: RiskFactorKind) -> bool {
        self.factor(kind).is_some()
    }
}
