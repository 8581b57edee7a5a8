use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Weights each rule contributes to the overall score when it fires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleWeights {
    #[serde(default = "RuleWeights::default_conflict_of_interest")]
    pub conflict_of_interest: u32,
    /// Reduced weight when the winner-official connection is only an
    /// indirect graph path, not a declared relationship.
    #[serde(default = "RuleWeights::default_conflict_indirect")]
    pub conflict_indirect: u32,
    #[serde(default = "RuleWeights::default_cartel_pattern")]
    pub cartel_pattern: u32,
    #[serde(default = "RuleWeights::default_shell_company")]
    pub shell_company: u32,
    #[serde(default = "RuleWeights::default_price_anomaly")]
    pub price_anomaly: u32,
    #[serde(default = "RuleWeights::default_rushed_timeline")]
    pub rushed_timeline: u32,
}

impl RuleWeights {
    fn default_conflict_of_interest() -> u32 {
        30
    }
    fn default_conflict_indirect() -> u32 {
        20
    }
    fn default_cartel_pattern() -> u32 {
        25
    }
    fn default_shell_company() -> u32 {
        20
    }
    fn default_price_anomaly() -> u32 {
        15
    }
    fn default_rushed_timeline() -> u32 {
        10
    }
}

impl Default for RuleWeights {
    fn default() -> Self {
        Self {
            conflict_of_interest: Self::default_conflict_of_interest(),
            conflict_indirect: Self::default_conflict_indirect(),
            cartel_pattern: Self::default_cartel_pattern(),
            shell_company: Self::default_shell_company(),
            price_anomaly: Self::default_price_anomaly(),
            rushed_timeline: Self::default_rushed_timeline(),
        }
    }
}

/// Rule thresholds. Defaults are the calibrated production values; overriding
/// them changes which findings fire, not how they are explained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleThresholds {
    /// Company age (days at deadline) below which the shell check fires at
    /// full weight.
    #[serde(default = "RuleThresholds::default_shell_severe_age_days")]
    pub shell_severe_age_days: i64,
    /// Company age below which the shell check fires at half weight.
    #[serde(default = "RuleThresholds::default_shell_notable_age_days")]
    pub shell_notable_age_days: i64,
    /// Awarded/estimated ratio above which the price check fires.
    #[serde(default = "RuleThresholds::default_price_ratio")]
    pub price_ratio: f64,
    /// Submission window (days) at or below which the timeline check fires
    /// at full weight.
    #[serde(default = "RuleThresholds::default_timeline_severe_days")]
    pub timeline_severe_days: i64,
    /// Submission window at or below which the timeline check fires at half
    /// weight.
    #[serde(default = "RuleThresholds::default_timeline_short_days")]
    pub timeline_short_days: i64,
    /// Minimum shared-tender appearances before a company pair enters the
    /// co-bid graph.
    #[serde(default = "RuleThresholds::default_min_co_bids")]
    pub min_co_bids: u32,
    /// Minimum connected-component size reported as a cartel candidate.
    #[serde(default = "RuleThresholds::default_min_cartel_size")]
    pub min_cartel_size: usize,
    /// Minimum cartel members bidding on one tender before the cartel check
    /// fires.
    #[serde(default = "RuleThresholds::default_min_cartel_overlap")]
    pub min_cartel_overlap: usize,
    /// Maximum hops for an indirect winner-official connection.
    #[serde(default = "RuleThresholds::default_max_indirect_hops")]
    pub max_indirect_hops: usize,
    /// Overall score at or above which a tender is HIGH risk.
    #[serde(default = "RuleThresholds::default_high_risk_score")]
    pub high_risk_score: u32,
    /// Overall score at or above which a tender is MEDIUM risk.
    #[serde(default = "RuleThresholds::default_medium_risk_score")]
    pub medium_risk_score: u32,
}

impl RuleThresholds {
    fn default_shell_severe_age_days() -> i64 {
        30
    }
    fn default_shell_notable_age_days() -> i64 {
        90
    }
    fn default_price_ratio() -> f64 {
        1.5
    }
    fn default_timeline_severe_days() -> i64 {
        5
    }
    fn default_timeline_short_days() -> i64 {
        7
    }
    fn default_min_co_bids() -> u32 {
        3
    }
    fn default_min_cartel_size() -> usize {
        3
    }
    fn default_min_cartel_overlap() -> usize {
        3
    }
    fn default_max_indirect_hops() -> usize {
        3
    }
    fn default_high_risk_score() -> u32 {
        50
    }
    fn default_medium_risk_score() -> u32 {
        25
    }
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            shell_severe_age_days: Self::default_shell_severe_age_days(),
            shell_notable_age_days: Self::default_shell_notable_age_days(),
            price_ratio: Self::default_price_ratio(),
            timeline_severe_days: Self::default_timeline_severe_days(),
            timeline_short_days: Self::default_timeline_short_days(),
            min_co_bids: Self::default_min_co_bids(),
            min_cartel_size: Self::default_min_cartel_size(),
            min_cartel_overlap: Self::default_min_cartel_overlap(),
            max_indirect_hops: Self::default_max_indirect_hops(),
            high_risk_score: Self::default_high_risk_score(),
            medium_risk_score: Self::default_medium_risk_score(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RiskConfig {
    #[serde(default)]
    pub weights: RuleWeights,
    #[serde(default)]
    pub thresholds: RuleThresholds,
}

impl RiskConfig {
    /// Load configuration from a TOML file. Missing keys fall back to
    /// defaults, so a partial file is valid.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading risk config from {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("parsing risk config from {}", path.display()))?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "risk config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.thresholds.medium_risk_score > self.thresholds.high_risk_score {
            anyhow::bail!(
                "medium_risk_score ({}) must not exceed high_risk_score ({})",
                self.thresholds.medium_risk_score,
                self.thresholds.high_risk_score
            );
        }
        if self.thresholds.shell_severe_age_days > self.thresholds.shell_notable_age_days {
            anyhow::bail!(
                "shell_severe_age_days ({}) must not exceed shell_notable_age_days ({})",
                self.thresholds.shell_severe_age_days,
                self.thresholds.shell_notable_age_days
            );
        }
        Ok(())
    }
}
