use crate::{EntityId, RelationshipKind, TenderStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A registered company that can bid on tenders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: EntityId,
    pub name: String,
    pub registration_number: String,
    pub registration_date: NaiveDate,
    pub address: String,
    pub phone: String,
    #[serde(default)]
    pub director_ids: Vec<EntityId>,
}

impl Company {
    /// Whole days between registration and `date`. Negative when the company
    /// was registered after `date`.
    pub fn age_days_at(&self, date: NaiveDate) -> i64 {
        (date - self.registration_date).num_days()
    }
}

/// A company director. Sitting on several boards is the seed of cartel
/// structure, so `company_ids` routinely holds more than one entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Director {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub national_id: Option<String>,
    #[serde(default)]
    pub company_ids: Vec<EntityId>,
}

/// A procurement official, with a map from related-person id to the kind of
/// relationship (family or business).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicOfficial {
    pub id: EntityId,
    pub name: String,
    pub department: String,
    pub position: String,
    #[serde(default)]
    pub related_persons: HashMap<EntityId, RelationshipKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tender {
    pub id: EntityId,
    pub reference_number: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub procuring_entity: String,
    pub category: String,
    pub estimated_value: f64,
    pub published_date: NaiveDate,
    pub deadline: NaiveDate,
    pub status: TenderStatus,
    #[serde(default)]
    pub awarded_to: Option<EntityId>,
    #[serde(default)]
    pub awarded_amount: Option<f64>,
    #[serde(default)]
    pub procurement_officer_id: Option<EntityId>,
}

impl Tender {
    /// Whole days bidders had between publication and the deadline.
    pub fn submission_window_days(&self) -> i64 {
        (self.deadline - self.published_date).num_days()
    }

    pub fn with_award(mut self, company_id: impl Into<EntityId>, amount: f64) -> Self {
        self.awarded_to = Some(company_id.into());
        self.awarded_amount = Some(amount);
        self.status = TenderStatus::Awarded;
        self
    }

    pub fn with_officer(mut self, officer_id: impl Into<EntityId>) -> Self {
        self.procurement_officer_id = Some(officer_id.into());
        self
    }
}

/// A bid submitted by a company on a tender.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bid {
    pub id: EntityId,
    pub tender_id: EntityId,
    pub company_id: EntityId,
    pub amount: f64,
    pub submission_date: DateTime<Utc>,
    #[serde(default)]
    pub technical_score: Option<f64>,
}
