use super::case::CaseStatus;
use super::wire::optional_date;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One dated entry in a case's history. Never mutated after it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Update {
    pub id: String,
    pub case_id: String,
    pub date: NaiveDate,
    pub action_taken: String,
    pub current_position: String,
    pub status: CaseStatus,
    #[serde(default)]
    pub suit_number: String,
    #[serde(default, with = "optional_date")]
    pub adjournment_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl Update {
    /// True when the adjournment date falls in `[from, to]`.
    #[must_use]
    pub fn adjourns_between(&self, from: NaiveDate, to: NaiveDate) -> bool {
        self.adjournment_date
            .is_some_and(|date| date >= from && date <= to)
    }
}

/// The update form as entered, before validation.
///
/// Required fields are optional here so validation can report every missing
/// field at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateDraft {
    pub case_id: String,
    pub date: Option<NaiveDate>,
    pub action_taken: String,
    pub current_position: String,
    pub status: Option<CaseStatus>,
    pub suit_number: String,
    pub adjournment_date: Option<NaiveDate>,
    pub notes: String,
}
