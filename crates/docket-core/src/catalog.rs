//! Case categories and intake of new cases.

use crate::error::ErrorCode;
use crate::model::case::normalize;
use crate::model::{Case, CaseStatus, new_id};
use crate::repository::Repository;
use crate::storage::{KvStore, StoreError};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    pub key: &'static str,
    pub name: &'static str,
    pub subcategories: &'static [&'static str],
    /// Billing rate in whole dollars.
    pub rate: u32,
}

pub const CATEGORIES: [Category; 3] = [
    Category {
        key: "civil",
        name: "Civil",
        subcategories: &["Contract Dispute", "Property", "Employment", "Debt Recovery"],
        rate: 500,
    },
    Category {
        key: "criminal",
        name: "Criminal",
        subcategories: &["Theft", "Fraud", "Assault", "Murder"],
        rate: 800,
    },
    Category {
        key: "family",
        name: "Family",
        subcategories: &["Divorce", "Custody", "Adoption", "Inheritance"],
        rate: 600,
    },
];

impl Category {
    /// Canonical subcategory name for `input`, matched loosely
    /// (`debt_recovery`, `Debt Recovery`, `debt-recovery`).
    #[must_use]
    pub fn subcategory(&self, input: &str) -> Option<&'static str> {
        let wanted = normalize(input);
        self.subcategories
            .iter()
            .copied()
            .find(|sub| normalize(sub) == wanted)
    }

    /// Rate as shown on intake, e.g. `$500.00`.
    #[must_use]
    pub fn billing_label(&self) -> String {
        format!("${}.00", self.rate)
    }
}

/// Look a category up by key or display name, ignoring case.
#[must_use]
pub fn category(input: &str) -> Option<&'static Category> {
    let wanted = normalize(input);
    CATEGORIES.iter().find(|c| c.key == wanted)
}

pub const MSG_CASE_NUMBER_REQUIRED: &str = "Case number is required.";
pub const MSG_TITLE_REQUIRED: &str = "Case title is required.";
pub const MSG_PETITION_DATE_REQUIRED: &str = "Petition date is required.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCase {
    pub case_number: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub subcategory: String,
    pub petition_date: Option<NaiveDate>,
    pub suit_number: String,
    pub assigned_by: String,
    pub status: Option<CaseStatus>,
}

#[derive(Debug, thiserror::Error)]
pub enum CaseError {
    #[error("case rejected: {}", .0.join("; "))]
    Invalid(Vec<String>),
    #[error("case number '{0}' is already tracked")]
    DuplicateCaseNumber(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CaseError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Invalid(_) => ErrorCode::ValidationFailed,
            Self::DuplicateCaseNumber(_) => ErrorCode::DuplicateCaseNumber,
            Self::Store(err) => err.code(),
        }
    }
}

/// Field-level problems with `new_case`, all reported together.
#[must_use]
pub fn validate_new_case(new_case: &NewCase) -> Vec<String> {
    let mut errors = Vec::new();
    if new_case.case_number.trim().is_empty() {
        errors.push(MSG_CASE_NUMBER_REQUIRED.to_string());
    }
    if new_case.title.trim().is_empty() {
        errors.push(MSG_TITLE_REQUIRED.to_string());
    }
    match category(&new_case.category) {
        None => errors.push(format!("Unknown category '{}'.", new_case.category.trim())),
        Some(cat) => {
            let sub = new_case.subcategory.trim();
            if !sub.is_empty() && cat.subcategory(sub).is_none() {
                errors.push(format!("'{sub}' is not a {} sub-category.", cat.name));
            }
        }
    }
    if new_case.petition_date.is_none() {
        errors.push(MSG_PETITION_DATE_REQUIRED.to_string());
    }
    errors
}

/// A case accepted at intake, with its category billing rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedCase {
    pub case: Case,
    pub billing: String,
}

/// Validate `new_case`, then append it to the case collection.
///
/// # Errors
///
/// - [`CaseError::Invalid`] with every field problem
/// - [`CaseError::DuplicateCaseNumber`] when the number is already used
/// - [`CaseError::Store`] when persisting fails
pub fn create_case<S: KvStore>(
    repo: &mut Repository<S>,
    new_case: &NewCase,
    now: DateTime<Utc>,
) -> Result<CreatedCase, CaseError> {
    repo.reload();

    let errors = validate_new_case(new_case);
    let (Some(cat), Some(petition_date), true) =
        (category(&new_case.category), new_case.petition_date, errors.is_empty())
    else {
        warn!(case_number = %new_case.case_number, errors = errors.len(), "case rejected");
        return Err(CaseError::Invalid(errors));
    };

    let case_number = new_case.case_number.trim();
    if repo
        .cases()
        .iter()
        .any(|c| c.case_number.eq_ignore_ascii_case(case_number))
    {
        return Err(CaseError::DuplicateCaseNumber(case_number.to_string()));
    }

    let case = Case {
        id: new_id("case"),
        case_number: case_number.to_string(),
        title: new_case.title.trim().to_string(),
        description: new_case.description.trim().to_string(),
        category: cat.name.to_string(),
        subcategory: cat
            .subcategory(&new_case.subcategory)
            .unwrap_or_default()
            .to_string(),
        petition_date,
        suit_number: new_case.suit_number.trim().to_string(),
        assigned_by: new_case.assigned_by.trim().to_string(),
        status: new_case.status.unwrap_or(CaseStatus::PreLitigation),
        created_at: now,
    };

    repo.insert_case(case.clone())?;
    info!(case_id = %case.id, category = cat.key, "case created");
    Ok(CreatedCase {
        case,
        billing: cat.billing_label(),
    })
}
