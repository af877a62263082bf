//! Default data written on first use so a new store is never blank.

use crate::model::{Case, CaseStatus, Role, Update, User};
use crate::storage::{CASES_KEY, KvStore, StoreError, Storage, UPDATES_KEY, USERS_KEY};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

/// Which collections [`ensure_seeded`] had to populate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct SeedReport {
    pub users: bool,
    pub cases: bool,
    pub updates: bool,
}

impl SeedReport {
    #[must_use]
    pub const fn any(self) -> bool {
        self.users || self.cases || self.updates
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

#[must_use]
pub fn default_users() -> Vec<User> {
    vec![
        User {
            id: "u_admin".into(),
            name: "Admin User".into(),
            role: Role::Admin,
        },
        User {
            id: "u_lawyer".into(),
            name: "Lawyer Jane".into(),
            role: Role::Lawyer,
        },
        User {
            id: "u_paralegal".into(),
            name: "Paralegal Tim".into(),
            role: Role::Paralegal,
        },
    ]
}

#[must_use]
pub fn default_cases(now: DateTime<Utc>) -> Vec<Case> {
    vec![
        Case {
            id: "case-001".into(),
            case_number: "2025-LCM-0001".into(),
            title: "Acme vs Smith - Contract Dispute".into(),
            description: "Contract dispute over service level agreement.".into(),
            category: "Civil".into(),
            subcategory: "Contract Dispute".into(),
            petition_date: date(2025, 7, 1),
            suit_number: "HCT/CON/2025/45".into(),
            assigned_by: "Lawyer Jane".into(),
            status: CaseStatus::Ongoing,
            created_at: now,
        },
        Case {
            id: "case-002".into(),
            case_number: "2025-LCM-0002".into(),
            title: "State vs Doe - Theft".into(),
            description: "Criminal allegation of theft.".into(),
            category: "Criminal".into(),
            subcategory: "Theft".into(),
            petition_date: date(2025, 8, 12),
            suit_number: "MCS/CR/2025/99".into(),
            assigned_by: "Lawyer Jane".into(),
            status: CaseStatus::Court,
            created_at: now,
        },
    ]
}

#[must_use]
pub fn default_updates(now: DateTime<Utc>) -> Vec<Update> {
    vec![
        Update {
            id: "upd-001".into(),
            case_id: "case-001".into(),
            date: date(2025, 7, 2),
            action_taken: "Initial client meeting and intake forms completed".into(),
            current_position: "Intake".into(),
            status: CaseStatus::PreLitigation,
            suit_number: String::new(),
            adjournment_date: None,
            notes: "Client provided initial documents.".into(),
            created_by: "u_paralegal".into(),
            created_at: now,
        },
        Update {
            id: "upd-002".into(),
            case_id: "case-002".into(),
            date: date(2025, 8, 20),
            action_taken: "First arraignment".into(),
            current_position: "Arraignment".into(),
            status: CaseStatus::Ongoing,
            suit_number: "MCS/CR/2025/99".into(),
            adjournment_date: Some(date(2025, 9, 10)),
            notes: "Bail set".into(),
            created_by: "u_lawyer".into(),
            created_at: now,
        },
    ]
}

/// Populate each absent collection with its default set.
///
/// A collection that is present, even as an empty list or with records that
/// no longer decode, is never touched. Only a missing key, malformed JSON, or
/// a stored `null` is replaced.
///
/// # Errors
///
/// Returns an error if writing a seeded collection fails.
pub fn ensure_seeded<S: KvStore>(
    storage: &mut Storage<S>,
    now: DateTime<Utc>,
) -> Result<SeedReport, StoreError> {
    let mut report = SeedReport::default();

    if storage.is_vacant(USERS_KEY) {
        storage.set(USERS_KEY, &default_users())?;
        report.users = true;
    }
    if storage.is_vacant(CASES_KEY) {
        storage.set(CASES_KEY, &default_cases(now))?;
        report.cases = true;
    }
    if storage.is_vacant(UPDATES_KEY) {
        storage.set(UPDATES_KEY, &default_updates(now))?;
        report.updates = true;
    }

    if report.any() {
        info!(
            users = report.users,
            cases = report.cases,
            updates = report.updates,
            "seeded default collections"
        );
    }
    Ok(report)
}
