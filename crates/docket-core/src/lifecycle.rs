//! Validation and submission of case updates.
//!
//! A submission appends one [`Update`] and carries its status onto the case.
//! The case always takes the status of the most recently *submitted* update,
//! whatever that update's date.

use crate::error::ErrorCode;
use crate::model::{CaseStatus, Update, UpdateDraft, new_id};
use crate::repository::Repository;
use crate::storage::{KvStore, StoreError};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, warn};

pub const MSG_DATE_REQUIRED: &str = "Date of update is required.";
pub const MSG_ACTION_REQUIRED: &str = "Action taken is required.";
pub const MSG_POSITION_REQUIRED: &str = "Current position/stage is required.";
pub const MSG_STATUS_REQUIRED: &str = "Status is required.";
pub const MSG_COMPLETED_FUTURE_ADJOURNMENT: &str =
    "Completed cases cannot have future adjournment dates.";
pub const MSG_ADJOURNMENT_BEFORE_DATE: &str =
    "Adjournment date cannot be earlier than the update date.";
pub const MSG_COMPLETED_ADVISORY: &str = "Cannot set a future adjournment date for a completed status. Clear the adjournment date or change status.";

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("update rejected: {}", .0.join("; "))]
    Invalid(Vec<String>),
    #[error("case '{0}' not found")]
    UnknownCase(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SubmitError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Invalid(_) => ErrorCode::ValidationFailed,
            Self::UnknownCase(_) => ErrorCode::CaseNotFound,
            Self::Store(err) => err.code(),
        }
    }

    /// Validation messages, when the draft was rejected for its content.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        match self {
            Self::Invalid(errors) => errors,
            Self::UnknownCase(_) | Self::Store(_) => &[],
        }
    }
}

/// Check every rule and report all violations, in rule order.
///
/// `today` is a calendar date, so the completed-status rule compares dates
/// with the time of day already dropped.
#[must_use]
pub fn validate(draft: &UpdateDraft, today: NaiveDate) -> Vec<String> {
    let mut errors = Vec::new();

    if draft.date.is_none() {
        errors.push(MSG_DATE_REQUIRED.to_string());
    }
    if draft.action_taken.trim().is_empty() {
        errors.push(MSG_ACTION_REQUIRED.to_string());
    }
    if draft.current_position.trim().is_empty() {
        errors.push(MSG_POSITION_REQUIRED.to_string());
    }
    if draft.status.is_none() {
        errors.push(MSG_STATUS_REQUIRED.to_string());
    }

    if draft.status == Some(CaseStatus::Completed)
        && draft.adjournment_date.is_some_and(|adjourn| adjourn > today)
    {
        errors.push(MSG_COMPLETED_FUTURE_ADJOURNMENT.to_string());
    }

    if let (Some(adjourn), Some(date)) = (draft.adjournment_date, draft.date) {
        if adjourn < date {
            errors.push(MSG_ADJOURNMENT_BEFORE_DATE.to_string());
        }
    }

    errors
}

/// Non-blocking hint shown while the form is being edited. It becomes a
/// hard error only at submit time, and only for future dates.
#[must_use]
pub fn advisory(draft: &UpdateDraft) -> Option<&'static str> {
    (draft.status == Some(CaseStatus::Completed) && draft.adjournment_date.is_some())
        .then_some(MSG_COMPLETED_ADVISORY)
}

/// Validate `draft` and, if it passes, record it against its case.
///
/// Collections are reloaded from storage first. On any error nothing is
/// persisted.
///
/// # Errors
///
/// - [`SubmitError::Invalid`] with every violated rule
/// - [`SubmitError::UnknownCase`] when the draft names no loaded case
/// - [`SubmitError::Store`] when persisting fails
pub fn submit<S: KvStore>(
    repo: &mut Repository<S>,
    draft: &UpdateDraft,
    created_by: &str,
    now: DateTime<Utc>,
) -> Result<Update, SubmitError> {
    repo.reload();

    let errors = validate(draft, now.date_naive());
    if !errors.is_empty() {
        warn!(case_id = %draft.case_id, errors = errors.len(), "update rejected");
        return Err(SubmitError::Invalid(errors));
    }
    if repo.case(&draft.case_id).is_none() {
        return Err(SubmitError::UnknownCase(draft.case_id.clone()));
    }

    let (Some(date), Some(status)) = (draft.date, draft.status) else {
        return Err(SubmitError::Invalid(vec![MSG_DATE_REQUIRED.to_string()]));
    };

    let update = Update {
        id: new_id("upd"),
        case_id: draft.case_id.clone(),
        date,
        action_taken: draft.action_taken.trim().to_string(),
        current_position: draft.current_position.trim().to_string(),
        status,
        suit_number: draft.suit_number.trim().to_string(),
        adjournment_date: draft.adjournment_date,
        notes: draft.notes.trim().to_string(),
        created_by: created_by.to_string(),
        created_at: now,
    };

    repo.record_update(update.clone())?;
    info!(
        update_id = %update.id,
        case_id = %update.case_id,
        status = %update.status,
        "update saved"
    );
    Ok(update)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn valid_draft() -> UpdateDraft {
        UpdateDraft {
            case_id: "case-001".into(),
            date: Some(day(2025, 9, 1)),
            action_taken: "Filed motion".into(),
            current_position: "Motion filed".into(),
            status: Some(CaseStatus::Ongoing),
            suit_number: String::new(),
            adjournment_date: Some(day(2025, 9, 15)),
            notes: String::new(),
        }
    }

    #[test]
    fn valid_draft_has_no_errors() {
        assert!(validate(&valid_draft(), day(2025, 9, 1)).is_empty());
    }

    #[test]
    fn empty_draft_reports_every_required_field() {
        let errors = validate(&UpdateDraft::default(), day(2025, 9, 1));
        assert_eq!(
            errors,
            vec![
                MSG_DATE_REQUIRED,
                MSG_ACTION_REQUIRED,
                MSG_POSITION_REQUIRED,
                MSG_STATUS_REQUIRED
            ]
        );
    }

    #[test]
    fn whitespace_only_text_counts_as_missing() {
        let draft = UpdateDraft {
            action_taken: "   ".into(),
            current_position: "\t".into(),
            ..valid_draft()
        };
        let errors = validate(&draft, day(2025, 9, 1));
        assert_eq!(errors, vec![MSG_ACTION_REQUIRED, MSG_POSITION_REQUIRED]);
    }

    #[test]
    fn completed_with_future_adjournment_is_rejected() {
        let today = day(2025, 9, 1);
        let draft = UpdateDraft {
            status: Some(CaseStatus::Completed),
            adjournment_date: Some(day(2025, 9, 6)),
            ..valid_draft()
        };
        assert_eq!(validate(&draft, today), vec![MSG_COMPLETED_FUTURE_ADJOURNMENT]);
    }

    #[test]
    fn completed_with_adjournment_today_is_allowed() {
        let today = day(2025, 9, 1);
        let draft = UpdateDraft {
            status: Some(CaseStatus::Completed),
            adjournment_date: Some(today),
            ..valid_draft()
        };
        assert!(validate(&draft, today).is_empty());
        assert_eq!(advisory(&draft), Some(MSG_COMPLETED_ADVISORY));
    }

    #[test]
    fn adjournment_before_update_date_is_rejected() {
        let draft = UpdateDraft {
            date: Some(day(2025, 9, 10)),
            adjournment_date: Some(day(2025, 9, 9)),
            ..valid_draft()
        };
        assert_eq!(validate(&draft, day(2025, 9, 1)), vec![MSG_ADJOURNMENT_BEFORE_DATE]);
    }

    #[test]
    fn both_date_rules_can_fire_together() {
        let draft = UpdateDraft {
            date: Some(day(2025, 9, 20)),
            status: Some(CaseStatus::Completed),
            adjournment_date: Some(day(2025, 9, 10)),
            ..valid_draft()
        };
        assert_eq!(
            validate(&draft, day(2025, 9, 1)),
            vec![MSG_COMPLETED_FUTURE_ADJOURNMENT, MSG_ADJOURNMENT_BEFORE_DATE]
        );
    }

    #[test]
    fn advisory_is_silent_without_adjournment_or_completion() {
        assert_eq!(advisory(&valid_draft()), None);
        let completed = UpdateDraft {
            status: Some(CaseStatus::Completed),
            adjournment_date: None,
            ..valid_draft()
        };
        assert_eq!(advisory(&completed), None);
    }

    #[test]
    fn submit_error_codes() {
        assert_eq!(
            SubmitError::Invalid(vec![]).code(),
            ErrorCode::ValidationFailed
        );
        assert_eq!(
            SubmitError::UnknownCase("x".into()).code(),
            ErrorCode::CaseNotFound
        );
        assert_eq!(
            SubmitError::Invalid(vec!["a".into(), "b".into()]).to_string(),
            "update rejected: a; b"
        );
    }
}
