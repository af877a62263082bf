//! `dk update`: record a dated status update against a case.
//!
//! The new update's status becomes the case's status, whatever its date.

use crate::cmd::reminders::{TerminalSink, write_notices};
use crate::output::{CliError, OutputMode, pretty_kv, render, render_success};
use crate::project::{Project, clock, fail};
use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use docket_core::lifecycle::{self, SubmitError};
use docket_core::model::{CaseStatus, Update, UpdateDraft};
use docket_core::reminder::ReminderNotice;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::debug;

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Case id or case number.
    pub case: String,

    /// Date of the update (YYYY-MM-DD).
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// What was done.
    #[arg(long = "action", default_value = "")]
    pub action_taken: String,

    /// Current position or stage.
    #[arg(long = "position", default_value = "")]
    pub current_position: String,

    /// New case status.
    #[arg(long)]
    pub status: Option<CaseStatus>,

    /// Suit number; a blank value leaves the case's suit number alone.
    #[arg(long = "suit-number", default_value = "")]
    pub suit_number: String,

    /// Next adjournment date (YYYY-MM-DD).
    #[arg(long = "adjourn", value_name = "DATE")]
    pub adjournment_date: Option<NaiveDate>,

    #[arg(long, default_value = "")]
    pub notes: String,

    /// Validate only; nothing is saved.
    #[arg(long)]
    pub check: bool,

    /// Refuse notification permission for the post-save reminder scan.
    #[arg(long = "no-notify")]
    pub no_notify: bool,
}

impl UpdateArgs {
    fn draft(&self, case_id: String) -> UpdateDraft {
        UpdateDraft {
            case_id,
            date: self.date,
            action_taken: self.action_taken.clone(),
            current_position: self.current_position.clone(),
            status: self.status,
            suit_number: self.suit_number.clone(),
            adjournment_date: self.adjournment_date,
            notes: self.notes.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SavedUpdate {
    message: &'static str,
    update: Update,
    reminders: Vec<ReminderNotice>,
}

/// Execute `dk update <case>`.
///
/// # Errors
///
/// Returns an error if the case is unknown, the draft fails validation, or
/// the store write fails.
pub fn run_update(
    args: &UpdateArgs,
    user_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> Result<()> {
    let mut project = Project::open(project_root, output)?;
    let user = project.current_user(user_flag, output)?;
    let case_id = project.require_case(&args.case, output)?;
    let case_id = match project.docket.open_update_form(&case_id) {
        Ok(id) => id,
        Err(err) => return fail(output, &CliError::from_code(err.code(), err.to_string())),
    };

    let draft = args.draft(case_id);
    if let Some(advice) = lifecycle::advisory(&draft) {
        if !output.is_json() {
            eprintln!("warning: {advice}");
        }
    }

    let (now, today) = clock();
    if args.check {
        let errors = lifecycle::validate(&draft, today);
        if errors.is_empty() {
            return render_success(output, "Draft is valid");
        }
        return fail(output, &rejected(&SubmitError::Invalid(errors)));
    }

    let mut sink = TerminalSink::new(!args.no_notify);
    if let Err(err) = project.docket.enable_reminders(&mut sink) {
        debug!(error = %err, "post-save reminder scan disabled");
    }

    match project.docket.submit_update(&draft, &user.id, now, &mut sink) {
        Ok(update) => {
            let saved = SavedUpdate {
                message: "Update saved",
                update,
                reminders: sink.notices,
            };
            render(output, &saved, |s, w| {
                writeln!(w, "✓ {}", s.message)?;
                pretty_kv(w, "Id", &s.update.id)?;
                pretty_kv(w, "Status", s.update.status.as_str())?;
                if let Some(date) = s.update.adjournment_date {
                    pretty_kv(w, "Adjourned to", date.to_string())?;
                }
                write_notices(w, &s.reminders)
            })
        }
        Err(err) => fail(output, &rejected(&err)),
    }
}

fn rejected(err: &SubmitError) -> CliError {
    let message = match err {
        SubmitError::Invalid(_) => "update rejected".to_string(),
        SubmitError::UnknownCase(_) | SubmitError::Store(_) => err.to_string(),
    };
    CliError::from_code(err.code(), message).with_details(err.messages().to_vec())
}
