use crate::output::{CliError, OutputMode, pretty_kv, render_mode};
use crate::project::{Project, clock, fail};
use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use docket_core::catalog::{CaseError, CreatedCase, NewCase};
use docket_core::model::CaseStatus;
use std::io::Write;
use std::path::Path;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Office case number, e.g. 2025-LCM-0003. Must be unique.
    #[arg(long = "number", value_name = "CASE_NUMBER", default_value = "")]
    pub case_number: String,

    #[arg(long, default_value = "")]
    pub title: String,

    /// civil, criminal, or family.
    #[arg(long, default_value = "")]
    pub category: String,

    #[arg(long, default_value = "")]
    pub subcategory: String,

    /// Petition date (YYYY-MM-DD).
    #[arg(long = "petition-date", value_name = "DATE")]
    pub petition_date: Option<NaiveDate>,

    #[arg(long, default_value = "")]
    pub description: String,

    #[arg(long = "suit-number", default_value = "")]
    pub suit_number: String,

    /// Initial status (default: pre-litigation).
    #[arg(long)]
    pub status: Option<CaseStatus>,

    /// Who assigned the case (defaults to the current user's name).
    #[arg(long = "assigned-by")]
    pub assigned_by: Option<String>,
}

/// Execute `dk create`.
///
/// # Errors
///
/// Returns an error if the case is invalid, its number is taken, or the
/// store write fails.
pub fn run_create(
    args: &CreateArgs,
    user_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> Result<()> {
    let mut project = Project::open(project_root, output)?;
    let assigned_by = match &args.assigned_by {
        Some(name) => name.clone(),
        None => project.current_user(user_flag, output)?.name,
    };

    let new_case = NewCase {
        case_number: args.case_number.clone(),
        title: args.title.clone(),
        description: args.description.clone(),
        category: args.category.clone(),
        subcategory: args.subcategory.clone(),
        petition_date: args.petition_date,
        suit_number: args.suit_number.clone(),
        assigned_by,
        status: args.status,
    };

    let (now, _) = clock();
    let created = match project.docket.create_case(&new_case, now) {
        Ok(created) => created,
        Err(err) => {
            let details = match &err {
                CaseError::Invalid(errors) => errors.clone(),
                CaseError::DuplicateCaseNumber(_) | CaseError::Store(_) => Vec::new(),
            };
            return fail(
                output,
                &CliError::from_code(err.code(), err.to_string()).with_details(details),
            );
        }
    };

    render_mode(
        output,
        &created,
        |c, w| writeln!(w, "{}\t{}\t{}", c.case.id, c.case.case_number, c.billing),
        render_created_pretty,
    )
}

fn render_created_pretty(created: &CreatedCase, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "✓ Case Created Successfully!")?;
    pretty_kv(w, "Case Number", &created.case.case_number)?;
    pretty_kv(w, "Id", &created.case.id)?;
    pretty_kv(w, "Category", created.case.category.to_uppercase())?;
    pretty_kv(w, "Billing", &created.billing)
}
