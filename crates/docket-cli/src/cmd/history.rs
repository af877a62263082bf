//! `dk history`: update history of one case.

use crate::output::{OutputMode, pretty_section, render_mode};
use crate::project::Project;
use chrono::NaiveDate;
use clap::Args;
use docket_core::model::user::display_name_for;
use docket_core::model::{CaseStatus, Update};
use docket_core::query::{HistoryQuery, HistorySort, query_history};
use serde::Serialize;
use std::io::Write;

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Case id or case number.
    pub case: String,

    /// Search action taken, notes, and the author's name.
    #[arg(short = 'q', long = "query", default_value = "")]
    pub query: String,

    /// Earliest update date (YYYY-MM-DD).
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Latest update date (YYYY-MM-DD).
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// `newest` or `oldest`.
    #[arg(long, default_value_t = HistorySort::Oldest)]
    pub sort: HistorySort,
}

#[derive(Debug, Serialize)]
pub struct HistoryRow {
    pub id: String,
    pub date: NaiveDate,
    pub action_taken: String,
    pub current_position: String,
    pub status: CaseStatus,
    pub adjournment_date: Option<NaiveDate>,
    pub notes: String,
    pub created_by: String,
}

impl HistoryRow {
    fn new(update: &Update, author: String) -> Self {
        Self {
            id: update.id.clone(),
            date: update.date,
            action_taken: update.action_taken.clone(),
            current_position: update.current_position.clone(),
            status: update.status,
            adjournment_date: update.adjournment_date,
            notes: update.notes.clone(),
            created_by: author,
        }
    }
}

/// Execute `dk history <case>`.
///
/// # Errors
///
/// Returns an error if the case does not exist or output fails.
pub fn run_history(
    args: &HistoryArgs,
    output: OutputMode,
    project_root: &std::path::Path,
) -> anyhow::Result<()> {
    let project = Project::open(project_root, output)?;
    let case_id = project.require_case(&args.case, output)?;
    let repo = project.docket.repo();

    let query = HistoryQuery {
        case_id: Some(case_id),
        text: args.query.clone(),
        from: args.from,
        to: args.to,
        sort: args.sort,
    };
    let rows: Vec<HistoryRow> = query_history(repo.updates(), repo.users(), &query)
        .into_iter()
        .map(|u| HistoryRow::new(u, display_name_for(repo.users(), &u.created_by)))
        .collect();

    render_mode(
        output,
        &rows,
        |rows, w| {
            for r in rows {
                writeln!(
                    w,
                    "{}\t{}\t{}\t{}\t{}",
                    r.date,
                    r.status,
                    r.action_taken,
                    r.current_position,
                    r.adjournment_date.map(|d| d.to_string()).unwrap_or_default()
                )?;
            }
            Ok(())
        },
        |rows, w| {
            pretty_section(w, &format!("History ({}, {})", rows.len(), args.sort))?;
            if rows.is_empty() {
                return writeln!(w, "No updates match.");
            }
            for r in rows {
                writeln!(w, "{}  {:<15} {}", r.date, r.status.as_str(), r.action_taken)?;
                writeln!(w, "            stage: {}", r.current_position)?;
                if let Some(date) = r.adjournment_date {
                    writeln!(w, "            adjourned to: {date}")?;
                }
                if !r.notes.is_empty() {
                    writeln!(w, "            notes: {}", r.notes)?;
                }
                writeln!(w, "            by: {}", r.created_by)?;
            }
            Ok(())
        },
    )
}
