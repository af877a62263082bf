//! `dk list`: tracked cases with search and filters.

use crate::output::{OutputMode, pretty_section, render_mode};
use crate::project::{Project, clock};
use clap::Args;
use docket_core::model::{Case, CaseStatus};
use docket_core::query::{CaseQuery, query_cases};
use serde::Serialize;
use std::io::Write;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Search title, suit number, and case number.
    #[arg(short = 'q', long = "query", default_value = "")]
    pub query: String,

    /// Only cases in this status.
    #[arg(short, long)]
    pub status: Option<CaseStatus>,

    /// Only cases with an adjournment within this many days (0 = any).
    #[arg(long = "adjourn-within", value_name = "DAYS", default_value_t = 0)]
    pub adjourn_within: u32,
}

#[derive(Debug, Serialize)]
pub struct CaseRow {
    pub id: String,
    pub case_number: String,
    pub title: String,
    pub status: CaseStatus,
    pub suit_number: String,
    pub category: String,
}

impl From<&Case> for CaseRow {
    fn from(case: &Case) -> Self {
        Self {
            id: case.id.clone(),
            case_number: case.case_number.clone(),
            title: case.title.clone(),
            status: case.status,
            suit_number: case.suit_number.clone(),
            category: case.category.clone(),
        }
    }
}

/// Execute `dk list`.
///
/// # Errors
///
/// Returns an error if the project cannot be opened or output fails.
pub fn run_list(
    args: &ListArgs,
    output: OutputMode,
    project_root: &std::path::Path,
) -> anyhow::Result<()> {
    let project = Project::open(project_root, output)?;
    let repo = project.docket.repo();
    let (_, today) = clock();

    let query = CaseQuery {
        text: args.query.clone(),
        status: args.status,
        adjourn_within_days: args.adjourn_within,
    };
    let rows: Vec<CaseRow> = query_cases(repo.cases(), repo.updates(), &query, today)
        .into_iter()
        .map(CaseRow::from)
        .collect();

    render_mode(
        output,
        &rows,
        |rows, w| {
            for row in rows {
                writeln!(w, "{}\t{}\t{}\t{}", row.case_number, row.status, row.id, row.title)?;
            }
            Ok(())
        },
        |rows, w| {
            pretty_section(w, &format!("Cases ({})", rows.len()))?;
            if rows.is_empty() {
                return writeln!(w, "No cases match.");
            }
            for row in rows {
                let suit = if row.suit_number.is_empty() {
                    "No suit #"
                } else {
                    row.suit_number.as_str()
                };
                writeln!(
                    w,
                    "{:<16} {:<15} {}  [{suit}]",
                    row.case_number,
                    row.status.as_str(),
                    row.title
                )?;
            }
            Ok(())
        },
    )
}
