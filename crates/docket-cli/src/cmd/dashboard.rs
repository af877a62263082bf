//! `dk dashboard`: every case with its latest update and next hearing.

use crate::output::{OutputMode, pretty_rule, pretty_section, render_mode};
use crate::project::{Project, clock};
use clap::Args;
use docket_core::query::{DashboardRow, DashboardSort, ImminentAlert, dashboard_rows, imminent_alerts};
use serde::Serialize;
use std::io::Write;

#[derive(Args, Debug)]
pub struct DashboardArgs {
    /// adjournment, category, update, or status.
    #[arg(long, default_value = "adjournment")]
    pub sort: DashboardSort,
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub sort: DashboardSort,
    pub rows: Vec<DashboardRow>,
    pub alerts: Vec<ImminentAlert>,
}

fn date_cell(date: Option<chrono::NaiveDate>) -> String {
    date.map_or_else(|| "-".to_string(), |d| d.to_string())
}

/// Execute `dk dashboard`.
///
/// # Errors
///
/// Returns an error if the project cannot be opened or output fails.
pub fn run_dashboard(
    args: &DashboardArgs,
    output: OutputMode,
    project_root: &std::path::Path,
) -> anyhow::Result<()> {
    let project = Project::open(project_root, output)?;
    let repo = project.docket.repo();
    let (_, today) = clock();

    let rows = dashboard_rows(repo.cases(), repo.updates(), today, args.sort);
    let alerts = imminent_alerts(&rows, today, project.config.reminders.imminent_days);
    let dashboard = Dashboard {
        sort: args.sort,
        rows,
        alerts,
    };

    render_mode(
        output,
        &dashboard,
        |d, w| {
            for row in &d.rows {
                writeln!(
                    w,
                    "{}\t{}\t{}\t{}\t{}",
                    row.case_number,
                    row.category,
                    row.status,
                    date_cell(row.last_update),
                    date_cell(row.next_adjournment)
                )?;
            }
            Ok(())
        },
        |d, w| {
            pretty_section(w, &format!("Dashboard (by {})", d.sort))?;
            writeln!(
                w,
                "{:<16} {:<10} {:<15} {:<12} {:<12} TITLE",
                "CASE", "CATEGORY", "STATUS", "LAST UPDATE", "NEXT HEARING"
            )?;
            for row in &d.rows {
                writeln!(
                    w,
                    "{:<16} {:<10} {:<15} {:<12} {:<12} {}",
                    row.case_number,
                    row.category,
                    row.status.as_str(),
                    date_cell(row.last_update),
                    date_cell(row.next_adjournment),
                    row.title
                )?;
            }
            if !d.alerts.is_empty() {
                writeln!(w)?;
                pretty_rule(w)?;
                writeln!(w, "⚠ Upcoming adjournments:")?;
                for alert in &d.alerts {
                    writeln!(w, "  {alert}")?;
                }
            }
            Ok(())
        },
    )
}
