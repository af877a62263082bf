//! `dk stats`: case counts per status.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use clap::Args;
use docket_core::model::CaseStatus;
use docket_core::query::status_counts;
use serde::Serialize;

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};
use crate::project::Project;

/// Arguments for `dk stats`.
#[derive(Args, Debug, Default)]
pub struct StatsArgs {}

#[derive(Debug, Serialize)]
pub struct CaseStats {
    pub total: usize,
    pub by_status: BTreeMap<CaseStatus, usize>,
    pub updates: usize,
}

/// Execute `dk stats`.
///
/// # Errors
///
/// Returns an error if the project cannot be opened or output fails.
pub fn run_stats(_args: &StatsArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let project = Project::open(project_root, output)?;
    let repo = project.docket.repo();

    let stats = CaseStats {
        total: repo.cases().len(),
        by_status: status_counts(repo.cases()),
        updates: repo.updates().len(),
    };

    render_mode(
        output,
        &stats,
        |s, w| {
            for (status, count) in &s.by_status {
                writeln!(w, "{status}\t{count}")?;
            }
            writeln!(w, "total\t{}", s.total)
        },
        |s, w| {
            pretty_section(w, "Cases by status")?;
            for (status, count) in &s.by_status {
                pretty_kv(w, status.as_str(), count.to_string())?;
            }
            writeln!(w)?;
            pretty_kv(w, "Total", s.total.to_string())?;
            pretty_kv(w, "Updates", s.updates.to_string())
        },
    )
}
