use crate::output::{CliError, OutputMode, render};
use crate::project::{Project, fail};
use anyhow::{Context as _, Result};
use clap::Args;
use docket_core::DataExport;
use docket_core::error::ErrorCode;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// JSON document as written by `dk export`.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}

#[derive(Debug, Serialize)]
struct ImportSummary {
    cases: Option<usize>,
    updates: Option<usize>,
    users: Option<usize>,
}

/// Overwrite every collection present in the document; absent ones are kept.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or the store
/// write fails.
pub fn run_import(args: &ImportArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let mut project = Project::open(project_root, output)?;

    let content = std::fs::read_to_string(&args.path)
        .with_context(|| format!("failed to read {}", args.path.display()))?;
    let data: DataExport = match serde_json::from_str(&content) {
        Ok(data) => data,
        Err(err) => {
            return fail(
                output,
                &CliError::from_code(
                    ErrorCode::ValidationFailed,
                    format!("{} is not a docket export: {err}", args.path.display()),
                ),
            );
        }
    };

    project.docket.repo_mut().import_data(&data)?;

    let summary = ImportSummary {
        cases: data.cases.as_ref().map(Vec::len),
        updates: data.updates.as_ref().map(Vec::len),
        users: data.users.as_ref().map(Vec::len),
    };
    render(output, &summary, |s, w| {
        let count = |n: Option<usize>| n.map_or_else(|| "kept".to_string(), |n| n.to_string());
        writeln!(
            w,
            "✓ Imported cases: {}, updates: {}, users: {}",
            count(s.cases),
            count(s.updates),
            count(s.users)
        )
    })
}
