use crate::output::OutputMode;
use crate::project::Project;
use anyhow::{Context as _, Result};
use clap::Args;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output JSON path (defaults to stdout).
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Write the raw cases, updates, and users collections as one JSON document.
///
/// # Errors
///
/// Returns an error if the project cannot be opened or the output cannot be
/// written.
pub fn run_export(args: &ExportArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let project = Project::open(project_root, output)?;
    let data = project.docket.repo().export_data();

    let mut out: Box<dyn Write> = match args.output.as_ref() {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create output file {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout())),
    };

    serde_json::to_writer_pretty(&mut out, &data).context("failed to encode export")?;
    writeln!(out)?;
    out.flush()?;

    info!(
        cases = data.cases.as_ref().map_or(0, Vec::len),
        updates = data.updates.as_ref().map_or(0, Vec::len),
        "exported collections"
    );
    Ok(())
}
