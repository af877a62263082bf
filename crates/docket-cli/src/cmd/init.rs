use crate::output::{OutputMode, render};
use crate::project::{DB_FILE, db_path};
use anyhow::{Context as _, Result};
use chrono::Utc;
use clap::Args;
use docket_core::Repository;
use docket_core::config::{PROJECT_DIR, ProjectConfig, project_config_path, save_project_config};
use docket_core::seed::SeedReport;
use docket_core::storage::SqliteStore;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Rewrite the default config even if `.docket/` already exists.
    #[arg(long)]
    pub force: bool,
}

const GITIGNORE: &str = "docket.sqlite3\ndocket.sqlite3-wal\ndocket.sqlite3-shm\n";

#[derive(Debug, Serialize)]
struct InitReport {
    path: String,
    seeded: SeedReport,
}

/// Execute `dk init`. Creates the project skeleton:
///
/// ```text
/// .docket/
///   config.toml       (reminder defaults, session user)
///   docket.sqlite3    (seeded store)
///   .gitignore
/// ```
///
/// An existing store is never wiped; seeding only fills absent collections.
///
/// # Errors
///
/// Returns an error if `.docket/` already exists and `--force` is not set,
/// or if any filesystem or store operation fails.
pub fn run_init(args: &InitArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let docket_dir = project_root.join(PROJECT_DIR);

    if docket_dir.exists() && !args.force {
        anyhow::bail!("{PROJECT_DIR}/ already exists. Use `dk init --force` to reinitialize.");
    }

    std::fs::create_dir_all(&docket_dir)
        .with_context(|| format!("Failed to create {}", docket_dir.display()))?;

    if args.force || !project_config_path(project_root).exists() {
        save_project_config(project_root, &ProjectConfig::default())?;
    }

    let gitignore_path = docket_dir.join(".gitignore");
    std::fs::write(&gitignore_path, GITIGNORE)
        .with_context(|| format!("Failed to write {}", gitignore_path.display()))?;

    let store = SqliteStore::open(&db_path(project_root))?;
    let (_, seeded) = Repository::open(store, Utc::now())?;

    let report = InitReport {
        path: docket_dir.display().to_string(),
        seeded,
    };

    render(output, &report, |report, w| {
        writeln!(w, "✓ Initialized {PROJECT_DIR}/ project structure.")?;
        writeln!(w)?;
        writeln!(w, "  Store:  {PROJECT_DIR}/{DB_FILE}")?;
        writeln!(w, "  Config: {PROJECT_DIR}/config.toml")?;
        if report.seeded.any() {
            writeln!(w, "  Seeded default users, cases, and updates.")?;
        }
        writeln!(w)?;
        writeln!(w, "Next steps:")?;
        writeln!(w, "  dk list                 # tracked cases")?;
        writeln!(w, "  dk users switch <id>    # choose who you are")?;
        writeln!(w, "  dk update <case> ...    # record a status update")
    })
}
