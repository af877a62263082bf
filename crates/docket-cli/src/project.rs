//! Opening the `.docket/` project for a command.

use crate::identity::{self, Defaults};
use crate::output::{CliError, OutputMode, render_error};
use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use docket_core::Docket;
use docket_core::config::{self, PROJECT_DIR, ProjectConfig};
use docket_core::error::ErrorCode;
use docket_core::model::User;
use docket_core::storage::SqliteStore;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const DB_FILE: &str = "docket.sqlite3";

pub fn db_path(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_DIR).join(DB_FILE)
}

/// Current wall-clock instant and the calendar day it falls on.
pub fn clock() -> (DateTime<Utc>, NaiveDate) {
    let now = Utc::now();
    (now, now.date_naive())
}

/// Render `error` to stderr and return it as a command failure.
pub fn fail<T>(output: OutputMode, error: &CliError) -> Result<T> {
    render_error(output, error)?;
    anyhow::bail!("{}", error.message)
}

pub struct Project {
    pub root: PathBuf,
    pub config: ProjectConfig,
    pub docket: Docket<SqliteStore>,
}

impl Project {
    /// Open the project rooted at `project_root`, seeding the store if it is
    /// new.
    ///
    /// # Errors
    ///
    /// Returns an error if `.docket/` is missing, the config does not parse,
    /// or the store cannot be opened.
    pub fn open(project_root: &Path, output: OutputMode) -> Result<Self> {
        if !project_root.join(PROJECT_DIR).is_dir() {
            return fail(
                output,
                &CliError::from_code(
                    ErrorCode::NotInitialized,
                    format!("no {PROJECT_DIR}/ directory in {}", project_root.display()),
                ),
            );
        }

        let config = match config::load_project_config(project_root) {
            Ok(config) => config,
            Err(err) => {
                return fail(
                    output,
                    &CliError::from_code(ErrorCode::ConfigParseError, format!("{err:#}")),
                );
            }
        };

        let store = SqliteStore::open(&db_path(project_root))?;
        let (docket, report) = Docket::open(store, config.reminders.clone(), Utc::now())?;
        if report.any() {
            debug!(?report, "seeded missing collections");
        }

        Ok(Self {
            root: project_root.to_path_buf(),
            config,
            docket,
        })
    }

    /// The acting user: `--user`, `DOCKET_USER`, the session user, the user
    /// config, then the first stored user.
    ///
    /// # Errors
    ///
    /// Returns an error if the requested user does not exist.
    pub fn current_user(&self, cli_flag: Option<&str>, output: OutputMode) -> Result<User> {
        let user_config = config::load_user_config().unwrap_or_else(|err| {
            warn!(error = %err, "ignoring unreadable user config");
            config::UserConfig::default()
        });
        let defaults = Defaults {
            session_user: self.config.session.user.as_deref(),
            config_user: user_config.user.as_deref(),
        };
        match identity::resolve_user(cli_flag, defaults, self.docket.repo().users()) {
            Ok(user) => Ok(user.clone()),
            Err(err) => fail(output, &CliError::from_code(err.code, err.message)),
        }
    }

    /// Resolve a case argument or render a not-found error.
    ///
    /// # Errors
    ///
    /// Returns an error if no case has this id or case number.
    pub fn require_case(&self, id_or_number: &str, output: OutputMode) -> Result<String> {
        match self.docket.repo().resolve_case(id_or_number) {
            Some(case) => Ok(case.id.clone()),
            None => fail(
                output,
                &CliError::from_code(
                    ErrorCode::CaseNotFound,
                    format!("case '{id_or_number}' not found"),
                ),
            ),
        }
    }
}
