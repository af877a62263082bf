//! `dk users`: list office users and switch the active one.

use crate::output::{CliError, OutputMode, pretty_section, render, render_mode};
use crate::project::{Project, fail};
use anyhow::Result;
use clap::Subcommand;
use docket_core::config::save_project_config;
use docket_core::error::ErrorCode;
use docket_core::model::User;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::info;

#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    /// List stored users; the active one is marked.
    List,
    /// Make `id` the active user for this project.
    Switch {
        /// User id, e.g. `u_lawyer`.
        id: String,
    },
}

#[derive(Debug, Serialize)]
struct UserRow {
    #[serde(flatten)]
    user: User,
    active: bool,
}

#[derive(Debug, Serialize)]
struct Switched {
    message: String,
    user: User,
}

/// Execute `dk users [list|switch]`.
///
/// # Errors
///
/// Returns an error if the user is unknown or the config cannot be written.
pub fn run_users(
    command: Option<&UsersCommand>,
    user_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> Result<()> {
    let mut project = Project::open(project_root, output)?;

    match command {
        None | Some(UsersCommand::List) => {
            let active = project.current_user(user_flag, output)?;
            let rows: Vec<UserRow> = project
                .docket
                .repo()
                .users()
                .iter()
                .map(|user| UserRow {
                    active: user.id == active.id,
                    user: user.clone(),
                })
                .collect();
            render_mode(
                output,
                &rows,
                |rows, w| {
                    for row in rows {
                        let mark = if row.active { "*" } else { "" };
                        writeln!(w, "{}\t{}\t{}\t{mark}", row.user.id, row.user.name, row.user.role)?;
                    }
                    Ok(())
                },
                |rows, w| {
                    pretty_section(w, "Users")?;
                    for row in rows {
                        let mark = if row.active { "▸" } else { " " };
                        writeln!(w, "{mark} {:<14} {}", row.user.id, row.user.display_name())?;
                    }
                    Ok(())
                },
            )
        }
        Some(UsersCommand::Switch { id }) => {
            let Some(user) = project.docket.repo().user(id.trim()).cloned() else {
                return fail(
                    output,
                    &CliError::from_code(ErrorCode::UserNotFound, format!("user '{id}' not found")),
                );
            };
            project.config.session.user = Some(user.id.clone());
            save_project_config(&project.root, &project.config)?;
            info!(user_id = %user.id, "active user changed");

            let switched = Switched {
                message: format!("Active user changed to {}", user.display_name()),
                user,
            };
            render(output, &switched, |s, w| writeln!(w, "{}", s.message))
        }
    }
}
