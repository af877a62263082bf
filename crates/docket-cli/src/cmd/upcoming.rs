//! `dk upcoming`: every adjournment in the upcoming window, soonest first.
//!
//! Runs whether or not reminders are enabled.

use crate::output::{OutputMode, pretty_section, render_mode};
use crate::project::{Project, clock};
use clap::Args;
use docket_core::reminder::{UpcomingEntry, no_upcoming_message};
use serde::Serialize;
use std::io::Write;

#[derive(Args, Debug, Default)]
pub struct UpcomingArgs {}

#[derive(Debug, Serialize)]
struct Upcoming {
    days: u32,
    entries: Vec<UpcomingEntry>,
}

/// Execute `dk upcoming`.
///
/// # Errors
///
/// Returns an error if the project cannot be opened or output fails.
pub fn run_upcoming(
    _args: &UpcomingArgs,
    output: OutputMode,
    project_root: &std::path::Path,
) -> anyhow::Result<()> {
    let mut project = Project::open(project_root, output)?;
    let (_, today) = clock();
    let upcoming = Upcoming {
        days: project.docket.settings().upcoming_days,
        entries: project.docket.upcoming(today),
    };

    render_mode(
        output,
        &upcoming,
        |u, w| {
            if u.entries.is_empty() {
                return writeln!(w, "{}", no_upcoming_message(u.days));
            }
            for entry in &u.entries {
                writeln!(w, "{entry}")?;
            }
            Ok(())
        },
        |u, w| {
            if u.entries.is_empty() {
                return writeln!(w, "{}", no_upcoming_message(u.days));
            }
            pretty_section(w, &format!("Upcoming adjournments (next {} days)", u.days))?;
            for entry in &u.entries {
                writeln!(w, "{entry}")?;
            }
            Ok(())
        },
    )
}
