//! `dk reminders`: one reminder scan over the configured window.

use crate::output::{OutputMode, pretty_section, render_mode};
use crate::project::{Project, clock};
use clap::Args;
use docket_core::reminder::{ReminderNotice, ReminderSink};
use serde::Serialize;
use std::io::Write;
use tracing::{debug, info};

#[derive(Args, Debug)]
pub struct RemindersArgs {
    /// Refuse notification permission; the scan then emits nothing.
    #[arg(long = "no-notify")]
    pub no_notify: bool,
}

/// Terminal stand-in for a notification service. Permission is granted
/// unless the user opted out; notices are collected for rendering.
#[derive(Debug, Default)]
pub struct TerminalSink {
    grant: bool,
    pub notices: Vec<ReminderNotice>,
}

impl TerminalSink {
    pub const fn new(grant: bool) -> Self {
        Self {
            grant,
            notices: Vec::new(),
        }
    }
}

impl ReminderSink for TerminalSink {
    fn request_permission(&mut self) -> bool {
        debug!(granted = self.grant, "reminder permission requested");
        self.grant
    }

    fn notify(&mut self, notice: &ReminderNotice) {
        info!(case_id = %notice.case_id, "reminder notice");
        self.notices.push(notice.clone());
    }
}

#[derive(Debug, Serialize)]
pub struct ReminderReport {
    pub enabled: bool,
    pub window_days: u32,
    pub notices: Vec<ReminderNotice>,
}

/// Write notices the way a desktop notification would show them.
pub fn write_notices(w: &mut dyn Write, notices: &[ReminderNotice]) -> std::io::Result<()> {
    for notice in notices {
        writeln!(w, "🔔 {}", notice.title)?;
        for line in notice.body.lines() {
            writeln!(w, "   {line}")?;
        }
    }
    Ok(())
}

/// Execute `dk reminders`.
///
/// # Errors
///
/// Returns an error if the project cannot be opened or output fails.
pub fn run_reminders(
    args: &RemindersArgs,
    output: OutputMode,
    project_root: &std::path::Path,
) -> anyhow::Result<()> {
    let mut project = Project::open(project_root, output)?;
    let mut sink = TerminalSink::new(!args.no_notify);
    let (_, today) = clock();

    if let Err(err) = project.docket.enable_reminders(&mut sink) {
        if !output.is_json() {
            eprintln!("warning: {err}; `dk upcoming` still lists adjournments");
        }
    }
    project.docket.scan_reminders(today, &mut sink);

    let report = ReminderReport {
        enabled: project.docket.reminders().enabled(),
        window_days: project.docket.reminders().window_days(),
        notices: sink.notices,
    };

    render_mode(
        output,
        &report,
        |r, w| {
            for notice in &r.notices {
                writeln!(w, "{}\t{}", notice.case_id, notice.title)?;
            }
            Ok(())
        },
        |r, w| {
            pretty_section(w, &format!("Reminders (next {} days)", r.window_days))?;
            if !r.enabled {
                return writeln!(w, "Reminders are off.");
            }
            if r.notices.is_empty() {
                return writeln!(w, "Nothing adjourned in this window.");
            }
            write_notices(w, &r.notices)
        },
    )
}
