//! `dk watch`: periodic reminder scans in the foreground.

use crate::cmd::reminders::{TerminalSink, write_notices};
use crate::output::OutputMode;
use crate::project::Project;
use anyhow::Result;
use clap::Args;
use docket_core::schedule::{Clock, IntervalSchedule, SystemClock};
use std::io::Write;
use std::path::Path;
use tracing::info;

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Seconds between scans (default: `[reminders] interval_secs`).
    #[arg(long, value_name = "SECS")]
    pub interval: Option<u32>,

    /// Stop after this many scans (default: run until interrupted).
    #[arg(long)]
    pub ticks: Option<u32>,

    /// Refuse notification permission; scans then emit nothing.
    #[arg(long = "no-notify")]
    pub no_notify: bool,
}

/// Execute `dk watch`.
///
/// Each scan reloads the store and finishes before the next poll.
///
/// # Errors
///
/// Returns an error if the project cannot be opened or output fails.
pub fn run_watch(args: &WatchArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let mut project = Project::open(project_root, output)?;
    let interval = args
        .interval
        .unwrap_or(project.config.reminders.interval_secs);

    let mut sink = TerminalSink::new(!args.no_notify);
    if let Err(err) = project.docket.enable_reminders(&mut sink) {
        eprintln!("warning: {err}; scans will emit nothing");
    }

    let clock = SystemClock;
    let mut schedule = IntervalSchedule::every_secs(interval);
    schedule.start(clock.now());
    info!(interval, ticks = ?args.ticks, "watching for adjournments");

    let mut scans = 0u32;
    while schedule.is_running() {
        if let Some(wait) = schedule.until_next(clock.now()) {
            std::thread::sleep(wait);
        }
        if !schedule.poll_clock(&clock) {
            continue;
        }

        let today = clock.now().date_naive();
        let emitted = project.docket.scan_reminders(today, &mut sink);
        let notices = std::mem::take(&mut sink.notices);
        scans += 1;
        info!(scan = scans, emitted, "reminder scan");

        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        if output.is_json() {
            for notice in &notices {
                writeln!(out, "{}", serde_json::to_string(notice)?)?;
            }
        } else {
            write_notices(&mut out, &notices)?;
        }
        out.flush()?;

        if args.ticks.is_some_and(|limit| scans >= limit) {
            schedule.stop();
        }
    }
    Ok(())
}
