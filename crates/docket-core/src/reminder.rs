//! Adjournment reminders.
//!
//! Two paths read the same update collection:
//!
//! - [`ReminderEngine::run_scan`] groups adjournments in a short window by
//!   case and hands one notice per case to a [`ReminderSink`]. It only emits
//!   once the sink has granted permission.
//! - [`upcoming`] lists every adjournment in a longer window as flat entries
//!   and always runs.

use crate::error::ErrorCode;
use crate::model::{Case, Update};
use crate::query::window_end;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};

pub const DEFAULT_WINDOW_DAYS: u32 = 7;
pub const DEFAULT_UPCOMING_DAYS: u32 = 30;

const MISSING_CASE_NUMBER: &str = "case";
const MISSING_CASE_LABEL: &str = "(no case)";
const MISSING_TITLE_LABEL: &str = "(no title)";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReminderNotice {
    pub case_id: String,
    pub title: String,
    pub body: String,
}

/// Where reminder notices go: a desktop notification, a terminal, a test.
pub trait ReminderSink {
    /// Ask the user to allow notices. `false` keeps reminders off.
    fn request_permission(&mut self) -> bool;

    fn notify(&mut self, notice: &ReminderNotice);
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ReminderError {
    #[error("reminder permission was not granted")]
    PermissionDenied,
}

impl ReminderError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::PermissionDenied => ErrorCode::PermissionDenied,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderEngine {
    enabled: bool,
    window_days: u32,
}

impl Default for ReminderEngine {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_DAYS)
    }
}

impl ReminderEngine {
    #[must_use]
    pub const fn new(window_days: u32) -> Self {
        Self {
            enabled: false,
            window_days,
        }
    }

    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub const fn window_days(&self) -> u32 {
        self.window_days
    }

    /// Request permission from `sink` and switch the engine on if granted.
    ///
    /// # Errors
    ///
    /// Returns [`ReminderError::PermissionDenied`] when the sink refuses; the
    /// engine is then disabled.
    pub fn enable(&mut self, sink: &mut dyn ReminderSink) -> Result<(), ReminderError> {
        self.enabled = sink.request_permission();
        if self.enabled {
            info!(window_days = self.window_days, "reminders enabled");
            Ok(())
        } else {
            warn!("reminder permission denied");
            Err(ReminderError::PermissionDenied)
        }
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Scan and emit notices to `sink`. Returns how many were emitted; zero
    /// when the engine is disabled.
    pub fn run_scan(
        &self,
        updates: &[Update],
        cases: &[Case],
        today: NaiveDate,
        sink: &mut dyn ReminderSink,
    ) -> usize {
        if !self.enabled {
            debug!("reminders disabled; skipping scan");
            return 0;
        }
        let notices = scan(updates, cases, today, self.window_days);
        for notice in &notices {
            sink.notify(notice);
        }
        debug!(emitted = notices.len(), "reminder scan finished");
        notices.len()
    }
}

/// One notice per case with an adjournment in `[today, today + window_days]`.
///
/// Cases appear in the order their first matching update appears; lines
/// within a notice keep update order.
#[must_use]
pub fn scan(
    updates: &[Update],
    cases: &[Case],
    today: NaiveDate,
    window_days: u32,
) -> Vec<ReminderNotice> {
    let end = window_end(today, window_days);
    let mut groups: Vec<(&str, Vec<&Update>)> = Vec::new();

    for update in updates.iter().filter(|u| u.adjourns_between(today, end)) {
        match groups.iter_mut().find(|(case_id, _)| *case_id == update.case_id) {
            Some((_, members)) => members.push(update),
            None => groups.push((&update.case_id, vec![update])),
        }
    }

    groups
        .into_iter()
        .map(|(case_id, members)| {
            let case = cases.iter().find(|c| c.id == case_id);
            let case_number = case.map_or(MISSING_CASE_NUMBER, |c| c.case_number.as_str());
            let case_title = case.map_or("", |c| c.title.as_str());
            let lines = members
                .iter()
                .filter_map(|u| {
                    u.adjournment_date
                        .map(|d| format!("{}: {}", d.format("%Y-%m-%d"), u.current_position))
                })
                .collect::<Vec<_>>()
                .join("\n");
            ReminderNotice {
                case_id: case_id.to_string(),
                title: format!("Upcoming adjournment for {case_number}"),
                body: format!("{case_title}\n{lines}"),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpcomingEntry {
    pub case_id: String,
    pub case_number: Option<String>,
    pub title: Option<String>,
    pub date: NaiveDate,
    pub position: String,
}

impl fmt::Display for UpcomingEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} - {} - {}",
            self.case_number.as_deref().unwrap_or(MISSING_CASE_LABEL),
            self.title.as_deref().unwrap_or(MISSING_TITLE_LABEL),
            self.date.format("%Y-%m-%d"),
            self.position
        )
    }
}

/// Message shown when [`upcoming`] finds nothing.
#[must_use]
pub fn no_upcoming_message(days: u32) -> String {
    format!("No upcoming adjournments in the next {days} days")
}

/// Every adjournment in `[today, today + days]`, soonest first. Entries on
/// the same day keep update order.
#[must_use]
pub fn upcoming(
    updates: &[Update],
    cases: &[Case],
    today: NaiveDate,
    days: u32,
) -> Vec<UpcomingEntry> {
    let end = window_end(today, days);
    let mut entries: Vec<UpcomingEntry> = updates
        .iter()
        .filter_map(|update| {
            let date = update.adjournment_date.filter(|d| *d >= today && *d <= end)?;
            let case = cases.iter().find(|c| c.id == update.case_id);
            Some(UpcomingEntry {
                case_id: update.case_id.clone(),
                case_number: case.map(|c| c.case_number.clone()),
                title: case.map(|c| c.title.clone()),
                date,
                position: update.current_position.clone(),
            })
        })
        .collect();
    entries.sort_by_key(|entry| entry.date);
    entries
}
