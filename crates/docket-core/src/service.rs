//! One session over a store: the repository, the reminder engine, and the
//! current view selection.

use crate::catalog::{self, CaseError, CreatedCase, NewCase};
use crate::config::ReminderConfig;
use crate::lifecycle::{self, SubmitError};
use crate::model::{Update, UpdateDraft};
use crate::reminder::{self, ReminderEngine, ReminderError, ReminderSink, UpcomingEntry};
use crate::repository::Repository;
use crate::seed::SeedReport;
use crate::storage::{KvStore, StoreError};
use crate::view::{ViewError, ViewState};
use chrono::{DateTime, NaiveDate, Utc};

#[derive(Debug)]
pub struct Docket<S> {
    repo: Repository<S>,
    reminders: ReminderEngine,
    view: ViewState,
    settings: ReminderConfig,
}

impl<S: KvStore> Docket<S> {
    /// # Errors
    ///
    /// Returns an error if seeding the store fails.
    pub fn open(
        store: S,
        settings: ReminderConfig,
        now: DateTime<Utc>,
    ) -> Result<(Self, SeedReport), StoreError> {
        let (repo, report) = Repository::open(store, now)?;
        let docket = Self {
            repo,
            reminders: ReminderEngine::new(settings.window_days),
            view: ViewState::default(),
            settings,
        };
        Ok((docket, report))
    }

    #[must_use]
    pub const fn repo(&self) -> &Repository<S> {
        &self.repo
    }

    pub const fn repo_mut(&mut self) -> &mut Repository<S> {
        &mut self.repo
    }

    #[must_use]
    pub const fn reminders(&self) -> &ReminderEngine {
        &self.reminders
    }

    #[must_use]
    pub const fn view(&self) -> &ViewState {
        &self.view
    }

    #[must_use]
    pub const fn settings(&self) -> &ReminderConfig {
        &self.settings
    }

    /// # Errors
    ///
    /// Returns [`ReminderError::PermissionDenied`] when `sink` refuses.
    pub fn enable_reminders(&mut self, sink: &mut dyn ReminderSink) -> Result<(), ReminderError> {
        self.reminders.enable(sink)
    }

    /// Select a case (by id or case number) and open its update form.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::NoCaseSelected`] when nothing matches.
    pub fn open_update_form(&mut self, case: &str) -> Result<String, ViewError> {
        match self.repo.resolve_case(case) {
            Some(found) => {
                let id = found.id.clone();
                self.view.select_case(id);
            }
            None => self.view.clear_selection(),
        }
        self.view.open_form().map(str::to_string)
    }

    /// Submit `draft`; on success close the form and rescan reminders.
    ///
    /// # Errors
    ///
    /// See [`lifecycle::submit`].
    pub fn submit_update(
        &mut self,
        draft: &UpdateDraft,
        created_by: &str,
        now: DateTime<Utc>,
        sink: &mut dyn ReminderSink,
    ) -> Result<Update, SubmitError> {
        let update = lifecycle::submit(&mut self.repo, draft, created_by, now)?;
        self.view.submit_succeeded();
        self.scan_reminders(now.date_naive(), sink);
        Ok(update)
    }

    /// # Errors
    ///
    /// See [`catalog::create_case`].
    pub fn create_case(
        &mut self,
        new_case: &NewCase,
        now: DateTime<Utc>,
    ) -> Result<CreatedCase, CaseError> {
        catalog::create_case(&mut self.repo, new_case, now)
    }

    /// Reload and run one reminder scan. Emits nothing while disabled.
    pub fn scan_reminders(&mut self, today: NaiveDate, sink: &mut dyn ReminderSink) -> usize {
        self.repo.reload();
        self.reminders
            .run_scan(self.repo.updates(), self.repo.cases(), today, sink)
    }

    /// Adjournments over the configured upcoming window, regardless of
    /// whether reminders are enabled.
    pub fn upcoming(&mut self, today: NaiveDate) -> Vec<UpcomingEntry> {
        self.repo.reload();
        reminder::upcoming(
            self.repo.updates(),
            self.repo.cases(),
            today,
            self.settings.upcoming_days,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CaseStatus;
    use crate::reminder::ReminderNotice;
    use crate::storage::MemoryStore;
    use chrono::Days;

    #[derive(Default)]
    struct CountingSink {
        notices: Vec<ReminderNotice>,
    }

    impl ReminderSink for CountingSink {
        fn request_permission(&mut self) -> bool {
            true
        }

        fn notify(&mut self, notice: &ReminderNotice) {
            self.notices.push(notice.clone());
        }
    }

    fn docket() -> Docket<MemoryStore> {
        Docket::open(MemoryStore::new(), ReminderConfig::default(), Utc::now())
            .unwrap()
            .0
    }

    fn draft(case_id: &str, adjourn_in: u64) -> UpdateDraft {
        let today = Utc::now().date_naive();
        UpdateDraft {
            case_id: case_id.into(),
            date: Some(today),
            action_taken: "Mention".into(),
            current_position: "Hearing fixed".into(),
            status: Some(CaseStatus::Court),
            adjournment_date: today.checked_add_days(Days::new(adjourn_in)),
            ..UpdateDraft::default()
        }
    }

    #[test]
    fn submit_rescans_only_when_enabled() {
        let mut docket = docket();
        let mut sink = CountingSink::default();

        docket
            .submit_update(&draft("case-001", 2), "u_lawyer", Utc::now(), &mut sink)
            .unwrap();
        assert!(sink.notices.is_empty());

        docket.enable_reminders(&mut sink).unwrap();
        docket
            .submit_update(&draft("case-001", 3), "u_lawyer", Utc::now(), &mut sink)
            .unwrap();
        assert_eq!(sink.notices.len(), 1);
        assert_eq!(
            sink.notices[0].title,
            "Upcoming adjournment for 2025-LCM-0001"
        );
    }

    #[test]
    fn open_form_resolves_case_number() {
        let mut docket = docket();
        assert_eq!(docket.open_update_form("2025-LCM-0002").unwrap(), "case-002");
        assert!(docket.view().form_open());
        assert!(docket.open_update_form("missing").is_err());
        assert!(!docket.view().form_open());
    }

    #[test]
    fn upcoming_ignores_enabled_flag() {
        let mut docket = docket();
        let mut sink = CountingSink::default();
        docket
            .submit_update(&draft("case-002", 20), "u_lawyer", Utc::now(), &mut sink)
            .unwrap();
        let entries = docket.upcoming(Utc::now().date_naive());
        assert!(entries.iter().any(|e| e.case_id == "case-002"));
    }
}
