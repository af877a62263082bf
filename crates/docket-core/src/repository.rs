//! In-memory view of the three collections, backed by a [`KvStore`].
//!
//! The repository is the only owner of cases, updates, and users. Every
//! mutation writes through to storage immediately; [`Repository::reload`]
//! re-reads storage so a read reflects what other sessions committed.

use crate::model::{Case, Update, User};
use crate::seed::{self, SeedReport};
use crate::storage::{self, CASES_KEY, KvStore, StoreError, Storage, UPDATES_KEY, USERS_KEY};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, info, warn};

/// Raw collections as stored, for the debug export/import surface.
///
/// A `None` field means the collection key is absent (export) or should be
/// left untouched (import).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataExport {
    #[serde(default)]
    pub cases: Option<Vec<Case>>,
    #[serde(default)]
    pub updates: Option<Vec<Update>>,
    #[serde(default)]
    pub users: Option<Vec<User>>,
}

#[derive(Debug)]
pub struct Repository<S> {
    storage: Storage<S>,
    users: Vec<User>,
    cases: Vec<Case>,
    updates: Vec<Update>,
}

impl<S: KvStore> Repository<S> {
    /// Seed absent collections, then load everything.
    ///
    /// # Errors
    ///
    /// Returns an error if seeding cannot write to the store.
    pub fn open(store: S, now: DateTime<Utc>) -> Result<(Self, SeedReport), StoreError> {
        let mut storage = Storage::new(store);
        let report = seed::ensure_seeded(&mut storage, now)?;
        let mut repo = Self {
            storage,
            users: Vec::new(),
            cases: Vec::new(),
            updates: Vec::new(),
        };
        repo.reload();
        Ok((repo, report))
    }

    /// Re-read all three collections from storage. Records that no longer
    /// decode are skipped; the stored value is left as it is.
    pub fn reload(&mut self) {
        self.users = self.storage.get_list(USERS_KEY);
        self.cases = self.storage.get_list(CASES_KEY);
        self.updates = self.storage.get_list(UPDATES_KEY);
        debug!(
            users = self.users.len(),
            cases = self.cases.len(),
            updates = self.updates.len(),
            "reloaded collections"
        );
    }

    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    #[must_use]
    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    #[must_use]
    pub fn updates(&self) -> &[Update] {
        &self.updates
    }

    #[must_use]
    pub fn case(&self, case_id: &str) -> Option<&Case> {
        self.cases.iter().find(|case| case.id == case_id)
    }

    /// Look a case up by id first, then by case number (case-insensitive).
    #[must_use]
    pub fn resolve_case(&self, id_or_number: &str) -> Option<&Case> {
        let needle = id_or_number.trim();
        self.case(needle).or_else(|| {
            self.cases
                .iter()
                .find(|case| case.case_number.eq_ignore_ascii_case(needle))
        })
    }

    #[must_use]
    pub fn user(&self, user_id: &str) -> Option<&User> {
        self.users.iter().find(|user| user.id == user_id)
    }

    /// Updates belonging to one case, in stored order.
    pub fn updates_for<'a>(&'a self, case_id: &'a str) -> impl Iterator<Item = &'a Update> + 'a {
        self.updates.iter().filter(move |update| update.case_id == case_id)
    }

    /// Append a new case and persist the cases collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails; in-memory state is then reloaded
    /// from storage.
    pub fn insert_case(&mut self, case: Case) -> Result<(), StoreError> {
        self.cases = self.storage.get_list(CASES_KEY);
        info!(case_id = %case.id, case_number = %case.case_number, "adding case");
        self.cases.push(case);
        let result = self.storage.set(CASES_KEY, &self.cases);
        if result.is_err() {
            self.reload();
        }
        result
    }

    /// Append `update`, carry its status (and non-empty suit number) onto its
    /// case, and persist both collections as one unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails; in-memory state is then reloaded
    /// from storage.
    pub(crate) fn record_update(&mut self, update: Update) -> Result<(), StoreError> {
        if let Some(case) = self.cases.iter_mut().find(|case| case.id == update.case_id) {
            case.status = update.status;
            if !update.suit_number.is_empty() {
                case.suit_number.clone_from(&update.suit_number);
            }
        } else {
            warn!(case_id = %update.case_id, "recording update for a case that is not loaded");
        }
        self.updates.push(update);

        let entries = [
            (UPDATES_KEY, storage::encode(&self.updates)?),
            (CASES_KEY, storage::encode(&self.cases)?),
        ];
        let result = self.storage.set_encoded(&entries);
        if let Err(err) = &result {
            warn!(error = %err, "persisting submission failed; reloading");
            self.reload();
        }
        result
    }

    /// The raw stored collections, bypassing the in-memory copies.
    #[must_use]
    pub fn export_data(&self) -> DataExport {
        DataExport {
            cases: self.stored_list(CASES_KEY),
            updates: self.stored_list(UPDATES_KEY),
            users: self.stored_list(USERS_KEY),
        }
    }

    fn stored_list<T: DeserializeOwned>(&self, key: &str) -> Option<Vec<T>> {
        (!self.storage.is_vacant(key)).then(|| self.storage.get_list(key))
    }

    /// Overwrite every collection present in `data`, then reload.
    ///
    /// # Errors
    ///
    /// Returns an error if a write fails.
    pub fn import_data(&mut self, data: &DataExport) -> Result<(), StoreError> {
        if let Some(cases) = &data.cases {
            self.storage.set(CASES_KEY, cases)?;
        }
        if let Some(updates) = &data.updates {
            self.storage.set(UPDATES_KEY, updates)?;
        }
        if let Some(users) = &data.users {
            self.storage.set(USERS_KEY, users)?;
        }
        info!(
            cases = data.cases.is_some(),
            updates = data.updates.is_some(),
            users = data.users.is_some(),
            "imported collections"
        );
        self.reload();
        Ok(())
    }

    #[must_use]
    pub const fn storage(&self) -> &Storage<S> {
        &self.storage
    }

    pub fn into_store(self) -> S {
        self.storage.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CaseStatus;
    use crate::storage::MemoryStore;

    fn seeded() -> Repository<MemoryStore> {
        Repository::open(MemoryStore::new(), Utc::now()).unwrap().0
    }

    #[test]
    fn open_seeds_and_loads() {
        let (repo, report) = Repository::open(MemoryStore::new(), Utc::now()).unwrap();
        assert!(report.any());
        assert_eq!(repo.users().len(), 3);
        assert_eq!(repo.cases().len(), 2);
        assert_eq!(repo.updates().len(), 2);
    }

    #[test]
    fn resolve_case_accepts_number_or_id() {
        let repo = seeded();
        assert_eq!(repo.resolve_case("case-002").unwrap().case_number, "2025-LCM-0002");
        assert_eq!(repo.resolve_case("2025-lcm-0001").unwrap().id, "case-001");
        assert!(repo.resolve_case("nope").is_none());
    }

    #[test]
    fn import_overwrites_only_present_collections() {
        let mut repo = seeded();
        repo.import_data(&DataExport {
            cases: Some(Vec::new()),
            updates: None,
            users: None,
        })
        .unwrap();
        assert!(repo.cases().is_empty());
        assert_eq!(repo.updates().len(), 2);
        assert_eq!(repo.users().len(), 3);
    }

    #[test]
    fn record_update_overwrites_status_and_keeps_blank_suit() {
        let mut repo = seeded();
        let mut update = repo.updates()[0].clone();
        update.id = "upd-x".into();
        update.status = CaseStatus::KeptInView;
        update.suit_number = String::new();
        repo.record_update(update).unwrap();

        let case = repo.case("case-001").unwrap();
        assert_eq!(case.status, CaseStatus::KeptInView);
        assert_eq!(case.suit_number, "HCT/CON/2025/45");

        repo.reload();
        assert_eq!(repo.case("case-001").unwrap().status, CaseStatus::KeptInView);
        assert_eq!(repo.updates().len(), 3);
    }

    #[test]
    fn export_reflects_storage() {
        let repo = seeded();
        let export = repo.export_data();
        assert_eq!(export.cases.as_deref(), Some(repo.cases()));
        assert_eq!(export.updates.as_deref(), Some(repo.updates()));
        assert_eq!(export.users.as_deref(), Some(repo.users()));
    }
}
