//! Filtering and sorting for the case list, a case's history, and the
//! dashboard.
//!
//! All functions are pure over borrowed collections; callers reload the
//! repository first when they need cross-session truth.

use crate::model::user::display_name_for;
use crate::model::{Case, CaseStatus, Update, User};
use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Last day of a `days`-long window starting at `today`, inclusive.
#[must_use]
pub fn window_end(today: NaiveDate, days: u32) -> NaiveDate {
    today
        .checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX)
}

/// Stand-in for a locale compare: case-insensitive first, raw text as the
/// tiebreak so the order is total.
#[must_use]
pub fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

// ---------------------------------------------------------------------------
// Case list
// ---------------------------------------------------------------------------

/// Case-list filter controls. Every field at its default is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseQuery {
    /// Matched against title, suit number, and case number.
    pub text: String,
    /// Exact status bucket.
    pub status: Option<CaseStatus>,
    /// `0` disables; otherwise the case needs an adjournment within this
    /// many days from today.
    pub adjourn_within_days: u32,
}

impl CaseQuery {
    fn matches(&self, case: &Case, updates: &[Update], today: NaiveDate) -> bool {
        if let Some(status) = self.status {
            if case.status != status {
                return false;
            }
        }

        let needle = self.text.trim().to_lowercase();
        if !needle.is_empty() && !case.search_haystack().contains(&needle) {
            return false;
        }

        if self.adjourn_within_days > 0 {
            let end = window_end(today, self.adjourn_within_days);
            let upcoming = updates
                .iter()
                .any(|update| update.case_id == case.id && update.adjourns_between(today, end));
            if !upcoming {
                return false;
            }
        }

        true
    }
}

/// Filter `cases` by `query` and sort by title.
#[must_use]
pub fn query_cases<'a>(
    cases: &'a [Case],
    updates: &[Update],
    query: &CaseQuery,
    today: NaiveDate,
) -> Vec<&'a Case> {
    let mut matched: Vec<&Case> = cases
        .iter()
        .filter(|case| query.matches(case, updates, today))
        .collect();
    matched.sort_by(|a, b| compare_text(&a.title, &b.title));
    matched
}

/// Number of cases in each status. Every status is present, zero or not.
#[must_use]
pub fn status_counts(cases: &[Case]) -> BTreeMap<CaseStatus, usize> {
    let mut counts: BTreeMap<CaseStatus, usize> =
        CaseStatus::ALL.iter().map(|status| (*status, 0)).collect();
    for case in cases {
        *counts.entry(case.status).or_default() += 1;
    }
    counts
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// History sort direction on the update `date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HistorySort {
    Newest,
    #[default]
    Oldest,
}

impl fmt::Display for HistorySort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Newest => f.write_str("newest"),
            Self::Oldest => f.write_str("oldest"),
        }
    }
}

impl FromStr for HistorySort {
    type Err = std::convert::Infallible;

    /// `newest` sorts descending; any other value sorts ascending.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("newest") {
            Ok(Self::Newest)
        } else {
            Ok(Self::Oldest)
        }
    }
}

/// History filter controls for one selected case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryQuery {
    /// Selected case; `None` yields no rows.
    pub case_id: Option<String>,
    /// Matched against action taken, notes, and the creator's display name.
    pub text: String,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub sort: HistorySort,
}

/// Filter and sort the history of the selected case.
#[must_use]
pub fn query_history<'a>(
    updates: &'a [Update],
    users: &[User],
    query: &HistoryQuery,
) -> Vec<&'a Update> {
    let Some(case_id) = query.case_id.as_deref() else {
        return Vec::new();
    };
    let needle = query.text.trim().to_lowercase();

    let mut rows: Vec<&Update> = updates
        .iter()
        .filter(|update| update.case_id == case_id)
        .filter(|update| {
            needle.is_empty()
                || update.action_taken.to_lowercase().contains(&needle)
                || update.notes.to_lowercase().contains(&needle)
                || display_name_for(users, &update.created_by)
                    .to_lowercase()
                    .contains(&needle)
        })
        .filter(|update| query.from.is_none_or(|from| update.date >= from))
        .filter(|update| query.to.is_none_or(|to| update.date <= to))
        .collect();

    match query.sort {
        HistorySort::Newest => rows.sort_by(|a, b| b.date.cmp(&a.date)),
        HistorySort::Oldest => rows.sort_by(|a, b| a.date.cmp(&b.date)),
    }
    rows
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// Dashboard sort keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardSort {
    /// Soonest next adjournment first; cases without one last.
    #[default]
    Adjournment,
    Category,
    /// Oldest last update first; cases without updates last.
    Update,
    /// Ongoing, kept-in-view, completed, then the rest.
    Status,
}

impl fmt::Display for DashboardSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Adjournment => "adjournment",
            Self::Category => "category",
            Self::Update => "update",
            Self::Status => "status",
        })
    }
}

impl FromStr for DashboardSort {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "adjournment" | "adjourn" => Ok(Self::Adjournment),
            "category" => Ok(Self::Category),
            "update" | "last-update" => Ok(Self::Update),
            "status" => Ok(Self::Status),
            other => anyhow::bail!(
                "unknown dashboard sort '{other}': expected one of adjournment, category, update, status"
            ),
        }
    }
}

/// One dashboard line per case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardRow {
    pub case_id: String,
    pub case_number: String,
    pub title: String,
    pub category: String,
    pub status: CaseStatus,
    pub last_update: Option<NaiveDate>,
    pub next_adjournment: Option<NaiveDate>,
}

fn compare_optional_dates(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Build and sort dashboard rows. The next adjournment is the earliest one
/// on or after `today`.
#[must_use]
pub fn dashboard_rows(
    cases: &[Case],
    updates: &[Update],
    today: NaiveDate,
    sort: DashboardSort,
) -> Vec<DashboardRow> {
    let mut rows: Vec<DashboardRow> = cases
        .iter()
        .map(|case| {
            let own = || updates.iter().filter(|u| u.case_id == case.id);
            DashboardRow {
                case_id: case.id.clone(),
                case_number: case.case_number.clone(),
                title: case.title.clone(),
                category: case.category.clone(),
                status: case.status,
                last_update: own().map(|u| u.date).max(),
                next_adjournment: own()
                    .filter_map(|u| u.adjournment_date)
                    .filter(|date| *date >= today)
                    .min(),
            }
        })
        .collect();

    rows.sort_by(|a, b| match sort {
        DashboardSort::Adjournment => {
            compare_optional_dates(a.next_adjournment, b.next_adjournment)
        }
        DashboardSort::Category => compare_text(&a.category, &b.category),
        DashboardSort::Update => compare_optional_dates(a.last_update, b.last_update),
        DashboardSort::Status => a.status.dashboard_rank().cmp(&b.status.dashboard_rank()),
    });
    rows
}

/// Days ahead the dashboard flags an adjournment as imminent.
pub const DEFAULT_IMMINENT_DAYS: u32 = 3;

/// A case whose next adjournment is only a few days away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImminentAlert {
    pub case_number: String,
    pub date: NaiveDate,
    pub days_left: i64,
}

impl fmt::Display for ImminentAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = if self.days_left == 1 { "" } else { "s" };
        write!(
            f,
            "Case {}: {} ({} day{plural} left)",
            self.case_number, self.date, self.days_left
        )
    }
}

/// Dashboard rows whose next adjournment is within `days` of `today`.
#[must_use]
pub fn imminent_alerts(rows: &[DashboardRow], today: NaiveDate, days: u32) -> Vec<ImminentAlert> {
    let end = window_end(today, days);
    rows.iter()
        .filter_map(|row| {
            let date = row.next_adjournment?;
            (date >= today && date <= end).then(|| ImminentAlert {
                case_number: row.case_number.clone(),
                date,
                days_left: (date - today).num_days(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;
    use chrono::{DateTime, Utc};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn case(id: &str, title: &str, status: CaseStatus) -> Case {
        Case {
            id: id.into(),
            case_number: format!("NUM-{id}"),
            title: title.into(),
            description: String::new(),
            category: "Civil".into(),
            subcategory: String::new(),
            petition_date: day(2025, 1, 1),
            suit_number: String::new(),
            assigned_by: String::new(),
            status,
            created_at: DateTime::<Utc>::from_timestamp(0, 0).unwrap(),
        }
    }

    fn update(id: &str, case_id: &str, date: NaiveDate, adjourn: Option<NaiveDate>) -> Update {
        Update {
            id: id.into(),
            case_id: case_id.into(),
            date,
            action_taken: format!("action {id}"),
            current_position: format!("position {id}"),
            status: CaseStatus::Ongoing,
            suit_number: String::new(),
            adjournment_date: adjourn,
            notes: String::new(),
            created_by: "u_lawyer".into(),
            created_at: DateTime::<Utc>::from_timestamp(0, 0).unwrap(),
        }
    }

    fn ids<'a>(cases: &[&'a Case]) -> Vec<&'a str> {
        cases.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn empty_query_returns_everything_sorted_by_title() {
        let cases = vec![
            case("b", "zebra", CaseStatus::Ongoing),
            case("a", "Apple", CaseStatus::Court),
            case("c", "mango", CaseStatus::Completed),
        ];
        let result = query_cases(&cases, &[], &CaseQuery::default(), day(2025, 9, 1));
        assert_eq!(ids(&result), vec!["a", "c", "b"]);
    }

    #[test]
    fn court_filter_returns_only_court_cases() {
        let cases = vec![
            case("a", "One", CaseStatus::Ongoing),
            case("b", "Two", CaseStatus::Completed),
            case("c", "Three", CaseStatus::Court),
        ];
        let query = CaseQuery {
            status: Some(CaseStatus::Court),
            ..CaseQuery::default()
        };
        assert_eq!(ids(&query_cases(&cases, &[], &query, day(2025, 9, 1))), vec!["c"]);
    }

    #[test]
    fn non_matching_text_with_any_status_is_empty() {
        let cases = vec![
            case("a", "One", CaseStatus::Ongoing),
            case("c", "Three", CaseStatus::Court),
        ];
        for status in CaseStatus::ALL {
            let query = CaseQuery {
                text: "no such words".into(),
                status: Some(status),
                adjourn_within_days: 0,
            };
            assert!(query_cases(&cases, &[], &query, day(2025, 9, 1)).is_empty());
        }
    }

    #[test]
    fn text_matches_suit_and_case_number_case_insensitively() {
        let mut c = case("a", "Acme", CaseStatus::Ongoing);
        c.suit_number = "HCT/CON/45".into();
        let cases = vec![c, case("b", "Other", CaseStatus::Ongoing)];
        let by_suit = CaseQuery {
            text: "  hct/con ".into(),
            ..CaseQuery::default()
        };
        assert_eq!(ids(&query_cases(&cases, &[], &by_suit, day(2025, 9, 1))), vec!["a"]);
        let by_number = CaseQuery {
            text: "num-b".into(),
            ..CaseQuery::default()
        };
        assert_eq!(ids(&query_cases(&cases, &[], &by_number, day(2025, 9, 1))), vec!["b"]);
    }

    #[test]
    fn adjournment_window_is_inclusive_of_both_ends() {
        let today = day(2025, 9, 1);
        let cases = vec![
            case("a", "A", CaseStatus::Court),
            case("b", "B", CaseStatus::Court),
            case("c", "C", CaseStatus::Court),
            case("d", "D", CaseStatus::Court),
        ];
        let updates = vec![
            update("1", "a", day(2025, 8, 1), Some(today)),
            update("2", "b", day(2025, 8, 1), Some(day(2025, 9, 8))),
            update("3", "c", day(2025, 8, 1), Some(day(2025, 9, 9))),
            update("4", "d", day(2025, 8, 1), Some(day(2025, 8, 31))),
        ];
        let query = CaseQuery {
            adjourn_within_days: 7,
            ..CaseQuery::default()
        };
        assert_eq!(ids(&query_cases(&cases, &updates, &query, today)), vec!["a", "b"]);
    }

    #[test]
    fn status_counts_cover_every_status() {
        let cases = vec![
            case("a", "A", CaseStatus::Ongoing),
            case("b", "B", CaseStatus::Ongoing),
            case("c", "C", CaseStatus::KeptInView),
        ];
        let counts = status_counts(&cases);
        assert_eq!(counts.len(), 5);
        assert_eq!(counts[&CaseStatus::Ongoing], 2);
        assert_eq!(counts[&CaseStatus::KeptInView], 1);
        assert_eq!(counts[&CaseStatus::Completed], 0);
    }

    #[test]
    fn history_without_selection_is_empty() {
        let updates = vec![update("1", "a", day(2025, 9, 1), None)];
        assert!(query_history(&updates, &[], &HistoryQuery::default()).is_empty());
    }

    #[test]
    fn history_sorts_both_directions_and_bounds_dates() {
        let updates = vec![
            update("mid", "a", day(2025, 9, 5), None),
            update("old", "a", day(2025, 9, 1), None),
            update("new", "a", day(2025, 9, 9), None),
            update("other", "b", day(2025, 9, 3), None),
        ];
        let mut query = HistoryQuery {
            case_id: Some("a".into()),
            sort: HistorySort::Newest,
            ..HistoryQuery::default()
        };
        let newest: Vec<_> = query_history(&updates, &[], &query).iter().map(|u| u.id.as_str()).collect();
        assert_eq!(newest, vec!["new", "mid", "old"]);

        query.sort = HistorySort::Oldest;
        query.from = Some(day(2025, 9, 5));
        query.to = Some(day(2025, 9, 9));
        let bounded: Vec<_> = query_history(&updates, &[], &query).iter().map(|u| u.id.as_str()).collect();
        assert_eq!(bounded, vec!["mid", "new"]);
    }

    #[test]
    fn history_text_matches_creator_display_name() {
        let users = vec![User {
            id: "u_lawyer".into(),
            name: "Lawyer Jane".into(),
            role: Role::Lawyer,
        }];
        let mut noted = update("2", "a", day(2025, 9, 2), None);
        noted.created_by = "u_other".into();
        noted.notes = "Bail set".into();
        let updates = vec![update("1", "a", day(2025, 9, 1), None), noted];

        let by_name = HistoryQuery {
            case_id: Some("a".into()),
            text: "JANE".into(),
            ..HistoryQuery::default()
        };
        let hits: Vec<_> = query_history(&updates, &users, &by_name).iter().map(|u| u.id.as_str()).collect();
        assert_eq!(hits, vec!["1"]);

        let by_note = HistoryQuery {
            case_id: Some("a".into()),
            text: "bail".into(),
            ..HistoryQuery::default()
        };
        let hits: Vec<_> = query_history(&updates, &users, &by_note).iter().map(|u| u.id.as_str()).collect();
        assert_eq!(hits, vec!["2"]);
    }

    #[test]
    fn history_sort_parse_defaults_to_oldest() {
        assert_eq!("newest".parse::<HistorySort>().unwrap(), HistorySort::Newest);
        assert_eq!("oldest".parse::<HistorySort>().unwrap(), HistorySort::Oldest);
        assert_eq!("sideways".parse::<HistorySort>().unwrap(), HistorySort::Oldest);
    }

    #[test]
    fn dashboard_sorts_by_next_adjournment_with_missing_last() {
        let today = day(2025, 9, 1);
        let cases = vec![
            case("a", "A", CaseStatus::Ongoing),
            case("b", "B", CaseStatus::Completed),
            case("c", "C", CaseStatus::KeptInView),
        ];
        let updates = vec![
            update("1", "b", day(2025, 8, 1), Some(day(2025, 9, 20))),
            update("2", "c", day(2025, 8, 2), Some(day(2025, 9, 3))),
            update("3", "c", day(2025, 8, 3), Some(day(2025, 8, 30))),
        ];
        let rows = dashboard_rows(&cases, &updates, today, DashboardSort::Adjournment);
        let order: Vec<_> = rows.iter().map(|r| r.case_id.as_str()).collect();
        assert_eq!(order, vec!["c", "b", "a"]);
        assert_eq!(rows[0].next_adjournment, Some(day(2025, 9, 3)));
        assert_eq!(rows[0].last_update, Some(day(2025, 8, 3)));

        let by_status = dashboard_rows(&cases, &updates, today, DashboardSort::Status);
        let order: Vec<_> = by_status.iter().map(|r| r.case_id.as_str()).collect();
        assert_eq!(order, vec!["a", "c", "b"]);
    }

    #[test]
    fn imminent_alerts_count_days_left() {
        let today = day(2025, 9, 1);
        let cases = vec![case("a", "A", CaseStatus::Court), case("b", "B", CaseStatus::Court)];
        let updates = vec![
            update("1", "a", day(2025, 8, 1), Some(day(2025, 9, 2))),
            update("2", "b", day(2025, 8, 1), Some(day(2025, 9, 10))),
        ];
        let rows = dashboard_rows(&cases, &updates, today, DashboardSort::Adjournment);
        let alerts = imminent_alerts(&rows, today, 3);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].to_string(), "Case NUM-a: 2025-09-02 (1 day left)");
    }

    #[test]
    fn dashboard_sort_rejects_unknown_key() {
        assert!("priority".parse::<DashboardSort>().is_err());
        assert_eq!("status".parse::<DashboardSort>().unwrap(), DashboardSort::Status);
    }
}
