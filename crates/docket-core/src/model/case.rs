use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The five lifecycle stages a case moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaseStatus {
    PreLitigation,
    Ongoing,
    Court,
    KeptInView,
    Completed,
}

impl CaseStatus {
    pub const ALL: [Self; 5] = [
        Self::PreLitigation,
        Self::Ongoing,
        Self::Court,
        Self::KeptInView,
        Self::Completed,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PreLitigation => "pre-litigation",
            Self::Ongoing => "ongoing",
            Self::Court => "court",
            Self::KeptInView => "kept-in-view",
            Self::Completed => "completed",
        }
    }

    /// Dashboard ordering: ongoing first, then kept-in-view, then completed,
    /// everything else after.
    #[must_use]
    pub const fn dashboard_rank(self) -> u8 {
        match self {
            Self::Ongoing => 1,
            Self::KeptInView => 2,
            Self::Completed => 3,
            Self::PreLitigation | Self::Court => 4,
        }
    }
}

/// A tracked legal matter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    pub id: String,
    pub case_number: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    pub petition_date: NaiveDate,
    #[serde(default)]
    pub suit_number: String,
    #[serde(default)]
    pub assigned_by: String,
    pub status: CaseStatus,
    pub created_at: DateTime<Utc>,
}

impl Case {
    /// Text the case-list search matches against.
    #[must_use]
    pub fn search_haystack(&self) -> String {
        format!("{} {} {}", self.title, self.suit_number, self.case_number).to_lowercase()
    }

    /// Suit number as shown in list rows.
    #[must_use]
    pub fn suit_number_label(&self) -> &str {
        if self.suit_number.is_empty() {
            "No suit #"
        } else {
            &self.suit_number
        }
    }
}

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) fn normalize(input: &str) -> String {
    input.trim().to_ascii_lowercase().replace(['_', ' '], "-")
}

impl FromStr for CaseStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        match normalized.as_str() {
            "pre-litigation" | "prelitigation" => Ok(Self::PreLitigation),
            "ongoing" => Ok(Self::Ongoing),
            "court" => Ok(Self::Court),
            "kept-in-view" | "kiv" => Ok(Self::KeptInView),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseEnumError {
                expected: "status",
                got: s.to_string(),
            }),
        }
    }
}
