use super::case::{ParseEnumError, normalize};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Office roles. Informational only; nothing is gated on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Admin,
    HeadOfChamber,
    Principal,
    Lawyer,
    Paralegal,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::HeadOfChamber => "head-of-chamber",
            Self::Principal => "principal",
            Self::Lawyer => "lawyer",
            Self::Paralegal => "paralegal",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "admin" => Ok(Self::Admin),
            "head-of-chamber" => Ok(Self::HeadOfChamber),
            "principal" => Ok(Self::Principal),
            "lawyer" => Ok(Self::Lawyer),
            "paralegal" => Ok(Self::Paralegal),
            _ => Err(ParseEnumError {
                expected: "role",
                got: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: Role,
}

impl User {
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.role)
    }
}

/// Display name for `user_id`, or `Unknown` when no such user exists.
#[must_use]
pub fn display_name_for(users: &[User], user_id: &str) -> String {
    users
        .iter()
        .find(|user| user.id == user_id)
        .map_or_else(|| "Unknown".to_string(), User::display_name)
}
