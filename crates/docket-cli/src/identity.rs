//! Current-user resolution for CLI commands.
//!
//! The resolution chain: `--user` flag > `DOCKET_USER` env > project session
//! (`dk users switch`) > user config `user` > first stored user.

use docket_core::error::ErrorCode;
use docket_core::model::User;
use std::env;

/// Errors from user resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityError {
    /// Human-readable description.
    pub message: String,
    pub code: ErrorCode,
}

impl std::fmt::Display for IdentityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for IdentityError {}

/// Environment reader trait for dependency injection in tests.
trait EnvReader {
    fn get(&self, key: &str) -> Option<String>;
}

struct RealEnv;

impl EnvReader for RealEnv {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok().filter(|v| !v.trim().is_empty())
    }
}

/// Stored defaults that sit below the flag and env in the chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct Defaults<'a> {
    pub session_user: Option<&'a str>,
    pub config_user: Option<&'a str>,
}

fn resolve_user_with<'u>(
    cli_flag: Option<&str>,
    defaults: Defaults<'_>,
    users: &'u [User],
    env: &dyn EnvReader,
) -> Result<&'u User, IdentityError> {
    let requested = cli_flag
        .filter(|flag| !flag.trim().is_empty())
        .map(str::to_string)
        .or_else(|| env.get("DOCKET_USER"))
        .or_else(|| defaults.session_user.map(str::to_string))
        .or_else(|| defaults.config_user.map(str::to_string));

    match requested {
        Some(id) => users
            .iter()
            .find(|user| user.id == id.trim())
            .ok_or_else(|| IdentityError {
                message: format!("user '{}' not found", id.trim()),
                code: ErrorCode::UserNotFound,
            }),
        None => users.first().ok_or_else(|| IdentityError {
            message: "no users are stored".to_string(),
            code: ErrorCode::UserNotFound,
        }),
    }
}

/// Resolve the acting user from flag, environment, and stored defaults.
///
/// # Errors
///
/// Returns an error if an explicitly requested id names no stored user, or
/// if there are no users at all.
pub fn resolve_user<'u>(
    cli_flag: Option<&str>,
    defaults: Defaults<'_>,
    users: &'u [User],
) -> Result<&'u User, IdentityError> {
    resolve_user_with(cli_flag, defaults, users, &RealEnv)
}
