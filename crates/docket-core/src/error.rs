use std::fmt;

/// Machine-readable error codes surfaced by the CLI and in JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotInitialized,
    ConfigParseError,
    CaseNotFound,
    UserNotFound,
    ValidationFailed,
    DuplicateCaseNumber,
    NoCaseSelected,
    PermissionDenied,
    StoreReadFailed,
    StoreWriteFailed,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotInitialized => "E1001",
            Self::ConfigParseError => "E1002",
            Self::CaseNotFound => "E2001",
            Self::UserNotFound => "E2002",
            Self::ValidationFailed => "E2003",
            Self::DuplicateCaseNumber => "E2004",
            Self::NoCaseSelected => "E2005",
            Self::PermissionDenied => "E4001",
            Self::StoreReadFailed => "E5001",
            Self::StoreWriteFailed => "E5002",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotInitialized => "Project not initialized",
            Self::ConfigParseError => "Config file parse error",
            Self::CaseNotFound => "Case not found",
            Self::UserNotFound => "User not found",
            Self::ValidationFailed => "Validation failed",
            Self::DuplicateCaseNumber => "Case number already in use",
            Self::NoCaseSelected => "No case selected",
            Self::PermissionDenied => "Reminder permission denied",
            Self::StoreReadFailed => "Store read failed",
            Self::StoreWriteFailed => "Store write failed",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NotInitialized => Some("Run `dk init` to initialize this directory."),
            Self::ConfigParseError => Some("Fix syntax in .docket/config.toml and retry."),
            Self::CaseNotFound => Some("Run `dk list` to see known case ids and numbers."),
            Self::UserNotFound => Some("Run `dk users list` to see known user ids."),
            Self::ValidationFailed => Some("Correct the itemized fields and submit again."),
            Self::DuplicateCaseNumber => Some("Choose a case number that is not already tracked."),
            Self::NoCaseSelected => Some("Select a case before opening the update form."),
            Self::PermissionDenied => {
                Some("Reminders stay off; `dk upcoming` still lists adjournments.")
            }
            Self::StoreReadFailed => None,
            Self::StoreWriteFailed => Some("Check disk space and write permissions."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
