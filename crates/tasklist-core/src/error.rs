use std::fmt;

/// Machine-readable error codes for scripted callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    EmptyTitle,
    TitleTooLong,
    InvalidFilter,
    InvalidTaskId,
    InvalidScriptLine,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::EmptyTitle => "E2001",
            Self::TitleTooLong => "E2002",
            Self::InvalidFilter => "E2003",
            Self::InvalidTaskId => "E2004",
            Self::InvalidScriptLine => "E4001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::EmptyTitle => "Task title cannot be empty",
            Self::TitleTooLong => "Task title is too long",
            Self::InvalidFilter => "Invalid filter value",
            Self::InvalidTaskId => "Invalid task ID",
            Self::InvalidScriptLine => "Invalid script line",
        }
    }

    /// Optional remediation hint.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in tasklist/config.toml and retry."),
            Self::EmptyTitle => Some("Type at least one non-whitespace character."),
            Self::TitleTooLong => Some("Shorten the title to 100 characters or fewer."),
            Self::InvalidFilter => Some("Use one of: all, pending, completed."),
            Self::InvalidTaskId => Some("Task IDs are positive integers, e.g. `toggle 3`."),
            Self::InvalidScriptLine => {
                Some("Valid commands: add, toggle, delete, filter, list, stats.")
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Rejected input to [`TaskStore::add`](crate::store::TaskStore::add).
///
/// Both variants are recoverable and leave the store untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Task title cannot be empty")]
    EmptyTitle,

    #[error("Task title must be at most {max} characters (got {len})")]
    TitleTooLong { len: usize, max: usize },
}

impl ValidationError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyTitle => ErrorCode::EmptyTitle,
            Self::TitleTooLong { .. } => ErrorCode::TitleTooLong,
        }
    }

    #[must_use]
    pub fn suggestion(&self) -> String {
        self.error_code()
            .hint()
            .unwrap_or("Check the input and retry.")
            .to_string()
    }
}
