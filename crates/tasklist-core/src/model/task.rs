use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::ValidationError;

/// Maximum title length, counted in characters after trimming.
pub const MAX_TITLE_CHARS: usize = 100;

/// Store-assigned task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl TaskId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let raw = raw.strip_prefix('#').unwrap_or(raw);
        raw.parse::<u64>().map(Self)
    }
}

/// One to-do record.
///
/// Tasks are only constructed by the store; outside the crate they are
/// read-only values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    id: TaskId,
    title: String,
    completed: bool,
}

impl Task {
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub const fn completed(&self) -> bool {
        self.completed
    }

    pub(crate) fn toggle(&mut self) {
        self.completed = !self.completed;
    }

    pub(crate) const fn new(id: TaskId, title: String) -> Self {
        Self {
            id,
            title,
            completed: false,
        }
    }

    pub(crate) const fn with_state(id: TaskId, title: String, completed: bool) -> Self {
        Self {
            id,
            title,
            completed,
        }
    }
}

/// Trim a raw title and check it against the length rules.
///
/// # Errors
///
/// [`ValidationError::EmptyTitle`] when nothing but whitespace was given,
/// [`ValidationError::TitleTooLong`] when the trimmed title exceeds
/// [`MAX_TITLE_CHARS`].
pub fn normalize_title(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }

    let len = trimmed.chars().count();
    if len > MAX_TITLE_CHARS {
        return Err(ValidationError::TitleTooLong {
            len,
            max: MAX_TITLE_CHARS,
        });
    }

    Ok(trimmed.to_string())
}

/// View selector over the task collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Pending,
    Completed,
}

impl Filter {
    pub const ALL: [Self; 3] = [Self::All, Self::Pending, Self::Completed];

    const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }

    /// Label shown on filter tabs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All Tasks",
            Self::Pending => "Pending",
            Self::Completed => "Completed",
        }
    }

    #[must_use]
    pub const fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Pending => !task.completed,
            Self::Completed => task.completed,
        }
    }

    /// Heading and hint to show when nothing matches this filter.
    #[must_use]
    pub const fn empty_message(self) -> (&'static str, &'static str) {
        match self {
            Self::All => ("No tasks yet", "Add your first task to get started!"),
            Self::Pending => ("No pending tasks", "Switch to see completed tasks."),
            Self::Completed => ("No completed tasks", "Switch to see pending tasks."),
        }
    }

    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::All => Self::Pending,
            Self::Pending => Self::Completed,
            Self::Completed => Self::All,
        }
    }

    #[must_use]
    pub const fn prev(self) -> Self {
        match self {
            Self::All => Self::Completed,
            Self::Pending => Self::All,
            Self::Completed => Self::Pending,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a [`Filter`] from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid filter: '{got}' (expected all, pending, or completed)")]
pub struct ParseFilterError {
    pub got: String,
}

impl FromStr for Filter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "pending" | "todo" => Ok(Self::Pending),
            "completed" | "done" => Ok(Self::Completed),
            _ => Err(ParseFilterError { got: s.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_title_trims_whitespace() {
        assert_eq!(normalize_title("  Buy milk \t").as_deref(), Ok("Buy milk"));
    }

    #[test]
    fn normalize_title_rejects_blank() {
        assert_eq!(normalize_title(""), Err(ValidationError::EmptyTitle));
        assert_eq!(normalize_title("   \n"), Err(ValidationError::EmptyTitle));
    }

    #[test]
    fn normalize_title_length_boundary() {
        let exact = "a".repeat(MAX_TITLE_CHARS);
        assert_eq!(normalize_title(&exact).as_deref(), Ok(exact.as_str()));

        let over = "a".repeat(MAX_TITLE_CHARS + 1);
        assert_eq!(
            normalize_title(&over),
            Err(ValidationError::TitleTooLong { len: 101, max: 100 })
        );
    }

    #[test]
    fn normalize_title_counts_chars_not_bytes() {
        // 100 two-byte characters is still within the limit.
        let accented = "é".repeat(MAX_TITLE_CHARS);
        assert!(normalize_title(&accented).is_ok());
    }

    #[test]
    fn surrounding_whitespace_does_not_count_toward_length() {
        let padded = format!("   {}   ", "b".repeat(MAX_TITLE_CHARS));
        assert!(normalize_title(&padded).is_ok());
    }

    #[test]
    fn filter_parses_names_and_aliases() {
        assert_eq!("all".parse::<Filter>(), Ok(Filter::All));
        assert_eq!(" Pending ".parse::<Filter>(), Ok(Filter::Pending));
        assert_eq!("todo".parse::<Filter>(), Ok(Filter::Pending));
        assert_eq!("COMPLETED".parse::<Filter>(), Ok(Filter::Completed));
        assert_eq!("done".parse::<Filter>(), Ok(Filter::Completed));
        assert!("archived".parse::<Filter>().is_err());
    }

    #[test]
    fn filter_display_round_trips() {
        for filter in Filter::ALL {
            assert_eq!(filter.to_string().parse::<Filter>(), Ok(filter));
        }
    }

    #[test]
    fn filter_cycles_through_all_variants() {
        let mut filter = Filter::default();
        assert_eq!(filter, Filter::All);
        filter = filter.next();
        assert_eq!(filter, Filter::Pending);
        filter = filter.next();
        assert_eq!(filter, Filter::Completed);
        filter = filter.next();
        assert_eq!(filter, Filter::All);
        assert_eq!(Filter::All.prev(), Filter::Completed);
    }

    #[test]
    fn filter_matches_by_completion() {
        let open = Task::new(TaskId(1), "open".into());
        let done = Task::with_state(TaskId(2), "done".into(), true);
        assert!(Filter::All.matches(&open) && Filter::All.matches(&done));
        assert!(Filter::Pending.matches(&open) && !Filter::Pending.matches(&done));
        assert!(!Filter::Completed.matches(&open) && Filter::Completed.matches(&done));
    }

    #[test]
    fn task_id_parses_with_optional_hash() {
        assert_eq!("42".parse::<TaskId>(), Ok(TaskId(42)));
        assert_eq!("#7".parse::<TaskId>(), Ok(TaskId(7)));
        assert!("abc".parse::<TaskId>().is_err());
        assert!("-1".parse::<TaskId>().is_err());
    }

    #[test]
    fn filter_serializes_lowercase() {
        let json = serde_json::to_string(&Filter::Completed).expect("serialize");
        assert_eq!(json, "\"completed\"");
    }
}
