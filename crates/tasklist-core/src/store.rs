//! In-memory task store.
//!
//! [`TaskStore`] is the single owner of the task collection and the active
//! [`Filter`]. Every mutation goes through `&mut self`, so one operation
//! always completes before any reader observes the collection again.
//!
//! # Ordering
//!
//! New tasks are prepended (most-recent-first). Toggle and delete never
//! reorder the remaining tasks.
//!
//! # Identifiers
//!
//! Ids come from a counter owned by the store. The counter only advances on
//! a successful add, and ids are never handed out twice by one store, even
//! after the task that held them is deleted.

use serde::Serialize;
use tracing::debug;

use crate::error::ValidationError;
use crate::model::{Filter, Task, TaskId, normalize_title};

/// Example tasks used by [`TaskStore::seeded`], oldest first in display order.
const SEED_TASKS: [(&str, bool); 4] = [
    ("Buy groceries", false),
    ("Read a book", true),
    ("Exercise for 30 minutes", false),
    ("Call mom", true),
];

/// Counts derived from the current collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Stats {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
}

/// Owned copy of the store state, suitable for rendering or serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub filter: Filter,
    pub tasks: Vec<Task>,
    pub visible: Vec<Task>,
    pub stats: Stats,
}

/// One user gesture, expressed as a store operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Add(String),
    Toggle(TaskId),
    Delete(TaskId),
    SetFilter(Filter),
}

/// Result of a successfully applied [`Action`].
///
/// `Toggled(None)` and `Deleted(None)` mean the id was unknown and nothing
/// changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Added(Task),
    Toggled(Option<Task>),
    Deleted(Option<Task>),
    FilterChanged(Filter),
}

impl Outcome {
    /// Short status line describing what happened.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Added(_) => "Task added".to_string(),
            Self::Toggled(Some(task)) if task.completed() => "Task completed!".to_string(),
            Self::Toggled(Some(_)) => "Task marked as pending".to_string(),
            Self::Deleted(Some(_)) => "Task deleted".to_string(),
            Self::Toggled(None) | Self::Deleted(None) => "No such task; nothing changed".to_string(),
            Self::FilterChanged(filter) => format!("Showing {}", filter.label()),
        }
    }

    /// The task affected by this outcome, if any.
    #[must_use]
    pub const fn task(&self) -> Option<&Task> {
        match self {
            Self::Added(task) | Self::Toggled(Some(task)) | Self::Deleted(Some(task)) => {
                Some(task)
            }
            Self::Toggled(None) | Self::Deleted(None) | Self::FilterChanged(_) => None,
        }
    }

    /// Whether the collection or filter actually changed.
    #[must_use]
    pub const fn changed(&self) -> bool {
        !matches!(self, Self::Toggled(None) | Self::Deleted(None))
    }
}

/// The authoritative task collection plus the active filter.
#[derive(Debug, Clone)]
pub struct TaskStore {
    tasks: Vec<Task>,
    filter: Filter,
    next_id: u64,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    /// An empty store; the first task gets id 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tasks: Vec::new(),
            filter: Filter::All,
            next_id: 1,
        }
    }

    /// A store pre-populated with the example tasks.
    #[must_use]
    pub fn seeded() -> Self {
        let mut store = Self::new();
        let tasks: Vec<Task> = SEED_TASKS
            .iter()
            .map(|&(title, completed)| {
                let id = store.allocate_id();
                Task::with_state(id, title.to_string(), completed)
            })
            .collect();
        store.tasks = tasks;
        store
    }

    fn allocate_id(&mut self) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        id
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id() == id)
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Validate `raw_title`, then prepend a new pending task.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the trimmed title is empty or
    /// longer than [`MAX_TITLE_CHARS`](crate::model::MAX_TITLE_CHARS). The
    /// store is unchanged in that case.
    pub fn add(&mut self, raw_title: &str) -> Result<Task, ValidationError> {
        let title = normalize_title(raw_title)?;
        let task = Task::new(self.allocate_id(), title);
        debug!(id = %task.id(), "task added");
        self.tasks.insert(0, task.clone());
        Ok(task)
    }

    /// Flip the completion flag of `id`. Unknown ids are ignored.
    pub fn toggle(&mut self, id: TaskId) -> Option<Task> {
        let idx = self.position(id)?;
        let task = &mut self.tasks[idx];
        task.toggle();
        debug!(id = %id, completed = task.completed(), "task toggled");
        Some(task.clone())
    }

    /// Remove `id` permanently. Unknown ids are ignored.
    pub fn delete(&mut self, id: TaskId) -> Option<Task> {
        let idx = self.position(id)?;
        let task = self.tasks.remove(idx);
        debug!(id = %id, "task deleted");
        Some(task)
    }

    pub fn set_filter(&mut self, filter: Filter) {
        debug!(%filter, "filter changed");
        self.filter = filter;
    }

    /// Run one [`Action`] to completion.
    ///
    /// # Errors
    ///
    /// Only [`Action::Add`] can fail; see [`TaskStore::add`].
    pub fn apply(&mut self, action: Action) -> Result<Outcome, ValidationError> {
        let outcome = match action {
            Action::Add(title) => Outcome::Added(self.add(&title)?),
            Action::Toggle(id) => Outcome::Toggled(self.toggle(id)),
            Action::Delete(id) => Outcome::Deleted(self.delete(id)),
            Action::SetFilter(filter) => {
                self.set_filter(filter);
                Outcome::FilterChanged(filter)
            }
        };
        Ok(outcome)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// The full collection, most recent first.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    #[must_use]
    pub const fn filter(&self) -> Filter {
        self.filter
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks matching the active filter, in collection order.
    #[must_use]
    pub fn filtered_view(&self) -> Vec<&Task> {
        self.tasks_matching(self.filter)
    }

    /// Tasks matching `filter`, in collection order.
    #[must_use]
    pub fn tasks_matching(&self, filter: Filter) -> Vec<&Task> {
        self.tasks.iter().filter(|task| filter.matches(task)).collect()
    }

    #[must_use]
    pub fn stats(&self) -> Stats {
        let completed = self.tasks.iter().filter(|task| task.completed()).count();
        Stats {
            total: self.tasks.len(),
            pending: self.tasks.len() - completed,
            completed,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            filter: self.filter,
            tasks: self.tasks.clone(),
            visible: self.filtered_view().into_iter().cloned().collect(),
            stats: self.stats(),
        }
    }
}
