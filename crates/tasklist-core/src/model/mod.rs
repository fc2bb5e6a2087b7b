pub mod task;

pub use task::{Filter, MAX_TITLE_CHARS, ParseFilterError, Task, TaskId, normalize_title};
