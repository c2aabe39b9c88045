// Task store: in-memory collection kept in sync with a key-value snapshot

use crate::filter::{Filter, Visibility};
use crate::kv::KeyValueStore;
use crate::models::{Task, TaskId};
use crate::snapshot;
use crate::status::{Status, StatusBanner};
use eyre::{Context, Result, eyre};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Key the snapshot is stored under unless configured otherwise
pub const DEFAULT_KEY: &str = "tasks";

/// Whether `submit` adds a new task or retitles an existing one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditMode {
    #[default]
    Idle,
    Editing(TaskId),
}

/// What a mutating operation did to the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Added(TaskId),
    Edited(TaskId),
    Toggled(TaskId),
    Removed(TaskId),
    Unchanged,
}

impl Change {
    /// Status message announced for this change
    ///
    /// Toggles stay silent.
    pub fn status(self) -> Option<Status> {
        match self {
            Change::Added(_) => Some(Status::Added),
            Change::Edited(_) => Some(Status::Edited),
            Change::Removed(_) => Some(Status::Deleted),
            Change::Toggled(_) | Change::Unchanged => None,
        }
    }
}

/// Result of reading the stored snapshot at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Snapshot decoded; holds the number of tasks restored
    Restored(usize),
    /// Nothing stored under the key yet
    Missing,
    /// Backend error or unparsable snapshot; collection left untouched
    Failed,
}

/// Owns the task collection and writes it through to a backend
///
/// Every mutation builds the next collection, writes the full snapshot, and
/// only then replaces the in-memory state. A failed write returns `Err` and
/// leaves the store exactly as it was.
pub struct TaskStore<K: KeyValueStore> {
    backend: K,
    key: String,
    tasks: Vec<Task>,
    edit: EditMode,
    draft: String,
    filter: Filter,
    /// `None` once every id has been handed out
    next_id: Option<TaskId>,
    banner: StatusBanner,
}

impl<K: KeyValueStore> TaskStore<K> {
    /// Create an empty store; call `load` to pull in the stored snapshot
    pub fn new(backend: K) -> Self {
        Self {
            backend,
            key: DEFAULT_KEY.to_string(),
            tasks: Vec::new(),
            edit: EditMode::Idle,
            draft: String::new(),
            filter: Filter::default(),
            next_id: Some(TaskId::new(1)),
            banner: StatusBanner::default(),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_status_ttl(mut self, ttl: Duration) -> Self {
        self.banner = StatusBanner::new(ttl);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &K {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut K {
        &mut self.backend
    }

    pub fn into_backend(self) -> K {
        self.backend
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Replace the collection with the stored snapshot, if one can be read
    ///
    /// Errors are logged rather than returned; on failure the current
    /// collection is kept.
    pub fn load(&mut self) -> LoadOutcome {
        match self.read_snapshot() {
            Ok(Some(tasks)) => {
                let count = tasks.len();
                self.reseed(&tasks);
                self.tasks = tasks;
                info!(key = %self.key, count, "Loaded tasks");
                LoadOutcome::Restored(count)
            }
            Ok(None) => {
                debug!(key = %self.key, "No stored snapshot");
                LoadOutcome::Missing
            }
            Err(e) => {
                warn!(key = %self.key, error = ?e, "Failed to load tasks, keeping current list");
                LoadOutcome::Failed
            }
        }
    }

    fn read_snapshot(&self) -> Result<Option<Vec<Task>>> {
        match self.backend.get(&self.key).context("Failed to read snapshot")? {
            Some(blob) => snapshot::decode(&blob).map(Some),
            None => Ok(None),
        }
    }

    /// Write `tasks` in full, then adopt them as the current collection
    fn commit(&mut self, tasks: Vec<Task>, change: Change) -> Result<Change> {
        let blob = snapshot::encode(&tasks)?;
        self.backend
            .set(&self.key, &blob)
            .wrap_err_with(|| format!("Failed to persist tasks under key {}", self.key))?;

        self.tasks = tasks;
        if let Some(status) = change.status() {
            self.banner.post(status, Instant::now());
        }

        debug!(?change, count = self.tasks.len(), "Committed tasks");
        Ok(change)
    }

    fn reseed(&mut self, tasks: &[Task]) {
        if let Some(max) = tasks.iter().map(|t| t.id).max() {
            self.next_id = match (self.next_id, max.next()) {
                (Some(current), Some(after_max)) => Some(current.max(after_max)),
                _ => None,
            };
        }
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Add a task, or retitle the edit target when editing
    ///
    /// Text that is empty after trimming is ignored. Accepted text is stored
    /// as given.
    pub fn submit(&mut self, text: &str) -> Result<Change> {
        if text.trim().is_empty() {
            debug!("submit: ignoring empty text");
            return Ok(Change::Unchanged);
        }

        let change = match self.edit {
            EditMode::Editing(id) => {
                let mut tasks = self.tasks.clone();
                let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
                    warn!(%id, "Edit target no longer exists, leaving edit mode");
                    self.edit = EditMode::Idle;
                    self.draft.clear();
                    return Ok(Change::Unchanged);
                };
                task.title = text.to_string();

                let change = self.commit(tasks, Change::Edited(id))?;
                self.edit = EditMode::Idle;
                change
            }
            EditMode::Idle => {
                let Some(id) = self.next_id else {
                    return Err(eyre!("Task id space exhausted"));
                };
                let mut tasks = self.tasks.clone();
                tasks.push(Task::new(id, text));

                let change = self.commit(tasks, Change::Added(id))?;
                self.next_id = id.next();
                change
            }
        };

        self.draft.clear();
        Ok(change)
    }

    /// Flip the done flag of a task
    pub fn toggle_done(&mut self, id: TaskId) -> Result<Change> {
        let Some(index) = self.position(id) else {
            debug!(%id, "toggle_done: no such task");
            return Ok(Change::Unchanged);
        };

        let mut tasks = self.tasks.clone();
        tasks[index].toggle();
        self.commit(tasks, Change::Toggled(id))
    }

    /// Delete a task
    ///
    /// Removing the task under edit also leaves edit mode.
    pub fn remove(&mut self, id: TaskId) -> Result<Change> {
        let Some(index) = self.position(id) else {
            debug!(%id, "remove: no such task");
            return Ok(Change::Unchanged);
        };

        let mut tasks = self.tasks.clone();
        tasks.remove(index);
        let change = self.commit(tasks, Change::Removed(id))?;

        if self.edit == EditMode::Editing(id) {
            self.edit = EditMode::Idle;
            self.draft.clear();
        }

        Ok(change)
    }

    /// Enter edit mode for `id`, seeding the draft with its current title
    pub fn begin_edit(&mut self, id: TaskId, title: &str) {
        self.edit = EditMode::Editing(id);
        self.draft = title.to_string();
    }

    /// Leave edit mode without changing anything
    pub fn cancel_edit(&mut self) {
        self.edit = EditMode::Idle;
        self.draft.clear();
    }

    // ========================================================================
    // Presentation state
    // ========================================================================

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn edit_mode(&self) -> EditMode {
        self.edit
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.edit, EditMode::Editing(_))
    }

    /// Pending input text
    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.filter.query = query.into();
    }

    pub fn set_visibility(&mut self, visibility: Visibility) {
        self.filter.visibility = visibility;
    }

    /// Tasks matching the current filter, most recent first
    pub fn visible(&self) -> Vec<&Task> {
        let mut view = self.filter.apply(&self.tasks);
        view.reverse();
        view
    }

    /// Status message to display right now
    pub fn status(&self) -> Option<Status> {
        self.status_at(Instant::now())
    }

    pub fn status_at(&self, now: Instant) -> Option<Status> {
        self.banner.current(now)
    }
}
