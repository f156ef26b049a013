use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::{debug, info, warn};

use crate::error::{Result, TaskError};
use crate::task::{parse_due_date, Priority, Status, Task, TaskId, TaskRecord};

/// Default task file, relative to the working directory.
pub const DEFAULT_TASK_FILE: &str = "tasks.json";

/// Aggregate counts shown next to the task lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Statistics {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriorityCounts {
    pub pending: usize,
    pub completed: usize,
}

impl PriorityCounts {
    pub const fn total(self) -> usize {
        self.pending + self.completed
    }
}

/// Pending/completed tallies per priority, in `Priority::ALL` order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChartCounts {
    counts: [PriorityCounts; 3],
}

impl ChartCounts {
    pub const fn get(&self, priority: Priority) -> PriorityCounts {
        self.counts[priority.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Priority, PriorityCounts)> + '_ {
        Priority::ALL.into_iter().map(|p| (p, self.get(p)))
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|c| c.total()).sum()
    }
}

/// Ordered task collection backed by a JSON file.
///
/// Every successful mutation rewrites the whole file. When the write fails the
/// mutation is rolled back so memory and disk agree.
#[derive(Debug)]
pub struct TaskStore {
    path: PathBuf,
    tasks: Vec<Task>,
    next_id: u64,
}

impl TaskStore {
    /// Restore the collection from `path`. A missing file yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let mut store = Self {
            path: path.into(),
            tasks: Vec::new(),
            next_id: 1,
        };
        store.load_from_file()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All tasks in creation order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == id)
    }

    pub fn position_of(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id() == id)
    }

    pub fn pending(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| t.status() == Status::Pending)
    }

    pub fn completed(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| t.status() == Status::Completed)
    }

    /// Append a new pending task and persist.
    ///
    /// Fails with [`TaskError::InvalidDueDate`] without touching the
    /// collection when `due_date_text` is not `YYYY-MM-DD`.
    pub fn add_task(
        &mut self,
        title: &str,
        description: &str,
        due_date_text: &str,
        priority: Priority,
    ) -> Result<TaskId> {
        let due_date = parse_due_date(due_date_text)?;
        let id = self.allocate_id();
        self.tasks
            .push(Task::new(id, title, description, due_date, priority));

        if let Err(err) = self.save_to_file() {
            warn!(task = %id, error = %err, "save failed, dropping new task");
            self.tasks.pop();
            return Err(err);
        }
        info!(task = %id, %priority, %due_date, "task added");
        Ok(id)
    }

    /// Mark the task completed and persist. Completing a completed task is a no-op.
    pub fn complete_task(&mut self, id: TaskId) -> Result<()> {
        let position = self.position_of(id).ok_or(TaskError::TaskNotFound(id))?;
        let previous = self.tasks[position].complete();
        if previous == Status::Completed {
            debug!(task = %id, "task already completed");
            return Ok(());
        }

        if let Err(err) = self.save_to_file() {
            warn!(task = %id, error = %err, "save failed, reverting completion");
            self.tasks[position].restore_status(previous);
            return Err(err);
        }
        info!(task = %id, "task completed");
        Ok(())
    }

    /// Positional form of [`complete_task`](Self::complete_task).
    pub fn complete_at(&mut self, position: usize) -> Result<TaskId> {
        let id = self
            .tasks
            .get(position)
            .map(Task::id)
            .ok_or(TaskError::PositionOutOfRange {
                position,
                len: self.tasks.len(),
            })?;
        self.complete_task(id)?;
        Ok(id)
    }

    pub fn statistics(&self) -> Statistics {
        let total = self.tasks.len();
        let pending = self.pending().count();
        Statistics {
            total,
            pending,
            completed: total - pending,
        }
    }

    pub fn chart_counts(&self) -> ChartCounts {
        let mut chart = ChartCounts::default();
        for task in &self.tasks {
            let slot = &mut chart.counts[task.priority.index()];
            match task.status() {
                Status::Pending => slot.pending += 1,
                Status::Completed => slot.completed += 1,
            }
        }
        chart
    }

    /// Overwrite the task file with the full collection.
    pub fn save_to_file(&self) -> Result<()> {
        let records: Vec<TaskRecord> = self.tasks.iter().map(Task::to_record).collect();
        let data = serde_json::to_string_pretty(&records)?;
        fs::write(&self.path, data).map_err(|source| TaskError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), count = records.len(), "tasks saved");
        Ok(())
    }

    /// Replace the in-memory collection with the file contents.
    pub fn load_from_file(&mut self) -> Result<()> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no task file yet, starting empty");
                self.tasks.clear();
                return Ok(());
            }
            Err(source) => {
                return Err(TaskError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let records: Vec<TaskRecord> =
            serde_json::from_str(&data).map_err(|source| TaskError::CorruptData {
                path: self.path.clone(),
                source,
            })?;

        let mut tasks = Vec::with_capacity(records.len());
        for record in records {
            let id = self.allocate_id();
            tasks.push(Task::from_record(id, record));
        }
        self.tasks = tasks;
        info!(path = %self.path.display(), count = self.tasks.len(), "tasks restored");
        Ok(())
    }

    fn allocate_id(&mut self) -> TaskId {
        let id = TaskId::new(self.next_id);
        self.next_id += 1;
        id
    }
}
