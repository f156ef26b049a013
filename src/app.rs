use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::warn;

use crate::store::TaskStore;
use crate::task::{Priority, Task, TaskId};

/// Which widget receives key input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Title,
    Description,
    DueDate,
    Priority,
    Pending,
    Completed,
}

impl Focus {
    const ORDER: [Self; 6] = [
        Self::Title,
        Self::Description,
        Self::DueDate,
        Self::Priority,
        Self::Pending,
        Self::Completed,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    pub const fn is_form(self) -> bool {
        matches!(
            self,
            Self::Title | Self::Description | Self::DueDate | Self::Priority
        )
    }
}

/// Inputs of the "Add Task" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub priority: Priority,
}

impl TaskForm {
    fn clear(&mut self) {
        *self = Self::default();
    }

    fn field_mut(&mut self, focus: Focus) -> Option<&mut String> {
        match focus {
            Focus::Title => Some(&mut self.title),
            Focus::Description => Some(&mut self.description),
            Focus::DueDate => Some(&mut self.due_date),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Continue,
    Quit,
}

/// Presentation state: owns the store and everything the UI needs besides it.
#[derive(Debug)]
pub struct App {
    store: TaskStore,
    pub form: TaskForm,
    focus: Focus,
    pending_selected: usize,
    completed_selected: usize,
    error: Option<String>,
}

impl App {
    pub fn new(store: TaskStore) -> Self {
        Self {
            store,
            form: TaskForm::default(),
            focus: Focus::Title,
            pending_selected: 0,
            completed_selected: 0,
            error: None,
        }
    }

    pub const fn store(&self) -> &TaskStore {
        &self.store
    }

    pub const fn focus(&self) -> Focus {
        self.focus
    }

    pub const fn pending_selected(&self) -> usize {
        self.pending_selected
    }

    pub const fn completed_selected(&self) -> usize {
        self.completed_selected
    }

    /// Message of the blocking error popup, if one is open.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        if key.kind != KeyEventKind::Press {
            return AppAction::Continue;
        }
        // Popup swallows the key that dismisses it.
        if self.error.take().is_some() {
            return AppAction::Continue;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return AppAction::Quit
            }
            KeyCode::Esc => return AppAction::Quit,
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return AppAction::Continue;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                return AppAction::Continue;
            }
            _ => {}
        }

        match self.focus {
            Focus::Title | Focus::Description | Focus::DueDate => self.edit_field(key),
            Focus::Priority => match key.code {
                KeyCode::Left | KeyCode::Up => self.form.priority = self.form.priority.cycle_prev(),
                KeyCode::Right | KeyCode::Down | KeyCode::Char(' ') => {
                    self.form.priority = self.form.priority.cycle_next();
                }
                KeyCode::Enter => self.submit_form(),
                _ => {}
            },
            Focus::Pending => match key.code {
                KeyCode::Char('q') => return AppAction::Quit,
                KeyCode::Up => self.pending_selected = self.pending_selected.saturating_sub(1),
                KeyCode::Down => {
                    let len = self.store.pending().count();
                    if self.pending_selected + 1 < len {
                        self.pending_selected += 1;
                    }
                }
                KeyCode::Enter | KeyCode::Char('c') => self.complete_selected(),
                _ => {}
            },
            Focus::Completed => match key.code {
                KeyCode::Char('q') => return AppAction::Quit,
                KeyCode::Up => self.completed_selected = self.completed_selected.saturating_sub(1),
                KeyCode::Down => {
                    let len = self.store.completed().count();
                    if self.completed_selected + 1 < len {
                        self.completed_selected += 1;
                    }
                }
                _ => {}
            },
        }
        AppAction::Continue
    }

    fn edit_field(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.submit_form(),
            KeyCode::Backspace => {
                if let Some(field) = self.form.field_mut(self.focus) {
                    field.pop();
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(field) = self.form.field_mut(self.focus) {
                    field.push(c);
                }
            }
            _ => {}
        }
    }

    /// "Add Task". Clears the form on success; on failure keeps the inputs
    /// and opens the error popup.
    pub fn submit_form(&mut self) {
        let form = &self.form;
        match self
            .store
            .add_task(&form.title, &form.description, &form.due_date, form.priority)
        {
            Ok(_) => {
                self.form.clear();
                self.focus = Focus::Title;
            }
            Err(err) => {
                warn!(error = %err, "add task rejected");
                self.error = Some(err.to_string());
            }
        }
    }

    /// Id of the highlighted row in the Pending list.
    pub fn selected_pending_id(&self) -> Option<TaskId> {
        self.store.pending().nth(self.pending_selected).map(Task::id)
    }

    /// "Complete" on the highlighted pending task.
    pub fn complete_selected(&mut self) {
        let Some(id) = self.selected_pending_id() else {
            return;
        };
        if let Err(err) = self.store.complete_task(id) {
            warn!(task = %id, error = %err, "complete task failed");
            self.error = Some(err.to_string());
            return;
        }
        let remaining = self.store.pending().count();
        self.pending_selected = self.pending_selected.min(remaining.saturating_sub(1));
    }
}
