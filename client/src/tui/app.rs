//! View-local state and key bindings.
//!
//! The view keeps only what is purely presentational: the task input
//! buffer, the selected task type and the cursor in the task list. Every
//! key that means something to the session is translated into an
//! [`Event`] for the runtime.
//!
//! | Key | Normal mode | Editing mode |
//! |-----|-------------|--------------|
//! | `s` | start session | type |
//! | `x` | stop session | type |
//! | `a` | edit new task | type |
//! | `t` / `Tab` | cycle task type | cycle task type (`Tab`) |
//! | `Up`/`Down`, `k`/`j` | move selection | - |
//! | `Space` / `Enter` | toggle selected task | submit task |
//! | `r` | refresh tasks | type |
//! | `q` / `Esc` | quit | leave editing (`Esc`) |
//! | `Ctrl+C` | quit | quit |

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::events::Event;
use crate::types::{TaskList, TaskRecord, TaskType};

/// Whether keys edit the task input or control the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Result of a key press.
#[derive(Debug)]
pub enum Command {
    /// Forward to the runtime.
    Dispatch(Event),
    /// Leave the application.
    Quit,
}

/// Presentational state owned by the view.
#[derive(Debug, Default)]
pub struct ViewState {
    pub mode: InputMode,
    pub input: String,
    pub task_type: TaskType,
    pub selected: usize,
}

impl ViewState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Translates a key press. `tasks` is the list currently on screen.
    pub fn on_key(&mut self, key: KeyEvent, tasks: &TaskList) -> Option<Command> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Command::Quit);
        }

        match self.mode {
            InputMode::Normal => self.on_normal_key(key, tasks),
            InputMode::Editing => self.on_editing_key(key),
        }
    }

    fn on_normal_key(&mut self, key: KeyEvent, tasks: &TaskList) -> Option<Command> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
            KeyCode::Char('s') => Some(Command::Dispatch(Event::UserStart)),
            KeyCode::Char('x') => Some(Command::Dispatch(Event::UserStop)),
            KeyCode::Char('r') => Some(Command::Dispatch(Event::UserRefresh)),
            KeyCode::Char('a') | KeyCode::Char('i') => {
                self.mode = InputMode::Editing;
                None
            }
            KeyCode::Char('t') | KeyCode::Tab => {
                self.task_type = self.task_type.next();
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < tasks.len() {
                    self.selected += 1;
                }
                None
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                let (name, record) = self.selected_task(tasks)?;
                Some(Command::Dispatch(Event::UserSetCompleted {
                    name: name.clone(),
                    completed: !record.completed,
                }))
            }
            _ => None,
        }
    }

    fn on_editing_key(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Esc => {
                self.mode = InputMode::Normal;
                None
            }
            KeyCode::Enter => {
                self.mode = InputMode::Normal;
                Some(Command::Dispatch(Event::UserAddTask {
                    name: self.input.clone(),
                    task_type: self.task_type,
                }))
            }
            KeyCode::Tab => {
                self.task_type = self.task_type.next();
                None
            }
            KeyCode::Backspace => {
                self.input.pop();
                None
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                None
            }
            _ => None,
        }
    }

    /// Empties the task input after a successful create.
    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    /// Keeps the selection inside a list of `len` tasks.
    pub fn clamp_selection(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    /// The task under the cursor.
    #[must_use]
    pub fn selected_task<'a>(&self, tasks: &'a TaskList) -> Option<(&'a String, &'a TaskRecord)> {
        tasks.iter().nth(self.selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn tasks() -> TaskList {
        let mut list = TaskList::new();
        list.insert(
            "Essay".to_string(),
            TaskRecord {
                task_type: TaskType::Writing,
                completed: true,
                completed_in_session: Some(1),
            },
        );
        list.insert(
            "Read Ch.1".to_string(),
            TaskRecord {
                task_type: TaskType::Reading,
                completed: false,
                completed_in_session: None,
            },
        );
        list
    }

    #[test]
    fn session_keys_dispatch_events() {
        let mut view = ViewState::new();
        let list = tasks();
        assert!(matches!(
            view.on_key(key(KeyCode::Char('s')), &list),
            Some(Command::Dispatch(Event::UserStart))
        ));
        assert!(matches!(
            view.on_key(key(KeyCode::Char('x')), &list),
            Some(Command::Dispatch(Event::UserStop))
        ));
        assert!(matches!(
            view.on_key(key(KeyCode::Char('q')), &list),
            Some(Command::Quit)
        ));
    }

    #[test]
    fn ctrl_c_quits_even_while_editing() {
        let mut view = ViewState::new();
        view.mode = InputMode::Editing;
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(matches!(
            view.on_key(ctrl_c, &TaskList::new()),
            Some(Command::Quit)
        ));
    }

    #[test]
    fn typing_and_submitting_a_task() {
        let mut view = ViewState::new();
        let list = TaskList::new();
        view.on_key(key(KeyCode::Char('a')), &list);
        assert_eq!(view.mode, InputMode::Editing);

        for c in "Read Ch.1x".chars() {
            view.on_key(key(KeyCode::Char(c)), &list);
        }
        view.on_key(key(KeyCode::Backspace), &list);
        view.on_key(key(KeyCode::Tab), &list);

        let command = view.on_key(key(KeyCode::Enter), &list);
        let Some(Command::Dispatch(Event::UserAddTask { name, task_type })) = command else {
            panic!("expected UserAddTask");
        };
        assert_eq!(name, "Read Ch.1");
        assert_eq!(task_type, TaskType::Writing);
        assert_eq!(view.mode, InputMode::Normal);

        // The text stays until the create succeeds.
        assert_eq!(view.input, "Read Ch.1");
        view.clear_input();
        assert!(view.input.is_empty());
    }

    #[test]
    fn toggling_selected_task_inverts_completion() {
        let mut view = ViewState::new();
        let list = tasks();

        let command = view.on_key(key(KeyCode::Char(' ')), &list);
        let Some(Command::Dispatch(Event::UserSetCompleted { name, completed })) = command else {
            panic!("expected UserSetCompleted");
        };
        assert_eq!(name, "Essay");
        assert!(!completed);

        view.on_key(key(KeyCode::Down), &list);
        view.on_key(key(KeyCode::Down), &list);
        assert_eq!(view.selected, 1);
        let command = view.on_key(key(KeyCode::Enter), &list);
        assert!(matches!(
            command,
            Some(Command::Dispatch(Event::UserSetCompleted { completed: true, .. }))
        ));
    }

    #[test]
    fn toggle_with_empty_list_does_nothing() {
        let mut view = ViewState::new();
        assert!(view.on_key(key(KeyCode::Char(' ')), &TaskList::new()).is_none());
    }

    #[test]
    fn selection_is_clamped_when_list_shrinks() {
        let mut view = ViewState::new();
        view.selected = 5;
        view.clamp_selection(2);
        assert_eq!(view.selected, 1);
        view.clamp_selection(0);
        assert_eq!(view.selected, 0);
    }
}
