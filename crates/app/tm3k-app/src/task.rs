//! In-memory task list editing.

use futures_signals::signal::{Mutable, Signal};
use futures_signals::signal_vec::{MutableVec, SignalVec, SignalVecExt};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;
use uuid::Uuid;

/// Identifier of a task, unique for the lifetime of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(Uuid);

impl TaskId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
}

impl Task {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            id: TaskId::generate(),
            text: text.into(),
            completed: false,
        }
    }

    fn toggled(&self) -> Self {
        Self {
            completed: !self.completed,
            ..self.clone()
        }
    }
}

/// Sample records a fresh page starts with.
pub fn seed_tasks() -> Vec<Task> {
    vec![
        Task::new("Figure out why this UI is so bad"),
        Task::new("Refactor this entire application"),
        Task {
            completed: true,
            ..Task::new("Have a coffee break")
        },
    ]
}

/// Ordered task list plus the text of the entry being typed.
///
/// Every operation is a synchronous transform of local state; invalid input
/// is ignored rather than reported.
pub struct TaskEditor {
    tasks: MutableVec<Task>,
    draft: Mutable<String>,
}

impl TaskEditor {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks: MutableVec::new_with_values(tasks),
            draft: Mutable::new(String::new()),
        }
    }

    pub fn seeded() -> Self {
        Self::new(seed_tasks())
    }

    /// Appends a task and clears the draft. Blank text is ignored.
    pub fn add(&self, text: &str) -> Option<TaskId> {
        if text.trim().is_empty() {
            return None;
        }

        let task = Task::new(text);
        let id = task.id;
        self.tasks.lock_mut().push_cloned(task);
        self.draft.set(String::new());
        debug!("Added task {}", id);
        Some(id)
    }

    /// Adds whatever is currently in the draft.
    pub fn submit(&self) -> Option<TaskId> {
        let text = self.draft.get_cloned();
        self.add(&text)
    }

    pub fn toggle(&self, id: TaskId) {
        let mut tasks = self.tasks.lock_mut();
        if let Some(index) = tasks.iter().position(|task| task.id == id) {
            let toggled = tasks[index].toggled();
            tasks.set_cloned(index, toggled);
        }
    }

    pub fn remove(&self, id: TaskId) {
        let mut tasks = self.tasks.lock_mut();
        if let Some(index) = tasks.iter().position(|task| task.id == id) {
            tasks.remove(index);
            debug!("Removed task {}", id);
        }
    }

    pub fn set_draft<S: Into<String>>(&self, text: S) {
        self.draft.set(text.into());
    }

    pub fn draft(&self) -> String {
        self.draft.get_cloned()
    }

    pub fn snapshot(&self) -> Vec<Task> {
        self.tasks.lock_ref().to_vec()
    }

    pub fn get(&self, id: TaskId) -> Option<Task> {
        self.tasks.lock_ref().iter().find(|task| task.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.tasks.lock_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn tasks_signal_vec(&self) -> impl SignalVec<Item = Task> + use<> {
        self.tasks.signal_vec_cloned()
    }

    pub fn count_signal(&self) -> impl Signal<Item = usize> + use<> {
        self.tasks.signal_vec_cloned().len()
    }

    pub fn draft_signal(&self) -> impl Signal<Item = String> + use<> {
        self.draft.signal_cloned()
    }
}

impl Default for TaskEditor {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn seeded_list_has_fixed_sample_records() {
        let editor = TaskEditor::seeded();
        let tasks = editor.snapshot();

        assert_eq!(tasks.len(), 3);
        assert_eq!(
            tasks.iter().map(|t| t.completed).collect::<Vec<_>>(),
            vec![false, false, true]
        );
        assert_eq!(tasks[2].text, "Have a coffee break");
    }

    #[test]
    fn add_appends_incomplete_task_and_clears_draft() {
        let editor = TaskEditor::seeded();
        editor.set_draft("  Buy milk ");

        let id = editor.add("  Buy milk ").unwrap();
        let last = editor.snapshot().pop().unwrap();

        assert_eq!(editor.len(), 4);
        assert_eq!(last.id, id);
        assert_eq!(last.text, "  Buy milk ");
        assert!(!last.completed);
        assert_eq!(editor.draft(), "");
    }

    #[test]
    fn blank_text_is_ignored() {
        let editor = TaskEditor::seeded();
        let before = editor.snapshot();

        for blank in ["", " ", "\t\n", "   \u{3000}"] {
            editor.set_draft(blank);
            assert_eq!(editor.add(blank), None);
            assert_eq!(editor.submit(), None);
        }

        assert_eq!(editor.snapshot(), before);
    }

    #[test]
    fn submit_behaves_like_add() {
        let editor = TaskEditor::new(Vec::new());
        editor.set_draft("Walk the dog");

        let id = editor.submit().unwrap();

        assert_eq!(editor.get(id).unwrap().text, "Walk the dog");
        assert_eq!(editor.draft(), "");
    }

    #[test]
    fn toggle_twice_restores_flag_and_keeps_order() {
        let editor = TaskEditor::seeded();
        let before = editor.snapshot();
        let id = before[1].id;

        editor.toggle(id);
        assert!(editor.get(id).unwrap().completed);
        assert_eq!(
            editor.snapshot().iter().map(|t| t.id).collect::<Vec<_>>(),
            before.iter().map(|t| t.id).collect::<Vec<_>>()
        );

        editor.toggle(id);
        assert_eq!(editor.snapshot(), before);
    }

    #[test]
    fn unknown_ids_are_no_ops() {
        let editor = TaskEditor::seeded();
        let before = editor.snapshot();
        let stranger = TaskId::generate();

        editor.toggle(stranger);
        editor.remove(stranger);

        assert_eq!(editor.snapshot(), before);
    }

    #[test]
    fn remove_drops_exactly_one_record() {
        let editor = TaskEditor::seeded();
        let before = editor.snapshot();

        editor.remove(before[0].id);

        let after = editor.snapshot();
        assert_eq!(after.len(), 2);
        assert!(after.iter().all(|t| t.id != before[0].id));
        assert_eq!(after, before[1..].to_vec());
    }

    #[test]
    fn generated_ids_do_not_collide() {
        let editor = TaskEditor::new(Vec::new());
        let ids: HashSet<TaskId> = (0..10_000)
            .map(|n| editor.add(&format!("task {n}")).unwrap())
            .collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn sample_scenario() {
        let editor = TaskEditor::seeded();
        let seeded = editor.snapshot();

        editor.add("Buy milk");
        let tasks = editor.snapshot();
        assert_eq!(tasks.len(), 4);
        assert_eq!(tasks[3].text, "Buy milk");

        editor.toggle(seeded[0].id);
        assert!(editor.get(seeded[0].id).unwrap().completed);

        editor.remove(seeded[2].id);
        let texts: Vec<String> = editor.snapshot().into_iter().map(|t| t.text).collect();
        assert_eq!(
            texts,
            vec![
                "Figure out why this UI is so bad".to_string(),
                "Refactor this entire application".to_string(),
                "Buy milk".to_string(),
            ]
        );
    }
}
