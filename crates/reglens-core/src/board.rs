//! Task board: a non-durable three-column state machine.
//!
//! ```text
//! To-Do ◀──▶ In Progress ◀──▶ Completed
//!   ▲                             ▲
//!   └─────────────────────────────┘
//! ```
//!
//! Any status may move to any other status directly. The board is an
//! in-memory cache over the last fetched tasks: edits live in an override
//! map and nothing is written back to the backend.
//!
//! Eviction policy: [`TaskBoard::reload`] drops every override and replaces
//! the baseline, so a reload always reverts to the fetched state.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CoreError;
use crate::model::GapAnalysis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "To-Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Completed")]
    Completed,
}

impl TaskStatus {
    /// Column order on the board.
    pub const ALL: [TaskStatus; 3] = [Self::ToDo, Self::InProgress, Self::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ToDo => "To-Do",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }

    /// Map backend status text onto a column. Unrecognised text is `ToDo`.
    pub fn from_backend(status: &str) -> Self {
        match normalize(status).as_str() {
            "completed" => Self::Completed,
            "in progress" => Self::InProgress,
            _ => Self::ToDo,
        }
    }

    /// Strict parse for user input: `to-do`, `in progress`, `completed` and
    /// their dash/underscore spellings.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match normalize(s).as_str() {
            "to do" | "todo" => Ok(Self::ToDo),
            "in progress" => Ok(Self::InProgress),
            "completed" | "done" => Ok(Self::Completed),
            _ => Err(CoreError::UnknownStatus(s.to_string())),
        }
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase().replace(['-', '_'], " ")
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A task card as fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardTask {
    pub id: String,
    pub title: String,
    pub status: TaskStatus,
    pub priority: Option<String>,
    pub assignee: Option<String>,
    pub due: Option<String>,
}

impl BoardTask {
    /// Collect the tasks embedded in gap analyses.
    ///
    /// Task ids are only unique within one analysis, so every card id is
    /// qualified as `<analysis id>/<task id>`. Tasks without an id get
    /// `<analysis id>/task-<n>`. A qualified id that still repeats gets a
    /// `#<n>` suffix, so card ids are unique across the board.
    pub fn from_analyses(analyses: &[GapAnalysis]) -> Vec<BoardTask> {
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut tasks = Vec::new();
        for a in analyses {
            for (i, t) in a.tasks.iter().enumerate() {
                let local = t
                    .id
                    .as_deref()
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("task-{}", i + 1));
                let base = format!("{}/{}", a.id, local);
                let n = seen.entry(base.clone()).or_insert(0);
                *n += 1;
                let id = if *n == 1 { base } else { format!("{base}#{n}") };
                tasks.push(BoardTask {
                    id,
                    title: t.title.clone(),
                    status: TaskStatus::from_backend(&t.status),
                    priority: t.priority.clone(),
                    assignee: t.assigned_to.clone(),
                    due: t.due_date.clone(),
                });
            }
        }
        tasks
    }
}

/// Fetched tasks plus local, unsaved status edits.
///
/// Edits are keyed by baseline position, so each card carries its own
/// status even if two fetched cards share an id.
#[derive(Debug, Clone, Default)]
pub struct TaskBoard {
    baseline: Vec<BoardTask>,
    overrides: HashMap<usize, TaskStatus>,
}

impl TaskBoard {
    pub fn new(tasks: Vec<BoardTask>) -> Self {
        Self {
            baseline: tasks,
            overrides: HashMap::new(),
        }
    }

    pub fn from_analyses(analyses: &[GapAnalysis]) -> Self {
        Self::new(BoardTask::from_analyses(analyses))
    }

    /// Move the card `id` to `to`, returning its previous status.
    pub fn move_task(&mut self, id: &str, to: TaskStatus) -> Result<TaskStatus, CoreError> {
        let idx = self
            .position(id)
            .ok_or_else(|| CoreError::UnknownTask(id.to_string()))?;
        let from = self.current(idx);
        debug!(task = id, %from, %to, "task moved");
        self.overrides.insert(idx, to);
        Ok(from)
    }

    /// Current status including unsaved edits.
    pub fn status_of(&self, id: &str) -> Option<TaskStatus> {
        self.position(id).map(|idx| self.current(idx))
    }

    /// Tasks currently in `status`, in fetch order.
    pub fn column(&self, status: TaskStatus) -> Vec<&BoardTask> {
        self.baseline
            .iter()
            .enumerate()
            .filter(|(idx, _)| self.current(*idx) == status)
            .map(|(_, t)| t)
            .collect()
    }

    pub fn columns(&self) -> Vec<(TaskStatus, Vec<&BoardTask>)> {
        TaskStatus::ALL
            .into_iter()
            .map(|s| (s, self.column(s)))
            .collect()
    }

    /// Replace the baseline with freshly fetched tasks, discarding all edits.
    pub fn reload(&mut self, tasks: Vec<BoardTask>) {
        if !self.overrides.is_empty() {
            debug!(discarded = self.overrides.len(), "task board edits evicted on reload");
        }
        self.baseline = tasks;
        self.overrides.clear();
    }

    /// Whether any status differs from the fetched state.
    pub fn is_dirty(&self) -> bool {
        self.overrides
            .iter()
            .any(|(idx, s)| self.baseline[*idx].status != *s)
    }

    pub fn len(&self) -> usize {
        self.baseline.len()
    }

    pub fn is_empty(&self) -> bool {
        self.baseline.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.baseline.iter().position(|t| t.id == id)
    }

    fn current(&self, idx: usize) -> TaskStatus {
        self.overrides
            .get(&idx)
            .copied()
            .unwrap_or(self.baseline[idx].status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GapTask;

    fn task(id: &str, status: TaskStatus) -> BoardTask {
        BoardTask {
            id: id.into(),
            title: format!("Task {id}"),
            status,
            priority: None,
            assignee: None,
            due: None,
        }
    }

    fn board() -> TaskBoard {
        TaskBoard::new(vec![
            task("t1", TaskStatus::ToDo),
            task("t2", TaskStatus::InProgress),
            task("t3", TaskStatus::Completed),
        ])
    }

    #[test]
    fn todo_can_jump_straight_to_completed() {
        let mut b = board();
        let prev = b.move_task("t1", TaskStatus::Completed).unwrap();
        assert_eq!(prev, TaskStatus::ToDo);
        assert_eq!(b.status_of("t1"), Some(TaskStatus::Completed));
    }

    #[test]
    fn completed_can_move_back() {
        let mut b = board();
        b.move_task("t3", TaskStatus::ToDo).unwrap();
        assert_eq!(b.status_of("t3"), Some(TaskStatus::ToDo));
    }

    #[test]
    fn reload_reverts_edits() {
        let mut b = board();
        let fetched = vec![
            task("t1", TaskStatus::ToDo),
            task("t2", TaskStatus::InProgress),
            task("t3", TaskStatus::Completed),
        ];
        b.move_task("t1", TaskStatus::Completed).unwrap();
        b.move_task("t2", TaskStatus::ToDo).unwrap();
        assert!(b.is_dirty());

        b.reload(fetched);
        assert!(!b.is_dirty());
        assert_eq!(b.status_of("t1"), Some(TaskStatus::ToDo));
        assert_eq!(b.status_of("t2"), Some(TaskStatus::InProgress));
    }

    #[test]
    fn unknown_task_is_an_error() {
        let mut b = board();
        let err = b.move_task("nope", TaskStatus::Completed).unwrap_err();
        assert!(matches!(err, CoreError::UnknownTask(id) if id == "nope"));
    }

    #[test]
    fn columns_follow_edits() {
        let mut b = board();
        b.move_task("t2", TaskStatus::Completed).unwrap();
        let cols = b.columns();
        assert_eq!(cols[0].0, TaskStatus::ToDo);
        assert_eq!(cols[1].1.len(), 0);
        let done: Vec<&str> = cols[2].1.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(done, ["t2", "t3"]);
    }

    #[test]
    fn moving_back_to_original_is_not_dirty() {
        let mut b = board();
        b.move_task("t1", TaskStatus::InProgress).unwrap();
        b.move_task("t1", TaskStatus::ToDo).unwrap();
        assert!(!b.is_dirty());
    }

    #[test]
    fn backend_status_mapping() {
        assert_eq!(TaskStatus::from_backend("completed"), TaskStatus::Completed);
        assert_eq!(TaskStatus::from_backend("Completed"), TaskStatus::Completed);
        assert_eq!(TaskStatus::from_backend("In-Progress"), TaskStatus::InProgress);
        assert_eq!(TaskStatus::from_backend("in_progress"), TaskStatus::InProgress);
        assert_eq!(TaskStatus::from_backend("Pending"), TaskStatus::ToDo);
        assert_eq!(TaskStatus::from_backend(""), TaskStatus::ToDo);
    }

    #[test]
    fn strict_parse_rejects_unknown() {
        assert_eq!(TaskStatus::parse("To-Do").unwrap(), TaskStatus::ToDo);
        assert_eq!(TaskStatus::parse("in_progress").unwrap(), TaskStatus::InProgress);
        assert!(TaskStatus::parse("blocked").is_err());
    }

    #[test]
    fn tasks_from_analyses_get_stable_ids() {
        let analyses = vec![GapAnalysis {
            id: "ga_1".into(),
            tasks: vec![
                GapTask {
                    id: Some("task_9".into()),
                    status: "pending".into(),
                    ..Default::default()
                },
                GapTask {
                    status: "completed".into(),
                    assigned_to: Some("CFO".into()),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }];
        let tasks = BoardTask::from_analyses(&analyses);
        assert_eq!(tasks[0].id, "ga_1/task_9");
        assert_eq!(tasks[1].id, "ga_1/task-2");
        assert_eq!(tasks[1].status, TaskStatus::Completed);
        assert_eq!(tasks[1].assignee.as_deref(), Some("CFO"));

        let b = TaskBoard::from_analyses(&analyses);
        assert_eq!(b.len(), 2);
        assert_eq!(b.column(TaskStatus::ToDo).len(), 1);
    }

    fn analysis_with_task(id: &str, task_id: &str, status: &str) -> GapAnalysis {
        GapAnalysis {
            id: id.into(),
            tasks: vec![GapTask {
                id: Some(task_id.into()),
                status: status.into(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn shared_task_ids_across_analyses_stay_separate() {
        let analyses = vec![
            analysis_with_task("ga_1", "task_1", "pending"),
            analysis_with_task("ga_2", "task_1", "completed"),
        ];
        let mut b = TaskBoard::from_analyses(&analyses);
        assert_eq!(b.column(TaskStatus::ToDo).len(), 1);
        assert_eq!(b.column(TaskStatus::Completed).len(), 1);

        b.move_task("ga_1/task_1", TaskStatus::InProgress).unwrap();
        assert_eq!(b.column(TaskStatus::InProgress).len(), 1);
        assert_eq!(b.status_of("ga_2/task_1"), Some(TaskStatus::Completed));
    }

    #[test]
    fn repeated_ids_within_one_analysis_are_suffixed() {
        let analyses = vec![GapAnalysis {
            id: "ga_1".into(),
            tasks: vec![
                GapTask {
                    id: Some("task_1".into()),
                    ..Default::default()
                },
                GapTask {
                    id: Some("task_1".into()),
                    status: "completed".into(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }];
        let tasks = BoardTask::from_analyses(&analyses);
        assert_eq!(tasks[0].id, "ga_1/task_1");
        assert_eq!(tasks[1].id, "ga_1/task_1#2");
    }

    #[test]
    fn duplicate_baseline_ids_keep_their_own_columns() {
        let b = TaskBoard::new(vec![
            task("dup", TaskStatus::ToDo),
            task("dup", TaskStatus::Completed),
        ]);
        assert_eq!(b.column(TaskStatus::ToDo).len(), 1);
        assert_eq!(b.column(TaskStatus::Completed).len(), 1);
    }
}
