//! Review tasks linked to video positions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::{iso_now, IdSource};
use crate::error::{ClientError, Result};

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Badge color
    pub fn color(self) -> &'static str {
        match self {
            Self::Low => "#4ECDC4",
            Self::Medium => "#FFEAA7",
            Self::High => "#FF6B6B",
        }
    }

    /// Sort rank, most urgent first
    fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Priority {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(ClientError::validation(format!("Unknown priority: {other}"))),
        }
    }
}

/// Priority filter of the task list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

impl PriorityFilter {
    fn accepts(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Only(p) => task.priority == p,
        }
    }
}

/// A to-do item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
    /// Linked playback time in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

/// Form contents for creating or editing a task
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    fn validated(&self) -> Result<(String, String)> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ClientError::validation("Task title is required"));
        }
        Ok((title.to_string(), self.description.trim().to_string()))
    }
}

/// Task list of the review screen
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskBoard {
    tasks: Vec<Task>,
}

impl TaskBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| ClientError::NotFound(format!("task {id}")))
    }

    /// New task linked to `current_time`
    pub fn add(&mut self, draft: &TaskDraft, current_time: f64, ids: &IdSource) -> Result<&Task> {
        let (title, description) = draft.validated()?;
        let now = iso_now();
        let task = Task {
            id: ids.next().to_string(),
            title,
            description,
            priority: draft.priority,
            completed: false,
            timestamp: Some(current_time),
            created_at: now.clone(),
            updated_at: now,
        };
        debug!(id = %task.id, priority = %task.priority, "Task added");
        self.tasks.push(task);
        self.tasks
            .last()
            .ok_or_else(|| ClientError::Storage("task list empty after push".to_string()))
    }

    /// Overwrite title, description and priority
    pub fn update(&mut self, id: &str, draft: &TaskDraft) -> Result<&Task> {
        let (title, description) = draft.validated()?;
        let task = self.get_mut(id)?;
        task.title = title;
        task.description = description;
        task.priority = draft.priority;
        task.updated_at = iso_now();
        Ok(task)
    }

    /// Flip completion. Returns the new flag.
    pub fn toggle(&mut self, id: &str) -> Result<bool> {
        let task = self.get_mut(id)?;
        task.completed = !task.completed;
        task.updated_at = iso_now();
        Ok(task.completed)
    }

    pub fn delete(&mut self, id: &str) -> Result<Task> {
        let pos = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| ClientError::NotFound(format!("task {id}")))?;
        Ok(self.tasks.remove(pos))
    }

    pub fn filtered(&self, filter: PriorityFilter) -> Vec<&Task> {
        self.tasks.iter().filter(|t| filter.accepts(t)).collect()
    }

    /// Display order: open before done, then by urgency, then newest first
    pub fn sorted(&self, filter: PriorityFilter) -> Vec<&Task> {
        let mut tasks = self.filtered(filter);
        tasks.sort_by(|a, b| {
            a.completed
                .cmp(&b.completed)
                .then(a.priority.rank().cmp(&b.priority.rank()))
                .then(b.created_at.cmp(&a.created_at))
                .then(b.id.len().cmp(&a.id.len()).then(b.id.cmp(&a.id)))
        });
        tasks
    }

    /// Open tasks, shown as a badge
    pub fn pending_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.completed).count()
    }
}
