//! Task Entity
//!
//! A task as mirrored from the remote `tasks` collection, plus the
//! payloads used to create and patch one.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::ValidationError;

/// Opaque document id assigned by the store on creation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A task in the local mirror
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    /// `None` while the server timestamp of a local write is still pending
    pub created_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(id: impl Into<TaskId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            completed: false,
            created_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

/// A document as delivered by the store bridge in a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDocument {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    /// Milliseconds since the epoch; null while the server timestamp is pending
    #[serde(default)]
    pub created_at: Option<f64>,
}

impl From<TaskDocument> for Task {
    fn from(doc: TaskDocument) -> Self {
        Self {
            id: TaskId(doc.id),
            title: doc.title,
            description: doc.description.filter(|d| !d.is_empty()),
            completed: doc.completed,
            created_at: doc
                .created_at
                .and_then(|ms| DateTime::from_timestamp_millis(ms as i64)),
        }
    }
}

/// Validated payload for a create request
///
/// Only constructible through [`NewTask::new`], so a task with a blank
/// title never reaches the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    title: String,
    description: Option<String>,
}

impl NewTask {
    /// Trim both fields and reject a blank title
    pub fn new(title: &str, description: &str) -> Result<Self, ValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let description = description.trim();
        Ok(Self {
            title: title.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Partial update; unset fields are left untouched by the store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskPatch {
    /// Patch that flips the completion flag of `task`
    pub fn toggle(task: &Task) -> Self {
        Self {
            completed: Some(!task.completed),
        }
    }

    pub fn apply(&self, task: &mut Task) {
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    Ascending,
    Descending,
}

/// Ordering requested from the store for a subscription
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSpec {
    pub field: String,
    pub direction: OrderDirection,
}

impl OrderSpec {
    /// Newest first
    pub fn created_desc() -> Self {
        Self {
            field: "createdAt".to_string(),
            direction: OrderDirection::Descending,
        }
    }

    pub fn is_descending(&self) -> bool {
        self.direction == OrderDirection::Descending
    }
}

impl Default for OrderSpec {
    fn default() -> Self {
        Self::created_desc()
    }
}

/// Aggregate counts derived from the mirror
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.completed).count();
        Self {
            total,
            completed,
            pending: total - completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_trims_fields() {
        let task = NewTask::new("  Prepare slides ", "  notes  ").unwrap();
        assert_eq!(task.title(), "Prepare slides");
        assert_eq!(task.description(), Some("notes"));
    }

    #[test]
    fn test_new_task_rejects_blank_title() {
        assert_eq!(NewTask::new("", "details"), Err(ValidationError::EmptyTitle));
        assert_eq!(NewTask::new(" \t\n ", ""), Err(ValidationError::EmptyTitle));
    }

    #[test]
    fn test_new_task_blank_description_is_none() {
        let task = NewTask::new("Title", "   ").unwrap();
        assert_eq!(task.description(), None);
    }

    #[test]
    fn test_stats_scenario() {
        let tasks = vec![
            Task::new("1", "A"),
            Task::new("2", "B").with_completed(true),
        ];
        let stats = TaskStats::from_tasks(&tasks);
        assert_eq!(stats, TaskStats { total: 2, completed: 1, pending: 1 });
    }

    #[test]
    fn test_stats_empty() {
        assert_eq!(TaskStats::from_tasks(&[]), TaskStats::default());
    }

    #[test]
    fn test_toggle_patch_flips_only_completed() {
        let mut task = Task::new("1", "A").with_description("d");
        let patch = TaskPatch::toggle(&task);
        patch.apply(&mut task);
        assert!(task.completed);
        assert_eq!(task.title, "A");
        assert_eq!(task.description.as_deref(), Some("d"));
    }

    #[test]
    fn test_patch_serializes_only_set_fields() {
        let json = serde_json::to_string(&TaskPatch::default()).unwrap();
        assert_eq!(json, "{}");
        let json = serde_json::to_string(&TaskPatch { completed: Some(true) }).unwrap();
        assert_eq!(json, r#"{"completed":true}"#);
    }

    #[test]
    fn test_document_mapping() {
        let doc: TaskDocument = serde_json::from_str(
            r#"{"id":"abc","title":"Write report","description":"","completed":true,"createdAt":1700000000000}"#,
        )
        .unwrap();
        let task = Task::from(doc);
        assert_eq!(task.id.as_str(), "abc");
        assert_eq!(task.description, None);
        assert!(task.completed);
        assert_eq!(task.created_at.map(|t| t.timestamp()), Some(1_700_000_000));
    }

    #[test]
    fn test_document_pending_timestamp() {
        let doc: TaskDocument =
            serde_json::from_str(r#"{"id":"x","title":"T","createdAt":null}"#).unwrap();
        let task = Task::from(doc);
        assert_eq!(task.created_at, None);
        assert!(!task.completed);
    }
}
