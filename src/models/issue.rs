use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::KanbanError;

pub type IssueId = u64;

/// Workflow status of an issue. Each status is exactly one board lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueStatus {
    #[serde(rename = "To Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Done")]
    Done,
}

impl IssueStatus {
    /// Lane order, left to right.
    pub const ALL: [IssueStatus; 3] = [IssueStatus::ToDo, IssueStatus::InProgress, IssueStatus::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::ToDo => "To Do",
            IssueStatus::InProgress => "In Progress",
            IssueStatus::Done => "Done",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            IssueStatus::ToDo => 0,
            IssueStatus::InProgress => 1,
            IssueStatus::Done => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Lane to the right, saturating at `Done`.
    pub fn next(&self) -> Self {
        Self::from_index(self.index() + 1).unwrap_or(*self)
    }

    /// Lane to the left, saturating at `To Do`.
    pub fn previous(&self) -> Self {
        self.index()
            .checked_sub(1)
            .and_then(Self::from_index)
            .unwrap_or(*self)
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueStatus {
    type Err = KanbanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();

        match normalized.as_str() {
            "todo" | "1" => Ok(IssueStatus::ToDo),
            "inprogress" | "progress" | "doing" | "2" => Ok(IssueStatus::InProgress),
            "done" | "3" => Ok(IssueStatus::Done),
            _ => Err(KanbanError::InvalidInput(format!(
                "unknown status '{}' (expected To Do, In Progress or Done)",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssuePriority {
    Low,
    Medium,
    High,
}

impl IssuePriority {
    pub const ALL: [IssuePriority; 3] = [IssuePriority::Low, IssuePriority::Medium, IssuePriority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssuePriority::Low => "Low",
            IssuePriority::Medium => "Medium",
            IssuePriority::High => "High",
        }
    }
}

impl Default for IssuePriority {
    fn default() -> Self {
        IssuePriority::Medium
    }
}

impl fmt::Display for IssuePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssuePriority {
    type Err = KanbanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" | "1" => Ok(IssuePriority::Low),
            "medium" | "med" | "2" => Ok(IssuePriority::Medium),
            "high" | "3" => Ok(IssuePriority::High),
            _ => Err(KanbanError::InvalidInput(format!(
                "unknown priority '{}' (expected Low, Medium or High)",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: IssueId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: IssueStatus,
    pub priority: IssuePriority,
    #[serde(default)]
    pub assignee_id: Option<u64>,
    pub project_id: u64,
}

/// Issue fields minus the id: the body of create and full-update requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: IssueStatus,
    pub priority: IssuePriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<u64>,
    pub project_id: u64,
}

impl IssueDraft {
    /// Blank form for a new issue, defaulting to `To Do` / `Medium`.
    pub fn new(project_id: u64, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: IssueStatus::ToDo,
            priority: IssuePriority::default(),
            assignee_id: None,
            project_id,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_status(mut self, status: IssueStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: IssuePriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_assignee(mut self, assignee_id: u64) -> Self {
        self.assignee_id = Some(assignee_id);
        self
    }

    /// Materializes the draft under a server-assigned id.
    pub fn into_issue(self, id: IssueId) -> Issue {
        Issue {
            id,
            title: self.title,
            description: self.description,
            status: self.status,
            priority: self.priority,
            assignee_id: self.assignee_id,
            project_id: self.project_id,
        }
    }
}

impl From<&Issue> for IssueDraft {
    fn from(issue: &Issue) -> Self {
        Self {
            title: issue.title.clone(),
            description: issue.description.clone(),
            status: issue.status,
            priority: issue.priority,
            assignee_id: issue.assignee_id,
            project_id: issue.project_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusUpdate {
    pub status: IssueStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_uses_display_names_on_the_wire() {
        let body = serde_json::to_string(&StatusUpdate {
            status: IssueStatus::InProgress,
        })
        .unwrap();
        assert_eq!(body, r#"{"status":"In Progress"}"#);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let json = r#"{"id":1,"title":"Fix","status":"Blocked","priority":"Low","project_id":1}"#;
        assert!(serde_json::from_str::<Issue>(json).is_err());
    }

    #[test]
    fn test_issue_without_optional_fields() {
        let json = r#"{"id":4,"title":"Fix login","status":"Done","priority":"High","project_id":2}"#;
        let issue: Issue = serde_json::from_str(json).unwrap();

        assert_eq!(issue.status, IssueStatus::Done);
        assert!(issue.description.is_none());
        assert!(issue.assignee_id.is_none());
    }

    #[test]
    fn test_status_parses_cli_spellings() {
        assert_eq!("in progress".parse::<IssueStatus>().unwrap(), IssueStatus::InProgress);
        assert_eq!("To-Do".parse::<IssueStatus>().unwrap(), IssueStatus::ToDo);
        assert_eq!("3".parse::<IssueStatus>().unwrap(), IssueStatus::Done);
        assert!("later".parse::<IssueStatus>().is_err());
    }

    #[test]
    fn test_lane_neighbours_saturate() {
        assert_eq!(IssueStatus::ToDo.previous(), IssueStatus::ToDo);
        assert_eq!(IssueStatus::ToDo.next(), IssueStatus::InProgress);
        assert_eq!(IssueStatus::Done.next(), IssueStatus::Done);
    }
}
