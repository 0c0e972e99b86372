use crate::error::{KanbanError, KanbanResult};
use crate::models::{Issue, IssueId, IssueStatus};

/// Draggable view of a single issue.
#[derive(Debug, Clone, Copy)]
pub struct IssueCard<'a> {
    issue: &'a Issue,
}

impl<'a> IssueCard<'a> {
    pub fn new(issue: &'a Issue) -> Self {
        Self { issue }
    }

    pub fn issue(&self) -> &'a Issue {
        self.issue
    }

    /// Identity and current status, handed to the drag source when the card
    /// is picked up.
    pub fn drag(&self) -> DragPayload {
        DragPayload {
            issue_id: self.issue.id,
            status: self.issue.status,
        }
    }
}

/// What a grabbed card carries while it is being moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragPayload {
    pub issue_id: IssueId,
    pub status: IssueStatus,
}

impl DragPayload {
    /// The `issueId` transfer string.
    pub fn encode(&self) -> String {
        self.issue_id.to_string()
    }

    pub fn decode_issue_id(data: &str) -> KanbanResult<IssueId> {
        data.trim()
            .parse()
            .map_err(|_| KanbanError::InvalidInput(format!("'{}' is not an issue id", data)))
    }

    pub fn drop_on(self, target: IssueStatus) -> DropEvent {
        DropEvent {
            issue_id: self.issue_id,
            origin: Some(self.status),
            target,
        }
    }
}

/// A card released over a lane.
///
/// `origin` is the pre-drag status. It is informational only: the move never
/// depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropEvent {
    pub issue_id: IssueId,
    pub origin: Option<IssueStatus>,
    pub target: IssueStatus,
}

impl DropEvent {
    /// Builds a drop from raw transfer data, as delivered by a drag source
    /// that only carries the id.
    pub fn from_transfer(data: &str, target: IssueStatus) -> KanbanResult<Self> {
        Ok(Self {
            issue_id: DragPayload::decode_issue_id(data)?,
            origin: None,
            target,
        })
    }

    pub fn is_same_lane(&self) -> bool {
        self.origin == Some(self.target)
    }
}
