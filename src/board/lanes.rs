use crate::models::{Issue, IssueStatus};

/// One status column of the board.
#[derive(Debug, Clone, PartialEq)]
pub struct Lane<'a> {
    pub status: IssueStatus,
    pub issues: Vec<&'a Issue>,
}

impl<'a> Lane<'a> {
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'a Issue> {
        self.issues.get(index).copied()
    }

    pub fn position(&self, issue_id: u64) -> Option<usize> {
        self.issues.iter().position(|issue| issue.id == issue_id)
    }
}

/// The lane an issue is rendered in. A pure function of its status.
pub fn lane_of(issue: &Issue) -> usize {
    issue.status.index()
}

/// Splits the collection into the three lanes, keeping collection order
/// within each lane.
pub fn partition(issues: &[Issue]) -> [Lane<'_>; 3] {
    let mut lanes = IssueStatus::ALL.map(|status| Lane {
        status,
        issues: Vec::new(),
    });
    for issue in issues {
        lanes[lane_of(issue)].issues.push(issue);
    }
    lanes
}
