//! The kanban board: three status lanes derived from the issue store, and
//! the translation of a drop gesture into a status move.

pub mod card;
pub mod lanes;

pub use card::{DragPayload, DropEvent, IssueCard};
pub use lanes::{lane_of, partition, Lane};

use crate::error::KanbanResult;
use crate::logging::log_debug;
use crate::store::{IssueStore, MoveTicket};

pub struct Board;

impl Board {
    /// Hands a drop to the store as an optimistic move. Any lane-to-lane
    /// transition is accepted, including dropping a card where it already is.
    pub fn drop(store: &mut IssueStore, event: DropEvent) -> KanbanResult<MoveTicket> {
        if event.is_same_lane() {
            log_debug(&format!("Issue {} dropped on its own lane", event.issue_id));
        }
        store.move_issue(event.issue_id, event.target)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::client::{Failure, InMemoryGateway, Operation};
    use crate::models::{Issue, IssuePriority, IssueStatus};

    fn issue(id: u64, status: IssueStatus) -> Issue {
        Issue {
            id,
            title: format!("Issue {}", id),
            description: None,
            status,
            priority: IssuePriority::Medium,
            assignee_id: None,
            project_id: 1,
        }
    }

    async fn board_store() -> (Arc<InMemoryGateway>, IssueStore) {
        let gateway = Arc::new(InMemoryGateway::with_issues(vec![
            issue(1, IssueStatus::ToDo),
            issue(2, IssueStatus::Done),
        ]));
        let mut store = IssueStore::new(gateway.clone());
        store.fetch_issues(1).await.unwrap();
        (gateway, store)
    }

    #[tokio::test]
    async fn test_drop_moves_card_on_next_render() {
        let (gateway, mut store) = board_store().await;
        let _gate = gateway.hold_status_update(1, IssueStatus::InProgress);

        let payload = IssueCard::new(store.issue(1).unwrap()).drag();
        Board::drop(&mut store, payload.drop_on(IssueStatus::InProgress)).unwrap();

        let lanes = store.lanes();
        assert!(lanes[0].is_empty());
        assert_eq!(lanes[1].position(1), Some(0));
        assert_eq!(lanes[2].position(2), Some(0));
    }

    #[tokio::test]
    async fn test_same_lane_drop_is_harmless() {
        let (gateway, mut store) = board_store().await;

        let payload = IssueCard::new(store.issue(2).unwrap()).drag();
        Board::drop(&mut store, payload.drop_on(IssueStatus::Done)).unwrap();
        store.settle().await;

        assert_eq!(store.issue(2).unwrap().status, IssueStatus::Done);
        assert!(store.error().is_none());
        assert_eq!(gateway.call_count(Operation::UpdateIssueStatus), 1);
    }

    #[tokio::test]
    async fn test_drop_ignores_origin() {
        let (_gateway, mut store) = board_store().await;

        // a stale origin must not change what gets moved
        let event = DropEvent {
            issue_id: 1,
            origin: Some(IssueStatus::Done),
            target: IssueStatus::InProgress,
        };
        let ticket = Board::drop(&mut store, event).unwrap();

        assert_eq!(ticket.previous_status, IssueStatus::ToDo);
        store.settle().await;
        assert_eq!(store.issue(1).unwrap().status, IssueStatus::InProgress);
    }

    #[tokio::test]
    async fn test_rejected_drop_rolls_card_back() {
        let (gateway, mut store) = board_store().await;
        gateway.fail(Operation::UpdateIssueStatus, Failure::network());

        let event = DropEvent::from_transfer("1", IssueStatus::Done).unwrap();
        Board::drop(&mut store, event).unwrap();
        assert_eq!(store.lanes()[2].len(), 2);

        store.settle().await;

        let lanes = store.lanes();
        assert_eq!(lanes[0].position(1), Some(0));
        assert_eq!(lanes[2].len(), 1);
        assert!(store.error().is_some());
    }
}
