use std::sync::Arc;

use kanban_cli::board::{partition, Board, DropEvent, IssueCard};
use kanban_cli::client::{Failure, InMemoryGateway, Operation};
use kanban_cli::{Issue, IssueDraft, IssuePriority, IssueStatus, IssueStore, KanbanError, Reconciliation};

fn issue(id: u64, status: IssueStatus, project_id: u64) -> Issue {
    Issue {
        id,
        title: format!("Card {}", id),
        description: None,
        status,
        priority: IssuePriority::Medium,
        assignee_id: None,
        project_id,
    }
}

async fn board_for(issues: Vec<Issue>, project_id: u64) -> (Arc<InMemoryGateway>, IssueStore) {
    let gateway = Arc::new(InMemoryGateway::with_issues(issues));
    let mut store = IssueStore::new(gateway.clone());
    store.fetch_issues(project_id).await.unwrap();
    (gateway, store)
}

fn lane_ids(store: &IssueStore, status: IssueStatus) -> Vec<u64> {
    store
        .lanes()
        .iter()
        .find(|lane| lane.status == status)
        .map(|lane| lane.issues.iter().map(|issue| issue.id).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_drag_to_next_lane_shows_immediately() {
    let (gateway, mut store) = board_for(
        vec![issue(1, IssueStatus::ToDo, 1), issue(2, IssueStatus::Done, 1)],
        1,
    )
    .await;
    let gate = gateway.hold_status_update(1, IssueStatus::InProgress);

    let payload = IssueCard::new(store.issue(1).unwrap()).drag();
    Board::drop(&mut store, payload.drop_on(IssueStatus::InProgress)).unwrap();

    assert_eq!(lane_ids(&store, IssueStatus::ToDo), Vec::<u64>::new());
    assert_eq!(lane_ids(&store, IssueStatus::InProgress), vec![1]);
    assert_eq!(lane_ids(&store, IssueStatus::Done), vec![2]);

    gate.succeed();
    store.settle().await;
    assert_eq!(gateway.stored_issue(1).unwrap().status, IssueStatus::InProgress);
}

#[tokio::test]
async fn test_rejected_drop_returns_card_to_its_lane() {
    let (gateway, mut store) = board_for(vec![issue(1, IssueStatus::ToDo, 1)], 1).await;
    gateway.fail(Operation::UpdateIssueStatus, Failure::network());

    let event = DropEvent::from_transfer("1", IssueStatus::Done).unwrap();
    Board::drop(&mut store, event).unwrap();
    assert_eq!(lane_ids(&store, IssueStatus::Done), vec![1]);

    store.settle().await;

    assert_eq!(lane_ids(&store, IssueStatus::ToDo), vec![1]);
    assert!(lane_ids(&store, IssueStatus::Done).is_empty());
    assert!(store.error().is_some_and(|message| !message.is_empty()));
}

#[tokio::test]
async fn test_dropping_on_current_lane_is_harmless() {
    let (_gateway, mut store) = board_for(vec![issue(1, IssueStatus::InProgress, 1)], 1).await;

    let payload = IssueCard::new(store.issue(1).unwrap()).drag();
    Board::drop(&mut store, payload.drop_on(IssueStatus::InProgress)).unwrap();
    let applied = store.settle().await;

    assert_eq!(store.issue(1).unwrap().status, IssueStatus::InProgress);
    assert!(store.error().is_none());
    assert!(applied
        .iter()
        .all(|outcome| matches!(outcome, Reconciliation::Confirmed { .. })));
}

#[tokio::test]
async fn test_switching_projects_discards_in_flight_moves() {
    let (gateway, mut store) = board_for(
        vec![
            issue(1, IssueStatus::ToDo, 1),
            issue(2, IssueStatus::ToDo, 1),
            issue(10, IssueStatus::Done, 7),
        ],
        1,
    )
    .await;
    let gate = gateway.hold_status_update(1, IssueStatus::Done);
    store.move_issue(1, IssueStatus::Done).unwrap();

    store.fetch_issues(7).await.unwrap();
    let ids: Vec<u64> = store.issues().iter().map(|issue| issue.id).collect();
    assert_eq!(ids, vec![10]);

    gate.fail(Failure::network());
    let applied = store.settle().await;

    let ids: Vec<u64> = store.issues().iter().map(|issue| issue.id).collect();
    assert_eq!(ids, vec![10]);
    assert!(store.error().is_none());
    assert!(applied
        .iter()
        .all(|outcome| matches!(outcome, Reconciliation::Stale { .. })));
}

#[tokio::test]
async fn test_short_title_never_reaches_gateway() {
    let (gateway, mut store) = board_for(Vec::new(), 1).await;

    let result = store.create_issue(IssueDraft::new(1, "ab")).await;

    assert!(matches!(result, Err(KanbanError::InvalidInput(_))));
    assert_eq!(gateway.call_count(Operation::CreateIssue), 0);
    assert!(store.issues().is_empty());
}

#[tokio::test]
async fn test_rapid_moves_settle_on_latest_target() {
    let (gateway, mut store) = board_for(vec![issue(1, IssueStatus::ToDo, 1)], 1).await;
    let first = gateway.hold_status_update(1, IssueStatus::InProgress);
    let second = gateway.hold_status_update(1, IssueStatus::Done);

    store.move_issue(1, IssueStatus::InProgress).unwrap();
    store.move_issue(1, IssueStatus::Done).unwrap();

    second.succeed();
    first.fail(Failure::network());
    store.settle().await;

    assert_eq!(store.issue(1).unwrap().status, IssueStatus::Done);
}

#[test]
fn test_partition_is_exhaustive_and_disjoint() {
    let issues: Vec<Issue> = (1..=9)
        .map(|id| issue(id, IssueStatus::ALL[(id % 3) as usize], 1))
        .collect();

    let lanes = partition(&issues);
    let total: usize = lanes.iter().map(|lane| lane.len()).sum();
    assert_eq!(total, issues.len());

    for item in &issues {
        let matching = lanes
            .iter()
            .filter(|lane| lane.position(item.id).is_some())
            .count();
        assert_eq!(matching, 1);
    }
}
