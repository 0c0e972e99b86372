//! Request/response contract between the stores and the remote API.
//!
//! The stores only ever see these traits, so tests can swap the HTTP client
//! for [`InMemoryGateway`](super::memory::InMemoryGateway).

use async_trait::async_trait;

use crate::error::KanbanResult;
use crate::models::{
    AuthResponse, Issue, IssueDraft, IssueId, IssueStatus, LoginData, Project, ProjectDraft,
    ProjectId, SignupData, User,
};

#[async_trait]
pub trait IssueGateway: Send + Sync {
    /// All issues of a project, in server order.
    async fn list_issues(&self, project_id: ProjectId) -> KanbanResult<Vec<Issue>>;

    async fn get_issue(&self, issue_id: IssueId) -> KanbanResult<Issue>;

    async fn create_issue(&self, draft: &IssueDraft) -> KanbanResult<Issue>;

    /// Full replacement of an issue's fields.
    async fn update_issue(&self, issue_id: IssueId, draft: &IssueDraft) -> KanbanResult<Issue>;

    /// Status-only patch used by board moves. Success carries no payload.
    async fn update_issue_status(&self, issue_id: IssueId, status: IssueStatus) -> KanbanResult<()>;

    async fn delete_issue(&self, issue_id: IssueId) -> KanbanResult<()>;
}

#[async_trait]
pub trait ProjectGateway: Send + Sync {
    async fn list_projects(&self) -> KanbanResult<Vec<Project>>;

    async fn get_project(&self, project_id: ProjectId) -> KanbanResult<Project>;

    async fn create_project(&self, draft: &ProjectDraft) -> KanbanResult<Project>;

    async fn update_project(&self, project_id: ProjectId, draft: &ProjectDraft) -> KanbanResult<Project>;

    async fn delete_project(&self, project_id: ProjectId) -> KanbanResult<()>;
}

#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn login(&self, data: &LoginData) -> KanbanResult<AuthResponse>;

    async fn signup(&self, data: &SignupData) -> KanbanResult<AuthResponse>;

    async fn current_user(&self) -> KanbanResult<User>;
}
