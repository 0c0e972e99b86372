use std::sync::Arc;

use crate::client::ProjectGateway;
use crate::constants::{
    CREATE_PROJECT_FAILED, DELETE_PROJECT_FAILED, FETCH_PROJECTS_FAILED, FETCH_PROJECT_FAILED,
    UPDATE_PROJECT_FAILED,
};
use crate::error::{KanbanError, KanbanResult};
use crate::logging::log_error;
use crate::models::{Project, ProjectDraft, ProjectId};
use crate::validation::Validate;

/// The user's projects plus the one currently opened. Every call waits for
/// the server and applies only the confirmed response.
pub struct ProjectStore {
    gateway: Arc<dyn ProjectGateway>,
    projects: Vec<Project>,
    current: Option<Project>,
    loading: bool,
    error: Option<String>,
}

impl ProjectStore {
    pub fn new(gateway: Arc<dyn ProjectGateway>) -> Self {
        Self {
            gateway,
            projects: Vec::new(),
            current: None,
            loading: false,
            error: None,
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn current_project(&self) -> Option<&Project> {
        self.current.as_ref()
    }

    pub fn set_current_project(&mut self, project: Option<Project>) {
        self.current = project;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn fail(&mut self, error: &KanbanError, fallback: &str) {
        log_error(&format!("{}: {}", fallback, error));
        self.loading = false;
        self.error = Some(error.user_message(fallback));
    }

    pub async fn fetch_projects(&mut self) -> KanbanResult<()> {
        self.begin();
        match self.gateway.list_projects().await {
            Ok(projects) => {
                self.projects = projects;
                self.loading = false;
                Ok(())
            }
            Err(e) => {
                self.fail(&e, FETCH_PROJECTS_FAILED);
                Err(e)
            }
        }
    }

    pub async fn fetch_project(&mut self, project_id: ProjectId) -> KanbanResult<Project> {
        self.begin();
        match self.gateway.get_project(project_id).await {
            Ok(project) => {
                self.current = Some(project.clone());
                self.loading = false;
                Ok(project)
            }
            Err(e) => {
                self.fail(&e, FETCH_PROJECT_FAILED);
                Err(e)
            }
        }
    }

    pub async fn create_project(&mut self, draft: ProjectDraft) -> KanbanResult<Project> {
        draft.validate()?;

        self.begin();
        match self.gateway.create_project(&draft).await {
            Ok(project) => {
                self.projects.push(project.clone());
                self.loading = false;
                Ok(project)
            }
            Err(e) => {
                self.fail(&e, CREATE_PROJECT_FAILED);
                Err(e)
            }
        }
    }

    pub async fn update_project(&mut self, project_id: ProjectId, draft: ProjectDraft) -> KanbanResult<Project> {
        draft.validate()?;

        self.begin();
        match self.gateway.update_project(project_id, &draft).await {
            Ok(project) => {
                for existing in self.projects.iter_mut().filter(|p| p.id == project_id) {
                    *existing = project.clone();
                }
                if self.current.as_ref().map(|p| p.id) == Some(project_id) {
                    self.current = Some(project.clone());
                }
                self.loading = false;
                Ok(project)
            }
            Err(e) => {
                self.fail(&e, UPDATE_PROJECT_FAILED);
                Err(e)
            }
        }
    }

    pub async fn delete_project(&mut self, project_id: ProjectId) -> KanbanResult<()> {
        self.begin();
        match self.gateway.delete_project(project_id).await {
            Ok(()) => {
                self.projects.retain(|p| p.id != project_id);
                if self.current.as_ref().map(|p| p.id) == Some(project_id) {
                    self.current = None;
                }
                self.loading = false;
                Ok(())
            }
            Err(e) => {
                self.fail(&e, DELETE_PROJECT_FAILED);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Failure, InMemoryGateway, Operation};

    fn project(id: ProjectId, name: &str) -> Project {
        Project {
            id,
            name: name.to_string(),
            description: None,
            owner_id: 1,
        }
    }

    fn seeded() -> Arc<InMemoryGateway> {
        let gateway = Arc::new(InMemoryGateway::new());
        gateway.add_project(project(1, "Apollo"));
        gateway.add_project(project(2, "Gemini"));
        gateway
    }

    #[tokio::test]
    async fn test_fetch_projects() {
        let mut store = ProjectStore::new(seeded());
        store.fetch_projects().await.unwrap();
        assert_eq!(store.projects().len(), 2);
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_fetch_projects_failure_uses_fallback() {
        let gateway = seeded();
        gateway.fail(Operation::ListProjects, Failure::network());
        let mut store = ProjectStore::new(gateway);

        assert!(store.fetch_projects().await.is_err());
        assert_eq!(store.error(), Some("Failed to fetch projects"));
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_create_validates_name() {
        let gateway = seeded();
        let mut store = ProjectStore::new(gateway.clone());

        let result = store.create_project(ProjectDraft::new("ab")).await;

        assert!(result.unwrap_err().is_validation());
        assert_eq!(gateway.call_count(Operation::CreateProject), 0);
    }

    #[tokio::test]
    async fn test_update_keeps_current_in_sync() {
        let mut store = ProjectStore::new(seeded());
        store.fetch_projects().await.unwrap();
        store.fetch_project(2).await.unwrap();

        store
            .update_project(2, ProjectDraft::new("Gemini II").with_description("Second try"))
            .await
            .unwrap();

        assert_eq!(store.current_project().unwrap().name, "Gemini II");
        assert_eq!(store.projects()[1].description.as_deref(), Some("Second try"));
    }

    #[tokio::test]
    async fn test_delete_clears_current() {
        let mut store = ProjectStore::new(seeded());
        store.fetch_projects().await.unwrap();
        store.fetch_project(1).await.unwrap();

        store.delete_project(1).await.unwrap();

        assert!(store.current_project().is_none());
        assert_eq!(store.projects().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_unknown_project_reports_detail() {
        let mut store = ProjectStore::new(seeded());
        assert!(store.fetch_project(99).await.is_err());
        assert_eq!(store.error(), Some("Project not found"));
    }
}
