use crate::models::project::Project;
use crate::repositories::project_repository::ProjectRepository;
use crate::repositories::user_repository::RepositoryError;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum ProjectServiceError {
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct ProjectService {
    repository: Arc<dyn ProjectRepository>,
}

impl ProjectService {
    pub fn new(repository: Arc<dyn ProjectRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, ProjectServiceError> {
        Ok(self.repository.list().await?)
    }

    /// Creates a project. A blank name is ignored and yields `Ok(None)`.
    pub async fn create_project(&self, name: &str) -> Result<Option<Project>, ProjectServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }

        let project = self.repository.create(name).await?;
        info!(project_id = project.id, "Created project");
        Ok(Some(project))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::project_repository::MockProjectRepository;
    use mockall::predicate::*;

    #[tokio::test]
    async fn test_blank_name_is_a_no_op() {
        let mut mock_repo = MockProjectRepository::new();
        mock_repo.expect_create().times(0);

        let service = ProjectService::new(Arc::new(mock_repo));

        assert!(service.create_project("   ").await.unwrap().is_none());
        assert!(service.create_project("").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_trims_name() {
        let mut mock_repo = MockProjectRepository::new();
        mock_repo
            .expect_create()
            .with(eq("Edifício Aurora"))
            .times(1)
            .returning(|name| {
                let project = Project {
                    id: 1,
                    name: name.to_string(),
                };
                Box::pin(async move { Ok(project) })
            });

        let service = ProjectService::new(Arc::new(mock_repo));

        let project = service
            .create_project("  Edifício Aurora ")
            .await
            .unwrap()
            .expect("project created");
        assert_eq!(project.name, "Edifício Aurora");
    }
}
