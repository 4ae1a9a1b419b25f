use crate::models::project::Project;
use crate::repositories::user_repository::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use sqlx::SqlitePool;

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait ProjectRepository: Send + Sync {
    async fn create(&self, name: &str) -> RepositoryResult<Project>;
    async fn list(&self) -> RepositoryResult<Vec<Project>>;
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Project>>;
}

pub struct SqliteProjectRepository {
    pool: SqlitePool,
}

impl SqliteProjectRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectRepository for SqliteProjectRepository {
    async fn create(&self, name: &str) -> RepositoryResult<Project> {
        let result = sqlx::query("INSERT INTO projects (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await?;

        let id = result.last_insert_rowid();
        self.find_by_id(id).await?.ok_or(RepositoryError::NotFound)
    }

    async fn list(&self) -> RepositoryResult<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>("SELECT id, name FROM projects ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(projects)
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Project>> {
        let project = sqlx::query_as::<_, Project>("SELECT id, name FROM projects WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(project)
    }
}
