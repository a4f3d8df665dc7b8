mod project;
mod state;

use std::{path::Path, sync::Arc};

use anyhow::Context;
use sqlx::{Connection, Row, SqliteConnection, sqlite::SqliteRow};
use state::DbState;
use uuid::Uuid;

pub use project::{NewProject, Project, ProjectEdit, ProjectRepository};

/// A stored row that cannot be turned back into a [`Project`].
#[derive(Debug, thiserror::Error)]
#[error("row {id:?} is corrupt: {reason}")]
pub struct CorruptRow {
    pub id: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct ProjectDb {
    state: Arc<DbState>,
}

impl ProjectDb {
    pub async fn new<P: AsRef<Path>>(db_file: P) -> anyhow::Result<Self> {
        let state = DbState::new(db_file).await?;
        tracing::info!(db_file = ?state.db_file(), "Opened project database");
        Ok(Self {
            state: Arc::new(state),
        })
    }

    /// Checkpoint and close the database. Later queries fail.
    pub async fn close(&self) -> anyhow::Result<()> {
        self.state.close().await
    }
}

fn project_from_row(row: &SqliteRow) -> anyhow::Result<Project> {
    let raw_id: String = row.try_get("id")?;
    let id = Uuid::parse_str(&raw_id).map_err(|e| CorruptRow {
        id: raw_id.clone(),
        reason: format!("id is not a UUID ({e})"),
    })?;
    Ok(Project {
        id,
        name: row.try_get("name")?,
        description: row.try_get("desc")?,
        cost: row.try_get("cost")?,
        time: row.try_get("time")?,
        favorite: row.try_get("favorite")?,
    })
}

async fn fetch_all_projects(conn: &mut SqliteConnection) -> anyhow::Result<Vec<Project>> {
    sqlx::query(
        r#"SELECT id, name, "desc", cost, time, favorite FROM project ORDER BY rowid ASC"#,
    )
    .fetch_all(&mut *conn)
    .await
    .context("Failed to fetch projects")?
    .iter()
    .map(project_from_row)
    .collect()
}

impl ProjectRepository for ProjectDb {
    async fn insert_project(&self, project: &Project) -> anyhow::Result<Vec<Project>> {
        let mut conn = self.state.conn().await?;
        let mut tx = conn.begin().await?;
        sqlx::query(
            r#"INSERT INTO project (id, name, "desc", cost, time, favorite)
            VALUES ($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(project.id.to_string())
        .bind(&project.name)
        .bind(&project.description)
        .bind(&project.cost)
        .bind(&project.time)
        .bind(project.favorite)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to insert project {}", project.id))?;
        let projects = fetch_all_projects(&mut tx).await?;
        tx.commit().await?;
        Ok(projects)
    }

    async fn update_project(&self, project: &Project) -> anyhow::Result<Option<Vec<Project>>> {
        let mut conn = self.state.conn().await?;
        let mut tx = conn.begin().await?;
        let result = sqlx::query(
            r#"UPDATE project SET
                name = $1,
                "desc" = $2,
                cost = $3,
                time = $4,
                favorite = $5
            WHERE id = $6"#,
        )
        .bind(&project.name)
        .bind(&project.description)
        .bind(&project.cost)
        .bind(&project.time)
        .bind(project.favorite)
        .bind(project.id.to_string())
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to update project {}", project.id))?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        let projects = fetch_all_projects(&mut tx).await?;
        tx.commit().await?;
        Ok(Some(projects))
    }

    async fn delete_project(&self, id: Uuid) -> anyhow::Result<Option<Vec<Project>>> {
        let mut conn = self.state.conn().await?;
        let mut tx = conn.begin().await?;
        let result = sqlx::query(r#"DELETE FROM project WHERE id = $1"#)
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to delete project {id}"))?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        let projects = fetch_all_projects(&mut tx).await?;
        tx.commit().await?;
        Ok(Some(projects))
    }

    async fn get_project_by_id(&self, id: Uuid) -> anyhow::Result<Option<Project>> {
        let mut conn = self.state.conn().await?;
        let row = sqlx::query(
            r#"SELECT id, name, "desc", cost, time, favorite FROM project WHERE id = $1"#,
        )
        .bind(id.to_string())
        .fetch_optional(&mut **conn)
        .await
        .with_context(|| format!("Failed to fetch project {id}"))?;
        row.as_ref().map(project_from_row).transpose()
    }

    async fn get_projects(&self) -> anyhow::Result<Vec<Project>> {
        let mut conn = self.state.conn().await?;
        fetch_all_projects(&mut conn).await
    }
}
