//! The single gateway between callers and the durable project collection.
//!
//! Every mutation writes and re-reads the whole collection in one repository
//! transaction, then replaces the cache and recomputes [`Totals`] from scratch.
//! A mutation that fails commits nothing and leaves the cache and totals
//! exactly as they were.

use std::path::Path;

use uuid::Uuid;

use crate::core::{
    db::{NewProject, Project, ProjectDb, ProjectEdit, ProjectRepository},
    error::{StoreError, StoreResult},
};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    pub cost: i64,
    pub time: f64,
}

impl Totals {
    /// Sum `cost` and `time` over `projects`. Values that do not parse count as zero.
    pub fn compute(projects: &[Project]) -> Self {
        projects.iter().fold(Totals::default(), |acc, project| Totals {
            cost: acc.cost.saturating_add(parse_cost(project)),
            time: acc.time + parse_time(project),
        })
    }
}

fn parse_cost(project: &Project) -> i64 {
    project.cost.parse::<i64>().unwrap_or_else(|_| {
        tracing::warn!(id = %project.id, cost = %project.cost, "Unparsable cost counted as 0");
        0
    })
}

fn parse_time(project: &Project) -> f64 {
    match project.time.parse::<f64>() {
        Ok(time) if time.is_finite() => time,
        _ => {
            tracing::warn!(id = %project.id, time = %project.time, "Unparsable time counted as 0");
            0.0
        }
    }
}

/// Whether the durable store came up cleanly.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreHealth {
    Ready,
    /// Started with an empty cache; holds the rendered cause.
    Degraded(String),
}

#[derive(Debug)]
pub struct ProjectStore<R> {
    repo: Option<R>,
    projects: Vec<Project>,
    totals: Totals,
    health: StoreHealth,
}

impl ProjectStore<ProjectDb> {
    /// Open the database at `db_file` and load it.
    ///
    /// Never fails: if the database cannot be opened or read, the store starts
    /// empty and [`ProjectStore::health`] reports why.
    pub async fn open<P: AsRef<Path>>(db_file: P) -> Self {
        match ProjectDb::new(db_file.as_ref()).await {
            Ok(db) => {
                let mut store = Self::new(db);
                // A failed load is already recorded in `health`.
                let _ = store.initialize().await;
                store
            }
            Err(err) => {
                let err = StoreError::Persistence(err);
                tracing::warn!(error = %err, "Project database unavailable, continuing with an empty list");
                Self {
                    repo: None,
                    projects: Vec::new(),
                    totals: Totals::default(),
                    health: StoreHealth::Degraded(err.to_string()),
                }
            }
        }
    }
}

impl<R: ProjectRepository> ProjectStore<R> {
    /// Wrap an open repository. The cache stays empty until [`Self::initialize`].
    pub fn new(repo: R) -> Self {
        Self {
            repo: Some(repo),
            projects: Vec::new(),
            totals: Totals::default(),
            health: StoreHealth::Ready,
        }
    }

    /// Load the full collection and compute totals.
    ///
    /// On failure the cache is emptied, the store is marked degraded and the
    /// error is returned.
    pub async fn initialize(&mut self) -> StoreResult<()> {
        match self.refresh().await {
            Ok(()) => {
                self.health = StoreHealth::Ready;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to load projects, continuing with an empty list");
                self.projects.clear();
                self.totals = Totals::default();
                self.health = StoreHealth::Degraded(err.to_string());
                Err(err)
            }
        }
    }

    pub fn health(&self) -> &StoreHealth {
        &self.health
    }

    /// The cached projects in the order the repository returned them.
    pub fn list(&self) -> &[Project] {
        &self.projects
    }

    pub fn get(&self, id: Uuid) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == id)
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    /// Reload the cache from the repository and recompute totals.
    ///
    /// The cache is only replaced once the whole collection has been read.
    pub async fn refresh(&mut self) -> StoreResult<()> {
        let projects = self.repo()?.get_projects().await?;
        self.replace_cache(projects);
        Ok(())
    }

    fn replace_cache(&mut self, projects: Vec<Project>) {
        let totals = Totals::compute(&projects);
        tracing::debug!(
            count = projects.len(),
            total_cost = totals.cost,
            total_time = totals.time,
            "Refreshed projects"
        );
        self.projects = projects;
        self.totals = totals;
    }

    pub async fn add(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        cost: impl Into<String>,
        time: impl Into<String>,
    ) -> StoreResult<Uuid> {
        let project = Project::create(NewProject {
            name: name.into(),
            description: description.into(),
            cost: cost.into(),
            time: time.into(),
        });
        let projects = self.repo()?.insert_project(&project).await?;
        tracing::info!(id = %project.id, name = %project.name, "Added project");
        self.replace_cache(projects);
        Ok(project.id)
    }

    pub async fn edit(&mut self, id: Uuid, edit: ProjectEdit) -> StoreResult<()> {
        let repo = self.repo()?;
        let mut project = repo
            .get_project_by_id(id)
            .await?
            .ok_or(StoreError::NotFound(id))?;
        project.apply_edit(edit);
        let projects = repo
            .update_project(&project)
            .await?
            .ok_or(StoreError::NotFound(id))?;
        tracing::info!(%id, "Edited project");
        self.replace_cache(projects);
        Ok(())
    }

    pub async fn toggle_favorite(&mut self, id: Uuid) -> StoreResult<bool> {
        let repo = self.repo()?;
        let mut project = repo
            .get_project_by_id(id)
            .await?
            .ok_or(StoreError::NotFound(id))?;
        project.favorite = !project.favorite;
        let projects = repo
            .update_project(&project)
            .await?
            .ok_or(StoreError::NotFound(id))?;
        tracing::info!(%id, favorite = project.favorite, "Toggled favorite");
        self.replace_cache(projects);
        Ok(project.favorite)
    }

    pub async fn delete(&mut self, id: Uuid) -> StoreResult<()> {
        let projects = self
            .repo()?
            .delete_project(id)
            .await?
            .ok_or(StoreError::NotFound(id))?;
        tracing::info!(%id, "Deleted project");
        self.replace_cache(projects);
        Ok(())
    }

    /// Delete the project at `index` in [`Self::list`].
    pub async fn delete_at(&mut self, index: usize) -> StoreResult<Uuid> {
        let id = self
            .projects
            .get(index)
            .map(|project| project.id)
            .ok_or(StoreError::IndexOutOfRange {
                index,
                len: self.projects.len(),
            })?;
        self.delete(id).await?;
        Ok(id)
    }

    fn repo(&self) -> StoreResult<&R> {
        self.repo.as_ref().ok_or_else(|| {
            StoreError::Persistence(anyhow::anyhow!("project database is not open"))
        })
    }
}
