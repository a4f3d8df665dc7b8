use std::{cell::Cell, path::PathBuf, rc::Rc};

use composite::{Project, ProjectDb, ProjectEdit, ProjectRepository, ProjectStore};
use uuid::Uuid;

/// Path for a database file inside a fresh temp directory.
/// The directory must be kept alive for as long as the database is used.
pub fn test_db_path() -> (PathBuf, tempfile::TempDir) {
    let dir = tempfile::TempDir::new().expect("Failed to create temp directory");
    let path = dir.path().join("projects.db");
    (path, dir)
}

/// Creates an initialized ProjectStore backed by a temporary SQLite file.
pub async fn create_test_store() -> (ProjectStore<ProjectDb>, tempfile::TempDir) {
    let (path, dir) = test_db_path();
    let store = ProjectStore::open(&path).await;
    assert_eq!(
        *store.health(),
        composite::StoreHealth::Ready,
        "test store should open cleanly"
    );
    (store, dir)
}

pub fn make_edit(name: &str, description: &str, cost: &str, time: &str) -> ProjectEdit {
    ProjectEdit {
        name: name.to_string(),
        description: description.to_string(),
        cost: cost.to_string(),
        time: time.to_string(),
    }
}

/// Recomputes the totals the slow way, straight from a listing.
pub fn expected_totals(projects: &[Project]) -> (i64, f64) {
    let cost = projects
        .iter()
        .map(|p| p.cost.parse::<i64>().unwrap_or(0))
        .sum();
    let time = projects
        .iter()
        .map(|p| {
            p.time
                .parse::<f64>()
                .ok()
                .filter(|time| time.is_finite())
                .unwrap_or(0.0)
        })
        .sum();
    (cost, time)
}

/// On/off switch shared between a test and a [`FlakyRepository`].
#[derive(Debug, Clone, Default)]
pub struct Fault(Rc<Cell<bool>>);

impl Fault {
    pub fn set(&self, on: bool) {
        self.0.set(on);
    }

    fn check(&self, what: &str) -> anyhow::Result<()> {
        if self.0.get() {
            anyhow::bail!("injected {} failure", what);
        }
        Ok(())
    }
}

/// Wraps a repository and fails reads or writes on demand.
pub struct FlakyRepository<R> {
    inner: R,
    pub writes: Fault,
    pub reads: Fault,
}

impl<R> FlakyRepository<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            writes: Fault::default(),
            reads: Fault::default(),
        }
    }
}

impl<R: ProjectRepository> ProjectRepository for FlakyRepository<R> {
    async fn insert_project(&self, project: &Project) -> anyhow::Result<Vec<Project>> {
        self.writes.check("write")?;
        self.inner.insert_project(project).await
    }

    async fn update_project(&self, project: &Project) -> anyhow::Result<Option<Vec<Project>>> {
        self.writes.check("write")?;
        self.inner.update_project(project).await
    }

    async fn delete_project(&self, id: Uuid) -> anyhow::Result<Option<Vec<Project>>> {
        self.writes.check("write")?;
        self.inner.delete_project(id).await
    }

    async fn get_project_by_id(&self, id: Uuid) -> anyhow::Result<Option<Project>> {
        self.reads.check("read")?;
        self.inner.get_project_by_id(id).await
    }

    async fn get_projects(&self) -> anyhow::Result<Vec<Project>> {
        self.reads.check("read")?;
        self.inner.get_projects().await
    }
}

/// Creates an initialized store over a [`FlakyRepository`], returning the fault
/// switches alongside it.
pub async fn create_flaky_store() -> (
    ProjectStore<FlakyRepository<ProjectDb>>,
    Fault,
    Fault,
    tempfile::TempDir,
) {
    let (path, dir) = test_db_path();
    let db = ProjectDb::new(&path)
        .await
        .expect("Failed to create test database");
    let repo = FlakyRepository::new(db);
    let (writes, reads) = (repo.writes.clone(), repo.reads.clone());
    let mut store = ProjectStore::new(repo);
    store
        .initialize()
        .await
        .expect("Failed to initialize test store");
    (store, writes, reads, dir)
}
