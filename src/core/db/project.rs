use std::future::Future;

use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Integer amount kept as entered.
    pub cost: String,
    /// Decimal hours kept as entered.
    pub time: String,
    pub favorite: bool,
}

#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub cost: String,
    pub time: String,
}

/// The four fields an edit overwrites. `favorite` is not part of it.
#[derive(Debug, Clone, Default)]
pub struct ProjectEdit {
    pub name: String,
    pub description: String,
    pub cost: String,
    pub time: String,
}

impl Project {
    pub fn create(new: NewProject) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: new.name,
            description: new.description,
            cost: new.cost,
            time: new.time,
            favorite: false,
        }
    }

    pub(crate) fn apply_edit(&mut self, edit: ProjectEdit) {
        self.name = edit.name;
        self.description = edit.description;
        self.cost = edit.cost;
        self.time = edit.time;
    }
}

/// Durable storage port for [`Project`] records.
///
/// Each write re-reads the whole collection in the same transaction and only
/// commits once that read succeeded, returning it. `update_project` and
/// `delete_project` return `None` and commit nothing when no row has the id.
pub trait ProjectRepository {
    fn insert_project(&self, project: &Project) -> impl Future<Output = anyhow::Result<Vec<Project>>>;
    fn update_project(&self, project: &Project) -> impl Future<Output = anyhow::Result<Option<Vec<Project>>>>;
    fn delete_project(&self, id: Uuid) -> impl Future<Output = anyhow::Result<Option<Vec<Project>>>>;
    fn get_project_by_id(&self, id: Uuid) -> impl Future<Output = anyhow::Result<Option<Project>>>;
    fn get_projects(&self) -> impl Future<Output = anyhow::Result<Vec<Project>>>;
}
