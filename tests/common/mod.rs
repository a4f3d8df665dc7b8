mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from composite for tests
pub use composite::{
    NewProject, Project, ProjectDb, ProjectEdit, ProjectRepository, ProjectStore, StoreError,
    StoreHealth, Totals,
};
