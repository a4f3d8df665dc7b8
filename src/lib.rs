pub mod config;
pub mod core;
pub mod format;

pub use config::AppConfig;
pub use crate::core::db::{NewProject, Project, ProjectDb, ProjectEdit, ProjectRepository};
pub use crate::core::{ProjectStore, StoreError, StoreHealth, Totals};
