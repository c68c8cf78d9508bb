use crate::data::catalog_repository::{InMemoryClassRepository, InMemoryInstructorRepository};
use crate::data::checkout_repository::InMemoryCheckoutRepository;
use crate::data::user_repository::InMemoryUserRepository;
use crate::domain::models::{ClassItem, Instructor};
use crate::domain::repository::{ClassRepository, InstructorRepository};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

/// Catalog documents loaded into an empty store at startup.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogSeed {
    #[serde(default)]
    pub instructors: Vec<Instructor>,
    #[serde(default)]
    pub classes: Vec<ClassItem>,
}

impl CatalogSeed {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading catalog seed {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("parsing catalog seed {}", path.display()))
    }
}

/// Handle to every collection of the academy store. Opened once at startup and
/// passed to the services that need it; clones share the same collections.
#[derive(Clone)]
pub struct AcademyDatabase {
    pub students: Arc<InMemoryUserRepository>,
    pub classes: Arc<InMemoryClassRepository>,
    pub instructors: Arc<InMemoryInstructorRepository>,
    pub checkout: Arc<InMemoryCheckoutRepository>,
}

impl AcademyDatabase {
    pub fn open() -> Self {
        info!("Opening in-memory academy database");
        Self {
            students: Arc::new(InMemoryUserRepository::new()),
            classes: Arc::new(InMemoryClassRepository::new()),
            instructors: Arc::new(InMemoryInstructorRepository::new()),
            checkout: Arc::new(InMemoryCheckoutRepository::new()),
        }
    }

    #[instrument(skip(self, seed), fields(
        instructors = seed.instructors.len(),
        classes = seed.classes.len()
    ))]
    pub async fn seed_catalog(&self, seed: CatalogSeed) -> Result<()> {
        for instructor in seed.instructors {
            self.instructors.save_instructor(instructor).await?;
        }
        for class in seed.classes {
            self.classes.save_class(class).await?;
        }
        info!("Catalog seeded");
        Ok(())
    }
}
