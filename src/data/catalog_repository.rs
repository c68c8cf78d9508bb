use crate::domain::models::{ClassItem, Instructor};
use crate::domain::repository::{ClassRepository, InstructorRepository};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct InMemoryClassRepository {
    storage: Arc<RwLock<Vec<ClassItem>>>,
}

impl InMemoryClassRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl Default for InMemoryClassRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClassRepository for InMemoryClassRepository {
    #[instrument(skip(self, class), fields(class_id = %class.id))]
    async fn save_class(&self, class: ClassItem) -> Result<()> {
        let mut storage = self.storage.write().await;
        storage.push(class);
        debug!(count = storage.len(), "Class saved to memory storage");
        Ok(())
    }

    async fn list_classes(&self) -> Result<Vec<ClassItem>> {
        Ok(self.storage.read().await.clone())
    }

    #[instrument(skip(self))]
    async fn list_classes_by_instructor(&self, email: &str) -> Result<Vec<ClassItem>> {
        let storage = self.storage.read().await;
        let classes: Vec<ClassItem> = storage
            .iter()
            .filter(|c| c.instructor_email.as_deref() == Some(email))
            .cloned()
            .collect();
        debug!(count = classes.len(), "Classes found for instructor");
        Ok(classes)
    }

    async fn count_classes(&self) -> Result<u64> {
        Ok(self.storage.read().await.len() as u64)
    }
}

#[derive(Clone)]
pub struct InMemoryInstructorRepository {
    storage: Arc<RwLock<Vec<Instructor>>>,
}

impl InMemoryInstructorRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl Default for InMemoryInstructorRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InstructorRepository for InMemoryInstructorRepository {
    async fn save_instructor(&self, instructor: Instructor) -> Result<()> {
        self.storage.write().await.push(instructor);
        Ok(())
    }

    async fn list_instructors(&self) -> Result<Vec<Instructor>> {
        Ok(self.storage.read().await.clone())
    }
}
