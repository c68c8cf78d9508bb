use crate::application::auth_service::ensure_owner;
use crate::domain::models::{ClassItem, InsertOutcome, Instructor, NewClass};
use crate::domain::repository::{ClassRepository, InstructorRepository};
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

pub struct CatalogService<C: ClassRepository, I: InstructorRepository> {
    classes: Arc<C>,
    instructors: Arc<I>,
}

impl<C: ClassRepository, I: InstructorRepository> CatalogService<C, I> {
    pub fn new(classes: Arc<C>, instructors: Arc<I>) -> Self {
        Self {
            classes,
            instructors,
        }
    }

    pub async fn list_classes(&self) -> Result<Vec<ClassItem>> {
        self.classes.list_classes().await
    }

    #[instrument(skip(self, req))]
    pub async fn create_class(&self, req: NewClass) -> Result<InsertOutcome> {
        let class = req.into_class(Uuid::new_v4().simple().to_string());
        let id = class.id.clone();
        self.classes.save_class(class).await?;
        info!(class_id = %id, "Class created");
        Ok(InsertOutcome::inserted(id))
    }

    /// Classes owned by `target`, visible only to that instructor. No target means no classes.
    #[instrument(skip(self))]
    pub async fn classes_for_instructor(
        &self,
        caller_email: &str,
        target: Option<&str>,
    ) -> Result<Vec<ClassItem>> {
        let Some(target) = target else {
            return Ok(Vec::new());
        };
        ensure_owner(caller_email, target)?;
        self.classes.list_classes_by_instructor(target).await
    }

    pub async fn list_instructors(&self) -> Result<Vec<Instructor>> {
        self.instructors.list_instructors().await
    }
}
