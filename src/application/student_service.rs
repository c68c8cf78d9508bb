use crate::domain::models::{InsertOutcome, UpdateOutcome};
use crate::domain::repository::UserRepository;
use crate::domain::user::{CreateUser, Role, User};
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    Created(InsertOutcome),
    AlreadyExists,
}

pub struct StudentService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> StudentService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Registers a student the first time an email is seen. Later calls are no-ops.
    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn register(&self, req: CreateUser) -> Result<Registration> {
        let user = User {
            id: Uuid::new_v4().simple().to_string(),
            profile: req.sanitized_profile(),
            email: req.email,
            role: None,
        };
        let id = user.id.clone();

        if self.repository.insert_if_absent(user).await? {
            info!(user_id = %id, "Student registered");
            Ok(Registration::Created(InsertOutcome::inserted(id)))
        } else {
            info!("Student already registered");
            Ok(Registration::AlreadyExists)
        }
    }

    pub async fn list_students(&self) -> Result<Vec<User>> {
        self.repository.list_users().await
    }

    #[instrument(skip(self))]
    pub async fn promote(&self, id: &str, role: Role) -> Result<UpdateOutcome> {
        let outcome = self.repository.set_role(id, role).await?;
        info!(
            user_id = id,
            role = role.as_str(),
            matched = outcome.matched_count,
            "Role promotion processed"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::user_repository::InMemoryUserRepository;
    use serde_json::json;

    fn request(body: serde_json::Value) -> CreateUser {
        serde_json::from_value(body).unwrap()
    }

    #[tokio::test]
    async fn test_register_is_idempotent_per_email() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let service = StudentService::new(repo.clone());

        let first = service
            .register(request(json!({ "email": "kim@example.com", "name": "Kim" })))
            .await
            .unwrap();
        assert!(matches!(first, Registration::Created(_)));

        let second = service
            .register(request(json!({ "email": "kim@example.com", "name": "Other" })))
            .await
            .unwrap();
        assert_eq!(second, Registration::AlreadyExists);

        let users = service.list_students().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].profile["name"], "Kim");
        assert!(users[0].role.is_none());
    }

    #[tokio::test]
    async fn test_register_ignores_client_supplied_role() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let service = StudentService::new(repo.clone());

        service
            .register(request(json!({ "email": "sneaky@example.com", "role": "admin" })))
            .await
            .unwrap();

        let stored = repo
            .find_user_by_email("sneaky@example.com")
            .await
            .unwrap()
            .unwrap();
        assert!(stored.role.is_none());
        assert!(stored.profile.get("role").is_none());
    }

    #[tokio::test]
    async fn test_promote_sets_role_by_id() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let service = StudentService::new(repo.clone());
        let Registration::Created(outcome) = service
            .register(request(json!({ "email": "coach@example.com" })))
            .await
            .unwrap()
        else {
            panic!("expected a new registration");
        };

        service
            .promote(&outcome.inserted_id, Role::Instructor)
            .await
            .unwrap();

        let stored = repo
            .find_user_by_id(&outcome.inserted_id)
            .await
            .unwrap()
            .unwrap();
        assert!(stored.has_role(Role::Instructor));
    }
}
