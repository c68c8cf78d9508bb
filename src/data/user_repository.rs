use crate::domain::models::UpdateOutcome;
use crate::domain::repository::UserRepository;
use crate::domain::user::{Role, User};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};

/// Student collection. Kept in insertion order, like a document store's natural order.
#[derive(Clone)]
pub struct InMemoryUserRepository {
    storage: Arc<RwLock<Vec<User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self, user), fields(user_id = %user.id, email = %user.email))]
    async fn save_user(&self, user: User) -> Result<()> {
        trace!("Acquiring write lock for user storage");
        let mut storage = self.storage.write().await;
        match storage.iter().position(|u| u.id == user.id) {
            Some(index) => storage[index] = user.clone(),
            None => storage.push(user.clone()),
        }
        debug!(user_id = %user.id, email = %user.email, "User saved to memory storage");
        Ok(())
    }

    #[instrument(skip(self, user), fields(user_id = %user.id, email = %user.email))]
    async fn insert_if_absent(&self, user: User) -> Result<bool> {
        trace!("Acquiring write lock for user storage");
        let mut storage = self.storage.write().await;
        if storage.iter().any(|u| u.email == user.email) {
            debug!(email = %user.email, "User with this email already stored");
            return Ok(false);
        }
        debug!(user_id = %user.id, email = %user.email, "Inserting user into storage");
        storage.push(user);
        Ok(true)
    }

    #[instrument(skip(self), fields(email = email))]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let storage = self.storage.read().await;
        let user = storage.iter().find(|u| u.email == email).cloned();
        match &user {
            Some(u) => debug!(user_id = %u.id, email = %u.email, "User found in storage"),
            None => trace!(email = email, "User not found in storage"),
        }
        Ok(user)
    }

    #[instrument(skip(self), fields(user_id = id))]
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>> {
        let storage = self.storage.read().await;
        let user = storage.iter().find(|u| u.id == id).cloned();
        if user.is_none() {
            trace!(user_id = id, "User not found in storage");
        }
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<User>> {
        let storage = self.storage.read().await;
        debug!(count = storage.len(), "Listing users");
        Ok(storage.clone())
    }

    #[instrument(skip(self), fields(user_id = id, role = role.as_str()))]
    async fn set_role(&self, id: &str, role: Role) -> Result<UpdateOutcome> {
        let mut storage = self.storage.write().await;
        let outcome = match storage.iter_mut().find(|u| u.id == id) {
            Some(user) if user.role == Some(role) => UpdateOutcome {
                acknowledged: true,
                matched_count: 1,
                modified_count: 0,
            },
            Some(user) => {
                user.role = Some(role);
                UpdateOutcome {
                    acknowledged: true,
                    matched_count: 1,
                    modified_count: 1,
                }
            }
            None => UpdateOutcome {
                acknowledged: true,
                matched_count: 0,
                modified_count: 0,
            },
        };
        debug!(
            matched = outcome.matched_count,
            modified = outcome.modified_count,
            "Role update applied"
        );
        Ok(outcome)
    }

    async fn count_users(&self) -> Result<u64> {
        Ok(self.storage.read().await.len() as u64)
    }
}
