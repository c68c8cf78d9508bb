use crate::domain::models::{
    CartEntry, ClassItem, DeleteOutcome, Instructor, PaymentRecord, UpdateOutcome,
};
use crate::domain::user::{Role, User};
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn save_user(&self, user: User) -> Result<()>;
    /// Inserts `user` unless a user with the same email exists. Returns whether it was inserted.
    async fn insert_if_absent(&self, user: User) -> Result<bool>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>>;
    async fn list_users(&self) -> Result<Vec<User>>;
    async fn set_role(&self, id: &str, role: Role) -> Result<UpdateOutcome>;
    async fn count_users(&self) -> Result<u64>;
}

#[async_trait]
pub trait ClassRepository: Send + Sync {
    async fn save_class(&self, class: ClassItem) -> Result<()>;
    async fn list_classes(&self) -> Result<Vec<ClassItem>>;
    async fn list_classes_by_instructor(&self, email: &str) -> Result<Vec<ClassItem>>;
    async fn count_classes(&self) -> Result<u64>;
}

#[async_trait]
pub trait InstructorRepository: Send + Sync {
    async fn save_instructor(&self, instructor: Instructor) -> Result<()>;
    async fn list_instructors(&self) -> Result<Vec<Instructor>>;
}

/// Cart entries and the payment log live behind one repository so that
/// settlement can touch both inside a single transaction.
#[async_trait]
pub trait CheckoutRepository: Send + Sync {
    async fn add_cart_entry(&self, entry: CartEntry) -> Result<()>;
    async fn list_cart_entries(&self, email: &str) -> Result<Vec<CartEntry>>;
    async fn remove_cart_entry(&self, id: &str) -> Result<DeleteOutcome>;

    /// Deletes every cart entry referenced by `payment` and appends `payment`
    /// to the log. Either both writes happen or neither does.
    async fn settle(&self, payment: PaymentRecord) -> Result<Vec<String>>;

    async fn list_payments(&self, email: &str) -> Result<Vec<PaymentRecord>>;
    async fn count_payments(&self) -> Result<u64>;
    async fn total_revenue(&self) -> Result<f64>;
}
