use crate::domain::models::AdminStats;
use crate::domain::repository::{CheckoutRepository, ClassRepository, UserRepository};
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, instrument};

pub struct StatsService<U: UserRepository, C: ClassRepository, P: CheckoutRepository> {
    students: Arc<U>,
    classes: Arc<C>,
    payments: Arc<P>,
}

impl<U: UserRepository, C: ClassRepository, P: CheckoutRepository> StatsService<U, C, P> {
    pub fn new(students: Arc<U>, classes: Arc<C>, payments: Arc<P>) -> Self {
        Self {
            students,
            classes,
            payments,
        }
    }

    #[instrument(skip(self))]
    pub async fn compute_stats(&self) -> Result<AdminStats> {
        let stats = AdminStats {
            student_count: self.students.count_users().await?,
            class_count: self.classes.count_classes().await?,
            paid_class_count: self.payments.count_payments().await?,
            revenue: self.payments.total_revenue().await?,
        };
        info!(
            students = stats.student_count,
            classes = stats.class_count,
            paid = stats.paid_class_count,
            revenue = stats.revenue,
            "Admin statistics computed"
        );
        Ok(stats)
    }
}
