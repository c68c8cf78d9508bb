use crate::application::auth_service::AuthService;
use crate::application::catalog_service::CatalogService;
use crate::application::checkout_service::CheckoutService;
use crate::application::stats_service::StatsService;
use crate::application::student_service::{Registration, StudentService};
use crate::data::catalog_repository::{InMemoryClassRepository, InMemoryInstructorRepository};
use crate::data::checkout_repository::InMemoryCheckoutRepository;
use crate::data::database::AcademyDatabase;
use crate::data::user_repository::InMemoryUserRepository;
use crate::domain::error::DomainError;
use crate::domain::gateway::PaymentGateway;
use crate::domain::models::{NewCartEntry, NewClass, NewPayment, PaymentIntentRequest};
use crate::domain::user::{CreateUser, Role};
use crate::presentation::middleware::{AdminUser, AuthRejection, AuthenticatedUser};
use actix_web::{FromRequest, HttpMessage, HttpRequest, HttpResponse, ResponseError, web};
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

pub const LIVENESS_MESSAGE: &str = "SPORTS ACADEMY SERVER IS RUNNING";

// AppState holding the services, all built on one database handle
pub struct AppState {
    pub auth_service: Arc<AuthService<InMemoryUserRepository>>,
    pub student_service: StudentService<InMemoryUserRepository>,
    pub catalog_service: CatalogService<InMemoryClassRepository, InMemoryInstructorRepository>,
    pub checkout_service: CheckoutService<InMemoryCheckoutRepository>,
    pub stats_service:
        StatsService<InMemoryUserRepository, InMemoryClassRepository, InMemoryCheckoutRepository>,
}

impl AppState {
    pub fn new(
        db: &AcademyDatabase,
        jwt_secret: String,
        gateway: Arc<dyn PaymentGateway>,
        currency: String,
    ) -> Self {
        Self {
            auth_service: Arc::new(AuthService::new(db.students.clone(), jwt_secret)),
            student_service: StudentService::new(db.students.clone()),
            catalog_service: CatalogService::new(db.classes.clone(), db.instructors.clone()),
            checkout_service: CheckoutService::new(db.checkout.clone(), gateway, currency),
            stats_service: StatsService::new(
                db.students.clone(),
                db.classes.clone(),
                db.checkout.clone(),
            ),
        }
    }
}

// Uniform error response format
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    details: serde_json::Value,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Payment gateway error: {0}")]
    Gateway(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn message(&self) -> &str {
        match self {
            ApiError::Validation(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::Database(msg)
            | ApiError::Gateway(msg)
            | ApiError::Internal(msg) => msg,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Database(_) | ApiError::Gateway(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_msg = self.to_string();

        if status.is_server_error() {
            error!(error = %error_msg, status = %status, "Request failed");
        } else {
            warn!(error = %error_msg, status = %status, "Request rejected");
        }

        let error_response = ErrorResponse {
            details: serde_json::json!({ "message": self.message() }),
            error: error_msg,
        };

        HttpResponse::build(status).json(error_response)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<DomainError>() {
            Some(DomainError::Validation(msg)) => ApiError::Validation(msg.clone()),
            Some(DomainError::Unauthorized(msg)) => ApiError::Unauthorized(msg.clone()),
            Some(DomainError::Forbidden(msg)) => ApiError::Forbidden(msg.clone()),
            Some(DomainError::Storage(msg)) => ApiError::Database(msg.clone()),
            Some(DomainError::Gateway(msg)) => ApiError::Gateway(msg.clone()),
            Some(DomainError::Internal(msg)) => ApiError::Internal(msg.clone()),
            None => ApiError::Database(err.to_string()),
        }
    }
}

fn authenticated_user(req: &HttpRequest) -> Result<AuthenticatedUser, ApiError> {
    let extensions = req.extensions();
    if let Some(user) = extensions.get::<AuthenticatedUser>() {
        return Ok(user.clone());
    }
    let reason = extensions
        .get::<AuthRejection>()
        .map(|rejection| rejection.0.clone())
        .unwrap_or_else(|| "missing bearer token".to_string());
    Err(ApiError::Unauthorized(reason))
}

// AuthenticatedUser extractor
impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let user = authenticated_user(req);
        Box::pin(async move { user })
    }
}

// AdminUser extractor: authentication first, then a role lookup in the student directory
impl FromRequest for AdminUser {
    type Error = ApiError;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let user = authenticated_user(req);
        let state = req.app_data::<web::Data<AppState>>().cloned();
        Box::pin(async move {
            let user = user?;
            let state =
                state.ok_or_else(|| ApiError::Internal("application state missing".to_string()))?;
            state.auth_service.authorize_admin(&user.email).await?;
            Ok(AdminUser { email: user.email })
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

#[instrument]
pub async fn liveness() -> HttpResponse {
    HttpResponse::Ok().body(LIVENESS_MESSAGE)
}

#[instrument(skip(state), fields(admin = %admin.email))]
pub async fn list_students(
    state: web::Data<AppState>,
    admin: AdminUser,
) -> Result<HttpResponse, ApiError> {
    let students = state.student_service.list_students().await?;
    info!(count = students.len(), "Students listed");
    Ok(HttpResponse::Ok().json(students))
}

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn register_student(
    state: web::Data<AppState>,
    req: web::Json<CreateUser>,
) -> Result<HttpResponse, ApiError> {
    match state.student_service.register(req.into_inner()).await? {
        Registration::Created(outcome) => Ok(HttpResponse::Ok().json(outcome)),
        Registration::AlreadyExists => Ok(HttpResponse::Ok().json(MessageResponse {
            message: "user already exists",
        })),
    }
}

async fn promote(state: &AppState, id: &str, role: Role) -> Result<HttpResponse, ApiError> {
    let outcome = state.student_service.promote(id, role).await.map_err(|e| {
        error!(user_id = id, error = %e, "Failed to promote student");
        e
    })?;
    Ok(HttpResponse::Ok().json(outcome))
}

#[instrument(skip(state), fields(user_id = %*path))]
pub async fn make_admin(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    promote(&state, &path.into_inner(), Role::Admin).await
}

#[instrument(skip(state), fields(user_id = %*path))]
pub async fn make_instructor(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    promote(&state, &path.into_inner(), Role::Instructor).await
}

pub async fn list_classes(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let classes = state.catalog_service.list_classes().await?;
    Ok(HttpResponse::Ok().json(classes))
}

#[instrument(skip(state, req), fields(caller = %user.email))]
pub async fn create_class(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<NewClass>,
) -> Result<HttpResponse, ApiError> {
    let outcome = state.catalog_service.create_class(req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

#[instrument(skip(state), fields(caller = %user.email))]
pub async fn instructor_classes(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<EmailQuery>,
) -> Result<HttpResponse, ApiError> {
    let classes = state
        .catalog_service
        .classes_for_instructor(&user.email, query.email.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(classes))
}

pub async fn list_instructors(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let instructors = state.catalog_service.list_instructors().await?;
    Ok(HttpResponse::Ok().json(instructors))
}

#[instrument(skip(state), fields(caller = %user.email))]
pub async fn list_cart(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<EmailQuery>,
) -> Result<HttpResponse, ApiError> {
    let entries = state
        .checkout_service
        .cart_for(&user.email, query.email.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(entries))
}

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn add_to_cart(
    state: web::Data<AppState>,
    req: web::Json<NewCartEntry>,
) -> Result<HttpResponse, ApiError> {
    let outcome = state.checkout_service.add_to_cart(req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

#[instrument(skip(state), fields(entry_id = %*path))]
pub async fn remove_from_cart(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let outcome = state
        .checkout_service
        .remove_from_cart(&path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(outcome))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PaymentIntentResponse {
    client_secret: String,
}

#[instrument(skip(state), fields(caller = %user.email, price = req.price))]
pub async fn create_payment_intent(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<PaymentIntentRequest>,
) -> Result<HttpResponse, ApiError> {
    let client_secret = state
        .checkout_service
        .create_payment_intent(req.price)
        .await?;
    Ok(HttpResponse::Ok().json(PaymentIntentResponse { client_secret }))
}

#[instrument(skip(state, req), fields(price = req.price))]
pub async fn settle_payment(
    state: web::Data<AppState>,
    req: web::Json<NewPayment>,
) -> Result<HttpResponse, ApiError> {
    let outcome = state.checkout_service.settle(req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

#[instrument(skip(state), fields(caller = %user.email))]
pub async fn payment_history(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<EmailQuery>,
) -> Result<HttpResponse, ApiError> {
    let payments = state
        .checkout_service
        .payment_history(&user.email, query.email.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(payments))
}

#[instrument(skip(state), fields(admin = %admin.email))]
pub async fn admin_stats(
    state: web::Data<AppState>,
    admin: AdminUser,
) -> Result<HttpResponse, ApiError> {
    let stats = state.stats_service.compute_stats().await?;
    Ok(HttpResponse::Ok().json(stats))
}
