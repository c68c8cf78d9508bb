use actix_web::{App, http::StatusCode, test, web};
use serde_json::{Value, json};
use sports_academy_api::data::database::AcademyDatabase;
use sports_academy_api::domain::gateway::PaymentGateway;
use sports_academy_api::domain::models::{DeleteOutcome, InsertOutcome, SettlementOutcome};
use sports_academy_api::domain::repository::{CheckoutRepository, UserRepository};
use sports_academy_api::domain::user::{Role, User};
use sports_academy_api::infrastructure::security::generate_token;
use sports_academy_api::presentation::handlers::AppState;
use sports_academy_api::presentation::middleware::JwtAuthMiddleware;
use sports_academy_api::presentation::routes::configure;
use std::sync::{Arc, Mutex};

const SECRET: &str = "test-secret-key-for-checkout-tests";

/// Records requested amounts and hands back a predictable secret.
#[derive(Default)]
struct RecordingGateway {
    amounts: Mutex<Vec<(u64, String)>>,
}

#[async_trait::async_trait]
impl PaymentGateway for RecordingGateway {
    async fn create_intent(&self, amount: u64, currency: &str) -> anyhow::Result<String> {
        self.amounts
            .lock()
            .unwrap()
            .push((amount, currency.to_string()));
        Ok(format!("pi_{}_secret", amount))
    }
}

macro_rules! setup_checkout_test {
    () => {{
        let db = AcademyDatabase::open();
        let gateway = Arc::new(RecordingGateway::default());
        let state = web::Data::new(AppState::new(
            &db,
            SECRET.to_string(),
            gateway.clone(),
            "usd".to_string(),
        ));

        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .wrap(JwtAuthMiddleware::new(state.auth_service.clone()))
                .configure(configure),
        )
        .await;

        (app, db, gateway)
    }};
}

fn bearer(email: &str) -> (&'static str, String) {
    (
        "Authorization",
        format!("Bearer {}", generate_token(email, SECRET).unwrap()),
    )
}

async fn cart_ids(db: &AcademyDatabase, email: &str) -> Vec<String> {
    db.checkout
        .list_cart_entries(email)
        .await
        .unwrap()
        .into_iter()
        .map(|entry| entry.id)
        .collect()
}

macro_rules! add_to_cart {
    ($app:expr, $email:expr, $class:expr) => {{
        let req = test::TestRequest::post()
            .uri("/carts")
            .set_json(json!({ "email": $email, "classItemId": $class, "price": 20 }))
            .to_request();
        let outcome: InsertOutcome = test::call_and_read_body_json(&$app, req).await;
        outcome.inserted_id
    }};
}

#[actix_web::test]
async fn test_owner_lists_own_cart() {
    let (app, _db, _gateway) = setup_checkout_test!();
    add_to_cart!(app, "kim@example.com", "c1");
    add_to_cart!(app, "kim@example.com", "c2");
    add_to_cart!(app, "lee@example.com", "c3");

    let req = test::TestRequest::get()
        .uri("/carts?email=kim@example.com")
        .insert_header(bearer("kim@example.com"))
        .to_request();
    let cart: Vec<Value> = test::call_and_read_body_json(&app, req).await;

    assert_eq!(cart.len(), 2);
    assert!(cart.iter().all(|entry| entry["email"] == "kim@example.com"));
}

#[actix_web::test]
async fn test_cart_of_other_email_is_forbidden_and_not_leaked() {
    let (app, _db, _gateway) = setup_checkout_test!();
    add_to_cart!(app, "lee@example.com", "secret-class");

    let req = test::TestRequest::get()
        .uri("/carts?email=lee@example.com")
        .insert_header(bearer("kim@example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let body = test::read_body(resp).await;
    let text = String::from_utf8_lossy(&body);
    assert!(!text.contains("secret-class"));
}

#[actix_web::test]
async fn test_cart_without_email_query_is_empty() {
    let (app, _db, _gateway) = setup_checkout_test!();
    add_to_cart!(app, "kim@example.com", "c1");

    let req = test::TestRequest::get()
        .uri("/carts")
        .insert_header(bearer("kim@example.com"))
        .to_request();
    let cart: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert!(cart.is_empty());
}

#[actix_web::test]
async fn test_instructor_classes_are_ownership_checked() {
    let (app, _db, _gateway) = setup_checkout_test!();

    let req = test::TestRequest::post()
        .uri("/classes")
        .insert_header(bearer("coach@example.com"))
        .set_json(json!({ "name": "Karate", "instructorEmail": "coach@example.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/classes/instructor?email=coach@example.com")
        .insert_header(bearer("coach@example.com"))
        .to_request();
    let classes: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0]["name"], "Karate");

    let req = test::TestRequest::get()
        .uri("/classes/instructor?email=coach@example.com")
        .insert_header(bearer("kim@example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body = test::read_body(resp).await;
    assert!(!String::from_utf8_lossy(&body).contains("Karate"));
}

#[actix_web::test]
async fn test_delete_cart_entry() {
    let (app, db, _gateway) = setup_checkout_test!();
    let id = add_to_cart!(app, "kim@example.com", "c1");

    let req = test::TestRequest::delete()
        .uri(&format!("/carts/{}", id))
        .to_request();
    let outcome: DeleteOutcome = test::call_and_read_body_json(&app, req).await;
    assert_eq!(outcome.deleted_count, 1);
    assert!(!cart_ids(&db, "kim@example.com").await.contains(&id));
}

#[actix_web::test]
async fn test_settlement_clears_cart_and_records_payment() {
    let (app, db, _gateway) = setup_checkout_test!();
    let a = add_to_cart!(app, "kim@example.com", "c1");
    let b = add_to_cart!(app, "kim@example.com", "c2");
    let c = add_to_cart!(app, "kim@example.com", "c3");
    let untouched = add_to_cart!(app, "kim@example.com", "c4");

    let req = test::TestRequest::post()
        .uri("/payments")
        .set_json(json!({
            "email": "kim@example.com",
            "price": 60,
            "transactionId": "pi_123",
            "cartItems": [a, b, c]
        }))
        .to_request();
    let outcome: SettlementOutcome = test::call_and_read_body_json(&app, req).await;

    assert_eq!(outcome.delete_result.deleted_count, 3);
    assert_eq!(outcome.removed_cart_item_ids.len(), 3);
    assert_eq!(cart_ids(&db, "kim@example.com").await, vec![untouched]);

    let req = test::TestRequest::get()
        .uri("/payments?email=kim@example.com")
        .insert_header(bearer("kim@example.com"))
        .to_request();
    let history: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["_id"], Value::from(outcome.insert_result.inserted_id));
    assert_eq!(history[0]["cartItems"], json!([a, b, c]));
    assert_eq!(history[0]["transactionId"], "pi_123");
}

#[actix_web::test]
async fn test_failed_settlement_keeps_cart_entries() {
    let (app, db, _gateway) = setup_checkout_test!();
    let a = add_to_cart!(app, "kim@example.com", "c1");
    let b = add_to_cart!(app, "kim@example.com", "c2");

    let req = test::TestRequest::post()
        .uri("/payments")
        .set_json(json!({
            "_id": "receipt-1",
            "email": "kim@example.com",
            "price": 10,
            "cartItems": []
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Reusing the receipt id makes the insert step fail
    let req = test::TestRequest::post()
        .uri("/payments")
        .set_json(json!({
            "_id": "receipt-1",
            "email": "kim@example.com",
            "price": 40,
            "cartItems": [a, b]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    assert_eq!(cart_ids(&db, "kim@example.com").await, vec![a, b]);
    assert_eq!(db.checkout.count_payments().await.unwrap(), 1);
    assert_eq!(db.checkout.total_revenue().await.unwrap(), 10.0);
}

#[actix_web::test]
async fn test_payment_history_of_other_email_is_forbidden() {
    let (app, _db, _gateway) = setup_checkout_test!();

    let req = test::TestRequest::get()
        .uri("/payments?email=lee@example.com")
        .insert_header(bearer("kim@example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_create_payment_intent_uses_minor_units() {
    let (app, _db, gateway) = setup_checkout_test!();

    let req = test::TestRequest::post()
        .uri("/create-payment-intent")
        .insert_header(bearer("kim@example.com"))
        .set_json(json!({ "price": 15.5 }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body, json!({ "clientSecret": "pi_1550_secret" }));
    assert_eq!(
        gateway.amounts.lock().unwrap().as_slice(),
        &[(1550, "usd".to_string())]
    );
}

#[actix_web::test]
async fn test_create_payment_intent_requires_token() {
    let (app, _db, gateway) = setup_checkout_test!();

    let req = test::TestRequest::post()
        .uri("/create-payment-intent")
        .set_json(json!({ "price": 15.5 }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(gateway.amounts.lock().unwrap().is_empty());
}

#[actix_web::test]
async fn test_negative_price_is_rejected() {
    let (app, _db, gateway) = setup_checkout_test!();

    let req = test::TestRequest::post()
        .uri("/create-payment-intent")
        .insert_header(bearer("kim@example.com"))
        .set_json(json!({ "price": -3 }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(gateway.amounts.lock().unwrap().is_empty());
}

#[actix_web::test]
async fn test_admin_stats_sum_revenue() {
    let (app, db, _gateway) = setup_checkout_test!();
    db.students
        .save_user(User {
            id: "admin-1".to_string(),
            email: "boss@example.com".to_string(),
            role: Some(Role::Admin),
            profile: serde_json::Map::new(),
        })
        .await
        .unwrap();

    for price in [10.0, 15.5] {
        let req = test::TestRequest::post()
            .uri("/payments")
            .set_json(json!({ "email": "kim@example.com", "price": price, "cartItems": [] }))
            .to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get()
        .uri("/admin-stats")
        .insert_header(bearer("boss@example.com"))
        .to_request();
    let stats: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(stats["revenue"], 25.5);
    assert_eq!(stats["paidClassCount"], 2);
    assert_eq!(stats["studentCount"], 1);
    assert_eq!(stats["classCount"], 0);
}
