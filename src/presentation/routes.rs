use crate::presentation::auth::{check_admin, check_instructor, issue_token};
use crate::presentation::handlers::{
    add_to_cart, admin_stats, create_class, create_payment_intent, instructor_classes,
    list_cart, list_classes, list_instructors, list_students, liveness, make_admin,
    make_instructor, payment_history, register_student, remove_from_cart, settle_payment,
};
use actix_web::web;

/// Registers every endpoint. Authentication and role requirements are carried
/// by the handlers' extractor arguments.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(liveness))
        .route("/jwt", web::post().to(issue_token))
        .service(
            web::resource("/students")
                .route(web::get().to(list_students))
                .route(web::post().to(register_student)),
        )
        .route("/student/admin/{email}", web::get().to(check_admin))
        .route("/student/instructor/{email}", web::get().to(check_instructor))
        .route("/students/admin/{id}", web::patch().to(make_admin))
        .route("/students/instructor/{id}", web::patch().to(make_instructor))
        .service(
            web::resource("/classes")
                .route(web::get().to(list_classes))
                .route(web::post().to(create_class)),
        )
        .route("/classes/instructor", web::get().to(instructor_classes))
        .route("/instructors", web::get().to(list_instructors))
        .service(
            web::resource("/carts")
                .route(web::get().to(list_cart))
                .route(web::post().to(add_to_cart)),
        )
        .route("/carts/{id}", web::delete().to(remove_from_cart))
        .route("/create-payment-intent", web::post().to(create_payment_intent))
        .service(
            web::resource("/payments")
                .route(web::get().to(payment_history))
                .route(web::post().to(settle_payment)),
        )
        .route("/admin-stats", web::get().to(admin_stats));
}
