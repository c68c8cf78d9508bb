pub mod domain {
    pub mod error;
    pub mod gateway;
    pub mod models;
    pub mod repository;
    pub mod user;
}

pub mod data {
    pub mod catalog_repository;
    pub mod checkout_repository;
    pub mod database;
    pub mod user_repository;
}

pub mod application {
    pub mod auth_service;
    pub mod catalog_service;
    pub mod checkout_service;
    pub mod stats_service;
    pub mod student_service;
}

pub mod infrastructure {
    pub mod config;
    pub mod logging;
    pub mod payment_gateway;
    pub mod security;
}

pub mod presentation {
    pub mod auth;
    pub mod handlers;
    pub mod middleware;
    pub mod routes;
}
