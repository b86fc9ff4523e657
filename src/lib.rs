pub mod config;
pub mod db;
pub mod domain;
pub mod forms;
pub mod models;
pub mod notifier;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;

/// Role required for store operator endpoints.
pub const SERVICE_ACCESS_ROLE: &str = "admin";
