//! Helpers for integration tests.
#![allow(dead_code)]

use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pushkind_common::domain::auth::AuthenticatedUser;

use pushkind_storefront::db::{DbPool, establish_connection_pool};
use pushkind_storefront::domain::checkout::ShippingAddress;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!(); // assumes migrations/ exists

/// Temporary database used in integration tests.
pub struct TestDb {
    filename: String,
    pool: DbPool,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        std::fs::remove_file(filename).ok(); // Clean up old DB

        let pool =
            establish_connection_pool(filename).expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            filename: filename.to_string(),
            pool,
        }
    }
    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        std::fs::remove_file(&self.filename).ok();
        std::fs::remove_file(format!("{}-shm", &self.filename)).ok();
        std::fs::remove_file(format!("{}-wal", &self.filename)).ok();
    }
}

pub fn buyer(hub_id: i32, sub: &str) -> AuthenticatedUser {
    AuthenticatedUser {
        sub: sub.to_string(),
        email: format!("{sub}@example.com"),
        hub_id,
        name: sub.to_string(),
        roles: Vec::new(),
        exp: 0,
    }
}

pub fn address() -> ShippingAddress {
    ShippingAddress {
        full_name: "Jane Doe".to_string(),
        address_line_1: "1 Main St".to_string(),
        address_line_2: None,
        city: "Springfield".to_string(),
        state_province_region: "IL".to_string(),
        postal_zip_code: "62701".to_string(),
        country_region: "US".to_string(),
        telephone_number: "555-0100".to_string(),
    }
}
