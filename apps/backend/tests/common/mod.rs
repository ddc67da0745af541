//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext for setting up test environment with database
//! - Helpers for building courses with modules and lessons
//! - Authentication helpers
//!
//! # Requirements
//! Integration tests require a PostgreSQL database (set DATABASE_URL env var).

#![allow(dead_code)]

pub mod fixtures;

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use progression_core::PointsPolicy;
use uuid::Uuid;

use campus_backend::config::Config;
use campus_backend::db::Database;
use campus_backend::models::{Course, Lesson, Module};
use campus_backend::{build_router, AppState};

/// Test context containing database connection and router.
///
/// Requires DATABASE_URL environment variable to be set.
pub struct TestContext {
    pub db: Arc<Database>,
    app: Router,
}

/// A course built directly through the database, modules and lessons in creation order.
pub struct SeededCourse {
    pub course: Course,
    pub modules: Vec<Module>,
    pub lessons: Vec<Vec<Lesson>>,
}

impl SeededCourse {
    pub fn module_ids(&self) -> Vec<Uuid> {
        self.modules.iter().map(|m| m.id).collect()
    }

    pub fn lesson_ids(&self) -> Vec<Uuid> {
        self.lessons.iter().flatten().map(|l| l.id).collect()
    }
}

impl TestContext {
    /// Create a new test context.
    ///
    /// # Panics
    /// Panics if DATABASE_URL is not set or database connection fails.
    pub async fn new() -> Self {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

        let db = Database::connect(&database_url, 10)
            .await
            .expect("Failed to connect to test database");

        db.run_migrations()
            .await
            .expect("Failed to run migrations");

        let db = Arc::new(db);

        let config = Config {
            database_url,
            host: "127.0.0.1".to_string(),
            port: 0,
            max_connections: 10,
            leaderboard_default_limit: 10,
            points: PointsPolicy::default(),
        };

        let state = AppState {
            db: db.clone(),
            config: Arc::new(config),
        };

        Self {
            db,
            app: build_router(state),
        }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Create a test user and return its ID and token.
    pub async fn create_test_user(&self, name: &str) -> (Uuid, String) {
        let (user, token) = self
            .db
            .create_user(name)
            .await
            .expect("Failed to create test user");
        (user.id, token)
    }

    /// Format authorization header value.
    pub fn auth_header_value(token: &str) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {}", token)).expect("valid header value")
    }

    /// Create a course owned by `instructor_id` with one module per entry of
    /// `lessons_per_module`, each holding that many lessons.
    pub async fn seed_course(&self, instructor_id: Uuid, lessons_per_module: &[usize]) -> SeededCourse {
        let course = self
            .db
            .create_course(instructor_id, "Test course", None)
            .await
            .expect("Failed to create course");

        let mut modules = Vec::new();
        let mut lessons = Vec::new();
        for (m, &count) in lessons_per_module.iter().enumerate() {
            let module = self
                .db
                .create_module(course.id, &format!("Module {}", m + 1))
                .await
                .expect("Failed to create module");

            let mut module_lessons = Vec::new();
            for l in 0..count {
                let lesson = self
                    .db
                    .create_lesson(module.id, &format!("Lesson {}.{}", m + 1, l + 1), "")
                    .await
                    .expect("Failed to create lesson");
                module_lessons.push(lesson);
            }

            modules.push(module);
            lessons.push(module_lessons);
        }

        SeededCourse {
            course,
            modules,
            lessons,
        }
    }

    /// Clean up test data for a user.
    ///
    /// Courses, progress, points and feed rows cascade from the user.
    pub async fn cleanup_user(&self, user_id: Uuid) {
        let _ = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;
    }
}
