//! Conformance test suite for `UnitOfWork` backends.
//!
//! This module provides a backend-agnostic test suite that any storage
//! backend can run to verify correctness. The suite covers:
//!
//! - **Repository**: create-or-replace writes, full replacement, store-owned copies, in-place updates
//! - **Errors**: correct error variants for missing lights
//! - **Scopes**: commit/rollback lifecycle, closed-scope detection, implicit rollback
//!
//! The suite does not check that a rollback discards writes: the in-memory
//! backend keeps them, and durable backends cover that in their own tests.
//!
//! # Usage
//!
//! Backend crates call [`run_conformance_suite`] with a factory function that
//! creates a fresh, empty unit of work for each test:
//!
//! ```ignore
//! use stoplight_storage::conformance::run_conformance_suite;
//!
//! #[tokio::test]
//! async fn postgres_conformance() {
//!     let report = run_conformance_suite(|| async {
//!         create_test_postgres_uow().await
//!     }).await;
//!     assert!(report.failed == 0, "{report}");
//! }
//! ```

mod error;
mod repository;
mod scope;

use std::fmt;
use std::future::Future;

use stoplight_core::{LightConfig, TrafficLight};

use crate::UnitOfWork;

/// Result of a single conformance test.
#[derive(Debug, Clone)]
pub struct TestResult {
    /// Test category (e.g. "repository", "scope").
    pub category: String,
    /// Test name (e.g. "get_after_upsert_returns_snapshot").
    pub name: String,
    pub passed: bool,
    /// Error message if the test failed.
    pub message: Option<String>,
}

impl TestResult {
    fn pass(category: &str, name: &str) -> Self {
        Self {
            category: category.to_string(),
            name: name.to_string(),
            passed: true,
            message: None,
        }
    }

    fn fail(category: &str, name: &str, msg: String) -> Self {
        Self {
            category: category.to_string(),
            name: name.to_string(),
            passed: false,
            message: Some(msg),
        }
    }

    fn from_result(category: &str, name: &str, result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Self::pass(category, name),
            Err(msg) => Self::fail(category, name, msg),
        }
    }
}

/// Aggregated report from a full conformance suite run.
#[derive(Debug, Clone)]
pub struct ConformanceReport {
    pub results: Vec<TestResult>,
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
}

impl fmt::Display for ConformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Conformance: {}/{} passed ({} failed)",
            self.passed, self.total, self.failed
        )?;
        for r in &self.results {
            if !r.passed {
                writeln!(
                    f,
                    "  FAIL [{}/{}]: {}",
                    r.category,
                    r.name,
                    r.message.as_deref().unwrap_or("(no message)")
                )?;
            }
        }
        Ok(())
    }
}

/// Run the full conformance suite against a storage backend.
///
/// The `factory` function is called once per test to create a fresh, empty
/// unit of work, ensuring test isolation.
pub async fn run_conformance_suite<U, F, Fut>(factory: F) -> ConformanceReport
where
    U: UnitOfWork,
    F: Fn() -> Fut,
    Fut: Future<Output = U>,
{
    let mut results = Vec::new();

    results.extend(repository::run_repository_tests(&factory).await);
    results.extend(error::run_error_tests(&factory).await);
    results.extend(scope::run_scope_tests(&factory).await);

    let passed = results.iter().filter(|r| r.passed).count();
    let total = results.len();

    ConformanceReport {
        results,
        passed,
        failed: total - passed,
        total,
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn make_light(green: i64, yellow: i64, red: i64) -> Result<TrafficLight, String> {
    TrafficLight::new(&LightConfig::new(green, yellow, red)).map_err(|e| e.to_string())
}
