//! Shared embedded `PostgreSQL` cluster for integration tests.
//!
//! The cluster is bootstrapped once per test binary. When the tests run as
//! root, `pg-embed-setup-unpriv` delegates lifecycle steps to this crate's
//! `pg_worker` binary, which is located through Cargo unless
//! `PG_EMBEDDED_WORKER` already names one.

use std::fmt::Display;

use eyre::{Result, eyre};
use pg_embedded_setup_unpriv::ClusterHandle;
use pg_embedded_setup_unpriv::test_support::shared_cluster_handle;

const WORKER_ENV: &str = "PG_EMBEDDED_WORKER";

/// Returns the process-wide cluster handle.
///
/// # Errors
///
/// Returns an error when the cluster cannot be bootstrapped.
pub fn shared_cluster() -> Result<&'static ClusterHandle> {
    let _worker_guard = std::env::var_os(WORKER_ENV)
        .is_none()
        .then(|| env_lock::lock_env([(WORKER_ENV, Some(env!("CARGO_BIN_EXE_pg_worker")))]));
    shared_cluster_handle().map_err(|err| eyre!("embedded cluster bootstrap failed: {err:?}"))
}

/// Returns true when `SKIP_TEST_CLUSTER` is `1`, `true`, or `yes`.
#[must_use]
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skips the calling test when `SKIP_TEST_CLUSTER` is set and fails it
/// otherwise, so a broken cluster never passes silently in CI.
///
/// # Panics
///
/// Panics with `reason` unless `SKIP_TEST_CLUSTER` is set.
#[expect(
    clippy::print_stderr,
    reason = "skip marker must reach the test runner output"
)]
pub fn handle_cluster_setup_failure<T>(reason: impl Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}
