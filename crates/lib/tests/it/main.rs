/*! Integration tests for xylem.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - workspace: path addressing against committed trees
 * - transaction: staged mutation scenarios over the public API
 * - repository: workspace lifecycle, isolation, and cloning
 * - backend: snapshot persistence and the metadata projection
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("xylem=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod backend;
mod helpers;
mod repository;
mod transaction;
mod workspace;
