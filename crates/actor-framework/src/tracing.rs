//! # Tracing Setup
//!
//! One subscriber for the whole process. Actors log with an `entity_type` field and
//! every request runs inside a `request` span carrying `op`, so the module path is
//! left out of the output.
//!
//! ```text
//! RUST_LOG=info                              lifecycle events only
//! RUST_LOG=debug                             every request with its payload
//! RUST_LOG=crisper_storefront=debug,warn     one crate verbose, the rest quiet
//! ```

use tracing_subscriber::EnvFilter;

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`.
///
/// Calling it again (from several tests, say) keeps the first subscriber.
pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .try_init();
}
