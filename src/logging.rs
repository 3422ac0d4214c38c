//! Tracing bootstrap for binaries and tests embedding the repository.
//!
//! The library only emits `tracing` events (`debug` per operation, `warn` for
//! interrupted calls and swallowed bulk failures). Installing a subscriber is
//! left to the application; `init_tracing` is a convenience for the common case.

use tracing_subscriber::EnvFilter;

/// Filter used when neither `RUST_LOG` nor an explicit directive is given.
pub const DEFAULT_FILTER: &str = "docrepo=info";

/// Install a global fmt subscriber.
///
/// `directive` overrides `RUST_LOG`; when both are absent `DEFAULT_FILTER`
/// applies. Returns `false` if a global subscriber was already installed,
/// so calling this more than once is harmless.
pub fn init_tracing(directive: Option<&str>) -> bool {
    let filter = match directive {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
