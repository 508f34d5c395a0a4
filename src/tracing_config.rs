//! Tracing setup for the `unparse` binary.
//!
//! The subscriber is only installed when `UNPARSE_LOG` (or `RUST_LOG`) is
//! set, so normal runs pay nothing. Output goes to stderr so it never mixes
//! with generated code on stdout.
//!
//! ```bash
//! UNPARSE_LOG=debug unparse emit tree.json
//! UNPARSE_LOG="ruby_unparse::emit=trace" unparse emit tree.json
//! ```

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives
pub const LOG_ENV: &str = "UNPARSE_LOG";

/// Build an `EnvFilter` from `UNPARSE_LOG`, falling back to `RUST_LOG`.
fn build_filter() -> EnvFilter {
    match std::env::var(LOG_ENV) {
        Ok(val) => EnvFilter::builder().parse_lossy(val),
        Err(_) => EnvFilter::from_default_env(),
    }
}

/// Initialise the global tracing subscriber.
pub fn init_tracing() {
    let requested = std::env::var(LOG_ENV).is_ok() || std::env::var("RUST_LOG").is_ok();
    if !requested {
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(build_filter())
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
