pub mod config;
pub mod executor;
pub mod model;
pub mod normalize;
pub mod sink;

// Re-export common types for convenience
pub use config::*;
pub use executor::*;
pub use model::*;
pub use normalize::*;
pub use sink::*;

/// Installs the process-wide tracing subscriber, honoring `RUST_LOG`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
