pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
pub mod shared;
pub mod state;

pub use state::AppState;

/// Initializes tracing for binaries and long-running embedders. Tests and
/// library consumers that install their own subscriber skip this.
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tsunagi=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
