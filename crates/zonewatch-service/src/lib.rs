//! Zone orchestration service.
//!
//! Composes the geometry and risk engines from `zonewatch-core` with a TTL
//! cache, a retrying task queue, pluggable persistence, and a fire-and-forget
//! event channel. Hosts construct one [`service::ZoneService`] per process
//! and inject it wherever zone operations are needed.

pub mod backoff;
pub mod cache;
pub mod channel;
pub mod config;
pub mod environment;
pub mod error;
pub mod events;
pub mod persistence;
pub mod queue;
pub mod service;

pub use config::Config;
pub use error::{Result, ZoneError};
pub use service::{run_queue_worker, ZoneService};

/// Install the default tracing subscriber. Safe to call more than once;
/// later calls are no-ops.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
