pub mod prelude;

pub use migrad_core as core;
#[cfg(feature = "nn")]
pub use migrad_nn as nn;
pub use migrad_scalar as scalar;
pub use migrad_tensor as tensor;

use std::sync::OnceLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

static TRACING: OnceLock<()> = OnceLock::new();

/// Installs a `fmt` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Only the first call in a process does anything. If another subscriber is
/// already installed it is left in place.
pub fn init_tracing() {
    TRACING.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);
        if Registry::default().with(filter).with(fmt_layer).try_init().is_err() {
            tracing::debug!(target: "migrad", "global subscriber already set");
        }
    });
}
