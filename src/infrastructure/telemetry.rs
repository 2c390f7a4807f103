use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub const DEFAULT_FILTER: &str = "crawlyzer_auth=debug,actix_web=info";

/// Installs the global subscriber. `RUST_LOG` wins over `default_filter`.
pub fn init_tracing(default_filter: &str) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

  // A second call (tests, embedding) keeps the first subscriber
  let _ = tracing_subscriber::registry()
    .with(filter)
    .with(tracing_subscriber::fmt::layer())
    .try_init();
}
