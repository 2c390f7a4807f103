use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Label value for a completed call
pub const OUTCOME_OK: &str = "ok";

/// Counters for the auth endpoints, exposed on `GET /metrics`
#[derive(Clone)]
pub struct AuthMetrics {
  registry: Registry,
  operations: IntCounterVec,
}

impl AuthMetrics {
  pub fn new() -> Result<Self, prometheus::Error> {
    let registry = Registry::new();

    let operations = IntCounterVec::new(
      Opts::new("auth_operations_total", "Auth operations by outcome"),
      &["operation", "outcome"],
    )?;
    registry.register(Box::new(operations.clone()))?;

    #[cfg(target_os = "linux")]
    registry.register(Box::new(
      prometheus::process_collector::ProcessCollector::for_self(),
    ))?;

    Ok(Self {
      registry,
      operations,
    })
  }

  pub fn record(&self, operation: &str, outcome: &str) {
    self
      .operations
      .with_label_values(&[operation, outcome])
      .inc();
  }

  pub fn count(&self, operation: &str, outcome: &str) -> u64 {
    self
      .operations
      .with_label_values(&[operation, outcome])
      .get()
  }

  /// Text exposition format
  pub fn render(&self) -> Result<String, prometheus::Error> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;

    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_record_and_render() {
    let metrics = AuthMetrics::new().unwrap();

    metrics.record("login", OUTCOME_OK);
    metrics.record("login", OUTCOME_OK);
    metrics.record("login", "invalid_credentials");

    assert_eq!(metrics.count("login", OUTCOME_OK), 2);
    assert_eq!(metrics.count("login", "invalid_credentials"), 1);
    assert_eq!(metrics.count("register", OUTCOME_OK), 0);

    let text = metrics.render().unwrap();
    assert!(text.contains("auth_operations_total{operation=\"login\",outcome=\"ok\"} 2"));
  }

  #[test]
  fn test_instances_do_not_share_counters() {
    let first = AuthMetrics::new().unwrap();
    let second = AuthMetrics::new().unwrap();

    first.record("logout", OUTCOME_OK);
    assert_eq!(second.count("logout", OUTCOME_OK), 0);
  }
}
