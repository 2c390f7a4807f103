//! Caller-supplied cancellation and deadline for a single operation.
//!
//! The core never invents a timeout of its own. When the hosting layer hands
//! in a token or a deadline, every store call made on its behalf stops waiting
//! as soon as either fires.

use std::future::{Future, pending};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Why a guarded call stopped before completing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupted {
  Cancelled,
  DeadlineExceeded,
}

#[derive(Debug, Clone, Default)]
pub struct OperationContext {
  cancellation: Option<CancellationToken>,
  deadline: Option<Instant>,
}

impl OperationContext {
  /// No cancellation, no deadline
  pub fn background() -> Self {
    Self::default()
  }

  pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
    self.cancellation = Some(token);
    self
  }

  pub fn with_deadline(mut self, deadline: Instant) -> Self {
    self.deadline = Some(deadline);
    self
  }

  pub fn with_timeout(self, timeout: Duration) -> Self {
    self.with_deadline(Instant::now() + timeout)
  }

  pub fn deadline(&self) -> Option<Instant> {
    self.deadline
  }

  pub fn is_cancelled(&self) -> bool {
    self
      .cancellation
      .as_ref()
      .is_some_and(CancellationToken::is_cancelled)
  }

  /// Drives `future` unless the context is cancelled or its deadline passes first.
  pub async fn run<F, T>(&self, future: F) -> Result<T, Interrupted>
  where
    F: Future<Output = T>,
  {
    let cancelled = async {
      match &self.cancellation {
        Some(token) => token.cancelled().await,
        None => pending::<()>().await,
      }
    };

    let expired = async {
      match self.deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => pending::<()>().await,
      }
    };

    tokio::select! {
      biased;
      _ = cancelled => Err(Interrupted::Cancelled),
      _ = expired => Err(Interrupted::DeadlineExceeded),
      output = future => Ok(output),
    }
  }
}
