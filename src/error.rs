use crate::{counters::Op, site::CallSite};

/// Errors raised by the tracked allocation layer.
///
/// The C-shaped entry points never return this; they render it into the
/// error diagnostic and hand the caller a null pointer. The `try_*` methods
/// on [`Tracker`](crate::Tracker) return it directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AllocError {
  /// The platform allocator returned null.
  #[error("{op} failed at {site}")]
  AllocationFailure { op: Op, site: CallSite },
}

impl AllocError {
  pub fn op(&self) -> Op {
    match self {
      AllocError::AllocationFailure { op, .. } => *op,
    }
  }

  pub fn site(&self) -> CallSite {
    match self {
      AllocError::AllocationFailure { site, .. } => *site,
    }
  }
}
