//! The error sink shared by a symbol state and its clones.
//!
//! Features:
//! - Error limit to stop collecting after too many errors
//! - Interior locking, so every clone of a state can report through one `Arc`

use parking_lot::Mutex;

use crate::{Diagnostic, ErrorCode};

/// Anything that accepts diagnostics.
pub trait DiagnosticSink: Send + Sync {
    /// Record a diagnostic. Returns `false` if it was filtered out.
    fn push(&self, diagnostic: Diagnostic) -> bool;
}

#[derive(Debug, Default)]
struct QueueState {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    /// Diagnostics rejected because the limit was reached.
    dropped: usize,
}

/// Thread-safe diagnostic queue.
///
/// # Example
///
/// ```text
/// let errors = Arc::new(ErrorQueue::with_limit(100));
/// let gs = GlobalState::new(Arc::clone(&errors));
/// // ... run passes
/// for diagnostic in errors.drain() { ... }
/// ```
#[derive(Debug, Default)]
pub struct ErrorQueue {
    state: Mutex<QueueState>,
    /// Maximum number of errors kept (0 = unlimited).
    limit: usize,
}

impl ErrorQueue {
    /// Create a queue with no error limit.
    pub fn new() -> Self {
        Self::with_limit(0)
    }

    /// Create a queue that stops accepting after `limit` errors.
    pub fn with_limit(limit: usize) -> Self {
        ErrorQueue {
            state: Mutex::new(QueueState::default()),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    fn add(&self, diagnostic: Diagnostic) -> bool {
        let mut state = self.state.lock();
        if self.limit > 0 && state.error_count >= self.limit {
            state.dropped += 1;
            return false;
        }
        if diagnostic.is_error() {
            state.error_count += 1;
        }
        state.diagnostics.push(diagnostic);
        true
    }

    pub fn limit_reached(&self) -> bool {
        self.limit > 0 && self.state.lock().error_count >= self.limit
    }

    pub fn error_count(&self) -> usize {
        self.state.lock().error_count
    }

    pub fn dropped_count(&self) -> usize {
        self.state.lock().dropped
    }

    pub fn len(&self) -> usize {
        self.state.lock().diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().diagnostics.is_empty()
    }

    /// Copy of the collected diagnostics, in report order.
    pub fn snapshot(&self) -> Vec<Diagnostic> {
        self.state.lock().diagnostics.clone()
    }

    /// Take every collected diagnostic and reset the counters.
    pub fn drain(&self) -> Vec<Diagnostic> {
        let mut state = self.state.lock();
        state.error_count = 0;
        state.dropped = 0;
        std::mem::take(&mut state.diagnostics)
    }

    /// Codes of the collected diagnostics, in report order.
    pub fn codes(&self) -> Vec<ErrorCode> {
        self.state.lock().diagnostics.iter().map(|d| d.code).collect()
    }

    pub fn count_of(&self, code: ErrorCode) -> usize {
        self.state
            .lock()
            .diagnostics
            .iter()
            .filter(|d| d.code == code)
            .count()
    }
}

impl DiagnosticSink for ErrorQueue {
    fn push(&self, diagnostic: Diagnostic) -> bool {
        self.add(diagnostic)
    }
}
