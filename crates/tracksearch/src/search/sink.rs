//! Where published result sets go.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::session::SessionToken;
use crate::types::SearchHit;

/// Receives the complete matching set after every sweep.
///
/// Called from the matcher thread. Implementations must not call back into
/// the `TrackSearch` that owns the matcher.
pub trait ResultSink: Send + Sync {
    fn set_results(&self, results: Vec<SearchHit>);
}

impl<F> ResultSink for F
where
    F: Fn(Vec<SearchHit>) + Send + Sync,
{
    fn set_results(&self, results: Vec<SearchHit>) {
        self(results)
    }
}

/// Forwards results only while its session is the active one.
///
/// The gate is shared with the session owner, which holds it while bumping
/// the session version, so nothing is published after a restart or cancel.
pub(crate) struct SessionSink {
    inner: Arc<dyn ResultSink>,
    token: SessionToken,
    gate: Arc<Mutex<()>>,
    published: AtomicUsize,
}

impl SessionSink {
    pub(crate) fn new(inner: Arc<dyn ResultSink>, token: SessionToken, gate: Arc<Mutex<()>>) -> Self {
        Self {
            inner,
            token,
            gate,
            published: AtomicUsize::new(0),
        }
    }

    /// Size of the last result set forwarded.
    pub(crate) fn published(&self) -> usize {
        self.published.load(Ordering::Relaxed)
    }
}

impl ResultSink for SessionSink {
    fn set_results(&self, results: Vec<SearchHit>) {
        let _gate = self.gate.lock();
        if self.token.is_cancelled().is_none() {
            log::trace!(
                "dropping results of stale session version={} count={}",
                self.token.version(),
                results.len()
            );
            return;
        }
        self.published.store(results.len(), Ordering::Relaxed);
        self.inner.set_results(results);
    }
}
