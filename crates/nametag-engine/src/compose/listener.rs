use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Observer for a running generation.
///
/// Both hooks run on the compositor thread between badges, never concurrently.
pub trait BatchListener {
    /// Called after every badge with the 1-based count of badges placed.
    fn on_progress(&mut self, _current: usize, _total: usize) {}

    /// Called at every batch boundary.
    fn on_batch_complete(&mut self, _completed: usize, _total: usize) {}
}

/// Listener that ignores everything
impl BatchListener for () {}

/// Adapts a progress closure into a [`BatchListener`]
pub struct ProgressFn<F>(pub F);

impl<F> BatchListener for ProgressFn<F>
where
    F: FnMut(usize, usize),
{
    fn on_progress(&mut self, current: usize, total: usize) {
        (self.0)(current, total)
    }
}

/// Cooperative cancellation flag, checked at batch boundaries
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
