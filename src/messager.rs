use std::sync::Arc;

use parking_lot::RwLock;

use crate::corpus::TestRecord;
use crate::metrics::EvaluationState;

/// Snapshot sent after every evaluated record.
#[derive(Clone, Debug, PartialEq, new)]
pub struct Progress {
    /// counters including `record`
    pub state: EvaluationState,
    pub record: TestRecord,
    pub passed: bool,
}

/// Downstream subscriber of evaluation progress.
///
/// Subscribers only ever see copies; the evaluator keeps the one live state.
pub trait ProgressObserver {
    fn on_progress(&mut self, progress: &Progress);
}

impl ProgressObserver for () {
    fn on_progress(&mut self, _: &Progress) {}
}

impl<F> ProgressObserver for F
where
    F: FnMut(&Progress),
{
    fn on_progress(&mut self, progress: &Progress) {
        self(progress)
    }
}

impl ProgressObserver for chan::Sender<Progress> {
    fn on_progress(&mut self, progress: &Progress) {
        if self.send(progress.clone()).is_err() {
            log::trace!("progress receiver is gone, dropping snapshot");
        }
    }
}

/// Keeps only the newest snapshot, for a presentation thread that polls at
/// its own pace.
#[derive(Clone, Debug, Default)]
pub struct LatestProgress {
    inner: Arc<RwLock<Option<Progress>>>,
}

impl LatestProgress {
    pub fn new() -> LatestProgress {
        LatestProgress::default()
    }

    pub fn get(&self) -> Option<Progress> {
        self.inner.read().clone()
    }

    pub fn state(&self) -> EvaluationState {
        self.inner
            .read()
            .as_ref()
            .map(|progress| progress.state)
            .unwrap_or_default()
    }
}

impl ProgressObserver for LatestProgress {
    fn on_progress(&mut self, progress: &Progress) {
        *self.inner.write() = Some(progress.clone());
    }
}
