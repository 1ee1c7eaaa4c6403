use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use crate::corpus::TestRecord;
use crate::messager::{Progress, ProgressObserver};
use crate::metrics::EvaluationState;
use crate::oracle::{self, GlyphOracle};
use crate::running_tracker::RunningTracker;
use crate::version::EmojiVersion;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// every record was evaluated
    Completed,
    /// stopped early, by the tracker or the record limit; counters cover
    /// the records seen so far
    Cancelled,
}

#[derive(Clone, Debug)]
pub struct Evaluation {
    state: EvaluationState,
    outcome: Outcome,
    groups: Vec<(String, EvaluationState)>,
    versions: BTreeMap<EmojiVersion, EvaluationState>,
    failed: Vec<TestRecord>,
}

impl Evaluation {
    pub fn state(&self) -> EvaluationState {
        self.state
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Per `# group:` counters, in corpus order.
    pub fn groups(&self) -> &[(String, EvaluationState)] {
        &self.groups
    }

    /// Counters keyed by the version each emoji was introduced in.
    pub fn versions(&self) -> &BTreeMap<EmojiVersion, EvaluationState> {
        &self.versions
    }

    /// Records the oracle refused, in corpus order. Empty unless the
    /// evaluator was asked to [collect](Evaluator::collect_failures) them.
    pub fn failed(&self) -> &[TestRecord] {
        &self.failed
    }
}

/// Drives records through the formatter and the oracle.
///
/// Single writer of the running [`EvaluationState`]; observers get a
/// [`Progress`] copy after every record.
pub struct Evaluator<'a, O: ?Sized, S> {
    oracle: &'a mut O,
    observer: S,
    tracker: Option<&'a RunningTracker>,
    limit: Option<u64>,
    collect_failures: bool,
    state: EvaluationState,
    group_index: FxHashMap<String, usize>,
    groups: Vec<(String, EvaluationState)>,
    versions: BTreeMap<EmojiVersion, EvaluationState>,
    failed: Vec<TestRecord>,
}

impl<'a, O, S> Evaluator<'a, O, S>
where
    O: GlyphOracle + ?Sized,
    S: ProgressObserver,
{
    pub fn new(oracle: &'a mut O, observer: S) -> Self {
        Evaluator {
            oracle,
            observer,
            tracker: None,
            limit: None,
            collect_failures: false,
            state: EvaluationState::new(),
            group_index: FxHashMap::default(),
            groups: Vec::new(),
            versions: BTreeMap::new(),
            failed: Vec::new(),
        }
    }

    pub fn with_tracker(mut self, tracker: &'a RunningTracker) -> Self {
        self.tracker = Some(tracker);
        self
    }

    /// Stop once `limit` records have been evaluated.
    pub fn with_limit(mut self, limit: Option<u64>) -> Self {
        self.limit = limit;
        self
    }

    /// Keep a copy of every refused record in [`Evaluation::failed`].
    pub fn collect_failures(mut self, collect: bool) -> Self {
        self.collect_failures = collect;
        self
    }

    pub fn run<I>(mut self, records: I) -> Evaluation
    where
        I: IntoIterator<Item = TestRecord>,
    {
        let mut outcome = Outcome::Completed;
        for record in records {
            if self.limit == Some(self.state.num_total()) {
                log::info!("record limit of {} reached", self.state.num_total());
                outcome = Outcome::Cancelled;
                break;
            }
            if let Some(tracker) = self.tracker {
                if !tracker.is_running() {
                    log::info!(
                        "evaluation cancelled after {} records",
                        self.state.num_total()
                    );
                    outcome = Outcome::Cancelled;
                    break;
                }
            }
            self.step(record);
        }
        log::info!("evaluation finished: {}", self.state);
        Evaluation {
            state: self.state,
            outcome,
            groups: self.groups,
            versions: self.versions,
            failed: self.failed,
        }
    }

    fn step(&mut self, record: TestRecord) {
        let passed = oracle::query(&mut *self.oracle, &record.text());
        log::debug!("{} -> {}", record, passed);

        self.state.record(passed);
        if let Some(group) = record.group() {
            let idx = match self.group_index.get(group) {
                Some(idx) => *idx,
                None => {
                    self.groups.push((group.to_string(), EvaluationState::new()));
                    self.group_index.insert(group.to_string(), self.groups.len() - 1);
                    self.groups.len() - 1
                }
            };
            self.groups[idx].1.record(passed);
        }
        if let Some(version) = record.introduced() {
            self.versions.entry(version).or_default().record(passed);
        }

        let progress = Progress::new(self.state, record, passed);
        self.observer.on_progress(&progress);
        if !passed && self.collect_failures {
            self.failed.push(progress.record);
        }
    }
}

/// Evaluates `records` to exhaustion, or until `tracker` is cancelled.
pub fn evaluate<I, O, S>(
    records: I,
    oracle: &mut O,
    observer: S,
    tracker: &RunningTracker,
) -> Evaluation
where
    I: IntoIterator<Item = TestRecord>,
    O: GlyphOracle + ?Sized,
    S: ProgressObserver,
{
    Evaluator::new(oracle, observer)
        .with_tracker(tracker)
        .run(records)
}
