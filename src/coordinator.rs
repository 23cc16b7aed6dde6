//! Search coordinator: drives candidate ranges against the oracle on a
//! worker pool and folds worker outcomes into one [`SearchResult`].
//!
//! A search moves from validation (all precondition errors are returned
//! here, before any thread exists) to a single trial call on the calling
//! thread, then fans out one worker per partitioned range. Workers stop at
//! the first of: range drained, shared cancel flag raised, budget spent,
//! password found, or document reported malformed. The last three raise
//! the flag for everyone else. An oracle call already in flight is never
//! interrupted; its attempt still counts.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use indicatif::ProgressBar;
use rayon::{ThreadPoolBuilder, prelude::*};
use tracing::{debug, info, warn};

use crate::accounting::AttemptRecord;
use crate::config::{EngineConfig, SearchBudget};
use crate::error::{FailureReason, SearchError};
use crate::generator::{CandidateSource, SearchMode};
use crate::oracle::{LockedDocument, Oracle, Verdict};
use crate::partition::{KeyspaceRange, partition};

/// Ranges queued per pool thread at most. Requested concurrency beyond
/// `max_threads * RANGES_PER_THREAD` only shrinks ranges that no thread
/// would pick up any sooner.
const RANGES_PER_THREAD: usize = 4;

/// Terminal outcome of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResult {
    /// `index` is the password's position in the candidate order.
    Found {
        password: String,
        index: u64,
        attempts: u64,
        elapsed: Duration,
    },
    /// Every candidate was tested.
    Exhausted { attempts: u64, elapsed: Duration },
    /// The attempt or time budget ran out with candidates left.
    BudgetExceeded { attempts: u64, elapsed: Duration },
    Failed {
        reason: FailureReason,
        attempts: u64,
        elapsed: Duration,
    },
}

impl SearchResult {
    pub fn attempts(&self) -> u64 {
        match self {
            SearchResult::Found { attempts, .. }
            | SearchResult::Exhausted { attempts, .. }
            | SearchResult::BudgetExceeded { attempts, .. }
            | SearchResult::Failed { attempts, .. } => *attempts,
        }
    }

    pub fn elapsed(&self) -> Duration {
        match self {
            SearchResult::Found { elapsed, .. }
            | SearchResult::Exhausted { elapsed, .. }
            | SearchResult::BudgetExceeded { elapsed, .. }
            | SearchResult::Failed { elapsed, .. } => *elapsed,
        }
    }

    pub fn password(&self) -> Option<&str> {
        match self {
            SearchResult::Found { password, .. } => Some(password),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            SearchResult::Found { .. } => "found",
            SearchResult::Exhausted { .. } => "exhausted",
            SearchResult::BudgetExceeded { .. } => "budget exceeded",
            SearchResult::Failed { .. } => "failed",
        }
    }
}

/// Run one search with the default [`EngineConfig`] and no progress bar.
pub fn search<O: Oracle>(
    oracle: &O,
    document: &LockedDocument,
    mode: &SearchMode,
    budget: SearchBudget,
    concurrency: usize,
) -> Result<SearchResult, SearchError> {
    Searcher::new().run(oracle, document, mode, budget, concurrency)
}

/// Reusable search driver carrying engine configuration and an optional
/// progress bar. Holds no state between runs.
#[derive(Clone, Default)]
pub struct Searcher {
    config: EngineConfig,
    progress: Option<ProgressBar>,
}

impl Searcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Advance `progress` as attempts complete (in batches of
    /// `budget_check_interval`).
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Search `document` for the password, using up to `concurrency` workers.
    ///
    /// Returns `Err` only for preconditions; every search that starts ends
    /// in one of the [`SearchResult`] variants.
    pub fn run<O: Oracle>(
        &self,
        oracle: &O,
        document: &LockedDocument,
        mode: &SearchMode,
        budget: SearchBudget,
        concurrency: usize,
    ) -> Result<SearchResult, SearchError> {
        self.config.validate()?;
        if concurrency == 0 {
            return Err(SearchError::InvalidConcurrency);
        }
        let source = mode.source(&self.config)?;
        if document.is_empty() {
            return Err(SearchError::EmptyDocument);
        }
        let handle = oracle.open(document)?;

        let workers = concurrency.min(self.config.max_threads.saturating_mul(RANGES_PER_THREAD));
        let mut ranges = partition(source.len(), workers);
        let threads = ranges.len().clamp(1, self.config.max_threads);
        let pool = ThreadPoolBuilder::new().num_threads(threads).build()?;

        if let Some(progress) = &self.progress {
            progress.set_length(source.len());
        }
        info!(
            mode = source.kind(),
            keyspace = source.len(),
            ranges = ranges.len(),
            threads,
            "starting password search"
        );

        let run = Run {
            oracle,
            handle: &handle,
            source: &source,
            budget,
            interval: self.config.budget_check_interval,
            record: AttemptRecord::new(),
            cancelled: AtomicBool::new(false),
            progress: self.progress.as_ref(),
        };

        let mut exits = Vec::with_capacity(ranges.len() + 1);
        if let Some(first) = ranges.first_mut() {
            // Test the first candidate alone so a document the oracle
            // rejects costs one call, not one per worker.
            let head = KeyspaceRange::new(first.start, first.start + 1);
            first.start += 1;
            let exit = run.work(0, head);
            let fan_out = matches!(exit, WorkerExit::Drained);
            exits.push(exit);

            if fan_out {
                ranges.retain(|range| !range.is_empty());
                let rest: Vec<WorkerExit> = pool.install(|| {
                    ranges
                        .par_iter()
                        .enumerate()
                        .map(|(worker, range)| run.work(worker, *range))
                        .collect()
                });
                exits.extend(rest);
            }
        }

        let result = run.finish(exits);
        info!(
            outcome = result.label(),
            attempts = result.attempts(),
            elapsed_ms = result.elapsed().as_millis() as u64,
            "password search finished"
        );
        Ok(result)
    }
}

/// How a single worker stopped.
#[derive(Debug)]
enum WorkerExit {
    Drained,
    Cancelled,
    OverBudget,
    Found { index: u64, password: String },
    Failed(FailureReason),
}

impl WorkerExit {
    fn label(&self) -> &'static str {
        match self {
            WorkerExit::Drained => "drained",
            WorkerExit::Cancelled => "cancelled",
            WorkerExit::OverBudget => "over budget",
            WorkerExit::Found { .. } => "found",
            WorkerExit::Failed(_) => "failed",
        }
    }
}

/// State shared by every worker of one search.
struct Run<'a, O: Oracle> {
    oracle: &'a O,
    handle: &'a O::Handle,
    source: &'a CandidateSource<'a>,
    budget: SearchBudget,
    interval: u64,
    record: AttemptRecord,
    cancelled: AtomicBool,
    progress: Option<&'a ProgressBar>,
}

impl<O: Oracle> Run<'_, O> {
    fn work(&self, worker: usize, range: KeyspaceRange) -> WorkerExit {
        debug!(worker, start = range.start, end = range.end, "worker started");
        let exit = self.scan(range);
        debug!(worker, outcome = exit.label(), "worker stopped");
        exit
    }

    /// Test `range` in ascending order until something stops this worker.
    fn scan(&self, range: KeyspaceRange) -> WorkerExit {
        let mut candidates = match self.source.candidates(range) {
            Ok(candidates) => candidates,
            Err(e) => {
                let reason = FailureReason::WordlistRead(e.to_string());
                return self.abort(WorkerExit::Failed(reason));
            }
        };

        let mut buffer = String::new();
        let mut since_check = 0u64;
        let mut unreported = 0u64;

        let exit = loop {
            if self.cancelled.load(Ordering::Acquire) {
                break WorkerExit::Cancelled;
            }
            if since_check == 0 {
                self.report(&mut unreported);
                if self.out_of_time() {
                    break self.abort(WorkerExit::OverBudget);
                }
            }

            let index = match candidates.next_into(&mut buffer) {
                Ok(Some(index)) => index,
                Ok(None) => break WorkerExit::Drained,
                Err(e) => {
                    break self.abort(WorkerExit::Failed(FailureReason::WordlistRead(
                        e.to_string(),
                    )));
                }
            };

            if !self.record.try_record_attempt(self.budget.max_attempts) {
                break self.abort(WorkerExit::OverBudget);
            }
            let verdict = self.oracle.verify(self.handle, &buffer);
            unreported += 1;

            match verdict {
                Verdict::Unlocked => {
                    break self.abort(WorkerExit::Found {
                        index,
                        password: std::mem::take(&mut buffer),
                    });
                }
                Verdict::WrongPassword => {}
                Verdict::MalformedDocument(reason) => {
                    warn!(index, %reason, "oracle reported a malformed document");
                    let reason = FailureReason::MalformedDocument(reason);
                    break self.abort(WorkerExit::Failed(reason));
                }
            }

            since_check = (since_check + 1) % self.interval;
        };

        self.report(&mut unreported);
        exit
    }

    /// Raise the shared cancel flag and pass `exit` through.
    fn abort(&self, exit: WorkerExit) -> WorkerExit {
        self.cancelled.store(true, Ordering::Release);
        exit
    }

    fn out_of_time(&self) -> bool {
        self.budget
            .max_duration
            .is_some_and(|limit| self.record.elapsed() >= limit)
    }

    fn report(&self, unreported: &mut u64) {
        if let Some(progress) = self.progress {
            if *unreported > 0 {
                progress.inc(*unreported);
            }
        }
        *unreported = 0;
    }

    /// Fold worker exits: the lowest-index success wins, then the first
    /// failure in range order, then budget exhaustion.
    fn finish(&self, exits: Vec<WorkerExit>) -> SearchResult {
        let attempts = self.record.attempts();
        let elapsed = self.record.elapsed();

        let mut found: Option<(u64, String)> = None;
        let mut failure: Option<FailureReason> = None;
        let mut over_budget = false;
        for exit in exits {
            match exit {
                WorkerExit::Found { index, password } => {
                    if found.as_ref().is_none_or(|(best, _)| index < *best) {
                        found = Some((index, password));
                    }
                }
                WorkerExit::Failed(reason) => {
                    failure.get_or_insert(reason);
                }
                WorkerExit::OverBudget => over_budget = true,
                WorkerExit::Drained | WorkerExit::Cancelled => {}
            }
        }

        match (found, failure) {
            (Some((index, password)), _) => SearchResult::Found {
                password,
                index,
                attempts,
                elapsed,
            },
            (None, Some(reason)) => SearchResult::Failed {
                reason,
                attempts,
                elapsed,
            },
            (None, None) if over_budget => SearchResult::BudgetExceeded { attempts, elapsed },
            (None, None) => SearchResult::Exhausted { attempts, elapsed },
        }
    }
}
