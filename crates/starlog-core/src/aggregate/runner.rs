use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use crate::matching::MatchConfig;
use crate::store::{DateRange, FrameStore};

use super::orchestrator::run_aggregation_reported;
use super::types::{AggregationEvent, AggregationOutcome, AggregationStage, ProgressReporter};

/// Cooperative cancellation flag shared between a run and its owner.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Progress reporter that sends updates over an mpsc channel to the
/// owning thread.
pub struct ChannelProgressReporter {
    tx: mpsc::Sender<AggregationEvent>,
    current_total: AtomicUsize,
}

impl ChannelProgressReporter {
    pub fn new(tx: mpsc::Sender<AggregationEvent>) -> Self {
        Self {
            tx,
            current_total: AtomicUsize::new(0),
        }
    }
}

impl ProgressReporter for ChannelProgressReporter {
    fn begin_stage(&self, stage: AggregationStage, total_items: Option<usize>) {
        self.current_total
            .store(total_items.unwrap_or(0), Ordering::Relaxed);
        let _ = self.tx.send(AggregationEvent::Progress {
            stage,
            items_done: Some(0),
            items_total: total_items,
        });
    }

    fn advance(&self, items_done: usize) {
        let total = self.current_total.load(Ordering::Relaxed);
        let _ = self.tx.send(AggregationEvent::Progress {
            // Matching is the only stage that reports item progress.
            stage: AggregationStage::Matching,
            items_done: Some(items_done),
            items_total: if total > 0 { Some(total) } else { None },
        });
    }

    fn finish_stage(&self) {
        // Stage transitions arrive as the next begin_stage or a final
        // Completed/Cancelled/Failed event.
    }
}

/// Handle to an in-flight background aggregation run.
pub struct AggregationHandle {
    token: CancellationToken,
    thread: thread::JoinHandle<()>,
}

impl AggregationHandle {
    /// Request cooperative cancellation. The run stops at its next
    /// check; whatever it computed is discarded.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Block until the worker thread exits.
    pub fn join(self) {
        let _ = self.thread.join();
    }
}

/// Spawn an aggregation run on a dedicated worker thread.
///
/// Progress and the final outcome arrive as [`AggregationEvent`]s on
/// `tx`; the result set comes in a single `Completed` event, never
/// piecemeal. Send failures are ignored: a dropped receiver just means
/// nobody is listening to a superseded run anymore.
pub fn spawn_aggregation(
    store: Arc<dyn FrameStore + Send + Sync>,
    range: Option<DateRange>,
    config: MatchConfig,
    tx: mpsc::Sender<AggregationEvent>,
) -> AggregationHandle {
    let token = CancellationToken::new();
    let run_token = token.clone();

    let thread = thread::Builder::new()
        .name("starlog-aggregate".into())
        .spawn(move || {
            let reporter = ChannelProgressReporter::new(tx.clone());
            let event = match run_aggregation_reported(
                store.as_ref(),
                range.as_ref(),
                &config,
                &reporter,
                &run_token,
            ) {
                Ok(AggregationOutcome::Completed(result)) => AggregationEvent::Completed(result),
                Ok(AggregationOutcome::Cancelled) => AggregationEvent::Cancelled,
                Err(e) => AggregationEvent::Failed {
                    message: e.to_string(),
                },
            };
            let _ = tx.send(event);
        })
        .expect("Failed to spawn aggregation thread");

    AggregationHandle { token, thread }
}

/// Owner of the single current aggregation run for one catalog view.
///
/// A new refresh cancels the in-flight run before starting the next
/// one. The old run's events go to its own, now-dropped receiver, so
/// stale results can never mix into a newer run's output.
#[derive(Default)]
pub struct AggregationController {
    current: Option<AggregationHandle>,
}

impl AggregationController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel any in-flight run and start a fresh one, returning the
    /// receiver for the new run's events.
    pub fn refresh(
        &mut self,
        store: Arc<dyn FrameStore + Send + Sync>,
        range: Option<DateRange>,
        config: MatchConfig,
    ) -> mpsc::Receiver<AggregationEvent> {
        self.cancel_current();
        let (tx, rx) = mpsc::channel();
        self.current = Some(spawn_aggregation(store, range, config, tx));
        rx
    }

    /// Cancel the in-flight run, if any. Does not block; the worker
    /// stops at its next cancellation check.
    pub fn cancel_current(&mut self) {
        if let Some(handle) = self.current.take() {
            handle.cancel();
        }
    }
}
