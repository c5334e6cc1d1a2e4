/*
 * Owns the single search session that may be active at any time.
 *
 * The `SearchController` lives on the UI thread. `start` retires any previous
 * session (raise its cancellation signal, join its worker, discard whatever it
 * left in the channel) before spawning a fresh worker, so sessions never
 * overlap. Workers never touch controller state directly: they send
 * `WorkerMessage`s tagged with their `SessionId` over a channel and then call
 * `UiWaker::wake` so the presentation layer schedules a `pump` on its own
 * thread. `pump` turns those messages into `SearchEvent`s, which the presenter
 * drains with `try_dequeue_event`.
 *
 * Cancellation is synchronous: `cancel` returns only after the worker has
 * exited.
 */
use super::models::{ResultSet, SearchRequest, SessionId, SessionState};
use super::search_backend::SearchBackendOperations;
use super::search_error::{self, SearchError};
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/*
 * The presentation layer's "post to idle" hook. Called from worker threads after
 * a message has been queued; the implementation must arrange for
 * `SearchController::pump` to run on the UI thread soon after.
 */
pub trait UiWaker: Send + Sync {
    fn wake(&self);
}

// For hosts that poll `pump` on their own schedule.
#[cfg(test)]
pub struct NoopWaker;

#[cfg(test)]
impl UiWaker for NoopWaker {
    fn wake(&self) {}
}

/*
 * Cooperative stop flag handed to one worker. Every session gets a new signal,
 * so a flag raised for a retired session can never leak into its successor.
 */
#[derive(Debug, Clone, Default)]
pub struct CancellationSignal {
    flag: Arc<AtomicBool>,
}

impl CancellationSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/* What the presentation layer gets to see, in the order it happened. */
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    StateChanged(SessionState),
    Progress(f64),
    Results { results: ResultSet, elapsed: Duration },
    Error(String),
}

#[derive(Debug)]
enum WorkerMessage {
    Progress {
        session: SessionId,
        fraction: f64,
    },
    Finished {
        session: SessionId,
        outcome: search_error::Result<ResultSet>,
        elapsed: Duration,
    },
}

/*
 * Worker-side rate limiter for progress messages. A value is forwarded only if
 * it moved forward by at least `step` since the last forwarded value; `1.0` is
 * always forwarded once.
 */
#[derive(Debug)]
pub struct ProgressThrottle {
    step: f64,
    last_forwarded: Option<f64>,
}

impl ProgressThrottle {
    pub fn new(step: f64) -> Self {
        ProgressThrottle {
            step: step.clamp(0.0, 1.0),
            last_forwarded: None,
        }
    }

    pub fn should_forward(&mut self, fraction: f64) -> bool {
        if let Some(last) = self.last_forwarded {
            if fraction <= last {
                return false;
            }
            if fraction < 1.0 && fraction - last < self.step {
                return false;
            }
        }
        self.last_forwarded = Some(fraction);
        true
    }
}

struct ActiveSession {
    id: SessionId,
    signal: CancellationSignal,
    worker: JoinHandle<()>,
    started: Instant,
}

pub struct SearchController {
    backend: Arc<dyn SearchBackendOperations>,
    waker: Arc<dyn UiWaker>,
    progress_step: f64,
    state: SessionState,
    next_session_id: u64,
    current_session: Option<SessionId>,
    active: Option<ActiveSession>,
    last_progress: f64,
    sender: Sender<WorkerMessage>,
    receiver: Receiver<WorkerMessage>,
    events: VecDeque<SearchEvent>,
}

impl SearchController {
    pub fn new(
        backend: Arc<dyn SearchBackendOperations>,
        waker: Arc<dyn UiWaker>,
        progress_step: f64,
    ) -> Self {
        let (sender, receiver) = mpsc::channel();
        SearchController {
            backend,
            waker,
            progress_step,
            state: SessionState::Idle,
            next_session_id: 1,
            current_session: None,
            active: None,
            last_progress: 0.0,
            sender,
            receiver,
            events: VecDeque::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current_session(&self) -> Option<SessionId> {
        self.current_session
    }

    pub fn has_active_worker(&self) -> bool {
        self.active.is_some()
    }

    /*
     * Begins a new session for `request`. A blank query is rejected before
     * anything else happens, leaving any running session untouched. Otherwise
     * the previous session is fully retired first; when this returns, the queue
     * holds `StateChanged(Running)` and `Progress(0.0)` for the new session and
     * nothing from any earlier one. A session that had reached `Completed` or
     * `Failed` passes through `Idle` first, so that `StateChanged(Idle)` leads
     * the queue.
     */
    pub fn start(&mut self, request: SearchRequest) -> search_error::Result<SessionId> {
        if !request.has_query() {
            log::debug!("SearchController: Rejecting start with empty query.");
            return Err(SearchError::EmptyQuery);
        }

        self.retire_active_session();
        let stale_messages = self.discard_worker_messages();
        let stale_events = self.events.len();
        self.events.clear();
        if stale_messages > 0 || stale_events > 0 {
            log::debug!(
                "SearchController: Discarded {stale_messages} worker messages and {stale_events} queued events from retired sessions."
            );
        }
        if self.state.is_terminal() {
            self.set_state(SessionState::Idle);
        }

        let session = SessionId(self.next_session_id);
        self.next_session_id += 1;
        self.current_session = Some(session);
        self.last_progress = 0.0;
        self.set_state(SessionState::Running);
        self.events.push_back(SearchEvent::Progress(0.0));

        log::info!(
            "SearchController: Starting session {session} for '{}' under {:?}.",
            request.query(),
            request.root_directory()
        );

        let signal = CancellationSignal::new();
        let worker_signal = signal.clone();
        let backend = Arc::clone(&self.backend);
        let sender = self.sender.clone();
        let waker = Arc::clone(&self.waker);
        let progress_step = self.progress_step;

        let spawned = thread::Builder::new()
            .name(format!("orion-search-{}", session.0))
            .spawn(move || {
                run_session_worker(
                    session,
                    request,
                    backend,
                    worker_signal,
                    sender,
                    waker,
                    progress_step,
                )
            });

        match spawned {
            Ok(worker) => {
                self.active = Some(ActiveSession {
                    id: session,
                    signal,
                    worker,
                    started: Instant::now(),
                });
                Ok(session)
            }
            Err(e) => {
                log::error!("SearchController: Could not spawn worker for session {session}: {e}");
                let error = SearchError::WorkerSpawn(e);
                self.events.push_back(SearchEvent::Error(error.to_string()));
                self.last_progress = 0.0;
                self.set_state(SessionState::Idle);
                self.events.push_back(SearchEvent::Progress(0.0));
                Err(error)
            }
        }
    }

    /*
     * Stops the running session and waits for its worker to exit. Returns
     * `false` without emitting anything when no session is running.
     */
    pub fn cancel(&mut self) -> bool {
        if self.state != SessionState::Running {
            log::debug!("SearchController: Cancel ignored in state {}.", self.state);
            return false;
        }

        if let Some(active) = self.active.as_ref() {
            active.signal.cancel();
        }
        self.set_state(SessionState::CancelRequested);
        self.retire_active_session();
        let discarded = self.discard_worker_messages();
        log::debug!("SearchController: Cancel complete, discarded {discarded} worker messages.");

        self.last_progress = 0.0;
        self.set_state(SessionState::Idle);
        self.events.push_back(SearchEvent::Progress(0.0));
        true
    }

    /*
     * Applies every message the workers have queued so far. Must be called on
     * the UI thread, typically in response to `UiWaker::wake`. Returns the
     * number of messages taken off the channel.
     *
     * A worker that has exited without sending `Finished` fails its session
     * here, so the controller never stays `Running` on a dead thread.
     */
    pub fn pump(&mut self) -> usize {
        let mut handled = self.apply_queued_messages();
        if self
            .active
            .as_ref()
            .is_some_and(|active| active.worker.is_finished())
        {
            // Everything the worker sent before exiting is in the channel by now.
            handled += self.apply_queued_messages();
            self.reap_silent_worker();
        }
        handled
    }

    pub fn try_dequeue_event(&mut self) -> Option<SearchEvent> {
        self.events.pop_front()
    }

    /* Cancels and joins any worker. Used on window close and on drop. */
    pub fn shutdown(&mut self) {
        if self.active.is_none() {
            return;
        }
        log::debug!("SearchController: Shutting down active session.");
        self.retire_active_session();
        self.discard_worker_messages();
        self.state = SessionState::Idle;
        self.last_progress = 0.0;
    }

    fn apply_queued_messages(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(message) = self.receiver.try_recv() {
            handled += 1;
            self.apply_worker_message(message);
        }
        handled
    }

    fn reap_silent_worker(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };
        let session = active.id;
        let elapsed = active.started.elapsed();
        match active.worker.join() {
            Err(_) => log::error!("SearchController: Worker of session {session} panicked."),
            Ok(()) => log::error!(
                "SearchController: Worker of session {session} exited without an outcome."
            ),
        }
        if self.is_current_running(session) {
            self.finish_session(session, Err(SearchError::WorkerPanicked), elapsed);
        }
    }

    fn apply_worker_message(&mut self, message: WorkerMessage) {
        match message {
            WorkerMessage::Progress { session, fraction } => {
                if !self.is_current_running(session) {
                    log::trace!("SearchController: Dropping progress from session {session}.");
                    return;
                }
                self.record_progress(fraction);
            }
            WorkerMessage::Finished {
                session,
                outcome,
                elapsed,
            } => {
                if !self.is_current_running(session) {
                    log::debug!("SearchController: Dropping completion from session {session}.");
                    return;
                }
                self.join_finished_worker(session);
                self.finish_session(session, outcome, elapsed);
            }
        }
    }

    fn finish_session(
        &mut self,
        session: SessionId,
        outcome: search_error::Result<ResultSet>,
        elapsed: Duration,
    ) {
        match outcome {
            Ok(results) => {
                log::info!(
                    "SearchController: Session {session} completed with {} matches in {elapsed:?}.",
                    results.len()
                );
                self.record_progress(1.0);
                self.events
                    .push_back(SearchEvent::Results { results, elapsed });
                self.set_state(SessionState::Completed);
            }
            Err(SearchError::Cancelled) => {
                log::debug!("SearchController: Session {session} stopped on its own.");
                self.last_progress = 0.0;
                self.set_state(SessionState::Idle);
                self.events.push_back(SearchEvent::Progress(0.0));
            }
            Err(e) => {
                log::warn!("SearchController: Session {session} failed: {e}");
                self.events.push_back(SearchEvent::Error(e.to_string()));
                self.set_state(SessionState::Failed);
            }
        }
    }

    fn is_current_running(&self, session: SessionId) -> bool {
        self.current_session == Some(session) && self.state == SessionState::Running
    }

    // Drops regressions and repeats, so 1.0 is emitted at most once.
    fn record_progress(&mut self, fraction: f64) {
        let fraction = fraction.clamp(0.0, 1.0);
        if fraction <= self.last_progress {
            return;
        }
        self.last_progress = fraction;
        self.events.push_back(SearchEvent::Progress(fraction));
    }

    fn set_state(&mut self, state: SessionState) {
        if self.state != state {
            log::debug!("SearchController: {} -> {state}", self.state);
        }
        self.state = state;
        self.events.push_back(SearchEvent::StateChanged(state));
    }

    fn retire_active_session(&mut self) {
        if let Some(active) = self.active.take() {
            active.signal.cancel();
            log::debug!("SearchController: Joining worker of session {}.", active.id);
            if active.worker.join().is_err() {
                log::error!("SearchController: Worker of session {} panicked.", active.id);
            }
        }
    }

    // The worker has already sent its last message, so this join is short.
    fn join_finished_worker(&mut self, session: SessionId) {
        match self.active.take() {
            Some(active) if active.id == session => {
                if active.worker.join().is_err() {
                    log::error!("SearchController: Worker of session {session} panicked.");
                }
            }
            other => self.active = other,
        }
    }

    fn discard_worker_messages(&mut self) -> usize {
        let mut discarded = 0;
        while self.receiver.try_recv().is_ok() {
            discarded += 1;
        }
        discarded
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_session_worker(
    session: SessionId,
    request: SearchRequest,
    backend: Arc<dyn SearchBackendOperations>,
    signal: CancellationSignal,
    sender: Sender<WorkerMessage>,
    waker: Arc<dyn UiWaker>,
    progress_step: f64,
) {
    let started = Instant::now();
    let cancel_check = || signal.is_cancelled();

    let mut throttle = ProgressThrottle::new(progress_step);
    let progress_sender = sender.clone();
    let progress_waker = Arc::clone(&waker);
    let mut on_progress = move |fraction: f64| {
        if throttle.should_forward(fraction)
            && progress_sender
                .send(WorkerMessage::Progress { session, fraction })
                .is_ok()
        {
            progress_waker.wake();
        }
    };

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        backend.run(&request, &cancel_check, &mut on_progress)
    }))
    .unwrap_or_else(|_| {
        log::error!("SearchWorker {session}: Backend panicked.");
        Err(SearchError::WorkerPanicked)
    });
    let elapsed = started.elapsed();
    log::debug!(
        "SearchWorker {session}: Backend returned after {elapsed:?} (ok: {}).",
        outcome.is_ok()
    );

    if sender
        .send(WorkerMessage::Finished {
            session,
            outcome,
            elapsed,
        })
        .is_ok()
    {
        waker.wake();
    }
}
