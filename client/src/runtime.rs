//! The event-dispatch loop.
//!
//! [`Runtime`] owns the [`AppState`], the event channel and every cancelable
//! handle (clock ticker, pollers). Events are handled one at a time; the
//! effects they produce are executed here by spawning request tasks whose
//! results come back as [`Event::Response`]s over the same channel.
//!
//! Nothing outside the runtime mutates state, so the client needs no locks.

use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::api::{ApiClient, ApiError};
use crate::config::Config;
use crate::events::{Effect, Event, Response};
use crate::monitoring;
use crate::polling::{PollPeriods, PollingLoops};
use crate::schedule::Interval;
use crate::state::AppState;
use crate::types::UpdateTaskRequest;

/// Capacity of the event channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Drives [`AppState`] from events and carries out its effects.
#[derive(Debug)]
pub struct Runtime {
    state: AppState,
    api: ApiClient,
    config: Config,
    tx: mpsc::Sender<Event>,
    rx: mpsc::Receiver<Event>,
    clock_timer: Option<Interval>,
    pollers: PollingLoops,
    pending_start: Option<JoinHandle<()>>,
    clear_input: bool,
}

impl Runtime {
    /// Creates a runtime for `config`. Nothing is spawned until [`boot`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    ///
    /// [`boot`]: Runtime::boot
    pub fn new(config: Config) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.server_url, config.request_timeout)?;
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        Ok(Self {
            state: AppState::new(config.durations),
            api,
            config,
            tx,
            rx,
            clock_timer: None,
            pollers: PollingLoops::default(),
            pending_start: None,
            clear_input: false,
        })
    }

    /// Loads the initial task list. Must be called inside a tokio runtime.
    pub fn boot(&mut self) {
        info!(server_url = %self.config.server_url, "Client runtime started");
        let effects = self.state.boot();
        self.apply_all(effects);
    }

    /// Handle for feeding user events into the loop.
    #[must_use]
    pub fn sender(&self) -> mpsc::Sender<Event> {
        self.tx.clone()
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Waits for the next event. The runtime holds a sender itself, so this
    /// only returns `None` if the channel is closed explicitly.
    pub async fn next_event(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Handles one event and executes the effects it produced.
    pub fn dispatch(&mut self, event: Event) {
        trace!(event = event.name(), "Dispatching event");
        let effects = self.state.handle(event);
        self.apply_all(effects);
    }

    /// Receives and dispatches one event, returning its name.
    pub async fn process_next(&mut self) -> Option<&'static str> {
        let event = self.next_event().await?;
        let name = event.name();
        self.dispatch(event);
        Some(name)
    }

    /// Number of live interval schedules (clock and pollers).
    #[must_use]
    pub fn active_schedules(&self) -> usize {
        let clock = usize::from(self.clock_timer.as_ref().is_some_and(Interval::is_active));
        clock + self.pollers.active_count()
    }

    /// Whether the view should clear its task input, resetting the flag.
    pub fn take_input_clear(&mut self) -> bool {
        std::mem::take(&mut self.clear_input)
    }

    /// Stops any active session and releases every schedule.
    ///
    /// A start request still in flight is allowed to land first, so the
    /// final stop reaches the service after it. Both are bounded by
    /// `timeout`.
    pub async fn shutdown(&mut self, timeout: Duration) {
        let was_running = !self.state.controller().is_settled_idle();
        let mut pending = self.pending_start.take().filter(|start| !start.is_finished());
        self.state.handle(Event::UserStop);
        self.stop_clock();
        self.pollers.cancel_all();

        if was_running {
            info!("Stopping active session before exit");
            let stop = async {
                if let Some(start) = pending.as_mut() {
                    let _ = start.await;
                }
                monitoring::stop(&self.api).await
            };
            if tokio::time::timeout(timeout, stop).await.is_err() {
                warn!(
                    timeout_secs = timeout.as_secs(),
                    "Timed out stopping monitoring"
                );
            }
        }
        if let Some(start) = pending {
            start.abort();
        }
        info!("Client runtime stopped");
    }

    fn apply_all(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            self.apply(effect);
        }
    }

    fn apply(&mut self, effect: Effect) {
        debug!(effect = ?effect, "Applying effect");
        match effect {
            Effect::StartMonitoring { epoch } => {
                let api = self.api.clone();
                self.pending_start = Some(self.spawn_request(async move {
                    let result = monitoring::start(&api).await;
                    Response::MonitoringStarted { epoch, result }
                }));
            }
            Effect::StopMonitoring => {
                let api = self.api.clone();
                self.spawn_request(async move {
                    let result = monitoring::stop(&api).await;
                    Response::MonitoringStopped { result }
                });
            }
            Effect::StartClock => self.start_clock(),
            Effect::StopClock => self.stop_clock(),
            Effect::StartPollers { epoch } => {
                let periods = PollPeriods {
                    quote: self.config.quote_poll,
                    suggestion: self.config.suggestion_poll,
                };
                self.pollers.start(&self.api, &self.tx, epoch, periods);
            }
            Effect::StopPollers => self.pollers.cancel_all(),
            Effect::LoadTasks { seq } => {
                let api = self.api.clone();
                self.spawn_request(async move {
                    let result = api.list_tasks().await;
                    Response::TasksLoaded { seq, result }
                });
            }
            Effect::CreateTask { name, task_type } => {
                let api = self.api.clone();
                self.spawn_request(async move {
                    let result = api.create_task(&name, task_type).await;
                    Response::TaskCreated { name, result }
                });
            }
            Effect::UpdateTask {
                name,
                completed,
                session,
            } => {
                let api = self.api.clone();
                self.spawn_request(async move {
                    let request = UpdateTaskRequest {
                        task: name.clone(),
                        completed,
                        session,
                    };
                    let result = api.update_task(&request).await;
                    Response::TaskUpdated { name, result }
                });
            }
            Effect::ScheduleStatusReset { token, after } => {
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(after).await;
                    let _ = tx.send(Event::StatusExpired { token }).await;
                });
            }
            Effect::ClearTaskInput => self.clear_input = true,
        }
    }

    fn spawn_request<F>(&self, request: F) -> JoinHandle<()>
    where
        F: Future<Output = Response> + Send + 'static,
    {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let response = request.await;
            if tx.send(Event::Response(response)).await.is_err() {
                debug!("Event receiver dropped before response arrived");
            }
        })
    }

    fn start_clock(&mut self) {
        self.stop_clock();
        let tx = self.tx.clone();
        self.clock_timer = Some(Interval::spawn("clock", self.config.tick_period, move || {
            let tx = tx.clone();
            async move {
                if tx.send(Event::Tick).await.is_err() {
                    return ControlFlow::Break(());
                }
                ControlFlow::Continue(())
            }
        }));
    }

    fn stop_clock(&mut self) {
        if let Some(mut clock) = self.clock_timer.take() {
            clock.cancel();
        }
    }
}
