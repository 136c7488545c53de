//! Quote and break-suggestion pollers.
//!
//! Both pollers are started together when a session becomes active and
//! cancelled together when it stops. Their results are sent back to the
//! dispatch loop tagged with the session epoch. Transport errors stay inside
//! the poller: they are logged and the next period simply tries again, so a
//! flaky side feature never interrupts the timer.
//!
//! The third loop, task-list refresh, is on demand and lives in the runtime.

use std::ops::ControlFlow;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::events::{Event, Response};
use crate::schedule::Interval;

/// Poll periods for the two timed pollers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPeriods {
    pub quote: Duration,
    pub suggestion: Duration,
}

/// The session-scoped pollers.
#[derive(Debug, Default)]
pub struct PollingLoops {
    quote: Option<Interval>,
    suggestion: Option<Interval>,
}

impl PollingLoops {
    /// Starts both pollers for `epoch`, replacing any running ones.
    pub fn start(
        &mut self,
        api: &ApiClient,
        events: &mpsc::Sender<Event>,
        epoch: u64,
        periods: PollPeriods,
    ) {
        self.cancel_all();
        self.quote = Some(spawn_quote_poller(
            api.clone(),
            events.clone(),
            epoch,
            periods.quote,
        ));
        self.suggestion = Some(spawn_suggestion_poller(
            api.clone(),
            events.clone(),
            epoch,
            periods.suggestion,
        ));
        debug!(epoch, "Pollers started");
    }

    /// Cancels both pollers. Safe to call when nothing is running.
    pub fn cancel_all(&mut self) {
        if let Some(mut quote) = self.quote.take() {
            quote.cancel();
        }
        if let Some(mut suggestion) = self.suggestion.take() {
            suggestion.cancel();
        }
    }

    /// Number of pollers currently scheduled.
    #[must_use]
    pub fn active_count(&self) -> usize {
        [&self.quote, &self.suggestion]
            .into_iter()
            .filter(|p| matches!(p, Some(interval) if interval.is_active()))
            .count()
    }
}

fn spawn_quote_poller(
    api: ApiClient,
    events: mpsc::Sender<Event>,
    epoch: u64,
    period: Duration,
) -> Interval {
    Interval::spawn("quote_poller", period, move || {
        let api = api.clone();
        let events = events.clone();
        async move {
            let text = match api.get_quote().await {
                Ok(response) => response.into_text(),
                Err(e) => {
                    warn!(error = %e, "Quote poll failed");
                    return ControlFlow::Continue(());
                }
            };
            forward(&events, Event::Response(Response::Quote { epoch, text })).await
        }
    })
}

fn spawn_suggestion_poller(
    api: ApiClient,
    events: mpsc::Sender<Event>,
    epoch: u64,
    period: Duration,
) -> Interval {
    Interval::spawn("suggestion_poller", period, move || {
        let api = api.clone();
        let events = events.clone();
        async move {
            let text = match api.get_break_suggestion().await {
                Ok(response) => response.into_text(),
                Err(e) => {
                    warn!(error = %e, "Break suggestion poll failed");
                    return ControlFlow::Continue(());
                }
            };
            forward(
                &events,
                Event::Response(Response::BreakSuggestion { epoch, text }),
            )
            .await
        }
    })
}

async fn forward(events: &mpsc::Sender<Event>, event: Event) -> ControlFlow<()> {
    if events.send(event).await.is_err() {
        debug!("Event receiver dropped, ending poller");
        return ControlFlow::Break(());
    }
    ControlFlow::Continue(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_periods() -> PollPeriods {
        PollPeriods {
            quote: Duration::from_millis(20),
            suggestion: Duration::from_millis(30),
        }
    }

    #[tokio::test]
    async fn pollers_forward_results_with_epoch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/get_quote"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"has_quote": true, "quote": "Keep going!"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/get_break_suggestion"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"has_suggestion": false, "suggestion": null})),
            )
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let (tx, mut rx) = mpsc::channel(32);
        let mut loops = PollingLoops::default();
        loops.start(&api, &tx, 7, fast_periods());
        assert_eq!(loops.active_count(), 2);

        let mut saw_quote = false;
        let mut saw_suggestion = false;
        while !(saw_quote && saw_suggestion) {
            let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
                .await
                .expect("pollers should report")
                .expect("channel open");
            match event {
                Event::Response(Response::Quote { epoch, text }) => {
                    assert_eq!(epoch, 7);
                    assert_eq!(text.as_deref(), Some("Keep going!"));
                    saw_quote = true;
                }
                Event::Response(Response::BreakSuggestion { epoch, text }) => {
                    assert_eq!(epoch, 7);
                    assert_eq!(text, None);
                    saw_suggestion = true;
                }
                other => panic!("unexpected event: {other:?}"),
            }
        }

        loops.cancel_all();
        assert_eq!(loops.active_count(), 0);
    }

    #[tokio::test]
    async fn poll_errors_are_swallowed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/get_quote"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/get_break_suggestion"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(
                    json!({"has_suggestion": true, "suggestion": "Stretch your legs."}),
                ),
            )
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let (tx, mut rx) = mpsc::channel(32);
        let mut loops = PollingLoops::default();
        loops.start(&api, &tx, 1, fast_periods());

        // Failing quote polls produce no events, but the suggestion poller keeps
        // delivering and the quote poller stays scheduled.
        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(
            event,
            Event::Response(Response::BreakSuggestion { .. })
        ));
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(loops.active_count(), 2);
    }

    #[tokio::test]
    async fn restart_replaces_previous_pollers() {
        let server = MockServer::start().await;
        let api = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let (tx, _rx) = mpsc::channel(32);
        let mut loops = PollingLoops::default();

        loops.start(&api, &tx, 1, fast_periods());
        loops.start(&api, &tx, 2, fast_periods());
        assert_eq!(loops.active_count(), 2);

        loops.cancel_all();
        loops.cancel_all();
        assert_eq!(loops.active_count(), 0);
    }
}
