use crate::api::EstimatorApi;
use crate::error::RequestError;
use crate::form::inputs::FormInput;
use crate::form::validation::{validate, ValidationError};
use crate::form::view::{Page, UiEvent, ESTIMATING, LOADING_LOCATIONS};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, error, info, warn};

/// Drives the widget: reacts to page-load and estimate clicks, runs each
/// request as its own task, and renders completions onto the [`Page`].
pub struct FormController<A> {
    api: Arc<A>,
    deadline: Duration,
    page: Page,
    events_tx: UnboundedSender<UiEvent>,
    events_rx: UnboundedReceiver<UiEvent>,
    watchers: Vec<JoinHandle<()>>,
    requests: Vec<AbortHandle>,
}

impl<A: EstimatorApi + 'static> FormController<A> {
    pub fn new(api: Arc<A>, deadline: Duration) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            api,
            deadline,
            page: Page::default(),
            events_tx,
            events_rx,
            watchers: Vec::new(),
            requests: Vec::new(),
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn pending(&self) -> usize {
        self.watchers.len()
    }

    /// Show the loading placeholder and start fetching location names
    pub fn on_page_load(&mut self) {
        info!("Page loaded, requesting location names from {}", self.api.service_name());
        self.page.locations.show_placeholder(LOADING_LOCATIONS);

        let api = Arc::clone(&self.api);
        self.spawn_request(async move { api.get_location_names().await }, UiEvent::Locations);
    }

    /// Validate the form and, if it passes, start a prediction request.
    ///
    /// A validation failure is queued on the page as an alert and no request is sent.
    pub fn on_clicked_estimate_price(&mut self, form: &FormInput) -> Result<(), ValidationError> {
        info!("Estimate price button clicked");

        let request = match validate(form) {
            Ok(request) => request,
            Err(err) => {
                warn!("Submission blocked: {}", err);
                self.page.alert(err.to_string());
                return Err(err);
            }
        };

        self.page.results = ESTIMATING.to_string();

        let api = Arc::clone(&self.api);
        self.spawn_request(
            async move { api.predict_home_price(&request).await },
            UiEvent::Estimate,
        );
        Ok(())
    }

    fn spawn_request<F>(&mut self, request: F, tag: fn(Result<Value, RequestError>) -> UiEvent)
    where
        F: Future<Output = Result<Value, RequestError>> + Send + 'static,
    {
        let deadline = self.deadline;
        let events = self.events_tx.clone();

        let task = tokio::spawn(tokio::time::timeout(deadline, request));
        self.requests.push(task.abort_handle());

        let watcher = tokio::spawn(async move {
            let outcome = match task.await {
                Ok(Ok(result)) => result,
                Ok(Err(_)) => Err(RequestError::Timeout(deadline)),
                Err(err) if err.is_cancelled() => {
                    info!("Request cancelled");
                    return;
                }
                Err(err) => Err(RequestError::Internal(err.to_string())),
            };
            if events.send(tag(outcome)).is_err() {
                debug!("Page closed before request completed");
            }
        });
        self.watchers.push(watcher);
    }

    /// Abort every request still in flight. Cancelled requests render nothing.
    pub fn cancel_pending(&mut self) {
        for request in self.requests.drain(..) {
            request.abort();
        }
    }

    /// Wait for all in-flight requests and render their results in arrival order
    pub async fn settle(&mut self) {
        self.settle_until(std::future::pending::<()>()).await;
    }

    /// Like [`settle`](Self::settle), but cancels the outstanding requests once
    /// `cancel` resolves. Returns whether the wait was cut short.
    pub async fn settle_until<C>(&mut self, cancel: C) -> bool
    where
        C: Future<Output = ()>,
    {
        let mut watchers = std::mem::take(&mut self.watchers);
        let cancelled = tokio::select! {
            _ = join_watchers(&mut watchers) => false,
            _ = cancel => true,
        };

        if cancelled {
            warn!("Cancelling outstanding requests");
            self.cancel_pending();
            // A request may have finished just before the abort; its watcher
            // still delivers, and must do so before the channel is drained.
            join_watchers(&mut watchers).await;
        }
        self.requests.clear();
        self.render_pending_events();
        cancelled
    }

    fn render_pending_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.page.render(event);
        }
    }
}

/// Await watchers front to back, removing each once it has finished
async fn join_watchers(watchers: &mut Vec<JoinHandle<()>>) {
    while let Some(watcher) = watchers.first_mut() {
        let result = watcher.await;
        watchers.remove(0);
        if let Err(err) = result {
            error!("Request watcher failed: {}", err);
        }
    }
}
