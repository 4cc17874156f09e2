//! Fetch-once resource with a fallback value.
//!
//! A `Resource` moves through `NotStarted -> InFlight -> Settled`. Activation
//! only starts a fetch from `NotStarted`, so repeated activation never issues
//! a duplicate request. `refetch` always starts a new request and aborts the
//! one it supersedes. Dropping the resource aborts whatever is in flight.

use std::{
    future::Future,
    pin::Pin,
    sync::{Arc, Mutex},
};

use serde::Serialize;
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, warn};

use super::{lock, ApiResponse, FetchError};

pub type FetchFuture<T> =
    Pin<Box<dyn Future<Output = Result<ApiResponse<T>, FetchError>> + Send>>;

/// Anything that can produce a fresh request for `T`
pub trait Fetcher<T>: Send + Sync + 'static {
    fn fetch(&self) -> FetchFuture<T>;
}

impl<T, F, Fut> Fetcher<T> for F
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ApiResponse<T>, FetchError>> + Send + 'static,
{
    fn fetch(&self) -> FetchFuture<T> {
        Box::pin(self())
    }
}

pub type Callback<A> = Arc<dyn Fn(&A) + Send + Sync>;

/// Options controlling a resource
pub struct FetchOptions<T> {
    /// Value exposed until (and unless) a fetch succeeds
    pub initial_data: Option<T>,
    pub on_success: Option<Callback<T>>,
    pub on_error: Option<Callback<FetchError>>,
    pub enabled: bool,
}

impl<T> Default for FetchOptions<T> {
    fn default() -> Self {
        Self {
            initial_data: None,
            on_success: None,
            on_error: None,
            enabled: true,
        }
    }
}

impl<T> FetchOptions<T> {
    pub fn initial_data(mut self, data: T) -> Self {
        self.initial_data = Some(data);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn on_success(mut self, callback: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(callback));
        self
    }

    pub fn on_error(mut self, callback: impl Fn(&FetchError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(callback));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStatus {
    NotStarted,
    InFlight,
    Settled,
}

/// Observable state of a resource
#[derive(Debug, Clone)]
pub struct ResourceState<T> {
    pub data: Option<T>,
    pub is_loading: bool,
    pub error: Option<FetchError>,
    pub status: FetchStatus,
    /// `data` is still the initial value; no fetch has succeeded yet
    pub is_fallback: bool,
}

struct Control {
    status: FetchStatus,
    enabled: bool,
    generation: u64,
    task: Option<JoinHandle<()>>,
}

struct Shared<T> {
    name: &'static str,
    fetcher: Box<dyn Fetcher<T>>,
    on_success: Option<Callback<T>>,
    on_error: Option<Callback<FetchError>>,
    control: Mutex<Control>,
    state: watch::Sender<ResourceState<T>>,
}

impl<T: Clone + Send + Sync + 'static> Shared<T> {
    /// Record the outcome of fetch `generation`; late results of superseded
    /// fetches are dropped.
    fn settle(&self, generation: u64, outcome: Result<T, FetchError>) {
        {
            let mut control = lock(&self.control);
            if control.generation != generation {
                debug!(resource = self.name, generation, "Discarding stale fetch result");
                return;
            }
            control.status = FetchStatus::Settled;
            control.task = None;

            match &outcome {
                Ok(data) => self.state.send_modify(|state| {
                    state.data = Some(data.clone());
                    state.is_loading = false;
                    state.error = None;
                    state.status = FetchStatus::Settled;
                    state.is_fallback = false;
                }),
                Err(err) => self.state.send_modify(|state| {
                    state.is_loading = false;
                    state.error = Some(err.clone());
                    state.status = FetchStatus::Settled;
                }),
            }
        }

        match outcome {
            Ok(data) => {
                debug!(resource = self.name, "Fetch succeeded");
                if let Some(callback) = &self.on_success {
                    callback(&data);
                }
            }
            Err(err) => {
                warn!(resource = self.name, "Fetch failed: {}", err);
                if let Some(callback) = &self.on_error {
                    callback(&err);
                }
            }
        }
    }
}

/// Owned handle to a fetch-with-fallback resource
pub struct Resource<T> {
    shared: Arc<Shared<T>>,
}

impl<T: Clone + Send + Sync + 'static> Resource<T> {
    /// Create a resource without fetching. Call `activate` to start it.
    pub fn new(name: &'static str, fetcher: impl Fetcher<T>, options: FetchOptions<T>) -> Self {
        let (state, _) = watch::channel(ResourceState {
            data: options.initial_data,
            is_loading: false,
            error: None,
            status: FetchStatus::NotStarted,
            is_fallback: true,
        });

        Self {
            shared: Arc::new(Shared {
                name,
                fetcher: Box::new(fetcher),
                on_success: options.on_success,
                on_error: options.on_error,
                control: Mutex::new(Control {
                    status: FetchStatus::NotStarted,
                    enabled: options.enabled,
                    generation: 0,
                    task: None,
                }),
                state,
            }),
        }
    }

    /// Start the first fetch. Returns false when disabled or already started.
    pub fn activate(&self) -> bool {
        let mut control = lock(&self.shared.control);
        if !control.enabled || control.status != FetchStatus::NotStarted {
            return false;
        }
        self.start(&mut control);
        true
    }

    /// Enable or disable the resource. Enabling a resource that never
    /// fetched activates it.
    pub fn set_enabled(&self, enabled: bool) -> bool {
        lock(&self.shared.control).enabled = enabled;
        enabled && self.activate()
    }

    /// Fetch again regardless of status, superseding any in-flight request
    pub fn refetch(&self) {
        let mut control = lock(&self.shared.control);
        self.start(&mut control);
    }

    fn start(&self, control: &mut Control) {
        control.generation += 1;
        control.status = FetchStatus::InFlight;
        let generation = control.generation;

        self.shared.state.send_modify(|state| {
            state.is_loading = true;
            state.error = None;
            state.status = FetchStatus::InFlight;
        });

        let request = self.shared.fetcher.fetch();
        let shared = Arc::clone(&self.shared);
        let handle = tokio::spawn(async move {
            let outcome = match request.await {
                Ok(response) => response.into_result(),
                Err(err) => Err(err),
            };
            shared.settle(generation, outcome);
        });

        if let Some(previous) = control.task.replace(handle) {
            debug!(resource = self.shared.name, "Aborting superseded fetch");
            previous.abort();
        }
    }

    pub fn snapshot(&self) -> ResourceState<T> {
        self.shared.state.borrow().clone()
    }

    /// Current data: the live payload once fetched, otherwise the initial value
    pub fn data(&self) -> Option<T> {
        self.shared.state.borrow().data.clone()
    }

    pub fn status(&self) -> FetchStatus {
        self.shared.state.borrow().status
    }

    pub fn subscribe(&self) -> watch::Receiver<ResourceState<T>> {
        self.shared.state.subscribe()
    }

    /// Wait until no fetch is in flight and return the resulting state
    pub async fn settled(&self) -> ResourceState<T> {
        let mut receiver = self.shared.state.subscribe();
        let state = match receiver
            .wait_for(|state| state.status != FetchStatus::InFlight)
            .await
        {
            Ok(state) => Some((*state).clone()),
            Err(_) => None,
        };
        state.unwrap_or_else(|| self.snapshot())
    }
}

impl<T> Drop for Resource<T> {
    fn drop(&mut self) {
        if let Some(task) = lock(&self.shared.control).task.take() {
            debug!(resource = self.shared.name, "Cancelling in-flight fetch on teardown");
            task.abort();
        }
    }
}
