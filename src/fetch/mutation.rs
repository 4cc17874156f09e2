//! Manually triggered write operation with observable state.

use std::{future::Future, sync::Mutex};

use super::{lock, ApiResponse, FetchError, FetchFuture};

type MutationFn<V, T> = Box<dyn Fn(V) -> FetchFuture<T> + Send + Sync>;

#[derive(Debug, Clone)]
pub struct MutationState<T> {
    pub data: Option<T>,
    pub is_loading: bool,
    pub error: Option<FetchError>,
}

impl<T> Default for MutationState<T> {
    fn default() -> Self {
        Self {
            data: None,
            is_loading: false,
            error: None,
        }
    }
}

pub struct Mutation<V, T> {
    func: MutationFn<V, T>,
    state: Mutex<MutationState<T>>,
}

impl<V: Send + 'static, T: Clone + Send + 'static> Mutation<V, T> {
    pub fn new<F, Fut>(func: F) -> Self
    where
        F: Fn(V) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ApiResponse<T>, FetchError>> + Send + 'static,
    {
        Self {
            func: Box::new(move |variables| Box::pin(func(variables))),
            state: Mutex::new(MutationState::default()),
        }
    }

    /// Run the operation. Returns the payload, or the normalized error.
    pub async fn mutate(&self, variables: V) -> Result<T, FetchError> {
        {
            let mut state = lock(&self.state);
            state.is_loading = true;
            state.error = None;
        }

        let outcome = match (self.func)(variables).await {
            Ok(response) => response.into_result(),
            Err(err) => Err(err),
        };

        let mut state = lock(&self.state);
        state.is_loading = false;
        match &outcome {
            Ok(data) => state.data = Some(data.clone()),
            Err(err) => state.error = Some(err.clone()),
        }
        outcome
    }

    /// Clear data and error
    pub fn reset(&self) {
        let mut state = lock(&self.state);
        state.data = None;
        state.error = None;
    }

    pub fn state(&self) -> MutationState<T> {
        lock(&self.state).clone()
    }
}
