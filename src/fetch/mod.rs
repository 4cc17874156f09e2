//! Data fetching with fallback values.
//!
//! `Resource` fetches once when activated and keeps an initial (fallback)
//! value until the live payload arrives. `Mutation` is the manually
//! triggered sibling used for write operations.

pub mod error;
pub mod mutation;
pub mod resource;
pub mod response;

pub use error::FetchError;
pub use mutation::{Mutation, MutationState};
pub use resource::{FetchFuture, FetchOptions, FetchStatus, Fetcher, Resource, ResourceState};
pub use response::ApiResponse;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock a mutex, recovering the guard if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
