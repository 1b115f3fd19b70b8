use crate::store::{StoreError, StoreResult};

pub mod banner_service;
pub mod cart_service;
pub mod product_service;
pub mod review_service;
pub mod wishlist_service;

/// Result of a read. A store failure degrades to `T::default()` and keeps
/// the error so the caller can offer a retry.
#[derive(Debug)]
pub struct Fetched<T> {
    pub data: T,
    pub error: Option<StoreError>,
}

impl<T> Fetched<T> {
    pub fn ok(data: T) -> Self {
        Self { data, error: None }
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        Fetched {
            data: f(self.data),
            error: self.error,
        }
    }
}

impl<T: Default> Fetched<T> {
    pub fn degraded(operation: &'static str, error: StoreError) -> Self {
        tracing::warn!(error = %error, operation, "read degraded to empty result");
        Self {
            data: T::default(),
            error: Some(error),
        }
    }

    pub fn from_store(operation: &'static str, result: StoreResult<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(err) => Self::degraded(operation, err),
        }
    }
}
