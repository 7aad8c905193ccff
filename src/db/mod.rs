//! Rating record storage.

pub mod memory;
pub mod mongo;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    errors::AppError,
    models::{NewReview, Review},
};

pub use memory::InMemoryReviewStore;
pub use mongo::MongoReviewStore;

/// Storage interface used by the HTTP handlers.
///
/// Nothing here enforces uniqueness of `user_rating_id`: inserting the same
/// id twice stores two documents, and lookups return whichever matches first.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Persists a submission and returns it with its assigned id and timestamp.
    async fn insert(&self, review: NewReview) -> Result<Review, AppError>;

    /// First submission stored under `user_rating_id`, if any.
    async fn find_by_user_rating_id(&self, user_rating_id: &str)
    -> Result<Option<Review>, AppError>;

    /// Mean of every stored submission's `average`, or 0 when empty.
    async fn overall_average(&self) -> Result<f64, AppError>;

    /// Releases underlying connections. Called once on shutdown.
    async fn shutdown(&self) {}
}

pub type SharedStore = Arc<dyn ReviewStore>;
