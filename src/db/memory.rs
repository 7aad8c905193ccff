use async_trait::async_trait;
use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::{
    aggregation::mean_of_averages,
    db::ReviewStore,
    errors::AppError,
    models::{NewReview, Review},
};

/// Process-local store with the same semantics as the MongoDB one.
#[derive(Debug, Default)]
pub struct InMemoryReviewStore {
    reviews: RwLock<Vec<Review>>,
}

impl InMemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.reviews.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.reviews.read().await.is_empty()
    }
}

#[async_trait]
impl ReviewStore for InMemoryReviewStore {
    async fn insert(&self, review: NewReview) -> Result<Review, AppError> {
        let stored = review.into_review(ObjectId::new().to_hex(), Utc::now());
        self.reviews.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_user_rating_id(
        &self,
        user_rating_id: &str,
    ) -> Result<Option<Review>, AppError> {
        let reviews = self.reviews.read().await;
        Ok(reviews
            .iter()
            .find(|r| r.user_rating_id == user_rating_id)
            .cloned())
    }

    async fn overall_average(&self) -> Result<f64, AppError> {
        let reviews = self.reviews.read().await;
        Ok(mean_of_averages(reviews.iter().map(|r| r.average)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn duplicates_are_kept_and_first_match_wins() {
        let store = InMemoryReviewStore::new();
        let first = store
            .insert(NewReview::new("dup", vec![1.0, 3.0]).unwrap())
            .await
            .unwrap();
        store
            .insert(NewReview::new("dup", vec![5.0]).unwrap())
            .await
            .unwrap();

        assert_eq!(store.len().await, 2);
        let found = store.find_by_user_rating_id("dup").await.unwrap().unwrap();
        assert_eq!(found.id, first.id);
        assert_eq!(found.average, 2.0);
    }

    #[tokio::test]
    async fn overall_average_tracks_inserts() {
        let store = InMemoryReviewStore::new();
        assert_eq!(store.overall_average().await.unwrap(), 0.0);

        for (id, score) in [("a", 2.0), ("b", 4.0), ("c", 6.0)] {
            store
                .insert(NewReview::new(id, vec![score]).unwrap())
                .await
                .unwrap();
        }
        assert_eq!(store.overall_average().await.unwrap(), 4.0);
    }

    #[tokio::test]
    async fn unknown_id_is_none() {
        let store = InMemoryReviewStore::new();
        assert!(store.find_by_user_rating_id("nobody").await.unwrap().is_none());
    }
}
