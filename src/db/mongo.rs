use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    Client, Collection, Database,
    bson::{self, Bson, Document, doc, oid::ObjectId},
    options::ConnectionString,
};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

use crate::{
    config::{Config, DEFAULT_DB},
    db::ReviewStore,
    errors::AppError,
    models::{NewReview, Review},
};

/// On-disk shape of a submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ReviewDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    user_rating_id: String,
    ratings: Vec<f64>,
    average: f64,
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    created_at: Option<bson::DateTime>,
}

impl ReviewDocument {
    fn into_review(self) -> Review {
        // Older documents may lack createdAt; the ObjectId still carries one.
        let created = self
            .created_at
            .or_else(|| self.id.map(|oid| oid.timestamp()))
            .and_then(|dt| DateTime::<Utc>::from_timestamp_millis(dt.timestamp_millis()))
            .unwrap_or_else(Utc::now);

        Review {
            id: self.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            user_rating_id: self.user_rating_id,
            ratings: self.ratings,
            average: self.average,
            created_at: created,
        }
    }
}

struct MongoHandle {
    client: Client,
    db: Database,
    reviews: Collection<ReviewDocument>,
}

pub struct MongoReviewStore {
    url: String,
    db_name: Option<String>,
    collection_name: String,
    handle: OnceCell<MongoHandle>,
}

impl MongoReviewStore {
    /// Validates the connection string and checks reachability once.
    /// Only an unparsable URL is fatal: DNS or server outages are logged and
    /// requests fail individually until the database is back.
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        ConnectionString::parse(&config.mongodb_url)
            .map_err(|e| AppError::EnvError(format!("Invalid MONGODB_URL: {}", e)))?;

        let store = Self {
            url: config.mongodb_url.clone(),
            db_name: config.mongodb_db.clone(),
            collection_name: config.mongodb_collection.clone(),
            handle: OnceCell::new(),
        };

        match store.handle().await {
            Ok(handle) => match handle.db.run_command(doc! { "ping": 1 }).await {
                Ok(_) => tracing::info!("Connected to MongoDB database '{}'", handle.db.name()),
                Err(e) => tracing::error!("Error connecting to MongoDB: {}", e),
            },
            Err(e) => tracing::error!("Error connecting to MongoDB: {}", e),
        }

        Ok(store)
    }

    /// Client is built on first success and reused; failures are retried on the next call.
    async fn handle(&self) -> Result<&MongoHandle, AppError> {
        self.handle
            .get_or_try_init(|| async {
                let client = Client::with_uri_str(&self.url).await?;
                let db = match &self.db_name {
                    Some(name) => client.database(name),
                    None => client
                        .default_database()
                        .unwrap_or_else(|| client.database(DEFAULT_DB)),
                };
                let reviews = db.collection::<ReviewDocument>(&self.collection_name);
                Ok::<_, AppError>(MongoHandle {
                    client,
                    db,
                    reviews,
                })
            })
            .await
    }

    async fn reviews(&self) -> Result<&Collection<ReviewDocument>, AppError> {
        Ok(&self.handle().await?.reviews)
    }
}

/// Reads the `$avg` out of a `$group` result. No documents means no group at
/// all, and `$avg` over non-numeric values is null; both count as 0.
fn group_average(group: Option<&Document>) -> f64 {
    match group.and_then(|g| g.get("average")) {
        Some(Bson::Double(v)) => *v,
        Some(Bson::Int32(v)) => f64::from(*v),
        Some(Bson::Int64(v)) => *v as f64,
        _ => 0.0,
    }
}

#[async_trait]
impl ReviewStore for MongoReviewStore {
    async fn insert(&self, review: NewReview) -> Result<Review, AppError> {
        let now = Utc::now();
        let mut document = ReviewDocument {
            id: None,
            user_rating_id: review.user_rating_id,
            ratings: review.ratings,
            average: review.average,
            created_at: Some(bson::DateTime::from_millis(now.timestamp_millis())),
        };

        let result = self.reviews().await?.insert_one(&document).await?;
        document.id = result.inserted_id.as_object_id();

        Ok(document.into_review())
    }

    async fn find_by_user_rating_id(
        &self,
        user_rating_id: &str,
    ) -> Result<Option<Review>, AppError> {
        let found = self
            .reviews()
            .await?
            .find_one(doc! { "user_rating_id": user_rating_id })
            .await?;

        Ok(found.map(ReviewDocument::into_review))
    }

    async fn overall_average(&self) -> Result<f64, AppError> {
        let pipeline = [doc! {
            "$group": { "_id": Bson::Null, "average": { "$avg": "$average" } }
        }];

        let mut cursor = self.reviews().await?.aggregate(pipeline).await?;
        let group = cursor.try_next().await?;
        tracing::debug!("Aggregation result: {:?}", group);

        Ok(group_average(group.as_ref()))
    }

    async fn shutdown(&self) {
        if let Some(handle) = self.handle.get() {
            handle.client.clone().shutdown().await;
            tracing::info!("MongoDB client shut down");
        }
    }
}
