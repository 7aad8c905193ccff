use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{aggregation::submission_average, errors::AppError};

/// A stored rating submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_rating_id: String,
    pub ratings: Vec<f64>,
    /// Mean of `ratings`, fixed at write time.
    pub average: f64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// A validated submission that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub user_rating_id: String,
    pub ratings: Vec<f64>,
    pub average: f64,
}

impl NewReview {
    pub fn new(user_rating_id: impl Into<String>, ratings: Vec<f64>) -> Result<Self, AppError> {
        let user_rating_id = user_rating_id.into();
        if user_rating_id.trim().is_empty() {
            return Err(AppError::BadRequest("user_rating_id is required".into()));
        }

        let average = submission_average(&ratings)
            .ok_or_else(|| AppError::BadRequest("ratings must not be empty".into()))?;

        Ok(Self {
            user_rating_id,
            ratings,
            average,
        })
    }

    pub fn into_review(self, id: String, created_at: DateTime<Utc>) -> Review {
        Review {
            id,
            user_rating_id: self.user_rating_id,
            ratings: self.ratings,
            average: self.average,
            created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SubmitPayload {
    pub user_rating_id: Option<String>,
    #[serde(alias = "que")]
    pub ratings: Option<Vec<f64>>,
}

impl SubmitPayload {
    pub fn into_new_review(self) -> Result<NewReview, AppError> {
        let user_rating_id = self
            .user_rating_id
            .ok_or_else(|| AppError::BadRequest("user_rating_id is required".into()))?;
        let ratings = self
            .ratings
            .ok_or_else(|| AppError::BadRequest("ratings is required".into()))?;

        NewReview::new(user_rating_id, ratings)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallAverage {
    pub overall_average: f64,
}

/// Answer to the has-rated check. `ratings` carries the stored average and
/// `que` the individual scores; both are omitted when nothing was found.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRated {
    pub has_rated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratings: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub que: Option<Vec<f64>>,
}

impl CheckRated {
    pub fn not_rated() -> Self {
        Self::default()
    }
}

impl From<Option<Review>> for CheckRated {
    fn from(review: Option<Review>) -> Self {
        match review {
            Some(review) => Self {
                has_rated: true,
                ratings: Some(review.average),
                que: Some(review.ratings),
            },
            None => Self::not_rated(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
