pub mod review;

pub use review::{CheckRated, ErrorBody, NewReview, OverallAverage, Review, SubmitPayload};
