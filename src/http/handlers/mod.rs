pub mod review;

pub use review::{check_rated_handler, overall_average_handler, submit_handler};
