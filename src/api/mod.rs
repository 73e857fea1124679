pub mod client;
pub mod traits;

pub use client::HttpEstimatorApi;
pub use traits::EstimatorApi;
