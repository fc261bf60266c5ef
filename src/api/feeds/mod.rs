pub mod client;
pub mod models;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::FeedClient;
pub use models::{Feature, FeatureCollection, FeedError, Geometry};
