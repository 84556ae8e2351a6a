pub mod classifier;
pub mod differ;
pub mod fetcher;
