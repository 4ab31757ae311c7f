pub mod config;
pub mod fetch_error;
pub mod fetcher;
pub mod importers;
pub mod render;
pub mod reports;
pub mod scheduler;
pub mod series;
pub mod services;
pub mod utils;
