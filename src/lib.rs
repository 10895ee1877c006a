pub mod aggregate;
pub mod cache;
pub mod config;
pub mod dataset;
pub mod demo_data;
pub mod export;
pub mod league;
pub mod metrics;
pub mod palette;
pub mod persist;
pub mod state;
