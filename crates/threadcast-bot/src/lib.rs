pub mod app;
pub mod config;

pub use app::{build_pipeline, run};
pub use config::Config;
