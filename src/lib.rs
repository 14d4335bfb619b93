pub mod config;
pub mod fetcher;
pub mod models;
pub mod normalizer;
pub mod parser;
pub mod pipeline;
pub mod writer;

pub use config::PipelineConfig;
pub use models::{Feed, OutputDocument};
pub use pipeline::run;
