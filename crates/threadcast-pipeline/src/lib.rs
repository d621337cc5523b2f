pub mod builder;
pub mod composer;
pub mod config;
pub mod runner;
pub mod selector;

pub use builder::PipelineBuilder;
pub use composer::{build_prompt, clamp_segment, pick_hashtags, ThreadComposer};
pub use config::{GenerationSettings, PipelineConfig, EVENING_SCHEDULE};
pub use runner::{Pipeline, RunOutcome};
pub use selector::{ContentSelector, RunMode, Selection};

// Re-export key types from the other threadcast crates
pub use threadcast_types::{ContentConfig, HistoryRecord, SourceTag, Thread};
