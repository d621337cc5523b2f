pub mod config;
pub mod record;
pub mod thread;

pub use config::{ContentConfig, HashtagBucket};
pub use record::{HistoryRecord, SourceTag};
pub use thread::Thread;
