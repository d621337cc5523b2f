pub mod builder;
pub mod client;
pub mod error;
pub mod fallback;
pub mod history;

pub use builder::{PersistClientBuilder, DEFAULT_FALLBACK_FILE, DEFAULT_HISTORY_FILE};
pub use client::PersistClient;
pub use error::PersistError;
pub use fallback::{load_pool, try_load_pool, FallbackPool};
pub use history::{pick_unused_fallback, select_unused, HistoryStore, JsonFileHistory, MemoryHistory};
