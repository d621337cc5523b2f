pub mod config;
pub mod huggingface;
pub mod traits;

pub use config::{ClientFactory, HuggingFaceConfig, ProviderConfig};
pub use huggingface::HuggingFaceClient;
pub use traits::{GenerateOptions, GenerateRequest, GenerateResponse, TextGenerator};
