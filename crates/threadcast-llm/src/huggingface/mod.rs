// Hugging Face Inference API implementation

mod client;

pub use client::{extract_generated_text, HuggingFaceClient, HF_INFERENCE_BASE};
