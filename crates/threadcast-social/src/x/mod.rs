// X (Twitter) API v2 implementation

mod client;

pub use client::{XClient, X_API_BASE};
