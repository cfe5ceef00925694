// Core Gemini API functionality shared by the relay and its tests

// Export client module - API client for Gemini
pub mod client;
pub use client::*;

// Export types module - Request/response data structures
pub mod types;
pub use types::*;

// Export config module - Configuration loading
pub mod config;
pub use config::*;

// Export errors module - Shared error types
pub mod errors;
pub use errors::*;

// Export model module - The seam between request handling and the provider
pub mod model;
pub use model::{LanguageModel, LanguageModelRef};
