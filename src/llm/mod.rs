// src/llm/mod.rs

pub mod client;
pub mod content;
pub mod prompts;

pub use client::{GeminiClient, GenerativeProvider, ProviderError};
pub use content::ContentAdapter;
