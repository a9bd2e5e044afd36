// src/lib.rs

pub mod config;
pub mod gamification;
pub mod llm;
pub mod onboarding;
pub mod profile;
pub mod session;
pub mod state;
pub mod types;

pub use config::CONFIG;
pub use session::Session;
