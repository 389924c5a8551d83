//! Fabric mockup API library
//!
//! Modules:
//! - `api`: Axum HTTP handlers and router setup used by the binary.
//! - `catalog`: CSV-backed prompt catalog, loaded once at startup.
//! - `gemini`: Client for the hosted image model and the mockup/try-on generator.
//! - `prompt`: Try-on prompt template with `[Outfit_type]` substitution.
//! - `config`: Env-driven configuration loader.
//! - `error`: Common error type and alias.
//!
//! Re-exports are provided for common types: `Config`, `PromptCatalog`,
//! `GeminiClient`, `MockupGenerator`, and `PromptConstructor`.
pub mod api;
pub mod catalog;
pub mod gemini;
pub mod prompt;
pub mod config;
pub mod error;

pub use config::Config;
pub use catalog::PromptCatalog;
pub use gemini::{GeminiClient, GenerativeModel, MockupGenerator};
pub use prompt::constructor::PromptConstructor;
pub use error::{AppError, AppResult};
