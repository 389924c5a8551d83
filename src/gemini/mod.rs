//! Client side of the hosted image model.
pub mod client;
pub mod generator;
pub mod types;

pub use client::{GeminiClient, GenerativeModel};
pub use generator::MockupGenerator;
