//! Adapter implementations for suggestion ports.

pub mod gemini;
pub mod memory;
pub mod postgres;

pub use gemini::{GeminiGenerator, GeneratorConfig};
pub use memory::InMemorySuggestionRepository;
