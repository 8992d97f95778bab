pub mod loader;
pub mod summarizer;
