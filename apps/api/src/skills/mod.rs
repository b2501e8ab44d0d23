// Skill engine: extraction strategies and document-frequency trends.

pub mod catalog;
pub mod extractor;
pub mod handlers;
pub mod prompts;
pub mod trends;
