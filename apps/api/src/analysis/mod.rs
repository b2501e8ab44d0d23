// Curriculum gap analysis and the end-to-end pipeline that feeds it.

pub mod archive;
pub mod gap;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
