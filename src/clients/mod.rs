pub mod arxiv_client;
pub mod llm_client;

pub use arxiv_client::ArxivClient;
pub use llm_client::{ChatOptions, LlmClient};
