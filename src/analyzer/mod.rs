// Analyzer module - prompt building, provider invocation and response extraction

pub mod extractor;
pub mod llm_client;
pub mod orchestrator;
pub mod prompts;

pub use extractor::{extract_json, ExtractionStrategy, JsonExtractor};
pub use llm_client::{LlmProvider, ProviderInvoker};
pub use orchestrator::{AnalysisOrchestrator, Stage};
pub use prompts::PromptTemplate;
