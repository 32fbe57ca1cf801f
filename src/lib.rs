pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod providers;
pub mod server;

pub use error::{BrandCheckError, ErrorKind};

// Re-export commonly used types
pub use analyzer::{AnalysisOrchestrator, JsonExtractor, LlmProvider, PromptTemplate, ProviderInvoker};
pub use config::AppConfig;
pub use models::{
    AnalysisResult, ContentRecommendation, ContentRewrite, GuidelineDocument, Priority, ToneBalance,
};
pub use providers::{ProviderConfig, ProviderId, ProviderRegistry};

pub use cli::CliHandler;
