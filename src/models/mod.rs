pub mod analysis;
pub mod guidelines;
pub mod recommendation;

pub use analysis::{
    ActionItem, AnalysisResult, AttributeScore, IcpAnalysis, Insights, KeyThemes,
    MessagingValues, OverallEvaluation, PillarScore, PrimaryAudience, TargetAudience,
    VoicePersonality, WeakDimension,
};
pub use guidelines::{BrandGuidelines, GuidelineDocument, ToneBalance};
pub use recommendation::{ContentRecommendation, ContentRewrite, Priority};
