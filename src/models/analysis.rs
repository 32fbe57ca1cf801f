use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::models::{ContentRecommendation, Priority, ToneBalance};

/// Structured brand-alignment report produced by the analysis prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub voice_personality: VoicePersonality,
    pub target_audience: TargetAudience,
    pub messaging_values: MessagingValues,
    pub overall: OverallEvaluation,
    /// Only ever populated by the recommendations pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_recommendations: Option<Vec<ContentRecommendation>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoicePersonality {
    #[serde(default)]
    pub analysis: String,
    #[serde(deserialize_with = "deserialize_score")]
    pub score: u8,
    /// Measured balance; absent when the model did not report one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone_balance: Option<ToneBalance>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub voice_attributes: BTreeMap<String, AttributeScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetAudience {
    #[serde(default)]
    pub analysis: String,
    #[serde(deserialize_with = "deserialize_score")]
    pub score: u8,
    pub primary_audience: PrimaryAudience,
    #[serde(default)]
    pub audience_insights: Insights,
    #[serde(default)]
    pub persona_matches: BTreeMap<String, AttributeScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icp_analysis: Option<IcpAnalysis>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryAudience {
    #[serde(rename = "type", default)]
    pub audience_type: String,
    #[serde(deserialize_with = "deserialize_score")]
    pub alignment: u8,
    #[serde(default)]
    pub feedback: String,
}

/// Position on the ideal-customer-profile quadrant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IcpAnalysis {
    /// 0 = pure user, 100 = pure buyer
    #[serde(deserialize_with = "deserialize_score")]
    pub user_buyer_score: u8,
    /// 0 = graduator, 100 = disenfranchised
    #[serde(deserialize_with = "deserialize_score")]
    pub maturity_score: u8,
    #[serde(default)]
    pub primary_persona: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagingValues {
    #[serde(default)]
    pub analysis: String,
    #[serde(deserialize_with = "deserialize_score")]
    pub score: u8,
    #[serde(default)]
    pub key_themes: KeyThemes,
    #[serde(default)]
    pub messaging_pillars: BTreeMap<String, PillarScore>,
    #[serde(default)]
    pub value_alignment: BTreeMap<String, AttributeScore>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyThemes {
    #[serde(default)]
    pub present: Vec<String>,
    #[serde(default)]
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallEvaluation {
    #[serde(default)]
    pub analysis: String,
    #[serde(deserialize_with = "deserialize_score")]
    pub score: u8,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<ActionItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionItem {
    #[serde(default, deserialize_with = "deserialize_lenient_priority")]
    pub priority: Priority,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeScore {
    #[serde(deserialize_with = "deserialize_score")]
    pub score: u8,
    #[serde(default)]
    pub feedback: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PillarScore {
    #[serde(deserialize_with = "deserialize_score")]
    pub score: u8,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub examples: Vec<String>,
}

/// A scored dimension that fell below the improvement threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeakDimension {
    pub area: &'static str,
    pub name: String,
    pub score: u8,
}

impl AnalysisResult {
    /// Top-level section scores, in report order.
    pub fn section_scores(&self) -> [(&'static str, u8); 4] {
        [
            ("Voice & Personality", self.voice_personality.score),
            ("Target Audience", self.target_audience.score),
            ("Messaging & Values", self.messaging_values.score),
            ("Overall", self.overall.score),
        ]
    }

    pub fn weak_dimensions(&self, threshold: u8) -> Vec<WeakDimension> {
        let mut weak = Vec::new();

        for (name, score) in self.section_scores().iter().take(3) {
            if *score < threshold {
                weak.push(WeakDimension {
                    area: "Section",
                    name: name.to_string(),
                    score: *score,
                });
            }
        }

        let nested: [(&'static str, Vec<(&String, u8)>); 4] = [
            (
                "Voice attribute",
                self.voice_personality
                    .voice_attributes
                    .iter()
                    .map(|(name, attr)| (name, attr.score))
                    .collect(),
            ),
            (
                "Audience persona",
                self.target_audience
                    .persona_matches
                    .iter()
                    .map(|(name, attr)| (name, attr.score))
                    .collect(),
            ),
            (
                "Messaging pillar",
                self.messaging_values
                    .messaging_pillars
                    .iter()
                    .map(|(name, pillar)| (name, pillar.score))
                    .collect(),
            ),
            (
                "Brand value",
                self.messaging_values
                    .value_alignment
                    .iter()
                    .map(|(name, attr)| (name, attr.score))
                    .collect(),
            ),
        ];

        for (area, entries) in nested {
            for (name, score) in entries {
                if score < threshold {
                    weak.push(WeakDimension {
                        area,
                        name: name.clone(),
                        score,
                    });
                }
            }
        }

        weak
    }

    pub fn without_recommendations(mut self) -> Self {
        self.content_recommendations = None;
        self
    }

    pub fn with_recommendations(mut self, recommendations: Vec<ContentRecommendation>) -> Self {
        self.content_recommendations = Some(recommendations);
        self
    }
}

/// Accepts integers, fractional numbers and numeric strings ("85", "85%"),
/// rounding to the nearest integer. Anything outside 0-100 is rejected.
pub(crate) fn deserialize_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let number = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| de::Error::custom(format!("expected a score between 0 and 100, found {}", value)))?;

    if !(0.0..=100.0).contains(&number) {
        return Err(de::Error::custom(format!(
            "score {} is outside the 0-100 range",
            number
        )));
    }

    Ok(number.round() as u8)
}

/// Action items are advisory, so an unrecognised or missing priority falls
/// back to medium instead of failing the whole report.
fn deserialize_lenient_priority<'de, D>(deserializer: D) -> Result<Priority, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let priority = value.as_str().and_then(|s| s.parse().ok()).unwrap_or_else(|| {
        tracing::debug!(priority = %value, "Unrecognised action priority, using Medium");
        Priority::Medium
    });
    Ok(priority)
}
