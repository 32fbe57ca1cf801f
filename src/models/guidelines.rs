use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::BrandCheckError;
use crate::models::analysis::deserialize_score;

const BUILTIN_GUIDELINES: &str = include_str!("../../assets/brand_guidelines.json");

/// Expected rhetorical stance for a channel, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToneBalance {
    #[serde(deserialize_with = "deserialize_score")]
    pub supportive: u8,
    #[serde(deserialize_with = "deserialize_score")]
    pub challenging: u8,
}

impl Default for ToneBalance {
    fn default() -> Self {
        Self {
            supportive: 50,
            challenging: 50,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrandGuidelines {
    pub brand: String,
    pub description: String,
    pub identity: Identity,
    pub personality: Personality,
    pub voice: Voice,
    pub messaging: Messaging,
    pub target_audiences: TargetAudiences,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Identity {
    pub values: Vec<NamedDescription>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamedDescription {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Personality {
    pub primary: PersonalityProfile,
    pub secondary: PersonalityProfile,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalityProfile {
    pub name: String,
    pub description: String,
    pub attributes: Vec<NamedDescription>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Voice {
    pub overall: String,
    pub principles: Vec<VoicePrinciple>,
    pub tone_spectrum: Vec<ToneSpectrumEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoicePrinciple {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub avoid: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneSpectrumEntry {
    pub balance: ToneBalance,
    pub channels: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messaging {
    pub pillars: Vec<MessagingPillar>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagingPillar {
    pub name: String,
    pub points: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetAudiences {
    pub personas: Vec<Persona>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Persona {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub characteristics: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
}

/// Brand guidelines plus the canonical JSON rendering embedded in prompts.
#[derive(Debug, Clone)]
pub struct GuidelineDocument {
    guidelines: BrandGuidelines,
    serialized: String,
}

impl GuidelineDocument {
    pub fn new(guidelines: BrandGuidelines) -> Result<Self, BrandCheckError> {
        let serialized = serde_json::to_string_pretty(&guidelines)?;
        Ok(Self {
            guidelines,
            serialized,
        })
    }

    /// Guidelines compiled into the binary.
    pub fn builtin() -> Result<Self, BrandCheckError> {
        Self::from_json(BUILTIN_GUIDELINES)
    }

    pub fn from_json(text: &str) -> Result<Self, BrandCheckError> {
        let guidelines: BrandGuidelines = serde_json::from_str(text).map_err(|e| {
            BrandCheckError::ConfigError(format!("Invalid brand guideline document: {}", e))
        })?;
        Self::new(guidelines)
    }

    pub fn from_path(path: &Path) -> Result<Self, BrandCheckError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Loads `path` when given, otherwise the built-in guidelines.
    pub fn load(path: Option<&Path>) -> Result<Self, BrandCheckError> {
        match path {
            Some(path) => {
                tracing::info!(path = %path.display(), "Loading brand guidelines");
                Self::from_path(path)
            }
            None => Self::builtin(),
        }
    }

    pub fn guidelines(&self) -> &BrandGuidelines {
        &self.guidelines
    }

    pub fn serialized(&self) -> &str {
        &self.serialized
    }

    pub fn brand_name(&self) -> &str {
        if self.guidelines.brand.trim().is_empty() {
            "the brand"
        } else {
            self.guidelines.brand.trim()
        }
    }

    /// Tone balance for the first spectrum entry listing `platform`
    /// (case-insensitive); 50/50 when no channel matches.
    pub fn expected_tone_balance(&self, platform: &str) -> ToneBalance {
        let wanted = platform.trim().to_lowercase();
        self.guidelines
            .voice
            .tone_spectrum
            .iter()
            .find(|entry| {
                entry
                    .channels
                    .iter()
                    .any(|channel| channel.trim().to_lowercase() == wanted)
            })
            .map(|entry| entry.balance)
            .unwrap_or_default()
    }
}
