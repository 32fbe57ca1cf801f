use crate::models::{AnalysisResult, GuidelineDocument, ToneBalance};

/// Dimensions scoring below this are called out in the recommendations prompt.
pub const IMPROVEMENT_THRESHOLD: u8 = 70;

pub struct PromptTemplate;

impl PromptTemplate {
    pub fn build_analysis_prompt(
        content: &str,
        platform: &str,
        guidelines: &GuidelineDocument,
    ) -> String {
        let brand = guidelines.brand_name();
        let tone = guidelines.expected_tone_balance(platform);

        format!(
            r#"# Task: Marketing Content Brand Alignment Analysis

## Context
You are an expert marketing brand consultant analyzing content for {brand}. Your task is to evaluate how well the provided marketing content aligns with {brand}'s brand guidelines.

## Brand Guidelines
{guidelines}

## Content Details
- PLATFORM/CHANNEL: {platform}
- {tone_line}

## Content to Analyze
```
{content}
```

## Analysis Instructions
1. Carefully read the content and compare it against {brand}'s brand guidelines
2. Evaluate across all dimensions: voice, tone, audience targeting, and messaging alignment
3. Provide specific examples from the text to support your evaluation
4. Score each dimension on a scale of 0-100 based on the following criteria:
   - 90-100: Exemplary alignment with brand guidelines
   - 70-89: Strong alignment with minor improvements possible
   - 50-69: Moderate alignment with several areas for improvement
   - 30-49: Limited alignment with significant improvements needed
   - 0-29: Poor alignment requiring complete revision

## Output Format
Provide your analysis in the following JSON format with NO additional text before or after the JSON object:

{template}"#,
            brand = brand,
            guidelines = guidelines.serialized(),
            platform = platform,
            tone_line = Self::tone_line(tone),
            content = content,
            template = Self::analysis_output_template(guidelines),
        )
    }

    pub fn build_recommendations_prompt(
        content: &str,
        platform: &str,
        analysis: &AnalysisResult,
        guidelines: &GuidelineDocument,
    ) -> String {
        let brand = guidelines.brand_name();
        let tone = guidelines.expected_tone_balance(platform);

        let scores = analysis
            .section_scores()
            .iter()
            .map(|(name, score)| format!("- {} Score: {}/100", name, score))
            .collect::<Vec<_>>()
            .join("\n");

        let weak = analysis.weak_dimensions(IMPROVEMENT_THRESHOLD);
        let weak_areas = if weak.is_empty() {
            format!("- No dimension scored below {}", IMPROVEMENT_THRESHOLD)
        } else {
            weak.iter()
                .map(|w| format!("- {}: {} ({}/100)", w.area, w.name, w.score))
                .collect::<Vec<_>>()
                .join("\n")
        };

        let missing_themes = &analysis.messaging_values.key_themes.missing;
        let missing_line = if missing_themes.is_empty() {
            "- Missing themes: none identified".to_string()
        } else {
            format!("- Missing themes: {}", missing_themes.join(", "))
        };

        format!(
            r#"# Task: Generate Actionable Content Recommendations

## Context
You are an expert marketing brand consultant for {brand}. You've analyzed a piece of marketing content and now need to provide specific, actionable recommendations to improve its alignment with {brand}'s brand guidelines.

## Content Details
- PLATFORM/CHANNEL: {platform}
- {tone_line}

## Original Content
```
{content}
```

## Analysis Summary
{scores}

### Key Improvement Areas (scored below {threshold}):
{weak_areas}

### Voice/Tone Improvements:
{voice_improvements}

### Audience Targeting Improvements:
{audience_improvements}

### Messaging Improvements:
{missing_line}
{overall_improvements}

## Recommendation Instructions
1. Create 3-5 high-impact, actionable recommendations that would most improve the content's brand alignment
2. Prioritize recommendations based on:
   - Impact on overall brand alignment
   - Severity of the issue
   - Ease of implementation
3. For each recommendation, provide:
   - A clear category (Voice/Tone, Audience Targeting, Messaging, or Platform-Specific)
   - A priority level (High/Medium/Low)
   - A specific, actionable title
   - A detailed description of the recommendation
   - Concrete examples showing original text and how it could be improved
4. Every example's "original" MUST be copied verbatim (or near-verbatim) from the Original Content above. Never invent or paraphrase text that is not in the content.
5. Focus on substantive improvements, not just superficial wording changes

## Output Format
Provide your recommendations in the following JSON format with NO additional text before or after the JSON array:

{template}"#,
            brand = brand,
            platform = platform,
            tone_line = Self::tone_line(tone),
            content = content,
            scores = scores,
            threshold = IMPROVEMENT_THRESHOLD,
            weak_areas = weak_areas,
            voice_improvements = Self::bullets(&analysis.voice_personality.improvements),
            audience_improvements = Self::bullets(&analysis.target_audience.audience_insights.improvements),
            missing_line = missing_line,
            overall_improvements = Self::bullets(&analysis.overall.improvements),
            template = RECOMMENDATIONS_OUTPUT_TEMPLATE,
        )
    }

    fn tone_line(tone: ToneBalance) -> String {
        format!(
            "EXPECTED TONE BALANCE: {}% challenging, {}% supportive",
            tone.challenging, tone.supportive
        )
    }

    fn bullets(items: &[String]) -> String {
        if items.is_empty() {
            return "- None recorded".to_string();
        }
        items
            .iter()
            .map(|item| format!("- {}", item))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Literal JSON skeleton for the analysis response. Attribute, persona,
    /// pillar and value keys come from the guideline document so the model
    /// scores exactly the dimensions the brand defines.
    fn analysis_output_template(guidelines: &GuidelineDocument) -> String {
        let g = guidelines.guidelines();
        let brand = guidelines.brand_name();

        let voice_name = if g.voice.overall.trim().is_empty() {
            "the brand voice".to_string()
        } else {
            format!("'{}' voice", g.voice.overall.trim())
        };
        let personalities: Vec<String> = [&g.personality.primary.name, &g.personality.secondary.name]
            .iter()
            .filter(|name| !name.trim().is_empty())
            .map(|name| format!("'{}'", name.trim()))
            .collect();
        let personality_clause = if personalities.is_empty() {
            String::new()
        } else {
            format!(
                " and the appropriate balance of {} personalities",
                personalities.join(" and ")
            )
        };

        let persona_names: Vec<&str> = g
            .target_audiences
            .personas
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        let audience_choice = if persona_names.is_empty() {
            "Identify the primary audience this content targets".to_string()
        } else {
            format!(
                "Identify the primary audience this content targets ({})",
                persona_names.join(", ")
            )
        };

        let voice_attributes = keyed_entries(
            g.voice.principles.iter().map(|p| p.name.as_str()),
            "Specific feedback with examples from the content",
        );
        let persona_matches = keyed_entries(
            persona_names.iter().copied(),
            "Evaluation of how the content resonates with this persona, with examples",
        );
        let value_alignment = keyed_entries(
            g.identity.values.iter().map(|v| v.name.as_str()),
            "Evaluation of how well the content reflects this value, with examples",
        );
        let pillars = pillar_entries(g.messaging.pillars.iter().map(|p| p.name.as_str()));

        format!(
            r#"{{
  "voicePersonality": {{
    "analysis": "Overall analysis of voice and tone - be specific about how the content's voice aligns with the {voice_name}{personality_clause}",
    "score": [0-100 as integer],
    "toneBalance": {{
      "supportive": [0-100 as integer representing how supportive the tone is],
      "challenging": [0-100 as integer representing how challenging the tone is]
    }},
    "strengths": ["Specific strength with example from the content", "Another strength with example"],
    "improvements": ["Specific improvement with example from the content", "Another improvement with example"],
    "voiceAttributes": {{
{voice_attributes}
    }}
  }},
  "targetAudience": {{
    "analysis": "Overall analysis of how well the content addresses {brand}'s target audiences",
    "score": [0-100 as integer],
    "primaryAudience": {{
      "type": "{audience_choice}",
      "alignment": [0-100 as integer],
      "feedback": "Explain why you identified this audience and how well the content speaks to them"
    }},
    "audienceInsights": {{
      "strengths": ["Specific strength with example", "Another strength with example"],
      "improvements": ["Specific improvement with example", "Another improvement with example"]
    }},
    "personaMatches": {{
{persona_matches}
    }},
    "icpAnalysis": {{
      "userBuyerScore": [0-100 as integer, 0 = speaks to hands-on users, 100 = speaks to buyers],
      "maturityScore": [0-100 as integer, 0 = graduating from simpler tools, 100 = disenfranchised with complex tools],
      "primaryPersona": "Name of the persona this content fits best"
    }}
  }},
  "messagingValues": {{
    "analysis": "Overall analysis of messaging alignment with {brand}'s key pillars and values",
    "score": [0-100 as integer],
    "keyThemes": {{
      "present": ["Specific theme from guidelines present in content with example", "Another theme with example"],
      "missing": ["Important theme missing from content", "Another missing theme"]
    }},
    "messagingPillars": {{
{pillars}
    }},
    "valueAlignment": {{
{value_alignment}
    }}
  }},
  "overall": {{
    "analysis": "Comprehensive analysis of brand alignment",
    "score": [0-100 as integer],
    "summary": "Executive summary highlighting key findings",
    "strengths": ["Major strength with supporting example", "Another major strength with example"],
    "improvements": ["Critical improvement area with example", "Another improvement area with example"],
    "recommendations": [
      {{
        "priority": "High/Medium/Low",
        "action": "Specific, actionable recommendation",
        "explanation": "Explanation of why this action matters for brand alignment"
      }}
    ]
  }}
}}"#,
            voice_name = voice_name,
            personality_clause = personality_clause,
            voice_attributes = voice_attributes,
            brand = brand,
            audience_choice = audience_choice,
            persona_matches = persona_matches,
            pillars = pillars,
            value_alignment = value_alignment,
        )
    }
}

const RECOMMENDATIONS_OUTPUT_TEMPLATE: &str = r#"[
  {
    "category": "Voice/Tone, Audience Targeting, Messaging, or Platform-Specific",
    "priority": "High/Medium/Low",
    "title": "Clear, specific recommendation title",
    "description": "Detailed explanation of the recommendation and how it improves brand alignment",
    "examples": [
      {
        "original": "Exact text copied from the original content that needs improvement",
        "improved": "Rewritten version that better aligns with brand guidelines",
        "explanation": "How the improved version better aligns with specific brand guideline elements"
      }
    ]
  }
]"#;

fn keyed_entries<'a>(names: impl Iterator<Item = &'a str>, feedback: &str) -> String {
    names
        .filter(|name| !name.trim().is_empty())
        .map(|name| {
            format!(
                "      {}: {{\n        \"score\": [0-100 as integer],\n        \"feedback\": \"{}\"\n      }}",
                json_key(name),
                feedback
            )
        })
        .collect::<Vec<_>>()
        .join(",\n")
}

fn pillar_entries<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names
        .filter(|name| !name.trim().is_empty())
        .map(|name| {
            format!(
                "      {}: {{\n        \"score\": [0-100 as integer],\n        \"feedback\": \"Evaluation of how well the content incorporates this pillar\",\n        \"examples\": [\"Example from content that reflects this pillar\"]\n      }}",
                json_key(name)
            )
        })
        .collect::<Vec<_>>()
        .join(",\n")
}

fn json_key(name: &str) -> String {
    serde_json::Value::String(name.trim().to_string()).to_string()
}
