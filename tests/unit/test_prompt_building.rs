use brandcheck::analyzer::prompts::IMPROVEMENT_THRESHOLD;
use brandcheck::{AnalysisResult, GuidelineDocument, PromptTemplate, ToneBalance};
use serde_json::json;

fn custom_guidelines() -> GuidelineDocument {
    GuidelineDocument::from_json(
        &json!({
            "brand": "Acme Rockets",
            "identity": { "values": [{ "name": "Safety Always", "description": "" }] },
            "voice": {
                "overall": "Calmly Bold",
                "principles": [{ "name": "Plainspoken", "description": "" }],
                "toneSpectrum": [
                    { "balance": { "supportive": 80, "challenging": 20 }, "channels": ["Newsletter"] }
                ]
            },
            "messaging": { "pillars": [{ "name": "Reach Orbit", "points": [] }] },
            "targetAudiences": { "personas": [{ "name": "The Hobbyist", "description": "" }] }
        })
        .to_string(),
    )
    .unwrap()
}

fn analysis_with_scores(voice: u8, audience: u8, messaging: u8) -> AnalysisResult {
    serde_json::from_value(json!({
        "voicePersonality": { "score": voice },
        "targetAudience": {
            "score": audience,
            "primaryAudience": { "type": "The Hobbyist", "alignment": 60 }
        },
        "messagingValues": { "score": messaging },
        "overall": { "score": 65, "improvements": ["Tighten the headline"] }
    }))
    .unwrap()
}

#[test]
fn test_analysis_prompt_contains_content_and_platform_verbatim() {
    let doc = GuidelineDocument::builtin().unwrap();
    let content = "Line one.\n  Indented \"quoted\" line with ümlauts.";

    let prompt = PromptTemplate::build_analysis_prompt(content, "Webinar", &doc);

    assert!(prompt.contains(content));
    assert!(prompt.contains("PLATFORM/CHANNEL: Webinar"));
    assert!(prompt.contains("EXPECTED TONE BALANCE: 50% challenging, 50% supportive"));
    assert!(prompt.contains("NO additional text"));
}

#[test]
fn test_unknown_platform_uses_even_balance() {
    let doc = GuidelineDocument::builtin().unwrap();
    assert_eq!(doc.expected_tone_balance("billboard"), ToneBalance::default());

    let prompt = PromptTemplate::build_analysis_prompt("copy", "billboard", &doc);
    assert!(prompt.contains("EXPECTED TONE BALANCE: 50% challenging, 50% supportive"));
}

#[test]
fn test_template_follows_custom_guidelines() {
    let doc = custom_guidelines();
    let prompt = PromptTemplate::build_analysis_prompt("Launch day!", "newsletter", &doc);

    assert!(prompt.contains("content for Acme Rockets"));
    assert!(prompt.contains("EXPECTED TONE BALANCE: 20% challenging, 80% supportive"));
    assert!(prompt.contains("\"Plainspoken\": {"));
    assert!(prompt.contains("\"The Hobbyist\": {"));
    assert!(prompt.contains("\"Reach Orbit\": {"));
    assert!(prompt.contains("\"Safety Always\": {"));
    assert!(prompt.contains("'Calmly Bold' voice"));
    assert!(!prompt.contains("Act-On"));
}

#[test]
fn test_recommendations_prompt_with_no_weak_dimensions() {
    let doc = custom_guidelines();
    let analysis = analysis_with_scores(90, 85, 88);

    let prompt = PromptTemplate::build_recommendations_prompt("Launch day!", "newsletter", &analysis, &doc);

    assert!(prompt.contains(&format!("No dimension scored below {}", IMPROVEMENT_THRESHOLD)));
    assert!(prompt.contains("- Missing themes: none identified"));
    assert!(prompt.contains("- Tighten the headline"));
    assert!(prompt.contains("```\nLaunch day!\n```"));
}

#[test]
fn test_recommendations_prompt_threshold_is_exclusive() {
    let doc = custom_guidelines();
    let analysis = analysis_with_scores(69, 70, 71);

    let prompt = PromptTemplate::build_recommendations_prompt("Launch day!", "newsletter", &analysis, &doc);

    assert!(prompt.contains("Section: Voice & Personality (69/100)"));
    assert!(!prompt.contains("Section: Target Audience"));
    assert!(!prompt.contains("Section: Messaging & Values"));
    assert!(prompt.contains("copied verbatim"));
}
