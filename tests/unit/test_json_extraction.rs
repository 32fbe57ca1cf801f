use brandcheck::analyzer::extractor::{BalancedSpan, DirectParse, ExtractionStrategy};
use brandcheck::{BrandCheckError, ErrorKind, JsonExtractor};
use brandcheck::analyzer::extract_json;
use serde::Deserialize;
use serde_json::{json, Value};

#[test]
fn test_plain_json_round_trips() {
    let values = [
        json!({ "score": 82, "nested": { "list": [1, 2, 3] } }),
        json!([{ "title": "a" }, { "title": "b" }]),
        json!("just a string"),
        json!(42),
    ];

    for value in values {
        assert_eq!(extract_json(&value.to_string()).unwrap(), value);
        assert_eq!(extract_json(&serde_json::to_string_pretty(&value).unwrap()).unwrap(), value);
    }
}

#[test]
fn test_fenced_json() {
    let value = json!({ "overall": { "score": 70 } });
    let raw = format!("```json\n{}\n```", value);
    assert_eq!(extract_json(&raw).unwrap(), value);

    let raw = format!("Here you go:\n```\n{}\n```\nAnything else?", value);
    assert_eq!(extract_json(&raw).unwrap(), value);
}

#[test]
fn test_later_fence_is_tried_when_first_is_not_json() {
    let raw = "First the prompt I used:\n```text\nanalyze this\n```\nResult:\n```json\n{\"ok\": true}\n```";
    assert_eq!(extract_json(raw).unwrap(), json!({ "ok": true }));
}

#[test]
fn test_prose_wrapped_object_and_array() {
    let object = json!({ "voice": { "score": 55, "notes": "uses {braces} in text" } });
    let raw = format!("My assessment follows. {} Hope that helps!", object);
    assert_eq!(extract_json(&raw).unwrap(), object);

    let array = json!([{ "priority": "High" }, { "priority": "Low" }]);
    let raw = format!("Recommendations:\n{}\n-- end", array);
    assert_eq!(extract_json(&raw).unwrap(), array);
}

#[test]
fn test_no_json_is_unparsable_with_raw_text() {
    let err = extract_json("I cannot analyze this").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnparsableResponse);
    assert_eq!(err.raw_response(), Some("I cannot analyze this"));

    match err {
        BrandCheckError::UnparsableResponse { reason, .. } => {
            assert!(reason.contains("direct"));
            assert!(reason.contains("balanced_span"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_truncated_json_is_unparsable() {
    let err = extract_json("```json\n{\"voicePersonality\": {\"score\": 80,").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnparsableResponse);
}

#[test]
fn test_truncated_fenced_object_is_unparsable() {
    let raw = "```json\n{\"voicePersonality\": {\"score\": 80, \"toneBalance\": {\"supportive\": 15, \"challenging\": 85}, \"strengths\": [";
    let err = extract_json(raw).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnparsableResponse);
    assert_eq!(err.raw_response(), Some(raw));
}

#[test]
fn test_extract_as_skips_values_of_the_wrong_shape() {
    #[derive(Debug, Deserialize)]
    struct Scored {
        score: u8,
    }

    let raw = "Scores are on the [0, 100] scale.\n{\"score\": 42}";
    let extractor = JsonExtractor::new();

    // untyped extraction still returns the first value found
    assert_eq!(extractor.extract(raw).unwrap(), json!([0, 100]));
    assert_eq!(extractor.extract_as::<Scored>(raw).unwrap().score, 42);

    let raw = "```json\n[1, 2]\n```\n```json\n{\"score\": 7}\n```";
    assert_eq!(extractor.extract_as::<Scored>(raw).unwrap().score, 7);
}

#[test]
fn test_extract_as_reports_shape_mismatch() {
    #[derive(Debug, Deserialize)]
    struct Scored {
        score: u8,
    }

    let extractor = JsonExtractor::new();
    let scored: Scored = extractor.extract_as("{\"score\": 12}").unwrap();
    assert_eq!(scored.score, 12);

    let err = extractor.extract_as::<Scored>("{\"rating\": 12}").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnparsableResponse);
    assert_eq!(err.raw_response(), Some("{\"rating\": 12}"));
}

struct SingleQuoteRepair;

impl ExtractionStrategy for SingleQuoteRepair {
    fn name(&self) -> &'static str {
        "single_quote_repair"
    }

    fn extract(&self, raw: &str) -> Result<Value, String> {
        serde_json::from_str(&raw.trim().replace('\'', "\"")).map_err(|e| e.to_string())
    }
}

#[test]
fn test_custom_strategy_can_be_appended() {
    let raw = "{'score': 64}";
    assert!(JsonExtractor::new().extract(raw).is_err());

    let extractor = JsonExtractor::new().push_strategy(Box::new(SingleQuoteRepair));
    assert_eq!(extractor.strategy_names().last(), Some(&"single_quote_repair"));
    assert_eq!(extractor.extract(raw).unwrap(), json!({ "score": 64 }));
}

#[test]
fn test_strategy_list_can_be_narrowed() {
    let extractor = JsonExtractor::with_strategies(vec![Box::new(DirectParse)]);
    assert!(extractor.extract("text {\"a\": 1}").is_err());

    let extractor = JsonExtractor::with_strategies(vec![Box::new(BalancedSpan)]);
    assert_eq!(extractor.extract("text {\"a\": 1}").unwrap(), json!({ "a": 1 }));
}
