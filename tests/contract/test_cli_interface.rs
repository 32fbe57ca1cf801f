#[path = "../common/mod.rs"]
mod common;

use brandcheck::cli::{Cli, CliHandler, Command};
use brandcheck::{BrandCheckError, ErrorKind, ProviderId, ProviderRegistry};
use clap::Parser;
use common::{analysis_json, anthropic_reply, fenced, recommendations_json, registry_for, CONTENT};
use mockito::{Matcher, Server};
use std::path::PathBuf;

fn content_file(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("brandcheck-{}-{}.txt", name, std::process::id()));
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_subcommands_parse() {
    let cli = Cli::try_parse_from(["brandcheck", "providers"]).unwrap();
    assert!(matches!(cli.command, Command::Providers));

    let cli = Cli::try_parse_from(["brandcheck", "serve"]).unwrap();
    assert_eq!(cli.app_config().bind.to_string(), "127.0.0.1:3000");

    let cli = Cli::try_parse_from([
        "brandcheck", "--guidelines", "/tmp/brand.json", "analyze", "--platform", "social", "--file", "copy.txt",
    ])
    .unwrap();
    assert_eq!(cli.app_config().guidelines_path, Some(PathBuf::from("/tmp/brand.json")));
    match cli.command {
        Command::Analyze(args) => assert_eq!(args.file, Some(PathBuf::from("copy.txt"))),
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_missing_subcommand_is_an_error() {
    assert!(Cli::try_parse_from(["brandcheck"]).is_err());
}

#[tokio::test]
async fn test_providers_output() {
    let cli = Cli::try_parse_from(["brandcheck", "providers"]).unwrap();
    let registry = registry_for("http://127.0.0.1:9", &["openai"]);

    let output = CliHandler::new(cli)
        .with_registry(registry)
        .execute()
        .await
        .unwrap()
        .unwrap();

    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("anthropic"));
    assert!(lines[0].contains("ANTHROPIC_API_KEY"));
    assert!(lines[1].starts_with("openai"));
    assert!(lines[1].contains("configured"));
    assert!(!lines[1].contains("OPENAI_API_KEY"));
    assert!(lines[2].contains("gemini-2.5-pro"));
}

#[tokio::test]
async fn test_analyze_prints_json_report() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .match_body(Matcher::Regex("PLATFORM/CHANNEL: social".to_string()))
        .with_status(200)
        .with_body(anthropic_reply(&fenced(&analysis_json())))
        .expect(1)
        .create_async()
        .await;

    let path = content_file("analyze", CONTENT);
    let cli = Cli::try_parse_from([
        "brandcheck",
        "analyze",
        "--platform",
        "social",
        "--compact",
        "--file",
        path.to_str().unwrap(),
    ])
    .unwrap();

    let output = CliHandler::new(cli)
        .with_registry(registry_for(&server.url(), &["anthropic"]))
        .execute()
        .await
        .unwrap()
        .unwrap();

    let report: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(report["voicePersonality"]["score"], 58);
    assert!(report.get("contentRecommendations").is_none());
    assert_eq!(output.lines().count(), 1);
    mock.assert_async().await;

    std::fs::remove_file(path).ok();
}

#[tokio::test]
async fn test_analyze_with_recommendations() {
    let mut server = Server::new_async().await;
    let _analysis = server
        .mock("POST", "/v1/messages")
        .match_body(Matcher::Regex("Brand Alignment Analysis".to_string()))
        .with_status(200)
        .with_body(anthropic_reply(&analysis_json().to_string()))
        .expect(1)
        .create_async()
        .await;
    let _recommendations = server
        .mock("POST", "/v1/messages")
        .match_body(Matcher::Regex("Generate Actionable Content Recommendations".to_string()))
        .with_status(200)
        .with_body(anthropic_reply(&recommendations_json().to_string()))
        .expect(1)
        .create_async()
        .await;

    let path = content_file("recommend", CONTENT);
    let cli = Cli::try_parse_from([
        "brandcheck",
        "analyze",
        "-p",
        "social",
        "-r",
        "-f",
        path.to_str().unwrap(),
    ])
    .unwrap();

    let output = CliHandler::new(cli)
        .with_registry(registry_for(&server.url(), &["anthropic"]))
        .execute()
        .await
        .unwrap()
        .unwrap();

    let report: serde_json::Value = serde_json::from_str(&output).unwrap();
    let recommendations = report["contentRecommendations"].as_array().unwrap();
    assert_eq!(recommendations.len(), 2);
    assert_eq!(recommendations[0]["examples"].as_array().unwrap().len(), 1);
    assert_eq!(recommendations[1]["priority"], "Medium");

    std::fs::remove_file(path).ok();
}

#[tokio::test]
async fn test_unconfigured_provider_maps_to_exit_code() {
    let path = content_file("unconfigured", CONTENT);
    let cli = Cli::try_parse_from([
        "brandcheck",
        "analyze",
        "--platform",
        "social",
        "--provider",
        "gemini",
        "--file",
        path.to_str().unwrap(),
    ])
    .unwrap();

    let err = CliHandler::new(cli)
        .with_registry(ProviderRegistry::from_lookup(|_| None).unwrap())
        .execute()
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        BrandCheckError::ProviderNotConfigured { provider: ProviderId::Gemini, .. }
    ));
    assert_eq!(err.kind().exit_code(), 3);

    std::fs::remove_file(path).ok();
}

#[tokio::test]
async fn test_missing_content_file() {
    let cli = Cli::try_parse_from([
        "brandcheck",
        "analyze",
        "--platform",
        "social",
        "--file",
        "/nonexistent/brandcheck/copy.txt",
    ])
    .unwrap();

    let err = CliHandler::new(cli)
        .with_registry(ProviderRegistry::empty())
        .execute()
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Internal);
}
