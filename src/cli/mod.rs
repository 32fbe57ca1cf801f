pub mod args;

pub use args::{AnalyzeArgs, Cli, Command};

use std::io::{self, Read};
use std::path::Path;

use crate::error::BrandCheckError;
use crate::providers::{ProviderRegistry, ProviderStatus};
use crate::server::{self, AppState};

pub struct CliHandler {
    cli: Cli,
    registry: Option<ProviderRegistry>,
}

impl CliHandler {
    pub fn new(cli: Cli) -> Self {
        Self { cli, registry: None }
    }

    /// Uses `registry` instead of reading provider settings from the environment.
    pub fn with_registry(mut self, registry: ProviderRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub async fn run(self) -> Result<i32, BrandCheckError> {
        if let Some(output) = self.execute().await? {
            println!("{}", output);
        }
        Ok(0)
    }

    /// Runs the subcommand and returns what it would print, if anything.
    pub async fn execute(self) -> Result<Option<String>, BrandCheckError> {
        let config = self.cli.app_config();
        let registry = match self.registry {
            Some(registry) => registry,
            None => ProviderRegistry::from_env()?,
        };

        match self.cli.command {
            Command::Providers => Ok(Some(render_providers(&registry.statuses()))),
            Command::Serve { .. } => {
                let orchestrator = config.build_orchestrator(registry)?;
                server::serve(AppState::new(orchestrator), config.bind).await?;
                Ok(None)
            }
            Command::Analyze(args) => {
                let content = read_content(args.file.as_deref())?;
                tracing::debug!(bytes = content.len(), "Read content");

                let orchestrator = config.build_orchestrator(registry)?;
                let result = if args.recommend {
                    orchestrator
                        .run_full(&content, &args.platform, args.provider)
                        .await?
                } else {
                    orchestrator
                        .run_analysis(&content, &args.platform, args.provider)
                        .await?
                };

                let rendered = if args.compact {
                    serde_json::to_string(&result)?
                } else {
                    serde_json::to_string_pretty(&result)?
                };
                Ok(Some(rendered))
            }
        }
    }
}

fn read_content(file: Option<&Path>) -> Result<String, BrandCheckError> {
    match file {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn render_providers(statuses: &[ProviderStatus]) -> String {
    statuses
        .iter()
        .map(|status| {
            let state = if status.configured {
                "✅ configured".to_string()
            } else {
                format!("❌ not configured (set {})", status.id.credential_env())
            };
            format!("{:<10} {:<26} {}", status.id.as_str(), status.model, state)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
