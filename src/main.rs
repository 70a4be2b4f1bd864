//! clientforge CLI entrypoint
//! Parses command-line arguments and dispatches to the application use cases.
#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

use clientforge::application::{
    GenerateClientRequest, GenerateClientUseCase, InspectRequest, InspectUseCase,
};
use clientforge::core::contract::AuthSettings;
use clientforge::infrastructure::generation::default_orchestrator;
use clientforge::infrastructure::{
    CompositeSourceLoader, FileSystemOutputService, HttpSourceLoader,
};
use clientforge::{InputFormat, Target};

#[derive(Parser)]
#[command(name = "clientforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Generate a client library project from API documentation
    Generate {
        /// Path or http(s) URL of the documentation
        #[arg(long)]
        input: String,
        /// Documentation dialect: openapi, postman or html
        #[arg(long)]
        format: InputFormat,
        /// Target language: python, typescript, go or rust
        #[arg(long)]
        target: Target,
        /// Project name (derived from the API title when omitted)
        #[arg(long)]
        project_name: Option<String>,
        /// Output directory for generated code
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Base URL baked into the generated client, replacing the documented one
        #[arg(long)]
        base_url: Option<String>,
        /// Bearer token sent when fetching a remote source
        #[arg(long)]
        source_token: Option<String>,
    },
    /// Print the canonical model of a document as JSON
    Inspect {
        /// Path or http(s) URL of the documentation
        #[arg(long)]
        input: String,
        /// Documentation dialect: openapi, postman or html
        #[arg(long)]
        format: InputFormat,
        /// Bearer token sent when fetching a remote source
        #[arg(long)]
        source_token: Option<String>,
    },
    /// List supported target languages
    Targets,
}

fn source_loader(token: Option<String>) -> Arc<CompositeSourceLoader> {
    let mut http = HttpSourceLoader::new();
    if let Some(token) = token.map(Zeroizing::new) {
        http = http.with_auth(AuthSettings::bearer(token.as_str()));
    }
    Arc::new(CompositeSourceLoader::with_http(http))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries command output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate {
            input,
            format,
            target,
            project_name,
            output_dir,
            base_url,
            source_token,
        } => {
            let output_dir = match output_dir {
                Some(dir) => dir,
                None => std::env::current_dir()
                    .context("Failed to resolve output directory")?
                    .join(
                        project_name
                            .clone()
                            .unwrap_or_else(|| format!("{target}-client")),
                    ),
            };

            let use_case = GenerateClientUseCase::new(
                source_loader(source_token),
                Arc::new(default_orchestrator()),
                Arc::new(FileSystemOutputService::new()),
            );
            let response = use_case
                .execute(GenerateClientRequest {
                    input,
                    format,
                    target,
                    project_name,
                    output_dir,
                    base_url,
                })
                .await
                .context("Failed to generate client")?;

            info!(
                target = %response.target,
                project = %response.metadata.project_name,
                endpoints = response.endpoint_count,
                files = response.artifacts_count,
                path = %response.output_path.display(),
                "Client generated"
            );
        }
        Commands::Inspect {
            input,
            format,
            source_token,
        } => {
            let api = InspectUseCase::new(source_loader(source_token))
                .execute(InspectRequest { input, format })
                .await
                .context("Failed to inspect documentation")?;
            println!(
                "{}",
                serde_json::to_string_pretty(&api).context("Failed to serialize model")?
            );
        }
        Commands::Targets => {
            for target in Target::all() {
                println!("{target}\t{}", target.display_name());
            }
        }
    }
    Ok(())
}
