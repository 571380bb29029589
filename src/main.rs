use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};
use travel_api_explorer::{
    AppConfig, Credentials, ExecuteOutcome, InvocationRequest, ParamValue, Params, build_pipeline, logging, web,
};

#[derive(Parser)]
#[command(name = "travel-api-explorer")]
#[command(about = "Explore travel-data APIs with mocked or live calls and LLM-mapped results")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every API in the catalog
    List,
    /// Show one API definition
    Describe { api_id: String },
    /// Call an API and print the outcome as JSON
    Execute {
        api_id: String,
        /// Parameter as name=value; repeatable
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
        /// Call the live provider instead of returning mock data
        #[arg(long)]
        live: bool,
        #[arg(long, requires = "secret")]
        key: Option<String>,
        #[arg(long, requires = "key")]
        secret: Option<String>,
    },
    /// Start the web interface
    Serve {
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
    /// Write the active catalog to a JSON file
    ExportCatalog {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim().to_string(), value.to_string())),
        _ => Err(format!("expected name=value, got `{}`", raw)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();
    logging::init();
    if let Err(e) = dotenv {
        debug!("no .env file loaded: {}", e);
    }

    let cli = Cli::parse();
    let config = AppConfig::from_env().context("invalid configuration")?;
    let pipeline = build_pipeline(&config)?;

    match cli.command {
        Commands::List => {
            for api in pipeline.catalog().iter() {
                let mode = if pipeline.routes().has_live_route(&api.id) { "live" } else { "mock" };
                println!("{:<36} {:<5} {}", api.id, mode, api.description);
            }
        }
        Commands::Describe { api_id } => {
            let api = pipeline
                .catalog()
                .lookup(&api_id)
                .with_context(|| format!("API not found: {}", api_id))?;
            println!("{}", serde_json::to_string_pretty(api)?);
        }
        Commands::Execute {
            api_id,
            params,
            live,
            key,
            secret,
        } => {
            let mut params: Params = params
                .into_iter()
                .map(|(name, value)| (name, ParamValue::Text(value)))
                .collect();

            if let Some(api) = pipeline.catalog().lookup(&api_id) {
                params = api.with_defaults(&params, chrono::Local::now().date_naive());
                api.validate(&params)?;
            }

            let credentials = key.zip(secret).map(|(key, secret)| Credentials::new(key, secret));
            let request = if live {
                InvocationRequest::live(api_id, params, credentials)
            } else {
                InvocationRequest::mock(api_id, params)
            };

            let outcome = pipeline.execute(&request).await;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            if let ExecuteOutcome::Failure { error } = outcome {
                bail!(error);
            }
        }
        Commands::Serve { port } => {
            if config.llm.api_key.is_none() {
                warn!("LLM_API_KEY not set; every mapping request will fail");
            }
            web::run_server(Arc::new(pipeline), port).await?;
        }
        Commands::ExportCatalog { output } => {
            let output_path = output.unwrap_or_else(|| PathBuf::from("data/exported/catalog.json"));
            if let Some(parent) = output_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&output_path, pipeline.catalog().to_json_pretty()?)?;
            info!("catalog saved to {}", output_path.display());
        }
    }

    Ok(())
}
