mod config;
mod error;
mod github;
mod journey;
mod pipeline;
mod render;
mod server;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::{error, info};

use crate::config::{Config, Settings};
use crate::error::Result;
use crate::journey::filter::TagFilter;
use crate::pipeline::fetch::MapContext;

#[derive(Parser)]
#[command(
  name = "journey-map",
  about = "Developer experience map built from a GitHub Project"
)]
struct Cli {
  #[command(subcommand)]
  command: Commands,

  /// Path to settings file (defaults to ./journey-map.yaml when present)
  #[arg(short, long)]
  config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
  /// Run the GitHub proxy server
  Serve {
    /// Port to listen on (overrides settings and PORT)
    #[arg(long)]
    port: Option<u16>,
  },
  /// Fetch the project and print the experience map
  Show {
    /// Only show pain points carrying one of these labels (comma-separated)
    #[arg(long, value_delimiter = ',')]
    tags: Vec<String>,
    /// Print stages as JSON instead of text
    #[arg(long)]
    json: bool,
  },
  /// List the stage metadata table
  Stages,
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    )
    .with_writer(std::io::stderr)
    .init();

  let Cli { command, config } = Cli::parse();

  if let Err(e) = run(command, config.as_deref()).await {
    error!("{e}");
    std::process::exit(1);
  }
}

async fn run(command: Commands, config_path: Option<&Path>) -> Result<()> {
  match command {
    Commands::Serve { port } => cmd_serve(config_path, port).await,
    Commands::Show { tags, json } => cmd_show(config_path, &tags, json).await,
    Commands::Stages => cmd_stages(config_path),
  }
}

async fn cmd_serve(config_path: Option<&Path>, port: Option<u16>) -> Result<()> {
  let config = Config::load(config_path)?;
  let port = port.unwrap_or(config.settings.port);
  let ctx = MapContext::from_config(&config)?;

  info!(
    "serving project {} of {} ({})",
    config.github.project_number, config.github.owner, config.github.repo
  );
  server::serve(ctx, port, config.settings.allowed_origins.clone()).await
}

async fn cmd_show(config_path: Option<&Path>, tags: &[String], json: bool) -> Result<()> {
  let config = Config::load(config_path)?;
  let ctx = MapContext::from_config(&config)?;
  let grouping = ctx.fetch_stages().await?;
  let filter = TagFilter::new(tags);

  if json {
    let stages = filter.apply(&grouping.stages);
    println!("{}", serde_json::to_string_pretty(&stages)?);
  } else {
    print!("{}", render::render_stages(&grouping.stages, &filter));
  }

  for (number, reason) in grouping.skipped() {
    info!("not shown: #{number} ({reason})");
  }

  Ok(())
}

fn cmd_stages(config_path: Option<&Path>) -> Result<()> {
  let settings = Settings::load(config_path)?;
  let table = pipeline::fetch::load_metadata(&settings)?;

  println!("journey-map stages");
  println!("==================");
  for (name, meta) in table.entries() {
    println!(
      "  {name}: {} ({} action(s), {} touchpoint(s))",
      meta.color,
      meta.actions.len(),
      meta.touchpoints.len()
    );
  }

  Ok(())
}
