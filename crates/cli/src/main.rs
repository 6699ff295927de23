use anyhow::{bail, Result};
use clap::Parser;
use cli::{logging, report};
use organizer_core::config::{self, AppConfig, TargetFolderSet};
use organizer_core::pipeline::{self, Organizer, PipelineMode};
use providers::credentials::validate_api_key;
use providers::openai::{OpenAiConfig, OpenAiProvider};
use std::io::{self, BufRead, Write};
use tracing::info;

#[derive(Parser)]
#[command(name = "file-organizer")]
#[command(about = "Sorts loose files into Organized_<Category> folders with descriptive names", long_about = None)]
struct Cli {
    /// Path to config TOML
    #[arg(short, long)]
    config: Option<String>,

    /// Re-check files already inside Organized_* folders
    #[arg(long)]
    reanalyze: bool,

    /// Show what would happen without touching any file
    #[arg(long)]
    dry_run: bool,

    /// Only process these configured folders (e.g. Desktop Downloads)
    #[arg(long, num_args = 1..)]
    folders: Vec<String>,

    /// OpenAI API key (overrides config and OPENAI_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Name files from metadata only
    #[arg(long)]
    no_ai: bool,

    /// Validate the API key with a minimal request and exit
    #[arg(long)]
    test_api_key: bool,

    /// Skip the confirmation prompt before a live run
    #[arg(short, long)]
    yes: bool,

    /// Output JSON summary
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut cfg = config::load(cli.config.as_deref())?;
    if cli.no_ai {
        cfg.ai.enabled = false;
    }

    let log_dir = cfg.log_dir()?;
    let run_log = logging::init_logging(&log_dir)?;
    info!("Run log: {}", run_log.display());

    let api_key = pipeline::resolve_api_key(cli.api_key.as_deref(), &cfg.ai);
    if cli.test_api_key {
        return test_api_key(&cfg, api_key.as_deref()).await;
    }

    let targets = cfg.target_folders()?.select(&cli.folders)?.existing()?;
    let mode = if cli.reanalyze {
        PipelineMode::Reanalyze
    } else {
        PipelineMode::Organize
    };

    if !cli.dry_run && !cli.yes && !confirm(mode, &targets)? {
        println!("Operation cancelled.");
        return Ok(());
    }

    let provider = pipeline::build_provider(&cfg.ai, api_key.as_deref());
    let mut organizer = Organizer::new(&cfg, provider, cli.dry_run)?;
    let run = organizer.run(&targets, mode).await;

    if cli.json {
        let value = report::to_json(mode, cli.dry_run, &run);
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print!("{}", report::render_text(mode, cli.dry_run, &run));
        println!("Logs saved to: {}", log_dir.display());
    }
    Ok(())
}

async fn test_api_key(cfg: &AppConfig, raw: Option<&str>) -> Result<()> {
    let raw = match raw {
        Some(k) => k,
        None => bail!("no API key given; use --api-key, ai.api_key or OPENAI_API_KEY"),
    };
    let (key, kind) = validate_api_key(raw)?;
    println!("Key format looks valid ({} key, {} chars)", kind.label(), key.len());

    let provider = OpenAiProvider::new(OpenAiConfig {
        api_key: key,
        base_url: cfg.ai.base_url.clone(),
        chat_model: cfg.ai.model.clone(),
        timeout: cfg.ai.timeout(),
    })?;
    provider.ping().await?;
    println!("API key is valid and working");
    Ok(())
}

fn confirm(mode: PipelineMode, targets: &TargetFolderSet) -> Result<bool> {
    println!("This will {} files in:", report::mode_label(mode));
    for folder in targets.iter() {
        println!("  {} ({})", folder.name, folder.path.display());
    }
    print!("Proceed? [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
