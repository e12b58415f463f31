use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use log::error;

use recipebox::config::AppConfig;
use recipebox::{render, MemoryStore, RecipeBox, RecipeScraper, ScrapeStatus, ViewState};

/// Scrape a recipe from a web page and print it, optionally scaled
#[derive(Debug, Parser)]
#[command(name = "recipebox", version, about)]
struct Cli {
    /// Page to scrape
    url: String,

    /// Scale ingredient quantities and servings (clamped to 0.1-10)
    #[arg(short, long, default_value_t = 1.0)]
    scale: f64,

    /// Print the stored record as JSON instead of the recipe card
    #[arg(long)]
    json: bool,

    /// Request timeout in seconds (overrides configuration)
    #[arg(long, env = "RECIPEBOX_TIMEOUT")]
    timeout: Option<u64>,
}

async fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    let mut builder = RecipeScraper::builder().config(config.fetch);
    if let Some(secs) = cli.timeout {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    let recipes = RecipeBox::new(Arc::new(MemoryStore::new()), builder.build()?);

    let (_, task) = recipes.submit(0, &cli.url).await?;
    let recipe = task.wait().await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&recipe)?);
    } else {
        let state = ViewState::with_multiplier(cli.scale);
        print!("{}", render(&recipe, &state));
    }

    Ok(match recipe.scrape_status {
        ScrapeStatus::Error => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
