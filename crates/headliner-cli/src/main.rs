use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use headliner_core::{
    config::API_KEY_ENV, normalize_query, Article, Config, NewsApiProvider, NewsSource,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "headliner")]
#[command(version, about = "Top headlines and news search in your terminal", long_about = None)]
struct Cli {
    /// newsapi.org key (overrides NEWSAPI_KEY and the config file)
    #[arg(long, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Print current top headlines
    Top,
    /// Search all articles, most popular first
    Search {
        /// Search query
        query: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.command.is_none())?;

    let config = Config::load()?.with_overrides(std::env::var(API_KEY_ENV).ok(), cli.api_key);
    let provider = Arc::new(NewsApiProvider::from_config(&config.api)?);

    match cli.command {
        Some(Commands::Top) => {
            tracing::info!("Fetching top headlines for {}", config.api.country);
            print_articles(&provider.top_stories().await?);
        }
        Some(Commands::Search { query }) => match normalize_query(&query) {
            Some(query) => {
                tracing::info!("Searching for: {}", query);
                print_articles(&provider.search_articles(query).await?);
            }
            None => println!("Nothing to search for."),
        },
        None => {
            let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
            let app = headliner_tui::App::new(provider.clone(), provider, tx);
            let refresh = Duration::from_secs(config.ui.refresh_interval_secs.max(1));
            headliner_tui::run_tui(app, rx, refresh).await?;
        }
    }

    Ok(())
}

/// The TUI owns the terminal, so in that mode logs go to a file instead
fn init_logging(to_file: bool) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "headliner=info,headliner_core=info,headliner_api=info".into());

    if to_file {
        let log_dir = dirs::data_local_dir()
            .context("Could not find a data directory for logs")?
            .join("headliner");
        std::fs::create_dir_all(&log_dir)?;
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_dir.join("headliner.log"))?;

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

fn print_articles(articles: &[Article]) {
    if articles.is_empty() {
        println!("No articles found.");
        return;
    }

    for (i, article) in articles.iter().enumerate() {
        println!("{:>3}. {}", i + 1, article.title);
        println!("     {} | {}", article.source_name, article.published_display());
        if let Some(url) = &article.url {
            println!("     {}", url);
        }
    }
}
