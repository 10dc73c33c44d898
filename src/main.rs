use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use moodcard::config::Config;
use moodcard::nitter::client::{normalize_handle, NitterClient, DEFAULT_POST_COUNT};
use moodcard::output::{html, terminal};
use moodcard::sentiment::analyzer::{Analyzer, Prediction};

/// moodcard: sentiment cards for typed text and Nitter posts.
///
/// Runs a pre-trained sentiment classifier over text you type or over a
/// handle's recent posts scraped from a Nitter mirror, and shows one
/// colored card per text.
#[derive(Parser)]
#[command(name = "moodcard", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a piece of text (reads stdin when TEXT is omitted)
    Analyze {
        /// The text to analyze
        text: Option<String>,

        /// Also write the card to an HTML file
        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// Fetch a handle's recent posts from the mirror and analyze each one
    Fetch {
        /// The handle to look up (e.g. jack or @jack)
        handle: String,

        /// Number of posts to fetch (default: 5)
        #[arg(long, default_value_t = DEFAULT_POST_COUNT)]
        count: usize,

        /// Also write the cards to an HTML file
        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// Analyze lines from stdin until EOF; `@handle` lines fetch posts
    Interactive {
        /// Number of posts to fetch per handle (default: 5)
        #[arg(long, default_value_t = DEFAULT_POST_COUNT)]
        count: usize,
    },

    /// Download the sentiment model and tokenizer from MOODCARD_MODEL_URL
    DownloadModel,

    /// Show model, vocabulary and mirror configuration
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("moodcard=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze { text, html } => {
            let config = Config::load()?;
            let analyzer = load_analyzer(&config)?;

            let text = match text {
                Some(text) => text,
                None => std::io::read_to_string(std::io::stdin())
                    .context("Failed to read text from stdin")?,
            };

            let prediction = analyzer.predict(&text).await?;
            terminal::display_card(&prediction);

            if let Some(path) = html {
                export_html(&path, "Sentiment Analysis", std::slice::from_ref(&prediction))?;
            }
        }

        Commands::Fetch {
            handle,
            count,
            html,
        } => {
            let config = Config::load()?;
            let analyzer = load_analyzer(&config)?;
            let client = NitterClient::new(&config.mirror_url, config.fetch_timeout)?;

            let handle = normalize_handle(&handle).to_string();
            let predictions = fetch_and_analyze(&client, &analyzer, &handle, count).await;

            if let Some(path) = html {
                export_html(&path, &format!("Sentiment for @{handle}"), &predictions)?;
            }
        }

        Commands::Interactive { count } => {
            let config = Config::load()?;
            let analyzer = load_analyzer(&config)?;
            let client = NitterClient::new(&config.mirror_url, config.fetch_timeout)?;

            run_interactive(&client, &analyzer, count).await?;
        }

        Commands::DownloadModel => {
            let config = Config::load()?;
            let base_url = config.require_model_url()?;
            let model_dir = &config.model_dir;

            println!("Downloading sentiment model...");
            println!("  Source: {base_url}");
            println!("  Destination: {}", model_dir.display());

            moodcard::model::download::download_model(model_dir, base_url).await?;

            println!("\n{}", "Model downloaded successfully.".bold());
            println!("You can now run `moodcard analyze \"some text\"` or `moodcard fetch <handle>`.");
        }

        Commands::Status => {
            let config = Config::load()?;
            moodcard::status::show(&config)?;
        }
    }

    Ok(())
}

/// Build the analyzer, failing early with a pointer to `download-model`.
fn load_analyzer(config: &Config) -> Result<Analyzer> {
    config.require_model()?;
    Analyzer::load(config)
}

/// Fetch posts for one handle and render a card for each, in mirror order.
/// Returns the predictions that succeeded.
async fn fetch_and_analyze(
    client: &NitterClient,
    analyzer: &Analyzer,
    handle: &str,
    count: usize,
) -> Vec<Prediction> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .expect("valid template"),
    );
    spinner.set_message(format!("Fetching posts for @{handle}..."));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let posts = client.fetch_posts(handle, count).await;
    spinner.finish_and_clear();

    if posts.is_empty() {
        terminal::display_no_posts_warning();
        return Vec::new();
    }

    info!(handle = handle, posts = posts.len(), "Analyzing fetched posts");

    let mut predictions = Vec::with_capacity(posts.len());
    for (post, result) in posts.iter().zip(analyzer.predict_all(&posts).await) {
        match result {
            Ok(prediction) => {
                terminal::display_card(&prediction);
                predictions.push(prediction);
            }
            Err(e) => {
                warn!(error = %format!("{e:#}"), "Prediction failed for post");
                terminal::display_failed_card(post, &e);
            }
        }
    }

    terminal::display_tally(&predictions);

    predictions
}

/// Line-oriented session: every line is its own request, so a failure is
/// reported and the loop moves on.
async fn run_interactive(client: &NitterClient, analyzer: &Analyzer, count: usize) -> Result<()> {
    println!(
        "{}",
        "Type text to analyze, @handle to fetch posts, or `quit` to exit.".dimmed()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("Failed to read stdin")? else {
            println!();
            break;
        };

        let line = line.trim();
        match line {
            "" => continue,
            "quit" | "exit" => break,
            _ if line.starts_with('@') => {
                let handle = normalize_handle(line);
                fetch_and_analyze(client, analyzer, handle, count).await;
            }
            _ => match analyzer.predict(line).await {
                Ok(prediction) => terminal::display_card(&prediction),
                Err(e) => {
                    warn!(error = %format!("{e:#}"), "Prediction failed");
                    terminal::display_failed_card(line, &e);
                }
            },
        }
    }

    Ok(())
}

fn export_html(path: &Path, title: &str, predictions: &[Prediction]) -> Result<()> {
    let written = html::write_report(path, title, predictions)?;
    println!("\n{}", format!("HTML cards saved to: {written}").bold());
    Ok(())
}
