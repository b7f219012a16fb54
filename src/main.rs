// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use colored::*;
use rag_foundations::server::models::EmbedRequest;
use rag_foundations::{ChunkMetadata, Config, RagClient, Validator};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "rag-foundations")]
#[command(version = "0.1.0")]
#[command(about = "Minimal RAG service and query client", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service (embed, search, answer)
    Serve,

    /// Embed texts or files into the vector store via the service
    Embed {
        /// Files whose contents become one chunk each
        files: Vec<PathBuf>,

        /// Inline texts to embed
        #[arg(long, value_name = "TEXT")]
        text: Vec<String>,

        /// Source label recorded for inline texts
        #[arg(long)]
        source: Option<String>,
    },

    /// Search for chunks by semantic similarity
    Search {
        /// Search query text
        query: String,

        #[arg(short, long)]
        top_k: Option<usize>,
    },

    /// Run the full query cycle: search, then answer with retrieved context
    Ask {
        /// Question to answer
        question: String,

        #[arg(short, long)]
        top_k: Option<usize>,
    },

    /// Check service health
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    rag_foundations::utils::logging::init_logger(cli.color, cli.verbose);

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };

    match cli.command {
        Commands::Serve => {
            info!("Starting RAG service");
            rag_foundations::server::run(&config)
                .await
                .context("Service failed")?;
        }
        Commands::Embed {
            files,
            text,
            source,
        } => {
            cmd_embed(&config, files, text, source).await?;
        }
        Commands::Search { query, top_k } => {
            cmd_search(&config, &query, top_k).await?;
        }
        Commands::Ask { question, top_k } => {
            cmd_ask(&config, &question, top_k).await?;
        }
        Commands::Health => {
            cmd_health(&config).await?;
        }
    }

    Ok(())
}

fn client_for(config: &Config, top_k: Option<usize>) -> RagClient {
    RagClient::new(
        config.client.api_url.clone(),
        top_k.unwrap_or(config.client.top_k),
    )
}

async fn cmd_embed(
    config: &Config,
    files: Vec<PathBuf>,
    inline_texts: Vec<String>,
    source: Option<String>,
) -> Result<()> {
    let mut texts = Vec::new();
    let mut metadata = Vec::new();

    for text in inline_texts {
        Validator::validate_content_not_empty(&text)
            .context("Inline text must not be empty")?;
        let label = source.clone().unwrap_or_else(|| "inline".to_string());
        texts.push(text);
        metadata.push(ChunkMetadata::with_source(label));
    }

    for file in files {
        let content = std::fs::read_to_string(&file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        Validator::validate_content_not_empty(&content)
            .with_context(|| format!("{} is empty", file.display()))?;
        texts.push(content);
        metadata.push(ChunkMetadata::with_source(file.display().to_string()));
    }

    if texts.is_empty() {
        anyhow::bail!("Nothing to embed: pass files or --text");
    }

    let client = client_for(config, None);
    let request = EmbedRequest {
        texts,
        metadata: Some(metadata),
    };

    let response = client
        .embed(&request)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    println!("{}", response.message.green());
    Ok(())
}

async fn cmd_search(config: &Config, query: &str, top_k: Option<usize>) -> Result<()> {
    let client = client_for(config, top_k);

    let results = client
        .search(query)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    if results.is_empty() {
        println!("\nNo results found for query: \"{}\"\n", query);
        println!("Try:");
        println!("  - Using different search terms");
        println!("  - Checking that documents have been embedded");
        return Ok(());
    }

    println!("\nSearch Results for: \"{}\"\n", query);
    println!("Found {} result(s)\n", results.len());
    println!("{}", "=".repeat(80));

    for (rank, result) in results.iter().enumerate() {
        println!("\n{}. {}", rank + 1, result.format_summary(300));
    }

    println!("\n{}", "=".repeat(80));
    Ok(())
}

async fn cmd_ask(config: &Config, question: &str, top_k: Option<usize>) -> Result<()> {
    let client = client_for(config, top_k);

    match client.ask(question).await {
        Ok(response) => {
            println!(
                "\n{}",
                rag_foundations::utils::logging::format_answer_header(&response.question)
            );
            println!("\n{}\n", response.answer);

            if !response.sources.is_empty() {
                println!("Sources:");
                for source in &response.sources {
                    println!("  - {}", source);
                }
            }
        }
        Err(err) => {
            println!(
                "{}",
                rag_foundations::utils::logging::format_error(&err.to_string())
            );
        }
    }

    Ok(())
}

async fn cmd_health(config: &Config) -> Result<()> {
    let client = client_for(config, None);

    let health = client
        .health()
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    println!("Status: {}", health.status.green());
    println!("Stored chunks: {}", health.total_chunks);
    println!(
        "Components: vector_store={} embedder={} llm_client={}",
        health.components.vector_store, health.components.embedder, health.components.llm_client
    );

    Ok(())
}
