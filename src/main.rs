//! ParentBuddy - Main CLI Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use parentbuddy::{
    assistant::{Assistant, Route},
    cli::{Args, Commands, Verbosity},
    config::Config,
    embedding::EmbeddingEngine,
    knowledge::KnowledgeBase,
    models::OllamaAnswerer,
    rag::{AnswerComposer, ContextBuilder, SemanticRetriever},
    repl::{
        display::{format_entries, format_skipped},
        ReplSession,
    },
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbosity());

    let config = load_config(&args)?;

    match args.command() {
        Commands::Start => run_repl(&args, &config).await?,
        Commands::Ask { question } => run_ask(&args, &config, &question.join(" ")).await?,
        Commands::Milestones { question } => run_milestones(&config, &question.join(" "))?,
        Commands::Entries {
            skipped,
            json,
            limit,
        } => list_entries(&config, skipped, json, limit)?,
        Commands::Config => show_config(&args, &config)?,
    }

    Ok(())
}

/// Logs go to stderr; RUST_LOG wins over -q/-v
fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("parentbuddy={}", verbosity.log_filter())));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &Args) -> Result<Config> {
    let path = match &args.config {
        Some(path) => path.clone(),
        None => Config::config_path()?,
    };

    let mut config = Config::load_from(&path)?;
    args.apply_to(&mut config);
    config.validate()?;

    info!(path = %path.display(), "configuration loaded");
    Ok(config)
}

fn load_knowledge(config: &Config) -> Result<Arc<KnowledgeBase>> {
    let path = config.knowledge_path();
    let knowledge = KnowledgeBase::load(&path)
        .with_context(|| format!("Could not load knowledge base from {}", path.display()))?;
    Ok(Arc::new(knowledge))
}

/// Load the embedding model and index the knowledge base off the async runtime
async fn build_assistant(
    config: &Config,
    knowledge: Arc<KnowledgeBase>,
    verbosity: Verbosity,
) -> Result<Assistant> {
    let spinner = verbosity.show_progress().then(|| {
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        pb.set_style(style);
        pb.set_message("Loading embedding model and indexing knowledge base...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    });

    let model_id = config.embedding.model_id.clone();
    let index_knowledge = knowledge.clone();
    let indexed = tokio::task::spawn_blocking(move || {
        let engine = EmbeddingEngine::from_hub(&model_id)?;
        SemanticRetriever::new(Arc::new(engine), index_knowledge)
    })
    .await
    .context("Model loading task failed")?;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let retriever = indexed.context("Could not prepare semantic retrieval")?;

    let answerer = OllamaAnswerer::with_config(&config.qa.base_url(), &config.qa.model, config.qa.timeout())?;
    let composer = AnswerComposer::with_context_builder(
        Arc::new(retriever),
        Arc::new(answerer),
        ContextBuilder::with_format(config.retrieval.context_format),
    );

    Ok(Assistant::new(knowledge, composer).with_top_k(config.top_k()?))
}

async fn run_repl(args: &Args, config: &Config) -> Result<()> {
    let knowledge = load_knowledge(config)?;
    let entries = knowledge.len();
    let assistant = build_assistant(config, knowledge, args.verbosity()).await?;

    let history_path = Config::state_dir()?.join("history");
    let mut repl_session = ReplSession::with_history(history_path)?;
    if args.verbosity().show_sources() {
        repl_session.set_verbose(true);
    }

    repl_session.show_welcome(env!("CARGO_PKG_VERSION"), entries);
    repl_session.run(&assistant).await
}

async fn run_ask(args: &Args, config: &Config, question: &str) -> Result<()> {
    let knowledge = load_knowledge(config)?;

    // Milestone questions need no models
    if Route::for_question(question) == Route::Milestones {
        println!("{}", knowledge_milestones(&knowledge, question));
        return Ok(());
    }

    let assistant = build_assistant(config, knowledge, args.verbosity()).await?;
    let reply = assistant.reply_via(Route::Answer, question).await;

    println!("{}", reply);
    if args.verbosity().show_sources() {
        for source in reply.sources() {
            eprintln!("  {} {}", format!("[{:.3}]", source.score).dimmed(), source.entry.label());
        }
    }
    Ok(())
}

fn run_milestones(config: &Config, question: &str) -> Result<()> {
    let knowledge = load_knowledge(config)?;
    println!("{}", knowledge_milestones(&knowledge, question));
    Ok(())
}

fn knowledge_milestones(knowledge: &KnowledgeBase, question: &str) -> String {
    parentbuddy::milestones::MilestoneQueryEngine::new().query(knowledge.entries(), question)
}

fn list_entries(config: &Config, skipped: bool, json: bool, limit: Option<usize>) -> Result<()> {
    let knowledge = load_knowledge(config)?;

    match (skipped, json) {
        (true, true) => println!("{}", serde_json::to_string_pretty(knowledge.skipped())?),
        (true, false) => println!("{}", format_skipped(&knowledge)),
        (false, true) => {
            let shown = limit.unwrap_or(knowledge.len()).min(knowledge.len());
            println!("{}", serde_json::to_string_pretty(&knowledge.entries()[..shown])?);
        }
        (false, false) => println!("{}", format_entries(&knowledge, limit)),
    }
    Ok(())
}

fn show_config(args: &Args, config: &Config) -> Result<()> {
    let path = match &args.config {
        Some(path) => path.clone(),
        None => Config::config_path()?,
    };

    println!("\n{}", "ParentBuddy Configuration".bold().cyan());
    println!("{}", "=".repeat(60).cyan());
    println!("File: {}\n", path.display());
    println!("{}", toml::to_string_pretty(config).context("Failed to serialize config")?);
    println!("Verbosity: {}", args.verbosity().as_str());
    println!();

    Ok(())
}
