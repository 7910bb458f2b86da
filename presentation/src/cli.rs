use anyhow::Context;
use application::answer_service::AnswerMatcher;
use application::index_service::IndexService;
use clap::{Parser, Subcommand};
use colored::Colorize;
use domain::models::MatchOutcome;
use infrastructure::{config::Config, embedder::Embedder, ollama_client::OllamaClient};
use shared::types::Result;
use std::path::PathBuf;
use std::sync::Arc;

use crate::smoke::ApiChecker;

#[derive(Parser)]
#[command(name = "justly_bot")]
#[command(about = "Answers legal questions by nearest-neighbour lookup over a fixed Q&A corpus")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the answer index and serve it over HTTP
    Serve {
        /// Address to bind, e.g. 0.0.0.0:5000
        #[arg(long)]
        bind: Option<String>,

        /// Corpus file (line-delimited JSON)
        #[arg(long)]
        corpus: Option<PathBuf>,
    },
    /// Answer a single question from the command line
    Ask {
        /// Corpus file (line-delimited JSON)
        #[arg(long)]
        corpus: Option<PathBuf>,

        /// Show the matched question and its similarity score
        #[arg(short, long)]
        verbose: bool,

        /// The question to answer
        #[arg(trailing_var_arg = true, required = true)]
        query: Vec<String>,
    },
    /// Smoke-test a running server
    Check {
        /// Base URL of the server
        #[arg(long, default_value = "http://localhost:5000")]
        base_url: String,
    },
}

pub struct CliApp {
    config: Config,
}

impl CliApp {
    pub fn new() -> Result<Self> {
        Ok(Self::with_config(Config::load()?))
    }

    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    pub async fn run(&self, cli: Cli) -> Result<()> {
        match cli.command {
            Commands::Serve { bind, corpus } => self.handle_serve(bind, corpus).await,
            Commands::Ask {
                corpus,
                verbose,
                query,
            } => self.handle_ask(corpus, verbose, &query.join(" ")).await,
            Commands::Check { base_url } => self.handle_check(&base_url).await,
        }
    }

    async fn build_matcher(&self, corpus: Option<PathBuf>) -> Result<AnswerMatcher<Embedder>> {
        let mut config = self.config.clone();
        if let Some(corpus) = corpus {
            config.corpus_path = corpus;
        }
        let embedder = Embedder::new(OllamaClient::from_config(&config))
            .with_concurrency(config.embed_concurrency);
        let index = IndexService::from_config(&config)?
            .build_index(&embedder)
            .await
            .with_context(|| format!("Failed to build answer index from {}", config.corpus_path.display()))?;
        Ok(AnswerMatcher::new(index, embedder).with_threshold(config.match_threshold))
    }

    async fn handle_serve(&self, bind: Option<String>, corpus: Option<PathBuf>) -> Result<()> {
        let matcher = Arc::new(self.build_matcher(corpus).await?);
        let bind = bind.unwrap_or_else(|| self.config.bind_addr.clone());
        let listener = tokio::net::TcpListener::bind(&bind)
            .await
            .with_context(|| format!("Failed to bind {bind}"))?;
        crate::http::serve(listener, matcher).await
    }

    async fn handle_ask(&self, corpus: Option<PathBuf>, verbose: bool, query: &str) -> Result<()> {
        let matcher = self.build_matcher(corpus).await?;
        let outcome = matcher.best_match(query.trim()).await?;
        for line in render_outcome(&outcome, matcher.threshold(), verbose) {
            println!("{line}");
        }
        Ok(())
    }

    async fn handle_check(&self, base_url: &str) -> Result<()> {
        println!("{}", format!("Checking answer API at {base_url}").bold());
        let results = ApiChecker::new(base_url)?.run_all().await;
        for result in &results {
            let tag = if result.passed {
                "PASS".green().bold()
            } else {
                "FAIL".red().bold()
            };
            println!("  [{}] {:<8} {}", tag, result.name, result.detail);
        }
        let failed = results.iter().filter(|r| !r.passed).count();
        if failed > 0 {
            return Err(anyhow::anyhow!("{} of {} API checks failed", failed, results.len()));
        }
        println!("{}", "All API checks passed.".green());
        Ok(())
    }
}

/// Lines printed by `ask`; verbose mode prefixes the matched question and score.
pub fn render_outcome(outcome: &MatchOutcome, threshold: f32, verbose: bool) -> Vec<String> {
    let mut lines = Vec::new();
    if verbose {
        match &outcome.question {
            Some(question) => lines.push(format!("{} {}", "Closest question:".blue(), question)),
            None => lines.push(format!("{}", "Corpus is empty.".yellow())),
        }
        let score = format!("{:.4}", outcome.score);
        let threshold = format!("{threshold:.2}");
        if outcome.accepted {
            lines.push(format!("{} {} > {}", "Score:".blue(), score.green(), threshold));
        } else {
            lines.push(format!("{} {} <= {}", "Score:".blue(), score.red(), threshold));
        }
    }
    lines.push(outcome.answer.clone());
    lines
}
