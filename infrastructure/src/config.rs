use anyhow::Context;
use domain::models::DEFAULT_MATCH_THRESHOLD;
use dotenvy::dotenv;
use shared::types::Result;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub corpus_path: PathBuf,
    pub ollama_base_url: String,
    pub embedding_model: String,
    pub embedding_cache_path: Option<PathBuf>,
    pub bind_addr: String,
    pub match_threshold: f32,
    pub embed_concurrency: usize,
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let match_threshold = match get("MATCH_THRESHOLD") {
            Some(raw) => raw
                .trim()
                .parse::<f32>()
                .with_context(|| format!("MATCH_THRESHOLD is not a number: {raw:?}"))?,
            None => DEFAULT_MATCH_THRESHOLD,
        };
        let embed_concurrency = match get("EMBED_CONCURRENCY") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("EMBED_CONCURRENCY is not a positive integer: {raw:?}"))?
                .max(1),
            None => 8,
        };

        Ok(Self {
            corpus_path: get("CORPUS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data.json")),
            ollama_base_url: get("OLLAMA_BASE_URL")
                .unwrap_or_else(|| "http://localhost:11434".to_string()),
            embedding_model: get("EMBEDDING_MODEL").unwrap_or_else(|| "all-minilm".to_string()),
            embedding_cache_path: get("EMBEDDING_CACHE_PATH").map(PathBuf::from),
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:5000".to_string()),
            match_threshold,
            embed_concurrency,
        })
    }
}
