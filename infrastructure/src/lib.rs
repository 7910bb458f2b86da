pub mod config;
pub mod corpus_loader;
pub mod embedder;
pub mod embedding_storage;
pub mod error;
pub mod ollama_client;
pub mod search;
