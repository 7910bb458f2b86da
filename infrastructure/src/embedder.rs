use super::ollama_client::OllamaClient;
use domain::embedding::TextEmbedder;
use futures::stream::{self, StreamExt, TryStreamExt};
use shared::types::Result;

const BATCH_SIZE: usize = 32;

/// Embeds text through the embedding server, batching corpus-sized inputs.
pub struct Embedder {
    client: OllamaClient,
    concurrency: usize,
}

impl Embedder {
    pub fn new(client: OllamaClient) -> Self {
        Self {
            client,
            concurrency: 8,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub async fn generate_embeddings(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(BATCH_SIZE) {
            tracing::debug!(count = chunk.len(), "generating embedding batch");
            let batch = self.generate_batch_embeddings(chunk).await?;
            embeddings.extend(batch);
        }
        Ok(embeddings)
    }

    async fn generate_batch_embeddings(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let futures: Vec<_> = texts
            .iter()
            .map(|text| {
                let client = self.client.clone();
                let text = text.clone();
                async move { client.generate_embedding(&text).await }
            })
            .collect();

        // `buffered` keeps results in input order; callers zip them back onto the corpus.
        stream::iter(futures)
            .buffered(self.concurrency)
            .try_collect()
            .await
    }
}

impl TextEmbedder for Embedder {
    fn model_name(&self) -> &str {
        self.client.model()
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.client.generate_embedding(text).await
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.generate_embeddings(texts).await
    }
}
