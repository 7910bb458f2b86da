use crate::answer_service::AnswerIndex;
use domain::embedding::TextEmbedder;
use infrastructure::{
    config::Config, corpus_loader::CorpusLoader, embedding_storage::EmbeddingStorage,
};
use shared::telemetry::Telemetry;
use shared::types::Result;
use std::path::{Path, PathBuf};

/// Startup orchestration: load the corpus, resolve embeddings, build the index.
pub struct IndexService {
    loader: CorpusLoader,
    storage: Option<EmbeddingStorage>,
}

impl IndexService {
    pub fn new(corpus_path: impl Into<PathBuf>, cache_path: Option<&Path>) -> Result<Self> {
        let storage = match cache_path {
            Some(path) => Some(EmbeddingStorage::new(path)?),
            None => None,
        };
        Ok(Self {
            loader: CorpusLoader::new(corpus_path),
            storage,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.corpus_path, config.embedding_cache_path.as_deref())
    }

    pub async fn build_index<E: TextEmbedder>(&self, embedder: &E) -> Result<AnswerIndex> {
        let timer = Telemetry::start("index build");
        let pairs = self.loader.load()?;
        let questions: Vec<String> = pairs.iter().map(|p| p.question.clone()).collect();

        let embeddings = match &self.storage {
            Some(storage) => self.resolve_cached(storage, &questions, embedder).await?,
            None => embedder.embed_batch(&questions).await?,
        };

        let index = AnswerIndex::from_parts(pairs, embeddings)?;
        tracing::info!(
            corpus = %self.loader.path().display(),
            entries = index.len(),
            dimension = index.dimension(),
            model = embedder.model_name(),
            elapsed_ms = timer.elapsed_ms(),
            "{} complete",
            timer.label()
        );
        Ok(index)
    }

    async fn resolve_cached<E: TextEmbedder>(
        &self,
        storage: &EmbeddingStorage,
        questions: &[String],
        embedder: &E,
    ) -> Result<Vec<Vec<f32>>> {
        let model = embedder.model_name();
        let cached = storage.get_embeddings(model, questions)?;

        let missing: Vec<(usize, String)> = cached
            .iter()
            .enumerate()
            .filter(|(_, hit)| hit.is_none())
            .map(|(idx, _)| (idx, questions[idx].clone()))
            .collect();
        tracing::info!(
            hits = questions.len() - missing.len(),
            misses = missing.len(),
            model,
            "embedding cache lookup"
        );

        let mut resolved = cached;
        if !missing.is_empty() {
            let texts: Vec<String> = missing.iter().map(|(_, text)| text.clone()).collect();
            let fresh = embedder.embed_batch(&texts).await?;
            if fresh.len() != texts.len() {
                return Err(anyhow::anyhow!(
                    "Embedder returned {} vectors for {} texts",
                    fresh.len(),
                    texts.len()
                ));
            }
            let entries: Vec<(String, Vec<f32>)> = texts.into_iter().zip(fresh).collect();
            storage.insert_embeddings(model, &entries)?;
            for ((idx, _), (_, vector)) in missing.iter().zip(entries) {
                resolved[*idx] = Some(vector);
            }
        }

        Ok(resolved.into_iter().flatten().collect())
    }
}
