use domain::embedding::TextEmbedder;
use domain::models::{AnswerRecord, MatchOutcome, QaPair, DEFAULT_MATCH_THRESHOLD};
use infrastructure::search::SearchEngine;
use shared::telemetry::Telemetry;
use shared::types::Result;

/// Immutable lookup table of corpus answers and their question embeddings.
///
/// Each record carries its own embedding, so question, answer and vector can
/// never fall out of alignment.
#[derive(Debug, Clone, Default)]
pub struct AnswerIndex {
    records: Vec<AnswerRecord>,
    dimension: usize,
}

impl AnswerIndex {
    pub fn from_records(records: Vec<AnswerRecord>) -> Result<Self> {
        let dimension = records.first().map(|r| r.embedding.len()).unwrap_or(0);
        if let Some((idx, bad)) = records
            .iter()
            .enumerate()
            .find(|(_, r)| r.embedding.len() != dimension)
        {
            return Err(anyhow::anyhow!(
                "Embedding dimension mismatch at entry {}: expected {}, got {}",
                idx,
                dimension,
                bad.embedding.len()
            ));
        }
        if !records.is_empty() && dimension == 0 {
            return Err(anyhow::anyhow!("Corpus embeddings are empty vectors"));
        }
        Ok(Self { records, dimension })
    }

    /// Pairs each corpus entry with its embedding; lengths must agree.
    pub fn from_parts(pairs: Vec<QaPair>, embeddings: Vec<Vec<f32>>) -> Result<Self> {
        if pairs.len() != embeddings.len() {
            return Err(anyhow::anyhow!(
                "Got {} embeddings for {} corpus entries",
                embeddings.len(),
                pairs.len()
            ));
        }
        let records = pairs
            .into_iter()
            .zip(embeddings)
            .map(|(pair, embedding)| AnswerRecord::from_pair(pair, embedding))
            .collect();
        Self::from_records(records)
    }

    /// Embeds every question with `embedder` and builds the index.
    pub async fn build<E: TextEmbedder>(pairs: Vec<QaPair>, embedder: &E) -> Result<Self> {
        let questions: Vec<String> = pairs.iter().map(|p| p.question.clone()).collect();
        let embeddings = embedder.embed_batch(&questions).await?;
        Self::from_parts(pairs, embeddings)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn records(&self) -> &[AnswerRecord] {
        &self.records
    }
}

/// Maps a free-text query to the closest stored answer, or the fallback.
pub struct AnswerMatcher<E> {
    index: AnswerIndex,
    embedder: E,
    threshold: f32,
}

impl<E: TextEmbedder> AnswerMatcher<E> {
    pub fn new(index: AnswerIndex, embedder: E) -> Self {
        Self {
            index,
            embedder,
            threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn index(&self) -> &AnswerIndex {
        &self.index
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    pub async fn best_match(&self, query: &str) -> Result<MatchOutcome> {
        let timer = Telemetry::start("match");
        let mut query_embedding = self.embedder.embed(query).await?;
        if query_embedding.is_empty() {
            // Empty input embeds to an empty vector on some backends; score it as the zero vector.
            query_embedding = vec![0.0; self.index.dimension()];
        }
        if !self.index.is_empty() && query_embedding.len() != self.index.dimension() {
            return Err(anyhow::anyhow!(
                "Query embedding has dimension {}, index expects {}",
                query_embedding.len(),
                self.index.dimension()
            ));
        }

        let outcome = match SearchEngine::best_match(&query_embedding, self.index.records()) {
            Some((idx, score)) => {
                let record = &self.index.records()[idx];
                if score > self.threshold {
                    MatchOutcome {
                        index: Some(idx),
                        question: Some(record.question.clone()),
                        score,
                        accepted: true,
                        answer: record.answer.clone(),
                    }
                } else {
                    MatchOutcome::fallback(Some(idx), Some(record.question.clone()), score)
                }
            }
            None => MatchOutcome::fallback(None, None, 0.0),
        };

        tracing::debug!(
            best_index = ?outcome.index,
            score = outcome.score,
            accepted = outcome.accepted,
            elapsed_ms = timer.elapsed_ms(),
            "{} complete",
            timer.label()
        );
        Ok(outcome)
    }

    pub async fn answer(&self, query: &str) -> Result<String> {
        Ok(self.best_match(query).await?.answer)
    }
}
