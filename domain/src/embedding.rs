use shared::types::Result;
use std::future::Future;

/// Maps text to a fixed-length vector. The same instance must embed both the
/// corpus and incoming queries, otherwise scores are meaningless.
pub trait TextEmbedder: Send + Sync {
    fn model_name(&self) -> &str;

    fn embed(&self, text: &str) -> impl Future<Output = Result<Vec<f32>>> + Send;

    /// Output order matches `texts`.
    fn embed_batch(&self, texts: &[String]) -> impl Future<Output = Result<Vec<Vec<f32>>>> + Send {
        async move {
            let mut vectors = Vec::with_capacity(texts.len());
            for text in texts {
                vectors.push(self.embed(text).await?);
            }
            Ok(vectors)
        }
    }
}
