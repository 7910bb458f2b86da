use domain::models::AnswerRecord;

pub struct SearchEngine;

impl SearchEngine {
    /// Cosine similarity; zero-norm inputs score 0.0. Callers guarantee equal lengths.
    pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }
        dot_product / (norm_a * norm_b)
    }

    /// Scores every record against the query, in index order.
    pub fn score_all(query_embedding: &[f32], records: &[AnswerRecord]) -> Vec<f32> {
        records
            .iter()
            .map(|record| Self::cosine_similarity(query_embedding, &record.embedding))
            .collect()
    }

    /// Index and score of the highest similarity. Ties keep the lowest index.
    /// NaN scores never win; if every score is NaN the first record is returned.
    pub fn best_match(query_embedding: &[f32], records: &[AnswerRecord]) -> Option<(usize, f32)> {
        let scores = Self::score_all(query_embedding, records);
        let mut best: Option<(usize, f32)> = None;
        for (idx, score) in scores.iter().copied().enumerate() {
            if best.map_or(!score.is_nan(), |(_, top)| score > top) {
                best = Some((idx, score));
            }
        }
        best.or_else(|| scores.first().map(|&score| (0, score)))
    }
}
