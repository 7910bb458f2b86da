use serde::{Deserialize, Serialize};

/// Returned whenever no corpus question clears the match threshold.
pub const FALLBACK_ANSWER: &str = "Sorry, I don't have an answer for that question.";

/// Minimum cosine similarity a corpus question must strictly exceed.
pub const DEFAULT_MATCH_THRESHOLD: f32 = 0.6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

impl QaPair {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// One corpus entry together with the embedding of its question.
#[derive(Debug, Clone)]
pub struct AnswerRecord {
    pub question: String,
    pub answer: String,
    pub embedding: Vec<f32>,
}

impl AnswerRecord {
    pub fn from_pair(pair: QaPair, embedding: Vec<f32>) -> Self {
        Self {
            question: pair.question,
            answer: pair.answer,
            embedding,
        }
    }
}

/// Result of one scoring pass over the index.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    /// Index of the best-scoring record, `None` for an empty index.
    pub index: Option<usize>,
    pub question: Option<String>,
    pub score: f32,
    pub accepted: bool,
    pub answer: String,
}

impl MatchOutcome {
    pub fn fallback(index: Option<usize>, question: Option<String>, score: f32) -> Self {
        Self {
            index,
            question,
            score,
            accepted: false,
            answer: FALLBACK_ANSWER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

/// A single line of the corpus file. Two layouts are accepted: the flat
/// chatbot layout and the chat-template layout used for fine-tuning data.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CorpusRecord {
    Flat { user: String, assistant: String },
    Conversation { messages: Vec<ChatTurn> },
}

impl CorpusRecord {
    pub fn into_pair(self) -> QaPair {
        match self {
            CorpusRecord::Flat { user, assistant } => {
                QaPair::new(user.trim(), assistant.trim())
            }
            CorpusRecord::Conversation { messages } => {
                let join_role = |role: &str| {
                    messages
                        .iter()
                        .filter(|turn| turn.role == role)
                        .map(|turn| turn.content.as_str())
                        .collect::<Vec<_>>()
                        .join("\n")
                };
                let question = join_role("user");
                let answer = join_role("assistant");
                QaPair::new(question.trim(), answer.trim())
            }
        }
    }
}
