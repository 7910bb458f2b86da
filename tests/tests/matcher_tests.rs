use application::answer_service::{AnswerIndex, AnswerMatcher};
use domain::models::{QaPair, FALLBACK_ANSWER};
use tests::{
    KeywordEmbedder, ScriptedEmbedder, REPORT_ANSWER, REPORT_QUESTION, RIGHTS_ANSWER,
    RIGHTS_QUESTION,
};

fn legal_pairs() -> Vec<QaPair> {
    vec![
        QaPair::new(RIGHTS_QUESTION, RIGHTS_ANSWER),
        QaPair::new(REPORT_QUESTION, REPORT_ANSWER),
    ]
}

async fn legal_matcher() -> AnswerMatcher<KeywordEmbedder> {
    let embedder = KeywordEmbedder::legal();
    let index = AnswerIndex::build(legal_pairs(), &embedder).await.unwrap();
    AnswerMatcher::new(index, embedder)
}

#[tokio::test]
async fn test_paraphrased_question_returns_stored_answer() {
    let matcher = legal_matcher().await;
    let answer = matcher
        .answer("What are my rights if I get arrested?")
        .await
        .unwrap();
    assert_eq!(answer, RIGHTS_ANSWER);
}

#[tokio::test]
async fn test_unrelated_question_returns_fallback() {
    let matcher = legal_matcher().await;
    let answer = matcher.answer("What's the weather today?").await.unwrap();
    assert_eq!(answer, FALLBACK_ANSWER);
}

#[tokio::test]
async fn test_verbatim_questions_return_their_answers() {
    let matcher = legal_matcher().await;
    for pair in legal_pairs() {
        assert_eq!(matcher.answer(&pair.question).await.unwrap(), pair.answer);
    }
}

#[tokio::test]
async fn test_results_are_corpus_answers_or_fallback() {
    let matcher = legal_matcher().await;
    let queries = [
        "police",
        "Can I get bail?",
        "lawyer rights",
        "file report police arrested",
        "???",
        "   ",
    ];
    for query in queries {
        let answer = matcher.answer(query).await.unwrap();
        assert!(
            answer == RIGHTS_ANSWER || answer == REPORT_ANSWER || answer == FALLBACK_ANSWER,
            "unexpected answer for {query:?}: {answer}"
        );
        assert!(!answer.is_empty());
    }
}

#[tokio::test]
async fn test_repeated_calls_are_deterministic() {
    let matcher = legal_matcher().await;
    let first = matcher.best_match("How can I file a report?").await.unwrap();
    for _ in 0..5 {
        assert_eq!(matcher.best_match("How can I file a report?").await.unwrap(), first);
    }
    assert_eq!(first.answer, REPORT_ANSWER);
}

#[tokio::test]
async fn test_empty_query_is_embedded_not_short_circuited() {
    let matcher = legal_matcher().await;
    let calls_before = matcher.embedder().calls();
    let outcome = matcher.best_match("").await.unwrap();
    assert_eq!(matcher.embedder().calls(), calls_before + 1);
    // A zero vector scores 0.0 everywhere; the first entry wins the tie.
    assert_eq!(outcome.index, Some(0));
    assert_eq!(outcome.score, 0.0);
    assert_eq!(outcome.answer, FALLBACK_ANSWER);
}

#[tokio::test]
async fn test_score_above_threshold_is_accepted() {
    let embedder = ScriptedEmbedder::new(&[
        (RIGHTS_QUESTION, vec![1.0, 0.0]),
        (REPORT_QUESTION, vec![0.0, 1.0]),
        ("clear match", vec![4.0, 3.0]),
    ]);
    let index = AnswerIndex::build(legal_pairs(), &embedder).await.unwrap();
    let matcher = AnswerMatcher::new(index, embedder);

    let outcome = matcher.best_match("clear match").await.unwrap();
    assert_eq!(outcome.index, Some(0));
    assert!(outcome.accepted);
    assert_eq!(outcome.answer, RIGHTS_ANSWER);
}

#[tokio::test]
async fn test_best_score_equal_to_threshold_returns_fallback() {
    let embedder = ScriptedEmbedder::new(&[
        (RIGHTS_QUESTION, vec![1.0, 0.0, 0.0]),
        (REPORT_QUESTION, vec![0.0, 0.0, 1.0]),
        ("borderline", vec![3.0, 4.0, 0.0]),
    ]);
    let index = AnswerIndex::build(legal_pairs(), &embedder).await.unwrap();
    let matcher = AnswerMatcher::new(index, embedder);

    let outcome = matcher.best_match("borderline").await.unwrap();
    assert_eq!(outcome.index, Some(0));
    assert_eq!(outcome.score, 0.6);
    assert!(!outcome.accepted);
    assert_eq!(outcome.answer, FALLBACK_ANSWER);
}

#[tokio::test]
async fn test_embedding_failure_propagates() {
    let embedder = ScriptedEmbedder::new(&[
        (RIGHTS_QUESTION, vec![1.0, 0.0]),
        (REPORT_QUESTION, vec![0.0, 1.0]),
    ]);
    let index = AnswerIndex::build(legal_pairs(), &embedder).await.unwrap();
    let matcher = AnswerMatcher::new(index, embedder);
    let err = matcher.answer("never scripted").await.unwrap_err();
    assert!(err.to_string().contains("rejected"));
}
