use application::answer_service::AnswerMatcher;
use application::index_service::IndexService;
use infrastructure::config::Config;
use infrastructure::embedding_storage::EmbeddingStorage;
use tests::{corpus_file, legal_corpus_file, KeywordEmbedder, RIGHTS_ANSWER, RIGHTS_QUESTION};

#[tokio::test]
async fn test_build_index_from_corpus_file() {
    let corpus = legal_corpus_file();
    let embedder = KeywordEmbedder::legal();
    let index = IndexService::new(corpus.path(), None)
        .unwrap()
        .build_index(&embedder)
        .await
        .unwrap();

    assert_eq!(index.len(), 2);
    assert_eq!(index.dimension(), 8);
    assert_eq!(index.records()[0].question, RIGHTS_QUESTION);
    assert_eq!(embedder.calls(), 2);

    let matcher = AnswerMatcher::new(index, embedder);
    assert_eq!(
        matcher.answer("rights when arrested").await.unwrap(),
        RIGHTS_ANSWER
    );
}

#[tokio::test]
async fn test_conversation_format_corpus() {
    let corpus = corpus_file(concat!(
        r#"{"messages": [{"role": "user", "content": "Can I ask for a lawyer?"}, {"role": "assistant", "content": "Yes, always."}]}"#,
        "\n",
        r#"{"user": "Is bail a right?", "assistant": "It depends on the offence."}"#,
        "\n"
    ));
    let embedder = KeywordEmbedder::legal();
    let index = IndexService::new(corpus.path(), None)
        .unwrap()
        .build_index(&embedder)
        .await
        .unwrap();
    let matcher = AnswerMatcher::new(index, embedder);
    assert_eq!(matcher.answer("I want a lawyer").await.unwrap(), "Yes, always.");
    assert_eq!(
        matcher.answer("how does bail work").await.unwrap(),
        "It depends on the offence."
    );
}

#[tokio::test]
async fn test_malformed_corpus_fails_startup() {
    let corpus = corpus_file("{\"user\": \"q\", \"assistant\": \"a\"}\nnot json\n");
    let err = IndexService::new(corpus.path(), None)
        .unwrap()
        .build_index(&KeywordEmbedder::legal())
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("line 2"), "{err:#}");
}

#[tokio::test]
async fn test_missing_corpus_fails_startup() {
    let dir = tempfile::tempdir().unwrap();
    let result = IndexService::new(dir.path().join("data.json"), None)
        .unwrap()
        .build_index(&KeywordEmbedder::legal())
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_embedding_cache_skips_reembedding() {
    let corpus = legal_corpus_file();
    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("embeddings.db");

    let first = KeywordEmbedder::legal();
    let cold = IndexService::new(corpus.path(), Some(cache_path.as_path()))
        .unwrap()
        .build_index(&first)
        .await
        .unwrap();
    assert_eq!(first.calls(), 2);

    let second = KeywordEmbedder::legal();
    let warm = IndexService::new(corpus.path(), Some(cache_path.as_path()))
        .unwrap()
        .build_index(&second)
        .await
        .unwrap();
    assert_eq!(second.calls(), 0);
    assert_eq!(warm.records()[1].embedding, cold.records()[1].embedding);

    let storage = EmbeddingStorage::new(&cache_path).unwrap();
    assert_eq!(storage.count("keyword-test").unwrap(), 2);
}

#[tokio::test]
async fn test_from_config_uses_corpus_path() {
    let corpus = legal_corpus_file();
    let path = corpus.path().to_string_lossy().to_string();
    let config = Config::from_lookup(|key| (key == "CORPUS_PATH").then(|| path.clone())).unwrap();
    let index = IndexService::from_config(&config)
        .unwrap()
        .build_index(&KeywordEmbedder::legal())
        .await
        .unwrap();
    assert_eq!(index.len(), 2);
}
