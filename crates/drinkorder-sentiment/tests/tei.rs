//! Integration tests for the TEI engine using wiremock HTTP mocks.

use drinkorder_core::SentimentLabel;
use drinkorder_sentiment::{
    ClassifierConfig, EngineLoader, EngineStatus, RawLabel, SentimentClassifier, SentimentEngine,
    SentimentError, TeiLoader,
};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn classifier_info() -> serde_json::Value {
    serde_json::json!({
        "model_id": "distilbert/distilbert-base-uncased-finetuned-sst-2-english",
        "model_type": {
            "classifier": { "id2label": { "0": "NEGATIVE", "1": "POSITIVE" } }
        },
        "max_input_length": 512
    })
}

async fn mount_info(server: &MockServer, body: serde_json::Value, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn load_reads_model_id_from_info() {
    let server = MockServer::start().await;
    mount_info(&server, classifier_info(), 1).await;

    let engine = TeiLoader::new(&server.uri())
        .load()
        .await
        .expect("classifier model should load");

    assert_eq!(
        engine.model_id(),
        "distilbert/distilbert-base-uncased-finetuned-sst-2-english"
    );
}

#[tokio::test]
async fn load_rejects_embedding_models() {
    let server = MockServer::start().await;
    mount_info(
        &server,
        serde_json::json!({
            "model_id": "BAAI/bge-small-en-v1.5",
            "model_type": { "embedding": { "pooling": "cls" } }
        }),
        1,
    )
    .await;

    let err = TeiLoader::new(&server.uri()).load().await.unwrap_err();
    assert!(
        matches!(err, SentimentError::Tei(ref msg) if msg.contains("not a sequence classifier")),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn load_fails_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/info"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = TeiLoader::new(&server.uri()).load().await.unwrap_err();
    assert!(matches!(err, SentimentError::Tei(_)));
}

#[tokio::test]
async fn predict_picks_highest_scoring_label() {
    let server = MockServer::start().await;
    mount_info(&server, classifier_info(), 1).await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_json(serde_json::json!({
            "inputs": "I loved this!",
            "truncate": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "label": "NEGATIVE", "score": 0.05 },
            { "label": "POSITIVE", "score": 0.95 }
        ])))
        .mount(&server)
        .await;

    let engine = TeiLoader::new(&server.uri()).load().await.unwrap();
    let prediction = engine.predict("I loved this!").await.unwrap();

    assert_eq!(prediction.label, RawLabel::Positive);
    assert!((prediction.score - 0.95).abs() < f32::EPSILON);
}

#[tokio::test]
async fn predict_errors_on_empty_label_list() {
    let server = MockServer::start().await;
    mount_info(&server, classifier_info(), 1).await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let engine = TeiLoader::new(&server.uri()).load().await.unwrap();
    let err = engine.predict("anything").await.unwrap_err();
    assert!(matches!(err, SentimentError::Inference(_)));
}

#[tokio::test]
async fn classifier_over_tei_thresholds_predictions() {
    let server = MockServer::start().await;
    mount_info(&server, classifier_info(), 1).await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_json(serde_json::json!({
            "inputs": "This was awful",
            "truncate": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "label": "NEGATIVE", "score": 0.88 },
            { "label": "POSITIVE", "score": 0.12 }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_json(serde_json::json!({
            "inputs": "It was okay I guess",
            "truncate": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "label": "POSITIVE", "score": 0.55 },
            { "label": "NEGATIVE", "score": 0.45 }
        ])))
        .mount(&server)
        .await;

    let classifier =
        SentimentClassifier::new(TeiLoader::new(&server.uri()), &ClassifierConfig::default());

    assert_eq!(
        classifier.classify("This was awful").await,
        SentimentLabel::Negative
    );
    assert_eq!(
        classifier.classify("It was okay I guess").await,
        SentimentLabel::Neutral
    );
    assert_eq!(classifier.load_attempts(), 1);
}

#[tokio::test]
async fn classifier_over_tei_turns_server_errors_into_neutral() {
    let server = MockServer::start().await;
    mount_info(&server, classifier_info(), 1).await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let classifier =
        SentimentClassifier::new(TeiLoader::new(&server.uri()), &ClassifierConfig::default());

    assert_eq!(
        classifier.classify("I loved this!").await,
        SentimentLabel::Neutral
    );
    assert_eq!(classifier.status(), EngineStatus::Ready);
}

#[tokio::test]
async fn classifier_does_not_retry_failed_tei_load() {
    let server = MockServer::start().await;
    // `expect(1)` is verified when the server drops: a second /info call fails the test.
    mount_info(
        &server,
        serde_json::json!({ "model_id": "BAAI/bge-small-en-v1.5", "model_type": {} }),
        1,
    )
    .await;

    let classifier =
        SentimentClassifier::new(TeiLoader::new(&server.uri()), &ClassifierConfig::default());

    assert_eq!(
        classifier.classify("I loved this!").await,
        SentimentLabel::Neutral
    );
    assert_eq!(
        classifier.classify("This was awful").await,
        SentimentLabel::Neutral
    );
    assert_eq!(classifier.status(), EngineStatus::Unavailable);
}
