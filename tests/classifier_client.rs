use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use feed_sim::classifier::{parse_targets, HttpClassifier, ImageClassifier};
use feed_sim::config::ClassifierConfig;
use feed_sim::ClassifierError;

type Captured = Arc<Mutex<Vec<Value>>>;

async fn classify_ok(State(captured): State<Captured>, Json(body): Json<Value>) -> Json<Value> {
    let prompts = body["prompts"].as_array().map(Vec::len).unwrap_or(0);
    captured.lock().unwrap().push(body);
    let share = 1.0 / prompts.max(1) as f64;
    Json(json!({ "probabilities": vec![share; prompts] }))
}

async fn classify_fail() -> (StatusCode, &'static str) {
    (StatusCode::SERVICE_UNAVAILABLE, "model loading")
}

async fn classify_garbage() -> &'static str {
    "not json"
}

async fn classify_wrong_shape() -> Json<Value> {
    Json(json!({ "probabilities": [0.9] }))
}

async fn start_server() -> (SocketAddr, Captured) {
    let captured: Captured = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/ok/classify", post(classify_ok))
        .route("/fail/classify", post(classify_fail))
        .route("/garbage/classify", post(classify_garbage))
        .route("/short/classify", post(classify_wrong_shape))
        .with_state(captured.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, captured)
}

fn client(addr: SocketAddr, prefix: &str) -> HttpClassifier {
    HttpClassifier::new(format!("http://{}/{}", addr, prefix), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn posts_base64_image_and_prompts() {
    let (addr, captured) = start_server().await;
    let classifier = client(addr, "ok/");
    let prompts = parse_targets("cat, dog");

    let scores = classifier.classify(&[1, 2, 3], &prompts).await.unwrap();
    assert!((scores.get("cat") - 0.5).abs() < 1e-6);
    assert!((scores.get("dog") - 0.5).abs() < 1e-6);

    let bodies = captured.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["image_base64"], STANDARD.encode([1u8, 2, 3]));
    assert_eq!(bodies[0]["prompts"], json!(["cat", "dog"]));
}

#[tokio::test]
async fn error_status_is_unavailable() {
    let (addr, _) = start_server().await;
    let result = client(addr, "fail")
        .classify(&[0], &parse_targets("cat"))
        .await;

    match result {
        Err(ClassifierError::Unavailable(message)) => {
            assert!(message.contains("503"));
            assert!(message.contains("model loading"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn unparseable_body_is_malformed() {
    let (addr, _) = start_server().await;
    let result = client(addr, "garbage")
        .classify(&[0], &parse_targets("cat"))
        .await;
    assert!(matches!(result, Err(ClassifierError::Malformed(_))));
}

#[tokio::test]
async fn wrong_distribution_length_is_malformed() {
    let (addr, _) = start_server().await;
    let result = client(addr, "short")
        .classify(&[0], &parse_targets("cat, dog"))
        .await;
    assert!(matches!(result, Err(ClassifierError::Malformed(_))));
}

#[tokio::test]
async fn unreachable_server_is_unavailable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = client(addr, "ok")
        .classify(&[0], &parse_targets("cat"))
        .await;
    assert!(matches!(result, Err(ClassifierError::Unavailable(_))));
}

#[test]
fn blank_endpoint_disables_client() {
    let unset = ClassifierConfig::default();
    assert!(HttpClassifier::from_config(&unset).unwrap().is_none());

    let blank = ClassifierConfig {
        endpoint: Some("   ".to_string()),
        ..ClassifierConfig::default()
    };
    assert!(HttpClassifier::from_config(&blank).unwrap().is_none());

    let set = ClassifierConfig {
        endpoint: Some("http://127.0.0.1:9".to_string()),
        ..ClassifierConfig::default()
    };
    assert!(HttpClassifier::from_config(&set).unwrap().is_some());
}
