//! Integration tests for the AVS summary server.
//!
//! These tests drive the Axum router in-process with `oneshot`. The
//! text-generation API is replaced by a mock generator, so no network access
//! is needed.

use std::sync::{Arc, Mutex};

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use futures_util::future::BoxFuture;
use http_body_util::BodyExt;
use serde_json::{Value as JsonValue, json};
use tower::ServiceExt;

use avs_core::PromptOptions;
use avs_server::ai::AiError;
use avs_server::config::Config;
use avs_server::{SharedGenerator, TextGenerator};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const TEST_API_KEY: &str = "test-secret-key";

/// Mock generator that returns a canned reply and records each prompt.
struct MockGenerator {
    reply: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl TextGenerator for MockGenerator {
    fn complete<'a>(
        &'a self,
        _system: &'a str,
        prompt: &'a str,
    ) -> BoxFuture<'a, Result<String, AiError>> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let reply = self.reply.clone().ok_or(AiError::Api {
            status: 503,
            message: "model overloaded".to_string(),
        });
        Box::pin(async move { reply })
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}

fn test_config() -> Config {
    Config {
        bind_address: "0.0.0.0:0".to_string(),
        api_key: Some(TEST_API_KEY.to_string()),
        cors_origins: vec!["*".to_string()],
        rate_limit_rps: 1000,
        llm: None,
        prompt: PromptOptions::default(),
    }
}

/// Build the app router with test configuration.
fn test_app(generator: Option<SharedGenerator>) -> Router {
    avs_server::build_app(&test_config(), generator)
}

/// Send a request to the app and return (status, body as JSON).
async fn request(app: &Router, req: Request<Body>) -> (StatusCode, JsonValue) {
    let response = app.clone().oneshot(req).await.expect("Request failed");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();

    let body = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null)
    };

    (status, body)
}

/// Build a GET request without auth.
fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Build a POST request with JSON body and auth header.
fn post(uri: &str, body: JsonValue) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .header("X-API-Key", TEST_API_KEY)
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

/// Record from the reference scenario.
fn scenario_record() -> JsonValue {
    json!({
        "ckd_stage": "IIIa",
        "kidney_trend": "Stable",
        "bp_status": "Above Goal",
        "bp_reading": "150/90",
        "diabetes_status": "Uncontrolled",
        "a1c_level": "8.2",
        "anemia_included": true,
        "hemoglobin_status": "Low",
        "iron_status": "Normal",
        "med_change": "Yes",
        "med_change_types": ["BP Medication", "Diuretic"]
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_health() {
    let app = test_app(None);
    let (status, body) = request(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["ai_configured"], false);

    let app = test_app(Some(MockGenerator::replying("ok")));
    let (_, body) = request(&app, get("/health")).await;
    assert_eq!(body["ai_configured"], true);
}

#[tokio::test]
async fn test_options_are_public() {
    let app = test_app(None);
    let (status, body) = request(&app, get("/avs/options")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ckd_stage"][2], "IIIa");
    assert_eq!(body["medications"][0], "BP Medication");
}

#[tokio::test]
async fn test_prompt_scenario() {
    let app = test_app(None);
    let (status, body) = request(&app, post("/avs/prompt", scenario_record())).await;

    assert_eq!(status, StatusCode::OK);
    let prompt = body["prompt"].as_str().unwrap();
    assert!(prompt.contains("- CKD Stage: IIIa"));
    assert!(prompt.contains("- Kidney Function Trend: Stable"));
    assert!(prompt.contains("- BP Reading: 150/90"));
    assert!(prompt.contains("- A1c Level: 8.2"));
    assert!(prompt.contains("  - Anemia: Hemoglobin Low, Iron Normal"));
    assert!(prompt.contains("  - Medication Changes: BP Medication, Diuretic"));
}

#[tokio::test]
async fn test_prompt_is_deterministic() {
    let app = test_app(None);
    let (_, first) = request(&app, post("/avs/prompt", scenario_record())).await;
    let (_, second) = request(&app, post("/avs/prompt", scenario_record())).await;
    assert_eq!(first["prompt"], second["prompt"]);
}

#[tokio::test]
async fn test_prompt_rejects_malformed_body() {
    let app = test_app(None);

    // kidney_trend is required
    let (status, body) = request(&app, post("/avs/prompt", json!({"ckd_stage": "II"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn test_prompt_accepts_null_and_non_string_values() {
    let app = test_app(None);
    let body = json!({
        "ckd_stage": 3,
        "kidney_trend": "Stable",
        "bp_status": null,
        "bp_reading": "150/90",
        "a1c_level": null,
        "med_change": "Yes",
        "med_change_types": null
    });

    let (status, body) = request(&app, post("/avs/prompt", body)).await;

    assert_eq!(status, StatusCode::OK);
    let prompt = body["prompt"].as_str().unwrap();
    assert!(prompt.contains("- CKD Stage: Not Provided\n"));
    assert!(!prompt.contains("Blood Pressure"));
    assert!(!prompt.contains("150/90"));
    assert!(prompt.contains("- Medication Change: Yes\n"));
    assert!(!prompt.contains("Medication Changes"));
}

#[tokio::test]
async fn test_summary_uses_generator() {
    let generator = MockGenerator::replying("  Your kidney function is stable.\n");
    let app = test_app(Some(generator.clone()));

    let (status, body) = request(&app, post("/avs/summary", scenario_record())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"], "Your kidney function is stable.");

    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 1);
    assert_eq!(body["prompt"], prompts[0].as_str());
    assert!(prompts[0].contains("- BP Reading: 150/90"));
}

#[tokio::test]
async fn test_summary_without_generator() {
    let app = test_app(None);
    let (status, body) = request(&app, post("/avs/summary", scenario_record())).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "unavailable");
}

#[tokio::test]
async fn test_summary_upstream_failure() {
    let app = test_app(Some(MockGenerator::failing()));
    let (status, body) = request(&app, post("/avs/summary", scenario_record())).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "upstream_error");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("model overloaded"));
    assert!(body.get("summary").is_none());

    // The server keeps serving after a failed call
    let (status, _) = request(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_free_text_passes_command_verbatim() {
    let generator = MockGenerator::replying("Summary from command.");
    let app = test_app(Some(generator.clone()));

    let command = "Write an AVS for CKD stage IV with worsening trend.";
    let (status, body) = request(&app, post("/avs/free-text", json!({"command": command}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"], "Summary from command.");
    assert_eq!(generator.prompts(), vec![command.to_string()]);

    let (status, _) = request(&app, post("/avs/free-text", json!({"command": "   "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_pdf_export() {
    let app = test_app(None);
    let response = app
        .clone()
        .oneshot(post(
            "/avs/pdf",
            json!({"summary": "Your kidney function is stable.\nKeep a low salt diet."}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "application/pdf");
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment; filename=\"AVS_Summary.pdf\""
    );

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.starts_with(b"%PDF"));

    let (status, _) = request(&app, post("/avs/pdf", json!({"summary": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_print_view() {
    let app = test_app(None);
    let response = app
        .clone()
        .oneshot(post("/avs/print", json!({"summary": "Line one\nLine <two>"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("<div id=\"printable\">"));
    assert!(html.contains("Line one<br>\nLine &lt;two&gt;"));
}

#[tokio::test]
async fn test_auth() {
    let app = test_app(None);

    // No API key → 401
    let req = Request::builder()
        .method("POST")
        .uri("/avs/prompt")
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_vec(&scenario_record()).unwrap()))
        .unwrap();
    let (status, body) = request(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "unauthorized");

    // Wrong API key → 401
    let req = Request::builder()
        .method("POST")
        .uri("/avs/prompt")
        .header("Content-Type", "application/json")
        .header("X-API-Key", "wrong-key")
        .body(Body::from(serde_json::to_vec(&scenario_record()).unwrap()))
        .unwrap();
    let (status, _) = request(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Correct API key → 200
    let (status, _) = request(&app, post("/avs/prompt", scenario_record())).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = test_app(None);

    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .header("X-Request-ID", "req-123")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-123");

    let response = app.clone().oneshot(get("/health")).await.unwrap();
    let generated = response.headers()["x-request-id"].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(generated).is_ok());
}

#[tokio::test]
async fn test_rate_limit() {
    let mut config = test_config();
    config.rate_limit_rps = 1;
    let app = avs_server::build_app(&config, None);

    let (status, _) = request(&app, post("/avs/prompt", scenario_record())).await;
    assert_eq!(status, StatusCode::OK);

    let response = app
        .clone()
        .oneshot(post("/avs/prompt", scenario_record()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key("retry-after"));

    // Open routes are not throttled
    let (status, _) = request(&app, get("/avs/options")).await;
    assert_eq!(status, StatusCode::OK);
}
