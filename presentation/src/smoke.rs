use reqwest::Client;
use serde_json::{json, Value};
use shared::types::Result;
use shared::utils::preview;
use std::time::Duration;

pub const SAMPLE_QUESTION: &str = "What are my rights if I'm arrested?";
const PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: &'static str,
    pub passed: bool,
    pub detail: String,
}

impl CheckResult {
    fn pass(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            passed: true,
            detail: detail.into(),
        }
    }

    fn fail(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            passed: false,
            detail: detail.into(),
        }
    }
}

/// Smoke test for a running answer server, covering the routes the web UI
/// and the Android client depend on.
pub struct ApiChecker {
    client: Client,
    base_url: String,
}

impl ApiChecker {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn run_all(&self) -> Vec<CheckResult> {
        let mut results = vec![self.check_health().await];
        if !results[0].passed {
            // Nothing else can pass without a reachable server.
            return results;
        }
        results.push(
            self.check_answer("generate", "/generate", json!({ "prompt": SAMPLE_QUESTION }))
                .await,
        );
        results.push(
            self.check_answer(
                "chat",
                "/api/chat",
                json!({ "message": SAMPLE_QUESTION, "language": "english" }),
            )
            .await,
        );
        results
    }

    async fn check_health(&self) -> CheckResult {
        const NAME: &str = "server";
        let url = format!("{}/", self.base_url);
        match self.client.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => {
                CheckResult::pass(NAME, format!("reachable at {}", self.base_url))
            }
            Ok(resp) => CheckResult::fail(NAME, format!("responded with status {}", resp.status())),
            Err(err) => CheckResult::fail(NAME, format!("cannot connect: {err}")),
        }
    }

    async fn check_answer(&self, name: &'static str, path: &str, body: Value) -> CheckResult {
        let url = format!("{}{}", self.base_url, path);
        let resp = match self.client.post(&url).json(&body).send().await {
            Ok(resp) => resp,
            Err(err) => return CheckResult::fail(name, format!("request failed: {err}")),
        };
        let status = resp.status();
        if !status.is_success() {
            return CheckResult::fail(name, format!("{path} failed with status {status}"));
        }
        match resp.json::<Value>().await {
            Ok(value) => match value.get("response").and_then(Value::as_str) {
                Some(text) => CheckResult::pass(name, preview(text, PREVIEW_CHARS)),
                None => CheckResult::fail(name, format!("{path} response has no `response` field")),
            },
            Err(err) => CheckResult::fail(name, format!("{path} returned invalid JSON: {err}")),
        }
    }
}
