pub mod catalog;
pub mod responses;

use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

use crate::models::common::{Config, TestRef};
use crate::runner::catalog::TestCatalog;
use crate::runner::responses::{
    COMPILE_ENDPOINT, LOAD_COMPILED_ENDPOINT, SIM_ENDPOINT, TEST_ENDPOINT, TESTS_ENDPOINT, TestRun,
    parse_simulation, parse_test_listing, parse_test_runs,
};
use crate::utils::retry::{RetryConfig, retry};

// HTTP client for the test-runner service
pub struct RunnerClient {
    http: Client,
    base_url: Url,
    tester_is_eoa: bool,
    retry_config: RetryConfig,
}

impl RunnerClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut base_url: Url = config
            .runner
            .url
            .parse()
            .with_context(|| format!("invalid runner URL {}", config.runner.url))?;
        // Keep any path prefix when joining endpoints
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.runner.timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url,
            tester_is_eoa: config.runner.tester_is_eoa,
            retry_config: RetryConfig::from(&config.retry),
        })
    }

    async fn get_json(&self, endpoint: &str) -> Result<Value> {
        let url = self.base_url.join(endpoint)?;
        let http = &self.http;
        let url = &url;
        retry(
            move || async move {
                let response = http.get(url.clone()).send().await?.error_for_status()?;
                Ok::<Value, anyhow::Error>(response.json::<Value>().await?)
            },
            &self.retry_config,
            endpoint,
        )
        .await
    }

    async fn post_json(&self, endpoint: &str, body: &Value) -> Result<Value> {
        let url = self.base_url.join(endpoint)?;
        let http = &self.http;
        let url = &url;
        retry(
            move || async move {
                let response = http
                    .post(url.clone())
                    .json(body)
                    .send()
                    .await?
                    .error_for_status()?;
                Ok::<Value, anyhow::Error>(response.json::<Value>().await?)
            },
            &self.retry_config,
            endpoint,
        )
        .await
    }

    pub async fn list_tests(&self) -> Result<TestCatalog> {
        let response = self.get_json(TESTS_ENDPOINT).await?;
        let catalog = TestCatalog::new(parse_test_listing(response)?);
        info!("Runner reported {} test source(s)", catalog.sources().len());
        Ok(catalog)
    }

    // Runs are returned in execution order; the last one is the test itself
    pub async fn run_test(&self, test: &TestRef) -> Result<Vec<TestRun>> {
        let body = json!({
            "tests": test.selector(),
            "options": { "testerIsEOA": self.tester_is_eoa }
        });
        info!("Running {}:{}", test.src, test.test);
        let response = self.post_json(TEST_ENDPOINT, &body).await?;
        Ok(parse_test_runs(response, test)?)
    }

    pub async fn compile(&self, src_dir: &str) -> Result<TestCatalog> {
        let body = json!({
            "input_dir": src_dir,
            "output_dir": format!("{}/out", src_dir)
        });
        info!("Compiling {}", src_dir);
        let response = self.post_json(COMPILE_ENDPOINT, &body).await?;
        if let Some(err) = response.get("Err") {
            warn!("Compilation reported an error: {}", err);
        }
        self.list_tests().await
    }

    pub async fn load_compiled(&self, src_dir: &str) -> Result<TestCatalog> {
        let body = json!({ "output_dir": format!("{}/out", src_dir) });
        info!("Loading compiled output of {}", src_dir);
        self.post_json(LOAD_COMPILED_ENDPOINT, &body).await?;
        self.list_tests().await
    }

    pub async fn simulate(&self, tx_hash: &str) -> Result<TestRun> {
        let body = json!({
            "hash": tx_hash,
            "in_place": false,
            "options": ["trace", "no_commit"]
        });
        info!("Simulating transaction {}", tx_hash);
        let response = self.post_json(SIM_ENDPOINT, &body).await?;
        Ok(parse_simulation(response)?)
    }
}
