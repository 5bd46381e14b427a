use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use tracing::{info, warn};

use crate::settings::Settings;

const BASE_BACKOFF_MS: u64 = 2000;

/// A fetched page body plus the moment it was captured.
pub struct FetchedPage {
    pub url: String,
    pub body: String,
    pub captured_at: DateTime<Utc>,
}

pub fn client(settings: &Settings) -> Result<Client> {
    Client::builder()
        .user_agent(settings.user_agent.as_str())
        .timeout(settings.timeout())
        .build()
        .context("Failed to build HTTP client")
}

/// GET `url`, retrying rate limits and server errors with exponential backoff.
pub async fn fetch_page(client: &Client, url: &str, max_retries: u32) -> Result<FetchedPage> {
    let mut attempt = 0;
    loop {
        let start = Instant::now();
        let response = client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;
        let status = response.status();

        if status.is_success() {
            let body = response
                .text()
                .await
                .with_context(|| format!("Failed to read body of {}", url))?;
            let captured_at = Utc::now();
            let latency_ms = start.elapsed().as_millis() as i64;
            info!(url, status = status.as_u16(), latency_ms, "Fetched page");
            return Ok(FetchedPage {
                url: url.to_string(),
                body,
                captured_at,
            });
        }

        if !should_retry(status) || attempt == max_retries {
            bail!("{} returned HTTP {}", url, status);
        }

        let backoff = backoff_for(attempt);
        warn!(
            "HTTP {} from {} (attempt {}/{}), backing off {:.1}s",
            status,
            url,
            attempt + 1,
            max_retries,
            backoff.as_secs_f64()
        );
        tokio::time::sleep(backoff).await;
        attempt += 1;
    }
}

fn should_retry(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn backoff_for(attempt: u32) -> Duration {
    Duration::from_millis(BASE_BACKOFF_MS * 2u64.pow(attempt))
}
