// HTTP client for a Nitter mirror.
//
// Nitter serves each profile's timeline as plain HTML at `/{handle}`, with
// every post body inside a `<div class="tweet-content">`. There's no API, so
// the page is fetched with a browser user agent and scraped.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{StatusCode, Url};
use scraper::{Html, Selector};
use tracing::{debug, info, warn};

/// Default mirror host.
pub const DEFAULT_MIRROR_URL: &str = "https://nitter.net";

/// Default request timeout in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Default number of posts fetched per handle.
pub const DEFAULT_POST_COUNT: usize = 5;

/// Mirrors tend to reject obvious bot user agents.
const USER_AGENT: &str = "Mozilla/5.0";

/// CSS selector for a post body on a Nitter timeline page.
const POST_SELECTOR: &str = "div.tweet-content";

/// Client for a single Nitter mirror.
pub struct NitterClient {
    client: reqwest::Client,
    base_url: String,
}

impl NitterClient {
    /// Create a client for the mirror at `base_url`, applying `timeout` to
    /// every request.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch up to `count` posts for `handle`, newest first as the mirror
    /// lists them.
    ///
    /// Never fails: network errors, non-200 responses and pages without
    /// posts all come back as an empty list, so callers can't tell a missing
    /// account from a failed fetch.
    pub async fn fetch_posts(&self, handle: &str, count: usize) -> Vec<String> {
        match self.try_fetch_posts(handle, count).await {
            Ok(posts) => posts,
            Err(e) => {
                warn!(error = %format!("{e:#}"), handle = handle, "Error fetching posts");
                Vec::new()
            }
        }
    }

    /// The fallible half of `fetch_posts`.
    pub async fn try_fetch_posts(&self, handle: &str, count: usize) -> Result<Vec<String>> {
        let handle = normalize_handle(handle);
        if handle.is_empty() || count == 0 {
            return Ok(Vec::new());
        }

        let url = self.profile_url(handle)?;
        debug!(url = %url, "Fetching mirror timeline");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Mirror request failed for @{handle}"))?;

        let status = response.status();
        if status != StatusCode::OK {
            anyhow::bail!("Mirror returned {status} for @{handle}");
        }

        let body = response
            .text()
            .await
            .context("Failed to read mirror response body")?;

        let posts = extract_posts(&body, count);

        info!(count = posts.len(), handle = handle, "Collected posts from mirror");

        Ok(posts)
    }

    /// `{base}/{handle}`, with the handle encoded as a single path segment.
    fn profile_url(&self, handle: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .with_context(|| format!("Invalid mirror URL: {}", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Mirror URL cannot carry a path: {}", self.base_url))?
            .pop_if_empty()
            .push(handle);
        Ok(url)
    }
}

/// Strip surrounding whitespace and one leading `@`.
pub fn normalize_handle(handle: &str) -> &str {
    let handle = handle.trim();
    handle.strip_prefix('@').unwrap_or(handle).trim()
}

/// Pull post texts out of a timeline page.
///
/// Looks at the first `count` post bodies only; bodies with no text (media
/// only posts) are dropped rather than replaced, so fewer than `count` posts
/// can come back. Each text node is trimmed and the pieces are concatenated
/// without a separator.
pub fn extract_posts(html: &str, count: usize) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse(POST_SELECTOR) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .take(count)
        .map(|element| element.text().map(str::trim).collect::<String>())
        .filter(|text| !text.is_empty())
        .collect()
}
