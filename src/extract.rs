use async_trait::async_trait;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::debug;

/// Content-extraction boundary used by the summary cache. `None` signals
/// unreachable or unparsable content; the caller decides how to surface that.
#[async_trait]
pub trait ExtractContent: Send + Sync {
    async fn extract_text(&self, url: &str) -> Option<String>;
}

/// Fetches an article page and reduces it to readable text: paragraph,
/// heading and list-item content with whitespace collapsed. Script and style
/// blocks never match the selector, so they cannot leak into the output.
pub struct HtmlContentExtractor {
    client: reqwest::Client,
}

impl HtmlContentExtractor {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent("rss-translator/0.1")
            .timeout(Duration::from_secs(30))
            .gzip(true)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }
}

impl Default for HtmlContentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExtractContent for HtmlContentExtractor {
    async fn extract_text(&self, url: &str) -> Option<String> {
        debug!("Extracting article content from {}", url);

        let response = self.client.get(url).send().await.ok()?;
        if !response.status().is_success() {
            debug!("Content fetch returned HTTP {} for {}", response.status(), url);
            return None;
        }

        let body = response.text().await.ok()?;
        let text = readable_text(&body);
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

// Html is not Send, so parsing stays in a synchronous helper that finishes
// before the caller awaits anything else.
fn readable_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let selector = Selector::parse("p, h1, h2, h3, li").unwrap();

    let mut chunks = Vec::new();
    for element in document.select(&selector) {
        let text = element
            .text()
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        if !text.is_empty() {
            chunks.push(text);
        }
    }

    chunks.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_markup_and_collapses_whitespace() {
        let html = r#"
            <html><body>
              <h1>Big   News</h1>
              <p>First
                 paragraph.</p>
              <script>var tracking = true;</script>
              <style>p { color: red; }</style>
              <p>Second paragraph.</p>
            </body></html>
        "#;

        let text = readable_text(html);
        assert_eq!(text, "Big News First paragraph. Second paragraph.");
        assert!(!text.contains("tracking"));
        assert!(!text.contains("color"));
    }

    #[test]
    fn empty_document_yields_empty_text() {
        assert_eq!(readable_text("<html><body></body></html>"), "");
    }
}
