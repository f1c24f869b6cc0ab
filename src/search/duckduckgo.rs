//! DuckDuckGo HTML search.

use super::{SearchClient, SearchHit};
use crate::config::SearchSettings;
use crate::error::{Result, ScriptcastError};
use async_trait::async_trait;
use html2text::render::text_renderer::TrivialDecorator;
use regex::Regex;
use std::time::Duration;
use tracing::{debug, instrument};

const ENDPOINT: &str = "https://html.duckduckgo.com/html/";
const USER_AGENT: &str = concat!("scriptcast/", env!("CARGO_PKG_VERSION"));

/// Search client backed by the DuckDuckGo HTML endpoint.
pub struct DuckDuckGoSearch {
    http: reqwest::Client,
    region: String,
    parser: ResultParser,
}

impl DuckDuckGoSearch {
    /// Create a client from the search settings.
    pub fn new(settings: &SearchSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ScriptcastError::Search(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            region: settings.region.clone(),
            parser: ResultParser::new()?,
        })
    }
}

#[async_trait]
impl SearchClient for DuckDuckGoSearch {
    #[instrument(skip(self), fields(region = %self.region))]
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let response = self
            .http
            .post(ENDPOINT)
            .form(&[("q", query), ("kl", self.region.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ScriptcastError::Search(format!(
                "DuckDuckGo returned HTTP {}",
                response.status()
            )));
        }

        let html = response.text().await?;
        let hits = self.parser.parse(&html, limit);
        debug!("DuckDuckGo returned {} hits", hits.len());
        Ok(hits)
    }

    fn name(&self) -> &str {
        "duckduckgo"
    }
}

/// Wrap width handed to html2text. Wide enough that fragments stay on one line.
const TEXT_WIDTH: usize = 10_000;

/// Extracts results from the DuckDuckGo HTML page.
///
/// Each `result` block is parsed on its own so a title, link and snippet
/// always come from the same result.
struct ResultParser {
    block: Regex,
    anchor: Regex,
    href: Regex,
    snippet: Regex,
}

impl ResultParser {
    fn new() -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern)
                .map_err(|e| ScriptcastError::Search(format!("Invalid regex: {}", e)))
        };

        Ok(Self {
            block: compile(r#"<div[^>]*class="[^"]*\bresult\b[^"]*""#)?,
            anchor: compile(r#"(?s)<a([^>]*class="result__a"[^>]*)>(.*?)</a>"#)?,
            href: compile(r#"href="([^"]*)""#)?,
            snippet: compile(
                r#"(?s)<(?:a|div|td)[^>]*class="result__snippet"[^>]*>(.*?)</(?:a|div|td)>"#,
            )?,
        })
    }

    fn parse(&self, html: &str, limit: usize) -> Vec<SearchHit> {
        let starts: Vec<usize> = self.block.find_iter(html).map(|m| m.start()).collect();

        starts
            .iter()
            .enumerate()
            .map(|(i, &start)| {
                let end = starts.get(i + 1).copied().unwrap_or(html.len());
                &html[start..end]
            })
            .filter_map(|block| self.parse_block(block))
            .take(limit)
            .collect()
    }

    fn parse_block(&self, block: &str) -> Option<SearchHit> {
        let anchor = self.anchor.captures(block)?;
        let raw_href = self.href.captures(&anchor[1])?.get(1)?.as_str();
        let url = resolve_redirect(raw_href)?;
        let snippet = self
            .snippet
            .captures(block)
            .map(|caps| html_to_text(&caps[1]))
            .unwrap_or_default();

        Some(SearchHit {
            title: html_to_text(&anchor[2]),
            url,
            snippet,
        })
    }
}

/// Render an HTML fragment as plain text on a single line.
fn html_to_text(fragment: &str) -> String {
    let text = html2text::from_read_with_decorator(
        fragment.as_bytes(),
        TEXT_WIDTH,
        TrivialDecorator::new(),
    );
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Unwrap DuckDuckGo `/l/?uddg=` redirect links. Ad links yield `None`.
fn resolve_redirect(href: &str) -> Option<String> {
    let href = html_to_text(href);
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href
    };

    let parsed = url::Url::parse(&absolute).ok()?;
    if parsed.path().starts_with("/y.js") {
        return None;
    }

    if parsed.domain().is_some_and(|d| d.ends_with("duckduckgo.com")) {
        return parsed
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, value)| value.into_owned());
    }

    Some(absolute)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
<div class="result results_links results_links_deep web-result">
  <h2 class="result__title">
    <a rel="nofollow" class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.iea.org%2Freports%2Frenewables&amp;rut=abc">Renewables &amp; <b>Energy</b> 2024</a>
  </h2>
  <a class="result__snippet" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.iea.org">Global <b>renewable</b> capacity
     grew by 50%.</a>
</div>
<div class="result results_links web-result">
  <h2 class="result__title">
    <a rel="nofollow" class="result__a" href="https://en.wikipedia.org/wiki/Renewable_energy">Renewable energy - Wikipedia</a>
  </h2>
  <a class="result__snippet" href="https://en.wikipedia.org/wiki/Renewable_energy">Energy from &quot;renewable&quot; resources.</a>
</div>
"#;

    #[test]
    fn test_parse_results() {
        let parser = ResultParser::new().unwrap();
        let hits = parser.parse(SAMPLE, 10);

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "Renewables & Energy 2024");
        assert_eq!(hits[0].url, "https://www.iea.org/reports/renewables");
        assert_eq!(hits[0].snippet, "Global renewable capacity grew by 50%.");
        assert_eq!(hits[1].url, "https://en.wikipedia.org/wiki/Renewable_energy");
        assert_eq!(hits[1].snippet, "Energy from \"renewable\" resources.");
    }

    #[test]
    fn test_parse_respects_limit() {
        let parser = ResultParser::new().unwrap();
        assert_eq!(parser.parse(SAMPLE, 1).len(), 1);
        assert!(parser.parse("<html><body>No results.</body></html>", 5).is_empty());
    }

    #[test]
    fn test_snippet_stays_with_its_result() {
        let html = r#"
<div class="result results_links web-result">
  <h2 class="result__title"><a class="result__a" href="https://a.example/">Result A</a></h2>
</div>
<div class="result results_links web-result">
  <h2 class="result__title"><a class="result__a" href="https://b.example/">Result B</a></h2>
  <a class="result__snippet" href="https://b.example/">Snippet about B</a>
</div>
"#;
        let hits = ResultParser::new().unwrap().parse(html, 10);

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "Result A");
        assert_eq!(hits[0].snippet, "");
        assert_eq!(hits[1].title, "Result B");
        assert_eq!(hits[1].snippet, "Snippet about B");
    }

    #[test]
    fn test_ad_block_does_not_shift_snippets() {
        let html = r#"
<div class="result results_links result--ad">
  <a class="result__a" href="https://duckduckgo.com/y.js?ad_domain=shop.example">Buy now</a>
  <a class="result__snippet" href="https://duckduckgo.com/y.js">Ad copy</a>
</div>
<div class="result results_links web-result">
  <a class="result__a" href="https://c.example/">Result C</a>
  <a class="result__snippet" href="https://c.example/">Snippet about C</a>
</div>
"#;
        let hits = ResultParser::new().unwrap().parse(html, 10);

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].snippet, "Snippet about C");
    }

    #[test]
    fn test_html_to_text_decodes_entities() {
        assert_eq!(
            html_to_text("It&#8217;s 50&#x2F;50 &hellip;"),
            "It\u{2019}s 50/50 \u{2026}"
        );
        assert_eq!(html_to_text("Caf&eacute; <b>guide</b>\n  2024"), "Caf\u{e9} guide 2024");
    }

    #[test]
    fn test_resolve_redirect_skips_ads() {
        assert_eq!(
            resolve_redirect("https://duckduckgo.com/y.js?ad_domain=example.com"),
            None
        );
        assert_eq!(
            resolve_redirect("https://example.com/page").as_deref(),
            Some("https://example.com/page")
        );
    }
}
