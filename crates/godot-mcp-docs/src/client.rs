//! HTTP/HTML client for the hosted class reference.
//!
//! The markup parsing mirrors the structure of the Sphinx-generated pages:
//! an `Inherits:` paragraph, then `description`, `properties`, `methods`
//! and `signals` sections. Every section is optional and independently
//! absent; partial documentation is valid output, not a failure.

use std::time::Duration;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use tracing::debug;

use crate::DEFAULT_BASE_URL;

/// Deadline for one documentation fetch.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Fixed rendering policy, matching the editor-facing contract.
const DESCRIPTION_LIMIT: usize = 1000;
const PROPERTY_ROWS: usize = 10;
const METHOD_ROWS: usize = 15;
const SIGNAL_ENTRIES: usize = 8;
const SEARCH_RESULTS: usize = 10;
const SNIPPET_LIMIT: usize = 200;

/// Best-effort client for the hosted Godot documentation.
///
/// All methods return a descriptive string on every path; they never fail.
#[derive(Debug, Clone)]
pub struct DocsClient {
    client: reqwest::Client,
    base_url: String,
}

impl DocsClient {
    /// Creates a client against the official stable-channel docs.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a client against an alternate base URL (used by tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Looks up the reference page for a class and summarizes it.
    ///
    /// A missing page ("check spelling"), a transport failure and a page
    /// whose sections could not be parsed each produce a distinct message.
    pub async fn lookup_class(&self, class_name: &str) -> String {
        let slug = class_name.to_lowercase().replace(' ', "");
        let url = format!("{}/classes/class_{}.html", self.base_url, slug);
        debug!(%url, "fetching class documentation");

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => return format!("Error fetching docs: {e}"),
        };
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return format!(
                "Class '{class_name}' not found in Godot documentation. Check spelling."
            );
        }
        if !response.status().is_success() {
            return format!("Error fetching docs: HTTP {}", response.status());
        }
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return format!("Error fetching docs: {e}"),
        };

        render_class_page(class_name, &url, &body)
    }

    /// Searches the documentation via its JSON search API.
    ///
    /// Any transport or parse failure falls back to pointing at the
    /// human-facing search page instead of failing hard.
    pub async fn search(&self, query: &str) -> String {
        let q = query.replace(' ', "+");
        let search_page = format!("{}/search.html?q={}", self.base_url, q);
        // The hosted docs render search results with JavaScript, so the
        // JSON API is the only scrapable entry point.
        let api_url = format!(
            "{}/_/api/v2/search/?q={}&project=godot&version=stable&language=en",
            self.base_url, q
        );
        debug!(%api_url, "searching documentation");

        let response = match self.client.get(&api_url).send().await {
            Ok(response) => match response.error_for_status() {
                Ok(response) => response,
                Err(e) => return format!("Error searching docs: {e}. Try: {search_page}"),
            },
            Err(e) => return format!("Error searching docs: {e}. Try: {search_page}"),
        };
        let data: Value = match response.json().await {
            Ok(data) => data,
            Err(_) => return format!("Could not parse search results. Try manually: {search_page}"),
        };

        let results = data
            .get("results")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        if results.is_empty() {
            return format!(
                "No results found for '{query}'. Try different keywords or visit: {search_page}"
            );
        }

        let mut out = vec![
            format!("# Search Results for '{query}'"),
            format!("Found {} results:\n", results.len()),
        ];
        for (i, item) in results.iter().take(SEARCH_RESULTS).enumerate() {
            let title = item
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or("Untitled");
            out.push(format!("**{}. {}**", i + 1, title));
            if let Some(path) = item.get("path").and_then(Value::as_str)
                && !path.is_empty()
            {
                out.push(format!(
                    "   URL: {}/{}",
                    self.base_url,
                    path.trim_start_matches('/')
                ));
            }
            let snippet = item
                .get("highlights")
                .and_then(|h| h.get("content"))
                .and_then(Value::as_array)
                .and_then(|entries| entries.first())
                .and_then(Value::as_str)
                .unwrap_or_default();
            if !snippet.is_empty() {
                let clean = truncate_chars(&strip_markup(snippet), SNIPPET_LIMIT);
                out.push(format!("   {clean}..."));
            }
            out.push(String::new());
        }
        out.join("\n")
    }
}

impl Default for DocsClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders the parsed sections of one class page.
///
/// Kept separate from the fetch so the parsing heuristics are testable
/// without a network stub.
fn render_class_page(class_name: &str, url: &str, html: &str) -> String {
    let document = Html::parse_document(html);
    let mut out = vec![
        format!("# {class_name} - Official Godot Documentation"),
        format!("Source: {url}\n"),
    ];

    if let Some(line) = inheritance_line(&document) {
        out.push(format!("**{line}**\n"));
    }

    if let Some(description) = first_paragraph(&document, "section#description p") {
        out.push("## Description".to_string());
        if description.chars().count() > DESCRIPTION_LIMIT {
            out.push(format!(
                "{}...\n",
                truncate_chars(&description, DESCRIPTION_LIMIT)
            ));
        } else {
            out.push(format!("{description}\n"));
        }
    }

    let properties = table_rows(&document, "section#properties table tr", PROPERTY_ROWS);
    if !properties.is_empty() {
        out.push("## Key Properties".to_string());
        for (kind, name) in properties {
            out.push(format!("- `{name}` ({kind})"));
        }
        out.push(String::new());
    }

    let methods = table_rows(&document, "section#methods table tr", METHOD_ROWS);
    if !methods.is_empty() {
        out.push("## Key Methods".to_string());
        for (return_type, signature) in methods {
            out.push(format!("- `{signature}` → {return_type}"));
        }
        out.push(String::new());
    }

    let signals = signal_entries(&document, SIGNAL_ENTRIES);
    if !signals.is_empty() {
        out.push("## Signals".to_string());
        for signal in signals {
            out.push(format!("- `{signal}`"));
        }
        out.push(String::new());
    }

    // Nothing parsed beyond the header: found but unparsable, which is
    // distinct from both a 404 and a transport error.
    if out.len() <= 3 {
        return format!("Documentation found but could not parse content. Visit: {url}");
    }
    out.join("\n")
}

/// The `Inherits: ...` paragraph near the top of a class page.
fn inheritance_line(document: &Html) -> Option<String> {
    let paragraphs = Selector::parse("p").ok()?;
    document
        .select(&paragraphs)
        .map(|p| element_text(p))
        .find(|text| text.contains("Inherits:"))
}

fn first_paragraph(document: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    document
        .select(&selector)
        .next()
        .map(|p| element_text(p))
        .filter(|text| !text.is_empty())
}

/// First `limit` two-cell rows of the first table matching `css`.
fn table_rows(document: &Html, css: &str, limit: usize) -> Vec<(String, String)> {
    let Ok(rows) = Selector::parse(css) else {
        return Vec::new();
    };
    let Ok(cells) = Selector::parse("td") else {
        return Vec::new();
    };
    document
        .select(&rows)
        .take(limit)
        .filter_map(|row| {
            let mut cells = row.select(&cells);
            let first = element_text(cells.next()?);
            let second = element_text(cells.next()?);
            Some((first, second))
        })
        .collect()
}

fn signal_entries(document: &Html, limit: usize) -> Vec<String> {
    let Ok(selector) = Selector::parse("section#signals dt.sig") else {
        return Vec::new();
    };
    document
        .select(&selector)
        .take(limit)
        .map(element_text)
        .collect()
}

/// Concatenated text of an element with whitespace collapsed.
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Removes markup tags (search highlight markers) from a snippet.
fn strip_markup(text: &str) -> String {
    match Regex::new(r"<[^>]+>") {
        Ok(re) => re.replace_all(text, "").into_owned(),
        Err(_) => text.to_string(),
    }
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
