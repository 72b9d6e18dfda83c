//! Stand-in used when the crate is built without the `fetch` feature.

const UNAVAILABLE: &str = "Error: documentation lookup is not available in this build. \
Reinstall godot-mcp with the 'fetch' feature enabled.";

/// Documentation client compiled without network support.
///
/// Keeps the same surface as the real client so callers need no feature
/// gates of their own; both operations answer with a fixed explanation.
#[derive(Debug, Clone, Default)]
pub struct DocsClient;

impl DocsClient {
    pub fn new() -> Self {
        Self
    }

    pub async fn lookup_class(&self, _class_name: &str) -> String {
        UNAVAILABLE.to_string()
    }

    pub async fn search(&self, _query: &str) -> String {
        UNAVAILABLE.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn both_operations_explain_the_missing_feature() {
        let docs = DocsClient::new();
        assert!(docs.lookup_class("Node").await.contains("'fetch' feature"));
        assert!(docs.search("shaders").await.contains("'fetch' feature"));
    }
}
