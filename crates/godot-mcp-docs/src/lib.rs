//! Best-effort lookup against the official Godot documentation.
//!
//! Two operations: describe a class (`lookup_class`) and search a topic
//! (`search`). Both always return a human-readable string; every failure
//! path (missing page, slow upstream, unparsable markup) degrades to a
//! descriptive message instead of an error.
//!
//! The HTTP and HTML dependencies sit behind the `fetch` feature (enabled
//! by default), mirroring how optional provider backends are gated
//! elsewhere in the workspace. Built without it, [`DocsClient`] answers
//! with an explanatory "not available" message and never touches the
//! network.

#[cfg(feature = "fetch")]
mod client;
#[cfg(feature = "fetch")]
pub use client::DocsClient;

#[cfg(not(feature = "fetch"))]
mod unavailable;
#[cfg(not(feature = "fetch"))]
pub use unavailable::DocsClient;

/// Base URL of the hosted documentation, stable channel.
pub const DEFAULT_BASE_URL: &str = "https://docs.godotengine.org/en/stable";
