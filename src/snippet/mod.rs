//! Snippet — the canonical project model.
//!
//! A snippet is three independent source fragments (markup, style, script)
//! plus metadata: title, visibility, ownership, and counters. This module is
//! pure data and validation; persistence policy lives in [`crate::gateway`]
//! and rendering in [`crate::render`].
//!
//! ## Example
//!
//! ```
//! use codepod::snippet::SnippetDraft;
//!
//! let draft = SnippetDraft {
//!     title: Some("Demo".into()),
//!     markup: Some("<h1>Hi</h1>".into()),
//!     ..Default::default()
//! };
//! assert!(draft.validate(false).is_ok());
//! let snippet = draft.into_snippet("snip-1", "user-1", 1_700_000_000_000);
//! assert_eq!(snippet.title, "Demo");
//! assert!(snippet.is_public);
//! ```

mod validate;

use serde::{Deserialize, Serialize};

use crate::store::Document;

pub use validate::{FieldError, SnippetDraft, ValidationError};

/// Maximum length of a snippet title.
pub const MAX_TITLE_LEN: usize = 100;
/// Maximum length of a snippet description.
pub const MAX_DESCRIPTION_LEN: usize = 500;
/// Maximum length of each source fragment (markup, style, script).
pub const MAX_FRAGMENT_LEN: usize = 50_000;
/// Maximum number of tags per snippet.
pub const MAX_TAGS: usize = 10;
/// Maximum length of a single tag.
pub const MAX_TAG_LEN: usize = 20;

/// A persisted playground project.
///
/// The three fragments serialize as `html` / `css` / `javascript` to match
/// the wire shape of the REST interface. Timestamps are milliseconds since
/// the Unix epoch and are always supplied by the caller — constructing or
/// validating a snippet never reads the clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub id: String,
    /// Identifier of the actor that created the snippet. Immutable.
    #[serde(rename = "userId")]
    pub owner_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "html", default)]
    pub markup: String,
    #[serde(rename = "css", default)]
    pub style: String,
    #[serde(rename = "javascript", default)]
    pub script: String,
    pub is_public: bool,
    #[serde(default)]
    pub fork_from: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub forks: u64,
    /// Set once at creation, never mutated afterwards.
    pub created_at: u64,
    /// Stamped on every persisted edit. Counter adjustments do not bump it.
    pub updated_at: u64,
}

impl Snippet {
    /// Project the externally safe fields.
    ///
    /// Nothing in this domain is sensitive today; this is the single seam
    /// where future redaction would happen, so all read paths go through it.
    pub fn to_public_view(&self) -> serde_json::Value {
        // Serialization of Snippet cannot fail: no maps with non-string
        // keys, no non-finite floats.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Whether `actor` (possibly anonymous) may read this snippet.
    pub fn readable_by(&self, actor: Option<&str>) -> bool {
        self.is_public || actor == Some(self.owner_id.as_str())
    }
}

impl Document for Snippet {
    const COLLECTION: &'static str = "projects";

    fn id(&self) -> &str {
        &self.id
    }
}
