//! Field-level validation for snippet input.
//!
//! `SnippetDraft` is the partial shape accepted from callers (every field
//! optional). `validate` checks every constraint and reports one
//! `FieldError` per violation rather than stopping at the first, so UIs can
//! surface errors field-by-field. The validator is deterministic: no clock,
//! no randomness — ids and timestamps are supplied by the caller.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{
    Snippet, MAX_DESCRIPTION_LEN, MAX_FRAGMENT_LEN, MAX_TAGS, MAX_TAG_LEN, MAX_TITLE_LEN,
};

/// A single violated constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Validation failure enumerating every violated constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed:")?;
        for e in &self.errors {
            write!(f, " {}: {};", e.field, e.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Partial snippet input, as received from an editor or the REST surface.
///
/// Fragment fields accept the wire names `html` / `css` / `javascript`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnippetDraft {
    /// Present when updating an existing snippet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "html", default)]
    pub markup: Option<String>,
    #[serde(rename = "css", default)]
    pub style: Option<String>,
    #[serde(rename = "javascript", default)]
    pub script: Option<String>,
    #[serde(default)]
    pub is_public: Option<bool>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub fork_from: Option<String>,
}

impl SnippetDraft {
    /// Check every constraint, collecting one error per violated field.
    ///
    /// On create (`is_update == false`) an absent title is fine — it
    /// defaults to `"Untitled"` — but a present empty title is rejected
    /// either way.
    pub fn validate(&self, is_update: bool) -> Result<(), ValidationError> {
        let mut errors = Vec::new();

        if let Some(title) = &self.title {
            if title.is_empty() {
                errors.push(FieldError {
                    field: "title".into(),
                    message: "must not be empty".into(),
                });
            } else if title.chars().count() > MAX_TITLE_LEN {
                errors.push(FieldError {
                    field: "title".into(),
                    message: format!("must be at most {MAX_TITLE_LEN} characters"),
                });
            }
        }

        if let Some(description) = &self.description {
            if description.chars().count() > MAX_DESCRIPTION_LEN {
                errors.push(FieldError {
                    field: "description".into(),
                    message: format!("must be at most {MAX_DESCRIPTION_LEN} characters"),
                });
            }
        }

        for (field, fragment) in [
            ("html", &self.markup),
            ("css", &self.style),
            ("javascript", &self.script),
        ] {
            if let Some(text) = fragment {
                if text.chars().count() > MAX_FRAGMENT_LEN {
                    errors.push(FieldError {
                        field: field.into(),
                        message: format!("must be at most {MAX_FRAGMENT_LEN} characters"),
                    });
                }
            }
        }

        if let Some(tags) = &self.tags {
            if tags.len() > MAX_TAGS {
                errors.push(FieldError {
                    field: "tags".into(),
                    message: format!("at most {MAX_TAGS} tags allowed"),
                });
            }
            for (i, tag) in tags.iter().enumerate() {
                if tag.is_empty() {
                    errors.push(FieldError {
                        field: format!("tags[{i}]"),
                        message: "must not be empty".into(),
                    });
                } else if tag.chars().count() > MAX_TAG_LEN {
                    errors.push(FieldError {
                        field: format!("tags[{i}]"),
                        message: format!("must be at most {MAX_TAG_LEN} characters"),
                    });
                }
            }
        }

        // Updates never change the fork lineage.
        if is_update && self.fork_from.is_some() {
            errors.push(FieldError {
                field: "forkFrom".into(),
                message: "cannot be changed after creation".into(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { errors })
        }
    }

    /// Build a fresh snippet from this draft, applying defaults.
    ///
    /// Callers validate first; `id`, `owner_id` and the timestamp are theirs
    /// to supply (the gateway stamps them so this stays pure).
    pub fn into_snippet(self, id: impl Into<String>, owner_id: impl Into<String>, now_ms: u64) -> Snippet {
        Snippet {
            id: id.into(),
            owner_id: owner_id.into(),
            title: self.title.unwrap_or_else(|| "Untitled".into()),
            description: self.description.unwrap_or_default(),
            markup: self.markup.unwrap_or_default(),
            style: self.style.unwrap_or_default(),
            script: self.script.unwrap_or_default(),
            is_public: self.is_public.unwrap_or(true),
            fork_from: self.fork_from,
            tags: self.tags.unwrap_or_default(),
            views: 0,
            likes: 0,
            forks: 0,
            created_at: now_ms,
            updated_at: now_ms,
        }
    }

    /// Merge the draft's present fields onto an existing snippet.
    ///
    /// Identity fields (`id`, `owner_id`, `fork_from`, `created_at`) and
    /// counters are never touched; the caller stamps `updated_at`.
    pub fn apply_to(&self, existing: &mut Snippet) {
        if let Some(title) = &self.title {
            existing.title = title.clone();
        }
        if let Some(description) = &self.description {
            existing.description = description.clone();
        }
        if let Some(markup) = &self.markup {
            existing.markup = markup.clone();
        }
        if let Some(style) = &self.style {
            existing.style = style.clone();
        }
        if let Some(script) = &self.script {
            existing.script = script.clone();
        }
        if let Some(is_public) = self.is_public {
            existing.is_public = is_public;
        }
        if let Some(tags) = &self.tags {
            existing.tags = tags.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_draft_is_valid_on_create() {
        assert!(SnippetDraft::default().validate(false).is_ok());
    }

    #[test]
    fn defaults_applied_on_create() {
        let snippet = SnippetDraft::default().into_snippet("s1", "u1", 42);
        assert_eq!(snippet.title, "Untitled");
        assert!(snippet.is_public);
        assert!(snippet.markup.is_empty());
        assert_eq!(snippet.views, 0);
        assert_eq!(snippet.created_at, 42);
        assert_eq!(snippet.updated_at, 42);
    }

    #[test]
    fn empty_title_rejected() {
        let draft = SnippetDraft {
            title: Some(String::new()),
            ..Default::default()
        };
        let err = draft.validate(false).unwrap_err();
        assert_eq!(err.errors.len(), 1);
        assert_eq!(err.errors[0].field, "title");
    }

    #[test]
    fn overlong_fields_rejected_per_field() {
        let draft = SnippetDraft {
            title: Some("t".repeat(MAX_TITLE_LEN + 1)),
            description: Some("d".repeat(MAX_DESCRIPTION_LEN + 1)),
            markup: Some("m".repeat(MAX_FRAGMENT_LEN + 1)),
            style: Some("s".repeat(MAX_FRAGMENT_LEN + 1)),
            script: Some("j".repeat(MAX_FRAGMENT_LEN + 1)),
            ..Default::default()
        };
        let err = draft.validate(false).unwrap_err();
        let fields: Vec<&str> = err.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "description", "html", "css", "javascript"]);
    }

    #[test]
    fn fragment_at_limit_accepted() {
        let draft = SnippetDraft {
            markup: Some("m".repeat(MAX_FRAGMENT_LEN)),
            ..Default::default()
        };
        assert!(draft.validate(false).is_ok());
    }

    #[test]
    fn tag_limits() {
        let draft = SnippetDraft {
            tags: Some(vec!["ok".into(), String::new(), "x".repeat(MAX_TAG_LEN + 1)]),
            ..Default::default()
        };
        let err = draft.validate(false).unwrap_err();
        let fields: Vec<&str> = err.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["tags[1]", "tags[2]"]);

        let too_many = SnippetDraft {
            tags: Some((0..=MAX_TAGS).map(|i| format!("t{i}")).collect()),
            ..Default::default()
        };
        let err = too_many.validate(false).unwrap_err();
        assert_eq!(err.errors[0].field, "tags");
    }

    #[test]
    fn fork_from_immutable_on_update() {
        let draft = SnippetDraft {
            fork_from: Some("other".into()),
            ..Default::default()
        };
        assert!(draft.validate(false).is_ok());
        let err = draft.validate(true).unwrap_err();
        assert_eq!(err.errors[0].field, "forkFrom");
    }

    #[test]
    fn validation_is_deterministic() {
        let draft = SnippetDraft {
            title: Some(String::new()),
            tags: Some(vec![String::new()]),
            ..Default::default()
        };
        assert_eq!(draft.validate(false), draft.validate(false));
    }

    #[test]
    fn apply_to_preserves_identity_and_counters() {
        let mut existing = SnippetDraft::default().into_snippet("s1", "u1", 10);
        existing.views = 7;
        existing.fork_from = Some("origin".into());

        let draft = SnippetDraft {
            title: Some("Renamed".into()),
            markup: Some("<p>new</p>".into()),
            is_public: Some(false),
            ..Default::default()
        };
        draft.apply_to(&mut existing);

        assert_eq!(existing.title, "Renamed");
        assert_eq!(existing.markup, "<p>new</p>");
        assert!(!existing.is_public);
        assert_eq!(existing.owner_id, "u1");
        assert_eq!(existing.views, 7);
        assert_eq!(existing.fork_from.as_deref(), Some("origin"));
        assert_eq!(existing.created_at, 10);
    }

    #[test]
    fn draft_parses_wire_names() {
        let draft: SnippetDraft = serde_json::from_value(serde_json::json!({
            "title": "Demo",
            "html": "<h1>Hi</h1>",
            "css": "h1 {}",
            "javascript": "1+1",
            "isPublic": false,
        }))
        .unwrap();
        assert_eq!(draft.markup.as_deref(), Some("<h1>Hi</h1>"));
        assert_eq!(draft.style.as_deref(), Some("h1 {}"));
        assert_eq!(draft.script.as_deref(), Some("1+1"));
        assert_eq!(draft.is_public, Some(false));
    }
}
