//! Project Store Gateway — mediates all snippet persistence.
//!
//! Every mutation path goes through here, so the ownership and visibility
//! invariants are enforced once regardless of what the underlying store
//! allows. The store and clock are constructor-injected (no process-wide
//! singletons), which is also what makes the gateway testable against the
//! in-memory store and a manual clock.
//!
//! ## Example
//!
//! ```
//! use codepod::gateway::ProjectStore;
//! use codepod::snippet::SnippetDraft;
//! use codepod::store::InMemoryStore;
//!
//! let projects = ProjectStore::new(InMemoryStore::new());
//! let draft = SnippetDraft {
//!     title: Some("Demo".into()),
//!     ..Default::default()
//! };
//! let snippet = projects.save("user-1", draft).unwrap();
//! assert_eq!(projects.get(&snippet.id).unwrap().owner_id, "user-1");
//! ```

mod error;

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::snippet::{Snippet, SnippetDraft};
use crate::store::{Document, DocumentStore};

pub use error::GatewayError;

/// Millisecond clock, injected so tests control time.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Wall clock. The default.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// One actor's like on one snippet. Keyed `"{actor}_{snippet}"` so the
/// (actor, snippet) relation holds at most one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    pub id: String,
    pub actor_id: String,
    pub snippet_id: String,
    pub created_at: u64,
}

impl Like {
    fn key(actor_id: &str, snippet_id: &str) -> String {
        format!("{}_{}", actor_id, snippet_id)
    }
}

impl Document for Like {
    const COLLECTION: &'static str = "likes";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Result of a like toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeState {
    pub liked: bool,
    pub likes: u64,
}

/// The gateway: snippet CRUD, fork, like, and view operations against a
/// document store, with ownership and visibility policy applied here and
/// nowhere else.
pub struct ProjectStore<S: DocumentStore> {
    store: S,
    clock: Arc<dyn Clock>,
}

impl<S: DocumentStore> ProjectStore<S> {
    /// Gateway over `store`, stamping timestamps from the wall clock.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    /// Gateway with an injected clock (tests use a manual one).
    pub fn with_clock(store: S, clock: Arc<dyn Clock>) -> Self {
        ProjectStore { store, clock }
    }

    fn now(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Create or update a snippet on behalf of `actor_id`.
    ///
    /// A draft without an id (or with an id no document holds) creates;
    /// a draft naming an existing document merges onto it. Updates never
    /// overwrite `owner_id`, `created_at`, `fork_from`, or counters, and
    /// fail with `PermissionDenied` when the stored owner is someone else —
    /// the stored document is left untouched in that case.
    pub fn save(&self, actor_id: &str, draft: SnippetDraft) -> Result<Snippet, GatewayError> {
        let existing = match &draft.id {
            Some(id) => self.store.get::<Snippet>(id)?,
            None => None,
        };

        match existing {
            Some(mut current) => {
                draft.validate(true)?;
                if current.owner_id != actor_id {
                    warn!(
                        snippet = %current.id,
                        actor = %actor_id,
                        "save rejected: actor does not own snippet"
                    );
                    return Err(GatewayError::PermissionDenied(
                        "you can only update your own projects".into(),
                    ));
                }
                draft.apply_to(&mut current);
                current.updated_at = self.now();
                self.store.put(&current)?;
                debug!(snippet = %current.id, "snippet updated");
                Ok(current)
            }
            None => {
                draft.validate(false)?;
                let id = draft
                    .id
                    .clone()
                    .unwrap_or_else(|| Uuid::new_v4().to_string());
                let snippet = draft.into_snippet(id, actor_id, self.now());
                self.store.insert(&snippet)?;
                debug!(snippet = %snippet.id, owner = %actor_id, "snippet created");
                Ok(snippet)
            }
        }
    }

    /// Fetch a snippet by id.
    ///
    /// No visibility filtering here: owner-preview intentionally needs
    /// private reads, so callers apply `readable_by` themselves.
    pub fn get(&self, id: &str) -> Result<Snippet, GatewayError> {
        self.store
            .get::<Snippet>(id)?
            .ok_or_else(|| GatewayError::NotFound(id.to_string()))
    }

    /// All snippets owned by `actor_id`, most recently edited first.
    pub fn list_by_owner(&self, actor_id: &str) -> Result<Vec<Snippet>, GatewayError> {
        let mut snippets = self
            .store
            .find::<Snippet>(&|s| s.owner_id == actor_id)?;
        sort_by_recency(&mut snippets);
        Ok(snippets)
    }

    /// Up to `limit` public snippets, most recently edited first.
    ///
    /// Ordering is computed here: the store contract cannot guarantee
    /// compound filter + order without additional indexing.
    pub fn list_public(&self, limit: usize) -> Result<Vec<Snippet>, GatewayError> {
        let mut snippets = self.store.find::<Snippet>(&|s| s.is_public)?;
        sort_by_recency(&mut snippets);
        snippets.truncate(limit);
        Ok(snippets)
    }

    /// Delete a snippet. Owner only.
    ///
    /// The snippet's like documents are swept with it (orphaned likes are
    /// treated as deleted). Returns the deleted snippet so the caller can
    /// decrement the owner's snippet count.
    pub fn delete(&self, id: &str, actor_id: &str) -> Result<Snippet, GatewayError> {
        let snippet = self.get(id)?;
        if snippet.owner_id != actor_id {
            warn!(snippet = %id, actor = %actor_id, "delete rejected: actor does not own snippet");
            return Err(GatewayError::PermissionDenied(
                "you can only delete your own projects".into(),
            ));
        }

        self.store.delete::<Snippet>(id)?;
        for like in self.store.find::<Like>(&|l| l.snippet_id == id)? {
            self.store.delete::<Like>(&like.id)?;
        }
        debug!(snippet = %id, "snippet deleted");
        Ok(snippet)
    }

    /// Fork a snippet: copy its fragments under a new id owned by
    /// `actor_id`, then bump the source's fork counter.
    ///
    /// Private snippets can only be forked by their owner. The new snippet
    /// starts private with counters reset and `fork_from` pointing at the
    /// source. Creation and the counter increment are not one transaction;
    /// a failed increment is retried once and otherwise surfaced as a
    /// partial failure naming the fork that was created.
    pub fn fork(&self, id: &str, actor_id: &str) -> Result<Snippet, GatewayError> {
        let mut source = self.get(id)?;
        if !source.is_public && source.owner_id != actor_id {
            warn!(snippet = %id, actor = %actor_id, "fork rejected: source is private");
            return Err(GatewayError::PermissionDenied(
                "cannot fork a private project".into(),
            ));
        }

        let now = self.now();
        let fork = Snippet {
            id: Uuid::new_v4().to_string(),
            owner_id: actor_id.to_string(),
            title: format!("{} (Fork)", source.title),
            description: source.description.clone(),
            markup: source.markup.clone(),
            style: source.style.clone(),
            script: source.script.clone(),
            is_public: false,
            fork_from: Some(source.id.clone()),
            tags: source.tags.clone(),
            views: 0,
            likes: 0,
            forks: 0,
            created_at: now,
            updated_at: now,
        };
        self.store.insert(&fork)?;

        source.forks += 1;
        if let Err(first) = self.store.put(&source) {
            if self.store.put(&source).is_err() {
                return Err(GatewayError::Unavailable(format!(
                    "fork {} created but source fork count not updated: {}",
                    fork.id, first
                )));
            }
        }
        debug!(source = %id, fork = %fork.id, "snippet forked");
        Ok(fork)
    }

    /// Toggle `actor_id`'s like on a snippet.
    ///
    /// Idempotent per (actor, snippet): toggling twice restores the
    /// original state. The counter floors at zero and the edit timestamp
    /// is left alone — a like is not an edit.
    pub fn toggle_like(&self, id: &str, actor_id: &str) -> Result<LikeState, GatewayError> {
        let mut snippet = self.get(id)?;
        let like_id = Like::key(actor_id, id);

        let liked = match self.store.get::<Like>(&like_id)? {
            Some(_) => {
                self.store.delete::<Like>(&like_id)?;
                snippet.likes = snippet.likes.saturating_sub(1);
                false
            }
            None => {
                self.store.put(&Like {
                    id: like_id,
                    actor_id: actor_id.to_string(),
                    snippet_id: id.to_string(),
                    created_at: self.now(),
                })?;
                snippet.likes += 1;
                true
            }
        };
        self.store.put(&snippet)?;

        Ok(LikeState {
            liked,
            likes: snippet.likes,
        })
    }

    /// Record a read by `viewer` (possibly anonymous).
    ///
    /// Increments `views` by exactly one unless the viewer is the owner.
    /// Returns the snippet as stored after the increment.
    pub fn record_view(&self, id: &str, viewer: Option<&str>) -> Result<Snippet, GatewayError> {
        let mut snippet = self.get(id)?;
        if viewer != Some(snippet.owner_id.as_str()) {
            snippet.views += 1;
            self.store.put(&snippet)?;
        }
        Ok(snippet)
    }
}

/// Most recently edited first; ties broken by creation time, then id, so
/// listings are stable.
fn sort_by_recency(snippets: &mut [Snippet]) {
    snippets.sort_by(|a, b| {
        b.updated_at
            .cmp(&a.updated_at)
            .then(b.created_at.cmp(&a.created_at))
            .then(a.id.cmp(&b.id))
    });
}
