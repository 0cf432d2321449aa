//! CodePod — a live code playground engine.
//!
//! Users write HTML/CSS/JS snippets, watch an isolated live preview
//! recompute on every pause in typing, and persist projects to a
//! multi-tenant document store that enforces ownership and public/private
//! visibility.
//!
//! ## Components
//!
//! - [`snippet`] — the canonical project model plus pure validation.
//! - [`render`] — composes the three fragments into a fresh, isolated
//!   preview document per render; script failures stay inside the preview.
//! - [`reactor`] — debounces a rapid edit stream into a bounded-rate
//!   trigger stream.
//! - [`editor`] — one editing session: edits → debounced preview render
//!   and auto-save.
//! - [`gateway`] — all persistence, with ownership/visibility policy
//!   enforced in one place.
//! - [`store`] — the document store contract and an in-memory
//!   implementation.
//! - [`session`] — adapter over the external identity provider.
//! - `api` — axum REST surface (requires the `http` feature).

pub mod editor;
pub mod gateway;
pub mod reactor;
pub mod render;
pub mod session;
pub mod snippet;
pub mod store;

#[cfg(feature = "http")]
pub mod api;

pub use editor::{EditorConfig, EditorSession};
pub use gateway::{Clock, GatewayError, LikeState, ProjectStore, SystemClock};
pub use reactor::Debouncer;
pub use render::{compose_document, Fragments, Renderer, Rendering, SandboxPolicy};
pub use session::{Credentials, Identity, IdentityProvider, SessionError};
pub use snippet::{FieldError, Snippet, SnippetDraft, ValidationError};
pub use store::{Document, DocumentStore, InMemoryStore, StoreError};

#[cfg(feature = "emitter")]
pub use event_emitter_rs::EventEmitter;
