//! Editing session — wires fragment edits through the debounced reactor to
//! the renderer and the save sink.
//!
//! One [`EditorSession`] per open project. Every setter records the edit
//! and signals two debouncers: a short one re-rendering the preview (300 ms
//! of quiescence by default) and a long one auto-saving (30 s). Both always
//! fire with the fragments as they are at fire time, so rapid typing
//! produces one render from the final state, not a render per keystroke.
//!
//! ## Example
//!
//! ```
//! use std::sync::mpsc;
//! use std::time::Duration;
//! use codepod::editor::{EditorConfig, EditorSession};
//! use codepod::render::Fragments;
//!
//! let (tx, rx) = mpsc::channel();
//! let session = EditorSession::new(
//!     Fragments::default(),
//!     EditorConfig {
//!         preview_window: Duration::from_millis(20),
//!         autosave_window: Duration::from_secs(30),
//!     },
//!     move |rendering| { tx.send(rendering).unwrap(); },
//!     |_fragments| {},
//! );
//!
//! session.set_markup("<h1>Hi</h1>");
//! let rendering = rx.recv_timeout(Duration::from_secs(2)).unwrap();
//! assert!(rendering.document.contains("<h1>Hi</h1>"));
//! session.close();
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::reactor::Debouncer;
use crate::render::{Fragments, Renderer, Rendering};

/// Default quiescence before the preview re-renders.
pub const PREVIEW_QUIESCENCE: Duration = Duration::from_millis(300);
/// Default quiescence before an auto-save.
pub const AUTOSAVE_QUIESCENCE: Duration = Duration::from_secs(30);

/// Quiescence windows for an editing session.
#[derive(Debug, Clone, Copy)]
pub struct EditorConfig {
    pub preview_window: Duration,
    pub autosave_window: Duration,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            preview_window: PREVIEW_QUIESCENCE,
            autosave_window: AUTOSAVE_QUIESCENCE,
        }
    }
}

/// A live editing session over one project's fragments.
///
/// Holds the authoritative fragment state; the preview and auto-save sinks
/// only ever see debounced snapshots of it. `close` tears both reactors
/// down — a closed session cannot render or save afterwards.
pub struct EditorSession {
    fragments: Arc<Mutex<Fragments>>,
    preview: Debouncer<Fragments>,
    autosave: Debouncer<Fragments>,
}

impl EditorSession {
    /// Open a session. `on_render` receives each superseding preview
    /// rendering; `on_save` receives the fragments to persist.
    ///
    /// Rendering happens inside the preview reactor with a session-owned
    /// [`Renderer`], so renders stay totally ordered even though the sink
    /// runs off the editing thread.
    pub fn new<R, S>(initial: Fragments, config: EditorConfig, mut on_render: R, mut on_save: S) -> Self
    where
        R: FnMut(Rendering) + Send + 'static,
        S: FnMut(Fragments) + Send + 'static,
    {
        let mut renderer = Renderer::new();
        let preview = Debouncer::new(config.preview_window, move |fragments: Fragments| {
            on_render(renderer.render(&fragments));
        });
        let autosave = Debouncer::new(config.autosave_window, move |fragments: Fragments| {
            on_save(fragments);
        });

        EditorSession {
            fragments: Arc::new(Mutex::new(initial)),
            preview,
            autosave,
        }
    }

    /// Open a session with the default 300 ms / 30 s windows.
    pub fn open<R, S>(initial: Fragments, on_render: R, on_save: S) -> Self
    where
        R: FnMut(Rendering) + Send + 'static,
        S: FnMut(Fragments) + Send + 'static,
    {
        Self::new(initial, EditorConfig::default(), on_render, on_save)
    }

    pub fn set_markup(&self, markup: impl Into<String>) {
        self.edit(|f| f.markup = markup.into());
    }

    pub fn set_style(&self, style: impl Into<String>) {
        self.edit(|f| f.style = style.into());
    }

    pub fn set_script(&self, script: impl Into<String>) {
        self.edit(|f| f.script = script.into());
    }

    /// Current fragment state.
    pub fn fragments(&self) -> Fragments {
        self.fragments
            .lock()
            .map(|f| f.clone())
            .unwrap_or_default()
    }

    /// Close the session. Pending renders and saves are discarded; after
    /// this returns, neither sink fires again.
    pub fn close(self) {
        self.preview.cancel();
        self.autosave.cancel();
    }

    // The lock is held across both signals: mutate-and-signal is one
    // critical section, so concurrent setters cannot signal out of order
    // and leave a stale snapshot as the trailing state.
    fn edit(&self, mutate: impl FnOnce(&mut Fragments)) {
        let Ok(mut fragments) = self.fragments.lock() else {
            return;
        };
        mutate(&mut fragments);
        let snapshot = fragments.clone();
        self.preview.signal(snapshot.clone());
        self.autosave.signal(snapshot);
    }
}
