//! Shared fixtures for playground tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use codepod::gateway::{Clock, ProjectStore};
use codepod::snippet::SnippetDraft;
use codepod::store::InMemoryStore;

/// Manually advanced clock so timestamps are deterministic.
pub struct TestClock(AtomicU64);

impl TestClock {
    pub fn advance(&self, ms: u64) {
        self.0.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for TestClock {
    fn now_ms(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Gateway over a fresh in-memory store and a test clock starting at 1s.
pub fn gateway() -> (ProjectStore<InMemoryStore>, Arc<TestClock>, InMemoryStore) {
    let clock = Arc::new(TestClock(AtomicU64::new(1_000)));
    let store = InMemoryStore::new();
    let gateway = ProjectStore::with_clock(store.clone(), clock.clone());
    (gateway, clock, store)
}

pub fn demo_draft() -> SnippetDraft {
    SnippetDraft {
        title: Some("Demo".into()),
        markup: Some("<h1>Hi</h1>".into()),
        style: Some(String::new()),
        script: Some("throw new Error('x')".into()),
        is_public: Some(true),
        ..Default::default()
    }
}
