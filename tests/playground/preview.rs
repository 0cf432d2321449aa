//! Preview rendering over persisted snippets.

use codepod::render::{Fragments, Renderer};

use crate::support::{demo_draft, gateway};

#[test]
fn stored_snippet_renders_round_trip() {
    let (gw, _, _) = gateway();
    let saved = gw.save("alice", demo_draft()).unwrap();

    let loaded = gw.get(&saved.id).unwrap();
    let mut renderer = Renderer::new();
    let rendering = renderer.render(&Fragments::from(&loaded));

    assert!(rendering.document.contains("<h1>Hi</h1>"));
    assert!(rendering.document.contains("throw new Error('x')"));
}

#[test]
fn rendering_a_fork_matches_rendering_its_source() {
    let (gw, _, _) = gateway();
    let source = gw.save("alice", demo_draft()).unwrap();
    let fork = gw.fork(&source.id, "bob").unwrap();

    let mut renderer = Renderer::new();
    let source_doc = renderer.render(&Fragments::from(&source)).document;
    let fork_doc = renderer.render(&Fragments::from(&fork)).document;

    // Same fragments, same document — the fork differs only in metadata.
    assert_eq!(source_doc, fork_doc);
}

#[test]
fn rendering_never_touches_the_store() {
    let (gw, _, store) = gateway();
    let saved = gw.save("alice", demo_draft()).unwrap();

    let mut renderer = Renderer::new();
    for _ in 0..5 {
        renderer.render(&Fragments::from(&saved));
    }

    // Counters and timestamps in the store are untouched by rendering.
    use codepod::snippet::Snippet;
    use codepod::store::DocumentStore;
    let stored: Snippet = store.get(&saved.id).unwrap().unwrap();
    assert_eq!(stored, saved);
}
