//! The full product flow: create a snippet with a throwing script, preview
//! it, read it as another actor, and exercise the delete policy.

use std::sync::mpsc;
use std::time::Duration;

use codepod::editor::{EditorConfig, EditorSession};
use codepod::gateway::GatewayError;
use codepod::render::{Fragments, Renderer};
use codepod::snippet::SnippetDraft;

use crate::support::{demo_draft, gateway};

#[test]
fn demo_snippet_lifecycle() {
    let (gw, _, _) = gateway();

    // Create: {title: "Demo", markup: "<h1>Hi</h1>", script throws 'x'}.
    let snippet = gw.save("alice", demo_draft()).unwrap();
    assert!(snippet.is_public);
    assert_eq!(snippet.views, 0);

    // Render: the markup is present and the error plumbing wraps the
    // throwing script so the banner carries its message in the preview.
    let mut renderer = Renderer::new();
    let rendering = renderer.render(&Fragments::from(&snippet));
    assert!(rendering.document.contains("<h1>Hi</h1>"));
    assert!(rendering.document.contains("throw new Error('x')"));
    assert!(rendering.document.contains("JavaScript Error:"));

    // Read by a different actor: views go 0 → 1.
    let viewed = gw.record_view(&snippet.id, Some("bob")).unwrap();
    assert_eq!(viewed.views, 1);

    // Delete by that actor: denied; by the owner: gone.
    let err = gw.delete(&snippet.id, "bob").unwrap_err();
    assert!(matches!(err, GatewayError::PermissionDenied(_)));
    gw.delete(&snippet.id, "alice").unwrap();
    assert!(matches!(gw.get(&snippet.id), Err(GatewayError::NotFound(_))));
}

#[test]
fn edit_session_renders_then_autosaves() {
    let (gw, _, _) = gateway();
    let (render_tx, render_rx) = mpsc::channel();
    let (save_tx, save_rx) = mpsc::channel();

    let session = EditorSession::new(
        Fragments::default(),
        EditorConfig {
            preview_window: Duration::from_millis(20),
            autosave_window: Duration::from_millis(60),
        },
        move |rendering| {
            render_tx.send(rendering).unwrap();
        },
        move |fragments| {
            save_tx.send(fragments).unwrap();
        },
    );

    session.set_markup("<h1>Hello</h1>");
    session.set_script("console.log('ready')");

    // The preview settles on the final state...
    let rendering = render_rx.recv_timeout(Duration::from_secs(2)).unwrap();
    assert!(rendering.document.contains("<h1>Hello</h1>"));
    assert!(rendering.document.contains("console.log('ready')"));

    // ...and the auto-save snapshot persists through the gateway.
    let fragments = save_rx.recv_timeout(Duration::from_secs(2)).unwrap();
    let saved = gw
        .save(
            "alice",
            SnippetDraft {
                title: Some("Session".into()),
                markup: Some(fragments.markup.clone()),
                style: Some(fragments.style.clone()),
                script: Some(fragments.script.clone()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(saved.markup, "<h1>Hello</h1>");

    session.close();
}
