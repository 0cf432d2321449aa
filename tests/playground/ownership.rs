//! Ownership and visibility policy, exercised the way concurrent request
//! handlers would: multiple gateways over one shared store.

use codepod::gateway::{GatewayError, ProjectStore};
use codepod::snippet::SnippetDraft;

use crate::support::{demo_draft, gateway};

#[test]
fn policy_holds_across_gateway_instances() {
    let (alice_gateway, clock, store) = gateway();
    // A second handler over the same store, as a separate request would see it.
    let bob_gateway = ProjectStore::with_clock(store, clock.clone());

    let snippet = alice_gateway.save("alice", demo_draft()).unwrap();

    // Bob reads what Alice wrote.
    assert_eq!(bob_gateway.get(&snippet.id).unwrap().title, "Demo");

    // Bob cannot overwrite it through his own gateway.
    let err = bob_gateway
        .save(
            "bob",
            SnippetDraft {
                id: Some(snippet.id.clone()),
                title: Some("Taken over".into()),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, GatewayError::PermissionDenied(_)));
    assert_eq!(alice_gateway.get(&snippet.id).unwrap().title, "Demo");
}

#[test]
fn visibility_toggle_is_owner_only() {
    let (gw, _, _) = gateway();
    let snippet = gw.save("alice", demo_draft()).unwrap();

    let err = gw
        .save(
            "bob",
            SnippetDraft {
                id: Some(snippet.id.clone()),
                is_public: Some(false),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, GatewayError::PermissionDenied(_)));

    let hidden = gw
        .save(
            "alice",
            SnippetDraft {
                id: Some(snippet.id.clone()),
                is_public: Some(false),
                ..Default::default()
            },
        )
        .unwrap();
    assert!(!hidden.is_public);
    assert!(!hidden.readable_by(Some("bob")));
    assert!(hidden.readable_by(Some("alice")));
}

#[test]
fn private_snippets_stay_out_of_public_listings() {
    let (gw, clock, _) = gateway();
    gw.save("alice", demo_draft()).unwrap();
    clock.advance(10);
    gw.save(
        "alice",
        SnippetDraft {
            is_public: Some(false),
            ..demo_draft()
        },
    )
    .unwrap();

    let public = gw.list_public(10).unwrap();
    assert_eq!(public.len(), 1);
    assert!(public[0].is_public);

    // The owner's own listing still shows both.
    assert_eq!(gw.list_by_owner("alice").unwrap().len(), 2);
}

#[test]
fn fork_lineage_and_counters() {
    let (gw, clock, _) = gateway();
    let source = gw.save("alice", demo_draft()).unwrap();

    clock.advance(10);
    let fork_one = gw.fork(&source.id, "bob").unwrap();
    clock.advance(10);
    let fork_two = gw.fork(&source.id, "carol").unwrap();

    assert_eq!(gw.get(&source.id).unwrap().forks, 2);
    assert_eq!(fork_one.fork_from.as_deref(), Some(source.id.as_str()));
    assert_eq!(fork_two.fork_from.as_deref(), Some(source.id.as_str()));

    // Forking a fork chains lineage rather than flattening it. A fork
    // starts private, so only its owner may fork it again.
    let err = gw.fork(&fork_one.id, "carol").unwrap_err();
    assert!(matches!(err, GatewayError::PermissionDenied(_)));
    let nested = gw.fork(&fork_one.id, "bob").unwrap();
    assert_eq!(nested.fork_from.as_deref(), Some(fork_one.id.as_str()));
}
