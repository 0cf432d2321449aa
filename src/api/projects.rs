//! Project route handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::gateway::ProjectStore;
use crate::snippet::{Snippet, SnippetDraft};
use crate::store::DocumentStore;

use super::envelope::{error_response, unauthorized, Envelope};
use super::actor_from_headers;

const DEFAULT_PAGE: usize = 1;
const DEFAULT_LIMIT: usize = 12;

/// `POST /api/projects`
pub(crate) async fn create<S: DocumentStore + 'static>(
    State(projects): State<Arc<ProjectStore<S>>>,
    headers: HeaderMap,
    Json(mut draft): Json<SnippetDraft>,
) -> Response {
    let Some(actor) = actor_from_headers(&headers) else {
        return unauthorized();
    };
    // Creation never targets an existing document.
    draft.id = None;

    match projects.save(&actor, draft) {
        Ok(snippet) => (
            StatusCode::CREATED,
            Json(Envelope::with_message(
                "Project created successfully",
                snippet.to_public_view(),
            )),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// `GET /api/projects/:id`
pub(crate) async fn get_one<S: DocumentStore + 'static>(
    State(projects): State<Arc<ProjectStore<S>>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let actor = actor_from_headers(&headers);

    let snippet = match projects.get(&id) {
        Ok(snippet) => snippet,
        Err(e) => return error_response(e),
    };
    if !snippet.readable_by(actor.as_deref()) {
        return (
            StatusCode::FORBIDDEN,
            Json(Envelope::error("Access denied. This project is private.")),
        )
            .into_response();
    }

    // Owner reads are skipped inside record_view.
    match projects.record_view(&id, actor.as_deref()) {
        Ok(viewed) => Json(Envelope::data(viewed.to_public_view())).into_response(),
        Err(e) => error_response(e),
    }
}

/// `PUT /api/projects/:id`
pub(crate) async fn update<S: DocumentStore + 'static>(
    State(projects): State<Arc<ProjectStore<S>>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(mut draft): Json<SnippetDraft>,
) -> Response {
    let Some(actor) = actor_from_headers(&headers) else {
        return unauthorized();
    };

    // PUT updates; it must not create under a caller-chosen id.
    if let Err(e) = projects.get(&id) {
        return error_response(e);
    }
    draft.id = Some(id);

    match projects.save(&actor, draft) {
        Ok(snippet) => Json(Envelope::with_message(
            "Project updated successfully",
            snippet.to_public_view(),
        ))
        .into_response(),
        Err(e) => error_response(e),
    }
}

/// `DELETE /api/projects/:id`
pub(crate) async fn remove<S: DocumentStore + 'static>(
    State(projects): State<Arc<ProjectStore<S>>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let Some(actor) = actor_from_headers(&headers) else {
        return unauthorized();
    };

    match projects.delete(&id, &actor) {
        Ok(_) => Json(Envelope::with_message(
            "Project deleted successfully",
            json!(null),
        ))
        .into_response(),
        Err(e) => error_response(e),
    }
}

/// `POST /api/projects/:id/fork`
pub(crate) async fn fork<S: DocumentStore + 'static>(
    State(projects): State<Arc<ProjectStore<S>>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let Some(actor) = actor_from_headers(&headers) else {
        return unauthorized();
    };

    match projects.fork(&id, &actor) {
        Ok(forked) => (
            StatusCode::CREATED,
            Json(Envelope::with_message(
                "Project forked successfully",
                forked.to_public_view(),
            )),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// `POST /api/projects/:id/like`
pub(crate) async fn like<S: DocumentStore + 'static>(
    State(projects): State<Arc<ProjectStore<S>>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let Some(actor) = actor_from_headers(&headers) else {
        return unauthorized();
    };

    match projects.toggle_like(&id, &actor) {
        Ok(state) => {
            let message = if state.liked {
                "Project liked"
            } else {
                "Project unliked"
            };
            Json(Envelope::with_message(
                message,
                json!({ "liked": state.liked, "likes": state.likes }),
            ))
            .into_response()
        }
        Err(e) => error_response(e),
    }
}

/// Query parameters for the listing route.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListQuery {
    page: Option<usize>,
    limit: Option<usize>,
    search: Option<String>,
    tags: Option<String>,
    sort_by: Option<String>,
    sort_order: Option<String>,
    user_id: Option<String>,
}

/// `GET /api/projects`
///
/// Public snippets by default; `userId` equal to the caller's own id also
/// includes their private ones. Search and tag filtering run here rather
/// than in the store (the store cannot combine text search with compound
/// ordering).
pub(crate) async fn list<S: DocumentStore + 'static>(
    State(projects): State<Arc<ProjectStore<S>>>,
    Query(query): Query<ListQuery>,
    headers: HeaderMap,
) -> Response {
    let actor = actor_from_headers(&headers);

    let listing = match &query.user_id {
        Some(user_id) if actor.as_deref() == Some(user_id.as_str()) => {
            projects.list_by_owner(user_id)
        }
        Some(user_id) => projects
            .list_public(usize::MAX)
            .map(|all| all.into_iter().filter(|s| &s.owner_id == user_id).collect()),
        None => projects.list_public(usize::MAX),
    };
    let mut snippets = match listing {
        Ok(snippets) => snippets,
        Err(e) => return error_response(e),
    };

    if let Some(tags) = query.tags.as_deref().filter(|t| !t.is_empty()) {
        let wanted: Vec<String> = tags
            .split(',')
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        snippets.retain(|s| {
            s.tags
                .iter()
                .any(|tag| wanted.contains(&tag.to_lowercase()))
        });
    }

    if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
        let needle = search.to_lowercase();
        snippets.retain(|s| matches_search(s, &needle));
    }

    sort_listing(
        &mut snippets,
        query.sort_by.as_deref().unwrap_or("createdAt"),
        query.sort_order.as_deref().unwrap_or("desc"),
    );

    let page = query.page.unwrap_or(DEFAULT_PAGE).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).max(1);
    let total = snippets.len();
    let total_pages = total.div_ceil(limit);
    // Saturate: an out-of-range page yields an empty page, never overflow.
    let offset = page.saturating_sub(1).saturating_mul(limit);
    let views: Vec<serde_json::Value> = snippets
        .iter()
        .skip(offset)
        .take(limit)
        .map(Snippet::to_public_view)
        .collect();

    Json(Envelope::data(json!({
        "projects": views,
        "pagination": {
            "currentPage": page,
            "totalPages": total_pages,
            "totalItems": total,
            "itemsPerPage": limit,
            "hasNextPage": page < total_pages,
            "hasPrevPage": page > 1,
        }
    })))
    .into_response()
}

fn matches_search(snippet: &Snippet, needle: &str) -> bool {
    snippet.title.to_lowercase().contains(needle)
        || snippet.description.to_lowercase().contains(needle)
        || snippet
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
}

fn sort_listing(snippets: &mut [Snippet], sort_by: &str, sort_order: &str) {
    let key = |s: &Snippet| match sort_by {
        "updatedAt" => s.updated_at,
        "views" => s.views,
        "likes" => s.likes,
        "forks" => s.forks,
        _ => s.created_at,
    };
    snippets.sort_by_key(|s| std::cmp::Reverse(key(s)));
    if sort_order == "asc" {
        snippets.reverse();
    }
}
