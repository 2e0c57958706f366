//! Bundled item catalogue pages.
//!
//! `/items` is the background page. Every other route is a modal that is
//! displayed over it:
//!
//! | Route | Signal |
//! |---|---|
//! | `GET /items/summary` | fragment over `/items` |
//! | `GET /items/{id}` | fragment over `/items`, unknown id redirects |
//! | `GET /items/{id}/edit` | fragment over `/items` |
//! | `POST /items/{id}/edit` | self-redirect to `/items/{id}` |
//! | `POST /items/{id}/delete` | callback `{"action":"close"}` |
//! | `GET /account` | redirect to `/login` without a signed-in user |
//!
//! Edits and deletions are kept in the visitor's session.

use axum::{
    extract::{Path, State},
    response::{Html, Response},
    routing::{get, post},
    Form, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::http::server::AppState;
use crate::protocol::dom::escape_html;
use crate::server::{modal_root_for, ModalRequest, RenderError, Session, TemplateRegistry};

const CATALOGUE: &[(u32, &str)] = &[(1, "Anvil"), (2, "Bellows"), (3, "Crucible")];

const ITEMS_PAGE: &str = r#"<!doctype html>
<html>
<head><title>Items</title></head>
<body>
<h1>Items</h1>
<ul>{{ rows|raw }}</ul>
<p><a href="/items/summary" data-target="modal">Summary</a> <a href="/account" data-target="modal">Account</a></p>
<p>Last viewed: {{ last_viewed }}</p>
{{ modal_root|raw }}
</body>
</html>"#;

const ITEM_LIST_MODAL: &str = r#"<div class="modal-dialog"><p>{{ count }} items in the catalogue</p></div>"#;

const ITEM_MODAL: &str = r#"<div class="modal-dialog"><h2>{{ item.name }}</h2><a href="/items/{{ item.id }}/edit" data-target="modal">Edit</a></div>"#;

const ITEM_EDIT_MODAL: &str = r#"<div class="modal-dialog"><form action="/items/{{ item.id }}/edit" method="post" data-target="modal"><input name="name" value="{{ item.name }}"></form><form action="/items/{{ item.id }}/delete" method="post" data-target="modal"></form></div>"#;

const ACCOUNT_MODAL: &str = r#"<div class="modal-dialog"><p>Signed in as {{ user }}</p></div>"#;

const LOGIN_PAGE: &str = r#"<!doctype html>
<html>
<head><title>Sign in</title></head>
<body><h1>Sign in</h1></body>
</html>"#;

/// Payload of the delete callback.
pub const CLOSE_CALLBACK: &str = r#"{"action":"close"}"#;

#[derive(Debug, Clone, Serialize)]
struct Item {
    id: u32,
    name: String,
}

#[derive(Debug, Deserialize)]
struct EditForm {
    name: String,
}

/// Templates used by [`routes`].
pub fn templates() -> TemplateRegistry {
    TemplateRegistry::new()
        .with_template("items_page", ITEMS_PAGE)
        .with_template("item_list_modal", ITEM_LIST_MODAL)
        .with_template("item_modal", ITEM_MODAL)
        .with_template("item_edit_modal", ITEM_EDIT_MODAL)
        .with_template("account_modal", ACCOUNT_MODAL)
        .with_template("login_page", LOGIN_PAGE)
}

/// Item catalogue routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(items_page))
        .route("/items/summary", get(item_summary))
        .route("/items/{id}", get(show_item))
        .route("/items/{id}/edit", get(edit_item).post(update_item))
        .route("/items/{id}/delete", post(delete_item))
        .route("/account", get(account))
        .route("/login", get(login_page))
}

fn visible_items(session: Option<&Session>) -> Vec<Item> {
    CATALOGUE
        .iter()
        .filter(|(id, _)| {
            session
                .and_then(|s| s.get(&deleted_key(*id)))
                .is_none()
        })
        .map(|(id, name)| Item {
            id: *id,
            name: session
                .and_then(|s| s.get(&name_key(*id)))
                .and_then(|v| v.as_str().map(str::to_owned))
                .unwrap_or_else(|| name.to_string()),
        })
        .collect()
}

fn find_item(session: Option<&Session>, id: u32) -> Option<Item> {
    visible_items(session).into_iter().find(|item| item.id == id)
}

fn name_key(id: u32) -> String {
    format!("item:{id}:name")
}

fn deleted_key(id: u32) -> String {
    format!("item:{id}:deleted")
}

fn item_context(item: &Item) -> Value {
    json!({ "item": item })
}

async fn items_page(
    State(state): State<AppState>,
    request: ModalRequest,
) -> Result<Html<String>, RenderError> {
    let session = request.session();
    let rows: String = visible_items(session)
        .iter()
        .map(|item| {
            format!(
                r#"<li><a href="/items/{}" data-target="modal">{}</a></li>"#,
                item.id,
                escape_html(&item.name)
            )
        })
        .collect();

    let last_viewed = session
        .and_then(|s| s.get("last_viewed"))
        .and_then(|v| v.as_u64())
        .and_then(|id| find_item(session, id as u32))
        .map(|item| item.name)
        .unwrap_or_else(|| "nothing yet".to_string());

    let context = json!({
        "rows": rows,
        "last_viewed": last_viewed,
        "modal_root": modal_root_for(request.overlay()),
    });

    Ok(Html(state.templates.render("items_page", &context)?))
}

async fn item_summary(
    State(state): State<AppState>,
    request: ModalRequest,
) -> Result<Response, RenderError> {
    let count = visible_items(request.session()).len();
    state
        .renderer
        .render(&request, "/items", "item_list_modal", &json!({ "count": count }))
        .await
}

async fn show_item(
    State(state): State<AppState>,
    request: ModalRequest,
    Path(id): Path<u32>,
) -> Result<Response, RenderError> {
    let Some(item) = find_item(request.session(), id) else {
        tracing::debug!(item_id = id, "Unknown item, leaving modal");
        return state.renderer.redirect(&request, "/items");
    };

    if let Some(session) = request.session() {
        session.insert("last_viewed", json!(id));
    }

    state
        .renderer
        .render(&request, "/items", "item_modal", &item_context(&item))
        .await
}

async fn edit_item(
    State(state): State<AppState>,
    request: ModalRequest,
    Path(id): Path<u32>,
) -> Result<Response, RenderError> {
    let Some(item) = find_item(request.session(), id) else {
        return state.renderer.redirect(&request, "/items");
    };
    state
        .renderer
        .render(&request, "/items", "item_edit_modal", &item_context(&item))
        .await
}

async fn update_item(
    State(state): State<AppState>,
    request: ModalRequest,
    Path(id): Path<u32>,
    Form(form): Form<EditForm>,
) -> Result<Response, RenderError> {
    if find_item(request.session(), id).is_none() {
        return state.renderer.redirect(&request, "/items");
    }

    if let Some(session) = request.session() {
        session.insert(name_key(id), json!(form.name.trim()));
        tracing::info!(item_id = id, "Item renamed");
    }
    state.renderer.redirect_modal(&request, &format!("/items/{id}"))
}

async fn delete_item(
    State(state): State<AppState>,
    request: ModalRequest,
    Path(id): Path<u32>,
) -> Result<Response, RenderError> {
    if let Some(session) = request.session() {
        session.insert(deleted_key(id), json!(true));
        tracing::info!(item_id = id, "Item deleted");
    }
    state.renderer.callback(CLOSE_CALLBACK)
}

async fn account(
    State(state): State<AppState>,
    request: ModalRequest,
) -> Result<Response, RenderError> {
    let user = request
        .session()
        .and_then(|s| s.get("user"))
        .and_then(|v| v.as_str().map(str::to_owned));

    match user {
        Some(user) => {
            state
                .renderer
                .render(&request, "/items", "account_modal", &json!({ "user": user }))
                .await
        }
        None => state.renderer.redirect(&request, "/login"),
    }
}

async fn login_page(State(state): State<AppState>) -> Result<Html<String>, RenderError> {
    Ok(Html(state.templates.render("login_page", &json!({}))?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_overrides_catalogue() {
        let session = Session::new();
        session.insert(name_key(2), json!("Big Bellows"));
        session.insert(deleted_key(3), json!(true));

        let items = visible_items(Some(&session));
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Anvil", "Big Bellows"]);
        assert!(find_item(Some(&session), 3).is_none());
    }

    #[test]
    fn test_catalogue_without_session() {
        assert_eq!(visible_items(None).len(), CATALOGUE.len());
    }

    #[test]
    fn test_templates_are_registered() {
        let registry = templates();
        for name in ["items_page", "item_list_modal", "item_modal", "item_edit_modal", "account_modal", "login_page"] {
            assert!(registry.contains(name), "{name} missing");
        }
    }
}
