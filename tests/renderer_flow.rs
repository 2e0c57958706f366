//! Server-side rendering through the full middleware stack.

use axum::http::{
    header::{CONTENT_TYPE, LOCATION, SET_COOKIE},
    Method, Request, StatusCode,
};
use axum::body::Body;

use modal_overlay::protocol::{X_MODAL_CALLBACK, X_MODAL_REDIRECT, X_MODAL_REDIRECT_SELF};

mod common;

#[tokio::test]
async fn test_marked_request_returns_fragment_only() {
    let (app, hits) = common::scenario_app();

    let response = common::send(&app, common::get("/items?_modal=1")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    assert_eq!(common::body_text(response).await, "<div>3</div>");
    assert_eq!(hits.get(), 0);
}

#[tokio::test]
async fn test_plain_request_returns_background_with_fragment() {
    let (app, hits) = common::scenario_app();

    let response = common::send(&app, common::get("/items")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_text(response).await;
    assert!(body.contains("<main>home of ada</main>"), "{body}");
    assert!(
        body.contains(r#"<div data-controller="modal" data-modal-background-uri="/"><div>3</div></div>"#),
        "{body}"
    );
    assert_eq!(hits.get(), 1);
}

#[tokio::test]
async fn test_background_page_alone_has_empty_root() {
    let (app, _) = common::scenario_app();
    let body = common::body_text(common::send(&app, common::get("/")).await).await;
    assert!(body.contains(r#"<div data-controller="modal"></div>"#));
    assert!(body.contains("home of nobody"));
}

#[tokio::test]
async fn test_sub_request_shares_the_session() {
    let (app, _) = common::scenario_app();

    let first = common::send(&app, common::get("/items")).await;
    let cookie = first.headers()[SET_COOKIE].to_str().unwrap().to_string();
    let pair = cookie.split(';').next().unwrap().to_string();
    assert!(pair.starts_with("modal_session="));
    assert!(common::body_text(first).await.contains("home of ada"));

    // The value written during the modal request is still there afterwards.
    let again = common::send(&app, common::get_with_cookie("/", &pair)).await;
    assert!(again.headers().get(SET_COOKIE).is_none());
    assert!(common::body_text(again).await.contains("home of ada"));
}

#[tokio::test]
async fn test_redirect_signals() {
    let (app, _) = common::scenario_app();

    let marked = common::send(&app, common::get("/go-away?_modal=1")).await;
    assert_eq!(marked.status(), StatusCode::OK);
    assert_eq!(marked.headers()[X_MODAL_REDIRECT], "/login");
    assert_eq!(common::body_text(marked).await, "");

    let plain = common::send(&app, common::get("/go-away")).await;
    assert_eq!(plain.status(), StatusCode::FOUND);
    assert_eq!(plain.headers()[LOCATION], "/login");
    assert!(plain.headers().get(X_MODAL_REDIRECT).is_none());
}

#[tokio::test]
async fn test_self_redirect_signal() {
    let (app, _) = common::scenario_app();

    let marked = common::send(&app, common::get("/reload?_modal=1")).await;
    assert_eq!(marked.status(), StatusCode::OK);
    assert_eq!(marked.headers()[X_MODAL_REDIRECT_SELF], "/items");

    let plain = common::send(&app, common::get("/reload")).await;
    assert_eq!(plain.status(), StatusCode::FOUND);
    assert_eq!(plain.headers()[LOCATION], "/items");
}

#[tokio::test]
async fn test_callback_signal() {
    let (app, _) = common::scenario_app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/done?_modal=1")
        .body(Body::empty())
        .unwrap();
    let response = common::send(&app, request).await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(response.headers()[X_MODAL_CALLBACK], "done");
    assert_eq!(common::body_text(response).await, "");
}

#[tokio::test]
async fn test_self_referencing_background_fails_once() {
    let (app, _) = common::scenario_app();

    let response = common::send(&app, common::get("/loop")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let marked = common::send(&app, common::get("/loop?_modal=1")).await;
    assert_eq!(marked.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let (app, _) = common::scenario_app();
    let response = common::send(&app, common::get("/items?_modal=1")).await;
    assert!(response.headers().contains_key("x-request-id"));
}
