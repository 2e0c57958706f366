//! The client navigation controller.
//!
//! # Responsibilities
//! - Turn modal link clicks and form submits into fetches
//! - Interpret the response signal and swap the root element's content
//! - Keep one history entry per navigation step, with the background page
//!   carried in the entry's state
//!
//! # Design Decisions
//! - The fetch (and its body read) is the only suspension point
//! - DOM and history are touched only after a response is in hand, so a
//!   failed fetch leaves both exactly as they were
//! - Overlapping loads are not coalesced; whichever resolves last wins

use axum::http::Method;
use url::Url;

use crate::client::dom::{ClickEvent, HideEvent, ModalHost, SubmitEvent};
use crate::client::history::History;
use crate::client::state::{HistoryState, LoadOutcome, NavigationState};
use crate::client::transport::{FetchRequest, Transport, TransportError};
use crate::config::ClientConfig;
use crate::observability::metrics;
use crate::protocol::{marker, ModalSignal};

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid HTTP method {0:?}")]
    InvalidMethod(String),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("gave up after {limit} consecutive modal self-redirects")]
    TooManySelfRedirects { limit: u32 },
}

/// How a displayed fragment is recorded in history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryWrite {
    Push,
    Replace,
}

pub struct NavigationController<T, H, D> {
    transport: T,
    history: H,
    host: D,
    max_self_redirects: u32,
    attached: bool,
    background_url: String,
    modal_url: Option<String>,
}

impl<T, H, D> NavigationController<T, H, D>
where
    T: Transport,
    H: History,
    D: ModalHost,
{
    pub fn new(transport: T, history: H, host: D, config: &ClientConfig) -> Self {
        let background_url = history.location();
        Self {
            transport,
            history,
            host,
            max_self_redirects: config.max_self_redirects,
            attached: false,
            background_url,
            modal_url: None,
        }
    }

    /// Start managing the root element.
    ///
    /// Rewrites the entry created by the ordinary page load so its state names
    /// the real background page. When the server rendered this page as a
    /// background with a modal on top, the modal is shown straight away.
    pub fn attach(&mut self) {
        let location = self.history.location();
        self.history
            .replace_state(HistoryState::new(location.clone()), &location);
        self.background_url = self.canonical(&location);
        self.modal_url = None;

        if let Some(background) = self.host.root().background_uri().map(str::to_owned) {
            let background = self.canonical(&background);
            self.history
                .replace_state(HistoryState::new(background.clone()), &location);
            self.background_url = background;
            self.modal_url = Some(location);
            self.host.show_modal();
        }

        self.attached = true;
        tracing::debug!(
            background = %self.background_url,
            modal = ?self.modal_url,
            "Navigation controller attached"
        );
    }

    /// Stop intercepting events.
    pub fn detach(&mut self) {
        self.attached = false;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn navigation_state(&self) -> NavigationState {
        NavigationState {
            background_url: self.background_url.clone(),
            modal_url: self.modal_url.clone(),
        }
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }

    pub fn host(&self) -> &D {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut D {
        &mut self.host
    }

    /// Handle a click. `Ok(None)` means the event was not ours.
    pub async fn on_click(
        &mut self,
        event: &ClickEvent,
    ) -> Result<Option<LoadOutcome>, ControllerError> {
        if !self.attached || event.default_prevented || !event.target.opens_in_modal("a") {
            return Ok(None);
        }
        let Some(href) = event.target.attribute("href") else {
            return Ok(None);
        };
        let href = href.to_string();
        self.load(&href, None, None).await.map(Some)
    }

    /// Handle a form submission. `Ok(None)` means the event was not ours.
    pub async fn on_submit(
        &mut self,
        event: &SubmitEvent,
    ) -> Result<Option<LoadOutcome>, ControllerError> {
        if !self.attached || !event.form.opens_in_modal("form") {
            return Ok(None);
        }
        let action = event
            .form
            .attribute("action")
            .map(str::to_owned)
            .unwrap_or_else(|| self.history.location());
        let method = event.form.attribute("method").map(str::to_owned);

        self.load(&action, method.as_deref(), Some(&event.fields))
            .await
            .map(Some)
    }

    /// Handle the widget's closing event.
    ///
    /// Pushes an entry for the recorded background page so back/forward
    /// behave as if the modal had been a page of its own. Returns false when
    /// the event was for some other widget.
    pub fn on_hide(&mut self, event: &HideEvent) -> bool {
        if !self.attached || !event.on_root {
            return false;
        }

        let page = self
            .history
            .state()
            .map(|state| state.page)
            .unwrap_or_else(|| self.background_url.clone());
        self.history.push_state(HistoryState::new(page.clone()), &page);

        self.background_url = page;
        self.modal_url = None;
        tracing::debug!(background = %self.background_url, "Modal dismissed");
        true
    }

    /// Fetch `url` as modal content and act on the response.
    ///
    /// `body` pairs are merged into the query for GET and sent form-encoded
    /// otherwise. A self-redirect replaces the current entry only when that
    /// entry is a modal; the background page's own entry is never overwritten.
    pub async fn load(
        &mut self,
        url: &str,
        method: Option<&str>,
        body: Option<&[(String, String)]>,
    ) -> Result<LoadOutcome, ControllerError> {
        let mut method = normalize_method(method)?;
        let mut target = self.resolve(url)?;
        let mut body = body;
        let mut write = HistoryWrite::Push;
        let on_modal_entry = self.modal_url.is_some();
        let mut hops = 0;

        loop {
            let request = build_request(&target, &method, body);
            let page_url = marker::strip_marker(&request.url).to_string();

            tracing::debug!(method = %request.method, url = %request.url, "Fetching modal");
            let response = self.transport.fetch(request).await?;

            match ModalSignal::decode(&response.headers, response.body) {
                ModalSignal::Redirect(url) => {
                    let url = self.canonical(&url);
                    tracing::info!(url = %url, "Modal redirected to a full page");
                    self.history.assign(&url);
                    self.background_url = url.clone();
                    self.modal_url = None;
                    return Ok(self.finish(LoadOutcome::Navigated { url }));
                }
                ModalSignal::SelfRedirect(url) => {
                    hops += 1;
                    if hops > self.max_self_redirects {
                        return Err(ControllerError::TooManySelfRedirects {
                            limit: self.max_self_redirects,
                        });
                    }
                    tracing::debug!(url = %url, hops, "Modal self-redirect");
                    target = self.resolve(&url)?;
                    method = Method::GET;
                    body = None;
                    if on_modal_entry {
                        write = HistoryWrite::Replace;
                    }
                }
                ModalSignal::Callback(payload) => {
                    tracing::debug!(payload = %payload, "Modal callback");
                    return Ok(self.finish(LoadOutcome::Callback { payload }));
                }
                ModalSignal::Content(html) => {
                    self.host.dispose_modal();
                    self.host.set_content(&html);
                    self.host.show_modal();

                    let state = self
                        .history
                        .state()
                        .unwrap_or_else(|| HistoryState::new(self.background_url.clone()));
                    match write {
                        HistoryWrite::Push => self.history.push_state(state, &page_url),
                        HistoryWrite::Replace => self.history.replace_state(state, &page_url),
                    }

                    self.modal_url = Some(page_url.clone());
                    return Ok(self.finish(LoadOutcome::Displayed { url: page_url }));
                }
            }
        }
    }

    fn finish(&self, outcome: LoadOutcome) -> LoadOutcome {
        metrics::record_client_load(outcome.label());
        outcome
    }

    /// Resolve `url` against the current location.
    fn resolve(&self, url: &str) -> Result<Url, ControllerError> {
        let location = self.history.location();
        let base = Url::parse(&location).map_err(|source| ControllerError::InvalidUrl {
            url: location.clone(),
            source,
        })?;
        base.join(url).map_err(|source| ControllerError::InvalidUrl {
            url: url.to_string(),
            source,
        })
    }

    /// Absolute, marker-free form of `url`; left as-is if it cannot be parsed.
    fn canonical(&self, url: &str) -> String {
        match self.resolve(url) {
            Ok(resolved) => marker::strip_marker(&resolved).to_string(),
            Err(_) => url.to_string(),
        }
    }
}

fn normalize_method(method: Option<&str>) -> Result<Method, ControllerError> {
    match method {
        None => Ok(Method::GET),
        Some(m) if m.is_empty() => Ok(Method::GET),
        Some(m) => Method::from_bytes(m.to_ascii_uppercase().as_bytes())
            .map_err(|_| ControllerError::InvalidMethod(m.to_string())),
    }
}

fn build_request(url: &Url, method: &Method, body: Option<&[(String, String)]>) -> FetchRequest {
    let mut request_url = url.clone();
    marker::add_marker(&mut request_url);

    let is_get = *method == Method::GET;
    if is_get {
        if let Some(pairs) = body {
            marker::set_query_pairs(
                &mut request_url,
                pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            );
        }
    }

    let body = match body {
        Some(pairs) if !is_get => Some(
            url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(pairs)
                .finish(),
        ),
        _ => None,
    };

    FetchRequest {
        method: method.clone(),
        url: request_url,
        body,
    }
}
