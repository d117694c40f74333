//! Throwaway HTTP servers for tests: a fake news site and a fake ML
//! delegate, both bound to an ephemeral port on 127.0.0.1.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("test listener address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// Base URL of a port nothing is listening on.
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe listener");
    let port = listener.local_addr().expect("probe address").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

// ── Fake news site ─────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub enum SitePage {
    /// Titled page with a nav bar and a one-sentence article.
    Article,
    /// 404.
    Missing,
    /// Only boilerplate, nothing readable.
    Empty,
    /// Endless chain of temporary redirects.
    RedirectLoop,
    /// Article whose body is the request's User-Agent.
    EchoAgent,
    /// `ARTICLE_HTML` behind this many temporary redirects.
    RedirectChain(u32),
    /// `ARTICLE_HTML` after `SLOW_PAGE_DELAY`.
    Slow,
    /// Article of `LONG_PAGE_PARAGRAPHS` paragraphs.
    Long,
}

pub struct FakeSite {
    pub base_url: String,
}

impl FakeSite {
    pub fn url(&self, page: SitePage) -> String {
        let path = match page {
            SitePage::Article => "/article".to_string(),
            SitePage::Missing => "/missing".to_string(),
            SitePage::Empty => "/empty".to_string(),
            SitePage::RedirectLoop => "/redirect/0".to_string(),
            SitePage::EchoAgent => "/agent".to_string(),
            SitePage::RedirectChain(hops) => format!("/redirect-to-article/{hops}"),
            SitePage::Slow => "/slow".to_string(),
            SitePage::Long => "/long".to_string(),
        };
        format!("{}{path}", self.base_url)
    }
}

pub const LONG_PAGE_PARAGRAPHS: usize = 20_000;

pub const SLOW_PAGE_DELAY: Duration = Duration::from_secs(5);

pub const ARTICLE_HTML: &str = r#"<html><head><title>Test article</title></head><body>
<nav>Home | World | Politics</nav>
<article><p>Hello world, this is content.</p></article>
</body></html>"#;

const EMPTY_HTML: &str = r#"<html><head><title>Nothing here</title></head><body>
<nav><p>Home, world news, politics, sports, weather and every other section link.</p></nav>
</body></html>"#;

pub async fn spawn_site() -> FakeSite {
    let router = Router::new()
        .route("/article", get(|| async { Html(ARTICLE_HTML) }))
        .route(
            "/missing",
            get(|| async { (StatusCode::NOT_FOUND, Html("<html><body><p>gone</p></body></html>")) }),
        )
        .route("/empty", get(|| async { Html(EMPTY_HTML) }))
        .route(
            "/redirect/:n",
            get(|Path(n): Path<u32>| async move {
                Redirect::temporary(&format!("/redirect/{}", n + 1))
            }),
        )
        .route(
            "/redirect-to-article/:n",
            get(|Path(n): Path<u32>| async move {
                match n {
                    0 => Html(ARTICLE_HTML).into_response(),
                    n => Redirect::temporary(&format!("/redirect-to-article/{}", n - 1))
                        .into_response(),
                }
            }),
        )
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(SLOW_PAGE_DELAY).await;
                Html(ARTICLE_HTML)
            }),
        )
        .route(
            "/long",
            get(|| async {
                let paragraphs = "<p>Paragraph of the long article.</p>".repeat(LONG_PAGE_PARAGRAPHS);
                Html(format!("<html><body><article>{paragraphs}</article></body></html>"))
            }),
        )
        .route(
            "/agent",
            get(|headers: HeaderMap| async move {
                let agent = headers
                    .get(header::USER_AGENT)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                Html(format!(
                    "<html><body><article><p>{agent}</p></article></body></html>"
                ))
            }),
        );

    let addr = serve(router).await;
    FakeSite {
        base_url: format!("http://{addr}"),
    }
}

// ── Fake ML delegate ───────────────────────────────────────

#[derive(Debug, Clone)]
pub enum DelegateReply {
    /// 200 with this JSON body.
    Json(Value),
    /// 200 with label `"{prefix}{text}"`.
    Echo { prefix: &'static str },
    /// This status with a plain-text body.
    Status(u16),
    /// This status with the given plain-text body.
    StatusBody(u16, String),
    /// 200 with this raw body, declared as JSON.
    Raw(&'static str),
    /// Sleep, then answer.
    Delayed(Duration, Box<DelegateReply>),
}

impl DelegateReply {
    pub fn fixed(label: &str, confidence: f64) -> Self {
        Self::Json(json!({ "result": label, "confidence": confidence }))
    }
}

#[derive(Clone)]
struct DelegateState {
    reply: Arc<DelegateReply>,
    predict_hits: Arc<AtomicUsize>,
    health_hits: Arc<AtomicUsize>,
    health_status: Arc<AtomicU16>,
    health_delay_ms: Arc<AtomicU64>,
    last_text: Arc<Mutex<Option<String>>>,
}

pub struct FakeDelegate {
    pub base_url: String,
    state: DelegateState,
}

impl FakeDelegate {
    pub fn predict_hits(&self) -> usize {
        self.state.predict_hits.load(Ordering::SeqCst)
    }

    pub fn health_hits(&self) -> usize {
        self.state.health_hits.load(Ordering::SeqCst)
    }

    pub fn last_text(&self) -> Option<String> {
        self.state.last_text.lock().expect("last_text lock").clone()
    }

    /// Make `GET /health` answer with `status` from now on.
    pub fn with_health_status(self, status: u16) -> Self {
        self.state.health_status.store(status, Ordering::SeqCst);
        self
    }

    /// Make `GET /health` sleep for `delay` before answering.
    pub fn with_health_delay(self, delay: Duration) -> Self {
        let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.state.health_delay_ms.store(millis, Ordering::SeqCst);
        self
    }
}

async fn render(reply: &DelegateReply, text: &str) -> Response {
    let mut reply = reply;
    while let DelegateReply::Delayed(delay, inner) = reply {
        tokio::time::sleep(*delay).await;
        reply = inner;
    }

    match reply {
        DelegateReply::Json(body) => Json(body.clone()).into_response(),
        DelegateReply::Echo { prefix } => {
            Json(json!({ "result": format!("{prefix}{text}"), "confidence": 0.5 })).into_response()
        }
        DelegateReply::Status(code) => (
            StatusCode::from_u16(*code).expect("valid status"),
            "delegate error",
        )
            .into_response(),
        DelegateReply::StatusBody(code, body) => (
            StatusCode::from_u16(*code).expect("valid status"),
            body.clone(),
        )
            .into_response(),
        DelegateReply::Raw(body) => {
            ([(header::CONTENT_TYPE, "application/json")], *body).into_response()
        }
        DelegateReply::Delayed(..) => unreachable!("delays unwrapped above"),
    }
}

async fn predict(State(state): State<DelegateState>, Json(body): Json<Value>) -> Response {
    state.predict_hits.fetch_add(1, Ordering::SeqCst);
    let text = body["text"].as_str().unwrap_or_default().to_string();
    *state.last_text.lock().expect("last_text lock") = Some(text.clone());
    render(&state.reply, &text).await
}

async fn health(State(state): State<DelegateState>) -> StatusCode {
    state.health_hits.fetch_add(1, Ordering::SeqCst);
    let delay = state.health_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
    StatusCode::from_u16(state.health_status.load(Ordering::SeqCst)).expect("valid status")
}

pub async fn spawn_delegate(reply: DelegateReply) -> FakeDelegate {
    let state = DelegateState {
        reply: Arc::new(reply),
        predict_hits: Arc::new(AtomicUsize::new(0)),
        health_hits: Arc::new(AtomicUsize::new(0)),
        health_status: Arc::new(AtomicU16::new(200)),
        health_delay_ms: Arc::new(AtomicU64::new(0)),
        last_text: Arc::new(Mutex::new(None)),
    };

    let router = Router::new()
        .route("/predict", post(predict))
        .route("/health", get(health))
        .with_state(state.clone());

    let addr = serve(router).await;
    FakeDelegate {
        base_url: format!("http://{addr}"),
        state,
    }
}
