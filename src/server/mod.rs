//! HTTP server for post pages and comment form posts

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::content::ContentLoader;
use crate::error::Error;
use crate::helpers::post_path;
use crate::submit::CommentSink;
use crate::view::{CommentForm, PageRenderer, PostView, SubmitOutcome};
use crate::Blog;

/// Cookie marking that the reader's comment on a post was accepted
const SUBMITTED_COOKIE: &str = "comment_submitted";

/// Server state
pub struct AppState {
    pub loader: ContentLoader,
    pub renderer: PageRenderer,
    pub sink: Arc<dyn CommentSink>,
}

impl AppState {
    pub fn from_blog(blog: &Blog) -> Result<Self> {
        Ok(Self {
            loader: blog.loader()?,
            renderer: blog.renderer()?,
            sink: blog.sink()?,
        })
    }
}

/// Build the router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/post/:slug", get(show_post).post(submit_comment))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    let state = Arc::new(AppState::from_blog(blog)?);

    // Unknown or failed slugs are still resolved on first request
    if let Err(e) = state.loader.prerender().await {
        tracing::warn!("Failed to list posts for pre-rendering: {}", e);
    }

    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

async fn show_post(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Response {
    let post = match state.loader.load(&slug).await {
        Ok(post) => post,
        Err(e) => return error_response(&state, e),
    };

    let view = if has_submitted(&headers) {
        PostView::submitted(post)
    } else {
        PostView::new(post)
    };
    render(&state, &view, StatusCode::OK)
}

async fn submit_comment(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    headers: HeaderMap,
    Form(form): Form<CommentForm>,
) -> Response {
    let post = match state.loader.load(&slug).await {
        Ok(post) => post,
        Err(e) => return error_response(&state, e),
    };

    let mut view = if has_submitted(&headers) {
        PostView::submitted(post)
    } else {
        PostView::new(post)
    };

    let outcome = view.submit(form, state.sink.as_ref()).await;
    let status = match outcome {
        SubmitOutcome::Invalid => StatusCode::UNPROCESSABLE_ENTITY,
        SubmitOutcome::Failed => StatusCode::BAD_GATEWAY,
        SubmitOutcome::Accepted | SubmitOutcome::AlreadySubmitted => StatusCode::OK,
    };

    let mut response = render(&state, &view, status);
    if outcome == SubmitOutcome::Accepted {
        let cookie = format!(
            "{}=1; Path={}; HttpOnly; SameSite=Lax",
            SUBMITTED_COOKIE,
            post_path(&slug)
        );
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().insert(header::SET_COOKIE, value);
            }
            Err(e) => tracing::warn!("Failed to build session cookie: {}", e),
        }
    }
    response
}

async fn not_found(State(state): State<Arc<AppState>>) -> Response {
    not_found_page(&state)
}

fn render(state: &AppState, view: &PostView, status: StatusCode) -> Response {
    match state.renderer.render_post(view) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render {}: {}", view.post().slug(), e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

fn not_found_page(state: &AppState) -> Response {
    match state.renderer.render_not_found() {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render not-found page: {}", e);
            (StatusCode::NOT_FOUND, "Not found").into_response()
        }
    }
}

fn error_response(state: &AppState, error: Error) -> Response {
    match error {
        Error::NotFound(slug) => {
            tracing::debug!("No post for {}", slug);
            not_found_page(state)
        }
        e => {
            tracing::error!("Failed to load post: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

/// Whether the request carries the accepted-comment cookie
fn has_submitted(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .any(|(name, value)| name == SUBMITTED_COOKIE && value == "1")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::fixtures::tests::{comment, post};
    use crate::content::FixtureStore;
    use crate::helpers::ImageUrlBuilder;
    use crate::submit::CommentInput;
    use crate::view::{RenderSettings, NAME_REQUIRED};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use std::sync::Mutex;
    use std::time::Duration;
    use tower::ServiceExt;

    #[derive(Default)]
    struct RecordingSink {
        calls: Mutex<Vec<CommentInput>>,
        fail: bool,
    }

    #[async_trait]
    impl CommentSink for RecordingSink {
        async fn submit(&self, input: &CommentInput) -> crate::error::Result<()> {
            self.calls.lock().unwrap().push(input.clone());
            if self.fail {
                Err(Error::Submission("refused".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn app(sink: Arc<RecordingSink>) -> Router {
        let mut hello = post("hello-world", "Hello World");
        hello.comments = vec![
            comment(&hello, "c1", "Bob", "Approved one", true),
            comment(&hello, "c2", "Eve", "Hidden one", false),
        ];
        let store = FixtureStore::from_posts(vec![hello]).unwrap();
        let state = AppState {
            loader: ContentLoader::new(Arc::new(store), Duration::from_secs(60)),
            renderer: PageRenderer::new(RenderSettings {
                site_title: "Medium".to_string(),
                title_prefix: "Medium".to_string(),
                timezone: chrono_tz::UTC,
                images: ImageUrlBuilder::new("abc123", "production"),
            })
            .unwrap(),
            sink,
        };
        router(Arc::new(state))
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn form_post(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/post/hello-world")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_post() {
        let response = app(Arc::default())
            .oneshot(Request::get("/post/hello-world").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_string(response).await;
        assert!(html.contains("Hello World"));
        assert!(html.contains("Approved one"));
        assert!(!html.contains("Hidden one"));
        assert!(html.contains(r#"id="comment-form""#));
    }

    #[tokio::test]
    async fn test_served_form_disables_submit_on_send() {
        let response = app(Arc::default())
            .oneshot(Request::get("/post/hello-world").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let html = body_string(response).await;
        assert!(html.contains(
            r#"onsubmit="this.querySelector('[type=submit]').disabled = true""#
        ));
    }

    #[tokio::test]
    async fn test_unknown_slug_is_404() {
        let response = app(Arc::default())
            .oneshot(Request::get("/post/missing").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_string(response).await.contains("Page not found"));
    }

    #[tokio::test]
    async fn test_other_paths_are_404() {
        let response = app(Arc::default())
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_incomplete_form_sends_nothing() {
        let sink = Arc::new(RecordingSink::default());
        let response = app(sink.clone())
            .oneshot(form_post("name=&email=bob%40example.com&comment=hi"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        assert!(body_string(response).await.contains(NAME_REQUIRED));
        assert!(sink.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_complete_form_sends_once_and_sets_session() {
        let sink = Arc::new(RecordingSink::default());
        let app = app(sink.clone());

        let response = app
            .clone()
            .oneshot(form_post("name=Bob&email=bob%40example.com&comment=Great+read"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(cookie.starts_with("comment_submitted=1"));
        assert!(cookie.contains("Path=/post/hello-world"));
        assert!(body_string(response).await.contains("Thank you for submitting"));

        {
            let calls = sink.calls.lock().unwrap();
            assert_eq!(calls.len(), 1);
            assert_eq!(calls[0].post_id, "post-hello-world");
            assert_eq!(calls[0].comment, "Great read");
        }

        let response = app
            .oneshot(
                Request::get("/post/hello-world")
                    .header(header::COOKIE, "theme=dark; comment_submitted=1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let html = body_string(response).await;
        assert!(html.contains("Thank you for submitting"));
        assert!(!html.contains(r#"id="comment-form""#));
    }

    #[tokio::test]
    async fn test_failed_submission_is_reported() {
        let sink = Arc::new(RecordingSink {
            fail: true,
            ..Default::default()
        });
        let response = app(sink.clone())
            .oneshot(form_post("name=Bob&email=bob%40example.com&comment=hi"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        let html = body_string(response).await;
        assert!(html.contains("Your comment could not be sent"));
        assert_eq!(sink.calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_has_submitted() {
        let mut headers = HeaderMap::new();
        assert!(!has_submitted(&headers));
        headers.insert(header::COOKIE, HeaderValue::from_static("a=b; comment_submitted=0"));
        assert!(!has_submitted(&headers));
        headers.insert(header::COOKIE, HeaderValue::from_static("a=b; comment_submitted=1"));
        assert!(has_submitted(&headers));
    }
}
