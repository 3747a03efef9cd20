pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Posts API
        .route("/api/v1/posts/state", get(handlers::handle_get_state))
        .route("/api/v1/posts/generate", post(handlers::handle_generate))
        .route(
            "/api/v1/posts/hashtags/toggle",
            post(handlers::handle_toggle_hashtag),
        )
        .route(
            "/api/v1/posts/hashtags/apply",
            post(handlers::handle_apply_selected),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::generation::workflow::ContentStore;
    use crate::llm_client::testing::{happy_answer, PromptKind, ScriptedProvider};
    use crate::llm_client::LlmError;

    fn router_with(provider: ScriptedProvider) -> Router {
        build_router(AppState {
            store: Arc::new(ContentStore::new(Arc::new(provider), "images.example.com")),
        })
    }

    async fn send(
        router: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        let response = router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        // extractor rejections answer with plain text, not JSON
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let router = router_with(ScriptedProvider::happy());
        let (status, body) = send(&router, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_initial_state_is_idle() {
        let router = router_with(ScriptedProvider::happy());
        let (status, body) = send(&router, Method::GET, "/api/v1/posts/state", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["loading"], false);
        assert!(body["error"].is_null());
        assert!(body["generated_post"].is_null());
    }

    #[tokio::test]
    async fn test_blank_topic_rejected() {
        let router = router_with(ScriptedProvider::happy());
        let (status, body) = send(
            &router,
            Method::POST,
            "/api/v1/posts/generate",
            Some(json!({"topic": "   ", "platform": "x", "tone": "casual"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_generate_then_select_and_apply() {
        let router = router_with(ScriptedProvider::happy());
        let (status, body) = send(
            &router,
            Method::POST,
            "/api/v1/posts/generate",
            Some(json!({"topic": "launch", "platform": "x", "tone": "casual"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["loading"], false);
        let post = &body["generated_post"];
        assert_eq!(post["hashtags"], json!(["#Launch", "#Startup", "#Tech"]));
        assert_eq!(post["selected_hashtags"], json!([]));
        assert_eq!(post["best_times"].as_array().unwrap().len(), 2);

        let (_, body) = send(
            &router,
            Method::POST,
            "/api/v1/posts/hashtags/toggle",
            Some(json!({"tag": "#Tech"})),
        )
        .await;
        assert_eq!(body["generated_post"]["selected_hashtags"], json!(["#Tech"]));

        let (status, body) = send(&router, Method::POST, "/api/v1/posts/hashtags/apply", None).await;
        assert_eq!(status, StatusCode::OK);
        let content = body["generated_post"]["content"].as_str().unwrap();
        assert!(content.ends_with("\n\n#Tech"), "content was {content:?}");
    }

    #[tokio::test]
    async fn test_provider_failure_surfaces_message() {
        let router = router_with(ScriptedProvider::new(|kind| match kind {
            PromptKind::Times => Err(LlmError::Api {
                status: 401,
                message: "Invalid API Key".to_string(),
            }),
            other => Ok(happy_answer(other)),
        }));
        let (status, body) = send(
            &router,
            Method::POST,
            "/api/v1/posts/generate",
            Some(json!({"topic": "launch"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["message"], "API error (status 401): Invalid API Key");

        let (_, state) = send(&router, Method::GET, "/api/v1/posts/state", None).await;
        assert_eq!(state["error"], "API error (status 401): Invalid API Key");
        assert!(state["generated_post"].is_null());
    }

    #[tokio::test]
    async fn test_unknown_platform_rejected_by_extractor() {
        let router = router_with(ScriptedProvider::happy());
        let (status, body) = send(
            &router,
            Method::POST,
            "/api/v1/posts/generate",
            Some(json!({"topic": "launch", "platform": "myspace"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.as_str().is_some_and(|text| text.contains("myspace")), "body was {body}");

        let (_, state) = send(&router, Method::GET, "/api/v1/posts/state", None).await;
        assert_eq!(state["loading"], false);
        assert!(state["generated_post"].is_null());
    }
}
