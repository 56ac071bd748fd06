mod backend;
mod backends;
mod classifier;
mod config;
mod prompt;
mod types;

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{Html, Json},
    routing::{get, post},
};
use axum_prometheus::PrometheusMetricLayer;
use clap::Parser;
use metrics::counter;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use backends::{GeminiBackend, OpenAiBackend};
use classifier::Classifier;
use config::Config;
use types::{Classification, ClassificationRequest};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,spamsift=debug".into()),
        )
        .init();

    let config = Config::parse();
    tracing::info!("Starting spam classification server with config: {:?}", config);

    let primary = OpenAiBackend::from_env(
        &config.primary_model,
        config.temperature,
        config.max_response_tokens,
        config.request_timeout(),
    )?;
    let fallback = GeminiBackend::from_env(
        &config.fallback_model,
        config.temperature,
        config.max_response_tokens,
        config.request_timeout(),
    )?;

    let classifier = Classifier::new(Arc::new(primary), Arc::new(fallback));
    let state = AppState::new(Arc::new(classifier));

    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
    let app = app(state)
        .route("/metrics", get(|| async move { metric_handle.render() }))
        .layer(prometheus_layer);

    let listener = TcpListener::bind(&config.server_address()).await?;
    tracing::info!("Server running on http://{}", config.server_address());

    axum::serve(listener, app).await?;
    Ok(())
}

#[derive(Clone)]
struct AppState {
    classifier: Arc<Classifier>,
}

impl AppState {
    fn new(classifier: Arc<Classifier>) -> Self {
        Self { classifier }
    }
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/classify", post(classify_handler))
        .route("/health", get(health_handler))
        .route("/demo", get(demo_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn demo_handler() -> Html<&'static str> {
    Html(include_str!("../demo/index.html"))
}

#[tracing::instrument(skip(state, request), fields(content_len = request.content.len()))]
async fn classify_handler(
    State(state): State<AppState>,
    Json(request): Json<ClassificationRequest>,
) -> Result<Json<Classification>, StatusCode> {
    counter!("classification_requests_total").increment(1);
    tracing::info!("Processing classification request");

    match state.classifier.classify(&request.content).await {
        Ok(verdict) => Ok(Json(verdict)),
        Err(err) => {
            tracing::error!(error = %err, "Classification failed");
            Err(StatusCode::BAD_GATEWAY)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, header};
    use crate::backend::Backend;
    use tower::ServiceExt;

    struct FixedBackend(&'static str);

    #[async_trait]
    impl Backend for FixedBackend {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn complete(&self, _prompt: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct DownBackend;

    #[async_trait]
    impl Backend for DownBackend {
        fn name(&self) -> &'static str {
            "down"
        }

        async fn complete(&self, _prompt: &str) -> Result<String> {
            Err(anyhow::anyhow!("connection refused"))
        }
    }

    fn test_app(primary: Arc<dyn Backend>, fallback: Arc<dyn Backend>) -> Router {
        app(AppState::new(Arc::new(Classifier::new(primary, fallback))))
    }

    fn classify_request(content: &str) -> Request<Body> {
        let body = serde_json::json!({ "content": content }).to_string();
        Request::builder()
            .method("POST")
            .uri("/classify")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn classify_returns_verdict_as_json() {
        let app = test_app(
            Arc::new(FixedBackend(
                r#"{"is_spam": true, "reason": "unsolicited bulk offer"}"#,
            )),
            Arc::new(DownBackend),
        );

        let response = app
            .oneshot(classify_request("Win a free prize now, click this link!"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let verdict: Classification = serde_json::from_slice(&body).unwrap();
        assert!(verdict.is_spam);
        assert_eq!(verdict.reason, "unsolicited bulk offer");
    }

    #[tokio::test]
    async fn total_backend_failure_maps_to_bad_gateway() {
        let app = test_app(Arc::new(DownBackend), Arc::new(DownBackend));

        let response = app.oneshot(classify_request("")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn health_returns_static_acknowledgement() {
        let app = test_app(Arc::new(DownBackend), Arc::new(DownBackend));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(
            serde_json::from_slice::<serde_json::Value>(&body).unwrap(),
            serde_json::json!({ "status": "ok" })
        );
    }
}
