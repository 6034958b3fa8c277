use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    extract::DefaultBodyLimit,
    http::Method,
    http::Request,
    http::header::{CONTENT_TYPE, HeaderName, HeaderValue},
    middleware,
    middleware::Next,
    response::Response,
    routing::{get, post},
};
use clap::Parser;
use dotenvy::dotenv;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;

pub mod error;
pub mod handlers;

use bm_common::client::{ResourceApiClient, ResourceSource, UpstreamConfig};
use bm_common::logging::{init_tracing_subscriber, install_tracing_panic_hook};
use error::ApiError;
use handlers::{
    accounts, dashboard, health, interviews, matches, requirements, resources, soft_blocks, weekly,
};

const SHUTDOWN_DRAIN_GRACE: Duration = Duration::from_millis(200);
const BODY_LIMIT_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, Parser)]
#[command(name = "bm-api", about = "HTTP API for bench resource matching")]
pub struct Cli {
    /// Base URL of the upstream resource service
    #[arg(long, env = "BM_UPSTREAM_BASE_URL")]
    upstream_base_url: String,

    /// Upstream request timeout in seconds
    #[arg(long, env = "BM_UPSTREAM_TIMEOUT_SECS", default_value_t = 15)]
    upstream_timeout_secs: u64,

    /// Server port
    #[arg(long, env = "PORT", default_value_t = 3002)]
    port: u16,

    /// Comma separated list of allowed CORS origins
    #[arg(long, env = "BM_CORS_ORIGINS", default_value = "http://localhost:5173")]
    cors_origins: String,

    /// Build placeholder requirements from common skills when none are recorded
    #[arg(
        long,
        env = "BM_SYNTHESIZE_REQUIREMENTS",
        default_value = "false",
        action = clap::ArgAction::Set
    )]
    synthesize_requirements: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub upstream: UpstreamConfig,
    pub synthesize_requirements: bool,
}

impl AppConfig {
    pub fn from_cli(cli: Cli) -> Result<Self, ApiError> {
        let cors_origins = cli
            .cors_origins
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect::<Vec<_>>();

        if cors_origins.iter().any(|origin| origin == "*") {
            return Err(ApiError::BadRequest(
                "BM_CORS_ORIGINS must list explicit origins".into(),
            ));
        }

        if let Some(invalid) = cors_origins
            .iter()
            .find(|origin| origin.parse::<HeaderValue>().is_err())
        {
            return Err(ApiError::BadRequest(format!(
                "BM_CORS_ORIGINS contains an invalid origin: {invalid}"
            )));
        }

        let upstream = UpstreamConfig::new(
            &cli.upstream_base_url,
            Duration::from_secs(cli.upstream_timeout_secs),
        )
        .map_err(|err| ApiError::BadRequest(err.to_string()))?;

        Ok(Self {
            port: cli.port,
            cors_origins,
            upstream,
            synthesize_requirements: cli.synthesize_requirements,
        })
    }

    pub fn for_tests() -> Self {
        Self {
            port: 3002,
            cors_origins: vec!["http://localhost:5173".into()],
            upstream: UpstreamConfig {
                base_url: "http://localhost:8080".into(),
                timeout: Duration::from_secs(15),
            },
            synthesize_requirements: false,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn ResourceSource>,
    pub config: AppConfig,
    pub readiness: Arc<AtomicBool>,
}

pub type SharedState = Arc<AppState>;

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

async fn attach_request_id_context(req: Request<Body>, next: Next) -> Response {
    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());

    error::with_request_id(request_id, next.run(req)).await
}

pub fn create_router(state: SharedState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    let request_id_header = HeaderName::from_static("x-request-id");
    let trace_header = request_id_header.clone();

    let trace = TraceLayer::new_for_http().make_span_with(move |request: &Request<Body>| {
        let request_id = request
            .headers()
            .get(&trace_header)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");

        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    });

    let api_routes = Router::new()
        .route("/resources", get(resources::list_resources))
        .route("/resources/stats", get(resources::statistics))
        .route("/resources/locations", get(resources::locations))
        .route("/resources/skills", get(resources::skills))
        .route("/resources/search", post(resources::search_by_skills))
        .route("/resources/:id", get(resources::get_resource))
        .route("/resources/:id/soft-block", post(resources::soft_block))
        .route("/requirements", get(requirements::list_requirements))
        .route("/requirements/:id", get(requirements::get_requirement))
        .route("/matches", get(matches::list_matches))
        .route("/interviews", get(interviews::list_interviews))
        .route("/soft-blocks", get(soft_blocks::list_soft_blocks))
        .route("/weekly-atp", get(weekly::weekly_atp))
        .route("/dashboard", get(dashboard::dashboard))
        .route("/accounts", get(accounts::list_accounts));

    Router::new()
        .route("/livez", get(health::livez))
        .route("/readyz", get(health::readyz))
        .nest("/api", api_routes)
        .layer(middleware::from_fn(attach_request_id_context))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(trace)
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(
            request_id_header,
            MakeRequestUuid,
        ))
        .layer(cors)
        .with_state(state)
}

/// State over an arbitrary source, for router tests.
pub fn test_state(source: Arc<dyn ResourceSource>) -> SharedState {
    Arc::new(AppState {
        source,
        config: AppConfig::for_tests(),
        readiness: Arc::new(AtomicBool::new(true)),
    })
}

pub async fn run() -> Result<(), ApiError> {
    dotenv().ok();
    init_tracing_subscriber(env!("CARGO_PKG_NAME"));
    install_tracing_panic_hook(env!("CARGO_PKG_NAME"));

    let cli = Cli::parse();
    let config = AppConfig::from_cli(cli)?;
    let client = ResourceApiClient::new(config.upstream.clone())
        .map_err(|err| ApiError::Internal(format!("failed to build upstream client: {err}")))?;

    let state = Arc::new(AppState {
        source: Arc::new(client),
        config: config.clone(),
        readiness: Arc::new(AtomicBool::new(true)),
    });

    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    let app = create_router(state.clone());

    info!(
        %addr,
        upstream = %config.upstream.base_url,
        synthesize_requirements = config.synthesize_requirements,
        "bm-api listening"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    Ok(())
}

async fn shutdown_signal(state: SharedState) {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
            let _ = sigterm.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown requested; marking service not ready");
    state.readiness.store(false, Ordering::SeqCst);

    // Load balancers need a moment to observe /readyz failing before
    // axum stops accepting connections.
    tokio::time::sleep(SHUTDOWN_DRAIN_GRACE).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["bm-api", "--upstream-base-url", "http://upstream:8080/"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn config_defaults() {
        let config = AppConfig::from_cli(cli(&[])).unwrap();

        assert_eq!(config.port, 3002);
        assert_eq!(config.cors_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.upstream.base_url, "http://upstream:8080");
        assert_eq!(config.upstream.timeout, Duration::from_secs(15));
        assert!(!config.synthesize_requirements);
    }

    #[test]
    fn config_splits_origins_and_reads_flags() {
        let config = AppConfig::from_cli(cli(&[
            "--cors-origins",
            "http://a.test, http://b.test,,",
            "--synthesize-requirements",
            "true",
            "--upstream-timeout-secs",
            "3",
        ]))
        .unwrap();

        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
        assert!(config.synthesize_requirements);
        assert_eq!(config.upstream.timeout, Duration::from_secs(3));
    }

    #[test]
    fn config_rejects_wildcard_origin() {
        let err = AppConfig::from_cli(cli(&["--cors-origins", "*"])).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn config_rejects_zero_timeout_and_bad_url() {
        let err = AppConfig::from_cli(cli(&["--upstream-timeout-secs", "0"])).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(msg) if msg.contains("timeout")));

        let parsed = Cli::try_parse_from(["bm-api", "--upstream-base-url", "ftp://files"]).unwrap();
        assert!(AppConfig::from_cli(parsed).is_err());
    }

    #[tokio::test]
    async fn sets_request_id_when_missing() {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                "x-request-id",
            )))
            .layer(SetRequestIdLayer::new(
                HeaderName::from_static("x-request-id"),
                MakeRequestUuid,
            ));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }
}
