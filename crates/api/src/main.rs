use axum::{
    extract::{Query, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gensus_core::advisory::AdvisoryService;
use gensus_core::domain::advisory::{
    BusinessPlanRequest, BusinessPlanResponse, CityGrowthRequest, CompetitorsRequest, IdeaRequest,
    IdeaResponse, PitchDeckRequest, PitchDeckResponse,
};
use gensus_core::domain::market::{CityGrowthAnalysis, CompetitorEntry};
use gensus_core::error::AdvisoryError;

const WELCOME: &str = "Welcome to the Gensus Hackathon API";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = gensus_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let service = match AdvisoryService::from_settings(&settings) {
        Ok(service) => service,
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %e, "API keys are missing; refusing to start");
            return Err(e);
        }
    };

    let state = AppState {
        service: Arc::new(service),
    };

    let app = router(state).layer(cors_layer(&settings.allowed_origins));

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, origins = ?settings.allowed_origins, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/healthz", get(healthz))
        .route("/api/startup/idea", post(generate_startup_idea))
        .route("/api/startup/business-plan", post(generate_business_plan))
        .route("/api/startup/pitch-deck", post(generate_pitch_deck))
        .route("/api/startup/competitors", get(analyze_competitors))
        .route("/api/startup/city-growth", post(analyze_city_growth))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[derive(Debug, PartialEq)]
enum OriginPolicy {
    /// `*` was configured. Browsers reject a wildcard on credentialed requests,
    /// so this policy never allows credentials.
    Any,
    List(Vec<HeaderValue>),
}

fn origin_policy(origins: &[String]) -> OriginPolicy {
    if origins.iter().any(|origin| origin == "*") {
        tracing::warn!("ALLOWED_ORIGINS contains `*`; allowing any origin without credentials");
        return OriginPolicy::Any;
    }

    let origins = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    OriginPolicy::List(origins)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request());

    match origin_policy(origins) {
        OriginPolicy::Any => layer.allow_origin(AllowOrigin::any()),
        OriginPolicy::List(origins) => layer
            .allow_origin(AllowOrigin::list(origins))
            .allow_credentials(true),
    }
}

#[derive(Clone)]
struct AppState {
    service: Arc<AdvisoryService>,
}

/// Every pipeline failure surfaces as a 500 whose `detail` is the error text.
#[derive(Debug)]
struct ApiError(AdvisoryError);

impl From<AdvisoryError> for ApiError {
    fn from(err: AdvisoryError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "advisory request failed");
        sentry::capture_error(&self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": self.0.to_string() })),
        )
            .into_response()
    }
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": WELCOME }))
}

async fn healthz() -> &'static str {
    "ok"
}

async fn generate_startup_idea(
    State(state): State<AppState>,
    Query(req): Query<IdeaRequest>,
) -> Result<Json<IdeaResponse>, ApiError> {
    tracing::info!(industry = %req.industry, "idea refinement requested");
    Ok(Json(state.service.refine_idea(req).await?))
}

async fn generate_business_plan(
    State(state): State<AppState>,
    Json(req): Json<BusinessPlanRequest>,
) -> Result<Json<BusinessPlanResponse>, ApiError> {
    tracing::info!(industry = %req.industry, "business plan requested");
    Ok(Json(state.service.business_plan(req).await?))
}

async fn generate_pitch_deck(
    State(state): State<AppState>,
    Json(req): Json<PitchDeckRequest>,
) -> Result<Json<PitchDeckResponse>, ApiError> {
    Ok(Json(state.service.pitch_deck(req).await?))
}

async fn analyze_competitors(
    State(state): State<AppState>,
    Query(req): Query<CompetitorsRequest>,
) -> Result<Json<Vec<CompetitorEntry>>, ApiError> {
    Ok(Json(state.service.competitors(&req.industry).await?))
}

async fn analyze_city_growth(
    State(state): State<AppState>,
    Json(req): Json<CityGrowthRequest>,
) -> Result<Json<CityGrowthAnalysis>, ApiError> {
    Ok(Json(state.service.city_growth(req).await?))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &gensus_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
