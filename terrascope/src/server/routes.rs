//! Route handlers.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use super::error::ApiError;
use super::state::AppState;
use crate::cache::CacheStats;
use crate::imagery::{ImageryRequest, ImageryStatsSnapshot};
use crate::preferences::{MapPreferencesUpdate, UserId};
use crate::weather::{GeocodeResult, WeatherReport};

const SATELLITE_FAILED: &str = "Failed to fetch satellite imagery";
const WEATHER_FAILED: &str = "Failed to fetch weather data";
const GEOCODE_FAILED: &str = "Failed to geocode location";
const GET_PREFERENCES_FAILED: &str = "Failed to get preferences";
const UPDATE_PREFERENCES_FAILED: &str = "Failed to update preferences";

/// Builds the service router with request tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/satellite", post(fetch_satellite))
        .route("/api/layers", get(list_layers))
        .route("/api/cache/stats", get(cache_stats))
        .route("/api/weather", get(weather))
        .route("/api/geocode", get(geocode))
        .route(
            "/api/preferences/:user_id",
            get(get_preferences).post(update_preferences),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Body of a successful `POST /api/satellite`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageryResponse {
    /// `data:` URI of the rendered image.
    pub image_url: String,
    pub cached: bool,
}

/// Public view of one layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerSummary {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub imagery: ImageryStatsSnapshot,
    pub cache: CacheStats,
    pub in_flight: usize,
}

#[derive(Debug, Deserialize)]
struct WeatherQuery {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct GeocodeQuery {
    query: String,
}

async fn fetch_satellite(
    State(state): State<AppState>,
    body: Result<Json<ImageryRequest>, JsonRejection>,
) -> Result<Json<ImageryResponse>, ApiError> {
    let Json(request) = body.map_err(|e| fail(SATELLITE_FAILED, e.body_text()))?;

    let outcome = state
        .orchestrator
        .fetch_imagery(&request)
        .await
        .map_err(|e| {
            error!(kind = e.kind(), error = %e, "Satellite imagery request failed");
            ApiError::new(SATELLITE_FAILED, e)
        })?;

    info!(
        fingerprint = %outcome.fingerprint,
        cached = outcome.was_cached,
        size = outcome.artifact.len(),
        "Served satellite imagery"
    );
    Ok(Json(ImageryResponse {
        image_url: outcome.artifact.to_data_uri(),
        cached: outcome.was_cached,
    }))
}

async fn list_layers(State(state): State<AppState>) -> Json<Vec<LayerSummary>> {
    let layers = state
        .orchestrator
        .registry()
        .iter()
        .map(|layer| LayerSummary {
            id: layer.id.to_string(),
            name: layer.name.to_string(),
            description: layer.description.to_string(),
        })
        .collect();
    Json(layers)
}

async fn cache_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        imagery: state.orchestrator.stats(),
        cache: state.orchestrator.cache().stats(),
        in_flight: state.orchestrator.in_flight(),
    })
}

async fn weather(
    State(state): State<AppState>,
    query: Result<Query<WeatherQuery>, QueryRejection>,
) -> Result<Json<WeatherReport>, ApiError> {
    let Query(query) = query.map_err(|e| fail(WEATHER_FAILED, e.body_text()))?;
    state
        .weather
        .current(query.lat, query.lon)
        .await
        .map(Json)
        .map_err(|e| fail(WEATHER_FAILED, e))
}

async fn geocode(
    State(state): State<AppState>,
    query: Result<Query<GeocodeQuery>, QueryRejection>,
) -> Result<Json<Vec<GeocodeResult>>, ApiError> {
    let Query(query) = query.map_err(|e| fail(GEOCODE_FAILED, e.body_text()))?;
    state
        .weather
        .geocode(&query.query)
        .await
        .map(Json)
        .map_err(|e| fail(GEOCODE_FAILED, e))
}

async fn get_preferences(
    State(state): State<AppState>,
    user_id: Result<Path<UserId>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(user_id) = user_id.map_err(|e| fail_bare(GET_PREFERENCES_FAILED, e.body_text()))?;
    let record = state
        .preferences
        .get(user_id)
        .await
        .map_err(|e| fail_bare(GET_PREFERENCES_FAILED, e))?;

    let body = match record {
        Some(record) => serde_json::to_value(record)
            .map_err(|e| fail_bare(GET_PREFERENCES_FAILED, e))?,
        None => Value::Object(Default::default()),
    };
    Ok(Json(body))
}

async fn update_preferences(
    State(state): State<AppState>,
    user_id: Result<Path<UserId>, PathRejection>,
    patch: Result<Json<MapPreferencesUpdate>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(user_id) =
        user_id.map_err(|e| fail_bare(UPDATE_PREFERENCES_FAILED, e.body_text()))?;
    let Json(patch) = patch.map_err(|e| fail_bare(UPDATE_PREFERENCES_FAILED, e.body_text()))?;

    let record = state
        .preferences
        .update(user_id, patch)
        .await
        .map_err(|e| fail_bare(UPDATE_PREFERENCES_FAILED, e))?;
    let body =
        serde_json::to_value(record).map_err(|e| fail_bare(UPDATE_PREFERENCES_FAILED, e))?;
    Ok(Json(body))
}

fn fail(message: &'static str, cause: impl std::fmt::Display) -> ApiError {
    error!(error = %cause, "{}", message);
    ApiError::new(message, cause)
}

fn fail_bare(message: &'static str, cause: impl std::fmt::Display) -> ApiError {
    error!(error = %cause, "{}", message);
    ApiError::bare(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::Utc;
    use tower::ServiceExt;

    use crate::auth::{CredentialManager, OAuthTokenEndpoint, DEFAULT_TOKEN_URL};
    use crate::cache::{ImageRecord, ImageryCache, MemoryImageryCache};
    use crate::imagery::{validate, Artifact, Fingerprint, ImageryOrchestrator};
    use crate::layer::LayerRegistry;
    use crate::preferences::InMemoryPreferencesStore;
    use crate::provider::{SentinelHubProvider, DEFAULT_PROCESS_URL};
    use crate::weather::WeatherClient;

    fn state() -> (AppState, Arc<MemoryImageryCache>) {
        let http = reqwest::Client::new();
        let cache = Arc::new(MemoryImageryCache::default());
        let credentials = Arc::new(CredentialManager::new(
            None,
            Arc::new(OAuthTokenEndpoint::new(http.clone(), DEFAULT_TOKEN_URL)),
        ));
        let orchestrator = ImageryOrchestrator::new(
            LayerRegistry::builtin(),
            cache.clone(),
            credentials,
            Arc::new(SentinelHubProvider::new(http.clone(), DEFAULT_PROCESS_URL)),
        );
        let weather = WeatherClient::new(http, "http://127.0.0.1:1", "key");
        let state = AppState::new(
            orchestrator,
            weather,
            Arc::new(InMemoryPreferencesStore::new()),
        );
        (state, cache)
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_satellite_served_from_cache() {
        let (state, cache) = state();
        let request = ImageryRequest::new([-122.5, 37.7, -122.3, 37.8], "TRUE_COLOR", 512, 512);
        let validated = validate(&request, &LayerRegistry::builtin(), Utc::now()).unwrap();
        let fingerprint = Fingerprint::of(&validated);
        cache
            .put(
                fingerprint.as_str(),
                ImageRecord {
                    artifact: Artifact::png(vec![1, 2, 3]),
                    source_bounds: validated.bbox,
                    layer_id: "TRUE_COLOR".to_string(),
                    scene_date: validated.window.end(),
                },
            )
            .await
            .unwrap();

        let (status, body) = send(
            build_router(state),
            post_json(
                "/api/satellite",
                serde_json::json!({
                    "bbox": [-122.5, 37.7, -122.3, 37.8],
                    "layer": "TRUE_COLOR",
                    "width": 512,
                    "height": 512
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cached"], true);
        assert_eq!(body["imageUrl"], "data:image/png;base64,AQID");
    }

    #[tokio::test]
    async fn test_satellite_validation_error_is_500() {
        let (state, _) = state();
        let (status, body) = send(
            build_router(state),
            post_json(
                "/api/satellite",
                serde_json::json!({"bbox": [10, 10, 5, 5], "layer": "TRUE_COLOR", "width": 512, "height": 512}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], SATELLITE_FAILED);
        assert!(body["details"].as_str().unwrap().contains("bbox"));
    }

    #[tokio::test]
    async fn test_satellite_missing_credentials_is_500() {
        let (state, _) = state();
        let (status, body) = send(
            build_router(state),
            post_json(
                "/api/satellite",
                serde_json::json!({"bbox": [0, 0, 1, 1], "layer": "SWIR", "width": 256, "height": 256}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["details"].as_str().unwrap().contains("credentials"));
    }

    #[tokio::test]
    async fn test_satellite_malformed_body_is_500() {
        let (state, _) = state();
        let (status, body) = send(
            build_router(state),
            post_json("/api/satellite", serde_json::json!({"bbox": "nope"})),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], SATELLITE_FAILED);
        assert!(body["details"].is_string());
    }

    #[tokio::test]
    async fn test_layers_listed_in_order() {
        let (state, _) = state();
        let (status, body) = send(build_router(state), get_req("/api/layers")).await;

        assert_eq!(status, StatusCode::OK);
        let layers = body.as_array().unwrap();
        assert_eq!(layers.len(), 10);
        assert_eq!(layers[0]["id"], "TRUE_COLOR");
        assert!(layers[0].get("evalscript").is_none());
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let (state, _) = state();
        let (status, body) = send(build_router(state), get_req("/api/cache/stats")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["imagery"]["requests"], 0);
        assert_eq!(body["cache"]["entryCount"], 0);
        assert_eq!(body["inFlight"], 0);
    }

    #[tokio::test]
    async fn test_weather_failure_shape() {
        let (state, _) = state();
        let (status, body) = send(build_router(state), get_req("/api/weather?lat=91&lon=0")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], WEATHER_FAILED);
        assert!(body["details"].is_string());
    }

    #[tokio::test]
    async fn test_geocode_requires_query() {
        let (state, _) = state();
        let (status, body) = send(build_router(state), get_req("/api/geocode?query=")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], GEOCODE_FAILED);
    }

    #[tokio::test]
    async fn test_preferences_round_trip() {
        let (state, _) = state();
        let router = build_router(state);

        let (status, body) = send(router.clone(), get_req("/api/preferences/7")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({}));

        let (status, body) = send(
            router.clone(),
            post_json("/api/preferences/7", serde_json::json!({"zoom": 13, "selectedLayer": "SWIR"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["userId"], 7);
        assert_eq!(body["zoom"], 13.0);
        assert_eq!(body["centerLat"], 37.7749);

        let (_, body) = send(router, get_req("/api/preferences/7")).await;
        assert_eq!(body["selectedLayer"], "SWIR");
    }

    #[tokio::test]
    async fn test_preferences_bad_user_id() {
        let (state, _) = state();
        let (status, body) = send(build_router(state), get_req("/api/preferences/abc")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({"error": GET_PREFERENCES_FAILED}));
    }
}
