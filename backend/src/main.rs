//! Rice Production Management System - Forecasting Server
//!
//! Serves seasonal yield forecasts, accuracy validation and data quality
//! assessments computed from historical production records.

use axum::{routing::get, Router};
use sqlx::postgres::PgPoolOptions;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod handlers;
mod models;
mod routes;
mod services;

pub use config::Config;
use services::ActivityLog;

/// Log directives used when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "pms_server=debug,shared=info,tower_http=debug,sqlx=warn";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: Arc<Config>,
    pub activity_log: Arc<ActivityLog>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting Rice Production Forecasting Server");
    tracing::info!("Environment: {}", config.environment);

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&config.database.url)
        .await?;

    tracing::info!("Database connection established");

    // Run migrations in development
    if config.environment == "development" {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&db_pool).await?;
        tracing::info!("Migrations completed");
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    // Create application state
    let state = AppState {
        db: db_pool,
        activity_log: Arc::new(ActivityLog::new(config.activity.capacity)),
        config: Arc::new(config),
    };

    // Build application
    let app = create_app(state);

    // Start server
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .nest("/api", routes::api_routes())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Rice Production Management System - Forecasting API"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use shared::forecasting::ForecastSettings;
    use tower::ServiceExt;

    fn test_state(capacity: usize) -> AppState {
        state_with_database("postgres://localhost/pms_test", capacity)
    }

    fn state_with_database(url: &str, capacity: usize) -> AppState {
        let db = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(500))
            .connect_lazy(url)
            .unwrap();
        AppState {
            db,
            config: Arc::new(Config {
                environment: "test".to_string(),
                server: crate::config::ServerConfig {
                    port: 0,
                    host: "127.0.0.1".to_string(),
                },
                database: crate::config::DatabaseConfig {
                    url: url.to_string(),
                    max_connections: 1,
                    min_connections: 0,
                },
                forecast: ForecastSettings::default(),
                activity: crate::config::ActivityConfig { capacity },
            }),
            activity_log: Arc::new(ActivityLog::new(capacity)),
        }
    }

    fn post_activity(action: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/activity-logs")
            .header("content-type", "application/json")
            .body(Body::from(format!(
                r#"{{"username":"admin","action":"{}","target":"production"}}"#,
                action
            )))
            .unwrap()
    }

    #[test]
    fn test_default_log_filter_enables_forecasting_core() {
        assert!(tracing_subscriber::EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
        assert!(DEFAULT_LOG_FILTER.split(',').any(|d| d == "shared=info"));
    }

    #[tokio::test]
    async fn test_root() {
        let app = create_app(test_state(5));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_activity_log_evicts_and_lists_newest_first() {
        let app = create_app(test_state(2));

        for action in ["login", "view_forecast", "export_csv"] {
            let response = app.clone().oneshot(post_activity(action)).await.unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/activity-logs")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["total"], 2);
        assert_eq!(json["capacity"], 2);
        assert_eq!(json["logs"][0]["action"], "export_csv");
        assert_eq!(json["logs"][1]["action"], "view_forecast");
    }

    #[tokio::test]
    async fn test_invalid_activity_is_rejected() {
        let app = create_app(test_state(5));
        let request = Request::builder()
            .method("POST")
            .uri("/api/activity-logs")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"username":"","action":"login"}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(json["error"]["field"], "username");
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_storage_failure_returns_zeroed_payloads() {
        let app = create_app(state_with_database("postgres://127.0.0.1:1/pms_test", 5));

        let (status, json) = get_json(app.clone(), "/api/forecast/sarima").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["data_quality"], "error");
        assert!(json["forecast"].as_array().unwrap().is_empty());
        assert!(json["error"].is_string());

        let (status, json) = get_json(app.clone(), "/api/forecast/current-summary").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["total_records"], 0);
        assert_eq!(json["data_quality"], "error");
        assert!(json["error"].is_string());

        let (status, json) = get_json(app.clone(), "/api/forecast/validate").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["cross_validation_folds"], 0);
        assert!(json["fold_results"].as_array().unwrap().is_empty());
        assert!(json["error"].is_string());

        let (status, json) = get_json(app, "/api/forecast/data-quality").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["quality_level"], "insufficient");
        assert_eq!(json["quality_score"], 0);
        assert!(json["error"].is_string());
    }
}
