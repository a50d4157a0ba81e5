use axum::handler::Handler;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use artgallery_api::{config, database::Database, handlers, middleware, services::seed};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_KEY, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting Art Gallery API in {:?} mode", config.environment);

    // Migrations and seeding are best-effort at startup; a down database
    // leaves the server up with /health reporting degraded.
    if let Err(e) = Database::migrate().await {
        tracing::warn!("skipping migrations: {}", e);
    } else {
        seed::run().await;
    }

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("ARTGALLERY_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Art Gallery API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(catalog_routes())
        .merge(exhibition_routes())
        .merge(sales_routes())
        .merge(admin_routes())
        // Global middleware
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

/// CORS from configured origins; falls back to permissive when none parse.
fn cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = config::config()
        .security
        .cors_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

fn catalog_routes() -> Router {
    use handlers::{artists, arts, categories};

    let admin = || axum::middleware::from_fn(middleware::auth::require_admin);

    Router::new()
        .route(
            "/api/v1/arts",
            get(arts::list).post(arts::create.layer(admin())),
        )
        .route("/api/v1/arts/random", get(arts::random))
        .route("/api/v1/arts/categories", get(arts::categories))
        .route(
            "/api/v1/arts/:id",
            get(arts::get_by_id)
                .patch(arts::patch.layer(admin()))
                .delete(arts::delete.layer(admin())),
        )
        .route(
            "/api/v1/artists",
            get(artists::list).post(artists::create.layer(admin())),
        )
        .route(
            "/api/v1/artists/:id",
            get(artists::get_by_id)
                .patch(artists::patch.layer(admin()))
                .delete(artists::delete.layer(admin())),
        )
        .route(
            "/api/v1/categories",
            get(categories::list).post(categories::create.layer(admin())),
        )
        .route(
            "/api/v1/categories/:id",
            get(categories::get_by_id)
                .patch(categories::patch.layer(admin()))
                .delete(categories::delete.layer(admin())),
        )
}

fn exhibition_routes() -> Router {
    use handlers::exhibitions;

    let admin = || axum::middleware::from_fn(middleware::auth::require_admin);

    Router::new()
        .route(
            "/api/v1/exhibitions",
            get(exhibitions::list).post(exhibitions::create.layer(admin())),
        )
        .route(
            "/api/v1/exhibitions/:id",
            get(exhibitions::get_by_id)
                .put(exhibitions::update.layer(admin()))
                .delete(exhibitions::delete.layer(admin())),
        )
        .route(
            "/api/v1/exhibitions/:id/availability",
            get(exhibitions::availability),
        )
}

fn sales_routes() -> Router {
    use handlers::{orders, tickets};

    let admin = || axum::middleware::from_fn(middleware::auth::require_admin);

    Router::new()
        .route("/api/v1/tickets/buy", post(tickets::buy))
        .route(
            "/api/v1/orders",
            post(orders::create).get(orders::list.layer(admin())),
        )
}

fn admin_routes() -> Router {
    use handlers::{admin, reports};

    let guard = || axum::middleware::from_fn(middleware::auth::require_admin);

    Router::new()
        .route("/api/v1/admin/login", post(admin::login))
        .route(
            "/api/v1/reports/dashboard-stats",
            get(reports::dashboard_stats.layer(guard())),
        )
        .route(
            "/api/v1/reports/revenue-chart",
            get(reports::revenue_chart.layer(guard())),
        )
        .route(
            "/api/v1/reports/top-exhibitions",
            get(reports::top_exhibitions.layer(guard())),
        )
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "name": "Art Gallery API",
        "version": version,
        "endpoints": {
            "arts": "/api/v1/arts[/:id] (GET public, writes admin)",
            "artists": "/api/v1/artists[/:id] (GET public, writes admin)",
            "categories": "/api/v1/categories[/:id] (GET public, writes admin)",
            "exhibitions": "/api/v1/exhibitions[/:id][/availability] (GET public, writes admin)",
            "tickets": "/api/v1/tickets/buy (public)",
            "orders": "/api/v1/orders (POST public, GET admin)",
            "reports": "/api/v1/reports/* (admin)",
            "login": "/api/v1/admin/login (public)",
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match Database::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
