use axum::{http::HeaderValue, middleware as axum_middleware, routing::get, Extension, Router};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use storefront_api::config::SecurityConfig;
use storefront_api::database::{self, PgProductStore};
use storefront_api::middleware::jwt_auth_middleware;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = storefront_api::config::config();

    tracing_subscriber::fmt::init();
    tracing::info!("Starting Storefront API in {:?} mode", config.environment);

    let pool = database::pool::connect()
        .await
        .unwrap_or_else(|e| panic!("failed to connect to database: {}", e));

    let app = app(pool);

    // Allow tests or deployments to override port via env
    let port = std::env::var("STOREFRONT_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Storefront API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app(pool: PgPool) -> Router {
    let store = PgProductStore::new(pool.clone());

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_routes())
        .merge(catalog_routes())
        // Protected (JWT required)
        .merge(order_routes())
        // Injected dependencies
        .layer(Extension(pool))
        .layer(Extension(store))
        // Global middleware
        .layer(cors_layer(&storefront_api::config::config().security))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if security.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

fn auth_routes() -> Router {
    use axum::routing::post;
    use storefront_api::handlers::public::auth;

    Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/signin", post(auth::signin))
}

fn catalog_routes() -> Router {
    use storefront_api::handlers::public::catalog;

    Router::new()
        .route("/api/products", get(catalog::products_list))
        .route("/api/products/:id", get(catalog::products_get))
        .route("/api/categories", get(catalog::categories_list))
}

fn order_routes() -> Router {
    use storefront_api::handlers::protected::orders;

    Router::new()
        .route("/api/orders", get(orders::orders_list))
        .route("/api/orders/:id", get(orders::orders_get))
        .route_layer(axum_middleware::from_fn(jwt_auth_middleware))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "status": "success",
        "message": "Storefront API",
        "data": {
            "name": "Storefront API",
            "version": version,
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "auth": "/auth/signup, /auth/signin (public)",
                "products": "/api/products[/:id] (public)",
                "categories": "/api/categories (public)",
                "orders": "/api/orders[/:id] (protected)",
            }
        }
    }))
}

async fn health(Extension(pool): Extension<PgPool>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match database::pool::health_check(&pool).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "success",
                "message": "ok",
                "data": {
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("health check failed: {}", e);
            (
                axum::http::StatusCode::SERVICE_UNAVAILABLE,
                axum::response::Json(json!({
                    "status": "error",
                    "message": "database unavailable",
                    "data": {
                        "timestamp": now,
                        "database": "degraded"
                    }
                })),
            )
        }
    }
}
