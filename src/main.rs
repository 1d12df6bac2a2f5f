use axum::{
    http::{HeaderValue, Uri},
    response::Json,
    routing::{get, patch, post},
    Router,
};
use clap::Parser;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use enquiry_api_rust::database::manager::DatabaseManager;
use enquiry_api_rust::handlers;
use enquiry_api_rust::middleware::auth::{staff_auth_middleware, student_auth_middleware};

#[derive(Debug, Parser)]
#[command(name = "enquiry-api-rust", about = "Enquiry API server")]
struct Args {
    /// Port to listen on (overrides ENQUIRY_API_PORT / PORT env vars)
    #[arg(long)]
    port: Option<u16>,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    bind: String,
}

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let args = Args::parse();

    // Initialize configuration (this loads the config singleton)
    let config = enquiry_api_rust::config::config();
    tracing::info!("Starting Enquiry API in {:?} mode", config.environment);

    if config.database.run_migrations_on_startup {
        // Don't refuse to start when the database is down; /health reports it
        if let Err(e) = DatabaseManager::migrate().await {
            tracing::warn!("Skipping startup migrations: {}", e);
        }
    }

    let app = app();

    let port = args
        .port
        .or_else(|| std::env::var("ENQUIRY_API_PORT").ok().and_then(|s| s.parse().ok()))
        .or_else(|| std::env::var("PORT").ok().and_then(|s| s.parse().ok()))
        .unwrap_or(3000);

    let bind_addr = format!("{}:{}", args.bind, port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Enquiry API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        // Protected API
        .merge(staff_routes())
        .merge(student_routes())
        // JSON 404 for anything unmatched
        .fallback(not_found)
        // Global middleware
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

fn public_routes() -> Router {
    Router::new()
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/enquiry-students/login", post(handlers::students::login))
}

fn staff_routes() -> Router {
    use handlers::{auth, batches, enquiries, packages, subjects, users};

    Router::new()
        .route("/api/auth/validate-token", get(auth::validate_token))
        // Staff accounts (ADMIN only, checked in handlers)
        .route("/api/users", get(users::list).post(users::create))
        .route("/api/users/change-password", post(users::change_password))
        // Enquiry funnel
        .route("/api/enquiries", get(enquiries::list).post(enquiries::create))
        .route("/api/enquiries/change-status", post(enquiries::change_status))
        .route(
            "/api/enquiries/:id",
            get(enquiries::get_by_id)
                .put(enquiries::update)
                .delete(enquiries::delete),
        )
        // Catalog
        .route("/api/subjects", get(subjects::list).post(subjects::create))
        .route(
            "/api/subjects/:id",
            get(subjects::get_by_id).put(subjects::update).delete(subjects::delete),
        )
        .route("/api/packages", get(packages::list).post(packages::create))
        .route(
            "/api/packages/:id",
            get(packages::get_by_id).put(packages::update).delete(packages::delete),
        )
        // Batches
        .route("/api/batches/create", post(batches::create))
        .route("/api/batches/available-batches", get(batches::available))
        .route("/api/batches", get(batches::list))
        .route(
            "/api/batches/:id",
            get(batches::get_by_id).put(batches::update).delete(batches::delete),
        )
        .route("/api/batches/:id/approval-status", patch(batches::set_approval_status))
        .layer(axum::middleware::from_fn(staff_auth_middleware))
}

fn student_routes() -> Router {
    Router::new()
        .route("/api/enquiry-students/me", get(handlers::students::me))
        .layer(axum::middleware::from_fn(student_auth_middleware))
}

fn cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = enquiry_api_rust::config::config()
        .security
        .cors_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(tower_http::cors::AllowOrigin::list(origins))
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any)
    }
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Enquiry API (Rust)",
            "version": version,
            "description": "Educational enrollment backend with candidate-status pipeline",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "auth": "/api/auth/login (public), /api/auth/validate-token (protected)",
                "users": "/api/users[/*] (ADMIN)",
                "enquiries": "/api/enquiries[/:id], /api/enquiries/change-status (protected)",
                "students": "/api/enquiry-students/login (public), /api/enquiry-students/me (student token)",
                "subjects": "/api/subjects[/:id] (protected)",
                "packages": "/api/packages[/:id] (protected)",
                "batches": "/api/batches[/*] (protected)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}

async fn not_found(uri: Uri) -> impl axum::response::IntoResponse {
    (
        axum::http::StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "message": "Route not found",
            "path": uri.path()
        })),
    )
}
