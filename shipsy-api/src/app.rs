/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use shipsy_api::{app::AppState, config::Config};
/// use shipsy_shared::store::memory::InMemoryStore;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let store = Arc::new(InMemoryStore::new());
/// let state = AppState::new(config, store.clone(), store);
/// let app = shipsy_api::app::build_app(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, routes};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use chrono::Duration;
use shipsy_shared::{
    auth::service::{AuthService, TokenSettings, DEFAULT_TOKEN_TTL_HOURS},
    shipments::ShipmentRepository,
    store::{ShipmentStore, UserStore},
};
use std::sync::Arc;
use tower::Layer;
use tower_http::{
    cors::CorsLayer,
    normalize_path::{NormalizePath, NormalizePathLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Every field is Arc-backed, so clones are cheap.
#[derive(Clone)]
pub struct AppState {
    /// Signup, login and token verification
    pub auth: AuthService,

    /// Shipment operations
    pub shipments: ShipmentRepository,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state over the given stores
    pub fn new(config: Config, users: Arc<dyn UserStore>, shipments: Arc<dyn ShipmentStore>) -> Self {
        let tokens = TokenSettings::with_ttl(
            config.jwt.secret.clone(),
            Duration::try_hours(config.jwt.ttl_hours)
                .unwrap_or_else(|| Duration::hours(DEFAULT_TOKEN_TTL_HOURS)),
        );

        Self {
            auth: AuthService::new(users, tokens),
            shipments: ShipmentRepository::new(shipments),
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /                    # Banner (public)
/// ├── GET  /health              # Health check (public)
/// ├── GET  /info                # Service info (public)
/// ├── /auth/
/// │   ├── POST /signup          # Register (public)
/// │   ├── POST /login           # Get session token (public)
/// │   └── GET  /fetch           # Caller's profile (authenticated)
/// └── /shipment/                # All authenticated
///     ├── GET    /              # List all
///     ├── POST   /              # Create
///     ├── GET    /my            # List caller's own
///     ├── GET    /:id           # Fetch one
///     ├── PATCH  /:id           # Partial update
///     └── DELETE /:id           # Delete
/// ```
///
/// Anything else gets a JSON 404.
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Authentication (per-route basis)
pub fn build_router(state: AppState) -> Router {
    // Public routes
    let public_routes = Router::new()
        .route("/", get(routes::health::home))
        .route("/health", get(routes::health::health_check))
        .route("/info", get(routes::health::info))
        .route("/auth/signup", post(routes::auth::signup))
        .route("/auth/login", post(routes::auth::login));

    // Routes that require a session token
    let protected_routes = Router::new()
        .route("/auth/fetch", get(routes::auth::fetch_profile))
        .route(
            "/shipment",
            get(routes::shipments::list_shipments).post(routes::shipments::create_shipment),
        )
        .route("/shipment/my", get(routes::shipments::list_my_shipments))
        .route(
            "/shipment/:id",
            get(routes::shipments::get_shipment)
                .patch(routes::shipments::update_shipment)
                .delete(routes::shipments::delete_shipment),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.iter().any(|origin| origin == "*") {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        // Production mode: configure allowed origins
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    // Combine all routes with middleware stack
    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(routes::health::not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Builds the servable application
///
/// Wraps [`build_router`] so trailing slashes are trimmed before routing;
/// `/shipment/` and `/shipment` reach the same handler.
///
/// # Example
///
/// ```no_run
/// use axum::{extract::Request, ServiceExt};
/// use shipsy_api::app::{build_app, AppState};
///
/// # async fn example(state: AppState) -> anyhow::Result<()> {
/// let app = build_app(state);
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:5001").await?;
/// axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await?;
/// # Ok(())
/// # }
/// ```
pub fn build_app(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(build_router(state))
}

/// Extracts the session token from an `Authorization` header value
///
/// Accepts `Bearer <token>` as well as a bare token.
fn extract_token(header_value: &str) -> Option<&str> {
    let value = header_value.trim();
    let token = match value.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ => value,
    };

    if token.is_empty() || token.eq_ignore_ascii_case("bearer") {
        None
    } else {
        Some(token)
    }
}

/// JWT authentication middleware layer
///
/// Extracts and validates the session token from the Authorization header,
/// then injects the caller's `UserIdentity` into request extensions.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // Extract Authorization header
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(extract_token)
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    // Validate token
    let identity = state.auth.verify(token)?;

    // Insert into request extensions
    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_token() {
        assert_eq!(extract_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_token("bearer abc"), Some("abc"));
        assert_eq!(extract_token("abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_token("  abc  "), Some("abc"));
        assert_eq!(extract_token("Bearer "), None);
        assert_eq!(extract_token(""), None);
    }
}
