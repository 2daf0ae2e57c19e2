/// Application state and router builder
///
/// Defines the shared application state and builds the Axum router with
/// all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use tasktrack_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = tasktrack_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```
use crate::{config::Config, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tasktrack_shared::auth::{jwt, middleware::AuthContext};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets the JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                    # Health check (public)
/// └── /v1/                       # API v1 (versioned)
///     ├── /auth/
///     │   ├── POST /register     # public
///     │   ├── POST /login        # public
///     │   ├── POST /refresh      # public (token is the credential)
///     │   └── POST /logout       # authenticated
///     ├── /users/                # authenticated
///     │   ├── GET    /           # manager/admin
///     │   ├── GET    /:id
///     │   ├── PUT    /:id        # manager/admin
///     │   └── DELETE /:id        # manager/admin, admins protected
///     └── /tasks/                # authenticated
///         ├── POST /             # manager/admin
///         ├── GET  /             # own tasks, or all for manager/admin
///         └── PUT  /:id/status   # assignee or admin
/// ```
///
/// Role checks beyond "has a valid token" live in the handlers, where the
/// rule depends on the resource (e.g. a manager may not delete an admin).
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public)
    let auth_public = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    // Logout needs a valid access token
    let auth_protected = Router::new()
        .route("/logout", post(routes::auth::logout))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    // User management routes (require JWT)
    let user_routes = Router::new()
        .route("/", get(routes::users::list_users))
        .route("/:id", get(routes::users::get_user))
        .route("/:id", put(routes::users::update_user))
        .route("/:id", delete(routes::users::delete_user))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    // Task routes (require JWT)
    let task_routes = Router::new()
        .route("/", post(routes::tasks::assign_task))
        .route("/", get(routes::tasks::list_tasks))
        .route("/:id/status", put(routes::tasks::update_task_status))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    // Build complete v1 API
    let v1_routes = Router::new()
        .nest("/auth", auth_public.merge(auth_protected))
        .nest("/users", user_routes)
        .nest("/tasks", task_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        // Production mode: configured origins only
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
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Extracts and validates the access token from the Authorization header,
/// then injects an [`AuthContext`] into request extensions.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            crate::error::ApiError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        crate::error::ApiError::BadRequest("Expected Bearer token".to_string())
    })?;

    let claims = jwt::validate_access_token(token, state.jwt_secret())?;

    let auth_context = AuthContext::from_claims(&claims);

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
