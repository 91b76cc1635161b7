//! Commune backend, a social-networking GraphQL API
//!
//! Posts, comments, reactions, friend requests, and presigned media URLs,
//! all exposed via GraphQL at /graphql. Auth rides in an HTTP-only cookie.

mod config;
mod db;
mod graphql;
mod services;

use std::net::SocketAddr;
use std::sync::Arc;

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderValue, Method, header};
use axum::response::IntoResponse;
use axum::routing::get;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::Database;
use crate::graphql::{AUTH_COOKIE, CommuneSchema, CookieChange, CookieUpdate, verify_token};
use crate::services::{AuthConfig, AuthService, FeedService, FriendService, StorageClient, StorageConfig};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub schema: CommuneSchema,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(Config::from_env()?);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "commune=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Commune backend");

    let db = Database::connect(&config.database_url).await?;
    db.ensure_schema().await?;
    tracing::info!("Database connected");

    let auth_service = AuthService::new(db.clone(), AuthConfig::new(config.jwt_secret.clone()));
    let feed_service = FeedService::new(db.clone());
    let friend_service = FriendService::new(db.clone());
    let storage_client = StorageClient::new(StorageConfig {
        bucket: config.storage_bucket.clone(),
        region: config.storage_region.clone(),
        access_key: config.storage_access_key.clone(),
        secret_key: config.storage_secret_key.clone(),
    });

    let schema = graphql::build_schema(
        db,
        auth_service,
        feed_service,
        friend_service,
        storage_client,
    );
    tracing::info!("GraphQL schema built");

    let state = AppState {
        config: config.clone(),
        schema,
    };

    let app = Router::new()
        .route("/health", get(health))
        .route("/graphql", get(graphiql).post(graphql_handler))
        .layer(cors_layer(&config))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);
    tracing::info!("GraphQL playground: http://localhost:{}/graphql", config.port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// CORS for credentialed cross-origin requests from the configured origins.
/// Credentials rule out a wildcard, so each origin is listed explicitly.
fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Skipping unparseable allowed origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// GraphQL query/mutation handler with cookie auth context.
///
/// A valid `token` cookie puts an AuthUser into the request data; an invalid
/// or missing one just leaves the request anonymous. Cookie updates requested
/// by login/logout are applied to the response jar after execution.
async fn graphql_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    req: GraphQLRequest,
) -> (CookieJar, GraphQLResponse) {
    let mut request = req.into_inner();

    if let Some(cookie) = jar.get(AUTH_COOKIE)
        && let Ok(user) = verify_token(cookie.value(), &state.config.jwt_secret)
    {
        request = request.data(user);
    }

    let cookie_change = CookieChange::default();
    request = request.data(cookie_change.clone());

    let response = state.schema.execute(request).await;

    let jar = match cookie_change.take() {
        Some(CookieUpdate::Set {
            token,
            max_age_secs,
        }) => jar.add(
            Cookie::build((AUTH_COOKIE, token))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .max_age(time::Duration::seconds(max_age_secs))
                .build(),
        ),
        Some(CookieUpdate::Clear) => jar.remove(Cookie::build(AUTH_COOKIE).path("/").build()),
        None => jar,
    };

    (jar, response.into())
}

/// GraphiQL interactive playground (only for browsers)
async fn graphiql(headers: axum::http::HeaderMap) -> impl IntoResponse {
    let accepts_html = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("text/html"))
        .unwrap_or(false);

    if accepts_html {
        axum::response::Html(GraphiQLSource::build().endpoint("/graphql").finish())
            .into_response()
    } else {
        (
            axum::http::StatusCode::METHOD_NOT_ALLOWED,
            axum::Json(serde_json::json!({
                "error": "GET requests are not supported for GraphQL queries. Use POST with Content-Type: application/json"
            })),
        )
            .into_response()
    }
}

/// Liveness probe
async fn health() -> &'static str {
    "ok"
}
