use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{error, info};

use crate::catalog_store::FullCatalogStore;
use crate::review::ReviewManager;
use crate::user::{FavoritesManager, UserManager, UserStore};
use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use tower_http::services::ServeDir;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use super::graphql::{build_schema, GraphqlContext, TunescoreSchema};
use super::{log_requests, state::*, RequestsLoggingLevel, ServerConfig};

const GRAPHQL_PATH: &str = "/graphql";

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
    pub songs: usize,
    pub artists: usize,
    pub reviews: usize,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

fn collect_stats(state: &ServerState) -> Result<ServerStats> {
    Ok(ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
        songs: state.catalog_store.get_songs_count()?,
        artists: state.catalog_store.get_artists_count()?,
        reviews: state.catalog_store.get_reviews_count()?,
    })
}

async fn home(State(state): State<ServerState>) -> Response {
    match collect_stats(&state) {
        Ok(stats) => Json(stats).into_response(),
        Err(err) => {
            error!("Failed to collect server stats: {:?}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn graphql_handler(
    State(schema): State<TunescoreSchema>,
    request: GraphQLRequest,
) -> GraphQLResponse {
    schema.execute(request.into_inner()).await.into()
}

async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint(GRAPHQL_PATH).finish())
}

impl ServerState {
    fn new(
        catalog_store: GuardedCatalogStore,
        user_store: Arc<dyn UserStore>,
        max_aggregate_retries: usize,
    ) -> ServerState {
        let review_manager = Arc::new(ReviewManager::new(
            user_store.clone(),
            catalog_store.clone(),
            max_aggregate_retries,
        ));
        let schema = build_schema(GraphqlContext {
            catalog_store: catalog_store.clone(),
            review_manager,
            favorites_manager: Arc::new(FavoritesManager::new(user_store.clone())),
            user_manager: Arc::new(UserManager::new(user_store)),
        });
        ServerState {
            start_time: Instant::now(),
            catalog_store,
            schema,
            hash: env!("GIT_HASH").to_owned(),
        }
    }
}

pub fn make_app(
    config: ServerConfig,
    catalog_store: Arc<dyn FullCatalogStore>,
    user_store: Arc<dyn UserStore>,
    max_aggregate_retries: usize,
) -> Result<Router> {
    let state = ServerState::new(catalog_store, user_store, max_aggregate_retries);

    let graphql_method_router = if config.graphiql {
        get(graphiql).post(graphql_handler)
    } else {
        post(graphql_handler)
    };
    let graphql_routes: Router = Router::new()
        .route(GRAPHQL_PATH, graphql_method_router)
        .with_state(state.clone());

    let home_router: Router = match config.frontend_dir_path {
        Some(frontend_path) => {
            let static_files_service =
                ServeDir::new(frontend_path).append_index_html_on_directories(true);
            Router::new().fallback_service(static_files_service)
        }
        None => Router::new().route("/", get(home)).with_state(state.clone()),
    };

    let app: Router = home_router.merge(graphql_routes).layer(
        middleware::from_fn_with_state(config.requests_logging_level.clone(), log_requests),
    );

    Ok(app)
}

pub async fn run_server(
    catalog_store: Arc<dyn FullCatalogStore>,
    user_store: Arc<dyn UserStore>,
    requests_logging_level: RequestsLoggingLevel,
    port: u16,
    frontend_dir_path: Option<String>,
    graphiql: bool,
    max_aggregate_retries: usize,
) -> Result<()> {
    let config = ServerConfig {
        port,
        requests_logging_level,
        frontend_dir_path,
        graphiql,
    };
    let app = make_app(config, catalog_store, user_store, max_aggregate_retries)?;

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("Listening on {}", listener.local_addr()?);
    if graphiql {
        info!("GraphiQL available at http://localhost:{}{}", port, GRAPHQL_PATH);
    }

    Ok(axum::serve(listener, app).await?)
}
