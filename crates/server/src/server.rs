use axum::{
    Json, Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, put},
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use std::sync::Arc;

use crate::{
    ServerError,
    auth::{AuthError, Caller, IdentityVerifier},
    expenses,
};
use api_types::status::Status;
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub verifier: Arc<dyn IdentityVerifier>,
}

/// Resolves the bearer credential into a [`Caller`].
///
/// A missing, malformed or rejected credential ends the request with 401.
async fn auth(
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Some(Authorization(bearer)) = request.headers().typed_get::<Authorization<Bearer>>()
    else {
        return Err(ServerError::Unauthenticated(
            AuthError::MissingCredentials.to_string(),
        ));
    };

    let user_id = state.verifier.verify(bearer.token()).map_err(|err| {
        tracing::debug!("rejected credential: {err}");
        ServerError::Unauthenticated(err.to_string())
    })?;

    request.extensions_mut().insert(Caller(user_id));
    Ok(next.run(request).await)
}

async fn status() -> Json<Status> {
    Json(Status {
        message: "Expense Tracker Backend Running".to_string(),
    })
}

pub fn router(state: ServerState) -> Router {
    let api = Router::new()
        .route("/api/expenses", get(expenses::list).post(expenses::create))
        .route(
            "/api/expenses/{id}",
            put(expenses::update).delete(expenses::delete),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    Router::new()
        .route("/", get(status))
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    verifier: Arc<dyn IdentityVerifier>,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        verifier,
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    verifier: Arc<dyn IdentityVerifier>,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, verifier, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
