//! HTTP surface for the users feature
//!
//! Each route builds a request, sends it through the shared [`Dispatcher`]
//! and lets [`OutcomeResponse`] pick the status from the failure code.

use std::net::SocketAddr;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use diary_rs::prelude::*;
use diary_rs::OutcomeResponse;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;
use uuid::Uuid;

use crate::error::DemoResult;
use crate::users::{
    ChangePassword, DeleteUser, GetUserById, Login, Register, TokenResponse, UserResponse,
};

type Reply<T> = Result<OutcomeResponse<T>, DispatchError>;

/// Shared state of the HTTP server
#[derive(Debug, Clone)]
pub struct AppState {
    dispatcher: Dispatcher,
    shutdown: CancellationToken,
}

impl AppState {
    /// State over `dispatcher`; in-flight requests are cancelled with `shutdown`
    #[must_use]
    pub const fn new(dispatcher: Dispatcher, shutdown: CancellationToken) -> Self {
        Self {
            dispatcher,
            shutdown,
        }
    }

    async fn send<R>(&self, request: R) -> Result<R::Response, DispatchError>
    where
        R: Request,
    {
        let token = self.shutdown.child_token();
        self.dispatcher.send(request, &token).await
    }
}

/// Router for the users feature
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/users", post(register))
        .route("/users/{id}", get(get_user).delete(delete_user))
        .route("/users/login", post(login))
        .route("/users/password", post(change_password))
        .with_state(state)
}

/// Serve until `shutdown` is cancelled
///
/// # Errors
/// Returns [`crate::error::DemoError::Io`] if the listener cannot be bound or
/// the server fails.
pub async fn serve(addr: SocketAddr, state: AppState) -> DemoResult<()> {
    let shutdown = state.shutdown.clone();
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("server stopped");
    Ok(())
}

async fn get_user(State(state): State<AppState>, Path(user_id): Path<Uuid>) -> Reply<UserResponse> {
    Ok(state.send(GetUserById { user_id }).await?.into())
}

async fn delete_user(State(state): State<AppState>, Path(user_id): Path<Uuid>) -> Reply<()> {
    Ok(state.send(DeleteUser { user_id }).await?.into())
}

async fn register(State(state): State<AppState>, Json(request): Json<Register>) -> Reply<UserResponse> {
    Ok(state.send(request).await?.into())
}

async fn login(State(state): State<AppState>, Json(request): Json<Login>) -> Reply<TokenResponse> {
    Ok(state.send(request).await?.into())
}

async fn change_password(
    State(state): State<AppState>,
    Json(request): Json<ChangePassword>,
) -> Reply<bool> {
    Ok(state.send(request).await?.into())
}
