//! Common test utilities and fixture features
//!
//! Provides a small in-memory users feature (requests, handlers, validators)
//! plus instrumented handlers and validators shared by the integration suites.

#![allow(dead_code)]

use diary_rs::prelude::*;
use diary_rs::rules;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

// ============================================================================
// Error catalogue
// ============================================================================

pub mod user_errors {
    use diary_rs::Error;

    pub const NOT_FOUND: Error = Error::from_static("User.NotFound", "The user was not found");
    pub const INVALID_TOKEN: Error =
        Error::from_static("Authentication.InvalidToken", "The token is invalid");
    pub const INVALID_CREDENTIALS: Error = Error::from_static(
        "Authentication.InvalidCredentials",
        "The email or password is incorrect",
    );
    pub const WRONG_PASSWORD: Error =
        Error::from_static("User.WrongPassword", "The current password is incorrect");
}

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Clone)]
pub struct ChangePassword {
    pub user_id: Option<Uuid>,
    pub current_password: String,
    pub new_password: String,
}

impl Request for ChangePassword {
    type Response = Outcome<bool>;
}

#[derive(Debug, Clone)]
pub struct Login {
    pub email: String,
    pub password: String,
}

impl Request for Login {
    type Response = Outcome<String>;
}

#[derive(Debug, Clone)]
pub struct GetUserById {
    pub user_id: Uuid,
}

impl Request for GetUserById {
    type Response = Outcome<UserResponse>;
}

#[derive(Debug, Clone)]
pub struct DeleteUser {
    pub user_id: Uuid,
}

impl Request for DeleteUser {
    type Response = Outcome;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
}

// ============================================================================
// In-memory users feature
// ============================================================================

#[derive(Debug, Clone)]
struct UserRecord {
    email: String,
    display_name: String,
    password: String,
}

#[derive(Debug, Default)]
pub struct UserStore {
    users: parking_lot::Mutex<HashMap<Uuid, UserRecord>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, email: &str, display_name: &str, password: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.users.lock().insert(
            id,
            UserRecord {
                email: email.to_string(),
                display_name: display_name.to_string(),
                password: password.to_string(),
            },
        );
        id
    }

    pub fn password_of(&self, id: Uuid) -> Option<String> {
        self.users.lock().get(&id).map(|u| u.password.clone())
    }

    pub fn len(&self) -> usize {
        self.users.lock().len()
    }
}

/// Handler for every users request, sharing one store
#[derive(Debug, Clone)]
pub struct UsersHandler {
    store: Arc<UserStore>,
}

impl UsersHandler {
    pub fn new(store: Arc<UserStore>) -> Self {
        Self { store }
    }

    pub fn get_user(&self, user_id: Uuid) -> Outcome<UserResponse> {
        match self.store.users.lock().get(&user_id) {
            Some(user) => Outcome::success(UserResponse {
                id: user_id,
                email: user.email.clone(),
                display_name: user.display_name.clone(),
            }),
            None => Outcome::failure(user_errors::NOT_FOUND),
        }
    }
}

impl Handler<GetUserById> for UsersHandler {
    async fn handle(
        &self,
        request: GetUserById,
        _cancellation: &CancellationToken,
    ) -> HandlerResult<Outcome<UserResponse>> {
        Ok(self.get_user(request.user_id))
    }
}

impl Handler<ChangePassword> for UsersHandler {
    async fn handle(
        &self,
        request: ChangePassword,
        _cancellation: &CancellationToken,
    ) -> HandlerResult<Outcome<bool>> {
        let Some(user_id) = request.user_id else {
            return Ok(Outcome::failure(user_errors::INVALID_TOKEN));
        };
        let mut users = self.store.users.lock();
        let Some(user) = users.get_mut(&user_id) else {
            return Ok(Outcome::failure(user_errors::NOT_FOUND));
        };
        if user.password != request.current_password {
            return Ok(Outcome::failure(user_errors::WRONG_PASSWORD));
        }
        user.password = request.new_password;
        Ok(Outcome::success(true))
    }
}

impl Handler<Login> for UsersHandler {
    async fn handle(
        &self,
        request: Login,
        _cancellation: &CancellationToken,
    ) -> HandlerResult<Outcome<String>> {
        let users = self.store.users.lock();
        let token = users
            .iter()
            .find(|(_, u)| u.email == request.email && u.password == request.password)
            .map(|(id, _)| format!("token-{id}"));
        Ok(match token {
            Some(token) => Outcome::success(token),
            None => Outcome::failure(user_errors::INVALID_CREDENTIALS),
        })
    }
}

impl Handler<DeleteUser> for UsersHandler {
    async fn handle(
        &self,
        request: DeleteUser,
        _cancellation: &CancellationToken,
    ) -> HandlerResult<Outcome> {
        Ok(match self.store.users.lock().remove(&request.user_id) {
            Some(_) => Outcome::unit(),
            None => Outcome::failure(user_errors::NOT_FOUND),
        })
    }
}

// ============================================================================
// Validators
// ============================================================================

pub fn change_password_validator() -> RuleValidator<ChangePassword> {
    RuleValidator::new().rule(
        "UserId",
        user_errors::INVALID_TOKEN.code().to_string(),
        user_errors::INVALID_TOKEN.message().to_string(),
        |r: &ChangePassword| rules::is_present(&r.user_id),
    )
}

pub fn login_email_validator() -> RuleValidator<Login> {
    RuleValidator::new().rule(
        "Email",
        "Validation.InvalidEmail",
        "Email is not valid",
        |r: &Login| rules::is_email(&r.email),
    )
}

pub fn login_password_validator() -> RuleValidator<Login> {
    RuleValidator::new().rule(
        "Password",
        "Validation.Required",
        "Password is required",
        |r: &Login| rules::not_blank(&r.password),
    )
}

/// Validator that reports a fixed list of failures after an optional delay
#[derive(Debug, Clone)]
pub struct ScriptedValidator {
    failures: Vec<ValidationFailure>,
    delay: Duration,
    runs: Arc<AtomicUsize>,
}

impl ScriptedValidator {
    pub fn failing(codes: &[&'static str]) -> Self {
        Self {
            failures: codes
                .iter()
                .map(|code| ValidationFailure::new("Field", *code, format!("{code} failed")))
                .collect(),
            delay: Duration::ZERO,
            runs: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn passing() -> Self {
        Self::failing(&[])
    }

    pub fn reporting(failures: Vec<ValidationFailure>) -> Self {
        Self {
            failures,
            ..Self::passing()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn runs(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.runs)
    }
}

impl<R: Request> Validator<R> for ScriptedValidator {
    async fn validate(&self, _request: &R) -> ValidationResult {
        self.runs.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.failures.clone())
    }
}

/// Validator that faults instead of reporting failures
#[derive(Debug, Clone, Copy)]
pub struct FaultyValidator;

impl<R: Request> Validator<R> for FaultyValidator {
    async fn validate(&self, _request: &R) -> ValidationResult {
        Err("rule engine unavailable".into())
    }
}

// ============================================================================
// Instrumented handlers
// ============================================================================

/// Wraps a handler and counts invocations
#[derive(Debug, Clone)]
pub struct Counted<H> {
    inner: H,
    calls: Arc<AtomicUsize>,
}

impl<H> Counted<H> {
    pub fn new(inner: H) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                inner,
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

impl<R: Request, H: Handler<R>> Handler<R> for Counted<H> {
    async fn handle(
        &self,
        request: R,
        cancellation: &CancellationToken,
    ) -> HandlerResult<R::Response> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.handle(request, cancellation).await
    }
}

/// Handler that never completes on its own
#[derive(Debug, Clone, Copy)]
pub struct PendingHandler;

impl<R: Request> Handler<R> for PendingHandler {
    async fn handle(
        &self,
        _request: R,
        _cancellation: &CancellationToken,
    ) -> HandlerResult<R::Response> {
        futures::future::pending().await
    }
}

/// Handler that faults with an infrastructure error
#[derive(Debug, Clone, Copy)]
pub struct BrokenHandler;

impl<R: Request> Handler<R> for BrokenHandler {
    async fn handle(
        &self,
        _request: R,
        _cancellation: &CancellationToken,
    ) -> HandlerResult<R::Response> {
        Err("connection refused".into())
    }
}

// ============================================================================
// Wiring helpers
// ============================================================================

pub fn calls(counter: &Arc<AtomicUsize>) -> usize {
    counter.load(Ordering::SeqCst)
}

pub fn seeded_store() -> (Arc<UserStore>, Uuid) {
    let store = Arc::new(UserStore::new());
    let id = store.insert("ann@example.com", "Ann", "hunter2");
    (store, id)
}

/// Registry with the full users feature and its validators
pub fn users_registry(store: Arc<UserStore>) -> Registry {
    let users = UsersHandler::new(store);
    Registry::builder()
        .handler::<GetUserById, _>(users.clone())
        .handler::<ChangePassword, _>(users.clone())
        .handler::<Login, _>(users.clone())
        .handler::<DeleteUser, _>(users)
        .validator::<ChangePassword, _>(change_password_validator())
        .validator::<Login, _>(login_email_validator())
        .validator::<Login, _>(login_password_validator())
        .build()
        .expect("users feature wiring is valid")
}
