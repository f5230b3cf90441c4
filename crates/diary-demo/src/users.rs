//! In-memory users feature
//!
//! Requests, handler and validators for account operations, backed by a
//! process-local store. Everything here is wired into a [`Registry`] by
//! [`registry`].

use std::collections::HashMap;
use std::sync::Arc;

use diary_rs::prelude::*;
use diary_rs::{RegistryError, rules};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

/// Failure codes reported by the users feature
pub mod errors {
    use diary_rs::Error;

    /// No user with the given id
    pub const NOT_FOUND: Error = Error::from_static("User.NotFound", "The user was not found");
    /// Email already registered
    pub const EMAIL_TAKEN: Error =
        Error::from_static("User.AlreadyExists", "A user with this email already exists");
    /// Missing or unknown caller identity
    pub const INVALID_TOKEN: Error =
        Error::from_static("Authentication.InvalidToken", "The token is invalid");
    /// Email and password do not match
    pub const INVALID_CREDENTIALS: Error = Error::from_static(
        "Authentication.InvalidCredentials",
        "The email or password is incorrect",
    );
    /// Current password does not match
    pub const WRONG_PASSWORD: Error =
        Error::from_static("User.WrongPassword", "The current password is incorrect");
}

/// Change the caller's password
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePassword {
    /// Caller identity, absent when the token could not be resolved
    pub user_id: Option<Uuid>,
    /// Password the caller claims to have
    pub current_password: String,
    /// Replacement password
    pub new_password: String,
}

impl Request for ChangePassword {
    type Response = Outcome<bool>;
}

/// Exchange credentials for an access token
#[derive(Debug, Clone, Deserialize)]
pub struct Login {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

impl Request for Login {
    type Response = Outcome<TokenResponse>;
}

/// Create an account
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Register {
    /// Account email
    pub email: String,
    /// Name shown in the diary
    pub display_name: String,
    /// Initial password
    pub password: String,
}

impl Request for Register {
    type Response = Outcome<UserResponse>;
}

/// Look up one user
#[derive(Debug, Clone, Copy)]
pub struct GetUserById {
    /// User to fetch
    pub user_id: Uuid,
}

impl Request for GetUserById {
    type Response = Outcome<UserResponse>;
}

/// Remove an account
#[derive(Debug, Clone, Copy)]
pub struct DeleteUser {
    /// User to remove
    pub user_id: Uuid,
}

impl Request for DeleteUser {
    type Response = Outcome;
}

/// Public view of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// User id
    pub id: Uuid,
    /// Account email
    pub email: String,
    /// Name shown in the diary
    pub display_name: String,
}

/// Issued access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Opaque bearer token
    pub token: String,
}

#[derive(Debug, Clone)]
struct UserRecord {
    email: String,
    display_name: String,
    password: String,
}

impl UserRecord {
    fn view(&self, id: Uuid) -> UserResponse {
        UserResponse {
            id,
            email: self.email.clone(),
            display_name: self.display_name.clone(),
        }
    }
}

/// Process-local user storage
#[derive(Debug, Default)]
pub struct UserStore {
    users: RwLock<HashMap<Uuid, UserRecord>>,
}

impl UserStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with one known account, returning its id
    #[must_use]
    pub fn seeded() -> (Arc<Self>, Uuid) {
        let store = Arc::new(Self::new());
        let id = store.insert("ann@example.com", "Ann", "hunter2");
        (store, id)
    }

    /// Add a user without any checks
    pub fn insert(&self, email: &str, display_name: &str, password: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.users.write().insert(
            id,
            UserRecord {
                email: email.to_owned(),
                display_name: display_name.to_owned(),
                password: password.to_owned(),
            },
        );
        id
    }

    /// Number of stored users
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    /// Whether the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }
}

/// Handles every users request against a shared [`UserStore`]
#[derive(Debug, Clone)]
pub struct UsersHandler {
    store: Arc<UserStore>,
}

impl UsersHandler {
    /// Handler over `store`
    #[must_use]
    pub fn new(store: Arc<UserStore>) -> Self {
        Self { store }
    }
}

impl Handler<GetUserById> for UsersHandler {
    async fn handle(
        &self,
        request: GetUserById,
        _cancellation: &CancellationToken,
    ) -> HandlerResult<Outcome<UserResponse>> {
        let users = self.store.users.read();
        Ok(match users.get(&request.user_id) {
            Some(user) => Outcome::success(user.view(request.user_id)),
            None => Outcome::failure(errors::NOT_FOUND),
        })
    }
}

impl Handler<Register> for UsersHandler {
    async fn handle(
        &self,
        request: Register,
        _cancellation: &CancellationToken,
    ) -> HandlerResult<Outcome<UserResponse>> {
        let mut users = self.store.users.write();
        if users.values().any(|u| u.email.eq_ignore_ascii_case(&request.email)) {
            return Ok(Outcome::failure(errors::EMAIL_TAKEN));
        }

        let id = Uuid::new_v4();
        let record = UserRecord {
            email: request.email,
            display_name: request.display_name,
            password: request.password,
        };
        let view = record.view(id);
        users.insert(id, record);
        debug!(user = %id, "user registered");
        Ok(Outcome::success(view))
    }
}

impl Handler<Login> for UsersHandler {
    async fn handle(
        &self,
        request: Login,
        _cancellation: &CancellationToken,
    ) -> HandlerResult<Outcome<TokenResponse>> {
        let users = self.store.users.read();
        let found = users
            .iter()
            .find(|(_, u)| u.email.eq_ignore_ascii_case(&request.email))
            .filter(|(_, u)| u.password == request.password);

        Ok(match found {
            Some((id, _)) => Outcome::success(TokenResponse {
                token: format!("demo.{id}"),
            }),
            None => Outcome::failure(errors::INVALID_CREDENTIALS),
        })
    }
}

impl Handler<ChangePassword> for UsersHandler {
    async fn handle(
        &self,
        request: ChangePassword,
        _cancellation: &CancellationToken,
    ) -> HandlerResult<Outcome<bool>> {
        // validation guarantees presence; an empty id here is a stale token
        let Some(user_id) = request.user_id else {
            return Ok(Outcome::failure(errors::INVALID_TOKEN));
        };

        let mut users = self.store.users.write();
        let Some(user) = users.get_mut(&user_id) else {
            return Ok(Outcome::failure(errors::NOT_FOUND));
        };
        if user.password != request.current_password {
            return Ok(Outcome::failure(errors::WRONG_PASSWORD));
        }

        user.password = request.new_password;
        Ok(Outcome::success(true))
    }
}

impl Handler<DeleteUser> for UsersHandler {
    async fn handle(
        &self,
        request: DeleteUser,
        _cancellation: &CancellationToken,
    ) -> HandlerResult<Outcome> {
        Ok(match self.store.users.write().remove(&request.user_id) {
            Some(_) => Outcome::unit(),
            None => Outcome::failure(errors::NOT_FOUND),
        })
    }
}

fn password_rules<R: 'static>(
    validator: RuleValidator<R>,
    property: &'static str,
    password: fn(&R) -> &str,
) -> RuleValidator<R> {
    validator
        .rule(property, "Validation.Required", "Password is required", move |r: &R| {
            rules::not_blank(password(r))
        })
        .rule(
            property,
            "Validation.InvalidLength",
            "Password must be between 6 and 128 characters",
            move |r: &R| rules::length_between(password(r), 6, 128),
        )
}

/// Caller identity must be resolved
#[must_use]
pub fn change_password_identity() -> RuleValidator<ChangePassword> {
    RuleValidator::new().rule_error("UserId", errors::INVALID_TOKEN, |r: &ChangePassword| {
        rules::is_present(&r.user_id)
    })
}

/// Replacement password rules
#[must_use]
pub fn change_password_strength() -> RuleValidator<ChangePassword> {
    password_rules(RuleValidator::new(), "NewPassword", |r: &ChangePassword| {
        r.new_password.as_str()
    })
}

/// Login email must look like an address
#[must_use]
pub fn login_email() -> RuleValidator<Login> {
    RuleValidator::new().rule(
        "Email",
        "Validation.InvalidEmail",
        "Email is not valid",
        |r: &Login| rules::is_email(&r.email),
    )
}

/// Login password must be present
#[must_use]
pub fn login_password() -> RuleValidator<Login> {
    RuleValidator::new().required("Password", "Password is required", |r: &Login| {
        rules::not_blank(&r.password)
    })
}

/// Registration rules
#[must_use]
pub fn register_rules() -> RuleValidator<Register> {
    let validator = RuleValidator::new()
        .rule("Email", "Validation.InvalidEmail", "Email is not valid", |r: &Register| {
            rules::is_email(&r.email)
        })
        .rule(
            "DisplayName",
            "Validation.InvalidLength",
            "Display name must be between 1 and 64 characters",
            |r: &Register| {
                rules::not_blank(&r.display_name) && rules::length_between(&r.display_name, 1, 64)
            },
        );
    password_rules(validator, "Password", |r: &Register| r.password.as_str())
}

/// Registry with every users request and its validators
///
/// # Errors
/// Returns [`RegistryError`] if the wiring is inconsistent.
pub fn registry(store: Arc<UserStore>) -> Result<Registry, RegistryError> {
    let users = UsersHandler::new(store);
    Registry::builder()
        .handler::<GetUserById, _>(users.clone())
        .handler::<Register, _>(users.clone())
        .handler::<Login, _>(users.clone())
        .handler::<ChangePassword, _>(users.clone())
        .handler::<DeleteUser, _>(users)
        .validator::<ChangePassword, _>(change_password_identity())
        .validator::<ChangePassword, _>(change_password_strength())
        .validator::<Login, _>(login_email())
        .validator::<Login, _>(login_password())
        .validator::<Register, _>(register_rules())
        .build()
}
