//! End-to-end dispatch scenarios
//!
//! Each scenario sends requests through a [`Dispatcher`] over the in-memory
//! users feature, logs what came back and checks it against the documented
//! behaviour.

use std::sync::Arc;

use clap::ValueEnum;
use diary_rs::prelude::*;
use tokio_util::sync::CancellationToken;
use tracing::info;
use uuid::Uuid;

use crate::error::{DemoError, DemoResult};
use crate::users::{self, ChangePassword, GetUserById, Login, UserStore, UsersHandler};

/// Scenario selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Run every scenario in order
    All,
    /// Missing caller identity is rejected before the handler runs
    ChangePassword,
    /// Two failing login rules report the first registered one
    Login,
    /// Unvalidated lookup equals a direct handler call
    GetUser,
    /// Independent requests dispatched together
    Concurrent,
}

impl Scenario {
    const EACH: [Self; 4] = [
        Self::ChangePassword,
        Self::Login,
        Self::GetUser,
        Self::Concurrent,
    ];

    /// Scenarios selected by `self`
    #[must_use]
    pub fn expand(self) -> Vec<Self> {
        match self {
            Self::All => Self::EACH.to_vec(),
            single => vec![single],
        }
    }

    /// Kebab-case name, as accepted on the command line
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::ChangePassword => "change-password",
            Self::Login => "login",
            Self::GetUser => "get-user",
            Self::Concurrent => "concurrent",
        }
    }
}

/// Dispatcher and fixtures shared by the scenarios
#[derive(Debug, Clone)]
pub struct Harness {
    dispatcher: Dispatcher,
    store: Arc<UserStore>,
    user_id: Uuid,
}

impl Harness {
    /// Seeded users feature behind a dispatcher built from `config`
    ///
    /// # Errors
    /// Returns [`DemoError::Registry`] if the users feature is miswired.
    pub fn new(config: &DispatchConfig) -> DemoResult<Self> {
        let (store, user_id) = UserStore::seeded();
        let registry = users::registry(Arc::clone(&store))?;
        Ok(Self {
            dispatcher: Dispatcher::with_config(registry, config),
            store,
            user_id,
        })
    }

    /// Run the selected scenarios, stopping at the first unexpected result
    ///
    /// # Errors
    /// Returns [`DemoError::Scenario`] when a scenario does not behave as
    /// documented, or [`DemoError::Dispatch`] on a dispatch fault.
    pub async fn run(&self, selection: Scenario, cancellation: &CancellationToken) -> DemoResult<()> {
        for scenario in selection.expand() {
            info!(scenario = scenario.name(), "running scenario");
            match scenario {
                Scenario::ChangePassword => self.change_password(cancellation).await?,
                Scenario::Login => self.login(cancellation).await?,
                Scenario::GetUser => self.get_user(cancellation).await?,
                Scenario::Concurrent => self.concurrent(cancellation).await?,
                Scenario::All => {}
            }
            info!(scenario = scenario.name(), "scenario passed");
        }
        Ok(())
    }

    async fn change_password(&self, cancellation: &CancellationToken) -> DemoResult<()> {
        let outcome = self
            .dispatcher
            .send(
                ChangePassword {
                    user_id: None,
                    current_password: "x".to_owned(),
                    new_password: "y".to_owned(),
                },
                cancellation,
            )
            .await?;

        report("change-password", &outcome);
        expect_code("change-password", &outcome, "Authentication.InvalidToken")
    }

    async fn login(&self, cancellation: &CancellationToken) -> DemoResult<()> {
        let outcome = self
            .dispatcher
            .send(
                Login {
                    email: "not-an-email".to_owned(),
                    password: String::new(),
                },
                cancellation,
            )
            .await?;

        report("login", &outcome);
        expect_code("login", &outcome, "Validation.InvalidEmail")
    }

    async fn get_user(&self, cancellation: &CancellationToken) -> DemoResult<()> {
        let request = GetUserById {
            user_id: self.user_id,
        };
        let dispatched = self.dispatcher.send(request, cancellation).await?;
        let direct = UsersHandler::new(Arc::clone(&self.store))
            .handle(request, cancellation)
            .await
            .map_err(|e| failed("get-user", format!("direct call faulted: {e}")))?;

        report("get-user", &dispatched);
        if dispatched != direct {
            return Err(failed("get-user", "dispatched outcome differs from direct call"));
        }

        let first = dispatched
            .try_value()
            .ok_or_else(|| failed("get-user", format!("expected a user, got {}", dispatched.error())))?;
        if dispatched.value() != first {
            return Err(failed("get-user", "value changed between reads"));
        }
        Ok(())
    }

    async fn concurrent(&self, cancellation: &CancellationToken) -> DemoResult<()> {
        let (user, token) = tokio::join!(
            self.dispatcher.send(
                GetUserById {
                    user_id: self.user_id,
                },
                cancellation,
            ),
            self.dispatcher.send(
                Login {
                    email: "ann@example.com".to_owned(),
                    password: "hunter2".to_owned(),
                },
                cancellation,
            ),
        );
        let (user, token) = (user?, token?);

        report("concurrent/get-user", &user);
        report("concurrent/login", &token);
        if user.is_failure() || token.is_failure() {
            return Err(failed("concurrent", "both requests should succeed"));
        }
        Ok(())
    }
}

fn report<T: std::fmt::Debug>(scenario: &'static str, outcome: &Outcome<T>) {
    match outcome.try_value() {
        Some(value) => info!(scenario, ?value, "success"),
        None => info!(scenario, error = %outcome.error(), "failure"),
    }
}

fn expect_code<T>(scenario: &'static str, outcome: &Outcome<T>, code: &str) -> DemoResult<()> {
    if outcome.is_failure() && outcome.error().code() == code {
        Ok(())
    } else {
        Err(failed(
            scenario,
            format!("expected `{code}`, got `{}`", outcome.error().code()),
        ))
    }
}

fn failed(scenario: &'static str, detail: impl Into<String>) -> DemoError {
    DemoError::Scenario {
        scenario,
        detail: detail.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diary_rs::ValidationMode;

    #[test]
    fn test_expand() {
        assert_eq!(Scenario::All.expand().len(), 4);
        assert_eq!(Scenario::Login.expand(), vec![Scenario::Login]);
    }

    #[test]
    fn test_names_match_cli_values() {
        for scenario in Scenario::value_variants() {
            let parsed = Scenario::from_str(scenario.name(), false).unwrap();
            assert_eq!(parsed, *scenario);
        }
    }

    #[tokio::test]
    async fn test_all_scenarios_pass_in_both_modes() {
        for mode in [ValidationMode::Sequential, ValidationMode::Concurrent] {
            let config = DispatchConfig::default().with_validation_mode(mode);
            let harness = Harness::new(&config).unwrap();
            harness
                .run(Scenario::All, &CancellationToken::new())
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_cancelled_run_reports_dispatch_fault() {
        let harness = Harness::new(&DispatchConfig::default()).unwrap();
        let token = CancellationToken::new();
        token.cancel();

        let err = harness.run(Scenario::GetUser, &token).await.unwrap_err();
        assert!(matches!(err, DemoError::Dispatch(e) if e.is_cancelled()));
    }
}
