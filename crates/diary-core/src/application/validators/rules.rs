//! Declarative rule-based validators
//!
//! Most feature validators are a flat list of "property X must satisfy Y,
//! otherwise report code Z" rules. [`RuleValidator`] captures exactly that
//! and evaluates the rules in declaration order.

use std::borrow::Cow;
use std::fmt;
use std::future::Future;

use diary_rs_domain::{Error, Request, ValidationFailure};
use once_cell::sync::Lazy;
use regex::Regex;

use super::{ValidationResult, Validator};

type Check<R> = Box<dyn Fn(&R) -> bool + Send + Sync>;

struct Rule<R> {
    property: Cow<'static, str>,
    code: Cow<'static, str>,
    message: Cow<'static, str>,
    check: Check<R>,
}

/// Validator built from an ordered list of predicate rules
///
/// Every failing rule yields one [`ValidationFailure`], in the order the
/// rules were declared.
///
/// # Examples
/// ```
/// use diary_rs::application::validators::rules::{self, RuleValidator};
/// use diary_rs_domain::{Outcome, Request};
///
/// struct Login {
///     email: String,
///     password: String,
/// }
///
/// impl Request for Login {
///     type Response = Outcome<String>;
/// }
///
/// let validator = RuleValidator::new()
///     .rule("Email", "Validation.InvalidEmail", "Email is not valid", |r: &Login| {
///         rules::is_email(&r.email)
///     })
///     .rule("Password", "Validation.Required", "Password is required", |r: &Login| {
///         rules::not_blank(&r.password)
///     });
///
/// let failures = validator.failures(&Login {
///     email: "not-an-email".into(),
///     password: String::new(),
/// });
/// assert_eq!(failures.len(), 2);
/// assert_eq!(failures[0].error_code, "Validation.InvalidEmail");
/// ```
pub struct RuleValidator<R> {
    rules: Vec<Rule<R>>,
}

impl<R> RuleValidator<R> {
    /// Create a validator with no rules
    #[must_use]
    pub const fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule; `check` returns `true` when the request is valid
    #[must_use]
    pub fn rule<F>(
        mut self,
        property: impl Into<Cow<'static, str>>,
        code: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
        check: F,
    ) -> Self
    where
        F: Fn(&R) -> bool + Send + Sync + 'static,
    {
        self.rules.push(Rule {
            property: property.into(),
            code: code.into(),
            message: message.into(),
            check: Box::new(check),
        });
        self
    }

    /// Append a rule that reports `error` when `check` fails
    #[must_use]
    pub fn rule_error<F>(self, property: impl Into<Cow<'static, str>>, error: Error, check: F) -> Self
    where
        F: Fn(&R) -> bool + Send + Sync + 'static,
    {
        self.rule(
            property,
            error.code().to_owned(),
            error.message().to_owned(),
            check,
        )
    }

    /// Append a rule reporting `Validation.<property>` when `check` fails
    #[must_use]
    pub fn required<F>(
        self,
        property: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
        check: F,
    ) -> Self
    where
        F: Fn(&R) -> bool + Send + Sync + 'static,
    {
        let property = property.into();
        let error = Error::validation(&property, message);
        self.rule_error(property, error, check)
    }

    /// Evaluate every rule against `request`
    pub fn failures(&self, request: &R) -> Vec<ValidationFailure> {
        self.rules
            .iter()
            .filter(|rule| !(rule.check)(request))
            .map(|rule| {
                ValidationFailure::new(
                    rule.property.clone(),
                    rule.code.clone(),
                    rule.message.clone(),
                )
            })
            .collect()
    }

    /// Number of declared rules
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rule has been declared
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<R> Default for RuleValidator<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> fmt::Debug for RuleValidator<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleValidator")
            .field(
                "rules",
                &self
                    .rules
                    .iter()
                    .map(|rule| (rule.property.as_ref(), rule.code.as_ref()))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<R: Request> Validator<R> for RuleValidator<R> {
    fn validate(&self, request: &R) -> impl Future<Output = ValidationResult> + Send {
        futures::future::ready(Ok(self.failures(request)))
    }
}

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").expect("email pattern is a valid regex")
});

/// `Some` check for optional properties
#[must_use]
pub const fn is_present<T>(value: &Option<T>) -> bool {
    value.is_some()
}

/// Non-empty after trimming whitespace
#[must_use]
pub fn not_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Plausible `local@domain.tld` address
#[must_use]
pub fn is_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

/// Character count within `min..=max`
#[must_use]
pub fn length_between(value: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&value.chars().count())
}
