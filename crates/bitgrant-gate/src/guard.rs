//! Guards that stop an action before it runs when the gate denies it.

use serde_json::{Map, Value};

use crate::error::{GateError, GateResult};
use crate::gate::AuthorizationGate;
use crate::rights::RightsSpec;

/// Option keys consumed by [`VerifyAccess::from_options`]. Every other key
/// is forwarded to the host unchanged.
const SPEC_KEYS: [&str; 2] = ["can?", "can"];
const DENY_KEY: &str = "deny";

/// Anything that carries an authorization gate, typically a request.
pub trait GateContext {
    /// The gate of this context.
    fn gate(&self) -> &AuthorizationGate;
}

impl GateContext for AuthorizationGate {
    fn gate(&self) -> &AuthorizationGate {
        self
    }
}

/// A registered before-action filter.
pub type Filter<C> = Box<dyn Fn(&C) -> GateResult<()> + Send + Sync>;

/// Something that runs filters before actions, such as a controller.
pub trait GuardHost<C> {
    /// Register `filter` to run before actions, scoped by `options`.
    fn before_action(&mut self, options: Map<String, Value>, filter: Filter<C>);
}

/// Outcome of one guarded attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The action may proceed.
    Allowed,
    /// The action must not run.
    Denied {
        /// Message configured on the guard, if any.
        message: Option<String>,
    },
}

impl Decision {
    /// Whether the action may proceed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Convert into a result, denials becoming [`GateError::Forbidden`].
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Forbidden`] for a denial.
    pub fn into_result(self) -> GateResult<()> {
        match self {
            Self::Allowed => Ok(()),
            Self::Denied { message } => Err(GateError::Forbidden { message }),
        }
    }
}

/// A rights spec bound to its denial message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guard {
    spec: Option<RightsSpec>,
    message: Option<String>,
}

impl Guard {
    /// Guard requiring `spec`.
    pub fn new(spec: impl Into<RightsSpec>) -> Self {
        Self {
            spec: Some(spec.into()),
            message: None,
        }
    }

    /// Message carried by the denial.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// The required spec, if any. A guard without one denies everything.
    #[must_use]
    pub fn spec(&self) -> Option<&RightsSpec> {
        self.spec.as_ref()
    }

    /// The configured denial message.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Decide whether `ctx` passes this guard.
    pub fn decide<C: GateContext + ?Sized>(&self, ctx: &C) -> Decision {
        let gate = ctx.gate();
        if gate.authorized_by(self.spec.as_ref()) {
            Decision::Allowed
        } else {
            tracing::info!(
                context_id = %gate.context_id(),
                spec = ?self.spec.as_ref().map(ToString::to_string),
                "access forbidden"
            );
            Decision::Denied {
                message: self.message.clone(),
            }
        }
    }

    /// Check `ctx` against this guard.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Forbidden`] carrying the guard's message.
    pub fn check<C: GateContext + ?Sized>(&self, ctx: &C) -> GateResult<()> {
        self.decide(ctx).into_result()
    }

    /// Run `op` only if `ctx` passes.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Forbidden`] without running `op`.
    pub fn run<C, T>(&self, ctx: &C, op: impl FnOnce() -> T) -> GateResult<T>
    where
        C: GateContext + ?Sized,
    {
        self.check(ctx)?;
        Ok(op())
    }

    /// Run a fallible `op` only if `ctx` passes.
    ///
    /// # Errors
    ///
    /// Returns the denial converted into `E` without running `op`, or the
    /// error of `op`.
    pub fn try_run<C, T, E>(&self, ctx: &C, op: impl FnOnce() -> Result<T, E>) -> Result<T, E>
    where
        C: GateContext + ?Sized,
        E: From<GateError>,
    {
        self.check(ctx)?;
        op()
    }
}

/// Declarative guard registration: the required rights, the denial message
/// and the host's own scoping options (`only`, `except`, ...).
///
/// ```
/// use bitgrant_gate::{FilterChain, VerifyAccess};
/// use bitgrant_gate::AuthorizationGate;
///
/// let mut host: FilterChain<AuthorizationGate> = FilterChain::new();
/// VerifyAccess::new(("post", "delete"))
///     .deny("You may not delete posts")
///     .option("only", "destroy")
///     .register(&mut host);
///
/// let gate = AuthorizationGate::new();
/// let err = host.dispatch(&gate, "destroy", || "deleted").unwrap_err();
/// assert_eq!(err.to_string(), "You may not delete posts");
/// assert_eq!(host.dispatch(&gate, "show", || "shown").unwrap(), "shown");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerifyAccess {
    spec: Option<RightsSpec>,
    deny: Option<String>,
    options: Map<String, Value>,
}

impl VerifyAccess {
    /// Require `spec`.
    pub fn new(spec: impl Into<RightsSpec>) -> Self {
        Self {
            spec: Some(spec.into()),
            ..Self::default()
        }
    }

    /// Parse an options map.
    ///
    /// The spec is read from `can?` (or `can`) as either a spec string or an
    /// object of `permission: capability` entries, and the message from
    /// `deny`. Those keys are removed; everything else is forwarded.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::InvalidSpec`] if the spec or message has the
    /// wrong shape.
    pub fn from_options(mut options: Map<String, Value>) -> GateResult<Self> {
        let mut spec = None;
        for key in SPEC_KEYS {
            if let Some(value) = options.remove(key)
                && spec.is_none()
            {
                spec = Some(spec_from_value(&value)?);
            }
        }

        let deny = match options.remove(DENY_KEY) {
            None | Some(Value::Null) => None,
            Some(Value::String(message)) => Some(message),
            Some(other) => {
                return Err(GateError::InvalidSpec {
                    input: other.to_string(),
                    reason: "deny message must be a string".to_owned(),
                });
            },
        };

        Ok(Self {
            spec,
            deny,
            options,
        })
    }

    /// Message used when access is denied.
    #[must_use]
    pub fn deny(mut self, message: impl Into<String>) -> Self {
        self.deny = Some(message.into());
        self
    }

    /// Add a host scoping option.
    #[must_use]
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Options forwarded to the host.
    #[must_use]
    pub fn filter_options(&self) -> &Map<String, Value> {
        &self.options
    }

    /// The guard this registration installs.
    #[must_use]
    pub fn guard(&self) -> Guard {
        Guard {
            spec: self.spec.clone(),
            message: self.deny.clone(),
        }
    }

    /// Install the guard on `host` as a before-action filter.
    pub fn register<C, H>(self, host: &mut H)
    where
        C: GateContext + 'static,
        H: GuardHost<C> + ?Sized,
    {
        let guard = self.guard();
        tracing::debug!(
            spec = ?guard.spec().map(ToString::to_string),
            options = %serde_json::Value::Object(self.options.clone()),
            "registering access guard"
        );
        host.before_action(self.options, Box::new(move |ctx: &C| guard.check(ctx)));
    }
}

fn spec_from_value(value: &Value) -> GateResult<RightsSpec> {
    match value {
        Value::String(text) => text.parse(),
        Value::Object(entries) => entries
            .iter()
            .map(|(permission, capability)| match capability {
                Value::String(capability) => Ok((permission.clone(), capability.clone())),
                other => Err(GateError::InvalidSpec {
                    input: value.to_string(),
                    reason: format!("capability for `{permission}` must be a string, got {other}"),
                }),
            })
            .collect::<GateResult<Vec<_>>>()
            .map(RightsSpec::Any),
        other => Err(GateError::InvalidSpec {
            input: other.to_string(),
            reason: "expected a string or an object".to_owned(),
        }),
    }
}

/// Register an access guard on `host` from an options map.
///
/// # Errors
///
/// Returns [`GateError::InvalidSpec`] if the options cannot be parsed; the
/// host is left untouched.
pub fn verify_access<C, H>(host: &mut H, options: Map<String, Value>) -> GateResult<()>
where
    C: GateContext + 'static,
    H: GuardHost<C> + ?Sized,
{
    VerifyAccess::from_options(options)?.register(host);
    Ok(())
}
